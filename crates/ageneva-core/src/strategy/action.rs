//! Primitive transformation actions
//!
//! The leaves of the strategy language. Each action transforms a [`Field`]
//! and hands the result to its successor; `duplicate` is the only
//! branching action, and `terminate` ends every chain. Because `duplicate`
//! multiplies the stream, applying a tree yields a *sequence* of fields.

use std::fmt;

use percent_encoding::percent_decode_str;
use rand::Rng;

use crate::error::{Error, Result};

/// The unit an action operates on.
///
/// For the `method`, `path`, and `version` components the component name
/// is carried in `name` and the current value in `value`. For a header,
/// `name` is the header name and `value` the header value, typically with
/// the leading separating space retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    /// Header name, or the start-line component name
    pub name: String,
    /// Header value, or the entire component if the field is not a header
    pub value: String,
    /// True if the field is a header
    pub is_header: bool,
}

/// Case folding applied by `changecase`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    /// Fold to upper case
    Upper,
    /// Fold to lower case
    Lower,
}

impl Case {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "upper" => Ok(Self::Upper),
            "lower" => Ok(Self::Lower),
            other => Err(Error::invalid_action(format!("invalid case: {other}"))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
        }
    }
}

/// Where `insert` splices its payload into the target string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Before the first byte
    Start,
    /// After the last byte
    End,
    /// At the byte-count midpoint
    Middle,
    /// At a uniformly random interior offset, never the absolute start or
    /// end; a string of one character or less is left unchanged
    Random,
}

impl Location {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "middle" => Ok(Self::Middle),
            "random" => Ok(Self::Random),
            other => Err(Error::invalid_action(format!("invalid location: {other}"))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::End => "end",
            Self::Middle => "middle",
            Self::Random => "random",
        }
    }

    fn splice(self, s: &str, payload: &str) -> String {
        match self {
            Self::Start => format!("{payload}{s}"),
            Self::End => format!("{s}{payload}"),
            Self::Middle => {
                let mid = floor_char_boundary(s, s.len() / 2);
                format!("{}{}{}", &s[..mid], payload, &s[mid..])
            }
            Self::Random => {
                // Interior char boundaries only; the absolute start and
                // end have their own locations.
                let cuts: Vec<usize> = s.char_indices().skip(1).map(|(i, _)| i).collect();
                if cuts.is_empty() {
                    return s.to_string();
                }
                let cut = cuts[rand::thread_rng().gen_range(0..cuts.len())];
                format!("{}{}{}", &s[..cut], payload, &s[cut..])
            }
        }
    }
}

/// Which header component an action targets. Ignored for start-line
/// fields, which only have a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Component {
    /// The header name
    Name,
    /// The header value
    Value,
}

impl Component {
    fn parse(s: &str) -> Result<Self> {
        match s {
            "name" => Ok(Self::Name),
            "value" => Ok(Self::Value),
            other => Err(Error::invalid_action(format!("invalid component: {other}"))),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Value => "value",
        }
    }
}

/// A node in a strategy's action tree.
///
/// Successors are strictly owned; a missing successor is normalized to
/// [`Action::Terminate`] at construction, so every non-terminate node has
/// both children set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Fold the case of the field's name and value
    Changecase {
        /// Direction of the fold
        case: Case,
        /// Next action in the chain
        next: Box<Action>,
    },
    /// Splice a value into the field
    Insert {
        /// The value in its original percent-encoded form
        value: String,
        /// The decoded value repeated `num` times, materialized once at
        /// construction so apply never re-decodes
        payload: String,
        /// Where the payload is spliced
        location: Location,
        /// Which header component is targeted
        component: Component,
        /// How many copies of the decoded value make up the payload
        num: usize,
        /// Next action in the chain
        next: Box<Action>,
    },
    /// Overwrite a component of the field; an empty value deletes it
    Replace {
        /// The value in its original percent-encoded form
        value: String,
        /// The decoded value repeated `num` times
        payload: String,
        /// Which header component is targeted
        component: Component,
        /// How many copies of the decoded value make up the payload
        num: usize,
        /// Next action in the chain
        next: Box<Action>,
    },
    /// Fork the chain: the field flows through both branches and the
    /// resulting sequences are concatenated, left before right
    Duplicate {
        /// Branch applied first
        left: Box<Action>,
        /// Branch applied second
        right: Box<Action>,
    },
    /// Return the field unchanged, ending the chain
    Terminate,
}

impl Action {
    /// Construct an action from its textual form `name` or `name{args}`
    /// with the given successors.
    ///
    /// Only `duplicate` accepts a non-terminate `right` successor; for
    /// every other action `left` is the next action in the chain.
    pub(crate) fn new(text: &str, left: Action, right: Action) -> Result<Self> {
        let (name, args) = split_args(text)?;

        if name != "duplicate" && right != Action::Terminate {
            return Err(Error::invalid_action(format!(
                "{name} action does not support a right branch action"
            )));
        }

        match name {
            "changecase" => {
                if args.len() != 1 {
                    return Err(Error::invalid_action("changecase requires 1 argument"));
                }

                Ok(Action::Changecase {
                    case: Case::parse(args[0])?,
                    next: Box::new(left),
                })
            }
            "insert" => {
                if args.len() != 3 && args.len() != 4 {
                    return Err(Error::invalid_action("insert requires 3 or 4 arguments"));
                }

                let num = parse_num(args.get(3).copied())?;
                let (value, payload) = decode_value(args[0], num)?;
                Ok(Action::Insert {
                    value,
                    payload,
                    location: Location::parse(args[1])?,
                    component: Component::parse(args[2])?,
                    num,
                    next: Box::new(left),
                })
            }
            "replace" => {
                if args.len() != 2 && args.len() != 3 {
                    return Err(Error::invalid_action("replace requires 2 or 3 arguments"));
                }

                let num = parse_num(args.get(2).copied())?;
                let (value, payload) = decode_value(args[0], num)?;
                Ok(Action::Replace {
                    value,
                    payload,
                    component: Component::parse(args[1])?,
                    num,
                    next: Box::new(left),
                })
            }
            "duplicate" => {
                if !args.is_empty() {
                    return Err(Error::invalid_action("duplicate does not support arguments"));
                }

                Ok(Action::Duplicate {
                    left: Box::new(left),
                    right: Box::new(right),
                })
            }
            other => Err(Error::invalid_action(format!("unknown action: {other}"))),
        }
    }

    /// Apply the action to `field` and return the transformed sequence.
    pub fn apply(&self, field: &Field) -> Vec<Field> {
        match self {
            Action::Terminate => vec![field.clone()],
            Action::Changecase { case, next } => {
                let folded = match case {
                    Case::Upper => Field {
                        name: field.name.to_uppercase(),
                        value: field.value.to_uppercase(),
                        is_header: field.is_header,
                    },
                    Case::Lower => Field {
                        name: field.name.to_lowercase(),
                        value: field.value.to_lowercase(),
                        is_header: field.is_header,
                    },
                };
                next.apply(&folded)
            }
            Action::Insert {
                payload,
                location,
                component,
                next,
                ..
            } => {
                let modified =
                    modify_component(field, *component, |s| location.splice(s, payload));
                next.apply(&modified)
            }
            Action::Replace {
                payload,
                component,
                next,
                ..
            } => {
                let modified = modify_component(field, *component, |_| payload.clone());
                next.apply(&modified)
            }
            Action::Duplicate { left, right } => {
                let mut fields = left.apply(field);
                fields.extend(right.apply(field));
                fields
            }
        }
    }
}

impl fmt::Display for Action {
    /// Geneva syntax: `<action>{<args>}(<left>,<right>)`, with the
    /// argument list omitted when the action takes none and the branch
    /// omitted when the chain ends.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Terminate => Ok(()),
            Action::Changecase { case, next } => {
                write!(f, "changecase{{{}}}{}", case.as_str(), Successor(next))
            }
            Action::Insert {
                value,
                location,
                component,
                num,
                next,
                ..
            } => write!(
                f,
                "insert{{{}:{}:{}:{}}}{}",
                value,
                location.as_str(),
                component.as_str(),
                num,
                Successor(next)
            ),
            Action::Replace {
                value,
                component,
                num,
                next,
                ..
            } => write!(
                f,
                "replace{{{}:{}:{}}}{}",
                value,
                component.as_str(),
                num,
                Successor(next)
            ),
            Action::Duplicate { left, right } => {
                if **left == Action::Terminate && **right == Action::Terminate {
                    write!(f, "duplicate")
                } else {
                    write!(f, "duplicate({left},{right})")
                }
            }
        }
    }
}

/// A successor rendered in Geneva syntax: `(<action>,)` when the chain
/// continues, nothing when it terminates.
struct Successor<'a>(&'a Action);

impl fmt::Display for Successor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self.0 == Action::Terminate {
            Ok(())
        } else {
            write!(f, "({},)", self.0)
        }
    }
}

/// Split `name{arg:arg:...}` into the name and its argument list. No
/// braces means no arguments.
fn split_args(text: &str) -> Result<(&str, Vec<&str>)> {
    match text.find('{') {
        Some(brace) => {
            if !text.ends_with('}') {
                return Err(Error::invalid_action(format!(
                    "closing brace must end the action if arguments are given: {text}"
                )));
            }

            let args = text[brace + 1..text.len() - 1].split(':').collect();
            Ok((&text[..brace], args))
        }
        None => Ok((text, Vec::new())),
    }
}

/// Parse an optional copy count. Missing or empty defaults to 1; values
/// below 1 are coerced to 1.
fn parse_num(arg: Option<&str>) -> Result<usize> {
    let Some(arg) = arg else {
        return Ok(1);
    };
    if arg.is_empty() {
        return Ok(1);
    }

    let n: i32 = arg.parse().map_err(|_| {
        Error::invalid_action(format!("number of copies ({arg:?}) must be an int"))
    })?;
    Ok(if n <= 0 { 1 } else { n as usize })
}

/// Decode a percent-encoded action value and materialize the payload.
///
/// Geneva uses URL encoding with space as `%20`, never `+`, so a plain
/// percent decode is the whole job. A malformed escape or a decoded value
/// that is not valid UTF-8 rejects the action.
fn decode_value(encoded: &str, num: usize) -> Result<(String, String)> {
    // percent_decode passes malformed escapes through untouched; treat
    // them as construction errors instead so bad strategies fail early.
    let bytes = encoded.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'%'
            && !(bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit())
        {
            return Err(Error::invalid_action(format!(
                "invalid value: {encoded}, incomplete percent escape"
            )));
        }
    }

    let decoded = percent_decode_str(encoded).decode_utf8().map_err(|e| {
        Error::invalid_action(format!("invalid value: {encoded}, {e}"))
    })?;
    Ok((encoded.to_string(), decoded.repeat(num)))
}

/// Apply `f` to the selected component. `name` only exists on headers;
/// for start-line fields the value is always the target.
fn modify_component(field: &Field, component: Component, f: impl FnOnce(&str) -> String) -> Field {
    let mut modified = field.clone();
    if component == Component::Name && field.is_header {
        modified.name = f(&field.name);
    } else {
        modified.value = f(&field.value);
    }
    modified
}

/// Largest char boundary in `s` that is not greater than `i`.
fn floor_char_boundary(s: &str, mut i: usize) -> usize {
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
