//! The strategy language: rules, triggers, parsing, and evaluation
//!
//! A strategy is an ordered list of rules. Each rule pairs a [`Trigger`],
//! which selects a field of the request, with a tree of [`Action`]s that
//! transforms it. Rules apply left to right and each sees the output of
//! the rules before it.

mod action;

pub use action::{Action, Case, Component, Field, Location};

use std::fmt;
use std::str::FromStr;

use tracing::{instrument, trace};

use crate::error::{Error, Result};
use crate::http::Request;

/// An ordered list of rules applied to an HTTP request.
///
/// Construction errors are permanent: a strategy either parses whole or
/// not at all. Once built, a strategy is read-only and safe to share
/// across connections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    rules: Vec<Rule>,
}

impl Strategy {
    /// Parse a strategy string: one or more rules, each formatted as
    /// `<trigger>-<action tree>-|`.
    pub fn new(strategy: &str) -> Result<Self> {
        if strategy.is_empty() {
            return Err(Error::invalid_rule("no rules found"));
        }
        if !strategy.ends_with('|') {
            return Err(Error::invalid_rule(format!(
                "{strategy}, rules must end with '-|'"
            )));
        }

        let mut rules = Vec::new();
        for part in strategy.split_inclusive('|') {
            rules.push(Rule::parse(part)?);
        }
        Ok(Self { rules })
    }

    /// The rules in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Apply every rule in order to `req`.
    #[instrument(skip_all, fields(rules = self.rules.len()))]
    pub fn apply(&self, req: &mut Request) {
        for rule in &self.rules {
            if let Some(field) = rule.trigger.matches(req) {
                trace!(trigger = %rule.trigger, "trigger matched");
                // The duplicate action can branch the tree, so the
                // modifications come back as a sequence of fields.
                let mods = rule.tree.apply(&field);
                apply_modifications(req, &field, &mods);
            }
        }
    }

    /// Apply the strategy to raw request bytes.
    ///
    /// The input must include the start-line and all header lines; the
    /// body is optional and passes through unmodified.
    pub fn apply_to_bytes(&self, raw: &[u8]) -> Result<Vec<u8>> {
        let mut req = Request::parse(raw)?;
        self.apply(&mut req);
        Ok(req.to_bytes())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in &self.rules {
            write!(f, "{rule}")?;
        }
        Ok(())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// A trigger paired with the action tree it guards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    trigger: Trigger,
    tree: Action,
}

impl Rule {
    /// Parse `<trigger>-<action tree>-|`.
    fn parse(rule: &str) -> Result<Self> {
        let bad_format = || {
            Error::invalid_rule(format!(
                "{rule}, should be formatted as '<trigger>-<actions>-|'"
            ))
        };

        let rest = rule.strip_suffix("-|").ok_or_else(bad_format)?;
        let close = rest.find(']').ok_or_else(bad_format)?;
        let (trigger, tree) = rest.split_at(close + 1);
        let tree = tree.strip_prefix('-').ok_or_else(bad_format)?;

        Ok(Self {
            trigger: Trigger::parse(trigger)?,
            tree: parse_action_tree(tree)?,
        })
    }

    /// The rule's trigger.
    pub fn trigger(&self) -> &Trigger {
        &self.trigger
    }

    /// The root of the rule's action tree.
    pub fn tree(&self) -> &Action {
        &self.tree
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-|", self.trigger, self.tree)
    }
}

/// Selects the request field a rule operates on.
///
/// `method`, `path`, and `version` name start-line components; any other
/// field name is looked up case-insensitively among the headers. The
/// match string `*` always matches; anything else must equal the field
/// value literally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    proto: String,
    target_field: String,
    match_str: String,
}

impl Trigger {
    /// Parse `[<proto>:<field>:<matchstr>]`. Only HTTP is supported as a
    /// protocol; DNS and DNSQR are recognized but rejected.
    fn parse(trigger: &str) -> Result<Self> {
        let inner = trigger
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .ok_or_else(|| {
                Error::invalid_rule(format!(
                    "{trigger}, trigger should be formatted as '[<proto>:<field>:<matchstr>]'"
                ))
            })?;

        let parts: Vec<&str> = inner.splitn(3, ':').collect();
        if parts.len() != 3 {
            return Err(Error::invalid_rule(format!(
                "{trigger}, trigger should be formatted as '[<proto>:<field>:<matchstr>]'"
            )));
        }

        let proto = parts[0].to_uppercase();
        match proto.as_str() {
            "HTTP" => {}
            "DNS" | "DNSQR" => {
                return Err(Error::UnsupportedProtocol(format!(
                    "trigger protocol {proto} is not supported yet"
                )))
            }
            other => {
                return Err(Error::UnsupportedProtocol(format!(
                    "unknown trigger protocol: {other}"
                )))
            }
        }

        Ok(Self {
            proto,
            target_field: parts[1].to_lowercase(),
            match_str: parts[2].to_lowercase(),
        })
    }

    /// The field the trigger selects.
    pub fn target_field(&self) -> &str {
        &self.target_field
    }

    /// Return the selected field if the trigger matches `req`.
    ///
    /// Header values retain their leading separating space, so a literal
    /// match string must include it; `*` sidesteps the question.
    pub fn matches(&self, req: &Request) -> Option<Field> {
        let field = match self.target_field.as_str() {
            "method" => Field {
                name: "method".to_string(),
                value: req.method().to_string(),
                is_header: false,
            },
            "path" => Field {
                name: "path".to_string(),
                value: req.path().to_string(),
                is_header: false,
            },
            "version" => Field {
                name: "version".to_string(),
                value: req.version().to_string(),
                is_header: false,
            },
            _ => {
                let line = req.header_line(&self.target_field)?;
                let (name, value) = line.split_once(':')?;
                Field {
                    name: name.to_string(),
                    value: value.to_string(),
                    is_header: true,
                }
            }
        };

        (self.match_str == "*" || field.value == self.match_str).then_some(field)
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}:{}]", self.proto, self.target_field, self.match_str)
    }
}

/// Recursively parse an action tree in Geneva syntax:
/// `<action>[(<left>,<right>)]`, where the branch is present only when the
/// chain continues. An empty string is the terminate sink.
fn parse_action_tree(text: &str) -> Result<Action> {
    if text.is_empty() {
        return Ok(Action::Terminate);
    }

    let first_open = text.find('(');
    let last_close = text.rfind(')');
    match (first_open, last_close) {
        // No branch: a leaf action.
        (None, None) => Action::new(text, Action::Terminate, Action::Terminate),
        (Some(open), Some(close)) if open < close => {
            let (left, right) = split_left_right(&text[open..=close])?;
            let left = parse_action_tree(left)?;
            let right = parse_action_tree(right)?;
            Action::new(&text[..open], left, right)
        }
        _ => Err(Error::invalid_rule(format!(
            "{text}, missing matching parentheses"
        ))),
    }
}

/// Split `(<left>,<right>)` at its top-level comma.
///
/// Every `(` opens a branch that must contain a comma, so scanning while
/// counting both finds the separator where the counts meet.
fn split_left_right(branch: &str) -> Result<(&str, &str)> {
    let mut opens = 0;
    let mut commas = 0;
    for (i, c) in branch.char_indices() {
        match c {
            '(' => opens += 1,
            ',' => commas += 1,
            _ => {}
        }

        if opens == commas {
            return Ok((&branch[1..i], &branch[i + 1..branch.len() - 1]));
        }
    }

    Err(Error::invalid_rule(format!(
        "invalid format for left and right actions from {branch}"
    )))
}

/// Splice the result of an action tree back into the request.
///
/// For a header field the modifications become `name:value` lines joined
/// by CRLF, textually replacing the first occurrence of the original line
/// in the headers block. For a start-line component the modification
/// values concatenate into the new component.
fn apply_modifications(req: &mut Request, field: &Field, mods: &[Field]) {
    if field.is_header {
        let lines: Vec<String> = mods
            .iter()
            .map(|m| format!("{}:{}", m.name, m.value))
            .collect();
        let original = format!("{}:{}", field.name, field.value);
        req.headers = req.headers.replacen(&original, &lines.join("\r\n"), 1);
        return;
    }

    let value: String = mods.iter().map(|m| m.value.as_str()).collect();
    match field.name.as_str() {
        "method" => req.method = value,
        "path" => req.path = value,
        "version" => req.version = value,
        _ => {}
    }
}
