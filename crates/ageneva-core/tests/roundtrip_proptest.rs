//! Property tests for the strategy language, request framing, and
//! normalizer.

use ageneva_core::{normalize_request, Field, Request, Strategy as GenevaStrategy};
use proptest::prelude::*;

fn method() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("DELETE".to_string()),
    ]
}

fn canonical_action() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("changecase{upper}".to_string()),
        Just("changecase{lower}".to_string()),
        ("[a-z0-9]{1,5}", 1usize..100)
            .prop_map(|(v, n)| format!("insert{{{v}:start:value:{n}}}")),
        ("[a-z0-9]{1,5}", 1usize..100)
            .prop_map(|(v, n)| format!("insert{{{v}:middle:name:{n}}}")),
        ("[a-z0-9]{0,5}", 1usize..100)
            .prop_map(|(v, n)| format!("replace{{{v}:name:{n}}}")),
        Just("duplicate".to_string()),
    ]
}

fn canonical_rule() -> impl Strategy<Value = String> {
    let field = prop_oneof![
        Just("method".to_string()),
        Just("path".to_string()),
        Just("version".to_string()),
        Just("host".to_string()),
    ];
    (field, canonical_action(), canonical_action()).prop_map(|(field, outer, inner)| {
        format!("[HTTP:{field}:*]-{outer}({inner},)-|")
    })
}

proptest! {
    #[test]
    fn strategy_parse_roundtrip(rules in proptest::collection::vec(canonical_rule(), 1..4)) {
        let strategy_str = rules.concat();
        let parsed = GenevaStrategy::new(&strategy_str).unwrap();
        prop_assert_eq!(parsed.to_string(), strategy_str);
    }

    #[test]
    fn insert_end_grows_value_by_payload(
        value in "[a-z]{0,12}",
        payload in "[a-z0-9]{1,6}",
        num in 1usize..20,
    ) {
        let s = format!("[HTTP:path:*]-insert{{{payload}:end:value:{num}}}-|");
        let strategy = GenevaStrategy::new(&s).unwrap();

        let field = Field {
            name: "path".to_string(),
            value: value.clone(),
            is_header: false,
        };
        let out = strategy.rules()[0].tree().apply(&field);
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].value.len(), value.len() + num * payload.len());
    }

    #[test]
    fn duplicate_multiplies_the_stream(depth in 1u32..5) {
        let mut tree = "duplicate".to_string();
        for _ in 1..depth {
            tree = format!("duplicate({tree},{tree})");
        }
        let s = format!("[HTTP:method:*]-{tree}-|");
        let strategy = GenevaStrategy::new(&s).unwrap();

        let field = Field {
            name: "method".to_string(),
            value: "GET".to_string(),
            is_header: false,
        };
        let out = strategy.rules()[0].tree().apply(&field);
        prop_assert_eq!(out.len(), 2usize.pow(depth));
    }

    #[test]
    fn request_framing_roundtrip(
        method in method(),
        path in "/[a-z0-9/]{0,12}",
        headers in proptest::collection::vec(
            ("[A-Za-z][A-Za-z-]{0,8}", "[ -~]{0,10}"),
            1..4,
        ),
        body in proptest::collection::vec(any::<u8>(), 0..24),
    ) {
        let header_block: Vec<String> = headers
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .collect();
        let mut raw = format!(
            "{method} {path} HTTP/1.1\r\n{}\r\n\r\n",
            header_block.join("\r\n")
        )
        .into_bytes();
        raw.extend(&body);

        let req = Request::parse(&raw).unwrap();
        prop_assert_eq!(req.to_bytes(), raw);
    }

    #[test]
    fn normalize_is_idempotent(
        method in "[A-Za-z]{1,6}",
        path in "[a-z/*?&]{1,10}",
        version in prop_oneof![Just("HTTP/1.1".to_string()), "[A-Z/1.]{1,8}"],
        header_name in "[A-Za-z-]{1,8}",
        header_value in "[ -~]{0,12}",
        body in proptest::collection::vec(any::<u8>(), 0..16),
    ) {
        let mut raw = format!(
            "{method} {path} {version}\r\n{header_name}: {header_value}\r\n\r\n"
        )
        .into_bytes();
        raw.extend(&body);

        if let Ok(once) = normalize_request(&raw) {
            let twice = normalize_request(&once).unwrap();
            prop_assert_eq!(once, twice);
        }
    }

    #[test]
    fn mutate_then_normalize_yields_strict_framing(
        rule in canonical_rule(),
    ) {
        let strategy = GenevaStrategy::new(&rule).unwrap();
        let raw = b"GET /some/path HTTP/1.1\r\nHost: example.com\r\n\r\n";

        let mutated = strategy.apply_to_bytes(raw).unwrap();
        if let Ok(normalized) = normalize_request(&mutated) {
            // the normalized form must itself be parseable and stable
            let reparsed = Request::parse(&normalized).unwrap();
            prop_assert_eq!(reparsed.to_bytes(), normalized);
        }
    }
}
