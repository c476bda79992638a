//! Integration tests for the strategy language
//!
//! End-to-end scenarios: parse a strategy string, apply it to a raw
//! request, and compare the mutated bytes.

use ageneva_core::{Error, Strategy};

#[test]
fn host_name_space_prefix() {
    let strategy = Strategy::new("[HTTP:host:*]-insert{%20:start:name:1}-|").unwrap();
    let got = strategy
        .apply_to_bytes(
            b"GET /route HTTP/1.1\r\nHost: localhost\r\nContent-Length: 9\r\n\r\nsome data",
        )
        .unwrap();
    assert_eq!(
        got,
        b"GET /route HTTP/1.1\r\n Host: localhost\r\nContent-Length: 9\r\n\r\nsome data"
    );
}

#[test]
fn path_start_space_insert_normalizes_back() {
    let strategy = Strategy::new("[HTTP:path:*]-insert{%20:start:value:1}-|").unwrap();
    let original = b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n";

    let mutated = strategy.apply_to_bytes(original).unwrap();
    assert_eq!(&mutated, b"GET  / HTTP/1.1\r\nHost: example.com\r\n\r\n");

    let normalized = ageneva_core::normalize_request(&mutated).unwrap();
    assert_eq!(normalized, original);
}

#[test]
fn changecase_host_header() {
    let strategy = Strategy::new("[HTTP:host:*]-changecase{upper}-|").unwrap();
    let mutated = strategy
        .apply_to_bytes(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")
        .unwrap();
    assert_eq!(&mutated, b"GET / HTTP/1.1\r\nHOST: EXAMPLE.COM\r\n\r\n");

    // the normalizer canonicalizes the name back but cannot restore the
    // value's case
    let normalized = ageneva_core::normalize_request(&mutated).unwrap();
    assert_eq!(
        &normalized,
        b"GET / HTTP/1.1\r\nHost: EXAMPLE.COM\r\n\r\n"
    );
}

#[test]
fn duplicate_host_with_replaced_name() {
    let strategy = Strategy::new("[HTTP:host:*]-duplicate(replace{a:name:4},)-|").unwrap();
    let mutated = strategy
        .apply_to_bytes(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")
        .unwrap();
    assert_eq!(
        &mutated,
        b"GET / HTTP/1.1\r\naaaa: example.com\r\nHost: example.com\r\n\r\n"
    );
}

#[test]
fn literal_match_gates_the_rule() {
    let strategy = Strategy::new("[HTTP:method:GET]-replace{PUT:value:1}-|").unwrap();

    // method is "GET" but the match string was lowercased at parse, so
    // the literal comparison fails and the request passes unchanged
    let raw = b"GET / HTTP/1.1\r\nHost: x\r\n\r\n";
    assert_eq!(strategy.apply_to_bytes(raw).unwrap(), raw);

    let strategy = Strategy::new("[HTTP:method:get]-replace{PUT:value:1}-|").unwrap();
    assert_eq!(strategy.apply_to_bytes(raw).unwrap(), raw);
}

#[test]
fn missing_trailing_pipe_is_invalid_rule() {
    assert!(matches!(
        Strategy::new("[http:path:*]-changecase{upper}"),
        Err(Error::InvalidRule(_))
    ));
}

#[test]
fn error_kinds_are_distinguishable() {
    assert!(matches!(
        Strategy::new("[HTTP:host:*]-changecase{sideways}-|"),
        Err(Error::InvalidAction(_))
    ));
    assert!(matches!(
        Strategy::new("[DNSQR:qname:*]-changecase{upper}-|"),
        Err(Error::UnsupportedProtocol(_))
    ));
    assert!(matches!(
        Strategy::new("no trigger here-|"),
        Err(Error::InvalidRule(_))
    ));

    let strategy = Strategy::new("[HTTP:host:*]-duplicate-|").unwrap();
    assert!(matches!(
        strategy.apply_to_bytes(b"not an http request"),
        Err(Error::MalformedRequest(_))
    ));
}

#[test]
fn right_branch_rejected_outside_duplicate() {
    assert!(matches!(
        Strategy::new("[HTTP:host:*]-changecase{upper}(,changecase{lower})-|"),
        Err(Error::InvalidAction(_))
    ));
}

#[test]
fn multi_rule_strategies_compose() {
    let strategy = Strategy::new(
        "[HTTP:method:*]-insert{%20:end:value:1}-|[HTTP:host:*]-duplicate(replace{%2F:name:4},)-|",
    )
    .unwrap();
    let mutated = strategy
        .apply_to_bytes(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n")
        .unwrap();
    assert_eq!(
        &mutated,
        b"GET  / HTTP/1.1\r\n////: example.com\r\nHost: example.com\r\n\r\n"
    );
}

#[test]
fn body_passes_through_unmodified() {
    let strategy = Strategy::new("[HTTP:path:*]-replace{%3F:value:3}-|").unwrap();
    let raw =
        "POST /submit HTTP/1.1\r\nHost: x\r\nContent-Length: 11\r\n\r\nbinary\x00\x01身".as_bytes();
    let mutated = strategy.apply_to_bytes(raw).unwrap();
    assert!(mutated.starts_with(b"POST ??? HTTP/1.1\r\n"));
    assert!(mutated.ends_with("binary\x00\x01身".as_bytes()));
}

#[test]
fn strategy_string_roundtrip() {
    let strategies = [
        "[HTTP:version:*]-insert{%09:middle:value:14}-|",
        "[HTTP:host:*]-duplicate(replace{a:name:64},)-|",
        "[HTTP:method:*]-duplicate(,replace{a:name:1407})-|",
        "[HTTP:host:*]-replace{%C3%97:name:1371}(duplicate(duplicate(,replace{host:name:1}),),)-|",
        "[HTTP:host:*]-insert{%20%0A:start:name:1}-|",
    ];
    for s in strategies {
        assert_eq!(Strategy::new(s).unwrap().to_string(), s, "{s}");
    }
}

#[test]
fn noncanonical_forms_parse_to_a_fixed_point() {
    // optional copy counts and bare duplicates re-serialize in canonical
    // form, which then round-trips exactly
    let noncanonical = [
        "[HTTP:host:*]-insert{%09:end:name}-|",
        "[HTTP:host:*]-replace{host:name}-|",
        "[HTTP:method:*]-duplicate(,)-|",
    ];
    for s in noncanonical {
        let canonical = Strategy::new(s).unwrap().to_string();
        assert_eq!(
            Strategy::new(&canonical).unwrap().to_string(),
            canonical,
            "{s}"
        );
    }
}
