#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use wozzit_core::error::WozzitError;
use wozzit_core::protocol::parse_value;
use wozzit_core::Envelope;
use wozzit_node::dispatch::{matches, MatchCriteria, MatchField};

fn alert() -> Envelope {
    let v = json!({"wozzit": {
        "protocol": [0, 0, 1],
        "schema": "com.example.alert",
        "version": 2,
        "psk": "hunter2",
        "payload": {"level": "high", "tags": ["disk", {"dev": "sda"}]}
    }});
    parse_value(&v, Some("192.168.1.20")).unwrap()
}

#[test]
fn wildcard_matches_everything() {
    assert!(matches(&MatchCriteria::any(), &alert()));
    assert!(matches(&MatchCriteria::any(), &Envelope::receipt()));
    assert!(matches(&MatchCriteria::from_value(&json!("*")).unwrap(), &Envelope::new()));
}

#[test]
fn schema_must_be_exactly_equal() {
    let c = MatchCriteria::schema("wozzit.receipt");
    assert!(matches(&c, &Envelope::receipt()));
    assert!(!matches(&c, &Envelope::new()));
    assert!(!matches(&c, &Envelope::with_schema("wozzit.receipt.v2")));
    assert!(!matches(&MatchCriteria::field(MatchField::Schema, json!(["wozzit.receipt"])), &Envelope::receipt()));
}

#[test]
fn every_field_is_matchable() {
    let env = alert();
    let cases = [
        (MatchField::Protocol, json!([0, 0, 1])),
        (MatchField::Schema, json!("com.example.alert")),
        (MatchField::Version, json!(2)),
        (MatchField::Psk, json!("hunter2")),
        (MatchField::Payload, json!({"tags": ["disk", {"dev": "sda"}], "level": "high"})),
        (MatchField::SourceAddress, json!("192.168.1.20")),
    ];
    for (field, expected) in cases {
        assert!(matches(&MatchCriteria::field(field, expected), &env), "field={field}");
    }
}

#[test]
fn payload_equality_is_deep() {
    let env = alert();
    let partial = MatchCriteria::field(MatchField::Payload, json!({"level": "high"}));
    assert!(!matches(&partial, &env));

    let reordered = MatchCriteria::field(MatchField::Payload, json!({"level": "high", "tags": [{"dev": "sda"}, "disk"]}));
    assert!(!matches(&reordered, &env));
}

#[test]
fn absent_fields_never_match() {
    let env = Envelope::new();
    assert!(!matches(&MatchCriteria::field(MatchField::Psk, json!("hunter2")), &env));
    assert!(!matches(&MatchCriteria::field(MatchField::Payload, json!(null)), &env));
    assert!(!matches(&MatchCriteria::field(MatchField::SourceAddress, json!("127.0.0.1")), &env));
}

#[test]
fn mapping_is_a_conjunction() {
    let env = alert();
    let both = MatchCriteria::schema("com.example.alert").and(MatchField::Version, 2);
    assert!(matches(&both, &env));

    let one_wrong = MatchCriteria::schema("com.example.alert").and(MatchField::Version, 3);
    assert!(!matches(&one_wrong, &env));

    assert!(matches(&MatchCriteria::Fields(Vec::new()), &env));
}

#[test]
fn version_compares_as_integer_value() {
    let env = alert();
    assert!(!matches(&MatchCriteria::field(MatchField::Version, json!("2")), &env));
    assert!(!matches(&MatchCriteria::field(MatchField::Version, json!(2.5)), &env));
}

#[test]
fn unknown_fields_rejected_at_registration() {
    let err = MatchCriteria::from_value(&json!({"schema": "x", "ip": "1.2.3.4"})).unwrap_err();
    assert!(matches!(err, WozzitError::InvalidRule(ref m) if m.contains("ip")), "{err}");

    let err = MatchCriteria::from_pairs([("shema", json!("x"))]).unwrap_err();
    assert!(matches!(err, WozzitError::InvalidRule(_)));

    for bad in [json!("all"), json!(1), json!(["schema"])] {
        assert!(MatchCriteria::from_value(&bad).is_err(), "{bad}");
    }
}

#[test]
fn from_value_keeps_declared_pairs() {
    let c = MatchCriteria::from_value(&json!({"sourceAddress": "10.0.0.1", "version": 1})).unwrap();
    match c {
        MatchCriteria::Fields(pairs) => {
            let fields: Vec<MatchField> = pairs.iter().map(|(f, _)| *f).collect();
            assert!(fields.contains(&MatchField::SourceAddress));
            assert!(fields.contains(&MatchField::Version));
            assert_eq!(fields.len(), 2);
        }
        MatchCriteria::Any => panic!("expected field mapping"),
    }
}
