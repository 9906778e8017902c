//! Unit tests for the record text codec.
//!
//! Covers:
//! - `name=value\n` encoding in record order
//! - positional decoding against the expected field names
//! - rejection of malformed content (count, name, value, overflow)

use sim_mailbox::mailbox::codec::{decode, encode};
use sim_mailbox::mailbox::Record;
use sim_mailbox::AppError;

// ── encode ─────────────────────────────────────────────────────────────────

#[test]
fn encode_single_field() {
    let record = Record::new().with_field("value", 7);
    assert_eq!(encode(&record), "value=7\n");
}

#[test]
fn encode_keeps_insertion_order() {
    let record = Record::new()
        .with_field("ptr", 4096)
        .with_field("len", -3)
        .with_field("alpha", 0);
    assert_eq!(encode(&record), "ptr=4096\nlen=-3\nalpha=0\n");
}

#[test]
fn encode_empty_record_is_empty_text() {
    assert_eq!(encode(&Record::new()), "");
}

#[test]
fn encode_extreme_values() {
    let record = Record::new()
        .with_field("min", i64::MIN)
        .with_field("max", i64::MAX);
    assert_eq!(
        encode(&record),
        format!("min={}\nmax={}\n", i64::MIN, i64::MAX)
    );
}

// ── decode: accepted input ─────────────────────────────────────────────────

#[test]
fn decode_single_field() {
    let record = decode("value=42\n", &["value"]).expect("decode");
    assert_eq!(record.get("value"), Some(42));
    assert_eq!(record.len(), 1);
}

#[test]
fn decode_multiple_fields_in_order() {
    let record = decode("ptr=4096\nlen=-3\n", &["ptr", "len"]).expect("decode");
    assert_eq!(record.names(), vec!["ptr", "len"]);
    assert_eq!(record.get("ptr"), Some(4096));
    assert_eq!(record.get("len"), Some(-3));
}

#[test]
fn decode_accepts_explicit_plus_sign() {
    let record = decode("value=+5\n", &["value"]).expect("decode");
    assert_eq!(record.get("value"), Some(5));
}

#[test]
fn decode_tolerates_missing_final_newline() {
    let record = decode("value=9", &["value"]).expect("decode");
    assert_eq!(record.get("value"), Some(9));
}

#[test]
fn decode_accepts_crlf_line_endings() {
    let record = decode("a=1\r\nb=2\r\n", &["a", "b"]).expect("decode");
    assert_eq!(record.get("a"), Some(1));
    assert_eq!(record.get("b"), Some(2));
}

#[test]
fn decode_accepts_owned_name_slices() {
    let names = vec!["value".to_owned()];
    let record = decode("value=1\n", &names).expect("decode");
    assert_eq!(record.get("value"), Some(1));
}

// ── decode: malformed input ────────────────────────────────────────────────

#[test]
fn decode_rejects_wrong_field_name() {
    let err = decode("other=1\n", &["value"]).expect_err("wrong name must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
    assert!(err.to_string().contains("expected 'value'"));
}

#[test]
fn decode_rejects_non_integer_value() {
    let err = decode("value=abc\n", &["value"]).expect_err("non-integer must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

#[test]
fn decode_rejects_fractional_value() {
    let err = decode("value=1.5\n", &["value"]).expect_err("fraction must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

#[test]
fn decode_rejects_overflowing_value() {
    let err = decode("value=9223372036854775808\n", &["value"])
        .expect_err("overflow must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
    assert!(err.to_string().contains("i64"));
}

#[test]
fn decode_rejects_missing_separator() {
    let err = decode("value 1\n", &["value"]).expect_err("missing '=' must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

#[test]
fn decode_rejects_surrounding_whitespace() {
    let err = decode("value = 1\n", &["value"]).expect_err("spaces must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

#[test]
fn decode_rejects_too_few_lines() {
    let err = decode("a=1\n", &["a", "b"]).expect_err("short record must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
    assert!(err.to_string().contains("expected 2 field(s), found 1"));
}

#[test]
fn decode_rejects_extra_lines() {
    let err = decode("a=1\nb=2\n", &["a"]).expect_err("extra line must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

#[test]
fn decode_rejects_empty_text() {
    let err = decode("", &["value"]).expect_err("empty record must fail");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

#[test]
fn decode_rejects_swapped_field_order() {
    let err = decode("b=2\na=1\n", &["a", "b"]).expect_err("order is positional");
    assert!(matches!(err, AppError::MalformedRecord(_)));
}

// ── round trip ─────────────────────────────────────────────────────────────

#[test]
fn decode_inverts_encode_for_mixed_record() {
    let record = Record::new()
        .with_field("ptr", 140_737_488_355_328)
        .with_field("size", 0)
        .with_field("delta", -17);
    let text = encode(&record);

    let decoded = decode(&text, &record.names()).expect("decode");
    assert_eq!(decoded, record);
}
