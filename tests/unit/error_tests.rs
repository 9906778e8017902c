//! Unit tests for `AppError` display format and error behavior.

use sim_mailbox::AppError;

#[test]
fn display_prefixes_identify_variant() {
    let cases = [
        (AppError::ChannelAbsent("x".into()), "channel absent: x"),
        (AppError::ChannelUnwritable("x".into()), "channel unwritable: x"),
        (AppError::MalformedRecord("x".into()), "malformed record: x"),
        (AppError::Config("x".into()), "config: x"),
        (AppError::Io("x".into()), "io: x"),
    ];

    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn channel_absent_is_distinct_from_io() {
    let absent = AppError::ChannelAbsent("mailbox.txt".into());
    let io = AppError::Io("mailbox.txt".into());
    assert_ne!(absent.to_string(), io.to_string());
}

#[test]
fn error_implements_std_error_trait() {
    let err: Box<dyn std::error::Error> = Box::new(AppError::MalformedRecord("bad".into()));
    assert_eq!(err.to_string(), "malformed record: bad");
}

#[test]
fn debug_representation_names_variant() {
    let err = AppError::ChannelUnwritable("read-only".into());
    let debug = format!("{err:?}");
    assert!(debug.contains("ChannelUnwritable"));
    assert!(debug.contains("read-only"));
}

#[test]
fn toml_error_converts_to_config() {
    let toml_err = toml::from_str::<toml::Value>("= nope").expect_err("invalid toml");
    let err = AppError::from(toml_err);
    assert!(matches!(err, AppError::Config(_)));
}
