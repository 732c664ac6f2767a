//! The default status vocabulary every registry is seeded with.

use crate::value::{Payload, ResultValue};

/// Built-in tag groups as `[primary, aliases...]`.
pub const BUILTIN_TAGS: &[&[&str]] = &[
    &["succeeded", "success", "successful"],
    &["failed", "fail", "error"],
    &["ok"],
    &["true"],
    &["false"],
];

pub const SUCCEEDED: &str = "succeeded";
pub const FAILED: &str = "failed";
pub const OK: &str = "ok";
pub const TRUE: &str = "true";
pub const FALSE: &str = "false";

pub fn succeeded(value: impl Into<Payload>) -> ResultValue {
    ResultValue::with_value(SUCCEEDED, value)
}

pub fn success(value: impl Into<Payload>) -> ResultValue {
    succeeded(value)
}

pub fn successful(value: impl Into<Payload>) -> ResultValue {
    succeeded(value)
}

pub fn failed(value: impl Into<Payload>) -> ResultValue {
    ResultValue::with_value(FAILED, value)
}

pub fn fail(value: impl Into<Payload>) -> ResultValue {
    failed(value)
}

pub fn error(value: impl Into<Payload>) -> ResultValue {
    failed(value)
}

pub fn ok(value: impl Into<Payload>) -> ResultValue {
    ResultValue::with_value(OK, value)
}

pub fn true_(value: impl Into<Payload>) -> ResultValue {
    ResultValue::with_value(TRUE, value)
}

pub fn false_(value: impl Into<Payload>) -> ResultValue {
    ResultValue::with_value(FALSE, value)
}
