//! Expectation checks with pass/fail logging.
//!
//! # Design
//! Every check evaluates once. A pass is logged at info level with the
//! compared values and the caller's message. A failure is logged at error
//! level with the check name, what the comparison reported, the caller's
//! message and the expectation, then returned as `Err(AssertionFailure)` for
//! the caller to propagate with `?`. Nothing is retried or recovered here.
//!
//! Equality checks take the expected value first and the actual value second.

use std::cmp::Ordering;

use icu_collator::{Collator, CollatorOptions, Strength};
use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{ApiError, AssertionFailure};
use crate::http::HttpResponse;

fn outcome(
    check: &'static str,
    holds: bool,
    message: &str,
    passed: String,
    native: String,
    expectation: String,
) -> Result<(), AssertionFailure> {
    if holds {
        info!("Assert PASSED! {passed} {message}");
        return Ok(());
    }
    Err(failure(check, native, message, expectation))
}

fn failure(check: &'static str, native: String, message: &str, expectation: String) -> AssertionFailure {
    error!(
        check,
        native = %native,
        user_message = %message,
        expectation = %expectation,
        "Assert FAILED!"
    );
    AssertionFailure {
        check,
        native,
        message: message.to_string(),
        expectation,
    }
}

/// Render a value the way it reads in a log line: strings without quotes.
fn show(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Strict equality: numbers compare numerically, other types never match
/// across kinds, containers compare element-wise and objects ignore key order.
///
/// An object key holding `null` counts as absent, so a `None` field equals
/// a missing one.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(x), Value::Object(y)) => {
            let present = |map: &serde_json::Map<String, Value>| map.values().filter(|v| !v.is_null()).count();
            present(x) == present(y)
                && x.iter()
                    .filter(|(_, v)| !v.is_null())
                    .all(|(k, v)| y.get(k).is_some_and(|other| values_equal(v, other)))
        }
        _ => a == b,
    }
}

/// Locale-aware collation order for text (root locale, tertiary strength):
/// accents and case only break ties, and lowercase sorts before uppercase.
pub fn collate(a: &str, b: &str) -> Ordering {
    let mut options = CollatorOptions::new();
    options.strength = Some(Strength::Tertiary);
    match Collator::try_new(&Default::default(), options) {
        Ok(collator) => collator.compare(a, b),
        Err(e) => {
            warn!("Collator unavailable, comparing code points: {e}");
            a.cmp(b)
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// --- base ---

/// Always fails. Marks branches that must not be reached; generic over the
/// success type so it can stand in for any value with `?`.
pub fn assert_fail<T>(message: &str) -> Result<T, AssertionFailure> {
    Err(failure(
        "assert_fail",
        format!("Test case FAILED! {message}"),
        message,
        "Test case should not fail.".to_string(),
    ))
}

// --- boundaries ---

pub fn assert_number_greater_than_or_equal(
    bigger: impl Into<f64>,
    smaller: impl Into<f64>,
    message: &str,
) -> Result<(), AssertionFailure> {
    let (bigger, smaller) = (bigger.into(), smaller.into());
    outcome(
        "assert_number_greater_than_or_equal",
        bigger >= smaller,
        message,
        format!("[{bigger}] is greater or equal to [{smaller}]"),
        format!("expected {bigger} >= {smaller}"),
        format!("[{bigger}] should be greater or equal to [{smaller}]"),
    )
}

pub fn assert_number_less_than_or_equal(
    smaller: impl Into<f64>,
    bigger: impl Into<f64>,
    message: &str,
) -> Result<(), AssertionFailure> {
    let (smaller, bigger) = (smaller.into(), bigger.into());
    outcome(
        "assert_number_less_than_or_equal",
        smaller <= bigger,
        message,
        format!("[{smaller}] is less or equal to [{bigger}]"),
        format!("expected {smaller} <= {bigger}"),
        format!("[{smaller}] should be less or equal to [{bigger}]"),
    )
}

/// Passes when `later` sorts at or after `earlier` in collation order.
pub fn assert_text_greater_than_or_equal(later: &str, earlier: &str, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_text_greater_than_or_equal",
        collate(earlier, later) != Ordering::Greater,
        message,
        format!("[{later}] is greater or equal to [{earlier}]"),
        format!("`{earlier}` collates after `{later}`"),
        format!("[{later}] should be greater or equal to [{earlier}]"),
    )
}

/// Passes when `earlier` sorts at or before `later` in collation order.
pub fn assert_text_less_than_or_equal(earlier: &str, later: &str, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_text_less_than_or_equal",
        collate(earlier, later) != Ordering::Greater,
        message,
        format!("[{earlier}] is less or equal to [{later}]"),
        format!("`{earlier}` collates after `{later}`"),
        format!("[{earlier}] should be less or equal to [{later}]"),
    )
}

// --- binary ---

pub fn assert_true(condition: bool, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_true",
        condition,
        message,
        "Condition is true:".to_string(),
        "expected true, got false".to_string(),
        "Condition should be true.".to_string(),
    )
}

pub fn assert_false(condition: bool, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_false",
        !condition,
        message,
        "Condition is false:".to_string(),
        "expected false, got true".to_string(),
        "Condition should be false.".to_string(),
    )
}

/// Passes unless the value is false, 0, "", or null.
pub fn assert_truthy(value: &Value, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_truthy",
        is_truthy(value),
        message,
        "Result is truthy:".to_string(),
        format!("{value} is falsy"),
        "Result should be truthy.".to_string(),
    )
}

// --- contains ---

pub fn assert_string_contains(outer: &str, inner: &str, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_string_contains",
        outer.contains(inner),
        message,
        format!("[{inner}] is contained within [{outer}]"),
        format!("`{inner}` not found"),
        format!("[{inner}] should be contained within [{outer}]"),
    )
}

pub fn assert_string_does_not_contain(outer: &str, inner: &str, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_string_does_not_contain",
        !outer.contains(inner),
        message,
        format!("[{inner}] is not contained within [{outer}]"),
        format!("`{inner}` found"),
        format!("[{inner}] should NOT be contained within [{outer}]"),
    )
}

// --- equality ---

pub fn assert_equals(
    expected: impl Into<Value>,
    actual: impl Into<Value>,
    message: &str,
) -> Result<(), AssertionFailure> {
    let (expected, actual) = (expected.into(), actual.into());
    outcome(
        "assert_equals",
        values_equal(&expected, &actual),
        message,
        format!("[{}] is equal to [{}]", show(&expected), show(&actual)),
        format!("expected {expected}, received {actual}"),
        format!("[{}] should be equal to [{}]", show(&actual), show(&expected)),
    )
}

pub fn assert_not_equals(
    unexpected: impl Into<Value>,
    actual: impl Into<Value>,
    message: &str,
) -> Result<(), AssertionFailure> {
    let (unexpected, actual) = (unexpected.into(), actual.into());
    outcome(
        "assert_not_equals",
        !values_equal(&unexpected, &actual),
        message,
        format!("[{}] is not equal to [{}]", show(&unexpected), show(&actual)),
        format!("expected not {unexpected}, received {actual}"),
        format!("[{}] should NOT be equal to [{}]", show(&unexpected), show(&actual)),
    )
}

fn to_value<T: Serialize + ?Sized>(check: &'static str, value: &T, message: &str) -> Result<Value, AssertionFailure> {
    serde_json::to_value(value).map_err(|e| {
        failure(
            check,
            format!("value is not comparable: {e}"),
            message,
            "Objects should be serializable.".to_string(),
        )
    })
}

/// Structural equality of two serializable values.
pub fn assert_objects_equal<E, A>(expected: &E, actual: &A, message: &str) -> Result<(), AssertionFailure>
where
    E: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    let check = "assert_objects_equal";
    let (expected, actual) = (to_value(check, expected, message)?, to_value(check, actual, message)?);
    outcome(
        check,
        values_equal(&expected, &actual),
        message,
        "Objects are equal:".to_string(),
        format!("expected {expected}, received {actual}"),
        "Objects should be equal.".to_string(),
    )
}

pub fn assert_objects_not_equal<E, A>(first: &E, second: &A, message: &str) -> Result<(), AssertionFailure>
where
    E: Serialize + ?Sized,
    A: Serialize + ?Sized,
{
    let check = "assert_objects_not_equal";
    let (first, second) = (to_value(check, first, message)?, to_value(check, second, message)?);
    outcome(
        check,
        !values_equal(&first, &second),
        message,
        "Objects are not equal:".to_string(),
        format!("both are {first}"),
        "Objects should NOT be equal.".to_string(),
    )
}

// --- nullness ---

pub fn assert_string_null_or_empty(text: Option<&str>, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_string_null_or_empty",
        text.is_none_or(str::is_empty),
        message,
        "String is null or empty:".to_string(),
        format!("received {text:?}"),
        "String should be null or empty.".to_string(),
    )
}

pub fn assert_string_not_null_nor_empty(text: Option<&str>, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_string_not_null_nor_empty",
        text.is_some_and(|t| !t.is_empty()),
        message,
        "String is not null or empty:".to_string(),
        format!("received {text:?}"),
        "String should NOT be null or empty.".to_string(),
    )
}

pub fn assert_object_null(value: &Value, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_object_null",
        value.is_null(),
        message,
        "Object is null:".to_string(),
        format!("received {value}"),
        "Object should be null.".to_string(),
    )
}

pub fn assert_object_not_null(value: &Value, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_object_not_null",
        !value.is_null(),
        message,
        "Object is not null:".to_string(),
        "received null".to_string(),
        "Object should NOT be null.".to_string(),
    )
}

pub fn assert_some<T>(value: &Option<T>, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_some",
        value.is_some(),
        message,
        "Value is present:".to_string(),
        "received None".to_string(),
        "Value should be present.".to_string(),
    )
}

pub fn assert_none<T>(value: &Option<T>, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_none",
        value.is_none(),
        message,
        "Value is absent:".to_string(),
        "received Some(..)".to_string(),
        "Value should be absent.".to_string(),
    )
}

// --- responses ---

pub fn assert_status(expected: u16, response: &HttpResponse, message: &str) -> Result<(), AssertionFailure> {
    outcome(
        "assert_status",
        response.status == expected,
        message,
        format!("Status code is [{expected}]"),
        format!("expected status {expected}, received {}", response.status),
        format!("Status code should be [{expected}]"),
    )
}

/// Turn a deserialization outcome into a verdict.
///
/// A schema mismatch is logged with every issue and the offending body and
/// reported as "Response should be valid against schema."; an assertion that
/// already failed passes through unchanged, other errors are reported with
/// their kind.
pub fn assert_valid<T>(result: Result<T, ApiError>, message: &str) -> Result<T, AssertionFailure> {
    match result {
        Ok(value) => {
            info!("Assert PASSED! Response is valid against schema: {message}");
            Ok(value)
        }
        Err(ApiError::Validation(err)) => {
            error!(schema = %err.schema, body = %err.body, "Failed to safely deserialize response");
            Err(failure(
                "assert_valid",
                err.to_string(),
                message,
                "Response should be valid against schema.".to_string(),
            ))
        }
        Err(ApiError::Assertion(already)) => Err(already),
        Err(other) => Err(failure(
            "assert_valid",
            format!("{}: {other}", other.kind()),
            message,
            "Response should be valid against schema.".to_string(),
        )),
    }
}
