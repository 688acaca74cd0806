//! URL templating and small text helpers for service code.
//!
//! Placeholders are written `{{name}}`. Substitution is strict: a template
//! missing the delimiters or the named key fails as an assertion instead of
//! silently returning the original text.

use serde::Serialize;
use url::form_urlencoded;

use crate::assertions::assert_true;
use crate::error::AssertionFailure;

const LEFT: &str = "{{";
const RIGHT: &str = "}}";

/// Replace the first `{{key_name}}` in `text` with `value`.
pub fn replace_key_name(text: &str, key_name: &str, value: &str) -> Result<String, AssertionFailure> {
    let key = format!("{LEFT}{key_name}{RIGHT}");
    let present = text.contains(LEFT) && text.contains(RIGHT) && text.contains(&key);
    assert_true(present, &format!("Template `{text}` should contain placeholder {key}"))?;
    Ok(text.replacen(&key, value, 1))
}

/// Replace the first `{{key}}` in `text` with `value`.
pub fn replace_key(text: &str, value: &str) -> Result<String, AssertionFailure> {
    replace_key_name(text, "key", value)
}

/// True if any `{{...}}` placeholder is left in `text`.
pub fn has_placeholder(text: &str) -> bool {
    text.find(LEFT)
        .is_some_and(|start| text[start + LEFT.len()..].contains(RIGHT))
}

/// Percent-encoded `?k=v&...` query string; empty when there are no params.
pub fn query_string<K: AsRef<str>, V: AsRef<str>>(params: &[(K, V)]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let mut serializer = form_urlencoded::Serializer::for_suffix(String::from("?"), 1);
    for (key, value) in params {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}

pub fn is_null_or_empty(text: Option<&str>) -> bool {
    text.is_none_or(str::is_empty)
}

/// Two-space indented JSON, or the compact form if pretty printing fails.
pub fn pretty_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("<unserializable: {e}>"))
}
