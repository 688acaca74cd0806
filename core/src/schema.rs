//! Structural schemas for response bodies.
//!
//! # Design
//! A `Schema` is a plain value describing the expected shape of a JSON body.
//! `validate` walks the body once and collects every mismatch as an `Issue`
//! rather than stopping at the first. On success it returns the body reduced
//! to the declared shape: object keys the schema does not name are dropped,
//! so the result deserializes cleanly into the matching model type.

use std::fmt::{self, Display};

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Any,
    String,
    /// A string that parses as an absolute URL.
    Url,
    Number,
    Integer,
    Boolean,
    Literal(Value),
    Array(Box<Schema>),
    /// Declared fields in declaration order.
    Object(Vec<(String, Schema)>),
    /// The field may be absent. Only meaningful as an object field.
    Optional(Box<Schema>),
    Nullable(Box<Schema>),
}

/// One mismatch between a body and a schema, located by JSON pointer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "/" } else { &self.path };
        write!(f, "{path}: {}", self.message)
    }
}

impl Schema {
    pub fn any() -> Self {
        Schema::Any
    }

    pub fn string() -> Self {
        Schema::String
    }

    pub fn url() -> Self {
        Schema::Url
    }

    pub fn number() -> Self {
        Schema::Number
    }

    pub fn integer() -> Self {
        Schema::Integer
    }

    pub fn boolean() -> Self {
        Schema::Boolean
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Schema::Literal(value.into())
    }

    pub fn array(items: Schema) -> Self {
        Schema::Array(Box::new(items))
    }

    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, Schema)>) -> Self {
        Schema::Object(fields.into_iter().map(|(k, s)| (k.into(), s)).collect())
    }

    pub fn optional(self) -> Self {
        Schema::Optional(Box::new(self))
    }

    pub fn nullable(self) -> Self {
        Schema::Nullable(Box::new(self))
    }

    /// Check `value` against this schema.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<Issue>> {
        let mut issues = Vec::new();
        let checked = self.check(value, "", &mut issues);
        match checked {
            Some(value) if issues.is_empty() => Ok(value),
            _ => Err(issues),
        }
    }

    fn check(&self, value: &Value, path: &str, issues: &mut Vec<Issue>) -> Option<Value> {
        match (self, value) {
            (Schema::Any, _) => Some(value.clone()),
            (Schema::Optional(inner), _) => inner.check(value, path, issues),
            (Schema::Nullable(_), Value::Null) => Some(Value::Null),
            (Schema::Nullable(inner), _) => inner.check(value, path, issues),
            (Schema::String, Value::String(_)) => Some(value.clone()),
            (Schema::Url, Value::String(s)) => match url::Url::parse(s) {
                Ok(_) => Some(value.clone()),
                Err(e) => {
                    issues.push(Issue::new(path, format!("invalid url `{s}`: {e}")));
                    None
                }
            },
            (Schema::Number, Value::Number(_)) => Some(value.clone()),
            (Schema::Integer, Value::Number(n)) => {
                let whole = n.is_i64() || n.is_u64() || n.as_f64().is_some_and(|f| f.fract() == 0.0);
                if whole {
                    Some(value.clone())
                } else {
                    issues.push(Issue::new(path, format!("expected integer, got {n}")));
                    None
                }
            }
            (Schema::Boolean, Value::Bool(_)) => Some(value.clone()),
            (Schema::Literal(expected), _) => {
                if expected == value {
                    Some(value.clone())
                } else {
                    issues.push(Issue::new(path, format!("expected literal {expected}, got {value}")));
                    None
                }
            }
            (Schema::Array(items), Value::Array(elements)) => {
                let mut out = Vec::with_capacity(elements.len());
                for (i, element) in elements.iter().enumerate() {
                    if let Some(v) = items.check(element, &format!("{path}/{i}"), issues) {
                        out.push(v);
                    }
                }
                (out.len() == elements.len()).then_some(Value::Array(out))
            }
            (Schema::Object(fields), Value::Object(map)) => check_object(fields, map, path, issues),
            (expected, actual) => {
                issues.push(Issue::new(
                    path,
                    format!("expected {expected}, got {}", type_name(actual)),
                ));
                None
            }
        }
    }
}

fn check_object(
    fields: &[(String, Schema)],
    map: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<Issue>,
) -> Option<Value> {
    let mut out = Map::new();
    let mut complete = true;
    for (name, schema) in fields {
        let field_path = format!("{path}/{}", escape_pointer(name));
        match map.get(name) {
            Some(v) => match schema.check(v, &field_path, issues) {
                Some(checked) => {
                    out.insert(name.clone(), checked);
                }
                None => complete = false,
            },
            None if matches!(schema, Schema::Optional(_)) => {}
            None => {
                issues.push(Issue::new(field_path, "required field is missing"));
                complete = false;
            }
        }
    }
    complete.then_some(Value::Object(out))
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Any => f.write_str("any"),
            Schema::String => f.write_str("string"),
            Schema::Url => f.write_str("url"),
            Schema::Number => f.write_str("number"),
            Schema::Integer => f.write_str("integer"),
            Schema::Boolean => f.write_str("boolean"),
            Schema::Literal(v) => write!(f, "{v}"),
            Schema::Array(items) => write!(f, "{items}[]"),
            Schema::Optional(inner) => write!(f, "{inner}?"),
            Schema::Nullable(inner) => write!(f, "{inner} | null"),
            Schema::Object(fields) => {
                f.write_str("{ ")?;
                for (i, (name, schema)) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{name}: {schema}")?;
                }
                f.write_str(" }")
            }
        }
    }
}
