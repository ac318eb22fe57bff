//! Tagged-variant schema descriptions and their validator.
//!
//! Object schemas reject unknown fields. Validation never stops at the first
//! problem: every violation is collected with the path of the offending field
//! so the caller can correct all of them in one retry.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Shape of an accepted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schema {
    /// Any string.
    String,
    /// Any finite number. Numeric strings are coerced.
    Number,
    /// `true` or `false`. The strings `"true"` and `"false"` are coerced.
    Boolean,
    /// One of a fixed set of string literals.
    Enum(Vec<String>),
    /// Homogeneous sequence.
    Array(Box<Schema>),
    /// Record with named, possibly optional fields.
    Object(Vec<Field>),
}

/// A named field of an object schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
    pub required: bool,
    pub description: Option<String>,
}

impl Field {
    /// A field that must be present.
    pub fn required(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
            description: None,
        }
    }

    /// A field that may be omitted.
    pub fn optional(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            required: false,
            ..Self::required(name, schema)
        }
    }

    /// Attach a description for the agent runtime.
    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Path of the offending value (`id`, `items[2].bucket`); empty for the root.
    pub field: String,
    /// What was wrong with it.
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "<root>: {}", self.reason)
        } else {
            write!(f, "{}: {}", self.field, self.reason)
        }
    }
}

impl Schema {
    /// Enum of string literals.
    pub fn enumeration<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    /// Sequence of `item`.
    #[must_use]
    pub fn array(item: Self) -> Self {
        Self::Array(Box::new(item))
    }

    /// Record of `fields`.
    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::Object(fields.into_iter().collect())
    }

    /// The `{}` schema: an object with no fields.
    #[must_use]
    pub const fn empty_object() -> Self {
        Self::Object(Vec::new())
    }

    /// Validate `value`, returning the coerced value or every violation found.
    ///
    /// # Errors
    ///
    /// Returns the full list of violations if `value` does not conform.
    pub fn validate(&self, value: &Value) -> Result<Value, Vec<Violation>> {
        let mut violations = Vec::new();
        let coerced = self.check(value, "", true, &mut violations);
        if violations.is_empty() {
            Ok(coerced)
        } else {
            Err(violations)
        }
    }

    /// Check that `value` conforms exactly, without coercion.
    ///
    /// # Errors
    ///
    /// Returns the full list of violations if `value` does not conform.
    pub fn conforms(&self, value: &Value) -> Result<(), Vec<Violation>> {
        let mut violations = Vec::new();
        self.check(value, "", false, &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    fn check(
        &self,
        value: &Value,
        path: &str,
        coerce: bool,
        violations: &mut Vec<Violation>,
    ) -> Value {
        match (self, value) {
            (Self::String, Value::String(_))
            | (Self::Number, Value::Number(_))
            | (Self::Boolean, Value::Bool(_)) => value.clone(),

            (Self::Number, Value::String(s)) if coerce => {
                if let Some(n) = parse_number(s) {
                    Value::Number(n)
                } else {
                    violations.push(Violation::new(path, format!("expected number, got {s:?}")));
                    value.clone()
                }
            }

            (Self::Boolean, Value::String(s)) if coerce => match s.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => {
                    violations.push(Violation::new(path, format!("expected boolean, got {s:?}")));
                    value.clone()
                }
            },

            (Self::Enum(options), Value::String(s)) => {
                if !options.iter().any(|o| o == s) {
                    violations.push(Violation::new(
                        path,
                        format!("expected one of {}, got {s:?}", options.join(", ")),
                    ));
                }
                value.clone()
            }

            (Self::Array(item), Value::Array(values)) => Value::Array(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| item.check(v, &format!("{path}[{i}]"), coerce, violations))
                    .collect(),
            ),

            (Self::Object(fields), Value::Object(map)) => {
                let mut out = Map::new();
                for field in fields {
                    let field_path = join_path(path, &field.name);
                    match map.get(&field.name) {
                        Some(v) => {
                            let checked = field.schema.check(v, &field_path, coerce, violations);
                            out.insert(field.name.clone(), checked);
                        }
                        None if field.required => {
                            violations.push(Violation::new(field_path, "required field missing"));
                        }
                        None => {}
                    }
                }
                for key in map.keys() {
                    if !fields.iter().any(|f| &f.name == key) {
                        violations.push(Violation::new(join_path(path, key), "unknown field"));
                    }
                }
                Value::Object(out)
            }

            (schema, other) => {
                violations.push(Violation::new(
                    path,
                    format!("expected {}, got {}", schema.type_name(), kind_of(other)),
                ));
                other.clone()
            }
        }
    }

    const fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Render as JSON Schema for introspection by the agent runtime.
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        match self {
            Self::String | Self::Number | Self::Boolean => {
                serde_json::json!({ "type": self.type_name() })
            }
            Self::Enum(options) => serde_json::json!({ "type": "string", "enum": options }),
            Self::Array(item) => {
                serde_json::json!({ "type": "array", "items": item.to_json_schema() })
            }
            Self::Object(fields) => {
                let mut properties = Map::new();
                for field in fields {
                    let mut property = field.schema.to_json_schema();
                    if let (Some(description), Value::Object(obj)) =
                        (&field.description, &mut property)
                    {
                        obj.insert("description".to_string(), description.clone().into());
                    }
                    properties.insert(field.name.clone(), property);
                }
                let required: Vec<&str> = fields
                    .iter()
                    .filter(|f| f.required)
                    .map(|f| f.name.as_str())
                    .collect();
                serde_json::json!({
                    "type": "object",
                    "properties": properties,
                    "required": required,
                    "additionalProperties": false
                })
            }
        }
    }
}

fn join_path(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

/// Integers stay integers; anything else must be a finite float.
fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i.into());
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
