//! Declarative request-shape validation for inbound HTTP adapters.
//!
//! A [`Schema`] lists the fields a route accepts. [`validate`] checks a raw
//! JSON object against it in one pass and returns either the object reduced
//! to the declared fields, or every violated rule. Undeclared fields are
//! dropped, not rejected.
//!
//! Numbers arriving as text (path segments, query values) must be converted
//! with [`coerce_integer`] before validation; the validator never guesses.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::domain::Error;

/// Type constraint for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldKind {
    /// Text with an inclusive length range in characters.
    String {
        min_len: usize,
        max_len: Option<usize>,
    },
    /// Whole number with an inclusive range.
    Integer { min: i64, max: Option<i64> },
}

/// One declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub(crate) const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub(crate) const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Named set of field rules for one route input.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Schema {
    pub name: &'static str,
    pub fields: &'static [Field],
}

/// One violated rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Violation {
    pub field: &'static str,
    pub message: String,
}

/// All violations found for one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SchemaViolations {
    pub schema: &'static str,
    pub violations: Vec<Violation>,
}

impl SchemaViolations {
    /// Human-readable summary, one violation per line.
    pub(crate) fn message(&self) -> String {
        self.violations
            .iter()
            .map(|violation| violation.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<SchemaViolations> for Error {
    fn from(value: SchemaViolations) -> Self {
        let fields: Vec<&str> = value.violations.iter().map(|v| v.field).collect();
        Error::validation(value.message()).with_details(json!({
            "schema": value.schema,
            "fields": fields,
        }))
    }
}

/// Integral JSON numbers, including floats such as `5.0` that carry no
/// fractional part.
fn as_integer(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        let float = value.as_f64()?;
        let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
        (float.is_finite() && float.fract() == 0.0 && in_range).then_some(float as i64)
    })
}

/// Check one present field, returning the value to keep (integers are
/// normalised) or the violation message.
fn check_field(field: &Field, value: &Value) -> Result<Value, String> {
    let name = field.name;
    match field.kind {
        FieldKind::String { min_len, max_len } => {
            let Some(text) = value.as_str() else {
                return Err(format!("{name} must be a string"));
            };
            let len = text.chars().count();
            if len < min_len {
                return Err(format!(
                    "{name} must be at least {min_len} characters long"
                ));
            }
            match max_len {
                Some(max) if len > max => {
                    Err(format!("{name} must be at most {max} characters long"))
                }
                _ => Ok(value.clone()),
            }
        }
        FieldKind::Integer { min, max } => {
            let Some(number) = as_integer(value) else {
                return Err(format!("{name} must be an integer"));
            };
            if number < min {
                return Err(format!("{name} must be >= {min}"));
            }
            match max {
                Some(max) if number > max => Err(format!("{name} must be <= {max}")),
                _ => Ok(Value::from(number)),
            }
        }
    }
}

/// Validate `input` against `schema`.
///
/// Returns the declared fields present in `input` on success. On failure
/// every violation is reported, in schema order.
pub(crate) fn validate(schema: &Schema, input: &Value) -> Result<Map<String, Value>, SchemaViolations> {
    let Some(object) = input.as_object() else {
        return Err(SchemaViolations {
            schema: schema.name,
            violations: vec![Violation {
                field: "",
                message: "request must be an object".to_owned(),
            }],
        });
    };

    let mut values = Map::new();
    let mut violations = Vec::new();
    for field in schema.fields {
        match object.get(field.name) {
            None | Some(Value::Null) => {
                if field.required {
                    violations.push(Violation {
                        field: field.name,
                        message: format!("{} is required", field.name),
                    });
                }
            }
            Some(value) => match check_field(field, value) {
                Ok(kept) => {
                    values.insert(field.name.to_owned(), kept);
                }
                Err(message) => violations.push(Violation {
                    field: field.name,
                    message,
                }),
            },
        }
    }

    if violations.is_empty() {
        Ok(values)
    } else {
        Err(SchemaViolations {
            schema: schema.name,
            violations,
        })
    }
}

/// Validate and deserialise into the route's typed input.
pub(crate) fn parse<T: DeserializeOwned>(schema: &Schema, input: &Value) -> Result<T, Error> {
    let values = validate(schema, input)?;
    serde_json::from_value(Value::Object(values)).map_err(|err| {
        Error::internal(format!(
            "schema {} accepted input its type rejects: {err}",
            schema.name
        ))
    })
}

/// Convert decimal text to a JSON integer; anything else stays a string so
/// the integer rule reports it.
pub(crate) fn coerce_integer(raw: &str) -> Value {
    raw.trim()
        .parse::<i64>()
        .map_or_else(|_| Value::String(raw.to_owned()), Value::from)
}

/// Apply [`coerce_integer`] to `key` when it holds text.
pub(crate) fn coerce_integer_field(object: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(raw)) = object.get(key) {
        let coerced = coerce_integer(raw);
        object.insert(key.to_owned(), coerced);
    }
}
