//! Typed field extraction from untyped JSON objects.
//!
//! [`FieldReader`] pulls each declared field out of the input, coercing it per
//! [`Coercion`], and keeps going after a failure so that a single
//! [`ValidationError`] can report every offending field at once.

use crate::config::{Coercion, ParseOptions, UnknownFields};
use crate::error::{ExpectedType, FieldIssue, IssueKind, JsonKind, ValidationError};
use serde_json::{Map, Number, Value};
use std::num::IntErrorKind;

// i64::MIN is exactly representable, i64::MAX rounds up to 2^63.
const I64_MIN_F: f64 = -9_223_372_036_854_775_808.0;
const I64_MAX_EXCLUSIVE_F: f64 = 9_223_372_036_854_775_808.0;

/// Reads declared fields out of an input object, collecting issues as it goes.
///
/// Each accessor returns `None` when the field was rejected; the issue has
/// already been recorded. Call [`FieldReader::finish`] once all fields are read.
pub struct FieldReader<'a> {
    input: &'a Map<String, Value>,
    options: ParseOptions,
    issues: Vec<FieldIssue>,
}

impl<'a> FieldReader<'a> {
    pub fn new(input: &'a Map<String, Value>, options: ParseOptions) -> Self {
        Self {
            input,
            options,
            issues: Vec::new(),
        }
    }

    /// Reads a field that must be present and integer-coercible.
    pub fn required_int(&mut self, field: &str) -> Option<i64> {
        match self.input.get(field) {
            None => self.reject(
                field,
                IssueKind::Missing {
                    expected: ExpectedType::Integer,
                },
            ),
            Some(value) => match coerce_int(value, self.options.coercion) {
                Ok(n) => Some(n),
                Err(kind) => self.reject(field, kind),
            },
        }
    }

    /// Reads a field that must be present and string-coercible.
    pub fn required_str(&mut self, field: &str) -> Option<String> {
        match self.input.get(field) {
            None => self.reject(
                field,
                IssueKind::Missing {
                    expected: ExpectedType::String,
                },
            ),
            Some(value) => match coerce_str(value, self.options.coercion) {
                Ok(s) => Some(s),
                Err(kind) => self.reject(field, kind),
            },
        }
    }

    /// Reads a field that may be absent or null.
    ///
    /// Returns `Some(None)` for absent/null, `Some(Some(_))` for a coerced value and
    /// `None` if the value was rejected.
    pub fn optional_str(&mut self, field: &str) -> Option<Option<String>> {
        match self.input.get(field) {
            None | Some(Value::Null) => Some(None),
            Some(value) => match coerce_str(value, self.options.coercion) {
                Ok(s) => Some(Some(s)),
                Err(kind) => self.reject(field, kind),
            },
        }
    }

    /// Completes validation of `record`.
    ///
    /// Under [`UnknownFields::Reject`] every input key outside `declared` becomes an
    /// `unexpected` issue. Any recorded issue turns the result into an error.
    pub fn finish<T>(
        mut self,
        record: &'static str,
        declared: &[&str],
        value: Option<T>,
    ) -> Result<T, ValidationError> {
        if self.options.unknown_fields == UnknownFields::Reject {
            for key in self.input.keys() {
                if !declared.contains(&key.as_str()) {
                    self.issues.push(FieldIssue {
                        field: key.clone(),
                        kind: IssueKind::Unexpected,
                    });
                }
            }
        }

        match value {
            Some(value) if self.issues.is_empty() => {
                tracing::trace!(record, "record accepted");
                Ok(value)
            }
            _ => {
                tracing::debug!(record, issues = self.issues.len(), "record rejected");
                Err(ValidationError::new(record, self.issues))
            }
        }
    }

    fn reject<T>(&mut self, field: &str, kind: IssueKind) -> Option<T> {
        self.issues.push(FieldIssue {
            field: field.to_string(),
            kind,
        });
        None
    }
}

fn invalid(expected: ExpectedType, value: &Value) -> IssueKind {
    IssueKind::InvalidType {
        expected,
        found: JsonKind::of(value),
    }
}

/// Coerces `value` to an `i64`.
pub fn coerce_int(value: &Value, coercion: Coercion) -> Result<i64, IssueKind> {
    let out_of_range = IssueKind::OutOfRange {
        expected: ExpectedType::Integer,
    };

    match (value, coercion) {
        (Value::Number(n), _) if n.is_i64() || n.is_u64() => n.as_i64().ok_or(out_of_range),
        (Value::Number(n), Coercion::Lax) => {
            int_from_float(n).unwrap_or_else(|| Err(invalid(ExpectedType::Integer, value)))
        }
        (Value::Bool(b), Coercion::Lax) => Ok(i64::from(*b)),
        (Value::String(s), Coercion::Lax) => match s.trim().parse::<i64>() {
            Ok(n) => Ok(n),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Err(out_of_range)
            }
            Err(_) => Err(invalid(ExpectedType::Integer, value)),
        },
        _ => Err(invalid(ExpectedType::Integer, value)),
    }
}

/// Converts a float with no fractional part. `None` means the float is not integral.
fn int_from_float(n: &Number) -> Option<Result<i64, IssueKind>> {
    let f = n.as_f64()?;
    if !f.is_finite() || f.fract() != 0.0 {
        return None;
    }
    if (I64_MIN_F..I64_MAX_EXCLUSIVE_F).contains(&f) {
        Some(Ok(f as i64))
    } else {
        Some(Err(IssueKind::OutOfRange {
            expected: ExpectedType::Integer,
        }))
    }
}

/// Coerces `value` to a `String`.
pub fn coerce_str(value: &Value, coercion: Coercion) -> Result<String, IssueKind> {
    match (value, coercion) {
        (Value::String(s), _) => Ok(s.clone()),
        (Value::Number(n), Coercion::Lax) => Ok(n.to_string()),
        _ => Err(invalid(ExpectedType::String, value)),
    }
}
