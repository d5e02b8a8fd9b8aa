//! The single error kind produced by record validation.
//!
//! A [`ValidationError`] names the record that was being built and lists every
//! offending field. It renders as a structured JSON body when returned from an
//! axum handler.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;

/// Location used for issues that concern the input as a whole rather than one field.
pub const ROOT: &str = "__root__";

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

/// Input could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {record}: {}", summarize(.issues))]
pub struct ValidationError {
    record: &'static str,
    issues: Vec<FieldIssue>,
}

/// One reason a field (or the whole input) was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

/// What went wrong with a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum IssueKind {
    /// A required field was not supplied.
    Missing { expected: ExpectedType },
    /// The supplied value cannot be coerced to the declared type.
    InvalidType {
        expected: ExpectedType,
        found: JsonKind,
    },
    /// The value is numeric but does not fit the declared integer type.
    OutOfRange { expected: ExpectedType },
    /// The field is not part of the record and unknown fields are rejected.
    Unexpected,
    /// The input was not a JSON object.
    NotAnObject { found: JsonKind },
    /// The input was not valid JSON.
    Malformed { message: String },
    /// A validation rule on an already-typed record failed.
    Rule { rule: String, message: String },
}

/// Declared type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedType {
    Integer,
    String,
}

/// Kind of a JSON value as it appeared in the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JsonKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl JsonKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ExpectedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Integer => "integer",
            Self::String => "string",
        })
    }
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        })
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { expected } => write!(f, "field required ({expected})"),
            Self::InvalidType { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            Self::OutOfRange { expected } => write!(f, "{expected} out of range"),
            Self::Unexpected => f.write_str("unexpected field"),
            Self::NotAnObject { found } => write!(f, "expected object, found {found}"),
            Self::Malformed { message } => write!(f, "malformed input: {message}"),
            Self::Rule { message, .. } => f.write_str(message),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

fn summarize(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(record: &'static str, issues: Vec<FieldIssue>) -> Self {
        Self { record, issues }
    }

    /// Error for input that is not a JSON object.
    pub fn not_an_object(record: &'static str, value: &Value) -> Self {
        Self::new(
            record,
            vec![FieldIssue {
                field: ROOT.to_string(),
                kind: IssueKind::NotAnObject {
                    found: JsonKind::of(value),
                },
            }],
        )
    }

    /// Error for input that could not be read as JSON at all.
    pub fn malformed(record: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            record,
            vec![FieldIssue {
                field: ROOT.to_string(),
                kind: IssueKind::Malformed {
                    message: message.into(),
                },
            }],
        )
    }

    /// Converts failed `validator` rules into issues.
    ///
    /// Struct-level (`schema`) failures are reported at [`ROOT`]. Issues are
    /// sorted by field name so the output does not depend on hash order.
    pub fn from_rules(record: &'static str, errors: &validator::ValidationErrors) -> Self {
        let mut issues: Vec<FieldIssue> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, field_errors)| {
                let field = if field == "__all__" {
                    ROOT.to_string()
                } else {
                    field.to_string()
                };
                field_errors.iter().map(move |err| FieldIssue {
                    field: field.clone(),
                    kind: IssueKind::Rule {
                        rule: err.code.to_string(),
                        message: err
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| err.code.to_string()),
                    },
                })
            })
            .collect();
        issues.sort_by(|a, b| a.field.cmp(&b.field));
        Self::new(record, issues)
    }

    /// Name of the record type that failed to validate.
    pub fn record(&self) -> &'static str {
        self.record
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Returns the issues reported for `field`.
    pub fn issues_for<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a IssueKind> + 'a {
        self.issues
            .iter()
            .filter(move |issue| issue.field == field)
            .map(|issue| &issue.kind)
    }

    /// Returns true if any issue was reported for `field`.
    pub fn has_issue(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.field == field)
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorInfo {
                code: "validation_error",
                message: self.to_string(),
                details: json!({
                    "record": self.record,
                    "issues": self.issues,
                }),
            },
        };

        (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
    }
}
