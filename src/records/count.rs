//! Count record: the kind of event being counted.

use super::{FieldReader, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Carries the `type` field, exposed as `kind` since `type` is a keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct CountData {
    #[serde(rename = "type")]
    pub kind: String,
}

impl CountData {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }
}

impl Record for CountData {
    const NAME: &'static str = "CountData";
    const FIELDS: &'static [&'static str] = &["type"];

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let kind = fields.required_str("type")?;
        Some(Self { kind })
    }
}
