//! Record schemas for article import payloads.
//!
//! Every record is built through the [`Record`] trait: an untyped JSON object
//! goes in, a typed record or a [`ValidationError`] comes out. The records also
//! implement `Deserialize` by routing through the same validation, so they can be
//! used directly with `serde_json::from_str` or axum's `Json` extractor.

pub mod article;
pub mod count;
pub mod entity;
pub mod fields;

pub use article::ArticleData;
pub use count::CountData;
pub use entity::EntityData;
pub use fields::FieldReader;

use crate::config::ParseOptions;
use crate::error::ValidationError;
use serde::Serialize;
use serde_json::{Map, Value};

/// A record type with a fixed set of typed fields, validated on construction.
pub trait Record: Sized + Serialize {
    /// Name used in error messages.
    const NAME: &'static str;

    /// Wire names of every field in the schema, in declaration order.
    const FIELDS: &'static [&'static str];

    /// Reads the record's fields. Returns `None` if any field was rejected.
    fn read(fields: &mut FieldReader<'_>) -> Option<Self>;

    /// Validates `input` with explicit options.
    fn parse_with(
        input: &Map<String, Value>,
        options: ParseOptions,
    ) -> Result<Self, ValidationError> {
        let mut reader = FieldReader::new(input, options);
        let record = Self::read(&mut reader);
        reader.finish(Self::NAME, Self::FIELDS, record)
    }

    /// Validates `input` with the default (lax) options.
    fn parse(input: &Map<String, Value>) -> Result<Self, ValidationError> {
        Self::parse_with(input, ParseOptions::default())
    }

    /// Validates an arbitrary JSON value, which must be an object.
    fn from_value_with(value: &Value, options: ParseOptions) -> Result<Self, ValidationError> {
        match value {
            Value::Object(map) => Self::parse_with(map, options),
            other => Err(ValidationError::not_an_object(Self::NAME, other)),
        }
    }

    /// Validates an arbitrary JSON value with the default (lax) options.
    fn from_value(value: &Value) -> Result<Self, ValidationError> {
        Self::from_value_with(value, ParseOptions::default())
    }

    /// Validates a JSON document.
    fn from_json_str(json: &str) -> Result<Self, ValidationError> {
        let value: Value = serde_json::from_str(json)
            .map_err(|e| ValidationError::malformed(Self::NAME, e.to_string()))?;
        Self::from_value(&value)
    }
}

/// Implements `TryFrom<Map<String, Value>>` so `#[serde(try_from = ...)]` can
/// route deserialization through [`Record::parse`].
macro_rules! impl_try_from_map {
    ($($record:ty),+ $(,)?) => {
        $(
            impl TryFrom<Map<String, Value>> for $record {
                type Error = ValidationError;

                fn try_from(input: Map<String, Value>) -> Result<Self, Self::Error> {
                    <$record as Record>::parse(&input)
                }
            }
        )+
    };
}

impl_try_from_map!(ArticleData, EntityData, CountData);
