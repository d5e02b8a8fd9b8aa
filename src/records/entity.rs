//! Entity record: a bare size.

use super::{FieldReader, Record};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct EntityData {
    pub size: i64,
}

impl EntityData {
    pub fn new(size: i64) -> Self {
        Self { size }
    }
}

impl Record for EntityData {
    const NAME: &'static str = "EntityData";
    const FIELDS: &'static [&'static str] = &["size"];

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let size = fields.required_int("size")?;
        Some(Self { size })
    }
}
