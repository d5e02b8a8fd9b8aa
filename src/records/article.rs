//! Article import record.
//!
//! Describes which articles to import: an optional keyword `text`, `category` and
//! `tag` filter, and how many articles (`size`) to fetch.

use super::{FieldReader, Record};
use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use validator::Validate;

/// Article import request.
///
/// Parsing only enforces field presence and types. The stricter rules an import
/// needs (size between 1 and 99, at least one search term) are checked separately by
/// [`ArticleData::validate_import`].
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Validate)]
#[serde(try_from = "Map<String, Value>")]
#[validate(schema(function = "validate_search_term", skip_on_field_errors = false))]
pub struct ArticleData {
    /// Keyword text search.
    pub text: Option<String>,
    pub category: Option<String>,
    pub tag: Option<String>,
    /// Number of articles to import.
    #[validate(range(
        min = 1,
        max = 99,
        message = "You must import between 1 and 99 articles."
    ))]
    pub size: i64,
}

impl ArticleData {
    /// Creates a record with no search terms.
    pub fn new(size: i64) -> Self {
        Self {
            text: None,
            category: None,
            tag: None,
            size,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns true if any of `text`, `category` or `tag` is a non-empty string.
    pub fn has_search_term(&self) -> bool {
        [&self.text, &self.category, &self.tag]
            .into_iter()
            .any(|term| term.as_deref().is_some_and(|t| !t.is_empty()))
    }

    /// Checks the rules an import request must satisfy beyond its field types.
    ///
    /// # Errors
    ///
    /// - `size` is outside `1..=99` (rule `range`)
    /// - none of `text`, `category`, `tag` is set (rule `search_term`, at `__root__`)
    pub fn validate_import(&self) -> Result<(), ValidationError> {
        self.validate()
            .map_err(|errors| ValidationError::from_rules(Self::NAME, &errors))
    }
}

fn validate_search_term(data: &ArticleData) -> Result<(), validator::ValidationError> {
    if data.has_search_term() {
        return Ok(());
    }

    Err(validator::ValidationError::new("search_term").with_message(Cow::Borrowed(
        "At least one of 'Keyword text search' or 'Category' or 'Tag' fields must be provided.",
    )))
}

impl Record for ArticleData {
    const NAME: &'static str = "ArticleData";
    const FIELDS: &'static [&'static str] = &["text", "category", "tag", "size"];

    fn read(fields: &mut FieldReader<'_>) -> Option<Self> {
        let text = fields.optional_str("text");
        let category = fields.optional_str("category");
        let tag = fields.optional_str("tag");
        let size = fields.required_int("size");

        Some(Self {
            text: text?,
            category: category?,
            tag: tag?,
            size: size?,
        })
    }
}
