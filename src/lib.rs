//! # Import Records
//!
//! Validated record schemas for article import payloads.
//!
//! ## Records
//!
//! | Type | Required fields | Optional fields |
//! |---|---|---|
//! | [`ArticleData`] | `size: integer` | `text`, `category`, `tag`: string or null |
//! | [`EntityData`] | `size: integer` | |
//! | [`CountData`] | `type: string` | |
//!
//! Records are built from untyped JSON through the [`Record`] trait and are
//! plain immutable values afterwards. A failed build yields a single
//! [`ValidationError`] that lists every offending field.
//!
//! ```rust
//! use import_records::prelude::*;
//! use serde_json::json;
//!
//! let article = ArticleData::from_value(&json!({ "size": 42, "tag": "x" })).unwrap();
//! assert_eq!(article.size, 42);
//!
//! let err = EntityData::from_value(&json!({})).unwrap_err();
//! assert!(err.has_issue("size"));
//! ```
//!
//! ## Layers
//!
//! - [`records`] - Record types and the shared field reader
//! - [`error`] - [`ValidationError`] and its HTTP representation
//! - [`config`] - Parse options and logging settings from environment variables
//! - [`extract`] - [`ValidatedJson`] extractor for axum handlers

pub mod config;
pub mod error;
pub mod extract;
pub mod records;

pub use config::{Coercion, Config, ParseOptions, UnknownFields};
pub use error::ValidationError;
pub use extract::ValidatedJson;
pub use records::{ArticleData, CountData, EntityData, Record};

/// Commonly used types for external consumers.
pub mod prelude {
    pub use crate::config::{Coercion, ParseOptions, UnknownFields};
    pub use crate::error::{FieldIssue, IssueKind, ValidationError};
    pub use crate::extract::ValidatedJson;
    pub use crate::records::{ArticleData, CountData, EntityData, Record};
}
