//! Configuration loaded from environment variables.
//!
//! ## Variables
//!
//! - `RECORDS_COERCION` - `lax` or `strict` (default: `lax`)
//! - `RECORDS_UNKNOWN_FIELDS` - `ignore` or `reject` (default: `ignore`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//!
//! ```bash
//! export RECORDS_COERCION="strict"
//! export RECORDS_UNKNOWN_FIELDS="reject"
//! ```

use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// How far a field value may stray from its declared type and still be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Coercion {
    /// Accept neighbouring JSON kinds (numeric strings, integral floats, booleans
    /// for integers; numbers for strings).
    #[default]
    Lax,
    /// Accept only the exact JSON kind.
    Strict,
}

/// What to do with input fields that are not part of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFields {
    #[default]
    Ignore,
    Reject,
}

/// Options applied while validating a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    pub coercion: Coercion,
    pub unknown_fields: UnknownFields,
}

impl ParseOptions {
    pub fn strict() -> Self {
        Self {
            coercion: Coercion::Strict,
            unknown_fields: UnknownFields::Reject,
        }
    }
}

impl FromStr for Coercion {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lax" => Ok(Self::Lax),
            "strict" => Ok(Self::Strict),
            other => anyhow::bail!("coercion must be 'lax' or 'strict', got '{other}'"),
        }
    }
}

impl FromStr for UnknownFields {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => {
                anyhow::bail!("unknown field policy must be 'ignore' or 'reject', got '{other}'")
            }
        }
    }
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Lax => "lax",
            Self::Strict => "strict",
        })
    }
}

impl fmt::Display for UnknownFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Reject => "reject",
        })
    }
}

/// Configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub parse_options: ParseOptions,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `RECORDS_COERCION` or `RECORDS_UNKNOWN_FIELDS` hold an
    /// unrecognized value.
    pub fn from_env() -> Result<Self> {
        let coercion = match env::var("RECORDS_COERCION") {
            Ok(v) => v.parse().context("Invalid RECORDS_COERCION")?,
            Err(_) => Coercion::default(),
        };

        let unknown_fields = match env::var("RECORDS_UNKNOWN_FIELDS") {
            Ok(v) => v.parse().context("Invalid RECORDS_UNKNOWN_FIELDS")?,
            Err(_) => UnknownFields::default(),
        };

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        Ok(Self {
            parse_options: ParseOptions {
                coercion,
                unknown_fields,
            },
            log_level,
            log_format,
        })
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `log_format` is not `text` or `json`, or `log_level` is empty.
    pub fn validate(&self) -> Result<()> {
        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if self.log_level.trim().is_empty() {
            anyhow::bail!("RUST_LOG must not be empty");
        }

        Ok(())
    }

    /// Logs a configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Coercion: {}", self.parse_options.coercion);
        tracing::info!("  Unknown fields: {}", self.parse_options.unknown_fields);
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
    }
}

/// Loads and validates configuration from environment variables.
///
/// Expects `.env` to be loaded already (e.g. via `dotenvy::dotenv()` in `main`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
