//! CLI tool for checking JSON payloads against the import record schemas.
//!
//! # Usage
//!
//! ```bash
//! # Validate a single article payload
//! echo '{"size": 20, "category": "news"}' | cargo run --bin record-check -- article
//!
//! # Validate a batch (JSON array) from a file with strict coercion
//! cargo run --bin record-check -- --strict entity payloads.json
//!
//! # Also apply the article import rules
//! cargo run --bin record-check -- --import article payload.json
//! ```
//!
//! # Environment Variables
//!
//! - `RECORDS_COERCION`, `RECORDS_UNKNOWN_FIELDS` - defaults for the parse options
//! - `RUST_LOG`, `LOG_FORMAT` - logging
//!
//! Exits with a non-zero status when any record is rejected.

use import_records::config::{self, Coercion, Config, ParseOptions, UnknownFields};
use import_records::{ArticleData, CountData, EntityData, Record, ValidationError};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Validate JSON payloads against a record schema.
#[derive(Parser)]
#[command(name = "record-check")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Record type to validate against
    kind: RecordKind,

    /// JSON file holding one object or an array of objects (stdin if omitted)
    file: Option<PathBuf>,

    /// Accept only exact JSON types (no numeric strings, no integral floats)
    #[arg(long)]
    strict: bool,

    /// Reject fields that are not part of the schema
    #[arg(long)]
    reject_unknown: bool,

    /// Also apply the article import rules (article only)
    #[arg(long)]
    import: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RecordKind {
    Article,
    Entity,
    Count,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    init_tracing(&config)?;
    config.print_summary();

    ensure_import_applies(cli.kind, cli.import)?;
    let options = merge_options(config.parse_options, cli.strict, cli.reject_unknown);

    let input = read_input(cli.file.as_ref())?;
    let document: Value = serde_json::from_str(&input).context("Input is not valid JSON")?;

    let report = check_document(cli.kind, options, cli.import, document)?;
    report.print();
    report.ensure_all_accepted()
}

/// Outcome of checking one payload.
#[derive(Debug)]
enum Outcome {
    /// The validated record, re-serialized.
    Accepted(Value),
    Rejected(ValidationError),
}

/// Outcomes for every payload in a document, in input order.
#[derive(Debug)]
struct Report {
    outcomes: Vec<Outcome>,
}

impl Report {
    fn accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, Outcome::Accepted(_)))
            .count()
    }

    fn rejected(&self) -> usize {
        self.outcomes.len() - self.accepted()
    }

    fn print(&self) {
        for (index, outcome) in self.outcomes.iter().enumerate() {
            match outcome {
                Outcome::Accepted(record) => {
                    println!("{} #{index} {}", "✓".green().bold(), record);
                }
                Outcome::Rejected(err) => print_rejection(index, err),
            }
        }

        println!();
        println!(
            "{} checked, {} accepted, {} rejected",
            self.outcomes.len().to_string().bold(),
            self.accepted().to_string().green(),
            self.rejected().to_string().red()
        );
    }

    /// Fails (non-zero exit from `main`) when any payload was rejected.
    fn ensure_all_accepted(&self) -> Result<()> {
        let failed = self.rejected();
        if failed > 0 {
            anyhow::bail!(
                "{failed} of {} records failed validation",
                self.outcomes.len()
            );
        }
        Ok(())
    }
}

/// `--import` is only meaningful for article records.
fn ensure_import_applies(kind: RecordKind, import: bool) -> Result<()> {
    if import && kind != RecordKind::Article {
        anyhow::bail!("--import only applies to article records");
    }
    Ok(())
}

/// Applies CLI flags on top of the options loaded from the environment.
fn merge_options(base: ParseOptions, strict: bool, reject_unknown: bool) -> ParseOptions {
    ParseOptions {
        coercion: if strict {
            Coercion::Strict
        } else {
            base.coercion
        },
        unknown_fields: if reject_unknown {
            UnknownFields::Reject
        } else {
            base.unknown_fields
        },
    }
}

/// Checks a document: an array is a batch, anything else a single payload.
fn check_document(
    kind: RecordKind,
    options: ParseOptions,
    import: bool,
    document: Value,
) -> Result<Report> {
    let payloads = match document {
        Value::Array(items) => items,
        single => vec![single],
    };

    let outcomes = payloads
        .iter()
        .map(|payload| match kind {
            RecordKind::Article => check::<ArticleData>(payload, options, |article| {
                if import {
                    article.validate_import()
                } else {
                    Ok(())
                }
            }),
            RecordKind::Entity => check::<EntityData>(payload, options, |_| Ok(())),
            RecordKind::Count => check::<CountData>(payload, options, |_| Ok(())),
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Report { outcomes })
}

/// Installs the tracing subscriber per `RUST_LOG` and `LOG_FORMAT`.
fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("Invalid RUST_LOG '{}'", config.log_level))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

/// Validates one payload. Only a failure to re-serialize the record is an `Err`.
fn check<T: Record>(
    payload: &Value,
    options: ParseOptions,
    extra: impl Fn(&T) -> Result<(), ValidationError>,
) -> Result<Outcome> {
    let record = match T::from_value_with(payload, options) {
        Ok(record) => record,
        Err(err) => return Ok(Outcome::Rejected(err)),
    };
    if let Err(err) = extra(&record) {
        return Ok(Outcome::Rejected(err));
    }

    let rendered = serde_json::to_value(&record)
        .with_context(|| format!("Failed to serialize {}", T::NAME))?;
    Ok(Outcome::Accepted(rendered))
}

fn print_rejection(index: usize, err: &ValidationError) {
    println!(
        "{} #{index} {}",
        "✗".red().bold(),
        format!("invalid {}", err.record()).red()
    );
    for issue in err.issues() {
        println!("    {} {}", format!("{}:", issue.field).yellow(), issue.kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use import_records::error::{IssueKind, ROOT};
    use serde_json::json;

    fn rejection(outcome: &Outcome) -> &ValidationError {
        match outcome {
            Outcome::Rejected(err) => err,
            Outcome::Accepted(record) => panic!("expected rejection, got {record}"),
        }
    }

    #[test]
    fn test_array_is_checked_as_batch() {
        let document = json!([
            { "size": 1 },
            { "size": "not-a-number" },
            { "size": "3" }
        ]);

        let report =
            check_document(RecordKind::Entity, ParseOptions::default(), false, document).unwrap();

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.accepted(), 2);
        assert_eq!(report.rejected(), 1);
        assert!(rejection(&report.outcomes[1]).has_issue("size"));
        assert!(matches!(
            &report.outcomes[2],
            Outcome::Accepted(record) if *record == json!({ "size": 3 })
        ));
    }

    #[test]
    fn test_single_object_is_one_payload() {
        let report = check_document(
            RecordKind::Count,
            ParseOptions::default(),
            false,
            json!({ "type": "click" }),
        )
        .unwrap();

        assert_eq!(report.outcomes.len(), 1);
        assert!(report.ensure_all_accepted().is_ok());
    }

    #[test]
    fn test_any_rejection_fails_the_run() {
        let report = check_document(
            RecordKind::Count,
            ParseOptions::default(),
            false,
            json!([{ "type": "click" }, {}]),
        )
        .unwrap();

        let err = report.ensure_all_accepted().unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 records failed validation");
    }

    #[test]
    fn test_import_flag_applies_import_rules() {
        let document = json!([{ "size": 20 }, { "size": 20, "tag": "x" }]);

        let plain = check_document(
            RecordKind::Article,
            ParseOptions::default(),
            false,
            document.clone(),
        )
        .unwrap();
        assert_eq!(plain.rejected(), 0);

        let import =
            check_document(RecordKind::Article, ParseOptions::default(), true, document).unwrap();
        assert_eq!(import.accepted(), 1);
        assert!(matches!(
            rejection(&import.outcomes[0]).issues_for(ROOT).next(),
            Some(IssueKind::Rule { rule, .. }) if rule == "search_term"
        ));
    }

    #[test]
    fn test_import_flag_requires_article() {
        assert!(ensure_import_applies(RecordKind::Article, true).is_ok());
        assert!(ensure_import_applies(RecordKind::Entity, false).is_ok());
        assert!(ensure_import_applies(RecordKind::Entity, true).is_err());
        assert!(ensure_import_applies(RecordKind::Count, true).is_err());
    }

    #[test]
    fn test_flags_override_env_options() {
        let base = ParseOptions::default();

        assert_eq!(merge_options(base, false, false), base);
        assert_eq!(merge_options(base, true, true), ParseOptions::strict());

        let merged = merge_options(base, true, false);
        assert_eq!(merged.coercion, Coercion::Strict);
        assert_eq!(merged.unknown_fields, UnknownFields::Ignore);

        // absent flags keep what the environment configured
        assert_eq!(
            merge_options(ParseOptions::strict(), false, false),
            ParseOptions::strict()
        );
    }

    #[test]
    fn test_strict_flag_changes_batch_outcome() {
        let document = json!({ "size": "7" });

        let lax = check_document(
            RecordKind::Entity,
            ParseOptions::default(),
            false,
            document.clone(),
        )
        .unwrap();
        assert_eq!(lax.rejected(), 0);

        let strict = merge_options(ParseOptions::default(), true, false);
        let report = check_document(RecordKind::Entity, strict, false, document).unwrap();
        assert_eq!(report.rejected(), 1);
    }
}
