//! Import and export documents exchanged with the user.

use cardcycle_core::{card_warnings, CoreError, CoreResult};
use cardcycle_domain::Card;
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::migration::cards_from_value;

pub const EXPORT_FILE_PREFIX: &str = "creditcard-tracker-backup";

/// A decoded import ready to replace the current card list.
#[derive(Debug, Clone, Default)]
pub struct ImportedDocument {
    pub cards: Vec<Card>,
    /// Theme class found next to the cards, unvalidated.
    pub theme: Option<String>,
    pub migrations: Vec<String>,
    pub warnings: Vec<String>,
}

/// Parses an import, accepting a bare card array or a `{cards, theme}` object.
pub fn parse_import(text: &str) -> CoreResult<ImportedDocument> {
    let value: Value = serde_json::from_str(text)
        .map_err(|err| CoreError::MalformedImport(format!("invalid JSON: {err}")))?;

    let (cards_value, theme) = match value {
        Value::Array(cards) => (Value::Array(cards), None),
        Value::Object(mut object) => {
            let cards = object.remove("cards").ok_or_else(|| {
                CoreError::MalformedImport("object import has no `cards` field".into())
            })?;
            let theme = object
                .remove("theme")
                .and_then(|theme| theme.as_str().map(str::to_string));
            (cards, theme)
        }
        _ => {
            return Err(CoreError::MalformedImport(
                "expected an array of cards or an object with `cards`".into(),
            ))
        }
    };

    let migrated = cards_from_value(cards_value)?;
    let warnings = card_warnings(&migrated.cards);
    for warning in &warnings {
        tracing::warn!(%warning, "imported data anomaly");
    }
    Ok(ImportedDocument {
        cards: migrated.cards,
        theme,
        migrations: migrated.migrations,
        warnings,
    })
}

#[derive(Serialize)]
struct ThemedExport<'a> {
    cards: &'a [Card],
    theme: &'a str,
}

/// Renders cards as pretty JSON, wrapped with the theme when one is given.
pub fn export_document(cards: &[Card], theme: Option<&str>) -> CoreResult<String> {
    let rendered = match theme {
        Some(theme) => serde_json::to_string_pretty(&ThemedExport { cards, theme }),
        None => serde_json::to_string_pretty(cards),
    };
    rendered.map_err(|err| CoreError::Serde(err.to_string()))
}

/// Suggested download name, e.g. `creditcard-tracker-backup-2024-05-01.json`.
pub fn export_file_name(date: NaiveDate) -> String {
    format!("{EXPORT_FILE_PREFIX}-{}.json", date.format("%Y-%m-%d"))
}
