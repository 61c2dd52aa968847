//! Bulk rider import from pasted or uploaded CSV, plus the matching export.
//!
//! Parsing is deliberately forgiving: structural problems fail the whole
//! batch with a [`FormatError`], but per-row problems only mark that row
//! invalid. The caller gets a full preview (valid and invalid rows) and
//! decides whether to commit the valid subset.

mod export;
mod youtube;

pub use export::riders_to_csv;
pub use youtube::youtube_thumbnail;

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use ridereel_types::Event;

/// Fallback applied when the price field does not parse.
pub const DEFAULT_PRICE: f64 = 80.0;

/// A field is either a quoted run (commas allowed inside) or a bare run of
/// non-comma characters. Empty unquoted fields produce no token, so field
/// positions shift on rows like `a,,b`; that matches the storefront's
/// historical import behavior.
static TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""[^"]*"|[^",]+"#).expect("token pattern is valid"));

/// Structural CSV failures that abort the whole import before any row-level
/// parsing happens.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("CSV file must have at least a header row and one data row")]
    MissingRows,
    #[error("CSV headers must include 'Rider Name', 'Event', 'Price'")]
    BadHeader,
    #[error("No data found in CSV file")]
    NoData,
}

/// One parsed data row, valid or not.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    pub name: String,
    pub event_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<i64>,
    pub price: f64,
    pub video_url: String,
    pub thumbnail_url: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl ImportRow {
    fn unparsable() -> Self {
        Self {
            name: String::new(),
            event_name: String::new(),
            event_id: None,
            price: 0.0,
            video_url: String::new(),
            thumbnail_url: String::new(),
            valid: false,
            error: Some("Invalid CSV format"),
        }
    }
}

/// Outcome of committing an import batch. Failures are counted, never
/// rolled back.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ImportSummary {
    pub success: u32,
    pub failed: u32,
}

/// Parse a CSV blob into a preview of rider-creation rows, resolving event
/// names against `events` by case-insensitive exact match.
///
/// Expected columns, in order: rider name, event name, price, video URL,
/// thumbnail URL (optional). The header may list them in any order as long
/// as the three required markers appear.
pub fn parse_csv(input: &str, events: &[Event]) -> Result<Vec<ImportRow>, FormatError> {
    let lines: Vec<&str> = input.split('\n').collect();
    if lines.len() < 2 {
        return Err(FormatError::MissingRows);
    }

    let header = lines[0].to_lowercase();
    if !header.contains("rider name") || !header.contains("event") || !header.contains("price") {
        return Err(FormatError::BadHeader);
    }

    let data_lines: Vec<&str> = lines[1..]
        .iter()
        .copied()
        .filter(|line| !line.trim().is_empty())
        .collect();
    if data_lines.is_empty() {
        return Err(FormatError::NoData);
    }

    Ok(data_lines
        .into_iter()
        .map(|line| parse_row(line, events))
        .collect())
}

fn parse_row(line: &str, events: &[Event]) -> ImportRow {
    let fields: Vec<&str> = TOKEN.find_iter(line).map(|m| m.as_str()).collect();
    if fields.len() < 3 {
        return ImportRow::unparsable();
    }

    let name = clean(fields[0]);
    let event_name = clean(fields[1]);
    let price = clean(fields[2]).parse::<f64>().unwrap_or(DEFAULT_PRICE);
    let video_url = fields.get(3).map(|f| clean(f)).unwrap_or_default();
    let mut thumbnail_url = fields.get(4).map(|f| clean(f)).unwrap_or_default();

    if thumbnail_url.is_empty() && !video_url.is_empty() {
        if let Some(derived) = youtube_thumbnail(&video_url) {
            thumbnail_url = derived;
        }
    }

    let event = events
        .iter()
        .find(|e| e.name.to_lowercase() == event_name.to_lowercase());

    // First failing condition wins; a row never reports more than one error.
    let (valid, error) = if name.is_empty() {
        (false, Some("Missing rider name"))
    } else if event.is_none() {
        (false, Some("Event not found"))
    } else if video_url.is_empty() {
        (false, Some("Missing video URL"))
    } else {
        (true, None)
    };

    ImportRow {
        name,
        event_name,
        event_id: event.map(|e| e.id),
        price,
        video_url,
        thumbnail_url,
        valid,
        error,
    }
}

/// Strip all quotes, then trim. Quotes inside fields are not escapable in
/// this format, so removing every quote matches what the tokenizer kept.
fn clean(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}
