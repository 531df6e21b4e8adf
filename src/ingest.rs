//! Match ingestion - decodes the results table into typed records.
//!
//! The table is comma-delimited with a header row. Recognized columns are
//! `Round`, `Match`, `Drink1`, `Drink2` and `Winner`; anything else is ignored.

use serde::Deserialize;

use crate::error::{BracketError, BracketResult};
use crate::record::{Match, TBD_LABEL};

/// A raw row as it appears in the table, before normalization.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "Round")]
    pub round: Option<String>,
    #[serde(rename = "Match")]
    pub number: Option<String>,
    #[serde(rename = "Drink1")]
    pub slot_a: Option<String>,
    #[serde(rename = "Drink2")]
    pub slot_b: Option<String>,
    #[serde(rename = "Winner")]
    pub winner: Option<String>,
}

impl RawRow {
    /// Convert to a typed record.
    ///
    /// Non-numeric round/match cells become 0. Blank cells and the literal
    /// `TBD` become `None`.
    pub fn to_match(&self) -> Match {
        Match {
            round: coerce_number(self.round.as_deref()),
            number: coerce_number(self.number.as_deref()),
            slot_a: normalize_slot(self.slot_a.as_deref()),
            slot_b: normalize_slot(self.slot_b.as_deref()),
            winner: normalize_slot(self.winner.as_deref()),
        }
    }
}

/// Parse a non-negative integer cell, defaulting to 0.
pub fn coerce_number(cell: Option<&str>) -> u32 {
    let Some(cell) = cell.map(str::trim) else {
        return 0;
    };
    if let Ok(n) = cell.parse::<u32>() {
        return n;
    }
    // "2.0" style cells from spreadsheet exports
    match cell.parse::<f64>() {
        Ok(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u32::MAX as f64 => f as u32,
        _ => 0,
    }
}

/// Trim a slot cell; blank and `TBD` mean undecided.
pub fn normalize_slot(cell: Option<&str>) -> Option<String> {
    let value = cell?.trim();
    if value.is_empty() || value == TBD_LABEL {
        None
    } else {
        Some(value.to_string())
    }
}

/// Decode the full results table.
///
/// Fails if the text has no header row or the CSV structure is broken.
pub fn parse_matches(text: &str) -> BracketResult<Vec<Match>> {
    let text = text.trim();
    if text.is_empty() {
        return Err(BracketError::MissingHeader);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    if reader.headers()?.iter().all(str::is_empty) {
        return Err(BracketError::MissingHeader);
    }

    let mut matches = Vec::new();
    for row in reader.deserialize::<RawRow>() {
        matches.push(row?.to_match());
    }

    tracing::debug!(rows = matches.len(), "ingested results table");
    Ok(matches)
}
