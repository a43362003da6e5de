//! Timestamps shared by price bars and decision events.
//!
//! Sources deliver either epoch numbers or date/time strings. The original
//! representation is kept for output; ordering goes through [`SortKey`].

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Numeric(f64),
    Text(String),
}

const TEXT_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

impl Timestamp {
    /// Parse a raw text cell: numbers become `Numeric`, anything else `Text`.
    pub fn from_field(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Timestamp::Numeric(v),
            _ => Timestamp::Text(trimmed.to_string()),
        }
    }

    pub fn sort_key(&self) -> SortKey {
        match self {
            Timestamp::Numeric(v) => SortKey::Instant(*v),
            Timestamp::Text(s) => match parse_instant(s) {
                Some(secs) => SortKey::Instant(secs),
                None => SortKey::Opaque(s.clone()),
            },
        }
    }
}

impl From<f64> for Timestamp {
    fn from(v: f64) -> Self {
        Timestamp::Numeric(v)
    }
}

impl From<&str> for Timestamp {
    fn from(s: &str) -> Self {
        Timestamp::Text(s.to_string())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Numeric(v) => write!(f, "{v}"),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

/// Seconds since the Unix epoch (UTC) for the supported text layouts.
fn parse_instant(s: &str) -> Option<f64> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(epoch_seconds(dt.naive_utc()));
    }
    for fmt in TEXT_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(epoch_seconds(naive));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(epoch_seconds)
}

fn epoch_seconds(naive: NaiveDateTime) -> f64 {
    let utc = naive.and_utc();
    utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9
}

/// Total order over timestamps: instants first (numerically), then
/// unparseable text (lexicographically).
#[derive(Debug, Clone)]
pub enum SortKey {
    Instant(f64),
    Opaque(String),
}

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Instant(a), SortKey::Instant(b)) => a.total_cmp(b),
            (SortKey::Instant(_), SortKey::Opaque(_)) => Ordering::Less,
            (SortKey::Opaque(_), SortKey::Instant(_)) => Ordering::Greater,
            (SortKey::Opaque(a), SortKey::Opaque(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SortKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SortKey {}
