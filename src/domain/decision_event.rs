//! Sparse decision / strategy events plotted over the price series.

use serde::{Deserialize, Serialize};

use crate::domain::timestamp::Timestamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEvent")]
pub struct DecisionEvent {
    pub timestamp: Timestamp,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

/// Accepted input shape. Evaluation records name the fields `end_time` and
/// `action`; when a record carries both spellings, `timestamp` and
/// `category` win.
#[derive(Deserialize)]
struct WireEvent {
    #[serde(default)]
    timestamp: Option<Timestamp>,
    #[serde(default)]
    end_time: Option<Timestamp>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
    #[serde(default)]
    rationale: Option<String>,
}

impl TryFrom<WireEvent> for DecisionEvent {
    type Error = String;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let timestamp = wire
            .timestamp
            .or(wire.end_time)
            .ok_or("missing field `timestamp` (or `end_time`)")?;
        let category = wire
            .category
            .or(wire.action)
            .ok_or("missing field `category` (or `action`)")?;
        Ok(Self {
            timestamp,
            category,
            confidence: wire.confidence,
            rationale: wire.rationale,
        })
    }
}

impl DecisionEvent {
    pub fn new(timestamp: impl Into<Timestamp>, category: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            category: category.into(),
            confidence: None,
            rationale: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = Some(rationale.into());
        self
    }

    /// Hover label: category, confidence to 2 places (absent = 0.00), rationale.
    pub fn hover_text(&self) -> String {
        let confidence = self.confidence.unwrap_or(0.0);
        match self.rationale.as_deref().filter(|r| !r.is_empty()) {
            Some(rationale) => format!("{} | conf: {:.2}\n{}", self.category, confidence, rationale),
            None => format!("{} | conf: {:.2}", self.category, confidence),
        }
    }
}
