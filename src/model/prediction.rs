use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Count, MetricMap};

/// Single-customer prediction returned by the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Numeric id of the predicted segment, when the service includes it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment: Option<i64>,
    pub segment_label: String,
    /// Attributes submitted for the customer. Null values are not displayed.
    #[serde(default)]
    pub customer_data: MetricMap,
    pub segment_characteristics: SegmentCharacteristics,
}

/// Profile of the predicted segment plus how it differs from the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentCharacteristics {
    #[serde(default)]
    pub size: Count,
    #[serde(default)]
    pub percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_metrics: Option<MetricMap>,
    #[serde(default)]
    pub characteristics: IndexMap<String, Characteristic>,
}

impl SegmentCharacteristics {
    /// True when there are average metrics worth showing.
    pub fn has_profile(&self) -> bool {
        self.avg_metrics.as_ref().is_some_and(|m| !m.is_empty())
    }
}

/// Percent delta of a metric against the population average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Characteristic {
    pub difference: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Higher,
    Lower,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Higher => write!(f, "higher"),
            Self::Lower => write!(f, "lower"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
