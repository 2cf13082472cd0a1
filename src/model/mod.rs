//! Response payload types for the segmentation service.
//!
//! Every mapping is an [`IndexMap`] so that iteration follows the key order of
//! the JSON document. The presenter relies on this: distribution entries,
//! profile subsections and transition-matrix columns all come out in the order
//! the service wrote them.

mod analysis;
mod insights;
mod prediction;

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use analysis::{NumericStats, SegmentAnalysis, SegmentStatistics};
pub use insights::{
    ModelInfo, ModelPerformance, ModelQuality, Profile, SegmentationInsights, Summary,
};
pub use prediction::{Characteristic, Direction, PredictionResult, SegmentCharacteristics};

/// Transition probabilities: from-segment → to-segment → probability in `[0, 1]`.
pub type TransitionMatrix = IndexMap<String, IndexMap<String, f64>>;

/// Metric name → value. Values are usually numbers but may be any JSON value.
pub type MetricMap = IndexMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Count
// ---------------------------------------------------------------------------

/// A non-negative customer count.
///
/// The service serializes numpy integers through a float fallback, so a count
/// can arrive as `120` or as `120.0`. Both decode to the same value; a
/// fractional or negative number is rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Count(pub u64);

impl Count {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Count {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0)
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawCount {
            Whole(u64),
            Float(f64),
        }

        match RawCount::deserialize(deserializer)? {
            RawCount::Whole(n) => Ok(Count(n)),
            RawCount::Float(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 => {
                Ok(Count(f as u64))
            }
            RawCount::Float(f) => Err(serde::de::Error::custom(format!(
                "expected a non-negative whole count, got {f}"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
