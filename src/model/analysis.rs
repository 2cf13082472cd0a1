use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Count, TransitionMatrix};

/// Per-segment descriptive statistics from the segment-analysis endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentAnalysis {
    pub total_customers: Count,
    pub number_of_segments: Count,
    pub segment_statistics: IndexMap<String, SegmentStatistics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_transitions: Option<TransitionMatrix>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentStatistics {
    pub size: Count,
    pub percentage: f64,
    #[serde(default)]
    pub numeric_stats: IndexMap<String, NumericStats>,
}

/// Summary statistics for one numeric column within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericStats {
    pub mean: f64,
    pub median: f64,
    #[serde(default)]
    pub std: f64,
    #[serde(default)]
    pub min: f64,
    #[serde(default)]
    pub max: f64,
}
