use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Count, MetricMap, TransitionMatrix};
use crate::presenter::transitions::validate_transitions;

/// Population-level segmentation result.
///
/// This is the body of the service's `insights` envelope. Only
/// `segment_sizes` and `segment_profiles` are required; everything else is
/// rendered when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentationInsights {
    pub segment_sizes: IndexMap<String, Count>,
    #[serde(default)]
    pub segment_profiles: IndexMap<String, Profile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segment_transitions: Option<TransitionMatrix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_performance: Option<ModelPerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Summary>,
}

impl SegmentationInsights {
    /// Check the cross-mapping key invariant.
    ///
    /// Every id in `segment_sizes` must have a profile and, when a transition
    /// matrix is present, a transition row. The matrix itself must be square
    /// and fully populated.
    pub fn validate(&self) -> Result<()> {
        let missing_profiles: Vec<&str> = self
            .segment_sizes
            .keys()
            .filter(|id| !self.segment_profiles.contains_key(*id))
            .map(String::as_str)
            .collect();
        if !missing_profiles.is_empty() {
            anyhow::bail!(
                "segments without a profile: {}",
                missing_profiles.join(", ")
            );
        }

        if let Some(transitions) = &self.segment_transitions {
            let missing_rows: Vec<&str> = self
                .segment_sizes
                .keys()
                .filter(|id| !transitions.contains_key(*id))
                .map(String::as_str)
                .collect();
            if !missing_rows.is_empty() {
                anyhow::bail!(
                    "segments without a transition row: {}",
                    missing_rows.join(", ")
                );
            }
            validate_transitions(transitions)?;
        }

        Ok(())
    }

    /// Number of segments reported by the distribution.
    pub fn segment_count(&self) -> usize {
        self.segment_sizes.len()
    }
}

/// Aggregated statistics for one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub label: String,
    pub size: Count,
    pub percentage: f64,
    #[serde(default)]
    pub avg_metrics: MetricMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engagement_metrics: Option<IndexMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_categories: Option<IndexMap<String, Count>>,
    /// Share of each gender value within the segment, as a 0–1 fraction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender_distribution: Option<IndexMap<String, f64>>,
}

/// Clustering quality figures, both as 0–1 fractions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub algorithm: String,
    pub silhouette_score: f64,
    pub explained_variance: f64,
}

/// Model description attached to a segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub algorithm: String,
    pub n_clusters: Count,
    pub silhouette_score: f64,
    #[serde(default)]
    pub features_used: Vec<String>,
}

/// Run summary added by the service next to the raw insights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_customers: Count,
    pub segments_found: Count,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_quality: Option<ModelQuality>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelQuality {
    pub silhouette_score: f64,
    /// Number of features the model was trained on.
    pub features_used: Count,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn insights(json: &str) -> SegmentationInsights {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn decodes_minimal_insights() {
        let parsed = insights(
            r#"{
                "segment_sizes": {"0": 3, "1": 2},
                "segment_profiles": {
                    "0": {"label": "Budget", "size": 3, "percentage": 60.0, "avg_metrics": {"age": 31}},
                    "1": {"label": "Premium", "size": 2, "percentage": 40.0}
                }
            }"#,
        );
        assert_eq!(parsed.segment_count(), 2);
        assert!(parsed.segment_profiles["1"].avg_metrics.is_empty());
        assert!(parsed.segment_transitions.is_none());
    }

    #[test]
    fn key_order_follows_document() {
        let parsed = insights(r#"{"segment_sizes": {"2": 1, "0": 5, "1": 3}, "segment_profiles": {}}"#);
        let keys: Vec<&str> = parsed.segment_sizes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["2", "0", "1"]);
    }

    #[test]
    fn validate_accepts_consistent_keys() {
        let parsed = insights(
            r#"{
                "segment_sizes": {"A": 1, "B": 1},
                "segment_profiles": {
                    "A": {"label": "a", "size": 1, "percentage": 50},
                    "B": {"label": "b", "size": 1, "percentage": 50}
                },
                "segment_transitions": {"A": {"A": 0.9, "B": 0.1}, "B": {"A": 0.2, "B": 0.8}}
            }"#,
        );
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_profile() {
        let parsed = insights(
            r#"{
                "segment_sizes": {"A": 1, "B": 1},
                "segment_profiles": {"A": {"label": "a", "size": 1, "percentage": 50}}
            }"#,
        );
        let err = parsed.validate().unwrap_err().to_string();
        assert!(err.contains("B"), "unexpected error: {err}");
    }

    #[test]
    fn validate_rejects_missing_transition_row() {
        let parsed = insights(
            r#"{
                "segment_sizes": {"A": 1, "B": 1},
                "segment_profiles": {
                    "A": {"label": "a", "size": 1, "percentage": 50},
                    "B": {"label": "b", "size": 1, "percentage": 50}
                },
                "segment_transitions": {"A": {"A": 1.0}}
            }"#,
        );
        assert!(parsed.validate().is_err());
    }
}
