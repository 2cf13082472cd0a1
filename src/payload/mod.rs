//! Decoding of raw service responses.
//!
//! The segmentation service answers with one of three result shapes, or with
//! an error body. [`Payload::from_json`] sniffs the top-level keys to decide
//! which one it got, unwraps the `{"insights": ...}` envelope, and turns error
//! bodies into `Err` so callers never try to render them.

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::model::{PredictionResult, SegmentAnalysis, SegmentationInsights};
use crate::presenter::{
    DisplayTree, render_population_result, render_prediction_result, render_segment_analysis,
};

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// Which result shape a payload holds (or should be decoded as).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Auto,
    Population,
    Prediction,
    Analysis,
}

impl PayloadKind {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("population") | Some("insights") => Self::Population,
            Some("prediction") | Some("predict") => Self::Prediction,
            Some("analysis") => Self::Analysis,
            _ => Self::Auto,
        }
    }
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Population => write!(f, "population"),
            Self::Prediction => write!(f, "prediction"),
            Self::Analysis => write!(f, "analysis"),
        }
    }
}

// ---------------------------------------------------------------------------
// Service error body
// ---------------------------------------------------------------------------

/// Error body returned by the service instead of a result.
#[derive(Debug, Default, Deserialize)]
pub struct ServiceError {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub detail: Option<Value>,
}

impl ServiceError {
    /// Single-line message combining detail, error text and exception type.
    pub fn message(&self) -> String {
        let detail = self.detail.as_ref().map(|d| match d {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });

        let mut message = match (detail, &self.error) {
            (Some(d), Some(e)) => format!("{d}: {e}"),
            (Some(d), None) => d,
            (None, Some(e)) => e.clone(),
            (None, None) => "unknown service error".to_string(),
        };
        if let Some(kind) = &self.kind {
            message.push_str(&format!(" ({kind})"));
        }
        message
    }
}

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

/// A decoded service result.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Population(SegmentationInsights),
    Prediction(PredictionResult),
    Analysis(SegmentAnalysis),
}

const RESULT_KEYS: [&str; 4] = [
    "insights",
    "segment_sizes",
    "segment_label",
    "segment_statistics",
];

impl Payload {
    /// Decode JSON text, detecting the shape unless `kind` forces one.
    pub fn from_json(text: &str, kind: PayloadKind) -> Result<Self> {
        let value: Value = serde_json::from_str(text).context("payload is not valid JSON")?;
        Self::from_value(value, kind)
    }

    /// Decode an already-parsed JSON value.
    pub fn from_value(value: Value, kind: PayloadKind) -> Result<Self> {
        let Value::Object(object) = value else {
            anyhow::bail!("payload must be a JSON object");
        };

        if is_error_body(&object) {
            let err: ServiceError = serde_json::from_value(Value::Object(object))
                .context("failed to decode service error body")?;
            anyhow::bail!("service reported an error: {}", err.message());
        }

        let kind = match kind {
            PayloadKind::Auto => detect_kind(&object)?,
            forced => forced,
        };

        match kind {
            PayloadKind::Population | PayloadKind::Auto => {
                let body = match object.get("insights").cloned() {
                    Some(inner) => inner,
                    None => Value::Object(object),
                };
                let insights = serde_json::from_value(body)
                    .context("failed to decode segmentation insights")?;
                Ok(Self::Population(insights))
            }
            PayloadKind::Prediction => {
                let result = serde_json::from_value(Value::Object(object))
                    .context("failed to decode prediction result")?;
                Ok(Self::Prediction(result))
            }
            PayloadKind::Analysis => {
                let analysis = serde_json::from_value(Value::Object(object))
                    .context("failed to decode segment analysis")?;
                Ok(Self::Analysis(analysis))
            }
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            Self::Population(_) => PayloadKind::Population,
            Self::Prediction(_) => PayloadKind::Prediction,
            Self::Analysis(_) => PayloadKind::Analysis,
        }
    }

    /// Number of segments the payload describes, when it describes several.
    pub fn segment_count(&self) -> Option<usize> {
        match self {
            Self::Population(insights) => Some(insights.segment_count()),
            Self::Prediction(_) => None,
            Self::Analysis(analysis) => Some(analysis.segment_statistics.len()),
        }
    }

    /// Run strict validation, then build the display tree.
    ///
    /// Without `strict` the presenter's permissive behavior applies: ragged
    /// transition rows and unmatched segment keys render as-is.
    pub fn render(&self, strict: bool) -> Result<DisplayTree> {
        if strict {
            self.validate()?;
        }

        Ok(match self {
            Self::Population(insights) => render_population_result(insights).into_tree(),
            Self::Prediction(result) => render_prediction_result(result),
            Self::Analysis(analysis) => render_segment_analysis(analysis),
        })
    }

    fn validate(&self) -> Result<()> {
        match self {
            Self::Population(insights) => insights.validate(),
            Self::Prediction(_) => Ok(()),
            Self::Analysis(analysis) => match &analysis.segment_transitions {
                Some(t) => crate::presenter::validate_transitions(t),
                None => Ok(()),
            },
        }
    }
}

fn is_error_body(object: &Map<String, Value>) -> bool {
    (object.contains_key("error") || object.contains_key("detail"))
        && !RESULT_KEYS.iter().any(|k| object.contains_key(*k))
}

fn detect_kind(object: &Map<String, Value>) -> Result<PayloadKind> {
    if object.contains_key("insights") || object.contains_key("segment_sizes") {
        return Ok(PayloadKind::Population);
    }
    if object.contains_key("segment_label") {
        return Ok(PayloadKind::Prediction);
    }
    if object.contains_key("segment_statistics") {
        return Ok(PayloadKind::Analysis);
    }

    let keys: Vec<&str> = object.keys().map(String::as_str).take(8).collect();
    anyhow::bail!("unrecognized payload (top-level keys: {})", keys.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parsing() {
        assert_eq!(PayloadKind::from_str_opt(None), PayloadKind::Auto);
        assert_eq!(PayloadKind::from_str_opt(Some("population")), PayloadKind::Population);
        assert_eq!(PayloadKind::from_str_opt(Some("predict")), PayloadKind::Prediction);
        assert_eq!(PayloadKind::from_str_opt(Some("analysis")), PayloadKind::Analysis);
        assert_eq!(PayloadKind::from_str_opt(Some("whatever")), PayloadKind::Auto);
    }

    #[test]
    fn unwraps_insights_envelope() {
        let payload = Payload::from_json(
            r#"{"insights": {"segment_sizes": {"0": 1}, "segment_profiles": {}}}"#,
            PayloadKind::Auto,
        )
        .unwrap();
        assert_eq!(payload.kind(), PayloadKind::Population);
        assert_eq!(payload.segment_count(), Some(1));
    }

    #[test]
    fn error_body_becomes_error() {
        let err = Payload::from_json(
            r#"{"error": "boom", "type": "ValueError", "detail": "Error occurred during segmentation process"}"#,
            PayloadKind::Auto,
        )
        .unwrap_err()
        .to_string();
        assert_eq!(
            err,
            "service reported an error: Error occurred during segmentation process: boom (ValueError)"
        );
    }

    #[test]
    fn plain_detail_error() {
        let err = Payload::from_json(r#"{"detail": "No data file found."}"#, PayloadKind::Auto)
            .unwrap_err()
            .to_string();
        assert!(err.ends_with("No data file found."));
    }

    #[test]
    fn unknown_shape_is_rejected() {
        let err = Payload::from_json(r#"{"status": "healthy"}"#, PayloadKind::Auto)
            .unwrap_err()
            .to_string();
        assert!(err.contains("unrecognized payload"));
        assert!(err.contains("status"));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(Payload::from_json("[1, 2]", PayloadKind::Auto).is_err());
        assert!(Payload::from_json("not json", PayloadKind::Auto).is_err());
    }

    #[test]
    fn forced_kind_skips_detection() {
        let result = Payload::from_json(
            r#"{"segment_sizes": {"0": 1}, "segment_profiles": {}}"#,
            PayloadKind::Prediction,
        );
        assert!(result.is_err());
    }

    #[test]
    fn strict_render_rejects_ragged_matrix() {
        let payload = Payload::from_json(
            r#"{
                "segment_sizes": {"A": 1, "B": 1},
                "segment_profiles": {
                    "A": {"label": "a", "size": 1, "percentage": 50},
                    "B": {"label": "b", "size": 1, "percentage": 50}
                },
                "segment_transitions": {"A": {"A": 0.9, "B": 0.1}, "B": {"B": 1.0}}
            }"#,
            PayloadKind::Auto,
        )
        .unwrap();

        assert!(payload.render(false).is_ok());
        assert!(payload.render(true).is_err());
    }
}
