use super::display::Section;
use super::format::format_fraction_percent;
use crate::model::{ModelInfo, ModelPerformance, Summary};

/// Model quality cards: algorithm, silhouette score and explained variance.
pub fn render_model_metrics(performance: &ModelPerformance) -> Section {
    Section::new("Model Performance")
        .with_item("Algorithm", performance.algorithm.as_str())
        .with_item(
            "Silhouette Score",
            format_fraction_percent(performance.silhouette_score),
        )
        .with_item(
            "Explained Variance",
            format_fraction_percent(performance.explained_variance),
        )
}

/// Description of the fitted model.
pub fn render_model_info(info: &ModelInfo) -> Section {
    Section::new("Model Info")
        .with_item("Algorithm", info.algorithm.as_str())
        .with_item("Clusters", info.n_clusters.to_string())
        .with_item(
            "Silhouette Score",
            format_fraction_percent(info.silhouette_score),
        )
        .with_item("Features Used", info.features_used.len().to_string())
}

pub fn render_summary(summary: &Summary) -> Section {
    let mut section = Section::new("Summary")
        .with_item("Total Customers", summary.total_customers.to_string())
        .with_item("Segments Found", summary.segments_found.to_string());
    if let Some(quality) = &summary.model_quality {
        section.push_item(
            "Silhouette Score",
            format_fraction_percent(quality.silhouette_score),
        );
        section.push_item("Features Used", quality.features_used.to_string());
    }
    section
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
