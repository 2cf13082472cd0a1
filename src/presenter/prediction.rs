//! Single-customer prediction result.

use super::display::{DisplayTree, Section};
use super::format::{display_number, format_metric_name, format_metric_value, to_fixed_1};
use crate::model::PredictionResult;

pub const PREDICTION_TITLE: &str = "Customer Segment Prediction";
pub const CUSTOMER_TITLE: &str = "Customer Information";
pub const PROFILE_TITLE: &str = "Segment Profile";
pub const AVERAGES_TITLE: &str = "Average Metrics";
pub const CHARACTERISTICS_TITLE: &str = "Distinctive Characteristics";

/// Build the display tree for a prediction.
///
/// The profile, averages and characteristics sections only appear when the
/// segment has non-empty average metrics; the characteristics section also
/// needs at least one entry.
pub fn render_prediction_result(result: &PredictionResult) -> DisplayTree {
    let mut tree = DisplayTree::new(PREDICTION_TITLE);

    tree.push(Section::new(PREDICTION_TITLE).with_item("Predicted Segment", result.segment_label.as_str()));

    let mut customer = Section::new(CUSTOMER_TITLE);
    for (key, value) in result.customer_data.iter().filter(|(_, v)| !v.is_null()) {
        customer.push_item(format_metric_name(key), format_metric_value(key, value));
    }
    tree.push(customer);

    let characteristics = &result.segment_characteristics;
    if !characteristics.has_profile() {
        return tree;
    }

    tree.push(Section::new(PROFILE_TITLE).with_item(
        "Segment Size",
        format!(
            "{} customers ({}%)",
            characteristics.size,
            display_number(characteristics.percentage)
        ),
    ));

    let mut average_section = Section::new(AVERAGES_TITLE);
    for (key, value) in characteristics.avg_metrics.iter().flatten() {
        average_section.push_item(format_metric_name(key), format_metric_value(key, value));
    }
    tree.push(average_section);

    if !characteristics.characteristics.is_empty() {
        let mut distinctive = Section::new(CHARACTERISTICS_TITLE);
        for (key, c) in &characteristics.characteristics {
            distinctive.push_item(
                format_metric_name(key),
                format!("{}% {} than average", to_fixed_1(c.difference), c.direction),
            );
        }
        tree.push(distinctive);
    }

    tree
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
