//! Population-level segmentation result.

use super::display::{DisplayTree, Section};
use super::format::{display_number, format_fraction_percent, format_metric_name, format_metric_value};
use super::metrics::{render_model_info, render_model_metrics, render_summary};
use super::transitions::transitions_section;
use crate::model::{Profile, SegmentationInsights};

pub const DISTRIBUTION_TITLE: &str = "Segment Distribution";
pub const PROFILES_TITLE: &str = "Segment Profiles";

/// Rendered population result together with the insights it came from.
///
/// Chart construction happens outside the presenter; the UI shell reads the
/// same, unmodified insights through [`PopulationView::insights`].
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationView<'a> {
    pub tree: DisplayTree,
    pub insights: &'a SegmentationInsights,
}

impl PopulationView<'_> {
    pub fn into_tree(self) -> DisplayTree {
        self.tree
    }
}

/// Build the display tree for a segmentation run.
///
/// Sections, in order: distribution, profiles, then summary, model
/// performance, model info and transitions when the payload carries them. An
/// empty profile mapping yields an empty profiles section.
pub fn render_population_result(insights: &SegmentationInsights) -> PopulationView<'_> {
    let mut tree = DisplayTree::new("Segment Analysis");

    let mut distribution = Section::new(DISTRIBUTION_TITLE);
    for (segment, count) in &insights.segment_sizes {
        distribution.push_item(format!("Segment {segment}"), count.to_string());
    }
    tree.push(distribution);

    let mut profiles = Section::new(PROFILES_TITLE);
    profiles.subsections = insights
        .segment_profiles
        .iter()
        .map(|(segment, profile)| profile_section(segment, profile))
        .collect();
    tree.push(profiles);

    if let Some(summary) = &insights.summary {
        tree.push(render_summary(summary));
    }
    if let Some(performance) = &insights.model_performance {
        tree.push(render_model_metrics(performance));
    }
    if let Some(info) = &insights.model_info {
        tree.push(render_model_info(info));
    }
    if let Some(transitions) = &insights.segment_transitions {
        tree.push(transitions_section(transitions));
    }

    PopulationView { tree, insights }
}

fn profile_section(segment: &str, profile: &Profile) -> Section {
    let mut section = Section::new(segment)
        .with_item("Label", profile.label.as_str())
        .with_item("Size", format!("{} customers", profile.size))
        .with_item("Percentage", format!("{}%", display_number(profile.percentage)));

    for (metric, value) in &profile.avg_metrics {
        section.push_item(format_metric_name(metric), format_metric_value(metric, value));
    }

    if let Some(engagement) = profile.engagement_metrics.as_ref().filter(|m| !m.is_empty()) {
        let mut sub = Section::new("Engagement Metrics");
        for (metric, value) in engagement {
            sub.push_item(format_metric_name(metric), display_number(*value));
        }
        section.subsections.push(sub);
    }

    if let Some(categories) = profile.top_categories.as_ref().filter(|m| !m.is_empty()) {
        let mut sub = Section::new("Top Categories");
        for (category, count) in categories {
            sub.push_item(category.as_str(), format!("{count} customers"));
        }
        section.subsections.push(sub);
    }

    if let Some(genders) = profile.gender_distribution.as_ref().filter(|m| !m.is_empty()) {
        let mut sub = Section::new("Gender Distribution");
        for (gender, share) in genders {
            sub.push_item(gender.as_str(), format_fraction_percent(*share));
        }
        section.subsections.push(sub);
    }

    section
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SegmentationInsights {
        serde_json::from_str(
            r#"{
                "segment_sizes": {"0": 120, "1": 80},
                "segment_profiles": {
                    "0": {
                        "label": "High-Value, frequent purchasers",
                        "size": 120,
                        "percentage": 60.0,
                        "avg_metrics": {"age": 41.5, "income": 82000, "purchase_frequency": 14},
                        "top_categories": {"Electronics": 50, "Books": 20},
                        "gender_distribution": {"F": 0.55, "M": 0.45}
                    },
                    "1": {
                        "label": "Budget-Conscious, infrequent purchasers",
                        "size": 80,
                        "percentage": 40.0,
                        "avg_metrics": {"age": 27, "income": 31000.5}
                    }
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn distribution_lists_every_segment() {
        let insights = sample();
        let view = render_population_result(&insights);
        let dist = &view.tree.sections[0];

        assert_eq!(dist.title, DISTRIBUTION_TITLE);
        assert_eq!(dist.value("Segment 0"), Some("120"));
        assert_eq!(dist.value("Segment 1"), Some("80"));
    }

    #[test]
    fn profile_rows_follow_label_size_percentage_metrics() {
        let insights = sample();
        let view = render_population_result(&insights);
        let profile = view.tree.sections[1].subsection("0").unwrap();

        let labels: Vec<&str> = profile.items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(
            labels,
            ["Label", "Size", "Percentage", "Age", "Income", "Purchase Frequency"]
        );
        assert_eq!(profile.value("Size"), Some("120 customers"));
        assert_eq!(profile.value("Percentage"), Some("60%"));
        assert_eq!(profile.value("Income"), Some("$82,000"));
        assert_eq!(profile.value("Age"), Some("41.5 years"));
    }

    #[test]
    fn profile_extras_become_subsections() {
        let insights = sample();
        let view = render_population_result(&insights);
        let profile = view.tree.sections[1].subsection("0").unwrap();

        let genders = profile.subsection("Gender Distribution").unwrap();
        assert_eq!(genders.value("F"), Some("55.0%"));
        let categories = profile.subsection("Top Categories").unwrap();
        assert_eq!(categories.value("Electronics"), Some("50 customers"));
    }

    #[test]
    fn empty_profiles_give_empty_section() {
        let insights: SegmentationInsights =
            serde_json::from_str(r#"{"segment_sizes": {"0": 5}, "segment_profiles": {}}"#).unwrap();
        let view = render_population_result(&insights);

        assert_eq!(view.tree.sections.len(), 2);
        assert!(view.tree.sections[1].is_empty());
    }

    #[test]
    fn optional_sections_appear_when_present() {
        let mut insights = sample();
        insights.segment_transitions =
            Some(serde_json::from_str(r#"{"0": {"0": 0.7, "1": 0.3}, "1": {"0": 0.1, "1": 0.9}}"#).unwrap());
        let view = render_population_result(&insights);

        let transitions = view.tree.section("Segment Transitions").unwrap();
        assert_eq!(transitions.table.as_ref().unwrap().header, ["0", "1"]);
        assert!(view.tree.section("Model Performance").is_none());
    }

    #[test]
    fn rendering_is_idempotent_and_exposes_input() {
        let insights = sample();
        let before = insights.clone();

        let first = render_population_result(&insights);
        let second = render_population_result(&insights);

        assert_eq!(first.tree, second.tree);
        assert_eq!(first.insights, &before);
        assert!(std::ptr::eq(first.insights, &insights));
    }
}
