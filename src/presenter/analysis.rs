//! Segment-analysis response: overview plus per-segment statistics.

use super::display::{DisplayTree, Section};
use super::format::{format_metric_name, format_metric_number, to_fixed_1};
use super::transitions::transitions_section;
use crate::model::{NumericStats, SegmentAnalysis};

pub fn render_segment_analysis(analysis: &SegmentAnalysis) -> DisplayTree {
    let mut tree = DisplayTree::new("Segment Statistics");

    tree.push(
        Section::new("Overview")
            .with_item("Total Customers", analysis.total_customers.to_string())
            .with_item("Number of Segments", analysis.number_of_segments.to_string()),
    );

    let mut statistics = Section::new("Segment Statistics");
    for (segment, stats) in &analysis.segment_statistics {
        let mut sub = Section::new(segment.as_str())
            .with_item("Size", format!("{} ({}%)", stats.size, to_fixed_1(stats.percentage)));
        for (metric, numeric) in &stats.numeric_stats {
            sub.push_item(format_metric_name(metric), mean_median(metric, numeric));
        }
        statistics.subsections.push(sub);
    }
    tree.push(statistics);

    if let Some(transitions) = &analysis.segment_transitions {
        tree.push(transitions_section(transitions));
    }

    tree
}

fn mean_median(metric: &str, stats: &NumericStats) -> String {
    format!(
        "Mean: {} / Median: {}",
        format_metric_number(metric, stats.mean),
        format_metric_number(metric, stats.median)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SegmentAnalysis {
        serde_json::from_str(
            r#"{
                "total_customers": 200,
                "number_of_segments": 2,
                "segment_statistics": {
                    "Segment_0": {
                        "size": 150,
                        "percentage": 75.0,
                        "numeric_stats": {
                            "income": {"mean": 52000.25, "median": 50000, "std": 1.0, "min": 0.0, "max": 1.0},
                            "visits_per_month": {"mean": 4.5, "median": 4, "std": 1.0, "min": 0.0, "max": 9.0}
                        }
                    },
                    "Segment_1": {"size": 50, "percentage": 25.0, "numeric_stats": {}}
                }
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn overview_lists_totals() {
        let tree = render_segment_analysis(&sample());
        let overview = tree.section("Overview").unwrap();

        assert_eq!(overview.value("Total Customers"), Some("200"));
        assert_eq!(overview.value("Number of Segments"), Some("2"));
    }

    #[test]
    fn segment_rows_format_mean_and_median() {
        let tree = render_segment_analysis(&sample());
        let seg = tree.section("Segment Statistics").unwrap().subsection("Segment_0").unwrap();

        assert_eq!(seg.value("Size"), Some("150 (75.0%)"));
        assert_eq!(
            seg.value("Income"),
            Some("Mean: $52,000.25 / Median: $50,000")
        );
        assert_eq!(seg.value("Visits Per Month"), Some("Mean: 4.5 / Median: 4"));
    }

    #[test]
    fn transitions_are_optional() {
        assert!(render_segment_analysis(&sample()).section("Segment Transitions").is_none());
    }
}
