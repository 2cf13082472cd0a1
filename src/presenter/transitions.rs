//! Segment transition matrix rendering and validation.

use anyhow::Result;

use super::display::{Section, Table, TableRow};
use super::format::format_fraction_percent;
use crate::model::TransitionMatrix;

/// Corner text of the transition table.
pub const TRANSITION_CORNER: &str = "From / To";

/// Render transition probabilities as a table.
///
/// Columns are the first row's keys, followed by any key that only appears in
/// later rows. Cells are looked up by column key, so row key order does not
/// matter; a row without a column gets an empty cell. Use
/// [`validate_transitions`] first to reject such matrices.
pub fn render_transition_matrix(transitions: &TransitionMatrix) -> Table {
    let mut header: Vec<String> = Vec::new();
    for row in transitions.values() {
        for to in row.keys() {
            if !header.contains(to) {
                header.push(to.clone());
            }
        }
    }

    let rows = transitions
        .iter()
        .map(|(from, row)| TableRow {
            label: from.clone(),
            cells: header
                .iter()
                .map(|to| row.get(to).map(|p| format_fraction_percent(*p)).unwrap_or_default())
                .collect(),
        })
        .collect();

    Table {
        corner: TRANSITION_CORNER.to_string(),
        header,
        rows,
    }
}

/// Wrap the rendered matrix in a "Segment Transitions" section.
pub fn transitions_section(transitions: &TransitionMatrix) -> Section {
    Section::new("Segment Transitions").with_table(render_transition_matrix(transitions))
}

/// Check that the matrix is square and fully populated.
///
/// Every row must carry exactly one column per from-segment, and every
/// probability must lie in `[0, 1]`. Rows are not required to sum to 1.
pub fn validate_transitions(transitions: &TransitionMatrix) -> Result<()> {
    for (from, row) in transitions {
        let missing: Vec<&str> = transitions
            .keys()
            .filter(|to| !row.contains_key(*to))
            .map(String::as_str)
            .collect();
        let unexpected: Vec<&str> = row
            .keys()
            .filter(|to| !transitions.contains_key(*to))
            .map(String::as_str)
            .collect();

        if !missing.is_empty() || !unexpected.is_empty() {
            anyhow::bail!(
                "transition row '{from}' is malformed: missing [{}], unexpected [{}]",
                missing.join(", "),
                unexpected.join(", ")
            );
        }

        if let Some((to, p)) = row
            .iter()
            .find(|(_, p)| !p.is_finite() || **p < 0.0 || **p > 1.0)
        {
            anyhow::bail!("transition probability {from} -> {to} out of range: {p}");
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
