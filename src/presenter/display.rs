//! Display tree produced by the presenter.
//!
//! The tree carries logical content only: ordered sections of label/value
//! pairs, optional tables, and nested subsections. All values are already
//! formatted strings, so any renderer (terminal, JSON, markup) can print them
//! verbatim.

use serde::Serialize;

/// Ordered list of sections under a title.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DisplayTree {
    pub title: String,
    pub sections: Vec<Section>,
}

impl DisplayTree {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            sections: Vec::new(),
        }
    }

    pub fn push(&mut self, section: Section) {
        self.sections.push(section);
    }

    /// Find a top-level section by title.
    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }
}

/// A titled group of items, with an optional table and nested subsections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub items: Vec<StatItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Section>,
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn push_item(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.items.push(StatItem {
            label: label.into(),
            value: value.into(),
        });
    }

    pub fn with_item(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.push_item(label, value);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    /// Look up an item value by label.
    pub fn value(&self, label: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|i| i.label == label)
            .map(|i| i.value.as_str())
    }

    /// Find a direct subsection by title.
    pub fn subsection(&self, title: &str) -> Option<&Section> {
        self.subsections.iter().find(|s| s.title == title)
    }

    /// True when the section has no items, no table and no subsections.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.table.is_none() && self.subsections.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

/// A labelled grid: one header row, then rows with a leading label cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    /// Text of the top-left cell.
    pub corner: String,
    pub header: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl Table {
    /// All data cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .flat_map(|r| r.cells.iter().map(String::as_str))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
