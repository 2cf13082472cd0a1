//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `segview render [FILE|-]` — decode a service payload and print its display tree
//! - `segview history` — recent renders from the render log
//! - `segview config show|init|set|reset` — configuration management

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::config::{self, OutputFormat};
use crate::history::{self, HistoryStats, RenderEvent};
use crate::payload::{Payload, PayloadKind};
use crate::presenter::format::group_digits;
use crate::presenter::{DisplayTree, Section, Table};

// ---------------------------------------------------------------------------
// segview render
// ---------------------------------------------------------------------------

/// Render a payload read from `input` (a path, or `-` for stdin).
///
/// `format` and `strict` fall back to the configured defaults. Every attempt
/// is appended to the render log, including failures.
pub fn run_render(
    input: &str,
    format: Option<OutputFormat>,
    kind: PayloadKind,
    strict: bool,
) -> Result<()> {
    let cfg = config::load();
    if !cfg.output.color {
        colored::control::set_override(false);
    }
    let format = format.unwrap_or(cfg.output.format);
    let strict = strict || cfg.validation.strict;

    match render_input(input, kind, strict) {
        Ok((payload, tree)) => {
            history::log_render(
                cfg.logging.enabled,
                &RenderEvent::succeeded(
                    input,
                    &payload.kind().to_string(),
                    tree.sections.len(),
                    payload.segment_count(),
                ),
            );
            print_tree(&tree, format)
        }
        Err(err) => {
            history::log_render(
                cfg.logging.enabled,
                &RenderEvent::failed(input, &kind.to_string(), &format!("{err:#}")),
            );
            Err(err)
        }
    }
}

fn render_input(input: &str, kind: PayloadKind, strict: bool) -> Result<(Payload, DisplayTree)> {
    let text = read_input(input)?;
    let payload = Payload::from_json(&text, kind)?;
    let tree = payload.render(strict)?;
    Ok((payload, tree))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read payload from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(input).with_context(|| format!("failed to read payload from {input}"))
    }
}

pub fn print_tree(tree: &DisplayTree, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Table => print!("{}", tree_table(tree)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(tree).context("failed to serialize display tree")?
        ),
        OutputFormat::Csv => print!("{}", tree_csv(tree)),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Table output
// ---------------------------------------------------------------------------

fn tree_table(tree: &DisplayTree) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", tree.title.bold().cyan()));
    out.push_str(&format!("{}\n", "=".repeat(60)));

    for section in &tree.sections {
        out.push('\n');
        write_section(&mut out, section, 0);
    }
    out
}

fn write_section(out: &mut String, section: &Section, depth: usize) {
    let indent = "  ".repeat(depth);
    let title = if depth == 0 {
        section.title.bold().cyan()
    } else {
        section.title.bold()
    };
    out.push_str(&format!("{indent}{title}\n"));

    let width = section
        .items
        .iter()
        .map(|i| i.label.chars().count())
        .max()
        .unwrap_or(0);
    for item in &section.items {
        out.push_str(&format!("{indent}  {:<width$}  {}\n", item.label, item.value));
    }

    if let Some(table) = &section.table {
        write_table(out, table, &indent);
    }

    for sub in &section.subsections {
        write_section(out, sub, depth + 1);
    }
}

fn write_table(out: &mut String, table: &Table, indent: &str) {
    let label_width = table
        .rows
        .iter()
        .map(|r| r.label.chars().count())
        .chain(std::iter::once(table.corner.chars().count()))
        .max()
        .unwrap_or(0);

    let columns = table
        .rows
        .iter()
        .map(|r| r.cells.len())
        .chain(std::iter::once(table.header.len()))
        .max()
        .unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|c| {
            let header = table.header.get(c).map_or(0, |h| h.chars().count());
            table
                .rows
                .iter()
                .filter_map(|r| r.cells.get(c))
                .map(|cell| cell.chars().count())
                .fold(header, usize::max)
        })
        .collect();

    let mut header_line = format!("{indent}  {:<label_width$}", table.corner);
    for (c, width) in widths.iter().enumerate() {
        let text = table.header.get(c).map_or("", String::as_str);
        header_line.push_str(&format!("  {text:>width$}"));
    }
    out.push_str(&format!("{}\n", header_line.bold()));

    let rule = label_width + widths.iter().map(|w| w + 2).sum::<usize>();
    out.push_str(&format!("{indent}  {}\n", "-".repeat(rule)));

    for (i, row) in table.rows.iter().enumerate() {
        let mut line = format!("{indent}  {:<label_width$}", row.label);
        for (c, width) in widths.iter().enumerate() {
            let text = row.cells.get(c).map_or("", String::as_str);
            line.push_str(&format!("  {text:>width$}"));
        }
        if i % 2 == 0 {
            out.push_str(&format!("{line}\n"));
        } else {
            out.push_str(&format!("{}\n", line.dimmed()));
        }
    }
}

// ---------------------------------------------------------------------------
// CSV output
// ---------------------------------------------------------------------------

fn tree_csv(tree: &DisplayTree) -> String {
    let mut out = String::from("section,label,value\n");
    for section in &tree.sections {
        write_section_csv(&mut out, section, &section.title);
    }
    out
}

fn write_section_csv(out: &mut String, section: &Section, path: &str) {
    for item in &section.items {
        push_csv_row(out, path, &item.label, &item.value);
    }

    if let Some(table) = &section.table {
        for row in &table.rows {
            for (to, cell) in table.header.iter().zip(&row.cells) {
                if cell.is_empty() {
                    continue;
                }
                push_csv_row(out, path, &format!("{} -> {}", row.label, to), cell);
            }
        }
    }

    for sub in &section.subsections {
        write_section_csv(out, sub, &format!("{path} / {}", sub.title));
    }
}

fn push_csv_row(out: &mut String, section: &str, label: &str, value: &str) {
    out.push_str(&format!(
        "{},{},{}\n",
        csv_field(section),
        csv_field(label),
        csv_field(value)
    ));
}

/// Quote a field if it contains a delimiter, quote or newline.
fn csv_field(s: &str) -> String {
    if s.contains([',', '"', '\n']) {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

// ---------------------------------------------------------------------------
// segview history
// ---------------------------------------------------------------------------

/// Show recent renders and totals from the render log.
pub fn run_history(limit: Option<usize>, format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let limit = limit.unwrap_or(cfg.logging.history_limit);

    let all = history::read_all();

    if all.is_empty() {
        println!(
            "{}",
            "No renders logged yet. Run `segview render` to record one.".yellow()
        );
        return Ok(());
    }

    let stats = history::build_stats(&all);
    let recent = history::recent(&all, limit);

    match format {
        OutputFormat::Json => print_history_json(&stats, &recent)?,
        OutputFormat::Csv => print_history_csv(&recent),
        OutputFormat::Table => print_history_table(&stats, &recent),
    }

    Ok(())
}

fn print_history_table(stats: &HistoryStats, recent: &[&RenderEvent]) {
    println!("{}", "segview Render History".bold().cyan());
    println!("{}", "=".repeat(60));
    println!();

    println!("  {} {}", "Total renders:".bold(), group_digits(&stats.total.to_string()));
    println!(
        "  {} {} ({:.1}%)",
        "Succeeded:    ".bold(),
        stats.succeeded,
        stats.success_pct()
    );
    println!("  {} {}", "Failed:       ".bold(), stats.failed);
    if !stats.by_kind.is_empty() {
        let kinds: Vec<String> = stats
            .by_kind
            .iter()
            .map(|(kind, count)| format!("{kind}: {count}"))
            .collect();
        println!("  {} {}", "By kind:      ".bold(), kinds.join("  "));
    }
    println!();

    println!("{}", "Recent Renders".bold().cyan());
    println!(
        "  {:<20} {:<24} {:<11} {:>8} {:>8}",
        "Time", "Source", "Kind", "Sections", "Segments"
    );
    println!("  {}", "-".repeat(75));

    for (i, event) in recent.iter().enumerate() {
        let line = format!(
            "  {:<20} {:<24} {:<11} {:>8} {:>8}",
            truncate(&event.timestamp, 19),
            truncate(&event.source, 24),
            event.kind,
            event.sections,
            event.segments.map_or_else(|| "-".to_string(), |n| n.to_string()),
        );

        if !event.success {
            let reason = event.error.as_deref().unwrap_or("failed");
            println!("{} {}", line.red(), truncate(reason, 60).dimmed());
        } else if i % 2 == 0 {
            println!("{line}");
        } else {
            println!("{}", line.dimmed());
        }
    }
}

fn print_history_json(stats: &HistoryStats, recent: &[&RenderEvent]) -> Result<()> {
    let value = serde_json::json!({
        "total": stats.total,
        "succeeded": stats.succeeded,
        "failed": stats.failed,
        "by_kind": stats.by_kind,
        "recent": recent,
    });
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn print_history_csv(recent: &[&RenderEvent]) {
    println!("timestamp,source,kind,sections,segments,success,error");
    for event in recent {
        println!(
            "{},{},{},{},{},{},{}",
            event.timestamp,
            csv_field(&event.source),
            event.kind,
            event.sections,
            event.segments.map_or_else(String::new, |n| n.to_string()),
            event.success,
            csv_field(event.error.as_deref().unwrap_or("")),
        );
    }
}

// ---------------------------------------------------------------------------
// segview config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective segview Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file().is_some_and(|p| p.exists());
    let project_exists = config::project_config_file().is_some_and(|p| p.exists());
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    print_source("~/.segview/config.toml", global_exists);
    print_source(".segview.toml", project_exists);
    println!(
        "  {} {}",
        "·".dimmed(),
        "SEGVIEW_* environment variables".dimmed()
    );

    Ok(())
}

fn print_source(name: &str, exists: bool) {
    if exists {
        println!("  {} {}", "✓".green(), name.dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), format!("{name} (not found)").dimmed());
    }
}

/// Initialize a default config file at `~/.segview/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Truncate a string to `max_len` characters, appending "…" if truncated.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::TableRow;

    fn sample_tree() -> DisplayTree {
        let mut tree = DisplayTree::new("Segmentation Results");
        let mut profiles = Section::new("Segment Profiles");
        profiles
            .subsections
            .push(Section::new("Segment 0").with_item("Income", "$50,000"));
        tree.push(Section::new("Segment Distribution").with_item("Segment 0", "10"));
        tree.push(profiles);
        tree.push(Section::new("Segment Transitions").with_table(Table {
            corner: "From / To".to_string(),
            header: vec!["A".to_string(), "B".to_string()],
            rows: vec![
                TableRow {
                    label: "A".to_string(),
                    cells: vec!["90.0%".to_string(), "10.0%".to_string()],
                },
                TableRow {
                    label: "B".to_string(),
                    cells: vec!["20.0%".to_string(), "80.0%".to_string()],
                },
            ],
        }));
        tree
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 5), "hell…");
        assert_eq!(truncate("ab", 2), "ab");
    }

    #[test]
    fn test_csv_field_quoting() {
        assert_eq!(csv_field("plain"), "plain");
        assert_eq!(csv_field("$50,000"), "\"$50,000\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_csv_flattens_sections_and_tables() {
        let csv = tree_csv(&sample_tree());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "section,label,value");
        assert!(lines.contains(&"Segment Distribution,Segment 0,10"));
        assert!(lines.contains(&"Segment Profiles / Segment 0,Income,\"$50,000\""));
        assert!(lines.contains(&"Segment Transitions,A -> B,10.0%"));
        assert!(lines.contains(&"Segment Transitions,B -> A,20.0%"));
    }

    #[test]
    fn test_csv_keys_transition_cells_by_column() {
        use crate::model::TransitionMatrix;
        use crate::presenter::transitions::transitions_section;

        let ragged: TransitionMatrix =
            serde_json::from_str(r#"{"A": {"A": 1.0}, "B": {"B": 0.25, "A": 0.75}}"#).unwrap();
        let mut tree = DisplayTree::new("Transitions");
        tree.push(transitions_section(&ragged));

        let csv = tree_csv(&tree);
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[1..],
            [
                "Segment Transitions,A -> A,100.0%",
                "Segment Transitions,B -> A,75.0%",
                "Segment Transitions,B -> B,25.0%",
            ]
        );
    }

    #[test]
    fn test_table_output_contains_all_content() {
        colored::control::set_override(false);
        let table = tree_table(&sample_tree());

        assert!(table.starts_with("Segmentation Results\n"));
        assert!(table.contains("  Segment 0  10\n"));
        assert!(table.contains("    Income  $50,000\n"));
        assert!(table.contains("From / To"));
        assert!(table.contains("90.0%"));
        assert!(table.contains("80.0%"));
    }
}
