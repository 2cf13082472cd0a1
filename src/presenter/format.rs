//! Metric label and value formatting.
//!
//! Both functions are total: they accept any key and any JSON value and never
//! fail. Numbers print the way a JavaScript template literal prints them
//! (`12`, `34.5`), strings print without quotes.

use serde_json::Value;

/// Turn a snake_case metric key into a title-cased label.
///
/// Splits on `_`, upper-cases the first character of each token and joins
/// the tokens with a single space: `"avg_time_spent"` → `"Avg Time Spent"`.
pub fn format_metric_name(key: &str) -> String {
    key.split('_')
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Format a metric value according to its key.
///
/// The key is matched by substring in a fixed order and the first match
/// wins, so `"average_income_frequency"` is formatted as income:
///
/// | key contains    | output                      |
/// |-----------------|-----------------------------|
/// | `income`        | `$` + grouped number        |
/// | `age`           | `<value> years`             |
/// | `frequency`     | `<value>/year`              |
/// | `last_purchase` | `<value> days`              |
/// | anything else   | the value, unchanged        |
pub fn format_metric_value(key: &str, value: &Value) -> String {
    if key.contains("income") {
        let amount = match value {
            Value::Number(_) => value.as_f64().map(group_number),
            _ => None,
        };
        return format!("${}", amount.unwrap_or_else(|| display_value(value)));
    }

    let raw = display_value(value);
    if key.contains("age") {
        return format!("{raw} years");
    }
    if key.contains("frequency") {
        return format!("{raw}/year");
    }
    if key.contains("last_purchase") {
        return format!("{raw} days");
    }
    raw
}

/// Convenience wrapper for callers holding a plain number.
pub fn format_metric_number(key: &str, value: f64) -> String {
    let value = serde_json::Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null);
    format_metric_value(key, &value)
}

/// Render a JSON value as display text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.to_string()
            } else if let Some(u) = n.as_u64() {
                u.to_string()
            } else {
                n.as_f64().map(display_number).unwrap_or_else(|| n.to_string())
            }
        }
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

/// Print a float without a trailing `.0` when it is whole.
pub fn display_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.fract() == 0.0 && n.abs() < 1e21 {
        return format!("{n:.0}");
    }
    n.to_string()
}

/// Group a number the way an en-US locale does: comma thousands separators
/// and at most three fraction digits, trailing zeros dropped.
pub fn group_number(n: f64) -> String {
    if !n.is_finite() {
        return display_number(n);
    }

    let fixed = format!("{:.3}", n.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::new();
    if n < 0.0 && (int_part != "0" || !frac.is_empty()) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Insert comma separators into a run of ASCII digits.
pub fn group_digits(digits: &str) -> String {
    let mut result = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Format a 0–1 fraction as a percentage with one decimal place.
pub fn format_fraction_percent(fraction: f64) -> String {
    format!("{}%", to_fixed_1(fraction * 100.0))
}

/// One fixed decimal, ties rounded away from zero (`2.25` → `"2.3"`).
///
/// `{:.1}` alone rounds exact binary ties to even.
pub fn to_fixed_1(n: f64) -> String {
    if !n.is_finite() {
        return display_number(n);
    }
    format!("{:.1}", (n * 10.0).round() / 10.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
