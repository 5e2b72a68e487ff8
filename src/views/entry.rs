//! Entry cards

use crate::model::Entry;
use chrono::{DateTime, Utc};
use std::fmt::Write;

const EMPTY: &str = "No entries yet. Start your journey!";
const CONTENT_LINES: usize = 3;

/// Long date, e.g. "May 1, 2024"
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%B %-d, %Y").to_string()
}

pub fn render_card(entry: &Entry) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "#{} {}  [{} {}]",
        entry.id,
        entry.title,
        entry.sentiment.symbol(),
        entry.sentiment
    );
    let _ = writeln!(out, "    {}", format_date(&entry.created_at));

    let lines: Vec<&str> = entry.content.lines().collect();
    for line in lines.iter().take(CONTENT_LINES) {
        let _ = writeln!(out, "    {}", line);
    }
    if lines.len() > CONTENT_LINES {
        out.push_str("    ...\n");
    }

    out
}

/// Full text of one entry, as shown by `journal show`
pub fn render_full(entry: &Entry) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", entry.title);
    let _ = writeln!(
        out,
        "{} | {} {}",
        format_date(&entry.created_at),
        entry.sentiment.symbol(),
        entry.sentiment
    );
    if let Some(updated) = entry.updated_at.filter(|u| *u != entry.created_at) {
        let _ = writeln!(out, "Updated {}", format_date(&updated));
    }
    out.push('\n');
    out.push_str(&entry.content);
    if !entry.content.ends_with('\n') {
        out.push('\n');
    }
    out
}

pub fn render_entries(entries: &[Entry]) -> String {
    if entries.is_empty() {
        return format!("{}\n", EMPTY);
    }
    entries
        .iter()
        .map(render_card)
        .collect::<Vec<_>>()
        .join("\n")
}
