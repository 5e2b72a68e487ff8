//! Mood trend chart
//!
//! One column per entry, oldest on the left, with the entry's sentiment
//! plotted on a three-level axis (Negative=0, Neutral=1, Positive=2).

use crate::model::{Entry, Sentiment};
use serde::Serialize;

const TITLE: &str = "Mood Trends Over Time";
const EMPTY: &str = "No data to display yet";
const MARKER: char = '●';
const COLUMN_WIDTH: usize = 8;

/// A single plotted entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    /// Short date label, e.g. "May 1"
    pub date: String,
    pub mood: u8,
    pub sentiment: Sentiment,
}

/// Chart points in chronological order.
///
/// Entries arrive newest first from the backend, so the list is reversed.
pub fn trend_points(entries: &[Entry]) -> Vec<TrendPoint> {
    entries
        .iter()
        .rev()
        .map(|entry| TrendPoint {
            date: entry.created_at.format("%b %-d").to_string(),
            mood: entry.sentiment.mood_level(),
            sentiment: entry.sentiment,
        })
        .collect()
}

pub fn render_chart(entries: &[Entry]) -> String {
    let mut out = format!("{}\n", TITLE);

    if entries.is_empty() {
        out.push_str(&format!("  {}\n", EMPTY));
        return out;
    }

    let points = trend_points(entries);
    let label_width = Sentiment::all().iter().map(|s| s.title().len()).max().unwrap_or(0);

    for level in Sentiment::all() {
        let mut row = format!("{:>width$} |", level.title(), width = label_width);
        for point in &points {
            let cell = if point.mood == level.mood_level() {
                MARKER.to_string()
            } else {
                " ".to_string()
            };
            row.push_str(&format!("{:^width$}", cell, width = COLUMN_WIDTH));
        }
        out.push_str(row.trim_end());
        out.push('\n');
    }

    out.push_str(&format!(
        "{} +{}\n",
        " ".repeat(label_width),
        "-".repeat(points.len() * COLUMN_WIDTH)
    ));

    let mut axis = format!("{}  ", " ".repeat(label_width));
    for point in &points {
        axis.push_str(&format!("{:^width$}", point.date, width = COLUMN_WIDTH));
    }
    out.push_str(axis.trim_end());
    out.push('\n');

    out
}
