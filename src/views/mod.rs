//! Terminal Views
//!
//! Plain-text renderings of the dashboard pieces. Each takes data exactly as
//! the backend returned it; sentiment labels are only mapped to symbols and
//! chart levels, never recomputed.
//!
//! - [`summary`]: average mood card and per-sentiment counts
//! - [`chart`]: mood trend over time
//! - [`entry`]: entry cards and the entry list

pub mod chart;
pub mod entry;
pub mod summary;

pub use chart::{render_chart, trend_points, TrendPoint};
pub use entry::{format_date, render_card, render_entries, render_full};
pub use summary::{percentage, SentimentCard, SummaryView};

use crate::app::DashboardData;

/// Summary cards, mood chart and entry list, in dashboard order
pub fn render_dashboard(data: &DashboardData) -> String {
    let mut out = String::new();
    out.push_str(&SummaryView::from_summary(&data.summary).render());
    out.push('\n');
    out.push_str(&render_chart(&data.entries));
    out.push('\n');
    out.push_str(&render_entries(&data.entries));
    out
}
