//! Mood summary cards

use crate::model::{Sentiment, Summary};
use std::fmt::Write;

/// Share of entries with a sentiment, as a whole percentage.
///
/// `None` when there are no entries at all.
pub fn percentage(count: u64, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    Some(((count as f64 / total as f64) * 100.0).round() as u64)
}

/// One per-sentiment card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentimentCard {
    pub sentiment: Sentiment,
    pub count: u64,
    pub percent: Option<u64>,
}

/// The summary row of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryView {
    pub average: Sentiment,
    pub total: u64,
    pub cards: Vec<SentimentCard>,
}

impl SummaryView {
    pub fn from_summary(summary: &Summary) -> Self {
        let cards = Sentiment::all()
            .iter()
            .map(|&sentiment| {
                let count = summary.count(sentiment);
                SentimentCard {
                    sentiment,
                    count,
                    percent: percentage(count, summary.total),
                }
            })
            .collect();

        Self {
            average: summary.average_sentiment,
            total: summary.total,
            cards,
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Average Mood: {} {}   ({} total entries)",
            self.average.title(),
            self.average.symbol(),
            self.total
        );

        for card in &self.cards {
            let _ = write!(
                out,
                "  {} {:<9} {:>4}",
                card.sentiment.symbol(),
                card.sentiment.title(),
                card.count
            );
            if let Some(percent) = card.percent {
                let _ = write!(out, "   {}% of entries", percent);
            }
            out.push('\n');
        }

        out
    }
}
