use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// One `<item>` of the CBO cost-estimate feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedItem {
    pub bill_number: Option<String>,
    pub link: String,
    pub title: String,
    pub date: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub date: DateTime<FixedOffset>,
    pub title: String,
    pub bill_url: String,
    /// Cost estimate link as published in the CBO feed.
    pub link: String,
    /// First cost estimate URL the CDG API lists for the bill.
    pub cdg_cost_estimate_url: Option<String>,
    pub cost_estimate_present: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub congress: u32,
    /// Publication day the rows were filtered to.
    pub published_on: NaiveDate,
    pub rows: Vec<ReportRow>,
}

impl Report {
    pub fn total_new(&self) -> usize {
        self.rows.len()
    }

    pub fn total_missing(&self) -> usize {
        self.rows
            .iter()
            .filter(|row| !row.cost_estimate_present)
            .count()
    }
}

/// Result of a complete run, handed back to the binary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub output_path: String,
    pub total_new: usize,
    pub total_missing: usize,
}
