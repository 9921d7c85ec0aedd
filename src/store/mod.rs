pub mod disk;
pub mod memory;

use crate::core::alert::PreviousPrice;
use crate::core::quote::{CommodityQuote, LeadRank};
use anyhow::Result;
use chrono::NaiveDate;

/// Daily snapshot persistence: one stored quote per `(date, category, name)`,
/// plus the day's strong-lead ranks. Supplies the previous-price lookup the
/// alert evaluator needs and the rank baseline for the leads report.
pub trait SnapshotStore: PreviousPrice + Send + Sync {
    /// Persists the full quote set for one calendar day. Re-saving a day
    /// overwrites its quotes.
    fn save_day(&self, date: NaiveDate, quotes: &[CommodityQuote]) -> Result<()>;

    /// The stored quote for `(name, category)` on the given day, if any.
    fn quote_on(&self, name: &str, category: &str, date: NaiveDate) -> Option<CommodityQuote>;

    /// Persists the day's strong-lead ranks; re-saving overwrites.
    fn save_lead_ranks(&self, date: NaiveDate, ranks: &[LeadRank]) -> Result<()>;

    /// Every lead rank stored for the given day; empty when none were saved.
    fn lead_ranks_on(&self, date: NaiveDate) -> Vec<LeadRank>;
}

pub(crate) fn key_for(date: NaiveDate, category: &str, name: &str) -> String {
    format!("{}/{}/{}", date.format("%Y-%m-%d"), category, name)
}
