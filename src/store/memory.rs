use crate::core::alert::PreviousPrice;
use crate::core::quote::{CommodityQuote, LeadRank};
use crate::store::{SnapshotStore, key_for};
use anyhow::Result;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory snapshot store used by tests and as a fallback when no data
/// directory can be resolved.
#[derive(Default)]
pub struct MemorySnapshots {
    inner: RwLock<HashMap<String, CommodityQuote>>,
    leads: RwLock<HashMap<String, Vec<LeadRank>>>,
}

impl MemorySnapshots {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshots {
    fn save_day(&self, date: NaiveDate, quotes: &[CommodityQuote]) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        for quote in quotes {
            inner.insert(key_for(date, &quote.category, &quote.name), quote.clone());
        }
        Ok(())
    }

    fn quote_on(&self, name: &str, category: &str, date: NaiveDate) -> Option<CommodityQuote> {
        let inner = self.inner.read().unwrap();
        inner.get(&key_for(date, category, name)).cloned()
    }

    fn save_lead_ranks(&self, date: NaiveDate, ranks: &[LeadRank]) -> Result<()> {
        let mut leads = self.leads.write().unwrap();
        leads.insert(date.format("%Y-%m-%d").to_string(), ranks.to_vec());
        Ok(())
    }

    fn lead_ranks_on(&self, date: NaiveDate) -> Vec<LeadRank> {
        let leads = self.leads.read().unwrap();
        leads
            .get(&date.format("%Y-%m-%d").to_string())
            .cloned()
            .unwrap_or_default()
    }
}

impl PreviousPrice for MemorySnapshots {
    fn price_on(&self, name: &str, category: &str, date: NaiveDate) -> Option<f64> {
        self.quote_on(name, category, date).map(|q| q.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(category: &str, name: &str, price: f64) -> CommodityQuote {
        CommodityQuote {
            category: category.to_string(),
            name: name.to_string(),
            unit: String::new(),
            price,
            change: 0.0,
            daily_pct: 0.0,
            weekly_pct: 0.0,
            monthly_pct: 0.0,
            yearly_pct: 0.0,
            three_year_pct: 0.0,
            date: String::new(),
        }
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemorySnapshots::new();
        let day = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();

        store
            .save_day(day, &[quote("Energy", "Crude Oil", 70.5)])
            .unwrap();

        let stored = store.quote_on("Crude Oil", "Energy", day).unwrap();
        assert_eq!(stored.price, 70.5);
        assert_eq!(store.price_on("Crude Oil", "Energy", day), Some(70.5));
        assert!(store.price_on("Crude Oil", "Metals", day).is_none());
    }

    #[test]
    fn test_lead_ranks_keyed_by_day() {
        let store = MemorySnapshots::new();
        let day = NaiveDate::from_ymd_opt(2025, 11, 27).unwrap();
        let ranks = vec![LeadRank {
            name: "Gold".to_string(),
            category: "Metals".to_string(),
            rank: 1,
        }];

        store.save_lead_ranks(day, &ranks).unwrap();

        assert_eq!(store.lead_ranks_on(day), ranks);
        assert!(store.lead_ranks_on(day.succ_opt().unwrap()).is_empty());
    }
}
