use crate::core::alert::PreviousPrice;
use crate::core::quote::{CommodityQuote, LeadRank};
use crate::store::{SnapshotStore, key_for};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle};
use std::path::Path;
use tracing::debug;

/// fjall-backed snapshot store. Quotes and lead ranks are stored as JSON
/// values under `date/category/name` keys, one partition each.
pub struct DiskSnapshots {
    _keyspace: Keyspace,
    quotes: PartitionHandle,
    leads: PartitionHandle,
}

impl DiskSnapshots {
    pub fn open(path: &Path) -> Result<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = Config::new(path.join("snapshots"))
            .open()
            .context("Failed to open snapshot keyspace")?;
        let quotes = keyspace
            .open_partition("quotes", PartitionCreateOptions::default())
            .context("Failed to open quotes partition")?;
        let leads = keyspace
            .open_partition("leads", PartitionCreateOptions::default())
            .context("Failed to open leads partition")?;

        Ok(DiskSnapshots {
            _keyspace: keyspace,
            quotes,
            leads,
        })
    }
}

impl SnapshotStore for DiskSnapshots {
    fn save_day(&self, date: NaiveDate, quotes: &[CommodityQuote]) -> Result<()> {
        for quote in quotes {
            let key = key_for(date, &quote.category, &quote.name);
            let value = serde_json::to_vec(quote)?;
            self.quotes
                .insert(key.as_bytes(), value)
                .with_context(|| format!("Failed to store snapshot for {key}"))?;
        }
        debug!("Saved {} quotes for {}", quotes.len(), date);
        Ok(())
    }

    fn quote_on(&self, name: &str, category: &str, date: NaiveDate) -> Option<CommodityQuote> {
        let key = key_for(date, category, name);
        match self.quotes.get(key.as_bytes()) {
            Ok(Some(value)) => serde_json::from_slice(&value).ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("Snapshot read failed for {}: {}", key, e);
                None
            }
        }
    }

    fn save_lead_ranks(&self, date: NaiveDate, ranks: &[LeadRank]) -> Result<()> {
        for rank in ranks {
            let key = key_for(date, &rank.category, &rank.name);
            let value = serde_json::to_vec(rank)?;
            self.leads
                .insert(key.as_bytes(), value)
                .with_context(|| format!("Failed to store lead rank for {key}"))?;
        }
        debug!("Saved {} lead ranks for {}", ranks.len(), date);
        Ok(())
    }

    fn lead_ranks_on(&self, date: NaiveDate) -> Vec<LeadRank> {
        let prefix = format!("{}/", date.format("%Y-%m-%d"));
        self.leads
            .prefix(prefix.as_bytes())
            .filter_map(|entry| match entry {
                Ok((_, value)) => serde_json::from_slice(&value).ok(),
                Err(e) => {
                    debug!("Lead rank scan failed for {}: {}", date, e);
                    None
                }
            })
            .collect()
    }
}

impl PreviousPrice for DiskSnapshots {
    fn price_on(&self, name: &str, category: &str, date: NaiveDate) -> Option<f64> {
        self.quote_on(name, category, date).map(|q| q.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn quote(name: &str, price: f64) -> CommodityQuote {
        CommodityQuote {
            category: "Metals".to_string(),
            name: name.to_string(),
            unit: "USD/t.oz".to_string(),
            price,
            change: 0.0,
            daily_pct: 0.0,
            weekly_pct: 0.0,
            monthly_pct: 0.0,
            yearly_pct: 0.0,
            three_year_pct: 0.0,
            date: "2025/11/28".to_string(),
        }
    }

    #[test]
    fn test_save_and_lookup_by_day() {
        let dir = tempdir().unwrap();
        let store = DiskSnapshots::open(dir.path()).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();

        store.save_day(day, &[quote("Gold", 2000.0), quote("Silver", 24.0)]).unwrap();

        assert_eq!(store.price_on("Gold", "Metals", day), Some(2000.0));
        assert_eq!(store.price_on("Silver", "Metals", day), Some(24.0));
        assert!(store.price_on("Gold", "Energy", day).is_none());
        assert!(
            store
                .price_on("Gold", "Metals", day.succ_opt().unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_resaving_a_day_overwrites() {
        let dir = tempdir().unwrap();
        let store = DiskSnapshots::open(dir.path()).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();

        store.save_day(day, &[quote("Gold", 2000.0)]).unwrap();
        store.save_day(day, &[quote("Gold", 2010.0)]).unwrap();

        assert_eq!(store.price_on("Gold", "Metals", day), Some(2010.0));
    }

    #[test]
    fn test_lead_ranks_roundtrip_per_day() {
        let dir = tempdir().unwrap();
        let store = DiskSnapshots::open(dir.path()).unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();

        let ranks = vec![
            LeadRank {
                name: "Gold".to_string(),
                category: "Metals".to_string(),
                rank: 1,
            },
            LeadRank {
                name: "Silver".to_string(),
                category: "Metals".to_string(),
                rank: 2,
            },
        ];
        store.save_lead_ranks(day, &ranks).unwrap();

        let mut stored = store.lead_ranks_on(day);
        stored.sort_by_key(|r| r.rank);
        assert_eq!(stored, ranks);
        assert!(store.lead_ranks_on(day.succ_opt().unwrap()).is_empty());
    }

    #[test]
    fn test_snapshots_survive_reopen() {
        let dir = tempdir().unwrap();
        let day = NaiveDate::from_ymd_opt(2025, 11, 28).unwrap();

        {
            let store = DiskSnapshots::open(dir.path()).unwrap();
            store.save_day(day, &[quote("Gold", 2000.0)]).unwrap();
        }

        let store = DiskSnapshots::open(dir.path()).unwrap();
        assert_eq!(store.price_on("Gold", "Metals", day), Some(2000.0));
    }
}
