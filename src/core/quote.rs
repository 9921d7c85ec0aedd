//! Core quote types and ranking outputs

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

/// One normalized commodity quote, produced once per table row during a
/// parse pass and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommodityQuote {
    /// Asset class set by the enclosing header row ("Unknown" until one is seen).
    pub category: String,
    pub name: String,
    pub unit: String,
    pub price: f64,
    /// Absolute price change.
    pub change: f64,
    pub daily_pct: f64,
    pub weekly_pct: f64,
    pub monthly_pct: f64,
    pub yearly_pct: f64,
    pub three_year_pct: f64,
    /// `YYYY/MM/DD`, or the original cell text if it could not be normalized.
    pub date: String,
}

/// A percent-change column of the source table, used to select ranking metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    ThreeYear,
}

impl Period {
    /// The four consensus periods considered for strong leads.
    pub const CONSENSUS: [Period; 4] =
        [Period::Daily, Period::Weekly, Period::Monthly, Period::Yearly];

    /// Reads this period's percent change from a quote.
    pub fn pct_of(&self, quote: &CommodityQuote) -> f64 {
        match self {
            Period::Daily => quote.daily_pct,
            Period::Weekly => quote.weekly_pct,
            Period::Monthly => quote.monthly_pct,
            Period::Yearly => quote.yearly_pct,
            Period::ThreeYear => quote.three_year_pct,
        }
    }

    /// Single-letter tag used in the strong-leads match column.
    pub fn tag(&self) -> &'static str {
        match self {
            Period::Daily => "D",
            Period::Weekly => "W",
            Period::Monthly => "M",
            Period::Yearly => "Y",
            Period::ThreeYear => "3Y",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Period::Daily => "Daily %",
                Period::Weekly => "Weekly %",
                Period::Monthly => "Monthly %",
                Period::Yearly => "Yearly %",
                Period::ThreeYear => "3-Year %",
            }
        )
    }
}

impl FromStr for Period {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "d" => Ok(Period::Daily),
            "weekly" | "w" => Ok(Period::Weekly),
            "monthly" | "m" => Ok(Period::Monthly),
            "yearly" | "y" => Ok(Period::Yearly),
            "3y" | "three-year" => Ok(Period::ThreeYear),
            _ => Err(anyhow::anyhow!("Invalid period: {}", s)),
        }
    }
}

/// A quote with its position in a ranking pass. Recomputed fresh each run,
/// never persisted as source of truth.
#[derive(Debug, Clone)]
pub struct RankedQuote {
    /// 1-based position in the global ordering.
    pub rank: usize,
    /// 1-based position among entries of the same category, counted in
    /// global order.
    pub rank_in_category: usize,
    pub quote: CommodityQuote,
}

/// A strong-leads consensus entry: the quote appears in the top 3 of at
/// least one consensus period within its category.
#[derive(Debug, Clone)]
pub struct StrongLead {
    pub rank: usize,
    pub rank_in_category: usize,
    pub quote: CommodityQuote,
    /// Number of consensus periods (1..=4) where the quote made the top 3.
    pub match_count: usize,
    pub matched_periods: Vec<Period>,
}

impl StrongLead {
    /// Renders the match column as the reports print it, e.g. `3/4 (D,W,M)`.
    pub fn match_label(&self) -> String {
        let tags: Vec<&str> = self.matched_periods.iter().map(Period::tag).collect();
        format!("{}/4 ({})", self.match_count, tags.join(","))
    }
}

/// A persisted strong-lead position for one day, the baseline for
/// next-day rank-change comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadRank {
    pub name: String,
    pub category: String,
    pub rank: usize,
}

impl From<&StrongLead> for LeadRank {
    fn from(lead: &StrongLead) -> Self {
        LeadRank {
            name: lead.quote.name.clone(),
            category: lead.quote.category.clone(),
            rank: lead.rank,
        }
    }
}

/// Per-category single-best candidates for each investment timeframe.
#[derive(Debug, Clone, Default)]
pub struct Opportunities {
    pub short_term: Vec<RankedQuote>,
    pub mid_term: Vec<RankedQuote>,
    pub long_term: Vec<RankedQuote>,
}
