//! Ranking passes over a parsed quote set.
//!
//! All functions are pure: they group by category in first-seen order, sort
//! by the chosen metric descending with ties kept in input order, and return
//! fresh output on every call. Empty input yields empty output everywhere.

use crate::core::quote::{CommodityQuote, LeadRank, Opportunities, Period, RankedQuote, StrongLead};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Distinct categories in first-seen order.
pub fn categories(quotes: &[CommodityQuote]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for quote in quotes {
        if seen.insert(quote.category.as_str()) {
            out.push(quote.category.clone());
        }
    }
    out
}

// Descending by metric; sort_by is stable so ties keep input order.
fn sort_by_metric_desc(quotes: &mut [&CommodityQuote], metric: Period) {
    quotes.sort_by(|a, b| {
        metric
            .pct_of(b)
            .partial_cmp(&metric.pct_of(a))
            .unwrap_or(Ordering::Equal)
    });
}

/// Global top-`n` quotes by the given metric, descending.
pub fn top_by_metric(quotes: &[CommodityQuote], metric: Period, n: usize) -> Vec<CommodityQuote> {
    let mut refs: Vec<&CommodityQuote> = quotes.iter().collect();
    sort_by_metric_desc(&mut refs, metric);
    refs.into_iter().take(n).cloned().collect()
}

/// Top-`n` per category by the given metric, category blocks concatenated
/// in first-seen order.
pub fn top_by_category(quotes: &[CommodityQuote], metric: Period, n: usize) -> Vec<CommodityQuote> {
    let mut out = Vec::new();
    for category in categories(quotes) {
        let mut refs: Vec<&CommodityQuote> = quotes
            .iter()
            .filter(|q| q.category == category)
            .collect();
        sort_by_metric_desc(&mut refs, metric);
        out.extend(refs.into_iter().take(n).cloned());
    }
    out
}

/// Names making the category's top 3 for one period.
fn top3_names(category_quotes: &[&CommodityQuote], period: Period) -> HashSet<String> {
    let mut refs = category_quotes.to_vec();
    sort_by_metric_desc(&mut refs, period);
    refs.into_iter().take(3).map(|q| q.name.clone()).collect()
}

/// Strong-leads consensus: within each category, any quote in the top 3 of
/// at least one of the daily/weekly/monthly/yearly periods qualifies.
///
/// Qualifying entries are ordered globally by a two-stage key: entries
/// matching a single period sort on (match count, daily %, weekly %), the
/// rest on (match count, weekly %, monthly %), descending, ties in input
/// order. Ranks are 1-based positions in that final order; the per-category
/// rank is a running counter applied in the same order.
pub fn strong_leads(quotes: &[CommodityQuote]) -> Vec<StrongLead> {
    let mut leads: Vec<StrongLead> = Vec::new();

    for category in categories(quotes) {
        let category_quotes: Vec<&CommodityQuote> = quotes
            .iter()
            .filter(|q| q.category == category)
            .collect();

        let tops: Vec<(Period, HashSet<String>)> = Period::CONSENSUS
            .iter()
            .map(|p| (*p, top3_names(&category_quotes, *p)))
            .collect();

        // Union of the per-period top-3 sets, kept in the category's
        // original row order.
        for quote in &category_quotes {
            let matched_periods: Vec<Period> = tops
                .iter()
                .filter(|(_, names)| names.contains(&quote.name))
                .map(|(period, _)| *period)
                .collect();
            if matched_periods.is_empty() {
                continue;
            }
            leads.push(StrongLead {
                rank: 0,
                rank_in_category: 0,
                quote: (*quote).clone(),
                match_count: matched_periods.len(),
                matched_periods,
            });
        }
    }

    leads.sort_by(|a, b| {
        lead_sort_key(b)
            .partial_cmp(&lead_sort_key(a))
            .unwrap_or(Ordering::Equal)
    });

    assign_ranks(&mut leads, |lead| lead.quote.category.clone(), |lead, rank, in_cat| {
        lead.rank = rank;
        lead.rank_in_category = in_cat;
    });

    debug!("{} strong leads across {} categories", leads.len(), categories(quotes).len());
    leads
}

fn lead_sort_key(lead: &StrongLead) -> (usize, f64, f64) {
    if lead.match_count == 1 {
        (lead.match_count, lead.quote.daily_pct, lead.quote.weekly_pct)
    } else {
        (lead.match_count, lead.quote.weekly_pct, lead.quote.monthly_pct)
    }
}

/// Per-category single-best candidates per timeframe. A category
/// contributes nothing to a bucket when no quote satisfies the bucket's
/// dual-positive condition; on a metric tie the earlier row wins.
pub fn investment_opportunities(quotes: &[CommodityQuote]) -> Opportunities {
    let mut opportunities = Opportunities::default();

    for category in categories(quotes) {
        let category_quotes: Vec<&CommodityQuote> = quotes
            .iter()
            .filter(|q| q.category == category)
            .collect();

        // Short-term: momentum right now, confirmed by the week.
        if let Some(best) = best_where(
            &category_quotes,
            |q| q.daily_pct > 0.0 && q.weekly_pct > 0.0,
            Period::Daily,
        ) {
            opportunities.short_term.push(unranked(best));
        }

        // Mid-term: sustained weekly momentum, confirmed by the month.
        if let Some(best) = best_where(
            &category_quotes,
            |q| q.weekly_pct > 0.0 && q.monthly_pct > 0.0,
            Period::Weekly,
        ) {
            opportunities.mid_term.push(unranked(best));
        }

        // Long-term: yearly trend, confirmed by the month.
        if let Some(best) = best_where(
            &category_quotes,
            |q| q.yearly_pct > 0.0 && q.monthly_pct > 0.0,
            Period::Yearly,
        ) {
            opportunities.long_term.push(unranked(best));
        }
    }

    for bucket in [
        &mut opportunities.short_term,
        &mut opportunities.mid_term,
        &mut opportunities.long_term,
    ] {
        assign_ranks(bucket, |entry| entry.quote.category.clone(), |entry, rank, in_cat| {
            entry.rank = rank;
            entry.rank_in_category = in_cat;
        });
    }

    opportunities
}

/// A strong lead whose global rank moved since the previous baseline.
#[derive(Debug, Clone)]
pub struct RankChange {
    pub current: StrongLead,
    pub previous_rank: usize,
}

impl RankChange {
    /// Positions gained since the baseline; negative means the lead fell.
    pub fn delta(&self) -> i64 {
        self.previous_rank as i64 - self.current.rank as i64
    }
}

/// Compares today's strong leads against a previous day's persisted ranks
/// and returns the biggest movers, largest absolute change first, at most
/// `limit` entries.
///
/// Leads with no baseline entry (new entrants) and leads whose rank did not
/// move are excluded.
pub fn rank_changes(
    current: &[StrongLead],
    previous: &[LeadRank],
    limit: usize,
) -> Vec<RankChange> {
    let baseline: HashMap<(&str, &str), usize> = previous
        .iter()
        .map(|r| ((r.name.as_str(), r.category.as_str()), r.rank))
        .collect();

    let mut changes: Vec<RankChange> = current
        .iter()
        .filter_map(|lead| {
            let previous_rank = *baseline
                .get(&(lead.quote.name.as_str(), lead.quote.category.as_str()))?;
            if previous_rank == lead.rank {
                return None;
            }
            Some(RankChange {
                current: lead.clone(),
                previous_rank,
            })
        })
        .collect();

    changes.sort_by_key(|c| std::cmp::Reverse(c.delta().abs()));
    changes.truncate(limit);
    changes
}

fn unranked(quote: &CommodityQuote) -> RankedQuote {
    RankedQuote {
        rank: 0,
        rank_in_category: 0,
        quote: quote.clone(),
    }
}

fn best_where<'a>(
    quotes: &[&'a CommodityQuote],
    condition: impl Fn(&CommodityQuote) -> bool,
    metric: Period,
) -> Option<&'a CommodityQuote> {
    let mut best: Option<&CommodityQuote> = None;
    for quote in quotes {
        if !condition(quote) {
            continue;
        }
        // Strict comparison keeps the first of equals.
        if best.is_none_or(|b| metric.pct_of(quote) > metric.pct_of(b)) {
            best = Some(quote);
        }
    }
    best
}

/// Walks entries in final order, assigning the 1-based global rank and a
/// running per-category counter.
fn assign_ranks<T>(
    entries: &mut [T],
    category_of: impl Fn(&T) -> String,
    set: impl Fn(&mut T, usize, usize),
) {
    let mut per_category: HashMap<String, usize> = HashMap::new();
    for (i, entry) in entries.iter_mut().enumerate() {
        let counter = per_category.entry(category_of(entry)).or_insert(0);
        *counter += 1;
        let in_category = *counter;
        set(entry, i + 1, in_category);
    }
}
