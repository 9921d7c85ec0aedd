//! Price-alert evaluation against a prior snapshot.
//!
//! Evaluation is a pure decision: the previous price comes from an external
//! lookup (the snapshot store in production, a map in tests) and delivery
//! happens elsewhere. This module only produces alert events.

use crate::core::config::Subscription;
use crate::core::quote::CommodityQuote;
use chrono::NaiveDate;
use tracing::debug;

/// Ephemeral alert event, handed to the delivery boundary and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAlert {
    pub name: String,
    pub category: String,
    pub current_price: f64,
    pub previous_price: f64,
    pub price_change: f64,
    pub percent_change: f64,
    pub daily_pct: f64,
    pub weekly_pct: f64,
    pub date: String,
}

/// Lookup seam for previously recorded prices, supplied by the persistence
/// collaborator.
pub trait PreviousPrice {
    /// The stored price for `(name, category)` on the given day, if any.
    fn price_on(&self, name: &str, category: &str, date: NaiveDate) -> Option<f64>;
}

/// Decides whether one quote fires an alert given its previous price.
/// Fires when the absolute percent change meets the threshold (`>=`).
/// A zero previous price reads as a zero percent change.
pub fn evaluate(
    quote: &CommodityQuote,
    previous_price: f64,
    min_percent_change: f64,
) -> Option<PriceAlert> {
    let price_change = quote.price - previous_price;
    let percent_change = if previous_price != 0.0 {
        price_change / previous_price * 100.0
    } else {
        0.0
    };

    if percent_change.abs() < min_percent_change {
        return None;
    }

    Some(PriceAlert {
        name: quote.name.clone(),
        category: quote.category.clone(),
        current_price: quote.price,
        previous_price,
        price_change,
        percent_change,
        daily_pct: quote.daily_pct,
        weekly_pct: quote.weekly_pct,
        date: quote.date.clone(),
    })
}

/// Evaluates every subscription against the current quote set and the prior
/// calendar day's snapshot. Subscriptions whose commodity is absent from the
/// quotes, or has no previous price recorded, are skipped for this cycle;
/// a skip is never a zero-change alert, and never aborts the batch.
pub fn evaluate_subscriptions<'a>(
    quotes: &[CommodityQuote],
    subscriptions: &'a [Subscription],
    lookup: &dyn PreviousPrice,
    today: NaiveDate,
) -> Vec<(&'a Subscription, PriceAlert)> {
    let previous_day = today - chrono::Duration::days(1);
    let mut fired = Vec::new();

    for subscription in subscriptions {
        let Some(quote) = quotes
            .iter()
            .find(|q| q.name.eq_ignore_ascii_case(&subscription.commodity))
        else {
            debug!("No quote for subscription {}", subscription.commodity);
            continue;
        };

        let Some(previous_price) = lookup.price_on(&quote.name, &quote.category, previous_day)
        else {
            debug!(
                "No previous price for {} ({}) on {}, skipping",
                quote.name, quote.category, previous_day
            );
            continue;
        };

        if let Some(alert) = evaluate(quote, previous_price, subscription.min_percent_change) {
            fired.push((subscription, alert));
        }
    }

    fired
}
