//! Core parsing, ranking and alerting logic

pub mod alert;
pub mod config;
pub mod log;
pub mod quote;
pub mod ranking;
pub mod table;
pub mod text;

// Re-export main types for cleaner imports
pub use alert::{PreviousPrice, PriceAlert};
pub use quote::{CommodityQuote, LeadRank, Opportunities, Period, RankedQuote, StrongLead};
