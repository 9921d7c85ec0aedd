pub mod trading_economics;
pub mod util;

pub use trading_economics::{PageSource, TradingEconomicsSource};
