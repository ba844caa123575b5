//! Two-party trades.
//!
//! [`TradeOffer`] is a plain value. The engine validates an offer as a whole
//! and applies it atomically via `GameState::execute_trade_offer`.

pub mod offer;

pub use offer::{TradeOffer, TradeTiles};
