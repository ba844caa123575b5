//! Bankruptcy: liquidation plans and the resolver that builds them.
//!
//! When a player owes more than they hold, [`BankruptcyResolver`] produces a
//! [`BankruptcyRequest`] of downgrades and mortgages. The engine replays it
//! through its ordinary mutators with `GameState::complete_bankruptcy_request`.
//! A [`Resolution::Insolvent`] result means the caller must eliminate the
//! player.

pub mod request;
pub mod resolver;
pub mod valuation;

pub use request::BankruptcyRequest;
pub use resolver::{BankruptcyResolver, Resolution, ResolverConfig};
pub use valuation::{AssetValuation, FnValuation, PriceValuation};
