//! Rules: the validation gate and the engine behind it.
//!
//! - `validation`: one pure predicate per mutation
//! - `engine`: the `GameState` mutators, each gated by its validator
//! - `command`: mutations as data, with `validate` / `apply`
//! - `rent`: the rent formula
//! - `invariants`: ledger consistency audit
//! - `error`: the closed rejection taxonomy

pub mod command;
pub mod engine;
pub mod error;
pub mod invariants;
pub mod rent;
pub mod validation;

pub use command::{Command, Outcome};
pub use error::{AssetRef, DevelopmentBlock, EngineResult, GameError, TradeViolation};
pub use invariants::InvariantViolation;
pub use rent::{rent_due, RentContext};
