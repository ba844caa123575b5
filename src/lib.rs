//! # rust-monopoly
//!
//! A property-trading board game engine for automated agents and tournaments.
//!
//! ## Design Principles
//!
//! 1. **Validate, Then Mutate**: Every mutation has a pure validator. The
//!    engine calls it first and touches nothing on rejection.
//!
//! 2. **N-Player First**: 2-8 seats, every API takes a `PlayerId`.
//!
//! 3. **Configuration Over Convention**: Rule constants live in `GameConfig`,
//!    tile data in a `Board` catalog.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs`, so agents can
//!   ask speculatively and multi-step operations commit atomically.
//!
//! - **Owner Index**: A tile -> owner map kept in step with every player's
//!   owned list; rent lookups never scan players.
//!
//! - **Group Development**: Buildings are tracked per color group; every
//!   member carries the same level.
//!
//! ## Modules
//!
//! - `core`: Players, dice, RNG, configuration, the ledger and snapshots
//! - `board`: Tiles, color groups, the static catalog
//! - `rules`: Validation gate, engine mutators, commands, rent, invariants
//! - `trade`: Trade offers
//! - `bankruptcy`: Liquidation plans and the greedy resolver
//! - `agents`: The agent contract and reference agents
//! - `games`: The classic turn loop

pub mod agents;
pub mod bankruptcy;
pub mod board;
pub mod core;
pub mod games;
pub mod rules;
pub mod trade;

// Re-export commonly used types
pub use crate::core::{
    DiceRoll, GameConfig, GameRng, GameSnapshot, GameState, Money, Player, PlayerId, PlayerMap,
    SnapshotError,
};

pub use crate::board::{Board, BoardError, PropertyGroup, SpecialKind, Tile, TileId};

pub use crate::rules::{
    rent_due, Command, DevelopmentBlock, EngineResult, GameError, Outcome, RentContext, TradeViolation,
};

pub use crate::trade::TradeOffer;

pub use crate::bankruptcy::{
    AssetValuation, BankruptcyRequest, BankruptcyResolver, FnValuation, PriceValuation, Resolution, ResolverConfig,
};

pub use crate::agents::{Agent, GreedyAgent, RandomAgent};

pub use crate::games::{ClassicMatch, ClassicMatchBuilder, MatchConfig, MatchResult};
