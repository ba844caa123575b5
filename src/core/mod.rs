//! Core engine types: players, dice, RNG, configuration, the ledger and its
//! persisted form.

pub mod config;
pub mod dice;
pub mod player;
pub mod rng;
pub mod snapshot;
pub mod state;

/// Currency amount. Signed so a transient overdraft is representable.
pub type Money = i64;

pub use config::GameConfig;
pub use dice::DiceRoll;
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::GameRng;
pub use snapshot::{GameSnapshot, GroupSnapshot, PlayerSnapshot, SnapshotError};
pub use state::{GameState, GroupDevelopment, PlayerLedger};
