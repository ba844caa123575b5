//! Classic rules driver.
//!
//! A reference turn loop over the engine: jail handling, dice, landing
//! resolution (purchase, rent, taxes, Chance and Community Chest), agent asset
//! management and trades. Debts beyond a player's cash go to their agent's
//! liquidation plan; a player who still cannot pay is eliminated.
//!
//! Supports 2-8 players.

mod cards;
mod game;

pub use cards::{Card, CardEffect, Deck};
pub use game::{ClassicMatch, ClassicMatchBuilder, MatchConfig, MatchError, MatchResult};
