//! Rules configuration.
//!
//! The classic rule constants live here rather than in the engine so tournaments
//! can run house-rule variants without touching mutator code.

use serde::{Deserialize, Serialize};

use super::Money;

/// Match-wide rule constants.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameConfig {
    /// Cash each player starts with.
    pub starting_balance: Money,

    /// Income for passing or landing on Go.
    pub pass_go_income: Money,

    /// Fine to leave jail.
    pub jail_fine: Money,

    /// Turns a player may stay in jail before the fine is forced.
    pub max_turns_in_jail: u8,

    /// Get-out-of-jail cards a single player may hold.
    pub max_jail_cards: u8,

    /// Consecutive doubles that send the roller to jail.
    pub doubles_to_jail: u8,

    /// Smallest table.
    pub min_players: usize,

    /// Largest table.
    pub max_players: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1500,
            pass_go_income: 200,
            jail_fine: 50,
            max_turns_in_jail: 3,
            max_jail_cards: 2,
            doubles_to_jail: 3,
            min_players: 2,
            max_players: 8,
        }
    }
}

impl GameConfig {
    /// Set the starting balance.
    #[must_use]
    pub fn with_starting_balance(mut self, balance: Money) -> Self {
        self.starting_balance = balance;
        self
    }

    /// Set the pass-Go income.
    #[must_use]
    pub fn with_pass_go_income(mut self, income: Money) -> Self {
        self.pass_go_income = income;
        self
    }

    /// Set the jail fine.
    #[must_use]
    pub fn with_jail_fine(mut self, fine: Money) -> Self {
        self.jail_fine = fine;
        self
    }

    /// Set the jail card limit.
    #[must_use]
    pub fn with_max_jail_cards(mut self, max: u8) -> Self {
        self.max_jail_cards = max;
        self
    }

    /// Check whether a table of `count` players is allowed.
    #[must_use]
    pub fn allows_player_count(&self, count: usize) -> bool {
        (self.min_players..=self.max_players).contains(&count)
    }
}
