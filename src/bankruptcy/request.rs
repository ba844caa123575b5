//! Liquidation plans.

use serde::{Deserialize, Serialize};

use crate::board::{PropertyGroup, TileId};
use crate::core::{GameState, Money};
use crate::rules::validation;

/// An ordered plan of group downgrades and tile mortgages.
///
/// Replayed by `GameState::complete_bankruptcy_request`: downgrades first, in
/// order, then mortgages, in order. An empty request means "nothing to do"
/// when the player is solvent, and "no plan exists" otherwise.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BankruptcyRequest {
    /// Groups to step down one development level each, repeats allowed.
    pub downgrades: Vec<PropertyGroup>,
    /// Tiles to mortgage.
    pub mortgages: Vec<TileId>,
}

impl BankruptcyRequest {
    /// Empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a downgrade.
    #[must_use]
    pub fn downgrade(mut self, group: PropertyGroup) -> Self {
        self.downgrades.push(group);
        self
    }

    /// Append a mortgage.
    #[must_use]
    pub fn mortgage(mut self, tile: TileId) -> Self {
        self.mortgages.push(tile);
        self
    }

    /// No actions at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.downgrades.is_empty() && self.mortgages.is_empty()
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.downgrades.len() + self.mortgages.len()
    }

    /// Cash the plan raises against `state`, by the liquidation accounting
    /// rules: a hotel sale returns `hotel_cost / 2` and leaves four houses, a
    /// house sale returns `house_cost * group_size / 2`, a mortgage returns the
    /// tile's mortgage value.
    ///
    /// Steps that would find nothing to sell contribute zero; legality is the
    /// validator's job.
    #[must_use]
    pub fn recoverable_funds(&self, state: &GameState) -> Money {
        let mut levels: [u8; PropertyGroup::COUNT] = PropertyGroup::ALL.map(|g| state.development(g).level());
        let mut total = 0;

        for group in &self.downgrades {
            let level = &mut levels[group.index()];
            match *level {
                5 => {
                    total += validation::hotel_cost(state, *group) / 2;
                    *level = 4;
                }
                0 => {}
                _ => {
                    total += validation::house_cost(state, *group) / 2;
                    *level -= 1;
                }
            }
        }

        total
            + self
                .mortgages
                .iter()
                .filter_map(|t| state.tile(*t).and_then(|tile| tile.mortgage_value()))
                .sum::<Money>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    #[test]
    fn test_recoverable_funds_walks_levels() {
        let mut state = GameState::new(["A", "B"]);
        let a = PlayerId::new(0);
        state.transfer_tile(TileId(1), Some(a));
        state.transfer_tile(TileId(3), Some(a));
        let dev = state.development_mut(PropertyGroup::Brown);
        dev.hotels = 1;
        dev.hotel_owner = Some(a);

        // hotel: 100 / 2, then one house: 50 * 2 / 2, then mortgage Reading (100)
        let request = BankruptcyRequest::new()
            .downgrade(PropertyGroup::Brown)
            .downgrade(PropertyGroup::Brown)
            .mortgage(TileId(5));
        assert_eq!(request.recoverable_funds(&state), 50 + 50 + 100);
        assert_eq!(request.len(), 3);
    }

    #[test]
    fn test_empty_request() {
        let state = GameState::new(["A", "B"]);
        let request = BankruptcyRequest::new();
        assert!(request.is_empty());
        assert_eq!(request.recoverable_funds(&state), 0);
    }
}
