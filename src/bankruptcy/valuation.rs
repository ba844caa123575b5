//! Pluggable asset valuation for liquidation ranking.
//!
//! The resolver owns the control flow (rank, consume greedily, stop once the
//! shortfall is covered); a valuation only decides how much the player would
//! rather keep an asset. Higher values are liquidated later.

use crate::board::{PropertyGroup, Tile, TileId};
use crate::core::{GameState, PlayerId};

/// Strategic value of assets to their owner.
pub trait AssetValuation: Send + Sync {
    /// Value of keeping `tile`.
    fn tile_value(&self, state: &GameState, owner: PlayerId, tile: TileId) -> f64;

    /// Value of keeping the buildings on `group`.
    ///
    /// Defaults to the sum of the member tiles' values.
    fn group_value(&self, state: &GameState, owner: PlayerId, group: PropertyGroup) -> f64 {
        state
            .board()
            .group_members(group)
            .iter()
            .map(|t| self.tile_value(state, owner, *t))
            .sum()
    }
}

/// Printed price, boosted for held monopolies and railway/utility sets.
#[derive(Clone, Debug)]
pub struct PriceValuation {
    /// Multiplier for Properties whose whole group the owner holds.
    pub monopoly_bonus: f64,
}

impl Default for PriceValuation {
    fn default() -> Self {
        Self { monopoly_bonus: 2.0 }
    }
}

impl AssetValuation for PriceValuation {
    fn tile_value(&self, state: &GameState, owner: PlayerId, tile: TileId) -> f64 {
        let Some(info) = state.tile(tile) else {
            return 0.0;
        };
        let price = info.price().unwrap_or(0) as f64;
        match info {
            Tile::Property(p) if state.owns_full_group(owner, p.group) => price * self.monopoly_bonus,
            Tile::Railway(_) => price * state.railways_owned(owner).max(1) as f64,
            Tile::Utility(_) => price * state.utilities_owned(owner).max(1) as f64,
            _ => price,
        }
    }
}

/// Adapts a closure into an [`AssetValuation`].
///
/// ```
/// use rust_monopoly::bankruptcy::{AssetValuation, FnValuation};
/// use rust_monopoly::board::TileId;
/// use rust_monopoly::core::{GameState, PlayerId};
///
/// let flat = FnValuation::new(|_: &GameState, _: PlayerId, _: TileId| 1.0);
/// let state = GameState::new(["A", "B"]);
/// assert_eq!(flat.tile_value(&state, PlayerId::new(0), TileId(1)), 1.0);
/// ```
pub struct FnValuation<F> {
    score: F,
}

impl<F> FnValuation<F>
where
    F: Fn(&GameState, PlayerId, TileId) -> f64 + Send + Sync,
{
    /// Wrap a scoring function.
    pub fn new(score: F) -> Self {
        Self { score }
    }
}

impl<F> AssetValuation for FnValuation<F>
where
    F: Fn(&GameState, PlayerId, TileId) -> f64 + Send + Sync,
{
    fn tile_value(&self, state: &GameState, owner: PlayerId, tile: TileId) -> f64 {
        (self.score)(state, owner, tile)
    }
}

impl<F> std::fmt::Debug for FnValuation<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnValuation").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monopoly_bonus() {
        let mut state = GameState::new(["A", "B"]);
        let a = PlayerId::new(0);
        state.transfer_tile(TileId(1), Some(a));
        let valuation = PriceValuation::default();
        assert_eq!(valuation.tile_value(&state, a, TileId(1)), 60.0);

        state.transfer_tile(TileId(3), Some(a));
        assert_eq!(valuation.tile_value(&state, a, TileId(1)), 120.0);
        assert_eq!(valuation.group_value(&state, a, PropertyGroup::Brown), 240.0);
    }

    #[test]
    fn test_railways_scale_with_set() {
        let mut state = GameState::new(["A", "B"]);
        let a = PlayerId::new(0);
        state.transfer_tile(TileId(5), Some(a));
        state.transfer_tile(TileId(15), Some(a));
        assert_eq!(PriceValuation::default().tile_value(&state, a, TileId(5)), 400.0);
    }
}
