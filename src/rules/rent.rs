//! Rent computation.
//!
//! Rent is a pure function of the tile variant, the owner's holdings and the
//! group's development. Precedence for Properties: hotel, then houses, then
//! full-group (monopoly) rent, then base rent.

use serde::{Deserialize, Serialize};

use super::error::{EngineResult, GameError};
use crate::board::{Tile, TileId};
use crate::core::{GameState, Money, PlayerId};

/// Per-landing inputs to the rent formula.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RentContext {
    /// Dice total that brought the payer here (utility rent).
    pub dice_total: u8,
    /// One-off card multiplier.
    ///
    /// Scales railway rent; replaces the 4/10 utility factor outright.
    pub multiplier: Option<u32>,
}

impl RentContext {
    /// Ordinary landing after a roll.
    #[must_use]
    pub fn rolled(dice_total: u8) -> Self {
        Self {
            dice_total,
            multiplier: None,
        }
    }

    /// Attach a card multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = Some(multiplier);
        self
    }
}

/// Rent the owner of `tile` would collect, ignoring who pays.
///
/// Fails for special, unowned or mortgaged tiles.
pub fn rent_due(state: &GameState, tile: TileId, ctx: RentContext) -> EngineResult<Money> {
    let info = state.tile(tile).ok_or(GameError::UnknownTile(tile))?;
    if !info.is_ownable() {
        return Err(GameError::NotPurchasable(tile));
    }
    let owner = state.owner_of(tile).ok_or(GameError::Unowned(tile))?;
    if state.is_mortgaged(tile) {
        return Err(GameError::AlreadyMortgaged(tile));
    }
    Ok(rent_for_owner(state, info, owner, ctx))
}

/// Rent for a tile held by `owner`, with no ownership checks.
pub(crate) fn rent_for_owner(state: &GameState, tile: &Tile, owner: PlayerId, ctx: RentContext) -> Money {
    match tile {
        Tile::Property(p) => {
            let dev = state.development(p.group);
            if dev.hotels > 0 {
                p.hotel_rent
            } else if dev.houses > 0 {
                p.house_rent[usize::from(dev.houses.min(4)) - 1]
            } else if state.owns_full_group(owner, p.group) {
                p.full_group_rent
            } else {
                p.base_rent
            }
        }
        Tile::Railway(r) => {
            let held = state.railways_owned(owner).clamp(1, r.rent.len());
            r.rent[held - 1] * Money::from(ctx.multiplier.unwrap_or(1))
        }
        Tile::Utility(_) => {
            let factor = ctx.multiplier.unwrap_or(if state.utilities_owned(owner) >= 2 {
                10
            } else {
                4
            });
            Money::from(ctx.dice_total) * Money::from(factor)
        }
        Tile::Special(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PropertyGroup;

    fn owned(tiles: &[u8]) -> (GameState, PlayerId) {
        let mut state = GameState::new(["Owner", "Visitor"]);
        let owner = PlayerId::new(0);
        for t in tiles {
            state.transfer_tile(TileId(*t), Some(owner));
        }
        (state, owner)
    }

    #[test]
    fn test_property_precedence() {
        // Baltic: base 4, full group 8, houses 20/60/180/320, hotel 450
        let (mut state, owner) = owned(&[3]);
        assert_eq!(rent_due(&state, TileId(3), RentContext::default()), Ok(4));

        state.transfer_tile(TileId(1), Some(owner));
        assert_eq!(rent_due(&state, TileId(3), RentContext::default()), Ok(8));

        let dev = state.development_mut(PropertyGroup::Brown);
        dev.houses = 3;
        dev.house_owner = Some(owner);
        assert_eq!(rent_due(&state, TileId(3), RentContext::default()), Ok(180));

        let dev = state.development_mut(PropertyGroup::Brown);
        dev.houses = 0;
        dev.house_owner = None;
        dev.hotels = 1;
        dev.hotel_owner = Some(owner);
        assert_eq!(rent_due(&state, TileId(3), RentContext::default()), Ok(450));
    }

    #[test]
    fn test_railway_scales_with_count_and_multiplier() {
        let (state, _) = owned(&[5, 15, 25]);
        assert_eq!(rent_due(&state, TileId(5), RentContext::default()), Ok(100));
        assert_eq!(
            rent_due(&state, TileId(15), RentContext::default().with_multiplier(2)),
            Ok(200)
        );
    }

    #[test]
    fn test_utility_factor() {
        let (mut state, owner) = owned(&[12]);
        assert_eq!(rent_due(&state, TileId(12), RentContext::rolled(7)), Ok(28));

        state.transfer_tile(TileId(28), Some(owner));
        assert_eq!(rent_due(&state, TileId(12), RentContext::rolled(7)), Ok(70));

        // A card multiplier replaces the factor rather than scaling it.
        assert_eq!(
            rent_due(&state, TileId(12), RentContext::rolled(7).with_multiplier(10)),
            Ok(70)
        );
        let (single, _) = owned(&[28]);
        assert_eq!(
            rent_due(&single, TileId(28), RentContext::rolled(5).with_multiplier(10)),
            Ok(50)
        );
    }

    #[test]
    fn test_rent_rejections() {
        let (mut state, _) = owned(&[39]);
        assert_eq!(
            rent_due(&state, TileId(0), RentContext::default()),
            Err(GameError::NotPurchasable(TileId(0)))
        );
        assert_eq!(
            rent_due(&state, TileId(37), RentContext::default()),
            Err(GameError::Unowned(TileId(37)))
        );
        state.mortgaged.insert(TileId(39));
        assert_eq!(
            rent_due(&state, TileId(39), RentContext::default()),
            Err(GameError::AlreadyMortgaged(TileId(39)))
        );
        assert_eq!(
            rent_due(&state, TileId(40), RentContext::default()),
            Err(GameError::UnknownTile(TileId(40)))
        );
    }
}
