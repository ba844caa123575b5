//! Tile variants and their static price/rent data.
//!
//! The variant set is closed: every rent, mortgage and buy-back computation
//! matches exhaustively on [`Tile`], so the full set of pricing rules is
//! visible in one place.

use serde::{Deserialize, Serialize};

use super::group::PropertyGroup;
use crate::core::Money;

/// Board position, `0..40`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u8);

impl TileId {
    /// Create a tile ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Raw position.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Tile({})", self.0)
    }
}

/// A color Property.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyTile {
    /// Display name.
    pub name: String,
    /// Color group.
    pub group: PropertyGroup,
    /// Purchase price.
    pub price: Money,
    /// Rent without monopoly or development.
    pub base_rent: Money,
    /// Rent when the owner holds the whole group, undeveloped.
    pub full_group_rent: Money,
    /// Rent with 1-4 houses.
    pub house_rent: [Money; 4],
    /// Rent with a hotel.
    pub hotel_rent: Money,
    /// Cash received when mortgaging.
    pub mortgage: Money,
    /// Cost to lift the mortgage.
    pub buyback_price: Money,
}

/// A Railway. Rent scales with the number of railways the owner holds.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RailwayTile {
    /// Display name.
    pub name: String,
    /// Purchase price.
    pub price: Money,
    /// Rent when owning 1, 2, 3 or 4 railways.
    pub rent: [Money; 4],
    /// Cash received when mortgaging.
    pub mortgage: Money,
    /// Cost to lift the mortgage.
    pub buyback_price: Money,
}

/// A Utility. Rent is a multiple of the dice total.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UtilityTile {
    /// Display name.
    pub name: String,
    /// Purchase price.
    pub price: Money,
    /// Cash received when mortgaging.
    pub mortgage: Money,
    /// Cost to lift the mortgage.
    pub buyback_price: Money,
}

/// Non-purchasable tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialKind {
    /// Start tile.
    Go,
    /// Jail / just visiting.
    Jail,
    /// Pay the bank a fixed amount.
    Tax(Money),
    /// Draw a Chance card.
    Chance,
    /// Draw a Community Chest card.
    CommunityChest,
    /// Go directly to jail.
    GoToJail,
    /// Nothing happens.
    FreeParking,
}

/// A non-purchasable tile.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpecialTile {
    /// Display name.
    pub name: String,
    /// What landing here does.
    pub kind: SpecialKind,
}

/// One of the board's 40 positions.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    /// Color property.
    Property(PropertyTile),
    /// Railway station.
    Railway(RailwayTile),
    /// Utility company.
    Utility(UtilityTile),
    /// Go, Jail, Tax, cards, Go To Jail, Free Parking.
    Special(SpecialTile),
}

impl Tile {
    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Tile::Property(p) => &p.name,
            Tile::Railway(r) => &r.name,
            Tile::Utility(u) => &u.name,
            Tile::Special(s) => &s.name,
        }
    }

    /// Can this tile be bought, mortgaged and traded?
    #[must_use]
    pub fn is_ownable(&self) -> bool {
        !matches!(self, Tile::Special(_))
    }

    /// Purchase price, `None` for special tiles.
    #[must_use]
    pub fn price(&self) -> Option<Money> {
        match self {
            Tile::Property(p) => Some(p.price),
            Tile::Railway(r) => Some(r.price),
            Tile::Utility(u) => Some(u.price),
            Tile::Special(_) => None,
        }
    }

    /// Mortgage value, `None` for special tiles.
    #[must_use]
    pub fn mortgage_value(&self) -> Option<Money> {
        match self {
            Tile::Property(p) => Some(p.mortgage),
            Tile::Railway(r) => Some(r.mortgage),
            Tile::Utility(u) => Some(u.mortgage),
            Tile::Special(_) => None,
        }
    }

    /// Cost to lift a mortgage, `None` for special tiles.
    #[must_use]
    pub fn buyback_price(&self) -> Option<Money> {
        match self {
            Tile::Property(p) => Some(p.buyback_price),
            Tile::Railway(r) => Some(r.buyback_price),
            Tile::Utility(u) => Some(u.buyback_price),
            Tile::Special(_) => None,
        }
    }

    /// Color group, for Properties only.
    #[must_use]
    pub fn group(&self) -> Option<PropertyGroup> {
        match self {
            Tile::Property(p) => Some(p.group),
            _ => None,
        }
    }

    /// Special kind, for non-purchasable tiles only.
    #[must_use]
    pub fn special_kind(&self) -> Option<SpecialKind> {
        match self {
            Tile::Special(s) => Some(s.kind),
            _ => None,
        }
    }

    /// Is this a Railway?
    #[must_use]
    pub fn is_railway(&self) -> bool {
        matches!(self, Tile::Railway(_))
    }

    /// Is this a Utility?
    #[must_use]
    pub fn is_utility(&self) -> bool {
        matches!(self, Tile::Utility(_))
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Buy-back price: mortgage plus 10%, rounded up.
#[must_use]
pub const fn buyback_for(mortgage: Money) -> Money {
    (mortgage * 11 + 9) / 10
}
