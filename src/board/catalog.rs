//! The static board catalog.
//!
//! A [`Board`] is immutable once built. The ledger refers to it through an
//! `Arc` so clones of the game state never copy tile data.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

use super::group::PropertyGroup;
use super::tile::{
    buyback_for, PropertyTile, RailwayTile, SpecialKind, SpecialTile, Tile, TileId, UtilityTile,
};
use crate::core::Money;

/// Number of positions on a board.
pub const BOARD_SIZE: usize = 40;

/// Members of one color group.
pub type GroupMembers = SmallVec<[TileId; 4]>;

/// Problems found while validating a custom catalog.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The board does not have exactly 40 tiles.
    #[error("board must have {BOARD_SIZE} tiles, got {0}")]
    WrongSize(usize),

    /// Position 0 is not Go.
    #[error("position 0 must be Go")]
    MissingGo,

    /// There must be exactly one Jail.
    #[error("board must have exactly one jail, got {0}")]
    JailCount(usize),

    /// There must be exactly one Go To Jail.
    #[error("board must have exactly one go-to-jail tile, got {0}")]
    GoToJailCount(usize),

    /// A color group has fewer than 2 or more than 4 members.
    #[error("group {group} has {members} members, expected 2 to 4")]
    GroupSize {
        /// Offending group.
        group: PropertyGroup,
        /// Member count found.
        members: usize,
    },

    /// Two tiles share a name.
    #[error("duplicate tile name {0:?}")]
    DuplicateName(String),
}

/// Immutable tile catalog with group and name indexes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    tiles: Vec<Tile>,
    members: [GroupMembers; PropertyGroup::COUNT],
    by_name: FxHashMap<String, TileId>,
    jail: TileId,
    go_to_jail: TileId,
}

impl Board {
    /// Validate a tile list and build the lookup indexes.
    pub fn from_tiles(tiles: Vec<Tile>) -> Result<Self, BoardError> {
        if tiles.len() != BOARD_SIZE {
            return Err(BoardError::WrongSize(tiles.len()));
        }
        if tiles[0].special_kind() != Some(SpecialKind::Go) {
            return Err(BoardError::MissingGo);
        }

        let positions_of = |kind: SpecialKind| -> Vec<TileId> {
            tiles
                .iter()
                .enumerate()
                .filter(|(_, t)| t.special_kind() == Some(kind))
                .map(|(i, _)| TileId(i as u8))
                .collect()
        };
        let jails = positions_of(SpecialKind::Jail);
        if jails.len() != 1 {
            return Err(BoardError::JailCount(jails.len()));
        }
        let go_to_jails = positions_of(SpecialKind::GoToJail);
        if go_to_jails.len() != 1 {
            return Err(BoardError::GoToJailCount(go_to_jails.len()));
        }

        let mut members: [GroupMembers; PropertyGroup::COUNT] = Default::default();
        let mut by_name = FxHashMap::default();
        for (i, tile) in tiles.iter().enumerate() {
            let id = TileId(i as u8);
            if let Some(group) = tile.group() {
                members[group.index()].push(id);
            }
            if by_name.insert(tile.name().to_string(), id).is_some() {
                return Err(BoardError::DuplicateName(tile.name().to_string()));
            }
        }
        for group in PropertyGroup::ALL {
            let count = members[group.index()].len();
            if !(2..=4).contains(&count) {
                return Err(BoardError::GroupSize {
                    group,
                    members: count,
                });
            }
        }

        Ok(Self {
            tiles,
            members,
            by_name,
            jail: jails[0],
            go_to_jail: go_to_jails[0],
        })
    }

    /// The classic 40-tile board.
    #[must_use]
    pub fn classic() -> Self {
        match Self::from_tiles(classic_tiles()) {
            Ok(board) => board,
            Err(e) => unreachable!("classic board is well-formed: {e}"),
        }
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Does the board have no positions?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Look up a tile.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// All tiles in board order.
    pub fn tiles(&self) -> impl Iterator<Item = (TileId, &Tile)> {
        self.tiles
            .iter()
            .enumerate()
            .map(|(i, t)| (TileId(i as u8), t))
    }

    /// Find a tile by display name.
    #[must_use]
    pub fn tile_by_name(&self, name: &str) -> Option<TileId> {
        self.by_name.get(name).copied()
    }

    /// Members of a color group, in board order.
    #[must_use]
    pub fn group_members(&self, group: PropertyGroup) -> &[TileId] {
        &self.members[group.index()]
    }

    /// Member count of a color group.
    #[must_use]
    pub fn group_size(&self, group: PropertyGroup) -> usize {
        self.members[group.index()].len()
    }

    /// Cost of one development step on every member of `group`.
    #[must_use]
    pub fn house_cost(&self, group: PropertyGroup) -> Money {
        group.house_cost() * self.group_size(group) as Money
    }

    /// Group-wide hotel cost: one more house-step across the group.
    ///
    /// Selling the hotel refunds half of this.
    #[must_use]
    pub fn hotel_cost(&self, group: PropertyGroup) -> Money {
        self.house_cost(group)
    }

    /// Jail / just-visiting position.
    #[must_use]
    pub fn jail(&self) -> TileId {
        self.jail
    }

    /// Go To Jail position.
    #[must_use]
    pub fn go_to_jail(&self) -> TileId {
        self.go_to_jail
    }

    /// Position reached by moving `steps` forward from `from`, and whether Go
    /// was passed on the way.
    #[must_use]
    pub fn advance(&self, from: TileId, steps: usize) -> (TileId, bool) {
        let raw = from.index() + steps;
        (TileId((raw % self.len()) as u8), raw >= self.len())
    }

    /// First tile at or after the position following `from` matching `pred`.
    #[must_use]
    pub fn next_matching(&self, from: TileId, pred: impl Fn(&Tile) -> bool) -> Option<TileId> {
        (1..=self.len())
            .map(|step| self.advance(from, step).0)
            .find(|id| self.tile(*id).is_some_and(&pred))
    }

    /// Nearest railway ahead of `from`.
    #[must_use]
    pub fn nearest_railway(&self, from: TileId) -> Option<TileId> {
        self.next_matching(from, Tile::is_railway)
    }

    /// Nearest utility ahead of `from`.
    #[must_use]
    pub fn nearest_utility(&self, from: TileId) -> Option<TileId> {
        self.next_matching(from, Tile::is_utility)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::classic()
    }
}

fn property(
    name: &str,
    group: PropertyGroup,
    price: Money,
    base_rent: Money,
    house_rent: [Money; 4],
    hotel_rent: Money,
) -> Tile {
    let mortgage = price / 2;
    Tile::Property(PropertyTile {
        name: name.to_string(),
        group,
        price,
        base_rent,
        full_group_rent: base_rent * 2,
        house_rent,
        hotel_rent,
        mortgage,
        buyback_price: buyback_for(mortgage),
    })
}

fn railway(name: &str) -> Tile {
    Tile::Railway(RailwayTile {
        name: name.to_string(),
        price: 200,
        rent: [25, 50, 100, 200],
        mortgage: 100,
        buyback_price: buyback_for(100),
    })
}

fn utility(name: &str) -> Tile {
    Tile::Utility(UtilityTile {
        name: name.to_string(),
        price: 150,
        mortgage: 75,
        buyback_price: buyback_for(75),
    })
}

fn special(name: &str, kind: SpecialKind) -> Tile {
    Tile::Special(SpecialTile {
        name: name.to_string(),
        kind,
    })
}

/// Tile data for the classic board.
#[must_use]
pub fn classic_tiles() -> Vec<Tile> {
    use PropertyGroup::*;

    vec![
        special("Go", SpecialKind::Go),
        property("Mediterranean Avenue", Brown, 60, 2, [10, 30, 90, 160], 250),
        special("Community Chest 1", SpecialKind::CommunityChest),
        property("Baltic Avenue", Brown, 60, 4, [20, 60, 180, 320], 450),
        special("Income Tax", SpecialKind::Tax(200)),
        railway("Reading Railroad"),
        property("Oriental Avenue", LightBlue, 100, 6, [30, 90, 270, 400], 550),
        special("Chance 1", SpecialKind::Chance),
        property("Vermont Avenue", LightBlue, 100, 6, [30, 90, 270, 400], 550),
        property("Connecticut Avenue", LightBlue, 120, 8, [40, 100, 300, 450], 600),
        special("Jail", SpecialKind::Jail),
        property("St. Charles Place", Pink, 140, 10, [50, 150, 450, 625], 750),
        utility("Electric Company"),
        property("States Avenue", Pink, 140, 10, [50, 150, 450, 625], 750),
        property("Virginia Avenue", Pink, 160, 12, [60, 180, 500, 700], 900),
        railway("Pennsylvania Railroad"),
        property("St. James Place", Orange, 180, 14, [70, 200, 550, 750], 950),
        special("Community Chest 2", SpecialKind::CommunityChest),
        property("Tennessee Avenue", Orange, 180, 14, [70, 200, 550, 750], 950),
        property("New York Avenue", Orange, 200, 16, [80, 220, 600, 800], 1000),
        special("Free Parking", SpecialKind::FreeParking),
        property("Kentucky Avenue", Red, 220, 18, [90, 250, 700, 875], 1050),
        special("Chance 2", SpecialKind::Chance),
        property("Indiana Avenue", Red, 220, 18, [90, 250, 700, 875], 1050),
        property("Illinois Avenue", Red, 240, 20, [100, 300, 750, 925], 1100),
        railway("B. & O. Railroad"),
        property("Atlantic Avenue", Yellow, 260, 22, [110, 330, 800, 975], 1150),
        property("Ventnor Avenue", Yellow, 260, 22, [110, 330, 800, 975], 1150),
        utility("Water Works"),
        property("Marvin Gardens", Yellow, 280, 24, [120, 360, 850, 1025], 1200),
        special("Go To Jail", SpecialKind::GoToJail),
        property("Pacific Avenue", Green, 300, 26, [130, 390, 900, 1100], 1275),
        property("North Carolina Avenue", Green, 300, 26, [130, 390, 900, 1100], 1275),
        special("Community Chest 3", SpecialKind::CommunityChest),
        property("Pennsylvania Avenue", Green, 320, 28, [150, 450, 1000, 1200], 1400),
        railway("Short Line"),
        special("Chance 3", SpecialKind::Chance),
        property("Park Place", Blue, 350, 35, [175, 500, 1100, 1300], 1500),
        special("Luxury Tax", SpecialKind::Tax(100)),
        property("Boardwalk", Blue, 400, 50, [200, 600, 1400, 1700], 2000),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_layout() {
        let board = Board::classic();
        assert_eq!(board.len(), BOARD_SIZE);
        assert_eq!(board.jail(), TileId(10));
        assert_eq!(board.go_to_jail(), TileId(30));
        assert_eq!(board.group_members(PropertyGroup::Brown), &[TileId(1), TileId(3)]);
        assert_eq!(board.group_size(PropertyGroup::Red), 3);
    }

    #[test]
    fn test_costs_follow_group_size() {
        let board = Board::classic();
        assert_eq!(board.house_cost(PropertyGroup::Brown), 100);
        assert_eq!(board.hotel_cost(PropertyGroup::LightBlue), 150);
        assert_eq!(board.hotel_cost(PropertyGroup::Green), 600);
        for group in PropertyGroup::ALL {
            assert_eq!(
                board.hotel_cost(group),
                group.house_cost() * board.group_size(group) as Money
            );
        }
    }

    #[test]
    fn test_advance_wraps() {
        let board = Board::classic();
        assert_eq!(board.advance(TileId(38), 4), (TileId(2), true));
        assert_eq!(board.advance(TileId(5), 4), (TileId(9), false));
    }

    #[test]
    fn test_nearest_lookups() {
        let board = Board::classic();
        assert_eq!(board.nearest_railway(TileId(7)), Some(TileId(15)));
        assert_eq!(board.nearest_railway(TileId(36)), Some(TileId(5)));
        assert_eq!(board.nearest_utility(TileId(22)), Some(TileId(28)));
        assert_eq!(board.nearest_utility(TileId(36)), Some(TileId(12)));
    }

    #[test]
    fn test_tile_by_name() {
        let board = Board::classic();
        assert_eq!(board.tile_by_name("Boardwalk"), Some(TileId(39)));
        assert_eq!(board.tile_by_name("Nowhere"), None);
    }

    #[test]
    fn test_rejects_bad_catalogs() {
        let mut tiles = classic_tiles();
        tiles.pop();
        assert_eq!(Board::from_tiles(tiles), Err(BoardError::WrongSize(39)));

        let mut tiles = classic_tiles();
        tiles.swap(0, 1);
        assert_eq!(Board::from_tiles(tiles), Err(BoardError::MissingGo));

        let mut tiles = classic_tiles();
        tiles[20] = special("Second Jail", SpecialKind::Jail);
        assert_eq!(Board::from_tiles(tiles), Err(BoardError::JailCount(2)));
    }

    #[test]
    fn test_tiles_serde_round_trip() {
        let tiles = classic_tiles();
        let json = serde_json::to_string(&tiles).unwrap();
        let back: Vec<Tile> = serde_json::from_str(&json).unwrap();
        assert_eq!(Board::from_tiles(back).unwrap(), Board::classic());
    }
}
