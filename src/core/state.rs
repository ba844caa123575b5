//! The game ledger: every mutable fact of a match.
//!
//! ## Layout
//!
//! - Per player: position, balance, ordered owned-tile list, jail flag,
//!   jail-card count, turns in jail, eliminated flag
//! - Per group: house count + owner, hotel count + owner
//! - Global: tile -> owner index (its key set is the owned-tile set),
//!   mortgaged-tile set, consecutive-doubles counter, current player
//!
//! Fields are crate-private. Outside code reads through accessors and changes
//! the ledger only through the validated mutators in [`crate::rules`].
//! Collections come from `im`, so cloning a state for speculative checks is
//! O(1).

use std::sync::Arc;

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::player::{Player, PlayerId, PlayerMap};
use super::Money;
use crate::board::{Board, PropertyGroup, Tile, TileId};

/// One player's slice of the ledger.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerLedger {
    pub(crate) position: TileId,
    pub(crate) balance: Money,
    pub(crate) properties: Vector<TileId>,
    pub(crate) in_jail: bool,
    pub(crate) jail_cards: u8,
    pub(crate) turns_in_jail: u8,
    pub(crate) eliminated: bool,
}

impl PlayerLedger {
    pub(crate) fn new(balance: Money) -> Self {
        Self {
            position: TileId(0),
            balance,
            properties: Vector::new(),
            in_jail: false,
            jail_cards: 0,
            turns_in_jail: 0,
            eliminated: false,
        }
    }

    /// Board position.
    #[must_use]
    pub fn position(&self) -> TileId {
        self.position
    }

    /// Cash on hand.
    #[must_use]
    pub fn balance(&self) -> Money {
        self.balance
    }

    /// Owned tiles in acquisition order.
    #[must_use]
    pub fn properties(&self) -> &Vector<TileId> {
        &self.properties
    }

    /// Jailed?
    #[must_use]
    pub fn in_jail(&self) -> bool {
        self.in_jail
    }

    /// Get-out-of-jail cards held.
    #[must_use]
    pub fn jail_cards(&self) -> u8 {
        self.jail_cards
    }

    /// Turns spent in jail during the current stay.
    #[must_use]
    pub fn turns_in_jail(&self) -> u8 {
        self.turns_in_jail
    }

    /// Removed from the match?
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.eliminated
    }
}

/// Buildings on one color group.
///
/// Development is tracked per group: every member carries the same level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupDevelopment {
    /// Houses, `0..=4`.
    pub houses: u8,
    /// Who owns the houses; `None` when there are none.
    pub house_owner: Option<PlayerId>,
    /// Hotels, `0..=1`.
    pub hotels: u8,
    /// Who owns the hotel; `None` when there is none.
    pub hotel_owner: Option<PlayerId>,
}

impl GroupDevelopment {
    /// Any houses or hotel present?
    #[must_use]
    pub fn is_developed(&self) -> bool {
        self.houses > 0 || self.hotels > 0
    }

    /// Owner of whatever buildings are present.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.hotel_owner.or(self.house_owner)
    }

    /// Development level: 0 (none), 1-4 (houses), 5 (hotel).
    #[must_use]
    pub fn level(&self) -> u8 {
        if self.hotels > 0 {
            5
        } else {
            self.houses
        }
    }
}

/// The aggregate root of a match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub(crate) board: Arc<Board>,
    pub(crate) config: GameConfig,
    pub(crate) players: PlayerMap<Player>,
    pub(crate) ledgers: PlayerMap<PlayerLedger>,
    pub(crate) development: [GroupDevelopment; PropertyGroup::COUNT],
    pub(crate) owners: OrdMap<TileId, PlayerId>,
    pub(crate) mortgaged: OrdSet<TileId>,
    pub(crate) doubles_rolled: u8,
    pub(crate) current_player: PlayerId,
}

impl GameState {
    /// Create a classic match for the given player names.
    ///
    /// Panics if the player count is outside the configured range.
    #[must_use]
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self::with_rules(names, Arc::new(Board::classic()), GameConfig::default())
    }

    /// Create a match on a custom board and rule set.
    ///
    /// Panics if the player count is outside the configured range.
    #[must_use]
    pub fn with_rules<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        board: Arc<Board>,
        config: GameConfig,
    ) -> Self {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        assert!(
            config.allows_player_count(names.len()),
            "player count {} outside {}..={}",
            names.len(),
            config.min_players,
            config.max_players
        );

        let players = PlayerMap::new(names.len(), |id| Player::new(id, names[id.index()].clone()));
        let ledgers = PlayerMap::with_value(names.len(), PlayerLedger::new(config.starting_balance));

        Self {
            board,
            config,
            players,
            ledgers,
            development: [GroupDevelopment::default(); PropertyGroup::COUNT],
            owners: OrdMap::new(),
            mortgaged: OrdSet::new(),
            doubles_rolled: 0,
            current_player: PlayerId::new(0),
        }
    }

    // === Catalog & rules ===

    /// The static board catalog.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Shared handle to the catalog.
    #[must_use]
    pub fn board_handle(&self) -> Arc<Board> {
        Arc::clone(&self.board)
    }

    /// Rule constants.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Look up a tile in the catalog.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.board.tile(id)
    }

    // === Players ===

    /// Seats at the table, eliminated or not.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// All seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        self.players.player_ids()
    }

    /// Seats still in the match.
    pub fn active_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.ledgers
            .iter()
            .filter(|(_, l)| !l.eliminated)
            .map(|(id, _)| id)
    }

    /// Number of seats still in the match.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.active_players().count()
    }

    /// Identity of a seat.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    /// Ledger slice of a seat.
    #[must_use]
    pub fn ledger(&self, id: PlayerId) -> Option<&PlayerLedger> {
        self.ledgers.get(id)
    }

    /// Is the seat present and not eliminated?
    #[must_use]
    pub fn is_active(&self, id: PlayerId) -> bool {
        self.ledgers.get(id).is_some_and(|l| !l.eliminated)
    }

    /// Board position. Panics on an unknown seat.
    #[must_use]
    pub fn position(&self, id: PlayerId) -> TileId {
        self.ledgers[id].position
    }

    /// Cash on hand. Panics on an unknown seat.
    #[must_use]
    pub fn balance(&self, id: PlayerId) -> Money {
        self.ledgers[id].balance
    }

    /// Owned tiles in acquisition order. Panics on an unknown seat.
    #[must_use]
    pub fn properties(&self, id: PlayerId) -> &Vector<TileId> {
        &self.ledgers[id].properties
    }

    /// Jailed? Panics on an unknown seat.
    #[must_use]
    pub fn in_jail(&self, id: PlayerId) -> bool {
        self.ledgers[id].in_jail
    }

    /// Jail cards held. Panics on an unknown seat.
    #[must_use]
    pub fn jail_cards(&self, id: PlayerId) -> u8 {
        self.ledgers[id].jail_cards
    }

    /// Turns spent in jail. Panics on an unknown seat.
    #[must_use]
    pub fn turns_in_jail(&self, id: PlayerId) -> u8 {
        self.ledgers[id].turns_in_jail
    }

    /// Whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current_player
    }

    /// Consecutive doubles rolled this turn.
    #[must_use]
    pub fn doubles_rolled(&self) -> u8 {
        self.doubles_rolled
    }

    // === Ownership ===

    /// Owner of a tile, via the tile -> owner index.
    #[must_use]
    pub fn owner_of(&self, tile: TileId) -> Option<PlayerId> {
        self.owners.get(&tile).copied()
    }

    /// Is the tile owned by anyone?
    #[must_use]
    pub fn is_owned(&self, tile: TileId) -> bool {
        self.owners.contains_key(&tile)
    }

    /// The global owned-tile set, ascending.
    pub fn owned_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.owners.keys().copied()
    }

    /// Is the tile mortgaged?
    #[must_use]
    pub fn is_mortgaged(&self, tile: TileId) -> bool {
        self.mortgaged.contains(&tile)
    }

    /// The mortgaged-tile set, ascending.
    pub fn mortgaged_tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.mortgaged.iter().copied()
    }

    /// Does `player` own every member of `group`?
    #[must_use]
    pub fn owns_full_group(&self, player: PlayerId, group: PropertyGroup) -> bool {
        self.board
            .group_members(group)
            .iter()
            .all(|t| self.owner_of(*t) == Some(player))
    }

    /// First mortgaged member of a group, if any.
    #[must_use]
    pub fn mortgaged_member(&self, group: PropertyGroup) -> Option<TileId> {
        self.board
            .group_members(group)
            .iter()
            .copied()
            .find(|t| self.is_mortgaged(*t))
    }

    /// Railways held by `player`.
    #[must_use]
    pub fn railways_owned(&self, player: PlayerId) -> usize {
        self.count_owned(player, Tile::is_railway)
    }

    /// Utilities held by `player`.
    #[must_use]
    pub fn utilities_owned(&self, player: PlayerId) -> usize {
        self.count_owned(player, Tile::is_utility)
    }

    fn count_owned(&self, player: PlayerId, pred: impl Fn(&Tile) -> bool) -> usize {
        self.ledgers.get(player).map_or(0, |l| {
            l.properties
                .iter()
                .filter(|t| self.board.tile(**t).is_some_and(&pred))
                .count()
        })
    }

    // === Development ===

    /// Buildings on a group.
    #[must_use]
    pub fn development(&self, group: PropertyGroup) -> GroupDevelopment {
        self.development[group.index()]
    }

    /// Houses on a group.
    #[must_use]
    pub fn houses(&self, group: PropertyGroup) -> u8 {
        self.development[group.index()].houses
    }

    /// Hotels on a group.
    #[must_use]
    pub fn hotels(&self, group: PropertyGroup) -> u8 {
        self.development[group.index()].hotels
    }

    /// Groups whose buildings belong to `player`.
    pub fn developed_groups(&self, player: PlayerId) -> impl Iterator<Item = PropertyGroup> + '_ {
        PropertyGroup::ALL
            .into_iter()
            .filter(move |g| self.development(*g).owner() == Some(player))
    }

    /// Houses and hotels across all groups owned by `player`, counted per
    /// member tile.
    #[must_use]
    pub fn building_counts(&self, player: PlayerId) -> (u32, u32) {
        self.developed_groups(player).fold((0, 0), |(houses, hotels), g| {
            let size = self.board.group_size(g) as u32;
            let dev = self.development(g);
            (
                houses + u32::from(dev.houses) * size,
                hotels + u32::from(dev.hotels) * size,
            )
        })
    }

    // === Valuation ===

    /// Cash plus the bank value of every asset.
    ///
    /// Unmortgaged tiles count at price, mortgaged ones at price minus the
    /// buy-back cost, buildings at what they cost to place.
    #[must_use]
    pub fn net_worth(&self, player: PlayerId) -> Money {
        let Some(ledger) = self.ledgers.get(player) else {
            return 0;
        };
        let tiles: Money = ledger
            .properties
            .iter()
            .filter_map(|t| self.board.tile(*t).map(|tile| (*t, tile)))
            .map(|(id, tile)| {
                let price = tile.price().unwrap_or(0);
                if self.is_mortgaged(id) {
                    price - tile.buyback_price().unwrap_or(0)
                } else {
                    price
                }
            })
            .sum();
        let buildings: Money = self
            .developed_groups(player)
            .map(|g| {
                let dev = self.development(g);
                let per_house = self.board.house_cost(g);
                if dev.hotels > 0 {
                    4 * per_house + self.board.hotel_cost(g)
                } else {
                    Money::from(dev.houses) * per_house
                }
            })
            .sum();
        ledger.balance + tiles + buildings
    }

    // === Crate-internal ledger primitives (no validation) ===

    pub(crate) fn ledger_mut(&mut self, id: PlayerId) -> &mut PlayerLedger {
        &mut self.ledgers[id]
    }

    pub(crate) fn credit(&mut self, id: PlayerId, amount: Money) {
        self.ledgers[id].balance += amount;
    }

    pub(crate) fn debit(&mut self, id: PlayerId, amount: Money) {
        self.ledgers[id].balance -= amount;
    }

    /// Move a tile between owners (`None` = bank), keeping the owned lists and
    /// the owner index in step.
    pub(crate) fn transfer_tile(&mut self, tile: TileId, to: Option<PlayerId>) {
        if let Some(from) = self.owners.remove(&tile) {
            let list = &mut self.ledgers[from].properties;
            if let Some(pos) = list.index_of(&tile) {
                list.remove(pos);
            }
        }
        if let Some(to) = to {
            self.owners.insert(tile, to);
            self.ledgers[to].properties.push_back(tile);
        }
    }

    pub(crate) fn development_mut(&mut self, group: PropertyGroup) -> &mut GroupDevelopment {
        &mut self.development[group.index()]
    }
}
