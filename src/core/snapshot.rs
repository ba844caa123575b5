//! Persisted form of the ledger, for resume and replay.
//!
//! A snapshot holds only the mutable facts of a match. Restoring joins it
//! against a static [`Board`] catalog and re-checks every ledger invariant, so
//! a restored state computes rent and validation results identical to the
//! original.

use std::sync::Arc;

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::config::GameConfig;
use super::player::{Player, PlayerId, PlayerMap};
use super::state::{GameState, GroupDevelopment, PlayerLedger};
use super::Money;
use crate::board::{Board, PropertyGroup, TileId};
use crate::rules::invariants;

/// Why a snapshot could not be decoded or restored.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Binary encoding failed.
    #[error("snapshot codec error: {0}")]
    Codec(#[from] bincode::Error),

    /// Player count outside the configured range.
    #[error("snapshot has {0} players")]
    PlayerCount(usize),

    /// A tile id is not on the board or cannot be owned.
    #[error("snapshot references invalid tile {0}")]
    InvalidTile(TileId),

    /// A seat id is not at the table.
    #[error("snapshot references unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// A tile appears in two players' lists.
    #[error("{0} is owned twice")]
    DuplicateOwnership(TileId),

    /// The owned-tile set does not match the players' lists.
    #[error("owned-tile set disagrees with player property lists")]
    OwnedSetMismatch,

    /// Every group must appear exactly once.
    #[error("group {0} missing or repeated")]
    GroupLayout(PropertyGroup),

    /// The rebuilt ledger breaks an invariant.
    #[error("restored ledger is inconsistent: {0}")]
    Invariant(String),
}

/// Persisted per-player facts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    /// Display name.
    pub name: String,
    /// Board position.
    pub position: TileId,
    /// Cash.
    pub balance: Money,
    /// Owned tiles in acquisition order.
    pub properties: Vec<TileId>,
    /// Jailed?
    pub in_jail: bool,
    /// Get-out-of-jail cards held.
    pub jail_cards: u8,
    /// Turns spent in jail.
    pub turns_in_jail: u8,
    /// Removed from the match?
    pub eliminated: bool,
}

/// Persisted per-group buildings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    /// Which group.
    pub group: PropertyGroup,
    /// Houses and hotel with their owners.
    pub development: GroupDevelopment,
}

/// Everything needed to resume a match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Rules in force.
    pub config: GameConfig,
    /// Per-player facts in seat order.
    pub players: Vec<PlayerSnapshot>,
    /// Per-group buildings.
    pub groups: Vec<GroupSnapshot>,
    /// Mortgaged tiles, ascending.
    pub mortgaged: Vec<TileId>,
    /// Owned tiles, ascending.
    pub owned: Vec<TileId>,
    /// Consecutive doubles this turn.
    pub doubles_rolled: u8,
    /// Whose turn it is.
    pub current_player: PlayerId,
}

impl GameSnapshot {
    /// Encode with bincode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SnapshotError> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode from bincode.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SnapshotError> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl GameState {
    /// Capture the mutable facts of this match.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let players = self
            .ledgers
            .iter()
            .map(|(id, l)| PlayerSnapshot {
                name: self.players[id].name.clone(),
                position: l.position,
                balance: l.balance,
                properties: l.properties.iter().copied().collect(),
                in_jail: l.in_jail,
                jail_cards: l.jail_cards,
                turns_in_jail: l.turns_in_jail,
                eliminated: l.eliminated,
            })
            .collect();
        let groups = PropertyGroup::ALL
            .iter()
            .map(|g| GroupSnapshot {
                group: *g,
                development: self.development(*g),
            })
            .collect();

        GameSnapshot {
            config: self.config.clone(),
            players,
            groups,
            mortgaged: self.mortgaged_tiles().collect(),
            owned: self.owned_tiles().collect(),
            doubles_rolled: self.doubles_rolled,
            current_player: self.current_player,
        }
    }

    /// Rebuild a state from a snapshot and the catalog it was taken against.
    pub fn restore(snapshot: &GameSnapshot, board: Arc<Board>) -> Result<Self, SnapshotError> {
        let count = snapshot.players.len();
        if !snapshot.config.allows_player_count(count) {
            return Err(SnapshotError::PlayerCount(count));
        }
        let known_player = |p: Option<PlayerId>| match p {
            Some(id) if id.index() >= count => Err(SnapshotError::UnknownPlayer(id)),
            _ => Ok(()),
        };
        known_player(Some(snapshot.current_player))?;

        let mut owners = OrdMap::new();
        let mut ledgers = Vec::with_capacity(count);
        let mut identities = Vec::with_capacity(count);
        for (seat, p) in snapshot.players.iter().enumerate() {
            let id = PlayerId::new(seat as u8);
            if board.tile(p.position).is_none() {
                return Err(SnapshotError::InvalidTile(p.position));
            }
            for tile in &p.properties {
                if !board.tile(*tile).is_some_and(|t| t.is_ownable()) {
                    return Err(SnapshotError::InvalidTile(*tile));
                }
                if owners.insert(*tile, id).is_some() {
                    return Err(SnapshotError::DuplicateOwnership(*tile));
                }
            }
            identities.push(Player::new(id, p.name.clone()));
            ledgers.push(PlayerLedger {
                position: p.position,
                balance: p.balance,
                properties: p.properties.iter().copied().collect::<Vector<_>>(),
                in_jail: p.in_jail,
                jail_cards: p.jail_cards,
                turns_in_jail: p.turns_in_jail,
                eliminated: p.eliminated,
            });
        }

        let owned: Vec<TileId> = owners.keys().copied().collect();
        let mut claimed = snapshot.owned.clone();
        claimed.sort_unstable();
        claimed.dedup();
        if claimed != owned || claimed.len() != snapshot.owned.len() {
            return Err(SnapshotError::OwnedSetMismatch);
        }

        let mut development = [GroupDevelopment::default(); PropertyGroup::COUNT];
        for group in PropertyGroup::ALL {
            let mut entries = snapshot.groups.iter().filter(|g| g.group == group);
            let (Some(entry), None) = (entries.next(), entries.next()) else {
                return Err(SnapshotError::GroupLayout(group));
            };
            known_player(entry.development.house_owner)?;
            known_player(entry.development.hotel_owner)?;
            development[group.index()] = entry.development;
        }

        let mortgaged: OrdSet<TileId> = snapshot.mortgaged.iter().copied().collect();

        let (Some(players), Some(ledgers)) =
            (PlayerMap::from_vec(identities), PlayerMap::from_vec(ledgers))
        else {
            return Err(SnapshotError::PlayerCount(count));
        };

        let state = Self {
            board,
            config: snapshot.config.clone(),
            players,
            ledgers,
            development,
            owners,
            mortgaged,
            doubles_rolled: snapshot.doubles_rolled,
            current_player: snapshot.current_player,
        };

        let violations = invariants::check(&state);
        if !violations.is_empty() {
            let joined = violations
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(SnapshotError::Invariant(joined));
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> GameState {
        let mut state = GameState::new(["A", "B", "C"]);
        let a = PlayerId::new(0);
        state.transfer_tile(TileId(1), Some(a));
        state.transfer_tile(TileId(3), Some(a));
        state.transfer_tile(TileId(5), Some(PlayerId::new(2)));
        state.mortgaged.insert(TileId(5));
        state.development_mut(PropertyGroup::Brown).houses = 2;
        state.development_mut(PropertyGroup::Brown).house_owner = Some(a);
        state.ledger_mut(PlayerId::new(1)).in_jail = true;
        state.ledger_mut(PlayerId::new(1)).position = TileId(10);
        state.ledger_mut(PlayerId::new(1)).turns_in_jail = 2;
        state.current_player = PlayerId::new(1);
        state
    }

    #[test]
    fn test_round_trip_bytes() {
        let state = sample_state();
        let bytes = state.snapshot().to_bytes().unwrap();
        let decoded = GameSnapshot::from_bytes(&bytes).unwrap();
        let restored = GameState::restore(&decoded, state.board_handle()).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn test_rejects_duplicate_ownership() {
        let mut snapshot = sample_state().snapshot();
        snapshot.players[1].properties.push(TileId(1));
        let err = GameState::restore(&snapshot, Arc::new(Board::classic())).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateOwnership(TileId(1))));
    }

    #[test]
    fn test_rejects_owned_set_mismatch() {
        let mut snapshot = sample_state().snapshot();
        snapshot.owned.push(TileId(39));
        let err = GameState::restore(&snapshot, Arc::new(Board::classic())).unwrap_err();
        assert!(matches!(err, SnapshotError::OwnedSetMismatch));
    }

    #[test]
    fn test_rejects_special_tile_ownership() {
        let mut snapshot = sample_state().snapshot();
        snapshot.players[0].properties.push(TileId(0));
        snapshot.owned.insert(0, TileId(0));
        let err = GameState::restore(&snapshot, Arc::new(Board::classic())).unwrap_err();
        assert!(matches!(err, SnapshotError::InvalidTile(TileId(0))));
    }

    #[test]
    fn test_rejects_invariant_breaks() {
        let mut snapshot = sample_state().snapshot();
        snapshot.mortgaged.push(TileId(39));
        let err = GameState::restore(&snapshot, Arc::new(Board::classic())).unwrap_err();
        assert!(matches!(err, SnapshotError::Invariant(_)));
    }

    #[test]
    fn test_snapshot_json() {
        let snapshot = sample_state().snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: GameSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot, back);
    }
}
