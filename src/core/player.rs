//! Player identification and per-player ledger storage.
//!
//! ## PlayerId
//!
//! Seat index at the table. Players carry no mutable state of their own:
//! everything they own lives in the [`GameState`](super::GameState) ledger.
//!
//! ## PlayerMap
//!
//! Seat-indexed storage backed by `Vec` for O(1) access.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Seat identifier, 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Identity of a seated player.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Player {
    /// Seat.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
}

impl Player {
    /// Create a player identity.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Per-seat data storage with O(1) access.
///
/// ```
/// use rust_monopoly::core::{PlayerId, PlayerMap};
///
/// let mut cash: PlayerMap<i64> = PlayerMap::with_value(4, 1500);
/// cash[PlayerId::new(1)] -= 200;
/// assert_eq!(cash[PlayerId::new(1)], 1300);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a map with values from a factory function.
    pub fn new(player_count: usize, factory: impl Fn(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { data }
    }

    /// Create a map with all entries set to the same value.
    pub fn with_value(player_count: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::new(player_count, |_| value.clone())
    }

    /// Build from per-seat values in seat order.
    ///
    /// Returns `None` for an empty or oversized vector.
    #[must_use]
    pub fn from_vec(data: Vec<T>) -> Option<Self> {
        if data.is_empty() || data.len() > 255 {
            return None;
        }
        Some(Self { data })
    }

    /// Number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Check whether a seat exists in this map.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.data.len()
    }

    /// Get a seat's data, or `None` for an unknown seat.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.data.get(player.index())
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate over all seats.
    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        (0..self.data.len() as u8).map(PlayerId)
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_display() {
        assert_eq!(PlayerId::new(3).index(), 3);
        assert_eq!(format!("{}", PlayerId::new(0)), "Player 0");
    }

    #[test]
    fn test_player_identity_display() {
        let player = Player::new(PlayerId::new(1), "Ada");
        assert_eq!(player.to_string(), "Ada");
    }

    #[test]
    fn test_player_map_factory() {
        let map: PlayerMap<i64> = PlayerMap::new(3, |p| p.index() as i64 * 100);
        assert_eq!(map[PlayerId::new(2)], 200);
        assert_eq!(map.player_count(), 3);
    }

    #[test]
    fn test_player_map_unknown_seat() {
        let map: PlayerMap<i64> = PlayerMap::with_value(2, 0);
        assert!(map.contains(PlayerId::new(1)));
        assert!(!map.contains(PlayerId::new(2)));
        assert!(map.get(PlayerId::new(5)).is_none());
    }

    #[test]
    fn test_player_map_from_vec() {
        assert!(PlayerMap::<u8>::from_vec(Vec::new()).is_none());
        let map = PlayerMap::from_vec(vec![1, 2]).unwrap();
        assert_eq!(map[PlayerId::new(1)], 2);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i64> = PlayerMap::new(2, |p| p.index() as i64 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i64> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i64> = PlayerMap::with_value(0, 0);
    }
}
