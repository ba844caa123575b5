//! Color groups of Properties.

use serde::{Deserialize, Serialize};

use crate::core::Money;

/// A color cluster of 2-4 Properties sharing development rules.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PropertyGroup {
    /// Two members.
    Brown,
    /// Three members.
    LightBlue,
    /// Three members.
    Pink,
    /// Three members.
    Orange,
    /// Three members.
    Red,
    /// Three members.
    Yellow,
    /// Three members.
    Green,
    /// Two members.
    Blue,
}

impl PropertyGroup {
    /// Number of groups.
    pub const COUNT: usize = 8;

    /// All groups in board order.
    pub const ALL: [PropertyGroup; Self::COUNT] = [
        PropertyGroup::Brown,
        PropertyGroup::LightBlue,
        PropertyGroup::Pink,
        PropertyGroup::Orange,
        PropertyGroup::Red,
        PropertyGroup::Yellow,
        PropertyGroup::Green,
        PropertyGroup::Blue,
    ];

    /// Dense index for array-backed per-group storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Cost of one house on one member.
    ///
    /// Development is group-wide; [`Board::house_cost`](super::Board::house_cost)
    /// scales this by the member count.
    #[must_use]
    pub const fn house_cost(self) -> Money {
        match self {
            PropertyGroup::Brown | PropertyGroup::LightBlue => 50,
            PropertyGroup::Pink | PropertyGroup::Orange => 100,
            PropertyGroup::Red | PropertyGroup::Yellow => 150,
            PropertyGroup::Green | PropertyGroup::Blue => 200,
        }
    }

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            PropertyGroup::Brown => "brown",
            PropertyGroup::LightBlue => "light blue",
            PropertyGroup::Pink => "pink",
            PropertyGroup::Orange => "orange",
            PropertyGroup::Red => "red",
            PropertyGroup::Yellow => "yellow",
            PropertyGroup::Green => "green",
            PropertyGroup::Blue => "blue",
        }
    }
}

impl std::fmt::Display for PropertyGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_dense() {
        for (i, group) in PropertyGroup::ALL.iter().enumerate() {
            assert_eq!(group.index(), i);
        }
    }

    #[test]
    fn test_costs() {
        assert_eq!(PropertyGroup::Brown.house_cost(), 50);
        assert_eq!(PropertyGroup::Green.house_cost(), 200);
        assert_eq!(PropertyGroup::LightBlue.to_string(), "light blue");
    }
}
