//! A roll of two six-sided dice.

use serde::{Deserialize, Serialize};

/// Two dice faces, each in `1..=6`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DiceRoll {
    /// First die.
    pub first: u8,
    /// Second die.
    pub second: u8,
}

impl DiceRoll {
    /// Create a roll from two faces.
    ///
    /// Panics if a face is outside `1..=6`.
    #[must_use]
    pub fn new(first: u8, second: u8) -> Self {
        assert!((1..=6).contains(&first), "die face out of range: {first}");
        assert!((1..=6).contains(&second), "die face out of range: {second}");
        Self { first, second }
    }

    /// Sum of both faces.
    #[must_use]
    pub const fn total(self) -> u8 {
        self.first + self.second
    }

    /// Both faces match.
    #[must_use]
    pub const fn is_double(self) -> bool {
        self.first == self.second
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_and_double() {
        let roll = DiceRoll::new(3, 3);
        assert_eq!(roll.total(), 6);
        assert!(roll.is_double());
        assert!(!DiceRoll::new(2, 5).is_double());
    }

    #[test]
    #[should_panic(expected = "die face out of range")]
    fn test_rejects_bad_face() {
        let _ = DiceRoll::new(0, 4);
    }
}
