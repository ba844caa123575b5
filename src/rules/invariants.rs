//! Ledger invariants - consistency checks that detect engine bugs.
//!
//! A ledger mutated only through the validated mutators never violates
//! these. They run after every committed mutation in debug builds, on every
//! snapshot restore, and throughout the property tests.

use crate::board::PropertyGroup;
use crate::core::GameState;

/// Invariant violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl InvariantViolation {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

/// Check all ledger invariants.
///
/// Returns every violation found, or an empty list when the ledger is sound.
#[must_use]
pub fn check(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let board = state.board();

    if !state.ledgers.contains(state.current_player) {
        violations.push(InvariantViolation::new(format!(
            "current player {} is not seated",
            state.current_player
        )));
    }

    // Ownership: the owner index and the per-player lists describe the same
    // relation, and each owned tile appears in exactly one list exactly once.
    for (tile, owner) in state.owners.iter() {
        if !board.tile(*tile).is_some_and(|t| t.is_ownable()) {
            violations.push(InvariantViolation::new(format!("{tile} is owned but not ownable")));
        }
        let holders: Vec<_> = state
            .ledgers
            .iter()
            .filter(|(_, l)| l.properties.contains(tile))
            .map(|(id, _)| id)
            .collect();
        if holders != [*owner] {
            violations.push(InvariantViolation::new(format!(
                "{tile} indexed to {owner} but listed by {holders:?}"
            )));
        }
    }

    for (id, ledger) in state.ledgers.iter() {
        for (i, tile) in ledger.properties.iter().enumerate() {
            if state.owners.get(tile) != Some(&id) {
                violations.push(InvariantViolation::new(format!(
                    "{id} lists {tile} missing from the owned set"
                )));
            }
            if ledger.properties.iter().skip(i + 1).any(|t| t == tile) {
                violations.push(InvariantViolation::new(format!("{id} lists {tile} twice")));
            }
        }

        if board.tile(ledger.position).is_none() {
            violations.push(InvariantViolation::new(format!(
                "{id} stands on {} off the board",
                ledger.position
            )));
        }
        if ledger.turns_in_jail > 0 && !ledger.in_jail {
            violations.push(InvariantViolation::new(format!(
                "{id} counts {} jail turns while free",
                ledger.turns_in_jail
            )));
        }
        if ledger.in_jail && ledger.position != board.jail() {
            violations.push(InvariantViolation::new(format!(
                "{id} is jailed away from the jail tile"
            )));
        }
        if ledger.jail_cards > state.config.max_jail_cards {
            violations.push(InvariantViolation::new(format!(
                "{id} holds {} jail cards",
                ledger.jail_cards
            )));
        }
        if ledger.eliminated && !ledger.properties.is_empty() {
            violations.push(InvariantViolation::new(format!(
                "eliminated {id} still owns {} tiles",
                ledger.properties.len()
            )));
        }
    }

    for tile in state.mortgaged.iter() {
        if !state.owners.contains_key(tile) {
            violations.push(InvariantViolation::new(format!("{tile} is mortgaged but unowned")));
        }
    }

    for group in PropertyGroup::ALL {
        check_group(state, group, &mut violations);
    }

    violations
}

fn check_group(state: &GameState, group: PropertyGroup, violations: &mut Vec<InvariantViolation>) {
    let dev = state.development(group);

    if dev.houses > 4 || dev.hotels > 1 {
        violations.push(InvariantViolation::new(format!(
            "{group} has {} houses and {} hotels",
            dev.houses, dev.hotels
        )));
    }
    if dev.houses > 0 && dev.hotels > 0 {
        violations.push(InvariantViolation::new(format!("{group} has houses and a hotel")));
    }
    if (dev.houses > 0) != dev.house_owner.is_some() {
        violations.push(InvariantViolation::new(format!(
            "{group} house owner marker disagrees with {} houses",
            dev.houses
        )));
    }
    if (dev.hotels > 0) != dev.hotel_owner.is_some() {
        violations.push(InvariantViolation::new(format!(
            "{group} hotel owner marker disagrees with {} hotels",
            dev.hotels
        )));
    }

    if let Some(owner) = dev.owner() {
        if !state.owns_full_group(owner, group) {
            violations.push(InvariantViolation::new(format!(
                "{group} developed by {owner} without full ownership"
            )));
        }
        if let Some(tile) = state.mortgaged_member(group) {
            violations.push(InvariantViolation::new(format!(
                "{group} developed while {tile} is mortgaged"
            )));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::TileId;
    use crate::core::PlayerId;

    #[test]
    fn test_fresh_state_is_clean() {
        let state = GameState::new(["A", "B"]);
        assert!(check(&state).is_empty());
    }

    #[test]
    fn test_detects_split_ownership() {
        let mut state = GameState::new(["A", "B"]);
        state.transfer_tile(TileId(1), Some(PlayerId::new(0)));
        state.ledger_mut(PlayerId::new(1)).properties.push_back(TileId(1));
        assert!(!check(&state).is_empty());
    }

    #[test]
    fn test_detects_development_without_monopoly() {
        let mut state = GameState::new(["A", "B"]);
        state.transfer_tile(TileId(1), Some(PlayerId::new(0)));
        let dev = state.development_mut(PropertyGroup::Brown);
        dev.houses = 1;
        dev.house_owner = Some(PlayerId::new(0));
        let violations = check(&state);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("without full ownership"));
    }

    #[test]
    fn test_detects_jail_counter_drift() {
        let mut state = GameState::new(["A", "B"]);
        state.ledger_mut(PlayerId::new(0)).turns_in_jail = 1;
        assert_eq!(check(&state).len(), 1);
    }
}
