//! Cash-reserve agent: buys and builds whenever it can afford to.

use crate::bankruptcy::{BankruptcyRequest, BankruptcyResolver};
use crate::board::{PropertyGroup, TileId};
use crate::core::{GameState, Money, PlayerId};
use crate::rules::validation;

use super::Agent;

/// Buys, develops and unmortgages while cash stays above a reserve.
///
/// Pays jail fines when affordable, always spends jail cards, never trades.
#[derive(Clone, Debug)]
pub struct GreedyAgent {
    name: String,
    resolver: BankruptcyResolver,
    /// Cash the agent keeps back for rent.
    pub reserve: Money,
}

impl GreedyAgent {
    /// Agent keeping `reserve` in hand.
    #[must_use]
    pub fn new(name: impl Into<String>, reserve: Money) -> Self {
        Self {
            name: name.into(),
            resolver: BankruptcyResolver::default(),
            reserve,
        }
    }

    /// Use a specific bankruptcy resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: BankruptcyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    fn affordable(&self, state: &GameState, me: PlayerId, cost: Money) -> bool {
        state.balance(me) - cost >= self.reserve
    }
}

impl Agent for GreedyAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_buy_property(&mut self, state: &GameState, me: PlayerId, tile: TileId) -> bool {
        let price = state.tile(tile).and_then(|t| t.price()).unwrap_or(0);
        self.affordable(state, me, price)
    }

    /// Cheapest legal step first, while the running total stays affordable.
    fn upgrading_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<PropertyGroup> {
        let mut steps: Vec<(PropertyGroup, Money)> = PropertyGroup::ALL
            .into_iter()
            .filter(|g| validation::validate_upgrade_group(state, me, *g).is_ok())
            .map(|g| {
                let cost = if state.houses(g) >= 4 {
                    validation::hotel_cost(state, g)
                } else {
                    validation::house_cost(state, g)
                };
                (g, cost)
            })
            .collect();
        steps.sort_by_key(|(_, cost)| *cost);

        let mut spent = 0;
        steps
            .into_iter()
            .take_while(|(_, cost)| {
                spent += cost;
                self.affordable(state, me, spent)
            })
            .map(|(g, _)| g)
            .collect()
    }

    fn unmortgaging_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<TileId> {
        let mut spent = 0;
        state
            .properties(me)
            .iter()
            .copied()
            .filter(|t| validation::validate_unmortgage_property(state, me, *t).is_ok())
            .take_while(|t| {
                spent += state.tile(*t).and_then(|i| i.buyback_price()).unwrap_or(0);
                self.affordable(state, me, spent)
            })
            .collect()
    }

    fn should_pay_jail_fine(&mut self, state: &GameState, me: PlayerId) -> bool {
        self.affordable(state, me, state.config().jail_fine)
    }

    fn should_use_jail_card(&mut self, _state: &GameState, _me: PlayerId) -> bool {
        true
    }

    fn handle_bankruptcy(&mut self, state: &GameState, me: PlayerId, amount_owed: Money) -> BankruptcyRequest {
        self.resolver.plan(state, me, amount_owed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_respects_reserve() {
        let mut state = GameState::new(["A", "B"]);
        let me = PlayerId::new(0);
        let mut agent = GreedyAgent::new("greedy", 1200);
        assert!(agent.should_buy_property(&state, me, TileId(5)));
        assert!(!agent.should_buy_property(&state, me, TileId(39)));

        state.ledger_mut(me).balance = 1220;
        assert!(!agent.should_pay_jail_fine(&state, me));
    }

    #[test]
    fn test_upgrades_until_reserve() {
        let mut state = GameState::new(["A", "B"]);
        let me = PlayerId::new(0);
        for t in [1, 3, 6, 8, 9] {
            state.transfer_tile(TileId(t), Some(me));
        }
        // brown costs 100, light blue 150
        state.ledger_mut(me).balance = 1250;
        let mut agent = GreedyAgent::new("greedy", 1100);
        assert_eq!(agent.upgrading_suggestions(&state, me), vec![PropertyGroup::Brown]);
    }
}
