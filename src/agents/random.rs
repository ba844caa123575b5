//! Coin-flip agent.

use crate::bankruptcy::{BankruptcyRequest, BankruptcyResolver};
use crate::board::{PropertyGroup, TileId};
use crate::core::{GameRng, GameState, Money, PlayerId};
use crate::rules::validation;
use crate::trade::TradeOffer;

use super::Agent;

/// Takes every legal option with a fixed probability.
///
/// Seeded, so a match of random agents replays exactly.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    name: String,
    rng: GameRng,
    resolver: BankruptcyResolver,
    /// Probability of taking any single yes/no option.
    pub eagerness: f64,
    /// Probability of proposing a trade on a given turn.
    pub trade_rate: f64,
}

impl RandomAgent {
    /// Agent with 50% eagerness and occasional trades.
    #[must_use]
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: GameRng::new(seed),
            resolver: BankruptcyResolver::default(),
            eagerness: 0.5,
            trade_rate: 0.05,
        }
    }

    /// Use a specific bankruptcy resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: BankruptcyResolver) -> Self {
        self.resolver = resolver;
        self
    }

    fn coin(&mut self) -> bool {
        self.rng.gen_bool(self.eagerness)
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> Option<T> {
        if items.is_empty() {
            None
        } else {
            Some(items[self.rng.gen_range_usize(0..items.len())])
        }
    }
}

impl Agent for RandomAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn should_buy_property(&mut self, _state: &GameState, _me: PlayerId, _tile: TileId) -> bool {
        self.coin()
    }

    fn upgrading_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<PropertyGroup> {
        PropertyGroup::ALL
            .into_iter()
            .filter(|g| validation::validate_upgrade_group(state, me, *g).is_ok())
            .filter(|_| self.coin())
            .collect()
    }

    fn downgrading_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<PropertyGroup> {
        let rate = self.eagerness / 5.0;
        state
            .developed_groups(me)
            .filter(|_| self.rng.gen_bool(rate))
            .collect()
    }

    fn mortgaging_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<TileId> {
        let rate = self.eagerness / 5.0;
        state
            .properties(me)
            .iter()
            .copied()
            .filter(|t| validation::validate_mortgage_property(state, me, *t).is_ok())
            .filter(|_| self.rng.gen_bool(rate))
            .collect()
    }

    fn unmortgaging_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<TileId> {
        state
            .properties(me)
            .iter()
            .copied()
            .filter(|t| validation::validate_unmortgage_property(state, me, *t).is_ok())
            .filter(|_| self.coin())
            .collect()
    }

    fn should_pay_jail_fine(&mut self, _state: &GameState, _me: PlayerId) -> bool {
        self.coin()
    }

    fn should_use_jail_card(&mut self, _state: &GameState, _me: PlayerId) -> bool {
        self.coin()
    }

    fn should_accept_trade(&mut self, _state: &GameState, _me: PlayerId, _offer: &TradeOffer) -> bool {
        self.coin()
    }

    /// At most one tile-for-tile swap with a random opponent.
    fn trade_offers(&mut self, state: &GameState, me: PlayerId) -> Vec<TradeOffer> {
        if !self.rng.gen_bool(self.trade_rate) {
            return Vec::new();
        }
        let opponents: Vec<PlayerId> = state.active_players().filter(|p| *p != me).collect();
        let Some(target) = self.pick(&opponents) else {
            return Vec::new();
        };

        let tradeable = |holder: PlayerId| -> Vec<TileId> {
            state
                .properties(holder)
                .iter()
                .copied()
                .filter(|t| {
                    let offer = TradeOffer::new(holder, if holder == me { target } else { me }).offer_tiles([*t]);
                    validation::validate_trade_offer(state, &offer).is_ok()
                })
                .collect()
        };
        let mine = tradeable(me);
        let theirs = tradeable(target);
        match (self.pick(&mine), self.pick(&theirs)) {
            (Some(give), Some(take)) => {
                vec![TradeOffer::new(me, target).offer_tiles([give]).request_tiles([take])]
            }
            _ => Vec::new(),
        }
    }

    fn handle_bankruptcy(&mut self, state: &GameState, me: PlayerId, amount_owed: Money) -> BankruptcyRequest {
        self.resolver.plan(state, me, amount_owed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_choices() {
        let state = GameState::new(["A", "B"]);
        let me = PlayerId::new(0);
        let mut a = RandomAgent::new("a", 9);
        let mut b = RandomAgent::new("b", 9);
        for _ in 0..20 {
            assert_eq!(
                a.should_buy_property(&state, me, TileId(1)),
                b.should_buy_property(&state, me, TileId(1))
            );
        }
    }

    #[test]
    fn test_suggestions_are_legal() {
        let mut state = GameState::new(["A", "B"]);
        let me = PlayerId::new(0);
        state.transfer_tile(TileId(1), Some(me));
        state.transfer_tile(TileId(3), Some(me));
        let mut agent = RandomAgent::new("a", 1);
        agent.eagerness = 1.0;
        assert_eq!(agent.upgrading_suggestions(&state, me), vec![PropertyGroup::Brown]);
        assert!(agent.unmortgaging_suggestions(&state, me).is_empty());
    }

    #[test]
    fn test_trade_offer_is_valid() {
        let mut state = GameState::new(["A", "B"]);
        let me = PlayerId::new(0);
        state.transfer_tile(TileId(1), Some(me));
        state.transfer_tile(TileId(6), Some(PlayerId::new(1)));
        let mut agent = RandomAgent::new("a", 3);
        agent.trade_rate = 1.0;
        let offers = agent.trade_offers(&state, me);
        assert_eq!(offers.len(), 1);
        assert_eq!(validation::validate_trade_offer(&state, &offers[0]), Ok(()));
    }
}
