//! Greedy liquidation planner.
//!
//! Given a player owing more than they hold, rank what they could sell or
//! mortgage by value kept per unit of cash raised, then consume the cheapest
//! assets first until the shortfall is covered. Each candidate step is run
//! through the engine on a scratch copy, so a step the gate would reject is
//! skipped rather than planned.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::request::BankruptcyRequest;
use super::valuation::{AssetValuation, PriceValuation};
use crate::board::{PropertyGroup, TileId};
use crate::core::{GameState, Money, PlayerId};
use crate::rules::validation;

/// Resolver tuning.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Sell buildings before mortgaging (`true`), or the reverse.
    pub liquidity_priority: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            liquidity_priority: true,
        }
    }
}

/// What the resolver concluded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Cash already covers the debt.
    Solvent,
    /// Replaying this plan covers the shortfall.
    Liquidate(BankruptcyRequest),
    /// Even liquidating everything falls short.
    Insolvent,
}

impl Resolution {
    /// The plan as a request; empty unless liquidation is possible.
    #[must_use]
    pub fn into_request(self) -> BankruptcyRequest {
        match self {
            Resolution::Liquidate(request) => request,
            Resolution::Solvent | Resolution::Insolvent => BankruptcyRequest::new(),
        }
    }

    /// Can the player pay after this resolution?
    #[must_use]
    pub fn is_solvent(&self) -> bool {
        !matches!(self, Resolution::Insolvent)
    }
}

/// Greedy bankruptcy resolver with a pluggable valuation.
#[derive(Clone)]
pub struct BankruptcyResolver {
    config: ResolverConfig,
    valuation: Arc<dyn AssetValuation>,
}

impl std::fmt::Debug for BankruptcyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BankruptcyResolver")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for BankruptcyResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

struct Ranked<T> {
    asset: T,
    score: f64,
}

fn ascending<T>(a: &Ranked<T>, b: &Ranked<T>) -> Ordering {
    a.score.total_cmp(&b.score)
}

impl BankruptcyResolver {
    /// Resolver using [`PriceValuation`].
    #[must_use]
    pub fn new(config: ResolverConfig) -> Self {
        Self::with_valuation(config, Arc::new(PriceValuation::default()))
    }

    /// Resolver using a custom valuation.
    #[must_use]
    pub fn with_valuation(config: ResolverConfig, valuation: Arc<dyn AssetValuation>) -> Self {
        Self { config, valuation }
    }

    /// Tuning in force.
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Plan how `player` raises enough cash to pay `amount`.
    #[must_use]
    pub fn resolve(&self, state: &GameState, player: PlayerId, amount: Money) -> Resolution {
        if validation::validate_active(state, player).is_err() {
            return Resolution::Insolvent;
        }
        let shortfall = amount - state.balance(player);
        if shortfall <= 0 {
            return Resolution::Solvent;
        }

        let groups = self.rank_groups(state, player);
        let tiles = self.rank_tiles(state, player);

        let mut scratch = state.clone();
        let mut request = BankruptcyRequest::new();
        let mut raised: Money = 0;

        if self.config.liquidity_priority {
            raised += Self::consume_groups(&mut scratch, player, &groups, shortfall - raised, &mut request);
            raised += Self::consume_tiles(&mut scratch, player, &tiles, shortfall - raised, &mut request);
        } else {
            raised += Self::consume_tiles(&mut scratch, player, &tiles, shortfall - raised, &mut request);
            raised += Self::consume_groups(&mut scratch, player, &groups, shortfall - raised, &mut request);
        }

        if raised < shortfall {
            debug!("{player} cannot cover shortfall {shortfall}: at most {raised} available");
            return Resolution::Insolvent;
        }
        debug!(
            "{player} covers shortfall {shortfall} with {} downgrades and {} mortgages",
            request.downgrades.len(),
            request.mortgages.len()
        );
        Resolution::Liquidate(request)
    }

    /// Shorthand for `resolve(..).into_request()`.
    #[must_use]
    pub fn plan(&self, state: &GameState, player: PlayerId, amount: Money) -> BankruptcyRequest {
        self.resolve(state, player, amount).into_request()
    }

    /// Groups `player` has built on, by value kept per cash raised, ascending.
    ///
    /// Groups with a mortgaged member or no development are not candidates.
    fn rank_groups(&self, state: &GameState, player: PlayerId) -> Vec<Ranked<PropertyGroup>> {
        let mut ranked: Vec<_> = state
            .developed_groups(player)
            .filter(|g| state.owns_full_group(player, *g) && state.mortgaged_member(*g).is_none())
            .map(|group| {
                let dev = state.development(group);
                let recoverable = if dev.hotels > 0 {
                    validation::hotel_cost(state, group) / 2
                } else {
                    validation::house_cost(state, group) / 2
                };
                let kept = self.valuation.group_value(state, player, group) / f64::from(dev.level());
                Ranked {
                    asset: group,
                    score: kept / recoverable.max(1) as f64,
                }
            })
            .collect();
        ranked.sort_by(ascending);
        ranked
    }

    /// Unmortgaged tiles outside developed groups, by value per mortgage cash.
    fn rank_tiles(&self, state: &GameState, player: PlayerId) -> Vec<Ranked<TileId>> {
        let mut ranked: Vec<_> = state
            .properties(player)
            .iter()
            .copied()
            .filter(|t| validation::validate_mortgage_property(state, player, *t).is_ok())
            .filter_map(|tile| {
                let value = state.tile(tile)?.mortgage_value()?;
                let score = if value > 0 {
                    self.valuation.tile_value(state, player, tile) / value as f64
                } else {
                    f64::INFINITY
                };
                Some(Ranked { asset: tile, score })
            })
            .collect();
        ranked.sort_by(ascending);
        ranked
    }

    fn consume_groups(
        scratch: &mut GameState,
        player: PlayerId,
        ranked: &[Ranked<PropertyGroup>],
        needed: Money,
        request: &mut BankruptcyRequest,
    ) -> Money {
        let mut raised = 0;
        for Ranked { asset: group, .. } in ranked {
            while raised < needed {
                match scratch.downgrade_group(player, *group) {
                    Ok(refund) => {
                        raised += refund;
                        request.downgrades.push(*group);
                    }
                    Err(_) => break,
                }
            }
        }
        raised
    }

    fn consume_tiles(
        scratch: &mut GameState,
        player: PlayerId,
        ranked: &[Ranked<TileId>],
        needed: Money,
        request: &mut BankruptcyRequest,
    ) -> Money {
        let mut raised = 0;
        for Ranked { asset: tile, .. } in ranked {
            if raised >= needed {
                break;
            }
            if let Ok(value) = scratch.mortgage_property(player, *tile) {
                raised += value;
                request.mortgages.push(*tile);
            }
        }
        raised
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bankruptcy::FnValuation;

    fn a() -> PlayerId {
        PlayerId::new(0)
    }

    #[test]
    fn test_solvent_player_needs_nothing() {
        let state = GameState::new(["A", "B"]);
        let resolver = BankruptcyResolver::default();
        assert_eq!(resolver.resolve(&state, a(), 100), Resolution::Solvent);
        assert!(resolver.plan(&state, a(), 100).is_empty());
    }

    #[test]
    fn test_insolvent_without_assets() {
        let mut state = GameState::new(["A", "B"]);
        state.ledger_mut(a()).balance = 10;
        let resolver = BankruptcyResolver::default();
        assert_eq!(resolver.resolve(&state, a(), 100), Resolution::Insolvent);
    }

    #[test]
    fn test_mortgages_cheapest_first() {
        let mut state = GameState::new(["A", "B"]);
        state.ledger_mut(a()).balance = 0;
        state.transfer_tile(TileId(39), Some(a()));
        state.transfer_tile(TileId(5), Some(a()));

        // Valuing Boardwalk highly keeps it out of the plan.
        let valuation = FnValuation::new(|_: &GameState, _: PlayerId, t: TileId| if t == TileId(39) { 1e6 } else { 1.0 });
        let resolver = BankruptcyResolver::with_valuation(ResolverConfig::default(), Arc::new(valuation));
        let request = resolver.plan(&state, a(), 80);
        assert_eq!(request.mortgages, vec![TileId(5)]);
        assert!(request.recoverable_funds(&state) >= 80);
    }

    #[test]
    fn test_downgrades_repeat_until_covered() {
        let mut state = GameState::new(["A", "B"]);
        state.transfer_tile(TileId(1), Some(a()));
        state.transfer_tile(TileId(3), Some(a()));
        let dev = state.development_mut(PropertyGroup::Brown);
        dev.houses = 3;
        dev.house_owner = Some(a());
        state.ledger_mut(a()).balance = 0;

        let request = BankruptcyResolver::default().plan(&state, a(), 100);
        assert_eq!(request.downgrades, vec![PropertyGroup::Brown, PropertyGroup::Brown]);
        assert!(request.mortgages.is_empty());
    }

    #[test]
    fn test_mortgage_first_without_liquidity_priority() {
        let mut state = GameState::new(["A", "B"]);
        state.transfer_tile(TileId(1), Some(a()));
        state.transfer_tile(TileId(3), Some(a()));
        let dev = state.development_mut(PropertyGroup::Brown);
        dev.houses = 1;
        dev.house_owner = Some(a());
        state.transfer_tile(TileId(5), Some(a()));
        state.ledger_mut(a()).balance = 0;

        let resolver = BankruptcyResolver::new(ResolverConfig {
            liquidity_priority: false,
        });
        let request = resolver.plan(&state, a(), 90);
        assert_eq!(request.mortgages, vec![TileId(5)]);
        assert!(request.downgrades.is_empty());
    }
}
