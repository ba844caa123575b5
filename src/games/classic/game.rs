//! Classic turn loop.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::cards::{CardEffect, Deck};
use crate::agents::Agent;
use crate::board::{Board, SpecialKind, TileId};
use crate::core::{DiceRoll, GameConfig, GameRng, GameState, Money, PlayerId};
use crate::rules::{validation, Command, EngineResult, RentContext};

/// Result of a finished match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchResult {
    /// Last player standing, or sole richest at the turn limit.
    Winner(PlayerId),
    /// Tied on net worth at the turn limit.
    Winners(Vec<PlayerId>),
}

impl MatchResult {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            MatchResult::Winner(p) => *p == player,
            MatchResult::Winners(ps) => ps.contains(&player),
        }
    }
}

/// Match-level settings.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Player turns before the match is decided on net worth.
    pub max_turns: u32,
    /// Seed for dice and decks.
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_turns: 1000,
            seed: 0,
        }
    }
}

/// Why a match could not be set up.
#[derive(Debug, Error)]
pub enum MatchError {
    /// Seat count outside the rules' range.
    #[error("{count} players, rules allow {min}..={max}")]
    PlayerCount {
        /// Seats requested.
        count: usize,
        /// Smallest table.
        min: usize,
        /// Largest table.
        max: usize,
    },
}

/// Who receives a payment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Payee {
    Bank,
    Player(PlayerId),
}

/// How a jailed player's turn begins.
enum JailExit {
    /// Left jail before rolling; take a normal turn.
    Free,
    /// Left jail with this roll; move once.
    MoveWith(DiceRoll),
    /// Still inside.
    Stay,
}

/// Builder for a [`ClassicMatch`].
pub struct ClassicMatchBuilder {
    seats: Vec<(String, Box<dyn Agent>)>,
    rules: GameConfig,
    board: Arc<Board>,
    config: MatchConfig,
}

impl Default for ClassicMatchBuilder {
    fn default() -> Self {
        Self {
            seats: Vec::new(),
            rules: GameConfig::default(),
            board: Arc::new(Board::classic()),
            config: MatchConfig::default(),
        }
    }
}

impl ClassicMatchBuilder {
    /// Empty table on the classic board with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seat a player, in turn order.
    pub fn player(mut self, name: impl Into<String>, agent: impl Agent + 'static) -> Self {
        self.seats.push((name.into(), Box::new(agent)));
        self
    }

    /// Table rules such as starting cash and player limits.
    pub fn rules(mut self, rules: GameConfig) -> Self {
        self.rules = rules;
        self
    }

    /// Play on a custom board instead of the classic one.
    pub fn board(mut self, board: Arc<Board>) -> Self {
        self.board = board;
        self
    }

    /// Turn cap; at the cap the richest active player wins.
    pub fn max_turns(mut self, turns: u32) -> Self {
        self.config.max_turns = turns;
        self
    }

    /// Seed for the dice and card decks.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Build the match.
    pub fn build(self) -> Result<ClassicMatch, MatchError> {
        let count = self.seats.len();
        if !self.rules.allows_player_count(count) {
            return Err(MatchError::PlayerCount {
                count,
                min: self.rules.min_players,
                max: self.rules.max_players,
            });
        }

        let (names, agents): (Vec<String>, Vec<Box<dyn Agent>>) = self.seats.into_iter().unzip();
        let rng = GameRng::new(self.config.seed);
        let chance = Deck::chance(&self.board);
        let community_chest = Deck::community_chest(&self.board);
        let state = GameState::with_rules(names, self.board, self.rules);

        Ok(ClassicMatch {
            state,
            agents,
            dice: rng.for_context("dice"),
            decks: rng.for_context("decks"),
            chance,
            community_chest,
            config: self.config,
            turns: 0,
        })
    }
}

/// A classic match: ledger, agents, dice and decks.
pub struct ClassicMatch {
    state: GameState,
    agents: Vec<Box<dyn Agent>>,
    dice: GameRng,
    decks: GameRng,
    chance: Deck,
    community_chest: Deck,
    config: MatchConfig,
    turns: u32,
}

impl ClassicMatch {
    /// The ledger.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Player turns taken so far.
    #[must_use]
    pub fn turns_played(&self) -> u32 {
        self.turns
    }

    /// Match-level settings.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Result if the match is over.
    #[must_use]
    pub fn result(&self) -> Option<MatchResult> {
        let active: Vec<PlayerId> = self.state.active_players().collect();
        if active.len() <= 1 {
            return active.first().map(|p| MatchResult::Winner(*p));
        }
        if self.turns < self.config.max_turns {
            return None;
        }

        let best = active.iter().map(|p| self.state.net_worth(*p)).max()?;
        let mut richest: Vec<PlayerId> = active
            .into_iter()
            .filter(|p| self.state.net_worth(*p) == best)
            .collect();
        if richest.len() == 1 {
            richest.pop().map(MatchResult::Winner)
        } else {
            Some(MatchResult::Winners(richest))
        }
    }

    /// Play until someone wins or the turn limit is reached.
    pub fn run(&mut self) -> EngineResult<MatchResult> {
        loop {
            if let Some(result) = self.result() {
                info!("match over after {} turns: {result:?}", self.turns);
                return Ok(result);
            }
            self.play_turn()?;
        }
    }

    /// Play the current player's turn and pass to the next.
    ///
    /// Errors only if the engine rejects a step the loop already validated.
    pub fn play_turn(&mut self) -> EngineResult<()> {
        let player = self.state.current_player();
        if self.state.is_active(player) {
            self.take_turn(player)?;
        }
        self.state.end_turn();
        self.turns += 1;
        Ok(())
    }

    fn take_turn(&mut self, player: PlayerId) -> EngineResult<()> {
        if self.state.in_jail(player) {
            match self.leave_jail(player)? {
                JailExit::Stay => {
                    // Jailed players still manage their assets; they just don't trade.
                    if self.state.is_active(player) {
                        self.manage_assets(player);
                    }
                    return Ok(());
                }
                JailExit::MoveWith(roll) => {
                    let landed = self.state.move_player(player, roll)?;
                    self.resolve_landing(player, landed, RentContext::rolled(roll.total()))?;
                }
                JailExit::Free => self.roll_and_move(player)?,
            }
        } else {
            self.roll_and_move(player)?;
        }

        if self.state.is_active(player) {
            self.manage_assets(player);
            self.propose_trades(player);
        }
        Ok(())
    }

    fn leave_jail(&mut self, player: PlayerId) -> EngineResult<JailExit> {
        let agent = &mut self.agents[player.index()];
        if self.state.jail_cards(player) > 0 && agent.should_use_jail_card(&self.state, player) {
            self.state.use_jail_card(player)?;
            return Ok(JailExit::Free);
        }
        if validation::validate_pay_jail_fine(&self.state, player).is_ok()
            && agent.should_pay_jail_fine(&self.state, player)
        {
            self.state.pay_jail_fine(player)?;
            return Ok(JailExit::Free);
        }

        let roll = self.dice.roll_dice();
        if roll.is_double() {
            self.state.get_out_of_jail(player)?;
            return Ok(JailExit::MoveWith(roll));
        }

        let turns = self.state.count_turn_in_jail(player)?;
        if turns < self.state.config().max_turns_in_jail {
            return Ok(JailExit::Stay);
        }
        debug!("{player} must pay the fine after {turns} turns in jail");
        let fine = self.state.config().jail_fine;
        if !self.raise_cash(player, fine, Payee::Bank)? {
            return Ok(JailExit::Stay);
        }
        self.state.pay_jail_fine(player)?;
        Ok(JailExit::MoveWith(roll))
    }

    fn roll_and_move(&mut self, player: PlayerId) -> EngineResult<()> {
        loop {
            let roll = self.dice.roll_dice();
            let landed = self.state.move_player(player, roll)?;
            if self.state.in_jail(player) {
                return Ok(());
            }
            self.resolve_landing(player, landed, RentContext::rolled(roll.total()))?;
            if !roll.is_double() || !self.state.is_active(player) || self.state.in_jail(player) {
                return Ok(());
            }
        }
    }

    fn resolve_landing(&mut self, player: PlayerId, tile: TileId, ctx: RentContext) -> EngineResult<()> {
        let Some((ownable, kind)) = self.state.tile(tile).map(|t| (t.is_ownable(), t.special_kind())) else {
            return Ok(());
        };

        if ownable {
            match self.state.owner_of(tile) {
                None => {
                    let agent = &mut self.agents[player.index()];
                    if validation::validate_buy_property(&self.state, player, tile).is_ok()
                        && agent.should_buy_property(&self.state, player, tile)
                    {
                        self.state.buy_property(player, tile)?;
                    }
                }
                Some(owner) if owner != player && !self.state.is_mortgaged(tile) => {
                    let (_, rent) = validation::rent_owed(&self.state, player, tile, ctx)?;
                    if self.raise_cash(player, rent, Payee::Player(owner))? {
                        self.state.pay_rent(player, tile, ctx)?;
                    }
                }
                Some(_) => {}
            }
            return Ok(());
        }

        match kind {
            Some(SpecialKind::Tax(amount)) => {
                self.settle(player, amount, Payee::Bank)?;
            }
            Some(SpecialKind::Chance) => self.draw_card(player, true, ctx)?,
            Some(SpecialKind::CommunityChest) => self.draw_card(player, false, ctx)?,
            _ => {}
        }
        Ok(())
    }

    fn draw_card(&mut self, player: PlayerId, chance: bool, ctx: RentContext) -> EngineResult<()> {
        let deck = if chance {
            &mut self.chance
        } else {
            &mut self.community_chest
        };
        let Some(card) = deck.draw(&mut self.decks) else {
            return Ok(());
        };
        debug!("{player} drew \"{}\"", card.text);
        let effect = card.effect;

        match effect {
            CardEffect::AdvanceTo(tile) => self.advance_to(player, tile, ctx)?,
            CardEffect::NearestRailway { rent_multiplier } => {
                if let Some(tile) = self.state.board().nearest_railway(self.state.position(player)) {
                    self.advance_to(player, tile, ctx.with_multiplier(rent_multiplier))?;
                }
            }
            CardEffect::NearestUtility { rent_multiplier } => {
                if let Some(tile) = self.state.board().nearest_utility(self.state.position(player)) {
                    self.advance_to(player, tile, ctx.with_multiplier(rent_multiplier))?;
                }
            }
            CardEffect::GoBack(steps) => {
                let landed = self.state.move_backwards(player, steps)?;
                if !self.state.in_jail(player) {
                    self.resolve_landing(player, landed, ctx)?;
                }
            }
            CardEffect::GoToJail => self.state.send_to_jail(player)?,
            CardEffect::GetOutOfJailFree => {
                if let Err(err) = self.state.receive_jail_card(player) {
                    debug!("jail card discarded: {err}");
                }
            }
            CardEffect::Collect(amount) => self.state.receive_from_bank(player, amount)?,
            CardEffect::Pay(amount) => {
                self.settle(player, amount, Payee::Bank)?;
            }
            CardEffect::PayEachPlayer(amount) => {
                let others: Vec<PlayerId> = self.state.active_players().filter(|p| *p != player).collect();
                for other in others {
                    if !self.settle(player, amount, Payee::Player(other))? {
                        break;
                    }
                }
            }
            CardEffect::CollectFromEachPlayer(amount) => {
                let others: Vec<PlayerId> = self.state.active_players().filter(|p| *p != player).collect();
                for other in others {
                    self.settle(other, amount, Payee::Player(player))?;
                }
            }
            CardEffect::Repairs { per_house, per_hotel } => {
                let (houses, hotels) = self.state.building_counts(player);
                let bill = Money::from(houses) * per_house + Money::from(hotels) * per_hotel;
                if bill > 0 {
                    self.settle(player, bill, Payee::Bank)?;
                }
            }
        }
        Ok(())
    }

    fn advance_to(&mut self, player: PlayerId, tile: TileId, ctx: RentContext) -> EngineResult<()> {
        let landed = self.state.move_to_tile(player, tile)?;
        if self.state.in_jail(player) {
            return Ok(());
        }
        self.resolve_landing(player, landed, ctx)
    }

    /// Pay `amount`, liquidating first if needed. Returns whether it was paid.
    fn settle(&mut self, payer: PlayerId, amount: Money, payee: Payee) -> EngineResult<bool> {
        if !self.raise_cash(payer, amount, payee)? {
            return Ok(false);
        }
        match payee {
            Payee::Bank => self.state.pay_bank(payer, amount)?,
            Payee::Player(to) => self.state.pay_player(payer, to, amount)?,
        }
        Ok(true)
    }

    /// Make sure `player` holds `amount`, asking their agent for a liquidation
    /// plan when short. A player who still cannot pay hands their remaining
    /// cash to the creditor and is eliminated.
    fn raise_cash(&mut self, player: PlayerId, amount: Money, payee: Payee) -> EngineResult<bool> {
        if self.state.balance(player) >= amount {
            return Ok(true);
        }

        let request = self.agents[player.index()].handle_bankruptcy(&self.state, player, amount);
        if !request.is_empty() {
            if let Err(err) = self.state.complete_bankruptcy_request(player, &request) {
                warn!("{player} liquidation plan rejected: {err}");
            }
        }
        if self.state.balance(player) >= amount {
            return Ok(true);
        }

        info!("{player} is bankrupt owing {amount}");
        let remaining = self.state.balance(player);
        if let Payee::Player(creditor) = payee {
            if remaining > 0 {
                self.state.pay_player(player, creditor, remaining)?;
            }
        }
        self.state.eliminate_player(player)?;
        Ok(false)
    }

    /// Apply an agent suggestion, dropping it if the gate refuses.
    fn attempt(&mut self, command: Command) {
        if let Err(err) = self.state.validate(&command) {
            warn!("discarding suggestion {command:?}: {err}");
            return;
        }
        if let Err(err) = self.state.apply(command) {
            warn!("suggestion failed after validation: {err}");
        }
    }

    fn manage_assets(&mut self, player: PlayerId) {
        let agent = &mut self.agents[player.index()];
        let mortgages = agent.mortgaging_suggestions(&self.state, player);
        let unmortgages = agent.unmortgaging_suggestions(&self.state, player);
        let downgrades = agent.downgrading_suggestions(&self.state, player);
        let upgrades = agent.upgrading_suggestions(&self.state, player);

        for tile in mortgages {
            self.attempt(Command::MortgageProperty { player, tile });
        }
        for tile in unmortgages {
            self.attempt(Command::UnmortgageProperty { player, tile });
        }
        for group in downgrades {
            self.attempt(Command::DowngradeGroup { player, group });
        }
        for group in upgrades {
            self.attempt(Command::UpgradeGroup { player, group });
        }
    }

    fn propose_trades(&mut self, player: PlayerId) {
        let offers = self.agents[player.index()].trade_offers(&self.state, player);
        for offer in offers {
            if offer.source != player {
                warn!("{player} proposed a trade on behalf of {}", offer.source);
                continue;
            }
            if let Err(err) = validation::validate_trade_offer(&self.state, &offer) {
                warn!("discarding trade {offer}: {err}");
                continue;
            }
            let target = offer.target;
            if self.agents[target.index()].should_accept_trade(&self.state, target, &offer) {
                self.attempt(Command::ExecuteTrade(offer));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::GreedyAgent;
    use crate::board::PropertyGroup;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sits in jail and counts how often it is asked about its assets.
    struct JailSitter {
        asked: Arc<AtomicUsize>,
    }

    impl Agent for JailSitter {
        fn name(&self) -> &str {
            "sitter"
        }

        fn should_buy_property(&mut self, _: &GameState, _: PlayerId, _: TileId) -> bool {
            false
        }

        fn upgrading_suggestions(&mut self, _: &GameState, _: PlayerId) -> Vec<PropertyGroup> {
            Vec::new()
        }

        fn mortgaging_suggestions(&mut self, _: &GameState, _: PlayerId) -> Vec<TileId> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Vec::new()
        }

        fn unmortgaging_suggestions(&mut self, _: &GameState, _: PlayerId) -> Vec<TileId> {
            Vec::new()
        }

        fn should_pay_jail_fine(&mut self, _: &GameState, _: PlayerId) -> bool {
            false
        }

        fn should_use_jail_card(&mut self, _: &GameState, _: PlayerId) -> bool {
            false
        }
    }

    #[test]
    fn test_builder_rejects_small_table() {
        let err = ClassicMatchBuilder::new()
            .player("solo", GreedyAgent::new("solo", 0))
            .build()
            .err();
        assert!(matches!(err, Some(MatchError::PlayerCount { count: 1, .. })));
    }

    #[test]
    fn test_turn_limit_decides_on_net_worth() {
        let mut game = ClassicMatchBuilder::new()
            .player("a", GreedyAgent::new("a", 0))
            .player("b", GreedyAgent::new("b", 0))
            .max_turns(0)
            .build()
            .unwrap();
        assert_eq!(
            game.run().unwrap(),
            MatchResult::Winners(vec![PlayerId::new(0), PlayerId::new(1)])
        );
    }

    #[test]
    fn test_turns_advance_seats() {
        let mut game = ClassicMatchBuilder::new()
            .player("a", GreedyAgent::new("a", 100))
            .player("b", GreedyAgent::new("b", 100))
            .seed(11)
            .build()
            .unwrap();
        game.play_turn().unwrap();
        assert_eq!(game.turns_played(), 1);
        assert_eq!(game.state().current_player(), PlayerId::new(1));
    }

    #[test]
    fn test_jailed_player_still_manages_assets() {
        let mut stayed = 0;
        for seed in 0..20 {
            let asked = Arc::new(AtomicUsize::new(0));
            let mut game = ClassicMatchBuilder::new()
                .player("sitter", JailSitter { asked: Arc::clone(&asked) })
                .player("b", GreedyAgent::new("b", 0))
                .seed(seed)
                .build()
                .unwrap();
            game.state.send_to_jail(PlayerId::new(0)).unwrap();

            game.play_turn().unwrap();
            if game.state().in_jail(PlayerId::new(0)) {
                stayed += 1;
                assert_eq!(game.state().turns_in_jail(PlayerId::new(0)), 1);
            }
            assert_eq!(asked.load(Ordering::SeqCst), 1, "seed {seed}");
        }
        assert!(stayed > 0);
    }
}
