//! The game state engine: the only code path that mutates the ledger.
//!
//! Every mutator follows the same contract:
//!
//! 1. Call the matching validator from [`super::validation`].
//! 2. On rejection, return the error with the state untouched.
//! 3. On success, apply the whole update before returning.
//!
//! Multi-step operations (bankruptcy replay) run on a scratch clone and commit
//! by assignment, so no intermediate state is ever observable. Cloning is
//! cheap: the ledger is built from `im` collections and an `Arc` catalog.

use tracing::{debug, info, trace};

use super::error::EngineResult;
use super::invariants;
use super::rent::RentContext;
use super::validation as gate;
use crate::bankruptcy::BankruptcyRequest;
use crate::board::{PropertyGroup, TileId};
use crate::core::{DiceRoll, GameState, GroupDevelopment, Money, PlayerId};
use crate::trade::TradeOffer;

/// Trace a rejection on its way out of the engine.
fn checked<T>(op: &'static str, result: EngineResult<T>) -> EngineResult<T> {
    if let Err(err) = &result {
        trace!("{op} rejected: {err}");
    }
    result
}

impl GameState {
    fn audit(&self) {
        if cfg!(debug_assertions) {
            let violations = invariants::check(self);
            debug_assert!(violations.is_empty(), "ledger invariants broken: {violations:?}");
        }
    }

    // === Movement ===

    /// Move by a dice roll.
    ///
    /// Doubles bump the consecutive-doubles counter; the configured number in a
    /// row sends the player straight to jail without moving or collecting Go
    /// income. Passing Go pays `pass_go_income`; landing on Go To Jail jails.
    /// Returns the final position.
    pub fn move_player(&mut self, player: PlayerId, roll: DiceRoll) -> EngineResult<TileId> {
        checked("move_player", gate::validate_move_player(self, player, roll))?;

        if roll.is_double() {
            self.doubles_rolled += 1;
            if self.doubles_rolled >= self.config.doubles_to_jail {
                debug!("{player} rolled {} doubles in a row", self.doubles_rolled);
                self.jail(player);
                self.audit();
                return Ok(self.board.jail());
            }
        }

        let (to, passed_go) = self.board.advance(self.position(player), usize::from(roll.total()));
        let landed = self.arrive(player, to, passed_go);
        self.audit();
        Ok(landed)
    }

    /// Relocate directly to `tile`, collecting Go income if the move wraps.
    pub fn move_to_tile(&mut self, player: PlayerId, tile: TileId) -> EngineResult<TileId> {
        checked("move_to_tile", gate::validate_move_to_tile(self, player, tile))?;
        let passed_go = tile.index() < self.position(player).index();
        let landed = self.arrive(player, tile, passed_go);
        self.audit();
        Ok(landed)
    }

    /// Step backwards. Never collects Go income.
    pub fn move_backwards(&mut self, player: PlayerId, steps: u8) -> EngineResult<TileId> {
        checked("move_backwards", gate::validate_move_backwards(self, player, steps))?;
        let len = self.board.len();
        let back = usize::from(steps) % len;
        let to = TileId(((self.position(player).index() + len - back) % len) as u8);
        let landed = self.arrive(player, to, false);
        self.audit();
        Ok(landed)
    }

    fn arrive(&mut self, player: PlayerId, to: TileId, passed_go: bool) -> TileId {
        if passed_go {
            let income = self.config.pass_go_income;
            self.credit(player, income);
            debug!("{player} passed Go, +{income}");
        }
        self.ledger_mut(player).position = to;
        debug!("{player} moved to {to}");

        if to == self.board.go_to_jail() {
            self.jail(player);
        }
        self.position(player)
    }

    // === Bank transfers ===

    /// Buy an unowned tile at its price. Returns the price paid.
    pub fn buy_property(&mut self, player: PlayerId, tile: TileId) -> EngineResult<Money> {
        checked("buy_property", gate::validate_buy_property(self, player, tile))?;
        let price = self.tile(tile).and_then(|t| t.price()).unwrap_or(0);
        self.debit(player, price);
        self.transfer_tile(tile, Some(player));
        debug!("{player} bought {tile} for {price}");
        self.audit();
        Ok(price)
    }

    /// Mortgage a tile. Returns the cash received.
    pub fn mortgage_property(&mut self, player: PlayerId, tile: TileId) -> EngineResult<Money> {
        checked("mortgage_property", gate::validate_mortgage_property(self, player, tile))?;
        let value = self.tile(tile).and_then(|t| t.mortgage_value()).unwrap_or(0);
        self.credit(player, value);
        self.mortgaged.insert(tile);
        debug!("{player} mortgaged {tile} for {value}");
        self.audit();
        Ok(value)
    }

    /// Lift a mortgage. Returns the buy-back price paid.
    pub fn unmortgage_property(&mut self, player: PlayerId, tile: TileId) -> EngineResult<Money> {
        checked("unmortgage_property", gate::validate_unmortgage_property(self, player, tile))?;
        let cost = self.tile(tile).and_then(|t| t.buyback_price()).unwrap_or(0);
        self.debit(player, cost);
        self.mortgaged.remove(&tile);
        debug!("{player} unmortgaged {tile} for {cost}");
        self.audit();
        Ok(cost)
    }

    // === Development ===

    /// One house on every member of the group. Returns the cost.
    pub fn place_house(&mut self, player: PlayerId, group: PropertyGroup) -> EngineResult<Money> {
        checked("place_house", gate::validate_place_house(self, player, group))?;
        let cost = gate::house_cost(self, group);
        self.debit(player, cost);
        let dev = self.development_mut(group);
        dev.houses += 1;
        dev.house_owner = Some(player);
        debug!("{player} built a house on {group} for {cost}");
        self.audit();
        Ok(cost)
    }

    /// Swap four houses for a hotel. The houses are not refunded.
    pub fn place_hotel(&mut self, player: PlayerId, group: PropertyGroup) -> EngineResult<Money> {
        checked("place_hotel", gate::validate_place_hotel(self, player, group))?;
        let cost = gate::hotel_cost(self, group);
        self.debit(player, cost);
        *self.development_mut(group) = GroupDevelopment {
            houses: 0,
            house_owner: None,
            hotels: 1,
            hotel_owner: Some(player),
        };
        debug!("{player} built a hotel on {group} for {cost}");
        self.audit();
        Ok(cost)
    }

    /// Sell one house per member at half cost. Returns the refund.
    pub fn sell_house(&mut self, player: PlayerId, group: PropertyGroup) -> EngineResult<Money> {
        checked("sell_house", gate::validate_sell_house(self, player, group))?;
        let refund = gate::house_cost(self, group) / 2;
        self.credit(player, refund);
        let dev = self.development_mut(group);
        dev.houses -= 1;
        if dev.houses == 0 {
            dev.house_owner = None;
        }
        debug!("{player} sold a house on {group} for {refund}");
        self.audit();
        Ok(refund)
    }

    /// Sell the hotel for half its cost, leaving four houses.
    pub fn sell_hotel(&mut self, player: PlayerId, group: PropertyGroup) -> EngineResult<Money> {
        checked("sell_hotel", gate::validate_sell_hotel(self, player, group))?;
        let refund = gate::hotel_cost(self, group) / 2;
        self.credit(player, refund);
        *self.development_mut(group) = GroupDevelopment {
            houses: 4,
            house_owner: Some(player),
            hotels: 0,
            hotel_owner: None,
        };
        debug!("{player} sold the hotel on {group} for {refund}");
        self.audit();
        Ok(refund)
    }

    /// Next development step: a house, or a hotel once four houses stand.
    pub fn upgrade_group(&mut self, player: PlayerId, group: PropertyGroup) -> EngineResult<Money> {
        if self.houses(group) >= 4 {
            self.place_hotel(player, group)
        } else {
            self.place_house(player, group)
        }
    }

    /// Previous development step: hotel back to houses, or one house less.
    pub fn downgrade_group(&mut self, player: PlayerId, group: PropertyGroup) -> EngineResult<Money> {
        if self.hotels(group) > 0 {
            self.sell_hotel(player, group)
        } else {
            self.sell_house(player, group)
        }
    }

    // === Cash ===

    /// Pay the owner of `tile`. Returns the rent.
    pub fn pay_rent(&mut self, payer: PlayerId, tile: TileId, ctx: RentContext) -> EngineResult<Money> {
        checked("pay_rent", gate::validate_pay_rent(self, payer, tile, ctx))?;
        let (owner, rent) = gate::rent_owed(self, payer, tile, ctx)?;
        self.debit(payer, rent);
        self.credit(owner, rent);
        debug!("{payer} paid {rent} rent to {owner} for {tile}");
        self.audit();
        Ok(rent)
    }

    /// Pay the bank.
    pub fn pay_bank(&mut self, player: PlayerId, amount: Money) -> EngineResult<()> {
        checked("pay_bank", gate::validate_pay_bank(self, player, amount))?;
        self.debit(player, amount);
        debug!("{player} paid {amount} to the bank");
        Ok(())
    }

    /// Collect from the bank.
    pub fn receive_from_bank(&mut self, player: PlayerId, amount: Money) -> EngineResult<()> {
        checked("receive_from_bank", gate::validate_receive_from_bank(self, player, amount))?;
        self.credit(player, amount);
        debug!("{player} received {amount} from the bank");
        Ok(())
    }

    /// Pay another player.
    pub fn pay_player(&mut self, from: PlayerId, to: PlayerId, amount: Money) -> EngineResult<()> {
        checked("pay_player", gate::validate_pay_player(self, from, to, amount))?;
        self.debit(from, amount);
        self.credit(to, amount);
        debug!("{from} paid {amount} to {to}");
        Ok(())
    }

    // === Jail ===

    /// Jail a free player and end their doubles streak.
    pub fn send_to_jail(&mut self, player: PlayerId) -> EngineResult<()> {
        checked("send_to_jail", gate::validate_send_to_jail(self, player))?;
        self.jail(player);
        self.audit();
        Ok(())
    }

    fn jail(&mut self, player: PlayerId) {
        let jail = self.board.jail();
        let ledger = self.ledger_mut(player);
        ledger.in_jail = true;
        ledger.position = jail;
        ledger.turns_in_jail = 0;
        self.doubles_rolled = 0;
        debug!("{player} sent to jail");
    }

    fn release(&mut self, player: PlayerId) {
        let jail = self.board.jail();
        let ledger = self.ledger_mut(player);
        ledger.in_jail = false;
        ledger.turns_in_jail = 0;
        ledger.position = jail;
    }

    /// Leave jail after rolling doubles.
    pub fn get_out_of_jail(&mut self, player: PlayerId) -> EngineResult<()> {
        checked("get_out_of_jail", gate::validate_get_out_of_jail(self, player))?;
        self.release(player);
        debug!("{player} rolled out of jail");
        self.audit();
        Ok(())
    }

    /// Spend a get-out-of-jail card.
    pub fn use_jail_card(&mut self, player: PlayerId) -> EngineResult<()> {
        checked("use_jail_card", gate::validate_use_jail_card(self, player))?;
        self.ledger_mut(player).jail_cards -= 1;
        self.release(player);
        debug!("{player} used a get-out-of-jail card");
        self.audit();
        Ok(())
    }

    /// Pay the fine to leave jail.
    pub fn pay_jail_fine(&mut self, player: PlayerId) -> EngineResult<()> {
        checked("pay_jail_fine", gate::validate_pay_jail_fine(self, player))?;
        let fine = self.config.jail_fine;
        self.debit(player, fine);
        self.release(player);
        debug!("{player} paid {fine} to leave jail");
        self.audit();
        Ok(())
    }

    /// Record another turn in jail. Returns the new count.
    pub fn count_turn_in_jail(&mut self, player: PlayerId) -> EngineResult<u8> {
        checked("count_turn_in_jail", gate::validate_count_turn_in_jail(self, player))?;
        let ledger = self.ledger_mut(player);
        ledger.turns_in_jail = ledger.turns_in_jail.saturating_add(1);
        Ok(ledger.turns_in_jail)
    }

    /// Take a get-out-of-jail card.
    pub fn receive_jail_card(&mut self, player: PlayerId) -> EngineResult<()> {
        checked("receive_jail_card", gate::validate_receive_jail_card(self, player))?;
        self.ledger_mut(player).jail_cards += 1;
        debug!("{player} received a get-out-of-jail card");
        Ok(())
    }

    // === Multi-asset operations ===

    /// Swap tiles, cash and jail cards between two players.
    ///
    /// The offer is validated as a whole first; mortgaged tiles change hands
    /// still mortgaged.
    pub fn execute_trade_offer(&mut self, offer: &TradeOffer) -> EngineResult<()> {
        checked("execute_trade_offer", gate::validate_trade_offer(self, offer))?;
        let (source, target) = (offer.source, offer.target);

        for tile in &offer.properties_offered {
            self.transfer_tile(*tile, Some(target));
        }
        for tile in &offer.properties_requested {
            self.transfer_tile(*tile, Some(source));
        }

        self.debit(source, offer.money_offered);
        self.credit(target, offer.money_offered);
        self.debit(target, offer.money_requested);
        self.credit(source, offer.money_requested);

        self.ledger_mut(source).jail_cards -= offer.jail_cards_offered;
        self.ledger_mut(target).jail_cards += offer.jail_cards_offered;
        self.ledger_mut(target).jail_cards -= offer.jail_cards_requested;
        self.ledger_mut(source).jail_cards += offer.jail_cards_requested;

        debug!("trade executed: {offer}");
        self.audit();
        Ok(())
    }

    /// Replay a liquidation plan through the ordinary mutators.
    ///
    /// Downgrades run first, then mortgages, each in the order given. The plan
    /// commits only if every step passes; returns the cash raised.
    pub fn complete_bankruptcy_request(
        &mut self,
        player: PlayerId,
        request: &BankruptcyRequest,
    ) -> EngineResult<Money> {
        let (next, raised) = checked(
            "complete_bankruptcy_request",
            self.replay_bankruptcy(player, request),
        )?;
        *self = next;
        info!("{player} liquidated {} assets for {raised}", request.len());
        Ok(raised)
    }

    pub(crate) fn replay_bankruptcy(
        &self,
        player: PlayerId,
        request: &BankruptcyRequest,
    ) -> EngineResult<(GameState, Money)> {
        gate::validate_active(self, player)?;
        let mut scratch = self.clone();
        let before = scratch.balance(player);
        for group in &request.downgrades {
            scratch.downgrade_group(player, *group)?;
        }
        for tile in &request.mortgages {
            scratch.mortgage_property(player, *tile)?;
        }
        let raised = scratch.balance(player) - before;
        Ok((scratch, raised))
    }

    // === Match flow ===

    /// Remove a player, returning every asset to the bank.
    pub fn eliminate_player(&mut self, player: PlayerId) -> EngineResult<()> {
        checked("eliminate_player", gate::validate_eliminate_player(self, player))?;

        let tiles: Vec<TileId> = self.properties(player).iter().copied().collect();
        for tile in tiles {
            self.mortgaged.remove(&tile);
            self.transfer_tile(tile, None);
        }
        for group in PropertyGroup::ALL {
            if self.development(group).owner() == Some(player) {
                *self.development_mut(group) = GroupDevelopment::default();
            }
        }

        let ledger = self.ledger_mut(player);
        ledger.eliminated = true;
        ledger.balance = 0;
        ledger.in_jail = false;
        ledger.turns_in_jail = 0;
        ledger.jail_cards = 0;

        info!("{player} eliminated, {} players remain", self.active_count());
        self.audit();
        Ok(())
    }

    /// Pass the turn to the next active seat and clear the doubles streak.
    ///
    /// Returns the new current player.
    pub fn end_turn(&mut self) -> PlayerId {
        self.doubles_rolled = 0;
        let count = self.player_count();
        let start = self.current_player.index();
        if let Some(next) = (1..=count)
            .map(|step| PlayerId::new(((start + step) % count) as u8))
            .find(|p| self.is_active(*p))
        {
            self.current_player = next;
        }
        trace!("turn passes to {}", self.current_player);
        self.current_player
    }
}
