//! The agent collaborator contract.

use crate::bankruptcy::{BankruptcyRequest, BankruptcyResolver};
use crate::board::{PropertyGroup, TileId};
use crate::core::{GameState, Money, PlayerId};
use crate::trade::TradeOffer;

/// Decision-maker for one seat.
///
/// The turn loop only talks to agents through these query points. Agents see
/// the state read-only; every suggestion they return is re-validated before the
/// loop acts on it, and rejected suggestions are dropped.
///
/// `me` is the seat the agent plays.
pub trait Agent: Send {
    /// Display name for logs.
    fn name(&self) -> &str;

    /// Buy the unowned tile just landed on?
    fn should_buy_property(&mut self, state: &GameState, me: PlayerId, tile: TileId) -> bool;

    /// Groups to develop one step each, in order.
    fn upgrading_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<PropertyGroup>;

    /// Groups to step down one level each, in order.
    fn downgrading_suggestions(&mut self, _state: &GameState, _me: PlayerId) -> Vec<PropertyGroup> {
        Vec::new()
    }

    /// Tiles to mortgage.
    fn mortgaging_suggestions(&mut self, _state: &GameState, _me: PlayerId) -> Vec<TileId> {
        Vec::new()
    }

    /// Tiles to buy back.
    fn unmortgaging_suggestions(&mut self, state: &GameState, me: PlayerId) -> Vec<TileId>;

    /// Pay the fine rather than try for doubles?
    fn should_pay_jail_fine(&mut self, state: &GameState, me: PlayerId) -> bool;

    /// Spend a get-out-of-jail card now?
    fn should_use_jail_card(&mut self, state: &GameState, me: PlayerId) -> bool;

    /// Accept a trade another player proposes?
    fn should_accept_trade(&mut self, _state: &GameState, _me: PlayerId, _offer: &TradeOffer) -> bool {
        false
    }

    /// Trades to propose this turn.
    fn trade_offers(&mut self, _state: &GameState, _me: PlayerId) -> Vec<TradeOffer> {
        Vec::new()
    }

    /// Liquidation plan for owing `amount_owed` with too little cash.
    ///
    /// An empty plan while short means the agent concedes bankruptcy.
    fn handle_bankruptcy(&mut self, state: &GameState, me: PlayerId, amount_owed: Money) -> BankruptcyRequest {
        BankruptcyResolver::default().plan(state, me, amount_owed)
    }
}
