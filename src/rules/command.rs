//! Commands: mutations as data.
//!
//! A [`Command`] names one engine mutation with its exact arguments.
//! [`GameState::validate`] runs the matching validator without touching the
//! state; [`GameState::apply`] validates and applies in one call, so nothing
//! can interleave between the check and the update.

use serde::{Deserialize, Serialize};

use super::error::EngineResult;
use super::rent::RentContext;
use super::validation as gate;
use crate::bankruptcy::BankruptcyRequest;
use crate::board::{PropertyGroup, TileId};
use crate::core::{DiceRoll, GameState, Money, PlayerId};
use crate::trade::TradeOffer;

/// One ledger mutation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Advance by a dice roll, collecting the GO salary on a pass.
    MovePlayer { player: PlayerId, roll: DiceRoll },
    /// Jump forward to a tile, collecting the salary if GO is passed.
    MoveToTile { player: PlayerId, tile: TileId },
    /// Step back without passing GO.
    MoveBackwards { player: PlayerId, steps: u8 },
    /// Buy an unowned tile from the bank at list price.
    BuyProperty { player: PlayerId, tile: TileId },
    /// Mortgage an undeveloped tile for half its price.
    MortgageProperty { player: PlayerId, tile: TileId },
    /// Lift a mortgage, paying the principal plus interest.
    UnmortgageProperty { player: PlayerId, tile: TileId },
    /// Add one house to every member of a complete group.
    PlaceHouse { player: PlayerId, group: PropertyGroup },
    /// Turn four houses per member into a hotel across the group.
    PlaceHotel { player: PlayerId, group: PropertyGroup },
    /// Remove one house from every member for half the cost.
    SellHouse { player: PlayerId, group: PropertyGroup },
    /// Break the group's hotel back down to four houses each.
    SellHotel { player: PlayerId, group: PropertyGroup },
    /// Next development step: a house, or a hotel after four.
    UpgradeGroup { player: PlayerId, group: PropertyGroup },
    /// Reverse of [`Command::UpgradeGroup`].
    DowngradeGroup { player: PlayerId, group: PropertyGroup },
    /// Pay rent on a tile to its owner.
    PayRent { player: PlayerId, tile: TileId, context: RentContext },
    /// Pay a tax or fee to the bank.
    PayBank { player: PlayerId, amount: Money },
    /// Collect money from the bank.
    ReceiveFromBank { player: PlayerId, amount: Money },
    /// Transfer cash between two active players.
    PayPlayer { from: PlayerId, to: PlayerId, amount: Money },
    /// Move to jail without passing GO.
    SendToJail { player: PlayerId },
    /// Release from jail at no cost.
    GetOutOfJail { player: PlayerId },
    /// Spend a held get-out-of-jail card.
    UseJailCard { player: PlayerId },
    /// Pay the fine and leave jail.
    PayJailFine { player: PlayerId },
    /// Record one more turn served.
    CountTurnInJail { player: PlayerId },
    /// Take a get-out-of-jail card, up to the table limit.
    ReceiveJailCard { player: PlayerId },
    /// Settle a validated trade offer in one step.
    ExecuteTrade(TradeOffer),
    /// Carry out a liquidation plan for a debtor.
    CompleteBankruptcy { player: PlayerId, request: BankruptcyRequest },
    /// Remove a player, returning their tiles to the bank.
    EliminatePlayer { player: PlayerId },
    /// Pass play to the next active player.
    EndTurn,
}

/// What a successful command produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Nothing to report.
    Done,
    /// Final position after a move.
    Moved(TileId),
    /// Cash paid out by the acting player (price, cost, rent).
    Paid(Money),
    /// Cash received by the acting player (mortgage, refund, liquidation).
    Received(Money),
    /// Turns now served in jail.
    JailTurns(u8),
    /// Whose turn it is now.
    Turn(PlayerId),
}

impl GameState {
    /// Would `command` be accepted? Never mutates.
    pub fn validate(&self, command: &Command) -> EngineResult<()> {
        match command {
            Command::MovePlayer { player, roll } => gate::validate_move_player(self, *player, *roll),
            Command::MoveToTile { player, tile } => gate::validate_move_to_tile(self, *player, *tile),
            Command::MoveBackwards { player, steps } => {
                gate::validate_move_backwards(self, *player, *steps)
            }
            Command::BuyProperty { player, tile } => gate::validate_buy_property(self, *player, *tile),
            Command::MortgageProperty { player, tile } => {
                gate::validate_mortgage_property(self, *player, *tile)
            }
            Command::UnmortgageProperty { player, tile } => {
                gate::validate_unmortgage_property(self, *player, *tile)
            }
            Command::PlaceHouse { player, group } => gate::validate_place_house(self, *player, *group),
            Command::PlaceHotel { player, group } => gate::validate_place_hotel(self, *player, *group),
            Command::SellHouse { player, group } => gate::validate_sell_house(self, *player, *group),
            Command::SellHotel { player, group } => gate::validate_sell_hotel(self, *player, *group),
            Command::UpgradeGroup { player, group } => {
                gate::validate_upgrade_group(self, *player, *group)
            }
            Command::DowngradeGroup { player, group } => {
                gate::validate_downgrade_group(self, *player, *group)
            }
            Command::PayRent {
                player,
                tile,
                context,
            } => gate::validate_pay_rent(self, *player, *tile, *context),
            Command::PayBank { player, amount } => gate::validate_pay_bank(self, *player, *amount),
            Command::ReceiveFromBank { player, amount } => {
                gate::validate_receive_from_bank(self, *player, *amount)
            }
            Command::PayPlayer { from, to, amount } => {
                gate::validate_pay_player(self, *from, *to, *amount)
            }
            Command::SendToJail { player } => gate::validate_send_to_jail(self, *player),
            Command::GetOutOfJail { player } => gate::validate_get_out_of_jail(self, *player),
            Command::UseJailCard { player } => gate::validate_use_jail_card(self, *player),
            Command::PayJailFine { player } => gate::validate_pay_jail_fine(self, *player),
            Command::CountTurnInJail { player } => gate::validate_count_turn_in_jail(self, *player),
            Command::ReceiveJailCard { player } => gate::validate_receive_jail_card(self, *player),
            Command::ExecuteTrade(offer) => gate::validate_trade_offer(self, offer),
            Command::CompleteBankruptcy { player, request } => {
                gate::validate_bankruptcy_request(self, *player, request)
            }
            Command::EliminatePlayer { player } => gate::validate_eliminate_player(self, *player),
            Command::EndTurn => Ok(()),
        }
    }

    /// Validate and apply `command`.
    pub fn apply(&mut self, command: Command) -> EngineResult<Outcome> {
        Ok(match command {
            Command::MovePlayer { player, roll } => Outcome::Moved(self.move_player(player, roll)?),
            Command::MoveToTile { player, tile } => Outcome::Moved(self.move_to_tile(player, tile)?),
            Command::MoveBackwards { player, steps } => {
                Outcome::Moved(self.move_backwards(player, steps)?)
            }
            Command::BuyProperty { player, tile } => Outcome::Paid(self.buy_property(player, tile)?),
            Command::MortgageProperty { player, tile } => {
                Outcome::Received(self.mortgage_property(player, tile)?)
            }
            Command::UnmortgageProperty { player, tile } => {
                Outcome::Paid(self.unmortgage_property(player, tile)?)
            }
            Command::PlaceHouse { player, group } => Outcome::Paid(self.place_house(player, group)?),
            Command::PlaceHotel { player, group } => Outcome::Paid(self.place_hotel(player, group)?),
            Command::SellHouse { player, group } => Outcome::Received(self.sell_house(player, group)?),
            Command::SellHotel { player, group } => Outcome::Received(self.sell_hotel(player, group)?),
            Command::UpgradeGroup { player, group } => Outcome::Paid(self.upgrade_group(player, group)?),
            Command::DowngradeGroup { player, group } => {
                Outcome::Received(self.downgrade_group(player, group)?)
            }
            Command::PayRent {
                player,
                tile,
                context,
            } => Outcome::Paid(self.pay_rent(player, tile, context)?),
            Command::PayBank { player, amount } => {
                self.pay_bank(player, amount)?;
                Outcome::Paid(amount)
            }
            Command::ReceiveFromBank { player, amount } => {
                self.receive_from_bank(player, amount)?;
                Outcome::Received(amount)
            }
            Command::PayPlayer { from, to, amount } => {
                self.pay_player(from, to, amount)?;
                Outcome::Paid(amount)
            }
            Command::SendToJail { player } => {
                self.send_to_jail(player)?;
                Outcome::Done
            }
            Command::GetOutOfJail { player } => {
                self.get_out_of_jail(player)?;
                Outcome::Done
            }
            Command::UseJailCard { player } => {
                self.use_jail_card(player)?;
                Outcome::Done
            }
            Command::PayJailFine { player } => {
                self.pay_jail_fine(player)?;
                Outcome::Paid(self.config.jail_fine)
            }
            Command::CountTurnInJail { player } => Outcome::JailTurns(self.count_turn_in_jail(player)?),
            Command::ReceiveJailCard { player } => {
                self.receive_jail_card(player)?;
                Outcome::Done
            }
            Command::ExecuteTrade(offer) => {
                self.execute_trade_offer(&offer)?;
                Outcome::Done
            }
            Command::CompleteBankruptcy { player, request } => {
                Outcome::Received(self.complete_bankruptcy_request(player, &request)?)
            }
            Command::EliminatePlayer { player } => {
                self.eliminate_player(player)?;
                Outcome::Done
            }
            Command::EndTurn => Outcome::Turn(self.end_turn()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::error::GameError;

    #[test]
    fn test_validate_matches_apply() {
        let mut state = GameState::new(["A", "B"]);
        let buy = Command::BuyProperty {
            player: PlayerId::new(0),
            tile: TileId(39),
        };
        assert_eq!(state.validate(&buy), Ok(()));
        assert_eq!(state.apply(buy.clone()), Ok(Outcome::Paid(400)));
        let owner = PlayerId::new(0);
        assert_eq!(
            state.validate(&buy),
            Err(GameError::AlreadyOwned {
                tile: TileId(39),
                owner
            })
        );
        assert_eq!(state.apply(buy.clone()), state.validate(&buy).map(|_| Outcome::Done));
    }

    #[test]
    fn test_end_turn_command() {
        let mut state = GameState::new(["A", "B"]);
        assert_eq!(state.apply(Command::EndTurn), Ok(Outcome::Turn(PlayerId::new(1))));
    }

    #[test]
    fn test_command_serde() {
        let cmd = Command::PayRent {
            player: PlayerId::new(1),
            tile: TileId(12),
            context: RentContext::rolled(8).with_multiplier(10),
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert_eq!(serde_json::from_str::<Command>(&json).unwrap(), cmd);
    }
}
