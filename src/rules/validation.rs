//! The validation gate: one pure predicate per mutating operation.
//!
//! Validators borrow the state immutably and return the specific
//! [`GameError`] the matching mutator would raise. Agents may call them freely
//! to check legality; repeated calls with no intervening mutation always agree.

use super::error::{AssetRef, DevelopmentBlock, EngineResult, GameError, TradeViolation};
use super::rent::{rent_for_owner, RentContext};
use crate::bankruptcy::BankruptcyRequest;
use crate::board::{PropertyGroup, Tile, TileId};
use crate::core::{DiceRoll, GameState, Money, PlayerId, PlayerLedger};
use crate::trade::TradeOffer;

// === Shared checks ===

/// The player is seated and still in the match.
pub fn validate_active(state: &GameState, player: PlayerId) -> EngineResult<()> {
    active(state, player).map(|_| ())
}

fn active(state: &GameState, player: PlayerId) -> EngineResult<&PlayerLedger> {
    let ledger = state.ledger(player).ok_or(GameError::UnknownPlayer(player))?;
    if ledger.is_eliminated() {
        return Err(GameError::PlayerEliminated(player));
    }
    Ok(ledger)
}

fn ownable(state: &GameState, tile: TileId) -> EngineResult<&Tile> {
    let info = state.tile(tile).ok_or(GameError::UnknownTile(tile))?;
    if !info.is_ownable() {
        return Err(GameError::NotPurchasable(tile));
    }
    Ok(info)
}

fn amount(value: Money) -> EngineResult<()> {
    if value < 0 {
        return Err(GameError::InvalidAmount(value));
    }
    Ok(())
}

fn funds(ledger: &PlayerLedger, player: PlayerId, required: Money) -> EngineResult<()> {
    if ledger.balance() < required {
        return Err(GameError::funds(player, required, ledger.balance()));
    }
    Ok(())
}

fn owned_by(state: &GameState, player: PlayerId, tile: TileId) -> EngineResult<()> {
    if state.owner_of(tile) != Some(player) {
        return Err(GameError::NotOwner {
            player,
            asset: AssetRef::Tile(tile),
        });
    }
    Ok(())
}

fn free(state: &GameState, player: PlayerId) -> EngineResult<&PlayerLedger> {
    let ledger = active(state, player)?;
    if ledger.in_jail() {
        return Err(GameError::PlayerInJail(player));
    }
    Ok(ledger)
}

fn jailed(state: &GameState, player: PlayerId) -> EngineResult<&PlayerLedger> {
    let ledger = active(state, player)?;
    if !ledger.in_jail() {
        return Err(GameError::PlayerNotInJail(player));
    }
    Ok(ledger)
}

/// Full ownership with no mortgaged member: the precondition for building.
fn buildable(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    if !state.owns_full_group(player, group) {
        return Err(GameError::DevelopmentBlocked {
            group,
            reason: DevelopmentBlock::IncompleteGroup,
        });
    }
    if let Some(tile) = state.mortgaged_member(group) {
        return Err(GameError::DevelopmentBlocked {
            group,
            reason: DevelopmentBlock::MortgagedMember(tile),
        });
    }
    Ok(())
}

/// Cost of one house on every member of `group`.
#[must_use]
pub fn house_cost(state: &GameState, group: PropertyGroup) -> Money {
    state.board().house_cost(group)
}

/// Cost of the hotel across `group`; a sale refunds half.
#[must_use]
pub fn hotel_cost(state: &GameState, group: PropertyGroup) -> Money {
    state.board().hotel_cost(group)
}

// === Movement ===

/// Normal movement after a roll. Jailed players must leave jail first.
pub fn validate_move_player(state: &GameState, player: PlayerId, _roll: DiceRoll) -> EngineResult<()> {
    free(state, player).map(|_| ())
}

/// Direct relocation (card "advance to").
pub fn validate_move_to_tile(state: &GameState, player: PlayerId, tile: TileId) -> EngineResult<()> {
    free(state, player)?;
    state.tile(tile).ok_or(GameError::UnknownTile(tile))?;
    Ok(())
}

/// Backward movement (card "go back").
pub fn validate_move_backwards(state: &GameState, player: PlayerId, _steps: u8) -> EngineResult<()> {
    free(state, player).map(|_| ())
}

// === Single-asset transfers against the bank ===

/// Buy an unowned tile at its printed price.
pub fn validate_buy_property(state: &GameState, player: PlayerId, tile: TileId) -> EngineResult<()> {
    let ledger = active(state, player)?;
    let info = ownable(state, tile)?;
    if let Some(owner) = state.owner_of(tile) {
        return Err(GameError::AlreadyOwned { tile, owner });
    }
    funds(ledger, player, info.price().unwrap_or(0))
}

/// Mortgage an owned tile whose group carries no buildings.
pub fn validate_mortgage_property(state: &GameState, player: PlayerId, tile: TileId) -> EngineResult<()> {
    active(state, player)?;
    let info = ownable(state, tile)?;
    owned_by(state, player, tile)?;
    if state.is_mortgaged(tile) {
        return Err(GameError::AlreadyMortgaged(tile));
    }
    if let Some(group) = info.group() {
        if state.development(group).is_developed() {
            return Err(GameError::DevelopmentBlocked {
                group,
                reason: DevelopmentBlock::HasBuildings,
            });
        }
    }
    Ok(())
}

/// Lift a mortgage at the buy-back price.
pub fn validate_unmortgage_property(state: &GameState, player: PlayerId, tile: TileId) -> EngineResult<()> {
    let ledger = active(state, player)?;
    let info = ownable(state, tile)?;
    owned_by(state, player, tile)?;
    if !state.is_mortgaged(tile) {
        return Err(GameError::NotMortgaged(tile));
    }
    funds(ledger, player, info.buyback_price().unwrap_or(0))
}

// === Development ===

/// One more house on every member of the group.
pub fn validate_place_house(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    let ledger = active(state, player)?;
    let dev = state.development(group);
    if dev.houses >= 4 || dev.hotels > 0 {
        return Err(GameError::MaxDevelopmentReached(group));
    }
    buildable(state, player, group)?;
    funds(ledger, player, house_cost(state, group))
}

/// Trade the group's four houses for a hotel.
pub fn validate_place_hotel(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    let ledger = active(state, player)?;
    let dev = state.development(group);
    if dev.hotels >= 1 {
        return Err(GameError::MaxDevelopmentReached(group));
    }
    buildable(state, player, group)?;
    if dev.houses < 4 {
        return Err(GameError::DevelopmentBlocked {
            group,
            reason: DevelopmentBlock::HousesRequired { current: dev.houses },
        });
    }
    funds(ledger, player, hotel_cost(state, group))
}

/// Sell one house from every member of the group.
pub fn validate_sell_house(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    active(state, player)?;
    let dev = state.development(group);
    if dev.houses == 0 {
        return Err(GameError::NoDevelopment(group));
    }
    if dev.house_owner != Some(player) {
        return Err(GameError::NotOwner {
            player,
            asset: AssetRef::Buildings(group),
        });
    }
    Ok(())
}

/// Sell the group's hotel back down to four houses.
pub fn validate_sell_hotel(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    active(state, player)?;
    let dev = state.development(group);
    if dev.hotels == 0 {
        return Err(GameError::NoDevelopment(group));
    }
    if dev.hotel_owner != Some(player) {
        return Err(GameError::NotOwner {
            player,
            asset: AssetRef::Buildings(group),
        });
    }
    Ok(())
}

/// Next development step: a house below four, then a hotel.
pub fn validate_upgrade_group(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    if state.houses(group) >= 4 {
        validate_place_hotel(state, player, group)
    } else {
        validate_place_house(state, player, group)
    }
}

/// Previous development step: hotel to four houses, then one house at a time.
pub fn validate_downgrade_group(state: &GameState, player: PlayerId, group: PropertyGroup) -> EngineResult<()> {
    if state.hotels(group) > 0 {
        validate_sell_hotel(state, player, group)
    } else {
        validate_sell_house(state, player, group)
    }
}

// === Rent and cash ===

/// Rent `payer` owes for landing on `tile`, or why none can be charged.
///
/// Shares its checks with [`validate_pay_rent`] but also returns the amount.
pub fn rent_owed(state: &GameState, payer: PlayerId, tile: TileId, ctx: RentContext) -> EngineResult<(PlayerId, Money)> {
    active(state, payer)?;
    let info = ownable(state, tile)?;
    let owner = state.owner_of(tile).ok_or(GameError::Unowned(tile))?;
    if owner == payer {
        return Err(GameError::SelfRent { player: payer, tile });
    }
    if state.is_mortgaged(tile) {
        return Err(GameError::AlreadyMortgaged(tile));
    }
    Ok((owner, rent_for_owner(state, info, owner, ctx)))
}

/// Rent is due and affordable.
pub fn validate_pay_rent(state: &GameState, payer: PlayerId, tile: TileId, ctx: RentContext) -> EngineResult<()> {
    let (_, rent) = rent_owed(state, payer, tile, ctx)?;
    funds(&state.ledgers[payer], payer, rent)
}

/// Pay the bank (taxes, fees).
pub fn validate_pay_bank(state: &GameState, player: PlayerId, value: Money) -> EngineResult<()> {
    let ledger = active(state, player)?;
    amount(value)?;
    funds(ledger, player, value)
}

/// Collect from the bank.
pub fn validate_receive_from_bank(state: &GameState, player: PlayerId, value: Money) -> EngineResult<()> {
    active(state, player)?;
    amount(value)
}

/// Pay another player directly.
pub fn validate_pay_player(state: &GameState, from: PlayerId, to: PlayerId, value: Money) -> EngineResult<()> {
    let ledger = active(state, from)?;
    active(state, to)?;
    amount(value)?;
    funds(ledger, from, value)
}

// === Jail ===

/// Send a free player to jail.
pub fn validate_send_to_jail(state: &GameState, player: PlayerId) -> EngineResult<()> {
    let ledger = active(state, player)?;
    if ledger.in_jail() {
        return Err(GameError::PlayerAlreadyInJail(player));
    }
    Ok(())
}

/// Leave jail after rolling doubles.
pub fn validate_get_out_of_jail(state: &GameState, player: PlayerId) -> EngineResult<()> {
    jailed(state, player).map(|_| ())
}

/// Leave jail by spending a card.
pub fn validate_use_jail_card(state: &GameState, player: PlayerId) -> EngineResult<()> {
    let ledger = active(state, player)?;
    if ledger.jail_cards() == 0 {
        return Err(GameError::NoJailCard(player));
    }
    if !ledger.in_jail() {
        return Err(GameError::PlayerNotInJail(player));
    }
    Ok(())
}

/// Leave jail by paying the fine.
pub fn validate_pay_jail_fine(state: &GameState, player: PlayerId) -> EngineResult<()> {
    let ledger = jailed(state, player)?;
    funds(ledger, player, state.config().jail_fine)
}

/// Count one more turn behind bars.
pub fn validate_count_turn_in_jail(state: &GameState, player: PlayerId) -> EngineResult<()> {
    jailed(state, player).map(|_| ())
}

/// Take a get-out-of-jail card.
pub fn validate_receive_jail_card(state: &GameState, player: PlayerId) -> EngineResult<()> {
    let ledger = active(state, player)?;
    let max = state.config().max_jail_cards;
    if ledger.jail_cards() >= max {
        return Err(GameError::MaxJailCards { player, max });
    }
    Ok(())
}

// === Multi-asset operations ===

/// The whole trade, checked before any part of it may apply.
pub fn validate_trade_offer(state: &GameState, offer: &TradeOffer) -> EngineResult<()> {
    let invalid = |v| Err(GameError::InvalidTrade(v));

    if offer.source == offer.target {
        return invalid(TradeViolation::SelfTrade);
    }
    let source = active(state, offer.source)?;
    let target = active(state, offer.target)?;
    if offer.is_empty() {
        return invalid(TradeViolation::Empty);
    }
    amount(offer.money_offered)?;
    amount(offer.money_requested)?;

    let mut seen: smallvec::SmallVec<[TileId; 8]> = smallvec::SmallVec::new();
    let sides = [
        (&offer.properties_offered, offer.source),
        (&offer.properties_requested, offer.target),
    ];
    for (tiles, holder) in sides {
        for &tile in tiles.iter() {
            if seen.contains(&tile) {
                return invalid(TradeViolation::DuplicateTile(tile));
            }
            seen.push(tile);

            let info = ownable(state, tile)?;
            if state.owner_of(tile) != Some(holder) {
                return invalid(TradeViolation::NotHeldBy { tile, player: holder });
            }
            if let Some(group) = info.group() {
                if state.development(group).is_developed() {
                    return invalid(TradeViolation::DevelopedGroup(group));
                }
            }
        }
    }

    funds(source, offer.source, offer.money_offered)?;
    funds(target, offer.target, offer.money_requested)?;

    if source.jail_cards() < offer.jail_cards_offered {
        return Err(GameError::NoJailCard(offer.source));
    }
    if target.jail_cards() < offer.jail_cards_requested {
        return Err(GameError::NoJailCard(offer.target));
    }
    let max = state.config().max_jail_cards;
    let source_after = u16::from(source.jail_cards()) - u16::from(offer.jail_cards_offered)
        + u16::from(offer.jail_cards_requested);
    if source_after > u16::from(max) {
        return Err(GameError::MaxJailCards {
            player: offer.source,
            max,
        });
    }
    let target_after = u16::from(target.jail_cards()) - u16::from(offer.jail_cards_requested)
        + u16::from(offer.jail_cards_offered);
    if target_after > u16::from(max) {
        return Err(GameError::MaxJailCards {
            player: offer.target,
            max,
        });
    }
    Ok(())
}

/// Every step of the plan passes its own validator when replayed in order.
///
/// Dry-runs the plan on a scratch copy; `state` is never touched.
pub fn validate_bankruptcy_request(
    state: &GameState,
    player: PlayerId,
    request: &BankruptcyRequest,
) -> EngineResult<()> {
    state.replay_bankruptcy(player, request).map(|_| ())
}

/// Remove a player still in the match.
pub fn validate_eliminate_player(state: &GameState, player: PlayerId) -> EngineResult<()> {
    validate_active(state, player)
}
