//! Engine behavior through the public API: rent, development, movement, jail,
//! commands and persistence.

use std::sync::Arc;

use rust_monopoly::bankruptcy::BankruptcyRequest;
use rust_monopoly::board::{classic_tiles, Board, PropertyGroup, Tile, TileId};
use rust_monopoly::core::{DiceRoll, GameConfig, GameSnapshot, GameState, PlayerId};
use rust_monopoly::rules::{invariants, rent_due, Command, DevelopmentBlock, GameError, Outcome, RentContext};

const A: PlayerId = PlayerId(0);
const B: PlayerId = PlayerId(1);

/// Buying the last member of a group switches every member to full-group rent.
#[test]
fn test_completing_a_group_doubles_rent() {
    let mut state = GameState::new(["A", "B"]);
    state.buy_property(A, TileId(6)).unwrap();
    state.buy_property(A, TileId(8)).unwrap();
    assert_eq!(rent_due(&state, TileId(6), RentContext::default()), Ok(6));

    state.buy_property(A, TileId(9)).unwrap();
    assert!(state.owns_full_group(A, PropertyGroup::LightBlue));
    assert_eq!(rent_due(&state, TileId(6), RentContext::default()), Ok(12));
    assert_eq!(rent_due(&state, TileId(8), RentContext::default()), Ok(12));
    assert_eq!(rent_due(&state, TileId(9), RentContext::default()), Ok(16));
}

/// A hotel replaces four houses; selling it restores them for half its cost.
#[test]
fn test_hotel_round_trip() {
    let mut state = GameState::new(["A", "B"]);
    state.buy_property(A, TileId(1)).unwrap();
    state.buy_property(A, TileId(3)).unwrap();
    for _ in 0..4 {
        assert_eq!(state.place_house(A, PropertyGroup::Brown), Ok(100));
    }
    let hotel_cost = state.board().hotel_cost(PropertyGroup::Brown);
    assert_eq!(hotel_cost, 100);
    assert_eq!(state.place_hotel(A, PropertyGroup::Brown), Ok(hotel_cost));
    assert_eq!(state.houses(PropertyGroup::Brown), 0);
    assert_eq!(state.hotels(PropertyGroup::Brown), 1);
    assert_eq!(rent_due(&state, TileId(3), RentContext::default()), Ok(450));

    let before = state.balance(A);
    assert_eq!(state.sell_hotel(A, PropertyGroup::Brown), Ok(hotel_cost / 2));
    assert_eq!(state.houses(PropertyGroup::Brown), 4);
    assert_eq!(state.hotels(PropertyGroup::Brown), 0);
    assert_eq!(state.balance(A), before + hotel_cost / 2);
    assert_eq!(state.development(PropertyGroup::Brown).house_owner, Some(A));
}

/// Building costs scale with the group's size on a custom board.
#[test]
fn test_building_costs_follow_custom_group_size() {
    let mut tiles = classic_tiles();
    if let Tile::Property(oriental) = &mut tiles[6] {
        oriental.group = PropertyGroup::Brown;
    }
    let board = Arc::new(Board::from_tiles(tiles).unwrap());
    assert_eq!(board.group_size(PropertyGroup::Brown), 3);
    assert_eq!(board.hotel_cost(PropertyGroup::Brown), 150);

    let mut state = GameState::with_rules(["A", "B"], board, GameConfig::default());
    for tile in [1, 3, 6] {
        state.buy_property(A, TileId(tile)).unwrap();
    }
    for _ in 0..4 {
        assert_eq!(state.place_house(A, PropertyGroup::Brown), Ok(150));
    }
    assert_eq!(state.place_hotel(A, PropertyGroup::Brown), Ok(150));

    let plan = BankruptcyRequest::new().downgrade(PropertyGroup::Brown);
    assert_eq!(plan.recoverable_funds(&state), 75);
    assert_eq!(state.sell_hotel(A, PropertyGroup::Brown), Ok(75));
    assert_eq!(state.sell_house(A, PropertyGroup::Brown), Ok(75));
}

/// The third double in a row jails without moving or paying Go income.
#[test]
fn test_three_doubles_go_to_jail() {
    let mut state = GameState::new(["A", "B"]);
    state.move_to_tile(A, TileId(35)).unwrap();
    assert_eq!(state.balance(A), 1500);

    assert_eq!(state.move_player(A, DiceRoll::new(1, 1)), Ok(TileId(37)));
    assert_eq!(state.move_player(A, DiceRoll::new(1, 1)), Ok(TileId(39)));
    assert_eq!(state.doubles_rolled(), 2);

    assert_eq!(state.move_player(A, DiceRoll::new(2, 2)), Ok(TileId(10)));
    assert!(state.in_jail(A));
    assert_eq!(state.position(A), TileId(10));
    assert_eq!(state.doubles_rolled(), 0);
    assert_eq!(state.balance(A), 1500);
}

#[test]
fn test_jailed_player_cannot_move() {
    let mut state = GameState::new(["A", "B"]);
    state.send_to_jail(A).unwrap();
    let before = state.clone();
    assert_eq!(
        state.move_player(A, DiceRoll::new(3, 4)),
        Err(GameError::PlayerInJail(A))
    );
    assert_eq!(state, before);

    state.get_out_of_jail(A).unwrap();
    assert_eq!(state.move_player(A, DiceRoll::new(3, 4)), Ok(TileId(17)));
}

#[test]
fn test_jail_turns_count_only_inside() {
    let mut state = GameState::new(["A", "B"]);
    assert_eq!(state.count_turn_in_jail(A), Err(GameError::PlayerNotInJail(A)));
    state.send_to_jail(A).unwrap();
    assert_eq!(state.count_turn_in_jail(A), Ok(1));
    assert_eq!(state.count_turn_in_jail(A), Ok(2));
    assert_eq!(state.send_to_jail(A), Err(GameError::PlayerAlreadyInJail(A)));

    state.pay_jail_fine(A).unwrap();
    assert_eq!(state.turns_in_jail(A), 0);
    assert_eq!(state.position(A), TileId(10));
}

#[test]
fn test_rent_moves_money_between_players() {
    let mut state = GameState::new(["A", "B"]);
    state.buy_property(B, TileId(12)).unwrap();
    state.buy_property(B, TileId(28)).unwrap();

    assert_eq!(state.pay_rent(A, TileId(12), RentContext::rolled(9)), Ok(90));
    assert_eq!(state.balance(A), 1410);
    assert_eq!(state.balance(B), 1500 - 300 + 90);

    assert_eq!(
        state.pay_rent(B, TileId(12), RentContext::rolled(9)),
        Err(GameError::SelfRent {
            player: B,
            tile: TileId(12)
        })
    );
}

#[test]
fn test_mortgaged_tiles_block_rent_and_building() {
    let mut state = GameState::new(["A", "B"]);
    state.buy_property(A, TileId(37)).unwrap();
    state.buy_property(A, TileId(39)).unwrap();
    state.mortgage_property(A, TileId(37)).unwrap();

    assert_eq!(
        state.pay_rent(B, TileId(37), RentContext::default()),
        Err(GameError::AlreadyMortgaged(TileId(37)))
    );
    assert_eq!(
        state.place_house(A, PropertyGroup::Blue),
        Err(GameError::DevelopmentBlocked {
            group: PropertyGroup::Blue,
            reason: DevelopmentBlock::MortgagedMember(TileId(37)),
        })
    );
    // Unmortgaged Boardwalk still benefits from the monopoly.
    assert_eq!(rent_due(&state, TileId(39), RentContext::default()), Ok(100));
}

/// Every rejection leaves the ledger exactly as it was.
#[test]
fn test_rejections_leave_state_identical() {
    let mut state = GameState::new(["A", "B", "C"]);
    state.buy_property(A, TileId(5)).unwrap();
    let before = state.clone();

    assert!(state.buy_property(B, TileId(5)).is_err());
    assert!(state.mortgage_property(B, TileId(5)).is_err());
    assert!(state.unmortgage_property(A, TileId(5)).is_err());
    assert!(state.place_house(A, PropertyGroup::Red).is_err());
    assert!(state.place_hotel(A, PropertyGroup::Red).is_err());
    assert!(state.sell_house(A, PropertyGroup::Red).is_err());
    assert!(state.use_jail_card(A).is_err());
    assert!(state.pay_bank(A, 1_000_000).is_err());
    assert!(state.pay_player(A, PlayerId(9), 10).is_err());
    assert!(state.buy_property(A, TileId(4)).is_err());

    assert_eq!(state, before);
    assert!(invariants::check(&state).is_empty());
}

#[test]
fn test_commands_agree_with_validators() {
    let mut state = GameState::new(["A", "B"]);
    let commands = [
        Command::BuyProperty { player: A, tile: TileId(1) },
        Command::BuyProperty { player: A, tile: TileId(3) },
        Command::UpgradeGroup { player: A, group: PropertyGroup::Brown },
        Command::SellHotel { player: A, group: PropertyGroup::Brown },
        Command::DowngradeGroup { player: A, group: PropertyGroup::Brown },
        Command::MortgageProperty { player: A, tile: TileId(1) },
        Command::PayRent { player: B, tile: TileId(3), context: RentContext::default() },
        Command::EndTurn,
    ];

    for command in commands {
        let verdict = state.validate(&command);
        let outcome = state.apply(command);
        assert_eq!(verdict.is_ok(), outcome.is_ok(), "{outcome:?}");
    }
    // Baltic still earns monopoly rent beside a mortgaged Mediterranean.
    assert_eq!(state.balance(B), 1500 - 8);
    assert_eq!(state.current_player(), B);
}

#[test]
fn test_command_outcomes() {
    let mut state = GameState::new(["A", "B"]);
    assert_eq!(
        state.apply(Command::MovePlayer { player: A, roll: DiceRoll::new(2, 3) }),
        Ok(Outcome::Moved(TileId(5)))
    );
    assert_eq!(
        state.apply(Command::BuyProperty { player: A, tile: TileId(5) }),
        Ok(Outcome::Paid(200))
    );
    assert_eq!(
        state.apply(Command::MortgageProperty { player: A, tile: TileId(5) }),
        Ok(Outcome::Received(100))
    );
}

/// A restored snapshot computes the same rents and verdicts as the original.
#[test]
fn test_snapshot_restores_identical_behavior() {
    let mut state = GameState::new(["A", "B", "C"]);
    state.buy_property(A, TileId(1)).unwrap();
    state.buy_property(A, TileId(3)).unwrap();
    state.place_house(A, PropertyGroup::Brown).unwrap();
    state.buy_property(B, TileId(5)).unwrap();
    state.buy_property(B, TileId(15)).unwrap();
    state.mortgage_property(B, TileId(15)).unwrap();
    state.send_to_jail(PlayerId(2)).unwrap();

    let bytes = state.snapshot().to_bytes().unwrap();
    let restored = GameState::restore(&GameSnapshot::from_bytes(&bytes).unwrap(), Arc::new(Board::classic())).unwrap();
    assert_eq!(restored, state);

    for tile in 0..40 {
        let ctx = RentContext::rolled(7);
        assert_eq!(
            rent_due(&restored, TileId(tile), ctx),
            rent_due(&state, TileId(tile), ctx)
        );
        let candidate = Command::BuyProperty { player: PlayerId(2), tile: TileId(tile) };
        assert_eq!(restored.validate(&candidate), state.validate(&candidate));
    }
}
