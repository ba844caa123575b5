//! The closed error taxonomy of the validation gate.
//!
//! Every rejection the engine can produce is one of these variants. Errors
//! surface unchanged from validator to caller; a rejected mutation never
//! alters the ledger.

use thiserror::Error;

use crate::board::{PropertyGroup, TileId};
use crate::core::{Money, PlayerId};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, GameError>;

/// Something a player can own: a single tile, or the buildings on a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetRef {
    /// A purchasable tile.
    Tile(TileId),
    /// Houses or hotel on a color group.
    Buildings(PropertyGroup),
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetRef::Tile(tile) => write!(f, "{tile}"),
            AssetRef::Buildings(group) => write!(f, "buildings on {group}"),
        }
    }
}

/// Why a group cannot be developed (or mortgaged).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DevelopmentBlock {
    /// The player does not own every member of the group.
    IncompleteGroup,
    /// A member of the group is mortgaged.
    MortgagedMember(TileId),
    /// A hotel needs four houses first.
    HousesRequired {
        /// Houses currently on the group.
        current: u8,
    },
    /// The group carries houses or a hotel (blocks mortgaging).
    HasBuildings,
}

impl std::fmt::Display for DevelopmentBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DevelopmentBlock::IncompleteGroup => f.write_str("group not fully owned"),
            DevelopmentBlock::MortgagedMember(tile) => write!(f, "{tile} is mortgaged"),
            DevelopmentBlock::HousesRequired { current } => {
                write!(f, "4 houses required, group has {current}")
            }
            DevelopmentBlock::HasBuildings => f.write_str("group has houses or a hotel"),
        }
    }
}

/// Why a trade offer is malformed or illegal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TradeViolation {
    /// Source and target are the same player.
    SelfTrade,
    /// Nothing changes hands.
    Empty,
    /// A tile is listed twice.
    DuplicateTile(TileId),
    /// A tile is not held by the side that claims to give it.
    NotHeldBy {
        /// Tile in question.
        tile: TileId,
        /// Player expected to hold it.
        player: PlayerId,
    },
    /// A tile's group carries buildings; sell them before trading.
    DevelopedGroup(PropertyGroup),
}

impl std::fmt::Display for TradeViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeViolation::SelfTrade => f.write_str("a player cannot trade with themselves"),
            TradeViolation::Empty => f.write_str("offer exchanges nothing"),
            TradeViolation::DuplicateTile(tile) => write!(f, "{tile} listed twice"),
            TradeViolation::NotHeldBy { tile, player } => write!(f, "{tile} is not held by {player}"),
            TradeViolation::DevelopedGroup(group) => write!(f, "{group} group has buildings"),
        }
    }
}

/// Rejection raised by the validation gate.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Seat does not exist at this table.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),

    /// Player has been removed from the match.
    #[error("{0} has been eliminated")]
    PlayerEliminated(PlayerId),

    /// Position is not on the board.
    #[error("unknown tile {0}")]
    UnknownTile(TileId),

    /// Special tiles cannot be bought, mortgaged or traded.
    #[error("{0} cannot be owned")]
    NotPurchasable(TileId),

    /// Player does not own the asset they act on.
    #[error("{player} does not own {asset}")]
    NotOwner {
        /// Acting player.
        player: PlayerId,
        /// Asset in question.
        asset: AssetRef,
    },

    /// Tile already belongs to someone.
    #[error("{tile} is already owned by {owner}")]
    AlreadyOwned {
        /// Tile in question.
        tile: TileId,
        /// Current owner.
        owner: PlayerId,
    },

    /// Rent was requested on a tile nobody owns.
    #[error("{0} has no owner")]
    Unowned(TileId),

    /// Owner landed on their own tile.
    #[error("{player} owns {tile} and owes no rent")]
    SelfRent {
        /// Owner.
        player: PlayerId,
        /// Tile in question.
        tile: TileId,
    },

    /// Not enough cash.
    #[error("{player} needs {required} but has {available}")]
    InsufficientFunds {
        /// Paying player.
        player: PlayerId,
        /// Amount due.
        required: Money,
        /// Cash on hand.
        available: Money,
    },

    /// Money amounts must be non-negative.
    #[error("invalid amount {0}")]
    InvalidAmount(Money),

    /// Tile is mortgaged (cannot be mortgaged again or collect rent).
    #[error("{0} is mortgaged")]
    AlreadyMortgaged(TileId),

    /// Tile is not mortgaged.
    #[error("{0} is not mortgaged")]
    NotMortgaged(TileId),

    /// Group cannot be developed or mortgaged right now.
    #[error("{group} development blocked: {reason}")]
    DevelopmentBlocked {
        /// Group in question.
        group: PropertyGroup,
        /// What blocks it.
        reason: DevelopmentBlock,
    },

    /// Group already has four houses (for houses) or a hotel.
    #[error("{0} is fully developed")]
    MaxDevelopmentReached(PropertyGroup),

    /// Group has no buildings to sell.
    #[error("{0} has no buildings to sell")]
    NoDevelopment(PropertyGroup),

    /// Jailed players cannot move normally.
    #[error("{0} is in jail")]
    PlayerInJail(PlayerId),

    /// Jail exit requested for a free player.
    #[error("{0} is not in jail")]
    PlayerNotInJail(PlayerId),

    /// Player is already in jail.
    #[error("{0} is already in jail")]
    PlayerAlreadyInJail(PlayerId),

    /// Player holds no get-out-of-jail card.
    #[error("{0} has no get-out-of-jail card")]
    NoJailCard(PlayerId),

    /// Player already holds the maximum number of jail cards.
    #[error("{player} already holds {max} get-out-of-jail cards")]
    MaxJailCards {
        /// Receiving player.
        player: PlayerId,
        /// Configured limit.
        max: u8,
    },

    /// Trade offer is malformed or references assets incorrectly.
    #[error("invalid trade: {0}")]
    InvalidTrade(TradeViolation),
}

impl GameError {
    /// Shorthand for an insufficient-funds rejection.
    #[must_use]
    pub fn funds(player: PlayerId, required: Money, available: Money) -> Self {
        Self::InsufficientFunds {
            player,
            required,
            available,
        }
    }

    /// Is this a cash shortfall the bankruptcy resolver might cover?
    #[must_use]
    pub fn is_shortfall(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = GameError::funds(PlayerId::new(1), 200, 30);
        assert_eq!(err.to_string(), "Player 1 needs 200 but has 30");
        assert!(err.is_shortfall());

        let err = GameError::DevelopmentBlocked {
            group: PropertyGroup::Pink,
            reason: DevelopmentBlock::HousesRequired { current: 2 },
        };
        assert_eq!(
            err.to_string(),
            "pink development blocked: 4 houses required, group has 2"
        );
    }

    #[test]
    fn test_trade_message() {
        let err = GameError::InvalidTrade(TradeViolation::NotHeldBy {
            tile: TileId(5),
            player: PlayerId::new(0),
        });
        assert_eq!(err.to_string(), "invalid trade: Tile(5) is not held by Player 0");
        assert!(!err.is_shortfall());
    }
}
