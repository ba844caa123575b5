//! Trade offers between two players.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::board::TileId;
use crate::core::{Money, PlayerId};

/// Tiles on one side of a trade. Most offers move 0-4 tiles.
pub type TradeTiles = SmallVec<[TileId; 4]>;

/// An N-for-M proposal from `source` to `target`.
///
/// Carries no behavior: legality lives in the validation gate and execution in
/// the engine.
///
/// ```
/// use rust_monopoly::board::TileId;
/// use rust_monopoly::core::PlayerId;
/// use rust_monopoly::trade::TradeOffer;
///
/// let offer = TradeOffer::new(PlayerId::new(0), PlayerId::new(1))
///     .offer_tiles([TileId(1)])
///     .request_tiles([TileId(3)])
///     .request_money(50);
/// assert_eq!(offer.money_requested, 50);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeOffer {
    /// Player making the offer.
    pub source: PlayerId,
    /// Player receiving it.
    pub target: PlayerId,
    /// Tiles moving source -> target.
    pub properties_offered: TradeTiles,
    /// Cash moving source -> target.
    pub money_offered: Money,
    /// Jail cards moving source -> target.
    pub jail_cards_offered: u8,
    /// Tiles moving target -> source.
    pub properties_requested: TradeTiles,
    /// Cash moving target -> source.
    pub money_requested: Money,
    /// Jail cards moving target -> source.
    pub jail_cards_requested: u8,
}

impl TradeOffer {
    /// An empty offer between two players.
    #[must_use]
    pub fn new(source: PlayerId, target: PlayerId) -> Self {
        Self {
            source,
            target,
            properties_offered: SmallVec::new(),
            money_offered: 0,
            jail_cards_offered: 0,
            properties_requested: SmallVec::new(),
            money_requested: 0,
            jail_cards_requested: 0,
        }
    }

    /// Tiles the source gives.
    #[must_use]
    pub fn offer_tiles(mut self, tiles: impl IntoIterator<Item = TileId>) -> Self {
        self.properties_offered.extend(tiles);
        self
    }

    /// Cash the source gives.
    #[must_use]
    pub fn offer_money(mut self, amount: Money) -> Self {
        self.money_offered = amount;
        self
    }

    /// Jail cards the source gives.
    #[must_use]
    pub fn offer_jail_cards(mut self, count: u8) -> Self {
        self.jail_cards_offered = count;
        self
    }

    /// Tiles the source wants.
    #[must_use]
    pub fn request_tiles(mut self, tiles: impl IntoIterator<Item = TileId>) -> Self {
        self.properties_requested.extend(tiles);
        self
    }

    /// Cash the source wants.
    #[must_use]
    pub fn request_money(mut self, amount: Money) -> Self {
        self.money_requested = amount;
        self
    }

    /// Jail cards the source wants.
    #[must_use]
    pub fn request_jail_cards(mut self, count: u8) -> Self {
        self.jail_cards_requested = count;
        self
    }

    /// Does nothing change hands?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties_offered.is_empty()
            && self.properties_requested.is_empty()
            && self.money_offered == 0
            && self.money_requested == 0
            && self.jail_cards_offered == 0
            && self.jail_cards_requested == 0
    }

    /// Every tile named on either side.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        self.properties_offered
            .iter()
            .chain(self.properties_requested.iter())
            .copied()
    }

    /// Net cash flow into the source.
    #[must_use]
    pub fn net_money_to_source(&self) -> Money {
        self.money_requested - self.money_offered
    }
}

impl std::fmt::Display for TradeOffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} offers {:?} + {} + {} card(s) to {} for {:?} + {} + {} card(s)",
            self.source,
            self.properties_offered.as_slice(),
            self.money_offered,
            self.jail_cards_offered,
            self.target,
            self.properties_requested.as_slice(),
            self.money_requested,
            self.jail_cards_requested
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_offer() {
        let offer = TradeOffer::new(PlayerId::new(0), PlayerId::new(1));
        assert!(offer.is_empty());
        assert!(!offer.clone().offer_jail_cards(1).is_empty());
    }

    #[test]
    fn test_builder_and_net_money() {
        let offer = TradeOffer::new(PlayerId::new(0), PlayerId::new(1))
            .offer_tiles([TileId(1), TileId(3)])
            .offer_money(20)
            .request_money(70);
        assert_eq!(offer.tiles().count(), 2);
        assert_eq!(offer.net_money_to_source(), 50);
    }
}
