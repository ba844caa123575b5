//! Chance and Community Chest decks.

use serde::{Deserialize, Serialize};

use crate::board::{Board, TileId};
use crate::core::{GameRng, Money};

/// What a drawn card does to the player who drew it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardEffect {
    /// Move forward to a tile, collecting Go income if passed.
    AdvanceTo(TileId),
    /// Move to the next railway; an owner charges rent times the multiplier.
    NearestRailway { rent_multiplier: u32 },
    /// Move to the next utility; an owner charges dice times the multiplier.
    NearestUtility { rent_multiplier: u32 },
    /// Step back.
    GoBack(u8),
    /// Straight to jail.
    GoToJail,
    /// Keep until used.
    GetOutOfJailFree,
    /// Bank pays the player.
    Collect(Money),
    /// Player pays the bank.
    Pay(Money),
    /// Player pays every other active player.
    PayEachPlayer(Money),
    /// Every other active player pays the player.
    CollectFromEachPlayer(Money),
    /// Pay per house and per hotel, counted per tile.
    Repairs { per_house: Money, per_hotel: Money },
}

/// A printed card.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Card text.
    pub text: String,
    /// What it does.
    pub effect: CardEffect,
}

impl Card {
    fn new(text: &str, effect: CardEffect) -> Self {
        Self {
            text: text.to_string(),
            effect,
        }
    }
}

/// A shuffled deck that reshuffles itself when exhausted.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
    order: Vec<usize>,
}

impl Deck {
    /// Deck over the given cards; shuffled on first draw.
    #[must_use]
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            order: Vec::new(),
        }
    }

    /// The classic Chance deck.
    ///
    /// Cards naming a tile the board lacks are left out.
    #[must_use]
    pub fn chance(board: &Board) -> Self {
        let mut cards = Vec::new();
        let mut advance = |text: &str, name: &str| {
            if let Some(tile) = board.tile_by_name(name) {
                cards.push(Card::new(text, CardEffect::AdvanceTo(tile)));
            }
        };
        advance("Advance to Go. Collect $200", "Go");
        advance("Advance to Illinois Avenue", "Illinois Avenue");
        advance("Advance to St. Charles Place", "St. Charles Place");
        advance("Advance to Boardwalk", "Boardwalk");
        advance("Take a trip to Reading Railroad", "Reading Railroad");

        let railway = CardEffect::NearestRailway { rent_multiplier: 2 };
        cards.extend([
            Card::new("Advance to the nearest Railroad. Pay the owner twice the rent", railway),
            Card::new("Advance to the nearest Railroad. Pay the owner twice the rent", railway),
            Card::new(
                "Advance to the nearest Utility. Pay the owner ten times the dice",
                CardEffect::NearestUtility { rent_multiplier: 10 },
            ),
            Card::new("Bank pays you a dividend of $50", CardEffect::Collect(50)),
            Card::new("Get Out of Jail Free", CardEffect::GetOutOfJailFree),
            Card::new("Go back three spaces", CardEffect::GoBack(3)),
            Card::new("Go to Jail. Do not pass Go", CardEffect::GoToJail),
            Card::new(
                "Make general repairs: $25 per house, $100 per hotel",
                CardEffect::Repairs {
                    per_house: 25,
                    per_hotel: 100,
                },
            ),
            Card::new("Speeding fine $15", CardEffect::Pay(15)),
            Card::new("Your building loan matures. Collect $150", CardEffect::Collect(150)),
            Card::new(
                "You have been elected Chairman of the Board. Pay each player $50",
                CardEffect::PayEachPlayer(50),
            ),
        ]);
        Self::new(cards)
    }

    /// The classic Community Chest deck.
    #[must_use]
    pub fn community_chest(board: &Board) -> Self {
        let mut cards = Vec::new();
        if let Some(go) = board.tile_by_name("Go") {
            cards.push(Card::new("Advance to Go. Collect $200", CardEffect::AdvanceTo(go)));
        }
        cards.extend([
            Card::new(
                "Street repairs: $40 per house, $115 per hotel",
                CardEffect::Repairs {
                    per_house: 40,
                    per_hotel: 115,
                },
            ),
            Card::new("Go to Jail. Do not pass Go", CardEffect::GoToJail),
            Card::new("Get Out of Jail Free", CardEffect::GetOutOfJailFree),
            Card::new("It is your birthday. Collect $10 from every player", CardEffect::CollectFromEachPlayer(10)),
            Card::new("Hospital fees. Pay $100", CardEffect::Pay(100)),
            Card::new("Life insurance matures. Collect $100", CardEffect::Collect(100)),
            Card::new("Doctor's fee. Pay $50", CardEffect::Pay(50)),
            Card::new("Bank error in your favor. Collect $200", CardEffect::Collect(200)),
            Card::new("Holiday fund matures. Collect $100", CardEffect::Collect(100)),
            Card::new("School fees. Pay $50", CardEffect::Pay(50)),
            Card::new("From sale of stock you get $50", CardEffect::Collect(50)),
            Card::new("You inherit $100", CardEffect::Collect(100)),
            Card::new("Income tax refund. Collect $20", CardEffect::Collect(20)),
            Card::new("Receive $25 consultancy fee", CardEffect::Collect(25)),
            Card::new("Second prize in a beauty contest. Collect $10", CardEffect::Collect(10)),
        ]);
        Self::new(cards)
    }

    /// Cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// No cards at all?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw the next card, reshuffling once every card has been seen.
    pub fn draw(&mut self, rng: &mut GameRng) -> Option<&Card> {
        if self.cards.is_empty() {
            return None;
        }
        if self.order.is_empty() {
            self.order = (0..self.cards.len()).collect();
            rng.shuffle(&mut self.order);
        }
        let index = self.order.pop()?;
        self.cards.get(index)
    }
}
