//! Blackjack engine - multi-deck shoe, hand valuation, one betting round
//!
//! A round runs `Betting -> PlayerTurn -> RoundOver`. Chips move when a bet
//! is placed (taken from the stack) and when the round settles (stake plus
//! winnings returned). The dealer plays out its hand synchronously inside
//! [`BlackjackState::stand`], standing on every 17.
//!
//! # Example
//!
//! ```
//! use arcade_core::blackjack::{BlackjackPhase, BlackjackState};
//! use arcade_core::rng::SimpleRng;
//!
//! let mut rng = SimpleRng::new(21);
//! let table = BlackjackState::new(&mut rng);
//!
//! let table = table.place_bet(100).deal(&mut rng);
//! assert_eq!(table.player().len(), 2);
//!
//! let table = table.stand();
//! assert_eq!(table.phase(), BlackjackPhase::RoundOver);
//! ```

use serde::Serialize;

use crate::rng::{shuffle, RandomSource};
use crate::types::{DEALER_STANDS_ON, DEFAULT_SHOE_DECKS, SHOE_RESHUFFLE_BELOW, STARTING_CHIPS};

/// Best hand value
const BLACKJACK: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
    /// Which deck of the shoe the card came from
    pub deck: u8,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank, deck: 0 }
    }
}

/// `decks` full 52-card decks in suit-major order
pub fn create_deck(decks: usize) -> Vec<Card> {
    let mut cards = Vec::with_capacity(decks * 52);
    for deck in 0..decks {
        for suit in Suit::ALL {
            for rank in Rank::ALL {
                cards.push(Card {
                    suit,
                    rank,
                    deck: deck as u8,
                });
            }
        }
    }
    cards
}

/// Shuffled copy of `deck`
pub fn shuffle_deck<R: RandomSource + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut cards = deck.to_vec();
    shuffle(rng, &mut cards);
    cards
}

/// Face cards count 10, aces 11 (demoted by [`hand_value`])
pub fn card_value(rank: Rank) -> u32 {
    match rank {
        Rank::Two => 2,
        Rank::Three => 3,
        Rank::Four => 4,
        Rank::Five => 5,
        Rank::Six => 6,
        Rank::Seven => 7,
        Rank::Eight => 8,
        Rank::Nine => 9,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King => 10,
        Rank::Ace => 11,
    }
}

/// Best total: aces count 1 instead of 11 while the hand would bust
pub fn hand_value(hand: &[Card]) -> u32 {
    let mut value: u32 = hand.iter().map(|c| card_value(c.rank)).sum();
    let mut aces = hand.iter().filter(|c| c.rank == Rank::Ace).count();
    while value > BLACKJACK && aces > 0 {
        value -= 10;
        aces -= 1;
    }
    value
}

/// Two cards worth 21
pub fn is_blackjack(hand: &[Card]) -> bool {
    hand.len() == 2 && hand_value(hand) == BLACKJACK
}

pub fn is_bust(hand: &[Card]) -> bool {
    hand_value(hand) > BLACKJACK
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlackjackPhase {
    Betting,
    PlayerTurn,
    RoundOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundOutcome {
    Win,
    Lose,
    Push,
    /// Player natural, paid 3:2
    Blackjack,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlackjackState {
    /// Undealt cards; the next card is at the end
    shoe: Vec<Card>,
    player: Vec<Card>,
    dealer: Vec<Card>,
    chips: u64,
    bet: u64,
    phase: BlackjackPhase,
    outcome: Option<RoundOutcome>,
}

impl BlackjackState {
    /// Fresh table with a shuffled six-deck shoe and the starting stack
    pub fn new<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        Self::with_shoe(shuffle_deck(&create_deck(DEFAULT_SHOE_DECKS), rng), STARTING_CHIPS)
    }

    /// Table with a given shoe (dealt from the end) and chip stack
    pub fn with_shoe(shoe: Vec<Card>, chips: u64) -> Self {
        Self {
            shoe,
            player: Vec::new(),
            dealer: Vec::new(),
            chips,
            bet: 0,
            phase: BlackjackPhase::Betting,
            outcome: None,
        }
    }

    pub fn shoe(&self) -> &[Card] {
        &self.shoe
    }

    pub fn player(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer(&self) -> &[Card] {
        &self.dealer
    }

    pub fn chips(&self) -> u64 {
        self.chips
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn phase(&self) -> BlackjackPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    pub fn player_value(&self) -> u32 {
        hand_value(&self.player)
    }

    pub fn dealer_value(&self) -> u32 {
        hand_value(&self.dealer)
    }

    /// Move `amount` from the stack onto the bet; ignored outside betting or
    /// when the stack is short
    pub fn place_bet(&self, amount: u64) -> Self {
        let mut next = self.clone();
        if self.phase != BlackjackPhase::Betting || amount == 0 || amount > self.chips {
            return next;
        }
        next.chips -= amount;
        next.bet += amount;
        next
    }

    /// Return the bet to the stack
    pub fn clear_bet(&self) -> Self {
        let mut next = self.clone();
        if self.phase != BlackjackPhase::Betting {
            return next;
        }
        next.chips += self.bet;
        next.bet = 0;
        next
    }

    /// Deal two cards each and settle naturals.
    ///
    /// Needs a bet. A shoe below the reshuffle mark is replaced by a freshly
    /// shuffled one first.
    pub fn deal<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Self {
        if self.phase != BlackjackPhase::Betting || self.bet == 0 {
            return self.clone();
        }

        let mut next = self.clone();
        if next.shoe.len() < SHOE_RESHUFFLE_BELOW {
            next.shoe = shuffle_deck(&create_deck(DEFAULT_SHOE_DECKS), rng);
        }

        next.player.clear();
        next.dealer.clear();
        for _ in 0..2 {
            next.draw_to_player();
        }
        for _ in 0..2 {
            next.draw_to_dealer();
        }
        next.phase = BlackjackPhase::PlayerTurn;
        next.outcome = None;

        match (is_blackjack(&next.player), is_blackjack(&next.dealer)) {
            (true, true) => next.settle(RoundOutcome::Push),
            (true, false) => next.settle(RoundOutcome::Blackjack),
            (false, true) => next.settle(RoundOutcome::Lose),
            (false, false) => {}
        }
        next
    }

    /// Player takes a card; busting loses the round
    pub fn hit(&self) -> Self {
        let mut next = self.clone();
        if self.phase != BlackjackPhase::PlayerTurn || !next.draw_to_player() {
            return next;
        }
        if is_bust(&next.player) {
            next.settle(RoundOutcome::Lose);
        }
        next
    }

    /// Player stands: the dealer draws below 17, then the round settles
    pub fn stand(&self) -> Self {
        let mut next = self.clone();
        if self.phase != BlackjackPhase::PlayerTurn {
            return next;
        }

        while hand_value(&next.dealer) < DEALER_STANDS_ON {
            if !next.draw_to_dealer() {
                break;
            }
        }

        let player = hand_value(&next.player);
        let dealer = hand_value(&next.dealer);
        let outcome = if is_bust(&next.dealer) || player > dealer {
            RoundOutcome::Win
        } else if dealer > player {
            RoundOutcome::Lose
        } else {
            RoundOutcome::Push
        };
        next.settle(outcome);
        next
    }

    /// Clear the table for the next bet; only after a round is over
    pub fn new_round(&self) -> Self {
        let mut next = self.clone();
        if self.phase != BlackjackPhase::RoundOver {
            return next;
        }
        next.player.clear();
        next.dealer.clear();
        next.bet = 0;
        next.phase = BlackjackPhase::Betting;
        next.outcome = None;
        next
    }

    fn draw_to_player(&mut self) -> bool {
        match self.shoe.pop() {
            Some(card) => {
                self.player.push(card);
                true
            }
            None => false,
        }
    }

    fn draw_to_dealer(&mut self) -> bool {
        match self.shoe.pop() {
            Some(card) => {
                self.dealer.push(card);
                true
            }
            None => false,
        }
    }

    /// Pay out and end the round. The stake was already taken from the stack.
    fn settle(&mut self, outcome: RoundOutcome) {
        let payout = match outcome {
            RoundOutcome::Win => self.bet * 2,
            RoundOutcome::Blackjack => self.bet * 5 / 2,
            RoundOutcome::Push => self.bet,
            RoundOutcome::Lose => 0,
        };
        self.chips += payout;
        self.phase = BlackjackPhase::RoundOver;
        self.outcome = Some(outcome);
    }
}
