use std::collections::VecDeque;

use rand::{rngs::StdRng, seq::SliceRandom};
use tracing::{debug, info};

use crate::{card::Card, enums::CardName, exception::DeckError};

/// 뽑을 더미(앞에서 꺼냄)와 버린 더미(뒤에 쌓음).
pub struct Deck {
    draw_pile: VecDeque<Card>,
    discard_pile: Vec<Card>,
    rng: StdRng,
}

impl Deck {
    /// 카드를 한 번 섞어서 뽑을 더미를 만듭니다.
    pub fn new(mut cards: Vec<Card>, mut rng: StdRng) -> Deck {
        cards.shuffle(&mut rng);
        Deck {
            draw_pile: cards.into(),
            discard_pile: vec![],
            rng,
        }
    }

    /// 주어진 순서 그대로 쌓습니다. 첫 번째 카드가 맨 위입니다.
    pub fn stacked(cards: Vec<Card>, rng: StdRng) -> Deck {
        Deck {
            draw_pile: cards.into(),
            discard_pile: vec![],
            rng,
        }
    }

    /// 맨 위 카드를 뽑습니다.
    /// 뽑을 더미가 비었으면 버린 더미를 섞어 새 더미로 삼고, 둘 다 비었을 때만 실패합니다.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        if self.draw_pile.is_empty() {
            self.reshuffle();
        }
        self.draw_pile.pop_front().ok_or(DeckError::EmptyDeck)
    }

    pub fn discard(&mut self, card: Card) {
        debug!("discard pile <- {}", card);
        self.discard_pile.push(card);
    }

    /// 뽑을 더미에서 해당 이름의 첫 카드를 꺼냅니다. 시나리오 구성용.
    pub fn take_named(&mut self, name: CardName) -> Option<Card> {
        let pos = self.draw_pile.iter().position(|card| card.is(name))?;
        self.draw_pile.remove(pos)
    }

    pub fn draw_len(&self) -> usize {
        self.draw_pile.len()
    }

    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    pub fn discard_pile(&self) -> &[Card] {
        &self.discard_pile
    }

    fn reshuffle(&mut self) {
        if self.discard_pile.is_empty() {
            return;
        }
        let mut cards = std::mem::take(&mut self.discard_pile);
        cards.shuffle(&mut self.rng);
        info!("reshuffling {} discarded cards into the draw pile", cards.len());
        self.draw_pile.extend(cards);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Suit;
    use rand::SeedableRng;

    fn cards(n: usize) -> Vec<Card> {
        (0..n)
            .map(|i| Card::new(CardName::Strike, Suit::Spades, (i % 13) as u8 + 1))
            .collect()
    }

    #[test]
    fn test_stacked_draw_order() {
        let list = cards(3);
        let first = list[0].clone();
        let mut deck = Deck::stacked(list, StdRng::seed_from_u64(1));
        assert_eq!(deck.draw(), Ok(first));
        assert_eq!(deck.draw_len(), 2);
    }

    #[test]
    fn test_reshuffle_preserves_count() {
        let mut deck = Deck::new(cards(4), StdRng::seed_from_u64(7));
        let mut held = vec![];
        for _ in 0..4 {
            held.push(deck.draw().unwrap());
        }
        for card in held.drain(..3) {
            deck.discard(card);
        }
        assert_eq!(deck.draw_len(), 0);

        // 빈 더미에서 뽑으면 버린 더미 3장이 다시 섞여 들어옴
        let card = deck.draw().unwrap();
        held.push(card);
        assert_eq!(deck.draw_len() + deck.discard_len() + held.len(), 4);
        assert_eq!(deck.discard_len(), 0);
    }

    #[test]
    fn test_empty_deck_fails_only_when_both_piles_empty() {
        let mut deck = Deck::stacked(cards(1), StdRng::seed_from_u64(3));
        let card = deck.draw().unwrap();
        assert_eq!(deck.draw(), Err(DeckError::EmptyDeck));
        deck.discard(card);
        assert!(deck.draw().is_ok());
    }
}
