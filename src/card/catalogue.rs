use crate::enums::{CardName, Suit};

use super::Card;

/// 카탈로그 항목별 장수 목록
pub type DeckList = Vec<(CardName, usize)>;

/// 기본 덱 구성
pub fn standard_deck_list() -> DeckList {
    vec![
        (CardName::Strike, 30),
        (CardName::Dodge, 15),
        (CardName::Peach, 8),
        (CardName::Negate, 4),
        (CardName::Barbarian, 3),
        (CardName::Arrows, 1),
        (CardName::Duel, 3),
        (CardName::QingGangSword, 1),
        (CardName::Crossbow, 2),
        (CardName::RenWangShield, 1),
        (CardName::PlusHorse, 3),
        (CardName::MinusHorse, 3),
    ]
}

/// 목록으로부터 카드 인스턴스를 만듭니다.
/// 무늬는 항목 안에서 순환하고, 숫자는 1~13 을 순환합니다.
pub fn build_cards(list: &DeckList) -> Vec<Card> {
    let mut cards = Vec::with_capacity(list.iter().map(|(_, count)| count).sum());
    for (name, count) in list {
        for i in 0..*count {
            let suit = Suit::ALL[i % Suit::ALL.len()];
            let rank = (i % 13) as u8 + 1;
            cards.push(Card::new(*name, suit, rank));
        }
    }
    cards
}
