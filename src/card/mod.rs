pub mod catalogue;
pub mod played;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::enums::*;

/// 카드 인스턴스 식별자
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardId(Uuid);

impl CardId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CardId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for CardId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<CardId> for Uuid {
    fn from(id: CardId) -> Self {
        id.0
    }
}

/// 단일 카드 정보를 담은 구조체 입니다.
/// 카탈로그 이름, 무늬, 숫자는 생성 후 바뀌지 않습니다.
/// 다른 카드로 취급되는 경우는 `played::PlayedCard` 가 따로 표현합니다.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    id: CardId,
    name: CardName,
    suit: Suit,
    rank: u8,
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({} {})", self.name, self.suit, self.rank)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{} {}]", self.name, self.suit, self.rank)
    }
}

impl Card {
    pub fn new(name: CardName, suit: Suit, rank: u8) -> Card {
        Card {
            id: CardId::new(),
            name,
            suit,
            rank,
        }
    }

    pub fn get_id(&self) -> CardId {
        self.id
    }

    pub fn get_name(&self) -> CardName {
        self.name
    }

    pub fn get_suit(&self) -> Suit {
        self.suit
    }

    pub fn get_rank(&self) -> u8 {
        self.rank
    }

    pub fn get_category(&self) -> CardCategory {
        self.name.category()
    }

    pub fn get_target_shape(&self) -> TargetShape {
        self.name.target_shape()
    }

    pub fn is(&self, name: CardName) -> bool {
        self.name == name
    }
}
