use serde::{Deserialize, Serialize};

use crate::enums::{CardName, ConversionFace, TargetShape};

use super::{Card, CardId};

/// 손패의 카드 하나를 특정 카탈로그 항목으로 내는 선택지.
/// 같은 카드가 원래 이름과 전환된 이름으로 두 번 나올 수 있습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayOption {
    pub card: Card,
    pub play_as: CardName,
}

impl PlayOption {
    pub fn natural(card: Card) -> Self {
        let play_as = card.get_name();
        Self { card, play_as }
    }

    pub fn converted(card: Card, play_as: CardName) -> Self {
        Self { card, play_as }
    }

    pub fn card_id(&self) -> CardId {
        self.card.get_id()
    }

    pub fn is_conversion(&self) -> bool {
        self.card.get_name() != self.play_as
    }
}

/// 한 번의 사용 동안만 존재하는 카드의 유효 정체성.
/// 저장된 `Card` 는 건드리지 않고, 해석 결과만 따로 들고 다닙니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedCard {
    card: Card,
    effective: CardName,
    converted_from: Option<CardName>,
    display: Option<ConversionFace>,
}

impl PlayedCard {
    pub fn new(card: Card, effective: CardName) -> Self {
        let original = card.get_name();
        let (converted_from, display) = if original == effective {
            (None, None)
        } else {
            (Some(original), conversion_face(original, effective))
        };
        Self {
            card,
            effective,
            converted_from,
            display,
        }
    }

    pub fn card(&self) -> &Card {
        &self.card
    }

    pub fn into_card(self) -> Card {
        self.card
    }

    pub fn effective(&self) -> CardName {
        self.effective
    }

    pub fn converted_from(&self) -> Option<CardName> {
        self.converted_from
    }

    pub fn display(&self) -> Option<ConversionFace> {
        self.display
    }

    pub fn target_shape(&self) -> TargetShape {
        self.effective.target_shape()
    }
}

fn conversion_face(from: CardName, to: CardName) -> Option<ConversionFace> {
    match (from, to) {
        (CardName::Strike, CardName::Dodge) => Some(ConversionFace::StrikeAsDodge),
        (CardName::Dodge, CardName::Strike) => Some(ConversionFace::DodgeAsStrike),
        _ => None,
    }
}
