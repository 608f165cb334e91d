use crate::{
    card::{played::PlayOption, Card},
    enums::{CardCategory, CardName, SkillName, Suit},
    unit::Player,
};

/// 진화형 전환표: 무늬 → 카탈로그 항목
pub fn evolved_target(suit: Suit) -> CardName {
    match suit {
        Suit::Hearts => CardName::Peach,
        Suit::Diamonds => CardName::Strike,
        Suit::Clubs => CardName::Dodge,
        Suit::Spades => CardName::Negate,
    }
}

/// 1단계 전환 쌍 (공격 ↔ 회피)
pub fn paired_target(name: CardName) -> Option<CardName> {
    match name {
        CardName::Strike => Some(CardName::Dodge),
        CardName::Dodge => Some(CardName::Strike),
        _ => None,
    }
}

/// 3단계가 열려 있으면 1단계 전환이 무늬 기반 전환으로 바뀝니다.
pub fn is_evolved(player: &Player) -> bool {
    player.skills().is_unlocked(SkillName::Juejing)
}

/// 이 카드가 다른 항목으로 취급될 수 있다면 그 항목을 돌려줍니다.
/// 1단계가 잠겨 있으면 항상 None.
pub fn conversion_for(player: &Player, card: &Card) -> Option<CardName> {
    if !player.skills().is_unlocked(SkillName::Longdan) {
        return None;
    }
    let target = if is_evolved(player) {
        if card.get_category() == CardCategory::Equipment {
            return None;
        }
        evolved_target(card.get_suit())
    } else {
        paired_target(card.get_name())?
    };
    (target != card.get_name()).then_some(target)
}

/// 능동 사용 후보. 원래 이름 그대로의 선택지와,
/// 해당 항목의 실물 카드가 손패에 없을 때만 전환 선택지를 만듭니다.
/// 사용 가능 여부는 호출 측이 판단합니다.
pub fn play_options(player: &Player) -> Vec<PlayOption> {
    let mut options = Vec::with_capacity(player.hand_len());
    for card in player.hand() {
        options.push(PlayOption::natural(card.clone()));
        if let Some(target) = conversion_for(player, card) {
            if !player.has_in_hand(target) {
                options.push(PlayOption::converted(card.clone(), target));
            }
        }
    }
    options
}

/// 응답 후보. 요구 항목의 실물이 없을 때에만 전환 후보를 제공합니다.
pub fn response_options(player: &Player, required: CardName) -> Vec<PlayOption> {
    let natural: Vec<PlayOption> = player
        .hand()
        .iter()
        .filter(|card| card.is(required))
        .cloned()
        .map(PlayOption::natural)
        .collect();
    if !natural.is_empty() {
        return natural;
    }
    player
        .hand()
        .iter()
        .filter(|card| conversion_for(player, card) == Some(required))
        .cloned()
        .map(|card| PlayOption::converted(card, required))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{Character, Role, UnlockPolicy};

    fn zhaoyun() -> Player {
        Player::new(0, "zy", Character::ZhaoYun, Role::Loyalist, UnlockPolicy::Independent)
    }

    #[test]
    fn test_locked_tier_offers_nothing() {
        let mut p = Player::new(0, "g", Character::Generic, Role::Rebel, UnlockPolicy::Independent);
        p.add_to_hand(Card::new(CardName::Dodge, Suit::Clubs, 2));
        assert!(response_options(&p, CardName::Strike).is_empty());
        assert_eq!(play_options(&p).len(), 1);
    }

    #[test]
    fn test_pair_substitution_only_when_absent() {
        let mut p = zhaoyun();
        p.add_to_hand(Card::new(CardName::Strike, Suit::Spades, 4));
        let options = response_options(&p, CardName::Dodge);
        assert_eq!(options.len(), 1);
        assert!(options[0].is_conversion());

        p.add_to_hand(Card::new(CardName::Dodge, Suit::Hearts, 2));
        let options = response_options(&p, CardName::Dodge);
        assert_eq!(options.len(), 1);
        assert!(!options[0].is_conversion());
    }

    #[test]
    fn test_dodge_offered_as_strike_in_play() {
        let mut p = zhaoyun();
        p.add_to_hand(Card::new(CardName::Dodge, Suit::Hearts, 2));
        let options = play_options(&p);
        assert_eq!(options.len(), 2);
        assert_eq!(options[1].play_as, CardName::Strike);
    }

    #[test]
    fn test_evolved_mapping_by_suit() {
        let mut p = zhaoyun();
        p.skills_mut().unlock(SkillName::Juejing);
        p.add_to_hand(Card::new(CardName::Duel, Suit::Hearts, 1));
        p.add_to_hand(Card::new(CardName::Strike, Suit::Spades, 9));

        let peach = response_options(&p, CardName::Peach);
        assert_eq!(peach.len(), 1);
        assert_eq!(peach[0].card.get_name(), CardName::Duel);

        let negate = response_options(&p, CardName::Negate);
        assert_eq!(negate.len(), 1);
        assert_eq!(negate[0].card.get_name(), CardName::Strike);

        // 진화 후에는 무늬가 맞지 않으면 공격 → 회피 전환이 없음
        assert!(response_options(&p, CardName::Dodge).is_empty());
    }
}
