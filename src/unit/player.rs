use crate::{
    card::{Card, CardId},
    enums::{CardName, Character, EquipSlot, Role, Seat, UnlockPolicy, RULER_HP_BONUS},
    skill::book::SkillBook,
    zone::EquipmentSlots,
};

/// 체력 변화 전후 값
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HpDelta {
    pub old: u32,
    pub new: u32,
}

impl HpDelta {
    pub fn changed(&self) -> bool {
        self.old != self.new
    }

    /// 0 보다 큰 체력에서 0 으로 떨어짐 (빈사 진입)
    pub fn entered_zero(&self) -> bool {
        self.old > 0 && self.new == 0
    }

    /// 0 에서 회복됨 (빈사 이탈)
    pub fn left_zero(&self) -> bool {
        self.old == 0 && self.new > 0
    }
}

/// 플레이어의 상태를 다루는 구조체 입니다.
/// 좌석, 캐릭터, 신분은 생성 후 바뀌지 않습니다.
#[derive(Debug, Clone)]
pub struct Player {
    seat: Seat,
    name: String,
    character: Character,
    role: Role,

    hp: u32,
    max_hp: u32,
    alive: bool,

    hand: Vec<Card>,
    equipment: EquipmentSlots,

    strike_used: bool,
    last_damage_source: Option<Seat>,
    skills: SkillBook,
}

impl Player {
    pub fn new(
        seat: Seat,
        name: impl Into<String>,
        character: Character,
        role: Role,
        policy: UnlockPolicy,
    ) -> Player {
        let mut max_hp = character.base_max_hp();
        if role == Role::Ruler {
            max_hp += RULER_HP_BONUS;
        }
        Player {
            seat,
            name: name.into(),
            character,
            role,
            hp: max_hp,
            max_hp,
            alive: true,
            hand: vec![],
            equipment: EquipmentSlots::new(),
            strike_used: false,
            last_damage_source: None,
            skills: SkillBook::for_character(character, policy),
        }
    }

    pub fn get_seat(&self) -> Seat {
        self.seat
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_character(&self) -> Character {
        self.character
    }

    pub fn get_role(&self) -> Role {
        self.role
    }

    pub fn get_hp(&self) -> u32 {
        self.hp
    }

    pub fn get_max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn is_wounded(&self) -> bool {
        self.hp < self.max_hp
    }

    pub fn get_last_damage_source(&self) -> Option<Seat> {
        self.last_damage_source
    }

    pub fn strike_used(&self) -> bool {
        self.strike_used
    }

    pub fn mark_strike_used(&mut self) {
        self.strike_used = true;
    }

    /// 턴 시작 시 호출
    pub fn reset_turn_state(&mut self) {
        self.strike_used = false;
    }

    /// 체력은 0 아래로 내려가지 않으며, 0 이 되어도 죽지 않습니다.
    pub fn take_damage(&mut self, amount: u32, source: Option<Seat>) -> HpDelta {
        let old = self.hp;
        self.hp = self.hp.saturating_sub(amount);
        if source.is_some() {
            self.last_damage_source = source;
        }
        HpDelta { old, new: self.hp }
    }

    pub fn heal(&mut self, amount: u32) -> HpDelta {
        let old = self.hp;
        self.hp = (self.hp + amount).min(self.max_hp);
        HpDelta { old, new: self.hp }
    }

    /// 사망 처리. 카드 이동은 호출 측이 담당합니다.
    pub fn mark_dead(&mut self) {
        self.alive = false;
        self.hp = 0;
    }

    // 손패

    pub fn hand(&self) -> &[Card] {
        &self.hand
    }

    pub fn hand_len(&self) -> usize {
        self.hand.len()
    }

    pub fn has_in_hand(&self, name: CardName) -> bool {
        self.hand.iter().any(|card| card.is(name))
    }

    pub fn add_to_hand(&mut self, card: Card) {
        self.hand.push(card);
    }

    pub fn remove_from_hand(&mut self, id: CardId) -> Option<Card> {
        let pos = self.hand.iter().position(|card| card.get_id() == id)?;
        Some(self.hand.remove(pos))
    }

    pub fn take_hand_at(&mut self, index: usize) -> Option<Card> {
        if index < self.hand.len() {
            Some(self.hand.remove(index))
        } else {
            None
        }
    }

    pub fn take_hand(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.hand)
    }

    // 장비

    pub fn equipment(&self) -> &EquipmentSlots {
        &self.equipment
    }

    pub fn equip(&mut self, card: Card) -> Result<Option<Card>, Card> {
        self.equipment.equip(card)
    }

    pub fn take_equipment(&mut self) -> Vec<(EquipSlot, Card)> {
        self.equipment.take_all()
    }

    pub fn card_count(&self) -> usize {
        self.hand.len() + self.equipment.count()
    }

    // 스킬

    pub fn skills(&self) -> &SkillBook {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut SkillBook {
        &mut self.skills
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Suit;

    fn player(role: Role) -> Player {
        Player::new(0, "p0", Character::Generic, role, UnlockPolicy::Independent)
    }

    #[test]
    fn test_ruler_gets_bonus_hp() {
        assert_eq!(player(Role::Ruler).get_max_hp(), 5);
        assert_eq!(player(Role::Rebel).get_max_hp(), 4);
    }

    #[test]
    fn test_damage_clamps_and_records_source() {
        let mut p = player(Role::Rebel);
        let delta = p.take_damage(9, Some(2));
        assert_eq!(delta, HpDelta { old: 4, new: 0 });
        assert!(delta.entered_zero());
        assert!(p.is_alive());
        assert_eq!(p.get_last_damage_source(), Some(2));

        let delta = p.heal(7);
        assert!(delta.left_zero());
        assert_eq!(p.get_hp(), p.get_max_hp());
    }

    #[test]
    fn test_hand_moves() {
        let mut p = player(Role::Loyalist);
        let card = Card::new(CardName::Peach, Suit::Hearts, 3);
        let id = card.get_id();
        p.add_to_hand(card);
        assert!(p.has_in_hand(CardName::Peach));
        assert!(p.remove_from_hand(id).is_some());
        assert!(p.remove_from_hand(id).is_none());
        assert_eq!(p.take_hand_at(0), None);
    }
}
