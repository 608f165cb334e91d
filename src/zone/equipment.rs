use crate::{
    card::Card,
    enums::{CardName, EquipSlot, DEFAULT_ATTACK_RANGE},
};

/// 무기, 방어구, +1 말, -1 말. 슬롯당 카드는 최대 한 장입니다.
#[derive(Debug, Default, Clone)]
pub struct EquipmentSlots {
    weapon: Option<Card>,
    armor: Option<Card>,
    plus_horse: Option<Card>,
    minus_horse: Option<Card>,
}

impl EquipmentSlots {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, slot: EquipSlot) -> &mut Option<Card> {
        match slot {
            EquipSlot::Weapon => &mut self.weapon,
            EquipSlot::Armor => &mut self.armor,
            EquipSlot::PlusHorse => &mut self.plus_horse,
            EquipSlot::MinusHorse => &mut self.minus_horse,
        }
    }

    pub fn get(&self, slot: EquipSlot) -> Option<&Card> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
            EquipSlot::PlusHorse => self.plus_horse.as_ref(),
            EquipSlot::MinusHorse => self.minus_horse.as_ref(),
        }
    }

    /// 카드를 장착하고, 같은 슬롯에 있던 카드를 돌려줍니다.
    /// 장비 카드가 아니면 그대로 돌려받습니다.
    pub fn equip(&mut self, card: Card) -> Result<Option<Card>, Card> {
        match card.get_name().equip_slot() {
            Some(slot) => Ok(self.slot_mut(slot).replace(card)),
            None => Err(card),
        }
    }

    pub fn has(&self, name: CardName) -> bool {
        self.iter().any(|card| card.is(name))
    }

    pub fn weapon_name(&self) -> Option<CardName> {
        self.weapon.as_ref().map(|card| card.get_name())
    }

    pub fn attack_range(&self) -> usize {
        self.weapon_name()
            .and_then(|name| name.weapon_range())
            .unwrap_or(DEFAULT_ATTACK_RANGE)
    }

    pub fn count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        [&self.weapon, &self.armor, &self.plus_horse, &self.minus_horse]
            .into_iter()
            .flatten()
    }

    /// 장착된 카드를 (슬롯, 카드) 로 모두 꺼냅니다.
    pub fn take_all(&mut self) -> Vec<(EquipSlot, Card)> {
        [
            EquipSlot::Weapon,
            EquipSlot::Armor,
            EquipSlot::PlusHorse,
            EquipSlot::MinusHorse,
        ]
        .into_iter()
        .filter_map(|slot| self.slot_mut(slot).take().map(|card| (slot, card)))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::Suit;

    #[test]
    fn test_equip_replaces_same_slot() {
        let mut slots = EquipmentSlots::new();
        let crossbow = Card::new(CardName::Crossbow, Suit::Clubs, 1);
        let sword = Card::new(CardName::QingGangSword, Suit::Spades, 6);

        assert_eq!(slots.equip(crossbow.clone()), Ok(None));
        assert_eq!(slots.attack_range(), 1);
        assert_eq!(slots.equip(sword), Ok(Some(crossbow)));
        assert_eq!(slots.attack_range(), 2);
        assert_eq!(slots.count(), 1);
    }

    #[test]
    fn test_non_equipment_is_rejected() {
        let mut slots = EquipmentSlots::new();
        let strike = Card::new(CardName::Strike, Suit::Hearts, 3);
        assert_eq!(slots.equip(strike.clone()), Err(strike));
        assert!(slots.is_empty());
    }

    #[test]
    fn test_take_all_empties_slots() {
        let mut slots = EquipmentSlots::new();
        slots.equip(Card::new(CardName::PlusHorse, Suit::Hearts, 5)).unwrap();
        slots.equip(Card::new(CardName::RenWangShield, Suit::Clubs, 2)).unwrap();
        let taken = slots.take_all();
        assert_eq!(taken.len(), 2);
        assert_eq!(taken[0].0, EquipSlot::Armor);
        assert!(slots.is_empty());
    }
}
