use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::{
    enums::{CardName, Character, Lifecycle, SkillName, JUEJING_HAND_BONUS},
    unit::Player,
};

/// 한 턴에 낼 수 있는 공격 카드 수
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeAllowance {
    OncePerTurn,
    Unlimited,
}

/// 버림 페이즈 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscardPlan {
    Skip,
    /// 손패를 이 장수까지 줄입니다.
    Limit(usize),
}

impl DiscardPlan {
    /// 손패가 hand_len 장일 때 버려야 할 장수
    pub fn excess(self, hand_len: usize) -> usize {
        match self {
            DiscardPlan::Skip => 0,
            DiscardPlan::Limit(limit) => hand_len.saturating_sub(limit),
        }
    }
}

pub type DrawHook = fn(&Player, usize) -> usize;
pub type PlayHook = fn(&Player) -> StrikeAllowance;
pub type DiscardHook = fn(&Player) -> DiscardPlan;
/// (플레이어, 변화 전 체력) → 추가로 뽑을 장수
pub type HpHook = fn(&Player, u32) -> usize;

#[derive(Clone, Copy)]
pub enum Hook {
    Draw(DrawHook),
    Play(PlayHook),
    Discard(DiscardHook),
    TakingDamage(HpHook),
    Healing(HpHook),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    /// 묻지 않고 항상 적용
    Locked,
    /// Control 에게 발동 여부를 묻습니다.
    Optional,
}

#[derive(Clone, Copy)]
pub struct SkillHook {
    pub skill: SkillName,
    pub activation: Activation,
    /// 해금이 필요한 진행형 스킬
    pub requires: Option<SkillName>,
    pub hook: Hook,
}

// 기본 동작. 오버라이드가 없거나 발동하지 않았을 때 쓰입니다.

pub fn default_draw(_player: &Player, base: usize) -> usize {
    base
}

pub fn default_play(player: &Player) -> StrikeAllowance {
    if player.equipment().has(CardName::Crossbow) {
        StrikeAllowance::Unlimited
    } else {
        StrikeAllowance::OncePerTurn
    }
}

pub fn default_discard(player: &Player) -> DiscardPlan {
    DiscardPlan::Limit(player.get_hp() as usize)
}

pub fn default_hp_change(_player: &Player, _old_hp: u32) -> usize {
    0
}

// 캐릭터별 오버라이드

fn paoxiao_play(_player: &Player) -> StrikeAllowance {
    StrikeAllowance::Unlimited
}

fn keji_discard(player: &Player) -> DiscardPlan {
    if player.strike_used() {
        default_discard(player)
    } else {
        DiscardPlan::Skip
    }
}

fn no_discard(_player: &Player) -> DiscardPlan {
    DiscardPlan::Skip
}

fn lingcao_draw(player: &Player, _base: usize) -> usize {
    3 + player.equipment().count() / 2
}

fn juejing_discard(player: &Player) -> DiscardPlan {
    DiscardPlan::Limit(player.get_hp() as usize + JUEJING_HAND_BONUS)
}

fn juejing_damage(player: &Player, old_hp: u32) -> usize {
    usize::from(old_hp > 0 && player.get_hp() == 0)
}

fn juejing_heal(player: &Player, old_hp: u32) -> usize {
    usize::from(old_hp == 0 && player.get_hp() > 0)
}

/// (캐릭터, 생명주기) → 오버라이드 조회표
pub struct SkillTable {
    hooks: HashMap<(Character, Lifecycle), SkillHook>,
}

static SKILL_TABLE: Lazy<SkillTable> = Lazy::new(SkillTable::standard);

impl SkillTable {
    pub fn global() -> &'static SkillTable {
        &SKILL_TABLE
    }

    fn standard() -> Self {
        let mut hooks = HashMap::new();
        let mut register = |character, lifecycle, hook: SkillHook| {
            hooks.insert((character, lifecycle), hook);
        };

        register(
            Character::ZhangFei,
            Lifecycle::Play,
            SkillHook {
                skill: SkillName::Paoxiao,
                activation: Activation::Locked,
                requires: None,
                hook: Hook::Play(paoxiao_play),
            },
        );
        register(
            Character::LvMeng,
            Lifecycle::Discard,
            SkillHook {
                skill: SkillName::Keji,
                activation: Activation::Optional,
                requires: None,
                hook: Hook::Discard(keji_discard),
            },
        );
        register(
            Character::ZhuGuoSha,
            Lifecycle::Discard,
            SkillHook {
                skill: SkillName::NoDiscard,
                activation: Activation::Locked,
                requires: None,
                hook: Hook::Discard(no_discard),
            },
        );
        register(
            Character::LingCao,
            Lifecycle::Draw,
            SkillHook {
                skill: SkillName::LingCaoDraw,
                activation: Activation::Optional,
                requires: None,
                hook: Hook::Draw(lingcao_draw),
            },
        );
        for (lifecycle, hook) in [
            (Lifecycle::Discard, Hook::Discard(juejing_discard)),
            (Lifecycle::TakingDamage, Hook::TakingDamage(juejing_damage)),
            (Lifecycle::Healing, Hook::Healing(juejing_heal)),
        ] {
            register(
                Character::ZhaoYun,
                lifecycle,
                SkillHook {
                    skill: SkillName::Juejing,
                    activation: Activation::Locked,
                    requires: Some(SkillName::Juejing),
                    hook,
                },
            );
        }

        Self { hooks }
    }

    /// 플레이어에게 적용 가능한 오버라이드를 찾습니다.
    /// 해금되지 않은 진행형 스킬은 없는 것으로 취급합니다.
    pub fn resolve(&self, player: &Player, lifecycle: Lifecycle) -> Option<&SkillHook> {
        let hook = self.hooks.get(&(player.get_character(), lifecycle))?;
        match hook.requires {
            Some(skill) if !player.skills().is_unlocked(skill) => None,
            _ => Some(hook),
        }
    }
}

impl SkillHook {
    pub fn draw(&self) -> DrawHook {
        match self.hook {
            Hook::Draw(f) => f,
            _ => default_draw,
        }
    }

    pub fn play(&self) -> PlayHook {
        match self.hook {
            Hook::Play(f) => f,
            _ => default_play,
        }
    }

    pub fn discard(&self) -> DiscardHook {
        match self.hook {
            Hook::Discard(f) => f,
            _ => default_discard,
        }
    }

    pub fn hp_change(&self) -> HpHook {
        match self.hook {
            Hook::TakingDamage(f) | Hook::Healing(f) => f,
            _ => default_hp_change,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        card::Card,
        enums::{Role, Suit, UnlockPolicy},
    };

    fn player(character: Character) -> Player {
        Player::new(0, "p", character, Role::Rebel, UnlockPolicy::Independent)
    }

    #[test]
    fn test_generic_has_no_overrides() {
        let table = SkillTable::global();
        let p = player(Character::Generic);
        for lifecycle in [Lifecycle::Draw, Lifecycle::Play, Lifecycle::Discard, Lifecycle::Death] {
            assert!(table.resolve(&p, lifecycle).is_none());
        }
        assert_eq!(default_play(&p), StrikeAllowance::OncePerTurn);
        assert_eq!(default_discard(&p), DiscardPlan::Limit(4));
    }

    #[test]
    fn test_discard_excess() {
        assert_eq!(DiscardPlan::Skip.excess(9), 0);
        assert_eq!(DiscardPlan::Limit(4).excess(6), 2);
        assert_eq!(DiscardPlan::Limit(4).excess(3), 0);
    }

    #[test]
    fn test_crossbow_bypasses_limit() {
        let mut p = player(Character::Generic);
        p.equip(Card::new(CardName::Crossbow, Suit::Clubs, 1)).unwrap();
        assert_eq!(default_play(&p), StrikeAllowance::Unlimited);
    }

    #[test]
    fn test_keji_void_after_strike() {
        let table = SkillTable::global();
        let mut p = player(Character::LvMeng);
        let hook = table.resolve(&p, Lifecycle::Discard).unwrap();
        assert_eq!(hook.activation, Activation::Optional);
        assert_eq!((hook.discard())(&p), DiscardPlan::Skip);
        p.mark_strike_used();
        assert_eq!((hook.discard())(&p), DiscardPlan::Limit(4));
    }

    #[test]
    fn test_lingcao_draw_counts_equipment() {
        let table = SkillTable::global();
        let mut p = player(Character::LingCao);
        let hook = table.resolve(&p, Lifecycle::Draw).unwrap();
        assert_eq!((hook.draw())(&p, 2), 3);
        p.equip(Card::new(CardName::PlusHorse, Suit::Hearts, 1)).unwrap();
        p.equip(Card::new(CardName::MinusHorse, Suit::Spades, 1)).unwrap();
        assert_eq!((hook.draw())(&p, 2), 4);
    }

    #[test]
    fn test_juejing_hooks_need_unlock() {
        let table = SkillTable::global();
        let mut p = player(Character::ZhaoYun);
        assert!(table.resolve(&p, Lifecycle::Discard).is_none());

        p.skills_mut().unlock(SkillName::Juejing);
        let hook = table.resolve(&p, Lifecycle::Discard).unwrap();
        assert_eq!((hook.discard())(&p), DiscardPlan::Limit(6));

        let hook = table.resolve(&p, Lifecycle::TakingDamage).unwrap();
        p.take_damage(4, None);
        assert_eq!((hook.hp_change())(&p, 4), 1);
        assert_eq!((hook.hp_change())(&p, 0), 0);
    }
}
