use std::collections::BTreeMap;

use tracing::{info, warn};

use crate::enums::{Character, SkillName, UnlockPolicy};

/// 진행형 스킬 해금표. 값은 false → true 로만 바뀝니다.
#[derive(Debug, Clone, Default)]
pub struct SkillBook {
    unlocked: BTreeMap<u8, (SkillName, bool)>,
    policy: UnlockPolicy,
}

impl SkillBook {
    pub fn empty(policy: UnlockPolicy) -> Self {
        Self {
            unlocked: BTreeMap::new(),
            policy,
        }
    }

    /// 캐릭터별 초기 해금표. 조운은 1단계만 열린 상태로 시작합니다.
    pub fn for_character(character: Character, policy: UnlockPolicy) -> Self {
        let mut book = Self::empty(policy);
        if character == Character::ZhaoYun {
            for (skill, open) in [
                (SkillName::Longdan, true),
                (SkillName::Chongzhen, false),
                (SkillName::Juejing, false),
            ] {
                if let Some(tier) = skill.tier() {
                    book.unlocked.insert(tier, (skill, open));
                }
            }
        }
        book
    }

    pub fn is_unlocked(&self, skill: SkillName) -> bool {
        skill
            .tier()
            .and_then(|tier| self.unlocked.get(&tier))
            .map(|(name, open)| *name == skill && *open)
            .unwrap_or(false)
    }

    /// 스킬을 해금합니다.
    /// 모르는 스킬이거나 이미 열려 있으면 false.
    /// Sequential 정책에서는 하위 단계가 모두 열려 있어야 합니다.
    pub fn unlock(&mut self, skill: SkillName) -> bool {
        let Some(tier) = skill.tier() else {
            warn!("{} is not a progressive skill", skill);
            return false;
        };
        match self.unlocked.get(&tier) {
            Some((name, _)) if *name != skill => return false,
            None => {
                warn!("{} is not in this skill book", skill);
                return false;
            }
            Some((_, true)) => {
                warn!("{} is already unlocked", skill);
                return false;
            }
            Some((_, false)) => {}
        }

        if self.policy == UnlockPolicy::Sequential {
            let lower_open = self
                .unlocked
                .range(..tier)
                .all(|(_, (_, open))| *open);
            if !lower_open {
                warn!("{} requires every lower tier to be unlocked first", skill);
                return false;
            }
        }

        if let Some(entry) = self.unlocked.get_mut(&tier) {
            entry.1 = true;
        }
        info!("skill {} unlocked", skill);
        true
    }

    pub fn entries(&self) -> Vec<(SkillName, bool)> {
        self.unlocked.values().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zhaoyun_initial_table() {
        let book = SkillBook::for_character(Character::ZhaoYun, UnlockPolicy::Independent);
        assert!(book.is_unlocked(SkillName::Longdan));
        assert!(!book.is_unlocked(SkillName::Chongzhen));
        assert!(!book.is_unlocked(SkillName::Juejing));
    }

    #[test]
    fn test_unlock_rejects_known_and_unknown() {
        let mut book = SkillBook::for_character(Character::ZhaoYun, UnlockPolicy::Independent);
        assert!(!book.unlock(SkillName::Longdan));
        assert!(!book.unlock(SkillName::Paoxiao));
        assert!(book.unlock(SkillName::Juejing));
        assert!(!book.unlock(SkillName::Juejing));

        let mut other = SkillBook::for_character(Character::ZhangFei, UnlockPolicy::Independent);
        assert!(!other.unlock(SkillName::Chongzhen));
    }

    #[test]
    fn test_sequential_policy_orders_tiers() {
        let mut book = SkillBook::for_character(Character::ZhaoYun, UnlockPolicy::Sequential);
        assert!(!book.unlock(SkillName::Juejing));
        assert!(book.unlock(SkillName::Chongzhen));
        assert!(book.unlock(SkillName::Juejing));
    }

    #[test]
    fn test_unlock_is_monotonic() {
        let mut book = SkillBook::for_character(Character::ZhaoYun, UnlockPolicy::Independent);
        let calls = [
            SkillName::Chongzhen,
            SkillName::Longdan,
            SkillName::Chongzhen,
            SkillName::Juejing,
            SkillName::Keji,
            SkillName::Juejing,
        ];
        let mut seen_open = vec![];
        for skill in calls {
            book.unlock(skill);
            for (name, open) in book.entries() {
                if open {
                    seen_open.push(name);
                }
                if seen_open.contains(&name) {
                    assert!(open, "{} flipped back to locked", name);
                }
            }
        }
    }
}
