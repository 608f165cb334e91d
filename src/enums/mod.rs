pub mod phase;

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

/// 좌석 번호. 턴 순서와 거리 계산의 기준이 됩니다.
pub type Seat = usize;

pub const BASE_MAX_HP: u32 = 4;
pub const RULER_HP_BONUS: u32 = 1;
pub const DEFAULT_ATTACK_RANGE: usize = 1;
pub const REBEL_KILL_REWARD: usize = 3;
pub const JUEJING_HAND_BONUS: usize = 2;

/// 카드 카탈로그. 런타임에 확장되지 않는 닫힌 집합입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardName {
    Strike,
    Dodge,
    Peach,
    Negate,
    Barbarian,
    Arrows,
    Duel,
    QingGangSword,
    Crossbow,
    RenWangShield,
    PlusHorse,
    MinusHorse,
}

impl CardName {
    pub fn category(&self) -> CardCategory {
        match self {
            CardName::Strike | CardName::Dodge | CardName::Peach => CardCategory::Basic,
            CardName::Negate | CardName::Barbarian | CardName::Arrows | CardName::Duel => {
                CardCategory::Trick
            }
            CardName::QingGangSword
            | CardName::Crossbow
            | CardName::RenWangShield
            | CardName::PlusHorse
            | CardName::MinusHorse => CardCategory::Equipment,
        }
    }

    pub fn target_shape(&self) -> TargetShape {
        match self {
            CardName::Strike => TargetShape::Attackable,
            CardName::Barbarian | CardName::Arrows | CardName::Duel => TargetShape::All,
            _ => TargetShape::SelfOnly,
        }
    }

    /// 장착 시 들어갈 장비 슬롯
    pub fn equip_slot(&self) -> Option<EquipSlot> {
        match self {
            CardName::QingGangSword | CardName::Crossbow => Some(EquipSlot::Weapon),
            CardName::RenWangShield => Some(EquipSlot::Armor),
            CardName::PlusHorse => Some(EquipSlot::PlusHorse),
            CardName::MinusHorse => Some(EquipSlot::MinusHorse),
            _ => None,
        }
    }

    /// 무기 공격 범위
    pub fn weapon_range(&self) -> Option<usize> {
        match self {
            CardName::Crossbow => Some(1),
            CardName::QingGangSword => Some(2),
            _ => None,
        }
    }

    pub fn is_area_trick(&self) -> bool {
        matches!(self, CardName::Barbarian | CardName::Arrows)
    }

    pub fn is_trick(&self) -> bool {
        self.category() == CardCategory::Trick
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CardName::Strike => "Strike",
            CardName::Dodge => "Dodge",
            CardName::Peach => "Peach",
            CardName::Negate => "Negate",
            CardName::Barbarian => "Barbarian",
            CardName::Arrows => "Arrows",
            CardName::Duel => "Duel",
            CardName::QingGangSword => "QingGangSword",
            CardName::Crossbow => "Crossbow",
            CardName::RenWangShield => "RenWangShield",
            CardName::PlusHorse => "PlusHorse",
            CardName::MinusHorse => "MinusHorse",
        }
    }
}

impl Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardCategory {
    Basic,
    Trick,
    Equipment,
}

/// 카드가 요구하는 대상 형태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetShape {
    SelfOnly,
    Attackable,
    All,
    WithinOne,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn is_black(&self) -> bool {
        matches!(self, Suit::Clubs | Suit::Spades)
    }

    pub fn is_red(&self) -> bool {
        !self.is_black()
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Suit::Hearts => write!(f, "Hearts"),
            Suit::Diamonds => write!(f, "Diamonds"),
            Suit::Clubs => write!(f, "Clubs"),
            Suit::Spades => write!(f, "Spades"),
        }
    }
}

/// 전환 사용 시 프레젠테이션에 보여줄 전용 카드면
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConversionFace {
    StrikeAsDodge,
    DodgeAsStrike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipSlot {
    Weapon,
    Armor,
    PlusHorse,
    MinusHorse,
}

impl Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EquipSlot::Weapon => write!(f, "Weapon"),
            EquipSlot::Armor => write!(f, "Armor"),
            EquipSlot::PlusHorse => write!(f, "PlusHorse"),
            EquipSlot::MinusHorse => write!(f, "MinusHorse"),
        }
    }
}

/// 숨겨진 신분
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    Ruler,
    Loyalist,
    #[default]
    Rebel,
    Traitor,
}

impl Role {
    pub fn is_ruler_side(&self) -> bool {
        matches!(self, Role::Ruler | Role::Loyalist)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Ruler => write!(f, "Ruler"),
            Role::Loyalist => write!(f, "Loyalist"),
            Role::Rebel => write!(f, "Rebel"),
            Role::Traitor => write!(f, "Traitor"),
        }
    }
}

/// 캐릭터 원형. 기본 체력과 스킬 오버라이드를 결정합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Character {
    #[default]
    Generic,
    ZhangFei,
    LvMeng,
    ZhuGuoSha,
    LingCao,
    ZhaoYun,
    CanBing,
    ADou,
    CaoJun,
}

impl Character {
    pub fn base_max_hp(&self) -> u32 {
        match self {
            Character::CanBing | Character::ADou => 2,
            Character::CaoJun => 3,
            _ => BASE_MAX_HP,
        }
    }
}

impl Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Character::Generic => "Generic",
            Character::ZhangFei => "ZhangFei",
            Character::LvMeng => "LvMeng",
            Character::ZhuGuoSha => "ZhuGuoSha",
            Character::LingCao => "LingCao",
            Character::ZhaoYun => "ZhaoYun",
            Character::CanBing => "CanBing",
            Character::ADou => "ADou",
            Character::CaoJun => "CaoJun",
        };
        write!(f, "{}", name)
    }
}

/// 스킬 이름
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillName {
    Paoxiao,
    Keji,
    NoDiscard,
    LingCaoDraw,
    Longdan,
    Chongzhen,
    Juejing,
}

impl SkillName {
    /// 진행형 해금 스킬의 단계 (1부터 시작)
    pub fn tier(&self) -> Option<u8> {
        match self {
            SkillName::Longdan => Some(1),
            SkillName::Chongzhen => Some(2),
            SkillName::Juejing => Some(3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillName::Paoxiao => "Paoxiao",
            SkillName::Keji => "Keji",
            SkillName::NoDiscard => "NoDiscard",
            SkillName::LingCaoDraw => "LingCaoDraw",
            SkillName::Longdan => "Longdan",
            SkillName::Chongzhen => "Chongzhen",
            SkillName::Juejing => "Juejing",
        }
    }
}

impl Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 스킬 오버라이드가 걸리는 생명주기 지점
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifecycle {
    Draw,
    Play,
    Discard,
    TakingDamage,
    Healing,
    Death,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnlockPolicy {
    /// 각 단계를 독립적으로 해금
    #[default]
    Independent,
    /// N 단계는 N-1 단계가 해금된 뒤에만 해금 가능
    Sequential,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    Human,
    RuleAi,
    FactionAi,
    Scripted,
}
