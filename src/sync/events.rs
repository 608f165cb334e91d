use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    card::{played::PlayOption, Card},
    enums::{CardName, ConversionFace, EquipSlot, Seat, SkillName},
};

/// 카드가 향하는 대상. 광역 트릭은 개별 대상 대신 All 로 보냅니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayTarget {
    Players(Vec<Seat>),
    All,
}

/// 사람 플레이어에게 카드 선택을 요청하는 이유
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AskKind {
    Play,
    Respond {
        required: CardName,
        cause: Option<CardName>,
    },
    Discard { remaining: usize },
    Steal { from: Seat, hand_count: usize },
}

// --- 엔진 → 프레젠테이션 ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    DrawCard {
        card: Option<Card>,
        to_player: Seat,
    },
    PlayCard {
        card: Card,
        from_player: Seat,
        to: PlayTarget,
        /// 응답으로 낸 경우 응답 대상 카드
        response_to: Option<CardName>,
        original_name: Option<CardName>,
        display: Option<ConversionFace>,
        effective: bool,
    },
    Discard {
        card: Card,
        player: Seat,
    },
    HpChange {
        player: Seat,
        new_hp: u32,
        source: Option<Seat>,
        damage_kind: Option<CardName>,
    },
    EquipChange {
        player: Seat,
        equip: CardName,
        slot: EquipSlot,
    },
    Death {
        player: Seat,
    },
    GameOver {
        winner: Option<String>,
    },
    Steal {
        card: Card,
        from_player: Seat,
        to_player: Seat,
    },

    // 사람 플레이어 요청. Ack 대신 짝이 되는 응답을 기다립니다.
    AskPlayCard {
        seat: Seat,
        prompt: AskKind,
        options: Vec<PlayOption>,
    },
    AskTarget {
        seat: Seat,
        card: PlayOption,
        candidates: Vec<Seat>,
    },
    AskSkill {
        seat: Seat,
        skill: SkillName,
    },
}

impl GameEvent {
    /// 상태 변경 이벤트는 Ack 를 받아야 다음으로 진행합니다.
    /// 게임 종료와 요청 이벤트는 예외입니다.
    pub fn requires_ack(&self) -> bool {
        !matches!(self, GameEvent::GameOver { .. }) && !self.is_request()
    }

    /// 사람 플레이어 요청 이벤트
    pub fn is_request(&self) -> bool {
        matches!(
            self,
            GameEvent::AskPlayCard { .. } | GameEvent::AskTarget { .. } | GameEvent::AskSkill { .. }
        )
    }
}

/// 고유 식별자가 붙은 엔진 이벤트
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub event_id: Uuid,
    pub event: GameEvent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebugCommand {
    Win,
    Lose,
}

impl FromStr for DebugCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(DebugCommand::Win),
            "lose" => Ok(DebugCommand::Lose),
            other => Err(format!("unknown debug command: {}", other)),
        }
    }
}

impl fmt::Display for DebugCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugCommand::Win => write!(f, "win"),
            DebugCommand::Lose => write!(f, "lose"),
        }
    }
}

// --- 프레젠테이션 → 엔진 ---
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrontendEvent {
    Ack { event_id: Uuid },
    /// 선택지 인덱스. -1 은 건너뛰기.
    PlayCardChoice { index: i32 },
    TargetChoice { ids: Option<Vec<Seat>> },
    SkillChoice { activate: bool },
    Debug { command: DebugCommand },
}

impl FrontendEvent {
    /// 게임 흐름과 독립적인 대역 외 제어 메시지
    pub fn as_control(&self) -> Option<DebugCommand> {
        match self {
            FrontendEvent::Debug { command } => Some(*command),
            _ => None,
        }
    }
}
