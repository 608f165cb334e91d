use thiserror::Error;

use crate::enums::Seat;

// ===================================================================
// 1. 세분화된 에러 타입
// ===================================================================

/// 덱 처리 관련 에러
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DeckError {
    #[error("draw pile and discard pile are both empty")]
    EmptyDeck,
}

/// 프레젠테이션 계층과의 동기화 에러
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum SyncError {
    #[error("presentation side disconnected")]
    Disconnected,

    #[error("session already closed")]
    Closed,
}

// ===================================================================
// 2. 엔진 전체 에러. 발생하면 게임은 승자 없이 종료됩니다.
// ===================================================================

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("turn ceiling of {limit} exceeded")]
    TurnLimitExceeded { limit: u32 },

    #[error("seat {seat} exceeded {limit} plays in one turn")]
    PlayLimitExceeded { seat: Seat, limit: usize },

    #[error("next player resolved to seat {seat} again while {alive} players are alive")]
    NextPlayerLoop { seat: Seat, alive: usize },

    #[error("no alive player left to take a turn")]
    NoAlivePlayer,

    #[error("sync failure: {0}")]
    Sync(#[from] SyncError),

    #[error("invalid game setup: {message}")]
    Setup { message: String },
}

/// 엔진 연산의 Result 별칭
pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn setup(message: impl Into<String>) -> Self {
        EngineError::Setup {
            message: message.into(),
        }
    }

    /// 엔진 일관성 위반 여부 (턴/플레이 상한, 다음 플레이어 루프)
    pub fn is_consistency_violation(&self) -> bool {
        matches!(
            self,
            EngineError::TurnLimitExceeded { .. }
                | EngineError::PlayLimitExceeded { .. }
                | EngineError::NextPlayerLoop { .. }
                | EngineError::NoAlivePlayer
        )
    }
}
