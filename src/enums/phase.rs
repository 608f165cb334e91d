use std::fmt;

/// 한 턴의 진행 단계
#[derive(Clone, PartialEq, Eq, Copy, Debug, Hash)]
pub enum Phase {
    // 턴 시작 준비 (턴 상태 초기화)
    Prepare,

    // 드로우 페이즈
    Draw,

    // 플레이 페이즈. 플레이어가 선택을 포기할 때까지 반복됩니다.
    Play,

    // 손패 제한 초과분을 버리는 페이즈
    Discard,

    // 턴 종료
    End,
}

impl PartialOrd for Phase {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Phase {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order().cmp(&other.order())
    }
}

impl Phase {
    fn order(&self) -> u8 {
        match self {
            Phase::Prepare => 0,
            Phase::Draw => 1,
            Phase::Play => 2,
            Phase::Discard => 3,
            Phase::End => 4,
        }
    }

    pub fn is_prepare_phase(&self) -> bool {
        matches!(self, Phase::Prepare)
    }

    pub fn is_draw_phase(&self) -> bool {
        matches!(self, Phase::Draw)
    }

    /// 카드를 능동적으로 낼 수 있는 페이즈인지 확인
    pub fn is_play_phase(&self) -> bool {
        matches!(self, Phase::Play)
    }

    pub fn is_discard_phase(&self) -> bool {
        matches!(self, Phase::Discard)
    }

    pub fn is_end_phase(&self) -> bool {
        matches!(self, Phase::End)
    }

    /// 다음 페이즈 반환. End 다음은 다음 플레이어의 Prepare 입니다.
    pub fn next_phase(&self) -> Phase {
        match self {
            Phase::Prepare => Phase::Draw,
            Phase::Draw => Phase::Play,
            Phase::Play => Phase::Discard,
            Phase::Discard => Phase::End,
            Phase::End => Phase::Prepare,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Prepare => "Prepare",
            Phase::Draw => "Draw",
            Phase::Play => "Play",
            Phase::Discard => "Discard",
            Phase::End => "End",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
