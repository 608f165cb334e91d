use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    card::{played::PlayOption, Card, CardId},
    enums::{ControlKind, Seat, SkillName},
    sync::{AskKind, FrontendEvent, GameEvent, SyncLink},
};

use super::{Control, GameView, PlayChoice, ResponseRequest, TargetsByShape};

/// 프레젠테이션 계층의 사람 플레이어.
/// 모든 선택은 요청 이벤트를 보내고 짝이 되는 응답을 기다립니다.
pub struct HumanControl {
    seat: Seat,
    link: SyncLink,
}

/// -1, 범위를 벗어난 값은 모두 선택 없음
fn valid_index(index: i32, len: usize) -> Option<usize> {
    usize::try_from(index).ok().filter(|i| *i < len)
}

fn is_card_choice(event: &FrontendEvent) -> bool {
    matches!(event, FrontendEvent::PlayCardChoice { .. })
}

impl HumanControl {
    pub fn new(seat: Seat, link: SyncLink) -> Self {
        Self { seat, link }
    }

    /// 선택지 인덱스를 묻습니다. 연결이 끊기면 거절로 취급합니다.
    async fn ask_index(&self, prompt: AskKind, options: Vec<PlayOption>, len: usize) -> Option<usize> {
        let request = GameEvent::AskPlayCard {
            seat: self.seat,
            prompt,
            options,
        };
        match self.link.request(request, is_card_choice).await {
            Ok(FrontendEvent::PlayCardChoice { index }) => {
                let picked = valid_index(index, len);
                if picked.is_none() && index != -1 {
                    debug!("seat {} sent out-of-range index {}", self.seat, index);
                }
                picked
            }
            Ok(other) => {
                warn!("seat {} unexpected response {:?}", self.seat, other);
                None
            }
            Err(e) => {
                warn!("seat {} request failed: {}", self.seat, e);
                None
            }
        }
    }
}

#[async_trait]
impl Control for HumanControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Human
    }

    async fn choose_card_to_play(
        &mut self,
        _view: &GameView,
        options: &[PlayOption],
        _targets: &TargetsByShape,
    ) -> Option<PlayChoice> {
        if options.is_empty() {
            return None;
        }
        let index = self
            .ask_index(AskKind::Play, options.to_vec(), options.len())
            .await?;
        // 대상은 엔진이 choose_targets 로 따로 묻습니다.
        Some(PlayChoice::new(&options[index], vec![]))
    }

    async fn choose_targets(
        &mut self,
        _view: &GameView,
        candidates: &[Seat],
        option: &PlayOption,
    ) -> Vec<Seat> {
        if candidates.is_empty() {
            return vec![];
        }
        let request = GameEvent::AskTarget {
            seat: self.seat,
            card: option.clone(),
            candidates: candidates.to_vec(),
        };
        let response = self
            .link
            .request(request, |event| matches!(event, FrontendEvent::TargetChoice { .. }))
            .await;
        match response {
            Ok(FrontendEvent::TargetChoice { ids: Some(ids) }) => {
                let mut picked: Vec<Seat> = vec![];
                for id in ids {
                    if candidates.contains(&id) && !picked.contains(&id) {
                        picked.push(id);
                    }
                }
                picked
            }
            Ok(_) => vec![],
            Err(e) => {
                warn!("seat {} target request failed: {}", self.seat, e);
                vec![]
            }
        }
    }

    async fn choose_response_card(
        &mut self,
        _view: &GameView,
        request: &ResponseRequest,
        candidates: &[PlayOption],
    ) -> Option<CardId> {
        if candidates.is_empty() {
            return None;
        }
        let prompt = AskKind::Respond {
            required: request.required,
            cause: request.cause,
        };
        let index = self
            .ask_index(prompt, candidates.to_vec(), candidates.len())
            .await?;
        Some(candidates[index].card_id())
    }

    async fn choose_discards(&mut self, _view: &GameView, hand: &[Card], count: usize) -> Vec<CardId> {
        let mut remaining: Vec<Card> = hand.to_vec();
        let mut picked = vec![];
        while picked.len() < count && !remaining.is_empty() {
            let options: Vec<PlayOption> =
                remaining.iter().cloned().map(PlayOption::natural).collect();
            let prompt = AskKind::Discard {
                remaining: count - picked.len(),
            };
            let len = options.len();
            let Some(index) = self.ask_index(prompt, options, len).await else {
                break;
            };
            picked.push(remaining.remove(index).get_id());
        }
        picked
    }

    async fn choose_skill_activation(&mut self, _view: &GameView, skill: SkillName) -> bool {
        let request = GameEvent::AskSkill {
            seat: self.seat,
            skill,
        };
        match self
            .link
            .request(request, |event| matches!(event, FrontendEvent::SkillChoice { .. }))
            .await
        {
            Ok(FrontendEvent::SkillChoice { activate }) => activate,
            Ok(_) => false,
            Err(e) => {
                warn!("seat {} skill request failed: {}", self.seat, e);
                false
            }
        }
    }

    async fn choose_steal_index(
        &mut self,
        _view: &GameView,
        from: Seat,
        hand_count: usize,
    ) -> Option<usize> {
        if hand_count == 0 {
            return None;
        }
        self.ask_index(AskKind::Steal { from, hand_count }, vec![], hand_count)
            .await
    }
}
