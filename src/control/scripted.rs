use std::collections::VecDeque;

use async_trait::async_trait;
use tracing::warn;

use crate::{
    card::{played::PlayOption, Card, CardId},
    enums::{CardName, ControlKind, Seat, SkillName},
};

use super::{Control, GameView, PlayChoice, ResponseRequest, TargetsByShape};

/// 미리 정해 둔 수를 그대로 두는 Control.
/// 캠페인 연출과 시나리오 테스트에 씁니다.
#[derive(Debug, Clone, Default)]
pub struct ScriptedControl {
    plays: VecDeque<(CardName, Vec<Seat>)>,
    respond: bool,
    negate: bool,
    activate: bool,
    steal_index: Option<usize>,
}

impl ScriptedControl {
    /// 아무것도 내지 않고, 응답도 하지 않습니다.
    pub fn passive() -> Self {
        Self::default()
    }

    pub fn play(mut self, name: CardName, targets: Vec<Seat>) -> Self {
        self.plays.push_back((name, targets));
        self
    }

    pub fn responding(mut self) -> Self {
        self.respond = true;
        self
    }

    pub fn negating(mut self) -> Self {
        self.negate = true;
        self
    }

    pub fn activating(mut self) -> Self {
        self.activate = true;
        self
    }

    pub fn stealing(mut self, index: usize) -> Self {
        self.steal_index = Some(index);
        self
    }

    pub fn remaining_plays(&self) -> usize {
        self.plays.len()
    }
}

#[async_trait]
impl Control for ScriptedControl {
    fn kind(&self) -> ControlKind {
        ControlKind::Scripted
    }

    async fn choose_card_to_play(
        &mut self,
        view: &GameView,
        options: &[PlayOption],
        _targets: &TargetsByShape,
    ) -> Option<PlayChoice> {
        let (name, targets) = self.plays.pop_front()?;
        match options.iter().find(|option| option.play_as == name) {
            Some(option) => Some(PlayChoice::new(option, targets)),
            None => {
                warn!("seat {} scripted {} is not playable, skipping", view.me, name);
                None
            }
        }
    }

    async fn choose_targets(
        &mut self,
        _view: &GameView,
        candidates: &[Seat],
        _option: &PlayOption,
    ) -> Vec<Seat> {
        candidates.first().copied().into_iter().collect()
    }

    async fn choose_response_card(
        &mut self,
        _view: &GameView,
        request: &ResponseRequest,
        candidates: &[PlayOption],
    ) -> Option<CardId> {
        let answer = match request.required {
            CardName::Negate => self.negate,
            _ => self.respond,
        };
        if answer {
            candidates.first().map(PlayOption::card_id)
        } else {
            None
        }
    }

    /// 오른쪽 끝 카드부터 버립니다.
    async fn choose_discards(&mut self, _view: &GameView, hand: &[Card], count: usize) -> Vec<CardId> {
        hand.iter().rev().take(count).map(Card::get_id).collect()
    }

    async fn choose_skill_activation(&mut self, _view: &GameView, _skill: SkillName) -> bool {
        self.activate
    }

    async fn choose_steal_index(
        &mut self,
        _view: &GameView,
        _from: Seat,
        _hand_count: usize,
    ) -> Option<usize> {
        self.steal_index
    }
}
