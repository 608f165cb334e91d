use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    card::{played::PlayOption, Card, CardId},
    enums::{CardName, Character, ControlKind, Seat, SkillName},
};

use super::{
    cheapest_cards, first_option_by_name, select_weakest, Control, GameView, PlayChoice,
    ResponseRequest, TargetsByShape,
};

/// 캠페인 전투용 진영. 아군/적군은 신분이 아니라 캐릭터로 고정됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    CanBing,
    Adou,
    CaoJun,
}

impl Faction {
    pub fn allies(&self) -> &'static [Character] {
        match self {
            Faction::CanBing => &[Character::CanBing],
            Faction::Adou => &[Character::ZhaoYun, Character::ADou],
            Faction::CaoJun => &[Character::CaoJun],
        }
    }

    /// 우선 공격 대상 순서
    pub fn antagonists(&self) -> &'static [Character] {
        match self {
            Faction::CanBing => &[Character::ZhaoYun],
            Faction::Adou => &[Character::CaoJun],
            Faction::CaoJun => &[Character::ADou, Character::ZhaoYun],
        }
    }

    pub fn is_ally(&self, character: Character) -> bool {
        self.allies().contains(&character)
    }

    /// 캐릭터가 속한 진영. 캠페인 캐릭터가 아니면 None.
    pub fn of(character: Character) -> Option<Faction> {
        match character {
            Character::CanBing => Some(Faction::CanBing),
            Character::ADou | Character::ZhaoYun => Some(Faction::Adou),
            Character::CaoJun => Some(Faction::CaoJun),
            _ => None,
        }
    }
}

pub struct FactionAi {
    faction: Faction,
    rng: StdRng,
}

impl FactionAi {
    pub fn new(faction: Faction, rng: StdRng) -> Self {
        Self { faction, rng }
    }

    pub fn seeded(faction: Faction, seed: u64) -> Self {
        Self::new(faction, StdRng::seed_from_u64(seed))
    }

    fn is_ally_seat(&self, view: &GameView, seat: Seat) -> bool {
        seat == view.me
            || view
                .player(seat)
                .map(|p| self.faction.is_ally(p.character))
                .unwrap_or(true)
    }

    fn non_allies(&self, view: &GameView, candidates: &[Seat]) -> Vec<Seat> {
        candidates
            .iter()
            .copied()
            .filter(|seat| !self.is_ally_seat(view, *seat))
            .collect()
    }

    /// 후보 중 이름 붙은 적을 순서대로 찾습니다.
    fn named_antagonist(&self, view: &GameView, candidates: &[Seat]) -> Option<Seat> {
        self.faction.antagonists().iter().find_map(|character| {
            candidates
                .iter()
                .copied()
                .find(|seat| view.player(*seat).map(|p| p.character) == Some(*character))
        })
    }

    fn pick_target(&mut self, view: &GameView, candidates: &[Seat]) -> Option<Seat> {
        let non_allies = self.non_allies(view, candidates);
        self.named_antagonist(view, &non_allies)
            .or_else(|| select_weakest(view, &non_allies, &mut self.rng))
    }

    fn wants_peach(&self, view: &GameView) -> bool {
        match self.faction {
            Faction::CaoJun => view.my_hp() <= 1 && view.is_wounded(),
            _ => view.is_wounded(),
        }
    }

    fn alive_enemies(&self, view: &GameView) -> usize {
        view.alive_seats()
            .filter(|p| !self.is_ally_seat(view, p.seat))
            .count()
    }

    fn strike_or_duel(
        &mut self,
        view: &GameView,
        options: &[PlayOption],
        targets: &TargetsByShape,
        antagonist_only: bool,
    ) -> Option<PlayChoice> {
        let by_name = first_option_by_name(options);
        for name in [CardName::Strike, CardName::Duel] {
            let Some(option) = by_name.get(&name) else {
                continue;
            };
            let candidates = targets.for_card(name);
            let target = if antagonist_only {
                let non_allies = self.non_allies(view, &candidates);
                self.named_antagonist(view, &non_allies)
            } else {
                self.pick_target(view, &candidates)
            };
            if let Some(target) = target {
                debug!("{:?} seat {} plays {} at {}", self.faction, view.me, name, target);
                return Some(PlayChoice::new(option, vec![target]));
            }
        }
        None
    }

    fn area_trick(&self, view: &GameView, options: &[PlayOption], targets: &TargetsByShape) -> Option<PlayChoice> {
        if self.faction == Faction::Adou && self.alive_enemies(view) < 2 {
            return None;
        }
        if self.alive_enemies(view) == 0 {
            return None;
        }
        options
            .iter()
            .find(|option| option.play_as.is_area_trick())
            .map(|option| PlayChoice::new(option, targets.all_others.clone()))
    }

    fn peach(&self, view: &GameView, options: &[PlayOption]) -> Option<PlayChoice> {
        if !self.wants_peach(view) {
            return None;
        }
        options
            .iter()
            .find(|option| option.play_as == CardName::Peach)
            .map(|option| PlayChoice::new(option, vec![view.me]))
    }
}

#[async_trait]
impl Control for FactionAi {
    fn kind(&self) -> ControlKind {
        ControlKind::FactionAi
    }

    async fn choose_card_to_play(
        &mut self,
        view: &GameView,
        options: &[PlayOption],
        targets: &TargetsByShape,
    ) -> Option<PlayChoice> {
        match self.faction {
            Faction::CanBing => self
                .strike_or_duel(view, options, targets, true)
                .or_else(|| self.area_trick(view, options, targets))
                .or_else(|| self.peach(view, options))
                .or_else(|| self.strike_or_duel(view, options, targets, false)),
            Faction::Adou | Faction::CaoJun => self
                .peach(view, options)
                .or_else(|| self.strike_or_duel(view, options, targets, false))
                .or_else(|| self.area_trick(view, options, targets)),
        }
    }

    async fn choose_targets(
        &mut self,
        view: &GameView,
        candidates: &[Seat],
        _option: &PlayOption,
    ) -> Vec<Seat> {
        self.pick_target(view, candidates).into_iter().collect()
    }

    async fn choose_response_card(
        &mut self,
        view: &GameView,
        request: &ResponseRequest,
        candidates: &[PlayOption],
    ) -> Option<CardId> {
        let first = candidates.first()?;
        let answer = match request.required {
            CardName::Negate => match request.source {
                Some(source) => !self.is_ally_seat(view, source),
                None => false,
            },
            CardName::Peach if request.cause.is_none() => request
                .target
                .map(|target| self.is_ally_seat(view, target))
                .unwrap_or(false),
            _ => true,
        };
        answer.then(|| first.card_id())
    }

    async fn choose_discards(&mut self, _view: &GameView, hand: &[Card], count: usize) -> Vec<CardId> {
        cheapest_cards(hand, count)
    }

    async fn choose_skill_activation(&mut self, _view: &GameView, _skill: SkillName) -> bool {
        true
    }

    async fn choose_steal_index(
        &mut self,
        _view: &GameView,
        _from: Seat,
        hand_count: usize,
    ) -> Option<usize> {
        (hand_count > 0).then(|| self.rng.gen_range(0..hand_count))
    }
}
