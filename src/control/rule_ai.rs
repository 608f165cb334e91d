use async_trait::async_trait;
use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::debug;

use crate::{
    card::{played::PlayOption, Card, CardId},
    enums::{CardCategory, CardName, ControlKind, Role, Seat, SkillName},
};

use super::{
    cheapest_cards, first_option_by_name, select_weakest, Control, GameView, PlayChoice,
    ResponseRequest, TargetsByShape,
};

/// 공개 정보만으로 움직이는 탐욕적 AI
pub struct RuleAi {
    rng: StdRng,
}

impl RuleAi {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// 보이는 신분으로 추정한 적.
    /// 군주는 공개되어 있으므로 충신은 군주를 절대 노리지 않습니다.
    fn is_enemy(view: &GameView, seat: Seat) -> bool {
        if seat == view.me {
            return false;
        }
        let their_role = view.player(seat).and_then(|p| p.role);
        match view.my_role {
            Role::Ruler => true,
            Role::Loyalist => their_role != Some(Role::Ruler),
            Role::Rebel => true,
            Role::Traitor => {
                // 군주는 마지막에 상대
                their_role != Some(Role::Ruler) || view.alive_seats().count() <= 2
            }
        }
    }

    fn pick_enemy(&mut self, view: &GameView, candidates: &[Seat]) -> Option<Seat> {
        let enemies: Vec<Seat> = candidates
            .iter()
            .copied()
            .filter(|seat| Self::is_enemy(view, *seat))
            .collect();
        if view.my_role == Role::Rebel {
            let ruler = enemies
                .iter()
                .copied()
                .find(|seat| view.player(*seat).and_then(|p| p.role) == Some(Role::Ruler));
            if ruler.is_some() {
                return ruler;
            }
        }
        select_weakest(view, &enemies, &mut self.rng)
    }

    fn slot_is_empty(view: &GameView, name: CardName) -> bool {
        let Some(slot) = name.equip_slot() else {
            return false;
        };
        view.player(view.me)
            .map(|me| !me.equipment.iter().any(|equipped| equipped.equip_slot() == Some(slot)))
            .unwrap_or(false)
    }
}

#[async_trait]
impl Control for RuleAi {
    fn kind(&self) -> ControlKind {
        ControlKind::RuleAi
    }

    async fn choose_card_to_play(
        &mut self,
        view: &GameView,
        options: &[PlayOption],
        targets: &TargetsByShape,
    ) -> Option<PlayChoice> {
        let by_name = first_option_by_name(options);

        if view.is_wounded() {
            if let Some(peach) = by_name.get(&CardName::Peach) {
                return Some(PlayChoice::new(peach, vec![view.me]));
            }
        }

        for name in [CardName::Strike, CardName::Duel] {
            let Some(option) = by_name.get(&name) else {
                continue;
            };
            if let Some(target) = self.pick_enemy(view, &targets.for_card(name)) {
                debug!("seat {} plays {} at {}", view.me, name, target);
                return Some(PlayChoice::new(option, vec![target]));
            }
        }

        for name in [CardName::Barbarian, CardName::Arrows] {
            if let Some(option) = by_name.get(&name) {
                if !targets.all_others.is_empty() {
                    return Some(PlayChoice::new(option, targets.all_others.clone()));
                }
            }
        }

        options
            .iter()
            .find(|option| {
                option.play_as.category() == CardCategory::Equipment
                    && Self::slot_is_empty(view, option.play_as)
            })
            .map(|option| PlayChoice::new(option, vec![view.me]))
    }

    async fn choose_targets(
        &mut self,
        view: &GameView,
        candidates: &[Seat],
        _option: &PlayOption,
    ) -> Vec<Seat> {
        self.pick_enemy(view, candidates).into_iter().collect()
    }

    async fn choose_response_card(
        &mut self,
        view: &GameView,
        request: &ResponseRequest,
        candidates: &[PlayOption],
    ) -> Option<CardId> {
        let first = candidates.first()?;
        let answer = match request.required {
            CardName::Negate => match request.target {
                Some(target) => target == view.me,
                None => request.source != Some(view.me),
            },
            CardName::Peach if request.cause.is_none() => match request.target {
                Some(target) if target == view.me => true,
                Some(target) => {
                    view.my_role.is_ruler_side()
                        && view.player(target).and_then(|p| p.role) == Some(Role::Ruler)
                }
                None => false,
            },
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
