use tracing::{debug, info, instrument, warn};

use crate::{
    card::{played::PlayOption, CardId},
    control::{PlayChoice, TargetsByShape},
    enums::{phase::Phase, CardCategory, CardName, ControlKind, Lifecycle, Seat, TargetShape},
    exception::{DeckError, EngineError, EngineResult},
    skill::{
        substitution,
        table::{default_discard, default_draw, default_play},
        Activation, DiscardPlan, SkillHook, SkillTable, StrikeAllowance,
    },
    sync::GameEvent,
};

use super::Game;

impl Game {
    /// 한 플레이어의 턴: 준비 → 뽑기 → 사용(반복) → 버림 → 종료.
    /// 각 페이즈가 끝날 때 종료 조건을 확인하고, 턴 주인이 죽으면 남은 페이즈를 건너뜁니다.
    #[instrument(skip(self))]
    pub async fn run_turn(&mut self, seat: Seat) -> EngineResult<()> {
        info!("turn {} begins for seat {}", self.turn, seat);
        let mut phase = Phase::Prepare;
        loop {
            self.phase = phase;
            debug!("seat {} enters {}", seat, phase);
            match phase {
                Phase::Prepare => self.prepare_phase(seat),
                Phase::Draw => self.draw_phase(seat).await?,
                Phase::Play => self.play_phase(seat).await?,
                Phase::Discard => self.discard_phase(seat).await?,
                Phase::End => {}
            }
            if self.check_game_over().await? || !self.roster.is_alive(seat) {
                break;
            }
            if phase.is_end_phase() {
                break;
            }
            phase = phase.next_phase();
        }
        info!("turn {} ends for seat {}", self.turn, seat);
        Ok(())
    }

    fn prepare_phase(&mut self, seat: Seat) {
        if let Some(player) = self.roster.get_player_mut(seat) {
            player.reset_turn_state();
        }
    }

    /// 선택형 스킬이면 Control 에게 발동 여부를 묻습니다.
    pub(crate) async fn confirm_skill(&mut self, seat: Seat, hook: &SkillHook) -> bool {
        match hook.activation {
            Activation::Locked => true,
            Activation::Optional => {
                let view = self.view_for(seat);
                let activate = self.controls[seat]
                    .choose_skill_activation(&view, hook.skill)
                    .await;
                info!("seat {} {} {}", seat, if activate { "activates" } else { "declines" }, hook.skill);
                activate
            }
        }
    }

    async fn draw_phase(&mut self, seat: Seat) -> EngineResult<()> {
        let base = self.config.rules.draw_count;
        let Some(player) = self.roster.get_player(seat) else {
            return Ok(());
        };
        let hook = SkillTable::global().resolve(player, Lifecycle::Draw).copied();
        let count = match hook {
            Some(hook) => {
                let overridden = (hook.draw())(player, base);
                if overridden != base && self.confirm_skill(seat, &hook).await {
                    overridden
                } else {
                    base
                }
            }
            None => default_draw(player, base),
        };
        self.draw_cards(seat, count).await
    }

    /// 덱에서 count 장을 뽑아 손패에 넣습니다. 덱이 완전히 비면 조용히 멈춥니다.
    pub(crate) async fn draw_cards(&mut self, seat: Seat, count: usize) -> EngineResult<()> {
        let reveal = self.config.sync.reveal_all_draws
            || self.controls.get(seat).map(|c| c.kind()) == Some(ControlKind::Human);
        for _ in 0..count {
            let card = match self.deck.draw() {
                Ok(card) => card,
                Err(DeckError::EmptyDeck) => {
                    warn!("seat {} could not draw: deck exhausted", seat);
                    break;
                }
            };
            let shown = reveal.then(|| card.clone());
            let Some(player) = self.roster.get_player_mut(seat) else {
                self.deck.discard(card);
                break;
            };
            debug!("seat {} draws {}", seat, card);
            player.add_to_hand(card);
            self.link
                .emit(GameEvent::DrawCard {
                    card: shown,
                    to_player: seat,
                })
                .await?;
        }
        Ok(())
    }

    pub fn strike_allowance(&self, seat: Seat) -> StrikeAllowance {
        let Some(player) = self.roster.get_player(seat) else {
            return StrikeAllowance::OncePerTurn;
        };
        match SkillTable::global().resolve(player, Lifecycle::Play) {
            Some(hook) => (hook.play())(player),
            None => default_play(player),
        }
    }

    /// 지금 능동으로 낼 수 있는 선택지. 전환 선택지도 포함합니다.
    pub fn playable_options(&self, seat: Seat) -> Vec<PlayOption> {
        let Some(player) = self.roster.get_player(seat) else {
            return vec![];
        };
        if !player.is_alive() {
            return vec![];
        }
        let targets = self.targets_for(seat);
        let strike_open = !player.strike_used()
            || self.strike_allowance(seat) == StrikeAllowance::Unlimited;

        substitution::play_options(player)
            .into_iter()
            .filter(|option| match option.play_as {
                CardName::Dodge | CardName::Negate => false,
                CardName::Peach => player.is_wounded(),
                CardName::Strike => strike_open && !targets.attackable.is_empty(),
                name if name.category() == CardCategory::Equipment => true,
                name => !targets.for_card(name).is_empty(),
            })
            .collect()
    }

    async fn play_phase(&mut self, seat: Seat) -> EngineResult<()> {
        let limit = self.config.rules.max_plays_per_turn;
        let mut plays = 0;
        loop {
            if self.is_over() || !self.roster.is_alive(seat) {
                break;
            }
            let options = self.playable_options(seat);
            if options.is_empty() {
                break;
            }
            let targets = self.targets_for(seat);
            let view = self.view_for(seat);
            let choice = self.controls[seat]
                .choose_card_to_play(&view, &options, &targets)
                .await;
            let Some(choice) = choice else {
                debug!("seat {} ends play phase", seat);
                break;
            };
            if plays >= limit {
                return Err(EngineError::PlayLimitExceeded { seat, limit });
            }
            plays += 1;

            let Some((option, chosen)) = self.settle_choice(seat, &options, &targets, choice).await
            else {
                break;
            };
            self.execute_play(seat, option, chosen).await?;
            if self.check_game_over().await? {
                break;
            }
        }
        Ok(())
    }

    /// 고른 카드와 대상을 검증합니다. 잘못된 선택이나 빈 대상은 거절로 취급합니다.
    async fn settle_choice(
        &mut self,
        seat: Seat,
        options: &[PlayOption],
        targets: &TargetsByShape,
        choice: PlayChoice,
    ) -> Option<(PlayOption, Vec<Seat>)> {
        let Some(option) = options
            .iter()
            .find(|o| o.card_id() == choice.card && o.play_as == choice.play_as)
            .cloned()
        else {
            warn!("seat {} chose a card that is not playable", seat);
            return None;
        };

        let play_as = option.play_as;
        if play_as.is_area_trick() {
            return Some((option, targets.all_others.clone()));
        }
        if play_as.target_shape() == TargetShape::SelfOnly {
            return Some((option, vec![seat]));
        }

        let candidates = targets.for_card(play_as);
        let mut picked = choice.targets;
        if picked.is_empty() {
            let view = self.view_for(seat);
            picked = self.controls[seat]
                .choose_targets(&view, &candidates, &option)
                .await;
        }
        let chosen: Vec<Seat> = picked
            .into_iter()
            .filter(|t| candidates.contains(t))
            .take(1)
            .collect();
        if chosen.is_empty() {
            debug!("seat {} gave no valid target for {}", seat, play_as);
            return None;
        }
        Some((option, chosen))
    }

    async fn discard_phase(&mut self, seat: Seat) -> EngineResult<()> {
        let Some(player) = self.roster.get_player(seat) else {
            return Ok(());
        };
        let hand_len = player.hand_len();
        let default_plan = default_discard(player);
        let plan = match SkillTable::global().resolve(player, Lifecycle::Discard).copied() {
            Some(hook) => {
                let overridden = (hook.discard())(player);
                // 버릴 장수가 달라지지 않으면 묻지 않습니다.
                let changes = overridden.excess(hand_len) != default_plan.excess(hand_len);
                if changes && self.confirm_skill(seat, &hook).await {
                    overridden
                } else {
                    default_plan
                }
            }
            None => default_plan,
        };

        let limit = match plan {
            DiscardPlan::Skip => {
                debug!("seat {} skips discarding", seat);
                return Ok(());
            }
            DiscardPlan::Limit(limit) => limit,
        };
        let hand: Vec<_> = self
            .roster
            .get_player(seat)
            .map(|p| p.hand().to_vec())
            .unwrap_or_default();
        let excess = hand.len().saturating_sub(limit);
        if excess == 0 {
            return Ok(());
        }

        let view = self.view_for(seat);
        let chosen = self.controls[seat].choose_discards(&view, &hand, excess).await;
        let mut ids: Vec<CardId> = vec![];
        for id in chosen {
            if ids.len() < excess && !ids.contains(&id) && hand.iter().any(|c| c.get_id() == id) {
                ids.push(id);
            }
        }
        // 모자라면 오른쪽 끝부터 채웁니다.
        for card in hand.iter().rev() {
            if ids.len() >= excess {
                break;
            }
            if !ids.contains(&card.get_id()) {
                ids.push(card.get_id());
            }
        }

        info!("seat {} discards {} cards down to {}", seat, ids.len(), limit);
        for id in ids {
            let card = self
                .roster
                .get_player_mut(seat)
                .and_then(|p| p.remove_from_hand(id));
            if let Some(card) = card {
                self.discard_card(seat, card).await?;
            }
        }
        Ok(())
    }
}
