use tracing::{debug, info, warn};

use crate::{
    card::{
        played::{PlayOption, PlayedCard},
        Card,
    },
    control::ResponseRequest,
    enums::{CardCategory, CardName, Seat, SkillName},
    exception::EngineResult,
    skill::substitution,
    sync::{GameEvent, PlayTarget},
};

use super::Game;

impl Game {
    /// 카드를 버린 더미로 옮기고 알립니다.
    pub(crate) async fn discard_card(&mut self, owner: Seat, card: Card) -> EngineResult<()> {
        let event = GameEvent::Discard {
            card: card.clone(),
            player: owner,
        };
        self.deck.discard(card);
        self.link.emit(event).await?;
        Ok(())
    }

    /// 검증이 끝난 선택을 해석합니다.
    /// 유효 정체성은 해석 동안에만 `active_play` 에 머물고 끝나면 비워집니다.
    pub(crate) async fn execute_play(
        &mut self,
        seat: Seat,
        option: PlayOption,
        targets: Vec<Seat>,
    ) -> EngineResult<()> {
        let Some(player) = self.roster.get_player_mut(seat) else {
            return Ok(());
        };
        let Some(card) = player.remove_from_hand(option.card_id()) else {
            warn!("seat {} no longer holds {}", seat, option.card);
            return Ok(());
        };
        let played = PlayedCard::new(card, option.play_as);
        let effective = played.effective();
        if effective == CardName::Strike {
            player.mark_strike_used();
        }

        let blocked = effective == CardName::Strike
            && targets
                .first()
                .map(|target| self.armor_blocks(seat, *target, played.card()))
                .unwrap_or(false);
        let to = if effective.is_area_trick() {
            PlayTarget::All
        } else {
            PlayTarget::Players(targets.clone())
        };
        let event = GameEvent::PlayCard {
            card: played.card().clone(),
            from_player: seat,
            to,
            response_to: None,
            original_name: played.converted_from(),
            display: played.display(),
            effective: !blocked,
        };
        match played.converted_from() {
            Some(original) => info!("seat {} plays {} as {} -> {:?}", seat, original, effective, targets),
            None => info!("seat {} plays {} -> {:?}", seat, effective, targets),
        }
        self.active_play = Some(played);
        self.link.emit(event).await?;

        match effective {
            CardName::Strike => {
                if let Some(target) = targets.first().copied() {
                    if blocked {
                        info!("seat {} armor stops the strike", target);
                    } else {
                        self.resolve_strike(seat, target).await?;
                    }
                }
            }
            CardName::Peach => {
                self.heal(seat, 1).await?;
            }
            CardName::Barbarian | CardName::Arrows => {
                self.resolve_area(seat, effective).await?;
            }
            CardName::Duel => {
                if let Some(target) = targets.first().copied() {
                    self.resolve_duel(seat, target).await?;
                }
            }
            name if name.category() == CardCategory::Equipment => {
                // 장비는 버린 더미 대신 슬롯으로 갑니다.
                if let Some(played) = self.active_play.take() {
                    self.equip(seat, played.into_card()).await?;
                }
                return Ok(());
            }
            name => debug!("{} has no active effect", name),
        }

        if !self.is_over() {
            if let Some(target) = targets.first().copied() {
                self.try_chongzhen(seat, target).await?;
            }
        }

        if let Some(played) = self.active_play.take() {
            self.discard_card(seat, played.into_card()).await?;
        }
        Ok(())
    }

    /// 방어구가 검은 공격을 막는지. 청강검은 방어구를 무시합니다.
    fn armor_blocks(&self, attacker: Seat, target: Seat, card: &Card) -> bool {
        let Some(defender) = self.roster.get_player(target) else {
            return false;
        };
        let ignores_armor = self
            .roster
            .get_player(attacker)
            .map(|p| p.equipment().has(CardName::QingGangSword))
            .unwrap_or(false);
        defender.equipment().has(CardName::RenWangShield) && card.get_suit().is_black() && !ignores_armor
    }

    async fn equip(&mut self, seat: Seat, card: Card) -> EngineResult<()> {
        let name = card.get_name();
        let Some(player) = self.roster.get_player_mut(seat) else {
            return self.discard_card(seat, card).await;
        };
        match player.equip(card) {
            Ok(replaced) => {
                if let Some(slot) = name.equip_slot() {
                    info!("seat {} equips {} into {}", seat, name, slot);
                    self.link
                        .emit(GameEvent::EquipChange {
                            player: seat,
                            equip: name,
                            slot,
                        })
                        .await?;
                }
                if let Some(old) = replaced {
                    self.discard_card(seat, old).await?;
                }
            }
            Err(card) => self.discard_card(seat, card).await?,
        }
        Ok(())
    }

    /// seat 에게 응답 카드를 묻습니다. 내면 카드를 버린 더미로 옮기고 true.
    pub(crate) async fn ask_response(&mut self, seat: Seat, request: ResponseRequest) -> EngineResult<bool> {
        let Some(player) = self.roster.get_player(seat) else {
            return Ok(false);
        };
        if !player.is_alive() {
            return Ok(false);
        }
        let candidates = substitution::response_options(player, request.required);
        if candidates.is_empty() {
            return Ok(false);
        }

        let view = self.view_for(seat);
        let Some(id) = self.controls[seat]
            .choose_response_card(&view, &request, &candidates)
            .await
        else {
            return Ok(false);
        };
        let Some(option) = candidates.into_iter().find(|o| o.card_id() == id) else {
            warn!("seat {} answered with a card that was not offered", seat);
            return Ok(false);
        };
        let Some(card) = self
            .roster
            .get_player_mut(seat)
            .and_then(|p| p.remove_from_hand(id))
        else {
            return Ok(false);
        };

        let played = PlayedCard::new(card, option.play_as);
        info!("seat {} answers with {}", seat, played.effective());
        self.link
            .emit(GameEvent::PlayCard {
                card: played.card().clone(),
                from_player: seat,
                to: PlayTarget::Players(request.source.into_iter().collect()),
                response_to: request.cause,
                original_name: played.converted_from(),
                display: played.display(),
                effective: true,
            })
            .await?;
        self.discard_card(seat, played.into_card()).await?;
        Ok(true)
    }

    /// 시전자를 뺀 생존자에게 차례로 무효화를 묻습니다. 처음 낸 한 장만 유효합니다.
    async fn negation_window(
        &mut self,
        caster: Seat,
        trick: CardName,
        target: Option<Seat>,
    ) -> EngineResult<bool> {
        for seat in self.roster.seats_from(caster) {
            let request = ResponseRequest {
                required: CardName::Negate,
                cause: Some(trick),
                source: Some(caster),
                target,
            };
            if self.ask_response(seat, request).await? {
                info!("seat {} negates {}", seat, trick);
                return Ok(true);
            }
        }
        Ok(false)
    }

    async fn resolve_strike(&mut self, attacker: Seat, target: Seat) -> EngineResult<()> {
        let request = ResponseRequest {
            required: CardName::Dodge,
            cause: Some(CardName::Strike),
            source: Some(attacker),
            target: Some(target),
        };
        if !self.ask_response(target, request).await? {
            self.damage(target, 1, Some(attacker), Some(CardName::Strike)).await?;
        }
        Ok(())
    }

    /// 남만입침은 공격, 만전제발은 회피로 막습니다.
    async fn resolve_area(&mut self, caster: Seat, trick: CardName) -> EngineResult<()> {
        if self.negation_window(caster, trick, None).await? {
            return Ok(());
        }
        let required = match trick {
            CardName::Barbarian => CardName::Strike,
            _ => CardName::Dodge,
        };
        for seat in self.roster.seats_from(caster) {
            if self.is_over() {
                break;
            }
            if !self.roster.is_alive(seat) {
                continue;
            }
            let request = ResponseRequest {
                required,
                cause: Some(trick),
                source: Some(caster),
                target: Some(seat),
            };
            if !self.ask_response(seat, request).await? {
                self.damage(seat, 1, Some(caster), Some(trick)).await?;
            }
        }
        Ok(())
    }

    /// 대상부터 번갈아 공격을 냅니다. 먼저 못 낸 쪽이 피해를 받습니다.
    async fn resolve_duel(&mut self, caster: Seat, target: Seat) -> EngineResult<()> {
        if self.negation_window(caster, CardName::Duel, Some(target)).await? {
            return Ok(());
        }
        let mut turn_holder = target;
        loop {
            let opponent = if turn_holder == target { caster } else { target };
            if !self.roster.is_alive(turn_holder) || !self.roster.is_alive(opponent) {
                break;
            }
            let request = ResponseRequest {
                required: CardName::Strike,
                cause: Some(CardName::Duel),
                source: Some(opponent),
                target: Some(turn_holder),
            };
            if self.ask_response(turn_holder, request).await? {
                turn_holder = opponent;
                continue;
            }
            self.damage(turn_holder, 1, Some(opponent), Some(CardName::Duel)).await?;
            break;
        }
        Ok(())
    }

    /// 전환해서 낸 카드였다면 첫 대상의 손패 한 장을 가져올 수 있습니다.
    /// 장수는 요청 시점에 기록하고, 실제 위치는 가져오는 순간의 손패 크기로 다시 맞춥니다.
    async fn try_chongzhen(&mut self, seat: Seat, target: Seat) -> EngineResult<()> {
        let converted = self
            .active_play
            .as_ref()
            .and_then(|played| played.converted_from())
            .is_some();
        if !converted || target == seat {
            return Ok(());
        }
        let unlocked = self
            .roster
            .get_player(seat)
            .map(|p| p.is_alive() && p.skills().is_unlocked(SkillName::Chongzhen))
            .unwrap_or(false);
        if !unlocked || !self.roster.is_alive(target) {
            return Ok(());
        }
        let hand_count = self
            .roster
            .get_player(target)
            .map(|p| p.hand_len())
            .unwrap_or(0);
        if hand_count == 0 {
            return Ok(());
        }

        let view = self.view_for(seat);
        let Some(index) = self.controls[seat]
            .choose_steal_index(&view, target, hand_count)
            .await
        else {
            return Ok(());
        };

        let Some(victim) = self.roster.get_player_mut(target) else {
            return Ok(());
        };
        let now = victim.hand_len();
        if now == 0 {
            debug!("seat {} hand emptied before the steal", target);
            return Ok(());
        }
        let Some(card) = victim.take_hand_at(index.min(now - 1)) else {
            return Ok(());
        };
        info!("seat {} steals a card from seat {} with {}", seat, target, SkillName::Chongzhen);
        if let Some(thief) = self.roster.get_player_mut(seat) {
            thief.add_to_hand(card.clone());
        }
        self.link
            .emit(GameEvent::Steal {
                card,
                from_player: target,
                to_player: seat,
            })
            .await?;
        Ok(())
    }
}
