use tracing::{info, warn};

use crate::{
    control::ResponseRequest,
    enums::{CardName, Lifecycle, Role, Seat, REBEL_KILL_REWARD},
    exception::EngineResult,
    skill::SkillTable,
    sync::{DebugCommand, GameEvent},
};

use super::Game;

impl Game {
    /// 피해를 주고 출처를 기록합니다.
    /// 체력이 0 이 되어도 바로 죽지 않고, 구원 창을 거쳐 아무도 구하지 않았을 때만 사망합니다.
    pub(crate) async fn damage(
        &mut self,
        target: Seat,
        amount: u32,
        source: Option<Seat>,
        kind: Option<CardName>,
    ) -> EngineResult<()> {
        let Some(player) = self.roster.get_player_mut(target) else {
            return Ok(());
        };
        if !player.is_alive() {
            return Ok(());
        }
        let delta = player.take_damage(amount, source);
        if delta.changed() {
            info!("seat {} takes {} damage from {:?}: {} -> {}", target, amount, source, delta.old, delta.new);
            self.link
                .emit(GameEvent::HpChange {
                    player: target,
                    new_hp: delta.new,
                    source,
                    damage_kind: kind,
                })
                .await?;
        }
        self.run_hp_hook(target, Lifecycle::TakingDamage, delta.old).await?;

        if delta.entered_zero() && self.config.rules.resolve_dying {
            self.rescue(target).await?;
            let still_down = self
                .roster
                .get_player(target)
                .map(|p| p.is_alive() && p.get_hp() == 0)
                .unwrap_or(false);
            if still_down {
                let killer = self
                    .roster
                    .get_player(target)
                    .and_then(|p| p.get_last_damage_source());
                self.die(target, killer).await?;
            }
        }
        Ok(())
    }

    pub(crate) async fn heal(&mut self, seat: Seat, amount: u32) -> EngineResult<()> {
        let Some(player) = self.roster.get_player_mut(seat) else {
            return Ok(());
        };
        if !player.is_alive() {
            return Ok(());
        }
        let delta = player.heal(amount);
        if delta.changed() {
            info!("seat {} heals: {} -> {}", seat, delta.old, delta.new);
            self.link
                .emit(GameEvent::HpChange {
                    player: seat,
                    new_hp: delta.new,
                    source: None,
                    damage_kind: None,
                })
                .await?;
        }
        self.run_hp_hook(seat, Lifecycle::Healing, delta.old).await
    }

    /// 체력 변화 스킬. 추가로 뽑을 장수를 돌려받아 바로 뽑습니다.
    async fn run_hp_hook(&mut self, seat: Seat, lifecycle: Lifecycle, old_hp: u32) -> EngineResult<()> {
        let Some(player) = self.roster.get_player(seat) else {
            return Ok(());
        };
        let Some(hook) = SkillTable::global().resolve(player, lifecycle).copied() else {
            return Ok(());
        };
        let draws = (hook.hp_change())(player, old_hp);
        if draws == 0 || !self.confirm_skill(seat, &hook).await {
            return Ok(());
        }
        info!("seat {} triggers {} and draws {}", seat, hook.skill, draws);
        self.draw_cards(seat, draws).await
    }

    /// 빈사 플레이어 본인부터 턴 순서대로 복숭아를 묻습니다.
    async fn rescue(&mut self, dying: Seat) -> EngineResult<()> {
        let mut rescuers = vec![dying];
        rescuers.extend(self.roster.seats_from(dying));
        info!("seat {} is dying", dying);

        for rescuer in rescuers {
            loop {
                let down = self
                    .roster
                    .get_player(dying)
                    .map(|p| p.is_alive() && p.get_hp() == 0)
                    .unwrap_or(false);
                if !down {
                    return Ok(());
                }
                let request = ResponseRequest {
                    required: CardName::Peach,
                    cause: None,
                    source: Some(dying),
                    target: Some(dying),
                };
                if !self.ask_response(rescuer, request).await? {
                    break;
                }
                info!("seat {} rescues seat {}", rescuer, dying);
                self.heal(dying, 1).await?;
            }
        }
        Ok(())
    }

    /// 사망 처리. 카드는 모두 버린 더미로 가고, 승패가 갈리지 않았으면 보상과 벌칙을 적용합니다.
    pub(crate) async fn die(&mut self, seat: Seat, killer: Option<Seat>) -> EngineResult<()> {
        let Some(player) = self.roster.get_player_mut(seat) else {
            return Ok(());
        };
        if !player.is_alive() {
            return Ok(());
        }
        player.mark_dead();
        let role = player.get_role();
        let mut cards = player.take_hand();
        cards.extend(player.take_equipment().into_iter().map(|(_, card)| card));
        info!("seat {} ({}) dies, killed by {:?}", seat, role, killer);

        self.link.emit(GameEvent::Death { player: seat }).await?;
        for card in cards {
            self.discard_card(seat, card).await?;
        }

        if self.roster.is_game_over() {
            self.check_game_over().await?;
            return Ok(());
        }

        let Some(killer) = killer.filter(|k| *k != seat && self.roster.is_alive(*k)) else {
            return Ok(());
        };
        let killer_role = self.roster.get_player(killer).map(|p| p.get_role());
        if killer_role == Some(Role::Ruler) && role == Role::Loyalist {
            self.forfeit_all(killer).await?;
        }
        if role == Role::Rebel {
            info!("seat {} draws {} for killing a rebel", killer, REBEL_KILL_REWARD);
            self.draw_cards(killer, REBEL_KILL_REWARD).await?;
        }
        Ok(())
    }

    /// 충신을 죽인 군주는 손패와 장비를 모두 버립니다.
    async fn forfeit_all(&mut self, seat: Seat) -> EngineResult<()> {
        let Some(player) = self.roster.get_player_mut(seat) else {
            return Ok(());
        };
        let mut cards = player.take_hand();
        cards.extend(player.take_equipment().into_iter().map(|(_, card)| card));
        warn!("ruler seat {} killed a loyalist and forfeits {} cards", seat, cards.len());
        for card in cards {
            self.discard_card(seat, card).await?;
        }
        Ok(())
    }

    /// 디버그 명령. win 은 반역자와 내간을, lose 는 군주와 충신을 제거합니다.
    pub(crate) async fn apply_debug(&mut self, command: DebugCommand) -> EngineResult<()> {
        info!("applying debug command: {}", command);
        let doomed: Vec<Seat> = self
            .roster
            .players()
            .iter()
            .filter(|p| p.is_alive())
            .filter(|p| match command {
                DebugCommand::Win => matches!(p.get_role(), Role::Rebel | Role::Traitor),
                DebugCommand::Lose => p.get_role().is_ruler_side(),
            })
            .map(|p| p.get_seat())
            .collect();
        for seat in doomed {
            if self.is_over() {
                break;
            }
            self.die(seat, None).await?;
            self.check_game_over().await?;
        }
        Ok(())
    }
}
