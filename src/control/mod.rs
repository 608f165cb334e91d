//! 의사결정 추상화.
//!
//! 엔진은 선택이 필요할 때마다 좌석의 `Control` 에게 묻습니다.
//! 구현체는 합법적인 선택지가 없으면 에러 대신 "선택 없음" 을 돌려주고,
//! 엔진은 이를 모두 거절로 처리합니다.

pub mod faction_ai;
pub mod human;
pub mod rule_ai;
pub mod scripted;

use std::collections::HashMap;

use async_trait::async_trait;
use rand::{seq::SliceRandom, Rng};

use crate::{
    card::{played::PlayOption, Card, CardId},
    enums::{phase::Phase, CardName, Character, ControlKind, Role, Seat, SkillName, TargetShape},
};

pub use faction_ai::{Faction, FactionAi};
pub use human::HumanControl;
pub use rule_ai::RuleAi;
pub use scripted::ScriptedControl;

/// 다른 플레이어에게 공개된 정보
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerView {
    pub seat: Seat,
    pub name: String,
    pub character: Character,
    /// 군주, 본인, 사망자만 공개
    pub role: Option<Role>,
    pub hp: u32,
    pub max_hp: u32,
    pub alive: bool,
    pub hand_count: usize,
    pub equipment: Vec<CardName>,
}

/// Control 에게 넘기는 읽기 전용 스냅샷.
/// 본인 손패만 전부 보이고, 다른 플레이어는 장수만 보입니다.
#[derive(Debug, Clone, PartialEq)]
pub struct GameView {
    pub me: Seat,
    pub current: Seat,
    pub phase: Phase,
    pub turn: u32,
    pub my_role: Role,
    pub hand: Vec<Card>,
    pub strike_used: bool,
    pub players: Vec<PlayerView>,
}

impl GameView {
    pub fn player(&self, seat: Seat) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.seat == seat)
    }

    pub fn my_hp(&self) -> u32 {
        self.player(self.me).map(|p| p.hp).unwrap_or(0)
    }

    pub fn my_max_hp(&self) -> u32 {
        self.player(self.me).map(|p| p.max_hp).unwrap_or(0)
    }

    pub fn is_wounded(&self) -> bool {
        self.my_hp() < self.my_max_hp()
    }

    pub fn alive_seats(&self) -> impl Iterator<Item = &PlayerView> {
        self.players.iter().filter(|p| p.alive)
    }

    /// 살아 있는 해당 캐릭터의 첫 좌석
    pub fn find_character(&self, character: Character) -> Option<Seat> {
        self.alive_seats()
            .find(|p| p.character == character)
            .map(|p| p.seat)
    }

    pub fn hp_of(&self, seat: Seat) -> Option<u32> {
        self.player(seat).map(|p| p.hp)
    }
}

/// 카드 형태별 가능한 대상
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetsByShape {
    pub me: Seat,
    pub attackable: Vec<Seat>,
    pub within_one: Vec<Seat>,
    pub all_others: Vec<Seat>,
}

impl TargetsByShape {
    pub fn for_shape(&self, shape: TargetShape) -> Vec<Seat> {
        match shape {
            TargetShape::SelfOnly => vec![self.me],
            TargetShape::Attackable => self.attackable.clone(),
            TargetShape::WithinOne => self.within_one.clone(),
            TargetShape::All => self.all_others.clone(),
        }
    }

    pub fn for_card(&self, name: CardName) -> Vec<Seat> {
        self.for_shape(name.target_shape())
    }
}

/// 능동 사용 선택. targets 가 비어 있으면 엔진이 `choose_targets` 로 다시 묻습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayChoice {
    pub card: CardId,
    pub play_as: CardName,
    pub targets: Vec<Seat>,
}

impl PlayChoice {
    pub fn new(option: &PlayOption, targets: Vec<Seat>) -> Self {
        Self {
            card: option.card_id(),
            play_as: option.play_as,
            targets,
        }
    }
}

/// 응답 요청의 맥락
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseRequest {
    pub required: CardName,
    /// 응답하게 만든 카드. 빈사 구원처럼 카드가 없으면 None.
    pub cause: Option<CardName>,
    pub source: Option<Seat>,
    /// 위협받는 플레이어. 광역 트릭 무효화처럼 특정되지 않으면 None.
    pub target: Option<Seat>,
}

#[async_trait]
pub trait Control: Send {
    fn kind(&self) -> ControlKind;

    async fn choose_card_to_play(
        &mut self,
        view: &GameView,
        options: &[PlayOption],
        targets: &TargetsByShape,
    ) -> Option<PlayChoice>;

    async fn choose_targets(
        &mut self,
        view: &GameView,
        candidates: &[Seat],
        option: &PlayOption,
    ) -> Vec<Seat>;

    async fn choose_response_card(
        &mut self,
        view: &GameView,
        request: &ResponseRequest,
        candidates: &[PlayOption],
    ) -> Option<CardId>;

    async fn choose_discards(&mut self, view: &GameView, hand: &[Card], count: usize) -> Vec<CardId>;

    async fn choose_skill_activation(&mut self, view: &GameView, skill: SkillName) -> bool;

    /// 대상 손패에서 가져갈 위치. 요청 시점의 장수를 기준으로 합니다.
    async fn choose_steal_index(
        &mut self,
        view: &GameView,
        from: Seat,
        hand_count: usize,
    ) -> Option<usize>;
}

/// 체력이 가장 낮은 좌석. 동률이면 균등 무작위.
pub fn select_weakest<R: Rng + ?Sized>(view: &GameView, seats: &[Seat], rng: &mut R) -> Option<Seat> {
    let min_hp = seats.iter().filter_map(|s| view.hp_of(*s)).min()?;
    let weakest: Vec<Seat> = seats
        .iter()
        .copied()
        .filter(|s| view.hp_of(*s) == Some(min_hp))
        .collect();
    weakest.choose(rng).copied()
}

/// 버릴 때 덜 아까운 순서 (낮을수록 먼저 버림)
pub fn keep_value(name: CardName) -> u8 {
    match name {
        CardName::Peach => 9,
        CardName::Negate => 7,
        CardName::Dodge => 6,
        CardName::Strike => 5,
        CardName::Duel | CardName::Barbarian | CardName::Arrows => 4,
        _ => 2,
    }
}

/// 가치가 낮은 카드부터 count 장
pub fn cheapest_cards(hand: &[Card], count: usize) -> Vec<CardId> {
    let mut ranked: Vec<&Card> = hand.iter().collect();
    ranked.sort_by_key(|card| keep_value(card.get_name()));
    ranked.into_iter().take(count).map(|card| card.get_id()).collect()
}

/// 이름별로 가장 먼저 나오는 선택지
pub fn first_option_by_name(options: &[PlayOption]) -> HashMap<CardName, &PlayOption> {
    let mut by_name = HashMap::new();
    for option in options {
        by_name.entry(option.play_as).or_insert(option);
    }
    by_name
}
