#![allow(dead_code)]

use sanguosha_core::{
    card::Card,
    config::EngineConfig,
    control::{Control, ScriptedControl},
    enums::{CardName, Character, Role, Suit},
    game::{Game, GameSetup},
    sync::{session_channels, GameEvent, PresentationLink},
};

pub struct Table {
    pub game: Game,
    pub presentation: PresentationLink,
}

impl Table {
    /// 지금까지 쌓인 이벤트를 모두 꺼냅니다.
    pub fn events(&mut self) -> Vec<GameEvent> {
        let mut events = vec![];
        while let Some(envelope) = self.presentation.try_recv() {
            events.push(envelope.event);
        }
        events
    }
}

/// Ack 없이 돌고, 시작 손패와 뽑기가 없는 시나리오용 설정
pub fn scenario_config() -> EngineConfig {
    let mut config = EngineConfig::headless().with_seed(7);
    config.rules.initial_hand_size = 0;
    config.rules.draw_count = 0;
    config
}

pub fn card(name: CardName, suit: Suit) -> Card {
    Card::new(name, suit, 7)
}

/// 아무도 쓰지 않는 채움 카드
pub fn filler(count: usize) -> Vec<Card> {
    (0..count).map(|_| card(CardName::Dodge, Suit::Hearts)).collect()
}

/// 이름 목록 뒤에 채움 카드를 붙인 덱. 순서 그대로 쌓입니다.
pub fn stacked(names: &[CardName], extra: usize) -> Vec<Card> {
    let mut cards: Vec<Card> = names.iter().map(|name| card(*name, Suit::Hearts)).collect();
    cards.extend(filler(extra));
    cards
}

pub type SeatSpec = (Character, Role, Box<dyn Control>);

pub fn seat(character: Character, role: Role, control: impl Control + 'static) -> SeatSpec {
    (character, role, Box::new(control))
}

/// target 에게 공격을 n 번 내는 대본
pub fn striker(times: usize, target: usize) -> ScriptedControl {
    (0..times).fold(ScriptedControl::passive(), |control, _| {
        control.play(CardName::Strike, vec![target])
    })
}

pub fn table(
    config: EngineConfig,
    seats: Vec<SeatSpec>,
    deck: Vec<Card>,
) -> Table {
    let (link, presentation) = session_channels(&config.sync);
    let mut setup = GameSetup::new(config).stacked_deck(deck);
    for (seat, (character, role, control)) in seats.into_iter().enumerate() {
        setup = setup.seat(format!("seat{}", seat), character, role, control);
    }
    let game = Game::new(setup, link).expect("valid setup");
    Table { game, presentation }
}

pub fn hp(game: &Game, seat: usize) -> u32 {
    game.roster().get_player(seat).expect("seat").get_hp()
}

/// 능동으로 낸 카드 수 (응답 제외)
pub fn plays_by(events: &[GameEvent], seat: usize, name: CardName) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(event, GameEvent::PlayCard { card, from_player, response_to: None, .. }
                if *from_player == seat && card.get_name() == name)
        })
        .count()
}

pub fn draws_to(events: &[GameEvent], seat: usize) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, GameEvent::DrawCard { to_player, .. } if *to_player == seat))
        .count()
}

pub fn hp_changes(events: &[GameEvent]) -> Vec<(usize, u32)> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::HpChange { player, new_hp, .. } => Some((*player, *new_hp)),
            _ => None,
        })
        .collect()
}

/// 모든 플레이어의 체력이 범위 안에 있고, 죽은 플레이어는 카드가 없어야 합니다.
pub fn assert_player_invariants(game: &Game) {
    for player in game.roster().players() {
        assert!(player.get_hp() <= player.get_max_hp(), "{} hp out of range", player.get_name());
        if !player.is_alive() {
            assert_eq!(player.card_count(), 0, "dead {} still holds cards", player.get_name());
        }
    }
}
