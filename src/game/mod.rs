//! 턴 진행과 카드 해석을 담당하는 엔진.
//!
//! `Game` 은 모든 게임 상태를 단독으로 소유합니다. 프레젠테이션 계층은
//! 이벤트에 실린 값만 읽고, `SyncLink` 를 통해 응답만 돌려보냅니다.

pub mod dying;
pub mod resolve;
pub mod roster;
pub mod turn;
pub mod view;

use rand::{rngs::StdRng, Rng, SeedableRng};
use tracing::{error, info, warn};

use crate::{
    card::{catalogue, played::PlayedCard, Card},
    config::EngineConfig,
    control::Control,
    enums::{phase::Phase, CardName, Character, Role, Seat, SkillName},
    exception::{EngineError, EngineResult},
    sync::{GameEvent, SyncLink},
    unit::Player,
    zone::Deck,
    LogExt,
};

pub use roster::{FactionWinCondition, RoleWinCondition, Roster, WinCondition};

/// 좌석 하나의 구성
pub struct SeatSetup {
    pub name: String,
    pub character: Character,
    pub role: Role,
    pub control: Box<dyn Control>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckOrder {
    Shuffled,
    /// 주어진 순서 그대로. 첫 카드가 맨 위.
    Stacked,
}

/// 게임 조립 정보. 좌석 순서가 곧 턴 순서입니다.
pub struct GameSetup {
    pub config: EngineConfig,
    pub seats: Vec<SeatSetup>,
    pub deck: Vec<Card>,
    pub order: DeckOrder,
    pub win_condition: Option<Box<dyn WinCondition>>,
}

impl GameSetup {
    /// 표준 덱을 섞어서 쓰는 구성
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            seats: vec![],
            deck: catalogue::build_cards(&catalogue::standard_deck_list()),
            order: DeckOrder::Shuffled,
            win_condition: None,
        }
    }

    pub fn seat(
        mut self,
        name: impl Into<String>,
        character: Character,
        role: Role,
        control: Box<dyn Control>,
    ) -> Self {
        self.seats.push(SeatSetup {
            name: name.into(),
            character,
            role,
            control,
        });
        self
    }

    pub fn deck(mut self, cards: Vec<Card>) -> Self {
        self.deck = cards;
        self.order = DeckOrder::Shuffled;
        self
    }

    pub fn stacked_deck(mut self, cards: Vec<Card>) -> Self {
        self.deck = cards;
        self.order = DeckOrder::Stacked;
        self
    }

    pub fn win_condition(mut self, win: Box<dyn WinCondition>) -> Self {
        self.win_condition = Some(win);
        self
    }
}

/// 게임 결과. 엔진 에러로 끝났으면 승자가 없습니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameOutcome {
    pub winner: Option<String>,
    pub turns: u32,
    pub survivors: Vec<Seat>,
}

pub struct Game {
    config: EngineConfig,
    deck: Deck,
    roster: Roster,
    controls: Vec<Box<dyn Control>>,
    link: SyncLink,

    current: Seat,
    turn: u32,
    phase: Phase,
    /// 해석 중인 카드. 해석이 끝나면 비워집니다.
    active_play: Option<PlayedCard>,
    dealt: bool,
    total_cards: usize,
    outcome: Option<GameOutcome>,
}

impl Game {
    pub fn new(setup: GameSetup, link: SyncLink) -> EngineResult<Game> {
        let GameSetup {
            config,
            seats,
            deck,
            order,
            win_condition,
        } = setup;

        if seats.len() < 2 {
            return Err(EngineError::setup(format!(
                "at least 2 seats are required, got {}",
                seats.len()
            )));
        }
        if seats.iter().filter(|s| s.role == Role::Ruler).count() > 1 {
            return Err(EngineError::setup("more than one ruler"));
        }

        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let deck_rng = StdRng::seed_from_u64(rng.gen());
        let total_cards = deck.len();
        let deck = match order {
            DeckOrder::Shuffled => Deck::new(deck, deck_rng),
            DeckOrder::Stacked => Deck::stacked(deck, deck_rng),
        };

        let policy = config.skills.unlock_policy;
        let mut players = Vec::with_capacity(seats.len());
        let mut controls = Vec::with_capacity(seats.len());
        for (seat, setup) in seats.into_iter().enumerate() {
            players.push(Player::new(seat, setup.name, setup.character, setup.role, policy));
            controls.push(setup.control);
        }
        let roster = match win_condition {
            Some(win) => Roster::with_win_condition(players, win),
            None => Roster::new(players),
        };

        // 군주가 먼저 시작합니다.
        let current = roster
            .players()
            .iter()
            .position(|p| p.get_role() == Role::Ruler)
            .unwrap_or(0);

        info!(
            "game assembled: {} seats, {} cards, first seat {}",
            roster.len(),
            total_cards,
            current
        );

        Ok(Game {
            config,
            deck,
            roster,
            controls,
            link,
            current,
            turn: 0,
            phase: Phase::Prepare,
            active_play: None,
            dealt: false,
            total_cards,
            outcome: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn current(&self) -> Seat {
        self.current
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn active_play(&self) -> Option<&PlayedCard> {
        self.active_play.as_ref()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// 처음 조립된 카드 수
    pub fn initial_card_total(&self) -> usize {
        self.total_cards
    }

    /// 지금 어딘가에 있는 카드 수. 해석 중인 카드도 셉니다.
    pub fn card_total(&self) -> usize {
        self.deck.draw_len()
            + self.deck.discard_len()
            + self
                .roster
                .players()
                .iter()
                .map(Player::card_count)
                .sum::<usize>()
            + usize::from(self.active_play.is_some())
    }

    /// 뽑을 더미에서 해당 카드를 꺼냅니다. 시나리오 구성용.
    fn take_for_setup(&mut self, seat: Seat, name: CardName) -> EngineResult<Card> {
        if self.roster.get_player(seat).is_none() {
            return Err(EngineError::setup(format!("no seat {}", seat)));
        }
        self.deck
            .take_named(name)
            .ok_or_else(|| EngineError::setup(format!("no {} left in the draw pile", name)))
    }

    /// 뽑을 더미에서 해당 카드를 찾아 손패에 넣습니다.
    pub fn deal_specific(&mut self, seat: Seat, name: CardName) -> EngineResult<Card> {
        let card = self.take_for_setup(seat, name)?;
        if let Some(player) = self.roster.get_player_mut(seat) {
            player.add_to_hand(card.clone());
        }
        Ok(card)
    }

    /// 뽑을 더미에서 장비를 찾아 바로 장착합니다.
    pub fn equip_specific(&mut self, seat: Seat, name: CardName) -> EngineResult<()> {
        if name.equip_slot().is_none() {
            return Err(EngineError::setup(format!("{} is not equipment", name)));
        }
        let card = self.take_for_setup(seat, name)?;
        let Some(player) = self.roster.get_player_mut(seat) else {
            return Ok(());
        };
        match player.equip(card) {
            Ok(Some(old)) | Err(old) => self.deck.discard(old),
            Ok(None) => {}
        }
        Ok(())
    }

    /// 진행형 스킬 해금. 이미 열려 있거나 해당 캐릭터에 없는 스킬이면 false.
    pub fn unlock_skill(&mut self, seat: Seat, skill: SkillName) -> bool {
        let Some(player) = self.roster.get_player_mut(seat) else {
            return false;
        };
        let unlocked = player.skills_mut().unlock(skill);
        if unlocked {
            info!("seat {} unlocked {}", seat, skill);
        }
        unlocked
    }

    /// 게임을 끝까지 진행합니다.
    /// 엔진 일관성 에러가 나면 승자 없이 종료 이벤트를 보내고 에러를 돌려줍니다.
    pub async fn run(&mut self) -> EngineResult<GameOutcome> {
        let result = self.run_loop().await.log_err(|e| error!("engine aborted: {}", e));
        match result {
            Ok(()) => Ok(self.outcome.clone().unwrap_or_else(|| self.snapshot_outcome(None))),
            Err(e) => {
                if self.outcome.is_none() {
                    if let Err(sync) = self.link.emit(GameEvent::GameOver { winner: None }).await {
                        warn!("could not announce aborted game: {}", sync);
                    }
                    self.outcome = Some(self.snapshot_outcome(None));
                }
                Err(e)
            }
        }
    }

    async fn run_loop(&mut self) -> EngineResult<()> {
        if !self.dealt {
            self.deal_initial_hands().await?;
        }
        if self.check_game_over().await? {
            return Ok(());
        }

        loop {
            self.drain_control().await?;
            if self.is_over() {
                return Ok(());
            }

            let seat = self.current;
            if self.roster.is_alive(seat) {
                if self.turn >= self.config.rules.max_turns {
                    return Err(EngineError::TurnLimitExceeded {
                        limit: self.config.rules.max_turns,
                    });
                }
                self.turn += 1;
                self.run_turn(seat).await?;
            }
            if self.check_game_over().await? {
                return Ok(());
            }

            self.drain_control().await?;
            if self.is_over() {
                return Ok(());
            }
            self.current = self.next_seat(seat)?;
        }
    }

    fn next_seat(&self, seat: Seat) -> EngineResult<Seat> {
        let next = self
            .roster
            .next_alive_player(seat)
            .ok_or(EngineError::NoAlivePlayer)?;
        let alive = self.roster.alive_count();
        if next == seat && alive > 1 {
            return Err(EngineError::NextPlayerLoop { seat, alive });
        }
        Ok(next)
    }

    pub async fn deal_initial_hands(&mut self) -> EngineResult<()> {
        self.dealt = true;
        let count = self.config.rules.initial_hand_size;
        if count == 0 {
            return Ok(());
        }
        let n = self.roster.len();
        for step in 0..n {
            let seat = (self.current + step) % n;
            if self.roster.is_alive(seat) {
                self.draw_cards(seat, count).await?;
            }
        }
        Ok(())
    }

    /// 종료 조건이 성립했으면 종료 이벤트를 보냅니다. 여러 번 불러도 한 번만 보냅니다.
    pub(crate) async fn check_game_over(&mut self) -> EngineResult<bool> {
        if self.is_over() {
            return Ok(true);
        }
        if !self.roster.is_game_over() {
            return Ok(false);
        }
        let winner = self.roster.winner_description();
        info!("game over after {} turns: {:?}", self.turn, winner);
        self.outcome = Some(self.snapshot_outcome(winner.clone()));
        self.link.emit(GameEvent::GameOver { winner }).await?;
        Ok(true)
    }

    fn snapshot_outcome(&self, winner: Option<String>) -> GameOutcome {
        GameOutcome {
            winner,
            turns: self.turn,
            survivors: self
                .roster
                .players()
                .iter()
                .filter(|p| p.is_alive())
                .map(Player::get_seat)
                .collect(),
        }
    }

    /// 대역 외 제어 메시지 처리
    async fn drain_control(&mut self) -> EngineResult<()> {
        for command in self.link.drain_control().await {
            if self.is_over() {
                break;
            }
            self.apply_debug(command).await?;
        }
        Ok(())
    }
}
