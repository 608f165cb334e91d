use crate::{
    control::Faction,
    enums::{CardName, Role, Seat},
    unit::Player,
};

/// 생존자 구성으로 게임 종료와 승자를 판정합니다.
pub trait WinCondition: Send + Sync {
    fn is_game_over(&self, players: &[Player]) -> bool;
    fn winner_description(&self, players: &[Player]) -> Option<String>;
}

/// 신분전 기본 규칙.
/// 군주가 없는 판은 한 명만 남을 때까지 진행합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoleWinCondition;

fn alive(players: &[Player]) -> impl Iterator<Item = &Player> {
    players.iter().filter(|p| p.is_alive())
}

impl WinCondition for RoleWinCondition {
    fn is_game_over(&self, players: &[Player]) -> bool {
        match players.iter().find(|p| p.get_role() == Role::Ruler) {
            Some(ruler) if !ruler.is_alive() => true,
            Some(_) => !alive(players).any(|p| matches!(p.get_role(), Role::Rebel | Role::Traitor)),
            None => alive(players).count() <= 1,
        }
    }

    fn winner_description(&self, players: &[Player]) -> Option<String> {
        if !self.is_game_over(players) {
            return None;
        }
        match players.iter().find(|p| p.get_role() == Role::Ruler) {
            Some(ruler) if !ruler.is_alive() => {
                let survivors: Vec<&Player> = alive(players).collect();
                match survivors.as_slice() {
                    [last] if last.get_role() == Role::Traitor => {
                        Some(format!("Traitor {} wins", last.get_name()))
                    }
                    _ => Some("Rebels win".to_string()),
                }
            }
            Some(_) => Some("Ruler and Loyalists win".to_string()),
            None => alive(players)
                .next()
                .map(|last| format!("{} is the last one standing", last.get_name())),
        }
    }
}

/// 캠페인 규칙. 살아남은 모두가 한 진영이면 종료합니다.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactionWinCondition;

impl WinCondition for FactionWinCondition {
    fn is_game_over(&self, players: &[Player]) -> bool {
        let mut factions = alive(players).map(|p| Faction::of(p.get_character()));
        match factions.next() {
            None => true,
            Some(first) => factions.all(|f| f == first),
        }
    }

    fn winner_description(&self, players: &[Player]) -> Option<String> {
        if !self.is_game_over(players) {
            return None;
        }
        alive(players)
            .next()
            .map(|p| match Faction::of(p.get_character()) {
                Some(faction) => format!("{:?} side wins", faction),
                None => format!("{} wins", p.get_name()),
            })
    }
}

/// 좌석 순서로 고정된 플레이어 목록.
/// 사망자도 기록을 위해 남아 있지만 턴 순서와 거리 계산에서는 빠집니다.
pub struct Roster {
    players: Vec<Player>,
    win: Box<dyn WinCondition>,
}

impl Roster {
    pub fn new(players: Vec<Player>) -> Self {
        Self::with_win_condition(players, Box::new(RoleWinCondition))
    }

    pub fn with_win_condition(players: Vec<Player>, win: Box<dyn WinCondition>) -> Self {
        Self { players, win }
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn get_player(&self, seat: Seat) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn get_player_mut(&mut self, seat: Seat) -> Option<&mut Player> {
        self.players.get_mut(seat)
    }

    pub fn is_alive(&self, seat: Seat) -> bool {
        self.get_player(seat).map(Player::is_alive).unwrap_or(false)
    }

    pub fn alive_count(&self) -> usize {
        alive(&self.players).count()
    }

    /// 시계 방향으로 다음 생존자. 자신만 살아 있으면 자신을 돌려줍니다.
    pub fn next_alive_player(&self, current: Seat) -> Option<Seat> {
        let n = self.players.len();
        (1..=n)
            .map(|step| (current + step) % n)
            .find(|seat| self.players[*seat].is_alive())
    }

    /// seat 다음부터 한 바퀴, seat 자신은 제외한 생존자
    pub fn seats_from(&self, seat: Seat) -> Vec<Seat> {
        let n = self.players.len();
        (1..n)
            .map(|step| (seat + step) % n)
            .filter(|s| self.players[*s].is_alive())
            .collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.win.is_game_over(&self.players)
    }

    pub fn winner_description(&self) -> Option<String> {
        self.win.winner_description(&self.players)
    }

    /// 생존자만 센 원형 거리. 말 장비를 반영하고 최소 1.
    pub fn distance(&self, from: Seat, to: Seat) -> Option<usize> {
        if from == to || !self.is_alive(from) || !self.is_alive(to) {
            return None;
        }
        let ring: Vec<Seat> = alive(&self.players).map(Player::get_seat).collect();
        let a = ring.iter().position(|s| *s == from)?;
        let b = ring.iter().position(|s| *s == to)?;
        let gap = a.abs_diff(b);
        let mut distance = gap.min(ring.len() - gap);

        if self.players[to].equipment().has(CardName::PlusHorse) {
            distance += 1;
        }
        if self.players[from].equipment().has(CardName::MinusHorse) {
            distance = distance.saturating_sub(1);
        }
        Some(distance.max(1))
    }

    pub fn attack_range(&self, seat: Seat) -> usize {
        self.get_player(seat)
            .map(|p| p.equipment().attack_range())
            .unwrap_or(0)
    }

    pub fn can_attack(&self, from: Seat, to: Seat) -> bool {
        self.distance(from, to)
            .map(|d| d <= self.attack_range(from))
            .unwrap_or(false)
    }
}
