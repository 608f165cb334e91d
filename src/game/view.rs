use crate::{
    control::{GameView, PlayerView, TargetsByShape},
    enums::{Role, Seat},
};

use super::Game;

impl Game {
    /// seat 에게 보이는 스냅샷. 숨겨진 신분과 남의 손패는 빠집니다.
    pub fn view_for(&self, seat: Seat) -> GameView {
        let me = self.roster.get_player(seat);
        let players = self
            .roster
            .players()
            .iter()
            .map(|p| {
                let revealed =
                    p.get_seat() == seat || p.get_role() == Role::Ruler || !p.is_alive();
                PlayerView {
                    seat: p.get_seat(),
                    name: p.get_name().to_string(),
                    character: p.get_character(),
                    role: revealed.then(|| p.get_role()),
                    hp: p.get_hp(),
                    max_hp: p.get_max_hp(),
                    alive: p.is_alive(),
                    hand_count: p.hand_len(),
                    equipment: p.equipment().iter().map(|card| card.get_name()).collect(),
                }
            })
            .collect();

        GameView {
            me: seat,
            current: self.current,
            phase: self.phase,
            turn: self.turn,
            my_role: me.map(|p| p.get_role()).unwrap_or_default(),
            hand: me.map(|p| p.hand().to_vec()).unwrap_or_default(),
            strike_used: me.map(|p| p.strike_used()).unwrap_or(false),
            players,
        }
    }

    /// 카드 형태별로 seat 가 고를 수 있는 대상
    pub fn targets_for(&self, seat: Seat) -> TargetsByShape {
        let others = self.roster.seats_from(seat);
        TargetsByShape {
            me: seat,
            attackable: others
                .iter()
                .copied()
                .filter(|to| self.roster.can_attack(seat, *to))
                .collect(),
            within_one: others
                .iter()
                .copied()
                .filter(|to| self.roster.distance(seat, *to) == Some(1))
                .collect(),
            all_others: others,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        config::EngineConfig,
        control::ScriptedControl,
        enums::{Character, Role},
        game::{Game, GameSetup},
        sync::session_channels,
    };

    fn game() -> Game {
        let config = EngineConfig::headless().with_seed(9);
        let (link, _presentation) = session_channels(&config.sync);
        let setup = GameSetup::new(config)
            .seat("a", Character::Generic, Role::Rebel, Box::new(ScriptedControl::passive()))
            .seat("b", Character::Generic, Role::Ruler, Box::new(ScriptedControl::passive()))
            .seat("c", Character::Generic, Role::Loyalist, Box::new(ScriptedControl::passive()))
            .seat("d", Character::Generic, Role::Traitor, Box::new(ScriptedControl::passive()));
        Game::new(setup, link).unwrap()
    }

    #[test]
    fn test_view_hides_roles_and_hands() {
        let game = game();
        let view = game.view_for(0);
        assert_eq!(view.my_role, Role::Rebel);
        assert_eq!(view.player(0).unwrap().role, Some(Role::Rebel));
        assert_eq!(view.player(1).unwrap().role, Some(Role::Ruler));
        assert_eq!(view.player(2).unwrap().role, None);
        assert_eq!(view.player(3).unwrap().role, None);
        assert_eq!(view.current, 1);
    }

    #[test]
    fn test_targets_by_distance() {
        let game = game();
        let targets = game.targets_for(0);
        assert_eq!(targets.all_others, vec![1, 2, 3]);
        assert_eq!(targets.attackable, vec![1, 3]);
        assert_eq!(targets.within_one, vec![1, 3]);
    }
}
