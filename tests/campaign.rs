mod common;

use common::*;
use sanguosha_core::{
    config::EngineConfig,
    control::{Faction, FactionAi, ScriptedControl},
    enums::{CardName, Character, Role},
    exception::EngineError,
    game::{FactionWinCondition, Game, GameSetup},
    sync::{session_channels, GameEvent, PlayTarget},
};

const LINEUP: [(Character, Faction); 4] = [
    (Character::ZhaoYun, Faction::Adou),
    (Character::ADou, Faction::Adou),
    (Character::CaoJun, Faction::CaoJun),
    (Character::CaoJun, Faction::CaoJun),
];

/// 능동 사용 중 다른 좌석을 겨눈 것들 (from, to)
fn aimed_plays(events: &[GameEvent]) -> Vec<(usize, usize)> {
    events
        .iter()
        .filter_map(|event| match event {
            GameEvent::PlayCard {
                card,
                from_player,
                to: PlayTarget::Players(targets),
                response_to: None,
                ..
            } if card.get_name() != CardName::Peach => Some(
                targets
                    .iter()
                    .filter(|t| *t != from_player)
                    .map(|t| (*from_player, *t))
                    .collect::<Vec<_>>(),
            ),
            _ => None,
        })
        .flatten()
        .collect()
}

#[tokio::test]
async fn test_faction_ai_never_aims_at_allies() {
    for seed in [3, 9, 21] {
        let config = EngineConfig::headless().with_seed(seed);
        let (link, mut presentation) = session_channels(&config.sync);
        let mut setup = GameSetup::new(config).win_condition(Box::new(FactionWinCondition));
        for (seat, (character, faction)) in LINEUP.iter().enumerate() {
            setup = setup.seat(
                format!("{}{}", character, seat),
                *character,
                Role::Traitor,
                Box::new(FactionAi::seeded(*faction, seed + seat as u64)),
            );
        }
        let mut game = Game::new(setup, link).unwrap();

        match game.run().await {
            Ok(outcome) => {
                let winner = outcome.winner.unwrap();
                assert!(winner.ends_with("side wins"), "unexpected winner {}", winner);
                let sides: Vec<Faction> = outcome
                    .survivors
                    .iter()
                    .map(|seat| LINEUP[*seat].1)
                    .collect();
                assert!(sides.windows(2).all(|w| w[0] == w[1]));
            }
            Err(e) => assert!(matches!(e, EngineError::TurnLimitExceeded { .. })),
        }

        let mut events = vec![];
        while let Some(envelope) = presentation.try_recv() {
            events.push(envelope.event);
        }
        for (from, to) in aimed_plays(&events) {
            assert_ne!(
                LINEUP[from].1, LINEUP[to].1,
                "seed {} seat {} aimed at ally {}",
                seed, from, to
            );
        }
        assert_eq!(game.card_total(), game.initial_card_total());
        assert_player_invariants(&game);
    }
}

#[tokio::test]
async fn test_rulerless_game_ends_with_last_standing() {
    let mut t = table(
        scenario_config(),
        vec![
            seat(Character::ZhangFei, Role::Traitor, striker(2, 1)),
            seat(Character::CanBing, Role::Traitor, ScriptedControl::passive()),
        ],
        stacked(&[CardName::Strike, CardName::Strike], 5),
    );
    t.game.deal_specific(0, CardName::Strike).unwrap();
    t.game.deal_specific(0, CardName::Strike).unwrap();

    t.game.run_turn(0).await.unwrap();

    assert!(!t.game.roster().is_alive(1));
    assert!(t.game.is_over());
    assert_eq!(
        t.game.outcome().unwrap().winner.as_deref(),
        Some("seat0 is the last one standing")
    );
}
