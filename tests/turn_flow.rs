mod common;

use common::*;
use sanguosha_core::{
    config::EngineConfig,
    control::{HumanControl, RuleAi, ScriptedControl},
    enums::{phase::Phase, CardName, Character, Role},
    exception::EngineError,
    game::{Game, GameSetup},
    sync::{session_channels, FrontendEvent, GameEvent, PresentationLink},
};

fn strike_table(attacker: Character, strikes: usize) -> Table {
    let mut t = table(
        scenario_config(),
        vec![
            seat(attacker, Role::Rebel, striker(strikes, 1)),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
            seat(Character::Generic, Role::Loyalist, ScriptedControl::passive()),
        ],
        stacked(
            &[CardName::Strike, CardName::Strike, CardName::Strike, CardName::Strike, CardName::Crossbow],
            10,
        ),
    );
    for _ in 0..strikes {
        t.game.deal_specific(0, CardName::Strike).unwrap();
    }
    t
}

#[tokio::test]
async fn test_one_strike_per_turn_by_default() {
    let mut t = strike_table(Character::Generic, 4);

    t.game.run_turn(0).await.unwrap();

    let events = t.events();
    assert_eq!(plays_by(&events, 0, CardName::Strike), 1);
    assert_eq!(hp(&t.game, 1), 4);
    assert_eq!(t.game.roster().get_player(0).unwrap().hand_len(), 3);
}

#[tokio::test]
async fn test_crossbow_lifts_strike_limit() {
    let mut t = strike_table(Character::Generic, 4);
    t.game.equip_specific(0, CardName::Crossbow).unwrap();

    t.game.run_turn(0).await.unwrap();

    assert_eq!(plays_by(&t.events(), 0, CardName::Strike), 4);
    assert_eq!(hp(&t.game, 1), 1);
}

#[tokio::test]
async fn test_paoxiao_lifts_strike_limit() {
    let mut t = strike_table(Character::ZhangFei, 4);

    t.game.run_turn(0).await.unwrap();

    assert_eq!(plays_by(&t.events(), 0, CardName::Strike), 4);
    assert_eq!(hp(&t.game, 1), 1);
}

#[tokio::test]
async fn test_only_first_of_five_strikes_stays_playable() {
    for (attacker, open_after) in [(Character::Generic, 0), (Character::ZhangFei, 4)] {
        let mut t = table(
            scenario_config(),
            vec![
                seat(attacker, Role::Rebel, striker(1, 1)),
                seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
            ],
            stacked(&[CardName::Strike; 5], 10),
        );
        for _ in 0..5 {
            t.game.deal_specific(0, CardName::Strike).unwrap();
        }
        assert_eq!(t.game.playable_options(0).len(), 5);

        t.game.run_turn(0).await.unwrap();

        // 턴이 끝난 뒤에도 사용 기록은 다음 준비 단계까지 남습니다.
        assert_eq!(t.game.playable_options(0).len(), open_after);
    }
}

#[tokio::test]
async fn test_turn_ceiling_ends_without_winner() {
    let mut config = scenario_config();
    config.rules.max_turns = 3;
    let mut t = table(
        config,
        vec![
            seat(Character::Generic, Role::Rebel, ScriptedControl::passive()),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
            seat(Character::Generic, Role::Loyalist, ScriptedControl::passive()),
        ],
        filler(5),
    );

    let result = t.game.run().await;

    assert!(matches!(result, Err(EngineError::TurnLimitExceeded { limit: 3 })));
    assert_eq!(t.game.turn(), 3);
    assert_eq!(t.game.outcome().unwrap().winner, None);
    assert_eq!(t.events().last(), Some(&GameEvent::GameOver { winner: None }));
}

#[tokio::test]
async fn test_play_ceiling_aborts_game() {
    let mut config = scenario_config();
    config.rules.max_plays_per_turn = 1;
    let mut t = table(
        config,
        vec![
            seat(Character::ZhangFei, Role::Rebel, striker(2, 1)),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
        ],
        stacked(&[CardName::Strike, CardName::Strike], 5),
    );
    t.game.deal_specific(0, CardName::Strike).unwrap();
    t.game.deal_specific(0, CardName::Strike).unwrap();

    let result = t.game.run().await;

    assert!(matches!(
        result,
        Err(EngineError::PlayLimitExceeded { seat: 0, limit: 1 })
    ));
    assert!(result.unwrap_err().is_consistency_violation());
    assert_eq!(hp(&t.game, 1), 4);
    assert_eq!(t.events().last(), Some(&GameEvent::GameOver { winner: None }));
}

#[tokio::test]
async fn test_discard_down_to_hp() {
    let mut t = table(
        scenario_config(),
        vec![
            seat(Character::Generic, Role::Rebel, ScriptedControl::passive()),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
        ],
        filler(10),
    );
    for _ in 0..6 {
        t.game.deal_specific(0, CardName::Dodge).unwrap();
    }

    t.game.run_turn(0).await.unwrap();

    assert_eq!(t.game.roster().get_player(0).unwrap().hand_len(), 4);
    assert_eq!(t.game.deck().discard_len(), 2);
    let discards = t
        .events()
        .iter()
        .filter(|e| matches!(e, GameEvent::Discard { player: 0, .. }))
        .count();
    assert_eq!(discards, 2);
    assert_eq!(t.game.phase(), Phase::End);
}

#[tokio::test]
async fn test_keji_keeps_hand_when_no_strike_used() {
    for (control, kept) in [
        (ScriptedControl::passive().activating(), 6),
        (ScriptedControl::passive(), 4),
    ] {
        let mut t = table(
            scenario_config(),
            vec![
                seat(Character::LvMeng, Role::Rebel, control),
                seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
            ],
            filler(10),
        );
        for _ in 0..6 {
            t.game.deal_specific(0, CardName::Dodge).unwrap();
        }

        t.game.run_turn(0).await.unwrap();

        assert_eq!(t.game.roster().get_player(0).unwrap().hand_len(), kept);
    }
}

#[tokio::test]
async fn test_keji_does_not_apply_after_strike() {
    let mut t = table(
        scenario_config(),
        vec![
            seat(Character::LvMeng, Role::Rebel, striker(1, 1).activating()),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
        ],
        stacked(&[CardName::Strike], 10),
    );
    t.game.deal_specific(0, CardName::Strike).unwrap();
    for _ in 0..6 {
        t.game.deal_specific(0, CardName::Dodge).unwrap();
    }

    t.game.run_turn(0).await.unwrap();

    assert_eq!(t.game.roster().get_player(0).unwrap().hand_len(), 4);
}

/// 사람 좌석으로 한 턴을 돌리고 스킬 발동 질문 횟수를 셉니다.
async fn skill_asks_in_turn(character: Character, hand: usize) -> usize {
    let mut config = scenario_config();
    config.sync.wait_for_ack = false;
    let (link, mut presentation) = session_channels(&config.sync);
    let setup = GameSetup::new(config)
        .stacked_deck(filler(10))
        .seat("human", character, Role::Rebel, Box::new(HumanControl::new(0, link.clone())))
        .seat(
            "ruler",
            Character::Generic,
            Role::Ruler,
            Box::new(ScriptedControl::passive()),
        );
    let mut game = Game::new(setup, link).unwrap();
    for _ in 0..hand {
        game.deal_specific(0, CardName::Dodge).unwrap();
    }

    let presenter = tokio::spawn(async move {
        let mut asks = 0;
        while let Some(envelope) = presentation.recv().await {
            let reply = match envelope.event {
                GameEvent::AskSkill { .. } => {
                    asks += 1;
                    FrontendEvent::SkillChoice { activate: true }
                }
                GameEvent::AskPlayCard { .. } => FrontendEvent::PlayCardChoice { index: -1 },
                GameEvent::AskTarget { .. } => FrontendEvent::TargetChoice { ids: None },
                _ => continue,
            };
            if presentation.send(reply).is_err() {
                break;
            }
        }
        asks
    });

    game.run_turn(0).await.unwrap();
    drop(game);
    presenter.await.unwrap()
}

#[tokio::test]
async fn test_keji_asks_only_when_something_would_be_discarded() {
    assert_eq!(skill_asks_in_turn(Character::LvMeng, 3).await, 0);
    assert_eq!(skill_asks_in_turn(Character::LvMeng, 4).await, 0);
    assert_eq!(skill_asks_in_turn(Character::LvMeng, 6).await, 1);
}

#[tokio::test]
async fn test_locked_no_discard() {
    let mut t = table(
        scenario_config(),
        vec![
            seat(Character::ZhuGuoSha, Role::Rebel, ScriptedControl::passive()),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
        ],
        filler(10),
    );
    for _ in 0..7 {
        t.game.deal_specific(0, CardName::Dodge).unwrap();
    }

    t.game.run_turn(0).await.unwrap();

    assert_eq!(t.game.roster().get_player(0).unwrap().hand_len(), 7);
    assert_eq!(t.game.deck().discard_len(), 0);
}

#[tokio::test]
async fn test_lingcao_optional_draw() {
    for (control, drawn) in [
        (ScriptedControl::passive().activating(), 3),
        (ScriptedControl::passive(), 2),
    ] {
        let mut config = scenario_config();
        config.rules.draw_count = 2;
        let mut t = table(
            config,
            vec![
                seat(Character::LingCao, Role::Rebel, control),
                seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
            ],
            filler(10),
        );

        t.game.run_turn(0).await.unwrap();

        assert_eq!(draws_to(&t.events(), 0), drawn);
    }
}

#[tokio::test]
async fn test_empty_deck_stops_drawing() {
    let mut config = scenario_config();
    config.rules.draw_count = 2;
    let mut t = table(
        config,
        vec![
            seat(Character::Generic, Role::Rebel, ScriptedControl::passive()),
            seat(Character::Generic, Role::Ruler, ScriptedControl::passive()),
        ],
        filler(1),
    );

    t.game.run_turn(0).await.unwrap();

    assert_eq!(draws_to(&t.events(), 0), 1);
    assert_eq!(t.game.card_total(), 1);
}

fn rule_ai_game(seed: u64) -> (Game, PresentationLink) {
    let config = EngineConfig::headless().with_seed(seed);
    let (link, presentation) = session_channels(&config.sync);
    let roles = [Role::Ruler, Role::Rebel, Role::Loyalist, Role::Rebel, Role::Traitor];
    let mut setup = GameSetup::new(config);
    for (seat, role) in roles.iter().enumerate() {
        setup = setup.seat(
            format!("ai{}", seat),
            Character::Generic,
            *role,
            Box::new(RuleAi::seeded(seed * 10 + seat as u64)),
        );
    }
    (Game::new(setup, link).unwrap(), presentation)
}

#[tokio::test]
async fn test_cards_are_conserved_every_turn() {
    for seed in 1..=3 {
        let (mut game, _presentation) = rule_ai_game(seed);
        let total = game.initial_card_total();
        game.deal_initial_hands().await.unwrap();
        assert_eq!(game.card_total(), total);

        let mut seat = game.current();
        for _ in 0..60 {
            if game.is_over() {
                break;
            }
            game.run_turn(seat).await.unwrap();
            assert_eq!(game.card_total(), total, "seed {} lost cards", seed);
            assert!(game.active_play().is_none());
            assert_player_invariants(&game);
            match game.roster().next_alive_player(seat) {
                Some(next) => seat = next,
                None => break,
            }
        }
    }
}

#[tokio::test]
async fn test_rule_ai_game_runs_to_an_ending() {
    let (mut game, mut presentation) = rule_ai_game(11);

    let result = game.run().await;

    match result {
        Ok(outcome) => {
            assert!(outcome.winner.is_some());
            assert!(outcome.turns >= 1);
        }
        Err(e) => assert!(matches!(e, EngineError::TurnLimitExceeded { .. })),
    }
    assert!(game.is_over());
    assert_eq!(game.card_total(), game.initial_card_total());
    assert_player_invariants(&game);

    let mut endings = 0;
    while let Some(envelope) = presentation.try_recv() {
        if matches!(envelope.event, GameEvent::GameOver { .. }) {
            endings += 1;
        }
    }
    assert_eq!(endings, 1);
}
