use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sanguosha_core::{
    config::EngineConfig,
    control::RuleAi,
    enums::{Character, Role},
    game::{Game, GameSetup},
    setup_logger,
    sync::session_channels,
    LogExt,
};
use tracing::{error, info};

// main
#[derive(Parser)]
#[command(
    name = "sanguosha engine",                 // 프로그램 이름
    author = env!("CARGO_PKG_AUTHORS"),        // 작성자
    version = env!("CARGO_PKG_VERSION"),       // 버전
    about = env!("CARGO_PKG_DESCRIPTION"),     // 짧은 설명
    long_about = None,
)]
struct Args {
    /// TOML 설정 파일
    #[arg(long)]
    config: Option<PathBuf>,

    /// 덱 섞기와 AI 선택에 쓸 시드
    #[arg(long)]
    seed: Option<u64>,

    /// 참가 인원 (2..=8)
    #[arg(long, default_value_t = 5)]
    players: usize,

    /// 턴 상한 덮어쓰기
    #[arg(long)]
    turns: Option<u32>,
}

/// 인원수별 신분 배분. 첫 좌석이 군주입니다.
fn roles_for(players: usize) -> Vec<Role> {
    let mut roles = vec![Role::Ruler, Role::Rebel];
    let extra = [
        Role::Loyalist,
        Role::Traitor,
        Role::Rebel,
        Role::Loyalist,
        Role::Rebel,
        Role::Rebel,
    ];
    roles.extend(extra.iter().take(players.saturating_sub(2)));
    roles
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    anyhow::ensure!((2..=8).contains(&args.players), "players must be between 2 and 8");

    let mut config =
        EngineConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(turns) = args.turns {
        config.rules.max_turns = turns;
    }
    setup_logger(&config.logging);

    let base_seed = config.seed.unwrap_or_else(rand::random);
    let (link, presentation) = session_channels(&config.sync);
    let presenter = tokio::spawn(presentation.auto_ack());

    let mut setup = GameSetup::new(config.clone());
    for (seat, role) in roles_for(args.players).into_iter().enumerate() {
        setup = setup.seat(
            format!("player{}", seat + 1),
            Character::Generic,
            role,
            Box::new(RuleAi::seeded(base_seed.wrapping_add(seat as u64 + 1))),
        );
    }

    let mut game = Game::new(setup, link).context("failed to assemble game")?;
    let outcome = game
        .run()
        .await
        .log_ok(|o| info!("finished: {:?}", o))
        .log_err(|e| error!("game aborted: {}", e))?;

    let events = presenter.await.context("presenter task failed")?;
    println!(
        "winner: {}",
        outcome.winner.as_deref().unwrap_or("none")
    );
    println!("turns: {}, events: {}, survivors: {:?}", outcome.turns, events.len(), outcome.survivors);
    Ok(())
}
