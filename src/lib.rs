use std::sync::Once;

use once_cell::sync::OnceCell;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub mod card;
pub mod config;
pub mod control;
pub mod enums;
pub mod exception;
pub mod game;
pub mod skill;
pub mod sync;
pub mod unit;
pub mod zone;

use config::LoggingConfig;

static INIT: Once = Once::new();
static GUARD: OnceCell<WorkerGuard> = OnceCell::new();

/// 프로세스당 한 번만 로거를 설치합니다.
/// RUST_LOG 가 있으면 그것을, 없으면 설정의 레벨을 씁니다.
pub fn setup_logger(config: &LoggingConfig) {
    INIT.call_once(|| {
        // 1. 파일 로거 설정
        let file_appender =
            RollingFileAppender::new(Rotation::DAILY, &config.directory, &config.filename);
        let (non_blocking_file_writer, guard) = tracing_appender::non_blocking(file_appender);

        // 2. 로그 레벨 필터
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

        // 3. 파일 출력 레이어
        let file_layer = fmt::layer()
            .with_writer(non_blocking_file_writer)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_target(false)
            .pretty();

        // 이미 다른 subscriber 가 있으면 (테스트 등) 조용히 넘어갑니다.
        if tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .try_init()
            .is_err()
        {
            return;
        }

        let _ = GUARD.set(guard);
        tracing::info!(
            "로거 초기화 완료: {}/{} (level {})",
            config.directory,
            config.filename,
            config.level
        );
    });
}

pub trait LogExt<T, E> {
    fn log_ok(self, f: impl FnOnce(&T)) -> Self;
    fn log_err(self, f: impl FnOnce(&E)) -> Self;
}

impl<T, E> LogExt<T, E> for Result<T, E> {
    fn log_ok(self, f: impl FnOnce(&T)) -> Self {
        if let Ok(ref value) = self {
            f(value);
        }
        self
    }

    fn log_err(self, f: impl FnOnce(&E)) -> Self {
        if let Err(ref e) = self {
            f(e);
        }
        self
    }
}
