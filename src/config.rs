use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::enums::UnlockPolicy;

/// 엔진 전체 설정
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    pub rules: RulesConfig,
    pub sync: SyncConfig,
    pub skills: SkillConfig,
    pub logging: LoggingConfig,
    /// 덱 섞기와 AI 무작위 선택에 쓰는 시드. 없으면 엔트로피에서 생성.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RulesConfig {
    /// 무한 루프 방지용 턴 상한. 넘으면 승자 없이 종료합니다.
    pub max_turns: u32,
    /// 한 턴에 낼 수 있는 카드 수 상한
    pub max_plays_per_turn: usize,
    pub initial_hand_size: usize,
    pub draw_count: usize,
    /// 체력이 0 이 되면 구원 창을 열고, 아무도 구하지 않으면 사망 처리
    pub resolve_dying: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SyncConfig {
    pub wait_for_ack: bool,
    /// false 면 사람 Control 좌석의 드로우만 카드 내용을 보냅니다.
    pub reveal_all_draws: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillConfig {
    pub unlock_policy: UnlockPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
    pub directory: String,
    pub filename: String,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            max_turns: 1000,
            max_plays_per_turn: 100,
            initial_hand_size: 4,
            draw_count: 2,
            resolve_dying: true,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            wait_for_ack: true,
            reveal_all_draws: false,
        }
    }
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            unlock_policy: UnlockPolicy::Independent,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: "logs".to_string(),
            filename: "engine.log".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: RulesConfig::default(),
            sync: SyncConfig::default(),
            skills: SkillConfig::default(),
            logging: LoggingConfig::default(),
            seed: None,
        }
    }
}

impl EngineConfig {
    pub const ENV_PREFIX: &'static str = "SANGUO";

    /// 기본값 → TOML 파일(선택) → 환경 변수(SANGUO__ 접두사) 순으로 덮어씁니다.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);
        if let Some(path) = path {
            info!("Loading configuration from: {:?}", path);
            builder = builder.add_source(File::from(path).required(false));
        }
        let settings = builder
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: EngineConfig = settings.try_deserialize()?;
        debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// 프레젠테이션 없이 AI 끼리 돌리는 설정
    pub fn headless() -> Self {
        let mut config = Self::default();
        config.sync.wait_for_ack = false;
        config
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
