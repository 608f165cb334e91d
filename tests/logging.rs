use sanguosha_core::{config::LoggingConfig, setup_logger};
use serial_test::serial;

#[test]
#[serial]
fn test_setup_logger_twice_is_harmless() {
    let dir = std::env::temp_dir().join(format!("sanguo-logs-{}", std::process::id()));
    let config = LoggingConfig {
        level: "debug".to_string(),
        directory: dir.to_string_lossy().into_owned(),
        filename: "engine.log".to_string(),
    };

    setup_logger(&config);
    setup_logger(&config);
    tracing::info!("logger installed once");
}
