//! Unit tests for configuration resolution and graceful degradation
//!
//! Covers:
//! - Missing config files do not abort startup (defaults + reported source)
//! - Priority order: CLI argument > environment variable > user file > defaults
//! - Malformed files surface as `Config` errors
//! - Atomic write round-trip
//!
//! Note: Uses serial_test to prevent environment variable races.
//! Tests that touch AGRI_CONFIG are marked with #[serial].

use agri_common::config::{
    load_config, read_toml_config, resolve_config_path, write_toml_config, CompiledDefaults,
    ConfigSource, GatewayConfig, LoggingConfig, SpeechConfig, TomlConfig, CONFIG_ENV_VAR,
};
use agri_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_compiled_defaults_for_current_platform() {
    let defaults = CompiledDefaults::for_current_platform();

    assert!(!defaults.state_dir.as_os_str().is_empty());
    assert_eq!(defaults.log_level, "info");
    assert_eq!(defaults.server_host, "127.0.0.1");
    assert_eq!(defaults.server_port, 5780);
    assert_eq!(defaults.gateway_base_url, "http://localhost:5000");

    #[cfg(target_os = "linux")]
    {
        let path_str = defaults.state_dir.to_string_lossy();
        assert!(path_str.ends_with("agri"), "Linux default should end in agri");
    }
}

#[test]
#[serial]
fn test_env_var_used_when_no_cli_argument() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/agri-env-config.toml");

    let source = resolve_config_path(None);
    assert_eq!(
        source,
        ConfigSource::Environment(PathBuf::from("/tmp/agri-env-config.toml"))
    );

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_cli_argument_beats_env_var() {
    env::set_var(CONFIG_ENV_VAR, "/tmp/agri-env-config.toml");

    let cli = PathBuf::from("/tmp/agri-cli-config.toml");
    let source = resolve_config_path(Some(&cli));
    assert_eq!(source, ConfigSource::CliArgument(cli));

    env::remove_var(CONFIG_ENV_VAR);
}

#[test]
#[serial]
fn test_missing_named_file_falls_back_to_defaults() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let loaded = load_config(Some(&path)).unwrap();

    assert_eq!(loaded.config, TomlConfig::default());
    assert_eq!(loaded.source, ConfigSource::Missing(path));
}

#[test]
#[serial]
fn test_load_reads_named_file() {
    env::remove_var(CONFIG_ENV_VAR);
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
state_dir = "/srv/agri"

[logging]
level = "debug"

[server]
port = 6100

[gateway]
base_url = "http://inference.lan:5000"
water_path = "/v2/water"
timeout_secs = 5

[speech]
synthesis_command = "espeak"
args = ["-s", "150"]
"#,
    )
    .unwrap();

    let loaded = load_config(Some(&path)).unwrap();
    let config = loaded.config;

    assert_eq!(loaded.source, ConfigSource::CliArgument(path));
    assert_eq!(config.state_dir(), PathBuf::from("/srv/agri"));
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.server.port, 6100);
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.gateway.water_url(), "http://inference.lan:5000/v2/water");
    assert_eq!(config.gateway.disease_url(), "http://inference.lan:5000/predict");
    assert_eq!(config.gateway.timeout_secs, 5);
    assert_eq!(config.speech.synthesis_command.as_deref(), Some("espeak"));
    assert_eq!(config.speech.args, vec!["-s".to_string(), "150".to_string()]);
}

#[test]
fn test_malformed_file_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "[gateway\nbase_url = ").unwrap();

    let err = read_toml_config(&path).unwrap_err();
    assert!(matches!(err, Error::Config(_)), "got {:?}", err);
}

#[test]
fn test_write_then_read_preserves_fields() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("nested").join("config.toml");

    let config = TomlConfig {
        state_dir: Some(PathBuf::from("/var/lib/agri")),
        logging: LoggingConfig {
            level: "warn".to_string(),
        },
        server: Default::default(),
        gateway: GatewayConfig::with_base_url("http://192.168.1.20:5000"),
        speech: SpeechConfig {
            synthesis_command: Some("say".to_string()),
            args: vec![],
        },
    };

    write_toml_config(&config, &target).unwrap();

    assert!(target.exists());
    assert!(!target.with_file_name("config.toml.tmp").exists());
    assert_eq!(read_toml_config(&target).unwrap(), config);
}
