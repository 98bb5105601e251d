//! Configuration loading and config file resolution
//!
//! Config file location follows a fixed priority order:
//! 1. Command-line argument (highest priority)
//! 2. `AGRI_CONFIG` environment variable
//! 3. User config file (`~/.config/agri/config.toml` on Linux)
//! 4. Compiled defaults (fallback)
//!
//! A missing config file never terminates startup: the caller gets compiled
//! defaults and the source is reported so it can be logged once tracing is up.
//! A config file that exists but does not parse is a `Config` error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "AGRI_CONFIG";

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "agri";

/// Config file name inside the application config directory
const CONFIG_FILE_NAME: &str = "config.toml";

/// Compiled defaults used when no config file provides a value
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub state_dir: PathBuf,
    pub log_level: String,
    pub server_host: String,
    pub server_port: u16,
    pub gateway_base_url: String,
    pub gateway_timeout_secs: u64,
}

impl CompiledDefaults {
    /// Defaults for the platform this binary was compiled for
    pub fn for_current_platform() -> Self {
        Self {
            state_dir: default_state_dir(),
            log_level: "info".to_string(),
            server_host: "127.0.0.1".to_string(),
            server_port: 5780,
            gateway_base_url: "http://localhost:5000".to_string(),
            gateway_timeout_secs: 30,
        }
    }
}

/// OS-dependent default directory for persisted session state
fn default_state_dir() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/agri
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/var/lib/agri"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/agri
        dirs::data_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/agri"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\agri
        dirs::data_local_dir()
            .map(|d| d.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\agri"))
    } else {
        PathBuf::from("./agri_data")
    }
}

// ========================================
// TOML schema
// ========================================

/// Root of the TOML config file
///
/// Every section is optional; absent sections take compiled defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Directory holding `session.toml` (last viewed screen)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<PathBuf>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub speech: SpeechConfig,
}

impl TomlConfig {
    /// Configured state directory, or the platform default
    pub fn state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| CompiledDefaults::for_current_platform().state_dir)
    }
}

/// `[logging]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    CompiledDefaults::for_current_platform().log_level
}

/// `[server]` section for `agri serve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

fn default_server_host() -> String {
    CompiledDefaults::for_current_platform().server_host
}

fn default_server_port() -> u16 {
    CompiledDefaults::for_current_platform().server_port
}

/// `[gateway]` section: where the external prediction service lives
///
/// Paths are deployment-specific and joined onto `base_url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_disease_path")]
    pub disease_path: String,
    #[serde(default = "default_water_path")]
    pub water_path: String,
    #[serde(default = "default_calculate_path")]
    pub calculate_path: String,
    #[serde(default = "default_catalogue_path")]
    pub catalogue_path: String,
    #[serde(default = "default_health_path")]
    pub health_path: String,
    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            disease_path: default_disease_path(),
            water_path: default_water_path(),
            calculate_path: default_calculate_path(),
            catalogue_path: default_catalogue_path(),
            health_path: default_health_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GatewayConfig {
    /// Gateway config with every path at its default and a custom base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Join a configured path onto the base URL
    ///
    /// Tolerates a trailing slash on the base and a missing leading slash on
    /// the path so that either spelling in the config file works.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn disease_url(&self) -> String {
        self.url(&self.disease_path)
    }

    pub fn water_url(&self) -> String {
        self.url(&self.water_path)
    }

    pub fn calculate_url(&self) -> String {
        self.url(&self.calculate_path)
    }

    pub fn catalogue_url(&self) -> String {
        self.url(&self.catalogue_path)
    }

    pub fn health_url(&self) -> String {
        self.url(&self.health_path)
    }
}

fn default_base_url() -> String {
    CompiledDefaults::for_current_platform().gateway_base_url
}

fn default_disease_path() -> String {
    "/predict".to_string()
}

fn default_water_path() -> String {
    "/predict_water".to_string()
}

fn default_calculate_path() -> String {
    "/calculate_water".to_string()
}

fn default_catalogue_path() -> String {
    "/get_crops".to_string()
}

fn default_health_path() -> String {
    "/test".to_string()
}

fn default_timeout_secs() -> u64 {
    CompiledDefaults::for_current_platform().gateway_timeout_secs
}

/// `[speech]` section
///
/// No synthesizer is configured by default, in which case speaking a
/// response reports an unsupported capability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeechConfig {
    /// Executable that reads text to speak (e.g. `espeak`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub synthesis_command: Option<String>,
    /// Extra arguments placed before the text argument; an argument of
    /// `{rate}` is replaced by the speaking rate
    #[serde(default)]
    pub args: Vec<String>,
}

// ========================================
// Resolution and loading
// ========================================

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument(PathBuf),
    Environment(PathBuf),
    UserConfig(PathBuf),
    /// No config file found; compiled defaults in use
    Defaults,
    /// A config path was named but the file does not exist
    Missing(PathBuf),
}

/// Configuration plus its provenance
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: TomlConfig,
    pub source: ConfigSource,
}

/// Resolve which config file to read, if any
pub fn resolve_config_path(cli_arg: Option<&Path>) -> ConfigSource {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return ConfigSource::CliArgument(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.trim().is_empty() {
            return ConfigSource::Environment(PathBuf::from(path));
        }
    }

    // Priority 3: User config file
    if let Some(path) = user_config_path() {
        if path.exists() {
            return ConfigSource::UserConfig(path);
        }
    }

    // Priority 4: Compiled defaults
    ConfigSource::Defaults
}

/// Platform user config path (`~/.config/agri/config.toml` on Linux)
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(CONFIG_FILE_NAME))
}

/// Load configuration with graceful degradation
///
/// Missing files fall back to defaults; malformed files are an error.
pub fn load_config(cli_arg: Option<&Path>) -> Result<LoadedConfig> {
    let source = resolve_config_path(cli_arg);

    let path = match &source {
        ConfigSource::CliArgument(p) | ConfigSource::Environment(p) | ConfigSource::UserConfig(p) => {
            p.clone()
        }
        ConfigSource::Defaults | ConfigSource::Missing(_) => {
            return Ok(LoadedConfig {
                config: TomlConfig::default(),
                source,
            })
        }
    };

    if !path.exists() {
        return Ok(LoadedConfig {
            config: TomlConfig::default(),
            source: ConfigSource::Missing(path),
        });
    }

    let config = read_toml_config(&path)?;
    Ok(LoadedConfig { config, source })
}

/// Read and parse a TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Serialize a config and write it atomically
pub fn write_toml_config(config: &TomlConfig, path: &Path) -> Result<()> {
    let content = toml::to_string_pretty(config)
        .map_err(|e| Error::Config(format!("Serialize config failed: {}", e)))?;
    atomic_write(path, &content)
}

/// Write a file via temp file + rename so readers never see a partial file
///
/// Creates the parent directory when missing.
pub fn atomic_write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .ok_or_else(|| Error::Config(format!("Not a file path: {}", path.display())))?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, content)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    debug!(path = %path.display(), "Wrote file atomically");
    Ok(())
}
