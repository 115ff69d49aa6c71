//! Static configuration
//!
//! Loaded once at startup from a TOML file plus environment overrides.
//! Priority: ENV > shortstats.toml > defaults. The env prefix is `SS`
//! with `__` separating sections, e.g. `SS__SERVER__BASE_URL`.

use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ShortstatsError};

/// Environment variable naming the config file path
pub const CONFIG_PATH_ENV: &str = "SHORTSTATS_CONFIG";

pub const DEFAULT_CONFIG_PATH: &str = "shortstats.toml";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub qr: QrConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl StaticConfig {
    /// Load configuration from the TOML file and environment.
    ///
    /// The file path comes from `SHORTSTATS_CONFIG` when set. A broken
    /// file falls back to defaults with a message on stderr; logging
    /// is not up yet at this point.
    pub fn load() -> Self {
        use config::{Config, Environment, File};

        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("SS")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if std::path::Path::new(&path).exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path);
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// Generate a sample TOML configuration
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// Save this configuration as TOML
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ShortstatsError::serialization(format!("config encode failed: {}", e)))?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Where the auth token is persisted
    pub fn token_path(&self) -> Result<PathBuf> {
        if let Some(file) = &self.auth.token_file {
            return Ok(PathBuf::from(file));
        }
        let dirs = ProjectDirs::from("", "", "shortstats").ok_or_else(|| {
            ShortstatsError::config("could not determine a config directory for the token")
        })?;
        Ok(dirs.config_dir().join("token"))
    }

    /// Persist a fresh auth token
    pub fn save_token(&self, token: &str) -> Result<()> {
        let path = self.token_path()?;
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, token)?;
        Ok(())
    }

    /// Read the persisted auth token, if any
    pub fn load_token(&self) -> Result<Option<String>> {
        let path = self.token_path()?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let token = raw.trim().to_string();
                Ok(if token.is_empty() { None } else { Some(token) })
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the persisted auth token; false when none existed
    pub fn remove_token(&self) -> Result<bool> {
        let path = self.token_path()?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shortener service endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// QR image parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QrConfig {
    #[serde(default = "default_qr_size")]
    pub size: u32,
}

/// Export destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_export_dir")]
    pub dir: String,
}

/// Token persistence
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Overrides the per-user config directory location
    #[serde(default)]
    pub token_file: Option<String>,
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default = "default_log_file")]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_qr_size() -> u32 {
    300
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_log_file() -> Option<String> {
    None
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for QrConfig {
    fn default() -> Self {
        Self {
            size: default_qr_size(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: default_log_file(),
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}
