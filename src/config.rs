use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the environment variable that overrides the configured
/// credential. Loaded from `.env` too, via dotenvy at startup.
pub const CREDENTIAL_ENV: &str = "SYNCTL_TOKEN";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub server: ServerConfig,

    pub auth: AuthConfig,

    pub backup: BackupConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the sync service.
    pub base_url: String,

    /// Request timeout in seconds (default: 30)
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            request_timeout_seconds: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Bearer credential for the account. Leave empty and set
    /// `SYNCTL_TOKEN` instead to keep the secret out of the file.
    pub credential: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Directory pre-rotation snapshots are written to.
    pub export_dir: String,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            export_dir: "./backups".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        for path in &paths {
            if path.exists() {
                info!("Loading config from: {}", path.display());
                return Self::load_from_path(path);
            }
        }

        info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![];

        paths.push(PathBuf::from("config.toml"));

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("synctl").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".synctl").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    pub fn create_default_if_missing() -> Result<bool> {
        let path = Self::default_config_path();
        if path.exists() {
            Ok(false)
        } else {
            let config = Self::default();
            config.save_to_path(&path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.base_url.is_empty() {
            anyhow::bail!("Server base URL cannot be empty");
        }

        url::Url::parse(&self.server.base_url)
            .with_context(|| format!("Invalid server base URL: {}", self.server.base_url))?;

        if self.server.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be > 0 seconds");
        }

        Ok(())
    }

    /// The credential to present, env taking precedence over the file.
    #[must_use]
    pub fn resolve_credential(&self) -> Option<String> {
        if let Ok(token) = std::env::var(CREDENTIAL_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }

        if self.auth.credential.is_empty() {
            None
        } else {
            Some(self.auth.credential.clone())
        }
    }
}
