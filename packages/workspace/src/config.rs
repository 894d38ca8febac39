use crate::error::{WorkspaceError, WorkspaceResult};
use mailcraft_compiler_html::CompileOptions;
use mailcraft_evaluator::EvalOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "mailcraft.config.json";

/// Read when the config file sets no `assetBaseUrl`
pub const ASSET_BASE_URL_ENV: &str = "MAILCRAFT_ASSET_BASE_URL";

/// Mailcraft configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL for assets referenced from sent email (social icons)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_base_url: Option<String>,

    /// Fail social link blocks when no base URL is configured
    #[serde(default)]
    pub strict_asset_urls: bool,

    /// Directory of the file storage backend
    #[serde(default = "default_storage_dir")]
    pub storage_dir: String,

    /// Key the template is persisted under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Persistence debounce window in milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Pretty-print rendered HTML
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_storage_dir() -> String {
    ".mailcraft".to_string()
}

fn default_storage_key() -> String {
    "email-template".to_string()
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_pretty() -> bool {
    true
}

impl Config {
    /// Load config from a directory, then apply the environment fallback
    pub fn load(cwd: &Path) -> WorkspaceResult<Self> {
        let config = Self::load_file(cwd)?;
        Ok(config.with_env_fallback(std::env::var(ASSET_BASE_URL_ENV).ok()))
    }

    /// Load config from a directory; a missing file gives the defaults
    pub fn load_file(cwd: &Path) -> WorkspaceResult<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if !config_path.exists() {
            debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path)?;
        serde_json::from_str(&content).map_err(|e| WorkspaceError::Config {
            path: config_path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Use `env_value` as the asset base URL when the file sets none
    pub fn with_env_fallback(mut self, env_value: Option<String>) -> Self {
        let configured = self
            .asset_base_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());
        if !configured {
            self.asset_base_url = env_value.filter(|url| !url.trim().is_empty());
        }
        self
    }

    pub fn storage_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.storage_dir)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn eval_options(&self) -> EvalOptions {
        EvalOptions {
            asset_base_url: self.asset_base_url.clone(),
            strict_asset_urls: self.strict_asset_urls,
        }
    }

    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            pretty: self.pretty,
            ..CompileOptions::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset_base_url: None,
            strict_asset_urls: false,
            storage_dir: default_storage_dir(),
            storage_key: default_storage_key(),
            debounce_ms: default_debounce_ms(),
            pretty: default_pretty(),
        }
    }
}
