//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treeviz/treeviz.toml`
//! 3. Local config: `--config <FILE>`, or `./.treeviz.toml` when present
//! 4. Environment variables: `TREEVIZ_*` prefix, `__` between sections (`TREEVIZ_LAYOUT__HBUFF=2`)
//!
//! Command-line flags are applied on top by the CLI layer.

use std::path::{Path, PathBuf};

use config::{Config, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::domain::{DomainResult, LayoutStrategy, Spacing};

/// Name of the per-directory config file.
pub const LOCAL_CONFIG_FILE: &str = ".treeviz.toml";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("config error: {message}")]
    Invalid { message: String },
}

fn config_err(e: config::ConfigError) -> SettingsError {
    SettingsError::Invalid {
        message: e.to_string(),
    }
}

/// Binary tree layout settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LayoutSettings {
    /// Horizontal spacing unit
    pub hbuff: f64,
    /// Vertical distance between levels
    pub vbuff: f64,
    pub strategy: LayoutStrategy,
    /// Center the bounding box on the origin instead of the root
    pub center: bool,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            hbuff: 1.0,
            vbuff: 1.0,
            strategy: LayoutStrategy::Halving,
            center: false,
        }
    }
}

/// Linked-list chain settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChainSettings {
    /// Distance between consecutive items
    pub buff: f64,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self { buff: 1.0 }
    }
}

/// Raw layout settings for intermediate parsing (None means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawLayoutSettings {
    pub hbuff: Option<f64>,
    pub vbuff: Option<f64>,
    pub strategy: Option<LayoutStrategy>,
    pub center: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawChainSettings {
    pub buff: Option<f64>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub layout: RawLayoutSettings,
    pub chain: RawChainSettings,
}

/// Unified configuration for treeviz.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutSettings,
    pub chain: ChainSettings,
}

/// Get the XDG config directory for treeviz.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treeviz").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treeviz.toml"))
}

/// Local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(LOCAL_CONFIG_FILE)
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, SettingsError> {
    let content = std::fs::read_to_string(path).map_err(|e| SettingsError::Invalid {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| SettingsError::Invalid {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Merge overlay config onto self (base): overlay wins where specified.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            layout: LayoutSettings {
                hbuff: overlay.layout.hbuff.unwrap_or(self.layout.hbuff),
                vbuff: overlay.layout.vbuff.unwrap_or(self.layout.vbuff),
                strategy: overlay.layout.strategy.unwrap_or(self.layout.strategy),
                center: overlay.layout.center.unwrap_or(self.layout.center),
            },
            chain: ChainSettings {
                buff: overlay.chain.buff.unwrap_or(self.chain.buff),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Explicit local config file; must exist when given.
    ///   Without it, `./.treeviz.toml` is used if present.
    pub fn load(config_file: Option<&Path>) -> Result<Self, SettingsError> {
        let local = match config_file {
            Some(path) => Some(path.to_path_buf()),
            None => std::env::current_dir()
                .ok()
                .map(|dir| local_config_path(&dir))
                .filter(|path| path.exists()),
        };
        Self::load_from(global_config_path().as_deref(), local.as_deref(), None)
    }

    /// Layered load from explicit sources.
    ///
    /// `global` is skipped when the file does not exist; `local` must exist.
    /// `env` replaces the process environment when given.
    #[instrument(level = "debug")]
    pub fn load_from(
        global: Option<&Path>,
        local: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global.filter(|path| path.exists()) {
            debug!(path = %global_path.display(), "loading global config");
            current = current.merge_with(&load_raw_settings(global_path)?);
        }

        // 3. Local config
        if let Some(local_path) = local {
            if !local_path.exists() {
                return Err(SettingsError::NotFound(local_path.to_path_buf()));
            }
            debug!(path = %local_path.display(), "loading local config");
            current = current.merge_with(&load_raw_settings(local_path)?);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current, env)?;

        debug!(?current, "settings loaded");
        Ok(current)
    }

    /// Apply TREEVIZ_* environment variables as explicit overrides.
    fn apply_env_overrides(
        mut settings: Self,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("TREEVIZ")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .build()
            .map_err(config_err)?;

        if let Some(val) = optional(config.get_float("layout.hbuff"))? {
            settings.layout.hbuff = val;
        }
        if let Some(val) = optional(config.get_float("layout.vbuff"))? {
            settings.layout.vbuff = val;
        }
        if let Some(val) = optional(config.get::<LayoutStrategy>("layout.strategy"))? {
            settings.layout.strategy = val;
        }
        if let Some(val) = optional(config.get_bool("layout.center"))? {
            settings.layout.center = val;
        }
        if let Some(val) = optional(config.get_float("chain.buff"))? {
            settings.chain.buff = val;
        }

        Ok(settings)
    }

    /// Validated spacing of the layout section.
    pub fn spacing(&self) -> DomainResult<Spacing> {
        Spacing::new(self.layout.hbuff, self.layout.vbuff)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        toml::to_string(self).map_err(|e| SettingsError::Invalid {
            message: e.to_string(),
        })
    }
}

/// Missing keys are not an error; malformed values are.
fn optional<T>(result: Result<T, config::ConfigError>) -> Result<Option<T>, SettingsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(config::ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(config_err(e)),
    }
}
