//! Runtime settings for the JNI bridge.

use flexlayout_core::{Error, Result, ResultExt, ON_RELEASE_FAILURE_VAR};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::str::FromStr;

/// What to do when a global reference cannot be released because no
/// environment is available on the dropping thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReleaseFailurePolicy {
    /// Log the failure and leak the reference.
    #[default]
    Leak,
    /// Panic, unless the thread is already unwinding.
    Panic,
}

impl FromStr for ReleaseFailurePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "leak" => Ok(Self::Leak),
            "panic" => Ok(Self::Panic),
            other => Err(Error::environment(
                ON_RELEASE_FAILURE_VAR,
                format!("unknown release failure policy '{other}', expected 'leak' or 'panic'"),
            )),
        }
    }
}

impl fmt::Display for ReleaseFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leak => f.write_str("leak"),
            Self::Panic => f.write_str("panic"),
        }
    }
}

/// Bridge settings shared by every release path in the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub on_release_failure: ReleaseFailurePolicy,
}

impl BridgeConfig {
    /// Reads settings from `FLEXLAYOUT_JNI_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(value) = env::var(ON_RELEASE_FAILURE_VAR) {
            config.on_release_failure = value.parse()?;
        }
        Ok(config)
    }

    /// Parses settings from JSON, e.g. `{"on_release_failure": "panic"}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid bridge configuration")
    }
}

static CONFIG: Lazy<RwLock<BridgeConfig>> = Lazy::new(|| RwLock::new(BridgeConfig::default()));

/// The configuration currently in effect.
pub fn bridge_config() -> BridgeConfig {
    *CONFIG.read()
}

/// Replaces the process-wide configuration.
pub fn set_bridge_config(config: BridgeConfig) {
    *CONFIG.write() = config;
}
