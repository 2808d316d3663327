//! Runtime configuration from environment variables

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_URL, DEFAULT_CACHE_TTL_SECS, DEFAULT_TIMEOUT_SECS, ENV_API_TOKEN, ENV_API_URL,
    ENV_CACHE_DIR, ENV_CACHE_TTL_SECS, ENV_EDIT_POLICY, ENV_LABELS, ENV_TIMEOUT_SECS,
};
use crate::error::{Result, RolegateError};

/// How the role editor treats the `read` action
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EditPolicy {
    /// Every action toggles on its own
    #[default]
    Independent,
    /// Non-read actions stay disabled until `read` is granted; revoking `read` clears the resource
    ReadGatesOthers,
}

impl FromStr for EditPolicy {
    type Err = RolegateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "independent" => Ok(EditPolicy::Independent),
            "read-gates-others" | "read-gated" => Ok(EditPolicy::ReadGatesOthers),
            other => Err(RolegateError::Config(format!("unknown edit policy `{}`", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub api_url: String,
    pub api_token: Option<String>,
    /// Query cache directory; no cache when unset
    pub cache_dir: Option<PathBuf>,
    /// Max age of a cached catalog; 0 always refetches
    pub cache_ttl_secs: u64,
    /// Labels JSON file; raw identifiers when unset
    pub labels_path: Option<PathBuf>,
    pub edit_policy: EditPolicy,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            cache_dir: None,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            labels_path: None,
            edit_policy: EditPolicy::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Read configuration through an arbitrary lookup (tests pass a map)
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut c = Config::default();
        if let Some(v) = get(ENV_API_URL) {
            c.api_url = v;
        }
        c.api_token = get(ENV_API_TOKEN).filter(|t| !t.is_empty());
        c.cache_dir = get(ENV_CACHE_DIR).map(PathBuf::from);
        c.labels_path = get(ENV_LABELS).map(PathBuf::from);
        if let Some(v) = get(ENV_EDIT_POLICY) {
            c.edit_policy = v.parse()?;
        }
        if let Some(v) = get(ENV_TIMEOUT_SECS) {
            c.timeout_secs = secs(ENV_TIMEOUT_SECS, &v)?;
        }
        if let Some(v) = get(ENV_CACHE_TTL_SECS) {
            c.cache_ttl_secs = secs(ENV_CACHE_TTL_SECS, &v)?;
        }
        Ok(c)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn secs(var: &str, v: &str) -> Result<u64> {
    v.trim()
        .parse()
        .map_err(|_| RolegateError::Config(format!("{} must be an integer, got `{}`", var, v)))
}
