use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_MAX_DEVICES: usize = 5;

/// Limits applied when a device registers against an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevicePolicy {
    /// Maximum number of simultaneously active sessions.
    pub max_devices: usize,
    /// Evict the oldest active session instead of rejecting a new one.
    pub evict_oldest: bool,
}

impl Default for DevicePolicy {
    fn default() -> Self {
        Self {
            max_devices: DEFAULT_MAX_DEVICES,
            evict_oldest: true,
        }
    }
}

impl DevicePolicy {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a policy from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to the defaults; set but unparsable values
    /// are errors.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let max_devices = match lookup("ACCOUNT_MAX_DEVICES") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("Invalid ACCOUNT_MAX_DEVICES value: {}", raw))?,
            None => defaults.max_devices,
        };

        let evict_oldest = match lookup("ACCOUNT_EVICT_OLDEST_DEVICE") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| anyhow!("Invalid ACCOUNT_EVICT_OLDEST_DEVICE value: {}", raw))?,
            None => defaults.evict_oldest,
        };

        tracing::debug!(max_devices, evict_oldest, "Loaded device policy");

        Ok(DevicePolicy {
            max_devices,
            evict_oldest,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
