use anyhow::{Context, Result, anyhow};
use chrono::NaiveTime;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{endpoint::Endpoint, model::GateHours};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Override for a single upstream endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointConfig {
    pub url: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Example TOML:
    /// [endpoints.forecast]
    /// url = "..."
    #[serde(default)]
    pub endpoints: HashMap<String, EndpointConfig>,

    #[serde(default)]
    pub gate: GateHours,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoints: HashMap::new(),
            gate: GateHours::default(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    /// Configured URL for `endpoint`, falling back to the built-in one.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> &str {
        self.endpoints
            .get(endpoint.key())
            .map(|cfg| cfg.url.as_str())
            .unwrap_or_else(|| endpoint.default_url())
    }

    pub fn set_endpoint_url(&mut self, endpoint: Endpoint, url: String) {
        self.endpoints.insert(endpoint.key().to_string(), EndpointConfig { url });
    }

    pub fn clear_endpoint_url(&mut self, endpoint: Endpoint) -> bool {
        self.endpoints.remove(endpoint.key()).is_some()
    }

    pub fn is_endpoint_overridden(&self, endpoint: Endpoint) -> bool {
        self.endpoints.contains_key(endpoint.key())
    }

    /// Replace the gate hours after checking both are `HH:MM` and open precedes close.
    pub fn set_gate_hours(&mut self, open_time: &str, close_time: &str) -> Result<()> {
        let gate = GateHours { open_time: open_time.trim().into(), close_time: close_time.trim().into() };
        validate_gate(&gate)?;
        self.gate = gate;
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        validate_gate(&self.gate)?;

        if self.request_timeout_secs == 0 {
            return Err(anyhow!("request_timeout_secs must be greater than zero"));
        }

        for (key, cfg) in &self.endpoints {
            if !Endpoint::all().iter().any(|e| e.key() == key) {
                return Err(anyhow!(
                    "Unknown endpoint '{key}' in config. Supported endpoints: basic, forecast."
                ));
            }
            if !cfg.url.starts_with("http://") && !cfg.url.starts_with("https://") {
                return Err(anyhow!("Endpoint '{key}' has a non-HTTP url: {}", cfg.url));
            }
        }

        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "taishan", "taishan")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn validate_gate(gate: &GateHours) -> Result<()> {
    let open = parse_hhmm(&gate.open_time)?;
    let close = parse_hhmm(&gate.close_time)?;

    if open >= close {
        return Err(anyhow!(
            "Gate opening time {} must be earlier than closing time {}",
            gate.open_time,
            gate.close_time
        ));
    }

    Ok(())
}

fn parse_hhmm(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M")
        .with_context(|| format!("Invalid time '{raw}', expected HH:MM"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("taishan-config-test-{}-{name}", std::process::id()))
            .join("config.toml")
    }

    #[test]
    fn endpoint_url_falls_back_to_default() {
        let cfg = Config::default();
        assert_eq!(cfg.endpoint_url(Endpoint::Basic), Endpoint::Basic.default_url());
        assert!(!cfg.is_endpoint_overridden(Endpoint::Basic));
    }

    #[test]
    fn endpoint_override_and_clear() {
        let mut cfg = Config::default();

        cfg.set_endpoint_url(Endpoint::Forecast, "http://localhost:9000/overview".into());
        assert_eq!(cfg.endpoint_url(Endpoint::Forecast), "http://localhost:9000/overview");
        assert_eq!(cfg.endpoint_url(Endpoint::Basic), Endpoint::Basic.default_url());

        assert!(cfg.clear_endpoint_url(Endpoint::Forecast));
        assert!(!cfg.clear_endpoint_url(Endpoint::Forecast));
        assert_eq!(cfg.endpoint_url(Endpoint::Forecast), Endpoint::Forecast.default_url());
    }

    #[test]
    fn gate_hours_are_validated() {
        let mut cfg = Config::default();

        cfg.set_gate_hours("07:30", "17:00").expect("valid hours");
        assert_eq!(cfg.gate.open_time, "07:30");

        let err = cfg.set_gate_hours("7 am", "17:00").unwrap_err();
        assert!(err.to_string().contains("expected HH:MM"));

        let err = cfg.set_gate_hours("18:00", "08:00").unwrap_err();
        assert!(err.to_string().contains("must be earlier"));
        assert_eq!(cfg.gate.close_time, "17:00");
    }

    #[test]
    fn parse_minimal_toml_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn validate_rejects_unknown_endpoint_key() {
        let cfg: Config = toml::from_str(
            r#"
            [endpoints.radar]
            url = "https://example.com"
            "#,
        )
        .unwrap();

        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("Unknown endpoint 'radar'"));
    }

    #[test]
    fn save_then_load_roundtrip() {
        let path = scratch_path("roundtrip");
        let mut cfg = Config::default();
        cfg.set_endpoint_url(Endpoint::Basic, "https://example.com/sk.html".into());
        cfg.set_gate_hours("06:00", "18:30").unwrap();

        cfg.save_to(&path).expect("save should succeed");
        let loaded = Config::load_from(&path).expect("load should succeed");
        assert_eq!(loaded, cfg);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let cfg = Config::load_from(&scratch_path("missing")).unwrap();
        assert_eq!(cfg, Config::default());
    }
}
