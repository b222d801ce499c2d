use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PrivatProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MinfinProviderConfig {
    pub base_url: String,
    /// The listing endpoint requires a personal API key; without one the
    /// source is skipped.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BinanceProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MonobankProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub privat: Option<PrivatProviderConfig>,
    pub minfin: Option<MinfinProviderConfig>,
    pub binance: Option<BinanceProviderConfig>,
    pub monobank: Option<MonobankProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            privat: Some(PrivatProviderConfig {
                base_url: "https://api.privatbank.ua".to_string(),
            }),
            minfin: Some(MinfinProviderConfig {
                base_url: "https://api.minfin.com.ua".to_string(),
                api_key: None,
            }),
            binance: Some(BinanceProviderConfig {
                base_url: "https://api.binance.com".to_string(),
            }),
            monobank: Some(MonobankProviderConfig {
                base_url: "https://api.monobank.ua".to_string(),
            }),
        }
    }
}

fn default_local_currency() -> String {
    "UAH".to_string()
}

fn default_spike_threshold() -> f64 {
    1.5
}

fn default_provider_timeout() -> u64 {
    10
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    /// The currency all sources quote against.
    #[serde(default = "default_local_currency")]
    pub local_currency: String,
    /// Percent change since the last baseline that triggers an alert.
    #[serde(default = "default_spike_threshold")]
    pub spike_threshold_pct: f64,
    #[serde(default = "default_provider_timeout")]
    pub provider_timeout_secs: u64,
    /// Overrides the platform data directory for the baseline store.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            providers: ProvidersConfig::default(),
            local_currency: default_local_currency(),
            spike_threshold_pct: default_spike_threshold(),
            provider_timeout_secs: default_provider_timeout(),
            data_dir: None,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "ratewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("in", "codito", "ratewatch")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Directory holding the persisted baselines.
    pub fn baseline_dir(&self) -> Result<PathBuf> {
        let base = match &self.data_dir {
            Some(dir) => dir.clone(),
            None => Self::default_data_path()?,
        };
        Ok(base.join("baselines"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
providers:
  privat:
    base_url: "http://example.com/privat"
  minfin:
    base_url: "http://example.com/minfin"
    api_key: "secret"
local_currency: "UAH"
spike_threshold_pct: 2.0
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.providers.privat.unwrap().base_url,
            "http://example.com/privat"
        );
        let minfin = config.providers.minfin.unwrap();
        assert_eq!(minfin.base_url, "http://example.com/minfin");
        assert_eq!(minfin.api_key, Some("secret".to_string()));
        assert!(config.providers.binance.is_none());
        assert_eq!(config.local_currency, "UAH");
        assert_eq!(config.spike_threshold_pct, 2.0);
        assert_eq!(config.provider_timeout_secs, 10);
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: AppConfig = serde_yaml::from_str("local_currency: \"UAH\"").unwrap();

        assert_eq!(
            config.providers.privat.unwrap().base_url,
            "https://api.privatbank.ua"
        );
        assert_eq!(
            config.providers.monobank.unwrap().base_url,
            "https://api.monobank.ua"
        );
        assert!(config.providers.minfin.unwrap().api_key.is_none());
        assert_eq!(config.spike_threshold_pct, 1.5);
        assert_eq!(config.provider_timeout_secs, 10);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn test_baseline_dir_honors_data_dir_override() {
        let config: AppConfig = serde_yaml::from_str("data_dir: \"/tmp/ratewatch-test\"").unwrap();
        assert_eq!(
            config.baseline_dir().unwrap(),
            PathBuf::from("/tmp/ratewatch-test/baselines")
        );
    }

    #[test]
    fn test_load_from_missing_path_is_an_error() {
        let result = AppConfig::load_from_path("/nonexistent/ratewatch/config.yaml");
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}
