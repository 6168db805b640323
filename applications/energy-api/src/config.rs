use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    pub source: SourceConfig,
    #[serde(default)]
    pub tariff: Tariff,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_host")]
    pub host: String,
    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_api_host() -> String {
    "0.0.0.0".into()
}

fn default_api_port() -> u16 {
    5000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_api_host(),
            port: default_api_port(),
        }
    }
}

/// Where dashboard data comes from, chosen at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Query the shared time-series store the sampler writes to.
    Live {
        database: DbConfig,
        /// Trailing window a reading must fall in to count as "live", seconds.
        #[serde(default = "default_lookback_secs")]
        lookback_secs: u64,
    },
    /// Serve the built-in reference day profile; no store required.
    Demo,
}

fn default_lookback_secs() -> u64 {
    300
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

/// Deployment billing constants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tariff {
    #[serde(default = "default_rate_per_kwh")]
    pub rate_per_kwh: f64,
    /// Grid emission factor, kg CO2 per kWh.
    #[serde(default = "default_carbon_kg_per_kwh")]
    pub carbon_kg_per_kwh: f64,
    /// Above this the live status flips from "Normal" to "High Load", watts.
    #[serde(default = "default_high_load_threshold_w")]
    pub high_load_threshold_w: f64,
}

fn default_rate_per_kwh() -> f64 {
    11.60
}

fn default_carbon_kg_per_kwh() -> f64 {
    0.702
}

fn default_high_load_threshold_w() -> f64 {
    2000.0
}

impl Default for Tariff {
    fn default() -> Self {
        Self {
            rate_per_kwh: default_rate_per_kwh(),
            carbon_kg_per_kwh: default_carbon_kg_per_kwh(),
            high_load_threshold_w: default_high_load_threshold_w(),
        }
    }
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    /// Afterwards, if DATABASE_URL env is set and the source is live, override
    /// the store URL.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        let expanded = expand_env_placeholders(&raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            if let SourceConfig::Live { database, .. } = &mut cfg.source {
                database.url = url;
            }
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(
            self.tariff.rate_per_kwh >= 0.0,
            "tariff.rate_per_kwh must be non-negative"
        );
        anyhow::ensure!(
            self.tariff.carbon_kg_per_kwh >= 0.0,
            "tariff.carbon_kg_per_kwh must be non-negative"
        );
        anyhow::ensure!(
            self.tariff.high_load_threshold_w > 0.0,
            "tariff.high_load_threshold_w must be positive"
        );
        if let SourceConfig::Live { lookback_secs, .. } = &self.source {
            anyhow::ensure!(*lookback_secs >= 1, "source.lookback_secs must be at least 1");
        }
        Ok(())
    }
}

/// Expand $(VAR) and ${VAR} placeholders using environment variables.
/// "$$" escapes to a literal "$"; a lone "$" passes through unchanged.
fn expand_env_placeholders(input: &str) -> Result<String, anyhow::Error> {
    use anyhow::Context;

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        match tail.chars().next() {
            Some('$') => {
                out.push('$');
                rest = &tail[1..];
            }
            Some(open) if open == '(' || open == '{' => {
                let close = if open == '(' { ')' } else { '}' };
                let end = tail[1..]
                    .find(close)
                    .with_context(|| format!("unterminated env placeholder: missing '{}'", close))?;
                let var = &tail[1..1 + end];
                let val = std::env::var(var)
                    .with_context(|| format!("missing environment variable: {}", var))?;
                out.push_str(&val);
                rest = &tail[1 + end + 1..];
            }
            _ => {
                out.push('$');
                rest = tail;
            }
        }
    }
    out.push_str(rest);

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(yaml: &str) -> Result<Config, anyhow::Error> {
        let cfg: Config = serde_yaml::from_str(&expand_env_placeholders(yaml)?)?;
        cfg.validate()?;
        Ok(cfg)
    }

    #[test]
    fn demo_config_needs_no_database() {
        let cfg = parse("source:\n  mode: demo\n").unwrap();
        assert!(matches!(cfg.source, SourceConfig::Demo));
        assert_eq!(cfg.api.port, 5000);
        assert_eq!(cfg.tariff.rate_per_kwh, 11.60);
        assert_eq!(cfg.tariff.carbon_kg_per_kwh, 0.702);
        assert_eq!(cfg.tariff.high_load_threshold_w, 2000.0);
    }

    #[test]
    fn live_config_parses_store_settings() {
        let yaml = r#"
api:
  port: 8080
source:
  mode: live
  database:
    url: postgres://localhost/energy
  lookback_secs: 10
tariff:
  rate_per_kwh: 9.5
"#;
        let cfg = parse(yaml).unwrap();
        match cfg.source {
            SourceConfig::Live {
                database,
                lookback_secs,
            } => {
                assert_eq!(database.url, "postgres://localhost/energy");
                assert_eq!(lookback_secs, 10);
            }
            other => panic!("expected live source, got {other:?}"),
        }
        assert_eq!(cfg.api.port, 8080);
        assert_eq!(cfg.tariff.rate_per_kwh, 9.5);
        // Unspecified tariff fields keep their defaults.
        assert_eq!(cfg.tariff.carbon_kg_per_kwh, 0.702);
    }

    #[test]
    fn live_lookback_defaults_to_five_minutes() {
        let yaml = r#"
source:
  mode: live
  database:
    url: postgres://localhost/energy
"#;
        let cfg = parse(yaml).unwrap();
        match cfg.source {
            SourceConfig::Live { lookback_secs, .. } => assert_eq!(lookback_secs, 300),
            other => panic!("expected live source, got {other:?}"),
        }
    }

    #[test]
    fn rejects_negative_rate() {
        let yaml = r#"
source:
  mode: demo
tariff:
  rate_per_kwh: -1.0
"#;
        assert!(parse(yaml).is_err());
    }

    #[test]
    fn env_placeholder_feeds_store_url() {
        std::env::set_var("API_TEST_DB_URL", "postgres://elsewhere/energy");
        let yaml = r#"
source:
  mode: live
  database:
    url: $(API_TEST_DB_URL)
"#;
        let cfg = parse(yaml).unwrap();
        match cfg.source {
            SourceConfig::Live { database, .. } => {
                assert_eq!(database.url, "postgres://elsewhere/energy");
            }
            other => panic!("expected live source, got {other:?}"),
        }
    }
}
