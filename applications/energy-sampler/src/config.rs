use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DbConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    pub calibration: Calibration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Raw samples per acquisition cycle, per channel.
    #[serde(default = "default_sample_count")]
    pub sample_count: u32,
    /// Sleep between successful cycles, seconds.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Sleep after a failed cycle before the next attempt, seconds.
    #[serde(default = "default_retry_delay_secs")]
    pub retry_delay_secs: u64,
    #[serde(default = "default_spi_clock_hz")]
    pub spi_clock_hz: u32,
    #[serde(default = "default_voltage_channel")]
    pub voltage_channel: u8,
    #[serde(default = "default_current_channel")]
    pub current_channel: u8,
}

fn default_sample_count() -> u32 {
    1000
}

fn default_interval_secs() -> u64 {
    1
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_spi_clock_hz() -> u32 {
    1_350_000
}

fn default_voltage_channel() -> u8 {
    1
}

fn default_current_channel() -> u8 {
    0
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            sample_count: default_sample_count(),
            interval_secs: default_interval_secs(),
            retry_delay_secs: default_retry_delay_secs(),
            spi_clock_hz: default_spi_clock_hz(),
            voltage_channel: default_voltage_channel(),
            current_channel: default_current_channel(),
        }
    }
}

/// Multipliers from a centered raw ADC unit to physical volts/amps.
/// Tuned against a multimeter for the deployed transformer and CT clamp.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Calibration {
    pub voltage_scale: f64,
    pub current_scale: f64,
}

impl Config {
    /// Load YAML from disk, substitute $(VAR)/${VAR} with env vars, then parse.
    /// Afterwards, if DATABASE_URL env is set, override `database.url`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let raw = std::fs::read_to_string(path)?;
        let expanded = expand_env_placeholders(&raw)?;
        let mut cfg: Self = serde_yaml::from_str(&expanded)?;

        if let Ok(url) = std::env::var("DATABASE_URL") {
            cfg.database.url = url;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), anyhow::Error> {
        anyhow::ensure!(
            self.calibration.voltage_scale > 0.0,
            "calibration.voltage_scale must be positive"
        );
        anyhow::ensure!(
            self.calibration.current_scale > 0.0,
            "calibration.current_scale must be positive"
        );
        anyhow::ensure!(
            self.sampler.sample_count >= 1,
            "sampler.sample_count must be at least 1"
        );
        anyhow::ensure!(
            self.sampler.voltage_channel <= 7 && self.sampler.current_channel <= 7,
            "sampler channels must be MCP3008 channels (0-7)"
        );
        anyhow::ensure!(
            self.sampler.voltage_channel != self.sampler.current_channel,
            "sampler voltage and current channels must differ"
        );
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
        let expanded = expand_env_placeholders(yaml)?;
        let cfg: Config = serde_yaml::from_str(&expanded)?;
        cfg.validate()?;
        Ok(cfg)
    }

    const MINIMAL: &str = r#"
database:
  url: postgres://localhost/energy
calibration:
  voltage_scale: 560.0
  current_scale: 60.6
"#;

    #[test]
    fn minimal_config_gets_sampler_defaults() {
        let cfg = parse(MINIMAL).unwrap();
        assert_eq!(cfg.sampler.sample_count, 1000);
        assert_eq!(cfg.sampler.interval_secs, 1);
        assert_eq!(cfg.sampler.retry_delay_secs, 5);
        assert_eq!(cfg.sampler.spi_clock_hz, 1_350_000);
        assert_eq!(cfg.sampler.voltage_channel, 1);
        assert_eq!(cfg.sampler.current_channel, 0);
    }

    #[test]
    fn rejects_non_positive_calibration() {
        let yaml = r#"
database:
  url: postgres://localhost/energy
calibration:
  voltage_scale: 0.0
  current_scale: 60.6
"#;
        let err = parse(yaml).unwrap_err().to_string();
        assert!(err.contains("voltage_scale"), "got: {err}");
    }

    #[test]
    fn rejects_identical_channels() {
        let yaml = r#"
database:
  url: postgres://localhost/energy
sampler:
  voltage_channel: 0
  current_channel: 0
calibration:
  voltage_scale: 560.0
  current_scale: 60.6
"#;
        assert!(parse(yaml).is_err());
    }

    #[test]
    fn expands_env_placeholders() {
        std::env::set_var("SAMPLER_TEST_DB_URL", "postgres://host/db");
        let expanded = expand_env_placeholders("url: $(SAMPLER_TEST_DB_URL)").unwrap();
        assert_eq!(expanded, "url: postgres://host/db");

        let expanded = expand_env_placeholders("url: ${SAMPLER_TEST_DB_URL}").unwrap();
        assert_eq!(expanded, "url: postgres://host/db");
    }

    #[test]
    fn dollar_escape_and_literal_pass_through() {
        assert_eq!(expand_env_placeholders("cost: $$12").unwrap(), "cost: $12");
        assert_eq!(expand_env_placeholders("a $ b").unwrap(), "a $ b");
    }

    #[test]
    fn missing_env_var_is_an_error() {
        let err = expand_env_placeholders("url: $(SAMPLER_TEST_NO_SUCH_VAR)").unwrap_err();
        assert!(err.to_string().contains("SAMPLER_TEST_NO_SUCH_VAR"));
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        assert!(expand_env_placeholders("url: $(OOPS").is_err());
    }
}
