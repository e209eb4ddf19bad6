use anyhow::Result;
use config::Config;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub expansion: ExpansionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// Years past the window end used as UNTIL when a rule has neither COUNT nor UNTIL.
    pub emergency_horizon_years: u32,
    /// Window length used when the caller gives no explicit window end.
    pub default_window_days: u32,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            emergency_horizon_years: DEFAULT_EMERGENCY_HORIZON_YEARS,
            default_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

pub const DEFAULT_EMERGENCY_HORIZON_YEARS: u32 = 2;
pub const DEFAULT_WINDOW_DAYS: u32 = 365;

impl Settings {
    /// ## Summary
    /// Loads configuration from `.env` file and environment variables into a `Settings`.
    /// Environment variables take precedence over `.env` file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        Ok(Config::builder()
            .set_default(
                "expansion.emergency_horizon_years",
                DEFAULT_EMERGENCY_HORIZON_YEARS,
            )?
            .set_default("expansion.default_window_days", DEFAULT_WINDOW_DAYS)?
            .set_default("logging.level", "info")?
            // Env file
            .add_source(
                config::Environment::with_prefix("KUNAI")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            .build()?
            .try_deserialize::<Settings>()?)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(
        horizon_years = settings.expansion.emergency_horizon_years,
        window_days = settings.expansion.default_window_days,
        "Configuration loaded"
    );
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn defaults_apply_without_sources() {
        let settings = Settings::load().expect("defaults should deserialize");
        assert!(settings.expansion.emergency_horizon_years >= 1);
        assert!(!settings.logging.level.is_empty());
    }

    #[test]
    fn expansion_config_default_matches_constants() {
        let config = ExpansionConfig::default();
        assert_eq!(config.emergency_horizon_years, 2);
        assert_eq!(config.default_window_days, 365);
    }
}
