//! Application configuration structs
//!
//! Values are layered: built-in defaults, then an optional `config/spaces`
//! file (any format the `config` crate understands), then `SPACES__*`
//! environment variables, e.g. `SPACES__DATABASE__URL`.

use config::{Config, ConfigBuilder, File, builder::DefaultState};
use serde::Deserialize;
use spaces_core::{ModerationPolicy, RestraintKind};

const ENV_PREFIX: &str = "SPACES";
const ENV_SEPARATOR: &str = "__";
const CONFIG_FILE: &str = "config/spaces";

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseConfig,
    pub snowflake: SnowflakeConfig,
    pub moderation: ModerationConfig,
    pub telemetry: TelemetryConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub acquire_timeout_secs: u64,
}

/// Snowflake ID generator configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SnowflakeConfig {
    pub worker_id: u16,
}

/// Which restraint kinds deny posting
#[derive(Debug, Clone, Deserialize)]
pub struct ModerationConfig {
    pub posting_blocked_kinds: Vec<String>,
}

/// Log output settings
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    pub level: String,
    pub json: bool,
}

impl AppConfig {
    /// Load configuration from defaults, `config/spaces.*` and `SPACES__*` variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_builder(Self::with_sources(Self::defaults()?))
    }

    /// Layer the config file and the environment over `builder`
    pub fn with_sources(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        builder
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("moderation.posting_blocked_kinds")
                    .try_parsing(true),
            )
    }

    /// Finish a builder that already carries the defaults
    pub fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Builder seeded with every default value
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let kinds: Vec<&str> = RestraintKind::ALL.iter().map(|k| k.as_str()).collect();

        Ok(Config::builder()
            .set_default("app.name", "spaces")?
            .set_default("app.env", "development")?
            .set_default("database.max_connections", 20)?
            .set_default("database.min_connections", 2)?
            .set_default("database.acquire_timeout_secs", 5)?
            .set_default("snowflake.worker_id", 0)?
            .set_default("moderation.posting_blocked_kinds", kinds)?
            .set_default("telemetry.level", "info")?
            .set_default("telemetry.json", false)?)
    }

    /// Posting policy built from `moderation.posting_blocked_kinds`
    pub fn moderation_policy(&self) -> Result<ModerationPolicy, ConfigError> {
        let kinds = self
            .moderation
            .posting_blocked_kinds
            .iter()
            .map(|raw| {
                raw.parse::<RestraintKind>().map_err(|e| {
                    ConfigError::InvalidValue("moderation.posting_blocked_kinds", e.to_string())
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ModerationPolicy::new(kinds))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.trim().is_empty() {
            return Err(ConfigError::MissingVar("database.url"));
        }
        if self.snowflake.worker_id >= 1024 {
            return Err(ConfigError::InvalidValue(
                "snowflake.worker_id",
                format!("{} is not below 1024", self.snowflake.worker_id),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::InvalidValue(
                "database.min_connections",
                "greater than database.max_connections".to_string(),
            ));
        }
        self.moderation_policy().map(|_| ())
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Missing required setting: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        let builder = AppConfig::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        AppConfig::from_builder(builder)
    }

    #[test]
    fn test_environment_is_production() {
        assert!(!Environment::Development.is_production());
        assert!(!Environment::Staging.is_production());
        assert!(Environment::Production.is_production());
        assert!(Environment::Development.is_development());
    }

    #[test]
    fn test_defaults_fill_everything_but_url() {
        let config = from_toml("[database]\nurl = \"postgres://localhost/spaces\"").unwrap();

        assert_eq!(config.app.name, "spaces");
        assert_eq!(config.app.env, Environment::Development);
        assert_eq!(config.database.max_connections, 20);
        assert_eq!(config.snowflake.worker_id, 0);
        assert_eq!(config.telemetry.level, "info");
        assert!(!config.telemetry.json);

        let policy = config.moderation_policy().unwrap();
        assert_eq!(policy.posting_blocked().len(), 3);
        assert!(RestraintKind::ALL.iter().all(|k| policy.blocks_posting(*k)));
    }

    #[test]
    fn test_missing_url_is_an_error() {
        assert!(from_toml("").is_err());
        assert!(matches!(
            from_toml("[database]\nurl = \"  \""),
            Err(ConfigError::MissingVar("database.url"))
        ));
    }

    #[test]
    fn test_posting_blocked_kinds_override() {
        let config = from_toml(
            "[database]\nurl = \"postgres://x\"\n[moderation]\nposting_blocked_kinds = [\"mute\"]",
        )
        .unwrap();

        let policy = config.moderation_policy().unwrap();
        assert!(policy.blocks_posting(RestraintKind::Mute));
        assert!(!policy.blocks_posting(RestraintKind::Ban));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let result = from_toml(
            "[database]\nurl = \"postgres://x\"\n[moderation]\nposting_blocked_kinds = [\"shadowban\"]",
        );
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue("moderation.posting_blocked_kinds", _))
        ));
    }

    #[test]
    fn test_worker_id_range() {
        let result = from_toml("[database]\nurl = \"postgres://x\"\n[snowflake]\nworker_id = 1024");
        assert!(matches!(result, Err(ConfigError::InvalidValue("snowflake.worker_id", _))));
    }
}
