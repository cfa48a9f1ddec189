//! Configuration for the generic type instantiation engine.
//!
//! Configuration is read-only once a run starts. It is loaded from TOML (`evo.toml`) or built in
//! code via [`GenerationConfig::default`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Once;

use thiserror::Error;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod diagnostics;
mod schema;
mod validation;

pub use diagnostics::{ConfigValidationError, ConfigWarning, ValidationDiagnostics};
pub use schema::json_schema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct GenerationConfig {
    /// Rank bias `B` used when picking among ordered candidates.
    ///
    /// Values close to 1 pick almost uniformly; 2 strongly favours the front of the list.
    #[serde(default = "GenerationConfig::default_rank_bias")]
    #[schemars(schema_with = "rank_bias_schema")]
    pub rank_bias: f64,

    /// Seed for the candidate manager's random source. When unset, a seed is drawn from the OS.
    #[serde(default)]
    pub seed: Option<u64>,

    #[serde(default)]
    pub functional_mocking: FunctionalMockingConfig,

    /// Candidates registered when a manager is created and again after every reset.
    #[serde(default = "GenerationConfig::default_candidates")]
    pub default_candidates: Vec<DefaultCandidate>,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// `(1, 2]`: the lower end is exclusive, which `range(min = ..)` cannot express.
fn rank_bias_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
    let mut schema = <f64 as JsonSchema>::json_schema(gen).into_object();
    let number = schema.number();
    number.exclusive_minimum = Some(1.0);
    number.maximum = Some(2.0);
    schema.into()
}

impl GenerationConfig {
    fn default_rank_bias() -> f64 {
        1.7
    }

    fn default_candidates() -> Vec<DefaultCandidate> {
        [
            ("java.lang.Object", 0),
            ("java.lang.String", 1),
            ("java.lang.Integer", 1),
            ("java.util.LinkedList", 2),
            ("java.util.ArrayList", 2),
        ]
        .into_iter()
        .map(|(name, priority)| DefaultCandidate {
            name: name.to_owned(),
            priority,
        })
        .collect()
    }

    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::load_from_str(&text)?;
        tracing::debug!(
            target = "evo.config",
            path = %path.display(),
            rank_bias = config.rank_bias,
            "loaded generation config"
        );
        Ok(config)
    }

    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            rank_bias: Self::default_rank_bias(),
            seed: None,
            functional_mocking: FunctionalMockingConfig::default(),
            default_candidates: Self::default_candidates(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Controls whether abstract types may be satisfied by a synthesized mock at construction time.
///
/// The switch itself belongs to test construction; the candidate manager only reads it to decide
/// whether abstract types are worth registering as candidates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct FunctionalMockingConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Probability of replacing a construction with a functional mock.
    #[serde(default)]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub probability: f64,
}

impl FunctionalMockingConfig {
    pub fn is_active(&self) -> bool {
        self.enabled && self.probability > 0.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct DefaultCandidate {
    /// Binary class name, e.g. `java.util.ArrayList`.
    pub name: String,
    #[serde(default)]
    pub priority: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
#[schemars(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level, or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// The configured level as filter directives. Bare level names are case-insensitive and
    /// `warning` means `warn`; anything else is passed through as a directive string.
    pub(crate) fn level_directives(&self) -> String {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

        let level = self.level.trim();
        if level.is_empty() {
            return Self::default_level();
        }
        if level.eq_ignore_ascii_case("warning") {
            return "warn".to_owned();
        }
        LEVELS
            .iter()
            .find(|name| level.eq_ignore_ascii_case(name))
            .map_or_else(|| level.to_owned(), |name| (*name).to_owned())
    }

    /// Effective filter: the configured level, extended by `RUST_LOG` when it is set.
    ///
    /// An unparsable combination falls back to the configured level alone, then to `info`.
    pub fn env_filter(&self) -> EnvFilter {
        let level = self.level_directives();
        let directives = match std::env::var("RUST_LOG") {
            Ok(extra) if !extra.trim().is_empty() => format!("{level},{}", extra.trim()),
            _ => level.clone(),
        };
        EnvFilter::try_new(&directives)
            .or_else(|_| EnvFilter::try_new(&level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

static TRACING_INIT: Once = Once::new();

/// Install a global `tracing` subscriber writing to stderr.
///
/// Safe to call multiple times; only the first call installs a subscriber. If another subscriber
/// is already installed globally this is a no-op.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();
        let result = if config.json {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };
        if result.is_ok() {
            tracing::debug!(target = "evo.config", json = config.json, "tracing initialized");
        }
    });
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // The default `Display` includes a source snippet; keep just the message.
        ConfigError::Toml(err.message().to_owned())
    }
}
