//! Engine configuration
//!
//! Settings are layered: built-in defaults, then the named file, then
//! `CALO_`-prefixed environment variables using `__` between sections
//! (e.g. `CALO_THRESHOLDS__RAINFALL_CRITICAL_MM=60`).

use crate::catalog::ProtocolCatalog;
use crate::error::{ConfigError, Result};
use calo_types::Thresholds;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Everything read at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Normalization and detection thresholds
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Protocol catalog source
    #[serde(default)]
    pub catalog: CatalogSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            catalog: CatalogSettings::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Where protocols come from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSettings {
    /// JSON catalog to load instead of the built-in one
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl EngineSettings {
    /// Load settings, validating thresholds before returning.
    ///
    /// A named file must exist; without one only defaults and the
    /// environment apply.
    pub fn load(path: Option<&str>) -> std::result::Result<Self, ConfigError> {
        Self::load_layered(path, Self::environment())
    }

    /// `CALO_`-prefixed variables, `__` between sections.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("CALO")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    /// Layer defaults, then `path`, then `env`.
    pub fn load_layered(
        path: Option<&str>,
        env: config::Environment,
    ) -> std::result::Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&EngineSettings::default())?);

        if let Some(path) = path {
            debug!(path, "reading configuration file");
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(env);

        let settings: EngineSettings = builder.build()?.try_deserialize()?;
        settings.thresholds.validate()?;
        Ok(settings)
    }

    /// Resolve the catalog and freeze everything into an [`EngineConfig`].
    pub fn build(&self) -> Result<EngineConfig> {
        let catalog = match &self.catalog.path {
            Some(path) => ProtocolCatalog::load(path)?,
            None => ProtocolCatalog::builtin()?,
        };
        EngineConfig::new(self.thresholds.clone(), catalog)
    }
}

/// Validated, immutable engine configuration shared by every analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    thresholds: Thresholds,
    catalog: ProtocolCatalog,
}

impl EngineConfig {
    pub fn new(thresholds: Thresholds, catalog: ProtocolCatalog) -> Result<Self> {
        thresholds.validate().map_err(ConfigError::from)?;
        info!(
            protocols = catalog.len(),
            disease = thresholds.disease_risk_threshold,
            flood = thresholds.flood_risk_threshold,
            heat = thresholds.heat_risk_threshold,
            "engine configured"
        );
        Ok(Self {
            thresholds,
            catalog,
        })
    }

    /// Default thresholds with the built-in catalog.
    pub fn with_defaults() -> Result<Self> {
        Self::new(Thresholds::default(), ProtocolCatalog::builtin()?)
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn catalog(&self) -> &ProtocolCatalog {
        &self.catalog
    }
}
