use calo_types::ThresholdViolation;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems. Raised at startup, never while analyzing.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] ThresholdViolation),

    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Protocol catalog problems. Raised at startup, never while analyzing.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read protocol catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed protocol catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate protocol id: {0}")]
    DuplicateProtocol(String),

    #[error("protocol {0} has no actions")]
    EmptyActions(String),

    #[error("protocol {0} matches no risk ids")]
    NoRiskIds(String),
}

/// Errors from building the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_configuration_names_the_field() {
        let err = ConfigError::from(ThresholdViolation {
            field: "heat_risk_threshold",
            value: 1.5,
            reason: "must lie in (0, 1]",
        });
        let msg = err.to_string();
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("heat_risk_threshold"));
    }

    #[test]
    fn engine_error_is_transparent() {
        let err = EngineError::from(CatalogError::DuplicateProtocol("P-FLOOD".into()));
        assert_eq!(err.to_string(), "duplicate protocol id: P-FLOOD");
    }
}
