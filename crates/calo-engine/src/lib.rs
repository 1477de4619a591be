#![deny(unsafe_code)]
//! # calo-engine
//!
//! Signal normalization and risk detection for municipal operations.
//!
//! Every request flows through four stateless stages:
//! - **Normalizer**: raw readings to stress scores in [0, 1]
//! - **Detector**: weighted rules with a conjunctive contribution floor
//! - **Matcher**: detected risks to ordered, deduplicated protocol actions
//! - **Formatter**: one assessment projected into citizen and engineer views
//!
//! [`RiskPipeline`] chains them over an immutable, shared [`EngineConfig`].

pub mod catalog;
pub mod config;
pub mod detector;
pub mod error;
pub mod formatter;
pub mod matcher;
pub mod narrator;
pub mod normalizer;
pub mod pipeline;

pub use catalog::ProtocolCatalog;
pub use config::{CatalogSettings, EngineConfig, EngineSettings, LoggingConfig};
pub use detector::{detect, evaluate, evaluate_all, RuleEvaluation, SignalCheck};
pub use error::{CatalogError, ConfigError, EngineError, Result};
pub use formatter::format;
pub use matcher::{match_protocols, FALLBACK_ACTION};
pub use narrator::TraceNarrator;
pub use normalizer::normalize;
pub use pipeline::RiskPipeline;
