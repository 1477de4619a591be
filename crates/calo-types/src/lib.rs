#![deny(unsafe_code)]
//! # calo-types
//!
//! Shared data model of the CALO risk engine:
//!
//! - **Signals**: [`RawSignalSet`] as handed over by data loaders and the
//!   [`NormalizedSignalSet`] of stress scores in [0, 1]
//! - **Risks**: the closed [`RiskKind`] set and immutable [`RiskRecord`]s
//! - **Protocols**: catalog entries mapping risk ids to ordered actions
//! - **Analysis**: the dual-view [`AnalysisResult`] contract
//! - **Thresholds**: normalization and detection configuration

pub mod analysis;
pub mod protocol;
pub mod risk;
pub mod signal;
pub mod thresholds;

pub use analysis::{
    classify, AnalysisResult, CitizenView, EngineerView, RawSignalSummary, Status, VisualTheme,
};
pub use protocol::Protocol;
pub use risk::{RiskKind, RiskRecord, SeverityTier, UnknownRisk};
pub use signal::{
    Availability, NormalizedSignalSet, RawSignalSet, RawValue, SignalKind, UnknownSignal, Unreadable,
};
pub use thresholds::{ConfidenceAggregate, ThresholdViolation, Thresholds};
