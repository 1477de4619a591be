use crate::signal::SignalKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// The closed set of risk scenarios the detector knows about.
///
/// Adding a scenario means adding a variant here, one rule in the detector
/// and one catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskKind {
    /// Vector-borne disease cluster (dengue, malaria).
    BioRisk,
    /// Urban flash flood.
    FloodRisk,
    /// Severe heatwave.
    HeatRisk,
}

impl RiskKind {
    /// Evaluation order of the detector.
    pub const ALL: [RiskKind; 3] = [RiskKind::BioRisk, RiskKind::FloodRisk, RiskKind::HeatRisk];

    pub fn id(&self) -> &'static str {
        match self {
            RiskKind::BioRisk => "BIO_RISK",
            RiskKind::FloodRisk => "FLOOD_RISK",
            RiskKind::HeatRisk => "HEAT_RISK",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RiskKind::BioRisk => "Vector-Borne Disease Cluster",
            RiskKind::FloodRisk => "Urban Flash Flood",
            RiskKind::HeatRisk => "Severe Heatwave",
        }
    }

    /// Contributing factors as shown to operators, in weight order.
    pub fn factors(&self) -> &'static [&'static str] {
        match self {
            RiskKind::BioRisk => &[
                "Rainfall/Humidity",
                "Sanitation Complaints",
                "Health Search Trends",
            ],
            RiskKind::FloodRisk => &["Heavy Rainfall Forecast", "Drainage Complaints"],
            RiskKind::HeatRisk => &["High Temperatures"],
        }
    }

    /// Contributing signals and their weights. Weights sum to 1.0.
    pub fn weights(&self) -> &'static [(SignalKind, f64)] {
        match self {
            RiskKind::BioRisk => &[
                (SignalKind::RainfallMm, 0.3),
                (SignalKind::ComplaintCount, 0.3),
                (SignalKind::TrendIndex, 0.4),
            ],
            RiskKind::FloodRisk => &[
                (SignalKind::RainfallMm, 0.6),
                (SignalKind::DrainageComplaintCount, 0.4),
            ],
            RiskKind::HeatRisk => &[(SignalKind::TemperatureC, 1.0)],
        }
    }

    pub fn contributing_signals(&self) -> BTreeSet<SignalKind> {
        self.weights().iter().map(|(kind, _)| *kind).collect()
    }
}

impl fmt::Display for RiskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for RiskKind {
    type Err = UnknownRisk;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.id() == s)
            .ok_or_else(|| UnknownRisk(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk id: {0}")]
pub struct UnknownRisk(pub String);

/// Severity tier derived from a confidence score through fixed cut-points.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SeverityTier {
    Low,
    Medium,
    High,
    Critical,
}

impl SeverityTier {
    /// Lowest confidence for [`SeverityTier::Medium`].
    pub const MEDIUM_FROM: f64 = 0.5;
    /// Lowest confidence for [`SeverityTier::High`].
    pub const HIGH_FROM: f64 = 0.7;
    /// Lowest confidence for [`SeverityTier::Critical`].
    pub const CRITICAL_FROM: f64 = 0.85;

    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= Self::CRITICAL_FROM {
            SeverityTier::Critical
        } else if confidence >= Self::HIGH_FROM {
            SeverityTier::High
        } else if confidence >= Self::MEDIUM_FROM {
            SeverityTier::Medium
        } else {
            SeverityTier::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityTier::Low => "Low",
            SeverityTier::Medium => "Medium",
            SeverityTier::High => "High",
            SeverityTier::Critical => "Critical",
        }
    }
}

impl fmt::Display for SeverityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A detected risk scenario. Immutable once built.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RiskRecord {
    id: RiskKind,
    name: String,
    confidence: f64,
    contributing_signals: BTreeSet<SignalKind>,
    severity_tier: SeverityTier,
}

impl RiskRecord {
    /// Build a record for `kind`. Confidence is clamped to [0.0, 1.0] and the
    /// tier follows from it.
    pub fn new(kind: RiskKind, confidence: f64) -> Self {
        let confidence = if confidence.is_finite() {
            confidence.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            id: kind,
            name: kind.name().to_string(),
            confidence,
            contributing_signals: kind.contributing_signals(),
            severity_tier: SeverityTier::from_confidence(confidence),
        }
    }

    pub fn id(&self) -> RiskKind {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn contributing_signals(&self) -> &BTreeSet<SignalKind> {
        &self.contributing_signals
    }

    pub fn severity_tier(&self) -> SeverityTier {
        self.severity_tier
    }
}
