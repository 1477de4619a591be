use crate::risk::SeverityTier;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Overall city status, the legacy flat field of the contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Healthy,
    Warning,
    Critical,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Healthy => f.write_str("Healthy"),
            Status::Warning => f.write_str("Warning"),
            Status::Critical => f.write_str("Critical"),
        }
    }
}

/// Theme the citizen frontend renders with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum VisualTheme {
    Normal,
    Caution,
    Warning,
    Critical,
}

/// Map the highest detected tier to the status and the theme.
///
/// Both output fields are derived here and nowhere else.
pub fn classify(max_tier: Option<SeverityTier>) -> (Status, VisualTheme) {
    match max_tier {
        None => (Status::Healthy, VisualTheme::Normal),
        Some(SeverityTier::Low) => (Status::Warning, VisualTheme::Caution),
        Some(SeverityTier::Medium) => (Status::Warning, VisualTheme::Warning),
        Some(SeverityTier::High) | Some(SeverityTier::Critical) => {
            (Status::Critical, VisualTheme::Critical)
        }
    }
}

/// Simplified projection for residents.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CitizenView {
    status_headline: String,
    visual_theme: VisualTheme,
}

impl CitizenView {
    pub fn new(status_headline: impl Into<String>, visual_theme: VisualTheme) -> Self {
        Self {
            status_headline: status_headline.into(),
            visual_theme,
        }
    }

    pub fn status_headline(&self) -> &str {
        &self.status_headline
    }

    pub fn visual_theme(&self) -> VisualTheme {
        self.visual_theme
    }
}

/// Normalized signal snapshot shown to engineers, rounded to two decimals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSignalSummary {
    pub weather: f64,
    pub complaints: f64,
    pub trends: f64,
}

/// Detailed projection for engineers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EngineerView {
    confidence_score: f64,
    detected_risks: Vec<String>,
    raw_signals: RawSignalSummary,
    logic_trace: String,
    recommended_actions: Vec<String>,
}

impl EngineerView {
    pub fn new(
        confidence_score: f64,
        detected_risks: Vec<String>,
        raw_signals: RawSignalSummary,
        logic_trace: impl Into<String>,
        recommended_actions: Vec<String>,
    ) -> Self {
        Self {
            confidence_score: if confidence_score.is_finite() {
                confidence_score.clamp(0.0, 1.0)
            } else {
                0.0
            },
            detected_risks,
            raw_signals,
            logic_trace: logic_trace.into(),
            recommended_actions,
        }
    }

    pub fn confidence_score(&self) -> f64 {
        self.confidence_score
    }

    pub fn detected_risks(&self) -> &[String] {
        &self.detected_risks
    }

    pub fn raw_signals(&self) -> &RawSignalSummary {
        &self.raw_signals
    }

    pub fn logic_trace(&self) -> &str {
        &self.logic_trace
    }

    pub fn recommended_actions(&self) -> &[String] {
        &self.recommended_actions
    }
}

/// The engine's sole output artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    status: Status,
    summary: String,
    details: Vec<String>,
    future: String,
    citizen_view: CitizenView,
    engineer_view: EngineerView,
}

impl AnalysisResult {
    pub fn new(
        status: Status,
        summary: impl Into<String>,
        details: Vec<String>,
        future: impl Into<String>,
        citizen_view: CitizenView,
        engineer_view: EngineerView,
    ) -> Self {
        Self {
            status,
            summary: summary.into(),
            details,
            future: future.into(),
            citizen_view,
            engineer_view,
        }
    }

    /// Same result with a rewritten logic trace. Nothing else changes.
    pub fn with_logic_trace(mut self, logic_trace: impl Into<String>) -> Self {
        self.engineer_view.logic_trace = logic_trace.into();
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    pub fn future(&self) -> &str {
        &self.future
    }

    pub fn citizen_view(&self) -> &CitizenView {
        &self.citizen_view
    }

    pub fn engineer_view(&self) -> &EngineerView {
        &self.engineer_view
    }
}
