use crate::config::EngineConfig;
use crate::detector::detect;
use crate::formatter::format;
use crate::matcher::match_protocols;
use crate::narrator::TraceNarrator;
use crate::normalizer::normalize;
use calo_types::{AnalysisResult, RawSignalSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Runs normalize, detect, match and format for each request.
///
/// Holds only shared, read-only configuration, so one pipeline can serve any
/// number of threads at once.
#[derive(Clone)]
pub struct RiskPipeline {
    config: Arc<EngineConfig>,
    narrator: Option<Arc<dyn TraceNarrator>>,
}

impl RiskPipeline {
    pub fn new(config: Arc<EngineConfig>) -> Self {
        Self {
            config,
            narrator: None,
        }
    }

    /// Install a narrator that may rewrite the logic trace.
    pub fn with_narrator(mut self, narrator: Arc<dyn TraceNarrator>) -> Self {
        self.narrator = Some(narrator);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one snapshot of raw city signals. Never fails.
    pub fn analyze(&self, raw: &RawSignalSet) -> AnalysisResult {
        let thresholds = self.config.thresholds();

        let signals = normalize(raw, thresholds);
        let risks = detect(&signals, thresholds);
        let actions = match_protocols(&risks, self.config.catalog());
        let result = format(&risks, &actions, &signals, &self.config);

        info!(
            status = %result.status(),
            risks = risks.len(),
            actions = actions.len(),
            confidence = result.engineer_view().confidence_score(),
            unavailable = signals.unavailable().len(),
            "analysis complete"
        );

        self.narrate(result)
    }

    fn narrate(&self, result: AnalysisResult) -> AnalysisResult {
        let Some(narrator) = &self.narrator else {
            return result;
        };
        match narrator.narrate(&result) {
            Some(trace) if !trace.trim().is_empty() => result.with_logic_trace(trace),
            _ => {
                debug!("narrator declined, keeping deterministic trace");
                result
            }
        }
    }
}

impl std::fmt::Debug for RiskPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskPipeline")
            .field("config", &self.config)
            .field("narrator", &self.narrator.is_some())
            .finish()
    }
}
