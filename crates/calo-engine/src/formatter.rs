//! Dual-view insight formatting.
//!
//! One canonical assessment (status, risks, actions) is projected twice: a
//! plain headline for residents and a detailed view for engineers. Neither
//! projection computes anything the other relies on.

use crate::config::EngineConfig;
use crate::detector::{evaluate_all, RuleEvaluation};
use crate::matcher::matched_protocol_names;
use calo_types::{
    classify, AnalysisResult, CitizenView, ConfidenceAggregate, EngineerView,
    NormalizedSignalSet, RawSignalSummary, RiskRecord, SignalKind, Status, Thresholds,
};
use std::fmt::Write;

const NO_RISKS: &str = "No significant risks detected";
const MONITORING: &str = "Continued monitoring recommended. ";
const NO_ACTIONS: &str = "No urgent actions required at this time.";

/// Assemble the analysis result for one request.
pub fn format(
    risks: &[RiskRecord],
    actions: &[String],
    signals: &NormalizedSignalSet,
    config: &EngineConfig,
) -> AnalysisResult {
    let max_tier = risks.iter().map(RiskRecord::severity_tier).max();
    let (status, theme) = classify(max_tier);
    let headline = headline(status, risks.len());

    AnalysisResult::new(
        status,
        headline.clone(),
        details(risks),
        future(actions),
        CitizenView::new(headline, theme),
        engineer_view(risks, actions, signals, config),
    )
}

/// Resident-facing headline for a status.
pub fn headline(status: Status, risk_count: usize) -> String {
    match status {
        Status::Critical => format!("Alert: {risk_count} risk(s) detected"),
        Status::Warning => format!("Advisory: {risk_count} risk(s) require attention"),
        Status::Healthy => "City systems normal - no anomalies detected".to_string(),
    }
}

pub fn engineer_view(
    risks: &[RiskRecord],
    actions: &[String],
    signals: &NormalizedSignalSet,
    config: &EngineConfig,
) -> EngineerView {
    let thresholds = config.thresholds();
    EngineerView::new(
        aggregate_confidence(risks, thresholds.confidence_aggregate),
        risks.iter().map(|r| r.name().to_string()).collect(),
        raw_signal_summary(signals),
        logic_trace(risks, signals, config),
        actions.to_vec(),
    )
}

/// Overall confidence. Zero when nothing was detected.
pub fn aggregate_confidence(risks: &[RiskRecord], aggregate: ConfidenceAggregate) -> f64 {
    if risks.is_empty() {
        return 0.0;
    }
    let confidences = risks.iter().map(RiskRecord::confidence);
    let value = match aggregate {
        ConfidenceAggregate::Max => confidences.fold(0.0, f64::max),
        ConfidenceAggregate::Mean => confidences.sum::<f64>() / risks.len() as f64,
    };
    value.clamp(0.0, 1.0)
}

pub fn raw_signal_summary(signals: &NormalizedSignalSet) -> RawSignalSummary {
    RawSignalSummary {
        weather: round2(
            signals
                .score(SignalKind::RainfallMm)
                .max(signals.score(SignalKind::TemperatureC)),
        ),
        complaints: round2(signals.score(SignalKind::ComplaintCount)),
        trends: round2(signals.score(SignalKind::TrendIndex)),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One line per risk, each followed by its contributing factors.
fn details(risks: &[RiskRecord]) -> Vec<String> {
    if risks.is_empty() {
        return vec![NO_RISKS.to_string()];
    }
    let mut lines = Vec::new();
    for risk in risks {
        lines.push(format!(
            "{} (Severity: {:.2}, tier {})",
            risk.name(),
            risk.confidence(),
            risk.severity_tier()
        ));
        lines.extend(risk.id().factors().iter().map(|f| f.to_string()));
    }
    lines
}

fn future(actions: &[String]) -> String {
    if actions.is_empty() {
        format!("{MONITORING}{NO_ACTIONS}")
    } else {
        let first: Vec<&str> = actions.iter().take(2).map(String::as_str).collect();
        format!("{MONITORING}Recommended actions: {}", first.join(", "))
    }
}

/// Deterministic explanation of every rule comparison behind the result.
pub fn logic_trace(
    risks: &[RiskRecord],
    signals: &NormalizedSignalSet,
    config: &EngineConfig,
) -> String {
    let thresholds = config.thresholds();
    let mut trace = String::from("Rule evaluation:\n");

    for evaluation in evaluate_all(signals, thresholds) {
        trace_rule(&mut trace, &evaluation);
    }
    trace_signal_notes(&mut trace, signals);
    trace_thresholds(&mut trace, thresholds);

    let protocols = matched_protocol_names(risks, config.catalog());
    if !protocols.is_empty() {
        let _ = writeln!(trace, "Matched protocols: {}", protocols.join(", "));
    }
    trace.trim_end().to_string()
}

fn trace_rule(trace: &mut String, evaluation: &RuleEvaluation) {
    let verdict = if evaluation.fired() { "FIRED" } else { "not fired" };
    let _ = writeln!(
        trace,
        "- {} ({}): {}",
        evaluation.kind.id(),
        evaluation.kind.name(),
        verdict
    );
    for check in &evaluation.checks {
        match check.floor {
            Some(floor) => {
                let op = if check.met() { ">=" } else { "<" };
                let _ = writeln!(
                    trace,
                    "    {} stress {:.2} (weight {:.1}) {} floor {:.2}",
                    check.signal, check.stress, check.weight, op, floor
                );
            }
            None => {
                let _ = writeln!(
                    trace,
                    "    {} stress {:.2} (weight {:.1})",
                    check.signal, check.stress, check.weight
                );
            }
        }
    }
    let op = if evaluation.confidence >= evaluation.threshold {
        ">="
    } else {
        "<"
    };
    let _ = writeln!(
        trace,
        "    confidence {:.2} {} threshold {:.2}",
        evaluation.confidence, op, evaluation.threshold
    );
}

fn trace_signal_notes(trace: &mut String, signals: &NormalizedSignalSet) {
    let unavailable = signals.unavailable();
    if !unavailable.is_empty() {
        let names: Vec<&str> = unavailable.iter().map(SignalKind::as_str).collect();
        let _ = writeln!(
            trace,
            "Unavailable signals (scored 0.00): {}",
            names.join(", ")
        );
    }
    for (kind, from) in signals.derived() {
        let _ = writeln!(trace, "Derived signal: {kind} mirrors {from}");
    }
    if !signals.unrecognized().is_empty() {
        let _ = writeln!(
            trace,
            "Ignored unrecognized signals: {}",
            signals.unrecognized().join(", ")
        );
    }
}

fn trace_thresholds(trace: &mut String, thresholds: &Thresholds) {
    let _ = writeln!(
        trace,
        "Scales: rainfall {} mm, temperature {}-{} C, complaints {}, trend {}",
        thresholds.rainfall_critical_mm,
        thresholds.temp_neutral_c,
        thresholds.temp_max_c,
        thresholds.complaints_critical,
        thresholds.trend_scale
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::detect;
    use calo_types::{Availability, RiskKind, VisualTheme};

    fn config() -> EngineConfig {
        EngineConfig::with_defaults().unwrap()
    }

    #[test]
    fn empty_assessment_is_healthy() {
        let signals = NormalizedSignalSet::empty();
        let result = format(&[], &[], &signals, &config());

        assert_eq!(result.status(), Status::Healthy);
        assert_eq!(result.citizen_view().visual_theme(), VisualTheme::Normal);
        assert_eq!(
            result.summary(),
            "City systems normal - no anomalies detected"
        );
        assert_eq!(result.details(), [NO_RISKS.to_string()]);
        assert_eq!(
            result.future(),
            "Continued monitoring recommended. No urgent actions required at this time."
        );
        assert_eq!(result.engineer_view().confidence_score(), 0.0);
        assert!(result.engineer_view().detected_risks().is_empty());
        assert!(result.engineer_view().recommended_actions().is_empty());
    }

    #[test]
    fn medium_risk_is_an_advisory() {
        let risks = [RiskRecord::new(RiskKind::FloodRisk, 0.55)];
        let actions = vec!["Clear storm drains and culverts".to_string()];
        let result = format(&risks, &actions, &NormalizedSignalSet::empty(), &config());

        assert_eq!(result.status(), Status::Warning);
        assert_eq!(result.citizen_view().visual_theme(), VisualTheme::Warning);
        assert_eq!(result.summary(), "Advisory: 1 risk(s) require attention");
        assert_eq!(result.citizen_view().status_headline(), result.summary());
        assert_eq!(
            result.details(),
            [
                "Urban Flash Flood (Severity: 0.55, tier Medium)",
                "Heavy Rainfall Forecast",
                "Drainage Complaints",
            ]
        );
        assert_eq!(
            result.future(),
            "Continued monitoring recommended. Recommended actions: Clear storm drains and culverts"
        );
    }

    #[test]
    fn high_tier_is_an_alert() {
        let risks = [
            RiskRecord::new(RiskKind::BioRisk, 0.45),
            RiskRecord::new(RiskKind::HeatRisk, 0.9),
        ];
        let result = format(&risks, &[], &NormalizedSignalSet::empty(), &config());
        assert_eq!(result.status(), Status::Critical);
        assert_eq!(result.summary(), "Alert: 2 risk(s) detected");
        assert_eq!(
            result.engineer_view().detected_risks(),
            ["Vector-Borne Disease Cluster", "Severe Heatwave"]
        );
    }

    #[test]
    fn future_lists_first_two_actions() {
        let actions: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        assert_eq!(
            future(&actions),
            "Continued monitoring recommended. Recommended actions: a, b"
        );
    }

    #[test]
    fn confidence_aggregation() {
        let risks = [
            RiskRecord::new(RiskKind::BioRisk, 0.5),
            RiskRecord::new(RiskKind::FloodRisk, 0.9),
        ];
        assert_eq!(aggregate_confidence(&risks, ConfidenceAggregate::Max), 0.9);
        assert!((aggregate_confidence(&risks, ConfidenceAggregate::Mean) - 0.7).abs() < 1e-12);
        assert_eq!(aggregate_confidence(&[], ConfidenceAggregate::Mean), 0.0);
    }

    #[test]
    fn raw_signals_are_rounded() {
        let signals = NormalizedSignalSet::from_scores([
            (SignalKind::RainfallMm, 0.333),
            (SignalKind::TemperatureC, 0.456),
            (SignalKind::ComplaintCount, 0.125),
            (SignalKind::TrendIndex, 0.999),
        ]);
        let summary = raw_signal_summary(&signals);
        assert_eq!(summary.weather, 0.46);
        assert_eq!(summary.complaints, 0.13);
        assert_eq!(summary.trends, 1.0);
    }

    #[test]
    fn trace_explains_every_rule() {
        let mut signals = NormalizedSignalSet::from_scores([
            (SignalKind::RainfallMm, 1.0),
            (SignalKind::ComplaintCount, 1.0),
            (SignalKind::TrendIndex, 0.9),
        ]);
        signals.record(
            SignalKind::DrainageComplaintCount,
            1.0,
            Availability::Derived(SignalKind::ComplaintCount),
        );
        signals.note_unrecognized("aqi");
        let config = config();
        let risks = detect(&signals, config.thresholds());
        let trace = logic_trace(&risks, &signals, &config);

        for kind in RiskKind::ALL {
            assert!(trace.contains(kind.id()), "trace lacks {kind}");
        }
        assert!(trace.contains("- BIO_RISK (Vector-Borne Disease Cluster): FIRED"));
        assert!(trace.contains("- HEAT_RISK (Severe Heatwave): not fired"));
        assert!(trace.contains("confidence 0.96 >= threshold 0.40"));
        assert!(trace.contains("Unavailable signals (scored 0.00): temperature_c"));
        assert!(trace.contains("Derived signal: drainage_complaint_count mirrors complaint_count"));
        assert!(trace.contains("Ignored unrecognized signals: aqi"));
        assert!(trace.contains("Matched protocols: Vector Control Protocol"));
    }

    #[test]
    fn trace_is_deterministic() {
        let signals = NormalizedSignalSet::from_scores([(SignalKind::TemperatureC, 0.8)]);
        let config = config();
        let risks = detect(&signals, config.thresholds());
        assert_eq!(
            logic_trace(&risks, &signals, &config),
            logic_trace(&risks, &signals, &config)
        );
    }
}
