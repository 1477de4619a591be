//! End-to-end scenarios: raw city signals through the full pipeline.

use calo_engine::{EngineConfig, ProtocolCatalog, RiskPipeline, TraceNarrator};
use calo_types::{AnalysisResult, RawSignalSet, Status, Thresholds, VisualTheme};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn pipeline_with(thresholds: Thresholds) -> RiskPipeline {
    let config = EngineConfig::new(thresholds, ProtocolCatalog::builtin().unwrap()).unwrap();
    RiskPipeline::new(Arc::new(config))
}

fn pipeline() -> RiskPipeline {
    pipeline_with(Thresholds::default())
}

fn sorted_keys(value: &Value) -> Vec<String> {
    let mut keys: Vec<String> = value
        .as_object()
        .map(|o| o.keys().cloned().collect())
        .unwrap_or_default();
    keys.sort();
    keys
}

struct Summarizer;

impl TraceNarrator for Summarizer {
    fn narrate(&self, result: &AnalysisResult) -> Option<String> {
        Some(format!(
            "{} risk(s) found with confidence {:.2}.",
            result.engineer_view().detected_risks().len(),
            result.engineer_view().confidence_score()
        ))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn monsoon_with_complaints_and_search_spike() {
    let raw = RawSignalSet::new()
        .with("rainfall_mm", 60.0)
        .with("complaint_count", 6u32)
        .with("trend_index", 0.9);
    let result = pipeline().analyze(&raw);

    assert_eq!(result.status(), Status::Critical);
    assert_eq!(result.citizen_view().visual_theme(), VisualTheme::Critical);
    assert_eq!(result.summary(), "Alert: 2 risk(s) detected");
    assert_eq!(
        result.engineer_view().detected_risks(),
        ["Vector-Borne Disease Cluster", "Urban Flash Flood"]
    );

    let actions = result.engineer_view().recommended_actions();
    assert!(!actions.is_empty());
    let unique: HashSet<&String> = actions.iter().collect();
    assert_eq!(unique.len(), actions.len());

    let raw_signals = result.engineer_view().raw_signals();
    assert_eq!(raw_signals.weather, 1.0);
    assert_eq!(raw_signals.complaints, 1.0);
    assert_eq!(raw_signals.trends, 0.9);
    assert_eq!(result.engineer_view().confidence_score(), 1.0);
}

#[test]
fn empty_snapshot_is_healthy() {
    let result = pipeline().analyze(&RawSignalSet::new());

    assert_eq!(result.status(), Status::Healthy);
    assert_eq!(result.citizen_view().visual_theme(), VisualTheme::Normal);
    assert_eq!(result.engineer_view().confidence_score(), 0.0);
    assert!(result.engineer_view().detected_risks().is_empty());
    assert!(result.engineer_view().recommended_actions().is_empty());
    assert!(result
        .engineer_view()
        .logic_trace()
        .contains("Unavailable signals"));
}

#[test]
fn sustained_heat_above_maximum() {
    let thresholds = Thresholds::default();
    let heat_threshold = thresholds.heat_risk_threshold;
    let raw = RawSignalSet::new().with("temperature_c", 46.0);
    let result = pipeline_with(thresholds).analyze(&raw);

    assert_eq!(result.engineer_view().detected_risks(), ["Severe Heatwave"]);
    assert!(result.engineer_view().confidence_score() >= heat_threshold);
    assert_eq!(result.engineer_view().raw_signals().weather, 1.0);
    assert_eq!(result.status(), Status::Critical);
    assert!(result
        .engineer_view()
        .recommended_actions()
        .contains(&"Open public cooling centres".to_string()));
}

#[test]
fn moderate_heat_is_an_advisory() {
    // (38 - 25) / 20 = 0.65: fires at 0.6, tier Medium.
    let raw = RawSignalSet::new().with("temperature_c", 38.0);
    let result = pipeline().analyze(&raw);

    assert_eq!(result.status(), Status::Warning);
    assert_eq!(result.citizen_view().visual_theme(), VisualTheme::Warning);
    assert_eq!(result.summary(), "Advisory: 1 risk(s) require attention");
}

#[test]
fn labelled_trend_and_string_counts_are_accepted() {
    let raw: RawSignalSet = serde_json::from_str(
        r#"{"rainfall_mm": "30", "complaint_count": 5, "trend_index": "spike", "aqi": 180}"#,
    )
    .unwrap();
    let result = pipeline().analyze(&raw);

    // 0.3 * 0.6 + 0.3 * 1.0 + 0.4 * 1.0 = 0.88
    assert_eq!(
        result.engineer_view().detected_risks()[0],
        "Vector-Borne Disease Cluster"
    );
    assert!(result
        .engineer_view()
        .logic_trace()
        .contains("Ignored unrecognized signals: aqi"));
}

#[test]
fn stray_field_types_do_not_reject_the_snapshot() {
    let raw: RawSignalSet = serde_json::from_str(
        r#"{"rainfall_mm": 60, "sensor_ok": true, "temperature_c": [1]}"#,
    )
    .unwrap();
    let result = pipeline().analyze(&raw);

    assert_eq!(result.engineer_view().detected_risks(), ["Urban Flash Flood"]);
    assert_ne!(result.status(), Status::Healthy);
}

#[test]
fn result_matches_wire_contract() {
    let raw = RawSignalSet::new()
        .with("rainfall_mm", 55.0)
        .with("drainage_complaint_count", 5u32);
    let value = serde_json::to_value(pipeline().analyze(&raw)).unwrap();

    assert_eq!(
        sorted_keys(&value),
        ["citizen_view", "details", "engineer_view", "future", "status", "summary"]
    );
    assert_eq!(
        sorted_keys(&value["citizen_view"]),
        ["status_headline", "visual_theme"]
    );
    assert_eq!(
        sorted_keys(&value["engineer_view"]),
        [
            "confidence_score",
            "detected_risks",
            "logic_trace",
            "raw_signals",
            "recommended_actions"
        ]
    );
    assert_eq!(
        sorted_keys(&value["engineer_view"]["raw_signals"]),
        ["complaints", "trends", "weather"]
    );
    assert_eq!(value["status"], "Critical");
    assert_eq!(value["citizen_view"]["visual_theme"], "Critical");
    assert!(value["engineer_view"]["confidence_score"].is_number());
}

#[test]
fn narrator_cannot_change_the_assessment() {
    let raw = RawSignalSet::new()
        .with("rainfall_mm", 60.0)
        .with("complaint_count", 6u32)
        .with("trend_index", 0.9);
    let plain = pipeline().analyze(&raw);
    let narrated = pipeline()
        .with_narrator(Arc::new(Summarizer))
        .analyze(&raw);

    assert_eq!(
        narrated.engineer_view().logic_trace(),
        "2 risk(s) found with confidence 1.00."
    );
    assert_eq!(narrated.status(), plain.status());
    assert_eq!(
        narrated.engineer_view().detected_risks(),
        plain.engineer_view().detected_risks()
    );
    assert_eq!(
        narrated.engineer_view().recommended_actions(),
        plain.engineer_view().recommended_actions()
    );
}

#[test]
fn external_catalog_without_coverage_escalates() {
    let catalog = ProtocolCatalog::from_json(
        r#"{"protocols": [
            {"id": "P-HEAT", "name": "Heat", "matches_risk_ids": ["HEAT_RISK"],
             "actions": ["Open cooling centres"]}
        ]}"#,
    )
    .unwrap();
    let config = EngineConfig::new(Thresholds::default(), catalog).unwrap();
    let pipeline = RiskPipeline::new(Arc::new(config));

    let raw = RawSignalSet::new()
        .with("rainfall_mm", 60.0)
        .with("drainage_complaint_count", 6u32);
    let result = pipeline.analyze(&raw);

    assert_eq!(
        result.engineer_view().recommended_actions(),
        [calo_engine::FALLBACK_ACTION]
    );
}
