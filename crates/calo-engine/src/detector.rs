//! Rule-based risk detection over normalized signals.

use calo_types::{NormalizedSignalSet, RiskKind, RiskRecord, SignalKind, Thresholds};

/// One contributing signal compared against the contribution floor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SignalCheck {
    pub signal: SignalKind,
    pub weight: f64,
    pub stress: f64,
    /// Floor the stress must reach; `None` for single-signal rules.
    pub floor: Option<f64>,
}

impl SignalCheck {
    pub fn met(&self) -> bool {
        self.floor.map_or(true, |floor| self.stress >= floor)
    }
}

/// Outcome of evaluating one rule, fired or not.
#[derive(Clone, Debug, PartialEq)]
pub struct RuleEvaluation {
    pub kind: RiskKind,
    pub checks: Vec<SignalCheck>,
    /// Weighted average of the contributing stress scores.
    pub confidence: f64,
    /// Confidence the rule must reach to fire.
    pub threshold: f64,
}

impl RuleEvaluation {
    /// Conjunctive: the confidence threshold and every floor must be met.
    pub fn fired(&self) -> bool {
        self.confidence >= self.threshold && self.checks.iter().all(SignalCheck::met)
    }

    pub fn to_record(&self) -> Option<RiskRecord> {
        self.fired()
            .then(|| RiskRecord::new(self.kind, self.confidence))
    }
}

/// Confidence threshold configured for a rule.
pub fn risk_threshold(kind: RiskKind, thresholds: &Thresholds) -> f64 {
    match kind {
        RiskKind::BioRisk => thresholds.disease_risk_threshold,
        RiskKind::FloodRisk => thresholds.flood_risk_threshold,
        RiskKind::HeatRisk => thresholds.heat_risk_threshold,
    }
}

/// Evaluate a single rule against the signals.
pub fn evaluate(
    kind: RiskKind,
    signals: &NormalizedSignalSet,
    thresholds: &Thresholds,
) -> RuleEvaluation {
    let weights = kind.weights();
    let floor = (weights.len() > 1).then_some(thresholds.min_contributing_stress);

    let checks: Vec<SignalCheck> = weights
        .iter()
        .map(|(signal, weight)| SignalCheck {
            signal: *signal,
            weight: *weight,
            stress: signals.score(*signal),
            floor,
        })
        .collect();
    let confidence = checks
        .iter()
        .map(|c| c.weight * c.stress)
        .sum::<f64>()
        .clamp(0.0, 1.0);

    RuleEvaluation {
        kind,
        checks,
        confidence,
        threshold: risk_threshold(kind, thresholds),
    }
}

/// Evaluate every rule in [`RiskKind::ALL`] order.
pub fn evaluate_all(signals: &NormalizedSignalSet, thresholds: &Thresholds) -> Vec<RuleEvaluation> {
    RiskKind::ALL
        .iter()
        .map(|kind| evaluate(*kind, signals, thresholds))
        .collect()
}

/// Detected risks in evaluation order. Rules are independent; several may fire.
pub fn detect(signals: &NormalizedSignalSet, thresholds: &Thresholds) -> Vec<RiskRecord> {
    evaluate_all(signals, thresholds)
        .iter()
        .filter_map(RuleEvaluation::to_record)
        .collect()
}
