use serde::{Deserialize, Serialize};

/// How per-risk confidences fold into the engineer-view confidence score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceAggregate {
    #[default]
    Max,
    Mean,
}

/// Normalization and detection thresholds, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Rainfall that maps to full stress.
    pub rainfall_critical_mm: f64,
    /// Upper edge of the temperature comfort band.
    pub temp_neutral_c: f64,
    /// Temperature that maps to full heat stress.
    pub temp_max_c: f64,
    /// Lower edge of the comfort band. Cold stress is only scored when set.
    pub temp_comfort_low_c: Option<f64>,
    /// Complaint count that maps to full stress.
    pub complaints_critical: u32,
    /// Numeric trend reading that maps to full stress: 1.0 for ratios, 100.0
    /// for 0-100 interest scores.
    pub trend_scale: f64,
    pub disease_risk_threshold: f64,
    pub flood_risk_threshold: f64,
    pub heat_risk_threshold: f64,
    /// Every contributing signal of a multi-signal rule must reach this stress.
    pub min_contributing_stress: f64,
    pub confidence_aggregate: ConfidenceAggregate,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            rainfall_critical_mm: 50.0,
            temp_neutral_c: 25.0,
            temp_max_c: 45.0,
            temp_comfort_low_c: None,
            complaints_critical: 5,
            trend_scale: 1.0,
            disease_risk_threshold: 0.4,
            flood_risk_threshold: 0.5,
            heat_risk_threshold: 0.6,
            min_contributing_stress: 0.2,
            confidence_aggregate: ConfidenceAggregate::Max,
        }
    }
}

/// A threshold outside its sane range.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("threshold {field} = {value} is invalid: {reason}")]
pub struct ThresholdViolation {
    pub field: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

impl Thresholds {
    /// Check every option against its sane range.
    pub fn validate(&self) -> Result<(), ThresholdViolation> {
        positive("rainfall_critical_mm", self.rainfall_critical_mm)?;
        positive("trend_scale", self.trend_scale)?;
        finite("temp_neutral_c", self.temp_neutral_c)?;
        finite("temp_max_c", self.temp_max_c)?;
        if self.temp_max_c <= self.temp_neutral_c {
            return Err(ThresholdViolation {
                field: "temp_max_c",
                value: self.temp_max_c,
                reason: "must be above temp_neutral_c",
            });
        }
        if let Some(low) = self.temp_comfort_low_c {
            finite("temp_comfort_low_c", low)?;
            if low >= self.temp_neutral_c {
                return Err(ThresholdViolation {
                    field: "temp_comfort_low_c",
                    value: low,
                    reason: "must be below temp_neutral_c",
                });
            }
        }
        if self.complaints_critical == 0 {
            return Err(ThresholdViolation {
                field: "complaints_critical",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        unit_open("disease_risk_threshold", self.disease_risk_threshold)?;
        unit_open("flood_risk_threshold", self.flood_risk_threshold)?;
        unit_open("heat_risk_threshold", self.heat_risk_threshold)?;

        let floor = self.min_contributing_stress;
        if !floor.is_finite() || !(0.0..=1.0).contains(&floor) {
            return Err(ThresholdViolation {
                field: "min_contributing_stress",
                value: floor,
                reason: "must lie in [0, 1]",
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ThresholdViolation> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ThresholdViolation {
            field,
            value,
            reason: "must be a finite number",
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ThresholdViolation> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ThresholdViolation {
            field,
            value,
            reason: "must be positive",
        })
    }
}

fn unit_open(field: &'static str, value: f64) -> Result<(), ThresholdViolation> {
    finite(field, value)?;
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ThresholdViolation {
            field,
            value,
            reason: "must lie in (0, 1]",
        })
    }
}
