//! Raw readings to comparable stress scores.

use calo_types::{Availability, NormalizedSignalSet, RawSignalSet, RawValue, SignalKind, Thresholds};
use tracing::debug;

/// Stress for labelled trend readings such as "spike" or "rising".
const TREND_SPIKE: f64 = 1.0;
const TREND_RISING: f64 = 0.7;
const TREND_STABLE: f64 = 0.1;

/// Normalize every recognized signal into [0, 1].
///
/// Missing or unusable readings score 0.0 and are flagged unavailable; nothing
/// here fails. When drainage complaints are missing but sanitation complaints
/// are present, drainage stress mirrors the sanitation score.
pub fn normalize(raw: &RawSignalSet, thresholds: &Thresholds) -> NormalizedSignalSet {
    let mut signals = NormalizedSignalSet::empty();

    for kind in SignalKind::ALL {
        let Some(value) = raw.get(kind) else {
            debug!(signal = %kind, "signal missing, defaulting to zero stress");
            continue;
        };
        match score(kind, value, thresholds) {
            Some(stress) => signals.record(kind, stress, Availability::Observed),
            None => debug!(signal = %kind, ?value, "signal unusable, defaulting to zero stress"),
        }
    }

    if !signals.is_available(SignalKind::DrainageComplaintCount)
        && signals.is_available(SignalKind::ComplaintCount)
    {
        signals.record(
            SignalKind::DrainageComplaintCount,
            signals.score(SignalKind::ComplaintCount),
            Availability::Derived(SignalKind::ComplaintCount),
        );
    }

    for key in raw.unrecognized_keys() {
        debug!(key = key, "ignoring unrecognized raw signal");
        signals.note_unrecognized(key);
    }

    signals
}

fn score(kind: SignalKind, value: &RawValue, thresholds: &Thresholds) -> Option<f64> {
    match kind {
        SignalKind::RainfallMm => value
            .as_number()
            .map(|mm| linear_stress(mm, thresholds.rainfall_critical_mm)),
        SignalKind::TemperatureC => value.as_number().map(|t| band_stress(t, thresholds)),
        SignalKind::ComplaintCount | SignalKind::DrainageComplaintCount => value
            .as_number()
            .map(|count| linear_stress(count, f64::from(thresholds.complaints_critical))),
        SignalKind::TrendIndex => trend_stress(value, thresholds.trend_scale),
    }
}

/// `clamp(value / critical, 0, 1)`. A non-positive scale yields 0.
pub fn linear_stress(value: f64, critical: f64) -> f64 {
    if !critical.is_finite() || critical <= 0.0 || !value.is_finite() {
        return 0.0;
    }
    (value / critical).clamp(0.0, 1.0)
}

/// Temperature stress with a comfort band.
///
/// Zero inside `[temp_comfort_low_c, temp_neutral_c]`, rising linearly to 1.0
/// at `temp_max_c`. Below the band the same slope applies, but only when
/// `temp_comfort_low_c` is configured.
pub fn band_stress(celsius: f64, thresholds: &Thresholds) -> f64 {
    let span = thresholds.temp_max_c - thresholds.temp_neutral_c;
    if !span.is_finite() || span <= 0.0 || !celsius.is_finite() {
        return 0.0;
    }
    if celsius > thresholds.temp_neutral_c {
        return ((celsius - thresholds.temp_neutral_c) / span).clamp(0.0, 1.0);
    }
    match thresholds.temp_comfort_low_c {
        Some(low) if celsius < low => ((low - celsius) / span).clamp(0.0, 1.0),
        _ => 0.0,
    }
}

/// Trend stress from a number on the configured scale, or from a label.
///
/// Numbers map linearly through `clamp(n / scale, 0, 1)`.
pub fn trend_stress(value: &RawValue, scale: f64) -> Option<f64> {
    if let Some(n) = value.as_number() {
        return Some(linear_stress(n, scale));
    }
    let label = value.as_label()?.trim().to_lowercase();
    if label.is_empty() {
        return None;
    }
    Some(if label.contains("spike") || label.contains("high") {
        TREND_SPIKE
    } else if label.contains("rising") {
        TREND_RISING
    } else {
        TREND_STABLE
    })
}
