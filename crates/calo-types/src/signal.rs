use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// City signals recognized by the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    /// Forecast rainfall in millimetres.
    RainfallMm,
    /// Pre-aggregated air temperature in degrees Celsius.
    TemperatureC,
    /// Count of open sanitation complaints.
    ComplaintCount,
    /// Count of open drainage complaints.
    DrainageComplaintCount,
    /// Health search interest, either a ratio, a 0-100 score or a label.
    TrendIndex,
}

impl SignalKind {
    pub const ALL: [SignalKind; 5] = [
        SignalKind::RainfallMm,
        SignalKind::TemperatureC,
        SignalKind::ComplaintCount,
        SignalKind::DrainageComplaintCount,
        SignalKind::TrendIndex,
    ];

    /// Wire name of the signal, as it appears in a [`RawSignalSet`].
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalKind::RainfallMm => "rainfall_mm",
            SignalKind::TemperatureC => "temperature_c",
            SignalKind::ComplaintCount => "complaint_count",
            SignalKind::DrainageComplaintCount => "drainage_complaint_count",
            SignalKind::TrendIndex => "trend_index",
        }
    }

    /// Human-readable description used in details and traces.
    pub fn description(&self) -> &'static str {
        match self {
            SignalKind::RainfallMm => "Rainfall/Humidity",
            SignalKind::TemperatureC => "High Temperatures",
            SignalKind::ComplaintCount => "Sanitation Complaints",
            SignalKind::DrainageComplaintCount => "Drainage Complaints",
            SignalKind::TrendIndex => "Health Search Trends",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignalKind {
    type Err = UnknownSignal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SignalKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownSignal(s.to_string()))
    }
}

/// A raw signal name that is not part of [`SignalKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown signal: {0}")]
pub struct UnknownSignal(pub String);

/// A raw value handed over by a data loader.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Label(String),
    /// Explicit `null` from a loader that failed to fetch the value.
    Null,
    /// Any other JSON shape (bool, array, object). Kept so one stray field
    /// cannot reject the whole snapshot.
    Unsupported(Unreadable),
}

/// Placeholder for a value the engine cannot read. Serializes as `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unreadable;

impl<'de> Deserialize<'de> for Unreadable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        IgnoredAny::deserialize(deserializer)?;
        Ok(Unreadable)
    }
}

impl Serialize for Unreadable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_unit()
    }
}

impl RawValue {
    /// Numeric reading, if the value is (or parses as) a finite number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Number(_) => None,
            RawValue::Label(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            RawValue::Null | RawValue::Unsupported(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            RawValue::Label(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Number(f64::from(value))
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Label(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Label(value)
    }
}

/// Request-scoped raw readings keyed by signal name.
///
/// Treated as untrusted and partial: any recognized key may be absent and
/// unrecognized keys are carried along so they can be reported.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawSignalSet(BTreeMap<String, RawValue>);

impl RawSignalSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<RawValue>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value for a recognized signal. `null` values count as absent.
    pub fn get(&self, kind: SignalKind) -> Option<&RawValue> {
        self.0.get(kind.as_str()).filter(|v| !v.is_null())
    }

    pub fn contains(&self, kind: SignalKind) -> bool {
        self.get(kind).is_some()
    }

    /// Keys that do not name a [`SignalKind`], in sorted order.
    pub fn unrecognized_keys(&self) -> impl Iterator<Item = &str> {
        self.0
            .keys()
            .map(String::as_str)
            .filter(|key| key.parse::<SignalKind>().is_err())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawSignalSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// How a normalized score came about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "from", rename_all = "snake_case")]
pub enum Availability {
    /// Read directly from the raw signal.
    Observed,
    /// Borrowed from another signal because the raw value was absent.
    Derived(SignalKind),
    /// Missing or unusable; the score defaults to 0.0.
    Unavailable,
}

/// Stress scores in [0.0, 1.0] for every [`SignalKind`].
///
/// Scores are sanitized on write, so every stored value is finite and in range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSignalSet {
    scores: BTreeMap<SignalKind, f64>,
    availability: BTreeMap<SignalKind, Availability>,
    unrecognized: Vec<String>,
}

impl Default for NormalizedSignalSet {
    fn default() -> Self {
        Self {
            scores: SignalKind::ALL.iter().map(|k| (*k, 0.0)).collect(),
            availability: SignalKind::ALL
                .iter()
                .map(|k| (*k, Availability::Unavailable))
                .collect(),
            unrecognized: Vec::new(),
        }
    }
}

impl NormalizedSignalSet {
    /// All signals at 0.0 and unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from already-normalized scores; listed signals count as observed.
    pub fn from_scores(scores: impl IntoIterator<Item = (SignalKind, f64)>) -> Self {
        let mut set = Self::default();
        for (kind, score) in scores {
            set.record(kind, score, Availability::Observed);
        }
        set
    }

    /// Store a score, clamping it into [0.0, 1.0]. Non-finite scores become
    /// 0.0 and mark the signal unavailable.
    pub fn record(&mut self, kind: SignalKind, score: f64, availability: Availability) {
        let (score, availability) = if score.is_finite() {
            (score.clamp(0.0, 1.0), availability)
        } else {
            (0.0, Availability::Unavailable)
        };
        self.scores.insert(kind, score);
        self.availability.insert(kind, availability);
    }

    pub fn note_unrecognized(&mut self, key: impl Into<String>) {
        self.unrecognized.push(key.into());
    }

    pub fn score(&self, kind: SignalKind) -> f64 {
        self.scores.get(&kind).copied().unwrap_or(0.0)
    }

    pub fn availability(&self, kind: SignalKind) -> Availability {
        self.availability
            .get(&kind)
            .copied()
            .unwrap_or(Availability::Unavailable)
    }

    pub fn is_available(&self, kind: SignalKind) -> bool {
        self.availability(kind) != Availability::Unavailable
    }

    /// Signals that fell back to the 0.0 default.
    pub fn unavailable(&self) -> Vec<SignalKind> {
        SignalKind::ALL
            .iter()
            .copied()
            .filter(|k| !self.is_available(*k))
            .collect()
    }

    /// Signals borrowed from another signal, as `(signal, source)` pairs.
    pub fn derived(&self) -> Vec<(SignalKind, SignalKind)> {
        self.availability
            .iter()
            .filter_map(|(kind, a)| match a {
                Availability::Derived(from) => Some((*kind, *from)),
                _ => None,
            })
            .collect()
    }

    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    pub fn iter(&self) -> impl Iterator<Item = (SignalKind, f64)> + '_ {
        self.scores.iter().map(|(k, v)| (*k, *v))
    }
}
