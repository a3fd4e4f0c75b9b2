//! Named time-series holders polled by the front-end.
//!
//! A [`Metric`] is a latest-value-plus-history series keyed by sample time;
//! a [`Graph`] has the identical structure but is keyed by an independent
//! coordinate (often position rather than time) and read back as a finite
//! sequence of points sorted ascending by x.
//!
//! Sample coordinates are stored fixed-point ([`SampleKey`], 1 ns
//! resolution) so series are ordered, deduplicated at equal coordinates,
//! and usable as map keys without floating-point `Ord` headaches.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed-point sample coordinate (nanounits).
///
/// Recording two samples at the same coordinate overwrites the first, the
/// same way an insertion-keyed map behaves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct SampleKey(i64);

impl SampleKey {
    const SCALE: f64 = 1e9;

    /// Quantize a coordinate to nanounit resolution.
    ///
    /// Non-finite coordinates map to zero; the callers only produce finite
    /// values, this is a last-resort guard.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Self((value * Self::SCALE).round() as i64)
        } else {
            Self(0)
        }
    }

    /// Coordinate as `f64`.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE
    }
}

/// Named time series with unit, updated once per tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metric {
    /// Display name.
    name: String,
    /// Display unit (e.g. "J", "m/s").
    unit: String,
    /// Samples ordered by time.
    samples: BTreeMap<SampleKey, f64>,
}

impl Metric {
    /// Create an empty metric.
    #[must_use]
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unit: unit.into(),
            samples: BTreeMap::new(),
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display unit.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Append a sample at `time`. A non-finite value is recorded as zero.
    pub fn record(&mut self, time: f64, value: f64) {
        let value = if value.is_finite() { value } else { 0.0 };
        self.samples.insert(SampleKey::from_f64(time), value);
    }

    /// Value of the most recent sample, `None` when empty.
    #[must_use]
    pub fn latest(&self) -> Option<f64> {
        self.samples.values().next_back().copied()
    }

    /// Full series as `(time, value)` pairs sorted ascending by time.
    #[must_use]
    pub fn series(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .map(|(k, v)| (k.as_f64(), *v))
            .collect()
    }

    /// Number of recorded samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether no samples have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Drop all samples, keeping name and unit.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// Named (x, y) series with axis labels.
///
/// Same storage as [`Metric`] but addressed by an independent coordinate;
/// read back sorted ascending by x.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Graph {
    /// Display title.
    title: String,
    /// X-axis label.
    x_label: String,
    /// Y-axis label.
    y_label: String,
    /// Points ordered by x.
    points: BTreeMap<SampleKey, f64>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            points: BTreeMap::new(),
        }
    }

    /// Display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// X-axis label.
    #[must_use]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    /// Y-axis label.
    #[must_use]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Push a point. A repeated x overwrites the previous y at that x.
    pub fn push(&mut self, x: f64, y: f64) {
        let y = if y.is_finite() { y } else { 0.0 };
        self.points.insert(SampleKey::from_f64(x), y);
    }

    /// Finite sequence of points sorted ascending by x.
    #[must_use]
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|(k, v)| (k.as_f64(), *v)).collect()
    }

    /// Drop all points, keeping title and axis labels.
    pub fn clear(&mut self) {
        self.points.clear();
    }
}
