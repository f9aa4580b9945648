use serde::{Deserialize, Serialize};

/// One bucket of a time series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint<K> {
    pub key: K,
    pub quantity: u64,
}

/// How many buckets a series has, so callers can pick a trend chart or a
/// tabular fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesShape {
    Empty,
    SinglePoint,
    Trend,
}

/// Quantities bucketed by key, ascending by key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Series<K> {
    points: Vec<SeriesPoint<K>>,
}

impl<K: Ord> Series<K> {
    /// Build from `(key, quantity)` buckets. Keys must already be unique;
    /// they are sorted here.
    pub fn from_buckets(buckets: impl IntoIterator<Item = (K, u64)>) -> Self {
        let mut points: Vec<SeriesPoint<K>> = buckets
            .into_iter()
            .map(|(key, quantity)| SeriesPoint { key, quantity })
            .collect();
        points.sort_by(|a, b| a.key.cmp(&b.key));
        Self { points }
    }
}

impl<K> Series<K> {
    pub fn points(&self) -> &[SeriesPoint<K>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn shape(&self) -> SeriesShape {
        match self.points.len() {
            0 => SeriesShape::Empty,
            1 => SeriesShape::SinglePoint,
            _ => SeriesShape::Trend,
        }
    }

    /// Sum of all buckets, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        crate::aggregator::sum_units(self.points.iter().map(|p| p.quantity))
    }
}
