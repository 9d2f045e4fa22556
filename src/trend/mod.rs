//! Trend series over the history log.
//!
//! The history is projected as-is: one point per record, in insertion
//! order, with no sorting or aggregation.

pub mod chart;

pub use chart::{ChartRenderer, ChartSlot, ChartSpec, JsonRenderer, TableRenderer};

use crate::record::HealthRecord;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

/// Index-aligned series ready for a line chart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// `recordedAt` of each record
    pub labels: Vec<String>,
    /// Blood sugar of each record (mg/dL)
    pub blood_sugar: Vec<u32>,
    /// Heart rate of each record (bpm)
    pub heart_rate: Vec<u32>,
}

impl ChartSeries {
    /// Project `history` into parallel series.
    pub fn build(history: &[HealthRecord]) -> Self {
        Self {
            labels: history.iter().map(|r| r.recorded_at().to_string()).collect(),
            blood_sugar: history.iter().map(|r| r.blood_sugar()).collect(),
            heart_rate: history.iter().map(|r| r.heart_rate()).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Descriptive statistics for each series.
    pub fn summary(&self) -> TrendSummary {
        TrendSummary {
            points: self.len(),
            blood_sugar: SeriesStats::compute(&self.blood_sugar),
            heart_rate: SeriesStats::compute(&self.heart_rate),
        }
    }
}

/// Summary of one numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl SeriesStats {
    /// `None` for an empty series.
    fn compute(values: &[u32]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let values: Vec<f64> = values.iter().map(|&v| f64::from(v)).collect();
        Some(Self {
            mean: Statistics::mean(values.iter()),
            min: Statistics::min(values.iter()),
            max: Statistics::max(values.iter()),
        })
    }
}

/// Per-series statistics over a chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub points: usize,
    pub blood_sugar: Option<SeriesStats>,
    pub heart_rate: Option<SeriesStats>,
}
