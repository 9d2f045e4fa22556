//! Line chart configuration and renderer ownership.
//!
//! A [`ChartSlot`] owns at most one live chart. Every update tears the
//! previous chart down before the new one is drawn; there is no
//! incremental update path.

use super::ChartSeries;
use serde::{Deserialize, Serialize};

pub const BLOOD_SUGAR_LABEL: &str = "Blood Sugar (mg/dL)";
pub const HEART_RATE_LABEL: &str = "Heart Rate (bpm)";
pub const BLOOD_SUGAR_COLOR: &str = "rgba(75, 192, 192, 1)";
pub const HEART_RATE_COLOR: &str = "rgba(255, 99, 132, 1)";

/// One line on the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u32>,
    pub border_color: String,
    pub fill: bool,
}

/// Axis title configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisTitle {
    pub display: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub title: AxisTitle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scales {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    pub responsive: bool,
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Complete chart description handed to a renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    #[serde(rename = "type")]
    pub chart_type: String,
    pub data: ChartData,
    pub options: ChartOptions,
}

impl ChartSpec {
    /// Blood sugar and heart rate lines over the record timestamps.
    pub fn line(series: &ChartSeries) -> Self {
        Self {
            chart_type: "line".to_string(),
            data: ChartData {
                labels: series.labels.clone(),
                datasets: vec![
                    Dataset {
                        label: BLOOD_SUGAR_LABEL.to_string(),
                        data: series.blood_sugar.clone(),
                        border_color: BLOOD_SUGAR_COLOR.to_string(),
                        fill: false,
                    },
                    Dataset {
                        label: HEART_RATE_LABEL.to_string(),
                        data: series.heart_rate.clone(),
                        border_color: HEART_RATE_COLOR.to_string(),
                        fill: false,
                    },
                ],
            },
            options: ChartOptions {
                responsive: true,
                scales: Scales {
                    x: axis("Date/Time"),
                    y: axis("Values"),
                },
            },
        }
    }
}

fn axis(text: &str) -> Axis {
    Axis {
        title: AxisTitle {
            display: true,
            text: text.to_string(),
        },
    }
}

/// Something that can draw a chart and later dispose of it.
pub trait ChartRenderer {
    /// Handle to a drawn chart.
    type Chart;

    fn draw(&mut self, spec: &ChartSpec) -> Self::Chart;

    fn destroy(&mut self, chart: Self::Chart);
}

/// Holds the single live chart for a renderer.
pub struct ChartSlot<R: ChartRenderer> {
    renderer: R,
    live: Option<R::Chart>,
}

impl<R: ChartRenderer> ChartSlot<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            live: None,
        }
    }

    /// Tear down the current chart, if any, and draw `spec`.
    pub fn rebuild(&mut self, spec: &ChartSpec) -> &R::Chart {
        self.clear();
        self.live.insert(self.renderer.draw(spec))
    }

    /// Tear down the current chart.
    pub fn clear(&mut self) {
        if let Some(chart) = self.live.take() {
            self.renderer.destroy(chart);
        }
    }

    pub fn current(&self) -> Option<&R::Chart> {
        self.live.as_ref()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}

impl<R: ChartRenderer> Drop for ChartSlot<R> {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Renders the chart as a plain text table.
#[derive(Debug, Default)]
pub struct TableRenderer;

impl ChartRenderer for TableRenderer {
    type Chart = String;

    fn draw(&mut self, spec: &ChartSpec) -> String {
        let labels = &spec.data.labels;
        if labels.is_empty() {
            return "No history yet.".to_string();
        }

        let width = labels
            .iter()
            .map(|l| l.len())
            .chain(std::iter::once("Date/Time".len()))
            .max()
            .unwrap_or(0);

        let mut out = format!("{:<width$}", "Date/Time");
        for dataset in &spec.data.datasets {
            out.push_str(&format!("  {:>20}", dataset.label));
        }
        out.push('\n');

        for (i, label) in labels.iter().enumerate() {
            out.push_str(&format!("{label:<width$}"));
            for dataset in &spec.data.datasets {
                match dataset.data.get(i) {
                    Some(v) => out.push_str(&format!("  {v:>20}")),
                    None => out.push_str(&format!("  {:>20}", "-")),
                }
            }
            out.push('\n');
        }
        out
    }

    fn destroy(&mut self, _chart: String) {}
}

/// Renders the chart as its JSON configuration.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    pretty: bool,
}

impl JsonRenderer {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl ChartRenderer for JsonRenderer {
    type Chart = String;

    fn draw(&mut self, spec: &ChartSpec) -> String {
        let json = if self.pretty {
            serde_json::to_string_pretty(spec)
        } else {
            serde_json::to_string(spec)
        };
        json.unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}"))
    }

    fn destroy(&mut self, _chart: String) {}
}
