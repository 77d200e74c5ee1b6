//! Presentation of reward series.
use anyhow::Result;

/// A reward series with a human-readable label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabeledSeries {
    /// Label of the series, like `"trace_decay: 0.9"`.
    pub label: String,

    /// Values, one per episode.
    pub values: Vec<f32>,
}

impl LabeledSeries {
    /// Constructs a labeled series.
    pub fn new(label: impl Into<String>, values: Vec<f32>) -> Self {
        Self {
            label: label.into(),
            values,
        }
    }
}

/// Receives reward series at the end of sessions and experiments.
///
/// This is a sink: nothing is fed back into the run.
pub trait Plotter {
    /// Plots the given series, all on the same episode axis.
    fn plot(&mut self, title: &str, series: &[LabeledSeries]) -> Result<()>;
}

/// A plotter discarding every series.
#[derive(Default)]
pub struct NullPlotter;

impl Plotter for NullPlotter {
    fn plot(&mut self, _title: &str, _series: &[LabeledSeries]) -> Result<()> {
        Ok(())
    }
}
