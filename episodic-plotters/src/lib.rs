#![warn(missing_docs)]
//! SVG plots of reward series.
//!
//! [`SvgPlotter`] draws all series given to
//! [`Plotter::plot`](episodic_core::Plotter::plot) as lines over the episode
//! axis, with a legend made of the series labels.
use anyhow::Result;
use episodic_core::{LabeledSeries, Plotter};
use log::{debug, info, warn};
use plotters::prelude::*;
use std::{
    cmp::Ordering,
    path::{Path, PathBuf},
};

const COLORS: [RGBColor; 6] = [RED, BLUE, GREEN, MAGENTA, CYAN, BLACK];

/// Writes plots to an SVG file.
///
/// Every call of [`Plotter::plot`] overwrites the file.
pub struct SvgPlotter {
    path: PathBuf,
    size: (u32, u32),
    x_desc: String,
    y_desc: String,
}

impl SvgPlotter {
    /// Constructs a plotter writing to `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            size: (800, 600),
            x_desc: "Episode".to_string(),
            y_desc: "Reward per episode".to_string(),
        }
    }

    /// Sets the size of the image in pixels.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Path of the SVG file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Plotter for SvgPlotter {
    fn plot(&mut self, title: &str, series: &[LabeledSeries]) -> Result<()> {
        let n_episodes = series.iter().map(|s| s.values.len()).max().unwrap_or(0);
        if n_episodes == 0 {
            warn!("Nothing to plot in {:?}", self.path);
            return Ok(());
        }
        let (min, max) = value_range(series);
        debug!("Plotting range: min = {}; max = {}", min, max);

        let root = SVGBackend::new(&self.path, self.size).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(title, ("sans-serif", 30).into_font())
            .margin(5)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0f32..n_episodes as f32, min..max)?;

        chart
            .configure_mesh()
            .x_desc(self.x_desc.as_str())
            .y_desc(self.y_desc.as_str())
            .disable_mesh()
            .draw()?;

        for (i, s) in series.iter().enumerate() {
            let color = COLORS[i % COLORS.len()];
            chart
                .draw_series(LineSeries::new(
                    s.values.iter().enumerate().map(|(x, y)| (x as f32, *y)),
                    &color,
                ))?
                .label(s.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::LowerRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;

        root.present()?;
        info!("Saved plot to {:?}", self.path);
        Ok(())
    }
}

/// Range of the values of all series, widened when it is empty.
fn value_range(series: &[LabeledSeries]) -> (f32, f32) {
    let values = || series.iter().flat_map(|s| s.values.iter().copied());
    let cmp = |a: &f32, b: &f32| a.partial_cmp(b).unwrap_or(Ordering::Equal);
    let min = values().min_by(cmp).unwrap_or(0.0);
    let max = values().max_by(cmp).unwrap_or(0.0);
    if max - min < f32::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min, max)
    }
}
