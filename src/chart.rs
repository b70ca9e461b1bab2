//! Bonding curve chart rendering
//!
//! Minted tokens on the left axis, marginal price on the right axis, one
//! shared x axis. Output is SVG so no system fonts are needed.

use plotters::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::xyber::curve::{sample_curve, CurveParams, CurveSample};

const CHART_TITLE: &str = "Bonding Curve: Minted Tokens & Price";

/// Chart constants and output options
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    /// Maximum number of tokens (A)
    #[serde(default = "default_a")]
    pub a: f64,
    /// Curve "speed" parameter (K)
    #[serde(default = "default_k")]
    pub k: f64,
    /// Virtual pool offset (C)
    #[serde(default = "default_c")]
    pub c: f64,
    #[serde(default)]
    pub x_min: f64,
    #[serde(default = "default_x_max")]
    pub x_max: f64,
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,
    #[serde(default = "default_width")]
    pub width: u32,
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_a() -> f64 {
    1_073_000_191.0
}

fn default_k() -> f64 {
    32_190_005_730.0
}

fn default_c() -> f64 {
    30.0
}

fn default_x_max() -> f64 {
    300.0
}

fn default_sample_count() -> usize {
    301
}

fn default_output_path() -> PathBuf {
    PathBuf::from("bonding_curve.svg")
}

fn default_width() -> u32 {
    560
}

fn default_height() -> u32 {
    420
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            a: default_a(),
            k: default_k(),
            c: default_c(),
            x_min: 0.0,
            x_max: default_x_max(),
            sample_count: default_sample_count(),
            output_path: default_output_path(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl ChartConfig {
    /// Configured curve constants
    pub fn params(&self) -> CurveParams {
        CurveParams::new(self.a, self.k, self.c)
    }
}

/// Sweep the curve and write the chart to `config.output_path`.
///
/// `params` overrides the configured constants, e.g. with values decoded
/// from an account.
pub fn render_curve_chart(config: &ChartConfig, params: Option<CurveParams>) -> Result<PathBuf> {
    let params = params.unwrap_or_else(|| config.params());
    let samples = sample_curve(params, config.x_min, config.x_max, config.sample_count)?;

    draw_samples(
        &samples,
        &config.output_path,
        (config.width, config.height),
    )?;

    info!(
        "Wrote bonding curve chart ({} samples) to {}",
        samples.len(),
        config.output_path.display()
    );
    Ok(config.output_path.clone())
}

/// Draw precomputed samples as an SVG chart
pub fn draw_samples(samples: &[CurveSample], path: &Path, size: (u32, u32)) -> Result<()> {
    let (first, last) = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(Error::Chart("no samples to draw".to_string())),
    };

    let (x_lo, x_hi) = padded_range(first.x.min(last.x), first.x.max(last.x));
    let (y_lo, y_hi) = value_range(samples.iter().map(|s| s.minted));
    let (p_lo, p_hi) = value_range(samples.iter().map(|s| s.price));
    debug!(
        "Chart ranges: x=[{}, {}] minted=[{}, {}] price=[{}, {}]",
        x_lo, x_hi, y_lo, y_hi, p_lo, p_hi
    );

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 18))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .right_y_label_area_size(80)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(chart_err)?
        .set_secondary_coord(x_lo..x_hi, p_lo..p_hi);

    chart
        .configure_mesh()
        .x_desc("x (base asset contributed)")
        .y_desc("y(x) (cumulative minted tokens)")
        .y_label_formatter(&|v| format!("{:.2e}", v))
        .draw()
        .map_err(chart_err)?;

    chart
        .configure_secondary_axes()
        .y_desc("Price")
        .y_label_formatter(&|v| format!("{:.2e}", v))
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(
            samples.iter().map(|s| (s.x, s.minted)),
            &RED,
        ))
        .map_err(chart_err)?
        .label("Minted tokens")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .draw_secondary_series(LineSeries::new(
            samples.iter().map(|s| (s.x, s.price)),
            &BLUE,
        ))
        .map_err(chart_err)?
        .label("Price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn value_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    padded_range(lo, hi)
}

// plotters needs a non-empty range
fn padded_range(lo: f64, hi: f64) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        let pad = if lo == 0.0 { 1.0 } else { lo.abs() * 0.01 };
        (lo - pad, hi + pad)
    }
}

fn chart_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Chart(e.to_string())
}
