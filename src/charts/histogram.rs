//! Histogram with a kernel density overlay.

use std::f64::consts::PI;
use std::path::Path;

use itertools::Itertools;
use plotters::prelude::*;

use crate::stats::describe::sample_std;

use super::{ChartStyle, chart_builder, fonts, pick_color};

/// Points sampled along the density curve
const KDE_POINTS: usize = 200;

/// Equal-width bins over the data range
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    /// `bins + 1` bin edges
    pub edges: Vec<f64>,
    /// Values per bin; the last bin includes the maximum
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width bins between their min and max
    ///
    /// Constant data is centred in a unit-wide range.
    #[must_use]
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);
        let (lo, hi) = value_range(values);
        let width = (hi - lo) / bins as f64;
        let edges = (0..=bins).map(|i| lo + width * i as f64).collect();

        let mut counts = vec![0; bins];
        for v in values {
            let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Self { edges, counts }
    }

    #[must_use]
    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.get(1)) {
            (Some(a), Some(b)) => b - a,
            _ => 1.0,
        }
    }
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let (lo, hi) = match values.iter().copied().minmax_by(f64::total_cmp).into_option() {
        Some((lo, hi)) => (lo, hi),
        None => (0.0, 1.0),
    };
    if hi > lo { (lo, hi) } else { (lo - 0.5, hi + 0.5) }
}

/// Gaussian kernel density estimate with Scott's bandwidth
///
/// Returns `(x, density)` samples across `[lo, hi]`, or `None` when the data
/// has fewer than two points or no spread.
#[must_use]
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, points: usize) -> Option<Vec<(f64, f64)>> {
    let std = sample_std(values)?;
    if std <= 0.0 || points < 2 {
        return None;
    }
    let n = values.len() as f64;
    let bandwidth = std * n.powf(-0.2);

    // Collapse repeated values into weights; stay lengths are whole days
    let weighted: Vec<(f64, usize)> = values
        .iter()
        .copied()
        .sorted_by(f64::total_cmp)
        .dedup_with_count()
        .map(|(count, v)| (v, count))
        .collect();

    let norm = 1.0 / (n * bandwidth * (2.0 * PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;
    let curve = (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density = weighted
                .iter()
                .map(|(v, w)| *w as f64 * (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                * norm;
            (x, density)
        })
        .collect();
    Some(curve)
}

/// Histogram of `values` with a density curve scaled to counts
pub fn draw_histogram(
    path: &Path,
    style: &ChartStyle<'_>,
    values: &[f64],
    bins: usize,
) -> anyhow::Result<()> {
    let histogram = Histogram::compute(values, bins);
    let (lo, hi) = value_range(values);

    let scale = values.len() as f64 * histogram.bin_width();
    let curve: Vec<(f64, f64)> = gaussian_kde(values, lo, hi, KDE_POINTS)
        .unwrap_or_default()
        .into_iter()
        .map(|(x, d)| (x, d * scale))
        .collect();

    let tallest = histogram
        .counts
        .iter()
        .map(|c| *c as f64)
        .chain(curve.iter().map(|(_, y)| *y))
        .fold(0.0_f64, f64::max);
    let y_max = (tallest * 1.1).max(1.0);

    let root = BitMapBackend::new(path, style.size).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = chart_builder(&root, style).build_cartesian_2d(lo..hi, 0.0..y_max)?;

    if fonts::text_available() {
        chart
            .configure_mesh()
            .x_desc(style.x_desc)
            .y_desc(style.y_desc)
            .draw()?;
    }

    let color = pick_color(style.colors, 0);
    let bars = || {
        histogram
            .edges
            .iter()
            .tuple_windows()
            .zip(&histogram.counts)
            .map(|((a, b), count)| [(*a, 0.0), (*b, *count as f64)])
    };
    chart.draw_series(bars().map(|corners| Rectangle::new(corners, color.mix(0.5).filled())))?;
    chart.draw_series(bars().map(|corners| Rectangle::new(corners, color.stroke_width(1))))?;

    if !curve.is_empty() {
        chart.draw_series(LineSeries::new(curve, color.stroke_width(2)))?;
    }

    root.present()?;
    Ok(())
}
