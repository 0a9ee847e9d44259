//! Chart rendering
//!
//! Four fixed PNG charts built from aggregates of the encounter table. Each
//! chart is independent of the others.

pub mod bar;
pub mod fonts;
pub mod histogram;

use std::path::{Path, PathBuf};

use itertools::Itertools;
use plotters::coord::Shift;
use plotters::prelude::{ChartBuilder, DrawingArea, DrawingBackend};
use plotters::style::RGBColor;

use crate::error::util::ensure_directory;
use crate::error::{ReportError, Result};
use crate::models::Table;
use crate::models::patients::{AGE, GENDER, READMITTED, TIME_IN_HOSPITAL};
use crate::stats::{KeyOrder, crosstab, value_counts};
use crate::utils::arrow::numeric_values;

pub const READMISSION_CHART: &str = "readmission_distribution.png";
pub const GENDER_CHART: &str = "gender_vs_readmission.png";
pub const AGE_CHART: &str = "age_distribution.png";
pub const STAY_CHART: &str = "hospital_stay_distribution.png";

/// File names of every chart, in rendering order
pub const CHART_FILES: [&str; 4] = [READMISSION_CHART, GENDER_CHART, AGE_CHART, STAY_CHART];

const FONT_FAMILY: &str = "sans-serif";
const STAY_BINS: usize = 15;

pub const GREEN: RGBColor = RGBColor(0, 128, 0);
pub const ORANGE: RGBColor = RGBColor(255, 165, 0);
pub const RED: RGBColor = RGBColor(255, 0, 0);
pub const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
pub const PURPLE: RGBColor = RGBColor(128, 0, 128);

/// Qualitative palette for hue groups
pub const SET2: [RGBColor; 8] = [
    RGBColor(102, 194, 165),
    RGBColor(252, 141, 98),
    RGBColor(141, 160, 203),
    RGBColor(231, 138, 195),
    RGBColor(166, 216, 84),
    RGBColor(255, 217, 47),
    RGBColor(229, 196, 148),
    RGBColor(179, 179, 179),
];

/// Title, axis text, size and palette of one chart
#[derive(Debug, Clone)]
pub struct ChartStyle<'a> {
    pub title: &'a str,
    pub x_desc: &'a str,
    pub y_desc: &'a str,
    pub size: (u32, u32),
    pub colors: &'a [RGBColor],
}

fn pick_color(colors: &[RGBColor], i: usize) -> RGBColor {
    if colors.is_empty() {
        return SKY_BLUE;
    }
    colors[i % colors.len()]
}

/// Builder with the margin, caption and label areas shared by every chart
///
/// Caption and label areas are left out when no font is registered.
fn chart_builder<'a, 'b, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    style: &ChartStyle<'_>,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(10);
    if fonts::text_available() {
        builder
            .caption(style.title, (FONT_FAMILY, 20))
            .x_label_area_size(40)
            .y_label_area_size(60);
    }
    builder
}

fn chart_error(path: &Path) -> impl FnOnce(anyhow::Error) -> ReportError + '_ {
    move |source| ReportError::Chart {
        path: path.to_path_buf(),
        source,
    }
}

/// Render all four charts into `charts_dir`, creating it if needed
pub fn render_charts(table: &Table, charts_dir: &Path) -> Result<Vec<PathBuf>> {
    ensure_directory(charts_dir, "saving charts")?;

    let paths = vec![
        render_readmission_distribution(table, charts_dir)?,
        render_gender_vs_readmission(table, charts_dir)?,
        render_age_distribution(table, charts_dir)?,
        render_stay_distribution(table, charts_dir)?,
    ];

    for path in &paths {
        log::info!("Saved chart {}", path.display());
    }
    Ok(paths)
}

/// Encounters per readmission category, most frequent first
pub fn render_readmission_distribution(table: &Table, charts_dir: &Path) -> Result<PathBuf> {
    let path = charts_dir.join(READMISSION_CHART);
    let counts = value_counts(table, READMITTED)?;
    let style = ChartStyle {
        title: "Patient Readmission Distribution",
        x_desc: "Readmission Status",
        y_desc: "Number of Patients",
        size: (600, 400),
        colors: &[GREEN, ORANGE, RED],
    };
    bar::draw_bar_chart(&path, &style, &counts).map_err(chart_error(&path))?;
    Ok(path)
}

/// Encounter counts per gender, split by readmission category
pub fn render_gender_vs_readmission(table: &Table, charts_dir: &Path) -> Result<PathBuf> {
    let path = charts_dir.join(GENDER_CHART);
    let pivot = crosstab(table, GENDER, READMITTED, KeyOrder::Appearance)?;
    let style = ChartStyle {
        title: "Gender vs Readmission",
        x_desc: GENDER,
        y_desc: "count",
        size: (600, 400),
        colors: &SET2,
    };
    bar::draw_grouped_bar_chart(&path, &style, &pivot).map_err(chart_error(&path))?;
    Ok(path)
}

/// Encounters per age bracket, brackets in label order
pub fn render_age_distribution(table: &Table, charts_dir: &Path) -> Result<PathBuf> {
    let path = charts_dir.join(AGE_CHART);
    let counts: Vec<(String, usize)> = value_counts(table, AGE)?
        .into_iter()
        .sorted_by(|a, b| a.0.cmp(&b.0))
        .collect();
    let style = ChartStyle {
        title: "Age Group Distribution",
        x_desc: "Age Range",
        y_desc: "Number of Patients",
        size: (800, 400),
        colors: &[SKY_BLUE],
    };
    bar::draw_bar_chart(&path, &style, &counts).map_err(chart_error(&path))?;
    Ok(path)
}

/// Length-of-stay histogram with a density overlay
pub fn render_stay_distribution(table: &Table, charts_dir: &Path) -> Result<PathBuf> {
    let path = charts_dir.join(STAY_CHART);
    let values = numeric_values(table.column(TIME_IN_HOSPITAL)?, TIME_IN_HOSPITAL)?;
    let style = ChartStyle {
        title: "Distribution of Hospital Stay Length",
        x_desc: "Days in Hospital",
        y_desc: "Number of Patients",
        size: (600, 400),
        colors: &[PURPLE],
    };
    histogram::draw_histogram(&path, &style, &values, STAY_BINS).map_err(chart_error(&path))?;
    Ok(path)
}
