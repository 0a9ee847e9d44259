//! Bar and grouped-bar charts over categorical counts.

use std::path::Path;

use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;

use crate::stats::CountPivot;

use super::{ChartStyle, chart_builder, fonts, pick_color};

/// Axis maximum leaving headroom above the tallest bar
fn axis_max(counts: impl Iterator<Item = usize>) -> usize {
    let tallest = counts.max().unwrap_or(0);
    (tallest + tallest / 10).max(1)
}

fn segment_label(value: &SegmentValue<usize>, labels: &[&str]) -> String {
    match value {
        SegmentValue::CenterOf(i) => labels.get(*i).map(ToString::to_string).unwrap_or_default(),
        _ => String::new(),
    }
}

/// One bar per label, coloured in turn from the style palette
pub fn draw_bar_chart(
    path: &Path,
    style: &ChartStyle<'_>,
    bars: &[(String, usize)],
) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, style.size).into_drawing_area();
    root.fill(&WHITE)?;

    let slots = bars.len().max(1);
    let labels: Vec<&str> = bars.iter().map(|(label, _)| label.as_str()).collect();
    let formatter = |v: &SegmentValue<usize>| segment_label(v, &labels);

    let y_max = axis_max(bars.iter().map(|(_, count)| *count));
    let text = fonts::text_available();
    let mut chart =
        chart_builder(&root, style).build_cartesian_2d((0..slots).into_segmented(), 0..y_max)?;

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&formatter)
            .x_desc(style.x_desc)
            .y_desc(style.y_desc)
            .draw()?;
    }

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, count))| {
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), *count)],
            pick_color(style.colors, i).filled(),
        );
        bar.set_margin(0, 0, 8, 8);
        bar
    }))?;

    root.present()?;
    Ok(())
}

/// Bars for every (row key, column key) count, grouped by row key
///
/// Column keys become the coloured hue with a legend; each group is followed
/// by one empty slot as spacing.
pub fn draw_grouped_bar_chart(
    path: &Path,
    style: &ChartStyle<'_>,
    pivot: &CountPivot,
) -> anyhow::Result<()> {
    let root = BitMapBackend::new(path, style.size).into_drawing_area();
    root.fill(&WHITE)?;

    let hues = pivot.columns.len().max(1);
    let per_group = hues + 1;
    let slots = (pivot.rows.len() * per_group).max(1);
    let labels: Vec<&str> = pivot.rows.iter().map(|(key, _)| key.as_str()).collect();
    let formatter = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) if i % per_group == hues / 2 => {
            labels.get(i / per_group).map(ToString::to_string).unwrap_or_default()
        }
        _ => String::new(),
    };

    let y_max = axis_max(pivot.rows.iter().flat_map(|(_, counts)| counts.iter().copied()));
    let text = fonts::text_available();
    let mut chart =
        chart_builder(&root, style).build_cartesian_2d((0..slots).into_segmented(), 0..y_max)?;

    if text {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(slots)
            .x_label_formatter(&formatter)
            .x_desc(style.x_desc)
            .y_desc(style.y_desc)
            .draw()?;
    }

    for (h, hue) in pivot.columns.iter().enumerate() {
        let color = pick_color(style.colors, h);
        chart
            .draw_series(pivot.rows.iter().enumerate().map(move |(g, (_, counts))| {
                let slot = g * per_group + h;
                Rectangle::new(
                    [(SegmentValue::Exact(slot), 0), (SegmentValue::Exact(slot + 1), counts[h])],
                    color.filled(),
                )
            }))?
            .label(hue.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if text {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
