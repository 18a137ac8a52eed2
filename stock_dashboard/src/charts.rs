//! Static SVG rendering of [`ChartSpec`]s with plotters.

use plotters::prelude::*;
use thiserror::Error;

use crate::render::{ChartKind, ChartSpec};

pub const DEFAULT_SIZE: (u32, u32) = (960, 480);

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("failed to draw chart: {0}")]
    Draw(String),

    #[error("invalid series color `{0}`")]
    Color(String),
}

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

fn parse_hex(color: &str) -> Result<RGBColor, ChartError> {
    let hex = color.strip_prefix('#').unwrap_or(color);
    let channel = |i: usize| {
        hex.get(i..i + 2)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .ok_or_else(|| ChartError::Color(color.to_string()))
    };
    if hex.len() != 6 {
        return Err(ChartError::Color(color.to_string()));
    }
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Contiguous runs of defined values as `(index, value)` points.
fn segments(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(y) if y.is_finite() => current.push((i as f64, *y)),
            _ if !current.is_empty() => out.push(std::mem::take(&mut current)),
            _ => {}
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn y_bounds(spec: &ChartSpec) -> (f64, f64) {
    let mut values = spec
        .series
        .iter()
        .flat_map(|s| s.values.iter().flatten().copied())
        .filter(|v| v.is_finite())
        .peekable();
    if values.peek().is_none() {
        return (0.0, 1.0);
    }
    let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if spec.kind == ChartKind::Area {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let pad = if hi > lo { (hi - lo) * 0.05 } else { 1.0 };
    (lo - pad, hi + pad)
}

/// Renders one chart to an SVG document.
pub fn render_svg(spec: &ChartSpec, size: (u32, u32)) -> Result<String, ChartError> {
    let colors = spec
        .series
        .iter()
        .map(|s| parse_hex(&s.color))
        .collect::<Result<Vec<_>, _>>()?;

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        root.fill(&WHITE).map_err(draw_err)?;

        let x_max = spec.dates.len().saturating_sub(1).max(1) as f64;
        let (y_min, y_max) = y_bounds(spec);
        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(32)
            .y_label_area_size(64)
            .build_cartesian_2d(0f64..x_max, y_min..y_max)
            .map_err(draw_err)?;

        let dates = &spec.dates;
        let date_label = |x: &f64| {
            dates
                .get(x.round().max(0.0) as usize)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default()
        };
        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&date_label)
            .draw()
            .map_err(draw_err)?;

        for (series, color) in spec.series.iter().zip(colors) {
            let style = color.stroke_width(2);
            for (i, points) in segments(&series.values).into_iter().enumerate() {
                let anno = match spec.kind {
                    ChartKind::Line => chart.draw_series(LineSeries::new(points, style)),
                    ChartKind::Area => chart.draw_series(
                        AreaSeries::new(points, 0.0, color.mix(0.3)).border_style(style),
                    ),
                }
                .map_err(draw_err)?;
                if i == 0 {
                    anno.label(series.name.as_str())
                        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                }
            }
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_err)?;
        root.present().map_err(draw_err)?;
    }
    Ok(svg)
}
