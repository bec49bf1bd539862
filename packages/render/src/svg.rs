//! Standalone SVG plots of weekly rate series.
//!
//! Hand-built markup: one polyline per observed run (gaps break the
//! line rather than being drawn as zeroes), with the fitted curve
//! overlaid when a model is supplied.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use trolley_watch_fit::FittedModel;
use trolley_watch_trolley_models::WeeklyRateSeries;

use crate::RenderError;

const WIDTH: f64 = 960.0;
const HEIGHT: f64 = 420.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 28.0;
const MARGIN_BOTTOM: f64 = 40.0;

const OBSERVED_STROKE: &str = "#31708f";
const FITTED_STROKE: &str = "#c0392b";
const AXIS_STROKE: &str = "#333333";
const GRID_STROKE: &str = "#dddddd";

/// Maps week indexes and rates onto pixel coordinates.
struct Scale {
    last_index: f64,
    max_rate: f64,
}

impl Scale {
    #[allow(clippy::cast_precision_loss)] // week indexes stay far below 2^52
    fn new(series: &WeeklyRateSeries, model: Option<&FittedModel>) -> Self {
        let observed = series.points().iter().filter_map(|p| p.rate);
        let fitted = model.map_or_else(Vec::new, |m| m.fitted().to_vec());
        let max_rate = observed.chain(fitted).fold(1.0_f64, f64::max);

        Self {
            last_index: (series.len().saturating_sub(1)).max(1) as f64,
            // 5% headroom keeps the peak off the frame edge.
            max_rate: max_rate * 1.05,
        }
    }

    #[allow(clippy::cast_precision_loss)] // week indexes stay far below 2^52
    fn x(&self, index: usize) -> f64 {
        MARGIN_LEFT + (index as f64) / self.last_index * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn y(&self, rate: f64) -> f64 {
        MARGIN_TOP + (1.0 - rate / self.max_rate) * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }
}

/// Renders one region's weekly series as SVG markup.
///
/// Observed weeks draw as a blue line broken at every gap; isolated
/// observations between gaps draw as dots. When `model` is given its
/// fitted values overlay in red, aligned to week indexes `1..n`.
#[must_use]
pub fn series_plot(series: &WeeklyRateSeries, model: Option<&FittedModel>) -> String {
    let scale = Scale::new(series, model);
    let mut svg = String::new();

    writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    )
    .unwrap();
    writeln!(
        svg,
        r#"  <text x="{MARGIN_LEFT}" y="18" font-family="sans-serif" font-size="14">{} weekly trolley rate per 10,000</text>"#,
        series.region().official_name()
    )
    .unwrap();

    draw_axes(&mut svg, series, &scale);

    // Observed runs, broken at gaps.
    let mut run: Vec<(f64, f64)> = Vec::new();
    for (index, point) in series.points().iter().enumerate() {
        if let Some(rate) = point.rate {
            run.push((scale.x(index), scale.y(rate)));
        } else {
            flush_run(&mut svg, &mut run, OBSERVED_STROKE);
        }
    }
    flush_run(&mut svg, &mut run, OBSERVED_STROKE);

    if let Some(model) = model
        && model.observations() == series.len()
    {
        let mut fitted: Vec<(f64, f64)> = model
            .fitted()
            .iter()
            .enumerate()
            .map(|(offset, rate)| (scale.x(offset + 1), scale.y(*rate)))
            .collect();
        flush_run(&mut svg, &mut fitted, FITTED_STROKE);
        draw_legend(&mut svg);
    }

    writeln!(svg, "</svg>").unwrap();
    svg
}

/// Writes the plot for one region into `dir` as `<region_id>.svg`.
///
/// # Errors
///
/// Returns [`RenderError::Io`] when the directory cannot be created or
/// the file cannot be written.
pub fn write_series_plot(
    dir: &Path,
    series: &WeeklyRateSeries,
    model: Option<&FittedModel>,
) -> Result<PathBuf, RenderError> {
    std::fs::create_dir_all(dir).map_err(|source| RenderError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(format!("{}.svg", series.region().id()));
    let markup = series_plot(series, model);
    std::fs::write(&path, &markup).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;

    log::info!("Wrote {} ({} bytes)", path.display(), markup.len());
    Ok(path)
}

fn draw_axes(svg: &mut String, series: &WeeklyRateSeries, scale: &Scale) {
    let x0 = MARGIN_LEFT;
    let x1 = WIDTH - MARGIN_RIGHT;
    let y0 = HEIGHT - MARGIN_BOTTOM;
    let y1 = MARGIN_TOP;

    writeln!(
        svg,
        r#"  <line x1="{x0}" y1="{y0}" x2="{x1}" y2="{y0}" stroke="{AXIS_STROKE}" stroke-width="1" />"#
    )
    .unwrap();
    writeln!(
        svg,
        r#"  <line x1="{x0}" y1="{y0}" x2="{x0}" y2="{y1}" stroke="{AXIS_STROKE}" stroke-width="1" />"#
    )
    .unwrap();

    // Four rate gridlines with labels.
    for step in 1..=4 {
        let rate = scale.max_rate * f64::from(step) / 4.0;
        let y = scale.y(rate);
        writeln!(
            svg,
            r#"  <line x1="{x0}" y1="{y:.1}" x2="{x1}" y2="{y:.1}" stroke="{GRID_STROKE}" stroke-width="0.5" />"#
        )
        .unwrap();
        writeln!(
            svg,
            r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="end">{rate:.1}</text>"#,
            x0 - 6.0,
            y + 4.0
        )
        .unwrap();
    }

    // Week labels at the start, middle, and end of the window.
    for index in [0, series.len() / 2, series.len().saturating_sub(1)] {
        if let Some(point) = series.points().get(index) {
            writeln!(
                svg,
                r#"  <text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="11" text-anchor="middle">{}</text>"#,
                scale.x(index),
                y0 + 16.0,
                point.week_start
            )
            .unwrap();
        }
    }
}

fn draw_legend(svg: &mut String) {
    let x = WIDTH - MARGIN_RIGHT - 150.0;
    writeln!(
        svg,
        r#"  <line x1="{x}" y1="14" x2="{}" y2="14" stroke="{OBSERVED_STROKE}" stroke-width="1.5" />"#,
        x + 20.0
    )
    .unwrap();
    writeln!(
        svg,
        r#"  <text x="{}" y="18" font-family="sans-serif" font-size="11">observed</text>"#,
        x + 26.0
    )
    .unwrap();
    writeln!(
        svg,
        r#"  <line x1="{}" y1="14" x2="{}" y2="14" stroke="{FITTED_STROKE}" stroke-width="1.5" />"#,
        x + 86.0,
        x + 106.0
    )
    .unwrap();
    writeln!(
        svg,
        r#"  <text x="{}" y="18" font-family="sans-serif" font-size="11">fitted</text>"#,
        x + 112.0
    )
    .unwrap();
}

/// Emits the accumulated run as a polyline, or a dot when the run is a
/// single isolated observation, then clears it.
fn flush_run(svg: &mut String, run: &mut Vec<(f64, f64)>, stroke: &str) {
    match run.len() {
        0 => {}
        1 => {
            let (x, y) = run[0];
            writeln!(
                svg,
                r#"  <circle cx="{x:.1}" cy="{y:.1}" r="2.5" fill="{stroke}" />"#
            )
            .unwrap();
        }
        _ => {
            let coords: Vec<String> = run
                .iter()
                .map(|(x, y)| format!("{x:.1},{y:.1}"))
                .collect();
            writeln!(
                svg,
                r#"  <polyline points="{}" fill="none" stroke="{stroke}" stroke-width="1.5" />"#,
                coords.join(" ")
            )
            .unwrap();
        }
    }
    run.clear();
}

#[cfg(test)]
mod tests {
    use chrono::{Days, NaiveDate};
    use trolley_watch_fit::fit_model;
    use trolley_watch_region_models::HealthRegion;
    use trolley_watch_trolley_models::WeeklyPoint;

    use super::*;

    fn monday(offset_weeks: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2019, 1, 7).unwrap()
            + Days::new(7 * u64::try_from(offset_weeks).unwrap())
    }

    fn series_from(rates: &[Option<f64>]) -> WeeklyRateSeries {
        let points = rates
            .iter()
            .enumerate()
            .map(|(i, rate)| WeeklyPoint {
                week_start: monday(i),
                rate: *rate,
            })
            .collect();
        WeeklyRateSeries::new(HealthRegion::SouthWest, points)
    }

    fn dense_series(weeks: usize) -> WeeklyRateSeries {
        let mut values = vec![20.0_f64];
        for t in 1..weeks {
            let seasonal =
                2.0 * (std::f64::consts::TAU * f64::from(u16::try_from(t).unwrap()) / 52.0).sin();
            values.push(3.0 + 0.5 * values[t - 1] + seasonal);
        }
        series_from(&values.into_iter().map(Some).collect::<Vec<_>>())
    }

    #[test]
    fn plot_is_wellformed_svg_with_one_observed_line() {
        let svg = series_plot(&series_from(&[Some(4.0), Some(5.0), Some(6.0)]), None);

        assert!(svg.starts_with("<svg "));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert!(svg.contains("HSE South West"));
    }

    #[test]
    fn gaps_break_the_observed_line() {
        let svg = series_plot(
            &series_from(&[Some(4.0), Some(5.0), None, Some(6.0), Some(7.0)]),
            None,
        );
        assert_eq!(svg.matches("<polyline").count(), 2);
    }

    #[test]
    fn isolated_observations_draw_as_dots() {
        let svg = series_plot(
            &series_from(&[Some(4.0), Some(5.0), None, Some(6.0), None, Some(7.0)]),
            None,
        );
        assert_eq!(svg.matches("<polyline").count(), 1);
        assert_eq!(svg.matches("<circle").count(), 2);
    }

    #[test]
    fn fitted_overlay_adds_a_second_line_and_legend() {
        let series = dense_series(104);
        let model = fit_model(&series).unwrap();
        let svg = series_plot(&series, Some(&model));

        assert_eq!(svg.matches("<polyline").count(), 2);
        assert!(svg.contains(FITTED_STROKE));
        assert!(svg.contains(">fitted</text>"));
    }

    #[test]
    fn axis_labels_cover_the_window() {
        let series = dense_series(104);
        let svg = series_plot(&series, None);

        assert!(svg.contains("2019-01-07"));
        assert!(svg.contains("2020-12-28"));
    }

    #[test]
    fn write_creates_a_plot_file_per_region() {
        let dir = tempfile::tempdir().unwrap();
        let series = series_from(&[Some(4.0), Some(5.0), Some(6.0)]);

        let path = write_series_plot(dir.path(), &series, None).unwrap();

        assert_eq!(path, dir.path().join("south_west.svg"));
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("<svg "));
    }
}
