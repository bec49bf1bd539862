#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the trolley rate analysis tool.
//!
//! ```text
//! trolley_watch fit reports.csv --population population.csv
//! trolley_watch fit reports.csv --population population.csv --gaps interpolate --forecast 12
//! trolley_watch series reports.csv --population population.csv --out weekly.csv
//! trolley_watch series reports.csv --population population.csv --wide
//! trolley_watch regions
//! ```
//!
//! Reads daily TrolleyGAR hospital counts, aggregates them into weekly
//! rates per 10,000 population, and fits an AR(1) plus annual-cycle
//! model per HSE health region.

use std::fmt::Write;
use std::path::PathBuf;
use std::time::Instant;

use chrono::{Days, NaiveDate};
use clap::{Parser, Subcommand};
use trolley_watch_fit::{FittedModel, fit_model};
use trolley_watch_ingest::{load_population, load_reports};
use trolley_watch_region::{HospitalIndex, all_profiles};
use trolley_watch_region_models::HealthRegion;
use trolley_watch_render::{RegionReport, forecast_table, model_summary, write_series_plot};
use trolley_watch_series::{GapPolicy, build_weekly_series};
use trolley_watch_trolley_models::{PopulationTable, TrolleyReport, WeeklyRateSeries};

#[derive(Parser)]
#[command(name = "trolley_watch", about = "HSE trolley count analysis tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fit the AR(1) plus annual-cycle model per region
    Fit {
        /// CSV of daily TrolleyGAR hospital counts
        reports: PathBuf,
        /// CSV of regional population by year
        #[arg(long)]
        population: PathBuf,
        /// Comma-separated region ids (overrides `TROLLEY_WATCH_REGIONS` env var)
        #[arg(long)]
        regions: Option<String>,
        /// How to handle missing weeks: fail, interpolate, or truncate
        #[arg(long, default_value = "fail")]
        gaps: GapPolicy,
        /// Only use reports on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Only use reports on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// Weeks to project beyond the fitted window
        #[arg(long)]
        forecast: Option<usize>,
        /// Directory for per-region SVG plots
        #[arg(long)]
        plot_dir: Option<PathBuf>,
        /// Emit the report as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Export weekly rate series as CSV
    Series {
        /// CSV of daily TrolleyGAR hospital counts
        reports: PathBuf,
        /// CSV of regional population by year
        #[arg(long)]
        population: PathBuf,
        /// Comma-separated region ids (overrides `TROLLEY_WATCH_REGIONS` env var)
        #[arg(long)]
        regions: Option<String>,
        /// Only use reports on or after this date (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Only use reports on or before this date (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,
        /// One row per week with a rate column per region
        #[arg(long)]
        wide: bool,
        /// Output path; prints to standard output when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the HSE health regions
    Regions,
}

#[allow(clippy::too_many_lines)]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Regions => {
            let profiles = all_profiles();
            println!("{:<18} {:<28} {}", "ID", "NAME", "HOSPITALS");
            println!("{}", "-".repeat(56));
            for region in HealthRegion::all() {
                let hospitals = profiles
                    .iter()
                    .find(|profile| profile.region == *region)
                    .map_or(0, |profile| profile.hospitals.len());
                println!(
                    "{:<18} {:<28} {hospitals}",
                    region.id(),
                    region.official_name()
                );
            }
        }
        Commands::Fit {
            reports,
            population,
            regions,
            gaps,
            from,
            to,
            forecast,
            plot_dir,
            json,
        } => {
            let start = Instant::now();

            let index = HospitalIndex::from_registry();
            let daily_totals = filter_reports(load_reports(&reports, &index)?, from, to);
            let population = load_population(&population)?;
            let regions = selected_regions(regions);

            let mut json_reports: Vec<RegionReport> = Vec::new();
            let mut fitted = 0_usize;

            for region in &regions {
                match fit_region(*region, &daily_totals, &population, gaps) {
                    Ok((series, model)) => {
                        fitted += 1;
                        let projection = forecast.map(|horizon| model.forecast(horizon));

                        if let Some(dir) = plot_dir.as_deref() {
                            write_series_plot(dir, &series, Some(&model))?;
                        }

                        if json {
                            json_reports.push(RegionReport::from_model(&model, projection));
                        } else {
                            print!("{}", model_summary(&model));
                            if let Some(points) = &projection {
                                println!();
                                print!("{}", forecast_table(points));
                            }
                            println!();
                        }
                    }
                    Err(e) => log::error!("Failed to fit {}: {e}", region.id()),
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&json_reports)?);
            }

            if fitted == 0 && !regions.is_empty() {
                return Err("No region could be fitted".into());
            }

            log::info!(
                "Fitted {fitted}/{} region(s) in {:.1}s",
                regions.len(),
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Series {
            reports,
            population,
            regions,
            from,
            to,
            wide,
            out,
        } => {
            let index = HospitalIndex::from_registry();
            let daily_totals = filter_reports(load_reports(&reports, &index)?, from, to);
            let population = load_population(&population)?;
            let regions = selected_regions(regions);

            let mut collected: Vec<WeeklyRateSeries> = Vec::new();
            for region in &regions {
                match build_weekly_series(&daily_totals, &population, *region) {
                    Ok(series) => collected.push(series),
                    Err(e) => log::error!("Failed to build series for {}: {e}", region.id()),
                }
            }

            let output = if wide {
                wide_series_csv(&collected)
            } else {
                long_series_csv(&collected)
            };

            if let Some(path) = out {
                std::fs::write(&path, &output)?;
                log::info!(
                    "Wrote {} ({} region series)",
                    path.display(),
                    collected.len()
                );
            } else {
                print!("{output}");
            }
        }
    }

    Ok(())
}

/// Returns the regions to analyse, filtered by the `--regions` flag or
/// the `TROLLEY_WATCH_REGIONS` environment variable. If neither is set,
/// all six regions are returned.
fn selected_regions(cli_filter: Option<String>) -> Vec<HealthRegion> {
    let filter = cli_filter.or_else(|| std::env::var("TROLLEY_WATCH_REGIONS").ok());

    let all = HealthRegion::all();

    let Some(filter_str) = filter else {
        return all.to_vec();
    };

    let ids: Vec<&str> = filter_str.split(',').map(str::trim).collect();

    let selected: Vec<HealthRegion> = all
        .iter()
        .copied()
        .filter(|region| ids.contains(&region.id()))
        .collect();

    if selected.is_empty() {
        log::warn!(
            "No matching regions for filter {:?}. Available: {}",
            ids,
            all.iter()
                .map(|region| region.id())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    selected
}

/// Applies the optional `--from`/`--to` date window to daily totals.
fn filter_reports(
    reports: Vec<TrolleyReport>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Vec<TrolleyReport> {
    let before = reports.len();
    let filtered: Vec<TrolleyReport> = reports
        .into_iter()
        .filter(|r| from.is_none_or(|d| r.date >= d) && to.is_none_or(|d| r.date <= d))
        .collect();

    if filtered.len() < before {
        log::info!("Date window keeps {} of {before} daily totals", filtered.len());
    }

    filtered
}

/// Builds, gap-resolves, and fits one region's weekly series.
fn fit_region(
    region: HealthRegion,
    reports: &[TrolleyReport],
    population: &PopulationTable,
    gaps: GapPolicy,
) -> Result<(WeeklyRateSeries, FittedModel), Box<dyn std::error::Error>> {
    let series = build_weekly_series(reports, population, region)?;
    let series = gaps.apply(series)?;
    let model = fit_model(&series)?;
    Ok((series, model))
}

/// Long CSV layout, one row per (region, week). Gap weeks leave the
/// rate field empty.
fn long_series_csv(collected: &[WeeklyRateSeries]) -> String {
    let mut output = String::new();
    writeln!(output, "region,week_start,rate").unwrap();

    for series in collected {
        let id = series.region().id();
        for point in series.points() {
            match point.rate {
                Some(rate) => writeln!(output, "{id},{},{rate}", point.week_start).unwrap(),
                None => writeln!(output, "{id},{},", point.week_start).unwrap(),
            }
        }
    }

    output
}

/// Wide CSV layout, one row per week with a rate column per region.
/// Weeks outside a region's span and gap weeks are empty cells.
fn wide_series_csv(collected: &[WeeklyRateSeries]) -> String {
    let mut output = String::new();

    write!(output, "week_start").unwrap();
    for series in collected {
        write!(output, ",{}", series.region().id()).unwrap();
    }
    writeln!(output).unwrap();

    let first = collected.iter().filter_map(WeeklyRateSeries::first_week).min();
    let last = collected.iter().filter_map(WeeklyRateSeries::last_week).max();
    let (Some(first), Some(last)) = (first, last) else {
        return output;
    };

    let mut monday = first;
    while monday <= last {
        write!(output, "{monday}").unwrap();
        for series in collected {
            match rate_on(series, monday) {
                Some(rate) => write!(output, ",{rate}").unwrap(),
                None => output.push(','),
            }
        }
        writeln!(output).unwrap();
        monday = monday + Days::new(7);
    }

    output
}

/// Looks up a series' rate for the week starting on `monday`.
fn rate_on(series: &WeeklyRateSeries, monday: NaiveDate) -> Option<f64> {
    let first = series.first_week()?;
    let offset = usize::try_from((monday - first).num_days() / 7).ok()?;
    series.points().get(offset).and_then(|point| point.rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_fit(extra: &[&str]) -> Commands {
        let mut argv = vec![
            "trolley_watch",
            "fit",
            "reports.csv",
            "--population",
            "pop.csv",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn gap_policy_parses_from_the_command_line() {
        let Commands::Fit { gaps, .. } = parse_fit(&["--gaps", "interpolate"]) else {
            panic!("expected the fit subcommand");
        };
        assert_eq!(gaps, GapPolicy::Interpolate);
    }

    #[test]
    fn gap_policy_defaults_to_fail() {
        let Commands::Fit { gaps, .. } = parse_fit(&[]) else {
            panic!("expected the fit subcommand");
        };
        assert_eq!(gaps, GapPolicy::Fail);
    }

    #[test]
    fn unknown_gap_policy_is_rejected() {
        let result = Cli::try_parse_from([
            "trolley_watch",
            "fit",
            "reports.csv",
            "--population",
            "pop.csv",
            "--gaps",
            "zero_fill",
        ]);
        assert!(result.is_err());
    }
}
