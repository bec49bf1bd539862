//! Loads the daily TrolleyGAR export and rolls hospital rows up into
//! per-region daily totals.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::path::Path;

use chrono::NaiveDate;
use trolley_watch_region::{HospitalIndex, is_aggregate_row, normalize_name};
use trolley_watch_region_models::HealthRegion;
use trolley_watch_trolley_models::TrolleyReport;

use crate::IngestError;
use crate::parsing::{parse_count, parse_report_date};
use crate::require_column;

/// Loads daily per-region trolley totals from a TrolleyGAR CSV export.
///
/// Hospital rows are attributed to regions via `index` and summed per
/// (date, region). Publication roll-up rows ("National Total", group
/// totals) are ignored; rows with unknown hospitals, unparseable dates
/// or counts, and repeated (date, hospital) pairs are skipped with a
/// warning. The result is sorted by date, then region, and the same
/// file always produces the same output.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, a required
/// column is missing from the header, or no usable rows remain after
/// skipping.
pub fn load_reports(path: &Path, index: &HospitalIndex) -> Result<Vec<TrolleyReport>, IngestError> {
    let file = File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let date_col = require_column(&headers, "report_date", path)?;
    let hospital_col = require_column(&headers, "hospital", path)?;
    let count_col = require_column(&headers, "total_trolleys", path)?;

    let mut totals: BTreeMap<(NaiveDate, HealthRegion), u32> = BTreeMap::new();
    let mut seen: HashSet<(NaiveDate, String)> = HashSet::new();
    let mut raw_rows = 0u64;
    let mut skipped = 0u64;

    for result in reader.records() {
        let record = result?;
        raw_rows += 1;

        let hospital = record.get(hospital_col).unwrap_or("").trim();
        if hospital.is_empty() {
            log::warn!(
                "{}: row {raw_rows}: empty hospital name, skipping",
                path.display()
            );
            skipped += 1;
            continue;
        }
        if is_aggregate_row(hospital) {
            log::debug!("{}: skipping roll-up row '{hospital}'", path.display());
            continue;
        }

        let raw_date = record.get(date_col).unwrap_or("");
        let Some(date) = parse_report_date(raw_date) else {
            log::warn!(
                "{}: row {raw_rows}: unparseable report_date '{raw_date}', skipping",
                path.display()
            );
            skipped += 1;
            continue;
        };

        let Some(region) = index.resolve(hospital) else {
            log::warn!(
                "{}: row {raw_rows}: unknown hospital '{hospital}', skipping",
                path.display()
            );
            skipped += 1;
            continue;
        };

        let raw_count = record.get(count_col).unwrap_or("");
        let Some(count) = parse_count(raw_count) else {
            log::warn!(
                "{}: row {raw_rows}: unparseable total_trolleys '{raw_count}', skipping",
                path.display()
            );
            skipped += 1;
            continue;
        };

        if !seen.insert((date, normalize_name(hospital))) {
            log::warn!(
                "{}: duplicate row for '{hospital}' on {date}, keeping first",
                path.display()
            );
            skipped += 1;
            continue;
        }

        let total = totals.entry((date, region)).or_insert(0);
        *total = total.saturating_add(count);
    }

    if totals.is_empty() {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    }

    let reports: Vec<TrolleyReport> = totals
        .into_iter()
        .map(|((date, region), count)| TrolleyReport {
            date,
            region,
            count,
        })
        .collect();

    log::info!(
        "{}: {} daily region totals from {raw_rows} rows ({skipped} skipped)",
        path.display(),
        reports.len()
    );

    Ok(reports)
}
