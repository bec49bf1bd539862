//! Loads CSO regional population estimates.

use std::fs::File;
use std::path::Path;

use trolley_watch_trolley_models::PopulationTable;

use crate::IngestError;
use crate::parsing::{parse_count, parse_region};
use crate::require_column;

/// Loads per-region annual population figures from a CSV file.
///
/// Expects `region`, `year`, and `population` columns; the region cell
/// may hold either the snake_case id or the official HSE name, and the
/// population may carry thousands separators. Malformed rows and
/// repeated (region, year) pairs are skipped with a warning.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be read, a required
/// column is missing from the header, or no usable rows remain after
/// skipping.
pub fn load_population(path: &Path) -> Result<PopulationTable, IngestError> {
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

    let region_col = require_column(&headers, "region", path)?;
    let year_col = require_column(&headers, "year", path)?;
    let population_col = require_column(&headers, "population", path)?;

    let mut table = PopulationTable::new();
    let mut raw_rows = 0u64;
    let mut skipped = 0u64;

    for result in reader.records() {
        let record = result?;
        raw_rows += 1;

        let raw_region = record.get(region_col).unwrap_or("").trim();
        let Some(region) = parse_region(raw_region) else {
            log::warn!(
                "{}: row {raw_rows}: unknown region '{raw_region}', skipping",
                path.display()
            );
            skipped += 1;
            continue;
        };

        let raw_year = record.get(year_col).unwrap_or("").trim();
        let Ok(year) = raw_year.parse::<i32>() else {
            log::warn!(
                "{}: row {raw_rows}: unparseable year '{raw_year}', skipping",
                path.display()
            );
            skipped += 1;
            continue;
        };

        let raw_population = record.get(population_col).unwrap_or("");
        let Some(population) = parse_count(raw_population).filter(|p| *p > 0) else {
            log::warn!(
                "{}: row {raw_rows}: unparseable population '{raw_population}', skipping",
                path.display()
            );
            skipped += 1;
            continue;
        };

        if table.get(region, year).is_some() {
            log::warn!(
                "{}: duplicate population for {region} {year}, keeping first",
                path.display()
            );
            skipped += 1;
            continue;
        }
        table.insert(region, year, population);
    }

    if table.is_empty() {
        return Err(IngestError::Empty {
            path: path.to_path_buf(),
        });
    }

    log::info!(
        "{}: {} population figures from {raw_rows} rows ({skipped} skipped)",
        path.display(),
        table.len()
    );

    Ok(table)
}
