//! Hospital name → health region resolution.
//!
//! Hospital names drift across daily publications ("Tallaght University
//! Hospital", "Tallaght Hospital", "AMNCH"), so every lookup goes through
//! a normalized index built from the registry profiles.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use trolley_watch_region_models::{HealthRegion, RegionProfile};

use crate::registry::all_profiles;

/// Normalizes a hospital name for index lookups.
///
/// Lowercases, strips periods/apostrophes/commas, treats hyphens as
/// spaces, and collapses whitespace runs, so `"St. James's Hospital"`,
/// `"St James's Hospital "` and `"ST JAMESS HOSPITAL"` all land on the
/// same key.
#[must_use]
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_space = false;
    for c in raw.chars() {
        match c {
            '.' | ',' | '\'' | '\u{2019}' => {}
            c if c.is_whitespace() || c == '-' => {
                if !out.is_empty() {
                    pending_space = true;
                }
            }
            c => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                out.extend(c.to_lowercase());
            }
        }
    }
    out
}

/// Returns `true` for publication roll-up rows that must not be
/// attributed to any single hospital.
///
/// The daily feed carries national and per-group totals ("National
/// Total", "Eastern Total", "HSE West and North West") interleaved with
/// the hospital rows. No reporting hospital's name starts with "HSE".
#[must_use]
pub fn is_aggregate_row(raw: &str) -> bool {
    let normalized = normalize_name(raw);
    normalized == "national total"
        || normalized.ends_with(" total")
        || normalized.starts_with("hse ")
}

/// Lookup table from normalized hospital names (aliases included) to
/// their health region.
#[derive(Debug, Clone)]
pub struct HospitalIndex {
    entries: HashMap<String, HealthRegion>,
}

impl HospitalIndex {
    /// Builds the index from the embedded region registry.
    #[must_use]
    pub fn from_registry() -> Self {
        Self::from_profiles(&all_profiles())
    }

    /// Builds the index from the given region profiles.
    ///
    /// The first profile to claim a name keeps it; later claims of the
    /// same normalized name are dropped with a warning.
    #[must_use]
    pub fn from_profiles(profiles: &[RegionProfile]) -> Self {
        let mut entries = HashMap::new();
        for profile in profiles {
            for hospital in &profile.hospitals {
                Self::index_name(&mut entries, &hospital.name, profile.region);
                for alias in &hospital.aliases {
                    Self::index_name(&mut entries, alias, profile.region);
                }
            }
        }
        Self { entries }
    }

    fn index_name(entries: &mut HashMap<String, HealthRegion>, name: &str, region: HealthRegion) {
        let key = normalize_name(name);
        if key.is_empty() {
            log::warn!("Ignoring empty hospital name in {region} profile");
            return;
        }
        match entries.entry(key) {
            Entry::Occupied(existing) => {
                log::warn!(
                    "Hospital name '{name}' already claimed by {}; ignoring {region} claim",
                    existing.get()
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(region);
            }
        }
    }

    /// Resolves a raw hospital name from the daily feed to its region.
    ///
    /// Returns `None` for names absent from every profile, including
    /// aggregate rows.
    #[must_use]
    pub fn resolve(&self, raw: &str) -> Option<HealthRegion> {
        self.entries.get(&normalize_name(raw)).copied()
    }

    /// Number of indexed names, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no names are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
