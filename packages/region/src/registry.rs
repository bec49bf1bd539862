//! Region registry — loads all region profiles from embedded TOML configs.
//!
//! Each `.toml` file in `packages/region/regions/` is baked into the binary
//! at compile time via [`include_str!`]. Hospital list changes (a renamed
//! hospital, a closed ED) are config edits, not code changes.

use trolley_watch_region_models::RegionProfile;

/// TOML configs embedded at compile time.
const REGION_TOMLS: &[(&str, &str)] = &[
    (
        "dublin_midlands",
        include_str!("../regions/dublin_midlands.toml"),
    ),
    (
        "dublin_north_east",
        include_str!("../regions/dublin_north_east.toml"),
    ),
    (
        "dublin_south_east",
        include_str!("../regions/dublin_south_east.toml"),
    ),
    ("mid_west", include_str!("../regions/mid_west.toml")),
    ("south_west", include_str!("../regions/south_west.toml")),
    (
        "west_north_west",
        include_str!("../regions/west_north_west.toml"),
    ),
];

/// Total number of configured regions (used in tests).
#[cfg(test)]
const EXPECTED_REGION_COUNT: usize = 6;

/// Parses a [`RegionProfile`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_region_toml(toml_str: &str) -> Result<RegionProfile, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

/// Returns all configured region profiles, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any TOML config is malformed (this is a compile-time guarantee
/// since the configs are embedded).
#[must_use]
pub fn all_profiles() -> Vec<RegionProfile> {
    REGION_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_region_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use trolley_watch_region_models::HealthRegion;

    use super::*;

    #[test]
    fn loads_all_regions() {
        let profiles = all_profiles();
        assert_eq!(profiles.len(), EXPECTED_REGION_COUNT);
    }

    #[test]
    fn every_region_has_exactly_one_profile() {
        let profiles = all_profiles();
        for region in HealthRegion::all() {
            let count = profiles.iter().filter(|p| p.region == *region).count();
            assert_eq!(count, 1, "{region:?} has {count} profiles");
        }
    }

    #[test]
    fn profile_names_match_official_names() {
        for profile in &all_profiles() {
            assert_eq!(
                profile.name,
                profile.region.official_name(),
                "{:?}: profile name disagrees with official name",
                profile.region
            );
        }
    }

    #[test]
    fn all_profiles_list_hospitals_and_counties() {
        for profile in &all_profiles() {
            assert!(
                !profile.hospitals.is_empty(),
                "{:?}: no hospitals configured",
                profile.region
            );
            assert!(
                !profile.counties.is_empty(),
                "{:?}: no counties configured",
                profile.region
            );
            for hospital in &profile.hospitals {
                assert!(
                    !hospital.name.trim().is_empty(),
                    "{:?}: empty hospital name",
                    profile.region
                );
            }
        }
    }

    #[test]
    fn hospital_names_are_unique_across_regions() {
        let profiles = all_profiles();
        let mut names: Vec<&str> = profiles
            .iter()
            .flat_map(|p| p.hospitals.iter().map(|h| h.name.as_str()))
            .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total, "duplicate hospital names in registry");
    }
}
