#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! HSE health region taxonomy types.
//!
//! This crate defines the canonical set of six HSE health regions used
//! across the entire trolley-watch system. Every reporting ED hospital
//! belongs to exactly one region; the mapping itself lives in the
//! `trolley_watch_region` registry, not here.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One of the six HSE health regions introduced in the 2024 health
/// service restructuring.
///
/// The snake_case form (`dublin_midlands`, …) doubles as the region id
/// in registry TOML files, CLI arguments, and serialized output.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum HealthRegion {
    /// Dublin city south of the Liffey plus Kildare, Laois, Offaly,
    /// Longford, Westmeath and west Wicklow.
    DublinMidlands,
    /// North Dublin plus Meath, Louth, Cavan and Monaghan.
    DublinNorthEast,
    /// South-east Dublin plus Wicklow, Wexford, Carlow, Kilkenny,
    /// Waterford and south Tipperary.
    DublinSouthEast,
    /// Limerick, Clare and north Tipperary.
    MidWest,
    /// Cork and Kerry.
    SouthWest,
    /// Galway, Mayo, Roscommon, Sligo, Leitrim and Donegal.
    WestNorthWest,
}

impl HealthRegion {
    /// Returns the stable snake_case identifier for this region.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::DublinMidlands => "dublin_midlands",
            Self::DublinNorthEast => "dublin_north_east",
            Self::DublinSouthEast => "dublin_south_east",
            Self::MidWest => "mid_west",
            Self::SouthWest => "south_west",
            Self::WestNorthWest => "west_north_west",
        }
    }

    /// Returns the official HSE name for this region, as it appears in
    /// TrolleyGAR reports and CSO publications.
    #[must_use]
    pub const fn official_name(self) -> &'static str {
        match self {
            Self::DublinMidlands => "HSE Dublin and Midlands",
            Self::DublinNorthEast => "HSE Dublin and North East",
            Self::DublinSouthEast => "HSE Dublin and South East",
            Self::MidWest => "HSE Mid West",
            Self::SouthWest => "HSE South West",
            Self::WestNorthWest => "HSE West and North West",
        }
    }

    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::DublinMidlands,
            Self::DublinNorthEast,
            Self::DublinSouthEast,
            Self::MidWest,
            Self::SouthWest,
            Self::WestNorthWest,
        ]
    }
}

/// A region's registry configuration, loaded from an embedded TOML file.
///
/// Captures everything the toolchain needs to know about one health
/// region: which enum variant it is, its official name, and the ED
/// hospitals that report into it.
#[derive(Debug, Clone, Deserialize)]
pub struct RegionProfile {
    /// The region this profile describes (snake_case id in TOML).
    pub region: HealthRegion,
    /// Official HSE name; must match [`HealthRegion::official_name`].
    pub name: String,
    /// Counties covered, for documentation and sanity checks only.
    #[serde(default)]
    pub counties: Vec<String>,
    /// Reporting ED hospitals in this region.
    pub hospitals: Vec<HospitalEntry>,
}

/// One reporting hospital in a region profile.
#[derive(Debug, Clone, Deserialize)]
pub struct HospitalEntry {
    /// Canonical hospital name as printed in TrolleyGAR.
    pub name: String,
    /// Alternative spellings seen in INMO exports or older reports.
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr as _;

    #[test]
    fn id_matches_strum_serialization() {
        for region in HealthRegion::all() {
            assert_eq!(region.id(), region.to_string());
            assert_eq!(region.id(), region.as_ref());
        }
    }

    #[test]
    fn id_roundtrips_through_from_str() {
        for region in HealthRegion::all() {
            let parsed = HealthRegion::from_str(region.id()).unwrap();
            assert_eq!(parsed, *region);
        }
    }

    #[test]
    fn official_names_carry_hse_prefix() {
        for region in HealthRegion::all() {
            assert!(
                region.official_name().starts_with("HSE "),
                "{region:?} official name missing HSE prefix"
            );
        }
    }

    #[test]
    fn all_lists_six_regions() {
        assert_eq!(HealthRegion::all().len(), 6);
    }
}
