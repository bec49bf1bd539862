#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Health region registry and hospital name resolution.
//!
//! Six embedded TOML profiles (one per HSE health region) define which
//! ED hospitals report into which region. [`resolve::HospitalIndex`]
//! turns the profiles into a normalized lookup table that tolerates the
//! name drift seen across daily TrolleyGAR publications.

pub mod registry;
pub mod resolve;

pub use registry::all_profiles;
pub use resolve::{HospitalIndex, is_aggregate_row, normalize_name};
