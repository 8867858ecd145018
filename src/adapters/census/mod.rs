//! Census ACS population.

pub mod acs;

pub use acs::{ACS_BASE_URL, AcsPopulationAdapter};
