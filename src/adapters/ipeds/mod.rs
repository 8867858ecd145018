//! IPEDS institution directory (Urban Institute Education Data API).

pub mod client;

pub use client::{DEFAULT_PER_PAGE, IPEDS_DIRECTORY_URL, IpedsClient};
