//! Console output: banner, spinner, ranking tables.
//!
//! Banner and spinner draw on stderr. Stdout carries command results only:
//! JSON dumps and the ranking tables.

pub mod banner;
pub mod progress;
pub mod report;

pub use progress::Spinner;
pub use report::{RankedRow, bottom_ranked, print_rankings, top_ranked};

/// Prints the title banner. Call once at startup, after tracing init.
pub fn init_ui(subtitle: &str) {
    banner::print_title(subtitle);
}
