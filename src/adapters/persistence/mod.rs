//! File-backed persistence: institution snapshot cache, latest-year marker,
//! reference mapping loader, aggregation file reader.

pub mod aggregation_file;
mod atomic;
pub mod mapping_file;
pub mod record_cache;
pub mod year_cache;

pub use aggregation_file::{DEFAULT_INSTITUTIONS_PATH, load_aggregation};
pub use mapping_file::{DEFAULT_MAPPING_PATH, load_mapping};
pub use record_cache::JsonRecordCache;
pub use year_cache::FileYearCache;
