//! Application use cases. Orchestrate domain logic via ports.

pub mod aggregation_service;
pub mod density_service;
pub mod year_resolver;

pub use aggregation_service::{CountLevel, Counts, InstitutionCountService};
pub use density_service::{DensityOutcome, DensityService};
pub use year_resolver::YearResolver;
