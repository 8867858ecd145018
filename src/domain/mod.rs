//! Core domain layer. No external I/O dependencies.
//!
//! County identity, record enrichment, MSA mapping, aggregation and the density
//! calculation are pure transformations over in-memory data.

pub mod aggregate;
pub mod county;
pub mod density;
pub mod enrich;
pub mod entities;
pub mod errors;
pub mod msa;

pub use county::CountyTable;
pub use density::{DensityCalculator, DensityDiagnostics};
pub use enrich::RecordEnricher;
pub use entities::{
    AggregationResult, DensityRecord, InstitutionRecord, MsaInfo, MsaMappingDocument,
    PopulationRecord,
};
pub use errors::DomainError;
