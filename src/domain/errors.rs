//! Domain errors. Used by ports and use cases.
//!
//! Adapters map infrastructure errors into these. "Not found" conditions in the
//! core (unknown county, unmapped MSA) are never errors; they surface as absence.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success status that was not retried, or retries were exhausted.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Malformed payload: {0}")]
    Parse(String),

    #[error("Mapping error: {0}")]
    Mapping(String),

    /// One MSA name observed with two different codes in the county→MSA mapping.
    #[error("MSA '{msa_name}' maps to both {first} and {second}")]
    MsaCodeConflict {
        msa_name: String,
        first: String,
        second: String,
    },

    #[error("Report error: {0}")]
    Report(String),
}
