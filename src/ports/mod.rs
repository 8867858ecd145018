//! Port traits. API boundaries for the hexagon.
//!
//! The CLI drives the use cases directly; every outbound dependency (network,
//! disk) sits behind one of these traits.

pub mod outbound;

pub use outbound::{
    HttpPort, HttpResponse, InstitutionSource, PopulationSource, RecordCachePort, YearCachePort,
};
