//! msa-density: Florida institution counts by county and MSA, and per-capita
//! competition density, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
