//! Infrastructure adapters. Implement outbound ports.
//!
//! HTTP, upstream APIs, filesystem, report files, console. Map errors to DomainError.

pub mod census;
pub mod http;
pub mod ipeds;
pub mod persistence;
pub mod report;
pub mod ui;
