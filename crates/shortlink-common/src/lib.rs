//! # shortlink-common
//!
//! Shared wire types, configuration, and validation used by the short-link admin
//! client and console. No network code lives here, just data and contracts.

pub mod config;
pub mod envelope;
pub mod models;
pub mod validation;

pub use envelope::{DomainFailure, Envelope, Page};
pub use models::ViewMode;
pub use validation::ValidationError;
