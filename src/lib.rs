//! # Freight Record Lookup Service
//!
//! ## Overview
//! This library implements a read-only lookup service over a preloaded
//! tabular dataset: given a carrier DOT number, or a container number /
//! bill-of-lading reference optionally scoped by consignee, it returns the
//! single matching record or a not-found signal.
//!
//! ## Architecture
//! The system is composed of several key modules:
//! - `dataset`: CSV source loading and the immutable in-memory Record Table
//! - `normalize`: raw-cell normalization into the optional-value contract
//! - `records`: normalized carrier and container response shapes
//! - `lookup`: the ordered-scan lookup engine
//! - `api`: REST endpoints and outcome-to-status mapping
//! - `config`: configuration management and settings
//! - `errors`: centralized error handling and types
//!
//! ## Input/Output Specification
//! - **Input**: CSV source files (loaded once at startup), lookup queries
//! - **Output**: Normalized JSON records, not-found signals, readiness state
//! - **Guarantees**: the table is immutable after load; lookups are pure
//!   reads and idempotent
//!
//! ## Usage
//! ```rust,no_run
//! use freight_lookup::{config::Config, dataset, lookup::LookupEngine};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config.toml")?;
//!     let table = dataset::load_sources(&config.dataset.sources)?;
//!     let engine = LookupEngine::new(config.dataset.keys.clone(), Some(table));
//!     let record = engine.lookup_carrier(123)?;
//!     println!("Found: {}", record.is_some());
//!     Ok(())
//! }
//! ```

// Core modules
pub mod api;
pub mod config;
pub mod dataset;
pub mod errors;
pub mod lookup;
pub mod normalize;
pub mod records;

// Re-exports for convenience
pub use config::Config;
pub use errors::{LookupError, Result};
pub use lookup::LookupEngine;
pub use records::{CarrierRecord, ContainerRecord};

use std::sync::Arc;

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub engine: Arc<lookup::LookupEngine>,
}
