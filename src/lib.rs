//! cyclops - constellation catalog ingestion and temporal projection
//!
//! This library ingests stellar catalog data for named constellations,
//! stores it with a retrieval timestamp, and reconstructs a constellation's
//! appearance at an arbitrary offset in time, rendered as a connected
//! star-graph chart.
//!
//! # Architecture
//!
//! This crate follows the "Library-First" pattern:
//! - **lib.rs / core/**: pure pipeline logic, no CLI concerns
//! - **bin/cyclops.rs**: thin clap wrapper over the library
//!
//! The two pipelines:
//!
//! ```text
//! ingest:   CatalogSource → QueryAdapter → validator → IngestionController → StarStore
//! project:  StarStore → propagate → GraphBuilder → ChartRenderer
//! ```
//!
//! Both are single-threaded and request-scoped; the only blocking
//! operations are the external catalog lookups and the storage calls, each
//! of which is an independent scoped resource.

pub mod config;
pub mod core;

pub use config::CyclopsConfig;
pub use core::{
    project, propagate, CatalogSource, ChartRenderer, ConstellationDefinition,
    ConstellationGraph, CyclopsError, GraphBuilder, IngestionController, IngestionReport,
    JsonCatalogSource, ProjectedPosition, ProjectionReport, QueryAdapter, RecordSet, Result,
    SqliteStore, StarStore, ViewMode, YEARS_PER_MILLENNIUM,
};

/// Returns the version of the cyclops library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
