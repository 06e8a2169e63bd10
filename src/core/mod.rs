//! Core module for the cyclops pipeline
//!
//! Two pipelines live here, both synchronous and request-scoped:
//!
//! - **Ingestion**: `catalog` (query adapter) → `validator` → `ingest`
//!   (bounded retry controller) → `store` (bulk insert).
//! - **Projection**: `store` (most-recent read) → `propagation` →
//!   `graph` → `chart` (rendering contract).
//!
//! `definition` holds the immutable reference data both pipelines consult;
//! `models` the record shapes; `error` the taxonomy.

pub mod catalog;
pub mod chart;
pub mod definition;
pub mod error;
pub mod graph;
pub mod ingest;
pub mod models;
pub mod propagation;
pub mod store;
pub mod validator;

// Re-export commonly used types
pub use catalog::{CatalogSource, JsonCatalogSource, QueryAdapter, StarFields};
pub use chart::ChartRenderer;
pub use definition::ConstellationDefinition;
pub use error::{CyclopsError, Result, ResultExt};
pub use graph::{ConstellationGraph, GraphBuilder, StarVertex};
pub use ingest::{IngestionController, IngestionReport, DEFAULT_MAX_ATTEMPTS};
pub use models::{
    CatalogRecord, ProjectedPosition, ProjectionReport, RawRecord, RawRecordSet, RecordSet,
    ViewMode, SCHEMA_FIELDS,
};
pub use propagation::{propagate, SkyPosition};
pub use store::{SqliteStore, StarStore};
pub use validator::{check, validate, ValidationIssue};

/// Years per millennium, for the invocation surface's offset selector.
pub const YEARS_PER_MILLENNIUM: f64 = 1000.0;

/// Run the full projection pipeline for a stored snapshot: propagate every
/// star by `offset_years` under the given view mode and return both the
/// renderable graph and a serializable report.
pub fn project(
    set: &RecordSet,
    offset_years: f64,
    view: ViewMode,
) -> Result<(ConstellationGraph, ProjectionReport)> {
    let positions = propagate(set, offset_years, view.light_delay())?;
    let graph = GraphBuilder::build_at(set, &positions)?;
    let report = ProjectionReport {
        constellation: set.constellation.clone(),
        offset_years,
        view,
        retrieved_at: set.retrieved_at,
        positions,
    };
    Ok((graph, report))
}
