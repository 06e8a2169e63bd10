//! Temporal projection integration tests
//!
//! Verifies the propagation pipeline's required numerical properties over
//! realistic catalog fixtures: zero-offset idempotence, the light-delay
//! displacement law, and error behavior that aborts a projection before
//! any chart could be produced.

use cyclops::core::propagation::{parse_dec_deg, parse_ra_deg, IDEMPOTENCE_TOLERANCE_DEG};
use cyclops::core::ChartRenderer;
use cyclops::{
    project, propagate, ConstellationDefinition, CyclopsError, IngestionController,
    JsonCatalogSource, QueryAdapter, RecordSet, SqliteStore, StarStore, ViewMode,
    YEARS_PER_MILLENNIUM,
};
use tempfile::TempDir;

// =============================================================================
// TEST HELPERS
// =============================================================================

/// Ingest the Aquarius fixture into a throwaway store and read it back,
/// so projections run against data that went through the real pipeline.
fn stored_aquarius(dir: &TempDir) -> RecordSet {
    let def = ConstellationDefinition::from_file("tests/fixtures/constellations.json").unwrap();
    let source = JsonCatalogSource::from_file("tests/fixtures/catalog.json").unwrap();
    let adapter = QueryAdapter::new(source, &def);
    let store = SqliteStore::new(dir.path().join("stars.db"));
    IngestionController::new()
        .ingest(&adapter, &store, "Aquarius")
        .unwrap();
    store.most_recent("Aquarius").unwrap()
}

// =============================================================================
// IDEMPOTENCE
// =============================================================================

#[test]
fn test_zero_offset_apparent_view_is_identity() {
    let dir = TempDir::new().unwrap();
    let set = stored_aquarius(&dir);

    let out = propagate(&set, 0.0, false).unwrap();
    assert_eq!(out.len(), set.len());

    for pos in &out {
        let rec = set.record(&pos.identifier).unwrap();
        let ra = parse_ra_deg(&rec.identifier, &rec.ra).unwrap();
        let dec = parse_dec_deg(&rec.identifier, &rec.dec).unwrap();
        assert!(
            (pos.ra_deg - ra).abs() < IDEMPOTENCE_TOLERANCE_DEG,
            "{}: RA {} vs {}",
            pos.identifier,
            pos.ra_deg,
            ra
        );
        assert!((pos.dec_deg - dec).abs() < IDEMPOTENCE_TOLERANCE_DEG);
    }
}

#[test]
fn test_real_view_moves_even_at_zero_offset() {
    let dir = TempDir::new().unwrap();
    let set = stored_aquarius(&dir);

    let apparent = propagate(&set, 0.0, false).unwrap();
    let real = propagate(&set, 0.0, true).unwrap();

    // every fixture star has nonzero proper motion and finite distance,
    // so the light-delay pass must displace each one
    for (a, r) in apparent.iter().zip(&real) {
        assert_eq!(a.identifier, r.identifier);
        assert!(a.ra_deg != r.ra_deg || a.dec_deg != r.dec_deg, "{}", a.identifier);
    }
}

// =============================================================================
// LIGHT-DELAY DISPLACEMENT
// =============================================================================

#[test]
fn test_light_delay_scales_with_distance() {
    let dir = TempDir::new().unwrap();
    let set = stored_aquarius(&dir);
    let offset = 3.0 * YEARS_PER_MILLENNIUM;

    let apparent = propagate(&set, offset, false).unwrap();
    let real = propagate(&set, offset, true).unwrap();

    for (a, r) in apparent.iter().zip(&real) {
        let rec = set.record(&a.identifier).unwrap();
        let distance_ly = 1000.0 / rec.parallax * 3.26156;
        let pm_total_mas =
            (rec.pm_ra * rec.pm_ra + rec.pm_dec * rec.pm_dec).sqrt();
        // expected extra displacement: distance_ly years of total motion
        let expected_deg = pm_total_mas * distance_ly / 3_600_000.0;

        let d_ra = (r.ra_deg - a.ra_deg) * a.dec_deg.to_radians().cos();
        let d_dec = r.dec_deg - a.dec_deg;
        let actual_deg = (d_ra * d_ra + d_dec * d_dec).sqrt();

        let rel = (actual_deg - expected_deg).abs() / expected_deg;
        assert!(rel < 1e-2, "{}: actual {actual_deg} expected {expected_deg}", a.identifier);
    }
}

// =============================================================================
// FAILURE BEFORE RENDERING
// =============================================================================

#[test]
fn test_bad_parallax_aborts_whole_projection() {
    let dir = TempDir::new().unwrap();
    let mut set = stored_aquarius(&dir);
    set.records[2].parallax = 0.0;

    let err = project(&set, YEARS_PER_MILLENNIUM, ViewMode::Real).unwrap_err();
    assert!(matches!(err, CyclopsError::InvalidParallax { .. }));
}

// =============================================================================
// PIPELINE TO CHART
// =============================================================================

#[test]
fn test_store_to_chart_pipeline() {
    let dir = TempDir::new().unwrap();
    let set = stored_aquarius(&dir);

    let (graph, report) = project(&set, -8.0 * YEARS_PER_MILLENNIUM, ViewMode::Apparent).unwrap();
    assert_eq!(graph.vertex_count(), 4);
    assert_eq!(graph.edge_count(), 3);
    assert_eq!(report.offset_years, -8000.0);

    let svg = ChartRenderer::render_svg(&graph);
    assert_eq!(svg.matches("<circle").count(), 4);
    assert_eq!(svg.matches("<line").count(), 3);

    // the report serializes cleanly for downstream consumers
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("Aquarius"));
}
