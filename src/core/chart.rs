//! Sky-chart rendering contract
//!
//! A pure function from a [`ConstellationGraph`] to an SVG document. The
//! interactive front-end and image shuttling stay external; this module only
//! fixes the output contract: scatter-plus-line rendering, RA axis inverted
//! (conventional sky-chart orientation), uniform point size and stroke.

use super::graph::ConstellationGraph;

/// Canvas width in pixels
const WIDTH: f64 = 640.0;
/// Canvas height in pixels
const HEIGHT: f64 = 480.0;
/// Margin around the plotted area in pixels
const MARGIN: f64 = 40.0;
/// Uniform star marker radius
const STAR_RADIUS: f64 = 4.0;
/// Uniform ink color for markers and lines
const INK: &str = "#191919";

/// Fixed-style chart renderer.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartRenderer;

impl ChartRenderer {
    /// Render a constellation graph as an SVG document.
    ///
    /// Pure: the same graph always yields the same document. Vertices are
    /// drawn in record order, edges in insertion order. The x axis is
    /// inverted so right ascension increases to the left.
    pub fn render_svg(graph: &ConstellationGraph) -> String {
        let (ra_min, ra_max, dec_min, dec_max) = bounds(graph);
        let ra_span = (ra_max - ra_min).max(f64::EPSILON);
        let dec_span = (dec_max - dec_min).max(f64::EPSILON);

        // RA inverted: larger RA maps to smaller x
        let x = |ra: f64| MARGIN + (ra_max - ra) / ra_span * (WIDTH - 2.0 * MARGIN);
        let y = |dec: f64| MARGIN + (dec_max - dec) / dec_span * (HEIGHT - 2.0 * MARGIN);

        let mut svg = String::with_capacity(1024);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
        ));
        svg.push('\n');
        svg.push_str(&format!(
            r#"  <rect width="{WIDTH}" height="{HEIGHT}" fill="white"/>"#
        ));
        svg.push('\n');

        for (a, b) in graph.edges() {
            svg.push_str(&format!(
                r#"  <line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{INK}" stroke-width="1"/>"#,
                x(a.ra_deg),
                y(a.dec_deg),
                x(b.ra_deg),
                y(b.dec_deg),
            ));
            svg.push('\n');
        }

        for v in graph.vertices() {
            svg.push_str(&format!(
                r#"  <circle cx="{:.2}" cy="{:.2}" r="{STAR_RADIUS}" fill="{INK}"/>"#,
                x(v.ra_deg),
                y(v.dec_deg),
            ));
            svg.push('\n');
        }

        svg.push_str("</svg>\n");
        svg
    }
}

/// Bounding box over all vertex positions, degenerating gracefully for
/// single-star graphs.
fn bounds(graph: &ConstellationGraph) -> (f64, f64, f64, f64) {
    let mut ra_min = f64::INFINITY;
    let mut ra_max = f64::NEG_INFINITY;
    let mut dec_min = f64::INFINITY;
    let mut dec_max = f64::NEG_INFINITY;
    for v in graph.vertices() {
        ra_min = ra_min.min(v.ra_deg);
        ra_max = ra_max.max(v.ra_deg);
        dec_min = dec_min.min(v.dec_deg);
        dec_max = dec_max.max(v.dec_deg);
    }
    if ra_min > ra_max {
        // empty graph
        (0.0, 1.0, 0.0, 1.0)
    } else {
        (ra_min, ra_max, dec_min, dec_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::GraphBuilder;
    use crate::core::models::{CatalogRecord, ProjectedPosition, RecordSet};
    use chrono::Utc;

    fn two_star_graph() -> ConstellationGraph {
        let records = vec![
            CatalogRecord {
                identifier: "alf Aqr".to_string(),
                ra: "22 05 47.0360".to_string(),
                dec: "-00 19 11.457".to_string(),
                pm_ra: 18.77,
                pm_dec: -9.34,
                parallax: 6.23,
                constellation: "Aquarius".to_string(),
                time: Utc::now(),
                neighbors: vec!["bet Aqr".to_string()],
            },
            CatalogRecord {
                identifier: "bet Aqr".to_string(),
                ra: "21 31 33.5341".to_string(),
                dec: "-05 34 16.232".to_string(),
                pm_ra: 18.77,
                pm_dec: -8.21,
                parallax: 6.07,
                constellation: "Aquarius".to_string(),
                time: Utc::now(),
                neighbors: vec!["alf Aqr".to_string()],
            },
        ];
        let set = RecordSet {
            constellation: "Aquarius".to_string(),
            retrieved_at: Utc::now(),
            records,
        };
        GraphBuilder::build(&set).unwrap()
    }

    #[test]
    fn test_svg_contains_markers_and_edge() {
        let svg = ChartRenderer::render_svg(&two_star_graph());
        assert_eq!(svg.matches("<circle").count(), 2);
        assert_eq!(svg.matches("<line").count(), 1);
        assert!(svg.contains(INK));
    }

    #[test]
    fn test_render_is_deterministic() {
        let graph = two_star_graph();
        assert_eq!(
            ChartRenderer::render_svg(&graph),
            ChartRenderer::render_svg(&graph)
        );
    }

    #[test]
    fn test_ra_axis_inverted() {
        let graph = two_star_graph();
        // alf Aqr has the larger RA, so it must be drawn further left
        let svg = ChartRenderer::render_svg(&graph);
        let cx: Vec<f64> = svg
            .lines()
            .filter(|l| l.contains("<circle"))
            .map(|l| {
                let start = l.find("cx=\"").unwrap() + 4;
                let end = l[start..].find('"').unwrap() + start;
                l[start..end].parse().unwrap()
            })
            .collect();
        // vertices render in record order: alf first
        assert!(cx[0] < cx[1]);
    }

    #[test]
    fn test_single_star_chart_does_not_blow_up() {
        let set = RecordSet {
            constellation: "Aquarius".to_string(),
            retrieved_at: Utc::now(),
            records: vec![CatalogRecord {
                identifier: "alf Aqr".to_string(),
                ra: "22 05 47.0360".to_string(),
                dec: "-00 19 11.457".to_string(),
                pm_ra: 18.77,
                pm_dec: -9.34,
                parallax: 6.23,
                constellation: "Aquarius".to_string(),
                time: Utc::now(),
                neighbors: Vec::new(),
            }],
        };
        let graph = GraphBuilder::build(&set).unwrap();
        let svg = ChartRenderer::render_svg(&graph);
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.matches("<line").count() == 0);
        assert!(!svg.contains("NaN"));
    }

    #[test]
    fn test_build_at_positions_flow_through() {
        let graph = {
            let set = RecordSet {
                constellation: "Aquarius".to_string(),
                retrieved_at: Utc::now(),
                records: vec![CatalogRecord {
                    identifier: "alf Aqr".to_string(),
                    ra: "22 05 47.0360".to_string(),
                    dec: "-00 19 11.457".to_string(),
                    pm_ra: 0.0,
                    pm_dec: 0.0,
                    parallax: 6.23,
                    constellation: "Aquarius".to_string(),
                    time: Utc::now(),
                    neighbors: Vec::new(),
                }],
            };
            let positions = vec![ProjectedPosition {
                identifier: "alf Aqr".to_string(),
                ra_deg: 123.0,
                dec_deg: 45.0,
            }];
            GraphBuilder::build_at(&set, &positions).unwrap()
        };
        assert_eq!(graph.vertex("alf Aqr").unwrap().ra_deg, 123.0);
    }
}
