//! Constellation graph builder
//!
//! Converts a record set (with its neighbor lists) into the renderable
//! adjacency graph: one vertex per star at its current position, undirected
//! edges deduplicated with a seen-set so that A–B listed from both ends is
//! drawn exactly once. The resulting simple graph, together with the vertex
//! positions, is the output contract of the projection pipeline and the
//! whole input contract of the rendering boundary.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{Graph, NodeIndex};
use petgraph::Undirected;
use serde::{Deserialize, Serialize};

use super::error::{CyclopsError, Result};
use super::models::{ProjectedPosition, RecordSet};
use super::propagation::{parse_dec_deg, parse_ra_deg};

/// One plotted star: identifier plus position in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarVertex {
    /// Star identifier
    pub identifier: String,
    /// Right ascension in degrees
    pub ra_deg: f64,
    /// Declination in degrees
    pub dec_deg: f64,
}

/// A deduplicated undirected star graph, fully derived from one record set.
#[derive(Debug, Clone, Default)]
pub struct ConstellationGraph {
    /// Constellation the graph was built for
    pub constellation: String,
    graph: Graph<StarVertex, (), Undirected>,
    index: HashMap<String, NodeIndex>,
}

impl ConstellationGraph {
    /// Number of stars.
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of unique undirected edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Whether an identifier is a vertex of the graph.
    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains_key(identifier)
    }

    /// Vertex data for an identifier.
    pub fn vertex(&self, identifier: &str) -> Option<&StarVertex> {
        self.index.get(identifier).map(|&ix| &self.graph[ix])
    }

    /// Iterate vertices in insertion (record) order.
    pub fn vertices(&self) -> impl Iterator<Item = &StarVertex> {
        self.graph.node_weights()
    }

    /// Iterate edges as identifier pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&StarVertex, &StarVertex)> {
        self.graph.edge_indices().map(|e| {
            let (a, b) = self.graph.edge_endpoints(e).expect("edge endpoints");
            (&self.graph[a], &self.graph[b])
        })
    }

    /// Whether two identifiers are directly connected.
    pub fn connected(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&ia), Some(&ib)) => self.graph.find_edge(ia, ib).is_some(),
            _ => false,
        }
    }
}

/// Builds constellation graphs from record sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder;

impl GraphBuilder {
    /// Build a graph from a record set at its stored catalog positions.
    pub fn build(set: &RecordSet) -> Result<ConstellationGraph> {
        let positions = set
            .records
            .iter()
            .map(|rec| {
                Ok(ProjectedPosition {
                    identifier: rec.identifier.clone(),
                    ra_deg: parse_ra_deg(&rec.identifier, &rec.ra)?,
                    dec_deg: parse_dec_deg(&rec.identifier, &rec.dec)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::build_at(set, &positions)
    }

    /// Build a graph from a record set at externally supplied (usually
    /// propagated) positions. Every record must have a matching position.
    pub fn build_at(set: &RecordSet, positions: &[ProjectedPosition]) -> Result<ConstellationGraph> {
        let by_id: HashMap<&str, &ProjectedPosition> = positions
            .iter()
            .map(|p| (p.identifier.as_str(), p))
            .collect();

        let mut graph = Graph::<StarVertex, (), Undirected>::default();
        let mut index = HashMap::with_capacity(set.records.len());

        for rec in &set.records {
            let pos = by_id.get(rec.identifier.as_str()).ok_or_else(|| {
                CyclopsError::UnknownStar {
                    star: rec.identifier.clone(),
                    constellation: set.constellation.clone(),
                }
            })?;
            let ix = graph.add_node(StarVertex {
                identifier: rec.identifier.clone(),
                ra_deg: pos.ra_deg,
                dec_deg: pos.dec_deg,
            });
            index.insert(rec.identifier.clone(), ix);
        }

        // Seen-set deduplication: a record's edges only go to neighbors not
        // yet fully processed, so each undirected pair appears once.
        let mut seen: HashSet<&str> = HashSet::with_capacity(set.records.len());
        for rec in &set.records {
            seen.insert(rec.identifier.as_str());
            let &from = index
                .get(rec.identifier.as_str())
                .expect("vertex inserted above");
            for neighbor in &rec.neighbors {
                if seen.contains(neighbor.as_str()) {
                    continue;
                }
                let &to = index.get(neighbor.as_str()).ok_or_else(|| {
                    CyclopsError::UnknownStar {
                        star: neighbor.clone(),
                        constellation: set.constellation.clone(),
                    }
                })?;
                graph.add_edge(from, to, ());
            }
        }

        Ok(ConstellationGraph {
            constellation: set.constellation.clone(),
            graph,
            index,
        })
    }
}
