//! Weighted, undirected flow networks.
//!
//! A [`Graph`] is built once from `(source, consumer, weight)` records by a
//! [`GraphBuilder`] and is immutable afterwards. Every analysis in this crate
//! takes a `&Graph` and trusts its invariants:
//!
//! - every edge joins two distinct nodes of the graph,
//! - every weight is finite and strictly positive,
//! - there is at most one edge per unordered pair (duplicates were summed).
//!
//! Nodes are numbered `0..node_count()` in the order their labels were first
//! seen; analyses use these indices as stable ids.

mod builder;
mod node;

pub use builder::GraphBuilder;
pub use node::{Node, NodeRole};

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::HashMap;

/// Immutable weighted graph of entities and their aggregated flows.
#[derive(Debug, Clone)]
pub struct Graph {
    inner: UnGraph<Node, f64>,
    index: HashMap<String, NodeIndex>,
    total_weight: f64,
}

/// Read-only view of one edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeView<'a> {
    /// Endpoint seen first.
    pub a: &'a str,
    /// Endpoint seen second.
    pub b: &'a str,
    /// Aggregated weight.
    pub weight: f64,
}

impl Graph {
    /// Number of nodes (always at least one).
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Number of distinct undirected edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Sum of all edge weights, counting each edge once.
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.inner.node_weights()
    }

    /// Node at `index`.
    pub fn node(&self, index: usize) -> Option<&Node> {
        self.inner.node_weight(NodeIndex::new(index))
    }

    /// Label of the node at `index`, which must be in range.
    pub(crate) fn label(&self, index: usize) -> &str {
        &self.inner[NodeIndex::new(index)].label
    }

    /// Index of the node labelled `label`.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).map(|ix| ix.index())
    }

    /// Role of the node labelled `label`.
    pub fn role(&self, label: &str) -> Option<NodeRole> {
        self.index.get(label).map(|&ix| self.inner[ix].role)
    }

    /// All edges, in the order their pairs were first seen.
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_>> + '_ {
        self.inner.edge_references().map(move |e| EdgeView {
            a: &self.inner[e.source()].label,
            b: &self.inner[e.target()].label,
            weight: *e.weight(),
        })
    }

    /// Weight between two labels, in either order.
    pub fn weight(&self, a: &str, b: &str) -> Option<f64> {
        let ia = *self.index.get(a)?;
        let ib = *self.index.get(b)?;
        self.inner.find_edge(ia, ib).map(|e| self.inner[e])
    }

    /// Number of edges incident to the node at `index`.
    pub fn degree(&self, index: usize) -> usize {
        self.inner.edges(NodeIndex::new(index)).count()
    }

    /// Sum of the weights of edges incident to the node at `index`.
    pub fn weighted_degree(&self, index: usize) -> f64 {
        self.inner
            .edges(NodeIndex::new(index))
            .map(|e| *e.weight())
            .sum()
    }

    /// `(neighbor index, weight)` pairs of the node at `index`.
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let ix = NodeIndex::new(index);
        self.inner.edges(ix).map(move |e| {
            let other = if e.source() == ix {
                e.target()
            } else {
                e.source()
            };
            (other.index(), *e.weight())
        })
    }

    /// `(a, b, weight)` triples over node indices, each edge once.
    pub(crate) fn index_edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.inner
            .edge_references()
            .map(|e| (e.source().index(), e.target().index(), *e.weight()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn star() -> Graph {
        GraphBuilder::from_flows([("V1", "M1", 5.0), ("V1", "M2", 3.0), ("V2", "M1", 2.0)])
            .unwrap()
    }

    #[test]
    fn degrees_and_neighbors() {
        let graph = star();
        let v1 = graph.index_of("V1").unwrap();
        let m1 = graph.index_of("M1").unwrap();

        assert_eq!(graph.degree(v1), 2);
        assert!((graph.weighted_degree(v1) - 8.0).abs() < 1e-12);
        assert!((graph.weighted_degree(m1) - 7.0).abs() < 1e-12);

        let mut neigh: Vec<(&str, f64)> = graph
            .neighbors(m1)
            .map(|(i, w)| (graph.label(i), w))
            .collect();
        neigh.sort_by(|a, b| a.0.cmp(b.0));
        assert_eq!(neigh, vec![("V1", 5.0), ("V2", 2.0)]);
    }

    #[test]
    fn edge_snapshot() {
        let graph = star();
        let edges: Vec<EdgeView<'_>> = graph.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[0].a, "V1");
        assert_eq!(edges[0].b, "M1");
        assert_eq!(edges[0].weight, 5.0);
        assert!((graph.total_weight() - 10.0).abs() < 1e-12);
        assert_eq!(graph.weight("M2", "V2"), None);
        assert_eq!(graph.weight("nope", "V1"), None);
    }

    #[test]
    fn handshake_lemma() {
        let graph = star();
        let sum: f64 = (0..graph.node_count())
            .map(|i| graph.weighted_degree(i))
            .sum();
        assert!((sum - 2.0 * graph.total_weight()).abs() < 1e-9);
    }
}
