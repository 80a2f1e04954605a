//! Validating, aggregating graph construction.

use super::{Graph, Node, NodeRole};
use crate::error::{EdgeFault, Error, Result};
use petgraph::graph::{NodeIndex, UnGraph};
use std::collections::HashMap;
use tracing::debug;

/// Builds an immutable [`Graph`] from flow records.
///
/// Records naming the same unordered pair are summed into one edge; nothing
/// is dropped. Every record is validated as it arrives, so the first bad one
/// is reported with its position in the input.
///
/// ```rust
/// use spendnet::GraphBuilder;
///
/// let mut builder = GraphBuilder::new();
/// builder.add_flow("FreshFarms", "CDH-1", 4.0)?;
/// builder.add_flow("FreshFarms", "CDH-1", 6.0)?;
/// let graph = builder.build()?;
///
/// assert_eq!(graph.weight("CDH-1", "FreshFarms"), Some(10.0));
/// # Ok::<(), spendnet::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    labels: Vec<String>,
    /// Role observed so far; `None` until a flow names the label.
    roles: Vec<Option<NodeRole>>,
    index: HashMap<String, usize>,
    /// Normalized `(low, high)` pair -> slot in `edges`.
    pairs: HashMap<(usize, usize), usize>,
    edges: Vec<(usize, usize, f64)>,
    total: f64,
    records: usize,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from `(source, consumer, weight)` flows in one go.
    pub fn from_flows<I, S>(flows: I) -> Result<Graph>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        let mut builder = Self::new();
        builder.extend_flows(flows)?;
        builder.build()
    }

    /// Add a flow from `source` to `consumer`, tagging both roles.
    pub fn add_flow(&mut self, source: &str, consumer: &str, weight: f64) -> Result<&mut Self> {
        self.add_record(
            source,
            consumer,
            weight,
            Some((NodeRole::Source, NodeRole::Consumer)),
        )
    }

    /// Add an untyped edge. Endpoint roles are left as they are.
    pub fn add_edge(&mut self, a: &str, b: &str, weight: f64) -> Result<&mut Self> {
        self.add_record(a, b, weight, None)
    }

    /// Add an entity that may have no flows at all.
    pub fn add_node(&mut self, label: &str) -> Result<&mut Self> {
        if label.is_empty() {
            let position = self.records;
            self.records += 1;
            return Err(Error::InvalidEdge {
                position,
                source_label: String::new(),
                target_label: String::new(),
                weight: 0.0,
                reason: EdgeFault::EmptyLabel,
            });
        }
        self.records += 1;
        let _ = self.intern(label);
        Ok(self)
    }

    /// Add every `(source, consumer, weight)` flow, stopping at the first bad one.
    pub fn extend_flows<I, S>(&mut self, flows: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
    {
        for (source, consumer, weight) in flows {
            let _ = self.add_flow(source.as_ref(), consumer.as_ref(), weight)?;
        }
        Ok(self)
    }

    /// Number of distinct labels seen so far.
    pub fn node_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of distinct pairs seen so far.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Finish construction.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyGraph`] if no node was ever added.
    pub fn build(self) -> Result<Graph> {
        if self.labels.is_empty() {
            return Err(Error::EmptyGraph);
        }

        let mut inner = UnGraph::with_capacity(self.labels.len(), self.edges.len());
        for (label, role) in self.labels.into_iter().zip(self.roles) {
            let _ = inner.add_node(Node::new(label, role.unwrap_or(NodeRole::Unrecognized)));
        }

        let mut total_weight = 0.0;
        for &(a, b, w) in &self.edges {
            let _ = inner.add_edge(NodeIndex::new(a), NodeIndex::new(b), w);
            total_weight += w;
        }

        let index = self
            .index
            .into_iter()
            .map(|(label, i)| (label, NodeIndex::new(i)))
            .collect();

        let graph = Graph {
            inner,
            index,
            total_weight,
        };
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            records = self.records,
            total_weight,
            "built flow graph"
        );
        Ok(graph)
    }

    fn add_record(
        &mut self,
        a: &str,
        b: &str,
        weight: f64,
        roles: Option<(NodeRole, NodeRole)>,
    ) -> Result<&mut Self> {
        let position = self.records;
        self.records += 1;

        // Degree sums reach twice the total, so that must stay finite too.
        let total = self.total + weight;
        let fault = Self::check(a, b, weight)
            .or_else(|| (!(2.0 * total).is_finite()).then_some(EdgeFault::TotalOverflow));
        if let Some(reason) = fault {
            return Err(Error::InvalidEdge {
                position,
                source_label: a.to_string(),
                target_label: b.to_string(),
                weight,
                reason,
            });
        }
        self.total = total;

        let ia = self.intern(a);
        let ib = self.intern(b);
        if let Some((ra, rb)) = roles {
            self.observe(ia, ra);
            self.observe(ib, rb);
        }

        let key = if ia < ib { (ia, ib) } else { (ib, ia) };
        match self.pairs.get(&key) {
            Some(&slot) => self.edges[slot].2 += weight,
            None => {
                let _ = self.pairs.insert(key, self.edges.len());
                self.edges.push((key.0, key.1, weight));
            }
        }
        Ok(self)
    }

    fn check(a: &str, b: &str, weight: f64) -> Option<EdgeFault> {
        if a.is_empty() || b.is_empty() {
            Some(EdgeFault::EmptyLabel)
        } else if a == b {
            Some(EdgeFault::SelfLoop)
        } else if !weight.is_finite() {
            Some(EdgeFault::NonFiniteWeight)
        } else if weight <= 0.0 {
            Some(EdgeFault::NonPositiveWeight)
        } else {
            None
        }
    }

    fn intern(&mut self, label: &str) -> usize {
        if let Some(&i) = self.index.get(label) {
            return i;
        }
        let i = self.labels.len();
        self.labels.push(label.to_string());
        self.roles.push(None);
        let _ = self.index.insert(label.to_string(), i);
        i
    }

    fn observe(&mut self, node: usize, role: NodeRole) {
        let slot = &mut self.roles[node];
        *slot = Some(match *slot {
            Some(seen) => seen.merge(role),
            None => role,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_pairs_are_summed() {
        let graph =
            GraphBuilder::from_flows([("A", "B", 4.0), ("A", "B", 6.0)]).unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("A", "B"), Some(10.0));
        assert_eq!(graph.weight("B", "A"), Some(10.0));
    }

    #[test]
    fn reversed_pair_is_the_same_edge() {
        let mut builder = GraphBuilder::new();
        builder.add_edge("A", "B", 1.5).unwrap();
        builder.add_edge("B", "A", 2.5).unwrap();
        let graph = builder.build().unwrap();
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.weight("A", "B"), Some(4.0));
        assert!((graph.total_weight() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_is_rejected() {
        let err = GraphBuilder::from_flows([("A", "B", 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEdge {
                position: 0,
                reason: EdgeFault::NonPositiveWeight,
                ..
            }
        ));
    }

    #[test]
    fn bad_records_are_identified() {
        let mut builder = GraphBuilder::new();
        builder.add_flow("V1", "M1", 3.0).unwrap();

        let err = builder.add_flow("V2", "", 1.0).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEdge {
                position: 1,
                reason: EdgeFault::EmptyLabel,
                ..
            }
        ));

        let err = builder.add_flow("V2", "M1", -2.0).unwrap_err();
        match err {
            Error::InvalidEdge {
                position,
                source_label,
                target_label,
                weight,
                reason,
            } => {
                assert_eq!(position, 2);
                assert_eq!(source_label, "V2");
                assert_eq!(target_label, "M1");
                assert_eq!(weight, -2.0);
                assert_eq!(reason, EdgeFault::NonPositiveWeight);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            builder.add_flow("V2", "M1", f64::NAN).unwrap_err(),
            Error::InvalidEdge {
                reason: EdgeFault::NonFiniteWeight,
                ..
            }
        ));
        assert!(matches!(
            builder.add_flow("V2", "V2", 1.0).unwrap_err(),
            Error::InvalidEdge {
                reason: EdgeFault::SelfLoop,
                ..
            }
        ));

        // Rejected records leave no trace.
        let graph = builder.build().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn total_overflow_is_rejected() {
        let mut builder = GraphBuilder::new();
        builder.add_flow("V1", "M1", 1e308).unwrap_err();
        builder.add_flow("V1", "M1", 5e307).unwrap();

        let err = builder.add_flow("V2", "M2", 5e307).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEdge {
                position: 2,
                reason: EdgeFault::TotalOverflow,
                ..
            }
        ));

        let graph = builder.build().unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(graph.total_weight().is_finite());
    }

    #[test]
    fn empty_builder_fails() {
        assert_eq!(GraphBuilder::new().build().unwrap_err(), Error::EmptyGraph);
        let flows: Vec<(&str, &str, f64)> = Vec::new();
        assert_eq!(
            GraphBuilder::from_flows(flows).unwrap_err(),
            Error::EmptyGraph
        );
    }

    #[test]
    fn isolated_nodes() {
        let mut builder = GraphBuilder::new();
        for label in ["A", "B", "C"] {
            builder.add_node(label).unwrap();
        }
        builder.add_node("A").unwrap();
        let graph = builder.build().unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.total_weight(), 0.0);
        assert!(graph.nodes().all(|n| n.role == NodeRole::Unrecognized));
    }

    #[test]
    fn roles_follow_flow_position() {
        let mut builder = GraphBuilder::new();
        builder.add_node("M1").unwrap();
        builder
            .add_flow("V1", "M1", 1.0)
            .unwrap()
            .add_flow("V1", "M2", 2.0)
            .unwrap()
            .add_flow("M2", "V2", 1.0)
            .unwrap()
            .add_edge("V1", "X", 1.0)
            .unwrap();
        let graph = builder.build().unwrap();

        assert_eq!(graph.role("V1"), Some(NodeRole::Source));
        assert_eq!(graph.role("M1"), Some(NodeRole::Consumer));
        assert_eq!(graph.role("M2"), Some(NodeRole::Unrecognized));
        assert_eq!(graph.role("V2"), Some(NodeRole::Consumer));
        assert_eq!(graph.role("X"), Some(NodeRole::Unrecognized));
        assert_eq!(graph.role("missing"), None);
    }

    #[test]
    fn nodes_keep_first_seen_order() {
        let graph =
            GraphBuilder::from_flows([("V2", "M1", 1.0), ("V1", "M1", 1.0), ("V2", "M2", 1.0)])
                .unwrap();
        let labels: Vec<&str> = graph.nodes().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["V2", "M1", "V1", "M2"]);
        assert_eq!(graph.index_of("V1"), Some(2));
    }
}
