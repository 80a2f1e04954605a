//! Node importance in a flow network.
//!
//! Two measures, both O(N + E):
//!
//! ```text
//! degree_centrality(v) = deg(v) / (N - 1)      (0 when N <= 1)
//! weighted_degree(v)   = Σ w(e)  over edges e incident to v
//! ```
//!
//! Degree centrality says how many counterparties an entity has; weighted
//! degree says how much money passes through it. Entities at the top of the
//! weighted ranking are where spending is concentrated: losing one of them
//! moves the largest share of the network's volume.
//!
//! ```rust
//! use spendnet::{centrality, GraphBuilder};
//!
//! let graph = GraphBuilder::from_flows([
//!     ("FreshFarms", "CDH-1", 900.0),
//!     ("FreshFarms", "CDH-2", 300.0),
//!     ("DairyCo", "CDH-1", 200.0),
//! ])?;
//!
//! let ranking = centrality::rank(&graph);
//! assert_eq!(ranking.top(1)[0].label, "FreshFarms");
//! # Ok::<(), spendnet::Error>(())
//! ```

use crate::graph::{Graph, NodeRole};

/// Degree centrality of the node at `index`.
pub fn degree_centrality(graph: &Graph, index: usize) -> f64 {
    let n = graph.node_count();
    if n <= 1 {
        return 0.0;
    }
    graph.degree(index) as f64 / (n - 1) as f64
}

/// Total weight of the edges incident to the node at `index`.
pub fn weighted_degree(graph: &Graph, index: usize) -> f64 {
    graph.weighted_degree(index)
}

/// Importance measures for one node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeCentrality {
    /// Node label.
    pub label: String,
    /// Node role.
    pub role: NodeRole,
    /// Number of counterparties.
    pub degree: usize,
    /// `degree / (N - 1)`, in [0, 1].
    pub degree_centrality: f64,
    /// Sum of incident weights.
    pub weighted_degree: f64,
}

/// All nodes, most important first.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CentralityRanking {
    entries: Vec<NodeCentrality>,
}

/// Rank every node by weighted degree, descending.
///
/// Ties go to the lexicographically smaller label, so the order is total and
/// identical across runs.
pub fn rank(graph: &Graph) -> CentralityRanking {
    let n = graph.node_count();
    let mut entries: Vec<NodeCentrality> = Vec::with_capacity(n);

    // One pass over adjacency for both measures.
    let mut degree = vec![0usize; n];
    let mut strength = vec![0.0f64; n];
    for (a, b, w) in graph.index_edges() {
        degree[a] += 1;
        degree[b] += 1;
        strength[a] += w;
        strength[b] += w;
    }

    let denom = if n > 1 { (n - 1) as f64 } else { 0.0 };
    for (i, node) in graph.nodes().enumerate() {
        entries.push(NodeCentrality {
            label: node.label.clone(),
            role: node.role,
            degree: degree[i],
            degree_centrality: if denom > 0.0 {
                degree[i] as f64 / denom
            } else {
                0.0
            },
            weighted_degree: strength[i],
        });
    }

    entries.sort_by(|x, y| {
        y.weighted_degree
            .total_cmp(&x.weighted_degree)
            .then_with(|| x.label.cmp(&y.label))
    });

    CentralityRanking { entries }
}

impl CentralityRanking {
    /// Number of ranked nodes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing was ranked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranked entries.
    pub fn entries(&self) -> &[NodeCentrality] {
        &self.entries
    }

    /// Iterate in rank order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeCentrality> {
        self.entries.iter()
    }

    /// The `k` most important nodes (fewer if the graph is smaller).
    pub fn top(&self, k: usize) -> &[NodeCentrality] {
        &self.entries[..k.min(self.entries.len())]
    }

    /// Entry for `label`.
    pub fn get(&self, label: &str) -> Option<&NodeCentrality> {
        self.entries.iter().find(|e| e.label == label)
    }

    /// Ranked entries with the given role, still in rank order.
    pub fn by_role(&self, role: NodeRole) -> impl Iterator<Item = &NodeCentrality> {
        self.entries.iter().filter(move |e| e.role == role)
    }

    /// Share of all weighted degree held by the top `k` nodes.
    ///
    /// 1.0 means the top `k` touch every unit of flow on both ends; 0.0 is
    /// returned for a graph without edges.
    pub fn concentration(&self, k: usize) -> f64 {
        let total: f64 = self.entries.iter().map(|e| e.weighted_degree).sum();
        if total <= 0.0 {
            return 0.0;
        }
        let head: f64 = self.top(k).iter().map(|e| e.weighted_degree).sum();
        head / total
    }
}

impl<'a> IntoIterator for &'a CentralityRanking {
    type Item = &'a NodeCentrality;
    type IntoIter = std::slice::Iter<'a, NodeCentrality>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
