//! Partitions of a graph and their modularity.

use super::Dendrogram;
use crate::error::{Error, Result};
use crate::graph::Graph;
use std::collections::{BTreeMap, HashMap};

/// Modularity reported for a graph without edges.
///
/// Modularity divides by the total edge weight, so it has no value there;
/// partitions of such graphs carry this sentinel and
/// [`Partition::modularity_defined`] returns `false`.
pub const UNDEFINED_MODULARITY: f64 = 0.0;

/// A detected community.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Community {
    /// Position in the owning partition.
    pub id: usize,
    /// Member labels, in graph node order.
    pub members: Vec<String>,
}

impl Community {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the community has no members; never true for detected ones.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Whether `label` is a member.
    pub fn contains(&self, label: &str) -> bool {
        self.members.iter().any(|m| m == label)
    }
}

/// Disjoint communities covering every node, plus their modularity.
///
/// Communities are ordered by size (largest first), ties by the earliest
/// member in graph node order. A community's `id` is its position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Partition {
    communities: Vec<Community>,
    /// Community id per node index.
    assignment: Vec<usize>,
    membership: HashMap<String, usize>,
    modularity: f64,
    modularity_defined: bool,
    resolution: f64,
    dendrogram: Dendrogram,
}

impl Partition {
    /// Assemble a partition from groups of node indices.
    ///
    /// `groups` must be disjoint and cover `0..graph.node_count()`.
    pub(crate) fn from_groups(
        graph: &Graph,
        mut groups: Vec<Vec<usize>>,
        resolution: f64,
        dendrogram: Dendrogram,
    ) -> Self {
        for g in &mut groups {
            g.sort_unstable();
        }
        groups.retain(|g| !g.is_empty());
        groups.sort_by(|x, y| y.len().cmp(&x.len()).then_with(|| x[0].cmp(&y[0])));

        let mut assignment = vec![0usize; graph.node_count()];
        let mut membership = HashMap::with_capacity(graph.node_count());
        let mut communities = Vec::with_capacity(groups.len());
        for (id, group) in groups.into_iter().enumerate() {
            let mut members = Vec::with_capacity(group.len());
            for node in group {
                assignment[node] = id;
                let label = graph.label(node).to_string();
                let _ = membership.insert(label.clone(), id);
                members.push(label);
            }
            communities.push(Community { id, members });
        }

        let modularity_defined = graph.total_weight() > 0.0;
        let modularity = modularity_of(graph, &assignment, resolution);

        Self {
            communities,
            assignment,
            membership,
            modularity,
            modularity_defined,
            resolution,
            dendrogram,
        }
    }

    /// Communities, largest first.
    pub fn communities(&self) -> &[Community] {
        &self.communities
    }

    /// Iterate over communities.
    pub fn iter(&self) -> impl Iterator<Item = &Community> {
        self.communities.iter()
    }

    /// Number of communities.
    pub fn len(&self) -> usize {
        self.communities.len()
    }

    /// True only for a partition of nothing, which a valid graph never yields.
    pub fn is_empty(&self) -> bool {
        self.communities.is_empty()
    }

    /// Modularity score, or [`UNDEFINED_MODULARITY`] for an edgeless graph.
    pub fn modularity(&self) -> f64 {
        self.modularity
    }

    /// False when the graph had no edges and the score is the sentinel.
    pub fn modularity_defined(&self) -> bool {
        self.modularity_defined
    }

    /// Resolution the modularity was computed at.
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Merge history that produced this partition.
    pub fn dendrogram(&self) -> &Dendrogram {
        &self.dendrogram
    }

    /// Community id for each node index (the graph's node order).
    pub fn assignment(&self) -> &[usize] {
        &self.assignment
    }

    /// Community id of `label`.
    pub fn community_id(&self, label: &str) -> Option<usize> {
        self.membership.get(label).copied()
    }

    /// Community containing `label`.
    pub fn community_of(&self, label: &str) -> Option<&Community> {
        self.community_id(label).map(|id| &self.communities[id])
    }

    /// Whether two labels ended up together.
    pub fn same_community(&self, a: &str, b: &str) -> bool {
        match (self.community_id(a), self.community_id(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Size of each community, in partition order.
    pub fn sizes(&self) -> Vec<usize> {
        self.communities.iter().map(Community::len).collect()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a Community;
    type IntoIter = std::slice::Iter<'a, Community>;

    fn into_iter(self) -> Self::IntoIter {
        self.communities.iter()
    }
}

/// Modularity of an arbitrary grouping.
///
/// `assignment[i]` is the community of node `i`; any `usize` values work.
///
/// ```text
/// Q = Σ_c [ e_c / E − γ · (a_c / 2E)² ]
/// ```
///
/// `e_c` is the weight inside community `c`, `a_c` the summed weighted degree
/// of its members and `E` the total edge weight. Returns
/// [`UNDEFINED_MODULARITY`] for a graph without edges.
///
/// # Errors
///
/// [`Error::InvalidParameter`] if `assignment` does not have one entry per
/// node or `resolution` is negative or not finite.
pub fn modularity(graph: &Graph, assignment: &[usize], resolution: f64) -> Result<f64> {
    if assignment.len() != graph.node_count() {
        return Err(Error::InvalidParameter {
            name: "assignment",
            message: "must have one entry per node",
        });
    }
    if !resolution.is_finite() || resolution < 0.0 {
        return Err(Error::InvalidParameter {
            name: "resolution",
            message: "must be finite and non-negative",
        });
    }
    Ok(modularity_of(graph, assignment, resolution))
}

pub(crate) fn modularity_of(graph: &Graph, assignment: &[usize], resolution: f64) -> f64 {
    let m = graph.total_weight();
    if m <= 0.0 {
        return UNDEFINED_MODULARITY;
    }

    // BTreeMap keeps the summation order fixed from run to run.
    let mut stats: BTreeMap<usize, (f64, f64)> = BTreeMap::new();
    for (a, b, w) in graph.index_edges() {
        let (ca, cb) = (assignment[a], assignment[b]);
        stats.entry(ca).or_insert((0.0, 0.0)).1 += w;
        stats.entry(cb).or_insert((0.0, 0.0)).1 += w;
        if ca == cb {
            stats.entry(ca).or_insert((0.0, 0.0)).0 += w;
        }
    }

    stats
        .values()
        .map(|&(internal, degree)| {
            let share = degree / (2.0 * m);
            internal / m - resolution * share * share
        })
        .sum()
}
