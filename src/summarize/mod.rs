//! Composition reports for detected communities.
//!
//! A partition says *who* clusters together; a summary says *what kind* of
//! entities each cluster is made of. The caller decides what the categories
//! are and how a label maps to one, keeping this crate free of any
//! domain-specific naming:
//!
//! ```rust
//! use spendnet::summarize::{CategoryScheme, CommunitySummarizer};
//! use spendnet::{CommunityDetection, GraphBuilder, GreedyModularity};
//!
//! let graph = GraphBuilder::from_flows([
//!     ("FreshFarms", "CDH-1", 900.0),
//!     ("DairyCo", "CDH-1", 400.0),
//! ])?;
//! let partition = GreedyModularity::new().detect(&graph)?;
//!
//! let scheme = CategoryScheme::new(["CDH-1", "CDH-2", "CAFE"], "UNKNOWN")?;
//! let summarizer = CommunitySummarizer::new(scheme, |label: &str| {
//!     ["CDH-1", "CDH-2", "CAFE"].into_iter().find(|&c| c == label)
//! });
//!
//! let report = summarizer.summarize(&partition);
//! assert_eq!(report[0].dominant, "CDH-1");
//! assert_eq!(report[0].unrecognized, 2);
//! assert_eq!(report[0].count(&"CDH-1"), 1);
//! # Ok::<(), spendnet::Error>(())
//! ```

use crate::community::Partition;
use crate::error::{Error, Result};
use crate::graph::{Graph, NodeRole};

/// Ordered set of recognized categories plus a fallback tag.
///
/// Declaration order matters: it is the order of every histogram and it
/// breaks ties when picking a dominant category (first declared wins). The
/// fallback tag only counts members; it is dominant only when the scheme
/// declares no recognized category at all.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScheme<C> {
    recognized: Vec<C>,
    unrecognized: C,
}

impl<C: Clone + PartialEq> CategoryScheme<C> {
    /// Create a scheme.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if a category is declared twice or the
    /// fallback tag is also declared as recognized.
    pub fn new(recognized: impl IntoIterator<Item = C>, unrecognized: C) -> Result<Self> {
        let recognized: Vec<C> = recognized.into_iter().collect();
        for (i, c) in recognized.iter().enumerate() {
            if recognized[..i].contains(c) {
                return Err(Error::InvalidParameter {
                    name: "recognized",
                    message: "categories must be distinct",
                });
            }
        }
        if recognized.contains(&unrecognized) {
            return Err(Error::InvalidParameter {
                name: "unrecognized",
                message: "fallback tag must not be a recognized category",
            });
        }
        Ok(Self {
            recognized,
            unrecognized,
        })
    }

    /// Recognized categories in declaration order.
    pub fn recognized(&self) -> &[C] {
        &self.recognized
    }

    /// Fallback tag.
    pub fn unrecognized(&self) -> &C {
        &self.unrecognized
    }

    fn position(&self, category: &C) -> Option<usize> {
        self.recognized.iter().position(|c| c == category)
    }
}

impl CategoryScheme<NodeRole> {
    /// Sources then consumers, with [`NodeRole::Unrecognized`] as fallback.
    pub fn roles() -> Self {
        Self {
            recognized: vec![NodeRole::Source, NodeRole::Consumer],
            unrecognized: NodeRole::Unrecognized,
        }
    }
}

/// What one community is made of.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommunitySummary<C> {
    /// Id of the community in its partition.
    pub community_id: usize,
    /// Number of members.
    pub size: usize,
    /// Count per recognized category, declaration order, zeros included.
    pub composition: Vec<(C, usize)>,
    /// Members no recognized category claimed.
    pub unrecognized: usize,
    /// Most frequent recognized category, first declared on ties (all-zero
    /// included). The fallback tag when nothing is declared.
    pub dominant: C,
}

impl<C: PartialEq> CommunitySummary<C> {
    /// Members in `category` (recognized categories only).
    pub fn count(&self, category: &C) -> usize {
        self.composition
            .iter()
            .find(|(c, _)| c == category)
            .map_or(0, |&(_, n)| n)
    }

    /// Fraction of members in `category`.
    pub fn share(&self, category: &C) -> f64 {
        if self.size == 0 {
            return 0.0;
        }
        self.count(category) as f64 / self.size as f64
    }
}

/// Labels communities by their dominant category.
#[derive(Clone)]
pub struct CommunitySummarizer<C, F> {
    scheme: CategoryScheme<C>,
    classify: F,
}

impl<C, F> CommunitySummarizer<C, F>
where
    C: Clone + PartialEq,
    F: Fn(&str) -> Option<C>,
{
    /// Create a summarizer from a scheme and a label classifier.
    ///
    /// The classifier returns `None` for labels it does not recognize;
    /// categories outside the scheme are treated the same way.
    pub fn new(scheme: CategoryScheme<C>, classify: F) -> Self {
        Self { scheme, classify }
    }

    /// The scheme in use.
    pub fn scheme(&self) -> &CategoryScheme<C> {
        &self.scheme
    }

    /// Summarize every community of `partition`, in partition order.
    pub fn summarize(&self, partition: &Partition) -> Vec<CommunitySummary<C>> {
        partition
            .iter()
            .map(|c| self.summarize_members(c.id, &c.members))
            .collect()
    }

    /// Summarize one group of labels.
    pub fn summarize_members<S: AsRef<str>>(
        &self,
        community_id: usize,
        members: &[S],
    ) -> CommunitySummary<C> {
        let mut counts = vec![0usize; self.scheme.recognized.len()];
        let mut unrecognized = 0usize;
        for label in members {
            match (self.classify)(label.as_ref()).and_then(|c| self.scheme.position(&c)) {
                Some(i) => counts[i] += 1,
                None => unrecognized += 1,
            }
        }

        // Strictly greater to replace, so earlier declarations win ties.
        let mut best: Option<usize> = None;
        for (i, &n) in counts.iter().enumerate() {
            if best.map_or(true, |b| n > counts[b]) {
                best = Some(i);
            }
        }
        let dominant = match best {
            Some(b) => self.scheme.recognized[b].clone(),
            None => self.scheme.unrecognized.clone(),
        };

        CommunitySummary {
            community_id,
            size: members.len(),
            composition: self
                .scheme
                .recognized
                .iter()
                .cloned()
                .zip(counts)
                .collect(),
            unrecognized,
            dominant,
        }
    }
}

/// Summarize a partition by node role (sources vs. consumers).
pub fn summarize_roles(graph: &Graph, partition: &Partition) -> Vec<CommunitySummary<NodeRole>> {
    CommunitySummarizer::new(CategoryScheme::roles(), |label: &str| {
        graph.role(label)
    })
    .summarize(partition)
}
