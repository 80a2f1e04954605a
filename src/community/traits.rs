//! Community detection traits.

use super::Partition;
use crate::error::Result;
use crate::graph::Graph;

/// Trait for community detection algorithms.
pub trait CommunityDetection {
    /// Partition the graph into communities.
    ///
    /// The graph is trusted to be valid; errors only come from the
    /// detector's own configuration.
    fn detect(&self, graph: &Graph) -> Result<Partition>;

    /// Get the resolution parameter (if applicable).
    fn resolution(&self) -> f64 {
        1.0
    }
}
