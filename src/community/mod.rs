//! Community detection for flow networks.
//!
//! Given a graph, find natural groupings where nodes within groups are
//! densely connected, and connections between groups are sparse. In a
//! source/consumer spending network a community is a cluster of consumers
//! that share suppliers, together with those suppliers.
//!
//! ## The Modularity Objective
//!
//! Detection maximizes **modularity** Q, which compares the weight inside
//! communities to what a random graph with the same weighted degrees would
//! put there:
//!
//! ```text
//! Q = Σ_c [ e_c / E − γ · (a_c / 2E)² ]
//! ```
//!
//! Where:
//! - E = total edge weight (each edge once)
//! - e_c = edge weight inside community c
//! - a_c = summed weighted degree of c's members
//! - γ = resolution parameter
//!
//! **Intuition**: the first term is the share of all money that stays inside
//! the community; the second is the share expected by chance. A good
//! partition has Q > 0.
//!
//! A graph without edges has no modularity. Partitions of such graphs report
//! [`UNDEFINED_MODULARITY`] and [`Partition::modularity_defined`] is false;
//! this is a value, not an error.
//!
//! ## The Resolution Parameter γ
//!
//! - **γ = 1**: Standard modularity (default)
//! - **γ > 1**: Smaller communities (higher penalty for merging)
//! - **γ < 1**: Larger communities (lower penalty for merging)
//!
//! ## Algorithm
//!
//! [`GreedyModularity`] is the agglomerative method of Clauset, Newman and
//! Moore: merge the best pair of connected communities until no merge helps.
//! It is deterministic and records every merge in a [`Dendrogram`].
//!
//! ## Usage
//!
//! ```rust
//! use spendnet::{CommunityDetection, GraphBuilder, GreedyModularity};
//!
//! let graph = GraphBuilder::from_flows([
//!     ("FreshFarms", "CDH-1", 900.0),
//!     ("DairyCo", "CDH-1", 400.0),
//!     ("SnackHub", "CAFE", 700.0),
//!     ("BakeWorks", "CAFE", 300.0),
//!     ("DairyCo", "CAFE", 10.0),
//! ])?;
//!
//! let partition = GreedyModularity::new().detect(&graph)?;
//! assert_eq!(partition.len(), 2);
//! assert!(partition.same_community("FreshFarms", "CDH-1"));
//! # Ok::<(), spendnet::Error>(())
//! ```
//!
//! ## References
//!
//! - Clauset, Newman, Moore (2004). "Finding community structure in very
//!   large networks."
//! - Newman & Girvan (2004). "Finding and evaluating community structure in networks."

mod dendrogram;
mod greedy;
mod partition;
mod traits;

pub use dendrogram::{Dendrogram, MergeStep};
pub use greedy::GreedyModularity;
pub use partition::{modularity, Community, Partition, UNDEFINED_MODULARITY};
pub use traits::CommunityDetection;
