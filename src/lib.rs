//! # spendnet
//!
//! Relationship networks of money flows between funding sources (vendors,
//! suppliers) and consuming units (kitchens, departments), and the analyses
//! that expose concentration risk and clustering in them.
//!
//! ```text
//! (source, consumer, amount) records
//!         │
//!         ▼
//!   GraphBuilder ──► Graph ──┬──► centrality::rank ──► CentralityRanking
//!                            │
//!                            └──► GreedyModularity ──► Partition ──► CommunitySummarizer
//! ```
//!
//! Everything is in-memory and synchronous. Reading records from a database,
//! normalizing names, picking date ranges and drawing charts are left to the
//! caller.
//!
//! The `parallel` feature runs independent windows of flows on rayon; the
//! `serde` feature derives serialization for report types.

pub mod analysis;
pub mod centrality;
pub mod community;
/// Error types used across `spendnet`.
pub mod error;
pub mod graph;
pub mod summarize;

#[cfg(test)]
mod scenario_tests;

pub use analysis::{analyze_windows, Analysis, FlowWindow};
pub use centrality::{CentralityRanking, NodeCentrality};
pub use community::{
    modularity, Community, CommunityDetection, Dendrogram, GreedyModularity, MergeStep,
    Partition, UNDEFINED_MODULARITY,
};
pub use error::{EdgeFault, Error, Result};
pub use graph::{EdgeView, Graph, GraphBuilder, Node, NodeRole};
pub use summarize::{CategoryScheme, CommunitySummarizer, CommunitySummary};
