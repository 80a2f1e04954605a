//! Typed graph nodes.

use core::fmt;

/// Which side of a flow an entity sits on.
///
/// Fixed when the graph is built and never changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum NodeRole {
    /// Funding side of a flow (e.g. a vendor being paid).
    Source,
    /// Consuming side of a flow (e.g. a mess unit spending).
    Consumer,
    /// Added without a role, or seen on both sides.
    Unrecognized,
}

impl NodeRole {
    /// Combine two observations of the same label.
    ///
    /// Agreeing observations keep their role; conflicting ones collapse to
    /// [`NodeRole::Unrecognized`].
    pub(crate) fn merge(self, other: NodeRole) -> NodeRole {
        if self == other {
            self
        } else {
            NodeRole::Unrecognized
        }
    }
}

impl fmt::Display for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeRole::Source => "source",
            NodeRole::Consumer => "consumer",
            NodeRole::Unrecognized => "unrecognized",
        };
        f.write_str(s)
    }
}

/// An entity in the flow network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Unique, non-empty label.
    pub label: String,
    /// Side of the flow this entity sits on.
    pub role: NodeRole,
}

impl Node {
    pub(crate) fn new(label: String, role: NodeRole) -> Self {
        Self { label, role }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.role)
    }
}
