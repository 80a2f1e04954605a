//! Merge history of an agglomerative community search.
//!
//! Every merge the greedy detector performs is recorded in order, together
//! with the modularity gain it produced. Replaying a prefix of the history
//! gives the partition the detector held at that point, which is how callers
//! look at coarser or finer groupings than the one it stopped at.

/// A single merge operation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MergeStep {
    /// Community that survived (the smaller id).
    pub survivor: usize,
    /// Community folded into the survivor.
    pub absorbed: usize,
    /// Modularity change caused by this merge.
    pub delta_q: f64,
    /// Modularity after this merge.
    pub modularity: f64,
    /// Size of the merged community.
    pub size: usize,
}

/// Ordered merge history over `n_items` nodes.
///
/// Community ids are node indices: a community is always named after its
/// smallest member.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dendrogram {
    merges: Vec<MergeStep>,
    n_items: usize,
    initial_modularity: f64,
}

impl Dendrogram {
    /// Create an empty history for `n_items` singletons.
    pub fn new(n_items: usize, initial_modularity: f64) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
            initial_modularity,
        }
    }

    /// Record a merge operation.
    pub(crate) fn push(&mut self, step: MergeStep) {
        self.merges.push(step);
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Modularity of the all-singletons partition.
    pub fn initial_modularity(&self) -> f64 {
        self.initial_modularity
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &MergeStep> {
        self.merges.iter()
    }

    /// Modularity after each merge (for plotting the search).
    pub fn modularities(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.modularity).collect()
    }

    /// Number of leading merges that reached the highest modularity.
    ///
    /// Zero means the singleton partition was best. Ties go to the earlier
    /// (finer) state.
    pub fn best_step(&self) -> (usize, f64) {
        let mut best = (0, self.initial_modularity);
        for (i, m) in self.merges.iter().enumerate() {
            if m.modularity > best.1 {
                best = (i + 1, m.modularity);
            }
        }
        best
    }

    /// Community id of every node after the first `steps` merges.
    pub fn cut_after(&self, steps: usize) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.n_items).collect();
        for m in self.merges.iter().take(steps) {
            parent[m.absorbed] = m.survivor;
        }

        // Survivors are always smaller than what they absorb, so resolving in
        // index order sees every parent already resolved.
        for i in 0..self.n_items {
            let p = parent[i];
            if p != i {
                parent[i] = parent[p];
            }
        }
        parent
    }

    /// Community id of every node once `k` communities remain.
    ///
    /// If the history never got down to `k`, the final state is returned.
    pub fn cut_to_k(&self, k: usize) -> Vec<usize> {
        let steps = self.n_items.saturating_sub(k.max(1));
        self.cut_after(steps.min(self.merges.len()))
    }
}
