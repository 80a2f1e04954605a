//! End-to-end analysis of one or many flow networks.
//!
//! [`Analysis`] bundles the graph with its centrality ranking and community
//! partition. [`analyze_windows`] runs independent analyses over several
//! windows of flows (e.g. one per month); with the `parallel` feature the
//! windows are processed on the rayon thread pool. Windows share nothing, so
//! the results are the same either way.

use crate::centrality::{self, CentralityRanking};
use crate::community::{CommunityDetection, Partition};
use crate::error::Result;
use crate::graph::{Graph, GraphBuilder};
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Graph, ranking and partition for one set of flows.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// The network analyzed.
    pub graph: Graph,
    /// Nodes by weighted degree.
    pub ranking: CentralityRanking,
    /// Detected communities.
    pub partition: Partition,
}

impl Analysis {
    /// Analyze an already built graph.
    pub fn of<D>(graph: Graph, detector: &D) -> Result<Self>
    where
        D: CommunityDetection + ?Sized,
    {
        let ranking = centrality::rank(&graph);
        let partition = detector.detect(&graph)?;
        Ok(Self {
            graph,
            ranking,
            partition,
        })
    }

    /// Build the graph from `(source, consumer, weight)` flows, then analyze it.
    pub fn from_flows<I, S, D>(flows: I, detector: &D) -> Result<Self>
    where
        I: IntoIterator<Item = (S, S, f64)>,
        S: AsRef<str>,
        D: CommunityDetection + ?Sized,
    {
        Self::of(GraphBuilder::from_flows(flows)?, detector)
    }
}

/// A labelled batch of flows, analyzed on its own.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlowWindow {
    /// Caller's name for the window (e.g. "2025-09").
    pub label: String,
    /// `(source, consumer, weight)` records.
    pub flows: Vec<(String, String, f64)>,
}

impl FlowWindow {
    /// Create a window.
    pub fn new(label: impl Into<String>, flows: Vec<(String, String, f64)>) -> Self {
        Self {
            label: label.into(),
            flows,
        }
    }

    fn analyze<D>(&self, detector: &D) -> Result<Analysis>
    where
        D: CommunityDetection + ?Sized,
    {
        let result = Analysis::from_flows(
            self.flows.iter().map(|(a, b, w)| (a.as_str(), b.as_str(), *w)),
            detector,
        );
        match &result {
            Ok(analysis) => debug!(
                window = %self.label,
                nodes = analysis.graph.node_count(),
                communities = analysis.partition.len(),
                modularity = analysis.partition.modularity(),
                "window analyzed"
            ),
            Err(err) => debug!(window = %self.label, error = %err, "window rejected"),
        }
        result
    }
}

/// Analyze every window independently, keeping input order.
///
/// A bad window yields an error in its own slot and does not affect the
/// others.
pub fn analyze_windows<D>(windows: &[FlowWindow], detector: &D) -> Vec<(String, Result<Analysis>)>
where
    D: CommunityDetection + Sync + ?Sized,
{
    #[cfg(feature = "parallel")]
    {
        windows
            .par_iter()
            .map(|w| (w.label.clone(), w.analyze(detector)))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        windows
            .iter()
            .map(|w| (w.label.clone(), w.analyze(detector)))
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::community::GreedyModularity;
    use crate::error::Error;

    fn window(label: &str, flows: &[(&str, &str, f64)]) -> FlowWindow {
        FlowWindow::new(
            label,
            flows
                .iter()
                .map(|&(a, b, w)| (a.to_string(), b.to_string(), w))
                .collect(),
        )
    }

    #[test]
    fn test_analysis_from_flows() {
        let analysis = Analysis::from_flows(
            [("V1", "M1", 4.0), ("V1", "M1", 6.0), ("V2", "M2", 1.0)],
            &GreedyModularity::new(),
        )
        .unwrap();
        assert_eq!(analysis.graph.weight("V1", "M1"), Some(10.0));
        assert_eq!(analysis.ranking.top(1)[0].label, "M1");
        assert_eq!(analysis.partition.len(), 2);
    }

    #[test]
    fn test_windows_keep_order_and_isolate_errors() {
        let windows = vec![
            window("2025-09", &[("V1", "M1", 3.0), ("V2", "M1", 1.0)]),
            window("2025-10", &[("V1", "M1", 0.0)]),
            window("2025-11", &[]),
            window("2025-12", &[("A", "B", 1.0), ("C", "D", 1.0)]),
        ];
        let detector = GreedyModularity::new();
        let results = analyze_windows(&windows, &detector);

        let labels: Vec<&str> = results.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, vec!["2025-09", "2025-10", "2025-11", "2025-12"]);

        assert_eq!(results[0].1.as_ref().unwrap().partition.len(), 1);
        assert!(matches!(
            results[1].1,
            Err(Error::InvalidEdge { position: 0, .. })
        ));
        assert!(matches!(results[2].1, Err(Error::EmptyGraph)));
        assert_eq!(results[3].1.as_ref().unwrap().partition.len(), 2);
    }

    #[test]
    fn test_windows_match_single_runs() {
        let flows = [
            ("a0", "a1", 1.0),
            ("a1", "a2", 1.0),
            ("a0", "a2", 1.0),
            ("b0", "b1", 1.0),
            ("b1", "b2", 1.0),
            ("b0", "b2", 1.0),
            ("a2", "b0", 0.1),
        ];
        let windows: Vec<FlowWindow> = (0..8).map(|i| window(&format!("w{i}"), &flows)).collect();
        let detector = GreedyModularity::new();
        let single = Analysis::from_flows(flows, &detector).unwrap();

        for (_, result) in analyze_windows(&windows, &detector) {
            let analysis = result.unwrap();
            assert_eq!(analysis.partition, single.partition);
            assert_eq!(analysis.ranking, single.ranking);
        }
    }
}
