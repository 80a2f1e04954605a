#[cfg(test)]
mod tests {
    use crate::centrality;
    use crate::community::{modularity, CommunityDetection, GreedyModularity, UNDEFINED_MODULARITY};
    use crate::graph::GraphBuilder;
    use crate::summarize::{CategoryScheme, CommunitySummarizer};
    use crate::{EdgeFault, Error, Result};

    #[test]
    fn two_triangles_with_weak_bridge() -> Result<()> {
        for w in [1.0, 250.0, 1e6] {
            let graph = GraphBuilder::from_flows([
                ("V1", "M1", w),
                ("M1", "V2", w),
                ("V1", "V2", w),
                ("V3", "M2", w),
                ("M2", "V4", w),
                ("V3", "V4", w),
                ("V2", "V3", w / 10.0),
            ])?;
            let partition = GreedyModularity::new().detect(&graph)?;

            assert_eq!(partition.len(), 2);
            assert_eq!(partition.sizes(), vec![3, 3]);
            assert!(partition.same_community("V1", "M1"));
            assert!(partition.same_community("M2", "V4"));
            assert!(!partition.same_community("V2", "V3"));
            assert!(partition.modularity() > 0.3);
        }
        Ok(())
    }

    #[test]
    fn five_isolated_nodes() -> Result<()> {
        let mut builder = GraphBuilder::new();
        for label in ["CDH-1", "CDH-2", "CAFE", "FreshFarms", "DairyCo"] {
            let _ = builder.add_node(label)?;
        }
        let graph = builder.build()?;

        let partition = GreedyModularity::new().detect(&graph)?;
        assert_eq!(partition.len(), 5);
        assert!(partition.iter().all(|c| c.len() == 1));
        assert_eq!(partition.modularity(), UNDEFINED_MODULARITY);
        assert!(!partition.modularity_defined());

        let ranking = centrality::rank(&graph);
        assert!(ranking.iter().all(|e| e.weighted_degree == 0.0));
        assert!(ranking.iter().all(|e| e.degree_centrality == 0.0));
        Ok(())
    }

    #[test]
    fn single_edge_is_merged() -> Result<()> {
        let graph = GraphBuilder::from_flows([("A", "B", 10.0)])?;
        let partition = GreedyModularity::new().detect(&graph)?;
        assert_eq!(partition.len(), 1);
        assert_eq!(partition.communities()[0].members, vec!["A", "B"]);

        let baseline = modularity(&graph, &[0, 1], 1.0)?;
        assert!(partition.modularity() > baseline);
        Ok(())
    }

    #[test]
    fn duplicate_pair_is_summed() -> Result<()> {
        let graph = GraphBuilder::from_flows([("A", "B", 4.0), ("A", "B", 6.0)])?;
        assert_eq!(graph.weight("A", "B"), Some(10.0));
        Ok(())
    }

    #[test]
    fn zero_weight_is_rejected() {
        let err = GraphBuilder::from_flows([("A", "B", 1.0), ("A", "C", 0.0)]).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEdge {
                position: 1,
                reason: EdgeFault::NonPositiveWeight,
                ..
            }
        ));
    }

    #[test]
    fn vendor_network_report() -> Result<()> {
        let graph = GraphBuilder::from_flows([
            ("FreshFarms", "CDH-1", 52_000.0),
            ("DairyCo", "CDH-1", 18_500.0),
            ("GrainMart", "CDH-1", 9_000.0),
            ("GrainMart", "CDH-2", 31_000.0),
            ("VeggieWorld", "CDH-2", 27_000.0),
            ("SnackHub", "CAFE", 12_000.0),
            ("BakeWorks", "CAFE", 8_000.0),
            ("DairyCo", "CAFE", 1_500.0),
        ])?;

        let ranking = centrality::rank(&graph);
        assert_eq!(ranking.top(1)[0].label, "CDH-1");

        let partition = GreedyModularity::new().detect(&graph)?;
        let covered: usize = partition.sizes().iter().sum();
        assert_eq!(covered, graph.node_count());
        assert!(partition.modularity() > 0.0);
        assert!(!partition.same_community("FreshFarms", "SnackHub"));

        let scheme = CategoryScheme::new(["CDH-1", "CDH-2", "CAFE"], "UNKNOWN")?;
        let summarizer = CommunitySummarizer::new(scheme, |label: &str| {
            ["CDH-1", "CDH-2", "CAFE"].into_iter().find(|&c| c == label)
        });
        let report = summarizer.summarize(&partition);
        assert_eq!(report.len(), partition.len());

        let cafe_id = partition.community_id("CAFE").expect("CAFE is a node");
        let cafe = &report[cafe_id];
        assert_eq!(cafe.dominant, "CAFE");
        assert_eq!(cafe.count(&"CAFE"), 1);
        assert_eq!(cafe.count(&"CDH-1"), 0);
        Ok(())
    }
}
