use spendnet::summarize::{summarize_roles, CategoryScheme, CommunitySummarizer};
use spendnet::{centrality, CommunityDetection, GraphBuilder, GreedyModularity};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=spendnet=trace shows every merge.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Vendor -> mess unit spend, already summed per pair by the caller's query.
    let flows = [
        ("FreshFarms", "CDH-1", 52_000.0),
        ("DairyCo", "CDH-1", 18_500.0),
        ("GrainMart", "CDH-1", 9_000.0),
        ("GrainMart", "CDH-2", 31_000.0),
        ("VeggieWorld", "CDH-2", 27_000.0),
        ("SpiceRoute", "CDH-2", 6_500.0),
        ("SnackHub", "CAFE", 12_000.0),
        ("BakeWorks", "CAFE", 8_000.0),
        ("DairyCo", "CAFE", 1_500.0),
        ("CashPurchase", "UNKNOWN", 4_200.0),
        ("CashPurchase", "CDH-1", 700.0),
    ];
    let graph = GraphBuilder::from_flows(flows)?;
    println!(
        "n_nodes={} n_edges={} total={:.0}",
        graph.node_count(),
        graph.edge_count(),
        graph.total_weight()
    );

    let ranking = centrality::rank(&graph);
    println!("\ntop dependency nodes:");
    for e in ranking.top(10) {
        println!(
            "  {:<14} {:<12} weighted={:>9.0} degree_centrality={:.3}",
            e.label,
            e.role.to_string(),
            e.weighted_degree,
            e.degree_centrality
        );
    }
    println!("top-3 concentration: {:.1}%", 100.0 * ranking.concentration(3));

    let partition = GreedyModularity::new().detect(&graph)?;
    println!(
        "\nmodularity={:.3} communities={}",
        partition.modularity(),
        partition.len()
    );

    let units = ["CDH-1", "CDH-2", "CAFE", "UNKNOWN"];
    let scheme = CategoryScheme::new(units, "vendor")?;
    let summarizer =
        CommunitySummarizer::new(scheme, |label: &str| units.into_iter().find(|&u| u == label));

    let by_role = summarize_roles(&graph, &partition);
    for (summary, roles) in summarizer.summarize(&partition).iter().zip(&by_role) {
        println!(
            "  community {}: {} nodes, dominant={} ({} vendors) {:?}",
            summary.community_id,
            summary.size,
            summary.dominant,
            roles.count(&spendnet::NodeRole::Source),
            partition.communities()[summary.community_id].members
        );
    }

    Ok(())
}
