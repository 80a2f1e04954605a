use spendnet::{analyze_windows, FlowWindow, GreedyModularity};
use tracing_subscriber::EnvFilter;

fn window(label: &str, flows: &[(&str, &str, f64)]) -> FlowWindow {
    FlowWindow::new(
        label,
        flows
            .iter()
            .map(|&(v, m, w)| (v.to_string(), m.to_string(), w))
            .collect(),
    )
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // One window per month; each is analyzed on its own rayon task.
    let windows = vec![
        window(
            "2025-09",
            &[
                ("FreshFarms", "CDH-1", 14_000.0),
                ("DairyCo", "CDH-1", 5_000.0),
                ("SnackHub", "CAFE", 3_000.0),
            ],
        ),
        window(
            "2025-10",
            &[
                ("FreshFarms", "CDH-1", 12_500.0),
                ("GrainMart", "CDH-2", 9_000.0),
                ("GrainMart", "CDH-1", 1_000.0),
                ("SnackHub", "CAFE", 2_800.0),
            ],
        ),
        window("2025-11", &[("FreshFarms", "CDH-1", -40.0)]),
    ];

    let detector = GreedyModularity::new();
    for (label, result) in analyze_windows(&windows, &detector) {
        match result {
            Ok(analysis) => println!(
                "{label}: nodes={} communities={} modularity={:.3} top={}",
                analysis.graph.node_count(),
                analysis.partition.len(),
                analysis.partition.modularity(),
                analysis
                    .ranking
                    .top(1)
                    .first()
                    .map_or("-", |e| e.label.as_str())
            ),
            Err(err) => println!("{label}: skipped ({err})"),
        }
    }
}
