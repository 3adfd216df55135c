use clap::Parser;
use nob_data::{Label, TrajectoryLog, ALPHABET};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::BTreeMap;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trajectory log written by a run (.json or .json.gz)
    #[arg(short, long, default_value = "data/run_logs.json")]
    input: String,

    #[arg(short, long, default_value = "report.md")]
    output: String,
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

/// Label-to-label transitions, weighted by how often each occurred.
fn transition_graph(log: &TrajectoryLog) -> DiGraph<Label, u64> {
    let mut graph = DiGraph::<Label, u64>::new();
    let nodes: BTreeMap<Label, NodeIndex> = ALPHABET
        .iter()
        .map(|&label| (label, graph.add_node(label)))
        .collect();

    for pair in log.entries().windows(2) {
        let (from, to) = (nodes[&pair[0].label], nodes[&pair[1].label]);
        match graph.find_edge(from, to) {
            Some(edge) => graph[edge] += 1,
            None => {
                graph.add_edge(from, to, 1);
            }
        }
    }
    graph
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    println!("Analyzing trajectory log {}...", args.input);
    let log = nob_io::read_trajectory(&args.input)?;

    // 1. Label histogram
    let mut histogram: BTreeMap<Label, usize> = BTreeMap::new();
    for entry in log.entries() {
        *histogram.entry(entry.label).or_insert(0) += 1;
    }

    // 2. Transitions
    let graph = transition_graph(&log);
    let mut transitions: Vec<(Label, Label, u64)> = graph
        .edge_indices()
        .filter_map(|e| {
            let (a, b) = graph.edge_endpoints(e)?;
            Some((graph[a], graph[b], graph[e]))
        })
        .collect();
    transitions.sort_by(|x, y| y.2.cmp(&x.2).then(x.0.cmp(&y.0)).then(x.1.cmp(&y.1)));

    // 3. Generate Report
    let final_metrics = log
        .last()
        .map(|e| {
            format!(
                "- **Nodes**: {}\n- **Edges**: {}\n- **Average Degree**: {:.3}\n- **Clustering**: {:.3}\n",
                e.structural_metrics.node_count,
                e.structural_metrics.edge_count,
                e.structural_metrics.avg_degree,
                e.structural_metrics.clustering
            )
        })
        .unwrap_or_else(|| "- (empty log)\n".to_string());

    let report = format!(
        "# Nob Universe Trajectory Report\n\n\
        Generated {}\n\n\
        ## Summary\n\
        - **Steps**: {}\n\
        - **Mean Stability**: {:.4}\n\
        - **Mean Synchrony**: {:.4}\n\
        - **Distinct Labels**: {}\n\n\
        ## Labels\n\
        {}\n\
        ## Final Structure\n\
        {}\n\
        ## Transitions ({})\n\
        {}\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        log.len(),
        mean(log.entries().iter().map(|e| e.stability)),
        mean(log.entries().iter().map(|e| e.synchrony)),
        histogram.len(),
        histogram
            .iter()
            .map(|(label, count)| format!("- `{label}`: {count}\n"))
            .collect::<String>(),
        final_metrics,
        transitions.len(),
        transitions
            .iter()
            .map(|(a, b, n)| format!("- `{a}` -> `{b}`: {n}\n"))
            .collect::<String>()
    );

    std::fs::write(&args.output, report)?;
    println!("Report generated: {}", args.output);

    Ok(())
}
