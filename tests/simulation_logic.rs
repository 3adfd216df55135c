mod common;

use common::SimulationBuilder;
use nob_core::error::SimError;
use nob_data::{Label, ALPHABET};

#[test]
fn test_step_count_and_ordering() {
    for steps in [0, 1, 7, 30] {
        let mut sim = SimulationBuilder::new().with_steps(steps).build();
        let log = sim.run().unwrap();
        assert_eq!(log.len(), steps);
        for pair in log.entries().windows(2) {
            assert!(pair[0].step < pair[1].step);
        }
    }
}

#[test]
fn test_structural_delta_matches_metric_changes() {
    let mut sim = SimulationBuilder::new()
        .with_steps(50)
        .with_environment(0.9, 0.9, 0.5)
        .with_shock(0.2, 0.2)
        .build();
    let log = sim.run().unwrap();

    let (mut edges, mut nodes) = (4usize, 4usize);
    for entry in log.entries() {
        let m = entry.structural_metrics;
        let expected = m.edge_count.abs_diff(edges) + m.node_count.abs_diff(nodes);
        assert_eq!(entry.delta, expected as f64, "step {}", entry.step);
        edges = m.edge_count;
        nodes = m.node_count;
    }
}

#[test]
fn test_labels_match_classifier_history() {
    let mut sim = SimulationBuilder::new().with_steps(25).build();
    let log = sim.run().unwrap().clone();
    let history = sim.classifier().history();
    assert_eq!(history.len(), log.len());
    for (entry, classified) in log.entries().iter().zip(history) {
        assert_eq!(entry.label, classified.label);
        assert_eq!(entry.feature_point(), classified.point);
        assert!(ALPHABET.contains(&entry.label));
    }
    assert_eq!(log.entries()[0].label, Label::SuTi);
}

#[test]
fn test_run_resumes_after_manual_steps() {
    let mut sim = SimulationBuilder::new().with_steps(10).build();
    sim.step().unwrap();
    sim.step().unwrap();
    let log = sim.run().unwrap();
    assert_eq!(log.len(), 10);
    assert_eq!(log.last().unwrap().step, 9);
}

#[test]
fn test_no_steps_past_completion() {
    let mut sim = SimulationBuilder::new().with_steps(2).build();
    sim.run().unwrap();
    assert_eq!(sim.step().unwrap_err(), SimError::RunComplete { steps: 2 });
    assert!(sim.step_with_drive(&[0.0; 8]).is_err());
    assert_eq!(sim.log().len(), 2);
}

#[test]
fn test_embedding_payload_flows_into_log() {
    let mut sim = SimulationBuilder::new().with_steps(5).build();
    let entry = sim.step_with_drive(&[1.0; 8]).unwrap();
    assert_eq!(entry.step, 0);
    assert_eq!(sim.log().entries(), &[entry]);

    let rest = sim.run_payload(&[-0.5; 8], 4).unwrap();
    assert_eq!(rest.len(), 4);
    assert_eq!(rest[0].step, 1);
    assert!(sim.is_finished());
}

#[test]
fn test_payload_longer_than_remaining_steps() {
    let mut sim = SimulationBuilder::new().with_steps(3).build();
    let err = sim.run_payload(&[0.1; 8], 5).unwrap_err();
    assert_eq!(err, SimError::RunComplete { steps: 3 });
    assert_eq!(sim.log().len(), 3);
}

#[test]
fn test_wrong_payload_length_aborts_step() {
    let mut sim = SimulationBuilder::new().build();
    assert_eq!(
        sim.step_with_drive(&[0.0; 3]).unwrap_err(),
        SimError::Dimension {
            expected: 8,
            actual: 3
        }
    );
    assert_eq!(sim.steps_taken(), 0);
}

#[test]
fn test_next_drive_has_network_size() {
    let mut sim = SimulationBuilder::new().with_size(6).build();
    assert_eq!(sim.pending_drive().len(), 6);
    sim.step().unwrap();
    assert_eq!(sim.pending_drive().len(), 6);
}

#[test]
fn test_invalid_configs_fail_before_running() {
    let missing_size = SimulationBuilder::new()
        .with_config(|c| c.neural.size = None)
        .config();
    assert!(nob_core::Simulation::new(missing_size).is_err());

    let bad_bandwidth = SimulationBuilder::new()
        .with_config(|c| c.classifier.default_bandwidth = -0.4)
        .config();
    assert!(matches!(
        nob_core::Simulation::new(bad_bandwidth),
        Err(SimError::Config(_))
    ));
}
