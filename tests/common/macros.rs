/// Asserts that every real field of a log entry is finite.
#[macro_export]
macro_rules! assert_entry_finite {
    ($entry:expr) => {
        let e = &$entry;
        assert!(
            e.lambda.is_finite()
                && e.delta.is_finite()
                && e.psi.is_finite()
                && e.stability.is_finite()
                && e.synchrony.is_finite()
                && e.structural_metrics.avg_degree.is_finite()
                && e.structural_metrics.clustering.is_finite(),
            "Entry {} has a non-finite field: {:?}",
            e.step,
            e
        );
    };
}

/// Asserts that measures stay inside their documented ranges.
#[macro_export]
macro_rules! assert_entry_in_range {
    ($entry:expr) => {
        let e = &$entry;
        assert!(
            (0.0..=1.0).contains(&e.stability),
            "Entry {} stability {} outside [0, 1]",
            e.step,
            e.stability
        );
        assert!(
            (0.0..=1.0).contains(&e.synchrony),
            "Entry {} synchrony {} outside [0, 1]",
            e.step,
            e.synchrony
        );
        assert!(
            (0.0..=1.0).contains(&e.structural_metrics.clustering),
            "Entry {} clustering {} outside [0, 1]",
            e.step,
            e.structural_metrics.clustering
        );
        assert!(
            e.delta >= 0.0,
            "Entry {} structural delta {} is negative",
            e.step,
            e.delta
        );
    };
}
