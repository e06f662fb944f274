//! Property tests for the filter, solver and normaliser.

use nalgebra::{DMatrix, DVector};
use proptest::prelude::*;

use u_mrprank::constraints::{filter, Constraint, ConstraintMap};
use u_mrprank::scoring::{normalize, Direction};
use u_mrprank::solver::{ValueIterationConfig, ValueIterationRunner};
use u_mrprank::table::Table;

const UNITS: [&str; 3] = ["CPU", "GPU", "TPU"];
const MIXED: [&str; 6] = ["abc", "def", "5", "7.5", "5.0", ""];

fn candidate_table(rows: &[(f64, usize)]) -> Table {
    Table::from_rows(
        vec!["f1_score".into(), "processing_unit".into()],
        rows.iter()
            .map(|(f1, unit)| vec![format!("{f1:.3}"), UNITS[*unit].to_string()])
            .collect(),
    )
    .unwrap()
}

fn stochastic(n: usize, weights: &[f64]) -> DMatrix<f64> {
    let mut p = DMatrix::from_row_slice(n, n, &weights[..n * n]);
    for i in 0..n {
        let sum: f64 = p.row(i).sum();
        for j in 0..n {
            p[(i, j)] /= sum;
        }
    }
    p
}

proptest! {
    #[test]
    fn filter_is_idempotent(
        rows in proptest::collection::vec((0.0f64..1.0, 0usize..3), 0..40),
        low in proptest::option::of(0.0f64..1.0),
        high in proptest::option::of(0.0f64..1.0),
        units in proptest::collection::vec(0usize..3, 0..3),
    ) {
        let table = candidate_table(&rows);
        let constraints = ConstraintMap::new()
            .with("f1", Constraint::range(low, high))
            .with("processing_unit", Constraint::one_of(units.iter().map(|&u| UNITS[u])));

        let once = filter(&table, &constraints);
        let twice = filter(&once, &constraints);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_is_idempotent_on_mixed_columns(
        rows in proptest::collection::vec((0usize..6, 0usize..3), 0..30),
        low in proptest::option::of(0.0f64..10.0),
        high in proptest::option::of(0.0f64..10.0),
        pinned in proptest::option::of(0usize..6),
        units in proptest::collection::vec(0usize..3, 0..3),
        range_first in any::<bool>(),
    ) {
        let table = Table::from_rows(
            vec!["x".into(), "processing_unit".into()],
            rows.iter()
                .map(|&(x, unit)| vec![MIXED[x].to_string(), UNITS[unit].to_string()])
                .collect(),
        )
        .unwrap();
        let range = Constraint::Range {
            low,
            high,
            pinned: pinned.map(|p| MIXED[p].to_string()),
        };
        let units = Constraint::one_of(units.iter().map(|&u| UNITS[u]));
        let constraints = if range_first {
            ConstraintMap::new().with("x", range).with("processing_unit", units)
        } else {
            ConstraintMap::new().with("processing_unit", units).with("x", range)
        };

        let once = filter(&table, &constraints);
        let twice = filter(&once, &constraints);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn empty_constraints_keep_table(
        rows in proptest::collection::vec((0.0f64..1.0, 0usize..3), 0..40),
    ) {
        let table = candidate_table(&rows);
        prop_assert_eq!(filter(&table, &ConstraintMap::new()), table);
    }

    #[test]
    fn converged_utilities_satisfy_bellman(
        n in 1usize..6,
        weights in proptest::collection::vec(0.01f64..1.0, 36),
        rewards in proptest::collection::vec(-5.0f64..5.0, 6),
        gamma in 0.0f64..0.95,
    ) {
        let p = stochastic(n, &weights);
        let r = &rewards[..n];
        let config = ValueIterationConfig::default()
            .with_gamma(gamma)
            .with_theta(1e-6)
            .with_max_iterations(100_000);
        let result = ValueIterationRunner::run(r, &p, &config).unwrap();
        prop_assert!(result.converged);

        let u = DVector::from_column_slice(&result.utilities);
        let residual = (&u - (DVector::from_column_slice(r) + (&p * &u) * gamma)).amax();
        prop_assert!(residual < config.theta);
    }

    #[test]
    fn zero_rewards_give_zero_utilities(
        n in 1usize..6,
        weights in proptest::collection::vec(0.01f64..1.0, 36),
        gamma in 0.0f64..0.99,
    ) {
        let p = stochastic(n, &weights);
        let result =
            ValueIterationRunner::run(&vec![0.0; n], &p, &ValueIterationConfig::default().with_gamma(gamma))
                .unwrap();
        prop_assert!(result.utilities.iter().all(|&u| u == 0.0));
    }

    #[test]
    fn normalized_values_span_unit_interval(
        values in proptest::collection::vec(proptest::option::of(-100.0f64..100.0), 1..30),
    ) {
        for direction in [Direction::HigherIsBetter, Direction::LowerIsBetter] {
            let normalized = normalize(&values, direction);
            prop_assert_eq!(normalized.len(), values.len());
            prop_assert!(normalized.iter().all(|v| (0.0..=1.0).contains(v)));
        }

        let present: Vec<f64> = values.iter().flatten().copied().collect();
        let min = present.iter().copied().fold(f64::INFINITY, f64::min);
        let max = present.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min < max {
            let up = normalize(&values, Direction::HigherIsBetter);
            let down = normalize(&values, Direction::LowerIsBetter);
            for (i, v) in values.iter().enumerate() {
                if *v == Some(min) {
                    prop_assert_eq!(up[i], 0.0);
                    prop_assert_eq!(down[i], 1.0);
                }
                if *v == Some(max) {
                    prop_assert_eq!(up[i], 1.0);
                    prop_assert_eq!(down[i], 0.0);
                }
            }
        }
    }
}
