//! End-to-end ranking scenarios.

use u_mrprank::constraints::{filter, Constraint, ConstraintMap, ConstraintsConfig, RewardValues};
use u_mrprank::graph::{leaf_rewards, Graph, RewardFunction};
use u_mrprank::ranking::{RankingConfig, RankingPipeline, UTILITY_COLUMN};
use u_mrprank::scoring::{normalize, Direction};
use u_mrprank::solver::{ValueIterationConfig, ValueIterationRunner};
use u_mrprank::table::Table;
use u_mrprank::transition::{estimate, TransitionMatrix};
use u_mrprank::Error;

fn two_candidates() -> Table {
    Table::from_csv_reader("f1_score,processing_unit\n0.8,GPU\n0.6,CPU\n".as_bytes()).unwrap()
}

fn hierarchy(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[test]
fn test_weighted_f1_ranking() {
    let table = two_candidates();
    let f1 = table.resolve_column("f1_score").unwrap();
    let normalized = normalize(&table.numeric_column(f1), Direction::HigherIsBetter);
    assert_eq!(normalized, vec![1.0, 0.0]);

    let request = ConstraintsConfig {
        constraints: ConstraintMap::new(),
        rewards: RewardValues::new().with_weight("f1_score", 3.0),
    };
    let pipeline = RankingPipeline::new(RankingConfig::default()).unwrap();
    let ranked = pipeline.run(&table, &request).unwrap();

    let units: Vec<&str> = ranked.table.column_values(1).collect();
    assert_eq!(units, vec!["GPU", "CPU"]);
    let utility = ranked.table.column_index(UTILITY_COLUMN).unwrap();
    assert_eq!(ranked.table.cell(0, utility), "3");
    assert_eq!(ranked.table.cell(1, utility), "0");
}

#[test]
fn test_gpu_constraint_keeps_first_row() {
    let table = two_candidates();
    let constraints = ConstraintMap::new().with("processing_unit", Constraint::equals("GPU"));

    let filtered = filter(&table, &constraints);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.cell(0, 0), "0.8");

    let rewards = leaf_rewards(&filtered, &constraints, &RewardValues::new()).unwrap();
    assert_eq!(rewards, vec![1.0]);

    let request = ConstraintsConfig {
        constraints,
        rewards: RewardValues::new().with_weight("f1_score", 3.0),
    };
    let pipeline = RankingPipeline::new(RankingConfig::default()).unwrap();
    let ranked = pipeline.run(&table, &request).unwrap();
    assert_eq!(ranked.table.len(), 1);
}

#[test]
fn test_plain_frequencies_without_subset() {
    let mut csv = String::from("domain,algorithm\n");
    for _ in 0..6 {
        csv.push_str("vision,image classification\n");
    }
    for _ in 0..4 {
        csv.push_str("vision,segmentation\n");
    }
    let full = Table::from_csv_reader(csv.as_bytes()).unwrap();
    let subset = full.select(&[]);

    let est = estimate(&full, &subset, &hierarchy(&["domain", "algorithm"])).unwrap();
    assert_eq!(est.alpha, 0.0);
    let p = &est.matrix;
    assert!((p.probability("vision", "image classification").unwrap() - 0.6).abs() < 1e-12);
    assert!((p.probability("vision", "segmentation").unwrap() - 0.4).abs() < 1e-12);
}

#[test]
fn test_absorbing_state_utility() {
    let full = Table::from_csv_reader("domain,algorithm\nvision,segmentation\n".as_bytes()).unwrap();
    let est = estimate(&full, &full, &hierarchy(&["domain", "algorithm"])).unwrap();
    let p = &est.matrix;

    let leaf = p.index_of("segmentation").unwrap();
    assert!(p.is_absorbing(leaf));
    for j in 0..p.num_states() {
        if j != leaf {
            assert_eq!(p.get(leaf, j), 0.0);
        }
    }

    let mut rewards = vec![0.0; p.num_states()];
    rewards[leaf] = 5.0;
    let config = ValueIterationConfig::default()
        .with_gamma(0.9)
        .with_theta(1e-10)
        .with_max_iterations(100_000);
    let result = ValueIterationRunner::run(&rewards, p.values(), &config).unwrap();
    assert!(result.converged);
    assert!((result.utilities[leaf] - 50.0).abs() < 1e-6);
}

/// More leaf rows than matrix states raises instead of clamping the inner
/// node count to zero.
#[test]
fn test_negative_inner_node_count_raises() {
    let table = two_candidates();
    let matrix = TransitionMatrix::zeros(vec!["only".into()]);
    let rewards = RewardFunction::new(vec![0.0]);

    let err = Graph::build(&matrix, &table, &rewards).unwrap_err();
    assert!(matches!(err, Error::NegativeInnerNodeCount { states: 1, leaves: 2 }));
    assert!(err.is_configuration());
}

#[test]
fn test_constraints_file_round_trip_through_pipeline() {
    let table = Table::from_csv_reader(
        "domain,algorithm,model,accuracy,training_time,processing_unit\n\
         vision,classification,resnet,0.91,120,GPU\n\
         vision,classification,vit,0.94,300,GPU\n\
         vision,detection,yolo,0.88,90,CPU\n\
         nlp,classification,bert,0.93,400,GPU\n"
            .as_bytes(),
    )
    .unwrap();
    let request = ConstraintsConfig::from_json_str(
        r#"{
            "constraints_map": {"domain": "vision", "acc": [0.85, null]},
            "reward_values": {"accuracy": 2, "time": [0, 1], "processing_unit": 1}
        }"#,
    )
    .unwrap();

    let pipeline = RankingPipeline::new(RankingConfig::default()).unwrap();
    let ranked = pipeline.run(&table, &request).unwrap();

    assert_eq!(ranked.filtered_rows, 3);
    let valuation = ranked.valuation.solved().unwrap();
    assert_eq!(valuation.utilities_by_row.len(), 3);
    assert_eq!(valuation.leaf_order.len(), 3);
}
