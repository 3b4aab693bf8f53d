use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;
use traitscan_core::{Dataset, Value};
use traitscan_runner::{Runner, RunnerConfig, RunnerError};

fn survey(rows: usize) -> Dataset {
    let mut rng = StdRng::seed_from_u64(42);

    let rows: Vec<Vec<Value>> = (0..rows)
        .map(|_| {
            vec![
                Value::from(rng.gen_range(18i64..40)),
                Value::from(["Sales", "Engineering", "Marketing"][rng.gen_range(0..3)]),
                Value::from(rng.gen_bool(0.5)),
            ]
        })
        .collect();

    Dataset::from_rows(&["age", "profession", "remote"], rows).unwrap()
}

fn sorted_counts(mut counts: Vec<usize>) -> Vec<usize> {
    counts.sort_unstable();
    counts
}

#[tokio::test]
async fn every_row_is_merged_exactly_once() {
    let dataset = Arc::new(survey(350));
    let runner = Runner::new(RunnerConfig {
        workers: 3,
        cutoff: 1,
        checkpoint: 40,
    })
    .unwrap();

    let results = runner.run(dataset.clone()).await.unwrap();

    assert_eq!(results.len(), 350);
    assert_eq!(results.trait_dictionaries.len(), 350);
    assert!(results.remaining_counts.iter().all(|count| *count >= 1));
}

#[tokio::test]
async fn parallel_and_sequential_runs_agree() {
    let dataset = Arc::new(survey(180));
    let runner = Runner::new(RunnerConfig {
        workers: 4,
        cutoff: 1,
        checkpoint: 25,
    })
    .unwrap();

    let parallel = runner.run(dataset.clone()).await.unwrap();
    let sequential = runner.run_sequential(&dataset).unwrap();

    assert_eq!(
        sorted_counts(parallel.remaining_counts),
        sorted_counts(sequential.remaining_counts)
    );

    let mut parallel_lengths: Vec<usize> = parallel
        .trait_dictionaries
        .iter()
        .map(|traits| traits.len())
        .collect();
    let mut sequential_lengths: Vec<usize> = sequential
        .trait_dictionaries
        .iter()
        .map(|traits| traits.len())
        .collect();
    parallel_lengths.sort_unstable();
    sequential_lengths.sort_unstable();

    assert_eq!(parallel_lengths, sequential_lengths);
}

#[tokio::test]
async fn small_dataset_runs_as_one_shard() {
    let dataset = Dataset::from_rows(
        &["A", "B"],
        vec![
            vec!["x".into(), 1i64.into()],
            vec!["x".into(), 2i64.into()],
            vec!["y".into(), 1i64.into()],
            vec!["y".into(), 2i64.into()],
        ],
    )
    .unwrap();

    let runner = Runner::new(RunnerConfig::default()).unwrap();
    let results = runner.run(Arc::new(dataset)).await.unwrap();

    assert_eq!(results.remaining_counts, vec![1, 1, 1, 1]);
    assert!(results
        .trait_dictionaries
        .iter()
        .all(|traits| traits.len() <= 2));
}

#[test]
fn invalid_configuration_is_rejected() {
    let zero_workers = Runner::new(RunnerConfig {
        workers: 0,
        ..Default::default()
    });
    assert!(matches!(zero_workers, Err(RunnerError::InvalidWorkerCount)));

    let zero_checkpoint = Runner::new(RunnerConfig {
        checkpoint: 0,
        ..Default::default()
    });
    assert!(matches!(zero_checkpoint, Err(RunnerError::InvalidCheckpoint)));
}
