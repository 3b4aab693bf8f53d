use crate::RunnerError;
use traitscan_core::{CoreError, Dataset, GreedyIdentifier, TraitDictionary};
use tracing::{debug, debug_span};

/// Static assignment of rows to shards: row `i` belongs to shard `i % shards`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShardPlan {
    rows: usize,
    shards: usize,
}

impl ShardPlan {
    /// Derives the shard count from a checkpoint size, so progress is reported roughly every
    /// `checkpoint` rows regardless of the dataset size.
    pub fn new(rows: usize, checkpoint: usize) -> Result<Self, RunnerError> {
        if checkpoint == 0 {
            return Err(RunnerError::InvalidCheckpoint);
        }

        let shards = ((rows + checkpoint - 1) / checkpoint).max(1);

        Ok(Self { rows, shards })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn shards(&self) -> usize {
        self.shards
    }

    pub fn rows_in(&self, shard: usize) -> impl Iterator<Item = usize> {
        (shard..self.rows).step_by(self.shards)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ShardOutput {
    pub shard: usize,
    pub trait_dictionaries: Vec<TraitDictionary>,
    pub remaining_counts: Vec<usize>,
    pub degenerate_rows: usize,
}

impl ShardOutput {
    pub fn len(&self) -> usize {
        self.remaining_counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining_counts.is_empty()
    }
}

/// Identifies every row of one shard, in row order, against the full dataset.
pub fn run_shard(
    dataset: &Dataset,
    plan: &ShardPlan,
    shard: usize,
    cutoff: usize,
) -> Result<ShardOutput, CoreError> {
    let span = debug_span!("shard", shard);
    let _enter = span.enter();

    let identifier = GreedyIdentifier::new(dataset, cutoff);
    let mut output = ShardOutput {
        shard,
        ..Default::default()
    };

    for row in plan.rows_in(shard) {
        let identification = identifier.identify(row)?;

        if identification.is_degenerate() {
            output.degenerate_rows += 1;
        }

        output.trait_dictionaries.push(identification.traits);
        output.remaining_counts.push(identification.remaining);
    }

    debug!(rows = output.len(), "shard finished");

    Ok(output)
}
