use crate::{
    shard::{run_shard, ShardOutput, ShardPlan},
    Aggregator, GlobalResults, RunnerError,
};
use std::{num::NonZeroUsize, sync::Arc};
use tokio::{sync::Semaphore, task::JoinSet};
use tracing::info;
use traitscan_core::{CoreError, Dataset, DEFAULT_CUTOFF};

pub const DEFAULT_CHECKPOINT: usize = 100;

#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub workers: usize,
    pub cutoff: usize,
    pub checkpoint: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(NonZeroUsize::get)
                .unwrap_or(1),
            cutoff: DEFAULT_CUTOFF,
            checkpoint: DEFAULT_CHECKPOINT,
        }
    }
}

pub struct Runner {
    config: RunnerConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        if config.workers == 0 {
            return Err(RunnerError::InvalidWorkerCount);
        }

        if config.checkpoint == 0 {
            return Err(RunnerError::InvalidCheckpoint);
        }

        Ok(Self { config })
    }

    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Identifies every row of the dataset on a pool of `workers` blocking threads.
    ///
    /// Shards are merged one at a time, in completion order, on the calling task. Returns once
    /// every shard has been merged; any failed shard fails the whole run.
    pub async fn run(&self, dataset: Arc<Dataset>) -> Result<GlobalResults, RunnerError> {
        let cutoff = self.config.cutoff;

        self.run_with(dataset, move |dataset, plan, shard| {
            run_shard(dataset, plan, shard, cutoff)
        })
        .await
    }

    pub(crate) async fn run_with<F>(
        &self,
        dataset: Arc<Dataset>,
        shard_fn: F,
    ) -> Result<GlobalResults, RunnerError>
    where
        F: Fn(&Dataset, &ShardPlan, usize) -> Result<ShardOutput, CoreError>
            + Send
            + Sync
            + 'static,
    {
        let plan = ShardPlan::new(dataset.num_rows(), self.config.checkpoint)?;
        let permits = Arc::new(Semaphore::new(self.config.workers));
        let shard_fn = Arc::new(shard_fn);

        info!(
            rows = plan.rows(),
            shards = plan.shards(),
            workers = self.config.workers,
            cutoff = self.config.cutoff,
            "beginning identifiability checks"
        );

        let mut tasks = JoinSet::new();

        for shard in 0..plan.shards() {
            let dataset = dataset.clone();
            let permits = permits.clone();
            let shard_fn = shard_fn.clone();

            tasks.spawn(async move {
                let _permit = permits
                    .acquire_owned()
                    .await
                    .map_err(|_| RunnerError::PoolClosed)?;

                let output = tokio::task::spawn_blocking(move || shard_fn(&dataset, &plan, shard))
                    .await
                    .map_err(|source| RunnerError::ShardFailed { shard, source })?;

                Ok::<ShardOutput, RunnerError>(output?)
            });
        }

        let mut aggregator = Aggregator::new(plan.rows());

        while let Some(joined) = tasks.join_next().await {
            let output = joined??;
            aggregator.merge(output);
        }

        aggregator.finish()
    }

    /// Runs all shards in order on the calling thread.
    pub fn run_sequential(&self, dataset: &Dataset) -> Result<GlobalResults, RunnerError> {
        let plan = ShardPlan::new(dataset.num_rows(), self.config.checkpoint)?;
        let mut aggregator = Aggregator::new(plan.rows());

        for shard in 0..plan.shards() {
            aggregator.merge(run_shard(dataset, &plan, shard, self.config.cutoff)?);
        }

        aggregator.finish()
    }
}
