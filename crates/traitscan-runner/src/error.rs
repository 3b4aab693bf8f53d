use thiserror::Error;
use tokio::task::JoinError;
use traitscan_core::CoreError;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("worker count must be at least 1")]
    InvalidWorkerCount,

    #[error("checkpoint size must be at least 1")]
    InvalidCheckpoint,

    #[error("shard {shard} failed")]
    ShardFailed {
        shard: usize,
        #[source]
        source: JoinError,
    },

    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("worker pool was closed")]
    PoolClosed,

    #[error("merged {merged} rows, expected {expected}")]
    IncompleteResults { merged: usize, expected: usize },
}
