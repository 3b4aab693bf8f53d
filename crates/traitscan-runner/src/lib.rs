mod aggregator;
mod error;
mod runner;
mod shard;

pub use crate::aggregator::{Aggregator, GlobalResults, Progress};
pub use crate::error::RunnerError;
pub use crate::runner::{Runner, RunnerConfig, DEFAULT_CHECKPOINT};
pub use crate::shard::{run_shard, ShardOutput, ShardPlan};
