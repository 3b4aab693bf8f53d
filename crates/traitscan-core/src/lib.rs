pub mod data;
mod error;
pub mod frequency;
pub mod identifier;

pub use crate::data::{read_csv, Column, ColumnBuilder, Dataset, Value};
pub use crate::error::CoreError;
pub use crate::frequency::{FrequencyTable, ValueFrequencies};
pub use crate::identifier::{
    GreedyIdentifier, Identification, Termination, Trait, TraitDictionary, DEFAULT_CUTOFF,
};
