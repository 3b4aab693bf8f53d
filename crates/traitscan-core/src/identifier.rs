use crate::{
    data::{Dataset, Value},
    frequency::FrequencyTable,
    CoreError,
};
use tracing::{trace, warn};

pub const DEFAULT_CUTOFF: usize = 1;

/// A column/value pair selected for a row, with its frequency at the time it was selected.
#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub column: String,
    pub value: Value,
    pub frequency: f64,
}

/// The traits selected for one row, in selection order. A column occurs at most once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraitDictionary(Vec<Trait>);

impl TraitDictionary {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Trait> {
        self.0.iter()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|selected| selected.column.as_str())
    }

    pub fn get(&self, column: &str) -> Option<&Trait> {
        self.0.iter().find(|selected| selected.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    fn push(&mut self, selected: Trait) {
        self.0.push(selected);
    }
}

impl From<Vec<Trait>> for TraitDictionary {
    fn from(traits: Vec<Trait>) -> Self {
        Self(traits)
    }
}

impl<'a> IntoIterator for &'a TraitDictionary {
    type Item = &'a Trait;
    type IntoIter = std::slice::Iter<'a, Trait>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The candidate set shrank to the cutoff or below.
    BelowCutoff,
    /// Every column is constant across the candidate set.
    NoMoreSplits,
    /// None of the row's values is rarer than 1.0 within the candidate set.
    NoRarestTrait,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identification {
    pub traits: TraitDictionary,
    pub remaining: usize,
    pub termination: Termination,
}

impl Identification {
    pub fn is_unique(&self) -> bool {
        self.remaining == 1
    }

    pub fn is_degenerate(&self) -> bool {
        self.termination == Termination::NoRarestTrait
    }
}

/// Greedily narrows the dataset down to a target row by repeatedly filtering on the column
/// in which the row's value is rarest among the remaining candidates.
///
/// When several columns share the lowest frequency the first one in dataset column order
/// is taken.
pub struct GreedyIdentifier<'a> {
    dataset: &'a Dataset,
    cutoff: usize,
}

impl<'a> GreedyIdentifier<'a> {
    pub fn new(dataset: &'a Dataset, cutoff: usize) -> Self {
        Self { dataset, cutoff }
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    pub fn identify(&self, target: usize) -> Result<Identification, CoreError> {
        self.search(target, &mut |_| {})
    }

    /// Like [`GreedyIdentifier::identify`], also returning the candidate set size before
    /// every step and after the last one.
    pub fn trace(&self, target: usize) -> Result<(Identification, Vec<usize>), CoreError> {
        let mut sizes = vec![];
        let identification = self.search(target, &mut |size| sizes.push(size))?;
        Ok((identification, sizes))
    }

    fn search(
        &self,
        target: usize,
        observe: &mut dyn FnMut(usize),
    ) -> Result<Identification, CoreError> {
        let rows = self.dataset.num_rows();
        if target >= rows {
            return Err(CoreError::RowOutOfRange { row: target, rows });
        }

        let mut candidates: Vec<usize> = (0..rows).collect();
        let mut traits = TraitDictionary::default();

        let termination = loop {
            observe(candidates.len());

            if candidates.len() <= self.cutoff {
                break Termination::BelowCutoff;
            }

            let frequencies = FrequencyTable::compute(self.dataset, &candidates);

            if !frequencies.can_split() {
                break Termination::NoMoreSplits;
            }

            let (index, code, frequency) = match self.rarest_trait(target, &frequencies) {
                Some(rarest) => rarest,
                None => {
                    warn!(
                        row = target,
                        candidates = candidates.len(),
                        "no rarest trait found for row"
                    );
                    break Termination::NoRarestTrait;
                }
            };

            let column = self.dataset.column(index);
            trace!(row = target, column = column.name(), frequency, "selected trait");

            traits.push(Trait {
                column: column.name().to_string(),
                value: column.decode(code).clone(),
                frequency,
            });

            candidates.retain(|row| column.code(*row) == Some(code));
        };

        Ok(Identification {
            traits,
            remaining: candidates.len(),
            termination,
        })
    }

    fn rarest_trait(&self, target: usize, frequencies: &FrequencyTable) -> Option<(usize, u32, f64)> {
        let mut rarest = None;
        let mut lowest = 1.0;

        for (index, column) in self.dataset.columns().iter().enumerate() {
            let code = match column.code(target) {
                Some(code) => code,
                None => continue,
            };

            if let Some(frequency) = frequencies.column(index).frequency(code) {
                if frequency < lowest {
                    lowest = frequency;
                    rarest = Some((index, code, frequency));
                }
            }
        }

        rarest
    }
}
