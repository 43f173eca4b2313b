pub mod engine;
pub mod loader;
pub mod types;

pub use self::types::ScoreDetails;
use crate::alphabet::Alphabet;
use crate::error::CbResult;
use crate::ngram::NgramTensor;

/// Plausibility scorer bound to one reference model and one alphabet.
///
/// The n-gram order is the order of the reference tensor.
pub struct Scorer {
    pub alphabet: Alphabet,
    pub reference: NgramTensor,
    pub order: usize,
    pub alphabet_size: usize,

    // ln(reference[cell]), flattened like the tensor
    pub log_table: Vec<f64>,
    // Σ ln(reference) over every cell: the smoothing-floor contribution
    pub log_mass: f64,
}

impl Scorer {
    pub fn new(reference: NgramTensor, alphabet: &Alphabet) -> CbResult<Self> {
        reference.check_shape(alphabet.len(), reference.order())?;
        // from_counts/from_text already guarantee non-zero cells

        let log_table: Vec<f64> = reference
            .counts()
            .iter()
            .map(|&c| (c as f64).ln())
            .collect();
        let log_mass = log_table.iter().sum();

        Ok(Self {
            alphabet: alphabet.clone(),
            order: reference.order(),
            alphabet_size: alphabet.len(),
            reference,
            log_table,
            log_mass,
        })
    }

    /// Plausibility of a plain text under the reference model.
    pub fn score(&self, text: &str) -> f64 {
        engine::score_indices(self, &self.alphabet.index_text(text))
    }

    /// Optimized scoring for the search loop (Fast)
    pub fn score_indices(&self, indices: &[u8]) -> f64 {
        engine::score_indices(self, indices)
    }

    /// As [`Scorer::score_indices`], reusing `cells` as scratch space.
    pub fn score_indices_with(&self, indices: &[u8], cells: &mut Vec<usize>) -> f64 {
        engine::score_indices_with(self, indices, cells)
    }

    /// Scores an already built observed tensor.
    pub fn score_observed(&self, observed: &NgramTensor) -> CbResult<f64> {
        engine::score_tensor(self, observed)
    }

    /// Detailed scoring for the crack report (Rich Data)
    pub fn score_details(&self, indices: &[u8]) -> ScoreDetails {
        engine::score_details(self, indices)
    }
}

/// `Σ observed * ln(reference)` with the observed tensor built from `text`
/// at the reference order.
pub fn plausibility(text: &str, reference: &NgramTensor, alphabet: &Alphabet) -> CbResult<f64> {
    let observed = NgramTensor::from_text(alphabet, text, reference.order())?;
    reference.check_shape(observed.alphabet_size(), observed.order())?;

    Ok(observed
        .counts()
        .iter()
        .zip(reference.counts())
        .map(|(&obs, &r)| obs as f64 * (r as f64).ln())
        .sum())
}
