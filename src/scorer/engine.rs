use super::{ScoreDetails, Scorer};
use crate::error::CbResult;
use crate::ngram::{window_cells, NgramTensor};

/// Fast Path: Used by the Optimizer.
///
/// Equal to scoring the smoothed observed tensor without building it:
/// every cell contributes `ln(ref)` once through the floor, observed cells
/// contribute their count instead of 1.
pub fn score_indices(scorer: &Scorer, indices: &[u8]) -> f64 {
    let mut cells = Vec::with_capacity(indices.len());
    score_indices_with(scorer, indices, &mut cells)
}

/// [`score_indices`] with a caller-owned buffer for the window cells, so the
/// search loop does not allocate. The buffer's prior contents are discarded.
pub fn score_indices_with(scorer: &Scorer, indices: &[u8], cells: &mut Vec<usize>) -> f64 {
    cells.clear();
    let mut window_sum = 0.0;

    for (_, cell) in window_cells(indices, scorer.order, scorer.alphabet_size) {
        window_sum += scorer.log_table[cell];
        cells.push(cell);
    }

    cells.sort_unstable();
    cells.dedup();
    let distinct_sum: f64 = cells.iter().map(|&c| scorer.log_table[c]).sum();

    scorer.log_mass + window_sum - distinct_sum
}

/// Slow Path: literal `Σ observed * ln(reference)` over a materialised tensor.
pub fn score_tensor(scorer: &Scorer, observed: &NgramTensor) -> CbResult<f64> {
    observed.check_shape(scorer.alphabet_size, scorer.order)?;

    Ok(observed
        .counts()
        .iter()
        .zip(scorer.log_table.iter())
        .map(|(&obs, &ln_ref)| obs as f64 * ln_ref)
        .sum())
}

/// Detailed scoring for the crack report (Rich Data)
pub fn score_details(scorer: &Scorer, indices: &[u8]) -> ScoreDetails {
    let total_windows = (indices.len() + 1).saturating_sub(scorer.order);

    let mut cells: Vec<usize> = window_cells(indices, scorer.order, scorer.alphabet_size)
        .map(|(_, cell)| cell)
        .collect();
    let windows = cells.len();
    let window_log_likelihood: f64 = cells.iter().map(|&c| scorer.log_table[c]).sum();

    cells.sort_unstable();
    cells.dedup();

    ScoreDetails {
        score: score_indices(scorer, indices),
        windows,
        skipped_windows: total_windows - windows,
        distinct_ngrams: cells.len(),
        window_log_likelihood,
        mean_per_window: if windows > 0 {
            window_log_likelihood / windows as f64
        } else {
            0.0
        },
    }
}
