use crate::alphabet::Alphabet;
use crate::error::{CbResult, CipherBreakError};

/// Order-`n` transition tensor over an alphabet of `alphabet_size` symbols.
///
/// Cells are stored flat in row-major order: the first symbol of a window is
/// the most significant axis. After construction no cell is zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NgramTensor {
    order: usize,
    alphabet_size: usize,
    counts: Vec<u64>,
}

/// Upper bound on tensor cells (order 5 over 27 symbols fits, order 6 does not).
pub const MAX_TENSOR_CELLS: usize = 1 << 27;

/// Number of cells of an order-`order` tensor, or a config error when it
/// cannot be addressed.
pub fn cell_count(alphabet_size: usize, order: usize) -> CbResult<usize> {
    if order == 0 {
        return Err(CipherBreakError::Config(
            "n-gram order must be at least 1".to_string(),
        ));
    }
    u32::try_from(order)
        .ok()
        .and_then(|o| alphabet_size.checked_pow(o))
        .filter(|&cells| cells <= MAX_TENSOR_CELLS)
        .ok_or_else(|| {
            CipherBreakError::Config(format!(
                "order {} over {} symbols does not fit in memory",
                order, alphabet_size
            ))
        })
}

#[inline(always)]
fn flat_index(window: &[u8], alphabet_size: usize) -> Option<usize> {
    window.iter().try_fold(0usize, |acc, &s| {
        let s = s as usize;
        if s < alphabet_size {
            Some(acc * alphabet_size + s)
        } else {
            None
        }
    })
}

/// Every window of `order` symbols in a symbol-index text, as
/// `(start, cell)`. Windows touching a foreign symbol are skipped.
/// `order` must be at least 1.
pub fn window_cells(
    indices: &[u8],
    order: usize,
    alphabet_size: usize,
) -> impl Iterator<Item = (usize, usize)> + '_ {
    indices
        .windows(order.max(1))
        .enumerate()
        .filter_map(move |(start, w)| flat_index(w, alphabet_size).map(|cell| (start, cell)))
}

impl NgramTensor {
    pub fn from_text(alphabet: &Alphabet, text: &str, order: usize) -> CbResult<Self> {
        Self::from_indices(alphabet.len(), &alphabet.index_text(text), order)
    }

    pub fn from_indices(alphabet_size: usize, indices: &[u8], order: usize) -> CbResult<Self> {
        let cells = cell_count(alphabet_size, order)?;
        let mut counts = vec![0u64; cells];

        for (_, cell) in window_cells(indices, order, alphabet_size) {
            counts[cell] += 1;
        }

        // Additive floor keeps ln(count) finite.
        for c in counts.iter_mut().filter(|c| **c == 0) {
            *c = 1;
        }

        Ok(Self {
            order,
            alphabet_size,
            counts,
        })
    }

    /// Wraps precomputed counts, e.g. a reference model read from disk.
    pub fn from_counts(alphabet_size: usize, order: usize, counts: Vec<u64>) -> CbResult<Self> {
        let cells = cell_count(alphabet_size, order)
            .map_err(|e| CipherBreakError::InvalidTensor(e.to_string()))?;

        if counts.len() != cells {
            return Err(CipherBreakError::InvalidTensor(format!(
                "order {} over {} symbols needs {} cells, got {}",
                order,
                alphabet_size,
                cells,
                counts.len()
            )));
        }
        if let Some(pos) = counts.iter().position(|&c| c == 0) {
            return Err(CipherBreakError::InvalidTensor(format!(
                "cell {} is zero; reference counts must be smoothed",
                pos
            )));
        }

        Ok(Self {
            order,
            alphabet_size,
            counts,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn alphabet_size(&self) -> usize {
        self.alphabet_size
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Flat cell of a window of symbol indices.
    pub fn cell_index(&self, window: &[u8]) -> Option<usize> {
        if window.len() != self.order {
            return None;
        }
        flat_index(window, self.alphabet_size)
    }

    pub fn get(&self, window: &[u8]) -> Option<u64> {
        self.cell_index(window).map(|i| self.counts[i])
    }

    #[inline(always)]
    pub fn count_at(&self, cell: usize) -> u64 {
        self.counts[cell]
    }

    pub fn min_count(&self) -> u64 {
        self.counts.iter().copied().min().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Checks this tensor can score texts over `alphabet` at `order`.
    pub fn check_shape(&self, alphabet_size: usize, order: usize) -> CbResult<()> {
        if self.alphabet_size != alphabet_size {
            return Err(CipherBreakError::InvalidTensor(format!(
                "tensor is over {} symbols, alphabet has {}",
                self.alphabet_size, alphabet_size
            )));
        }
        if self.order != order {
            return Err(CipherBreakError::InvalidTensor(format!(
                "tensor has order {}, expected {}",
                self.order, order
            )));
        }
        Ok(())
    }
}
