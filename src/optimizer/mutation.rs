use crate::alphabet::Key;
use crate::ngram::window_cells;
use crate::scorer::Scorer;
use fastrand::Rng;

/// Proposes a candidate key from the current one.
///
/// `decrypted` is the current decryption in symbol-index form. The current
/// key is never modified; a no-op proposal returns an equal key.
pub trait Mutator: Send + Sync {
    fn propose(&self, key: &Key, decrypted: &[u8], scorer: &Scorer, rng: &mut Rng) -> Key;

    /// N-gram order the strategy reads from the reference, if any.
    fn order(&self) -> Option<usize> {
        None
    }
}

/// Exchanges two distinct positions picked uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformSwap;

impl Mutator for UniformSwap {
    fn propose(&self, key: &Key, _decrypted: &[u8], _scorer: &Scorer, rng: &mut Rng) -> Key {
        let n = key.len();
        if n < 2 {
            return key.clone();
        }
        let a = rng.usize(0..n);
        let mut b = rng.usize(0..n - 1);
        if b >= a {
            b += 1;
        }
        key.swapped(a, b)
    }
}

/// Targets the least plausible n-gram of the current decryption.
#[derive(Debug, Clone, Copy)]
pub struct WorstNgramSwap {
    pub order: usize,
}

impl WorstNgramSwap {
    /// Start of the window with the smallest reference count; ties keep the
    /// first one in scan order.
    pub fn worst_window(&self, decrypted: &[u8], scorer: &Scorer) -> Option<usize> {
        let mut worst: Option<(u64, usize)> = None;
        for (start, cell) in window_cells(decrypted, self.order, scorer.alphabet_size) {
            let count = scorer.reference.count_at(cell);
            match worst {
                Some((w, _)) if count >= w => {}
                _ => worst = Some((count, start)),
            }
        }
        worst.map(|(_, start)| start)
    }
}

impl Mutator for WorstNgramSwap {
    fn propose(&self, key: &Key, decrypted: &[u8], scorer: &Scorer, _rng: &mut Rng) -> Key {
        let Some(start) = self.worst_window(decrypted, scorer) else {
            return key.clone();
        };
        let window = &decrypted[start..start + self.order];

        let mut picked: Vec<usize> = Vec::with_capacity(2);
        for &symbol in window {
            if let Some(pos) = key.position_of(symbol as usize) {
                if !picked.contains(&pos) {
                    picked.push(pos);
                }
            }
            if picked.len() == 2 {
                break;
            }
        }

        match picked[..] {
            [a, b] => key.swapped(a, b),
            _ => key.clone(),
        }
    }

    fn order(&self) -> Option<usize> {
        Some(self.order)
    }
}

/// UniformSwap with probability `uniform_weight`, WorstNgramSwap otherwise.
///
/// One `f64` draw per proposal picks the strategy, so a fixed seed replays
/// the same sequence of choices.
#[derive(Debug, Clone, Copy)]
pub struct MixedMutator {
    pub uniform: UniformSwap,
    pub worst: WorstNgramSwap,
    pub uniform_weight: f64,
}

impl MixedMutator {
    pub fn new(order: usize, uniform_weight: f64) -> Self {
        Self {
            uniform: UniformSwap,
            worst: WorstNgramSwap { order },
            uniform_weight,
        }
    }
}

impl Mutator for MixedMutator {
    fn propose(&self, key: &Key, decrypted: &[u8], scorer: &Scorer, rng: &mut Rng) -> Key {
        if rng.f64() < self.uniform_weight {
            self.uniform.propose(key, decrypted, scorer, rng)
        } else {
            self.worst.propose(key, decrypted, scorer, rng)
        }
    }

    fn order(&self) -> Option<usize> {
        Some(self.worst.order)
    }
}
