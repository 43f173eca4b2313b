use crate::alphabet::Key;
use crate::config::SearchSettings;
use crate::error::{CbResult, CipherBreakError};
use crate::optimizer::Chain;
use crate::scorer::Scorer;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Snapshot handed to a [`ProgressCallback`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Progress {
    pub chain: usize,
    pub iteration: usize,
    pub score: f64,
    pub best_score: f64,
    pub temperature: Option<f64>,
    pub accepted: usize,
}

/// A trait for receiving updates during a search.
/// Called from worker threads when several chains run at once.
pub trait ProgressCallback: Send + Sync {
    fn on_progress(&self, progress: &Progress);
}

impl ProgressCallback for () {
    fn on_progress(&self, _progress: &Progress) {}
}

/// Logs every report at `info` level.
pub struct TracingProgress;

impl ProgressCallback for TracingProgress {
    fn on_progress(&self, p: &Progress) {
        match p.temperature {
            Some(t) => info!(
                "Chain {} | Iter {:6} | Score {:.2} | Best {:.2} | Temp {:.3}",
                p.chain, p.iteration, p.score, p.best_score, t
            ),
            None => info!(
                "Chain {} | Iter {:6} | Score {:.2} | Best {:.2}",
                p.chain, p.iteration, p.score, p.best_score
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub chain: usize,
    pub seed: Option<u64>,
    pub key: String,
    pub plaintext: String,
    pub score: f64,
    pub iterations: usize,
    pub accepted: usize,
    pub trajectory: Vec<f64>,
    #[serde(skip)]
    pub best_key: Key,
}

pub struct Optimizer {
    scorer: Arc<Scorer>,
    settings: SearchSettings,
}

impl Optimizer {
    pub fn new(scorer: Arc<Scorer>, settings: SearchSettings) -> Self {
        Self { scorer, settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    /// Runs one chain to the end of the iteration budget.
    pub fn run_chain<CB: ProgressCallback + ?Sized>(
        &self,
        id: usize,
        ciphertext: Arc<str>,
        callback: &CB,
    ) -> CbResult<SearchOutcome> {
        let seed = self.settings.chain_seed(id);
        let mut chain = Chain::new(id, self.scorer.clone(), ciphertext, &self.settings, seed)?;

        debug!(
            "Chain {} starts at {:.2} (seed {:?})",
            id, chain.score, seed
        );
        chain.evolve(
            self.settings.iterations(),
            self.settings.report_every(),
            callback,
        );

        Ok(chain.into_outcome(seed))
    }

    /// Runs every restart as an independent chain and keeps the best result.
    ///
    /// Ties on the best score go to the lowest chain index, so a seeded run
    /// reduces to the same outcome whatever the thread scheduling.
    pub fn run<CB: ProgressCallback>(&self, ciphertext: &str, callback: &CB) -> CbResult<SearchOutcome> {
        let restarts = self.settings.restarts();
        let ciphertext: Arc<str> = Arc::from(ciphertext);
        let start = Instant::now();

        info!(
            "Spawning {} chain(s), {} iterations each",
            restarts,
            self.settings.iterations()
        );

        let outcomes: Vec<SearchOutcome> = (0..restarts)
            .into_par_iter()
            .map(|i| self.run_chain(i, ciphertext.clone(), callback))
            .collect::<CbResult<_>>()?;

        let best = select_best(outcomes).ok_or_else(|| {
            CipherBreakError::Config("at least one restart is required".to_string())
        })?;

        info!(
            "Search finished in {:.2}s: best {:.2} from chain {}",
            start.elapsed().as_secs_f32(),
            best.score,
            best.chain
        );
        Ok(best)
    }
}

/// Maximum best score; the earlier outcome wins ties.
pub fn select_best(outcomes: Vec<SearchOutcome>) -> Option<SearchOutcome> {
    outcomes
        .into_iter()
        .reduce(|best, next| if next.score > best.score { next } else { best })
}
