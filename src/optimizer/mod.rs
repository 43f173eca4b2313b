pub mod acceptance;
pub mod mutation;
pub mod runner;

use self::acceptance::Acceptance;
use self::mutation::{MixedMutator, Mutator};
pub use self::runner::{Optimizer, Progress, ProgressCallback, SearchOutcome, TracingProgress};

use crate::alphabet::Key;
use crate::config::SearchSettings;
use crate::error::{CbResult, CipherBreakError};
use crate::scorer::Scorer;
use std::sync::Arc;

/// One Markov chain over substitution keys.
///
/// Holds the only mutable search state; chains never share it, so independent
/// chains can run on separate threads against the same `Arc` inputs.
/// The proposal strategy is any [`Mutator`]; [`Chain::new`] uses the
/// default [`MixedMutator`].
pub struct Chain<M = MixedMutator> {
    pub id: usize,
    pub scorer: Arc<Scorer>,

    // Ciphertext, as given and in symbol-index form
    pub ciphertext: Arc<str>,
    pub cipher_indices: Arc<[u8]>,

    pub mutator: M,
    pub acceptance: Acceptance,

    pub key: Key,
    pub score: f64,
    pub best_key: Key,
    pub best_score: f64,

    pub iteration: usize,
    pub accepted: usize,
    pub temperature: Option<f64>,
    pub trajectory: Vec<f64>,

    pub rng: fastrand::Rng,

    // Decryption under `key`, and scratch space for candidates
    decrypted: Vec<u8>,
    candidate: Vec<u8>,
    cells: Vec<usize>,
}

impl Chain<MixedMutator> {
    pub fn new(
        id: usize,
        scorer: Arc<Scorer>,
        ciphertext: Arc<str>,
        settings: &SearchSettings,
        seed: Option<u64>,
    ) -> CbResult<Self> {
        let mutator = MixedMutator::new(scorer.order, settings.uniform_weight());
        Self::with_mutator(id, scorer, ciphertext, settings, seed, mutator)
    }
}

impl<M: Mutator> Chain<M> {
    pub fn with_mutator(
        id: usize,
        scorer: Arc<Scorer>,
        ciphertext: Arc<str>,
        settings: &SearchSettings,
        seed: Option<u64>,
        mutator: M,
    ) -> CbResult<Self> {
        if settings.alphabet() != &scorer.alphabet {
            return Err(CipherBreakError::InvalidTensor(format!(
                "reference was built for alphabet '{}', search uses '{}'",
                scorer.alphabet.as_string(),
                settings.alphabet().as_string()
            )));
        }
        if let Some(order) = mutator.order() {
            if order != scorer.order {
                return Err(CipherBreakError::InvalidTensor(format!(
                    "mutation strategy reads order-{} windows, reference tensor has order {}",
                    order, scorer.order
                )));
            }
        }

        let mut rng = if let Some(s) = seed {
            fastrand::Rng::with_seed(s)
        } else {
            fastrand::Rng::new()
        };

        let key = match settings.start_key() {
            Some(k) => k.clone(),
            None => scorer.alphabet.random_key(&mut rng),
        };

        let cipher_indices: Arc<[u8]> = scorer.alphabet.index_text(&ciphertext).into();
        let mut decrypted = Vec::with_capacity(cipher_indices.len());
        key.decode_indices(&cipher_indices, &mut decrypted);
        let mut cells = Vec::with_capacity(cipher_indices.len());
        let score = scorer.score_indices_with(&decrypted, &mut cells);

        let mut trajectory = Vec::with_capacity(settings.iterations() + 1);
        trajectory.push(score);

        Ok(Self {
            id,
            scorer,
            ciphertext,
            candidate: Vec::with_capacity(cipher_indices.len()),
            cipher_indices,
            mutator,
            acceptance: settings.acceptance(),
            best_key: key.clone(),
            best_score: score,
            key,
            score,
            iteration: 0,
            accepted: 0,
            temperature: settings.acceptance().temperature(0),
            trajectory,
            rng,
            decrypted,
            cells,
        })
    }

    /// Propose, evaluate and decide once.
    #[inline(always)]
    pub fn step(&mut self) {
        let candidate_key =
            self.mutator
                .propose(&self.key, &self.decrypted, &self.scorer, &mut self.rng);
        candidate_key.decode_indices(&self.cipher_indices, &mut self.candidate);
        let candidate_score = self
            .scorer
            .score_indices_with(&self.candidate, &mut self.cells);

        self.temperature = self.acceptance.temperature(self.iteration);

        // Elitist tracking, independent of acceptance
        if candidate_score > self.best_score {
            self.best_score = candidate_score;
            self.best_key = candidate_key.clone();
        }

        if self
            .acceptance
            .accepts(candidate_score, self.score, self.iteration, &mut self.rng)
        {
            self.key = candidate_key;
            self.score = candidate_score;
            std::mem::swap(&mut self.decrypted, &mut self.candidate);
            self.accepted += 1;
        }

        self.trajectory.push(self.score);
        self.iteration += 1;
    }

    pub fn evolve<CB: ProgressCallback + ?Sized>(
        &mut self,
        steps: usize,
        report_every: usize,
        callback: &CB,
    ) {
        for _ in 0..steps {
            self.step();
            if report_every > 0 && self.iteration % report_every == 0 {
                callback.on_progress(&self.progress());
            }
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            chain: self.id,
            iteration: self.iteration,
            score: self.score,
            best_score: self.best_score,
            temperature: self.temperature,
            accepted: self.accepted,
        }
    }

    /// Decryption of the ciphertext under the best key found so far.
    pub fn best_plaintext(&self) -> String {
        self.scorer.alphabet.decode(&self.ciphertext, &self.best_key)
    }

    pub fn into_outcome(self, seed: Option<u64>) -> SearchOutcome {
        SearchOutcome {
            chain: self.id,
            seed,
            key: self.best_key.render(&self.scorer.alphabet),
            plaintext: self.best_plaintext(),
            score: self.best_score,
            iterations: self.iteration,
            accepted: self.accepted,
            trajectory: self.trajectory,
            best_key: self.best_key,
        }
    }
}
