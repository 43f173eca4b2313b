use crate::alphabet::{Alphabet, Key};
use crate::error::{CbResult, CipherBreakError};
use crate::optimizer::acceptance::{Acceptance, CoolingSchedule};
use clap::parser::ValueSource;
use clap::{ArgMatches, Args, ValueEnum};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use strum_macros::{Display, EnumString};
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceKind {
    Metropolis,
    Annealing,
}

/// Raw search parameters as given on the command line or in a JSON file.
///
/// Turned into an immutable [`SearchSettings`] by [`SearchConfig::resolve`],
/// which is the only place parameters are validated.
#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ_")]
    pub alphabet: String,

    #[arg(long)]
    pub start_key: Option<String>,

    #[arg(short = 'i', long, default_value_t = 10_000)]
    pub iterations: usize,

    #[arg(long, value_enum, default_value_t = AcceptanceKind::Annealing)]
    pub acceptance: AcceptanceKind,

    // === METROPOLIS ===
    #[arg(long, default_value_t = 0.01)]
    pub escape_probability: f64,

    // === ANNEALING ===
    #[arg(long, default_value_t = 5.0)]
    pub temp_initial: f64,
    #[arg(long, default_value_t = 0.01)]
    pub temp_min: f64,
    // Derived from the iteration budget when absent
    #[arg(long)]
    pub cooling_rate: Option<f64>,

    // === MUTATION ===
    #[arg(long, default_value_t = 0.5)]
    pub uniform_weight: f64,

    // === RUNNER ===
    #[arg(long, default_value_t = 1)]
    pub restarts: usize,
    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
    #[arg(long, default_value_t = 500)]
    pub report_every: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            alphabet: "ABCDEFGHIJKLMNOPQRSTUVWXYZ_".to_string(),
            start_key: None,
            iterations: 10_000,
            acceptance: AcceptanceKind::Annealing,
            escape_probability: 0.01,
            temp_initial: 5.0,
            temp_min: 0.01,
            cooling_rate: None,
            uniform_weight: 0.5,
            restarts: 1,
            seed: None,
            report_every: 500,
        }
    }
}

impl SearchConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> CbResult<Self> {
        let path = path.as_ref();
        debug!("Loading search config from: {}", path.display());
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Copies every field the user set explicitly on the command line from
    /// `cli` onto `self`, leaving file values in place for the rest.
    pub fn merge_from_cli(&mut self, cli: &SearchConfig, matches: &ArgMatches) {
        macro_rules! update_if_present {
            ($field:ident) => {
                if matches.value_source(stringify!($field)) == Some(ValueSource::CommandLine) {
                    self.$field = cli.$field.clone();
                }
            };
        }

        update_if_present!(alphabet);
        update_if_present!(start_key);
        update_if_present!(iterations);
        update_if_present!(acceptance);
        update_if_present!(escape_probability);
        update_if_present!(temp_initial);
        update_if_present!(temp_min);
        update_if_present!(cooling_rate);
        update_if_present!(uniform_weight);
        update_if_present!(restarts);
        update_if_present!(seed);
        update_if_present!(report_every);
    }

    pub fn resolve(&self) -> CbResult<SearchSettings> {
        let alphabet = Alphabet::new(&self.alphabet)?;

        let start_key = self
            .start_key
            .as_deref()
            .map(|k| Key::parse(k, &alphabet))
            .transpose()?;

        let acceptance = match self.acceptance {
            AcceptanceKind::Metropolis => Acceptance::metropolis(self.escape_probability)?,
            AcceptanceKind::Annealing => {
                let rate = self
                    .cooling_rate
                    .unwrap_or_else(|| CoolingSchedule::rate_for_budget(self.iterations));
                Acceptance::annealing(CoolingSchedule::new(self.temp_initial, rate, self.temp_min)?)
            }
        };

        if !(0.0..=1.0).contains(&self.uniform_weight) {
            return Err(CipherBreakError::Config(format!(
                "uniform mutation weight must be in [0, 1], got {}",
                self.uniform_weight
            )));
        }
        if self.restarts == 0 {
            return Err(CipherBreakError::Config(
                "at least one restart is required".to_string(),
            ));
        }

        Ok(SearchSettings {
            alphabet,
            start_key,
            iterations: self.iterations,
            acceptance,
            uniform_weight: self.uniform_weight,
            restarts: self.restarts,
            seed: self.seed,
            report_every: self.report_every,
        })
    }
}

/// Validated, immutable search configuration consumed by the engine.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    alphabet: Alphabet,
    start_key: Option<Key>,
    iterations: usize,
    acceptance: Acceptance,
    uniform_weight: f64,
    restarts: usize,
    seed: Option<u64>,
    report_every: usize,
}

impl SearchSettings {
    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn start_key(&self) -> Option<&Key> {
        self.start_key.as_ref()
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    pub fn uniform_weight(&self) -> f64 {
        self.uniform_weight
    }

    pub fn restarts(&self) -> usize {
        self.restarts
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn report_every(&self) -> usize {
        self.report_every
    }

    /// Seed for restart `index`: the base seed plus the index.
    pub fn chain_seed(&self, index: usize) -> Option<u64> {
        self.seed.map(|s| s.wrapping_add(index as u64))
    }
}
