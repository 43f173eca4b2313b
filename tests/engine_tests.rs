use cipherbreak::alphabet::{Alphabet, Key};
use cipherbreak::config::{AcceptanceKind, SearchConfig};
use cipherbreak::error::CipherBreakError;
use cipherbreak::ngram::NgramTensor;
use cipherbreak::optimizer::mutation::{MixedMutator, Mutator, UniformSwap, WorstNgramSwap};
use cipherbreak::optimizer::runner::select_best;
use cipherbreak::optimizer::{Chain, Optimizer, Progress, ProgressCallback, SearchOutcome};
use cipherbreak::scorer::Scorer;
use fastrand::Rng;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const CORPUS: &str = "IT_WAS_THE_BEST_OF_TIMES_IT_WAS_THE_WORST_OF_TIMES_\
IT_WAS_THE_AGE_OF_WISDOM_IT_WAS_THE_AGE_OF_FOOLISHNESS_\
IT_WAS_THE_EPOCH_OF_BELIEF_IT_WAS_THE_EPOCH_OF_INCREDULITY_";

fn english_scorer() -> Arc<Scorer> {
    let alphabet = Alphabet::new("ABCDEFGHIJKLMNOPQRSTUVWXYZ_").unwrap();
    let reference = NgramTensor::from_text(&alphabet, CORPUS, 2).unwrap();
    Arc::new(Scorer::new(reference, &alphabet).unwrap())
}

fn config(iterations: usize, seed: u64) -> SearchConfig {
    SearchConfig {
        iterations,
        seed: Some(seed),
        report_every: 0,
        ..Default::default()
    }
}

#[derive(Default)]
struct Recorder {
    reports: Mutex<Vec<Progress>>,
}

impl ProgressCallback for Recorder {
    fn on_progress(&self, progress: &Progress) {
        self.reports.lock().unwrap().push(*progress);
    }
}

#[test]
fn test_zero_iterations_returns_the_start_key() {
    let scorer = english_scorer();
    let alphabet = scorer.alphabet.clone();
    let start = "QWERTYUIOPASDFGHJKLZXCVBNM_";
    let settings = SearchConfig {
        start_key: Some(start.to_string()),
        ..config(0, 1)
    }
    .resolve()
    .unwrap();

    let ciphertext = "ZOL_DFS_CXPOT";
    let outcome = Optimizer::new(scorer.clone(), settings)
        .run(ciphertext, &())
        .unwrap();

    let key = Key::parse(start, &alphabet).unwrap();
    let expected = alphabet.decode(ciphertext, &key);
    assert_eq!(outcome.key, start);
    assert_eq!(outcome.plaintext, expected);
    assert_eq!(outcome.iterations, 0);
    assert_eq!(outcome.trajectory.len(), 1);
    assert_eq!(outcome.score, scorer.score(&expected));
    assert_eq!(outcome.trajectory[0], outcome.score);
}

#[test]
fn test_trajectory_has_one_entry_per_iteration_plus_start() {
    let scorer = english_scorer();
    let settings = config(250, 3).resolve().unwrap();
    let outcome = Optimizer::new(scorer, settings)
        .run("GSV_JFRXP_YILDM_ULC", &())
        .unwrap();

    assert_eq!(outcome.iterations, 250);
    assert_eq!(outcome.trajectory.len(), 251);
    assert!(outcome.accepted <= 250);
}

#[test]
fn test_best_score_never_decreases() {
    let scorer = english_scorer();
    let settings = SearchConfig {
        report_every: 1,
        ..config(400, 17)
    }
    .resolve()
    .unwrap();
    let recorder = Recorder::default();

    let outcome = Optimizer::new(scorer, settings)
        .run("GSV_JFRXP_YILDM_ULC_QFNKH_LEVI_GSV_OZAB_WLT", &recorder)
        .unwrap();

    let reports = recorder.reports.lock().unwrap();
    assert_eq!(reports.len(), 400);
    for pair in reports.windows(2) {
        assert!(pair[1].best_score >= pair[0].best_score);
        assert_eq!(pair[1].iteration, pair[0].iteration + 1);
    }
    for p in reports.iter() {
        assert!(p.best_score >= p.score);
        assert!(p.temperature.is_some());
    }

    let top = outcome
        .trajectory
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max);
    assert!(outcome.score >= top);
}

#[test]
fn test_strict_metropolis_trajectory_is_non_decreasing() {
    let scorer = english_scorer();
    let settings = SearchConfig {
        acceptance: AcceptanceKind::Metropolis,
        escape_probability: 0.0,
        ..config(300, 8)
    }
    .resolve()
    .unwrap();

    let outcome = Optimizer::new(scorer, settings)
        .run("GSV_JFRXP_YILDM_ULC_QFNKH_LEVI_GSV_OZAB_WLT", &())
        .unwrap();

    for pair in outcome.trajectory.windows(2) {
        assert!(pair[1] >= pair[0]);
    }
}

#[test]
fn test_outcome_score_matches_its_plaintext() {
    let scorer = english_scorer();
    let settings = SearchConfig {
        restarts: 3,
        ..config(300, 21)
    }
    .resolve()
    .unwrap();

    let outcome = Optimizer::new(scorer.clone(), settings)
        .run("GSV_JFRXP_YILDM_ULC", &())
        .unwrap();

    let alphabet = &scorer.alphabet;
    assert_eq!(
        outcome.plaintext,
        alphabet.decode("GSV_JFRXP_YILDM_ULC", &outcome.best_key)
    );
    assert_eq!(outcome.key, outcome.best_key.render(alphabet));
    assert!((outcome.score - scorer.score(&outcome.plaintext)).abs() < 1e-9);
}

#[test]
fn test_small_cipher_is_recovered() {
    // Distinct letter frequencies make the true key the unique maximum;
    // a walk that accepts every move visits all 24 keys
    let alphabet = Alphabet::new("ABCD").unwrap();
    let plain = "AAAABBBCCD".repeat(20);
    let reference = NgramTensor::from_text(&alphabet, &plain, 2).unwrap();
    let scorer = Arc::new(Scorer::new(reference, &alphabet).unwrap());

    let key = Key::parse("CADB", &alphabet).unwrap();
    let ciphertext = alphabet.encode(&plain, &key);

    let settings = SearchConfig {
        alphabet: "ABCD".to_string(),
        acceptance: AcceptanceKind::Metropolis,
        escape_probability: 1.0,
        uniform_weight: 1.0,
        ..config(2_000, 99)
    }
    .resolve()
    .unwrap();

    let outcome = Optimizer::new(scorer, settings)
        .run(&ciphertext, &())
        .unwrap();

    assert_eq!(outcome.plaintext, plain);
    assert_eq!(outcome.key, "CADB");
}

#[test]
fn test_chain_rejects_other_alphabet() {
    let scorer = english_scorer();
    let settings = SearchConfig {
        alphabet: "ABC".to_string(),
        ..config(10, 1)
    }
    .resolve()
    .unwrap();

    let err = Chain::new(0, scorer, Arc::from("ABC"), &settings, Some(1))
        .err()
        .unwrap();
    assert!(matches!(err, CipherBreakError::InvalidTensor(_)));
}

#[test]
fn test_chain_rejects_mutator_of_other_order() {
    let scorer = english_scorer();
    let settings = config(10, 1).resolve().unwrap();

    let err = Chain::with_mutator(
        0,
        scorer,
        Arc::from("ABC"),
        &settings,
        Some(1),
        MixedMutator::new(3, 0.5),
    )
    .err()
    .unwrap();
    assert!(matches!(err, CipherBreakError::InvalidTensor(_)));
}

#[test]
fn test_ciphertext_without_alphabet_symbols_still_runs() {
    let scorer = english_scorer();
    let settings = SearchConfig {
        uniform_weight: 0.0,
        ..config(50, 4)
    }
    .resolve()
    .unwrap();

    let mut chain = Chain::new(0, scorer, Arc::from("1234 5678"), &settings, Some(4)).unwrap();
    let start_key = chain.key.clone();
    chain.evolve(50, 0, &());

    // Worst-window swaps have nothing to target, so the key never moves
    assert_eq!(chain.key, start_key);
    assert_eq!(chain.iteration, 50);
    assert_eq!(chain.best_plaintext(), "1234 5678");
}

#[test]
fn test_chain_runs_with_plain_uniform_swap() {
    let scorer = english_scorer();
    let settings = config(50, 4).resolve().unwrap();

    // No alphabet symbols: every candidate scores the same and is accepted
    let mut chain =
        Chain::with_mutator(0, scorer, Arc::from("1234 5678"), &settings, Some(4), UniformSwap)
            .unwrap();
    let start_key = chain.key.clone();
    chain.evolve(50, 0, &());

    // Unlike the worst-window swap, uniform swaps keep moving the key
    assert_eq!(chain.accepted, 50);
    assert_ne!(chain.key, start_key);
    assert_eq!(chain.trajectory.len(), 51);
}

#[test]
fn test_chain_runs_with_worst_ngram_swap_alone() {
    let scorer = english_scorer();
    let settings = config(100, 6).resolve().unwrap();

    let mut chain = Chain::with_mutator(
        0,
        scorer,
        Arc::from("GSV_JFRXP_YILDM_ULC"),
        &settings,
        Some(6),
        WorstNgramSwap { order: 2 },
    )
    .unwrap();
    chain.evolve(100, 0, &());

    assert_eq!(chain.iteration, 100);
    assert!(chain.best_score >= chain.trajectory[0]);
}

/// Swaps key positions 0 and 1 every time and counts its calls.
#[derive(Default)]
struct FirstPairSwap {
    calls: AtomicUsize,
}

impl Mutator for FirstPairSwap {
    fn propose(&self, key: &Key, _decrypted: &[u8], _scorer: &Scorer, _rng: &mut Rng) -> Key {
        self.calls.fetch_add(1, Ordering::Relaxed);
        key.swapped(0, 1)
    }
}

#[test]
fn test_chain_runs_with_a_custom_mutator() {
    let scorer = english_scorer();
    let alphabet = scorer.alphabet.clone();
    let start = Key::identity(&alphabet);
    let settings = SearchConfig {
        start_key: Some(start.render(&alphabet)),
        acceptance: AcceptanceKind::Metropolis,
        escape_probability: 1.0,
        ..config(5, 2)
    }
    .resolve()
    .unwrap();

    // No order: the reference order check does not apply
    let mut chain = Chain::with_mutator(
        0,
        scorer,
        Arc::from("ABBA"),
        &settings,
        Some(2),
        FirstPairSwap::default(),
    )
    .unwrap();
    chain.evolve(5, 0, &());

    assert_eq!(chain.mutator.calls.load(Ordering::Relaxed), 5);
    assert_eq!(chain.accepted, 5);
    // An odd number of swaps of the same pair leaves it exchanged
    assert_eq!(chain.key, start.swapped(0, 1));
    assert_eq!(chain.best_plaintext().len(), 4);
}

#[test]
fn test_step_uses_the_temperature_of_the_current_iteration() {
    let scorer = english_scorer();
    let settings = SearchConfig {
        temp_initial: 4.0,
        cooling_rate: Some(0.5),
        temp_min: 0.01,
        report_every: 1,
        ..config(3, 5)
    }
    .resolve()
    .unwrap();

    let mut chain = Chain::new(0, scorer, Arc::from("GSV_JFRXP"), &settings, Some(5)).unwrap();
    assert_eq!(chain.temperature, Some(4.0));

    let recorder = Recorder::default();
    chain.evolve(3, 1, &recorder);

    // Step i runs at T_i, reported after the counter moves to i + 1
    let reports = recorder.reports.lock().unwrap();
    let temps: Vec<Option<f64>> = reports.iter().map(|p| p.temperature).collect();
    assert_eq!(temps, vec![Some(4.0), Some(2.0), Some(1.0)]);
    let iterations: Vec<usize> = reports.iter().map(|p| p.iteration).collect();
    assert_eq!(iterations, vec![1, 2, 3]);
}

fn outcome(chain: usize, score: f64) -> SearchOutcome {
    let alphabet = Alphabet::new("AB").unwrap();
    SearchOutcome {
        chain,
        seed: None,
        key: "AB".to_string(),
        plaintext: String::new(),
        score,
        iterations: 0,
        accepted: 0,
        trajectory: vec![score],
        best_key: Key::identity(&alphabet),
    }
}

#[test]
fn test_select_best_prefers_highest_then_lowest_chain() {
    let best = select_best(vec![outcome(0, -5.0), outcome(1, -2.0), outcome(2, -3.0)]).unwrap();
    assert_eq!(best.chain, 1);

    let tie = select_best(vec![outcome(0, -2.0), outcome(1, -2.0)]).unwrap();
    assert_eq!(tie.chain, 0);

    assert!(select_best(Vec::new()).is_none());
}
