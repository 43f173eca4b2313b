use super::{read_text, write_text};
use crate::reports;
use cipherbreak::alphabets::KnownAlphabet;
use cipherbreak::config::SearchConfig;
use cipherbreak::error::{CbResult, CipherBreakError};
use cipherbreak::optimizer::{Optimizer, TracingProgress};
use cipherbreak::scorer::loader::{CorpusReference, CsvReference, ReferenceProvider};
use cipherbreak::scorer::Scorer;
use clap::{ArgMatches, Args};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Args, Debug, Clone)]
pub struct CrackArgs {
    #[command(flatten)]
    pub search: SearchConfig,

    /// Named alphabet in place of --alphabet
    #[arg(short, long, value_enum, conflicts_with = "alphabet")]
    pub preset: Option<KnownAlphabet>,

    /// JSON search configuration; explicit flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Reference tensor CSV
    #[arg(short, long, conflicts_with = "corpus")]
    pub reference: Option<PathBuf>,

    /// Corpus to count the reference from instead of a CSV file
    #[arg(short, long)]
    pub corpus: Option<PathBuf>,

    #[arg(short = 'n', long, default_value_t = 2)]
    pub order: usize,

    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Where to write the best plaintext (stdout report only when absent)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Where to write the outcome as JSON
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Where to write the score trajectory as `iteration,score` CSV
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Rows in the printed trajectory table
    #[arg(long, default_value_t = 10)]
    pub samples: usize,
}

pub fn run(args: CrackArgs, matches: Option<&ArgMatches>) -> CbResult<()> {
    let mut config = match (&args.config, matches) {
        (Some(path), Some(m)) => {
            let mut file_config = SearchConfig::load_from_file(path)?;
            file_config.merge_from_cli(&args.search, m);
            file_config
        }
        (Some(path), None) => SearchConfig::load_from_file(path)?,
        (None, _) => args.search.clone(),
    };
    if let Some(preset) = args.preset {
        config.alphabet = preset.symbols().to_string();
    }
    let settings = config.resolve()?;
    let alphabet = settings.alphabet().clone();

    let provider: Box<dyn ReferenceProvider> = match (&args.reference, &args.corpus) {
        (Some(path), _) => Box::new(CsvReference {
            path: path.clone(),
            alphabet: alphabet.clone(),
        }),
        (None, Some(path)) => Box::new(CorpusReference {
            text: read_text(None, Some(path.as_path()))?,
            alphabet: alphabet.clone(),
        }),
        (None, None) => {
            return Err(CipherBreakError::Config(
                "crack needs --reference or --corpus".to_string(),
            ));
        }
    };
    let scorer = Arc::new(Scorer::new(provider.reference_tensor(args.order)?, &alphabet)?);

    let ciphertext = read_text(args.text.as_deref(), args.input.as_deref())?;
    debug!("Ciphertext has {} characters", ciphertext.chars().count());

    let optimizer = Optimizer::new(scorer.clone(), settings);
    let outcome = optimizer.run(&ciphertext, &TracingProgress)?;

    let details = scorer.score_details(&alphabet.index_text(&outcome.plaintext));
    reports::print_key_grid(&format!("chain {}", outcome.chain), &alphabet, &outcome.best_key);
    reports::print_outcome_report(&outcome, &details);
    reports::print_trajectory(&outcome.trajectory, args.samples);

    if let Some(path) = &args.trace {
        reports::write_trajectory_csv(path, &outcome.trajectory)?;
        info!("Trajectory written to {}", path.display());
    }
    if let Some(path) = &args.json {
        fs::write(path, serde_json::to_string_pretty(&outcome)?)?;
        info!("Outcome written to {}", path.display());
    }
    if let Some(path) = &args.output {
        write_text(&outcome.plaintext, Some(path))?;
        info!("Plaintext written to {}", path.display());
    }

    println!("Key: {}", outcome.key);
    println!("Score: {:.4}", outcome.score);
    println!("Plaintext: {}", outcome.plaintext);
    Ok(())
}
