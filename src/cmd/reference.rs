use super::{read_text, resolve_alphabet};
use crate::reports;
use cipherbreak::alphabets::KnownAlphabet;
use cipherbreak::error::CbResult;
use cipherbreak::scorer::loader::{load_reference, save_reference, CorpusReference, ReferenceProvider};
use cipherbreak::scorer::Scorer;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct ReferenceArgs {
    /// Plain text in the target language
    #[arg(short, long)]
    pub corpus: PathBuf,

    #[arg(short = 'n', long, default_value_t = 2)]
    pub order: usize,

    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ_", conflicts_with = "preset")]
    pub alphabet: String,

    #[arg(short, long, value_enum)]
    pub preset: Option<KnownAlphabet>,

    #[arg(short, long)]
    pub output: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Reference tensor CSV
    #[arg(short, long)]
    pub reference: PathBuf,

    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ_", conflicts_with = "preset")]
    pub alphabet: String,

    #[arg(short, long, value_enum)]
    pub preset: Option<KnownAlphabet>,

    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    #[arg(short, long)]
    pub input: Option<PathBuf>,
}

pub fn build(args: ReferenceArgs) -> CbResult<()> {
    let alphabet = resolve_alphabet(&args.alphabet, args.preset)?;
    let provider = CorpusReference {
        text: read_text(None, Some(args.corpus.as_path()))?,
        alphabet,
    };
    let tensor = provider.reference_tensor(args.order)?;

    save_reference(&tensor, &args.output)?;
    info!(
        "{} cells, total count {}, smallest {}",
        tensor.len(),
        tensor.total(),
        tensor.min_count()
    );
    Ok(())
}

pub fn score(args: ScoreArgs) -> CbResult<()> {
    let alphabet = resolve_alphabet(&args.alphabet, args.preset)?;
    // The row count of the file decides the order
    let tensor = load_reference(&args.reference, &alphabet)?;
    let scorer = Scorer::new(tensor, &alphabet)?;

    let text = read_text(args.text.as_deref(), args.input.as_deref())?;
    let details = scorer.score_details(&alphabet.index_text(&text));

    reports::print_score_details(&details);
    println!("Score: {:.4}", details.score);
    Ok(())
}
