use super::{read_text, resolve_alphabet, write_text};
use crate::reports;
use cipherbreak::alphabet::Key;
use cipherbreak::alphabets::{get_all_alphabets, KnownAlphabet};
use cipherbreak::error::CbResult;
use clap::Args;
use std::path::PathBuf;
use tracing::debug;

#[derive(Args, Debug, Clone)]
pub struct CodecArgs {
    /// Key written with the alphabet's symbols
    #[arg(short, long)]
    pub key: String,

    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ_", conflicts_with = "preset")]
    pub alphabet: String,

    #[arg(short, long, value_enum)]
    pub preset: Option<KnownAlphabet>,

    #[arg(short, long, conflicts_with = "input")]
    pub text: Option<String>,

    #[arg(short, long)]
    pub input: Option<PathBuf>,

    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct KeygenArgs {
    #[arg(long, default_value = "ABCDEFGHIJKLMNOPQRSTUVWXYZ_", conflicts_with = "preset")]
    pub alphabet: String,

    #[arg(short, long, value_enum)]
    pub preset: Option<KnownAlphabet>,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

pub fn encrypt(args: CodecArgs) -> CbResult<()> {
    let alphabet = resolve_alphabet(&args.alphabet, args.preset)?;
    let key = Key::parse(&args.key, &alphabet)?;
    let text = read_text(args.text.as_deref(), args.input.as_deref())?;

    debug!("Encrypting {} characters", text.chars().count());
    write_text(&alphabet.encode(&text, &key), args.output.as_ref())
}

pub fn decrypt(args: CodecArgs) -> CbResult<()> {
    let alphabet = resolve_alphabet(&args.alphabet, args.preset)?;
    let key = Key::parse(&args.key, &alphabet)?;
    let text = read_text(args.text.as_deref(), args.input.as_deref())?;

    debug!("Decrypting {} characters", text.chars().count());
    write_text(&alphabet.decode(&text, &key), args.output.as_ref())
}

pub fn keygen(args: KeygenArgs) -> CbResult<()> {
    let alphabet = resolve_alphabet(&args.alphabet, args.preset)?;
    let mut rng = match args.seed {
        Some(s) => fastrand::Rng::with_seed(s),
        None => fastrand::Rng::new(),
    };
    println!("{}", alphabet.random_key(&mut rng).render(&alphabet));
    Ok(())
}

pub fn list_alphabets() {
    let rows: Vec<(String, String)> = get_all_alphabets()
        .into_iter()
        .map(|(preset, symbols)| (preset.to_string(), symbols.to_string()))
        .collect();
    reports::print_alphabet_table(&rows);
}
