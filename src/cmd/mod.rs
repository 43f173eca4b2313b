pub mod codec;
pub mod crack;
pub mod reference;

use cipherbreak::alphabet::Alphabet;
use cipherbreak::alphabets::KnownAlphabet;
use cipherbreak::error::CbResult;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Text from `--text`, else from `--input`, else from stdin.
/// One trailing line break is dropped so files and echo pipes behave alike.
pub fn read_text(text: Option<&str>, input: Option<&Path>) -> CbResult<String> {
    let mut raw = match (text, input) {
        (Some(t), _) => t.to_string(),
        (None, Some(path)) => fs::read_to_string(path)?,
        (None, None) => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    if raw.ends_with('\n') {
        raw.pop();
        if raw.ends_with('\r') {
            raw.pop();
        }
    }
    Ok(raw)
}

/// Writes to `output` when given, otherwise prints on stdout.
pub fn write_text(text: &str, output: Option<&PathBuf>) -> CbResult<()> {
    match output {
        Some(path) => fs::write(path, format!("{}\n", text))?,
        None => println!("{}", text),
    }
    Ok(())
}

/// A preset wins over the literal alphabet string.
pub fn resolve_alphabet(symbols: &str, preset: Option<KnownAlphabet>) -> CbResult<Alphabet> {
    match preset {
        Some(p) => Alphabet::preset(p),
        None => Alphabet::new(symbols),
    }
}
