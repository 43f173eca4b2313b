use crate::alphabet::Alphabet;
use crate::error::{CbResult, CipherBreakError};
use crate::ngram::NgramTensor;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Source of the reference language model.
///
/// The search only relies on the returned tensor having the requested order
/// and one axis entry per alphabet symbol.
pub trait ReferenceProvider {
    fn reference_tensor(&self, order: usize) -> CbResult<NgramTensor>;
}

/// Reference matrix stored as CSV: `|A|` columns, `|A|^(n-1)` rows.
pub struct CsvReference {
    pub path: PathBuf,
    pub alphabet: Alphabet,
}

impl ReferenceProvider for CsvReference {
    fn reference_tensor(&self, order: usize) -> CbResult<NgramTensor> {
        let tensor = load_reference(&self.path, &self.alphabet)?;
        tensor.check_shape(self.alphabet.len(), order)?;
        Ok(tensor)
    }
}

/// Reference counted on the fly from a corpus text.
pub struct CorpusReference {
    pub text: String,
    pub alphabet: Alphabet,
}

impl ReferenceProvider for CorpusReference {
    fn reference_tensor(&self, order: usize) -> CbResult<NgramTensor> {
        let tensor = NgramTensor::from_text(&self.alphabet, &self.text, order)?;
        info!(
            "Counted order-{} reference from {} corpus characters",
            order,
            self.text.chars().count()
        );
        Ok(tensor)
    }
}

pub fn load_reference<P: AsRef<Path>>(path: P, alphabet: &Alphabet) -> CbResult<NgramTensor> {
    let path = path.as_ref();
    debug!("Loading reference tensor from: {}", path.display());
    let file = File::open(path)?;
    load_reference_from_reader(file, alphabet)
}

pub fn load_reference_from_reader<R: Read>(reader: R, alphabet: &Alphabet) -> CbResult<NgramTensor> {
    let width = alphabet.len();
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut counts = Vec::new();
    let mut rows = 0usize;
    let mut floored = 0usize;

    for (row_idx, result) in rdr.records().enumerate() {
        let rec = result?;
        if rec.len() == 1 && rec[0].is_empty() {
            continue;
        }
        if rec.len() != width {
            return Err(CipherBreakError::InvalidTensor(format!(
                "row {} has {} columns, alphabet has {} symbols",
                row_idx + 1,
                rec.len(),
                width
            )));
        }

        for (col_idx, field) in rec.iter().enumerate() {
            let value = parse_count(field).ok_or_else(|| {
                CipherBreakError::InvalidTensor(format!(
                    "row {}, column {}: '{}' is not a non-negative count",
                    row_idx + 1,
                    col_idx + 1,
                    field
                ))
            })?;
            if value == 0 {
                floored += 1;
            }
            counts.push(value.max(1));
        }
        rows += 1;
    }

    let order = infer_order(width, rows)?;

    if floored > 0 {
        warn!(
            "Reference tensor had {} zero cells; raised to 1 to keep ln() finite.",
            floored
        );
    }
    debug!(
        "   -> Loaded {} rows, order {} ({} cells).",
        rows,
        order,
        counts.len()
    );

    NgramTensor::from_counts(width, order, counts)
}

// Accepts integer counts, and whole floats such as "12.0" written by numeric tools.
fn parse_count(field: &str) -> Option<u64> {
    if let Ok(v) = field.parse::<u64>() {
        return Some(v);
    }
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 => Some(v as u64),
        _ => None,
    }
}

fn infer_order(width: usize, rows: usize) -> CbResult<usize> {
    if rows == 0 {
        return Err(CipherBreakError::InvalidTensor(
            "reference file has no rows".to_string(),
        ));
    }
    let mut order = 1;
    let mut expected_rows = 1usize;
    while expected_rows < rows {
        expected_rows = expected_rows.saturating_mul(width);
        order += 1;
    }
    if expected_rows != rows {
        return Err(CipherBreakError::InvalidTensor(format!(
            "{} rows is not a power of the alphabet size {}",
            rows, width
        )));
    }
    Ok(order)
}

pub fn save_reference<P: AsRef<Path>>(tensor: &NgramTensor, path: P) -> CbResult<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(path)?;
    save_reference_to_writer(tensor, file)?;
    info!("Saved order-{} reference to {}", tensor.order(), path.display());
    Ok(())
}

pub fn save_reference_to_writer<W: Write>(tensor: &NgramTensor, writer: W) -> CbResult<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    for row in tensor.counts().chunks(tensor.alphabet_size()) {
        wtr.write_record(row.iter().map(|c| c.to_string()))?;
    }
    wtr.flush()?;
    Ok(())
}
