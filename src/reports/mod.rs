use cipherbreak::alphabet::{Alphabet, Key};
use cipherbreak::error::CbResult;
use cipherbreak::optimizer::SearchOutcome;
use cipherbreak::scorer::ScoreDetails;
use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use std::path::Path;

/// Alphabet row over key row: which cipher symbol stands for which letter.
pub fn print_key_grid(name: &str, alphabet: &Alphabet, key: &Key) {
    println!("\nKey: {}", name);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let plain: Vec<Cell> = alphabet
        .symbols()
        .iter()
        .map(|&b| Cell::new(b as char).set_alignment(CellAlignment::Center))
        .collect();
    let cipher: Vec<Cell> = key
        .render(alphabet)
        .chars()
        .map(|c| {
            Cell::new(c)
                .set_alignment(CellAlignment::Center)
                .fg(Color::Cyan)
        })
        .collect();

    table.add_row(plain);
    table.add_row(cipher);
    println!("{}", table);
}

pub fn print_outcome_report(outcome: &SearchOutcome, details: &ScoreDetails) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Chain").add_attribute(Attribute::Bold),
        Cell::new("Seed"),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Iters"),
        Cell::new("Accepted"),
        Cell::new("Accept %"),
        Cell::new("Windows"),
        Cell::new("Skipped"),
        Cell::new("Distinct"),
        Cell::new("Mean ln"),
    ]);

    for i in 1..=9 {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    let accept_rate = if outcome.iterations > 0 {
        100.0 * outcome.accepted as f64 / outcome.iterations as f64
    } else {
        0.0
    };

    table.add_row(vec![
        Cell::new(outcome.chain).add_attribute(Attribute::Bold),
        Cell::new(
            outcome
                .seed
                .map(|s| s.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ),
        Cell::new(format!("{:.2}", outcome.score)).fg(Color::Cyan),
        Cell::new(outcome.iterations),
        Cell::new(outcome.accepted),
        Cell::new(format!("{:.1}", accept_rate)),
        Cell::new(details.windows),
        Cell::new(details.skipped_windows),
        Cell::new(details.distinct_ngrams),
        Cell::new(format!("{:.3}", details.mean_per_window)),
    ]);
    println!("\n{}", table);
}

pub fn print_score_details(details: &ScoreDetails) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    let rows = [
        ("Score", format!("{:.4}", details.score)),
        ("Windows scored", details.windows.to_string()),
        ("Windows skipped", details.skipped_windows.to_string()),
        ("Distinct n-grams", details.distinct_ngrams.to_string()),
        ("Window log-likelihood", format!("{:.4}", details.window_log_likelihood)),
        ("Mean ln per window", format!("{:.4}", details.mean_per_window)),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{}", table);
}

/// Text stand-in for a plot: the trajectory sampled at `samples` evenly
/// spaced iterations, with a bar scaled between the lowest and highest score.
pub fn print_trajectory(trajectory: &[f64], samples: usize) {
    if trajectory.is_empty() || samples == 0 {
        return;
    }

    let lo = trajectory.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = trajectory.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (hi - lo).max(f64::EPSILON);
    const BAR_WIDTH: f64 = 40.0;

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.add_row(vec![
        Cell::new("Iter").add_attribute(Attribute::Bold),
        Cell::new("Score").fg(Color::Cyan),
        Cell::new("Plausibility"),
    ]);
    if let Some(col) = table.column_mut(0) {
        col.set_cell_alignment(CellAlignment::Right);
    }
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let last = trajectory.len() - 1;
    let points = samples.min(trajectory.len());
    for k in 0..points {
        let idx = if points == 1 { last } else { k * last / (points - 1) };
        let score = trajectory[idx];
        let bar = (((score - lo) / span) * BAR_WIDTH).round() as usize;
        table.add_row(vec![
            Cell::new(idx),
            Cell::new(format!("{:.2}", score)),
            Cell::new("#".repeat(bar)).fg(Color::Green),
        ]);
    }
    println!("\n{}", table);
}

pub fn print_alphabet_table(rows: &[(String, String)]) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Preset").add_attribute(Attribute::Bold),
        Cell::new("Size"),
        Cell::new("Symbols").fg(Color::Cyan),
    ]);
    for (name, symbols) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(symbols.chars().count()).set_alignment(CellAlignment::Right),
            Cell::new(symbols),
        ]);
    }
    println!("{}", table);
}

/// Writes `iteration,score` rows for external plotting.
pub fn write_trajectory_csv<P: AsRef<Path>>(path: P, trajectory: &[f64]) -> CbResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["iteration", "score"])?;
    for (i, score) in trajectory.iter().enumerate() {
        wtr.write_record([i.to_string(), score.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}
