use serde::{Deserialize, Serialize};

/// Breakdown of a plausibility evaluation, for reports.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreDetails {
    pub score: f64,

    // Window accounting
    pub windows: usize,
    pub skipped_windows: usize,
    pub distinct_ngrams: usize,

    // Sum of ln(reference) over scored windows only (no smoothing floor)
    pub window_log_likelihood: f64,
    pub mean_per_window: f64,
}
