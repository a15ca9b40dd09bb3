use serde::Serialize;

use crate::classify::ClassificationResult;
use crate::models::{LotteryConfig, Selection};
use crate::patterns::PatternSet;

/// Point de départ sur l'échelle interne 0-10.
const BASE_SCORE: f64 = 5.0;
const RUN_PENALTY: f64 = 0.5;
const MAX_RUN_PENALTY: f64 = 2.0;
/// Écart-type des dizaines au-delà duquel le terme de répartition est nul.
const DECADE_STDDEV_SCALE: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ComparisonLabel {
    #[serde(rename = "above average")]
    AboveAverage,
    #[serde(rename = "average")]
    Average,
    #[serde(rename = "below average")]
    BelowAverage,
}

impl std::fmt::Display for ComparisonLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparisonLabel::AboveAverage => write!(f, "au-dessus de la moyenne"),
            ComparisonLabel::Average => write!(f, "dans la moyenne"),
            ComparisonLabel::BelowAverage => write!(f, "en dessous de la moyenne"),
        }
    }
}

pub fn comparison_label(score: f64) -> ComparisonLabel {
    if score >= 3.5 {
        ComparisonLabel::AboveAverage
    } else if score >= 2.5 {
        ComparisonLabel::Average
    } else {
        ComparisonLabel::BelowAverage
    }
}

/// `count / total` en pourcentage arrondi au dixième, 0 si `total` est nul.
pub fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round_one_decimal(count as f64 * 100.0 / total as f64)
}

pub fn round_one_decimal(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

fn balance_term(classification: &ClassificationResult, n: f64) -> f64 {
    let ideal = n / 3.0;
    let deviation = (classification.hot_count as f64 - ideal).abs()
        + (classification.cold_count as f64 - ideal).abs()
        + (classification.balanced_count as f64 - ideal).abs();
    1.0 - deviation / n
}

fn parity_term(selection: &Selection, n: f64) -> f64 {
    let even = selection.even_count() as f64;
    let odd = selection.odd_count() as f64;
    1.0 - (even - odd).abs() / n
}

/// Écart-type (population) d'une série de comptages.
pub fn population_stddev(counts: &[usize]) -> f64 {
    if counts.is_empty() {
        return 0.0;
    }
    let len = counts.len() as f64;
    let mean = counts.iter().sum::<usize>() as f64 / len;
    let variance = counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / len;
    variance.sqrt()
}

fn decade_term(selection: &Selection, config: &LotteryConfig) -> f64 {
    let counts = config.decade_counts(selection.numbers());
    (1.0 - population_stddev(&counts) / DECADE_STDDEV_SCALE).max(0.0)
}

/// 0,5 par fenêtre consécutive : une longue suite pèse plus que plusieurs courtes.
fn run_penalty(patterns: &PatternSet) -> f64 {
    (RUN_PENALTY * patterns.run_windows as f64).min(MAX_RUN_PENALTY)
}

/// Score de qualité d'une grille, dans [0, 5] et arrondi au dixième.
/// Fonction pure de ses entrées.
pub fn compute_score(
    selection: &Selection,
    classification: &ClassificationResult,
    patterns: &PatternSet,
    config: &LotteryConfig,
) -> f64 {
    let n = config.numbers_to_select() as f64;

    let raw = BASE_SCORE
        + balance_term(classification, n)
        + parity_term(selection, n)
        + decade_term(selection, config)
        - run_penalty(patterns);

    let score = round_one_decimal(raw.clamp(0.0, 10.0) / 2.0);
    if score.is_finite() { score } else { 0.0 }
}
