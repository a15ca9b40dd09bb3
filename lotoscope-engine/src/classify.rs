use serde::Serialize;

use crate::models::{HistoricalBaseline, Selection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberTag {
    Hot,
    Cold,
    Balanced,
}

impl std::fmt::Display for NumberTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NumberTag::Hot => write!(f, "CHAUD"),
            NumberTag::Cold => write!(f, "FROID"),
            NumberTag::Balanced => write!(f, "-"),
        }
    }
}

/// Partition d'une grille ; chaque liste garde l'ordre de la grille.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    pub hot_count: usize,
    pub cold_count: usize,
    pub balanced_count: usize,
    pub hot_numbers: Vec<u8>,
    pub cold_numbers: Vec<u8>,
    pub balanced_numbers: Vec<u8>,
}

impl ClassificationResult {
    pub fn total(&self) -> usize {
        self.hot_count + self.cold_count + self.balanced_count
    }
}

pub fn tag_number(number: u8, baseline: &HistoricalBaseline) -> NumberTag {
    if baseline.is_hot(number) {
        NumberTag::Hot
    } else if baseline.is_cold(number) {
        NumberTag::Cold
    } else {
        NumberTag::Balanced
    }
}

pub fn classify(selection: &Selection, baseline: &HistoricalBaseline) -> ClassificationResult {
    let mut result = ClassificationResult::default();

    for &n in selection.numbers() {
        match tag_number(n, baseline) {
            NumberTag::Hot => result.hot_numbers.push(n),
            NumberTag::Cold => result.cold_numbers.push(n),
            NumberTag::Balanced => result.balanced_numbers.push(n),
        }
    }

    result.hot_count = result.hot_numbers.len();
    result.cold_count = result.cold_numbers.len();
    result.balanced_count = result.balanced_numbers.len();
    result
}
