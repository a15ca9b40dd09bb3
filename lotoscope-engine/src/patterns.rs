use serde::Serialize;

use crate::models::Selection;
use crate::settings::AnalysisSettings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatternSet {
    pub consecutive_runs: Vec<Vec<u8>>,
    pub multiples_of_five: Vec<u8>,
    /// Fenêtres de longueur minimale contenues dans les suites : une suite de
    /// 3 en compte 1, une suite de 15 en compte 13.
    pub run_windows: usize,
}

/// Suites maximales de numéros consécutifs (pas de 1) d'au moins `min_len` éléments.
/// `sorted` doit être trié par ordre croissant.
pub fn detect_consecutive_runs(sorted: &[u8], min_len: usize) -> Vec<Vec<u8>> {
    let mut runs = Vec::new();
    let mut start = 0;

    for i in 1..=sorted.len() {
        let continues = i < sorted.len() && sorted[i] as u16 == sorted[i - 1] as u16 + 1;
        if !continues {
            if i - start >= min_len {
                runs.push(sorted[start..i].to_vec());
            }
            start = i;
        }
    }

    runs
}

pub fn detect_multiples(numbers: &[u8], divisor: u8) -> Vec<u8> {
    if divisor == 0 {
        return Vec::new();
    }
    numbers.iter().copied().filter(|n| n % divisor == 0).collect()
}

pub fn detect_patterns(selection: &Selection, settings: &AnalysisSettings) -> PatternSet {
    let sorted = selection.sorted();
    let consecutive_runs = detect_consecutive_runs(&sorted, settings.min_run_length);
    let run_windows = consecutive_runs
        .iter()
        .map(|run| run.len() + 1 - settings.min_run_length)
        .sum();
    PatternSet {
        consecutive_runs,
        multiples_of_five: detect_multiples(&sorted, settings.multiple_divisor),
        run_windows,
    }
}
