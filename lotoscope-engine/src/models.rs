use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::ValidationError;

/// Taille d'un bloc de répartition (dizaine).
pub const DECADE_SIZE: u8 = 10;

/// Variantes connues : (nom, min, max, numéros à cocher).
const PRESETS: &[(&str, u8, u8, usize)] = &[
    ("lotofacil", 1, 25, 15),
    ("megasena", 1, 60, 6),
    ("quina", 1, 80, 5),
    ("euromillions", 1, 50, 5),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LotteryConfig {
    name: String,
    min_number: u8,
    max_number: u8,
    numbers_to_select: usize,
}

impl LotteryConfig {
    pub fn new(name: &str, min_number: u8, max_number: u8, numbers_to_select: usize) -> Result<Self, ValidationError> {
        if min_number > max_number {
            return Err(ValidationError::InvalidRange { min: min_number, max: max_number });
        }
        let range_size = (max_number - min_number) as usize + 1;
        if numbers_to_select == 0 || numbers_to_select > range_size {
            return Err(ValidationError::InvalidPickCount { pick: numbers_to_select, range_size });
        }
        Ok(Self {
            name: name.to_string(),
            min_number,
            max_number,
            numbers_to_select,
        })
    }

    pub fn preset(name: &str) -> Result<Self, ValidationError> {
        let key = name.trim().to_lowercase().replace(['-', '_', ' '], "");
        PRESETS
            .iter()
            .find(|(n, ..)| *n == key)
            .map(|&(n, min, max, pick)| Self::new(n, min, max, pick))
            .unwrap_or_else(|| Err(ValidationError::UnknownLottery(name.to_string())))
    }

    pub fn presets() -> Vec<Self> {
        PRESETS
            .iter()
            .filter_map(|&(n, min, max, pick)| Self::new(n, min, max, pick).ok())
            .collect()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min_number(&self) -> u8 {
        self.min_number
    }

    pub fn max_number(&self) -> u8 {
        self.max_number
    }

    pub fn numbers_to_select(&self) -> usize {
        self.numbers_to_select
    }

    pub fn range(&self) -> RangeInclusive<u8> {
        self.min_number..=self.max_number
    }

    pub fn range_size(&self) -> usize {
        (self.max_number - self.min_number) as usize + 1
    }

    pub fn contains(&self, number: u8) -> bool {
        self.range().contains(&number)
    }

    /// Index de la dizaine d'un numéro, compté depuis `min_number`.
    pub fn decade_of(&self, number: u8) -> usize {
        (number.saturating_sub(self.min_number) / DECADE_SIZE) as usize
    }

    pub fn decade_count(&self) -> usize {
        self.decade_of(self.max_number) + 1
    }

    /// Libellé « 01-10 » d'une dizaine, tronqué à `max_number`.
    pub fn decade_label(&self, decade: usize) -> String {
        let start = self.min_number as usize + decade * DECADE_SIZE as usize;
        let end = (start + DECADE_SIZE as usize - 1).min(self.max_number as usize);
        format!("{:02}-{:02}", start, end)
    }

    /// Comptage par dizaine, une case pour chaque dizaine de la plage.
    pub fn decade_counts(&self, numbers: &[u8]) -> Vec<usize> {
        let mut counts = vec![0usize; self.decade_count()];
        for &n in numbers {
            counts[self.decade_of(n)] += 1;
        }
        counts
    }

    pub(crate) fn ensure_selection(&self, selection: &Selection) -> Result<(), ValidationError> {
        if selection.lottery != self.name {
            return Err(ValidationError::ConfigMismatch {
                selection: selection.lottery.clone(),
                config: self.name.clone(),
            });
        }
        validate_numbers(&selection.numbers, self)
    }
}

impl std::fmt::Display for LotteryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} numéros parmi {}-{})",
            self.name, self.numbers_to_select, self.min_number, self.max_number
        )
    }
}

fn validate_numbers(numbers: &[u8], config: &LotteryConfig) -> Result<(), ValidationError> {
    if numbers.len() != config.numbers_to_select {
        return Err(ValidationError::WrongLength {
            expected: config.numbers_to_select,
            actual: numbers.len(),
        });
    }
    let mut seen = BTreeSet::new();
    for &n in numbers {
        if !config.contains(n) {
            return Err(ValidationError::OutOfRange {
                number: n,
                min: config.min_number,
                max: config.max_number,
            });
        }
        if !seen.insert(n) {
            return Err(ValidationError::Duplicate(n));
        }
    }
    Ok(())
}

/// Grille jouée. L'ordre de saisie est conservé : les recommandations
/// s'appuient dessus pour choisir les numéros à retirer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection {
    #[serde(skip)]
    lottery: String,
    numbers: Vec<u8>,
}

impl Selection {
    pub fn new(numbers: Vec<u8>, config: &LotteryConfig) -> Result<Self, ValidationError> {
        validate_numbers(&numbers, config)?;
        Ok(Self {
            lottery: config.name.clone(),
            numbers,
        })
    }

    pub fn numbers(&self) -> &[u8] {
        &self.numbers
    }

    pub fn sorted(&self) -> Vec<u8> {
        let mut sorted = self.numbers.clone();
        sorted.sort_unstable();
        sorted
    }

    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.numbers.contains(&number)
    }

    pub fn even_count(&self) -> usize {
        self.numbers.iter().filter(|&&n| n % 2 == 0).count()
    }

    pub fn odd_count(&self) -> usize {
        self.numbers.len() - self.even_count()
    }

    pub fn sum(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }
}

/// Numéros chauds et froids d'un concours. Les listes sont ordonnées
/// (du plus chaud au moins chaud, du plus froid au moins froid) et peuvent être vides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HistoricalBaseline {
    hot_numbers: Vec<u8>,
    cold_numbers: Vec<u8>,
}

impl HistoricalBaseline {
    pub fn new(hot_numbers: Vec<u8>, cold_numbers: Vec<u8>, config: &LotteryConfig) -> Result<Self, ValidationError> {
        let mut seen = BTreeSet::new();
        for &n in hot_numbers.iter().chain(cold_numbers.iter()) {
            if !config.contains(n) {
                return Err(ValidationError::BaselineOutOfRange {
                    number: n,
                    min: config.min_number,
                    max: config.max_number,
                });
            }
            if !seen.insert(n) {
                return Err(if hot_numbers.contains(&n) && cold_numbers.contains(&n) {
                    ValidationError::OverlappingBaseline(n)
                } else {
                    ValidationError::Duplicate(n)
                });
            }
        }
        Ok(Self { hot_numbers, cold_numbers })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Listes déjà disjointes et dans la plage (calcul interne depuis l'historique).
    pub(crate) fn from_sorted(hot_numbers: Vec<u8>, cold_numbers: Vec<u8>) -> Self {
        Self { hot_numbers, cold_numbers }
    }

    pub fn hot_numbers(&self) -> &[u8] {
        &self.hot_numbers
    }

    pub fn cold_numbers(&self) -> &[u8] {
        &self.cold_numbers
    }

    pub fn is_hot(&self, number: u8) -> bool {
        self.hot_numbers.contains(&number)
    }

    pub fn is_cold(&self, number: u8) -> bool {
        self.cold_numbers.contains(&number)
    }

    pub fn is_empty(&self) -> bool {
        self.hot_numbers.is_empty() && self.cold_numbers.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draw {
    pub draw_id: String,
    pub date: String,
    pub numbers: Vec<u8>,
}

impl Draw {
    /// Vérifie un tirage contre la configuration (mêmes règles qu'une grille).
    pub fn validate(&self, config: &LotteryConfig) -> Result<(), ValidationError> {
        validate_numbers(&self.numbers, config)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberStats {
    pub number: u8,
    pub frequency: u32,
    pub gap: u32,
}
