use serde::Serialize;

use crate::classify::ClassificationResult;
use crate::models::{HistoricalBaseline, LotteryConfig, Selection};
use crate::settings::AnalysisSettings;

const PRIORITY_HOT: u8 = 1;
const PRIORITY_PARITY: u8 = 2;
const PRIORITY_DECADE: u8 = 3;
const PRIORITY_SUCCESS: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    HotNumbers,
    Parity,
    DecadeConcentration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "OK"),
            Severity::Warning => write!(f, "ATTENTION"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub severity: Severity,
    pub title: String,
    pub diagnosis: String,
    pub recommendation: String,
    pub actionable: bool,
    pub numbers_to_add: Vec<u8>,
    pub numbers_to_remove: Vec<u8>,
    /// 1 = le plus urgent.
    pub priority: u8,
}

impl Recommendation {
    fn success(kind: RecommendationKind, title: &str, diagnosis: String) -> Self {
        Self {
            kind,
            severity: Severity::Success,
            title: title.to_string(),
            diagnosis,
            recommendation: "Rien à changer sur ce point.".to_string(),
            actionable: false,
            numbers_to_add: Vec::new(),
            numbers_to_remove: Vec::new(),
            priority: PRIORITY_SUCCESS,
        }
    }
}

fn join(numbers: &[u8]) -> String {
    if numbers.is_empty() {
        return "aucun".to_string();
    }
    numbers.iter().map(|n| format!("{:02}", n)).collect::<Vec<_>>().join(", ")
}

/// Numéros de la plage absents de la grille et acceptés par `keep`, par ordre croissant.
fn unselected<'a>(
    selection: &'a Selection,
    config: &LotteryConfig,
    keep: impl Fn(u8) -> bool + 'a,
) -> impl Iterator<Item = u8> + 'a {
    config.range().filter(move |&n| !selection.contains(n) && keep(n))
}

fn hot_rule(
    selection: &Selection,
    classification: &ClassificationResult,
    baseline: &HistoricalBaseline,
    config: &LotteryConfig,
    settings: &AnalysisSettings,
) -> Recommendation {
    let hot = classification.hot_count;
    let (low, high) = (settings.hot_target_min, settings.hot_target_max);

    if hot < low {
        let deficit = low - hot;
        let numbers_to_add: Vec<u8> = baseline
            .hot_numbers()
            .iter()
            .copied()
            .filter(|&n| !selection.contains(n))
            .take(deficit)
            .collect();
        // Les froids partent en premier, puis les neutres si la grille n'en a pas assez.
        let numbers_to_remove: Vec<u8> = classification
            .cold_numbers
            .iter()
            .chain(classification.balanced_numbers.iter())
            .copied()
            .take(numbers_to_add.len())
            .collect();

        let recommendation = if numbers_to_add.is_empty() {
            "Aucun numéro chaud disponible dans la référence historique pour ce concours.".to_string()
        } else {
            format!(
                "Ajoutez {} et retirez {}.",
                join(&numbers_to_add),
                join(&numbers_to_remove)
            )
        };

        return Recommendation {
            kind: RecommendationKind::HotNumbers,
            severity: Severity::Warning,
            title: "Trop peu de numéros chauds".to_string(),
            diagnosis: format!("{} numéro(s) chaud(s), l'objectif est entre {} et {}.", hot, low, high),
            recommendation,
            actionable: true,
            numbers_to_add,
            numbers_to_remove,
            priority: PRIORITY_HOT,
        };
    }

    if hot > high {
        let excess = hot - high;
        let mut numbers_to_add: Vec<u8> =
            unselected(selection, config, |n| !baseline.is_hot(n) && !baseline.is_cold(n))
                .take(excess)
                .collect();
        let mut numbers_to_remove: Vec<u8> = classification.hot_numbers.iter().copied().take(excess).collect();
        let swaps = numbers_to_add.len().min(numbers_to_remove.len());
        numbers_to_add.truncate(swaps);
        numbers_to_remove.truncate(swaps);

        return Recommendation {
            kind: RecommendationKind::HotNumbers,
            severity: Severity::Warning,
            title: "Trop de numéros chauds".to_string(),
            diagnosis: format!("{} numéro(s) chaud(s), l'objectif est entre {} et {}.", hot, low, high),
            recommendation: format!(
                "Remplacez {} par des numéros neutres : {}.",
                join(&numbers_to_remove),
                join(&numbers_to_add)
            ),
            actionable: true,
            numbers_to_add,
            numbers_to_remove,
            priority: PRIORITY_HOT,
        };
    }

    Recommendation::success(
        RecommendationKind::HotNumbers,
        "Bon dosage de numéros chauds",
        format!("{} numéro(s) chaud(s), dans l'objectif {}-{}.", hot, low, high),
    )
}

fn parity_rule(selection: &Selection, config: &LotteryConfig) -> Recommendation {
    let n = config.numbers_to_select();
    let ideal_even = n / 2;
    let ideal_odd = n - ideal_even;
    let even = selection.even_count();
    let odd = selection.odd_count();

    if even + 1 >= ideal_even && even <= ideal_even + 1 {
        return Recommendation::success(
            RecommendationKind::Parity,
            "Parité équilibrée",
            format!("{} pairs / {} impairs (idéal {} / {}).", even, odd, ideal_even, ideal_odd),
        );
    }

    let diff = even.abs_diff(ideal_even);
    let too_many_even = even > ideal_even;
    let mut numbers_to_remove: Vec<u8> = selection
        .numbers()
        .iter()
        .copied()
        .filter(|n| (n % 2 == 0) == too_many_even)
        .take(diff)
        .collect();
    let mut numbers_to_add: Vec<u8> = unselected(selection, config, move |n| (n % 2 == 0) != too_many_even)
        .take(diff)
        .collect();
    let swaps = numbers_to_add.len().min(numbers_to_remove.len());
    numbers_to_add.truncate(swaps);
    numbers_to_remove.truncate(swaps);

    let (over, under) = if too_many_even { ("pairs", "impairs") } else { ("impairs", "pairs") };

    Recommendation {
        kind: RecommendationKind::Parity,
        severity: Severity::Warning,
        title: "Déséquilibre pair/impair".to_string(),
        diagnosis: format!("{} pairs / {} impairs (idéal {} / {}).", even, odd, ideal_even, ideal_odd),
        recommendation: format!(
            "Échangez {} numéro(s) {} ({}) contre des {} ({}).",
            swaps,
            over,
            join(&numbers_to_remove),
            under,
            join(&numbers_to_add)
        ),
        actionable: true,
        numbers_to_add,
        numbers_to_remove,
        priority: PRIORITY_PARITY,
    }
}

fn decade_rule(selection: &Selection, config: &LotteryConfig, settings: &AnalysisSettings) -> Option<Recommendation> {
    let counts = config.decade_counts(selection.numbers());
    let max = *counts.iter().max()?;
    let min = *counts.iter().min()?;
    if max - min < settings.decade_spread_threshold {
        return None;
    }

    let max_decade = counts.iter().position(|&c| c == max)?;
    let min_decade = counts.iter().position(|&c| c == min)?;

    Some(Recommendation {
        kind: RecommendationKind::DecadeConcentration,
        severity: Severity::Info,
        title: "Concentration sur une dizaine".to_string(),
        diagnosis: format!(
            "{} numéro(s) en {} contre {} en {}.",
            max,
            config.decade_label(max_decade),
            min,
            config.decade_label(min_decade)
        ),
        recommendation: format!(
            "Déplacez quelques numéros de la dizaine {} vers la dizaine {} pour mieux couvrir la plage.",
            config.decade_label(max_decade),
            config.decade_label(min_decade)
        ),
        actionable: false,
        numbers_to_add: Vec::new(),
        numbers_to_remove: Vec::new(),
        priority: PRIORITY_DECADE,
    })
}

/// Recommandations triées par priorité croissante. Déterministe : mêmes
/// entrées, même liste.
pub fn generate_recommendations(
    selection: &Selection,
    classification: &ClassificationResult,
    baseline: &HistoricalBaseline,
    config: &LotteryConfig,
    settings: &AnalysisSettings,
) -> Vec<Recommendation> {
    let mut recommendations = vec![
        hot_rule(selection, classification, baseline, config, settings),
        parity_rule(selection, config),
    ];
    recommendations.extend(decade_rule(selection, config, settings));

    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;

    fn lotofacil() -> LotteryConfig {
        LotteryConfig::preset("lotofacil").unwrap()
    }

    fn run(numbers: Vec<u8>, hot: Vec<u8>, cold: Vec<u8>) -> Vec<Recommendation> {
        let config = lotofacil();
        let selection = Selection::new(numbers, &config).unwrap();
        let baseline = HistoricalBaseline::new(hot, cold, &config).unwrap();
        let classification = classify(&selection, &baseline);
        generate_recommendations(&selection, &classification, &baseline, &config, &AnalysisSettings::default())
    }

    fn find(recs: &[Recommendation], kind: RecommendationKind) -> &Recommendation {
        recs.iter().find(|r| r.kind == kind).unwrap()
    }

    // 1,3,5,8,10 | 11,14,16,18,19 | 21..25 : 7 pairs, 5 par dizaine
    fn spread_grid() -> Vec<u8> {
        vec![1, 3, 5, 8, 10, 11, 14, 16, 18, 19, 21, 22, 23, 24, 25]
    }

    #[test]
    fn test_hot_window_success() {
        let recs = run(spread_grid(), vec![1, 3, 5, 8], vec![]);
        let hot = find(&recs, RecommendationKind::HotNumbers);
        assert_eq!(hot.severity, Severity::Success);
        assert!(!hot.actionable);
        assert_eq!(hot.priority, 5);
    }

    #[test]
    fn test_too_few_hot_numbers() {
        // 1 chaud sélectionné, 2 chauds disponibles hors grille
        let recs = run(spread_grid(), vec![1, 2, 4, 6], vec![3, 10, 25]);
        let hot = find(&recs, RecommendationKind::HotNumbers);
        assert_eq!(hot.severity, Severity::Warning);
        assert_eq!(hot.priority, 1);
        assert_eq!(hot.numbers_to_add, vec![2, 4]);
        assert_eq!(hot.numbers_to_remove, vec![3, 10]);
    }

    #[test]
    fn test_too_few_hot_removes_balanced_when_no_cold() {
        let recs = run(spread_grid(), vec![2, 4, 6], vec![]);
        let hot = find(&recs, RecommendationKind::HotNumbers);
        assert_eq!(hot.numbers_to_add, vec![2, 4, 6]);
        assert_eq!(hot.numbers_to_remove, vec![1, 3, 5]);
    }

    #[test]
    fn test_empty_baseline_warns_without_suggestion() {
        let recs = run(spread_grid(), vec![], vec![]);
        let hot = find(&recs, RecommendationKind::HotNumbers);
        assert_eq!(hot.severity, Severity::Warning);
        assert!(hot.numbers_to_add.is_empty());
        assert!(hot.numbers_to_remove.is_empty());
    }

    #[test]
    fn test_too_many_hot_numbers() {
        let recs = run(spread_grid(), vec![1, 3, 5, 8, 10, 11, 14], vec![2]);
        let hot = find(&recs, RecommendationKind::HotNumbers);
        assert_eq!(hot.severity, Severity::Warning);
        assert_eq!(hot.numbers_to_remove, vec![1, 3]);
        // 2 est froid, donc ignoré
        assert_eq!(hot.numbers_to_add, vec![4, 6]);
    }

    #[test]
    fn test_parity_balanced() {
        let recs = run(spread_grid(), vec![], vec![]);
        assert_eq!(find(&recs, RecommendationKind::Parity).severity, Severity::Success);
    }

    #[test]
    fn test_parity_too_many_odd() {
        // 13 impairs + 2 pairs
        let numbers = vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21, 23, 25, 2, 4];
        let recs = run(numbers, vec![], vec![]);
        let parity = find(&recs, RecommendationKind::Parity);
        assert_eq!(parity.severity, Severity::Warning);
        assert_eq!(parity.priority, 2);
        assert_eq!(parity.numbers_to_remove, vec![1, 3, 5, 7, 9]);
        assert_eq!(parity.numbers_to_add, vec![6, 8, 10, 12, 14]);
    }

    #[test]
    fn test_decade_concentration() {
        let recs = run((1..=15).collect(), vec![1, 2, 3], vec![20, 21, 22]);
        let decade = find(&recs, RecommendationKind::DecadeConcentration);
        assert_eq!(decade.severity, Severity::Info);
        assert_eq!(decade.priority, 3);
        assert!(!decade.actionable);
        assert!(decade.diagnosis.contains("01-10"));
        assert!(decade.diagnosis.contains("21-25"));
    }

    #[test]
    fn test_no_decade_recommendation_when_spread() {
        let recs = run(spread_grid(), vec![], vec![]);
        assert!(recs.iter().all(|r| r.kind != RecommendationKind::DecadeConcentration));
    }

    #[test]
    fn test_sorted_by_priority() {
        let numbers = vec![1, 3, 5, 7, 9, 11, 13, 15, 17, 19, 21, 23, 25, 2, 4];
        let recs = run(numbers, vec![], vec![]);
        assert!(recs.windows(2).all(|w| w[0].priority <= w[1].priority));
        assert_eq!(recs[0].kind, RecommendationKind::HotNumbers);
    }

    #[test]
    fn test_deterministic() {
        let a = run(spread_grid(), vec![2, 4], vec![3]);
        let b = run(spread_grid(), vec![2, 4], vec![3]);
        assert_eq!(a, b);
    }
}
