use serde::Serialize;
use tracing::debug;

use crate::classify::{classify, ClassificationResult};
use crate::error::ValidationError;
use crate::models::{HistoricalBaseline, LotteryConfig, Selection};
use crate::patterns::{detect_patterns, PatternSet};
use crate::recommend::{generate_recommendations, Recommendation};
use crate::score::{comparison_label, compute_score, percentage, ComparisonLabel};
use crate::settings::AnalysisSettings;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCounts {
    pub hot: usize,
    pub cold: usize,
    pub balanced: usize,
    pub hot_pct: f64,
    pub cold_pct: f64,
    pub balanced_pct: f64,
}

impl CategoryCounts {
    fn from_classification(c: &ClassificationResult) -> Self {
        let total = c.total();
        Self {
            hot: c.hot_count,
            cold: c.cold_count,
            balanced: c.balanced_count,
            hot_pct: percentage(c.hot_count, total),
            cold_pct: percentage(c.cold_count, total),
            balanced_pct: percentage(c.balanced_count, total),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecadeCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub lottery: String,
    pub numbers: Vec<u8>,
    pub score: f64,
    pub comparison: ComparisonLabel,
    pub summary: String,
    pub counts: CategoryCounts,
    pub classification: ClassificationResult,
    pub patterns: PatternSet,
    pub even_count: usize,
    pub odd_count: usize,
    pub sum: u32,
    pub decade_distribution: Vec<DecadeCount>,
    pub recommendations: Vec<Recommendation>,
}

fn summarize(score: f64, comparison: ComparisonLabel, counts: &CategoryCounts, patterns: &PatternSet) -> String {
    let mut summary = format!(
        "Score {:.1}/5 ({}) : {} chaud(s), {} froid(s), {} neutre(s)",
        score, comparison, counts.hot, counts.cold, counts.balanced
    );
    if !patterns.consecutive_runs.is_empty() {
        summary.push_str(&format!(", {} suite(s) de numéros consécutifs", patterns.consecutive_runs.len()));
    }
    summary.push('.');
    summary
}

/// Analyse complète d'une grille. Échoue seulement si la grille n'a pas été
/// validée pour `config` ou si `settings` est incohérent.
pub fn analyze(
    selection: &Selection,
    baseline: &HistoricalBaseline,
    config: &LotteryConfig,
    settings: &AnalysisSettings,
) -> Result<AnalysisResult, ValidationError> {
    config.ensure_selection(selection)?;
    settings.validate()?;

    let classification = classify(selection, baseline);
    let patterns = detect_patterns(selection, settings);
    let score = compute_score(selection, &classification, &patterns, config);
    let comparison = comparison_label(score);
    let recommendations = generate_recommendations(selection, &classification, baseline, config, settings);
    let counts = CategoryCounts::from_classification(&classification);

    let decade_distribution = config
        .decade_counts(selection.numbers())
        .into_iter()
        .enumerate()
        .map(|(d, count)| DecadeCount { label: config.decade_label(d), count })
        .collect();

    debug!(
        lottery = config.name(),
        score,
        hot = counts.hot,
        cold = counts.cold,
        runs = patterns.consecutive_runs.len(),
        recommendations = recommendations.len(),
        "grille analysée"
    );

    Ok(AnalysisResult {
        lottery: config.name().to_string(),
        numbers: selection.sorted(),
        score,
        comparison,
        summary: summarize(score, comparison, &counts, &patterns),
        counts,
        classification,
        patterns,
        even_count: selection.even_count(),
        odd_count: selection.odd_count(),
        sum: selection.sum(),
        decade_distribution,
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommend::{RecommendationKind, Severity};

    fn lotofacil() -> LotteryConfig {
        LotteryConfig::preset("lotofacil").unwrap()
    }

    #[test]
    fn test_consecutive_grid_scenario() {
        let config = lotofacil();
        let selection = Selection::new((1..=15).collect(), &config).unwrap();
        let baseline = HistoricalBaseline::new(vec![1, 2, 3], vec![20, 21, 22], &config).unwrap();

        let result = analyze(&selection, &baseline, &config, &AnalysisSettings::default()).unwrap();
        assert_eq!(result.counts.hot, 3);
        assert_eq!(result.counts.cold, 0);
        assert_eq!(result.counts.balanced, 12);
        assert_eq!(result.patterns.consecutive_runs.len(), 1);
        assert_eq!(result.patterns.consecutive_runs[0].len(), 15);
        assert_eq!(result.score, 2.1);
        assert_eq!(result.comparison, ComparisonLabel::BelowAverage);
        assert_eq!(result.patterns.multiples_of_five, vec![5, 10, 15]);
        assert_eq!(result.sum, 120);
        assert_eq!(result.decade_distribution.len(), 3);
        assert_eq!(result.decade_distribution[0].count, 10);
    }

    #[test]
    fn test_empty_baseline_scenario() {
        let config = lotofacil();
        let selection = Selection::new(vec![2, 4, 5, 7, 9, 12, 13, 14, 17, 18, 20, 22, 23, 24, 25], &config).unwrap();

        let result = analyze(&selection, &HistoricalBaseline::empty(), &config, &AnalysisSettings::default()).unwrap();
        assert_eq!(result.counts.balanced_pct, 100.0);
        assert_eq!(result.counts.hot_pct, 0.0);

        let hot = result
            .recommendations
            .iter()
            .find(|r| r.kind == RecommendationKind::HotNumbers)
            .unwrap();
        assert_eq!(hot.severity, Severity::Warning);
        assert!(hot.numbers_to_add.is_empty());
        assert!(result.score.is_finite());
    }

    #[test]
    fn test_recommendations_ordered() {
        let config = lotofacil();
        let selection = Selection::new((1..=15).collect(), &config).unwrap();
        let result = analyze(&selection, &HistoricalBaseline::empty(), &config, &AnalysisSettings::default()).unwrap();
        assert!(result.recommendations.windows(2).all(|w| w[0].priority <= w[1].priority));
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let config = lotofacil();
        let selection = Selection::new((1..=15).collect(), &config).unwrap();
        let settings = AnalysisSettings { keep_ratio_min: 0.9, keep_ratio_max: 0.1, ..Default::default() };
        assert!(matches!(
            analyze(&selection, &HistoricalBaseline::empty(), &config, &settings),
            Err(ValidationError::InvalidSettings(_))
        ));
    }

    #[test]
    fn test_summary_mentions_score() {
        let config = lotofacil();
        let selection = Selection::new((1..=15).collect(), &config).unwrap();
        let result = analyze(&selection, &HistoricalBaseline::empty(), &config, &AnalysisSettings::default()).unwrap();
        assert!(result.summary.starts_with("Score "));
        assert!(result.summary.contains("1 suite(s)"));
    }

    #[test]
    fn test_result_serializes() {
        let config = lotofacil();
        let selection = Selection::new((1..=15).collect(), &config).unwrap();
        let result = analyze(&selection, &HistoricalBaseline::empty(), &config, &AnalysisSettings::default()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["comparison"], "below average");
        assert_eq!(json["recommendations"][0]["severity"], "warning");
    }
}
