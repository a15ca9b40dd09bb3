use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::debug;

use crate::classify::{classify, ClassificationResult};
use crate::error::ValidationError;
use crate::models::{HistoricalBaseline, LotteryConfig, Selection};
use crate::patterns::detect_patterns;
use crate::score::compute_score;
use crate::settings::AnalysisSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    Balanced,
    HotFocused,
    ColdFocused,
    ParityOptimized,
    DecadeOptimized,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::Balanced,
        Strategy::HotFocused,
        Strategy::ColdFocused,
        Strategy::ParityOptimized,
        Strategy::DecadeOptimized,
    ];

    pub fn description(&self) -> &'static str {
        match self {
            Strategy::Balanced => "Mélange équilibré chauds / froids / neutres",
            Strategy::HotFocused => "Priorité aux numéros chauds",
            Strategy::ColdFocused => "Priorité aux numéros froids",
            Strategy::ParityOptimized => "Rééquilibrage pair / impair",
            Strategy::DecadeOptimized => "Meilleure couverture des dizaines",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Balanced => write!(f, "balanced"),
            Strategy::HotFocused => write!(f, "hot-focused"),
            Strategy::ColdFocused => write!(f, "cold-focused"),
            Strategy::ParityOptimized => write!(f, "parity-optimized"),
            Strategy::DecadeOptimized => write!(f, "decade-optimized"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionDiff {
    pub added: Vec<u8>,
    pub removed: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variation {
    pub numbers: Selection,
    pub strategy: Strategy,
    pub score: f64,
    pub classification: ClassificationResult,
    pub diff: SelectionDiff,
}

/// Générateur seedé ; sans seed, initialisé depuis l'entropie du système.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// Candidats restants pour compléter une variation. Les numéros absents de la
/// grille d'origine passent avant ceux qu'on vient d'en retirer.
struct CandidatePool {
    taken: BTreeSet<u8>,
    fresh: Vec<u8>,
    recycled: Vec<u8>,
    additions: Vec<u8>,
}

impl CandidatePool {
    fn new(original: &Selection, retained: &[u8], config: &LotteryConfig) -> Self {
        let fresh = config.range().filter(|&n| !original.contains(n)).collect();
        let recycled = original.sorted().into_iter().filter(|n| !retained.contains(n)).collect();
        Self {
            taken: retained.iter().copied().collect(),
            fresh,
            recycled,
            additions: Vec::new(),
        }
    }

    /// Tire sans remise jusqu'à `count` numéros de `fresh` acceptés par `filter`.
    /// Retourne le nombre effectivement tiré.
    fn draw<R: Rng>(&mut self, filter: impl Fn(u8) -> bool, count: usize, rng: &mut R) -> usize {
        if count == 0 {
            return 0;
        }
        let mut candidates: Vec<u8> = self
            .fresh
            .iter()
            .copied()
            .filter(|n| !self.taken.contains(n) && filter(*n))
            .collect();
        candidates.shuffle(rng);
        candidates.truncate(count);

        for &n in &candidates {
            self.taken.insert(n);
            self.additions.push(n);
        }
        candidates.len()
    }

    /// Complète jusqu'à `target` ajouts depuis le pool le plus large.
    fn fill<R: Rng>(&mut self, target: usize, rng: &mut R) {
        let missing = target.saturating_sub(self.additions.len());
        let drawn = self.draw(|_| true, missing, rng);
        if drawn == missing {
            return;
        }

        debug!(missing = missing - drawn, "pool principal épuisé, reprise de numéros retirés");
        let mut recycled: Vec<u8> = self
            .recycled
            .iter()
            .copied()
            .filter(|n| !self.taken.contains(n))
            .collect();
        recycled.shuffle(rng);
        for n in recycled.into_iter().take(missing - drawn) {
            self.taken.insert(n);
            self.additions.push(n);
        }
    }
}

/// Découpe `total` en trois parts quasi égales (les premières reçoivent le reste).
fn split_three(total: usize) -> [usize; 3] {
    let base = total / 3;
    let rem = total % 3;
    [base + usize::from(rem > 0), base + usize::from(rem > 1), base]
}

fn fill_balanced<R: Rng>(pool: &mut CandidatePool, baseline: &HistoricalBaseline, change: usize, rng: &mut R) {
    let [hot_slots, cold_slots, neutral_slots] = split_three(change);
    let hot = pool.draw(|n| baseline.is_hot(n), hot_slots, rng);
    let cold = pool.draw(|n| baseline.is_cold(n), cold_slots, rng);
    let neutral = neutral_slots + (hot_slots - hot) + (cold_slots - cold);
    pool.draw(|n| !baseline.is_hot(n) && !baseline.is_cold(n), neutral, rng);
}

fn fill_parity<R: Rng>(pool: &mut CandidatePool, retained: &[u8], config: &LotteryConfig, change: usize, rng: &mut R) {
    let ideal_even = config.numbers_to_select() / 2;
    let retained_even = retained.iter().filter(|&&n| n % 2 == 0).count();
    let even_slots = ideal_even.saturating_sub(retained_even).min(change);
    let odd_slots = change - even_slots;

    pool.draw(|n| n % 2 == 0, even_slots, rng);
    pool.draw(|n| n % 2 == 1, odd_slots, rng);
}

fn fill_decades<R: Rng>(pool: &mut CandidatePool, retained: &[u8], config: &LotteryConfig, change: usize, rng: &mut R) {
    let mut counts = config.decade_counts(retained);
    let fair_share = config.numbers_to_select() as f64 / counts.len() as f64;
    let mut exhausted = vec![false; counts.len()];

    while pool.additions.len() < change {
        // Dizaine la plus en retard sur sa part équitable, la plus basse à égalité.
        let target = counts
            .iter()
            .enumerate()
            .filter(|&(d, &c)| !exhausted[d] && (c as f64) < fair_share)
            .fold(None, |best: Option<(usize, f64)>, (d, &c)| {
                let deficit = fair_share - c as f64;
                match best {
                    Some((_, best_deficit)) if best_deficit >= deficit => best,
                    _ => Some((d, deficit)),
                }
            });

        let Some((decade, _)) = target else { break };
        if pool.draw(|n| config.decade_of(n) == decade, 1, rng) == 0 {
            exhausted[decade] = true;
        } else {
            counts[decade] += 1;
        }
    }
}

fn generate_variation<R: Rng>(
    original: &Selection,
    baseline: &HistoricalBaseline,
    config: &LotteryConfig,
    settings: &AnalysisSettings,
    strategy: Strategy,
    rng: &mut R,
) -> Result<Variation, ValidationError> {
    let n = config.numbers_to_select();
    let ratio = rng.random_range(settings.keep_ratio_min..=settings.keep_ratio_max);
    let keep = ((n as f64 * ratio).floor() as usize).min(n);
    let change = n - keep;

    let mut shuffled = original.numbers().to_vec();
    shuffled.shuffle(rng);
    let retained = shuffled[..keep].to_vec();

    let mut pool = CandidatePool::new(original, &retained, config);
    match strategy {
        Strategy::Balanced => fill_balanced(&mut pool, baseline, change, rng),
        Strategy::HotFocused => {
            pool.draw(|n| baseline.is_hot(n), change, rng);
        }
        Strategy::ColdFocused => {
            pool.draw(|n| baseline.is_cold(n), change, rng);
        }
        Strategy::ParityOptimized => fill_parity(&mut pool, &retained, config, change, rng),
        Strategy::DecadeOptimized => fill_decades(&mut pool, &retained, config, change, rng),
    }
    let preferred = pool.additions.len();
    pool.fill(change, rng);

    debug!(
        strategy = %strategy,
        ratio,
        keep,
        change,
        fallback = change - preferred,
        "variation générée"
    );

    let mut numbers = retained;
    numbers.extend(pool.additions);
    numbers.sort_unstable();
    let numbers = Selection::new(numbers, config)?;

    let classification = classify(&numbers, baseline);
    let patterns = detect_patterns(&numbers, settings);
    let score = compute_score(&numbers, &classification, &patterns, config);

    let diff = SelectionDiff {
        added: numbers.sorted().into_iter().filter(|&x| !original.contains(x)).collect(),
        removed: original.sorted().into_iter().filter(|&x| !numbers.contains(x)).collect(),
    };

    Ok(Variation {
        numbers,
        strategy,
        score,
        classification,
        diff,
    })
}

/// Une variation par stratégie, dans l'ordre demandé. Le tirage aléatoire
/// passe uniquement par `rng` : même seed, mêmes variations.
pub fn generate_variations<R: Rng>(
    original: &Selection,
    baseline: &HistoricalBaseline,
    config: &LotteryConfig,
    settings: &AnalysisSettings,
    strategies: &[Strategy],
    rng: &mut R,
) -> Result<Vec<Variation>, ValidationError> {
    config.ensure_selection(original)?;
    settings.validate()?;

    strategies
        .iter()
        .map(|&strategy| generate_variation(original, baseline, config, settings, strategy, rng))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lotofacil() -> LotteryConfig {
        LotteryConfig::preset("lotofacil").unwrap()
    }

    fn setup() -> (LotteryConfig, Selection, HistoricalBaseline) {
        let config = lotofacil();
        let selection = Selection::new((1..=15).collect(), &config).unwrap();
        let baseline = HistoricalBaseline::new(vec![1, 2, 3, 16, 17], vec![20, 21, 22], &config).unwrap();
        (config, selection, baseline)
    }

    fn generate(seed: u64) -> Vec<Variation> {
        let (config, selection, baseline) = setup();
        let mut rng = StdRng::seed_from_u64(seed);
        generate_variations(&selection, &baseline, &config, &AnalysisSettings::default(), &Strategy::ALL, &mut rng).unwrap()
    }

    fn assert_invariants(variation: &Variation, original: &Selection, config: &LotteryConfig) {
        let numbers = variation.numbers.numbers();
        let n = config.numbers_to_select();
        assert_eq!(numbers.len(), n, "{}: taille", variation.strategy);
        assert!(numbers.windows(2).all(|w| w[0] < w[1]), "{}: trié et unique", variation.strategy);
        assert!(numbers.iter().all(|&x| config.contains(x)));

        let kept = numbers.iter().filter(|&&x| original.contains(x)).count();
        let low = (n as f64 * 0.6).floor() as usize;
        let high = (n as f64 * 0.7).floor() as usize;
        assert!(kept >= low && kept <= high, "{}: {} conservés", variation.strategy, kept);

        let diff = &variation.diff;
        assert!(diff.added.iter().all(|x| !diff.removed.contains(x)));
        assert!(diff.added.iter().all(|&x| variation.numbers.contains(x)));
        assert!(diff.removed.iter().all(|&x| original.contains(x)));
        assert_eq!(diff.added.len(), diff.removed.len());
    }

    #[test]
    fn test_split_three() {
        assert_eq!(split_three(6), [2, 2, 2]);
        assert_eq!(split_three(5), [2, 2, 1]);
        assert_eq!(split_three(4), [2, 1, 1]);
        assert_eq!(split_three(0), [0, 0, 0]);
    }

    #[test]
    fn test_one_variation_per_strategy() {
        let variations = generate(42);
        assert_eq!(variations.len(), 5);
        for (v, s) in variations.iter().zip(Strategy::ALL) {
            assert_eq!(v.strategy, s);
        }
    }

    #[test]
    fn test_invariants_many_seeds() {
        let (config, selection, _) = setup();
        for seed in 0..50 {
            for variation in generate(seed) {
                assert_invariants(&variation, &selection, &config);
            }
        }
    }

    #[test]
    fn test_seed_determinism() {
        assert_eq!(generate(123), generate(123));
    }

    #[test]
    fn test_rescoring_reproduces_score() {
        let (config, _, baseline) = setup();
        let settings = AnalysisSettings::default();
        for variation in generate(7) {
            let classification = classify(&variation.numbers, &baseline);
            let patterns = detect_patterns(&variation.numbers, &settings);
            let score = compute_score(&variation.numbers, &classification, &patterns, &config);
            assert_eq!(score, variation.score);
            assert_eq!(classification, variation.classification);
        }
    }

    #[test]
    fn test_hot_focused_takes_available_hot() {
        // Hors grille, seuls 16 et 17 sont chauds : ils doivent être ajoutés.
        for seed in 0..20 {
            let variations = generate(seed);
            let hot = variations.iter().find(|v| v.strategy == Strategy::HotFocused).unwrap();
            assert!(hot.diff.added.contains(&16) && hot.diff.added.contains(&17), "seed {}", seed);
        }
    }

    #[test]
    fn test_cold_focused_takes_available_cold() {
        for seed in 0..20 {
            let variations = generate(seed);
            let cold = variations.iter().find(|v| v.strategy == Strategy::ColdFocused).unwrap();
            for c in [20, 21, 22] {
                assert!(cold.diff.added.contains(&c), "seed {}", seed);
            }
        }
    }

    #[test]
    fn test_parity_optimized_reaches_ideal_when_possible() {
        let config = LotteryConfig::preset("megasena").unwrap();
        let selection = Selection::new(vec![1, 3, 5, 7, 9, 11], &config).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let variations = generate_variations(
            &selection,
            &HistoricalBaseline::empty(),
            &config,
            &AnalysisSettings::default(),
            &[Strategy::ParityOptimized],
            &mut rng,
        )
        .unwrap();
        // 3 ou 4 impairs conservés, 2 ou 3 places libres, toutes paires.
        let even = variations[0].numbers.even_count();
        assert!(even >= 2, "pairs = {}", even);
        assert!(variations[0].diff.added.iter().all(|n| n % 2 == 0));
    }

    #[test]
    fn test_decade_optimized_fills_empty_decades() {
        for seed in 0..20 {
            let variations = generate(seed);
            let decade = variations.iter().find(|v| v.strategy == Strategy::DecadeOptimized).unwrap();
            // La grille 1-15 laisse 21-25 vide : la stratégie doit y placer des numéros.
            assert!(decade.numbers.numbers().iter().any(|&n| n >= 21), "seed {}", seed);
        }
    }

    #[test]
    fn test_empty_baseline_still_completes() {
        let (config, selection, _) = setup();
        let mut rng = StdRng::seed_from_u64(1);
        let variations = generate_variations(
            &selection,
            &HistoricalBaseline::empty(),
            &config,
            &AnalysisSettings::default(),
            &Strategy::ALL,
            &mut rng,
        )
        .unwrap();
        for v in &variations {
            assert_invariants(v, &selection, &config);
            assert_eq!(v.classification.balanced_count, 15);
        }
    }

    #[test]
    fn test_crowded_range_recycles_removed_numbers() {
        // 8 numéros parmi 10 : seuls 2 numéros frais pour 3 ou 4 places.
        let config = LotteryConfig::new("mini", 1, 10, 8).unwrap();
        let selection = Selection::new((1..=8).collect(), &config).unwrap();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let variations = generate_variations(
                &selection,
                &HistoricalBaseline::empty(),
                &config,
                &AnalysisSettings::default(),
                &Strategy::ALL,
                &mut rng,
            )
            .unwrap();
            for v in &variations {
                assert_eq!(v.numbers.len(), 8);
                assert!(v.numbers.numbers().windows(2).all(|w| w[0] < w[1]));
                assert!(v.diff.added.contains(&9) && v.diff.added.contains(&10));
            }
        }
    }

    #[test]
    fn test_unseeded_rng_respects_invariants() {
        let (config, selection, baseline) = setup();
        let mut rng = seeded_rng(None);
        let variations =
            generate_variations(&selection, &baseline, &config, &AnalysisSettings::default(), &Strategy::ALL, &mut rng)
                .unwrap();
        for v in &variations {
            assert_invariants(v, &selection, &config);
        }
    }

    #[test]
    fn test_rejects_selection_from_other_lottery() {
        let quina = LotteryConfig::preset("quina").unwrap();
        let selection = Selection::new(vec![1, 2, 3, 4, 5], &quina).unwrap();
        let euro = LotteryConfig::preset("euromillions").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        let result = generate_variations(
            &selection,
            &HistoricalBaseline::empty(),
            &euro,
            &AnalysisSettings::default(),
            &Strategy::ALL,
            &mut rng,
        );
        assert!(matches!(result, Err(ValidationError::ConfigMismatch { .. })));
    }

    #[test]
    fn test_variation_json_shape() {
        let variations = generate(7);
        let json = serde_json::to_value(&variations[1]).unwrap();
        assert_eq!(json["strategy"], "hot-focused");
        assert_eq!(json["numbers"].as_array().unwrap().len(), 15);
        assert!(json["diff"]["added"].is_array());
    }
}
