use tracing::debug;

use crate::models::{Draw, HistoricalBaseline, LotteryConfig, NumberStats};
use crate::settings::BaselineSettings;

/// Fréquence et retard de chaque numéro de la plage. `draws[0]` = tirage le plus récent.
pub fn compute_stats(draws: &[Draw], config: &LotteryConfig) -> Vec<NumberStats> {
    let mut stats: Vec<NumberStats> = config
        .range()
        .map(|n| NumberStats {
            number: n,
            frequency: 0,
            gap: 0,
        })
        .collect();
    let mut seen = vec![false; stats.len()];

    for (i, draw) in draws.iter().enumerate() {
        for &n in &draw.numbers {
            if !config.contains(n) {
                continue;
            }
            let idx = (n - config.min_number()) as usize;
            stats[idx].frequency += 1;
            if !seen[idx] {
                stats[idx].gap = i as u32;
                seen[idx] = true;
            }
        }
    }

    for (stat, &was_seen) in stats.iter_mut().zip(&seen) {
        if !was_seen {
            stat.gap = draws.len() as u32;
        }
    }

    stats
}

/// Dérive les numéros chauds et froids sur les `settings.window` derniers tirages.
/// Sans historique, la référence est vide.
pub fn compute_baseline(draws: &[Draw], config: &LotteryConfig, settings: &BaselineSettings) -> HistoricalBaseline {
    let window = settings.window.min(draws.len());
    if window == 0 {
        return HistoricalBaseline::empty();
    }

    let stats = compute_stats(&draws[..window], config);
    let expected = window as f64 * config.numbers_to_select() as f64 / config.range_size() as f64;
    let threshold = settings.deviation_threshold.max(0.0);

    let mut hot: Vec<&NumberStats> = stats
        .iter()
        .filter(|s| s.frequency as f64 > expected * (1.0 + threshold))
        .collect();
    let mut cold: Vec<&NumberStats> = stats
        .iter()
        .filter(|s| (s.frequency as f64) < expected * (1.0 - threshold))
        .collect();

    hot.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));
    cold.sort_by(|a, b| a.frequency.cmp(&b.frequency).then(a.number.cmp(&b.number)));

    debug!(
        window,
        expected,
        hot = hot.len(),
        cold = cold.len(),
        "référence historique calculée"
    );

    HistoricalBaseline::from_sorted(
        hot.iter().map(|s| s.number).collect(),
        cold.iter().map(|s| s.number).collect(),
    )
}
