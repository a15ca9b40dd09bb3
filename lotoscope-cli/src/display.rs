use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use crate::import::ImportResult;
use lotoscope_engine::analysis::AnalysisResult;
use lotoscope_engine::classify::{tag_number, NumberTag};
use lotoscope_engine::models::{HistoricalBaseline, LotteryConfig, NumberStats};
use lotoscope_engine::recommend::Severity;
use lotoscope_engine::score::comparison_label;
use lotoscope_engine::variations::Variation;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn format_numbers(numbers: &[u8]) -> String {
    if numbers.is_empty() {
        return "—".to_string();
    }
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn tag_color(tag: NumberTag) -> Color {
    match tag {
        NumberTag::Hot => Color::Green,
        NumberTag::Cold => Color::Red,
        NumberTag::Balanced => Color::White,
    }
}

pub fn display_presets(configs: &[LotteryConfig]) {
    let mut table = new_table(vec!["Loterie", "Plage", "Numéros à cocher"]);
    for config in configs {
        table.add_row(vec![
            config.name().to_string(),
            format!("{}-{}", config.min_number(), config.max_number()),
            config.numbers_to_select().to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Historique chargé :");
    println!("  Lignes lues : {}", result.total_records);
    println!("  Tirages     : {}", result.draws.len());
    if result.errors > 0 {
        println!("  Erreurs     : {}", result.errors);
    }
}

pub fn display_baseline(stats: &[NumberStats], baseline: &HistoricalBaseline, window: usize) {
    println!("\n📊 Référence sur les {} derniers tirages\n", window);

    let mut table = new_table(vec!["Numéro", "Fréquence", "Retard", "Tag"]);
    let mut sorted = stats.to_vec();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency).then(a.number.cmp(&b.number)));

    for stat in &sorted {
        let tag = tag_number(stat.number, baseline);
        table.add_row(vec![
            Cell::new(format!("{:2}", stat.number)),
            Cell::new(stat.frequency),
            Cell::new(stat.gap),
            Cell::new(tag.to_string()).fg(tag_color(tag)),
        ]);
    }
    println!("{table}");

    println!("Chauds : {}", format_numbers(baseline.hot_numbers()));
    println!("Froids : {}", format_numbers(baseline.cold_numbers()));
}

pub fn display_analysis(result: &AnalysisResult, baseline: &HistoricalBaseline) {
    println!("\n🎯 Analyse de la grille ({})\n", result.lottery);
    println!("  {}", result.summary);
    println!(
        "  Pairs/impairs : {}/{}    Somme : {}",
        result.even_count, result.odd_count, result.sum
    );

    let mut table = new_table(vec!["Catégorie", "Nombre", "%", "Numéros"]);
    let c = &result.classification;
    for (label, count, pct, numbers, color) in [
        ("Chauds", result.counts.hot, result.counts.hot_pct, &c.hot_numbers, Color::Green),
        ("Froids", result.counts.cold, result.counts.cold_pct, &c.cold_numbers, Color::Red),
        ("Neutres", result.counts.balanced, result.counts.balanced_pct, &c.balanced_numbers, Color::White),
    ] {
        table.add_row(vec![
            Cell::new(label).fg(color),
            Cell::new(count),
            Cell::new(format!("{:.1}", pct)),
            Cell::new(format_numbers(numbers)),
        ]);
    }
    println!("{table}");

    let mut table = new_table(vec!["Dizaine", "Numéros"]);
    for decade in &result.decade_distribution {
        table.add_row(vec![decade.label.clone(), decade.count.to_string()]);
    }
    println!("{table}");

    if !result.patterns.consecutive_runs.is_empty() {
        println!("Suites consécutives :");
        for run in &result.patterns.consecutive_runs {
            println!("  {} ({} numéros)", format_numbers(run), run.len());
        }
    }
    println!("Multiples de 5 : {}", format_numbers(&result.patterns.multiples_of_five));

    if baseline.is_empty() {
        println!("(Référence historique vide : tous les numéros sont neutres)");
    }

    println!("\n💡 Recommandations\n");
    let mut table = new_table(vec!["#", "Niveau", "Constat", "Conseil", "Ajouter", "Retirer"]);
    for rec in &result.recommendations {
        let color = match rec.severity {
            Severity::Success => Color::Green,
            Severity::Warning => Color::Yellow,
            Severity::Info => Color::Cyan,
        };
        table.add_row(vec![
            Cell::new(rec.priority),
            Cell::new(rec.severity.to_string()).fg(color),
            Cell::new(format!("{}\n{}", rec.title, rec.diagnosis)),
            Cell::new(&rec.recommendation),
            Cell::new(format_numbers(&rec.numbers_to_add)),
            Cell::new(format_numbers(&rec.numbers_to_remove)),
        ]);
    }
    println!("{table}");
}

pub fn display_variations(variations: &[Variation]) {
    println!("\n🎲 Variations\n");

    let mut table = new_table(vec!["Stratégie", "Numéros", "Score", "C/F/N", "Ajoutés", "Retirés"]);
    for v in variations {
        table.add_row(vec![
            Cell::new(format!("{}\n{}", v.strategy, v.strategy.description())),
            Cell::new(format_numbers(v.numbers.numbers())),
            Cell::new(format!("{:.1} ({})", v.score, comparison_label(v.score))),
            Cell::new(format!(
                "{}/{}/{}",
                v.classification.hot_count, v.classification.cold_count, v.classification.balanced_count
            )),
            Cell::new(format_numbers(&v.diff.added)),
            Cell::new(format_numbers(&v.diff.removed)),
        ]);
    }
    println!("{table}");
}
