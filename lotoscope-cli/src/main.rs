mod display;
mod import;
mod logging;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::display::{
    display_analysis, display_baseline, display_import_summary, display_presets, display_variations,
};
use crate::import::import_csv;
use lotoscope_engine::analysis::analyze;
use lotoscope_engine::baseline::{compute_baseline, compute_stats};
use lotoscope_engine::models::{HistoricalBaseline, LotteryConfig, Selection};
use lotoscope_engine::settings::{load_settings, Settings};
use lotoscope_engine::variations::{generate_variations, seeded_rng, Strategy};

#[derive(Parser)]
#[command(name = "lotoscope", about = "Analyse de grilles de loterie et génération de variations")]
struct Cli {
    /// Logs détaillés (équivaut à RUST_LOG=debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GridArgs {
    /// Numéros de la grille
    #[arg(required = true, value_delimiter = ',')]
    numbers: Vec<u8>,

    /// Loterie (voir `lotoscope presets`)
    #[arg(short, long, default_value = "lotofacil")]
    lottery: String,

    /// Historique CSV (id;date;n1;...;nk) pour calculer les chauds/froids
    #[arg(long, conflicts_with_all = ["hot", "cold"])]
    history: Option<PathBuf>,

    /// Numéros chauds explicites
    #[arg(long, value_delimiter = ',')]
    hot: Vec<u8>,

    /// Numéros froids explicites
    #[arg(long, value_delimiter = ',')]
    cold: Vec<u8>,

    /// Fenêtre d'analyse de l'historique (nombre de tirages)
    #[arg(short, long)]
    window: Option<usize>,

    /// Fichier de paramètres JSON
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Sortie JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Lister les loteries connues
    Presets,

    /// Calculer les numéros chauds et froids depuis un historique
    Baseline {
        /// Historique CSV (id;date;n1;...;nk)
        #[arg(long)]
        history: PathBuf,

        #[arg(short, long, default_value = "lotofacil")]
        lottery: String,

        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long)]
        window: Option<usize>,

        #[arg(short, long)]
        settings: Option<PathBuf>,
    },

    /// Analyser une grille
    Analyze {
        #[command(flatten)]
        grid: GridArgs,
    },

    /// Générer les 5 variations d'une grille
    Variations {
        #[command(flatten)]
        grid: GridArgs,

        /// Seed pour la reproductibilité (défaut: date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Command::Presets => {
            display_presets(&LotteryConfig::presets());
            Ok(())
        }
        Command::Baseline { history, lottery, window, settings } => {
            cmd_baseline(&history, &lottery, window, settings.as_ref())
        }
        Command::Analyze { grid } => cmd_analyze(&grid),
        Command::Variations { grid, seed } => cmd_variations(&grid, seed),
    }
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64
}

fn load_or_default(path: Option<&PathBuf>) -> Result<Settings> {
    match path {
        Some(p) => load_settings(p).with_context(|| format!("Impossible de charger les paramètres {:?}", p)),
        None => Ok(Settings::default()),
    }
}

fn cmd_baseline(history: &Path, lottery: &str, window: Option<usize>, settings: Option<&PathBuf>) -> Result<()> {
    let config = LotteryConfig::preset(lottery)?;
    let mut settings = load_or_default(settings)?;
    if let Some(w) = window {
        settings.baseline.window = w;
    }

    let imported = import_csv(history, &config)?;
    display_import_summary(&imported);
    if imported.draws.is_empty() {
        bail!("Aucun tirage valide dans {:?}", history);
    }

    let effective_window = settings.baseline.window.min(imported.draws.len());
    let baseline = compute_baseline(&imported.draws, &config, &settings.baseline);
    let stats = compute_stats(&imported.draws[..effective_window], &config);
    display_baseline(&stats, &baseline, effective_window);
    Ok(())
}

/// Prépare configuration, grille, référence et paramètres depuis les arguments.
fn prepare(grid: &GridArgs) -> Result<(LotteryConfig, Selection, HistoricalBaseline, Settings)> {
    let config = LotteryConfig::preset(&grid.lottery)?;
    let mut settings = load_or_default(grid.settings.as_ref())?;
    if let Some(w) = grid.window {
        settings.baseline.window = w;
    }

    let selection = Selection::new(grid.numbers.clone(), &config)
        .with_context(|| format!("Grille invalide pour {}", config))?;

    let baseline = match &grid.history {
        Some(path) => {
            let imported = import_csv(path, &config)?;
            info!(draws = imported.draws.len(), errors = imported.errors, "historique chargé");
            compute_baseline(&imported.draws, &config, &settings.baseline)
        }
        None => HistoricalBaseline::new(grid.hot.clone(), grid.cold.clone(), &config)
            .context("Référence chauds/froids invalide")?,
    };
    if baseline.is_empty() {
        warn!("référence historique vide, tous les numéros seront neutres");
    }

    Ok((config, selection, baseline, settings))
}

fn cmd_analyze(grid: &GridArgs) -> Result<()> {
    let (config, selection, baseline, settings) = prepare(grid)?;
    let result = analyze(&selection, &baseline, &config, &settings.analysis)?;

    if grid.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_analysis(&result, &baseline);
    }
    Ok(())
}

fn cmd_variations(grid: &GridArgs, seed: Option<u64>) -> Result<()> {
    let (config, selection, baseline, settings) = prepare(grid)?;

    let effective_seed = seed.unwrap_or_else(|| {
        let ds = date_seed();
        if !grid.json {
            println!("(Seed du jour : {ds})");
        }
        ds
    });
    let mut rng = seeded_rng(Some(effective_seed));

    let variations = generate_variations(
        &selection,
        &baseline,
        &config,
        &settings.analysis,
        &Strategy::ALL,
        &mut rng,
    )?;

    if grid.json {
        println!("{}", serde_json::to_string_pretty(&variations)?);
    } else {
        display_variations(&variations);
    }
    Ok(())
}
