use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::warn;

use lotoscope_engine::models::{Draw, LotteryConfig};

fn parse_record(record: &csv::StringRecord, config: &LotteryConfig) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let draw_id = get(0)?;
    let date = parse_date(&get(1)?)?;

    let pick = config.numbers_to_select();
    let numbers = (2..2 + pick)
        .map(|idx| {
            let s = get(idx)?;
            s.parse::<u8>()
                .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
        })
        .collect::<Result<Vec<u8>>>()?;

    let draw = Draw { draw_id, date, numbers };
    draw.validate(config)
        .with_context(|| format!("Tirage {} invalide", draw.draw_id))?;
    Ok(draw)
}

/// JJ/MM/AAAA → AAAA-MM-JJ ; une date déjà ISO est conservée.
pub fn parse_date(raw: &str) -> Result<String> {
    for format in ["%d/%m/%Y", "%Y-%m-%d"] {
        if let Ok(date) = chrono::NaiveDate::parse_from_str(raw.trim(), format) {
            return Ok(date.format("%Y-%m-%d").to_string());
        }
    }
    bail!("Format de date invalide: '{}'", raw)
}

pub struct ImportResult {
    pub draws: Vec<Draw>,
    pub total_records: u32,
    pub errors: u32,
}

/// Lit un historique `id;date;n1;...;nk`. Les tirages sont renvoyés du plus
/// récent au plus ancien ; les lignes invalides sont comptées et ignorées.
pub fn import_csv(path: &Path, config: &LotteryConfig) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let mut result = ImportResult {
        draws: Vec::new(),
        total_records: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record, config) {
                Ok(draw) => result.draws.push(draw),
                Err(e) => {
                    warn!(line = result.total_records, "Erreur parsing : {:#}", e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                warn!(line = result.total_records, "Erreur lecture : {}", e);
                result.errors += 1;
            }
        }
    }

    result
        .draws
        .sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.draw_id.cmp(&a.draw_id)));
    Ok(result)
}
