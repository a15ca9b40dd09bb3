use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Seuils de l'analyse. Les valeurs par défaut sont calibrées pour une grille
/// de 15 numéros (Lotofácil) ; les autres jeux doivent fournir les leurs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub hot_target_min: usize,
    pub hot_target_max: usize,
    pub decade_spread_threshold: usize,
    pub keep_ratio_min: f64,
    pub keep_ratio_max: f64,
    pub min_run_length: usize,
    pub multiple_divisor: u8,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            hot_target_min: 3,
            hot_target_max: 5,
            decade_spread_threshold: 4,
            keep_ratio_min: 0.6,
            keep_ratio_max: 0.7,
            min_run_length: 3,
            multiple_divisor: 5,
        }
    }
}

impl AnalysisSettings {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.hot_target_min > self.hot_target_max {
            return Err(ValidationError::InvalidSettings(format!(
                "fenêtre de numéros chauds inversée ({} > {})",
                self.hot_target_min, self.hot_target_max
            )));
        }
        let ratio_ok = |r: f64| r.is_finite() && (0.0..=1.0).contains(&r);
        if !ratio_ok(self.keep_ratio_min) || !ratio_ok(self.keep_ratio_max) || self.keep_ratio_min > self.keep_ratio_max {
            return Err(ValidationError::InvalidSettings(format!(
                "ratio de conservation invalide [{}, {}]",
                self.keep_ratio_min, self.keep_ratio_max
            )));
        }
        if self.min_run_length < 2 {
            return Err(ValidationError::InvalidSettings(
                "une suite doit compter au moins 2 numéros".to_string(),
            ));
        }
        if self.multiple_divisor == 0 {
            return Err(ValidationError::InvalidSettings("diviseur nul".to_string()));
        }
        Ok(())
    }
}

/// Paramètres de dérivation chaud/froid depuis l'historique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BaselineSettings {
    pub window: usize,
    pub deviation_threshold: f64,
}

impl Default for BaselineSettings {
    fn default() -> Self {
        Self {
            window: 120,
            deviation_threshold: 0.15,
        }
    }
}

/// Fichier de paramètres complet, chaque section étant optionnelle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub analysis: AnalysisSettings,
    pub baseline: BaselineSettings,
}

pub fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    let json = std::fs::read_to_string(path)?;
    let settings: Settings = serde_json::from_str(&json)?;
    settings.analysis.validate()?;
    Ok(settings)
}

pub fn save_settings(settings: &Settings, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(settings)?;
    std::fs::write(path, json)?;
    Ok(())
}
