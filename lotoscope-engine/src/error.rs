use thiserror::Error;

/// Violations des préconditions du moteur. Tout appelant doit valider ses
/// entrées via les constructeurs de `models` avant d'invoquer l'analyse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Plage invalide : min {min} > max {max}")]
    InvalidRange { min: u8, max: u8 },

    #[error("Nombre de numéros à cocher invalide : {pick} (plage de {range_size} numéros)")]
    InvalidPickCount { pick: usize, range_size: usize },

    #[error("Grille de {actual} numéros, {expected} attendus")]
    WrongLength { expected: usize, actual: usize },

    #[error("Numéro {number} hors limites ({min}-{max})")]
    OutOfRange { number: u8, min: u8, max: u8 },

    #[error("Numéro en double : {0}")]
    Duplicate(u8),

    #[error("Le numéro {0} est à la fois chaud et froid")]
    OverlappingBaseline(u8),

    #[error("Numéro {number} de la référence historique hors limites ({min}-{max})")]
    BaselineOutOfRange { number: u8, min: u8, max: u8 },

    #[error("Grille validée pour « {selection} », configuration « {config} » reçue")]
    ConfigMismatch { selection: String, config: String },

    #[error("Paramètres invalides : {0}")]
    InvalidSettings(String),

    #[error("Loterie inconnue : {0}")]
    UnknownLottery(String),
}
