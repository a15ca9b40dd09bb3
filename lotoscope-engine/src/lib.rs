pub mod analysis;
pub mod baseline;
pub mod classify;
pub mod error;
pub mod models;
pub mod patterns;
pub mod recommend;
pub mod score;
pub mod settings;
pub mod variations;

pub use analysis::{analyze, AnalysisResult};
pub use error::ValidationError;
pub use models::{Draw, HistoricalBaseline, LotteryConfig, Selection};
pub use settings::{AnalysisSettings, BaselineSettings, Settings};
pub use variations::{generate_variations, Strategy, Variation};
