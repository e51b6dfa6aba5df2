// Engine configuration
pub mod settings;

pub use settings::{DataSettings, EngineSettings, IndicatorSettings, ScreenerSettings};
