// Engine library root: indicator computation, screening and data loading

pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod report;
pub mod screener;
pub mod services;

pub use error::{EngineError, Result};
