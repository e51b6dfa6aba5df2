pub mod screening_service;

pub use screening_service::ScreeningEngine;
