pub mod csv_parser;
pub mod market_data;

pub use csv_parser::DailyCsvParser;
pub use market_data::SeriesStore;
