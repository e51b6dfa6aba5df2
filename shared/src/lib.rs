// Data models exchanged between the screening engine and its callers.
pub mod models;
pub mod utils;
