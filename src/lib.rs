pub mod analysis;
pub mod cli;
pub mod config;
pub mod errors;
pub mod llm;
pub mod models;
pub mod notify;
pub mod reports;
pub mod scanners;
pub mod utils;
