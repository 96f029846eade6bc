pub mod catalog;
pub mod runner;

pub use catalog::{ScannerSpec, default_scanners};
pub use runner::{ScanOutcome, ScannerRunner};
