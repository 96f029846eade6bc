pub mod catalog;
pub mod collector;

pub use catalog::{KNOWN_REPORTS, category_for};
pub use collector::{collect, CollectedReports, CollectionGap};
