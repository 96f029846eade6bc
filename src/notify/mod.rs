pub mod payload;
pub mod webhook;

pub use payload::{NotificationPayload, Presentation, presentation_for};
pub use webhook::{DeliveryOutcome, Notifier};
