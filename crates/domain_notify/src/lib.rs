//! Notification Domain
//!
//! Formats a stage-specific message and fan-out-sends it over two independent
//! transport channels. Delivery is best-effort: either channel failing is
//! logged and swallowed, and a dispatch never fails the surrounding
//! case-update operation.

pub mod notifier;
pub mod templates;
pub mod transport;

pub use notifier::Notifier;
pub use templates::{render_message, MessageContext};
pub use transport::{SmsGateway, WhatsappGateway};
