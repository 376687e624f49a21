//! Transport channel ports
//!
//! Two independent message channels. The protocols behind them (aggregator
//! APIs, session handling, retries) belong to the adapters; the core only
//! needs fire-and-forget sends that may fail independently.

use async_trait::async_trait;

use core_kernel::{DomainPort, PortError};

/// SMS delivery channel
#[async_trait]
pub trait SmsGateway: DomainPort {
    async fn send(&self, to: &[String], message: &str) -> Result<(), PortError>;
}

/// WhatsApp delivery channel
#[async_trait]
pub trait WhatsappGateway: DomainPort {
    async fn send(&self, to: &[String], message: &str) -> Result<(), PortError>;
}
