use anyhow::Result;
use async_trait::async_trait;

pub mod mock;
pub mod websocket;

pub use websocket::{WebSocketConfig, WebSocketPushTransport};

/// Factory for push connections. One connection exists at a time; the
/// controller decides when to dial again.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn connect(&self) -> Result<Box<dyn PushConnection>>;
}

/// One live push connection delivering text frames in receipt order.
#[async_trait]
pub trait PushConnection: Send {
    /// Next text frame; `None` once the transport has closed.
    async fn recv(&mut self) -> Option<String>;

    /// Close the underlying connection and release its resources.
    async fn close(&mut self);
}
