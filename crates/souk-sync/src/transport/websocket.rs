use anyhow::Result;
use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use url::Url;

use super::{PushConnection, PushTransport};

/// Configuration for the push WebSocket
#[derive(Debug, Clone)]
pub struct WebSocketConfig {
    /// The WebSocket URL or bare host:port.
    pub url: String,
}

impl WebSocketConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// Build the full connection URL.
    pub fn build_url(&self) -> String {
        let mut url = self.url.clone();

        if !url.starts_with("ws://") && !url.starts_with("wss://") {
            url = format!("ws://{url}");
        }

        // Normalize localhost to avoid IPv6 issues
        if url.contains("localhost") {
            url = url.replace("localhost", "127.0.0.1");
        }

        url
    }
}

/// WebSocket implementation of the push transport.
pub struct WebSocketPushTransport {
    config: WebSocketConfig,
}

impl WebSocketPushTransport {
    pub fn new(config: WebSocketConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PushTransport for WebSocketPushTransport {
    async fn connect(&self) -> Result<Box<dyn PushConnection>> {
        let url = Url::parse(&self.config.build_url())?;
        let (ws_stream, _) = connect_async(url.as_str()).await?;

        let (tx_in, rx_in) = mpsc::unbounded_channel::<String>();

        // Pump frames into the channel until the peer closes or errors; the
        // receiver observing a closed channel is the close signal.
        let pump = tokio::spawn(async move {
            let mut stream = ws_stream;
            while let Some(message) = stream.next().await {
                match message {
                    Ok(Message::Text(text)) => {
                        if tx_in.send(text).is_err() {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) | Err(_) => break,
                    _ => {} // Ping/Pong/Binary are not part of the feed protocol
                }
            }
        });

        Ok(Box::new(WebSocketPushConnection {
            rx: rx_in,
            pump: Some(pump),
        }))
    }
}

struct WebSocketPushConnection {
    rx: mpsc::UnboundedReceiver<String>,
    pump: Option<JoinHandle<()>>,
}

#[async_trait]
impl PushConnection for WebSocketPushConnection {
    async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    async fn close(&mut self) {
        if let Some(pump) = self.pump.take() {
            pump.abort();
            let _ = pump.await;
        }
    }
}

impl Drop for WebSocketPushConnection {
    fn drop(&mut self) {
        // Abort the pump task if still running
        if let Some(pump) = self.pump.take() {
            pump.abort();
        }
    }
}
