//! Wire types shared by the souk live-feed channels. The push WebSocket and
//! the REST pull/send endpoints exchange the same chat-message shape; keeping
//! the definitions in one crate stops the two paths from drifting apart.

use serde::{Deserialize, Serialize};

/// Envelope delivered over the push WebSocket, one JSON object per text frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    /// A chat line authored by a viewer or the host.
    ChatMessage { data: ChatMessageWire },
    /// Current connected-viewer count; rides in the top-level `count` field.
    ViewerCount {
        #[serde(default)]
        count: u64,
    },
    /// Pre-formatted order notice destined for the feed.
    OrderNotification { data: OrderNotificationWire },
    /// Running order counters for the session and the store overall.
    OrderCounterUpdate { data: OrderCounterWire },
    /// Ticker banner configuration.
    TickerUpdate { data: TickerWire },
    /// Any kind this client does not understand.
    #[serde(other)]
    Unknown,
}

impl Envelope {
    /// Parse a single push frame.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

/// Chat line as both channels deliver it. Pull snapshots may omit the
/// server-assigned id and the origin timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageWire {
    #[serde(default)]
    pub id: Option<String>,
    pub username: String,
    #[serde(default)]
    pub message: String,
    /// Origin-assigned unix-millisecond timestamp.
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderNotificationWire {
    pub message: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCounterWire {
    pub session_orders: u64,
    pub total_orders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerWire {
    pub text: String,
    pub enabled: bool,
}

/// Body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingChat {
    pub username: String,
    pub message: String,
    #[serde(default)]
    pub emoji: Option<String>,
}

impl OutgoingChat {
    pub fn new(username: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            message: message.into(),
            emoji: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}
