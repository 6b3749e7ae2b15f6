use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use souk_proto::{ChatMessageWire, OrderCounterWire, TickerWire};

/// Author attached to server-side order notices.
const ORDER_FEED_AUTHOR: &str = "orders";

/// Kinds of entries the feed log holds. Viewer counts, order counters and
/// ticker changes are scalar state, not log entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Chat,
    OrderNotice,
    System,
}

/// One immutable entry of the feed log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Server-assigned identity; pull snapshots may not carry one.
    pub id: Option<String>,
    pub kind: EventKind,
    pub author: String,
    /// Message text; may be empty when only a reaction is present.
    pub body: String,
    pub reaction: Option<String>,
    /// Origin-assigned timestamp in unix milliseconds.
    pub occurred_at: i64,
}

impl Event {
    /// Build a chat entry from its wire shape; `now_ms` stands in when the
    /// channel did not supply an origin timestamp.
    pub fn from_chat(wire: ChatMessageWire, now_ms: i64) -> Self {
        Self {
            id: wire.id.filter(|id| !id.is_empty()),
            kind: EventKind::Chat,
            author: wire.username,
            body: wire.message,
            reaction: wire.emoji,
            occurred_at: wire.timestamp.unwrap_or(now_ms),
        }
    }

    /// Build an order notice; the server pre-formats the display string.
    pub fn order_notice(message: String, now_ms: i64) -> Self {
        Self {
            id: None,
            kind: EventKind::OrderNotice,
            author: ORDER_FEED_AUTHOR.to_string(),
            body: message,
            reaction: None,
            occurred_at: now_ms,
        }
    }

    /// Locally generated notice; never produced by either channel.
    pub fn system(body: impl Into<String>, now_ms: i64) -> Self {
        Self {
            id: None,
            kind: EventKind::System,
            author: "system".to_string(),
            body: body.into(),
            reaction: None,
            occurred_at: now_ms,
        }
    }
}

/// Session/total order counters shown next to the feed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OrderCounters {
    pub session_orders: u64,
    pub total_orders: u64,
}

impl From<OrderCounterWire> for OrderCounters {
    fn from(wire: OrderCounterWire) -> Self {
        Self {
            session_orders: wire.session_orders,
            total_orders: wire.total_orders,
        }
    }
}

/// Ticker banner state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TickerState {
    pub text: String,
    pub enabled: bool,
}

impl From<TickerWire> for TickerState {
    fn from(wire: TickerWire) -> Self {
        Self {
            text: wire.text,
            enabled: wire.enabled,
        }
    }
}

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_event_defaults_missing_timestamp_to_now() {
        let wire = ChatMessageWire {
            id: Some("m1".to_string()),
            username: "amira".to_string(),
            message: "hi".to_string(),
            timestamp: None,
            emoji: None,
        };
        let event = Event::from_chat(wire, 5_000);
        assert_eq!(event.occurred_at, 5_000);
        assert_eq!(event.kind, EventKind::Chat);
    }

    #[test]
    fn empty_wire_id_is_dropped() {
        let wire = ChatMessageWire {
            id: Some(String::new()),
            username: "amira".to_string(),
            message: "hi".to_string(),
            timestamp: Some(1),
            emoji: None,
        };
        assert!(Event::from_chat(wire, 0).id.is_none());
    }

    #[test]
    fn order_notice_uses_system_author() {
        let event = Event::order_notice("amira just ordered!".to_string(), 10);
        assert_eq!(event.kind, EventKind::OrderNotice);
        assert_eq!(event.author, ORDER_FEED_AUTHOR);
        assert_eq!(event.occurred_at, 10);
    }
}
