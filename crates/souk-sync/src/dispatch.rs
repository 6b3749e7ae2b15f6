use souk_proto::Envelope;

use crate::model::{Event, OrderCounters, TickerState};

/// Where an envelope's payload lands.
#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Log-worthy kinds, headed for the incremental merge path.
    Append(Event),
    ViewerCount(u64),
    OrderCounters(OrderCounters),
    Ticker(TickerState),
    /// Unknown kinds are dropped without side effects.
    Ignore,
}

/// Pure classification of a push envelope. `now_ms` stands in for missing
/// origin timestamps.
pub fn classify(envelope: Envelope, now_ms: i64) -> Route {
    match envelope {
        Envelope::ChatMessage { data } => Route::Append(Event::from_chat(data, now_ms)),
        Envelope::ViewerCount { count } => Route::ViewerCount(count),
        Envelope::OrderNotification { data } => {
            Route::Append(Event::order_notice(data.message, now_ms))
        }
        Envelope::OrderCounterUpdate { data } => Route::OrderCounters(data.into()),
        Envelope::TickerUpdate { data } => Route::Ticker(data.into()),
        Envelope::Unknown => Route::Ignore,
    }
}
