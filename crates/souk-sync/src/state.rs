use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::merge::EventLog;
use crate::model::{Event, OrderCounters, TickerState};

/// Observable state owned by the sync engine. The UI layer is a read-only
/// observer; only the channels (via the controller) write.
#[derive(Debug, Default)]
pub struct FeedState {
    log: RwLock<EventLog>,
    viewer_count: RwLock<u64>,
    order_counters: RwLock<OrderCounters>,
    ticker: RwLock<TickerState>,
    poll_status: RwLock<Option<String>>,
    push_confirmed: AtomicBool,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the ordered event log.
    pub fn events(&self) -> Vec<Event> {
        self.log.read().entries().to_vec()
    }

    pub fn event_count(&self) -> usize {
        self.log.read().len()
    }

    pub fn viewer_count(&self) -> u64 {
        *self.viewer_count.read()
    }

    pub fn order_counters(&self) -> OrderCounters {
        *self.order_counters.read()
    }

    pub fn ticker(&self) -> TickerState {
        self.ticker.read().clone()
    }

    /// Diagnostic from the most recent poll cycle, if it failed.
    pub fn poll_status(&self) -> Option<String> {
        self.poll_status.read().clone()
    }

    /// Whether the push channel has delivered at least one log-worthy event.
    pub fn has_push_confirmed(&self) -> bool {
        self.push_confirmed.load(Ordering::SeqCst)
    }

    pub(crate) fn merge_append(&self, event: Event) -> bool {
        self.log.write().merge_append(event)
    }

    pub(crate) fn replace_log(&self, events: Vec<Event>) {
        self.log.write().replace_all(events)
    }

    pub(crate) fn set_viewer_count(&self, count: u64) {
        *self.viewer_count.write() = count;
    }

    pub(crate) fn set_order_counters(&self, counters: OrderCounters) {
        *self.order_counters.write() = counters;
    }

    pub(crate) fn set_ticker(&self, ticker: TickerState) {
        *self.ticker.write() = ticker;
    }

    pub(crate) fn set_poll_status(&self, status: Option<String>) {
        *self.poll_status.write() = status;
    }

    pub(crate) fn mark_push_confirmed(&self) {
        self.push_confirmed.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_confirmation_latches() {
        let state = FeedState::new();
        assert!(!state.has_push_confirmed());
        state.mark_push_confirmed();
        assert!(state.has_push_confirmed());
    }

    #[test]
    fn replace_overwrites_the_log_snapshot() {
        let state = FeedState::new();
        state.merge_append(Event::system("one", 1));
        state.replace_log(vec![Event::system("two", 2)]);
        let events = state.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].body, "two");
    }
}
