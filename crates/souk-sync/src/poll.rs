use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::model::{now_ms, Event};
use crate::rest::FeedApi;
use crate::state::FeedState;

/// Poll loop body: fetch the full chat list each tick and hand it to the
/// replace path. Polling is itself the fallback, so a failed request records
/// a diagnostic and keeps the cadence; only task abort ends the loop.
pub(crate) async fn run(state: Arc<FeedState>, api: Arc<dyn FeedApi>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    loop {
        ticker.tick().await;
        match api.fetch_chat().await {
            Ok(list) => {
                let now = now_ms();
                let events: Vec<Event> = list
                    .into_iter()
                    .map(|wire| Event::from_chat(wire, now))
                    .collect();
                state.replace_log(events);
                state.set_poll_status(None);
            }
            Err(err) => {
                debug!(target: "souk::poll", error = %err, "chat poll failed; keeping cadence");
                state.set_poll_status(Some(err.to_string()));
            }
        }
    }
}
