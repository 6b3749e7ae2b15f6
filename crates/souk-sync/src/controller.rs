use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use souk_proto::{Envelope, OutgoingChat};

use crate::config::FeedConfig;
use crate::dispatch::{classify, Route};
use crate::error::SyncError;
use crate::model::now_ms;
use crate::poll;
use crate::rest::{FeedApi, HttpFeedApi};
use crate::state::FeedState;
use crate::transport::{PushTransport, WebSocketConfig, WebSocketPushTransport};

/// Lifecycle of the push connection. Owned exclusively by the controller;
/// mutated only by transport outcomes and the controller's own retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
    Failed,
}

/// Whether the pull fallback is currently running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Active,
}

pub(crate) const MAX_RECONNECT_ATTEMPTS: u32 = 5;

/// Delay before reconnect attempt `attempt` (0-indexed).
pub(crate) fn reconnect_delay(attempt: u32) -> Duration {
    let exp = 1u64 << attempt.min(16);
    Duration::from_millis((1_000 * exp).min(30_000))
}

/// Owns the push connection, the poll fallback and the retry timer, and keeps
/// the observable [`FeedState`] consistent across both delivery channels.
/// All three resources are released together by [`FeedController::shutdown`].
pub struct FeedController {
    config: FeedConfig,
    transport: Arc<dyn PushTransport>,
    api: Arc<dyn FeedApi>,
    state: Arc<FeedState>,
    connection: RwLock<ConnectionState>,
    attempts: AtomicU32,
    shutting_down: AtomicBool,
    push_task: Mutex<Option<JoinHandle<()>>>,
    poll_task: Mutex<Option<JoinHandle<()>>>,
    retry_timer: Mutex<Option<JoinHandle<()>>>,
}

impl FeedController {
    /// Wire the controller to the real endpoints described by `config`.
    pub fn connect(config: FeedConfig) -> Arc<Self> {
        let transport = Arc::new(WebSocketPushTransport::new(WebSocketConfig::new(
            config.ws_url.clone(),
        )));
        let api = Arc::new(HttpFeedApi::new(config.http_base.clone()));
        Self::start(config, transport, api)
    }

    /// Start the engine on explicit channel implementations: one push
    /// connection attempt plus fallback supervision. Must be called from
    /// within a tokio runtime.
    pub fn start(
        config: FeedConfig,
        transport: Arc<dyn PushTransport>,
        api: Arc<dyn FeedApi>,
    ) -> Arc<Self> {
        let controller = Arc::new(Self {
            config,
            transport,
            api,
            state: Arc::new(FeedState::new()),
            connection: RwLock::new(ConnectionState::Connecting),
            attempts: AtomicU32::new(0),
            shutting_down: AtomicBool::new(false),
            push_task: Mutex::new(None),
            poll_task: Mutex::new(None),
            retry_timer: Mutex::new(None),
        });
        controller.spawn_connect();
        // The push channel is not open yet, so the pull fallback covers the
        // gap (and loads whatever history the server already holds).
        controller.activate_poll_if_needed();
        controller
    }

    /// Observable feed state for the UI layer.
    pub fn state(&self) -> Arc<FeedState> {
        self.state.clone()
    }

    pub fn connection_state(&self) -> ConnectionState {
        *self.connection.read()
    }

    pub fn poll_state(&self) -> PollState {
        if self.poll_task.lock().is_some() {
            PollState::Active
        } else {
            PollState::Idle
        }
    }

    /// Fire-and-forget write. The appended copy arrives back through
    /// whichever channel observes it first; the local log is not touched
    /// here. Failures surface to the caller and are not retried.
    pub async fn send(&self, outgoing: OutgoingChat) -> Result<(), SyncError> {
        self.api
            .post_chat(&outgoing)
            .await
            .map_err(|err| SyncError::Send(err.to_string()))
    }

    /// Tear down every scoped resource in one call: pending retry timer,
    /// poll task and push connection. Safe to call more than once.
    pub fn shutdown(&self) {
        self.shutting_down.store(true, Ordering::SeqCst);
        if let Some(timer) = self.retry_timer.lock().take() {
            timer.abort();
        }
        self.stop_poll();
        if let Some(task) = self.push_task.lock().take() {
            task.abort();
        }
        *self.connection.write() = ConnectionState::Closed;
        info!(target: "souk::sync", "feed controller shut down");
    }

    fn spawn_connect(self: &Arc<Self>) {
        if self.shutting_down.load(Ordering::SeqCst) {
            return;
        }
        *self.connection.write() = ConnectionState::Connecting;
        let this = self.clone();
        let handle = tokio::spawn(async move {
            match this.transport.connect().await {
                Ok(mut connection) => {
                    this.on_open();
                    while let Some(frame) = connection.recv().await {
                        this.handle_frame(&frame);
                    }
                    connection.close().await;
                    this.on_closed();
                }
                Err(err) => {
                    warn!(target: "souk::push", error = %err, "push handshake failed");
                    this.on_failed();
                }
            }
        });
        *self.push_task.lock() = Some(handle);
    }

    fn on_open(&self) {
        *self.connection.write() = ConnectionState::Open;
        self.attempts.store(0, Ordering::SeqCst);
        // Push is authoritative once open.
        self.stop_poll();
        info!(target: "souk::push", "push channel open");
    }

    fn on_closed(self: &Arc<Self>) {
        if self.shutting_down.load(Ordering::SeqCst) {
            return;
        }
        *self.connection.write() = ConnectionState::Closed;
        debug!(target: "souk::push", "push channel closed");
        self.schedule_reconnect();
    }

    fn on_failed(self: &Arc<Self>) {
        if self.shutting_down.load(Ordering::SeqCst) {
            return;
        }
        *self.connection.write() = ConnectionState::Failed;
        self.schedule_reconnect();
    }

    fn schedule_reconnect(self: &Arc<Self>) {
        self.activate_poll_if_needed();

        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if attempt >= MAX_RECONNECT_ATTEMPTS {
            warn!(
                target: "souk::push",
                "retry budget exhausted; relying on the poll channel"
            );
            return;
        }

        let delay = reconnect_delay(attempt);
        debug!(
            target: "souk::push",
            attempt,
            delay_ms = delay.as_millis() as u64,
            "scheduling reconnect"
        );
        let this = self.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.spawn_connect();
        });
        // One cancellable timer handle at a time; a stale one must not fire
        // after a newer schedule or a teardown.
        if let Some(previous) = self.retry_timer.lock().replace(timer) {
            previous.abort();
        }
    }

    fn activate_poll_if_needed(self: &Arc<Self>) {
        if self.shutting_down.load(Ordering::SeqCst) {
            return;
        }
        if self.connection_state() == ConnectionState::Open {
            return;
        }
        if self.state.has_push_confirmed() {
            return;
        }
        let mut guard = self.poll_task.lock();
        if guard.is_some() {
            return;
        }
        debug!(target: "souk::poll", "activating poll fallback");
        let state = self.state.clone();
        let api = self.api.clone();
        let interval = self.config.poll_interval;
        *guard = Some(tokio::spawn(poll::run(state, api, interval)));
    }

    fn stop_poll(&self) {
        if let Some(handle) = self.poll_task.lock().take() {
            handle.abort();
            debug!(target: "souk::poll", "poll fallback stopped");
        }
    }

    fn handle_frame(&self, raw: &str) {
        let envelope = match Envelope::parse(raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(target: "souk::push", error = %err, "dropping malformed envelope");
                return;
            }
        };
        match classify(envelope, now_ms()) {
            Route::Append(event) => {
                self.state.mark_push_confirmed();
                self.state.merge_append(event);
            }
            Route::ViewerCount(count) => self.state.set_viewer_count(count),
            Route::OrderCounters(counters) => self.state.set_order_counters(counters),
            Route::Ticker(ticker) => self.state.set_ticker(ticker),
            Route::Ignore => {
                debug!(target: "souk::push", "ignoring unknown envelope kind");
            }
        }
    }
}
