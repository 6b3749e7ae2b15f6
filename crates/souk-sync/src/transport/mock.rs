use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use super::{PushConnection, PushTransport};

/// Scripted push transport for tests. Each connect attempt consumes the next
/// queued outcome; an empty script refuses the handshake.
#[derive(Default)]
pub struct MockPushTransport {
    script: Mutex<VecDeque<MockOutcome>>,
    attempts: AtomicUsize,
}

enum MockOutcome {
    Refuse,
    Accept(mpsc::UnboundedReceiver<String>),
}

impl MockPushTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a handshake failure.
    pub fn queue_failure(&self) {
        self.script.lock().push_back(MockOutcome::Refuse);
    }

    /// Queue a successful handshake. Frames pushed through the returned
    /// sender arrive as received text frames; dropping the sender closes the
    /// connection.
    pub fn queue_connection(&self) -> mpsc::UnboundedSender<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.script.lock().push_back(MockOutcome::Accept(rx));
        tx
    }

    /// Number of handshakes attempted so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PushTransport for MockPushTransport {
    async fn connect(&self) -> Result<Box<dyn PushConnection>> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        match self.script.lock().pop_front() {
            Some(MockOutcome::Accept(rx)) => Ok(Box::new(MockPushConnection { rx })),
            Some(MockOutcome::Refuse) | None => Err(anyhow!("scripted handshake refusal")),
        }
    }
}

struct MockPushConnection {
    rx: mpsc::UnboundedReceiver<String>,
}

#[async_trait]
impl PushConnection for MockPushConnection {
    async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }

    async fn close(&mut self) {
        self.rx.close();
    }
}
