use tracing::debug;

use crate::model::Event;

/// Two deliveries carrying identical author/body/reaction within this window
/// are the same logical event even without matching ids.
pub const DUPLICATE_WINDOW_MS: i64 = 1_000;

/// Append-only, arrival-ordered view of the feed, deduplicated across the
/// push and poll channels.
#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Event] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Incremental path used by the push channel: drop the candidate when the
    /// log already holds the same logical event, otherwise append at the
    /// tail. The log never re-sorts on insert; the push channel only delivers
    /// strictly-newer events and the poll channel goes through
    /// [`EventLog::replace_all`].
    pub fn merge_append(&mut self, candidate: Event) -> bool {
        let duplicate = self
            .entries
            .iter()
            .any(|existing| same_logical_event(existing, &candidate));
        if duplicate {
            debug!(
                target: "souk::merge",
                author = %candidate.author,
                "dropping duplicate event"
            );
            return false;
        }
        self.entries.push(candidate);
        true
    }

    /// Replace path used by the poll channel: a pull result is the server's
    /// full current list, so it becomes the new ground truth wholesale rather
    /// than being matched element by element.
    pub fn replace_all(&mut self, entries: Vec<Event>) {
        self.entries = entries;
    }
}

/// Identity rule for deduplication: matching non-empty ids, or matching
/// content inside the duplicate window.
fn same_logical_event(a: &Event, b: &Event) -> bool {
    if let (Some(left), Some(right)) = (&a.id, &b.id) {
        if !left.is_empty() && left == right {
            return true;
        }
    }
    a.author == b.author
        && a.body == b.body
        && a.reaction == b.reaction
        && (a.occurred_at - b.occurred_at).abs() < DUPLICATE_WINDOW_MS
}
