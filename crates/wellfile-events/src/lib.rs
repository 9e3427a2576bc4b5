#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

//! Progress event bus for copy runs.
//!
//! The worker that resolves and copies files publishes typed events; the
//! presentation layer subscribes and renders them while the run is in flight.
//! Internally the bus uses `tokio::broadcast` with a bounded buffer plus a
//! replay ring so late subscribers can catch up; when the channel overflows the
//! oldest events are dropped.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::{self, Receiver, Sender, error::TryRecvError};
use tracing::error;
use uuid::Uuid;

/// Identifier assigned to each published event.
pub type EventId = u64;

/// Default buffer size for the in-memory replay ring.
const DEFAULT_REPLAY_CAPACITY: usize = 1_024;

/// Typed events emitted while a run progresses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// Inputs were parsed and the scan is about to begin.
    RunStarted {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Matching mode (`wells` or `names`).
        mode: String,
        /// Number of tasks accepted for scanning.
        tasks: usize,
        /// Number of source roots that will be walked.
        sources: usize,
    },
    /// A source root does not exist and was skipped.
    SourceSkipped {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Missing source root.
        path: String,
    },
    /// A source root finished scanning.
    SourceScanned {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Source root that was walked.
        path: String,
        /// Regular files inspected under the root.
        files_seen: u64,
        /// Files that matched a task.
        matches: u64,
    },
    /// A single input reached its final outcome.
    TaskResolved {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Trimmed input line.
        identifier: String,
        /// Outcome label (`Copied`, `NotFound`, `InvalidInput`, `CopyError`).
        status: String,
        /// Copied path or error message when relevant.
        detail: Option<String>,
    },
    /// The run finished and its log was written (or failed to write).
    RunCompleted {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Files copied.
        copied: usize,
        /// Inputs with no candidate.
        not_found: usize,
        /// Malformed inputs.
        invalid_input: usize,
        /// Copies that raised an I/O error.
        copy_errors: usize,
        /// Location of the run log, if it was written.
        log_path: Option<String>,
    },
    /// The run aborted before completing.
    RunFailed {
        /// Run the event belongs to.
        run_id: Uuid,
        /// Rendered terminal error.
        message: String,
    },
}

impl Event {
    /// Machine-friendly discriminator.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::RunStarted { .. } => "run_started",
            Self::SourceSkipped { .. } => "source_skipped",
            Self::SourceScanned { .. } => "source_scanned",
            Self::TaskResolved { .. } => "task_resolved",
            Self::RunCompleted { .. } => "run_completed",
            Self::RunFailed { .. } => "run_failed",
        }
    }

    /// Run identifier carried by every event.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        match self {
            Self::RunStarted { run_id, .. }
            | Self::SourceSkipped { run_id, .. }
            | Self::SourceScanned { run_id, .. }
            | Self::TaskResolved { run_id, .. }
            | Self::RunCompleted { run_id, .. }
            | Self::RunFailed { run_id, .. } => *run_id,
        }
    }

    /// Whether no further events follow for this run.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::RunCompleted { .. } | Self::RunFailed { .. })
    }
}

/// Metadata wrapper around events. Each envelope tracks the event id and
/// emission timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEnvelope {
    /// Sequential identifier assigned on publish.
    pub id: EventId,
    /// Emission time.
    pub timestamp: DateTime<Utc>,
    /// Event payload.
    pub event: Event,
}

/// Shared event bus built on top of `tokio::broadcast`.
#[derive(Clone)]
pub struct EventBus {
    sender: Sender<EventEnvelope>,
    buffer: Arc<Mutex<VecDeque<EventEnvelope>>>,
    next_id: Arc<AtomicU64>,
    replay_capacity: usize,
}

impl EventBus {
    /// Construct a new bus with the provided broadcast capacity.
    ///
    /// The broadcast channel uses the same capacity as the replay buffer. A zero
    /// capacity is raised to one.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            next_id: Arc::new(AtomicU64::new(1)),
            replay_capacity: capacity,
        }
    }

    /// Construct a bus with the default in-memory buffer size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_REPLAY_CAPACITY)
    }

    /// Publish a new event, assigning it a sequential identifier.
    ///
    /// Publishing never blocks and succeeds even when nobody is subscribed.
    pub fn publish(&self, event: Event) -> EventId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = EventEnvelope {
            id,
            timestamp: Utc::now(),
            event,
        };

        {
            let mut buffer = self.lock_buffer();
            if buffer.len() == self.replay_capacity {
                buffer.pop_front();
            }
            buffer.push_back(envelope.clone());
        }

        let _ = self.sender.send(envelope);
        id
    }

    /// Subscribe to the bus, replaying any buffered events newer than `since_id`.
    #[must_use]
    pub fn subscribe(&self, since_id: Option<EventId>) -> EventStream {
        let receiver = self.sender.subscribe();
        let mut backlog = VecDeque::new();
        if let Some(since) = since_id {
            let buffer = self.lock_buffer();
            backlog.extend(buffer.iter().filter(|item| item.id > since).cloned());
        }
        EventStream {
            backlog,
            receiver,
            last_seen: since_id,
        }
    }

    /// Returns the last assigned identifier, if any events have been published.
    #[must_use]
    pub fn last_event_id(&self) -> Option<EventId> {
        self.lock_buffer().back().map(|event| event.id)
    }

    fn lock_buffer(&self) -> MutexGuard<'_, VecDeque<EventEnvelope>> {
        match self.buffer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                error!("event buffer mutex poisoned; continuing with recovered guard");
                poisoned.into_inner()
            }
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream wrapper that yields events either from the replay backlog or from the
/// live broadcast channel.
pub struct EventStream {
    backlog: VecDeque<EventEnvelope>,
    receiver: Receiver<EventEnvelope>,
    last_seen: Option<EventId>,
}

impl EventStream {
    /// Receive the next event, respecting the replay backlog first.
    pub async fn next(&mut self) -> Option<EventEnvelope> {
        loop {
            let envelope = if let Some(event) = self.backlog.pop_front() {
                event
            } else {
                match self.receiver.recv().await {
                    Ok(event) => event,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            };
            if let Some(envelope) = self.accept(envelope) {
                return Some(envelope);
            }
        }
    }

    /// Receive an already-published event without waiting.
    ///
    /// Returns `None` once the backlog and the channel are both empty.
    pub fn try_next(&mut self) -> Option<EventEnvelope> {
        loop {
            let envelope = if let Some(event) = self.backlog.pop_front() {
                event
            } else {
                match self.receiver.try_recv() {
                    Ok(event) => event,
                    Err(TryRecvError::Lagged(_)) => continue,
                    Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
                }
            };
            if let Some(envelope) = self.accept(envelope) {
                return Some(envelope);
            }
        }
    }

    // Drops live events that were already yielded from the replay backlog.
    fn accept(&mut self, envelope: EventEnvelope) -> Option<EventEnvelope> {
        if self.last_seen.is_some_and(|seen| envelope.id <= seen) {
            return None;
        }
        self.last_seen = Some(envelope.id);
        Some(envelope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::time::Duration;
    use tokio::task;
    use tokio::time::timeout;

    const RECV_TIMEOUT: Duration = Duration::from_secs(1);

    fn resolved(run_id: Uuid, index: usize) -> Event {
        Event::TaskResolved {
            run_id,
            identifier: format!("{index:012}"),
            status: "NotFound".to_string(),
            detail: None,
        }
    }

    #[tokio::test]
    async fn sequential_ids_and_replay() {
        let bus = EventBus::with_capacity(16);
        let run_id = Uuid::new_v4();

        let mut last_id = 0;
        for i in 0..5 {
            last_id = bus.publish(resolved(run_id, i));
        }
        assert_eq!(last_id, 5);
        assert_eq!(bus.last_event_id(), Some(5));

        let mut stream = bus.subscribe(Some(2));
        let mut received = Vec::new();
        for _ in 0..3 {
            if let Some(event) = stream.next().await {
                received.push(event.id);
            }
        }
        assert_eq!(received, vec![3, 4, 5]);
    }

    #[tokio::test]
    async fn try_next_drains_without_waiting() {
        let bus = EventBus::with_capacity(8);
        let run_id = Uuid::new_v4();
        let mut stream = bus.subscribe(None);

        let _ = bus.publish(resolved(run_id, 1));
        let _ = bus.publish(Event::RunFailed {
            run_id,
            message: "destination unavailable".to_string(),
        });

        let first = stream.try_next().map(|envelope| envelope.event.kind());
        let second = stream.try_next().map(|envelope| envelope.event);
        assert_eq!(first, Some("task_resolved"));
        assert!(second.as_ref().is_some_and(Event::is_terminal));
        assert!(stream.try_next().is_none());
    }

    #[tokio::test]
    async fn replay_and_live_events_are_not_duplicated() {
        let bus = EventBus::with_capacity(8);
        let run_id = Uuid::new_v4();
        let _ = bus.publish(resolved(run_id, 1));
        let mut stream = bus.subscribe(Some(0));
        let _ = bus.publish(resolved(run_id, 2));

        let mut ids = Vec::new();
        while let Some(envelope) = stream.try_next() {
            ids.push(envelope.id);
        }
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn worker_thread_events_reach_async_subscriber() {
        let bus = EventBus::with_capacity(512);
        let run_id = Uuid::new_v4();
        let mut stream = bus.subscribe(None);

        let publisher = {
            let bus = bus.clone();
            task::spawn_blocking(move || {
                for i in 0..200 {
                    let _ = bus.publish(resolved(run_id, i));
                }
            })
        };

        let consumer = task::spawn(async move {
            let mut ids = HashSet::new();
            while ids.len() < 200 {
                match timeout(RECV_TIMEOUT, stream.next()).await {
                    Ok(Some(envelope)) => {
                        assert_eq!(envelope.event.run_id(), run_id);
                        ids.insert(envelope.id);
                    }
                    _ => break,
                }
            }
            ids
        });

        assert!(publisher.await.is_ok());
        let ids = consumer.await.unwrap_or_default();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let bus = EventBus::with_capacity(0);
        let _ = bus.publish(Event::RunFailed {
            run_id: Uuid::nil(),
            message: "x".to_string(),
        });
        assert_eq!(bus.last_event_id(), Some(1));
    }
}
