//! Live reload signalling to connected development clients.
//!
//! [`LiveReload`] is a fire-and-forget notification: no acknowledgement, and
//! having nobody listening is not an error. [`LiveReloadChannel`] fans the
//! signal out over a `tokio::sync::broadcast` channel; each connected client
//! holds a receiver.

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, trace};

/// Asks connected clients to reload.
pub trait LiveReload: Send + Sync {
    /// Signal a reload. Must not block on clients.
    fn reload(&self);
}

/// Message delivered to live reload subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReloadSignal {
    /// Increments with every signal sent on the channel, starting at 1.
    pub generation: u64,
}

// ---------------------------------------------------------------------------
// LiveReloadChannel
// ---------------------------------------------------------------------------

/// Broadcasts [`ReloadSignal`]s to every subscribed client.
#[derive(Debug)]
pub struct LiveReloadChannel {
    sender: broadcast::Sender<ReloadSignal>,
    generation: AtomicU64,
}

impl LiveReloadChannel {
    /// Create a channel buffering up to `capacity` signals per slow client.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            generation: AtomicU64::new(0),
        }
    }

    /// Connect a client.
    pub fn subscribe(&self) -> broadcast::Receiver<ReloadSignal> {
        self.sender.subscribe()
    }

    /// Number of connected clients.
    pub fn connected_clients(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Number of signals sent so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }
}

impl LiveReload for LiveReloadChannel {
    fn reload(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        match self.sender.send(ReloadSignal { generation }) {
            Ok(clients) => debug!(generation, clients, "live reload signalled"),
            Err(_) => trace!(generation, "live reload signalled with no connected clients"),
        }
    }
}

/// Live reload that does nothing, for a [`Reconciler`](super::Reconciler)
/// with no clients to notify.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLiveReload;

impl LiveReload for DisabledLiveReload {
    fn reload(&self) {}
}
