//! Network reachability signal.
//!
//! An explicit handle replaces ambient process-wide listeners: the embedder
//! (CLI, desktop shell, tests) flips the flag from whatever platform signal
//! it has, and the sync engine consumes an edge-triggered subscription it
//! was handed at construction time. Dropping every [`Reachability`] clone
//! closes all subscriptions, which is the teardown path.

use tokio::sync::watch;

/// Edge-triggered reachability transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReachabilityEvent {
    CameOnline,
    WentOffline,
}

/// Shared handle on the current reachability state.
#[derive(Debug, Clone)]
pub struct Reachability {
    tx: watch::Sender<bool>,
}

impl Reachability {
    /// Create a handle with the given initial state.
    #[must_use]
    pub fn new(initially_online: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_online);
        Self { tx }
    }

    /// Whether the remote service is currently considered reachable.
    #[must_use]
    pub fn is_online(&self) -> bool {
        *self.tx.borrow()
    }

    /// Signal that connectivity was regained.
    pub fn set_online(&self) {
        self.tx.send_if_modified(|state| {
            let changed = !*state;
            *state = true;
            changed
        });
    }

    /// Signal that connectivity was lost.
    pub fn set_offline(&self) {
        self.tx.send_if_modified(|state| {
            let changed = *state;
            *state = false;
            changed
        });
    }

    /// Open a cancellable subscription to reachability transitions.
    #[must_use]
    pub fn subscribe(&self) -> ReachabilityEvents {
        ReachabilityEvents {
            rx: self.tx.subscribe(),
        }
    }
}

/// Subscription yielding reachability transitions in order.
///
/// Ends (returns `None`) once every [`Reachability`] handle is dropped.
#[derive(Debug)]
pub struct ReachabilityEvents {
    rx: watch::Receiver<bool>,
}

impl ReachabilityEvents {
    /// Wait for the next transition.
    pub async fn next(&mut self) -> Option<ReachabilityEvent> {
        if self.rx.changed().await.is_err() {
            return None;
        }
        let online = *self.rx.borrow_and_update();
        Some(if online {
            ReachabilityEvent::CameOnline
        } else {
            ReachabilityEvent::WentOffline
        })
    }
}
