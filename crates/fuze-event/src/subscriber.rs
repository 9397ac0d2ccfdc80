//! Pub/sub role capability.
//!
//! A subscriber-capable event is either a *publisher* (its firing
//! contributes a token to every linked listener) or a *listener* (its
//! payload runs once per round, after every linked publisher has
//! contributed). The loops that drive both sides live in
//! `fuze-runtime`; this module holds the per-event state they share:
//!
//! - the link table (senders for publishers, receivers for listeners),
//!   locked independently of the registry so barrier progress is never
//!   blocked by unrelated registry mutation;
//! - the activation channel a publisher loop blocks on (capacity 1,
//!   coalescing — raised by the normal trigger path);
//! - the exit token and the running flag guarding loop spawn.

use crate::link::{LinkReceiver, LinkSender};
use crate::CancelToken;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::mpsc;

/// Which side of the barrier an event participates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Fans one token out to every linked listener when fired.
    Publisher,
    /// Runs once per round, after all linked publishers fired.
    Listener,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Publisher => f.write_str("publisher"),
            Self::Listener => f.write_str("listener"),
        }
    }
}

/// Pub/sub capability state of one event.
pub struct Subscriber {
    role: Role,
    exit: CancelToken,
    running: AtomicBool,
    activation_tx: mpsc::Sender<()>,
    activation_rx: Mutex<Option<mpsc::Receiver<()>>>,
    senders: Mutex<Vec<LinkSender>>,
    receivers: Mutex<Vec<LinkReceiver>>,
}

impl Subscriber {
    /// Creates idle capability state for the given role.
    #[must_use]
    pub fn new(role: Role) -> Self {
        let (activation_tx, activation_rx) = mpsc::channel(1);
        Self {
            role,
            exit: CancelToken::new(),
            running: AtomicBool::new(false),
            activation_tx,
            activation_rx: Mutex::new(Some(activation_rx)),
            senders: Mutex::new(Vec::new()),
            receivers: Mutex::new(Vec::new()),
        }
    }

    /// The configured role.
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Token that terminates this event's barrier loop.
    #[must_use]
    pub fn exit_token(&self) -> &CancelToken {
        &self.exit
    }

    /// Returns `true` while a barrier loop is attached.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claims the loop slot; exactly one claimant wins while idle.
    pub fn try_start(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Marks the loop slot idle again. Called by the loop on exit.
    pub fn set_idle(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Raises the activation signal (publisher side).
    ///
    /// Called by the trigger path after the payload ran. Capacity-1,
    /// coalescing: an activation raised while one is already pending
    /// is absorbed — the publisher loop fans out at most one round per
    /// pending activation.
    pub fn activate(&self) {
        let _ = self.activation_tx.try_send(());
    }

    /// Takes the activation receiver; the publisher loop owns it.
    ///
    /// Returns `None` on a second call — the slot is single-take by
    /// design, matching the one-loop-per-capability guard.
    #[must_use]
    pub fn take_activation(&self) -> Option<mpsc::Receiver<()>> {
        self.activation_rx.lock().take()
    }

    /// Adds one link sender (publisher side).
    pub fn add_sender(&self, sender: LinkSender) {
        self.senders.lock().push(sender);
    }

    /// Adds one link receiver (listener side).
    pub fn add_receiver(&self, receiver: LinkReceiver) {
        self.receivers.lock().push(receiver);
    }

    /// Prunes closed links and returns clones of the live senders.
    ///
    /// Cloning lets the publisher loop release the table lock before
    /// awaiting channel capacity.
    #[must_use]
    pub fn snapshot_senders(&self) -> Vec<LinkSender> {
        let mut table = self.senders.lock();
        table.retain(|s| !s.is_closed());
        table.clone()
    }

    /// Takes the whole receiver table for one barrier round.
    ///
    /// Entries added while the round is in flight land in the table
    /// and are picked up next round via [`restore_receivers`](Self::restore_receivers).
    #[must_use]
    pub fn take_receivers(&self) -> Vec<LinkReceiver> {
        std::mem::take(&mut *self.receivers.lock())
    }

    /// Returns surviving receivers to the table after a round.
    pub fn restore_receivers(&self, survivors: Vec<LinkReceiver>) {
        let mut table = self.receivers.lock();
        let added_mid_round = std::mem::replace(&mut *table, survivors);
        table.extend(added_mid_round);
    }

    /// Number of live links (either side), for diagnostics and tests.
    #[must_use]
    pub fn link_count(&self) -> usize {
        match self.role {
            Role::Publisher => self.senders.lock().len(),
            Role::Listener => self.receivers.lock().len(),
        }
    }

    /// Drops every sender, closing all listener-side links, and
    /// latches the exit token. Called on removal and loop teardown.
    pub fn close(&self) {
        self.exit.cancel();
        self.senders.lock().clear();
    }
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("role", &self.role)
            .field("running", &self.is_running())
            .field("links", &self.link_count())
            .finish_non_exhaustive()
    }
}
