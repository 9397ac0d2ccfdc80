//! Pub/sub rendezvous links.
//!
//! One link per (publisher, listener) pair: a dedicated capacity-1
//! channel of typed [`Token`] messages. Capacity 1 is the barrier
//! accounting — a publisher buffers at most one unconsumed token per
//! listener, so it can run at most one round ahead.
//!
//! Closure is conveyed by the channel itself, from either end:
//!
//! - the publisher side drops its [`LinkSender`] → the listener's
//!   `recv()` yields `None` and the listener prunes the link;
//! - the listener side drops its [`LinkReceiver`] → the publisher
//!   observes [`LinkSender::is_closed`] and prunes the link.
//!
//! No flag shared between the two loops is needed.

use fuze_types::EventId;
use tokio::sync::mpsc;

/// One barrier contribution from a publisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token;

/// Allocates the link for one (publisher, listener) pair.
///
/// Each end is keyed by the *peer's* id: the sender knows which
/// listener it feeds, the receiver knows which publisher it waits on.
#[must_use]
pub fn link(publisher: EventId, listener: EventId) -> (LinkSender, LinkReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (
        LinkSender { peer: listener, tx },
        LinkReceiver { peer: publisher, rx },
    )
}

/// Publisher end of a link.
#[derive(Debug, Clone)]
pub struct LinkSender {
    peer: EventId,
    tx: mpsc::Sender<Token>,
}

impl LinkSender {
    /// Id of the listener this link feeds.
    #[must_use]
    pub fn peer(&self) -> EventId {
        self.peer
    }

    /// Returns `true` once the listener end is gone.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Pushes one token, waiting for capacity.
    ///
    /// Returns `false` if the listener end is gone.
    pub async fn send(&self) -> bool {
        self.tx.send(Token).await.is_ok()
    }
}

/// Listener end of a link.
#[derive(Debug)]
pub struct LinkReceiver {
    peer: EventId,
    rx: mpsc::Receiver<Token>,
}

impl LinkReceiver {
    /// Id of the publisher this link waits on.
    #[must_use]
    pub fn peer(&self) -> EventId {
        self.peer
    }

    /// Waits for the next token; `None` once the publisher end is gone
    /// and the buffer is drained.
    pub async fn recv(&mut self) -> Option<Token> {
        self.rx.recv().await
    }

    /// Non-blocking probe used to prune already-closed links at
    /// round start without consuming a buffered token.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.rx.is_closed() && self.rx.is_empty()
    }
}
