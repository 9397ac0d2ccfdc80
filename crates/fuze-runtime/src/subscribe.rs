//! Barrier loops for the pub/sub AND-join.
//!
//! One publisher loop per publisher event and one listener loop per
//! listener event, spawned at first subscription (the role state's
//! running flag guards against doubles).
//!
//! Publisher loop: block on the activation signal raised by the
//! trigger path, then push one token into every live link. Link
//! channels have capacity 1, so a publisher runs at most one round
//! ahead of its slowest listener.
//!
//! Listener loop: take the receiver table for a round, collect one
//! token per live link (closed links are pruned, never waited on),
//! run the payload exactly once when every live link contributed, and
//! start the next round. A partial set never fires the payload; an
//! emptied table retires the loop.
//!
//! Every wait races the loop-wide shutdown token and the event's own
//! exit token, so a silent publisher can never stall teardown.

use fuze_event::{CancelToken, Event, EventContext};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

pub(crate) fn spawn_publisher_loop(event: Arc<Event>, shutdown: CancelToken) {
    let activation = match event.subscriber() {
        Some(sub) if sub.try_start() => match sub.take_activation() {
            Some(rx) => rx,
            None => {
                sub.set_idle();
                return;
            }
        },
        _ => return,
    };
    tokio::spawn(publisher_loop(event, activation, shutdown));
}

async fn publisher_loop(
    event: Arc<Event>,
    mut activation: mpsc::Receiver<()>,
    shutdown: CancelToken,
) {
    let Some(sub) = event.subscriber() else {
        return;
    };
    debug!(event = %event.id(), "publisher loop started");
    'rounds: loop {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => break 'rounds,
            () = sub.exit_token().cancelled() => break 'rounds,
            signal = activation.recv() => {
                if signal.is_none() {
                    break 'rounds;
                }
                // Snapshot (pruning closed links) so the table lock is
                // not held while awaiting channel capacity.
                for sender in sub.snapshot_senders() {
                    tokio::select! {
                        biased;
                        () = shutdown.cancelled() => break 'rounds,
                        () = sub.exit_token().cancelled() => break 'rounds,
                        delivered = sender.send() => {
                            if !delivered {
                                debug!(listener = %sender.peer(), "link closed mid-round");
                            }
                        }
                    }
                }
            }
        }
    }
    // Dropping the senders closes every listener-side link.
    sub.close();
    sub.set_idle();
    debug!(event = %event.id(), "publisher loop stopped");
}

pub(crate) fn spawn_listener_loop(event: Arc<Event>, shutdown: CancelToken) {
    match event.subscriber() {
        Some(sub) if sub.try_start() => {}
        _ => return,
    }
    tokio::spawn(listener_loop(event, shutdown));
}

async fn listener_loop(event: Arc<Event>, shutdown: CancelToken) {
    let Some(sub) = event.subscriber() else {
        return;
    };
    debug!(event = %event.id(), "listener loop started");
    'rounds: loop {
        let round = sub.take_receivers();
        if round.is_empty() {
            debug!(event = %event.id(), "no links left, listener retiring");
            break;
        }
        let mut survivors = Vec::with_capacity(round.len());
        let mut pending = round.into_iter();
        while let Some(mut receiver) = pending.next() {
            if receiver.is_closed() {
                continue;
            }
            tokio::select! {
                biased;
                () = shutdown.cancelled() => {
                    survivors.push(receiver);
                    survivors.extend(pending);
                    sub.restore_receivers(survivors);
                    break 'rounds;
                }
                () = sub.exit_token().cancelled() => {
                    survivors.push(receiver);
                    survivors.extend(pending);
                    sub.restore_receivers(survivors);
                    break 'rounds;
                }
                token = receiver.recv() => {
                    // None means the publisher end is gone: prune.
                    if token.is_some() {
                        survivors.push(receiver);
                    }
                }
            }
        }
        if survivors.is_empty() {
            // Every link closed mid-round; a partial set never fires.
            debug!(event = %event.id(), "all links closed, listener retiring");
            break;
        }
        let ctx = EventContext {
            event_id: event.id(),
            trigger: None,
            cancel: shutdown.clone(),
        };
        let output = event.run(&ctx);
        debug!(event = %event.id(), output = %output, "barrier round complete");
        sub.restore_receivers(survivors);
    }
    sub.set_idle();
    debug!(event = %event.id(), "listener loop stopped");
}
