//! Mailboxes and actor references
//!
//! A mailbox is an unbounded crossbeam channel: any number of [`ActorRef`]
//! clones enqueue, exactly one [`Mailbox`] (owned by the actor's thread)
//! dequeues. Sending never blocks and never waits for the recipient.

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Returned when the recipient has stopped; hands the message back
#[derive(PartialEq, Eq)]
pub struct SendError<M>(pub M);

impl<M> fmt::Debug for SendError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SendError(..)")
    }
}

impl<M> fmt::Display for SendError<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("recipient mailbox is closed")
    }
}

impl<M> std::error::Error for SendError<M> {}

/// Send side of an active object's mailbox
///
/// Cheap to clone; clones are what roles hand each other as reply
/// addresses inside messages.
pub struct ActorRef<M> {
    name: &'static str,
    tx: Sender<M>,
    running: Arc<AtomicBool>,
}

impl<M> ActorRef<M> {
    /// Enqueue `msg` and return immediately
    pub fn send(&self, msg: M) -> Result<(), SendError<M>> {
        self.tx.send(msg).map_err(|err| SendError(err.into_inner()))
    }

    /// Name of the active object behind this reference
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether the recipient's processing loop is still live
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

impl<M> Clone for ActorRef<M> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            tx: self.tx.clone(),
            running: Arc::clone(&self.running),
        }
    }
}

impl<M> fmt::Debug for ActorRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorRef")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}

/// Receive side of a mailbox, owned by the actor's thread
pub struct Mailbox<M> {
    rx: Receiver<M>,
    running: Arc<AtomicBool>,
}

impl<M> Mailbox<M> {
    /// Block for the next message, waking at least every `timeout`
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    /// Messages currently queued
    pub fn len(&self) -> usize {
        self.rx.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rx.is_empty()
    }

    /// Shared running flag, cleared when the processing loop ends
    pub(crate) fn running(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

/// Create a mailbox and its first reference
///
/// The running flag starts `true`; the actor thread clears it on exit.
pub fn create_mailbox<M>(name: &'static str) -> (ActorRef<M>, Mailbox<M>) {
    let (tx, rx) = channel::unbounded();
    let running = Arc::new(AtomicBool::new(true));
    (
        ActorRef {
            name,
            tx,
            running: Arc::clone(&running),
        },
        Mailbox { rx, running },
    )
}
