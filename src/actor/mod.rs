//! Active-object runtime
//!
//! An active object owns a private FIFO [`Mailbox`] and a dedicated OS thread
//! that dequeues and dispatches one message at a time. Other threads only
//! ever hold an [`ActorRef`] to it and interact by sending messages.
//!
//! # Lifecycle
//!
//! 1. [`ActorSystem::spawn`] creates the mailbox and starts the thread
//!    immediately (mailbox empty, running flag set)
//! 2. The loop blocks on the mailbox, waking on enqueue, and calls
//!    [`ActiveObject::dispatch`] on the owning thread
//! 3. The loop ends when dispatch returns [`Flow::Stop`], right after a
//!    terminal message (`die`) has been dispatched, or when the system is
//!    cancelled
//! 4. The running flag is cleared and [`ActorHandle::join`] returns
//!
//! # Failure
//!
//! A dispatch error or a panic stops the failing object and cancels its
//! [`ActorSystem`]; every other object of the system notices within
//! [`SHUTDOWN_CHECK_INTERVAL`] and stops too. The error is returned from that
//! object's `join`.

pub mod mailbox;
pub mod message;
pub mod roles;

pub use mailbox::{create_mailbox, ActorRef, Mailbox, SendError};
pub use message::{Message, RoleRef, Setup, Tagged};

use crate::error::PipelineError;
use crate::Result;
use anyhow::Context as _;
use crossbeam::channel::RecvTimeoutError;
use log::{debug, error, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// How long a blocked receive waits before re-checking cancellation
pub const SHUTDOWN_CHECK_INTERVAL: Duration = Duration::from_millis(10);

/// What the object wants after handling a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep processing messages
    Continue,
    /// Stop this object permanently
    Stop,
}

/// Per-object context handed to every dispatch
pub struct Context<M> {
    self_ref: ActorRef<M>,
}

impl<M> Context<M> {
    /// Reference to this object, usable as a reply address
    pub fn self_ref(&self) -> ActorRef<M> {
        self.self_ref.clone()
    }
}

/// Behavior of an active object
///
/// Implementors hold their own state; the runtime guarantees `dispatch` is
/// only ever called from the object's dedicated thread.
pub trait ActiveObject: Send + 'static {
    /// Messages this object can receive
    type Message: Tagged + Send + 'static;

    /// Identity used for the thread name, logs and errors
    fn name(&self) -> &'static str;

    /// Handle one message
    fn dispatch(&mut self, msg: Self::Message, ctx: &Context<Self::Message>) -> Result<Flow>;
}

/// Shared stop signal for every object of one system
///
/// Remembers the first object that cancelled because it failed, so the
/// root cause can be told apart from failures it triggered downstream.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    cause: Arc<OnceLock<&'static str>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Cancel because `name` failed
    pub fn cancel_by(&self, name: &'static str) {
        let _ = self.cause.set(name);
        self.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// First object that failed, if any
    pub fn cause(&self) -> Option<&'static str> {
        self.cause.get().copied()
    }
}

/// Group of active objects that fail together
///
/// Each coordinator run owns its own system, so several pipelines can run
/// side by side without sharing any state.
#[derive(Debug, Clone, Default)]
pub struct ActorSystem {
    cancel: CancellationToken,
}

impl ActorSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start `object` on a dedicated thread
    pub fn spawn<A: ActiveObject>(&self, object: A) -> Result<ActorHandle<A::Message>> {
        let name = object.name();
        let (actor_ref, mailbox) = create_mailbox(name);
        let ctx = Context {
            self_ref: actor_ref.clone(),
        };
        let cancel = self.cancel.clone();

        let join_handle = thread::Builder::new()
            .name(format!("termfreq-{}", name))
            .spawn(move || {
                // dropped after run_loop, so the mailbox closes before the flag clears
                let _guard = StopGuard {
                    name,
                    running: mailbox.running(),
                    cancel: cancel.clone(),
                };
                run_loop(object, mailbox, ctx, cancel)
            })
            .with_context(|| format!("Failed to spawn {} thread", name))?;

        Ok(ActorHandle {
            actor_ref,
            join_handle,
        })
    }

    /// Stop every object of this system
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Name of the first object that failed, if any
    pub fn failed_object(&self) -> Option<&'static str> {
        self.cancel.cause()
    }
}

/// Owner's handle to a running active object
pub struct ActorHandle<M> {
    actor_ref: ActorRef<M>,
    join_handle: JoinHandle<Result<()>>,
}

impl<M: Tagged> ActorHandle<M> {
    /// Enqueue a message from outside the system
    pub fn send(&self, msg: M) -> Result<()> {
        let tag = msg.tag();
        self.actor_ref.send(msg).map_err(|_| {
            PipelineError::UndeliverableMessage {
                role: self.actor_ref.name(),
                tag,
            }
            .into()
        })
    }
}

impl<M> ActorHandle<M> {
    /// Reference to hand to other objects
    pub fn actor_ref(&self) -> ActorRef<M> {
        self.actor_ref.clone()
    }

    pub fn name(&self) -> &'static str {
        self.actor_ref.name()
    }

    pub fn is_running(&self) -> bool {
        self.actor_ref.is_running()
    }

    /// Wait for the object's thread to stop
    pub fn join(self) -> Result<()> {
        let role = self.actor_ref.name();
        match self.join_handle.join() {
            Ok(result) => result,
            Err(_) => Err(PipelineError::RolePanicked { role }.into()),
        }
    }
}

/// Clears the running flag on every exit path; cancels the system on panic
struct StopGuard {
    name: &'static str,
    running: Arc<AtomicBool>,
    cancel: CancellationToken,
}

impl Drop for StopGuard {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
        if thread::panicking() {
            self.cancel.cancel_by(self.name);
        }
    }
}

fn run_loop<A: ActiveObject>(
    mut object: A,
    mailbox: Mailbox<A::Message>,
    ctx: Context<A::Message>,
    cancel: CancellationToken,
) -> Result<()> {
    let name = object.name();
    debug!("{}: started", name);

    loop {
        if cancel.is_cancelled() {
            if mailbox.is_empty() {
                debug!("{}: system cancelled, stopping", name);
            } else {
                debug!("{}: system cancelled, {} messages dropped", name, mailbox.len());
            }
            return Ok(());
        }

        let msg = match mailbox.recv_timeout(SHUTDOWN_CHECK_INTERVAL) {
            Ok(msg) => msg,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                debug!("{}: mailbox closed, stopping", name);
                return Ok(());
            }
        };

        let tag = msg.tag();
        let terminal = msg.is_terminal();
        trace!("{}: dispatching '{}'", name, tag);

        match object.dispatch(msg, &ctx) {
            Ok(Flow::Continue) if !terminal => {}
            Ok(_) => {
                debug!("{}: stopped after '{}', {} messages unread", name, tag, mailbox.len());
                return Ok(());
            }
            Err(err) => {
                error!("{}: '{}' failed: {:#}", name, tag, err);
                cancel.cancel_by(name);
                return Err(err.context(format!("{} role failed", name)));
            }
        }
    }
}
