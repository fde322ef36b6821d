//! The three roles of the actor pipeline
//!
//! ```text
//!            filter(token)            word(token)
//! Ingestion ───────────────▶ Filtering ───────────▶ Aggregation
//!     ▲        top25, die                top25, die       │
//!     └───────────────── send_word_freqs / die ───────────┘
//! ```
//!
//! Every role declares the tags it owns by handling them in [`Role::handle`];
//! anything else comes back as [`Handled::Unowned`] and is forwarded
//! unchanged to the role's [`Role::forward_target`]. That default-forward
//! rule is what carries `top25` and `die` down the pipeline without each role
//! knowing the whole protocol.

use super::mailbox::SendError;
use super::message::{Message, RoleRef, Setup, Tagged};
use super::{ActiveObject, Context, Flow};
use crate::error::PipelineError;
use crate::stats::{rank, FrequencyMap, RankPolicy, RankedEntry};
use crate::text::{self, StopWordSet};
use crate::Result;
use crossbeam::channel::Sender;
use log::{debug, trace, warn};
use std::path::PathBuf;

/// Outcome of a role handling one message
#[derive(Debug)]
pub enum Handled {
    /// The role owns the message and processed it
    Done(Flow),
    /// Not owned here; route to the forward target
    Unowned(Message),
}

/// A pipeline role: owned tags plus a declared forward target
pub trait Role: Send + 'static {
    const NAME: &'static str;

    /// Recipient of unowned messages, once known
    fn forward_target(&self) -> Option<&RoleRef>;

    fn handle(&mut self, msg: Message, ctx: &Context<Message>) -> Result<Handled>;
}

impl<R: Role> ActiveObject for R {
    type Message = Message;

    fn name(&self) -> &'static str {
        R::NAME
    }

    fn dispatch(&mut self, msg: Message, ctx: &Context<Message>) -> Result<Flow> {
        match self.handle(msg, ctx)? {
            Handled::Done(flow) => Ok(flow),
            Handled::Unowned(msg) => {
                match self.forward_target() {
                    Some(next) => deliver(R::NAME, next, msg)?,
                    None if msg.is_terminal() => {}
                    None => {
                        return Err(PipelineError::UnexpectedMessage {
                            role: R::NAME,
                            tag: msg.tag(),
                        }
                        .into())
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }
}

/// Send `msg` from `role` to `next`
///
/// A terminal message to an already stopped recipient is dropped: the
/// shutdown it carries has already happened.
fn deliver(role: &'static str, next: &RoleRef, msg: Message) -> Result<()> {
    let tag = msg.tag();
    match next.send(msg) {
        Ok(()) => Ok(()),
        Err(SendError(msg)) if msg.is_terminal() => {
            debug!("{}: {} already stopped, '{}' dropped", role, next.name(), tag);
            Ok(())
        }
        Err(_) => Err(PipelineError::UndeliverableMessage { role, tag }.into()),
    }
}

fn before_init(role: &'static str, tag: &'static str) -> anyhow::Error {
    anyhow::anyhow!("{} role received '{}' before init", role, tag)
}

/// Loads the input and streams candidate tokens to the filtering role
#[derive(Debug, Default)]
pub struct Ingestion {
    tokens: Vec<String>,
    filter: Option<RoleRef>,
}

impl Ingestion {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Role for Ingestion {
    const NAME: &'static str = "ingestion";

    fn forward_target(&self) -> Option<&RoleRef> {
        self.filter.as_ref()
    }

    fn handle(&mut self, msg: Message, _ctx: &Context<Message>) -> Result<Handled> {
        match msg {
            Message::Init(Setup::Ingestion { path, filter }) => {
                self.tokens = text::read_tokens(&path)?;
                self.filter = Some(filter);
            }
            Message::Init(_) => {
                return Err(PipelineError::UnexpectedMessage {
                    role: Self::NAME,
                    tag: "init",
                }
                .into())
            }
            Message::SendWordFreqs { reply } => {
                let filter = self
                    .filter
                    .as_ref()
                    .ok_or_else(|| before_init(Self::NAME, "send_word_freqs"))?;

                let tokens = std::mem::take(&mut self.tokens);
                let streamed = tokens.len();
                for token in tokens {
                    if text::is_qualifying(&token) {
                        deliver(Self::NAME, filter, Message::Filter(token))?;
                    }
                }
                // same mailbox as every filter message, so it arrives last
                deliver(Self::NAME, filter, Message::Top25 { reply })?;
                debug!("{}: streamed {} tokens", Self::NAME, streamed);
            }
            other => return Ok(Handled::Unowned(other)),
        }
        Ok(Handled::Done(Flow::Continue))
    }
}

/// Drops stop words, passes everything else on as `word`
#[derive(Debug)]
pub struct Filtering {
    stop_words_path: PathBuf,
    stop_words: StopWordSet,
    aggregator: Option<RoleRef>,
    dropped: u64,
}

impl Filtering {
    /// Create a filtering role that loads its stop words from `stop_words_path` on `init`
    pub fn new(stop_words_path: impl Into<PathBuf>) -> Self {
        Self {
            stop_words_path: stop_words_path.into(),
            stop_words: StopWordSet::default(),
            aggregator: None,
            dropped: 0,
        }
    }
}

impl Role for Filtering {
    const NAME: &'static str = "filtering";

    fn forward_target(&self) -> Option<&RoleRef> {
        self.aggregator.as_ref()
    }

    fn handle(&mut self, msg: Message, _ctx: &Context<Message>) -> Result<Handled> {
        match msg {
            Message::Init(Setup::Filtering { aggregator }) => {
                self.stop_words = StopWordSet::load(&self.stop_words_path)?;
                self.aggregator = Some(aggregator);
            }
            Message::Init(_) => {
                return Err(PipelineError::UnexpectedMessage {
                    role: Self::NAME,
                    tag: "init",
                }
                .into())
            }
            Message::Filter(token) => {
                let aggregator = self
                    .aggregator
                    .as_ref()
                    .ok_or_else(|| before_init(Self::NAME, "filter"))?;
                if self.stop_words.contains(&token) {
                    self.dropped += 1;
                } else {
                    deliver(Self::NAME, aggregator, Message::Word(token))?;
                }
            }
            other => {
                if let Message::Top25 { .. } = other {
                    debug!("{}: {} stop-word occurrences dropped", Self::NAME, self.dropped);
                }
                return Ok(Handled::Unowned(other));
            }
        }
        Ok(Handled::Done(Flow::Continue))
    }
}

/// What the aggregation role hands back to the driving thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub counts: FrequencyMap,
    pub ranking: Vec<RankedEntry>,
}

/// Counts confirmed words, ranks them and starts the shutdown cascade
#[derive(Debug)]
pub struct Aggregation {
    top: usize,
    policy: RankPolicy,
    counts: FrequencyMap,
    ingestion: Option<RoleRef>,
    report: Sender<Report>,
}

impl Aggregation {
    /// Create an aggregation role that reports its ranking on `report`
    pub fn new(top: usize, policy: RankPolicy, report: Sender<Report>) -> Self {
        Self {
            top,
            policy,
            counts: FrequencyMap::new(),
            ingestion: None,
            report,
        }
    }
}

impl Role for Aggregation {
    const NAME: &'static str = "aggregation";

    fn forward_target(&self) -> Option<&RoleRef> {
        None
    }

    fn handle(&mut self, msg: Message, ctx: &Context<Message>) -> Result<Handled> {
        match msg {
            Message::Word(token) => self.counts.increment(&token),
            Message::Top25 { .. } => {
                let counts = std::mem::take(&mut self.counts);
                let ranking = rank(&counts, self.top, self.policy)?;
                debug!(
                    "{}: {} distinct tokens, {} counted",
                    Self::NAME,
                    counts.len(),
                    counts.total()
                );

                if self.report.send(Report { counts, ranking }).is_err() {
                    warn!("{}: nobody is waiting for the report", Self::NAME);
                }
                if let Some(ingestion) = &self.ingestion {
                    deliver(Self::NAME, ingestion, Message::Die)?;
                }
                return Ok(Handled::Done(Flow::Stop));
            }
            Message::Run { ingestion } => {
                trace!("{}: kicking off {}", Self::NAME, ingestion.name());
                deliver(
                    Self::NAME,
                    &ingestion,
                    Message::SendWordFreqs {
                        reply: ctx.self_ref(),
                    },
                )?;
                self.ingestion = Some(ingestion);
            }
            other => return Ok(Handled::Unowned(other)),
        }
        Ok(Handled::Done(Flow::Continue))
    }
}
