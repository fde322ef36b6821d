//! Message vocabulary of the actor pipeline
//!
//! ```text
//! tag               payload               meaning
//! init              Setup                 role-specific setup
//! send_word_freqs   reply: RoleRef        trigger the ingestion pass
//! filter            token                 candidate for the stop-word check
//! word              token                 confirmed non-stop token
//! top25             reply: RoleRef        trigger ranking
//! run               ingestion: RoleRef    kick off the pipeline
//! die               -                     processed, then stops the recipient
//! ```

use super::mailbox::ActorRef;
use std::path::PathBuf;

/// Reference to any role of the pipeline
pub type RoleRef = ActorRef<Message>;

/// Messages whose tag the runtime needs to inspect
pub trait Tagged {
    /// Stable wire-style name of the message kind
    fn tag(&self) -> &'static str;

    /// Whether the recipient stops after dispatching this message
    fn is_terminal(&self) -> bool;
}

/// One message of the pipeline protocol
#[derive(Debug)]
pub enum Message {
    Init(Setup),
    SendWordFreqs { reply: RoleRef },
    Filter(String),
    Word(String),
    Top25 { reply: RoleRef },
    Run { ingestion: RoleRef },
    Die,
}

/// Payload of `init`, one shape per role that needs setup
#[derive(Debug)]
pub enum Setup {
    /// Load and tokenize `path`, then stream candidates to `filter`
    Ingestion { path: PathBuf, filter: RoleRef },
    /// Load the stop words and pass survivors to `aggregator`
    Filtering { aggregator: RoleRef },
}

impl Tagged for Message {
    fn tag(&self) -> &'static str {
        match self {
            Message::Init(_) => "init",
            Message::SendWordFreqs { .. } => "send_word_freqs",
            Message::Filter(_) => "filter",
            Message::Word(_) => "word",
            Message::Top25 { .. } => "top25",
            Message::Run { .. } => "run",
            Message::Die => "die",
        }
    }

    fn is_terminal(&self) -> bool {
        matches!(self, Message::Die)
    }
}
