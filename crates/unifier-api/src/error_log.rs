// Bounded diagnostic log of failed requests.
//
// Fixed-capacity FIFO: once full, the oldest entry is evicted before a new
// one is appended. Nothing in the session reads it back for control flow.

use std::collections::VecDeque;
use std::fmt;

use reqwest::Method;

/// Maximum number of entries retained by a session's error log.
pub const MAX_ERRORS: usize = 1000;

/// What went wrong with a recorded request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// The controller answered with a non-success HTTP status.
    Status { status: u16, body: String },
    /// HTTP succeeded but the envelope's `meta.rc` was not `"ok"`, or the
    /// body could not be decoded as an envelope.
    Application { rc: String, msg: Option<String> },
    /// The request never got a response.
    Transport(String),
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { status, body } => {
                let preview: String = body.chars().take(200).collect();
                write!(f, "HTTP {status}: {preview}")
            }
            Self::Application { rc, msg: Some(msg) } => write!(f, "rc={rc}: {msg}"),
            Self::Application { rc, msg: None } => write!(f, "rc={rc}"),
            Self::Transport(reason) => write!(f, "transport: {reason}"),
        }
    }
}

/// One failed request.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorEntry {
    pub url: String,
    pub method: Method,
    pub payload: Option<serde_json::Value>,
    pub failure: Failure,
}

/// Insertion-ordered ring of [`ErrorEntry`] values.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    entries: VecDeque<ErrorEntry>,
    capacity: usize,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self::with_capacity(MAX_ERRORS)
    }
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity.min(64)),
            capacity,
        }
    }

    /// Append an entry, evicting from the front while full.
    pub fn push(&mut self, entry: ErrorEntry) {
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recently recorded entry.
    pub fn latest(&self) -> Option<&ErrorEntry> {
        self.entries.back()
    }

    /// Entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter()
    }
}
