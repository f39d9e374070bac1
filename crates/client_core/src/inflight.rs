//! One outstanding request per `(operation, target)` pair.

use std::{
    collections::HashSet,
    fmt,
    sync::{Arc, Mutex, PoisonError},
};

use crate::error::ActionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Upload,
    GenerateOne,
    GenerateAll,
    NotifyOne,
    NotifyAll,
}

impl Operation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::GenerateOne => "generate_one",
            Self::GenerateAll => "generate_all",
            Self::NotifyOne => "notify_one",
            Self::NotifyAll => "notify_all",
        }
    }

    /// Shown when the service reply cannot be read.
    pub fn fallback_error(self) -> &'static str {
        match self {
            Self::Upload => "An unexpected error occurred. Please try again.",
            Self::GenerateOne => "Failed to generate PDF",
            Self::GenerateAll => "Failed to generate PDFs",
            Self::NotifyOne => "Failed to send email",
            Self::NotifyAll => "Failed to send emails",
        }
    }

    pub fn busy_label(self) -> &'static str {
        match self {
            Self::Upload => "Uploading and processing file...",
            Self::GenerateOne => "Generating PDF...",
            Self::GenerateAll => "Generating all PDFs and creating ZIP file...",
            Self::NotifyOne => "Sending email...",
            Self::NotifyAll => "Sending emails to all students...",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Index(usize),
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActionKey {
    pub operation: Operation,
    pub target: Target,
}

impl ActionKey {
    pub fn one(operation: Operation, index: usize) -> Self {
        Self {
            operation,
            target: Target::Index(index),
        }
    }

    pub fn all(operation: Operation) -> Self {
        Self {
            operation,
            target: Target::All,
        }
    }
}

impl fmt::Display for ActionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.target {
            Target::Index(index) => write!(f, "{}[{index}]", self.operation.as_str()),
            Target::All => write!(f, "{}[*]", self.operation.as_str()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    keys: Arc<Mutex<HashSet<ActionKey>>>,
}

impl InFlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `key` until the returned guard is dropped.
    pub fn try_acquire(&self, key: ActionKey) -> Result<InFlightGuard, ActionError> {
        let mut keys = self.keys.lock().unwrap_or_else(PoisonError::into_inner);
        if !keys.insert(key) {
            return Err(ActionError::Busy { key });
        }
        Ok(InFlightGuard {
            keys: Arc::clone(&self.keys),
            key,
        })
    }

    pub fn is_in_flight(&self, key: ActionKey) -> bool {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&key)
    }

    pub fn len(&self) -> usize {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct InFlightGuard {
    keys: Arc<Mutex<HashSet<ActionKey>>>,
    key: ActionKey,
}

impl InFlightGuard {
    pub fn key(&self) -> ActionKey {
        self.key
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.key);
    }
}

#[cfg(test)]
#[path = "tests/inflight_tests.rs"]
mod tests;
