//! The single owner of the dataset, its session token, the current page and
//! per-record notification status. Lifecycle: empty -> populated -> empty.

use shared::domain::{NotificationStatus, Record, SessionToken};

use crate::{
    error::ActionError,
    pagination::{self, PAGE_SIZE},
};

#[derive(Debug)]
pub struct SessionStore {
    records: Vec<Record>,
    token: Option<SessionToken>,
    statuses: Vec<NotificationStatus>,
    current_page: usize,
    generation: u64,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            token: None,
            statuses: Vec::new(),
            current_page: 1,
            generation: 0,
        }
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces dataset and token together. Returns the new generation.
    pub fn set_dataset(&mut self, records: Vec<Record>, token: SessionToken) -> u64 {
        self.statuses = vec![NotificationStatus::Unsent; records.len()];
        self.records = records;
        self.token = Some(token);
        self.current_page = 1;
        self.generation += 1;
        self.generation
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.statuses.clear();
        self.token = None;
        self.current_page = 1;
        self.generation += 1;
    }

    pub fn require_token(&self) -> Result<&SessionToken, ActionError> {
        match &self.token {
            Some(token) if !self.records.is_empty() => Ok(token),
            _ => Err(ActionError::MissingSession),
        }
    }

    pub fn token(&self) -> Option<&SessionToken> {
        self.token.as_ref()
    }

    /// Bumped by every `set_dataset` and `clear`; used to drop late replies.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn checked_record(&self, index: usize) -> Result<&Record, ActionError> {
        self.records.get(index).ok_or(ActionError::InvalidIndex {
            index,
            len: self.records.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        pagination::page_count(self.records.len())
    }

    /// Clamps into `[1, page_count]` and returns the page actually selected.
    pub fn set_page(&mut self, page: usize) -> usize {
        self.current_page = pagination::clamp_page(page, self.page_count());
        self.current_page
    }

    pub fn next_page(&mut self) -> usize {
        self.set_page(self.current_page + 1)
    }

    pub fn previous_page(&mut self) -> usize {
        self.set_page(self.current_page.saturating_sub(1))
    }

    pub fn window(&self) -> &[Record] {
        pagination::window(&self.records, self.current_page)
    }

    /// Global index of a row on the current page, if that row exists.
    pub fn resolve_local(&self, local_index: usize) -> Option<usize> {
        if local_index >= PAGE_SIZE {
            return None;
        }
        let index = pagination::global_index(self.current_page, local_index);
        (index < self.records.len()).then_some(index)
    }

    pub fn status(&self, index: usize) -> Option<NotificationStatus> {
        self.statuses.get(index).copied()
    }

    pub fn statuses(&self) -> &[NotificationStatus] {
        &self.statuses
    }

    pub fn set_status(&mut self, index: usize, status: NotificationStatus) -> bool {
        match self.statuses.get_mut(index) {
            Some(slot) => {
                *slot = status;
                true
            }
            None => false,
        }
    }

    /// Moves `index` to `to` only while it is still `from`.
    pub fn transition(
        &mut self,
        index: usize,
        from: NotificationStatus,
        to: NotificationStatus,
    ) -> bool {
        match self.statuses.get_mut(index) {
            Some(slot) if *slot == from => {
                *slot = to;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
