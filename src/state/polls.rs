//! Poll-list state for the home, my-polls, and voted-polls views.
//!
//! SYSTEM CONTEXT
//! ==============
//! The backend owns vote counting and voter deduplication. After a vote,
//! vote removal, or edit it answers with the full updated poll, which replaces
//! the local copy by id; deletes drop the local copy. Lists are never
//! re-fetched just to reflect the caller's own change.

#[cfg(test)]
#[path = "polls_test.rs"]
mod polls_test;

use serde::{Deserialize, Serialize};

use crate::net::types::{Poll, PollOption};
use crate::util::storage::{KeyValueStore, load_json, save_json};

/// Fewest options a poll may carry.
pub const MIN_OPTIONS: usize = 2;
/// Most options a poll may carry.
pub const MAX_OPTIONS: usize = 10;
/// Storage key for the unsent create-poll form.
pub const CREATE_DRAFT_KEY: &str = "pollhub.create_poll.draft";

/// Shared poll list state for one listing view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PollsState {
    pub items: Vec<Poll>,
    pub loading: bool,
    pub error: Option<String>,
}

impl PollsState {
    /// State for a view that is about to fetch.
    pub fn loading() -> Self {
        Self { loading: true, ..Self::default() }
    }
}

/// Swap in the server's copy of a poll. Unknown ids leave `items` unchanged.
/// Returns whether a poll was replaced.
pub fn replace_poll(items: &mut [Poll], updated: Poll) -> bool {
    match items.iter_mut().find(|p| p.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            true
        }
        None => false,
    }
}

/// Drop a deleted poll. Returns whether anything was removed.
pub fn remove_poll(items: &mut Vec<Poll>, poll_id: &str) -> bool {
    let before = items.len();
    items.retain(|p| p.id != poll_id);
    items.len() != before
}

impl Poll {
    /// Share of the total vote for `option`, in percent with one decimal.
    #[allow(clippy::cast_precision_loss)]
    pub fn option_percentage(&self, option: &PollOption) -> f64 {
        if self.total_votes == 0 {
            return 0.0;
        }
        (option.votes as f64 / self.total_votes as f64 * 1000.0).round() / 10.0
    }

    /// Option chosen by `user_id`, from `userVote` or the per-option voter lists.
    pub fn voted_option(&self, user_id: &str) -> Option<&PollOption> {
        if let Some(choice) = self.user_vote.as_deref() {
            if let Some(option) = self.options.iter().find(|o| o.id == choice) {
                return Some(option);
            }
        }
        if user_id.is_empty() {
            return None;
        }
        self.options.iter().find(|o| o.voters.iter().any(|v| v == user_id))
    }

    pub fn has_voted(&self, user_id: &str) -> bool {
        (!user_id.is_empty() && self.voted_by.iter().any(|v| v == user_id)) || self.voted_option(user_id).is_some()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        !user_id.is_empty() && self.created_by.as_ref().is_some_and(|c| c.id == user_id)
    }

    /// First image, falling back to the legacy single-image field.
    pub fn primary_image_url(&self) -> Option<&str> {
        self.images
            .first()
            .or(self.image.as_ref())
            .map(|img| img.url.as_str())
            .filter(|url| !url.is_empty())
    }

    pub fn author_name(&self) -> &str {
        self.created_by
            .as_ref()
            .and_then(|c| c.username.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or("Anonymous")
    }
}

/// Rejected poll form input. Display text is shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollFormError {
    #[error("Poll question cannot be empty.")]
    EmptyQuestion,
    #[error("Please provide at least two valid options.")]
    TooFewOptions,
    #[error("You can add a maximum of {MAX_OPTIONS} options.")]
    TooManyOptions,
}

/// Question and option texts as typed into the create or edit form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDraft {
    pub question: String,
    pub options: Vec<String>,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self { question: String::new(), options: vec![String::new(); MIN_OPTIONS] }
    }
}

impl PollDraft {
    /// Pre-fill an edit form from an existing poll.
    pub fn from_poll(poll: &Poll) -> Self {
        Self { question: poll.question.clone(), options: poll.options.iter().map(|o| o.text.clone()).collect() }
    }

    /// Append a blank option row, up to the limit.
    ///
    /// # Errors
    ///
    /// Returns `TooManyOptions` when the draft is already full.
    pub fn add_option(&mut self) -> Result<(), PollFormError> {
        if self.options.len() >= MAX_OPTIONS {
            return Err(PollFormError::TooManyOptions);
        }
        self.options.push(String::new());
        Ok(())
    }

    /// Remove an option row, never going below the minimum.
    ///
    /// # Errors
    ///
    /// Returns `TooFewOptions` when removal would leave too few rows.
    pub fn remove_option(&mut self, index: usize) -> Result<(), PollFormError> {
        if self.options.len() <= MIN_OPTIONS {
            return Err(PollFormError::TooFewOptions);
        }
        if index < self.options.len() {
            self.options.remove(index);
        }
        Ok(())
    }

    /// Trimmed copy ready to send, with blank options dropped.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks.
    pub fn validated(&self) -> Result<Self, PollFormError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(PollFormError::EmptyQuestion);
        }
        let options: Vec<String> =
            self.options.iter().map(|o| o.trim()).filter(|o| !o.is_empty()).map(str::to_owned).collect();
        if options.len() < MIN_OPTIONS {
            return Err(PollFormError::TooFewOptions);
        }
        if options.len() > MAX_OPTIONS {
            return Err(PollFormError::TooManyOptions);
        }
        Ok(Self { question: question.to_owned(), options })
    }
}

/// Saved create-poll draft, if one parses. Blank drafts count as absent.
pub fn load_draft(store: &dyn KeyValueStore) -> Option<PollDraft> {
    load_json::<PollDraft>(store, CREATE_DRAFT_KEY).filter(|d| *d != PollDraft::default())
}

/// Persist the draft; a blank draft clears the key.
pub fn save_draft(store: &dyn KeyValueStore, draft: &PollDraft) {
    if *draft == PollDraft::default() {
        clear_draft(store);
    } else {
        save_json(store, CREATE_DRAFT_KEY, draft);
    }
}

pub fn clear_draft(store: &dyn KeyValueStore) {
    store.remove(CREATE_DRAFT_KEY);
}
