use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::ContentItem;

/// Selection policy a session is currently running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedMode {
    /// Cold start: uniform random over unseen items
    Profiling,
    /// Profile-weighted selection; terminal for the session
    Personalizing,
}

/// Feed history and bookkeeping for one session
#[derive(Debug, Clone)]
pub struct SessionState {
    history: Vec<ContentItem>,
    shown_ids: HashSet<u32>,
    cursor: usize,
    pub profiling_complete: bool,
    pub max_videos: usize,
}

impl SessionState {
    pub fn new(max_videos: usize) -> Self {
        Self {
            history: Vec::new(),
            shown_ids: HashSet::new(),
            cursor: 0,
            profiling_complete: false,
            max_videos,
        }
    }

    /// Appends an item to the feed history.
    /// Returns false, leaving history untouched, if the item was already shown.
    pub fn push(&mut self, item: ContentItem) -> bool {
        if !self.shown_ids.insert(item.id) {
            return false;
        }
        self.history.push(item);
        true
    }

    pub fn has_shown(&self, id: u32) -> bool {
        self.shown_ids.contains(&id)
    }

    pub fn shown_count(&self) -> usize {
        self.history.len()
    }

    /// True once the configured maximum has been shown
    pub fn is_full(&self) -> bool {
        self.history.len() >= self.max_videos
    }

    pub fn history(&self) -> &[ContentItem] {
        &self.history
    }

    /// Index of the item the viewer is currently on
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Points the cursor at a shown item, returning its position.
    /// Unshown ids leave the cursor where it is.
    pub fn move_cursor_to(&mut self, id: u32) -> Option<usize> {
        let position = self.history.iter().position(|item| item.id == id)?;
        self.cursor = position;
        Some(position)
    }
}
