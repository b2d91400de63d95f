use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{
    Catalog, ContentItem, EngagementEvent, EngagementKind, EngagementWeights, FeedMode,
    InterestProfile, SessionSnapshot, SessionState,
};

use super::selector::{FeedSelector, SelectorSettings};
use super::tracker::EngagementTracker;

/// Errors raised by session operations
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("Content item {0} is not in the catalog")]
    UnknownItem(u32),

    #[error("Content item {0} has not been shown in this session")]
    NotInFeed(u32),
}

/// Everything needed to run a feed session
#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub selector: SelectorSettings,
    pub weights: EngagementWeights,
    /// Session ends after this many items
    pub max_videos: usize,
    /// Visibility required before a long view is credited
    pub dwell_threshold: Duration,
    /// Fixed RNG seed for reproducible sessions
    pub rng_seed: Option<u64>,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            selector: SelectorSettings::default(),
            weights: EngagementWeights::default(),
            max_videos: 10,
            dwell_threshold: Duration::from_secs(3),
            rng_seed: None,
        }
    }
}

/// One viewer's isolated feed session
///
/// Owns the profile and feed history. Engagements apply in the order they
/// are received and every selection sees the profile as of the last one.
#[derive(Debug)]
pub struct FeedSession {
    catalog: Arc<Catalog>,
    selector: FeedSelector,
    tracker: EngagementTracker,
    state: SessionState,
    profile: InterestProfile,
    mode: FeedMode,
    focused: Option<u32>,
    rng: StdRng,
    started_at: DateTime<Utc>,
}

impl FeedSession {
    pub fn new(catalog: Arc<Catalog>, settings: &FeedSettings) -> Self {
        let rng = match settings.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            catalog,
            selector: FeedSelector::new(settings.selector.clone()),
            tracker: EngagementTracker::new(settings.weights),
            state: SessionState::new(settings.max_videos),
            profile: InterestProfile::new(),
            mode: FeedMode::Profiling,
            focused: None,
            rng,
            started_at: Utc::now(),
        }
    }

    /// Shows the seed items. Does nothing once the feed has items.
    pub fn start(&mut self) -> Vec<ContentItem> {
        if self.state.shown_count() > 0 {
            return Vec::new();
        }

        let seeds: Vec<ContentItem> = self
            .selector
            .seed(&self.catalog)
            .into_iter()
            .take(self.state.max_videos)
            .cloned()
            .collect();

        for item in &seeds {
            self.state.push(item.clone());
        }

        tracing::info!(
            seeded = seeds.len(),
            ids = ?seeds.iter().map(|i| i.id).collect::<Vec<_>>(),
            "Feed seeded"
        );

        seeds
    }

    /// Selects and shows the next item, or `None` at the end of the session
    pub fn next_item(&mut self) -> Option<ContentItem> {
        let next_mode = self
            .selector
            .evaluate_mode(self.mode, self.state.shown_count(), self.profile.total());

        if next_mode != self.mode {
            tracing::info!(
                shown = self.state.shown_count(),
                profile_total = self.profile.total(),
                "Profiling complete, personalizing feed"
            );
            self.mode = next_mode;
            self.state.profiling_complete = true;
        }

        let item = self
            .selector
            .select_next(self.mode, &self.catalog, &self.state, &self.profile, &mut self.rng)?
            .clone();

        self.state.push(item.clone());

        tracing::debug!(
            item_id = item.id,
            mode = ?self.mode,
            shown = self.state.shown_count(),
            "Item selected"
        );

        if self.state.is_full() {
            tracing::info!(shown = self.state.shown_count(), "Session reached its item limit");
        }

        Some(item)
    }

    /// Selects up to `count` further items, stopping early at the end of the session
    pub fn fill_window(&mut self, count: usize) -> Vec<ContentItem> {
        let remaining = self.state.max_videos.saturating_sub(self.state.shown_count());
        let mut items = Vec::new();
        for _ in 0..count.min(remaining) {
            match self.next_item() {
                Some(item) => items.push(item),
                None => break,
            }
        }
        items
    }

    /// Routes an engagement to the tracker, returning the applied weight
    pub fn record(&mut self, item_id: u32, kind: &EngagementKind) -> Result<f64, SessionError> {
        let item = self
            .catalog
            .get(item_id)
            .ok_or(SessionError::UnknownItem(item_id))?;

        Ok(self.tracker.record_engagement(&mut self.profile, item, kind))
    }

    /// Applies an engagement event routed from the host
    pub fn apply(&mut self, event: &EngagementEvent) -> Result<f64, SessionError> {
        self.record(event.item_id, &event.kind)
    }

    /// Marks a shown item as the one in view
    pub fn focus(&mut self, item_id: u32) -> Result<(), SessionError> {
        if self.catalog.get(item_id).is_none() {
            return Err(SessionError::UnknownItem(item_id));
        }

        self.state
            .move_cursor_to(item_id)
            .ok_or(SessionError::NotInFeed(item_id))?;

        self.focused = Some(item_id);
        Ok(())
    }

    /// Clears the focused item, returning what was focused
    pub fn blur(&mut self) -> Option<u32> {
        self.focused.take()
    }

    /// Credits a long view if the item is still in focus.
    /// A dwell timer that lost a race with a focus change is a no-op.
    pub fn record_dwell(&mut self, item_id: u32) -> bool {
        if self.focused != Some(item_id) {
            return false;
        }
        self.record(item_id, &EngagementKind::LongView).is_ok()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_full() || self.state.shown_count() >= self.catalog.len()
    }

    /// Hand-off record for the summarizer
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(&self.profile, self.state.history())
    }

    pub fn mode(&self) -> FeedMode {
        self.mode
    }

    pub fn profile(&self) -> &InterestProfile {
        &self.profile
    }

    pub fn history(&self) -> &[ContentItem] {
        self.state.history()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn focused(&self) -> Option<u32> {
        self.focused
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
