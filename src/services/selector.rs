use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Catalog, ContentItem, FeedMode, InterestProfile, SessionState};

/// Tuning for the feed selector
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorSettings {
    /// Items that must be shown before personalization can start
    pub min_profiling_videos: usize,
    /// Total profile score required before personalization can start
    pub min_engagement_total: f64,
    /// Number of top tags used to build candidates
    pub top_tag_count: usize,
    /// Share of the unseen pool added as low-weight exploration candidates
    pub exploration_ratio: f64,
    /// Multiplier on the uniform draw; values above 1 favor the front of the list
    pub skew_factor: f64,
    /// Seed topics, each a list of alternative tags tried in order
    pub seed_topics: Vec<Vec<String>>,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            min_profiling_videos: 6,
            min_engagement_total: 10.0,
            top_tag_count: 3,
            exploration_ratio: 0.3,
            skew_factor: 1.5,
            seed_topics: default_seed_topics(),
        }
    }
}

fn default_seed_topics() -> Vec<Vec<String>> {
    [
        vec!["funny"],
        vec!["conspiracy"],
        vec!["health"],
        vec!["tech"],
        vec!["music", "photography"],
    ]
    .into_iter()
    .map(|alternatives| alternatives.into_iter().map(String::from).collect())
    .collect()
}

/// Weighted entry in the personalized candidate list
#[derive(Debug, Clone, Copy)]
struct Candidate<'c> {
    item: &'c ContentItem,
    weight: f64,
}

/// Picks the next item to surface from the catalog
#[derive(Debug, Clone, Default)]
pub struct FeedSelector {
    settings: SelectorSettings,
}

impl FeedSelector {
    pub fn new(settings: SelectorSettings) -> Self {
        Self { settings }
    }

    /// Decides the mode for the next selection.
    ///
    /// Pure: depends only on the current mode, shown count and profile total.
    /// Personalizing never reverts to profiling.
    pub fn evaluate_mode(&self, current: FeedMode, shown_count: usize, profile_total: f64) -> FeedMode {
        match current {
            FeedMode::Personalizing => FeedMode::Personalizing,
            FeedMode::Profiling
                if shown_count >= self.settings.min_profiling_videos
                    && profile_total >= self.settings.min_engagement_total =>
            {
                FeedMode::Personalizing
            }
            FeedMode::Profiling => FeedMode::Profiling,
        }
    }

    /// Initial diverse items: the first catalog match for each seed topic
    pub fn seed<'c>(&self, catalog: &'c Catalog) -> Vec<&'c ContentItem> {
        let mut seeded: Vec<&ContentItem> = Vec::new();

        for alternatives in &self.settings.seed_topics {
            let found = alternatives
                .iter()
                .find_map(|tag| catalog.first_with_tag(tag));

            match found {
                Some(item) if !seeded.iter().any(|s| s.id == item.id) => seeded.push(item),
                Some(_) => {}
                None => tracing::debug!(topic = ?alternatives, "No catalog item for seed topic"),
            }
        }

        seeded
    }

    /// Selects the next unseen item, or `None` when the session is full or
    /// the catalog is exhausted
    pub fn select_next<'c, R: Rng + ?Sized>(
        &self,
        mode: FeedMode,
        catalog: &'c Catalog,
        state: &SessionState,
        profile: &InterestProfile,
        rng: &mut R,
    ) -> Option<&'c ContentItem> {
        if state.is_full() {
            return None;
        }

        let unseen: Vec<&ContentItem> = catalog
            .items()
            .iter()
            .filter(|item| !state.has_shown(item.id))
            .collect();

        if unseen.is_empty() {
            return None;
        }

        match mode {
            FeedMode::Profiling => unseen.choose(rng).copied(),
            FeedMode::Personalizing => self.select_personalized(&unseen, profile, rng),
        }
    }

    fn select_personalized<'c, R: Rng + ?Sized>(
        &self,
        unseen: &[&'c ContentItem],
        profile: &InterestProfile,
        rng: &mut R,
    ) -> Option<&'c ContentItem> {
        let candidates = self.build_candidates(unseen, profile, rng);

        if candidates.is_empty() {
            return unseen.choose(rng).copied();
        }

        let index = skewed_index(candidates.len(), self.settings.skew_factor, rng);
        let picked = candidates[index];

        tracing::debug!(
            candidates = candidates.len(),
            index,
            item_id = picked.item.id,
            weight = picked.weight,
            "Personalized selection"
        );

        Some(picked.item)
    }

    /// Top-tag candidates in descending tag score, followed by exploration picks
    fn build_candidates<'c, R: Rng + ?Sized>(
        &self,
        unseen: &[&'c ContentItem],
        profile: &InterestProfile,
        rng: &mut R,
    ) -> Vec<Candidate<'c>> {
        let mut candidates = Vec::new();

        for (tag, score) in profile.top_tags(self.settings.top_tag_count) {
            // An item matching several top tags is added once per tag
            candidates.extend(
                unseen
                    .iter()
                    .filter(|item| item.has_tag(tag))
                    .map(|item| Candidate { item: *item, weight: score }),
            );
        }

        let exploration = (unseen.len() as f64 * self.settings.exploration_ratio).floor() as usize;
        candidates.extend(
            unseen
                .choose_multiple(rng, exploration)
                .map(|item| Candidate { item: *item, weight: 1.0 }),
        );

        candidates
    }
}

/// Index drawn as `floor(u * skew * len)` for uniform `u` in [0, 1).
///
/// Draws past the end wrap around to the front, so with a skew of 1.5 the
/// first half of the list is twice as likely as the second.
fn skewed_index<R: Rng + ?Sized>(len: usize, skew: f64, rng: &mut R) -> usize {
    let scaled = (rng.gen::<f64>() * skew * len as f64).floor() as usize;
    scaled % len
}
