use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Errors raised while building a catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog is empty")]
    Empty,

    #[error("Duplicate content id: {0}")]
    DuplicateId(u32),

    #[error("Content item {0} has no tags")]
    MissingTags(u32),

    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A short video in the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Unique identifier within the catalog
    pub id: u32,
    /// External media reference (a YouTube video id)
    #[serde(alias = "videoId")]
    pub media_ref: String,
    /// Display title
    pub title: String,
    /// Author handle (e.g., "@catlover")
    #[serde(default)]
    pub author: String,
    /// Topic tags, stored without a leading '#'
    #[serde(alias = "hashtags")]
    pub tags: Vec<String>,
}

impl ContentItem {
    /// Creates a new content item, normalizing its tags
    pub fn new(id: u32, media_ref: &str, title: &str, author: &str, tags: &[&str]) -> Self {
        Self {
            id,
            media_ref: media_ref.to_string(),
            title: title.to_string(),
            author: author.to_string(),
            tags: normalize_tags(tags.iter().copied()),
        }
    }

    /// Checks if the item carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Thumbnail image for a media reference
pub fn thumbnail_url(media_ref: &str) -> String {
    format!("https://img.youtube.com/vi/{}/0.jpg", media_ref)
}

/// Strips surrounding whitespace and a leading '#'
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().trim_start_matches('#').to_string()
}

/// Normalizes a tag list into a set, keeping first-seen order and dropping blanks
pub fn normalize_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags.into_iter().map(normalize_tag) {
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

/// Fixed, ordered pool of selectable content
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct Catalog {
    items: Vec<ContentItem>,
}

impl Catalog {
    /// Builds a catalog, rejecting empty pools, duplicate ids and untagged items
    pub fn new(items: Vec<ContentItem>) -> Result<Self, CatalogError> {
        if items.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut ids = HashSet::new();
        let mut normalized = Vec::with_capacity(items.len());
        for mut item in items {
            if !ids.insert(item.id) {
                return Err(CatalogError::DuplicateId(item.id));
            }
            item.tags = normalize_tags(item.tags.iter().map(String::as_str));
            if item.tags.is_empty() {
                return Err(CatalogError::MissingTags(item.id));
            }
            normalized.push(item);
        }

        Ok(Self { items: normalized })
    }

    /// Loads a catalog from a JSON array of content items
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let items: Vec<ContentItem> = serde_json::from_str(&raw)?;
        Self::new(items)
    }

    /// The demo catalog shipped with the simulation
    pub fn builtin() -> Self {
        let items = vec![
            // Neutral, popular content
            ContentItem::new(1, "8_4-Qa2a_Cg", "Cute Cat Video", "@catlover", &["animals", "funny", "cute"]),
            ContentItem::new(2, "v4pi1LxuDHc", "Amazing Travel Destination", "@wanderlust", &["travel", "nature", "adventure"]),
            ContentItem::new(3, "3G1PFLuTrgM", "Simple Cooking Recipe", "@cheflife", &["food", "cooking", "recipe"]),
            ContentItem::new(4, "UhVc3B-OQIs", "Ranking The Best Slow Motion Dogs", "@doggo", &["funny", "pets", "dogs"]),
            ContentItem::new(5, "0tng6DqwT3w", "Ranking Dramatic Husky Moments", "@doggo", &["funny", "pets", "dogs"]),
            // Niche topics
            ContentItem::new(6, "6_pru8U2RmM", "New Tech Gadgets", "@techie", &["tech", "gadgets", "future"]),
            ContentItem::new(7, "5qap5aO4i9A", "Stock Market Tips", "@investpro", &["finance", "stocks", "investing"]),
            ContentItem::new(8, "kJQP7kiw5Fk", "Morning Stretch Routine", "@fitfirst", &["health", "fitness", "wellness"]),
            ContentItem::new(9, "yPYZpwSpKmA", "Street Photography Tips", "@lensup", &["photography", "art", "city"]),
            ContentItem::new(10, "JGwWNGJdvx8", "Lo-fi Beat From Scratch", "@beatlab", &["music", "production", "chill"]),
            ContentItem::new(11, "2Vv-BfVoq4g", "Foods That Boost Your Immune System", "@nutritionist", &["health", "food", "wellness"]),
            // Rabbit-hole content
            ContentItem::new(12, "a_jt1h_d4yM", "Is AI Taking Over?", "@futurescope", &["tech", "ai", "danger"]),
            ContentItem::new(13, "Y_plhkz34II", "The Truth About Area 51", "@conspiracyfiles", &["conspiracy", "aliens", "secret"]),
            ContentItem::new(14, "OPEE7s0-u8s", "Simulation Theory Explained", "@deepthinker", &["conspiracy", "philosophy", "reality"]),
            ContentItem::new(15, "l_a_qR4Xq_I", "Financial System is a Scam?", "@truthseeker", &["finance", "conspiracy", "money"]),
            ContentItem::new(16, "hT_nvWreIhg", "What They Don't Tell You About Vitamins", "@truthseeker", &["health", "conspiracy", "secret"]),
            ContentItem::new(17, "RgKAFK5djSk", "AI Robots Are Already Here", "@futurescope", &["ai", "danger", "future"]),
            ContentItem::new(18, "fJ9rUzIMcZQ", "Dogs Can Sense Earthquakes?", "@doggo", &["dogs", "nature", "secret"]),
        ];

        Self { items }
    }

    pub fn items(&self) -> &[ContentItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// First item in catalog order carrying the tag
    pub fn first_with_tag(&self, tag: &str) -> Option<&ContentItem> {
        self.items.iter().find(|item| item.has_tag(tag))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
