use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// Kind of engagement a viewer had with an item
///
/// Parsing is total: strings that name no known kind become `Other` and are
/// scored with the fallback weight instead of being rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EngagementKind {
    Like,
    Comment,
    Share,
    /// Item stayed in view past the dwell threshold
    LongView,
    /// Item played through to its natural end
    CompletedView,
    Other(String),
}

impl EngagementKind {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "like" => EngagementKind::Like,
            "comment" => EngagementKind::Comment,
            "share" => EngagementKind::Share,
            "long_view" | "longView" | "long_watch" => EngagementKind::LongView,
            "completed_view" | "completedView" => EngagementKind::CompletedView,
            other => EngagementKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EngagementKind::Like => "like",
            EngagementKind::Comment => "comment",
            EngagementKind::Share => "share",
            EngagementKind::LongView => "long_view",
            EngagementKind::CompletedView => "completed_view",
            EngagementKind::Other(raw) => raw,
        }
    }
}

impl Display for EngagementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for EngagementKind {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl Serialize for EngagementKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EngagementKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Score added to each tag of an item per engagement kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngagementWeights {
    pub like: f64,
    pub comment: f64,
    pub share: f64,
    pub long_view: f64,
    /// Strongest voluntary-attention signal
    pub completed_view: f64,
    /// Used for any kind outside the known set
    pub fallback: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        Self {
            like: 3.0,
            comment: 4.0,
            share: 3.0,
            long_view: 1.0,
            completed_view: 7.0,
            fallback: 1.0,
        }
    }
}

impl EngagementWeights {
    pub fn weight(&self, kind: &EngagementKind) -> f64 {
        match kind {
            EngagementKind::Like => self.like,
            EngagementKind::Comment => self.comment,
            EngagementKind::Share => self.share,
            EngagementKind::LongView => self.long_view,
            EngagementKind::CompletedView => self.completed_view,
            EngagementKind::Other(_) => self.fallback,
        }
    }
}

/// A single engagement signal routed from the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub item_id: u32,
    pub kind: EngagementKind,
}
