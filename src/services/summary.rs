use serde::Serialize;

use crate::models::{HistoryEntry, InterestProfile, SessionSnapshot};

/// Number of tags listed in the wrapped view
const TOP_TAG_LIMIT: usize = 5;
/// Tags inspected when naming the dominant bias
const BIAS_TAG_WINDOW: usize = 3;
/// 1-based feed positions shown as snapshots
const SNAPSHOT_POSITIONS: [usize; 3] = [1, 5, 10];
/// Tags that mark a slide into fringe content
const RABBIT_HOLE_TAGS: [&str; 4] = ["conspiracy", "danger", "secret", "aliens"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TagShare {
    pub tag: String,
    pub score: f64,
    /// Fraction of total engagement, 0 when there is none
    pub share: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedSnapshot {
    pub position: usize,
    pub id: u32,
    pub title: String,
    pub thumbnail_url: String,
}

/// End-of-session summary of how the feed was biased
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WrappedSummary {
    pub dominant_bias: String,
    pub top_tags: Vec<TagShare>,
    pub snapshots: Vec<FeedSnapshot>,
    pub total_engagement: f64,
    pub videos_watched: usize,
    /// True when the hand-off data was missing or unreadable
    pub placeholder: bool,
}

impl WrappedSummary {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self::build(snapshot, false)
    }

    /// Summarizes a serialized hand-off record.
    ///
    /// Missing or corrupt data never fails: it yields the placeholder summary.
    pub fn from_json(raw: Option<&str>) -> Self {
        let parsed = raw.map(serde_json::from_str::<SessionSnapshot>);

        match parsed {
            Some(Ok(snapshot)) => Self::build(&snapshot, false),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Corrupt session hand-off, showing placeholder summary");
                Self::build(&placeholder_snapshot(), true)
            }
            None => {
                tracing::info!("No session hand-off found, showing placeholder summary");
                Self::build(&placeholder_snapshot(), true)
            }
        }
    }

    fn build(snapshot: &SessionSnapshot, placeholder: bool) -> Self {
        let total = snapshot.engagement.total();

        let top_tags = snapshot
            .engagement
            .top_tags(TOP_TAG_LIMIT)
            .into_iter()
            .map(|(tag, score)| TagShare {
                tag: tag.to_string(),
                score,
                share: if total > 0.0 { score / total } else { 0.0 },
            })
            .collect();

        let snapshots = SNAPSHOT_POSITIONS
            .iter()
            .filter_map(|&position| {
                snapshot
                    .feed_history
                    .get(position - 1)
                    .map(|entry| feed_snapshot(position, entry))
            })
            .collect();

        Self {
            dominant_bias: dominant_bias(&snapshot.engagement).to_string(),
            top_tags,
            snapshots,
            total_engagement: total,
            videos_watched: snapshot.feed_history.len(),
            placeholder,
        }
    }
}

fn feed_snapshot(position: usize, entry: &HistoryEntry) -> FeedSnapshot {
    FeedSnapshot {
        position,
        id: entry.id,
        title: entry.title.clone(),
        thumbnail_url: entry.thumbnail_url(),
    }
}

fn dominant_bias(profile: &InterestProfile) -> &'static str {
    if profile.total() <= 0.0 {
        return "No Bias Detected";
    }

    let fringe = profile
        .top_tags(BIAS_TAG_WINDOW)
        .iter()
        .any(|(tag, _)| RABBIT_HOLE_TAGS.contains(tag));

    if fringe {
        "Rabbit Hole"
    } else {
        "Confirmation Bias"
    }
}

/// Sample data shown when no session has been handed off
fn placeholder_snapshot() -> SessionSnapshot {
    let mut engagement = InterestProfile::new();
    engagement.add("funny", 15.0);
    engagement.add("pets", 12.0);
    engagement.add("news", 3.0);
    engagement.add("dogs", 8.0);

    let entry = |id: u32, media_ref: &str, title: &str| HistoryEntry {
        id,
        media_ref: media_ref.to_string(),
        title: title.to_string(),
        tags: vec!["funny".to_string(), "pets".to_string(), "dogs".to_string()],
    };

    SessionSnapshot {
        engagement,
        feed_history: vec![
            entry(1, "UhVc3B-OQIs", "Ranking The Best Slow Motion Dogs"),
            entry(2, "0tng6DqwT3w", "Ranking Dramatic Husky Moments"),
        ],
    }
}
