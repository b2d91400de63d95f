use serde::{Deserialize, Serialize};

use super::content::thumbnail_url;
use super::{ContentItem, InterestProfile};

/// One feed history entry in the hand-off record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u32,
    #[serde(alias = "videoId")]
    pub media_ref: String,
    pub title: String,
    #[serde(default, alias = "hashtags")]
    pub tags: Vec<String>,
}

impl HistoryEntry {
    pub fn thumbnail_url(&self) -> String {
        thumbnail_url(&self.media_ref)
    }
}

impl From<&ContentItem> for HistoryEntry {
    fn from(item: &ContentItem) -> Self {
        Self {
            id: item.id,
            media_ref: item.media_ref.clone(),
            title: item.title.clone(),
            tags: item.tags.clone(),
        }
    }
}

/// Final profile and feed history handed to the summarizer at session end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub engagement: InterestProfile,
    pub feed_history: Vec<HistoryEntry>,
}

impl SessionSnapshot {
    pub fn new(profile: &InterestProfile, history: &[ContentItem]) -> Self {
        Self {
            engagement: profile.clone(),
            feed_history: history.iter().map(HistoryEntry::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_wire_format() {
        let mut profile = InterestProfile::new();
        profile.add("dogs", 10.0);
        let items = vec![ContentItem::new(4, "UhVc3B-OQIs", "Dogs", "@doggo", &["dogs"])];

        let snapshot = SessionSnapshot::new(&profile, &items);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["engagement"]["dogs"], 10.0);
        assert_eq!(json["feedHistory"][0]["id"], 4);
        assert_eq!(json["feedHistory"][0]["mediaRef"], "UhVc3B-OQIs");
        assert_eq!(json["feedHistory"][0]["tags"][0], "dogs");
    }

    #[test]
    fn test_snapshot_accepts_source_field_names() {
        let json = r#"{
            "engagement": {"funny": 15},
            "feedHistory": [{"id": 1, "videoId": "abc", "title": "T", "hashtags": ["funny"]}]
        }"#;
        let snapshot: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.feed_history[0].media_ref, "abc");
        assert_eq!(snapshot.feed_history[0].tags, vec!["funny"]);
    }
}
