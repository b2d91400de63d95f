use crate::models::{ContentItem, EngagementKind, EngagementWeights, InterestProfile};

/// Converts engagement signals into interest scores
///
/// Every tag on the engaged item receives the full weight for the kind.
/// There is no normalization by tag count, so items with many tags reinforce
/// all of them at once.
#[derive(Debug, Clone, Default)]
pub struct EngagementTracker {
    weights: EngagementWeights,
}

impl EngagementTracker {
    pub fn new(weights: EngagementWeights) -> Self {
        Self { weights }
    }

    /// Applies an engagement to the profile and returns the weight used
    pub fn record_engagement(
        &self,
        profile: &mut InterestProfile,
        item: &ContentItem,
        kind: &EngagementKind,
    ) -> f64 {
        let weight = self.weights.weight(kind);
        for tag in &item.tags {
            profile.add(tag, weight);
        }

        tracing::debug!(
            item_id = item.id,
            kind = %kind,
            weight,
            tags = ?item.tags,
            profile_total = profile.total(),
            "Engagement recorded"
        );

        weight
    }
}
