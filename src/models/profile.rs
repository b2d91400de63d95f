use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Accumulated interest per topic tag
///
/// Tags keep the order in which they were first scored. That order breaks
/// ties in `top_tags`, so selection stays reproducible for a fixed profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterestProfile {
    scores: Vec<(String, f64)>,
}

impl InterestProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Score for a tag; absent tags score 0
    pub fn score(&self, tag: &str) -> f64 {
        self.scores
            .iter()
            .find(|(t, _)| t == tag)
            .map(|(_, s)| *s)
            .unwrap_or(0.0)
    }

    /// Adds to a tag's score, inserting it at 0 first if absent.
    /// Negative or non-finite amounts are ignored.
    pub fn add(&mut self, tag: &str, amount: f64) {
        if !amount.is_finite() || amount < 0.0 {
            return;
        }
        match self.scores.iter_mut().find(|(t, _)| t == tag) {
            Some((_, score)) => *score += amount,
            None => self.scores.push((tag.to_string(), amount)),
        }
    }

    /// Sum of all scores
    pub fn total(&self) -> f64 {
        self.scores.iter().map(|(_, s)| s).sum()
    }

    /// Highest-scoring tags, descending, ties in first-seen order
    pub fn top_tags(&self, n: usize) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .scores
            .iter()
            .map(|(t, s)| (t.as_str(), *s))
            .collect();
        // sort_by is stable, so equal scores keep insertion order
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked.truncate(n);
        ranked
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(t, s)| (t.as_str(), *s))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

impl Serialize for InterestProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (tag, score) in self.iter() {
            map.serialize_entry(tag, &score)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for InterestProfile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ProfileVisitor)
    }
}

struct ProfileVisitor;

impl<'de> Visitor<'de> for ProfileVisitor {
    type Value = InterestProfile;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of tag to score")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut profile = InterestProfile::new();
        while let Some((tag, value)) = access.next_entry::<String, serde_json::Value>()? {
            // Malformed scores count as 0 rather than failing the whole profile
            let score = value.as_f64().filter(|s| s.is_finite() && *s >= 0.0).unwrap_or(0.0);
            profile.add(&tag, score);
        }
        Ok(profile)
    }
}
