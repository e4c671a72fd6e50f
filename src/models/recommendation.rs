use serde::Serialize;

use super::{EventCandidate, EventId};

/// Which signal produced a recommendation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationSource {
    Remote,
    Collaborative,
    Fallback,
}

/// A scored event returned to the CRUD layer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub event: EventCandidate,
    /// In [0, 1]
    pub score: f64,
    pub source: RecommendationSource,
}

impl Recommendation {
    pub fn new(event: EventCandidate, score: f64, source: RecommendationSource) -> Self {
        Self {
            event,
            score,
            source,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event.id
    }
}

/// Sorts by score, highest first, keeping the existing order between equal scores
pub fn sort_by_score_desc(recommendations: &mut [Recommendation]) {
    recommendations.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}
