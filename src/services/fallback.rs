//! Fallback ranking from locally available signals
//!
//! Used when the remote ranker and collaborative filtering together do not
//! produce enough recommendations. Depends on nothing but the candidate list and
//! the user's interests.
//!
//! Score = 0.4 × interest match + 0.3 × popularity + 0.3 × exp(-0.05 × days since created)

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    models::{
        recommendation::sort_by_score_desc, EventCandidate, EventId, InterestMap,
        Recommendation, RecommendationSource,
    },
    services::interest_matcher::interest_match_score,
};

const INTEREST_WEIGHT: f64 = 0.4;
const POPULARITY_WEIGHT: f64 = 0.3;
const RECENCY_WEIGHT: f64 = 0.3;

const RECENCY_DECAY: f64 = 0.05;
const DEFAULT_POPULARITY: f64 = 0.5;
const DEFAULT_DAYS_SINCE_CREATED: i64 = 365;

/// exp(-0.05 × days), treating an unknown creation time as a year old
pub fn recency_boost(event: &EventCandidate, now: DateTime<Utc>) -> f64 {
    let days = event
        .days_since_created(now)
        .unwrap_or(DEFAULT_DAYS_SINCE_CREATED)
        .max(0);
    (-RECENCY_DECAY * days as f64).exp()
}

pub fn fallback_score(event: &EventCandidate, interests: &InterestMap, now: DateTime<Utc>) -> f64 {
    let popularity = event
        .popularity
        .filter(|p| p.is_finite())
        .unwrap_or(DEFAULT_POPULARITY)
        .clamp(0.0, 1.0);

    INTEREST_WEIGHT * interest_match_score(event, interests)
        + POPULARITY_WEIGHT * popularity
        + RECENCY_WEIGHT * recency_boost(event, now)
}

/// Ranks the events not in `exclude` and returns at most `count` of them
pub fn fallback_recommendations(
    events: &[EventCandidate],
    interests: &InterestMap,
    exclude: &HashSet<EventId>,
    count: usize,
    now: DateTime<Utc>,
) -> Vec<Recommendation> {
    if count == 0 {
        return Vec::new();
    }

    let mut seen = exclude.clone();
    let mut scored: Vec<Recommendation> = events
        .iter()
        .filter(|event| seen.insert(event.id))
        .map(|event| {
            Recommendation::new(
                event.clone(),
                fallback_score(event, interests, now),
                RecommendationSource::Fallback,
            )
        })
        .collect();

    sort_by_score_desc(&mut scored);
    scored.truncate(count);

    debug!(
        requested = count,
        returned = scored.len(),
        "Fallback ranking applied"
    );

    scored
}
