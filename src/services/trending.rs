//! Trending score: a user-independent 0-100 composite of popularity, freshness of
//! the listing, how soon the event starts, and attendance.
//!
//! Each term is computed on its own and degrades to 0 (with a warning) when its
//! input is missing or yields a non-finite value. The calculation as a whole never
//! fails.

use chrono::{DateTime, Utc};

use crate::models::{EventCandidate, EventId};

const POPULARITY_WEIGHT: f64 = 0.3;
const CREATION_WEIGHT: f64 = 0.2;
const DATE_PROXIMITY_WEIGHT: f64 = 0.2;
const ATTENDANCE_WEIGHT: f64 = 0.3;

const MAX_SCORE: f64 = 100.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Per-term contributions before weighting, each in [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrendingBreakdown {
    pub popularity: f64,
    pub creation_recency: f64,
    pub date_proximity: f64,
    pub attendance: f64,
}

impl TrendingBreakdown {
    /// Weighted sum clamped to [0, 100]
    pub fn total(&self) -> f64 {
        let total = POPULARITY_WEIGHT * self.popularity
            + CREATION_WEIGHT * self.creation_recency
            + DATE_PROXIMITY_WEIGHT * self.date_proximity
            + ATTENDANCE_WEIGHT * self.attendance;

        if total.is_finite() {
            total.clamp(0.0, MAX_SCORE)
        } else {
            0.0
        }
    }
}

pub fn trending_breakdown(event: &EventCandidate, now: DateTime<Utc>) -> TrendingBreakdown {
    TrendingBreakdown {
        popularity: guarded(event.id, "popularity", popularity_term(event)),
        creation_recency: guarded(event.id, "creation_recency", creation_term(event, now)),
        date_proximity: guarded(event.id, "date_proximity", date_proximity_term(event, now)),
        attendance: guarded(event.id, "attendance", attendance_term(event.attendee_count)),
    }
}

pub fn trending_score(event: &EventCandidate, now: DateTime<Utc>) -> f64 {
    trending_breakdown(event, now).total()
}

pub fn is_trending(event: &EventCandidate, now: DateTime<Utc>, threshold: f64) -> bool {
    trending_score(event, now) > threshold
}

/// Missing inputs contribute nothing; non-finite results are logged and dropped
fn guarded(event_id: EventId, term: &'static str, value: Option<f64>) -> f64 {
    match value {
        None => 0.0,
        Some(v) if v.is_finite() => v.clamp(0.0, MAX_SCORE),
        Some(v) => {
            tracing::warn!(
                event_id = %event_id,
                term,
                value = %v,
                "Trending term not computable, using 0"
            );
            0.0
        }
    }
}

fn popularity_term(event: &EventCandidate) -> Option<f64> {
    event.popularity.map(|p| p * 100.0)
}

fn creation_term(event: &EventCandidate, now: DateTime<Utc>) -> Option<f64> {
    let days = event.days_since_created(now)?;
    Some((100.0 - 5.0 * days as f64).max(0.0))
}

/// 100 inside a week, linear down to 40 at 30 days, then a slow decline
fn date_proximity_term(event: &EventCandidate, now: DateTime<Utc>) -> Option<f64> {
    let date = event.date?;
    if date <= now {
        return Some(0.0);
    }

    let days = date.signed_duration_since(now).num_seconds() as f64 / SECONDS_PER_DAY;
    let score = if days <= 7.0 {
        100.0
    } else if days <= 30.0 {
        100.0 - (days - 7.0) * (60.0 / 23.0)
    } else {
        (40.0 - 0.5 * (days - 30.0)).max(0.0)
    };

    Some(score)
}

fn attendance_term(attendee_count: u32) -> Option<f64> {
    Some((20.0 * (attendee_count as f64 + 1.0).log2()).min(100.0))
}
