use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{EventId, InteractionRecord, InterestRecord, UserId, UserProfile};

// ============================================================================
// Remote Ranking API Types
// ============================================================================

/// Body of `POST /api/recommendations`
#[derive(Debug, Clone, Serialize)]
pub struct RankingRequest {
    pub user: UserRef,
    pub events: Vec<EventPayload>,
    pub user_data: UserData,
    pub user_interests: Vec<InterestRecord>,
    pub user_interactions: Vec<InteractionPayload>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: UserId,
}

/// Profile fields with the defaults the ranking model was trained on
#[derive(Debug, Clone, Serialize)]
pub struct UserData {
    pub birthyear: i32,
    pub gender: String,
    pub locale: String,
    pub location: String,
    pub timezone: i32,
    #[serde(rename = "joinedAt")]
    pub joined_at: DateTime<Utc>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub precise_location_enabled: bool,
}

const DEFAULT_BIRTH_YEAR: i32 = 1990;
const UNKNOWN: &str = "unknown";

impl UserData {
    pub fn from_profile(user: &UserProfile, now: DateTime<Utc>) -> Self {
        let or_unknown = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        Self {
            birthyear: user.birth_year.unwrap_or(DEFAULT_BIRTH_YEAR),
            gender: or_unknown(&user.gender),
            locale: or_unknown(&user.locale),
            location: or_unknown(&user.location),
            timezone: user.timezone.unwrap_or(0),
            joined_at: user.joined_at.unwrap_or(now),
            latitude: user.latitude,
            longitude: user.longitude,
            precise_location_enabled: user.precise_location_enabled,
        }
    }
}

/// One candidate event as the ranking model sees it
#[derive(Debug, Clone, Serialize)]
pub struct EventPayload {
    pub id: EventId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date: DateTime<Utc>,
    pub privacy: String,
    pub category: String,
    pub subcategory: String,
    pub event_popularity: f64,
    pub invited: u32,
    pub attendee_count: u32,
    pub days_until_event: i64,
    pub distance_km: Option<f64>,
    pub is_trending: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct InteractionPayload {
    pub event_id: EventId,
    pub interaction_type: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&InteractionRecord> for InteractionPayload {
    fn from(record: &InteractionRecord) -> Self {
        Self {
            event_id: record.event_id,
            interaction_type: record.interaction_type.as_str().to_string(),
            timestamp: record.timestamp,
        }
    }
}

/// Raw response from the ranking service
#[derive(Debug, Clone, Deserialize)]
pub struct RankingResponse {
    #[serde(default)]
    pub recommendations: Vec<RankedEntry>,
}

/// Entries may carry extra model diagnostics, which are ignored
#[derive(Debug, Clone, Deserialize)]
pub struct RankedEntry {
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub score: Option<f64>,
}

/// A validated (event id, score) pair from a remote ranker
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedEvent {
    pub event_id: EventId,
    pub score: f64,
}

impl RankedEvent {
    pub fn new(event_id: EventId, score: f64) -> Self {
        Self { event_id, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InteractionType;

    #[test]
    fn test_user_data_defaults() {
        let now = Utc::now();
        let mut user = UserProfile::new(UserId(1));
        user.locale = Some("   ".to_string());

        let data = UserData::from_profile(&user, now);
        assert_eq!(data.birthyear, 1990);
        assert_eq!(data.gender, "unknown");
        assert_eq!(data.locale, "unknown");
        assert_eq!(data.location, "unknown");
        assert_eq!(data.timezone, 0);
        assert_eq!(data.joined_at, now);
    }

    #[test]
    fn test_user_data_keeps_known_fields() {
        let now = Utc::now();
        let mut user = UserProfile::new(UserId(1));
        user.birth_year = Some(1984);
        user.gender = Some("female".to_string());
        user.timezone = Some(-5);

        let data = UserData::from_profile(&user, now);
        assert_eq!(data.birthyear, 1984);
        assert_eq!(data.gender, "female");
        assert_eq!(data.timezone, -5);

        let json = serde_json::to_value(&data).unwrap();
        assert!(json.get("joinedAt").is_some());
    }

    #[test]
    fn test_interaction_payload_from_record() {
        let now = Utc::now();
        let record = InteractionRecord::new(UserId(1), EventId(2), InteractionType::Share, now);
        let payload = InteractionPayload::from(&record);
        assert_eq!(payload.event_id, EventId(2));
        assert_eq!(payload.interaction_type, "share");
    }

    #[test]
    fn test_ranking_response_tolerates_partial_entries() {
        let json = r#"{
            "recommendations": [
                {"event_id": 4, "score": 0.91, "explanation": "similar to past joins"},
                {"event_id": 5},
                {"score": 0.4}
            ]
        }"#;

        let response: RankingResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.recommendations.len(), 3);
        assert_eq!(response.recommendations[0].event_id, Some(EventId(4)));
        assert_eq!(response.recommendations[1].score, None);
        assert_eq!(response.recommendations[2].event_id, None);
    }
}
