use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::EventId;

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(Self::new(latitude, longitude)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    #[default]
    Public,
    Private,
    Invitation,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Private => "private",
            Privacy::Invitation => "invitation",
        }
    }
}

/// An event that may be recommended
///
/// Popularity and attendance are maintained by interaction tracking elsewhere and
/// are read here as fixed inputs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EventCandidate {
    pub id: EventId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Start date
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub privacy: Privacy,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    /// In [0, 1]
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub attendee_count: u32,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl EventCandidate {
    /// Creates an event with a title and every optional field left empty
    pub fn new(id: EventId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            location: String::new(),
            latitude: None,
            longitude: None,
            date: None,
            end_date: None,
            privacy: Privacy::Public,
            category: None,
            subcategory: None,
            popularity: None,
            attendee_count: 0,
            created_at: None,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }

    /// Whole days until the start date, negative once it has passed
    pub fn days_until(&self, now: DateTime<Utc>) -> Option<i64> {
        self.date
            .map(|date| floor_days(date.signed_duration_since(now)))
    }

    /// Whole days since the event row was created
    pub fn days_since_created(&self, now: DateTime<Utc>) -> Option<i64> {
        self.created_at
            .map(|created| floor_days(now.signed_duration_since(created)))
    }
}

/// Rounds toward negative infinity, so half a day in the past is day -1
fn floor_days(duration: Duration) -> i64 {
    duration.num_seconds().div_euclid(SECONDS_PER_DAY)
}

const SECONDS_PER_DAY: i64 = 86_400;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_serde() {
        let json = serde_json::to_string(&Privacy::Invitation).unwrap();
        assert_eq!(json, r#""invitation""#);

        let privacy: Privacy = serde_json::from_str(r#""private""#).unwrap();
        assert_eq!(privacy, Privacy::Private);
        assert_eq!(privacy.as_str(), "private");
    }

    #[test]
    fn test_day_arithmetic() {
        let now = Utc::now();
        let mut event = EventCandidate::new(EventId(1), "Jazz Night");
        assert_eq!(event.days_until(now), None);
        assert_eq!(event.days_since_created(now), None);

        event.date = Some(now + Duration::days(3) + Duration::hours(1));
        event.created_at = Some(now - Duration::days(10));
        assert_eq!(event.days_until(now), Some(3));
        assert_eq!(event.days_since_created(now), Some(10));

        event.date = Some(now - Duration::days(2) - Duration::hours(1));
        assert_eq!(event.days_until(now), Some(-3));
    }

    #[test]
    fn test_days_until_rounds_down_for_past_events() {
        let now = Utc::now();
        let mut event = EventCandidate::new(EventId(1), "Jazz Night");

        event.date = Some(now - Duration::hours(12));
        assert_eq!(event.days_until(now), Some(-1));

        event.date = Some(now + Duration::hours(12));
        assert_eq!(event.days_until(now), Some(0));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let json = r#"{"id": 9, "title": "Open Mic"}"#;
        let event: EventCandidate = serde_json::from_str(json).unwrap();
        assert_eq!(event, EventCandidate::new(EventId(9), "Open Mic"));
        assert_eq!(event.coordinates(), None);
    }
}
