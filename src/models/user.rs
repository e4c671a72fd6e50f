use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Coordinates, UserId};

/// Read-only snapshot of the requesting user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
    /// Coarse, human-entered location
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub precise_location_enabled: bool,
    /// Offset from UTC in hours
    #[serde(default)]
    pub timezone: Option<i32>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Creates a profile with only an identity set
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            birth_year: None,
            gender: None,
            locale: None,
            location: None,
            latitude: None,
            longitude: None,
            precise_location_enabled: false,
            timezone: None,
            joined_at: None,
        }
    }

    /// Precise position, only when both halves are known
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }
}
