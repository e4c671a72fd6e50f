use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod event;
pub mod interaction;
pub mod interest;
pub mod ranking;
pub mod recommendation;
pub mod user;

pub use event::{Coordinates, EventCandidate, Privacy};
pub use interaction::{InteractionRecord, InteractionType};
pub use interest::{InterestMap, InterestRecord};
pub use ranking::{RankedEvent, RankingRequest, RankingResponse};
pub use recommendation::{Recommendation, RecommendationSource};
pub use user::UserProfile;

/// Identifier of a user row owned by the CRUD layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

/// Identifier of an event row owned by the CRUD layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub i64);

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", UserId(42)), "42");
        assert_eq!(format!("{}", EventId(7)), "7");
    }

    #[test]
    fn test_ids_serialize_as_plain_numbers() {
        let json = serde_json::to_string(&EventId(3173903)).unwrap();
        assert_eq!(json, "3173903");

        let id: UserId = serde_json::from_str("12").unwrap();
        assert_eq!(id, UserId(12));
    }
}
