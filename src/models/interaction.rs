use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

use super::{EventId, UserId};

/// Observed user behaviour on an event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum InteractionType {
    View,
    Click,
    Join,
    Leave,
    Bookmark,
    Share,
    CalendarAdd,
    RecommendClick,
    Impression,
    /// Anything the tracking layer records that this engine has no name for
    Other(String),
}

impl InteractionType {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "view" => InteractionType::View,
            "click" => InteractionType::Click,
            "join" => InteractionType::Join,
            "leave" => InteractionType::Leave,
            "bookmark" => InteractionType::Bookmark,
            "share" => InteractionType::Share,
            "calendar_add" => InteractionType::CalendarAdd,
            "recommend_click" => InteractionType::RecommendClick,
            "impression" => InteractionType::Impression,
            other => InteractionType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            InteractionType::View => "view",
            InteractionType::Click => "click",
            InteractionType::Join => "join",
            InteractionType::Leave => "leave",
            InteractionType::Bookmark => "bookmark",
            InteractionType::Share => "share",
            InteractionType::CalendarAdd => "calendar_add",
            InteractionType::RecommendClick => "recommend_click",
            InteractionType::Impression => "impression",
            InteractionType::Other(other) => other,
        }
    }
}

impl From<String> for InteractionType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<InteractionType> for String {
    fn from(value: InteractionType) -> Self {
        value.as_str().to_string()
    }
}

impl Display for InteractionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One row of the append-only interaction log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InteractionRecord {
    pub user_id: UserId,
    pub event_id: EventId,
    pub interaction_type: InteractionType,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl InteractionRecord {
    pub fn new(
        user_id: UserId,
        event_id: EventId,
        interaction_type: InteractionType,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            event_id,
            interaction_type,
            timestamp,
            metadata: None,
        }
    }
}
