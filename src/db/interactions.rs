use crate::{
    error::AppResult,
    models::{InteractionRecord, UserId},
};

/// Read accessor over the interaction log owned by the CRUD layer
///
/// The engine only reads: a bounded recent window for one user and the full
/// table for collaborative filtering.
#[async_trait::async_trait]
pub trait InteractionStore: Send + Sync {
    /// Most recent interactions of a user, newest first, at most `limit`
    async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<InteractionRecord>>;

    /// Every recorded interaction
    async fn all_interactions(&self) -> AppResult<Vec<InteractionRecord>>;
}

/// Interaction store over a request-scoped snapshot
#[derive(Debug, Clone, Default)]
pub struct InMemoryInteractionStore {
    interactions: Vec<InteractionRecord>,
}

impl InMemoryInteractionStore {
    pub fn new(interactions: Vec<InteractionRecord>) -> Self {
        tracing::debug!(
            interactions = interactions.len(),
            "Interaction snapshot loaded"
        );
        Self { interactions }
    }
}

#[async_trait::async_trait]
impl InteractionStore for InMemoryInteractionStore {
    async fn recent_for_user(
        &self,
        user_id: UserId,
        limit: usize,
    ) -> AppResult<Vec<InteractionRecord>> {
        let mut recent: Vec<InteractionRecord> = self
            .interactions
            .iter()
            .filter(|i| i.user_id == user_id)
            .cloned()
            .collect();

        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);

        Ok(recent)
    }

    async fn all_interactions(&self) -> AppResult<Vec<InteractionRecord>> {
        Ok(self.interactions.clone())
    }
}
