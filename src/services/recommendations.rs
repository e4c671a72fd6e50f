//! Recommendation orchestrator
//!
//! Blends three signal tiers into one ordered list:
//!   PRIMARY   remote ranking model
//!   SECONDARY collaborative filtering (only when PRIMARY is short)
//!   FILL      local fallback ranking (only when still short)
//!
//! Nothing escapes this boundary as an error: a failing tier contributes
//! nothing and the next tier still runs.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    config::EngineSettings,
    db::InteractionStore,
    models::{
        recommendation::sort_by_score_desc, EventCandidate, EventId, InteractionRecord,
        InterestMap, InterestRecord, RankedEvent, Recommendation, RecommendationSource,
        UserProfile,
    },
    services::{
        collaborative::CollaborativeFilter, fallback::fallback_recommendations,
        ranking::RemoteRanker,
    },
};

const NEUTRAL_SCORE: f64 = 0.5;

pub struct RecommendationService {
    ranker: Arc<dyn RemoteRanker>,
    store: Arc<dyn InteractionStore>,
    settings: EngineSettings,
}

impl RecommendationService {
    pub fn new(
        ranker: Arc<dyn RemoteRanker>,
        store: Arc<dyn InteractionStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            ranker,
            store,
            settings,
        }
    }

    /// Generates personalized event recommendations
    ///
    /// Output holds each event at most once and is ordered by non-increasing
    /// score. It is empty only when no tier produced anything.
    pub async fn get_recommendations(
        &self,
        user: &UserProfile,
        events: &[EventCandidate],
        interests: &[InterestRecord],
    ) -> Vec<Recommendation> {
        let span = tracing::info_span!(
            "recommendation_request",
            request_id = %Uuid::new_v4(),
            user_id = %user.id,
            candidates = events.len(),
        );

        async move {
            let accumulated = self.run(user, events, interests, Utc::now()).await;
            tracing::info!(returned = accumulated.len(), "Recommendations ready");
            accumulated
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        user: &UserProfile,
        events: &[EventCandidate],
        interests: &[InterestRecord],
        now: DateTime<Utc>,
    ) -> Vec<Recommendation> {
        let minimum = self.settings.min_recommendations;

        // PRIMARY
        let history = self.recent_history(user).await;
        let ranked = self.ranker.score(user, events, interests, &history).await;
        let mut accumulated = resolve_ranked(ranked, events);

        if accumulated.len() >= minimum {
            tracing::debug!(
                remote = accumulated.len(),
                ranker = self.ranker.name(),
                "Remote ranking sufficient"
            );
            return accumulated;
        }

        // SECONDARY
        tracing::info!(
            remote = accumulated.len(),
            minimum,
            "Insufficient remote recommendations, using collaborative filtering"
        );
        let collaborative = match self.store.all_interactions().await {
            Ok(interactions) => CollaborativeFilter::new(self.settings.similar_users)
                .recommend(user.id, &interactions, events),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Interaction log unavailable, skipping collaborative filtering"
                );
                Vec::new()
            }
        };
        accumulated = merge_recommendations(accumulated, collaborative);

        if accumulated.len() >= minimum {
            return accumulated;
        }

        // FILL
        tracing::info!(
            merged = accumulated.len(),
            minimum,
            "Still insufficient recommendations, adding fallback recommendations"
        );
        let exclude: HashSet<EventId> = accumulated.iter().map(|r| r.event_id()).collect();
        let fallback = fallback_recommendations(
            events,
            &InterestMap::from_interests(interests),
            &exclude,
            minimum - accumulated.len(),
            now,
        );
        append_below(&mut accumulated, fallback);

        accumulated
    }

    /// The user's recent interactions, or none when the store cannot provide them
    async fn recent_history(&self, user: &UserProfile) -> Vec<InteractionRecord> {
        match self
            .store
            .recent_for_user(user.id, self.settings.history_limit)
            .await
        {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Interaction history unavailable, ranking without it"
                );
                Vec::new()
            }
        }
    }
}

/// Maps ranked ids back to candidates, dropping unknown and repeated ids
///
/// Scores are brought into [0, 1]; a non-finite score becomes the neutral 0.5.
fn resolve_ranked(ranked: Vec<RankedEvent>, events: &[EventCandidate]) -> Vec<Recommendation> {
    let by_id: HashMap<EventId, &EventCandidate> = events.iter().map(|e| (e.id, e)).collect();
    let mut seen = HashSet::new();

    let mut resolved: Vec<Recommendation> = ranked
        .into_iter()
        .filter_map(|r| {
            let event = by_id.get(&r.event_id)?;
            if !seen.insert(r.event_id) {
                return None;
            }
            let score = if r.score.is_finite() {
                r.score.clamp(0.0, 1.0)
            } else {
                NEUTRAL_SCORE
            };
            Some(Recommendation::new(
                (*event).clone(),
                score,
                RecommendationSource::Remote,
            ))
        })
        .collect();

    sort_by_score_desc(&mut resolved);
    resolved
}

/// Merges two tiers, de-duplicated by event id with `primary` winning, then re-sorted
pub fn merge_recommendations(
    primary: Vec<Recommendation>,
    secondary: Vec<Recommendation>,
) -> Vec<Recommendation> {
    let mut seen: HashSet<EventId> = HashSet::new();
    let mut merged: Vec<Recommendation> = primary
        .into_iter()
        .chain(secondary)
        .filter(|r| seen.insert(r.event_id()))
        .collect();

    sort_by_score_desc(&mut merged);
    merged
}

/// Appends fill entries after the signal-backed ones without breaking score order
fn append_below(accumulated: &mut Vec<Recommendation>, fill: Vec<Recommendation>) {
    let floor = accumulated.last().map(|r| r.score);

    accumulated.extend(fill.into_iter().map(|mut r| {
        if let Some(floor) = floor {
            r.score = r.score.min(floor);
        }
        r
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::InMemoryInteractionStore,
        error::{AppError, AppResult},
        models::{InteractionType, UserId},
        services::ranking::MockRemoteRanker,
    };

    struct FailingStore;

    #[async_trait::async_trait]
    impl InteractionStore for FailingStore {
        async fn recent_for_user(
            &self,
            _user_id: UserId,
            _limit: usize,
        ) -> AppResult<Vec<InteractionRecord>> {
            Err(AppError::Store("connection refused".to_string()))
        }

        async fn all_interactions(&self) -> AppResult<Vec<InteractionRecord>> {
            Err(AppError::Store("connection refused".to_string()))
        }
    }

    fn events(count: i64) -> Vec<EventCandidate> {
        (1..=count)
            .map(|id| EventCandidate::new(EventId(id), format!("event {}", id)))
            .collect()
    }

    fn rec(id: i64, score: f64, source: RecommendationSource) -> Recommendation {
        Recommendation::new(
            EventCandidate::new(EventId(id), format!("event {}", id)),
            score,
            source,
        )
    }

    fn ranker_returning(ranked: Vec<RankedEvent>) -> MockRemoteRanker {
        let mut ranker = MockRemoteRanker::new();
        ranker
            .expect_score()
            .times(1)
            .returning(move |_, _, _, _| ranked.clone());
        ranker.expect_name().return_const("mock");
        ranker
    }

    fn settings(minimum: usize) -> EngineSettings {
        EngineSettings {
            min_recommendations: minimum,
            ..EngineSettings::default()
        }
    }

    #[test]
    fn test_merge_prefers_primary_and_sorts() {
        let primary = vec![rec(1, 0.4, RecommendationSource::Remote)];
        let secondary = vec![
            rec(1, 0.9, RecommendationSource::Collaborative),
            rec(2, 0.6, RecommendationSource::Collaborative),
        ];

        let merged = merge_recommendations(primary, secondary);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].event_id(), EventId(2));
        assert_eq!(merged[1].event_id(), EventId(1));
        assert_eq!(merged[1].source, RecommendationSource::Remote);
        assert_eq!(merged[1].score, 0.4);
    }

    #[test]
    fn test_append_below_caps_fill_scores() {
        let mut accumulated = vec![
            rec(1, 0.9, RecommendationSource::Remote),
            rec(2, 0.3, RecommendationSource::Remote),
        ];
        let fill = vec![
            rec(3, 0.8, RecommendationSource::Fallback),
            rec(4, 0.1, RecommendationSource::Fallback),
        ];

        append_below(&mut accumulated, fill);
        let scores: Vec<f64> = accumulated.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.9, 0.3, 0.3, 0.1]);
    }

    #[test]
    fn test_append_below_empty_accumulated_keeps_scores() {
        let mut accumulated = Vec::new();
        append_below(&mut accumulated, vec![rec(3, 0.8, RecommendationSource::Fallback)]);
        assert_eq!(accumulated[0].score, 0.8);
    }

    #[test]
    fn test_resolve_ranked_drops_unknown_and_duplicates() {
        let ranked = vec![
            RankedEvent::new(EventId(2), 0.3),
            RankedEvent::new(EventId(42), 0.9),
            RankedEvent::new(EventId(1), 0.8),
            RankedEvent::new(EventId(2), 0.99),
        ];

        let resolved = resolve_ranked(ranked, &events(3));
        let ids: Vec<EventId> = resolved.iter().map(|r| r.event_id()).collect();
        assert_eq!(ids, vec![EventId(1), EventId(2)]);
        assert_eq!(resolved[1].score, 0.3);
    }

    #[tokio::test]
    async fn test_remote_sufficient_skips_other_tiers() {
        let ranked: Vec<RankedEvent> = (1..=3)
            .map(|id| RankedEvent::new(EventId(id), 0.1 * id as f64))
            .collect();
        let service = RecommendationService::new(
            Arc::new(ranker_returning(ranked)),
            Arc::new(FailingStore),
            settings(3),
        );

        let user = UserProfile::new(UserId(1));
        let recs = service.get_recommendations(&user, &events(5), &[]).await;

        let ids: Vec<EventId> = recs.iter().map(|r| r.event_id()).collect();
        assert_eq!(ids, vec![EventId(3), EventId(2), EventId(1)]);
        assert!(recs.iter().all(|r| r.source == RecommendationSource::Remote));
    }

    #[test]
    fn test_resolve_ranked_sanitizes_scores() {
        let ranked = vec![
            RankedEvent::new(EventId(1), 0.2),
            RankedEvent::new(EventId(2), f64::NAN),
            RankedEvent::new(EventId(3), 0.9),
            RankedEvent::new(EventId(4), 7.5),
            RankedEvent::new(EventId(5), f64::NEG_INFINITY),
            RankedEvent::new(EventId(6), -0.3),
        ];

        let resolved = resolve_ranked(ranked, &events(6));
        let scored: Vec<(i64, f64)> = resolved
            .iter()
            .map(|r| (r.event_id().0, r.score))
            .collect();
        assert_eq!(
            scored,
            vec![(4, 1.0), (3, 0.9), (2, 0.5), (5, 0.5), (1, 0.2), (6, 0.0)]
        );
    }

    #[tokio::test]
    async fn test_non_finite_remote_scores_keep_order() {
        let ranked = vec![
            RankedEvent::new(EventId(1), 0.2),
            RankedEvent::new(EventId(2), f64::NAN),
            RankedEvent::new(EventId(3), 0.9),
        ];
        let service = RecommendationService::new(
            Arc::new(ranker_returning(ranked)),
            Arc::new(InMemoryInteractionStore::default()),
            settings(3),
        );

        let user = UserProfile::new(UserId(1));
        let recs = service.get_recommendations(&user, &events(3), &[]).await;
        let scores: Vec<f64> = recs.iter().map(|r| r.score).collect();
        assert_eq!(scores, vec![0.9, 0.5, 0.2]);
        assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    }

    #[tokio::test]
    async fn test_store_failure_still_fills_from_fallback() {
        let service = RecommendationService::new(
            Arc::new(ranker_returning(vec![RankedEvent::new(EventId(4), 0.7)])),
            Arc::new(FailingStore),
            settings(10),
        );

        let user = UserProfile::new(UserId(1));
        let recs = service.get_recommendations(&user, &events(15), &[]).await;
        assert_eq!(recs.len(), 10);
        assert_eq!(recs[0].event_id(), EventId(4));
        assert_eq!(recs[0].source, RecommendationSource::Remote);
        assert!(recs[1..]
            .iter()
            .all(|r| r.source == RecommendationSource::Fallback));

        let unique: HashSet<EventId> = recs.iter().map(|r| r.event_id()).collect();
        assert_eq!(unique.len(), 10);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[tokio::test]
    async fn test_all_tiers_empty_then_fallback_fills() {
        let service = RecommendationService::new(
            Arc::new(ranker_returning(Vec::new())),
            Arc::new(InMemoryInteractionStore::default()),
            settings(10),
        );

        let user = UserProfile::new(UserId(1));
        let recs = service.get_recommendations(&user, &events(4), &[]).await;
        assert_eq!(recs.len(), 4);
        assert!(recs.iter().all(|r| r.source == RecommendationSource::Fallback));
    }

    #[tokio::test]
    async fn test_history_is_passed_to_ranker() {
        let now = Utc::now();
        let store = InMemoryInteractionStore::new(vec![
            InteractionRecord::new(UserId(1), EventId(1), InteractionType::View, now),
            InteractionRecord::new(UserId(2), EventId(1), InteractionType::Join, now),
        ]);

        let mut ranker = MockRemoteRanker::new();
        ranker
            .expect_score()
            .withf(|user, candidates, _, interactions| {
                user.id == UserId(1)
                    && candidates.len() == 2
                    && interactions.len() == 1
                    && interactions[0].user_id == UserId(1)
            })
            .times(1)
            .returning(|_, _, _, _| {
                vec![
                    RankedEvent::new(EventId(1), 0.9),
                    RankedEvent::new(EventId(2), 0.8),
                ]
            });
        ranker.expect_name().return_const("mock");

        let service = RecommendationService::new(Arc::new(ranker), Arc::new(store), settings(2));
        let recs = service
            .get_recommendations(&UserProfile::new(UserId(1)), &events(2), &[])
            .await;
        assert_eq!(recs.len(), 2);
    }

    #[tokio::test]
    async fn test_no_candidates_yields_empty() {
        let service = RecommendationService::new(
            Arc::new(ranker_returning(Vec::new())),
            Arc::new(InMemoryInteractionStore::default()),
            settings(10),
        );

        let recs = service
            .get_recommendations(&UserProfile::new(UserId(1)), &[], &[])
            .await;
        assert!(recs.is_empty());
    }
}
