/// HTTP client for the remote ranking model
///
/// API Flow:
/// 1. Health: GET /health → 200 when the model is loaded
/// 2. Ranking: POST /api/recommendations → {recommendations: [{event_id, score, ...}]}
///
/// The whole user snapshot travels in one batched request, bounded by the
/// configured timeout.
use std::collections::HashSet;
use std::time::Duration;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use reqwest::Client as HttpClient;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::{
        ranking::{EventPayload, InteractionPayload, RankedEntry, UserData, UserRef},
        EventCandidate, EventId, InteractionRecord, InterestRecord, RankedEvent, RankingRequest,
        RankingResponse, UserProfile,
    },
    services::{geo::user_event_distance, ranking::RemoteRanker, trending::is_trending},
};

const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);
const DEFAULT_SCORE: f64 = 0.5;
const DEFAULT_POPULARITY: f64 = 0.5;
const UNDATED_EVENT_DAYS: i64 = 30;
const UNKNOWN: &str = "unknown";

#[derive(Clone)]
pub struct HttpRankingClient {
    http_client: HttpClient,
    api_url: String,
    trending_threshold: f64,
}

impl HttpRankingClient {
    /// Creates a client whose every request is bounded by `timeout`
    pub fn new(api_url: String, timeout: Duration, trending_threshold: f64) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            trending_threshold,
        })
    }

    pub fn from_config(config: &Config) -> AppResult<Self> {
        Self::new(
            config.ranking_api_url.clone(),
            config.ranking_timeout(),
            config.trending_threshold,
        )
    }

    /// Probes the ranking service, logging the outcome
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.api_url);

        match self
            .http_client
            .get(&url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => {
                tracing::info!(url = %url, "Ranking service reachable");
                true
            }
            Ok(response) => {
                tracing::warn!(
                    url = %url,
                    status = %response.status(),
                    "Ranking service health check failed"
                );
                false
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "Ranking service unreachable");
                false
            }
        }
    }

    /// Builds the request body, applying the documented defaults for missing fields
    pub fn build_request(
        &self,
        user: &UserProfile,
        candidates: &[EventCandidate],
        interests: &[InterestRecord],
        interactions: &[InteractionRecord],
        now: DateTime<Utc>,
    ) -> RankingRequest {
        let events = candidates
            .iter()
            .map(|event| self.event_payload(user, event, now))
            .collect();

        let mut history: Vec<&InteractionRecord> = interactions.iter().collect();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        RankingRequest {
            user: UserRef { id: user.id },
            events,
            user_data: UserData::from_profile(user, now),
            user_interests: interests.to_vec(),
            user_interactions: history.into_iter().map(InteractionPayload::from).collect(),
        }
    }

    fn event_payload(
        &self,
        user: &UserProfile,
        event: &EventCandidate,
        now: DateTime<Utc>,
    ) -> EventPayload {
        let or_unknown = |value: &Option<String>| {
            value
                .as_deref()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };

        EventPayload {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone().unwrap_or_default(),
            location: event.location.clone(),
            latitude: event.latitude,
            longitude: event.longitude,
            date: event
                .date
                .unwrap_or_else(|| now + ChronoDuration::days(UNDATED_EVENT_DAYS)),
            privacy: event.privacy.as_str().to_string(),
            category: or_unknown(&event.category),
            subcategory: or_unknown(&event.subcategory),
            event_popularity: event
                .popularity
                .filter(|p| p.is_finite())
                .unwrap_or(DEFAULT_POPULARITY),
            invited: 0,
            attendee_count: event.attendee_count,
            days_until_event: event.days_until(now).unwrap_or(UNDATED_EVENT_DAYS),
            distance_km: user_event_distance(user, event),
            is_trending: is_trending(event, now, self.trending_threshold),
            created_at: event.created_at.unwrap_or(now),
        }
    }

    async fn request_scores(
        &self,
        request: &RankingRequest,
        candidates: &[EventCandidate],
    ) -> AppResult<Vec<RankedEvent>> {
        let url = format!("{}/api/recommendations", self.api_url);

        tracing::debug!(
            url = %url,
            events = request.events.len(),
            interactions = request.user_interactions.len(),
            "Sending ranking request"
        );

        let response = self.http_client.post(&url).json(request).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Ranking API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let parsed: RankingResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::error!(
                error = %e,
                response = %response_text,
                "Failed to deserialize ranking response"
            );
            AppError::ExternalApi(format!("Failed to parse ranking response: {}", e))
        })?;

        Ok(parse_ranked_entries(parsed.recommendations, candidates))
    }
}

/// Keeps entries naming a known candidate, first occurrence wins
///
/// A missing score defaults to 0.5; scores are clamped to [0, 1].
pub fn parse_ranked_entries(
    entries: Vec<RankedEntry>,
    candidates: &[EventCandidate],
) -> Vec<RankedEvent> {
    let known: HashSet<EventId> = candidates.iter().map(|e| e.id).collect();
    let mut seen = HashSet::new();

    entries
        .into_iter()
        .filter_map(|entry| {
            let event_id = entry.event_id?;
            if !known.contains(&event_id) || !seen.insert(event_id) {
                return None;
            }
            let score = entry
                .score
                .filter(|s| s.is_finite())
                .unwrap_or(DEFAULT_SCORE)
                .clamp(0.0, 1.0);
            Some(RankedEvent::new(event_id, score))
        })
        .collect()
}

#[async_trait::async_trait]
impl RemoteRanker for HttpRankingClient {
    async fn score(
        &self,
        user: &UserProfile,
        candidates: &[EventCandidate],
        interests: &[InterestRecord],
        interactions: &[InteractionRecord],
    ) -> Vec<RankedEvent> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let request = self.build_request(user, candidates, interests, interactions, Utc::now());

        match self.request_scores(&request, candidates).await {
            Ok(ranked) => {
                tracing::info!(
                    user_id = %user.id,
                    candidates = candidates.len(),
                    ranked = ranked.len(),
                    ranker = self.name(),
                    "Remote ranking completed"
                );
                ranked
            }
            Err(e) => {
                tracing::warn!(
                    user_id = %user.id,
                    error = %e,
                    ranker = self.name(),
                    "Remote ranking unavailable, continuing without it"
                );
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
