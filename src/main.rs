use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use event_recommender::{
    config::Config,
    db::InMemoryInteractionStore,
    models::{
        EventCandidate, EventId, InteractionRecord, InterestRecord, Recommendation,
        RecommendationSource, UserProfile,
    },
    services::{ranking::HttpRankingClient, RecommendationService},
};

/// Request-scoped input handed over by the CRUD layer
#[derive(Debug, Deserialize)]
struct Snapshot {
    user: UserProfile,
    events: Vec<EventCandidate>,
    #[serde(default)]
    interests: Vec<InterestRecord>,
    #[serde(default)]
    interactions: Vec<InteractionRecord>,
}

#[derive(Debug, Serialize)]
struct RankedOutput {
    event_id: EventId,
    title: String,
    score: f64,
    source: RecommendationSource,
}

impl From<Recommendation> for RankedOutput {
    fn from(rec: Recommendation) -> Self {
        Self {
            event_id: rec.event.id,
            title: rec.event.title,
            score: rec.score,
            source: rec.source,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: event-recommender <snapshot.json>")?;

    let config = Config::from_env()?;

    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read snapshot {}", path))?;
    let snapshot: Snapshot = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path))?;

    tracing::info!(
        user_id = %snapshot.user.id,
        events = snapshot.events.len(),
        interests = snapshot.interests.len(),
        interactions = snapshot.interactions.len(),
        "Snapshot loaded"
    );

    let ranker = HttpRankingClient::from_config(&config)?;
    ranker.health().await;

    let service = RecommendationService::new(
        Arc::new(ranker),
        Arc::new(InMemoryInteractionStore::new(snapshot.interactions)),
        config.engine_settings(),
    );

    let recommendations = service
        .get_recommendations(&snapshot.user, &snapshot.events, &snapshot.interests)
        .await;

    let output: Vec<RankedOutput> = recommendations.into_iter().map(RankedOutput::from).collect();
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
