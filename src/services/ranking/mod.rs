/// Remote ranking abstraction
///
/// The external scoring model is an opaque capability. Anything that can turn a
/// user snapshot and a candidate list into scored event ids can sit behind
/// [`RemoteRanker`], so the transport (HTTP today) can change without touching
/// the orchestrator.
use crate::models::{EventCandidate, InteractionRecord, InterestRecord, RankedEvent, UserProfile};

pub mod http;

pub use http::HttpRankingClient;

#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RemoteRanker: Send + Sync {
    /// Scores candidate events for a user
    ///
    /// Never fails: transport or decoding problems are logged by the
    /// implementation and surface as an empty list.
    async fn score(
        &self,
        user: &UserProfile,
        candidates: &[EventCandidate],
        interests: &[InterestRecord],
        interactions: &[InteractionRecord],
    ) -> Vec<RankedEvent>;

    /// Ranker name for logging and debugging
    fn name(&self) -> &'static str;
}
