pub mod collaborative;
pub mod fallback;
pub mod geo;
pub mod interest_matcher;
pub mod ranking;
pub mod recommendations;
pub mod trending;

pub use recommendations::RecommendationService;
