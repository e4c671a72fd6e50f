pub mod interactions;

pub use interactions::{InMemoryInteractionStore, InteractionStore};
