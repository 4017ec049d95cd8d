//! External service integrations.

pub mod key_cache;
pub mod token_verifier;
pub mod youtube;

pub use key_cache::{HttpKeySource, KeyCache, KeyFetchError, KeyMaterial, KeySource};
pub use token_verifier::{AuthError, TokenVerifier};
pub use youtube::{VideoStatsSource, YoutubeStatsClient, ZeroStats};
