//! Remote lookups
//!
//! - FitGirl: slug-guessing page lookup that scrapes a magnet link
//! - Retry: bounded retry policy with an injectable sleeper

pub mod fitgirl;
pub mod retry;

pub use fitgirl::{FitgirlClient, RemoteError};
pub use retry::{RetryPolicy, Retryable, Sleeper, TokioSleeper};

/// Build `builder`, falling back to a plain client with a warning
pub fn build_client_or_default(builder: reqwest::ClientBuilder) -> reqwest::Client {
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "HTTP client setup failed, falling back to defaults");
        reqwest::Client::new()
    })
}
