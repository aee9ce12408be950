//! Headline fetching with bounded retry.
//!
//! [`NewsApi`] talks to the news source's top-headlines endpoint;
//! [`RetryingFetcher`] wraps any [`HeadlineSource`] with the retry policy.
//! The split exists so tests can drive the retry loop with a scripted
//! source instead of a live endpoint.
//!
//! # Retry policy
//!
//! Transport failures (connect errors, timeouts, undecodable bodies) are
//! retried up to 3 attempts with a fixed 30 second pause between them. A
//! response that decodes but carries a non-"ok" status is not retried at
//! all: it means a bad credential or bad request, and hammering the
//! endpoint will not fix either.

use crate::config::Config;
use crate::models::HeadlineRecord;
use crate::pacing::Pacer;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

pub const FETCH_MAX_ATTEMPTS: usize = 3;
pub const FETCH_RETRY_DELAY: Duration = Duration::from_secs(30);

const NEWS_API_BASE: &str = "https://newsapi.org";

#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure; retryable.
    #[error("transport error talking to the news source: {0}")]
    Transport(String),
    /// The source answered with a non-"ok" status; not retryable.
    #[error("news source returned status {status:?}: {message}")]
    Api { status: String, message: String },
}

/// Anything that can produce a batch of raw headlines.
pub trait HeadlineSource {
    async fn top_headlines(
        &self,
        country: &str,
        page_size: u32,
    ) -> Result<Vec<HeadlineRecord>, FetchError>;
}

#[derive(Deserialize)]
struct TopHeadlinesResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    articles: Vec<HeadlineRecord>,
}

/// The production headline source.
pub struct NewsApi {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl NewsApi {
    pub fn new(client: &reqwest::Client, config: &Config) -> Self {
        Self {
            client: client.clone(),
            api_key: config.news_api_key.clone(),
            base_url: NEWS_API_BASE.to_string(),
        }
    }
}

impl HeadlineSource for NewsApi {
    async fn top_headlines(
        &self,
        country: &str,
        page_size: u32,
    ) -> Result<Vec<HeadlineRecord>, FetchError> {
        let page_size = page_size.to_string();
        let response = self
            .client
            .get(format!("{}/v2/top-headlines", self.base_url))
            .query(&[("country", country), ("pageSize", page_size.as_str())])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        // Error statuses still carry a JSON body with status/message, so
        // decode first and let the status field decide.
        let body: TopHeadlinesResponse = response
            .json()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if body.status != "ok" {
            return Err(FetchError::Api {
                status: body.status,
                message: body.message.unwrap_or_default(),
            });
        }
        Ok(body.articles)
    }
}

/// Retry decorator over a [`HeadlineSource`].
pub struct RetryingFetcher<S, P> {
    source: S,
    pacer: P,
    max_attempts: usize,
    retry_delay: Duration,
}

impl<S, P> RetryingFetcher<S, P>
where
    S: HeadlineSource,
    P: Pacer,
{
    pub fn new(source: S, pacer: P) -> Self {
        Self {
            source,
            pacer,
            max_attempts: FETCH_MAX_ATTEMPTS,
            retry_delay: FETCH_RETRY_DELAY,
        }
    }

    pub async fn fetch(
        &self,
        country: &str,
        page_size: u32,
    ) -> Result<Vec<HeadlineRecord>, FetchError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.source.top_headlines(country, page_size).await {
                Ok(records) => {
                    info!(count = records.len(), attempt, "fetched headlines");
                    return Ok(records);
                }
                Err(e @ FetchError::Api { .. }) => {
                    error!(error = %e, "news source rejected the request; not retrying");
                    return Err(e);
                }
                Err(FetchError::Transport(message)) => {
                    if attempt >= self.max_attempts {
                        error!(attempt, error = %message, "headline fetch exhausted retries");
                        return Err(FetchError::Transport(message));
                    }
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        delay_secs = self.retry_delay.as_secs(),
                        error = %message,
                        "transient fetch failure; backing off"
                    );
                    self.pacer.pause(self.retry_delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceRef;
    use crate::pacing::RecordingPacer;
    use std::sync::Mutex;

    struct ScriptedSource {
        replies: Mutex<Vec<Result<Vec<HeadlineRecord>, FetchError>>>,
        calls: Mutex<usize>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Result<Vec<HeadlineRecord>, FetchError>>) -> Self {
            Self {
                replies: Mutex::new(replies),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    impl HeadlineSource for ScriptedSource {
        async fn top_headlines(
            &self,
            _country: &str,
            _page_size: u32,
        ) -> Result<Vec<HeadlineRecord>, FetchError> {
            *self.calls.lock().unwrap() += 1;
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn records() -> Vec<HeadlineRecord> {
        vec![HeadlineRecord {
            title: "Moo".to_string(),
            url: "https://example.com/moo".to_string(),
            source: SourceRef {
                name: "Example".to_string(),
            },
        }]
    }

    fn transient() -> FetchError {
        FetchError::Transport("connection reset".to_string())
    }

    #[tokio::test]
    async fn succeeds_after_two_transient_failures() {
        let source = ScriptedSource::new(vec![Err(transient()), Err(transient()), Ok(records())]);
        let pacer = RecordingPacer::new();
        let fetcher = RetryingFetcher::new(source, pacer);

        let fetched = fetcher.fetch("us", 20).await.unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetcher.source.calls(), 3);
        assert_eq!(fetcher.pacer.pauses(), vec![FETCH_RETRY_DELAY; 2]);
    }

    #[tokio::test]
    async fn exhausts_after_three_transient_failures() {
        let source =
            ScriptedSource::new(vec![Err(transient()), Err(transient()), Err(transient())]);
        let fetcher = RetryingFetcher::new(source, RecordingPacer::new());

        let err = fetcher.fetch("us", 20).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
        assert_eq!(fetcher.source.calls(), 3);
        assert_eq!(fetcher.pacer.pauses().len(), 2);
    }

    #[tokio::test]
    async fn api_error_is_not_retried() {
        let source = ScriptedSource::new(vec![Err(FetchError::Api {
            status: "error".to_string(),
            message: "apiKeyInvalid".to_string(),
        })]);
        let fetcher = RetryingFetcher::new(source, RecordingPacer::new());

        let err = fetcher.fetch("us", 20).await.unwrap_err();
        assert!(matches!(err, FetchError::Api { .. }));
        assert_eq!(fetcher.source.calls(), 1);
        assert!(fetcher.pacer.pauses().is_empty());
    }

    #[test]
    fn response_decode_requires_title_and_url() {
        let missing_url = r#"{"status":"ok","articles":[{"title":"Moo","source":{"name":"X"}}]}"#;
        assert!(serde_json::from_str::<TopHeadlinesResponse>(missing_url).is_err());

        let whole = r#"{"status":"ok","articles":[{"title":"Moo","url":"https://x.com","source":{"name":"X"}}]}"#;
        let decoded: TopHeadlinesResponse = serde_json::from_str(whole).unwrap();
        assert_eq!(decoded.articles.len(), 1);
    }
}
