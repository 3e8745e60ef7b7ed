use reqwest::Url;
use std::future::Future;
use thiserror::Error;

use crate::models::CandidatePage;
use crate::query::OutboundQuery;

const CANDIDATES_PATH: &str = "/api/candidates";

/// A failed candidate fetch. `Display` is the text shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(
        "Unable to connect to the backend server. Please make sure the backend is running on {base_url}"
    )]
    Connect { base_url: String },
    #[error("Failed to fetch candidates")]
    Status(reqwest::StatusCode),
    #[error("{0}")]
    Decode(String),
    #[error("{0}")]
    InvalidUrl(String),
    #[error("{0}")]
    Transport(String),
}

/// Anything that can answer a candidate search.
pub trait CandidateSource: Send + Sync + 'static {
    fn fetch(
        &self,
        query: &OutboundQuery,
    ) -> impl Future<Output = Result<CandidatePage, FetchError>> + Send;

    fn base_url(&self) -> &str;
}

#[derive(Debug, Clone)]
pub struct HttpCandidateSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCandidateSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn request_url(&self, query: &OutboundQuery) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, CANDIDATES_PATH))
            .map_err(|e| FetchError::InvalidUrl(format!("Invalid API base URL '{}': {}", self.base_url, e)))?;
        let pairs = query.to_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> FetchError {
        if err.is_connect() || err.is_timeout() {
            FetchError::Connect {
                base_url: self.base_url.clone(),
            }
        } else {
            FetchError::Transport(err.to_string())
        }
    }
}

impl CandidateSource for HttpCandidateSource {
    async fn fetch(&self, query: &OutboundQuery) -> Result<CandidatePage, FetchError> {
        let url = self.request_url(query)?;
        tracing::debug!(%url, "requesting candidates");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        CandidatePage::from_json(&body)
            .map_err(|e| FetchError::Decode(format!("Failed to parse candidates response: {}", e)))
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> OutboundQuery {
        OutboundQuery {
            search: Some("ada lovelace".to_string()),
            full_text_search: true,
            source: vec!["LinkedIn".to_string(), "Stack Overflow".to_string()],
            has_availability: Some(false),
            ..Default::default()
        }
    }

    #[test]
    fn test_request_url_repeats_multi_valued_params() {
        let source = HttpCandidateSource::new("http://localhost:8000/");
        let url = source.request_url(&query()).unwrap();
        assert_eq!(url.path(), "/api/candidates");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("search".to_string(), "ada lovelace".to_string()),
                ("full_text_search".to_string(), "true".to_string()),
                ("source".to_string(), "LinkedIn".to_string()),
                ("source".to_string(), "Stack Overflow".to_string()),
                ("has_availability".to_string(), "false".to_string()),
            ]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let source = HttpCandidateSource::new("http://api.example.com/");
        assert_eq!(source.base_url(), "http://api.example.com");
    }

    #[test]
    fn test_invalid_base_url() {
        let source = HttpCandidateSource::new("not a url");
        let err = source.request_url(&OutboundQuery::default()).unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_error_messages() {
        let err = FetchError::Connect {
            base_url: "http://localhost:8000".to_string(),
        };
        assert!(err.to_string().contains("http://localhost:8000"));
        assert_eq!(
            FetchError::Status(reqwest::StatusCode::INTERNAL_SERVER_ERROR).to_string(),
            "Failed to fetch candidates"
        );
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_connect_error() {
        // Port 9 (discard) on loopback is closed in any sane test environment.
        let source = HttpCandidateSource::new("http://127.0.0.1:9");
        let err = source.fetch(&OutboundQuery::default()).await.unwrap_err();
        assert!(matches!(err, FetchError::Connect { .. }), "got {:?}", err);
        assert!(err.to_string().contains("http://127.0.0.1:9"));
    }
}
