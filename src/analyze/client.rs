use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub const DEFAULT_ANALYZE_ENDPOINT: &str = "http://localhost:8000/analyze-webpage";

const DEFAULT_REJECTION_MESSAGE: &str = "error analyzing the page";

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("could not reach the page analyzer: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("page analyzer rejected the request: {0}")]
    Rejected(String),

    #[error("could not encode the page description: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Serialize)]
struct AnalyzeRequest<'a> {
    link: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    success: bool,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the upstream service that turns a page URL into an element
/// description.
pub struct AnalyzerClient {
    pub endpoint: String,
    client: reqwest::Client,
}

impl Default for AnalyzerClient {
    fn default() -> Self {
        Self::new(DEFAULT_ANALYZE_ENDPOINT)
    }
}

impl AnalyzerClient {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Analyze `url` and return the percent-encoded description, ready to
    /// be passed as the `actions` query parameter.
    pub async fn analyze(&self, url: &str) -> Result<String, AnalyzeError> {
        tracing::info!(url, endpoint = %self.endpoint, "requesting page analysis");

        let response: AnalyzeResponse = self
            .client
            .post(&self.endpoint)
            .json(&AnalyzeRequest { link: url })
            .send()
            .await
            .map_err(AnalyzeError::Transport)?
            .json()
            .await
            .map_err(AnalyzeError::Transport)?;

        encode_analysis(response)
    }
}

fn encode_analysis(response: AnalyzeResponse) -> Result<String, AnalyzeError> {
    match (response.success, response.data) {
        (true, Some(data)) if !data.is_null() => {
            let json = serde_json::to_string(&data).map_err(AnalyzeError::Encode)?;
            Ok(urlencoding::encode(&json).into_owned())
        }
        _ => Err(AnalyzeError::Rejected(
            response
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_REJECTION_MESSAGE.to_string()),
        )),
    }
}

/// `?actions=<encoded>` query for an encoded description.
pub fn actions_query(encoded: &str) -> String {
    format!("?actions={}", encoded)
}
