//! HTTP client for the text-generation inference endpoint.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};

use crate::credentials;
use crate::error::CoachError;
use crate::storage::CoachConfig;

/// Sampling parameters for one generation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationParams {
    pub max_new_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub repetition_penalty: f64,
}

impl GenerationParams {
    pub const MOTIVATION: Self = Self {
        max_new_tokens: 120,
        temperature: 0.7,
        top_p: 0.95,
        repetition_penalty: 1.1,
    };

    pub const CHAT: Self = Self {
        max_new_tokens: 300,
        temperature: 0.7,
        top_p: 0.95,
        repetition_penalty: 1.1,
    };

    /// Smallest possible request, used for connectivity checks.
    pub const PING: Self = Self {
        max_new_tokens: 1,
        temperature: 0.1,
        top_p: 0.95,
        repetition_penalty: 1.0,
    };
}

#[derive(Serialize)]
struct TextRequest<'a> {
    inputs: &'a str,
    parameters: Parameters,
}

#[derive(Serialize)]
struct Parameters {
    max_new_tokens: u32,
    temperature: f64,
    top_p: f64,
    repetition_penalty: f64,
    return_full_text: bool,
}

impl From<GenerationParams> for Parameters {
    fn from(p: GenerationParams) -> Self {
        Self {
            max_new_tokens: p.max_new_tokens,
            temperature: p.temperature,
            top_p: p.top_p,
            repetition_penalty: p.repetition_penalty,
            return_full_text: false,
        }
    }
}

#[derive(Deserialize)]
struct TextResponseItem {
    generated_text: Option<String>,
}

pub struct CoachClient {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CoachClient {
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Endpoint from config, key from the environment or keyring.
    pub fn from_config(config: &CoachConfig) -> Self {
        Self::new(config.endpoint.clone(), credentials::hf_api_key())
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Generate a continuation of `prompt`.
    ///
    /// Returns the first non-empty `generated_text`, the raw body when the
    /// response has some other shape, or an empty string when the model
    /// produced nothing.
    pub async fn generate(
        &self,
        prompt: &str,
        params: GenerationParams,
    ) -> Result<String, CoachError> {
        let resp = self.post(prompt, params).await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "text generation rejected");
            return Err(CoachError::Status {
                code: status.as_u16(),
                body,
            });
        }
        Ok(extract_text(&body))
    }

    /// Send a one-token request and report the HTTP status.
    pub async fn ping(&self) -> Result<u16, CoachError> {
        let resp = self.post("ping", GenerationParams::PING).await?;
        Ok(resp.status().as_u16())
    }

    async fn post(&self, prompt: &str, params: GenerationParams) -> Result<Response, CoachError> {
        let key = self.api_key.as_deref().ok_or(CoachError::MissingCredential)?;
        let body = TextRequest {
            inputs: prompt,
            parameters: params.into(),
        };
        let resp = self
            .http
            .post(&self.endpoint)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await?;
        Ok(resp)
    }
}

fn extract_text(body: &str) -> String {
    match serde_json::from_str::<Vec<TextResponseItem>>(body) {
        Ok(items) => items
            .into_iter()
            .find_map(|item| item.generated_text.filter(|t| !t.is_empty()))
            .unwrap_or_default(),
        Err(_) => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    #[test]
    fn extract_prefers_generated_text() {
        assert_eq!(
            extract_text(r#"[{"generated_text":""},{"generated_text":"hi"}]"#),
            "hi"
        );
        assert_eq!(extract_text(r#"[{"generated_text":""}]"#), "");
        assert_eq!(extract_text("[]"), "");
        assert_eq!(extract_text(r#"{"error":"odd"}"#), r#"{"error":"odd"}"#);
        assert_eq!(extract_text(""), "");
    }

    #[tokio::test]
    async fn generate_sends_contract_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("authorization", "Bearer hf_test")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "hello",
                "parameters": {
                    "max_new_tokens": 120,
                    "temperature": 0.7,
                    "top_p": 0.95,
                    "repetition_penalty": 1.1,
                    "return_full_text": false
                }
            })))
            .with_status(200)
            .with_body(r#"[{"generated_text":" Keep going! "}]"#)
            .create_async()
            .await;

        let client = CoachClient::new(server.url(), Some("hf_test".into()));
        let text = client
            .generate("hello", GenerationParams::MOTIVATION)
            .await
            .unwrap();
        assert_eq!(text, " Keep going! ");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_carries_status_and_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(503)
            .with_body("loading")
            .create_async()
            .await;

        let client = CoachClient::new(server.url(), Some("hf_test".into()));
        let err = client
            .generate("x", GenerationParams::CHAT)
            .await
            .unwrap_err();
        match err {
            CoachError::Status { code, body } => {
                assert_eq!(code, 503);
                assert_eq!(body, "loading");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_key_never_hits_the_network() {
        let client = CoachClient::new("http://127.0.0.1:9", Some("   ".into()));
        assert!(!client.has_credential());
        let err = client.ping().await.unwrap_err();
        assert!(matches!(err, CoachError::MissingCredential));
    }

    #[tokio::test]
    async fn ping_reports_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_body(Matcher::PartialJson(json!({
                "inputs": "ping",
                "parameters": { "max_new_tokens": 1 }
            })))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = CoachClient::new(server.url(), Some("hf_test".into()));
        assert_eq!(client.ping().await.unwrap(), 200);
    }
}
