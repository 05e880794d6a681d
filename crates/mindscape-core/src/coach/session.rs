//! Coaching session: motivation requests and the chat transcript.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::client::{CoachClient, GenerationParams};
use super::failure::{FailureClass, Surface, CHAT_EMPTY_FALLBACK, MOTIVATION_EMPTY_FALLBACK};
use super::prompt::{chat_prompt, motivation_prompt, DayContext};
use crate::storage::CoachConfig;

const DEFAULT_HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub is_user_message: bool,
}

impl ChatMessage {
    pub fn new(text: impl Into<String>, is_user_message: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            is_user_message,
        }
    }
}

/// Outcome of a motivation request. Always displayable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Motivation {
    pub message: String,
    pub is_error: bool,
}

pub struct Coach {
    client: CoachClient,
    history: Vec<ChatMessage>,
    history_window: usize,
}

impl Coach {
    pub fn new(client: CoachClient) -> Self {
        Self {
            client,
            history: Vec::new(),
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn from_config(config: &CoachConfig) -> Self {
        Self::new(CoachClient::from_config(config)).with_history_window(config.history_window)
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window.max(1);
        self
    }

    pub fn client(&self) -> &CoachClient {
        &self.client
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Ask for a short motivational message about today.
    pub async fn motivation(&self, ctx: &DayContext) -> Motivation {
        let prompt = motivation_prompt(ctx);
        match self.client.generate(&prompt, GenerationParams::MOTIVATION).await {
            Ok(text) => {
                let text = single_line(&text);
                Motivation {
                    message: if text.is_empty() {
                        MOTIVATION_EMPTY_FALLBACK.to_string()
                    } else {
                        text
                    },
                    is_error: false,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "motivation request failed");
                Motivation {
                    message: FailureClass::of(&e).message(Surface::Motivation).to_string(),
                    is_error: true,
                }
            }
        }
    }

    /// Send one chat turn and append the assistant's answer.
    ///
    /// Blank input is ignored and returns `None`. Without a credential only
    /// the disabled-feature notice is appended. Otherwise the trimmed user
    /// message is appended before the request, followed by the reply or a
    /// fallback sentence.
    pub async fn send_chat(&mut self, text: &str, ctx: &DayContext) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if !self.client.has_credential() {
            let notice = FailureClass::MissingCredential.message(Surface::Chat);
            return Some(self.append_assistant(notice));
        }

        self.history.push(ChatMessage::new(text, true));
        let prompt = chat_prompt(ctx, &self.history, self.history_window);
        let reply = match self.client.generate(&prompt, GenerationParams::CHAT).await {
            Ok(reply) if reply.trim().is_empty() => CHAT_EMPTY_FALLBACK.to_string(),
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(error = %e, "chat request failed");
                FailureClass::of(&e).message(Surface::Chat).to_string()
            }
        };
        Some(self.append_assistant(&reply))
    }

    fn append_assistant(&mut self, text: &str) -> &ChatMessage {
        self.history.push(ChatMessage::new(single_line(text), false));
        &self.history[self.history.len() - 1]
    }
}

fn single_line(text: &str) -> String {
    text.trim().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> DayContext {
        DayContext {
            today_rating: None,
            completed_todos: 1,
            todo_goal: 3,
        }
    }

    fn coach_for(url: String) -> Coach {
        Coach::new(CoachClient::new(url, Some("hf_test".into())))
    }

    #[test]
    fn chat_message_uses_camel_case() {
        let msg = ChatMessage::new("hi", true);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["isUserMessage"], true);
        assert_eq!(json["text"], "hi");
    }

    #[tokio::test]
    async fn motivation_is_single_lined() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"[{"generated_text":"\n Nice work.\nKeep it up. \n"}]"#)
            .create_async()
            .await;

        let m = coach_for(server.url()).motivation(&ctx()).await;
        assert_eq!(m.message, "Nice work. Keep it up.");
        assert!(!m.is_error);
    }

    #[tokio::test]
    async fn empty_motivation_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"[{"generated_text":"   "}]"#)
            .create_async()
            .await;

        let m = coach_for(server.url()).motivation(&ctx()).await;
        assert_eq!(m.message, MOTIVATION_EMPTY_FALLBACK);
        assert!(!m.is_error);
    }

    #[tokio::test]
    async fn motivation_failure_is_flagged() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(401)
            .create_async()
            .await;

        let m = coach_for(server.url()).motivation(&ctx()).await;
        assert_eq!(m.message, "AI features unavailable — check your API key.");
        assert!(m.is_error);
    }

    #[tokio::test]
    async fn motivation_without_key() {
        let coach = Coach::new(CoachClient::new("http://127.0.0.1:9", None));
        let m = coach.motivation(&ctx()).await;
        assert_eq!(m.message, "AI features unavailable — missing API key.");
        assert!(m.is_error);
    }

    #[tokio::test]
    async fn rate_limited_chat_appends_fallback_after_user_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(429)
            .with_body("slow down")
            .create_async()
            .await;

        let mut coach = coach_for(server.url());
        let reply = coach.send_chat("  help me plan  ", &ctx()).await.unwrap();
        assert_eq!(
            reply.text,
            "The AI is a bit busy (rate limited). Try again shortly."
        );

        let history = coach.history();
        assert_eq!(history.len(), 2);
        assert!(history[0].is_user_message);
        assert_eq!(history[0].text, "help me plan");
        assert!(!history[1].is_user_message);
    }

    #[tokio::test]
    async fn chat_reply_is_appended() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .match_body(mockito::Matcher::Regex("User: hello".into()))
            .with_status(200)
            .with_body(r#"[{"generated_text":"Start with\nthe smallest task."}]"#)
            .create_async()
            .await;

        let mut coach = coach_for(server.url());
        coach.send_chat("hello", &ctx()).await;
        assert_eq!(coach.history()[1].text, "Start with the smallest task.");
    }

    #[tokio::test]
    async fn empty_chat_reply_uses_fallback() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let mut coach = coach_for(server.url());
        coach.send_chat("hello", &ctx()).await;
        assert_eq!(coach.history()[1].text, CHAT_EMPTY_FALLBACK);
    }

    #[tokio::test]
    async fn blank_chat_is_ignored() {
        let mut coach = coach_for("http://127.0.0.1:9".into());
        assert!(coach.send_chat(" \n ", &ctx()).await.is_none());
        assert!(coach.history().is_empty());
    }

    #[tokio::test]
    async fn chat_without_key_appends_notice_only() {
        let mut coach = Coach::new(CoachClient::new("http://127.0.0.1:9", None));
        coach.send_chat("hello", &ctx()).await;
        let history = coach.history();
        assert_eq!(history.len(), 1);
        assert!(!history[0].is_user_message);
        assert_eq!(history[0].text, "AI features unavailable — missing API key.");
    }
}
