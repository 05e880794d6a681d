//! Motivational messages and coaching chat over a hosted text-generation
//! model.
//!
//! [`CoachClient`] speaks the wire protocol, [`Coach`] owns the chat
//! session and turns every failure into a friendly fallback sentence.

mod client;
mod failure;
mod prompt;
mod session;

pub use client::{CoachClient, GenerationParams};
pub use failure::{FailureClass, Surface, CHAT_EMPTY_FALLBACK, MOTIVATION_EMPTY_FALLBACK};
pub use prompt::{chat_prompt, motivation_prompt, DayContext};
pub use session::{ChatMessage, Coach, Motivation};
