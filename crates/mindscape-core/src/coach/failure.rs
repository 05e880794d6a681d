//! Mapping from generation failures to user-facing sentences.

use crate::error::CoachError;

/// Shown in place of an empty motivational reply.
pub const MOTIVATION_EMPTY_FALLBACK: &str = "You've got this! One task at a time! 🎯";
/// Shown in place of an empty chat reply.
pub const CHAT_EMPTY_FALLBACK: &str = "Let’s take a small, clear step: pick one task and spend 5 focused minutes on it. Then check in with me. 😊";

/// Where a message will be displayed. Only connectivity failures read
/// differently between the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Motivation,
    Chat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    MissingCredential,
    MalformedRequest,
    Unauthorized,
    Forbidden,
    RateLimited,
    ModelWarming,
    ServiceUnavailable,
    Other,
    Connectivity,
}

impl FailureClass {
    pub fn from_status(code: u16) -> Self {
        match code {
            400 => Self::MalformedRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            429 => Self::RateLimited,
            503 => Self::ModelWarming,
            500..=599 => Self::ServiceUnavailable,
            _ => Self::Other,
        }
    }

    pub fn of(err: &CoachError) -> Self {
        match err {
            CoachError::MissingCredential => Self::MissingCredential,
            CoachError::Status { code, .. } => Self::from_status(*code),
            CoachError::Transport(_) => Self::Connectivity,
        }
    }

    pub fn message(self, surface: Surface) -> &'static str {
        match self {
            Self::MissingCredential => "AI features unavailable — missing API key.",
            Self::MalformedRequest => "The AI request was malformed. Try again in a moment.",
            Self::Unauthorized => "AI features unavailable — check your API key.",
            Self::Forbidden => "Access to the model is restricted.",
            Self::RateLimited => "The AI is a bit busy (rate limited). Try again shortly.",
            Self::ModelWarming => "The model is spinning up. Try again in a few seconds.",
            Self::ServiceUnavailable => {
                "AI service is temporarily unavailable. Please try again soon."
            }
            Self::Other => "Something went wrong talking to the AI.",
            Self::Connectivity => match surface {
                Surface::Motivation => "You're doing great — small steps add up. Keep going! ✨",
                Surface::Chat => "I hit a snag connecting. Try again in a moment?",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(FailureClass::from_status(400), FailureClass::MalformedRequest);
        assert_eq!(FailureClass::from_status(401), FailureClass::Unauthorized);
        assert_eq!(FailureClass::from_status(403), FailureClass::Forbidden);
        assert_eq!(FailureClass::from_status(429), FailureClass::RateLimited);
        assert_eq!(FailureClass::from_status(503), FailureClass::ModelWarming);
        assert_eq!(FailureClass::from_status(500), FailureClass::ServiceUnavailable);
        assert_eq!(FailureClass::from_status(599), FailureClass::ServiceUnavailable);
        assert_eq!(FailureClass::from_status(404), FailureClass::Other);
        assert_eq!(FailureClass::from_status(302), FailureClass::Other);
    }

    #[test]
    fn connectivity_depends_on_surface() {
        let c = FailureClass::Connectivity;
        assert_ne!(c.message(Surface::Motivation), c.message(Surface::Chat));
        let r = FailureClass::RateLimited;
        assert_eq!(r.message(Surface::Motivation), r.message(Surface::Chat));
    }

    #[test]
    fn missing_credential_error_maps_to_class() {
        assert_eq!(
            FailureClass::of(&CoachError::MissingCredential),
            FailureClass::MissingCredential
        );
        let status = CoachError::Status {
            code: 401,
            body: String::new(),
        };
        assert_eq!(FailureClass::of(&status), FailureClass::Unauthorized);
    }
}
