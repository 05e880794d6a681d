//! Prompt construction for motivation and chat.

use indoc::formatdoc;

use super::session::ChatMessage;
use crate::calendar::Rating;

/// Today's state as the coach sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayContext {
    pub today_rating: Option<Rating>,
    pub completed_todos: usize,
    /// The todo goal stands in for "total" in both prompts.
    pub todo_goal: u32,
}

pub fn motivation_prompt(ctx: &DayContext) -> String {
    let completed = ctx.completed_todos;
    let total = ctx.todo_goal as usize;

    let mut task = String::from("Create a brief motivational message for a user based on their day. ");
    match ctx.today_rating {
        Some(rating) => task.push_str(&format!(
            "They rated their day as '{}' ({}/6). ",
            rating.label(),
            rating.value()
        )),
        None => task.push_str("They haven't rated their day yet. "),
    }
    task.push_str(&format!(
        "They've completed {completed} out of {total} todo items today. "
    ));
    task.push_str(if total > 0 && completed == total {
        "Congratulate them on completing all tasks! "
    } else if completed > total / 2 {
        "Encourage them to finish strong. "
    } else if completed == 0 {
        "Motivate them to get started. "
    } else {
        "Encourage their progress so far. "
    });
    task.push_str("Keep it positive, personal, and under 3 sentences.");

    formatdoc! {"
        You are a supportive AI assistant that provides brief, personalized motivational messages (2–3 sentences max). Be encouraging, positive, and specific to the user's current situation.

        Task: {task}",
        task = task,
    }
}

/// System context, the last `window` messages, then an open assistant turn.
pub fn chat_prompt(ctx: &DayContext, history: &[ChatMessage], window: usize) -> String {
    let rating = ctx
        .today_rating
        .map_or_else(|| "nil".to_string(), |r| r.value().to_string());
    let start = history.len().saturating_sub(window);
    let conversation = history[start..]
        .iter()
        .map(|msg| {
            let speaker = if msg.is_user_message { "User" } else { "Assistant" };
            format!("{speaker}: {}", msg.text)
        })
        .collect::<Vec<_>>()
        .join("\n");

    formatdoc! {"
        You are an encouraging, succinct AI coach inside a personal productivity app.
        Style: supportive, actionable, concise. Prefer 1–4 sentences. Avoid fluff.
        If asked about today: rating={rating}, completed={completed}, goal={goal}.
        If user asks for help on tasks, suggest concrete next steps and keep tone positive.

        Conversation:
        {conversation}

        Assistant:",
        rating = rating,
        conversation = conversation,
        completed = ctx.completed_todos,
        goal = ctx.todo_goal,
    }
}
