//! Prompt assembly.
//!
//! The upstream model expects the whole conversation as one string: each
//! prior turn rendered as `"Role: content"`, then the new user message and
//! a trailing `"Assistant:"` cue, all joined with newlines.

use crate::models::ChatMessage;

pub fn build_prompt(history: &[ChatMessage], message: &str) -> String {
    let mut lines: Vec<String> = history
        .iter()
        .map(|turn| format!("{}: {}", capitalize(&turn.role), turn.content))
        .collect();
    lines.push(format!("User: {message}\nAssistant:"));
    lines.join("\n")
}

fn capitalize(role: &str) -> String {
    let mut chars = role.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
