use serde::{Deserialize, Serialize};

/// One turn of the conversation. Ordering within the history is
/// chronological and significant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Inbound request body. `conversationHistory` defaults to empty.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub conversation_history: Vec<ChatMessage>,
}

/// Success response: the reply plus the history extended with it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSuccess {
    pub success: bool,
    pub response: String,
    pub conversation_history: Vec<ChatMessage>,
}

/// Payload sent to the upstream `/generate` endpoint. The sampling
/// parameters are fixed, not per-call tunables.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub do_sample: bool,
}

impl GenerationRequest {
    pub fn new(prompt: String) -> Self {
        Self {
            prompt,
            max_new_tokens: 512,
            temperature: 0.7,
            top_p: 0.9,
            do_sample: true,
        }
    }
}

/// Parsed upstream response. `generated_text` is guaranteed non-empty once
/// this exists; `response_time` is informational.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub generated_text: String,
    pub response_time: Option<f64>,
}
