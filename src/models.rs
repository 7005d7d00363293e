use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

// Incoming question
#[derive(Deserialize, Serialize, Clone)]
pub struct AskRequest {
    pub question: String,
}

// Outgoing answer
#[derive(Deserialize, Serialize, Clone)]
pub struct AskResponse {
    pub answer: String,
}

// Chat completions wire format (request side)
#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

// Chat completions wire format (response side) - only what we read
#[derive(Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

// Queued question - holds the question + response channel
pub struct QueuedQuestion {
    pub question: String, // original question text
    pub reply_tx: oneshot::Sender<Result<String, String>>, // one-time channel to send back the answer
}
