use tokio::sync::mpsc;

use crate::answers::AnswerTable;
use crate::models::QueuedQuestion;
use crate::rate_limit::RateLimiter;

// app's shared state
pub struct AppState {
    pub answers: AnswerTable,
    pub rate_limiter: RateLimiter,
    pub ask_tx: mpsc::Sender<QueuedQuestion>,
}
