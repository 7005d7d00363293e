use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::RETRY_AFTER},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;

use crate::metrics::{
    RATE_LIMITED, REQUEST_LATENCY, REQUEST_TOTAL, TABLE_HITS, TRACKED_CLIENTS,
};
use crate::models::{AskRequest, AskResponse, QueuedQuestion};
use crate::rate_limit::RateLimitDecision;
use crate::state::AppState;

// Take the first hop of x-forwarded-for, fall back to the shared sentinel
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn rate_limit_headers(decision: &RateLimitDecision) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("x-ratelimit-remaining", decision.remaining.into());
    headers.insert("x-ratelimit-reset", decision.reset_at.timestamp().into());
    headers
}

fn too_many_requests(decision: &RateLimitDecision) -> Response {
    let mut headers = rate_limit_headers(decision);
    let retry_after = (decision.reset_at - Utc::now()).num_seconds().max(0);
    headers.insert(RETRY_AFTER, retry_after.into());

    (
        StatusCode::TOO_MANY_REQUESTS,
        headers,
        Json(serde_json::json!({
            "error": "Too many questions. Try again later.",
            "reset_at": decision.reset_at.to_rfc3339(),
        })),
    )
        .into_response()
}

fn service_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({ "error": message })),
    )
        .into_response()
}

// POST /api/ask
pub async fn ask_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(payload): Json<AskRequest>,
) -> Response {
    REQUEST_TOTAL.inc();

    // admission check happens before any lookup or model work
    let ip = client_ip(&headers);
    let decision = state.rate_limiter.check(&ip);
    TRACKED_CLIENTS.set(state.rate_limiter.tracked_clients() as f64);

    if !decision.allowed {
        RATE_LIMITED.inc();
        return too_many_requests(&decision);
    }

    let start_time = Instant::now();

    // static table first, model only when nothing matches
    if let Some(answer) = state.answers.lookup(&payload.question) {
        TABLE_HITS.inc();
        REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
        return (
            rate_limit_headers(&decision),
            Json(AskResponse {
                answer: answer.to_string(),
            }),
        )
            .into_response();
    }

    // Create oneshot channel for the answer
    let (reply_tx, reply_rx) = oneshot::channel();

    let queued = QueuedQuestion {
        question: payload.question,
        reply_tx,
    };

    if state.ask_tx.send(queued).await.is_err() {
        return service_error("Failed to queue question");
    }

    // wait for the answer from the worker
    let reply = match reply_rx.await {
        Ok(reply) => reply,
        Err(_) => return service_error("Worker failed to respond"),
    };

    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());

    match reply {
        Ok(answer) => (rate_limit_headers(&decision), Json(AskResponse { answer })).into_response(),
        Err(e) => {
            println!("[Handler] Model call failed: {}", e);
            service_error("Sorry, something went wrong while answering your question.")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_forwarded_header_maps_to_unknown() {
        assert_eq!(client_ip(&HeaderMap::new()), "unknown");
    }

    #[test]
    fn takes_first_hop_of_forwarded_chain() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "1.2.3.4, 10.0.0.1".parse().unwrap());
        assert_eq!(client_ip(&headers), "1.2.3.4");
    }

    #[test]
    fn empty_forwarded_header_maps_to_unknown() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "".parse().unwrap());
        assert_eq!(client_ip(&headers), "unknown");
    }
}
