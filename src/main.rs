mod answers;
mod cache;
mod config;
mod handlers;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod worker;

use axum::{
    Router,
    routing::{get, post},
};
use clap::Parser;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::answers::AnswerTable;
use crate::config::Args;
use crate::handlers::{ask_handler, health_handler, metrics_handler};
use crate::models::QueuedQuestion;
use crate::rate_limit::RateLimiter;
use crate::state::AppState;
use crate::worker::answer_worker;

// this is main async function with tokio
#[tokio::main]
async fn main() {
    // parse cli arguments
    let args = Args::parse();

    let answers = AnswerTable::load(&args.answers).expect("Failed to load answer table");

    let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();
    if api_key.is_empty() {
        println!("Warning: OPENAI_API_KEY not set, unmatched questions will fail");
    }

    let (ask_tx, ask_rx) = mpsc::channel::<QueuedQuestion>(100);

    // creating shared state
    let state = Arc::new(AppState {
        answers,
        rate_limiter: RateLimiter::new(Duration::from_secs(args.rate_window), args.rate_limit),
        ask_tx,
    });

    // spawn the background worker that talks to the model API
    let worker_client = reqwest::Client::new();
    let worker_url = args.model_url.clone();
    let worker_model = args.model.clone();
    let worker_cache = DashMap::new();
    let worker_ttl = Duration::from_secs(args.cache_ttl);

    tokio::spawn(async move {
        answer_worker(
            ask_rx,
            worker_client,
            worker_url,
            api_key,
            worker_model,
            worker_cache,
            worker_ttl,
        )
        .await;
    });

    // creating the router with routes
    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/ask", post(ask_handler)) // post route
        .route("/metrics", get(metrics_handler)) // metrics endpoint
        .with_state(Arc::clone(&state));

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();

    println!("Gateway running on http://localhost:{}", args.port);
    println!(
        "Answer table: {} entries from {}",
        state.answers.len(),
        args.answers
    );
    println!("Model fallback: {} at {}", args.model, args.model_url);
    println!("Cache TTL: {} seconds", args.cache_ttl);
    println!(
        "Rate limit: {} requests per {} seconds",
        args.rate_limit, args.rate_window
    );
    axum::serve(listener, app).await.unwrap();
}
