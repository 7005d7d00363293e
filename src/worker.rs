use dashmap::DashMap;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::cache::{CacheEntry, make_cache_key};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, CACHE_SIZE, MODEL_REQUESTS};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, QueuedQuestion};

const SYSTEM_PROMPT: &str = "You are the official virtual assistant of a town's \
municipal information service. Be courteous and professional, and give accurate \
information about the town, its services and events. If you are not sure about \
something, say so honestly. Avoid controversial political topics and sensitive \
data. Always answer concisely.";

// Background worker - answers queued questions one by one
pub async fn answer_worker(
    mut rx: mpsc::Receiver<QueuedQuestion>,
    client: reqwest::Client,
    model_url: String,
    api_key: String,
    model: String,
    cache: DashMap<String, CacheEntry>,
    ttl: Duration,
) {
    println!("Answer worker started - processing questions sequentially");

    // keep receiving questions from the queue
    while let Some(queued) = rx.recv().await {
        let cache_key = make_cache_key(&model, &queued.question);

        // check cache first
        if let Some(entry) = cache.get(&cache_key) {
            if entry.created_at.elapsed() < ttl {
                CACHE_HITS.inc();
                println!("[Worker] Cache HIT");
                let _ = queued.reply_tx.send(Ok(entry.answer.clone()));
                continue;
            }
        }
        CACHE_MISSES.inc();

        if api_key.is_empty() {
            let _ = queued
                .reply_tx
                .send(Err("Model API key not configured".to_string()));
            continue;
        }
        println!("[Worker] Cache MISS - calling model API");
        MODEL_REQUESTS.inc();

        let request = ChatRequest {
            model: model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: queued.question.clone(),
                },
            ],
            temperature: 0.7,
            max_tokens: 500,
        };

        // Call the chat completions API
        let result = client
            .post(format!("{}/chat/completions", model_url))
            .bearer_auth(&api_key)
            .json(&request)
            .send()
            .await;

        let reply = match result {
            Ok(res) => match res.json::<ChatResponse>().await {
                Ok(body) => match body.choices.into_iter().next() {
                    Some(choice) => {
                        let answer = choice.message.content;
                        // saving to cache
                        cache.insert(
                            cache_key,
                            CacheEntry {
                                answer: answer.clone(),
                                created_at: Instant::now(),
                            },
                        );
                        CACHE_SIZE.set(cache.len() as f64);
                        Ok(answer)
                    }
                    None => Err("Model returned no choices".to_string()),
                },
                Err(e) => Err(format!("Parse error: {}", e)),
            },
            Err(e) => Err(format!("Request failed: {}", e)),
        };

        // Send the answer back to the handler
        let _ = queued.reply_tx.send(reply);
    }
}
