use lazy_static::lazy_static;
use prometheus::{Counter, Gauge, Histogram, register_counter, register_gauge, register_histogram};

lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("ask_requests_total", "Total number of questions received").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("ask_rate_limited_total", "Total requests denied by the rate limiter")
            .unwrap();
    pub static ref TABLE_HITS: Counter =
        register_counter!("ask_table_hits_total", "Questions answered from the static table")
            .unwrap();
    pub static ref CACHE_HITS: Counter =
        register_counter!("ask_cache_hits_total", "Total cache hits").unwrap();
    pub static ref CACHE_MISSES: Counter =
        register_counter!("ask_cache_misses_total", "Total cache misses").unwrap();
    pub static ref MODEL_REQUESTS: Counter =
        register_counter!("ask_model_requests_total", "Calls made to the upstream model API")
            .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "ask_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
    pub static ref CACHE_SIZE: Gauge =
        register_gauge!("ask_cache_size", "Current number of items in cache").unwrap();
    pub static ref TRACKED_CLIENTS: Gauge = register_gauge!(
        "ask_rate_limiter_clients",
        "Client records currently tracked by the rate limiter"
    )
    .unwrap();
}
