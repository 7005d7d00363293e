use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "ask-gateway")]
#[command(about = "Rate-limited question answering gateway with a model fallback")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base URL of the chat completions API
    #[arg(long, default_value = "https://api.openai.com/v1")]
    pub model_url: String,

    // Model to use for fallback answers
    #[arg(short, long, default_value = "gpt-3.5-turbo")]
    pub model: String,

    // Path to the predefined answer table
    #[arg(short, long, default_value = "data/answers.json")]
    pub answers: String,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = 300)]
    pub cache_ttl: u64,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 10)]
    pub rate_limit: u32,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 60)]
    pub rate_window: u64,
}
