use clap::Parser;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "prompt-relay")]
#[command(about = "Caching relay for a chat-completion API")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Cache TTL in seconds (one week)
    #[arg(short, long, default_value_t = 604_800, value_parser = clap::value_parser!(u64).range(1..))]
    pub cache_ttl: u64,

    // How often expired entries are swept, in seconds
    #[arg(long, default_value_t = 600, value_parser = clap::value_parser!(u64).range(1..))]
    pub sweep_interval: u64,

    // Chat-completion endpoint
    #[arg(long, default_value = DEFAULT_API_URL)]
    pub api_url: String,

    // Model sent with every upstream request
    #[arg(short, long, default_value = "gemma-7b-it")]
    pub model: String,

    // Environment variable holding the bearer token
    #[arg(long, default_value = "OPENAI_API_KEY")]
    pub api_key_var: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(String),
}

impl Args {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn sweep_every(&self) -> Duration {
        Duration::from_secs(self.sweep_interval)
    }

    // reads the bearer token, after .env has been loaded into the process environment
    pub fn load_api_key(&self) -> Result<String, ConfigError> {
        match std::env::var(&self.api_key_var) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey(self.api_key_var.clone())),
        }
    }
}
