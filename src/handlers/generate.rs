use axum::{Json, body::Bytes, extract::State, extract::rejection::BytesRejection};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};
use crate::cache::fingerprint;
use crate::error::RelayError;
use crate::state::AppState;
use crate::models::{ChatCompletionRequest, GenerateRequest, GenerateResponse};
use crate::metrics::{CACHE_HITS, CACHE_MISSES, REQUEST_LATENCY, REQUEST_TOTAL, UPSTREAM_ERRORS};

// Markdown emphasis is dropped from completions before caching
fn strip_emphasis(text: &str) -> String {
    text.replace('*', "")
}

// Call upstream and cache the cleaned first choice
async fn fetch_and_store(
    state: Arc<AppState>,
    cache_key: String,
    input: GenerateRequest,
) -> Result<String, RelayError> {
    let request = ChatCompletionRequest::new(&state.model, &input.system, &input.prompt);

    let completion = state.upstream.send_completion(&request).await.map_err(|e| {
        UPSTREAM_ERRORS.inc();
        warn!(error = %e, "Upstream completion failed");
        RelayError::from(e)
    })?;

    let Some(content) = completion.first_content() else {
        UPSTREAM_ERRORS.inc();
        warn!("Upstream returned no choices");
        return Err(RelayError::NoResponse);
    };

    let response = strip_emphasis(content);
    state.cache.set(cache_key, response.clone());
    Ok(response)
}

// Decode, consult the cache, fall through to upstream on a miss
async fn generate(
    state: Arc<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<String, RelayError> {
    let body = body.map_err(|e| {
        debug!(error = %e, "Unreadable request body");
        RelayError::BadBody
    })?;
    let input: GenerateRequest = serde_json::from_slice(&body)?;

    let cache_key = fingerprint(&input.system, &input.prompt);
    let short_key = &cache_key[..8];

    // check cache first
    if let Some(response) = state.cache.get(&cache_key) {
        CACHE_HITS.inc();
        debug!(key = short_key, "Cache HIT");
        return Ok(response);
    }
    CACHE_MISSES.inc();
    debug!(key = short_key, "Cache MISS - calling upstream");

    // Detached so a client hanging up does not abort the call or the cache write
    tokio::spawn(fetch_and_store(state, cache_key, input)).await?
}

pub async fn generate_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<GenerateResponse>, RelayError> {
    REQUEST_TOTAL.inc();
    let start_time = Instant::now();

    let result = generate(state, body).await;

    // every outcome counts, errors included
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    result.map(|response| Json(GenerateResponse { response }))
}
