use std::sync::Arc;
use crate::cache::ResponseCache;
use crate::upstream::CompletionClient;
// app's shared state

pub struct AppState {
    pub cache: Arc<ResponseCache>,              // fingerprint -> response text
    pub upstream: Arc<dyn CompletionClient>,    // chat-completion API
    pub model: String,                          // model sent upstream on a miss
}
