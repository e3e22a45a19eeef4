use serde::{Deserialize, Serialize};

// Incoming /generate body
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct GenerateRequest {
    pub prompt: String,
    pub system: String,
}

// Outgoing /generate body
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct GenerateResponse {
    pub response: String,
}

// Chat-completion API request format
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatCompletionRequest {
    // system message first, then the user prompt
    pub fn new(model: &str, system: &str, prompt: &str) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        }
    }
}

// Chat-completion API response format
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: String,
}

impl ChatCompletionResponse {
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}
