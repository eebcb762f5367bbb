//! # Recommendation Chat
//!
//! Proxy between the frontend chat widget and an OpenAI-compatible
//! completion endpoint.
//!
//! The frontend could call the completion API itself, but the proxy keeps
//! the API key server-side and lets the backend fold the caller's shelf
//! into the system prompt. The extra hop is one JSON round trip on the
//! same request path that already talks to the store; against the latency
//! of the completion call itself it is noise.
//!
//! The caller ships its current shelf in the request (`userBooks`), so no
//! extra store read happens here and the endpoint stays stateless.
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{config::Config, error::AppError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub user_books: Vec<LibraryEntry>,
    #[serde(default)]
    pub is_new_user: bool,
}

/// The slice of a book the prompt cares about. Extra fields on the wire
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct LibraryEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub rating: Option<i64>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Deserialize)]
struct Completion {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

pub async fn recommend(
    http: &Client,
    config: &Config,
    request: &ChatRequest,
) -> Result<ChatResponse, AppError> {
    let key = config
        .recommender_key
        .as_deref()
        .ok_or(AppError::RecommenderUnavailable)?;

    let payload = json!({
        "model": config.recommender_model,
        "messages": [
            { "role": "system", "content": system_prompt(request) },
            { "role": "user", "content": request.message },
        ],
    });

    let completion: Completion = http
        .post(&config.recommender_url)
        .bearer_auth(key)
        .json(&payload)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    let response = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content)
        .unwrap_or_else(|| {
            "I couldn't come up with a recommendation, please try again.".to_string()
        });

    Ok(ChatResponse { response })
}

fn system_prompt(request: &ChatRequest) -> String {
    let mut prompt = String::from(
        "You are a friendly book recommendation assistant for a personal \
         reading tracker. Suggest a handful of specific books with a short \
         reason for each, and keep answers concise.",
    );

    if request.is_new_user || request.user_books.is_empty() {
        prompt.push_str(
            " The reader has not tracked any books yet, so recommend popular, \
             accessible titles across a few genres.",
        );
        return prompt;
    }

    prompt.push_str("\n\nThe reader's shelf so far:\n");
    for entry in &request.user_books {
        prompt.push_str(&format!("- {} by {}", entry.name, entry.author));
        if let Some(rating) = entry.rating {
            prompt.push_str(&format!(", rated {rating}/5"));
        }
        if let Some(category) = &entry.category {
            prompt.push_str(&format!(" ({category})"));
        }
        prompt.push('\n');
    }
    prompt.push_str(
        "\nLean on these titles and ratings, and never recommend a book \
         already on the shelf.",
    );

    prompt
}
