//! User-facing reply texts.

use larisa_types::llm::LlmError;

/// Reply to `/start`.
pub const GREETING: &str =
    "Hi! My name is Larisa. Send me any question and I will do my best to answer it.";

/// Reply to `/clear`.
pub const HISTORY_CLEARED: &str = "Conversation history cleared!";

/// Sent by the global error callback when a handler fails.
pub const GENERIC_APOLOGY: &str =
    "❌ An error occurred while processing the request. Please try again.";

/// Longest excerpt of an upstream error shown to the user.
const ERROR_DETAIL_CHARS: usize = 200;

/// Reply for a completion that came back with a non-success status.
///
/// When the body is JSON with a string `error.message`, that message is
/// quoted; otherwise the raw body is. Either way at most 200 characters.
pub fn api_error(status: u16, body: &str) -> String {
    let mut reply = format!("❌ *API error* (code {status})");
    if !body.is_empty() {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .map(str::to_owned)
            })
            .unwrap_or_else(|| body.to_string());
        reply.push_str(&format!("\n\n`{}...`", truncate_chars(&detail, ERROR_DETAIL_CHARS)));
    }
    reply
}

/// Reply for a completion that failed before producing a response.
pub fn request_failed(error: &LlmError) -> String {
    format!("❌ An error occurred: `{error}`")
}

/// First `max` characters of `text`.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
