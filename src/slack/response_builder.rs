//! Payload helpers for Slack incoming webhooks.

use serde_json::{Value, json};

/// Appended (on its own line) to text cut by [`truncate_message`].
pub const TRUNCATION_NOTICE: &str = "\n…(truncated)";

/// Create the JSON body for an incoming webhook post.
///
/// # Examples
///
/// ```
/// use release_notifier::slack::response_builder::create_webhook_payload;
///
/// let payload = create_webhook_payload("serde v1.0.200 released");
/// assert_eq!(payload["text"], "serde v1.0.200 released");
/// ```
#[must_use]
pub fn create_webhook_payload(text: &str) -> Value {
    json!({ "text": text })
}

/// Cut `text` to at most `max_chars` characters, notice included.
///
/// Returns the text to send and whether it was shortened. The cut always
/// falls on a character boundary and is deterministic.
#[must_use]
pub fn truncate_message(text: &str, max_chars: usize) -> (String, bool) {
    if text.chars().count() <= max_chars {
        return (text.to_string(), false);
    }
    let notice_len = TRUNCATION_NOTICE.chars().count();
    if max_chars <= notice_len {
        return (text.chars().take(max_chars).collect(), true);
    }
    let mut out: String = text.chars().take(max_chars - notice_len).collect();
    out.push_str(TRUNCATION_NOTICE);
    (out, true)
}
