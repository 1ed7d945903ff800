use url::form_urlencoded::byte_serialize;

/// Default base URL for Generative Language API requests.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Build a `generateContent` endpoint URL from a base URL, model id, and
/// credential.
///
/// Rules:
/// 1) a blank base falls back to [`DEFAULT_GEMINI_BASE_URL`]
/// 2) trailing slashes on the base are dropped
/// 3) the credential rides in the `key` query parameter, percent-encoded
pub fn generate_content_url(base_url: &str, model: &str, api_key: &str) -> String {
    let base = if base_url.trim().is_empty() {
        DEFAULT_GEMINI_BASE_URL
    } else {
        base_url.trim()
    };
    let base = base.trim_end_matches('/');
    let key: String = byte_serialize(api_key.as_bytes()).collect();
    format!("{base}/models/{model}:generateContent?key={key}")
}
