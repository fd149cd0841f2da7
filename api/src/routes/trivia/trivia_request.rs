use serde_json::Value;

/// Body of `POST /trivia/generate-sports-trivia`.
///
/// Any well-formed JSON is accepted at extraction; a body that is not an
/// object, or lacks a usable `prompt`, is rejected by the handler with 400.
#[derive(Debug)]
pub struct GenerateTriviaRequest<'a> {
    body: &'a Value,
}

impl<'a> GenerateTriviaRequest<'a> {
    pub fn new(body: &'a Value) -> Self {
        Self { body }
    }

    /// The trimmed prompt when it is a non-empty string.
    pub fn topic(&self) -> Option<&'a str> {
        self.body
            .get("prompt")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|p| !p.is_empty())
    }
}
