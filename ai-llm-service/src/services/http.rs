//! JSON-over-HTTP plumbing shared by the provider clients.

use std::time::Instant;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, error};

use crate::error_handler::{
    AiLlmError, HttpError, Provider, ProviderError, ProviderErrorKind, make_snippet,
};

/// POSTs `body` to `url` and decodes the JSON reply into `R`.
///
/// Non-2xx statuses become [`ProviderErrorKind::HttpStatus`] carrying a short
/// body snippet; undecodable payloads become [`ProviderErrorKind::Decode`]
/// with `expected` as a hint.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    provider: Provider,
    url: &str,
    body: &B,
    expected: &str,
) -> Result<R, AiLlmError>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let started = Instant::now();
    debug!(%provider, "POST {url}");

    let resp = client.post(url).json(body).send().await?;

    let status = resp.status();
    if !status.is_success() {
        let text = resp.text().await.unwrap_or_default();
        let snippet = make_snippet(&text);
        error!(
            %provider,
            %status,
            %url,
            %snippet,
            latency_ms = started.elapsed().as_millis(),
            "upstream returned non-success status"
        );
        return Err(ProviderError::new(
            provider,
            ProviderErrorKind::HttpStatus(HttpError {
                status,
                url: url.to_string(),
                snippet,
            }),
        )
        .into());
    }

    let out = resp.json::<R>().await.map_err(|e| {
        error!(%provider, %url, error = %e, "failed to decode upstream response");
        ProviderError::new(
            provider,
            ProviderErrorKind::Decode(format!("serde error: {e}; expected {expected}")),
        )
    })?;

    debug!(
        %provider,
        latency_ms = started.elapsed().as_millis(),
        "upstream call completed"
    );
    Ok(out)
}

/// Returns the endpoint without a trailing slash, or `InvalidEndpoint`.
pub(crate) fn base_url(provider: Provider, endpoint: &str) -> Result<String, AiLlmError> {
    let endpoint = endpoint.trim();
    if endpoint.is_empty() || !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        return Err(ProviderError::new(
            provider,
            ProviderErrorKind::InvalidEndpoint(endpoint.to_string()),
        )
        .into());
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}
