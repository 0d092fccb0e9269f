//! Blocking HTTP transport.

use reqwest::blocking::Client;

use super::error::Result;

/// Maximum number of characters of the body logged at trace level.
const BODY_PREVIEW_CHARS: usize = 500;

/// Fully buffered HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

/// Sends one GET request and buffers the whole response body.
///
/// No retry is attempted. Non-200 statuses are not errors at this level;
/// the caller inspects [`RawResponse::status`].
///
/// # Errors
///
/// Returns [`NhkError::Transport`](super::NhkError::Transport) if the URL is
/// invalid, the connection fails, the request times out or the body cannot be
/// read.
pub fn fetch(http_client: &Client, url: &str) -> Result<RawResponse> {
    let response = http_client.get(url).send()?;
    let status = response.status().as_u16();
    let body = response.bytes()?.to_vec();

    tracing::debug!(status, body_len = body.len(), "Response body received");
    tracing::trace!(body_preview = %body_preview(&body), "Response body preview");

    Ok(RawResponse { status, body })
}

/// First characters of the body, lossily decoded.
fn body_preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}
