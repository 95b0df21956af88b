//! Streaming POST for server-sent event endpoints
//!
//! The response body is handed to a callback chunk by chunk as it arrives,
//! and the whole body comes back once the stream ends.

use std::time::Duration;

use bytes::Bytes;
use futures::StreamExt;
use once_cell::sync::Lazy;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Serialize;
use tracing::debug;

use super::client::{HttpClient, JSON};
use crate::error::Result;
use crate::logger::RequestContext;

/// Streams get a longer budget (10 minutes)
pub const SSE_TIMEOUT: Duration = Duration::from_secs(10 * 60);

static DEFAULT_SSE_CLIENT: Lazy<HttpClient> =
    Lazy::new(|| HttpClient::new().with_timeout(SSE_TIMEOUT));

/// Process-wide client for streaming endpoints
pub fn sse_client() -> &'static HttpClient {
    &DEFAULT_SSE_CLIENT
}

impl HttpClient {
    /// POST JSON and stream the response into `on_chunk`.
    ///
    /// An `Err` from `on_chunk` stops reading and is returned as is.
    pub async fn post_json_stream<T, F>(&self, url: &str, body: &T, on_chunk: F) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnMut(&[u8]) -> Result<()>,
    {
        self.post_json_stream_inner(url, body, None, on_chunk).await
    }

    pub async fn post_json_stream_with_context<T, F>(
        &self,
        ctx: &RequestContext,
        url: &str,
        body: &T,
        on_chunk: F,
    ) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnMut(&[u8]) -> Result<()>,
    {
        self.post_json_stream_inner(url, body, Some(ctx), on_chunk)
            .await
    }

    async fn post_json_stream_inner<T, F>(
        &self,
        url: &str,
        body: &T,
        ctx: Option<&RequestContext>,
        mut on_chunk: F,
    ) -> Result<String>
    where
        T: Serialize + ?Sized,
        F: FnMut(&[u8]) -> Result<()>,
    {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        let resp = self
            .dispatch("POST", url, ctx, self.timeout(), || {
                self.inner()
                    .post(url)
                    .header(CONTENT_TYPE, JSON)
                    .header(ACCEPT, "text/event-stream")
                    .body(payload.clone())
            })
            .await?;

        let mut stream = resp.bytes_stream();
        let mut received = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            on_chunk(&chunk)?;
            received.extend_from_slice(&chunk);
        }

        debug!(url, bytes = received.len(), "stream finished");
        Ok(String::from_utf8_lossy(&received).into_owned())
    }
}

/// Streaming POST through [`sse_client`]
pub async fn sse_post_json<T, F>(url: &str, body: &T, on_chunk: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnMut(&[u8]) -> Result<()>,
{
    sse_client().post_json_stream(url, body, on_chunk).await
}

/// Streaming POST through [`sse_client`], forwarding the trace id
pub async fn sse_post_json_with_context<T, F>(
    ctx: &RequestContext,
    url: &str,
    body: &T,
    on_chunk: F,
) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnMut(&[u8]) -> Result<()>,
{
    sse_client()
        .post_json_stream_with_context(ctx, url, body, on_chunk)
        .await
}
