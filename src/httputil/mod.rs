//! HTTP helpers
//!
//! [`HttpClient`] wraps `reqwest` with the conventions shared by our
//! services: bodies come back as `Bytes` on 2xx, a 502 is retried once,
//! and `*_with_context` methods forward the request's trace id.
//! `post_json_stream` feeds a server-sent event response to a callback as
//! it arrives.
//!
//! ```rust,ignore
//! let body = kitbag::httputil::get("https://example.com/health").await?;
//!
//! let client = HttpClient::new().with_timeout(Duration::from_secs(5));
//! client.post_json_with_context(&ctx, url, &payload).await?;
//! ```

mod client;
mod host;
mod sse;

pub use client::{gzip_json, HttpClient, TRACE_ID_HEADER, USER_AGENT};
pub use host::top_domain;
pub use sse::{sse_client, sse_post_json, sse_post_json_with_context, SSE_TIMEOUT};

use std::path::Path;

use bytes::Bytes;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::Result;

static DEFAULT_CLIENT: Lazy<HttpClient> = Lazy::new(HttpClient::new);

/// Process-wide client with default settings
pub fn default_client() -> &'static HttpClient {
    &DEFAULT_CLIENT
}

/// GET through [`default_client`]
pub async fn get(url: &str) -> Result<Bytes> {
    default_client().get(url).await
}

/// POST JSON through [`default_client`]
pub async fn post_json<T: Serialize + ?Sized>(url: &str, body: &T) -> Result<Bytes> {
    default_client().post_json(url, body).await
}

/// Download through [`default_client`]
pub async fn download(url: &str, output: impl AsRef<Path>) -> Result<u64> {
    default_client().download(url, output).await
}
