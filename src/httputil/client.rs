//! Async HTTP client with 502 retry and trace-id propagation

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use bytes::Bytes;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::error::{KitError, Result};
use crate::logger::RequestContext;

pub const USER_AGENT: &str = concat!("kitbag/", env!("CARGO_PKG_VERSION"));
/// Header carrying [`RequestContext::trace_id`]
pub const TRACE_ID_HEADER: &str = "x-trace-id";

/// Default per-request timeout (1 minute)
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Downloads get a longer budget (30 minutes)
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30 * 60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub(super) const JSON: &str = "application/json";

/// HTTP client returning the response body on 2xx.
///
/// A `502 Bad Gateway` is retried `retry_count` times (default 1). Any other
/// non-2xx status is [`KitError::HttpStatus`] with the body attached.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    headers: Vec<(String, String)>,
    timeout: Duration,
    retry_count: u32,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "custom HTTP client failed to build, using reqwest defaults");
                reqwest::Client::new()
            });
        Self::from_client(client)
    }

    /// Wrap an existing `reqwest::Client` (its own settings are kept)
    pub fn from_client(client: reqwest::Client) -> Self {
        Self {
            client,
            headers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            retry_count: 1,
        }
    }

    /// Header sent with every request. Invalid names or values surface as
    /// [`KitError::Http`] when a request is sent.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Extra attempts after a `502 Bad Gateway`
    pub fn with_retry_count(mut self, retry_count: u32) -> Self {
        self.retry_count = retry_count;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub(super) fn inner(&self) -> &reqwest::Client {
        &self.client
    }

    // ═══════════════════════════════════════════
    // GET
    // ═══════════════════════════════════════════

    pub async fn get(&self, url: &str) -> Result<Bytes> {
        self.get_query_inner::<()>(url, None, None).await
    }

    pub async fn get_with_context(&self, ctx: &RequestContext, url: &str) -> Result<Bytes> {
        self.get_query_inner::<()>(url, None, Some(ctx)).await
    }

    /// GET with query parameters (anything `serde_urlencoded` accepts, e.g.
    /// `&[("q", "rust")]` or a `HashMap`)
    pub async fn get_query<Q: Serialize + ?Sized>(&self, url: &str, query: &Q) -> Result<Bytes> {
        self.get_query_inner(url, Some(query), None).await
    }

    pub async fn get_query_with_context<Q: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        url: &str,
        query: &Q,
    ) -> Result<Bytes> {
        self.get_query_inner(url, Some(query), Some(ctx)).await
    }

    async fn get_query_inner<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: Option<&Q>,
        ctx: Option<&RequestContext>,
    ) -> Result<Bytes> {
        let resp = self
            .dispatch("GET", url, ctx, self.timeout, || {
                let req = self.client.get(url);
                match query {
                    Some(query) => req.query(query),
                    None => req,
                }
            })
            .await?;
        Ok(resp.bytes().await?)
    }

    // ═══════════════════════════════════════════
    // POST / PUT
    // ═══════════════════════════════════════════

    pub async fn post_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Bytes> {
        self.post_json_inner(url, body, None).await
    }

    pub async fn post_json_with_context<T: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        url: &str,
        body: &T,
    ) -> Result<Bytes> {
        self.post_json_inner(url, body, Some(ctx)).await
    }

    async fn post_json_inner<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        ctx: Option<&RequestContext>,
    ) -> Result<Bytes> {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        let resp = self
            .dispatch("POST", url, ctx, self.timeout, || {
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, JSON)
                    .body(payload.clone())
            })
            .await?;
        Ok(resp.bytes().await?)
    }

    /// POST a gzip-compressed JSON body (`Content-Encoding: gzip`)
    pub async fn post_gz_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Bytes> {
        self.post_gz_json_inner(url, body, None).await
    }

    pub async fn post_gz_json_with_context<T: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        url: &str,
        body: &T,
    ) -> Result<Bytes> {
        self.post_gz_json_inner(url, body, Some(ctx)).await
    }

    async fn post_gz_json_inner<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        ctx: Option<&RequestContext>,
    ) -> Result<Bytes> {
        let payload = Bytes::from(gzip_json(body)?);
        let resp = self
            .dispatch("POST", url, ctx, self.timeout, || {
                self.client
                    .post(url)
                    .header(CONTENT_TYPE, JSON)
                    .header(CONTENT_ENCODING, "gzip")
                    .header(ACCEPT_ENCODING, "gzip")
                    .body(payload.clone())
            })
            .await?;
        Ok(resp.bytes().await?)
    }

    /// POST `application/x-www-form-urlencoded`
    pub async fn post_form<F: Serialize + ?Sized>(&self, url: &str, form: &F) -> Result<Bytes> {
        self.post_form_inner(url, form, None).await
    }

    pub async fn post_form_with_context<F: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        url: &str,
        form: &F,
    ) -> Result<Bytes> {
        self.post_form_inner(url, form, Some(ctx)).await
    }

    async fn post_form_inner<F: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &F,
        ctx: Option<&RequestContext>,
    ) -> Result<Bytes> {
        let resp = self
            .dispatch("POST", url, ctx, self.timeout, || {
                self.client.post(url).form(form)
            })
            .await?;
        Ok(resp.bytes().await?)
    }

    pub async fn put_json<T: Serialize + ?Sized>(&self, url: &str, body: &T) -> Result<Bytes> {
        self.put_json_inner(url, body, None).await
    }

    pub async fn put_json_with_context<T: Serialize + ?Sized>(
        &self,
        ctx: &RequestContext,
        url: &str,
        body: &T,
    ) -> Result<Bytes> {
        self.put_json_inner(url, body, Some(ctx)).await
    }

    async fn put_json_inner<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        ctx: Option<&RequestContext>,
    ) -> Result<Bytes> {
        let payload = Bytes::from(serde_json::to_vec(body)?);
        let resp = self
            .dispatch("PUT", url, ctx, self.timeout, || {
                self.client
                    .put(url)
                    .header(CONTENT_TYPE, JSON)
                    .body(payload.clone())
            })
            .await?;
        Ok(resp.bytes().await?)
    }

    // ═══════════════════════════════════════════
    // DOWNLOAD
    // ═══════════════════════════════════════════

    /// Stream `url` into `output`, creating parent directories.
    /// Returns the number of bytes written.
    pub async fn download(&self, url: &str, output: impl AsRef<Path>) -> Result<u64> {
        let output = output.as_ref();
        let mut resp = self
            .dispatch("GET", url, None, DOWNLOAD_TIMEOUT, || self.client.get(url))
            .await?;

        if let Some(dir) = output.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut file = tokio::fs::File::create(output).await.map_err(|e| KitError::File {
            path: output.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut written = 0u64;
        while let Some(chunk) = resp.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        debug!(url, path = %output.display(), bytes = written, "download finished");
        Ok(written)
    }

    // ═══════════════════════════════════════════
    // CORE
    // ═══════════════════════════════════════════

    /// Send the request built by `make`, retrying on 502, and hand back a
    /// 2xx response
    #[instrument(skip(self, ctx, timeout, make), level = "debug")]
    pub(super) async fn dispatch<F>(
        &self,
        method: &'static str,
        url: &str,
        ctx: Option<&RequestContext>,
        timeout: Duration,
        make: F,
    ) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let mut req = make().timeout(timeout);
            for (name, value) in &self.headers {
                req = req.header(name.as_str(), value.as_str());
            }
            if let Some(ctx) = ctx.filter(|c| !c.trace_id.is_empty()) {
                req = req.header(TRACE_ID_HEADER, ctx.trace_id.as_str());
            }

            let resp = req.send().await?;
            let status = resp.status();

            if status == StatusCode::BAD_GATEWAY && attempt < self.retry_count {
                attempt += 1;
                warn!(url, attempt, "502 Bad Gateway, retrying");
                continue;
            }
            if status.is_success() {
                return Ok(resp);
            }

            let final_url = resp.url().to_string();
            let body = resp.text().await.unwrap_or_default();
            return Err(KitError::HttpStatus {
                status: status.as_u16(),
                body,
                url: final_url,
            });
        }
    }
}

/// Serialize to JSON and gzip it
pub fn gzip_json<T: Serialize + ?Sized>(body: &T) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(body)?;
    let mut encoder = GzEncoder::new(Vec::with_capacity(json.len() / 2), Compression::default());
    encoder.write_all(&json)?;
    Ok(encoder.finish()?)
}
