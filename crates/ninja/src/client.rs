use std::time::Duration;

use log::{debug, warn};
use serde::de::DeserializeOwned;

use crate::error::Error;
use crate::prelude::{eyre, Result};

/// Default revalidation window for content fetches, in seconds.
pub const DEFAULT_REVALIDATE_SECS: u64 = 3600;

/// The backend has no SLA; cap how long a page render can wait on it.
const FETCH_TIMEOUT: Duration = Duration::from_secs(8);

/// Caller-supplied fetch behavior.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// Revalidation hint in seconds, forwarded as a `Cache-Control:
    /// max-age` request directive. Zero disables the hint.
    pub revalidate: u64,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            revalidate: DEFAULT_REVALIDATE_SECS,
        }
    }
}

impl FetchOptions {
    pub fn no_revalidate() -> Self {
        Self { revalidate: 0 }
    }
}

/// Build the HTTP client shared by all content fetches.
pub fn build_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| eyre!("Failed to build HTTP client: {}", e))
}

/// Fetch and decode a JSON document, collapsing every failure to `None`.
///
/// This is the single point where transport failures are absorbed: non-2xx
/// statuses, non-JSON content types, and network or decode errors are
/// logged and become `None`. Callers get one `if` instead of a try/catch,
/// and nothing ever propagates an error across this boundary. One attempt
/// per call; no retries.
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    options: FetchOptions,
) -> Option<T> {
    match try_fetch_json(client, url, options).await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("fetch_json: {err} for {url}");
            None
        }
    }
}

async fn try_fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    options: FetchOptions,
) -> Result<T, Error> {
    debug!("GET {url} (revalidate={})", options.revalidate);

    let mut request = client.get(url);
    if options.revalidate > 0 {
        request = request.header(
            reqwest::header::CACHE_CONTROL,
            format!("max-age={}", options.revalidate),
        );
    }

    let response = request
        .send()
        .await
        .map_err(|e| Error::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::Status(status.as_u16()));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    if !content_type.contains("application/json") {
        return Err(Error::NonJsonResponse(content_type));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| Error::Decode(e.to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use super::*;

    /// Serve one canned HTTP response on an ephemeral local port.
    pub(crate) async fn spawn_one_shot(response: String) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf).await;
            stream.write_all(response.as_bytes()).await.unwrap();
            let _ = stream.shutdown().await;
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_default_options_use_hour_revalidation() {
        assert_eq!(FetchOptions::default().revalidate, 3600);
    }

    #[test]
    fn test_no_revalidate_disables_hint() {
        assert_eq!(FetchOptions::no_revalidate().revalidate, 0);
    }

    #[test]
    fn test_build_client_succeeds() {
        assert!(build_client().is_ok());
    }

    #[tokio::test]
    async fn test_fetch_json_network_failure_is_none() {
        // Reserved TEST-NET-1 address; the connection fails fast and the
        // helper must resolve to None rather than erroring.
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .unwrap();
        let result: Option<serde_json::Value> =
            fetch_json(&client, "http://192.0.2.1:9/article", FetchOptions::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_json_http_500_is_none() {
        let base = spawn_one_shot(
            "HTTP/1.1 500 Internal Server Error\r\n\
             content-type: application/json\r\n\
             content-length: 2\r\n\
             connection: close\r\n\r\n{}"
                .to_string(),
        )
        .await;
        let client = build_client().unwrap();
        let result: Option<serde_json::Value> =
            fetch_json(&client, &base, FetchOptions::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_json_non_json_content_type_is_none() {
        let base = spawn_one_shot(
            "HTTP/1.1 200 OK\r\n\
             content-type: text/html\r\n\
             content-length: 12\r\n\
             connection: close\r\n\r\n<p>hello</p>"
                .to_string(),
        )
        .await;
        let client = build_client().unwrap();
        let result: Option<serde_json::Value> =
            fetch_json(&client, &base, FetchOptions::default()).await;
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_ok_response() {
        let base = spawn_one_shot(
            "HTTP/1.1 200 OK\r\n\
             content-type: application/json\r\n\
             content-length: 13\r\n\
             connection: close\r\n\r\n{\"docs\":[42]}"
                .to_string(),
        )
        .await;
        let client = build_client().unwrap();
        let result: Option<serde_json::Value> =
            fetch_json(&client, &base, FetchOptions::default()).await;
        assert_eq!(result.unwrap()["docs"][0], 42);
    }
}
