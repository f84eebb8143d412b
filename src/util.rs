use std::{sync::OnceLock, time::Duration};

use async_trait::async_trait;
use regex::Regex;
use reqwest::StatusCode;
use reqwest_middleware::ClientWithMiddleware;

pub struct HttpClient {
    pub client: ClientWithMiddleware,
}

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("no SponsorBlock instance configured")]
    ConfigurationMissing,
    #[error("reqwest error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("reqwest middleware error: {0}")]
    ReqwestMiddlewareError(#[from] reqwest_middleware::Error),
    #[error("server responded with {0}")]
    Status(StatusCode),
    #[error("could not encode categories: {0}")]
    Encode(serde_json::Error),
    #[error("could not decode segments: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Where segment requests go. [`HttpClient`] is the real implementation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get_text(&self, url: &str, query: &[(&'static str, String)])
        -> Result<String, FetchError>;
}

impl HttpClient {
    pub fn new() -> reqwest::Result<HttpClient> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(HttpClient::from_client(client))
    }

    pub fn from_client(client: reqwest::Client) -> HttpClient {
        let client = reqwest_middleware::ClientBuilder::new(client).build();
        HttpClient { client }
    }

    pub async fn fetch_text(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, FetchError> {
        let resp = self.client.get(url).query(query).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        resp.text().await.map_err(|e| e.into())
    }
}

#[async_trait]
impl Transport for HttpClient {
    async fn get_text(
        &self,
        url: &str,
        query: &[(&'static str, String)],
    ) -> Result<String, FetchError> {
        self.fetch_text(url, query).await
    }
}

fn video_id_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            r"^([A-Za-z0-9_-]{11})$",
            r"^(?:https?://)?(?:www\.)?youtu\.be/([A-Za-z0-9_-]{11})",
            r"[?&]v=([A-Za-z0-9_-]{11})",
            r"/(?:embed|shorts|v|live)/([A-Za-z0-9_-]{11})",
        ]
        .iter()
        .map(|p| Regex::new(p).expect("should never happen"))
        .collect()
    })
}

/// Extracts a YouTube video ID from a bare ID or a watch/share URL.
pub fn parse_video_id(input: &str) -> Option<String> {
    let input = input.trim();

    video_id_patterns()
        .iter()
        .filter_map(|r| r.captures(input))
        .find_map(|c| c.get(1).map(|m| m.as_str().to_string()))
}

#[cfg(test)]
pub(crate) mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
        task::JoinHandle,
    };

    use super::*;

    /// Answers a single HTTP request with a canned response and hands back
    /// the raw request head.
    pub(crate) async fn serve_once(
        status_line: &'static str,
        body: &'static str,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    pub(crate) fn local_client() -> HttpClient {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        HttpClient::from_client(client)
    }

    #[tokio::test]
    async fn fetch_text_sends_query() {
        let (base, server) = serve_once("HTTP/1.1 200 OK", "[]").await;
        let client = local_client();
        let query = vec![
            ("videoID", "abcdefghijk".to_string()),
            ("categories", r#"["sponsor"]"#.to_string()),
        ];

        let body = client
            .fetch_text(&format!("{}/api/skipSegments", base), &query)
            .await
            .expect("request failed");
        assert_eq!(body, "[]");

        let request = server.await.unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("GET /api/skipSegments?"), "{}", request_line);
        assert!(request_line.contains("videoID=abcdefghijk"), "{}", request_line);
        assert!(
            request_line.contains("categories=%5B%22sponsor%22%5D"),
            "{}",
            request_line
        );
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, server) = serve_once("HTTP/1.1 404 Not Found", "Not Found").await;
        let client = local_client();

        let result = client.fetch_text(&base, &[]).await;
        assert!(matches!(result, Err(FetchError::Status(StatusCode::NOT_FOUND))));
        server.await.unwrap();
    }

    #[test]
    fn video_ids() {
        let id = Some("dQw4w9WgXcQ".to_string());

        assert_eq!(parse_video_id("dQw4w9WgXcQ"), id);
        assert_eq!(parse_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), id);
        assert_eq!(
            parse_video_id("https://www.youtube.com/watch?list=PL1&v=dQw4w9WgXcQ&t=42"),
            id
        );
        assert_eq!(parse_video_id("https://youtu.be/dQw4w9WgXcQ?t=1"), id);
        assert_eq!(parse_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), id);
        assert_eq!(parse_video_id("https://youtube.com/shorts/dQw4w9WgXcQ"), id);
        assert_eq!(parse_video_id("not a video"), None);
        assert_eq!(parse_video_id(""), None);
    }
}
