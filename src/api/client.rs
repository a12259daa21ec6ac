//! HTTP client for submitting form payloads
//!
//! Successful replies are parsed as JSON. Non-success replies keep their JSON
//! body so field errors and messages can be read from it.

use super::{ApiClientTrait, ApiError, ApiResponse};
use crate::config::ApiConfig;
use anyhow::anyhow;
use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

/// Client for a JSON API
pub struct HttpApiClient {
    /// The HTTP client
    client: reqwest::Client,
    /// Base URL, without trailing slash
    base_url: String,
}

impl HttpApiClient {
    /// Create a client from configuration
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            base_url: config.base_url().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and a request path
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        payload: Value,
    ) -> Result<ApiResponse<Value>, ApiError> {
        let url = self.url(path);
        tracing::debug!("{method} {url}");

        let response = self
            .client
            .request(method.clone(), &url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to send {} {}: {}", method, url, e))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        if status.is_success() {
            let data = parse_body(&bytes)
                .map_err(|e| anyhow!("Failed to parse response from {}: {}", url, e))?;
            return Ok(ApiResponse {
                status: status.as_u16(),
                data,
            });
        }

        tracing::debug!("{method} {url} returned {status}");
        match parse_body(&bytes) {
            Ok(body) => Err(ApiError::Response {
                status: status.as_u16(),
                body,
            }),
            Err(_) => Err(ApiError::Transport(anyhow!(
                "Request to {} failed with status {}",
                url,
                status
            ))),
        }
    }
}

/// Parse a JSON body; an empty body reads as `null`
fn parse_body(bytes: &[u8]) -> serde_json::Result<Value> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes)
}

#[async_trait]
impl ApiClientTrait for HttpApiClient {
    async fn post(&self, path: &str, payload: Value) -> Result<ApiResponse<Value>, ApiError> {
        self.send(Method::POST, path, payload).await
    }

    async fn put(&self, path: &str, payload: Value) -> Result<ApiResponse<Value>, ApiError> {
        self.send(Method::PUT, path, payload).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn client(base: &str) -> HttpApiClient {
        HttpApiClient {
            client: reqwest::Client::new(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Read one request: headers, then `Content-Length` bytes of body
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let content_length = text[..head_end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= head_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answer a single request on a local port with a canned reply.
    /// The handle resolves to the raw request text.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let reply = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            request
        });
        (format!("http://{addr}"), handle)
    }

    #[test]
    fn test_url_joins_with_single_slash() {
        let c = client("https://api.example.com/");
        assert_eq!(c.url("/users"), "https://api.example.com/users");
        assert_eq!(c.url("users"), "https://api.example.com/users");
    }

    #[test]
    fn test_new_uses_config_base_url() {
        let config = ApiConfig {
            base_url: Some("https://api.example.com/v1/".to_string()),
            timeout_secs: Some(1),
        };
        let c = HttpApiClient::new(&config).unwrap();
        if std::env::var(crate::config::BASE_URL_ENV).is_err() {
            assert_eq!(c.base_url(), "https://api.example.com/v1");
        }
    }

    #[test]
    fn test_parse_body() {
        assert_eq!(parse_body(b"").unwrap(), Value::Null);
        assert_eq!(parse_body(b"  \n").unwrap(), Value::Null);
        assert_eq!(
            parse_body(br#"{"message":"x"}"#).unwrap(),
            json!({ "message": "x" })
        );
        assert!(parse_body(b"<html>").is_err());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let c = client("http://127.0.0.1:9");
        let result = c.post("/users", json!({})).await;
        assert!(matches!(result, Err(ApiError::Transport(_))));
    }

    #[tokio::test]
    async fn test_error_status_keeps_json_body() {
        let (base, server) = serve_once(
            "422 Unprocessable Entity",
            r#"{"validations":{"email":"invalid"}}"#,
        )
        .await;

        let result = client(&base).post("/users", json!({ "name": "Alice" })).await;
        let request = server.await.unwrap();

        match result {
            Err(ApiError::Response { status, body }) => {
                assert_eq!(status, 422);
                assert_eq!(body, json!({ "validations": { "email": "invalid" } }));
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert!(request.starts_with("POST /users HTTP/1.1"));
        assert!(request.ends_with(r#"{"name":"Alice"}"#));
    }

    #[tokio::test]
    async fn test_put_returns_parsed_data() {
        let (base, server) = serve_once("200 OK", r#"{"id":1,"name":"Alice"}"#).await;

        let response = client(&base)
            .put("users/1", json!({ "name": "Alice" }))
            .await
            .unwrap();
        let request = server.await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.data, json!({ "id": 1, "name": "Alice" }));
        assert!(request.starts_with("PUT /users/1 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_empty_success_body_is_null() {
        let (base, server) = serve_once("201 Created", "").await;

        let response = client(&base).post("/users", json!({})).await.unwrap();
        server.await.unwrap();

        assert_eq!(response.status, 201);
        assert_eq!(response.data, Value::Null);
    }

    #[tokio::test]
    async fn test_error_status_without_json_is_transport_error() {
        let (base, server) = serve_once("502 Bad Gateway", "<html>bad gateway</html>").await;

        let result = client(&base).post("/users", json!({})).await;
        server.await.unwrap();

        assert!(matches!(result, Err(ApiError::Transport(_))));
    }
}
