//! SonarQube HTTP client
//!
//! Thin wrapper around [`reqwest::Client`] that owns the base URL, the
//! authentication headers replayed on every request, and the optional
//! forward-proxy routing. Everything is a JSON GET except the single form
//! POST used for session login.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, COOKIE, SET_COOKIE};
use serde::de::DeserializeOwned;

use crate::application::errors::ReportError;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the SonarQube REST API.
pub struct SonarClient {
    http: reqwest::Client,
    base_url: String,
    /// Auth headers (Cookie or Authorization) sent with every request.
    headers: HeaderMap,
}

impl SonarClient {
    /// Create a client for the given base URL.
    ///
    /// A trailing `/` on the base URL is trimmed. When a proxy URL is given
    /// (typically from the `http_proxy` environment variable) all requests
    /// are tunneled through it.
    pub fn new(base_url: &str, proxy: Option<&str>) -> Result<Self, ReportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("sonar-report/", env!("CARGO_PKG_VERSION")));

        if let Some(proxy_url) = proxy {
            tracing::info!(proxy = %proxy_url, "routing requests through proxy");
            let proxy = reqwest::Proxy::all(proxy_url)
                .map_err(|e| ReportError::ClientSetup(format!("invalid proxy URL: {e}")))?;
            builder = builder.proxy(proxy);
        } else {
            tracing::debug!("no proxy configuration detected");
        }

        let http = builder
            .build()
            .map_err(|e| ReportError::ClientSetup(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            headers: HeaderMap::new(),
        })
    }

    /// Authenticate with a user token: HTTP Basic with the token as username
    /// and an empty password.
    pub fn set_token(&mut self, token: &str) -> Result<(), ReportError> {
        let credentials = BASE64.encode(format!("{token}:"));
        let value = HeaderValue::from_str(&format!("Basic {credentials}"))
            .map_err(|e| ReportError::ClientSetup(format!("invalid token: {e}")))?;
        self.headers.insert(AUTHORIZATION, value);
        Ok(())
    }

    /// Form-based login. The session cookies from the `Set-Cookie` response
    /// headers (first `;`-delimited segment of each) are captured and
    /// replayed as a `Cookie` header on all subsequent requests.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ReportError> {
        let context = "logging in";
        let url = format!("{}/api/authentication/login", self.base_url);

        let response = self
            .http
            .post(&url)
            .form(&[("login", username), ("password", password)])
            .send()
            .await
            .map_err(|source| ReportError::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::HttpStatus {
                context,
                status: status.as_u16(),
                body,
            });
        }

        let mut cookies = Vec::new();
        for value in response.headers().get_all(SET_COOKIE) {
            let raw = value.to_str().map_err(|e| ReportError::MalformedResponse {
                context,
                message: format!("undecodable Set-Cookie header: {e}"),
            })?;
            if let Some(cookie) = raw.split(';').next() {
                cookies.push(cookie.trim().to_string());
            }
        }

        if cookies.is_empty() {
            return Err(ReportError::MalformedResponse {
                context,
                message: "login response carried no Set-Cookie header".to_string(),
            });
        }

        let header = HeaderValue::from_str(&cookies.join("; ")).map_err(|e| {
            ReportError::MalformedResponse {
                context,
                message: format!("session cookie is not a valid header value: {e}"),
            }
        })?;
        self.headers.insert(COOKIE, header);
        Ok(())
    }

    /// GET a path (with query string) under the base URL and decode the JSON
    /// body. `context` names the in-flight operation for error attribution.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path_and_query: &str,
        context: &'static str,
    ) -> Result<T, ReportError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        tracing::debug!(%url, context, "GET");

        let response = self
            .http
            .get(&url)
            .headers(self.headers.clone())
            .send()
            .await
            .map_err(|source| ReportError::Transport { context, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::HttpStatus {
                context,
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ReportError::MalformedResponse {
                context,
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;

    #[tokio::test]
    async fn get_json_decodes_success_body() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/api/system/status")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version":"8.9.1"}"#)
            .expect(1)
            .create_async()
            .await;

        #[derive(serde::Deserialize)]
        struct Status {
            version: String,
        }

        let client = SonarClient::new(&server.url(), None).unwrap();
        let status: Status = client
            .get_json("/api/system/status", "getting server version")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(status.version, "8.9.1");
    }

    #[tokio::test]
    async fn get_json_surfaces_http_status_faults() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/issues/search")
            .with_status(503)
            .with_body("unavailable")
            .create_async()
            .await;

        let client = SonarClient::new(&server.url(), None).unwrap();
        let result: Result<serde_json::Value, _> =
            client.get_json("/api/issues/search", "getting issues").await;

        match result.unwrap_err() {
            ReportError::HttpStatus { context, status, body } => {
                assert_eq!(context, "getting issues");
                assert_eq!(status, 503);
                assert_eq!(body, "unavailable");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_json_surfaces_malformed_bodies() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/api/system/status")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = SonarClient::new(&server.url(), None).unwrap();
        let result: Result<serde_json::Value, _> = client
            .get_json("/api/system/status", "getting server version")
            .await;

        assert!(matches!(
            result.unwrap_err(),
            ReportError::MalformedResponse { context: "getting server version", .. }
        ));
    }

    #[tokio::test]
    async fn login_captures_session_cookies() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/api/authentication/login")
            .with_status(200)
            .with_header("set-cookie", "JWT-SESSION=abc123; Path=/; HttpOnly")
            .with_header("set-cookie", "XSRF-TOKEN=xyz; Path=/")
            .create_async()
            .await;

        let echo = server
            .mock("GET", "/api/system/status")
            .match_header("cookie", "JWT-SESSION=abc123; XSRF-TOKEN=xyz")
            .with_status(200)
            .with_body(r#"{"version":"8.9"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut client = SonarClient::new(&server.url(), None).unwrap();
        client.login("admin", "secret").await.unwrap();

        let _: serde_json::Value = client
            .get_json("/api/system/status", "getting server version")
            .await
            .unwrap();
        echo.assert_async().await;
    }

    #[tokio::test]
    async fn token_auth_sends_basic_header_with_empty_password() {
        let mut server = Server::new_async().await;
        // base64("my-token:") == "bXktdG9rZW46"
        let mock = server
            .mock("GET", "/api/system/status")
            .match_header("authorization", "Basic bXktdG9rZW46")
            .with_status(200)
            .with_body(r#"{"version":"8.9"}"#)
            .expect(1)
            .create_async()
            .await;

        let mut client = SonarClient::new(&server.url(), None).unwrap();
        client.set_token("my-token").unwrap();
        let _: serde_json::Value = client
            .get_json("/api/system/status", "getting server version")
            .await
            .unwrap();
        mock.assert_async().await;
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let client = SonarClient::new("http://sonar.example.com/", None).unwrap();
        assert_eq!(client.base_url, "http://sonar.example.com");
    }
}
