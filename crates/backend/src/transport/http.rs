//! HTTP transport for the backend connector.

use crate::config::ClientConfig;
use crate::error::{BackendError, BackendResult};
use reqwest::{header, Client, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// HTTP transport for making backend requests.
///
/// Each request is sent once with its own deadline; there is no retry loop.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> BackendResult<Self> {
        let mut headers = header::HeaderMap::new();

        if let Some(ref api_key) = config.api_key {
            headers.insert(
                header::AUTHORIZATION,
                header::HeaderValue::from_str(&format!("Bearer {}", api_key))
                    .map_err(|_| BackendError::Config("Invalid API key format".to_string()))?,
            );
        }

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self { client, config })
    }

    /// Build a URL from path segments. Segments are percent-encoded, so ids
    /// supplied by callers can never escape their position in the path.
    pub(crate) fn build_url(&self, segments: &[&str]) -> BackendResult<url::Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Config("base_url cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request once and decode its JSON body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request_builder: RequestBuilder,
        timeout: Duration,
    ) -> BackendResult<T> {
        let response = request_builder
            .timeout(timeout)
            .send()
            .await
            .map_err(BackendError::from_reqwest)?;

        let status = response.status();
        let body = response.bytes().await.map_err(BackendError::from_reqwest)?;

        if !status.is_success() {
            return Err(BackendError::from_response(
                status.as_u16(),
                &String::from_utf8_lossy(&body),
            ));
        }

        if body.is_empty() {
            return Ok(serde_json::from_slice(b"null")?);
        }

        Ok(serde_json::from_slice(&body)?)
    }

    /// Execute a GET request.
    pub async fn get<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        timeout: Duration,
    ) -> BackendResult<T> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "GET request");

        self.execute(self.client.get(url), timeout).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: &Q,
        timeout: Duration,
    ) -> BackendResult<T> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "GET request with query");

        self.execute(self.client.get(url).query(query), timeout).await
    }

    /// Execute a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        timeout: Duration,
    ) -> BackendResult<T> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "POST request");

        self.execute(self.client.post(url).json(body), timeout).await
    }

    /// Execute a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
        timeout: Duration,
    ) -> BackendResult<T> {
        let url = self.build_url(segments)?;
        debug!(url = %url, "PUT request");

        self.execute(self.client.put(url).json(body), timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEADLINE: Duration = Duration::from_secs(5);

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestResponse {
        message: String,
        value: i32,
    }

    #[derive(Debug, Serialize)]
    struct TestRequest {
        name: String,
    }

    fn create_config(base_url: &str) -> Arc<ClientConfig> {
        Arc::new(ClientConfig::new(url::Url::parse(base_url).unwrap()))
    }

    fn create_config_with_auth(base_url: &str, api_key: &str) -> Arc<ClientConfig> {
        let mut config = ClientConfig::new(url::Url::parse(base_url).unwrap());
        config.api_key = Some(api_key.to_string());
        Arc::new(config)
    }

    #[tokio::test]
    async fn test_get_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "success".to_string(),
                value: 42,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: TestResponse = transport.get(&["chapters"], DEADLINE).await.unwrap();
        assert_eq!(result.message, "success");
        assert_eq!(result.value, 42);
    }

    #[tokio::test]
    async fn test_get_with_query() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "linear algebra"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: serde_json::Value = transport
            .get_with_query(&["search"], &[("q", "linear algebra")], DEADLINE)
            .await
            .unwrap();
        assert_eq!(result, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_post_request() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/access/check"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "created".to_string(),
                value: 1,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let request = TestRequest {
            name: "test".to_string(),
        };
        let result: TestResponse = transport
            .post(&["access", "check"], &request, DEADLINE)
            .await
            .unwrap();
        assert_eq!(result.message, "created");
    }

    #[tokio::test]
    async fn test_put_request() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/progress/U1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "updated".to_string(),
                value: 2,
            }))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let request = TestRequest {
            name: "updated".to_string(),
        };
        let result: TestResponse = transport
            .put(&["progress", "U1"], &request, DEADLINE)
            .await
            .unwrap();
        assert_eq!(result.message, "updated");
    }

    #[tokio::test]
    async fn test_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chapters"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(TestResponse {
                message: "authorized".to_string(),
                value: 100,
            }))
            .mount(&server)
            .await;

        let transport =
            HttpTransport::new(create_config_with_auth(&server.uri(), "sk-test-key")).unwrap();

        let result: TestResponse = transport.get(&["chapters"], DEADLINE).await.unwrap();
        assert_eq!(result.message, "authorized");
    }

    #[tokio::test]
    async fn test_error_on_403() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chapters/C9"))
            .respond_with(
                ResponseTemplate::new(403)
                    .set_body_json(serde_json::json!({"error": "Premium required"})),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: BackendResult<TestResponse> = transport.get(&["chapters", "C9"], DEADLINE).await;
        match result {
            Err(BackendError::Status { status, message, .. }) => {
                assert_eq!(status, 403);
                assert_eq!(message, "Premium required");
            }
            other => panic!("Expected Status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
            .expect(1)
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: BackendResult<TestResponse> = transport.get(&["chapters"], DEADLINE).await;
        assert_eq!(result.unwrap_err().status(), Some(503));
    }

    #[tokio::test]
    async fn test_timeout() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: BackendResult<serde_json::Value> = transport
            .get(&["chapters"], Duration::from_millis(50))
            .await;
        assert!(matches!(result, Err(BackendError::Timeout)));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chapters"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let transport = HttpTransport::new(create_config(&server.uri())).unwrap();

        let result: BackendResult<serde_json::Value> = transport.get(&["chapters"], DEADLINE).await;
        assert!(matches!(result, Err(BackendError::MalformedBody(_))));
    }

    #[tokio::test]
    async fn test_build_url_encodes_segments() {
        let transport = HttpTransport::new(create_config("http://localhost:8000")).unwrap();

        let url = transport.build_url(&["chapters", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/chapters/a%2Fb%20c");
    }

    #[tokio::test]
    async fn test_build_url_keeps_base_path() {
        let transport = HttpTransport::new(create_config("http://localhost:8000/api/")).unwrap();

        let url = transport.build_url(&["quizzes", "Q1", "submit"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/quizzes/Q1/submit");
    }
}
