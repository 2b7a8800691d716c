//! Request and response types shared by all HTTP transports

use async_trait::async_trait;
use error_stack::{Result, ResultExt};
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::ApiError;

/// Sends requests to the REST API.
///
/// Implementations can wrap each other to observe responses.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Returns responses with any status code. Only failures to exchange
    /// the request are errors.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        (**self).send(request).await
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API base URL, for example `api/complaints`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: vec![],
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Path with the URL encoded query string in insertion order.
    pub fn path_and_query(&self) -> Result<String, ApiError> {
        if self.query.is_empty() {
            return Ok(self.path.clone());
        }
        let query =
            serde_urlencoded::to_string(&self.query).change_context(ApiError::InvalidQuery)?;
        Ok(format!("{}?{}", self.path, query))
    }
}

#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: StatusCode,
    /// Final request URL.
    pub url: String,
    pub headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    pub fn header(&self, name: &str) -> Option<&[u8]> {
        self.headers.get(name).map(|v| v.as_bytes())
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body)
            .change_context(ApiError::DeserializeResponse)
            .attach_printable_lazy(|| self.url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_keeps_insertion_order() {
        let request = ApiRequest::get("api/courses/69/complaints")
            .with_query("complaintType", "COMPLAINT")
            .with_query("tutorId", 1337);
        assert_eq!(
            request.path_and_query().unwrap(),
            "api/courses/69/complaints?complaintType=COMPLAINT&tutorId=1337"
        );
    }

    #[test]
    fn request_without_query_is_only_path() {
        let request = ApiRequest::get("api/complaints/submissions/1");
        assert_eq!(request.path_and_query().unwrap(), "api/complaints/submissions/1");
    }

    #[test]
    fn query_values_are_encoded() {
        let request = ApiRequest::get("api/search").with_query("q", "a b&c");
        assert_eq!(request.path_and_query().unwrap(), "api/search?q=a+b%26c");
    }
}
