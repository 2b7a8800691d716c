//! JSON requests on top of a [HttpTransport]

use std::sync::Arc;

use error_stack::{Result, ResultExt};
use serde::{Serialize, de::DeserializeOwned};
use utils::ContextExt;

use crate::{ApiError, ApiRequest, ApiResponse, HttpTransport};

#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient").finish_non_exhaustive()
    }
}

impl ApiClient {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Send request and fail if the response status is not successful.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let description = format!("{} {}", request.method, request.path);
        let response = self.transport.send(request).await?;
        if response.is_success() {
            Ok(response)
        } else {
            Err(ApiError::ResponseStatus(response.status).report())
                .attach_printable(description)
                .attach_printable(response.body)
        }
    }

    pub async fn get_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        self.execute(request).await?.json()
    }

    /// Empty body and JSON `null` are `None`.
    pub async fn get_optional_json<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<R>, ApiError> {
        let response = self.execute(request).await?;
        if response.body.trim().is_empty() {
            Ok(None)
        } else {
            response.json()
        }
    }

    pub async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: impl Into<String>,
        body: &B,
    ) -> Result<R, ApiError> {
        let body = serde_json::to_value(body).change_context(ApiError::SerializeRequest)?;
        self.get_json(ApiRequest::post(path, body)).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use http::{HeaderMap, StatusCode};

    use super::*;

    /// Returns the same response for every request and records requests.
    pub struct StaticTransport {
        pub status: StatusCode,
        pub body: String,
        pub requests: Mutex<Vec<ApiRequest>>,
    }

    impl StaticTransport {
        pub fn new(status: StatusCode, body: &str) -> Arc<Self> {
            Arc::new(Self {
                status,
                body: body.to_string(),
                requests: Mutex::new(vec![]),
            })
        }
    }

    #[async_trait]
    impl HttpTransport for StaticTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
            let url = format!("http://localhost/{}", request.path);
            self.requests.lock().unwrap().push(request);
            Ok(ApiResponse {
                status: self.status,
                url,
                headers: HeaderMap::new(),
                body: self.body.clone(),
            })
        }
    }

    #[tokio::test]
    async fn error_status_is_error() {
        let client = ApiClient::new(StaticTransport::new(StatusCode::FORBIDDEN, "denied"));
        let error = client
            .get_json::<i64>(ApiRequest::get("api/test"))
            .await
            .unwrap_err();
        assert_eq!(
            error.current_context(),
            &ApiError::ResponseStatus(StatusCode::FORBIDDEN)
        );
    }

    #[tokio::test]
    async fn empty_and_null_bodies_are_none() {
        for body in ["", "null"] {
            let client = ApiClient::new(StaticTransport::new(StatusCode::OK, body));
            let value: Option<i64> = client
                .get_optional_json(ApiRequest::get("api/test"))
                .await
                .unwrap();
            assert_eq!(value, None);
        }
    }

    #[tokio::test]
    async fn post_json_sends_serialized_body() {
        let transport = StaticTransport::new(StatusCode::OK, "5");
        let client = ApiClient::new(transport.clone());
        let value: i64 = client
            .post_json("api/test", &vec!["a", "b"])
            .await
            .unwrap();
        assert_eq!(value, 5);
        let requests = transport.requests.lock().unwrap();
        assert_eq!(requests[0].method, http::Method::POST);
        assert_eq!(requests[0].body, Some(serde_json::json!(["a", "b"])));
    }

    #[tokio::test]
    async fn malformed_body_is_deserialize_error() {
        let client = ApiClient::new(StaticTransport::new(StatusCode::OK, "{"));
        let error = client
            .get_json::<i64>(ApiRequest::get("api/test"))
            .await
            .unwrap_err();
        assert_eq!(error.current_context(), &ApiError::DeserializeResponse);
    }
}
