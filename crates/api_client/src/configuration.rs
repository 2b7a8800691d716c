use std::time::Duration;

use async_trait::async_trait;
use error_stack::{Result, ResultExt};
use tracing::{debug, info};
use url::Url;

use crate::{ApiError, ApiRequest, ApiResponse, HttpTransport};

#[derive(Debug, Clone)]
pub struct Configuration {
    pub base_path: String,
    pub user_agent: Option<String>,
    pub client: reqwest::Client,
    pub bearer_access_token: Option<String>,
}

impl Configuration {
    pub fn new(base_url: &Url, user_agent: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::ClientBuilder::new()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .change_context(ApiError::ClientBuildFailed)?;

        Ok(Self {
            base_path: base_url.as_str().trim_end_matches('/').to_string(),
            user_agent,
            client,
            bearer_access_token: None,
        })
    }

    pub fn with_access_token(mut self, token: Option<String>) -> Self {
        self.bearer_access_token = token;
        self
    }

    pub fn print_to_log(&self) {
        info!("API base url: {}", self.base_path);
    }
}

/// [HttpTransport] which sends requests with [reqwest].
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    configuration: Configuration,
}

impl ReqwestTransport {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }

    fn request_url(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let url = format!(
            "{}/{}",
            self.configuration.base_path,
            request.path.trim_start_matches('/')
        );
        Url::parse(&url)
            .change_context(ApiError::InvalidUrl)
            .attach_printable(url)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let configuration = &self.configuration;
        let url = self.request_url(&request)?;

        let mut req_builder = configuration
            .client
            .request(request.method.clone(), url.clone());

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query);
        }
        if let Some(ref user_agent) = configuration.user_agent {
            req_builder = req_builder.header(reqwest::header::USER_AGENT, user_agent.clone());
        }
        if let Some(ref token) = configuration.bearer_access_token {
            req_builder = req_builder.bearer_auth(token);
        }
        if let Some(ref body) = request.body {
            req_builder = req_builder.json(body);
        }

        let req = req_builder.build().change_context(ApiError::RequestFailed)?;
        debug!("{} {}", req.method(), req.url());
        let resp = configuration
            .client
            .execute(req)
            .await
            .change_context(ApiError::RequestFailed)
            .attach_printable_lazy(|| url.to_string())?;

        let status = resp.status();
        let url = resp.url().to_string();
        let headers = resp.headers().clone();
        let body = resp
            .text()
            .await
            .change_context(ApiError::ResponseBodyReadingFailed)?;

        Ok(ApiResponse {
            status,
            url,
            headers,
            body,
        })
    }
}
