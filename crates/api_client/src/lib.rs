#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

//! HTTP access to the Artemis REST API

pub mod client;
pub mod configuration;
pub mod server_date;
pub mod transport;

use http::StatusCode;

pub use client::ApiClient;
pub use configuration::{Configuration, ReqwestTransport};
pub use server_date::{ServerDateService, ServerTimeSync};
pub use transport::{ApiRequest, ApiResponse, HttpTransport};

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ApiError {
    #[error("Client build failed")]
    ClientBuildFailed,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("HTTP request failed")]
    RequestFailed,

    #[error("Reading response body failed")]
    ResponseBodyReadingFailed,

    #[error("Wrong status code: {0}")]
    ResponseStatus(StatusCode),

    #[error("Serializing request body failed")]
    SerializeRequest,

    #[error("Deserializing response body failed")]
    DeserializeResponse,

    #[error("Invalid query parameters")]
    InvalidQuery,
}
