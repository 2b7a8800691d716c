#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

//! Data types for the REST API.

pub mod complaint;
pub mod exercise;
pub mod id;
pub mod time;
pub mod user;

pub use complaint::*;
pub use exercise::*;
pub use id::*;
pub use user::*;

#[derive(thiserror::Error, Debug)]
pub enum EnumParsingError {
    #[error("ParsingFailed, value: {0}")]
    ParsingError(String),
}
