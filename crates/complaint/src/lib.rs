#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

//! Complaint REST API and complaint lock checks

pub mod account;
pub mod lock;
pub mod service;

pub use account::{Account, AccountService};
pub use service::{ComplaintApiError, ComplaintService};
