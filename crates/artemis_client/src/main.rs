#![deny(unsafe_code)]
#![deny(unused_must_use)]
#![warn(unused_crate_dependencies)]

pub mod app;
pub mod args;
pub mod build_info;
pub mod output;
pub mod version_watch;

use std::process::ExitCode;

use app::ArtemisClientApp;
use build_info::{BUILD_INFO_CARGO_PKG_NAME, BUILD_INFO_CARGO_PKG_VERSION};
use config::get_config;
use tracing::error;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let (args, mode) = match args::parse_args() {
        Ok(args) => args,
        Err(e) => return e,
    };

    let config = match get_config(
        &args,
        BUILD_INFO_CARGO_PKG_VERSION.to_string(),
        BUILD_INFO_CARGO_PKG_NAME.to_string(),
    ) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config loading failed. Error: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    init_logging(config.log_timestamp());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Creating async runtime failed. Error: {:?}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(ArtemisClientApp::new(config).run(mode)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_timestamp: bool) {
    let log_with_timestamp_layer = if log_timestamp {
        Some(tracing_subscriber::fmt::layer().with_filter(EnvFilter::from_default_env()))
    } else {
        None
    };

    let log_without_timestamp_layer = if log_timestamp {
        None
    } else {
        Some(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_filter(EnvFilter::from_default_env()),
        )
    };

    tracing_subscriber::registry()
        .with(log_with_timestamp_layer)
        .with(log_without_timestamp_layer)
        .init();
}
