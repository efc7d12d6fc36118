#![recursion_limit = "256"]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use cli::Cli;
use domain::error::{exit_code_for, pipeline_error};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "height_vae=info";

/// `RUST_LOG` wins when it parses; otherwise this crate logs at info.
fn log_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn main() -> ExitCode {
    // stdout carries the report only; diagnostics go to stderr.
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();

    let stdout = io::stdout();
    let result = Cli::parse().run(&mut stdout.lock());

    if let Err(err) = &result {
        match pipeline_error(err) {
            Some(_) => tracing::debug!("{err:#}"),
            None    => tracing::error!("{err:#}"),
        }
    }
    exit_code_for(&result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(spec: &str) -> String {
        EnvFilter::new(spec).to_string()
    }

    #[test]
    fn test_default_filter_without_rust_log() {
        assert_eq!(log_filter(None).to_string(), rendered(DEFAULT_LOG_FILTER));
    }

    #[test]
    fn test_rust_log_replaces_default() {
        assert_eq!(log_filter(Some("off")).to_string(), rendered("off"));
        assert_ne!(log_filter(Some("off")).to_string(), rendered(DEFAULT_LOG_FILTER));
        assert_eq!(log_filter(Some("height_vae=debug")).to_string(), rendered("height_vae=debug"));
    }

    #[test]
    fn test_unparsable_rust_log_falls_back() {
        assert_eq!(log_filter(Some("height_vae=notalevel")).to_string(), rendered(DEFAULT_LOG_FILTER));
    }
}
