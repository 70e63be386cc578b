use anyhow::{anyhow, Result};
use std::io;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::{self, time::ChronoUtc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Default directive for a verbosity: 0 = the configured level,
/// 1 = debug without HTTP connection noise, 2+ = trace.
fn default_directive(verbose_level: u8, base_level: &str) -> String {
    match verbose_level {
        0 => base_level.to_string(),
        1 => "debug,hyper::proto::h1=warn,hyper::client::pool=warn,rustls=warn".to_string(),
        _ => "trace".to_string(),
    }
}

/// `RUST_LOG` wins unless `quiet` is set.
fn build_filter(verbose_level: u8, quiet: bool, base_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose_level, base_level)))
}

pub fn init_logging(
    verbose_level: u8,
    quiet: bool,
    base_level: &str,
    log_file: Option<PathBuf>,
) -> Result<()> {
    let filter = build_filter(verbose_level, quiet, base_level);

    let json = std::env::var("RUST_LOG_JSON")
        .map(|v| v == "true")
        .unwrap_or_else(|_| !io::stdout().is_terminal());

    let registry = Registry::default().with(filter);

    match log_file {
        Some(log_path) => {
            let log_dir = log_path
                .parent()
                .ok_or_else(|| anyhow!("Log file path has no parent directory"))?;
            std::fs::create_dir_all(log_dir)?;

            let log_filename = log_path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| anyhow!("Invalid log filename"))?;
            // pawflix.log rotates as pawflix.2026-10-19 etc.
            let log_prefix = log_filename.rsplit_once('.').map_or(log_filename, |(stem, _)| stem);

            let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, log_prefix);

            if json {
                registry
                    .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(file_appender))
                    .init();
            } else {
                registry
                    .with(
                        fmt::layer()
                            .with_timer(ChronoUtc::rfc_3339())
                            .with_ansi(false)
                            .with_writer(file_appender),
                    )
                    .init();
            }
        }
        None => {
            if json {
                registry
                    .with(fmt::layer().json().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
                    .init();
            } else {
                registry
                    .with(fmt::layer().with_timer(ChronoUtc::rfc_3339()).with_writer(io::stderr))
                    .init();
            }
        }
    }

    Ok(())
}
