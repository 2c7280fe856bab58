//! Logging Infrastructure
//!
//! - Console output (pretty or JSON)
//! - Daily rotating application log `storefront-server.YYYY-MM-DD`
//! - Separate daily security log for the `security` target

use std::fs;
use std::path::Path;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, prelude::*};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

fn console_layer(level: &str, json_format: bool) -> BoxedLayer {
    if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .with_filter(EnvFilter::new(level))
            .boxed()
    }
}

fn file_layer(appender: RollingFileAppender, security: bool) -> BoxedLayer {
    fmt::layer()
        .json()
        .with_target(true)
        .with_current_span(true)
        .with_writer(std::sync::Mutex::new(appender))
        .with_filter(tracing_subscriber::filter::filter_fn(move |meta| {
            (meta.target() == "security") == security
        }))
        .boxed()
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn"); `RUST_LOG` wins when set
/// * `json_format` - JSON console lines (production)
/// * `log_dir` - Optional directory for file logging (e.g., Some("./data/logs"))
///
/// # Examples
/// ```no_run
/// use storefront_server::utils::logger::init_logger_with_file;
///
/// // Development setup (console only)
/// init_logger_with_file("debug", false, None).unwrap();
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&str>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let mut layers: Vec<BoxedLayer> = vec![console_layer(level, json_format)];

    if let Some(dir) = log_dir {
        let log_dir = Path::new(dir);
        fs::create_dir_all(log_dir)?;

        let app_log = RollingFileAppender::new(Rotation::DAILY, log_dir, "storefront-server");
        let security_log = RollingFileAppender::new(Rotation::DAILY, log_dir, "security");
        layers.push(file_layer(app_log, false));
        layers.push(file_layer(security_log, true));
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    Ok(())
}
