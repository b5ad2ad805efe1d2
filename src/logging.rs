use tracing_subscriber::EnvFilter;

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs a stderr `fmt` subscriber. A non-empty `RUST_LOG` takes
/// precedence over `verbosity`. Calling this twice is a no-op.
pub fn init_logging(verbosity: u8) {
    let filter = match std::env::var("RUST_LOG") {
        Ok(rustlog) if !rustlog.is_empty() => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity))),
        _ => EnvFilter::new(level_for(verbosity)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
