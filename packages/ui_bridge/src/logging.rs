//! Global logging system for host programs embedding the bridge.

use std::{
    fs::File,
    sync::Arc,
    env,
    panic,
};
use backtrace::Backtrace;
use tracing_subscriber::{
    fmt::{
        self,
        time::uptime,
    },
    prelude::*,
    Registry,
    EnvFilter,
};


/// Default logging environment filter. This crate is debug, everything else is warn.
const DEFAULT_FILTER: &'static str = "warn,ui_bridge=debug";

const LOG_FILE_NAME: &'static str = "ui_bridge.log";

/// Initializes a `tracing` logging backend which outputs to stdout and also a log file. Accepts
/// ecosystem-standard `RUST_LOG` env filters. Installs a panic hook that routes panic messages
/// and backtraces through the logging system.
///
/// Meant to be called once, early, by the host program's entry point.
pub fn init_logging() {
    let format = fmt::format()
        .compact()
        .with_timer(uptime())
        .with_line_number(true);
    let stdout_log = fmt::layer()
        .event_format(format);

    let log_file = File::create(LOG_FILE_NAME)
        .expect("unable to create log file");
    let log_file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    let mut filter = DEFAULT_FILTER.to_owned();
    if let Ok(env_filter) = env::var(EnvFilter::DEFAULT_ENV) {
        filter.push(',');
        filter.push_str(&env_filter);
    }

    let subscriber = Registry::default()
        .with(EnvFilter::new(filter))
        .with(stdout_log)
        .with(log_file_log);
    tracing::subscriber::set_global_default(subscriber)
        .expect("unable to install log subscriber");
    info!("logging initialized");

    // make panic messages and backtrace go through logging system
    panic::set_hook(Box::new(|info| {
        error!("{}", info);
        if env::var("RUST_BACKTRACE").map(|val| val == "1").unwrap_or(true) {
            error!("{:?}", Backtrace::new());
        }
    }));
    trace!("installed custom panic hook");
}


#[test]
fn test_init_logging_smoke() {
    // installs the global subscriber; must only happen once per process, so
    // this is the single test that touches it
    init_logging();
    debug!("logging smoke test");
    assert!(std::path::Path::new(LOG_FILE_NAME).exists());
}
