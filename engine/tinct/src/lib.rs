//! Tinct CLI - inspect what the tinct lexers produce for real files.
//!
//! Commands:
//! - `styles`: style runs per line
//! - `folds`: fold levels per line
//! - `states`: packed line states and their decoded fields
//! - `check`: rescan every line from the published state of the line
//!   before and report files where the result differs

pub mod commands;
mod error;
pub mod options;

use std::sync::Once;

pub use error::CliError;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only does anything when `RUST_LOG` is set, e.g. `RUST_LOG=tinct_core=debug`.
/// Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}
