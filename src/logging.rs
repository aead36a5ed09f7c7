// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tracing initialization.
//!
//! The library only emits `tracing` events. Installing a subscriber is the
//! binary's job (`init`) or a test's (`init_for_tests`). `RUST_LOG` overrides
//! the default level either way.

use std::sync::Once;

use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

fn filter(default: Level) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(default.into())
        .from_env_lossy()
}

/// Log to stderr at INFO (DEBUG with `verbose`). Safe to call more than once.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let level = if verbose { Level::DEBUG } else { Level::INFO };
        let result = tracing_subscriber::fmt()
            .with_env_filter(filter(level))
            .with_ansi(atty::is(atty::Stream::Stderr))
            .with_target(false)
            .with_span_events(FmtSpan::NONE)
            .compact()
            .with_writer(std::io::stderr)
            .try_init();
        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

/// Capture logs through the test harness at DEBUG.
#[doc(hidden)]
pub fn init_for_tests() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter(Level::DEBUG))
            .with_ansi(false)
            .with_test_writer()
            .try_init();
    });
}
