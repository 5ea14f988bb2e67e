//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a verbosity level
///
/// `0` is warnings only, `1` info, `2` debug (the action layer's polling),
/// `3` and above trace.
#[must_use]
pub const fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "cartwright=warn",
        1 => "cartwright=info",
        2 => "cartwright=debug",
        _ => "cartwright=trace",
    }
}

/// Install a global fmt subscriber, optionally emitting JSON lines
///
/// `RUST_LOG` overrides the verbosity. Returns `false` when a subscriber was
/// already installed, in which case nothing changes.
pub fn init(verbosity: u8, json: bool) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    }
}
