//! Log filter for the stderr subscriber.

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Target prefix shared by every workspace crate (`colloquy`, `colloquy_session`, ...).
const TARGET: &str = "colloquy";

/// Build the filter from `RUST_LOG`, the `--log-level` flag and the
/// configured level.
///
/// A valid flag is layered over `RUST_LOG` for our crates only. Without a
/// flag, a non-empty `RUST_LOG` is used as is, and the configured level
/// applies when it is unset.
pub fn filter(rust_log: Option<&str>, flag: Option<&str>, configured: &str) -> EnvFilter {
    let env = rust_log.filter(|s| !s.trim().is_empty());
    match (env, flag.and_then(own_directive)) {
        (Some(env), Some(directive)) => EnvFilter::new(format!("{env},{directive}")),
        (Some(env), None) => EnvFilter::new(env),
        (None, Some(directive)) => EnvFilter::new(directive),
        (None, None) => EnvFilter::new(
            own_directive(configured).unwrap_or_else(|| format!("{TARGET}={}", LevelFilter::INFO)),
        ),
    }
}

/// Whether `level` names a level the filter understands.
pub fn is_level(level: &str) -> bool {
    level.trim().parse::<LevelFilter>().is_ok()
}

fn own_directive(level: &str) -> Option<String> {
    let level: LevelFilter = level.trim().parse().ok()?;
    Some(format!("{TARGET}={level}"))
}
