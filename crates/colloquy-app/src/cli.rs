use std::path::PathBuf;

use clap::Parser;

/// Colloquy: a terminal chat client for a document question-answering service.
#[derive(Parser, Debug)]
#[command(name = "colloquy", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Session store file override.
    #[arg(long, conflicts_with = "ephemeral")]
    pub store: Option<PathBuf>,

    /// Keep sessions in memory only; nothing is written to disk.
    #[arg(long)]
    pub ephemeral: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["colloquy"]).unwrap();
        assert!(args.config.is_none());
        assert!(args.store.is_none());
        assert!(!args.ephemeral);
    }

    #[test]
    fn store_and_ephemeral_conflict() {
        let result = Args::try_parse_from(["colloquy", "--store", "/tmp/s.json", "--ephemeral"]);
        assert!(result.is_err());
    }

    #[test]
    fn log_level_is_passed_through() {
        let args = Args::try_parse_from(["colloquy", "--log-level", "debug"]).unwrap();
        assert_eq!(args.log_level.as_deref(), Some("debug"));
    }
}
