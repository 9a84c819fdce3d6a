use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "chatrelay.toml";

/// Chat relay for hosted LLM completion APIs
#[derive(Debug, Parser)]
#[command(name = "chatrelay", version, about = "Relay browser chat messages to a hosted LLM completion API")]
pub struct Args {
    /// Path to configuration file; without it, `chatrelay.toml` is used if
    /// present, otherwise configuration is read from the environment
    #[arg(short, long, env = "CHATRELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the listen address
    #[arg(long, env = "CHATRELAY_LISTEN")]
    pub listen: Option<SocketAddr>,

    /// Log filter directive (e.g. `info`, `chatrelay_relay=debug`)
    #[arg(long, env = "CHATRELAY_LOG", default_value = "info")]
    pub log_filter: String,
}

impl Args {
    /// Configuration file to load, if any
    pub fn config_file(&self) -> Option<PathBuf> {
        self.config.clone().or_else(|| {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::try_parse_from([
            "chatrelay",
            "--config",
            "relay.toml",
            "--listen",
            "127.0.0.1:8080",
            "--log-filter",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.config_file(), Some(PathBuf::from("relay.toml")));
        assert_eq!(args.listen, Some(SocketAddr::from(([127, 0, 0, 1], 8080))));
        assert_eq!(args.log_filter, "debug");
    }
}
