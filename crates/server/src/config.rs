use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "where-is-bus-server",
    author,
    version,
    about = "Live bus tracking server",
    long_about = "Tracks buses on fixed routes. Drivers register a 4-character bus id \
                  against a route and push GPS fixes; riders query arrival status and \
                  ETA to the next stop.\n\n\
                  Live state is held in memory only and is lost on restart."
)]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "WHERE_IS_BUS_BIND", default_value = "127.0.0.1:4000")]
    pub bind: SocketAddr,

    /// JSON file with the routes buses can be registered against
    #[arg(long, env = "WHERE_IS_BUS_ROUTES")]
    pub routes: Option<PathBuf>,

    /// Candidates tried before bus id generation gives up
    #[arg(long, env = "WHERE_IS_BUS_MAX_ID_ATTEMPTS", default_value = "10000")]
    pub max_id_attempts: NonZeroUsize,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["where-is-bus-server"]).unwrap();
        assert_eq!(config.bind, "127.0.0.1:4000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.max_id_attempts.get(), 10_000);
        assert!(config.routes.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_overrides() {
        let config = Config::try_parse_from([
            "where-is-bus-server",
            "--bind",
            "0.0.0.0:8080",
            "--routes",
            "routes.json",
            "--max-id-attempts",
            "50",
            "-v",
        ])
        .unwrap();

        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.routes, Some(PathBuf::from("routes.json")));
        assert_eq!(config.max_id_attempts.get(), 50);
        assert!(config.verbose);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        assert!(Config::try_parse_from(["where-is-bus-server", "--max-id-attempts", "0"]).is_err());
    }
}
