//! Command-line argument parsing for the server binary

use clap::{ArgAction, Parser};

use crate::constants::{server, workers};

/// gRPC URL fetching service with an internal worker pool to hide HTTP
/// latency.
#[derive(Parser, Debug)]
#[command(name = "urlfetcher-server", version)]
pub struct Cli {
    /// gRPC serving address, clients should connect to this
    #[arg(short, long, default_value = server::DEFAULT_ADDRESS, value_name = "HOST:PORT")]
    pub address: String,

    /// Number of fetcher workers
    #[arg(short, long, default_value_t = workers::DEFAULT_WORKER_COUNT)]
    pub threads: usize,

    /// Increase logging verbosity by each given -v up to 2.
    /// 0 = warning (default), 1 = info, 2 = debug
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_service_contract() {
        let cli = Cli::parse_from(["urlfetcher-server"]);
        assert_eq!(cli.address, "localhost:8000");
        assert_eq!(cli.threads, 16);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn verbosity_accumulates() {
        let cli = Cli::parse_from(["urlfetcher-server", "-v", "-v"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn address_and_threads_are_configurable() {
        let cli = Cli::parse_from([
            "urlfetcher-server",
            "--address",
            "0.0.0.0:9000",
            "--threads",
            "4",
        ]);
        assert_eq!(cli.address, "0.0.0.0:9000");
        assert_eq!(cli.threads, 4);
    }
}
