//! URL fetcher client binary
//!
//! Submits the given URLs to a running server, resolves the returned
//! tickets and prints each response body to stdout.

use std::io::Write;
use std::process;

use clap::{ArgAction, Parser};

use urlfetcher::cli::init_logging;
use urlfetcher::client::fetch_urls;
use urlfetcher::constants::server;
use urlfetcher::errors::Result;

/// Fetch URLs through a running URL fetcher server.
#[derive(Parser, Debug)]
#[command(name = "urlfetcher-client", version)]
struct Args {
    /// Address of the URL fetcher server
    #[arg(short, long, default_value = server::DEFAULT_ADDRESS, value_name = "HOST:PORT")]
    address: String,

    /// Increase logging verbosity by each given -v up to 2
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// URLs to fetch
    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let urls = args.urls.clone();
    let responses = fetch_urls(args.urls, &args.address).await?;

    let mut stdout = std::io::stdout().lock();
    for (url, response) in urls.iter().zip(&responses) {
        if response.curl_error != 0 {
            eprintln!("{url}: transport error {}", response.curl_error);
        } else {
            let _ = stdout.write_all(&response.body);
            let _ = stdout.write_all(b"\n");
        }
    }
    Ok(())
}
