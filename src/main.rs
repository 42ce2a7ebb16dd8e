use std::env;

use prepay::api::ApiError;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: prepay serve [port] | prepay schedule --principal <P> --annual-rate <R> [options] | prepay invest --monthly-contribution <C> --annual-rate <R> [options]";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw_args: Vec<String> = env::args().collect();
    let result = match raw_args.get(1).map(|s| s.as_str()) {
        Some("serve") => {
            let port = raw_args
                .get(2)
                .and_then(|s| s.parse::<u16>().ok())
                .unwrap_or(8080);
            if let Err(e) = prepay::api::run_http_server(port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
            return;
        }
        Some("schedule") => prepay::api::run_schedule_command(&raw_args[1..]),
        Some("invest") => prepay::api::run_investment_command(&raw_args[1..]),
        _ => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    match result {
        Ok(json) => println!("{json}"),
        Err(ApiError::Usage(e)) => e.exit(),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
