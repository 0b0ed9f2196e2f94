use std::process::ExitCode;

use clap::Parser;
use reqwest::header::{HeaderValue, ACCEPT};
use reqwest::StatusCode;

#[derive(Parser)]
#[command(name = "health-probe")]
#[command(about = "Query a running healthcheck instance", long_about = None)]
struct Cli {
    /// Base URL of the instance
    #[arg(short, long, default_value = "http://127.0.0.1:8080")]
    url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match query(&cli.url).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn query(base: &str) -> Result<bool, reqwest::Error> {
    let url = format!("{}/health", base.trim_end_matches('/'));
    let res = reqwest::Client::new()
        .get(url)
        .header(ACCEPT, HeaderValue::from_static("application/json"))
        .send()
        .await?;

    let status = res.status();
    let body = res.text().await?;
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json).unwrap_or(body)),
        Err(_) => println!("{} {}", status, body),
    }

    Ok(status == StatusCode::OK)
}
