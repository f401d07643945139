use std::process::ExitCode;

use freshmail_client::{ClientConfig, FreshMailClient, Params};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: freshmail <endpoint> [json-object-params]";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("freshmail_client=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let Some(endpoint) = args.next() else {
        eprintln!("{USAGE}");
        return ExitCode::from(2);
    };

    let params = match args.next().map(|raw| parse_params(&raw)).transpose() {
        Ok(params) => params.unwrap_or_default(),
        Err(message) => {
            eprintln!("{message}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    // Get credentials from environment
    let token = std::env::var("FRESHMAIL_API_TOKEN").unwrap_or_else(|_| {
        eprintln!("Warning: FRESHMAIL_API_TOKEN not set. API calls will fail.");
        String::new()
    });

    let mut config = ClientConfig::new(token);
    if let Ok(base_url) = std::env::var("FRESHMAIL_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    let client = match FreshMailClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create FreshMail client: {e}");
            return ExitCode::FAILURE;
        }
    };

    match client.do_request(&endpoint, &params).await {
        Ok(response) => {
            match serde_json::to_string_pretty(&response) {
                Ok(pretty) => println!("{pretty}"),
                Err(_) => println!("{response}"),
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Parse the optional params argument, which must be a JSON object.
fn parse_params(raw: &str) -> Result<Params, String> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(params)) => Ok(params),
        Ok(other) => Err(format!("params must be a JSON object, got: {other}")),
        Err(e) => Err(format!("invalid JSON params: {e}")),
    }
}
