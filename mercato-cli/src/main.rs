//! Mercato command-line client
//!
//! Sends one authenticated request to the Mercato API and prints the
//! response body.

mod config;

use anyhow::Context;
use clap::Parser;
use config::ConfigLoader;
use mercato_sdk::{Method, RequestOptions};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Mercato - authenticated requests against the Mercato commerce API
#[derive(Parser, Debug)]
#[command(name = "mercato")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./mercato.toml")]
    config: PathBuf,

    /// Consumer secret, overriding the configuration file
    #[arg(long, env = "MERCATO_CONSUMER_SECRET", hide_env_values = true)]
    consumer_secret: Option<String>,

    /// HTTP method (GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS)
    #[arg(value_parser = parse_method)]
    method: Method,

    /// Endpoint path relative to the API root, or an absolute URL
    path: String,

    /// JSON request body
    #[arg(short, long)]
    data: Option<String>,

    /// Query parameter as key=value, may be repeated
    #[arg(short, long, value_parser = parse_key_value)]
    query: Vec<(String, String)>,
}

fn parse_method(raw: &str) -> Result<Method, String> {
    raw.to_ascii_uppercase()
        .parse()
        .map_err(|e| format!("invalid method `{raw}`: {e}"))
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args = Args::parse();

    tracing::debug!("Starting mercato v{}", env!("CARGO_PKG_VERSION"));

    let loaded_config = ConfigLoader::new(&args.config, args.consumer_secret)
        .load()
        .map_err(|e| {
            tracing::error!("Failed to load configuration: {}", e);
            e
        })?;
    tracing::debug!("Configuration loaded from {:?}", args.config);

    let transport = loaded_config.into_transport()?;

    let mut options = RequestOptions::new();
    for (key, value) in args.query {
        options = options.query(key, value);
    }
    if let Some(data) = args.data {
        let body: serde_json::Value =
            serde_json::from_str(&data).context("--data is not valid JSON")?;
        options = options.json(&body)?;
    }

    let response = transport
        .request(args.method, &args.path, options)
        .await
        .map_err(|e| {
            match e.as_api() {
                Some(api) => tracing::error!(
                    status = %api.status,
                    code = %api.payload.code,
                    "API returned an error: {}",
                    api.payload
                ),
                None => tracing::error!("Request failed: {}", e),
            }
            e
        })?;

    tracing::info!("{} {}", response.status, args.path);
    match response.json::<serde_json::Value>() {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", response.text()),
    }

    Ok(())
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("status=on-hold").unwrap(),
            ("status".to_string(), "on-hold".to_string())
        );
        assert_eq!(
            parse_key_value("search=a=b").unwrap(),
            ("search".to_string(), "a=b".to_string())
        );
        assert!(parse_key_value("status").is_err());
    }

    #[test]
    fn test_args_parsing() {
        let args = Args::try_parse_from([
            "mercato",
            "--config",
            "shop.toml",
            "post",
            "v3/orders",
            "--data",
            r#"{"status":"pending"}"#,
            "-q",
            "per_page=5",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("shop.toml"));
        assert_eq!(args.method, Method::POST);
        assert_eq!(args.path, "v3/orders");
        assert_eq!(args.query, vec![("per_page".to_string(), "5".to_string())]);
        assert!(args.data.is_some());
    }
}
