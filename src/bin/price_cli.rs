/// Sample client for retrieving prices from the price server
/// Usage:
///   bitprice-cli usd 2021-02-21T16:40:00+09:00
///   bitprice-cli jpy 2021-02-21T16:40:00+09:00 2021-02-21T17:14:00+09:00
use anyhow::{anyhow, bail, Context};
use clap::Parser;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use bitprice::server::PriceResp;
use bitprice::utils::parse_rfc3339_secs;
use bitprice::SupportedCurrency;

#[derive(Parser, Debug)]
#[command(author, version, about = "Query BTC prices from a running bitprice server", long_about = None)]
struct CliArgs {
    /// Quote currency: usd or jpy
    currency: SupportedCurrency,

    /// Point in time (RFC 3339), or range start when END is given
    time: String,

    /// Exclusive range end (RFC 3339)
    end: Option<String>,

    /// Server base address
    #[arg(long, env = "BITPRICE_ADDR", default_value = "http://127.0.0.1:9991")]
    addr: String,

    /// Pretty-print the JSON output
    #[arg(long, default_value = "false")]
    indent: bool,
}

fn to_secs(input: &str) -> anyhow::Result<i64> {
    parse_rfc3339_secs(input).ok_or_else(|| anyhow!("not an RFC 3339 timestamp: {}", input))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(1))
        .build()?;
    let base = args.addr.trim_end_matches('/');
    let currency = args.currency.as_str().to_lowercase();

    let url = match &args.end {
        None => format!("{}/v1/prices/{}?uts={}", base, currency, to_secs(&args.time)?),
        Some(end) => format!(
            "{}/v1/prices/{}/range?start={}&end={}",
            base,
            currency,
            to_secs(&args.time)?,
            to_secs(end)?
        ),
    };
    tracing::debug!("GET {}", url);

    let response = client
        .get(&url)
        .send()
        .await
        .with_context(|| format!("could not reach {}", base))?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        bail!("{} {}", status, body);
    }

    let output = if args.end.is_some() {
        let items: Vec<PriceResp> = response.json().await?;
        render(&items, args.indent)?
    } else {
        let item: PriceResp = response.json().await?;
        render(&item, args.indent)?
    };
    println!("{}", output);

    Ok(())
}

fn render<T: serde::Serialize>(value: &T, indent: bool) -> serde_json::Result<String> {
    if indent {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}
