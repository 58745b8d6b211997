use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use mei_rs::{Client, ClientConfig, Registry, Resolver, DEFAULT_WINDOW};

#[derive(Parser, Debug)]
#[command(
    name = "mei",
    version,
    about = "Fetch, normalize & align macroeconomic indicators"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an aligned recent-period table for one indicator.
    Table(TableArgs),
    /// Print one country's series as date/value lines.
    Series(SeriesArgs),
    /// List the built-in indicators and their covered countries.
    Indicators,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Indicator name, e.g. "Unemployment Rate"
    #[arg(short, long)]
    indicator: String,
    /// Countries separated by comma or semicolon; defaults to everything
    /// the indicator covers.
    #[arg(short, long)]
    countries: Option<String>,
    /// Number of recent periods to show.
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    window: usize,
}

#[derive(Args, Debug)]
struct SeriesArgs {
    /// Indicator name, e.g. "Annual Inflation Rate"
    #[arg(short, long)]
    indicator: String,
    /// Country name, e.g. "Japan"
    #[arg(short, long)]
    country: String,
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{x:.4}");
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

/// API keys are pass-through: read from the environment here, never
/// inside the library.
fn client_from_env() -> Client {
    let non_empty = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
    Client::new(ClientConfig {
        fred_api_key: non_empty("FRED_API_KEY"),
        estat_api_key: non_empty("ESTAT_API_KEY"),
        ..ClientConfig::default()
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let resolver = Resolver::new(Registry::builtin(), Arc::new(client_from_env()));
    match cli.cmd {
        Command::Table(args) => cmd_table(&resolver, args).await,
        Command::Series(args) => cmd_series(&resolver, args).await,
        Command::Indicators => cmd_indicators(&resolver),
    }
}

async fn cmd_table(resolver: &Resolver, args: TableArgs) -> Result<()> {
    let table = match args.countries.as_deref() {
        Some(list) => {
            resolver
                .resolve_table(&args.indicator, &parse_list(list), args.window)
                .await
        }
        None => resolver.resolve_table_all(&args.indicator).await,
    };
    if table.is_blank() {
        println!("no data available for {}", args.indicator);
    } else {
        print!("{table}");
    }
    Ok(())
}

async fn cmd_series(resolver: &Resolver, args: SeriesArgs) -> Result<()> {
    let series = resolver.resolve(&args.country, &args.indicator).await;
    if series.is_empty() {
        println!("no data available for {} in {}", args.indicator, args.country);
        return Ok(());
    }
    println!("# {}", series.source);
    for obs in &series.observations {
        println!("{}  {}", obs.date, fmt_opt(obs.value));
    }
    Ok(())
}

fn cmd_indicators(resolver: &Resolver) -> Result<()> {
    for indicator in resolver.registry().indicators() {
        let countries: Vec<&str> = indicator.countries().map(|c| c.name()).collect();
        println!("{}: {}", indicator.name(), countries.join(", "));
    }
    Ok(())
}
