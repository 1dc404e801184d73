//! pv-quote entry point: CLI wiring around the sizing and pricing engines.

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pv_quote::config::{QuoteConfig, load_input};
use pv_quote::io::export::{export_csv, export_priced_csv};
use pv_quote::pricing::price_scenarios;
use pv_quote::sizing::finance::{ProjectionTable, project};
use pv_quote::sizing::{SimulationInput, calculate_simulation};

/// Photovoltaic sizing and pricing for residential solar quotes.
#[derive(Debug, Parser)]
#[command(name = "pv-quote", version)]
struct Cli {
    /// Load catalogue, assumptions, and pricing from a TOML file
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    config: Option<PathBuf>,

    /// Use a built-in configuration preset (standard, high_yield)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Load household inputs from a TOML file
    #[arg(
        long,
        value_name = "PATH",
        conflicts_with_all = ["consumption", "day_share", "surface", "buy", "sell"]
    )]
    input: Option<PathBuf>,

    /// Annual consumption (kWh)
    #[arg(long)]
    consumption: Option<f64>,

    /// Share of consumption during daylight (percent)
    #[arg(long)]
    day_share: Option<f64>,

    /// Usable roof surface (m²)
    #[arg(long)]
    surface: Option<f64>,

    /// Grid purchase tariff (₪/kWh)
    #[arg(long)]
    buy: Option<f64>,

    /// Feed-in tariff (₪/kWh)
    #[arg(long)]
    sell: Option<f64>,

    /// Append the commercial price breakdown
    #[arg(long)]
    commercial: bool,

    /// Personal commercial margin replacing the configured one
    #[arg(long, requires = "commercial")]
    margin: Option<f64>,

    /// Export the scenario table to CSV
    #[arg(long, value_name = "PATH")]
    csv_out: Option<PathBuf>,

    /// Start the HTTP API after the optional report
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port
    #[cfg(feature = "api")]
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Bearer token granting access to the commercial routes
    #[cfg(feature = "api")]
    #[arg(long, env = "PV_QUOTE_COMMERCIAL_TOKEN", hide_env_values = true)]
    commercial_token: Option<String>,
}

impl Cli {
    /// Household inputs from `--input` or the individual flags.
    fn household(&self) -> anyhow::Result<Option<SimulationInput>> {
        if let Some(path) = &self.input {
            return Ok(Some(load_input(path)?));
        }
        match (self.consumption, self.day_share, self.surface, self.buy, self.sell) {
            (Some(consumption), Some(day_share), Some(surface), Some(buy), Some(sell)) => {
                Ok(Some(SimulationInput {
                    annual_consumption_kwh: consumption,
                    day_share_pct: day_share,
                    surface_m2: surface,
                    buy_tariff: buy,
                    sell_tariff: sell,
                }))
            }
            (None, None, None, None, None) => Ok(None),
            _ => bail!(
                "incomplete household input: --consumption, --day-share, --surface, --buy \
                 and --sell must be given together"
            ),
        }
    }

    #[cfg(feature = "api")]
    fn serving(&self) -> bool {
        self.serve
    }

    #[cfg(not(feature = "api"))]
    fn serving(&self) -> bool {
        false
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<QuoteConfig> {
    let cfg = match (&cli.config, &cli.preset) {
        (Some(path), _) => QuoteConfig::from_toml_file(path)?,
        (None, Some(name)) => QuoteConfig::from_preset(name)?,
        (None, None) => QuoteConfig::standard(),
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!(lines.join("\n"));
    }
    Ok(cfg)
}

fn report(cli: &Cli, cfg: &QuoteConfig, input: &SimulationInput) -> anyhow::Result<()> {
    let result = calculate_simulation(input, &cfg.catalogue, &cfg.assumptions)?;
    println!("{result}");

    if let Some(best) = result.best() {
        let rows = project(
            best.annual_savings,
            cfg.assumptions.inflation_rate,
            cfg.assumptions.projection_years,
        );
        println!("\n--- Savings Projection ({}) ---", best.id);
        println!("{}", ProjectionTable(&rows));
    }

    if cli.commercial {
        let pricing = match cli.margin {
            Some(margin) => cfg.pricing.with_commercial_margin(margin),
            None => cfg.pricing,
        };
        let priced = price_scenarios(&result.scenarios, &cfg.catalogue, &pricing)?;
        println!("\n--- Commercial Pricing ---");
        for p in &priced {
            println!("{p}");
        }
        if let Some(path) = &cli.csv_out {
            export_priced_csv(&priced, path).with_context(|| csv_failure(path))?;
            info!(path = %path.display(), "priced scenarios written");
        }
    } else if let Some(path) = &cli.csv_out {
        export_csv(&result.scenarios, path).with_context(|| csv_failure(path))?;
        info!(path = %path.display(), "scenarios written");
    }
    Ok(())
}

fn csv_failure(path: &Path) -> String {
    format!("failed to write CSV to \"{}\"", path.display())
}

#[cfg(feature = "api")]
fn serve(cli: &Cli, config: QuoteConfig) -> anyhow::Result<()> {
    use std::net::SocketAddr;
    use std::sync::Arc;

    if cli.commercial_token.is_none() {
        tracing::warn!("no commercial token configured; commercial routes will answer 403");
    }
    let state = Arc::new(pv_quote::api::AppState {
        config,
        commercial_token: cli.commercial_token.clone(),
    });
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(pv_quote::api::serve(state, addr))
        .with_context(|| format!("API server on {addr} failed"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(&cli)?;

    match cli.household()? {
        Some(input) => report(&cli, &config, &input)?,
        None if cli.serving() => {}
        None => bail!(
            "no household input: pass --input <PATH> or --consumption, --day-share, \
             --surface, --buy and --sell"
        ),
    }

    #[cfg(feature = "api")]
    if cli.serve {
        return serve(&cli, config);
    }

    Ok(())
}
