use std::process::ExitCode;

use chrono::Local;
use clap::{ArgAction, Parser, Subcommand};
use inquire::{Confirm, CustomType, Text};
use taishan_core::{Config, Endpoint, HttpFetcher, WeatherService};

use crate::output;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "taishan", version, about = "Mount Tai weather and hazard report")]
pub struct Cli {
    /// Print the raw `{code, message, data}` envelope as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase log verbosity (-v, -vv). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the current station snapshot.
    Basic,

    /// Show current conditions and the hourly forecast with hazard flags.
    Forecast {
        /// Endpoint constant to read from.
        #[arg(default_value = "FORECAST_URL")]
        location: String,

        /// Only list forecast hours that carry a hazard.
        #[arg(long)]
        hazards_only: bool,
    },

    /// Show only the current weather caption.
    Caption {
        #[arg(default_value = "FORECAST_URL")]
        location: String,
    },

    /// Show the gate opening hours.
    Gate,

    /// Interactively edit gate hours, endpoint URLs and the request timeout.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let json = self.json;
        let loaded = Config::load();
        let config = match self.command {
            Command::Configure => config_or_default(loaded),
            _ => loaded?,
        };
        tracing::debug!(command = ?self.command, json, "Running command");

        let ok = match self.command {
            Command::Configure => configure(config)?,
            Command::Basic => {
                let service = service(config)?;
                output::emit(&service.basic().await, json, output::render_basic)?
            }
            Command::Forecast { location, hazards_only } => {
                let service = service(config)?;
                output::emit(&service.forecast(&location).await, json, |report| {
                    output::render_forecast(report, hazards_only)
                })?
            }
            Command::Caption { location } => {
                let service = service(config)?;
                output::emit(&service.caption(&location).await, json, |caption| caption.clone())?
            }
            Command::Gate => {
                let service = service(config)?;
                let now = Local::now().time();
                output::emit(&service.gate_time(), json, |gate| output::render_gate(gate, now))?
            }
        };

        Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
    }
}

/// `configure` must still run when the file on disk is broken, since it is how the file gets fixed.
fn config_or_default(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|err| {
        tracing::warn!("Ignoring unreadable config, starting from defaults: {err:#}");
        Config::default()
    })
}

fn service(config: Config) -> anyhow::Result<WeatherService<HttpFetcher>> {
    let fetcher = HttpFetcher::from_config(&config)?;
    Ok(WeatherService::new(fetcher, config))
}

fn configure(mut config: Config) -> anyhow::Result<bool> {
    let open = Text::new("Gate opening time (HH:MM):")
        .with_default(&config.gate.open_time)
        .prompt()?;
    let close = Text::new("Gate closing time (HH:MM):")
        .with_default(&config.gate.close_time)
        .prompt()?;
    config.set_gate_hours(&open, &close)?;

    for endpoint in Endpoint::all().iter().copied() {
        let override_url = Confirm::new(&format!("Override the {endpoint} address?"))
            .with_default(config.is_endpoint_overridden(endpoint))
            .prompt()?;

        if override_url {
            let url = Text::new(&format!("{endpoint} URL:"))
                .with_default(config.endpoint_url(endpoint))
                .prompt()?;
            config.set_endpoint_url(endpoint, url.trim().to_string());
        } else {
            config.clear_endpoint_url(endpoint);
        }
    }

    config.request_timeout_secs = CustomType::<u64>::new("Request timeout (seconds):")
        .with_default(config.request_timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.validate()?;
    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forecast_location_defaults_to_forecast_url() {
        let cli = Cli::try_parse_from(["taishan", "forecast"]).unwrap();
        match cli.command {
            Command::Forecast { location, hazards_only } => {
                assert_eq!(location, "FORECAST_URL");
                assert!(!hazards_only);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["taishan", "gate", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::Gate));
    }

    #[test]
    fn broken_config_falls_back_to_defaults() {
        let cfg = config_or_default(Err(anyhow::anyhow!("Invalid config file: config.toml")));
        assert_eq!(cfg, Config::default());

        let mut custom = Config::default();
        custom.request_timeout_secs = 3;
        assert_eq!(config_or_default(Ok(custom.clone())), custom);
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["taishan"]).is_err());
    }
}
