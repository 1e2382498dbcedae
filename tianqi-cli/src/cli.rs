use anyhow::Context;
use clap::{Parser, Subcommand};
use tianqi_core::{AmapClient, Config, TemperatureUnit, WeatherService};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "tianqi", version, about = "AMap weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the AMap web-service API key and preferences.
    Configure,

    /// Show weather for a city name or adcode (defaults to the last city).
    Show {
        /// City name (e.g. "北京", "朝阳区") or adcode (e.g. "110000").
        city: Option<String>,

        /// Display temperatures in Fahrenheit for this invocation.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// Search for cities matching a query and list the candidates.
    Search {
        /// Partial city name.
        query: String,
    },

    /// Show weather for the current location (IP-based).
    Locate {
        /// Display temperatures in Fahrenheit for this invocation.
        #[arg(long)]
        fahrenheit: bool,
    },

    /// List recently viewed cities.
    History,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, fahrenheit } => show(city, fahrenheit).await,
            Command::Search { query } => search(query).await,
            Command::Locate { fahrenheit } => locate(fahrenheit).await,
            Command::History => history(),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key = inquire::Password::new("AMap web-service API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    config.api_key = Some(key.trim().to_string());

    let unit = inquire::Select::new("Temperature unit:", vec!["Celsius", "Fahrenheit"])
        .prompt()
        .context("Failed to read unit preference")?;
    config.unit = match unit {
        "Fahrenheit" => TemperatureUnit::Fahrenheit,
        _ => TemperatureUnit::Celsius,
    };

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

fn service_from(config: &Config) -> anyhow::Result<WeatherService> {
    let client = AmapClient::new(config.api_key()?.to_string());
    Ok(WeatherService::new(client).with_hourly_count(config.hourly_count))
}

async fn show(city: Option<String>, fahrenheit: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let service = service_from(&config)?;

    let query = city
        .or_else(|| config.last_city.clone())
        .context("No city given and no history yet.\nHint: run `tianqi show <city>` once.")?;

    let snapshot = service.get_full_weather_data(&query).await?;

    config.remember_city(&snapshot.adcode, &snapshot.city_name);
    config.save()?;

    let unit = if fahrenheit { TemperatureUnit::Fahrenheit } else { config.unit };
    render::snapshot(&snapshot, unit);
    Ok(())
}

async fn search(query: String) -> anyhow::Result<()> {
    let config = Config::load()?;
    let service = service_from(&config)?;

    let candidates = service.search_suggestions(&query).await;
    if candidates.is_empty() {
        println!("No matches for '{query}'.");
        return Ok(());
    }

    for candidate in &candidates {
        let mut region = candidate.province.clone();
        if !candidate.city.is_empty() && candidate.city != candidate.province {
            region = format!("{region} {}", candidate.city);
        }
        println!("{:<8} {:<10} {}", candidate.adcode, candidate.name, region);
    }
    Ok(())
}

async fn locate(fahrenheit: bool) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    let service = service_from(&config)?;

    let snapshot = service.get_weather_by_current_location().await?;

    config.remember_city(&snapshot.adcode, &snapshot.city_name);
    config.save()?;

    let unit = if fahrenheit { TemperatureUnit::Fahrenheit } else { config.unit };
    render::snapshot(&snapshot, unit);
    Ok(())
}

fn history() -> anyhow::Result<()> {
    let config = Config::load()?;
    if config.history.is_empty() {
        println!("No cities viewed yet.");
        return Ok(());
    }

    for entry in &config.history {
        let marker = if config.last_city.as_deref() == Some(entry.adcode.as_str()) {
            "*"
        } else {
            " "
        };
        println!("{marker} {:<8} {}", entry.adcode, entry.name);
    }
    Ok(())
}
