use std::{io, path::PathBuf};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use crate::{
    config::Config,
    geocode::Nominatim,
    session::{MapOutput, Session},
    stores::Stores,
};

pub use state::State;

mod config;
mod geocode;
mod lookup;
mod map;
mod nearest;
mod prompt;
mod report;
mod session;
mod state;
mod stores;
mod utils;

/// Finds the stores closest to an address within one US state.
#[derive(Debug, Parser)]
#[command(name = "locator", version)]
struct Cli {
    /// YAML config file (default: ./locator.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Store dataset CSV, overrides the config file
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Answer a single query
    Lookup {
        #[arg(long, default_value = "175 Forest St")]
        street: String,
        #[arg(long, default_value = "Waltham")]
        city: String,
        #[arg(long, default_value_t = State::default())]
        state: State,
        #[command(flatten)]
        output: Output,
    },
    /// Prompt for addresses until cancelled
    Interactive {
        #[command(flatten)]
        output: Output,
    },
    /// List state codes with the number of stores in each
    States,
}

#[derive(Debug, Args)]
struct Output {
    /// How many stores to list
    #[arg(short = 'n', long)]
    limit: Option<usize>,
    /// Where to write the map (.html or .geojson)
    #[arg(long, conflicts_with = "no_map")]
    map: Option<PathBuf>,
    /// Don't write a map
    #[arg(long)]
    no_map: bool,
    /// Print results as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(x) = cli.dataset {
        config.dataset = x;
    }

    let stores = Stores::load(&config.dataset)?;
    if stores.is_empty() {
        log::warn!("{} has no stores", config.dataset.display());
    } else {
        log::info!(
            "Loaded {} stores from {}",
            stores.len(),
            config.dataset.display()
        );
    }

    match cli.command {
        Command::Lookup {
            street,
            city,
            state,
            output,
        } => {
            let session = session(stores, &config, output);
            let query = session.query(&street, &city, state);
            session.answer(query, &mut io::stdout())?;
        }
        Command::Interactive { output } => {
            prompt::run(&session(stores, &config, output))?;
        }
        Command::States => {
            let counts = stores.count_by_state();
            for state in State::all() {
                let n = counts.get(state.code()).copied().unwrap_or_default();
                println!("{state}\t{n}");
            }

            let unknown: Vec<_> = counts
                .iter()
                .filter(|(code, _)| code.parse::<State>().is_err())
                .collect();
            if !unknown.is_empty() {
                log::warn!("Rows with unlisted state codes: {unknown:?}");
            }
        }
    }

    Ok(())
}

fn session(stores: Stores, config: &Config, output: Output) -> Session<Nominatim> {
    let map = if output.no_map {
        None
    } else {
        output.map.or_else(|| config.map.output.clone())
    };

    Session {
        stores,
        geocoder: Nominatim::new(&config.geocoder),
        brand: config.brand.clone(),
        country: config.country.clone(),
        limit: output.limit.unwrap_or(config.limit),
        json: output.json,
        map: map.map(|path| MapOutput {
            path,
            zoom: config.map.zoom,
            style: config.map.style.clone(),
        }),
    }
}
