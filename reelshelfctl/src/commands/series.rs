use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use reelshelf_core::ingest::SeasonGrouping;
use reelshelf_core::store::ContentStore;
use reelshelf_model::{CatalogId, NewCatalogEntry};
use tracing::info;

use super::open_store;
use crate::config::Config;

#[derive(Debug, Subcommand)]
pub enum SeriesCommand {
    /// Create a series and print its id
    Add(AddSeriesArgs),
    /// List every series in the catalog
    List,
    /// Show a series and its stored seasons
    Show {
        /// Catalog id of the series
        id: CatalogId,
    },
}

#[derive(Debug, Args)]
pub struct AddSeriesArgs {
    /// Display title
    #[arg(long)]
    pub title: String,
    /// Alternative (original language) title
    #[arg(long)]
    pub title_alt: Option<String>,
    /// Release year (1900-2100)
    #[arg(long)]
    pub year: u16,
    /// External rating (0-10)
    #[arg(long, default_value_t = 0.0)]
    pub rating: f32,
}

pub async fn run(config: &Config, command: SeriesCommand) -> Result<()> {
    let store = open_store(config).await?;
    match command {
        SeriesCommand::Add(args) => {
            let fields = NewCatalogEntry {
                title_alt: args.title_alt.unwrap_or_else(|| args.title.clone()),
                title: args.title,
                year: args.year,
                external_rating: args.rating,
            };
            let entry = store
                .create_series(fields)
                .await
                .context("failed to create series")?;
            info!(catalog_id = %entry.id, title = %entry.title, "series created");
            println!("{}", entry.id);
        }
        SeriesCommand::List => {
            let series = store.list_series().await;
            if series.is_empty() {
                println!("No series in the catalog yet");
            }
            for entry in series {
                let episodes = entry
                    .seasons()
                    .map(|seasons| seasons.episode_count())
                    .unwrap_or_default();
                println!(
                    "{}  {} ({})  {} episodes",
                    entry.id, entry.title, entry.year, episodes
                );
            }
        }
        SeriesCommand::Show { id } => {
            let Some(entry) = store.get_catalog_entry(&id).await? else {
                bail!("catalog entry {id} not found");
            };
            println!("{} / {} ({})", entry.title, entry.title_alt, entry.year);
            println!("Rating: {:.1}", entry.external_rating);
            match entry.seasons() {
                None => println!("Kind: {}", entry.kind()),
                Some(seasons) if seasons.is_empty() => {
                    println!("No episodes stored yet");
                }
                Some(seasons) => {
                    let numbers: Vec<String> = seasons
                        .season_numbers()
                        .iter()
                        .map(ToString::to_string)
                        .collect();
                    println!("Seasons: {}", numbers.join(", "));
                    println!("{}", SeasonGrouping::from_keys(seasons.keys()));
                    println!("Total: {} episodes", seasons.episode_count());
                }
            }
        }
    }
    Ok(())
}
