use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reqwest::Client;
use std::{fs, io, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use chi_elections::{fetch, summary};

#[derive(Parser)]
#[command(name = "chi-elections", about = "Chicago election results as CSV")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Racewide totals from the fixed-width summary export
    Summary {
        /// Parse a local export file instead of fetching
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Use the pre-election test URL
        #[arg(long)]
        test: bool,
    },
    /// List available elections
    Elections,
    /// List the races in one election (turnout entry marked)
    Races {
        #[arg(long)]
        election: String,
    },
    /// Precinct-level results for one race
    Precincts {
        #[arg(long)]
        election: String,
        #[arg(long)]
        race: String,
        #[arg(long, value_enum, default_value_t = Level::Precinct)]
        level: Level,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Precinct,
    Ward,
    Total,
}

#[tokio::main]
async fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    match Cli::parse().command {
        Command::Summary { file, test } => summary_csv(file, test).await,
        Command::Elections => elections_csv().await,
        Command::Races { election } => races_csv(&election).await,
        Command::Precincts { election, race, level } => {
            precincts_csv(&election, &race, level).await
        }
    }
}

async fn summary_csv(file: Option<PathBuf>, test: bool) -> Result<()> {
    let races = match file {
        Some(path) => {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            summary::parse(&text)
        }
        None => {
            let url = if test { fetch::TEST_SUMMARY_URL } else { fetch::SUMMARY_URL };
            info!(url, "fetching summary export");
            fetch::fetch_summary(&Client::new(), url).await?
        }
    };

    let mut writer = csv::Writer::from_writer(io::stdout());
    for race in &races {
        for row in race.rows() {
            writer.serialize(row)?;
        }
    }
    writer.flush()?;
    Ok(())
}

async fn elections_csv() -> Result<()> {
    let elections = fetch::elections(&Client::new()).await?;

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["code", "name"])?;
    for election in elections {
        writer.write_record([election.code, election.name])?;
    }
    writer.flush()?;
    Ok(())
}

async fn races_csv(election: &str) -> Result<()> {
    let (races, turnout) = fetch::race_options(&Client::new(), election).await?;

    let mut writer = csv::Writer::from_writer(io::stdout());
    writer.write_record(["number", "name", "turnout"])?;
    for race in races {
        writer.write_record([race.number, race.name, "false".to_string()])?;
    }
    if let Some(turnout) = turnout {
        writer.write_record([turnout.number, turnout.name, "true".to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

async fn precincts_csv(election: &str, race: &str, level: Level) -> Result<()> {
    let results = fetch::fetch_precincts(&Client::new(), election, race).await?;

    let mut writer = csv::Writer::from_writer(io::stdout());
    match level {
        Level::Precinct => {
            writer.write_record(["ward", "precinct", "choice", "votes"])?;
            for (&(ward, precinct), votes) in results.precincts() {
                for (choice, count) in votes {
                    writer.write_record([
                        ward.to_string(),
                        precinct.to_string(),
                        choice.clone(),
                        count.to_string(),
                    ])?;
                }
            }
        }
        Level::Ward => {
            writer.write_record(["ward", "choice", "votes"])?;
            for (ward, votes) in results.wards() {
                for (choice, count) in votes {
                    writer.write_record([ward.to_string(), choice, count.to_string()])?;
                }
            }
        }
        Level::Total => {
            writer.write_record(["choice", "votes"])?;
            for (choice, count) in results.total() {
                writer.write_record([choice, count.to_string()])?;
            }
        }
    }
    writer.flush()?;
    Ok(())
}
