mod accessor;
mod analysis;
mod args;
mod client;
#[cfg(test)]
mod fixture;
mod provider;
mod report;
mod resolver;
mod service;
mod statsbomb;
mod tactics;

use std::time::Duration;

use accessor::Fixture;
use args::{Args, Command};
use clap::Parser;
use client::Client;
use provider::EventSource;
use report::Report;
use resolver::FixtureQuery;
use serde::Serialize;
use statsbomb::{CompetitionId, SeasonId};

fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let client = Client::new(
        &args.data_url,
        args.proxy.as_deref(),
        Duration::from_secs(args.timeout),
    )?;

    if let Some((selection, dataset)) = args.command.dataset() {
        let fixture = Fixture::open(&client, &FixtureQuery::from(selection)).await?;
        return print(&Report::compute(&fixture, &dataset)?);
    }

    match args.command {
        Command::Competitions => print(&client.competitions().await?),
        Command::Matches {
            competition,
            season,
        } => print(
            &client
                .matches(CompetitionId(competition), SeasonId(season))
                .await?,
        ),
        Command::Teams {
            competition,
            season,
            home,
        } => {
            let matches = client
                .matches(CompetitionId(competition), SeasonId(season))
                .await?;
            match home {
                Some(home) => print(&resolver::away_teams(&matches, &home)),
                None => print(&resolver::home_teams(&matches)),
            }
        }
        Command::Serve { bind } => Ok(service::serve(client, &bind).await?),
        _ => unreachable!("per-match commands are answered as datasets"),
    }
}
