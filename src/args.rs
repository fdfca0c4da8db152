use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::{
    analysis::xg::XgBasis,
    client::Client,
    report::Dataset,
    resolver::FixtureQuery,
    statsbomb::{FormationCode, PlayerId, Side},
};

#[derive(Parser)]
#[command(version, about = "Match datasets from the StatsBomb open data")]
pub struct Args {
    #[arg(long, global = true, env = "STATSBOMB_DATA_URL", default_value = Client::OPEN_DATA_URL)]
    pub data_url: String,
    #[arg(long, global = true)]
    pub proxy: Option<String>,
    /// Request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Args, Clone, Debug)]
pub struct FixtureArgs {
    #[arg(long)]
    pub competition: u32,
    #[arg(long)]
    pub season: u32,
    #[arg(long)]
    pub home: String,
    #[arg(long)]
    pub away: String,
    /// Match date (YYYY-MM-DD) of the leg, for pairings played twice.
    #[arg(long)]
    pub leg: Option<NaiveDate>,
}

impl From<&FixtureArgs> for FixtureQuery {
    fn from(value: &FixtureArgs) -> Self {
        Self {
            competition: value.competition.into(),
            season: value.season.into(),
            home: value.home.clone(),
            away: value.away.clone(),
            leg: value.leg,
        }
    }
}

#[derive(clap::Args, Clone, Debug)]
pub struct TeamArgs {
    #[command(flatten)]
    pub fixture: FixtureArgs,
    #[arg(long, value_enum)]
    pub team: Side,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// List competitions and seasons.
    Competitions,
    /// List the matches of a season.
    Matches {
        #[arg(long)]
        competition: u32,
        #[arg(long)]
        season: u32,
    },
    /// List home teams of a season, or the opponents of one home team.
    Teams {
        #[arg(long)]
        competition: u32,
        #[arg(long)]
        season: u32,
        #[arg(long)]
        home: Option<String>,
    },
    /// Resolve a fixture and print the match with its scoreline.
    Fixture(FixtureArgs),
    Formations(TeamArgs),
    StartingFormation(TeamArgs),
    FormationRoster {
        #[command(flatten)]
        team: TeamArgs,
        #[arg(long)]
        formation: String,
    },
    PassNetwork {
        #[command(flatten)]
        team: TeamArgs,
        #[arg(long)]
        formation: String,
    },
    CumulativeXg {
        #[command(flatten)]
        fixture: FixtureArgs,
        #[arg(long, value_enum, default_value_t)]
        basis: XgBasis,
    },
    Goals(FixtureArgs),
    /// Defensive actions of one player, or every defender without `--player`.
    DefensiveActions {
        #[command(flatten)]
        team: TeamArgs,
        #[arg(long)]
        player: Option<u32>,
    },
    ShotAssists(TeamArgs),
    PassMatrix(TeamArgs),
    GoalkeeperPasses(TeamArgs),
    PassMaps(TeamArgs),
    /// Serve the datasets over http.
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: String,
    },
}

impl Command {
    /// Fixture selection and dataset of a per-match subcommand.
    pub fn dataset(&self) -> Option<(&FixtureArgs, Dataset)> {
        let request = match self {
            Command::Fixture(fixture) => (fixture, Dataset::Fixture),
            Command::Formations(team) => (&team.fixture, Dataset::Formations(team.team)),
            Command::StartingFormation(team) => {
                (&team.fixture, Dataset::StartingFormation(team.team))
            }
            Command::FormationRoster { team, formation } => (
                &team.fixture,
                Dataset::FormationRoster(team.team, FormationCode::from(formation.as_str())),
            ),
            Command::PassNetwork { team, formation } => (
                &team.fixture,
                Dataset::PassNetwork(team.team, FormationCode::from(formation.as_str())),
            ),
            Command::CumulativeXg { fixture, basis } => (fixture, Dataset::CumulativeXg(*basis)),
            Command::Goals(fixture) => (fixture, Dataset::Goals),
            Command::DefensiveActions { team, player } => {
                let dataset = match player {
                    Some(player) => Dataset::DefensiveActions(team.team, PlayerId(*player)),
                    None => Dataset::Defenders(team.team),
                };
                (&team.fixture, dataset)
            }
            Command::ShotAssists(team) => (&team.fixture, Dataset::ShotAssists(team.team)),
            Command::PassMatrix(team) => (&team.fixture, Dataset::PassMatrix(team.team)),
            Command::GoalkeeperPasses(team) => {
                (&team.fixture, Dataset::GoalkeeperPasses(team.team))
            }
            Command::PassMaps(team) => (&team.fixture, Dataset::PassMaps(team.team)),
            Command::Competitions
            | Command::Matches { .. }
            | Command::Teams { .. }
            | Command::Serve { .. } => return None,
        };
        Some(request)
    }
}
