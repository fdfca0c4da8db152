use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    provider::{EventSource, SourceError},
    statsbomb::{CompetitionId, Match, MatchId, SeasonId},
};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no fixture {home} v {away} in competition {competition} season {season}")]
    NoSuchFixture {
        competition: CompetitionId,
        season: SeasonId,
        home: String,
        away: String,
    },
    #[error(
        "{home} v {away} was played more than once, pick a leg by date: {}",
        list_legs(.candidates)
    )]
    AmbiguousFixture {
        home: String,
        away: String,
        candidates: Vec<Leg>,
    },
    #[error(transparent)]
    Source(#[from] SourceError),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Leg {
    pub match_id: MatchId,
    pub match_date: NaiveDate,
}

fn list_legs(legs: &[Leg]) -> String {
    legs.iter()
        .map(|leg| format!("{} ({})", leg.match_date, leg.match_id))
        .join(", ")
}

/// A user's fixture selection. `leg` is required only when the pairing was
/// played more than once in the season.
#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct FixtureQuery {
    pub competition: CompetitionId,
    pub season: SeasonId,
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub leg: Option<NaiveDate>,
}

pub fn select<'m>(matches: &'m [Match], query: &FixtureQuery) -> Result<&'m Match, ResolveError> {
    let candidates = matches
        .iter()
        .filter(|mat| mat.home.name == query.home)
        .filter(|mat| mat.away.name == query.away)
        .collect::<Vec<_>>();

    let not_found = || ResolveError::NoSuchFixture {
        competition: query.competition,
        season: query.season,
        home: query.home.clone(),
        away: query.away.clone(),
    };

    match (candidates.as_slice(), query.leg) {
        ([], _) => Err(not_found()),
        ([only], None) => Ok(*only),
        (_, Some(date)) => candidates
            .iter()
            .find(|mat| mat.match_date == date)
            .copied()
            .ok_or_else(not_found),
        (_, None) => Err(ResolveError::AmbiguousFixture {
            home: query.home.clone(),
            away: query.away.clone(),
            candidates: candidates
                .iter()
                .map(|mat| Leg {
                    match_id: mat.match_id,
                    match_date: mat.match_date,
                })
                .collect(),
        }),
    }
}

pub async fn resolve<S: EventSource>(
    source: &S,
    query: &FixtureQuery,
) -> Result<Match, ResolveError> {
    let matches = source.matches(query.competition, query.season).await?;
    let mat = select(&matches, query)?;
    log::info!(
        "resolved {} v {} to match {} ({})",
        mat.home.name,
        mat.away.name,
        mat.match_id,
        mat.match_date
    );
    Ok(mat.clone())
}

/// Home team names in first-seen order.
pub fn home_teams(matches: &[Match]) -> Vec<&str> {
    matches
        .iter()
        .map(|mat| mat.home.name.as_str())
        .unique()
        .collect()
}

/// Teams that visited `home`, in first-seen order.
pub fn away_teams<'m>(matches: &'m [Match], home: &str) -> Vec<&'m str> {
    matches
        .iter()
        .filter(|mat| mat.home.name == home)
        .map(|mat| mat.away.name.as_str())
        .unique()
        .collect()
}

pub fn scoreline(mat: &Match) -> String {
    let score = |score: Option<u8>| score.map_or_else(|| "-".to_string(), |s| s.to_string());
    format!(
        "{} {}:{} {}",
        mat.home.name,
        score(mat.home_score),
        score(mat.away_score),
        mat.away.name
    )
}
