//! The four read-only queries the analysis consumes from an event-data
//! provider.

use std::future::Future;

use thiserror::Error;

use crate::{
    client::RequestError,
    statsbomb::{
        table::{EventTables, ShapeError},
        CompetitionId, Competition, LineupEntry, Match, MatchId, SeasonId,
    },
};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error("upstream data shape: {0}")]
    Shape(#[from] ShapeError),
}

pub trait EventSource: Sync {
    fn competitions(&self) -> impl Future<Output = Result<Vec<Competition>, SourceError>> + Send;

    fn matches(
        &self,
        competition: CompetitionId,
        season: SeasonId,
    ) -> impl Future<Output = Result<Vec<Match>, SourceError>> + Send;

    /// Events of one match together with the tactics records they declare.
    fn events(
        &self,
        match_id: MatchId,
    ) -> impl Future<Output = Result<EventTables, SourceError>> + Send;

    fn lineups(
        &self,
        match_id: MatchId,
    ) -> impl Future<Output = Result<Vec<LineupEntry>, SourceError>> + Send;
}

#[cfg(test)]
pub mod memory {
    use std::collections::HashMap;

    use super::*;

    fn not_found(path: String) -> SourceError {
        RequestError::NotFound(path).into()
    }

    /// In-memory provider for tests.
    #[derive(Default)]
    pub struct MemorySource {
        pub competitions: Vec<Competition>,
        pub matches: HashMap<(CompetitionId, SeasonId), Vec<Match>>,
        pub events: HashMap<MatchId, EventTables>,
        pub lineups: HashMap<MatchId, Vec<LineupEntry>>,
    }

    impl EventSource for MemorySource {
        async fn competitions(&self) -> Result<Vec<Competition>, SourceError> {
            Ok(self.competitions.clone())
        }

        async fn matches(
            &self,
            competition: CompetitionId,
            season: SeasonId,
        ) -> Result<Vec<Match>, SourceError> {
            self.matches
                .get(&(competition, season))
                .cloned()
                .ok_or_else(|| not_found(format!("matches/{}/{}.json", competition, season)))
        }

        async fn events(&self, match_id: MatchId) -> Result<EventTables, SourceError> {
            self.events
                .get(&match_id)
                .cloned()
                .ok_or_else(|| not_found(format!("events/{}.json", match_id)))
        }

        async fn lineups(&self, match_id: MatchId) -> Result<Vec<LineupEntry>, SourceError> {
            Ok(self.lineups.get(&match_id).cloned().unwrap_or_default())
        }
    }
}
