use std::collections::HashMap;

use thiserror::Error;

use crate::{
    provider::{EventSource, SourceError},
    resolver::{self, FixtureQuery, ResolveError},
    statsbomb::{
        table::EventTables, Event, EventId, LineupEntry, Match, MatchId, PlayerId, TacticsRecord,
    },
};

#[derive(Error, Debug)]
pub enum AccessError {
    #[error("upstream data shape: {0}")]
    Shape(String),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
}

/// Everything recorded for one match, events ordered by `Event::index`.
#[derive(Debug, Clone)]
pub struct MatchLog {
    events: Vec<Event>,
    tactics: Vec<TacticsRecord>,
    lineup: Vec<LineupEntry>,
}

impl MatchLog {
    pub fn new(
        mut events: Vec<Event>,
        tactics: Vec<TacticsRecord>,
        lineup: Vec<LineupEntry>,
    ) -> Result<Self, AccessError> {
        events.sort_by_key(|event| event.index);
        if let Some(pair) = events.windows(2).find(|pair| pair[0].index == pair[1].index) {
            return Err(AccessError::Shape(format!(
                "events {} and {} share index {}",
                pair[0].id, pair[1].id, pair[0].index
            )));
        }

        let declared = events
            .iter()
            .filter_map(|event| event.formation.as_ref().map(|formation| (&event.id, formation)))
            .collect::<HashMap<_, _>>();
        for record in &tactics {
            match declared.get(&record.event_id) {
                Some(&formation) if *formation == record.formation => {}
                Some(formation) => {
                    return Err(AccessError::Shape(format!(
                        "tactics {} declares {} but its event says {}",
                        record.event_id, record.formation, formation
                    )))
                }
                None => {
                    return Err(AccessError::Shape(format!(
                        "tactics {} has no formation event",
                        record.event_id
                    )))
                }
            }
        }

        Ok(Self {
            events,
            tactics,
            lineup,
        })
    }

    pub async fn load<S: EventSource>(source: &S, match_id: MatchId) -> Result<Self, AccessError> {
        let EventTables { events, tactics } = source.events(match_id).await?;
        let lineup = source.lineups(match_id).await?;
        log::debug!(
            "match {}: {} events, {} tactics records, {} rostered players",
            match_id,
            events.len(),
            tactics.len(),
            lineup.len()
        );
        Self::new(events, tactics, lineup)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn tactics(&self) -> &[TacticsRecord] {
        &self.tactics
    }

    pub fn lineup(&self) -> &[LineupEntry] {
        &self.lineup
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| &event.id == id)
    }

    pub fn player_name(&self, player: PlayerId) -> Option<&str> {
        self.lineup
            .iter()
            .find(|entry| entry.player == player)
            .map(|entry| entry.player_name.as_str())
            .or_else(|| {
                self.events
                    .iter()
                    .find(|event| event.player == Some(player))
                    .and_then(|event| event.player_name.as_deref())
            })
    }
}

/// A resolved fixture and its log.
#[derive(Debug, Clone)]
pub struct Fixture {
    pub info: Match,
    pub log: MatchLog,
}

impl Fixture {
    pub async fn open<S: EventSource>(
        source: &S,
        query: &FixtureQuery,
    ) -> Result<Self, AccessError> {
        let info = resolver::resolve(source, query).await?;
        let log = MatchLog::load(source, info.match_id).await?;
        Ok(Self { info, log })
    }
}
