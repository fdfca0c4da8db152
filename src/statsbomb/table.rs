//! Flat records converted from the nested open-data json.
//!
//! One row per competition/season, match, event, tactics declaration and
//! roster entry. Identifiers are the provider's; names are kept for display.

use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::{
    raw, CompetitionId, EventId, FormationCode, MatchId, PlayerId, SeasonId, Side, Slot, TeamId,
};

#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("match {0} has an invalid date {1:?}: {2}")]
    InvalidDate(u64, String, chrono::ParseError),
    #[error("event {0} references unknown position id {1}")]
    InvalidPosition(String, u32),
    #[error("event {0} has a tactics block but no lineup")]
    EmptyTactics(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    fn from_coords(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y, ..] => Some(Self { x: *x, y: *y }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Competition {
    pub competition_id: CompetitionId,
    pub season_id: SeasonId,
    pub competition_name: String,
    pub season_name: String,
    pub country_name: String,
}

impl From<&raw::Competition> for Competition {
    fn from(value: &raw::Competition) -> Self {
        Self {
            competition_id: value.competition_id.into(),
            season_id: value.season_id.into(),
            competition_name: value.competition_name.clone(),
            season_name: value.season_name.clone(),
            country_name: value.country_name.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Match {
    pub match_id: MatchId,
    pub competition_id: CompetitionId,
    pub season_id: SeasonId,
    pub match_date: NaiveDate,
    pub home: Team,
    pub away: Team,
    pub home_score: Option<u8>,
    pub away_score: Option<u8>,
    pub match_week: Option<u16>,
    pub stage: Option<String>,
}

impl Match {
    pub fn team(&self, side: Side) -> &Team {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }
}

impl TryFrom<&raw::Match> for Match {
    type Error = ShapeError;

    fn try_from(value: &raw::Match) -> Result<Self, Self::Error> {
        let match_date = NaiveDate::parse_from_str(&value.match_date, "%Y-%m-%d").map_err(|err| {
            ShapeError::InvalidDate(value.match_id, value.match_date.clone(), err)
        })?;
        Ok(Self {
            match_id: value.match_id.into(),
            competition_id: value.competition.competition_id.into(),
            season_id: value.season.season_id.into(),
            match_date,
            home: Team {
                id: value.home_team.home_team_id.into(),
                name: value.home_team.home_team_name.clone(),
            },
            away: Team {
                id: value.away_team.away_team_id.into(),
                name: value.away_team.away_team_name.clone(),
            },
            home_score: value.home_score,
            away_score: value.away_score,
            match_week: value.match_week,
            stage: value.competition_stage.as_ref().map(|stage| stage.name.clone()),
        })
    }
}

/// Event type, named as the provider names it.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind {
    StartingXi,
    TacticalShift,
    HalfStart,
    HalfEnd,
    Pass,
    BallReceipt,
    Carry,
    Pressure,
    Shot,
    GoalKeeper,
    Substitution,
    Block,
    FoulCommitted,
    FoulWon,
    Clearance,
    Interception,
    BallRecovery,
    Duel,
    Dribble,
    OwnGoalAgainst,
    OwnGoalFor,
    Other(String),
}

impl EventKind {
    const NAMES: [(EventKind, &'static str); 21] = [
        (EventKind::StartingXi, "Starting XI"),
        (EventKind::TacticalShift, "Tactical Shift"),
        (EventKind::HalfStart, "Half Start"),
        (EventKind::HalfEnd, "Half End"),
        (EventKind::Pass, "Pass"),
        (EventKind::BallReceipt, "Ball Receipt"),
        (EventKind::Carry, "Carry"),
        (EventKind::Pressure, "Pressure"),
        (EventKind::Shot, "Shot"),
        (EventKind::GoalKeeper, "Goal Keeper"),
        (EventKind::Substitution, "Substitution"),
        (EventKind::Block, "Block"),
        (EventKind::FoulCommitted, "Foul Committed"),
        (EventKind::FoulWon, "Foul Won"),
        (EventKind::Clearance, "Clearance"),
        (EventKind::Interception, "Interception"),
        (EventKind::BallRecovery, "Ball Recovery"),
        (EventKind::Duel, "Duel"),
        (EventKind::Dribble, "Dribble"),
        (EventKind::OwnGoalAgainst, "Own Goal Against"),
        (EventKind::OwnGoalFor, "Own Goal For"),
    ];

    /// The feed marks some names with a trailing `*` ("Ball Receipt*").
    pub fn from_name(name: &str) -> Self {
        let name = name.trim_end_matches('*');
        Self::NAMES
            .iter()
            .find(|(_, known)| *known == name)
            .map_or_else(|| Self::Other(name.to_string()), |(kind, _)| kind.clone())
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Other(name) => name,
            kind => Self::NAMES
                .iter()
                .find(|(known, _)| known == kind)
                .map_or("", |&(_, name)| name),
        }
    }
}

impl Default for EventKind {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for EventKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Event {
    pub id: EventId,
    pub index: u32,
    pub period: u8,
    pub timestamp: String,
    pub minute: u16,
    pub second: u8,
    pub kind: EventKind,
    pub team: TeamId,
    pub team_name: String,
    pub possession_team: Option<TeamId>,
    pub player: Option<PlayerId>,
    pub player_name: Option<String>,
    pub position: Option<Slot>,
    pub play_pattern: Option<String>,
    pub location: Option<Point>,
    pub end_location: Option<Point>,
    pub outcome: Option<String>,
    pub sub_type: Option<String>,
    pub technique: Option<String>,
    pub pass_height: Option<String>,
    pub pass_recipient: Option<PlayerId>,
    pub pass_assisted_shot: Option<EventId>,
    pub shot_xg: Option<f64>,
    pub substitution_replacement: Option<PlayerId>,
    pub substitution_replacement_name: Option<String>,
    pub formation: Option<FormationCode>,
}

impl Event {
    pub const REGULAR_PLAY: &'static str = "Regular Play";

    /// A pass without an outcome reached its target.
    pub fn is_completed_pass(&self) -> bool {
        self.kind == EventKind::Pass && self.outcome.is_none()
    }

    pub fn is_regular_play(&self) -> bool {
        self.play_pattern.as_deref() == Some(Self::REGULAR_PLAY)
    }
}

// the feed spreads outcome/type/technique over one block per event type,
// the first block that has one wins
fn first_name<'a>(candidates: impl Iterator<Item = Option<&'a raw::Named>>) -> Option<String> {
    candidates.flatten().next().map(|named| named.name.clone())
}

impl TryFrom<&raw::Event> for Event {
    type Error = ShapeError;

    fn try_from(value: &raw::Event) -> Result<Self, Self::Error> {
        let position = value
            .position
            .as_ref()
            .map(|position| {
                u8::try_from(position.id)
                    .ok()
                    .and_then(Slot::from_position_id)
                    .ok_or_else(|| ShapeError::InvalidPosition(value.id.clone(), position.id))
            })
            .transpose()?;

        let details = [
            value.ball_receipt.as_ref(),
            value.interception.as_ref(),
            value.duel.as_ref(),
            value.dribble.as_ref(),
            value.goalkeeper.as_ref(),
            value.foul_committed.as_ref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>();

        let pass = value.pass.as_ref();
        let shot = value.shot.as_ref();
        let substitution = value.substitution.as_ref();

        let outcome = first_name(
            [
                pass.and_then(|p| p.outcome.as_ref()),
                shot.and_then(|s| s.outcome.as_ref()),
                substitution.and_then(|s| s.outcome.as_ref()),
            ]
            .into_iter()
            .chain(details.iter().map(|d| d.outcome.as_ref())),
        );
        let sub_type = first_name(
            [
                pass.and_then(|p| p.kind.as_ref()),
                shot.and_then(|s| s.kind.as_ref()),
            ]
            .into_iter()
            .chain(details.iter().map(|d| d.kind.as_ref())),
        );
        let technique = first_name(
            [
                pass.and_then(|p| p.technique.as_ref()),
                shot.and_then(|s| s.technique.as_ref()),
            ]
            .into_iter()
            .chain(details.iter().map(|d| d.technique.as_ref())),
        );
        let end_location = pass
            .and_then(|p| p.end_location.as_deref())
            .or_else(|| shot.and_then(|s| s.end_location.as_deref()))
            .and_then(Point::from_coords);

        Ok(Self {
            id: EventId(value.id.clone()),
            index: value.index,
            period: value.period,
            timestamp: value.timestamp.clone(),
            minute: value.minute,
            second: value.second,
            kind: EventKind::from_name(&value.kind.name),
            team: value.team.id.into(),
            team_name: value.team.name.clone(),
            possession_team: value.possession_team.as_ref().map(|team| team.id.into()),
            player: value.player.as_ref().map(|player| player.id.into()),
            player_name: value.player.as_ref().map(|player| player.name.clone()),
            position,
            play_pattern: value.play_pattern.as_ref().map(|pattern| pattern.name.clone()),
            location: value.location.as_deref().and_then(Point::from_coords),
            end_location,
            outcome,
            sub_type,
            technique,
            pass_height: pass
                .and_then(|p| p.height.as_ref())
                .map(|height| height.name.clone()),
            pass_recipient: pass
                .and_then(|p| p.recipient.as_ref())
                .map(|recipient| recipient.id.into()),
            pass_assisted_shot: pass
                .and_then(|p| p.assisted_shot_id.as_deref())
                .map(EventId::from),
            shot_xg: shot.and_then(|s| s.statsbomb_xg),
            substitution_replacement: substitution.map(|s| s.replacement.id.into()),
            substitution_replacement_name: substitution.map(|s| s.replacement.name.clone()),
            formation: value
                .tactics
                .as_ref()
                .map(|tactics| tactics.formation.into()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TacticsEntry {
    pub player: PlayerId,
    pub player_name: String,
    pub slot: Slot,
    pub jersey_number: u32,
}

/// Formation and XI declared at one tactics event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TacticsRecord {
    pub event_id: EventId,
    pub team: TeamId,
    pub formation: FormationCode,
    pub lineup: Vec<TacticsEntry>,
}

impl TacticsRecord {
    fn from_raw(event: &raw::Event, tactics: &raw::Tactics) -> Result<Self, ShapeError> {
        if tactics.lineup.is_empty() {
            return Err(ShapeError::EmptyTactics(event.id.clone()));
        }
        let lineup = tactics
            .lineup
            .iter()
            .map(|entry| {
                let slot = u8::try_from(entry.position.id)
                    .ok()
                    .and_then(Slot::from_position_id)
                    .ok_or_else(|| {
                        ShapeError::InvalidPosition(event.id.clone(), entry.position.id)
                    })?;
                Ok(TacticsEntry {
                    player: entry.player.id.into(),
                    player_name: entry.player.name.clone(),
                    slot,
                    jersey_number: entry.jersey_number,
                })
            })
            .collect::<Result<Vec<_>, ShapeError>>()?;
        Ok(Self {
            event_id: EventId(event.id.clone()),
            team: event.team.id.into(),
            formation: tactics.formation.into(),
            lineup,
        })
    }
}

/// Events and tactics records decoded from one events file.
#[derive(Debug, Clone, Default)]
pub struct EventTables {
    pub events: Vec<Event>,
    pub tactics: Vec<TacticsRecord>,
}

impl TryFrom<&[raw::Event]> for EventTables {
    type Error = ShapeError;

    fn try_from(value: &[raw::Event]) -> Result<Self, Self::Error> {
        let events = value
            .iter()
            .map(Event::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let tactics = value
            .iter()
            .filter_map(|event| event.tactics.as_ref().map(|tactics| (event, tactics)))
            .map(|(event, tactics)| TacticsRecord::from_raw(event, tactics))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { events, tactics })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LineupEntry {
    pub team: TeamId,
    pub team_name: String,
    pub player: PlayerId,
    pub player_name: String,
    pub nickname: Option<String>,
    pub jersey_number: Option<u32>,
}

impl LineupEntry {
    /// Nickname when the feed has one, full name otherwise.
    pub fn display_name(&self) -> &str {
        self.nickname.as_deref().unwrap_or(&self.player_name)
    }

    pub fn from_teams(teams: &[raw::TeamLineup]) -> Vec<Self> {
        teams
            .iter()
            .flat_map(|team| {
                team.lineup.iter().map(|player| Self {
                    team: team.team_id.into(),
                    team_name: team.team_name.clone(),
                    player: player.player_id.into(),
                    player_name: player.player_name.clone(),
                    nickname: player.player_nickname.clone(),
                    jersey_number: player.jersey_number,
                })
            })
            .collect()
    }
}
