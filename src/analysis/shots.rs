use std::collections::HashMap;

use serde::Serialize;

use crate::{
    accessor::MatchLog,
    statsbomb::{table::Point, Event, EventId, EventKind, PlayerId, TeamId},
};

pub const GOAL: &str = "Goal";

/// Shot or Own Goal Against whose outcome is a goal or unset.
pub fn is_scoring_chance(event: &Event) -> bool {
    matches!(event.kind, EventKind::Shot | EventKind::OwnGoalAgainst)
        && event.outcome.as_deref().map_or(true, |outcome| outcome == GOAL)
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalRow {
    pub period: u8,
    pub timestamp: String,
    pub minute: u16,
    pub team: TeamId,
    pub team_name: String,
    pub player: Option<PlayerId>,
    pub player_name: Option<String>,
    pub technique: Option<String>,
    pub xg: Option<f64>,
    pub own_goal: bool,
}

pub fn goals(log: &MatchLog) -> Vec<GoalRow> {
    log.events()
        .iter()
        .filter(|event| is_scoring_chance(event))
        .map(|event| GoalRow {
            period: event.period,
            timestamp: event.timestamp.clone(),
            minute: event.minute,
            team: event.team,
            team_name: event.team_name.clone(),
            player: event.player,
            player_name: event.player_name.clone(),
            technique: event.technique.clone(),
            xg: event.shot_xg,
            // own goals come without a shot block
            own_goal: event.shot_xg.is_none() && event.technique.is_none(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ShotAssist {
    pub pass: EventId,
    pub player: Option<PlayerId>,
    pub start: Option<Point>,
    pub end: Option<Point>,
    pub shot: EventId,
    pub outcome: Option<String>,
    pub xg: Option<f64>,
    pub is_goal: bool,
}

/// Passes of `team` that set up a shot, joined to the shot they assisted.
pub fn shot_assists(log: &MatchLog, team: TeamId) -> Vec<ShotAssist> {
    let shots = log
        .events()
        .iter()
        .filter(|event| event.kind == EventKind::Shot && event.team == team)
        .map(|event| (&event.id, event))
        .collect::<HashMap<_, _>>();

    log.events()
        .iter()
        .filter(|event| event.team == team)
        .filter_map(|event| event.pass_assisted_shot.as_ref().map(|shot| (event, shot)))
        .map(|(pass, shot_id)| {
            let shot = shots.get(shot_id);
            let outcome = shot.and_then(|shot| shot.outcome.clone());
            ShotAssist {
                pass: pass.id.clone(),
                player: pass.player,
                start: pass.location,
                end: pass.end_location,
                shot: shot_id.clone(),
                is_goal: outcome.as_deref() == Some(GOAL),
                outcome,
                xg: shot.and_then(|shot| shot.shot_xg),
            }
        })
        .collect()
}
