use std::collections::{BTreeMap, HashSet};

use serde::Serialize;

use crate::{
    accessor::MatchLog,
    statsbomb::{EventKind, FormationCode, PlayerId, Slot, TacticsRecord, TeamId},
    tactics::{self, Reconstruction},
};

use super::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormationEntry {
    pub slot: Slot,
    pub player: PlayerId,
    pub player_name: String,
    pub jersey_number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartingFormation {
    pub team: TeamId,
    pub formation: FormationCode,
    /// Ordered by slot number, goalkeeper first.
    pub entries: Vec<FormationEntry>,
}

/// Tactics record of the team's Starting XI.
pub fn starting_record(log: &MatchLog, team: TeamId) -> Result<&TacticsRecord, AnalysisError> {
    log.tactics()
        .iter()
        .filter(|record| record.team == team)
        .find(|record| {
            log.event(&record.event_id)
                .is_some_and(|event| event.kind == EventKind::StartingXi)
        })
        .ok_or(AnalysisError::NoStartingXi(team))
}

pub fn starting_formation(
    log: &MatchLog,
    team: TeamId,
) -> Result<StartingFormation, AnalysisError> {
    let record = starting_record(log, team)?;
    let mut entries = record
        .lineup
        .iter()
        .map(|entry| FormationEntry {
            slot: entry.slot,
            player: entry.player,
            player_name: entry.player_name.clone(),
            jersey_number: entry.jersey_number,
        })
        .collect::<Vec<_>>();
    entries.sort_by_key(|entry| entry.slot.position_id());

    Ok(StartingFormation {
        team,
        formation: record.formation.clone(),
        entries,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterEntry {
    pub jersey_number: u32,
    pub slot: Slot,
    pub player: PlayerId,
    pub player_name: String,
}

/// Players who appeared while `team` lined up in `formation`, one per jersey
/// number in ascending order. A player holding several slots under the
/// formation is listed with the earliest one.
pub fn formation_roster(
    log: &MatchLog,
    recon: &Reconstruction,
    team: TeamId,
    formation: &FormationCode,
) -> Result<Vec<RosterEntry>, AnalysisError> {
    if !tactics::formations(log, team).contains(formation) {
        return Err(AnalysisError::FormationNotUsed {
            team,
            formation: formation.clone(),
        });
    }

    let anchors = tactics::anchors(log, team, formation).collect::<Vec<_>>();
    let active = log
        .events()
        .iter()
        .filter(|event| event.team == team)
        .filter(|event| recon.stamp(event).is_some_and(|stamp| stamp.formation == *formation))
        .filter_map(|event| event.player)
        .collect::<HashSet<_>>();

    let mut assignments = recon
        .assignments(team)
        .filter(|(_, player, _)| active.contains(player))
        .filter_map(|(anchor, player, slot)| {
            let order = anchors.iter().position(|candidate| *candidate == anchor)?;
            Some((order, player, slot))
        })
        .collect::<Vec<_>>();
    assignments.sort_by_key(|&(order, _, slot)| (order, slot.position_id()));

    let mut roster = BTreeMap::new();
    for (_, player, slot) in assignments {
        let Some(jersey_number) = jersey_number(log, team, player) else {
            log::debug!("player {} of team {} has no jersey number", player, team);
            continue;
        };
        roster.entry(jersey_number).or_insert_with(|| RosterEntry {
            jersey_number,
            slot,
            player,
            player_name: display_name(log, team, player),
        });
    }
    Ok(roster.into_values().collect())
}

// nickname from the roster when there is one
fn display_name(log: &MatchLog, team: TeamId, player: PlayerId) -> String {
    log.lineup()
        .iter()
        .find(|entry| entry.team == team && entry.player == player)
        .map(|entry| entry.display_name())
        .or_else(|| log.player_name(player))
        .unwrap_or_default()
        .to_string()
}

fn jersey_number(log: &MatchLog, team: TeamId, player: PlayerId) -> Option<u32> {
    log.tactics()
        .iter()
        .filter(|record| record.team == team)
        .flat_map(|record| &record.lineup)
        .find(|entry| entry.player == player)
        .map(|entry| entry.jersey_number)
        .or_else(|| {
            log.lineup()
                .iter()
                .find(|entry| entry.team == team && entry.player == player)
                .and_then(|entry| entry.jersey_number)
        })
}
