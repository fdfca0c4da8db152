use itertools::Itertools;
use serde::Serialize;

use crate::{
    accessor::MatchLog,
    statsbomb::{table::Point, Event, EventKind, PlayerId, TeamId},
};

use super::AnalysisError;

pub const DEFENSIVE_KINDS: [EventKind; 4] = [
    EventKind::Block,
    EventKind::FoulCommitted,
    EventKind::Clearance,
    EventKind::Interception,
];

fn is_defensive(event: &Event) -> bool {
    DEFENSIVE_KINDS.contains(&event.kind)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Defender {
    pub player: PlayerId,
    pub player_name: String,
    pub actions: usize,
}

/// Players of `team` with at least one defensive action, in order of their
/// first one.
pub fn defenders(log: &MatchLog, team: TeamId) -> Vec<Defender> {
    let actions = log
        .events()
        .iter()
        .filter(|event| event.team == team && is_defensive(event))
        .filter_map(|event| event.player.map(|player| (player, event)))
        .collect::<Vec<_>>();
    let counts = actions.iter().map(|(player, _)| *player).counts();

    actions
        .iter()
        .unique_by(|(player, _)| *player)
        .map(|(player, event)| Defender {
            player: *player,
            player_name: event.player_name.clone().unwrap_or_default(),
            actions: counts.get(player).copied().unwrap_or_default(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ActionGroup {
    pub kind: EventKind,
    pub locations: Vec<Point>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DefensiveActions {
    pub team: TeamId,
    pub player: PlayerId,
    pub player_name: String,
    /// One group per action type, ordered by type name.
    pub groups: Vec<ActionGroup>,
}

pub fn defensive_actions(
    log: &MatchLog,
    team: TeamId,
    player: PlayerId,
) -> Result<DefensiveActions, AnalysisError> {
    let actions = log
        .events()
        .iter()
        .filter(|event| event.team == team && event.player == Some(player))
        .filter(|event| is_defensive(event))
        .collect::<Vec<_>>();
    let Some(first) = actions.first() else {
        return Err(AnalysisError::UnknownPlayer { team, player });
    };
    let player_name = first.player_name.clone().unwrap_or_default();

    let groups = actions
        .iter()
        .filter_map(|event| event.location.map(|location| (event.kind.clone(), location)))
        .into_group_map()
        .into_iter()
        .map(|(kind, locations)| ActionGroup { kind, locations })
        .sorted_by(|a, b| a.kind.name().cmp(b.kind.name()))
        .collect();

    Ok(DefensiveActions {
        team,
        player,
        player_name,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, AWAY, HOME};

    fn action(index: u32, team: TeamId, kind: EventKind, player: u32, at: (f64, f64)) -> Event {
        let mut event = fixture::with_player(fixture::event(index, team, kind, 30), player);
        event.location = Some(Point { x: at.0, y: at.1 });
        event
    }

    fn sample() -> MatchLog {
        let events = vec![
            action(1, HOME, EventKind::Interception, 4, (30.0, 40.0)),
            action(2, HOME, EventKind::Clearance, 3, (10.0, 35.0)),
            action(3, HOME, EventKind::Clearance, 4, (12.0, 44.0)),
            action(4, HOME, EventKind::Pressure, 4, (50.0, 40.0)),
            action(5, AWAY, EventKind::Block, 18, (15.0, 40.0)),
            action(6, HOME, EventKind::Interception, 4, (35.0, 20.0)),
            action(7, HOME, EventKind::FoulCommitted, 4, (60.0, 10.0)),
        ];
        MatchLog::new(events, vec![], vec![]).expect("valid log")
    }

    #[test]
    fn defenders_in_first_action_order() {
        let log = sample();
        let players = defenders(&log, HOME);
        let ids = players.iter().map(|d| (d.player, d.actions)).collect::<Vec<_>>();
        assert_eq!(ids, vec![(PlayerId(4), 4), (PlayerId(3), 1)]);
        assert_eq!(defenders(&log, AWAY).len(), 1);
    }

    #[test]
    fn actions_grouped_by_type() {
        let log = sample();
        let actions = defensive_actions(&log, HOME, PlayerId(4)).expect("player has actions");
        let kinds = actions
            .groups
            .iter()
            .map(|group| (group.kind.name().to_string(), group.locations.len()))
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![
                ("Clearance".to_string(), 1),
                ("Foul Committed".to_string(), 1),
                ("Interception".to_string(), 2),
            ]
        );
        assert_eq!(actions.player_name, "Player 4");
    }

    #[test]
    fn player_without_actions_is_an_error() {
        let log = sample();
        assert_eq!(
            defensive_actions(&log, HOME, PlayerId(18)).unwrap_err(),
            AnalysisError::UnknownPlayer {
                team: HOME,
                player: PlayerId(18)
            }
        );
    }
}
