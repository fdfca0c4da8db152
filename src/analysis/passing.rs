use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;

use crate::{
    accessor::MatchLog,
    statsbomb::{table::Point, Event, EventKind, PlayerId, Slot, TeamId},
};

use super::{lineup, AnalysisError};

const THROW_IN: &str = "Throw-in";

fn regular_passes(log: &MatchLog, team: TeamId) -> impl Iterator<Item = &Event> {
    log.events()
        .iter()
        .filter(move |event| event.team == team && event.kind == EventKind::Pass)
        .filter(|event| event.is_regular_play())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixPlayer {
    pub player: PlayerId,
    pub player_name: String,
}

/// Regular-play pass counts between teammates, rows are passers and columns
/// recipients.
#[derive(Debug, Clone, Serialize)]
pub struct PassMatrix {
    pub team: TeamId,
    pub passers: Vec<MatrixPlayer>,
    pub recipients: Vec<MatrixPlayer>,
    pub counts: Vec<Vec<usize>>,
    pub passer_totals: Vec<usize>,
    pub recipient_totals: Vec<usize>,
    pub total: usize,
}

fn by_name(log: &MatchLog, players: impl Iterator<Item = PlayerId>) -> Vec<MatrixPlayer> {
    players
        .unique()
        .map(|player| MatrixPlayer {
            player,
            player_name: log.player_name(player).unwrap_or_default().to_string(),
        })
        .sorted_by(|a, b| a.player_name.cmp(&b.player_name).then(a.player.cmp(&b.player)))
        .collect()
}

pub fn pass_matrix(log: &MatchLog, team: TeamId) -> PassMatrix {
    let pairs = regular_passes(log, team)
        .filter_map(|event| event.player.zip(event.pass_recipient))
        .filter(|(passer, recipient)| passer != recipient)
        .collect::<Vec<_>>();
    let counts = pairs.iter().copied().counts();

    let passers = by_name(log, pairs.iter().map(|(passer, _)| *passer));
    let recipients = by_name(log, pairs.iter().map(|(_, recipient)| *recipient));
    let grid = passers
        .iter()
        .map(|passer| {
            recipients
                .iter()
                .map(|recipient| {
                    counts
                        .get(&(passer.player, recipient.player))
                        .copied()
                        .unwrap_or_default()
                })
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let passer_totals = grid.iter().map(|row| row.iter().sum()).collect();
    let recipient_totals = (0..recipients.len())
        .map(|column| grid.iter().map(|row| row[column]).sum())
        .collect();

    PassMatrix {
        team,
        passers,
        recipients,
        counts: grid,
        passer_totals,
        recipient_totals,
        total: pairs.len(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PassLine {
    pub start: Point,
    pub end: Point,
    pub height: Option<String>,
    pub completed: bool,
}

impl PassLine {
    fn from_event(event: &Event) -> Option<Self> {
        Some(Self {
            start: event.location?,
            end: event.end_location?,
            height: event.pass_height.clone(),
            completed: event.is_completed_pass(),
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GoalkeeperPasses {
    pub team: TeamId,
    /// The keeper of the first such pass.
    pub player: Option<PlayerId>,
    pub player_name: String,
    pub passes: Vec<PassLine>,
    /// Pass count per height, ordered by height name.
    pub heights: Vec<(String, usize)>,
}

pub fn goalkeeper_passes(log: &MatchLog, team: TeamId) -> Result<GoalkeeperPasses, AnalysisError> {
    let keeper_passes = regular_passes(log, team)
        .filter(|event| event.position == Some(Slot::Gk))
        .filter_map(|event| Some((event, PassLine::from_event(event)?)))
        .collect::<Vec<_>>();
    let Some(&(first, _)) = keeper_passes.first() else {
        return Err(AnalysisError::NoGoalkeeper(team));
    };
    let player = first.player;
    let player_name = player
        .and_then(|player| log.player_name(player))
        .unwrap_or_default()
        .to_string();
    let passes = keeper_passes
        .into_iter()
        .map(|(_, line)| line)
        .collect::<Vec<_>>();

    let heights = passes
        .iter()
        .filter_map(|line| line.height.clone())
        .counts()
        .into_iter()
        .sorted()
        .collect();

    Ok(GoalkeeperPasses {
        team,
        player,
        player_name,
        passes,
        heights,
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerPassMap {
    pub player: PlayerId,
    pub player_name: String,
    pub slot: Option<Slot>,
    pub starter: bool,
    pub minute_on: Option<u16>,
    pub minute_off: Option<u16>,
    pub completed: Vec<PassLine>,
    pub incomplete: Vec<PassLine>,
    /// Share of completed passes in percent, absent without passes.
    pub completion: Option<f64>,
    pub receipts: Vec<Point>,
}

/// Pass maps for every player who featured for `team`: starters in slot
/// order, then substitutes in the order they came on. Throw-ins are left out.
pub fn pass_maps(log: &MatchLog, team: TeamId) -> Result<Vec<PlayerPassMap>, AnalysisError> {
    let starters = lineup::starting_record(log, team)?;

    let mut substitutions = log
        .events()
        .iter()
        .filter(|event| event.team == team && event.kind == EventKind::Substitution)
        .collect::<Vec<_>>();
    substitutions.sort_by_key(|sub| sub.minute);
    let minute_off = substitutions
        .iter()
        .filter_map(|sub| sub.player.map(|player| (player, sub.minute)))
        .collect::<HashMap<_, _>>();

    let mut featured = starters
        .lineup
        .iter()
        .map(|entry| (entry.player, entry.player_name.clone(), Some(entry.slot), None::<u16>))
        .collect::<Vec<_>>();
    featured.sort_by_key(|(_, _, slot, _)| slot.map(Slot::position_id));
    for sub in &substitutions {
        let Some(player) = sub.substitution_replacement else {
            continue;
        };
        let name = sub.substitution_replacement_name.clone().unwrap_or_default();
        featured.push((player, name, None, Some(sub.minute)));
    }

    let maps = featured
        .into_iter()
        .unique_by(|(player, ..)| *player)
        .map(|(player, player_name, declared, minute_on)| {
            let events = log
                .events()
                .iter()
                .filter(|event| event.team == team && event.player == Some(player))
                .collect::<Vec<_>>();
            let slot = events
                .iter()
                .find_map(|event| event.position)
                .or(declared);

            let (completed, incomplete): (Vec<_>, Vec<_>) = events
                .iter()
                .filter(|event| event.kind == EventKind::Pass)
                .filter(|event| event.sub_type.as_deref() != Some(THROW_IN))
                .filter_map(|event| PassLine::from_event(event))
                .partition(|line| line.completed);
            let attempted = completed.len() + incomplete.len();
            let completion =
                (attempted > 0).then(|| completed.len() as f64 * 100.0 / attempted as f64);

            let receipts = events
                .iter()
                .filter(|event| event.kind == EventKind::BallReceipt)
                .filter_map(|event| event.location)
                .collect();

            PlayerPassMap {
                player,
                player_name,
                slot,
                starter: minute_on.is_none(),
                minute_on,
                minute_off: minute_off.get(&player).copied(),
                completed,
                incomplete,
                completion,
                receipts,
            }
        })
        .collect();
    Ok(maps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, AWAY, HOME};

    impl PassMatrix {
        fn get(&self, passer: PlayerId, recipient: PlayerId) -> usize {
            let row = self.passers.iter().position(|p| p.player == passer);
            let column = self.recipients.iter().position(|p| p.player == recipient);
            match (row, column) {
                (Some(row), Some(column)) => self.counts[row][column],
                _ => 0,
            }
        }
    }

    fn matrix_log() -> MatchLog {
        let mut corner = fixture::pass(4, HOME, 3, Some(2), 20, (120.0, 0.0));
        corner.play_pattern = Some("From Corner".to_string());
        let events = vec![
            fixture::pass(1, HOME, 2, Some(3), 10, (30.0, 30.0)),
            fixture::pass(2, HOME, 2, Some(3), 11, (30.0, 30.0)),
            fixture::pass(3, HOME, 3, Some(2), 12, (40.0, 30.0)),
            corner,
            fixture::pass(5, HOME, 2, Some(2), 21, (30.0, 30.0)),
            fixture::pass(6, HOME, 2, None, 22, (30.0, 30.0)),
            fixture::pass(7, AWAY, 18, Some(19), 23, (30.0, 30.0)),
            fixture::pass(8, HOME, 4, Some(3), 24, (30.0, 30.0)),
        ];
        MatchLog::new(events, vec![], vec![]).expect("valid log")
    }

    #[test]
    fn matrix_counts_regular_play_between_teammates() {
        let log = matrix_log();
        let matrix = pass_matrix(&log, HOME);
        assert_eq!(matrix.get(PlayerId(2), PlayerId(3)), 2);
        assert_eq!(matrix.get(PlayerId(3), PlayerId(2)), 1);
        assert_eq!(matrix.get(PlayerId(2), PlayerId(2)), 0);
        assert_eq!(matrix.total, 4);

        let names = matrix
            .passers
            .iter()
            .map(|p| p.player_name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Player 2", "Player 3", "Player 4"]);
        assert_eq!(matrix.passer_totals, vec![2, 1, 1]);
        assert_eq!(matrix.recipient_totals.iter().sum::<usize>(), matrix.total);
    }

    fn keeper_pass(index: u32, height: &str, recipient: Option<u32>) -> Event {
        let mut pass = fixture::pass(index, HOME, 1, recipient, 10, (5.0, 40.0));
        pass.position = Some(Slot::Gk);
        pass.pass_height = Some(height.to_string());
        pass
    }

    #[test]
    fn goalkeeper_passes_by_height() {
        let mut goal_kick = keeper_pass(4, "High Pass", Some(9));
        goal_kick.play_pattern = Some("From Goal Kick".to_string());
        let events = vec![
            keeper_pass(1, "Ground Pass", Some(2)),
            keeper_pass(2, "High Pass", None),
            keeper_pass(3, "Ground Pass", Some(3)),
            goal_kick,
            fixture::pass(5, HOME, 2, Some(3), 11, (30.0, 30.0)),
        ];
        let log = MatchLog::new(events, vec![], vec![]).expect("valid log");
        let keeper = goalkeeper_passes(&log, HOME).expect("keeper passed");
        assert_eq!(keeper.player, Some(PlayerId(1)));
        assert_eq!(keeper.player_name, "Player 1");
        assert_eq!(keeper.passes.len(), 3);
        assert_eq!(
            keeper.heights,
            vec![("Ground Pass".to_string(), 2), ("High Pass".to_string(), 1)]
        );
        assert!(!keeper.passes[1].completed);

        assert_eq!(
            goalkeeper_passes(&log, AWAY).unwrap_err(),
            AnalysisError::NoGoalkeeper(AWAY)
        );
    }

    #[test]
    fn pass_maps_order_starters_then_substitutes() {
        let (xi, rec) = fixture::starting_xi(1, HOME, "4231", &[(9, 23), (1, 1), (2, 2)]);
        let mut throw_in = fixture::pass(4, HOME, 2, None, 20, (60.0, 80.0));
        throw_in.sub_type = Some(THROW_IN.to_string());
        let events = vec![
            xi,
            fixture::pass(2, HOME, 2, Some(9), 10, (40.0, 70.0)),
            fixture::pass(3, HOME, 2, None, 15, (45.0, 70.0)),
            throw_in,
            fixture::receipt(5, HOME, 9, 10, (50.0, 70.0)),
            fixture::substitution(6, HOME, 2, 14, 70),
            fixture::substitution(7, HOME, 9, 19, 65),
            fixture::pass(8, HOME, 14, Some(1), 75, (30.0, 70.0)),
        ];
        let log = MatchLog::new(events, vec![rec], vec![]).expect("valid log");
        let maps = pass_maps(&log, HOME).expect("home started");

        let order = maps.iter().map(|map| map.player.0).collect::<Vec<_>>();
        assert_eq!(order, vec![1, 2, 9, 19, 14]);

        let right_back = &maps[1];
        assert!(right_back.starter);
        assert_eq!(right_back.slot, Some(Slot::Rb));
        assert_eq!(right_back.minute_off, Some(70));
        assert_eq!(right_back.completed.len(), 1);
        assert_eq!(right_back.incomplete.len(), 1);
        assert_eq!(right_back.completion, Some(50.0));

        assert_eq!(maps[2].receipts.len(), 1);
        assert_eq!(maps[0].completion, None);

        assert_eq!(maps[3].minute_on, Some(65));
        let sub = &maps[4];
        assert!(!sub.starter);
        assert_eq!(sub.minute_on, Some(70));
        assert_eq!(sub.completion, Some(100.0));
    }
}
