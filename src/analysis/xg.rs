//! # Cumulative xG
//!
//! Match minutes are split into 15-minute buckets ending at 15, 30, ... 90.
//! A shot at minute `m` falls into the bucket `(b - 15, b]`; minute 0 joins
//! the first bucket and anything after 90 (stoppage or extra time) joins the
//! last, so the final value is the team's whole-match total.

use serde::{Deserialize, Serialize};

use crate::{
    accessor::MatchLog,
    statsbomb::{Event, EventKind, Match, Side, TeamId},
};

use super::shots::{is_scoring_chance, GOAL};

pub const BUCKET_MINUTES: u16 = 15;
pub const BOUNDARIES: [u16; 7] = [0, 15, 30, 45, 60, 75, 90];

/// Which shots contribute xG.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum XgBasis {
    /// Shots and own goals whose outcome is a goal or unset.
    #[default]
    ScoringChances,
    /// Every shot regardless of outcome.
    AllShots,
}

impl XgBasis {
    fn counts(self, event: &Event) -> bool {
        match self {
            XgBasis::ScoringChances => is_scoring_chance(event),
            XgBasis::AllShots => event.kind == EventKind::Shot,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct XgSeries {
    pub team: TeamId,
    pub team_name: String,
    /// Running total at each of `BOUNDARIES`.
    pub values: Vec<f64>,
    pub goal_minutes: Vec<u16>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CumulativeXg {
    pub basis: XgBasis,
    pub minutes: Vec<u16>,
    pub home: XgSeries,
    pub away: XgSeries,
}

/// Bucket (1-based, boundary index) a minute belongs to.
pub fn bucket_of(minute: u16) -> usize {
    let last = BOUNDARIES.len() - 1;
    let bucket = usize::from(minute.saturating_sub(1) / BUCKET_MINUTES) + 1;
    bucket.min(last)
}

fn series(log: &MatchLog, info: &Match, side: Side, basis: XgBasis) -> XgSeries {
    let team = info.team(side);
    let mut buckets = vec![0.0; BOUNDARIES.len()];
    log.events()
        .iter()
        .filter(|event| event.team == team.id && basis.counts(event))
        .for_each(|event| buckets[bucket_of(event.minute)] += event.shot_xg.unwrap_or(0.0));

    let values = buckets
        .iter()
        .scan(0.0, |total, xg| {
            *total += xg;
            Some(*total)
        })
        .collect();

    // scored by the team, or conceded by the opponent as an own goal
    let goal_minutes = log
        .events()
        .iter()
        .filter(|event| event.team == team.id)
        .filter(|event| {
            (event.kind == EventKind::Shot && event.outcome.as_deref() == Some(GOAL))
                || event.kind == EventKind::OwnGoalFor
        })
        .map(|event| event.minute)
        .collect();

    XgSeries {
        team: team.id,
        team_name: team.name.clone(),
        values,
        goal_minutes,
    }
}

pub fn cumulative_xg(log: &MatchLog, info: &Match, basis: XgBasis) -> CumulativeXg {
    CumulativeXg {
        basis,
        minutes: BOUNDARIES.to_vec(),
        home: series(log, info, Side::Home, basis),
        away: series(log, info, Side::Away, basis),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, AWAY, HOME};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample() -> (MatchLog, Match) {
        let mut own_goal = fixture::event(7, AWAY, EventKind::OwnGoalAgainst, 70);
        own_goal.player = Some(crate::statsbomb::PlayerId(5));
        let events = vec![
            fixture::shot(1, HOME, 9, 0, 0.05, None),
            fixture::shot(2, HOME, 9, 15, 0.30, Some(GOAL)),
            fixture::shot(3, HOME, 9, 16, 0.20, Some(GOAL)),
            fixture::shot(4, HOME, 10, 40, 0.50, Some("Saved")),
            fixture::shot(5, AWAY, 19, 44, 0.10, Some(GOAL)),
            // stoppage time
            fixture::shot(6, HOME, 9, 93, 0.25, Some(GOAL)),
            own_goal,
            fixture::event(8, HOME, EventKind::OwnGoalFor, 70),
        ];
        let log = MatchLog::new(events, vec![], vec![]).expect("valid log");
        (log, fixture::fixture(1, "2016-01-24", "Chelsea", "Arsenal"))
    }

    #[test]
    fn bucket_edges() {
        assert_eq!(bucket_of(0), 1);
        assert_eq!(bucket_of(1), 1);
        assert_eq!(bucket_of(15), 1);
        assert_eq!(bucket_of(16), 2);
        assert_eq!(bucket_of(90), 6);
        assert_eq!(bucket_of(94), 6);
        assert_eq!(bucket_of(120), 6);
    }

    #[test]
    fn scoring_chances_accumulate_per_bucket() {
        let (log, info) = sample();
        let xg = cumulative_xg(&log, &info, XgBasis::ScoringChances);
        assert_eq!(xg.minutes, BOUNDARIES.to_vec());

        let expected = [0.0, 0.35, 0.55, 0.55, 0.55, 0.55, 0.80];
        assert_eq!(xg.home.values.len(), expected.len());
        for (value, want) in xg.home.values.iter().zip(expected) {
            assert!(approx(*value, want), "{} != {}", value, want);
        }
        assert_eq!(xg.home.goal_minutes, vec![15, 16, 93, 70]);
        assert!(approx(xg.away.values[6], 0.10));
    }

    #[test]
    fn series_start_at_zero_never_decrease_and_end_at_total() {
        let (log, info) = sample();
        for basis in [XgBasis::ScoringChances, XgBasis::AllShots] {
            let xg = cumulative_xg(&log, &info, basis);
            for series in [&xg.home, &xg.away] {
                assert_eq!(series.values[0], 0.0);
                assert!(series.values.windows(2).all(|w| w[0] <= w[1]));
                let total: f64 = log
                    .events()
                    .iter()
                    .filter(|e| e.team == series.team && basis.counts(e))
                    .filter_map(|e| e.shot_xg)
                    .sum();
                assert!(approx(*series.values.last().expect("buckets"), total));
            }
        }
    }

    #[test]
    fn all_shots_basis_counts_saved_shots() {
        let (log, info) = sample();
        let xg = cumulative_xg(&log, &info, XgBasis::AllShots);
        assert!(approx(xg.home.values[6], 1.30));
        assert!(approx(xg.home.values[3], 1.05));
    }
}
