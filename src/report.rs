//! One entry point for every dataset, shared by the cli and the service.

use serde::Serialize;

use crate::{
    accessor::Fixture,
    analysis::{
        defensive::{self, Defender, DefensiveActions},
        lineup::{self, RosterEntry, StartingFormation},
        network::PassNetwork,
        passing::{self, GoalkeeperPasses, PassMatrix, PlayerPassMap},
        shots::{self, GoalRow, ShotAssist},
        xg::{self, CumulativeXg, XgBasis},
        AnalysisError,
    },
    resolver,
    statsbomb::{FormationCode, Match, PlayerId, Side},
    tactics::{self, Reconstruction},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Dataset {
    Fixture,
    Formations(Side),
    StartingFormation(Side),
    FormationRoster(Side, FormationCode),
    PassNetwork(Side, FormationCode),
    CumulativeXg(XgBasis),
    Goals,
    Defenders(Side),
    DefensiveActions(Side, PlayerId),
    ShotAssists(Side),
    PassMatrix(Side),
    GoalkeeperPasses(Side),
    PassMaps(Side),
}

#[derive(Debug, Clone, Serialize)]
pub struct FixtureSummary {
    #[serde(flatten)]
    pub info: Match,
    pub scoreline: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Report {
    Fixture(FixtureSummary),
    Formations(Vec<FormationCode>),
    StartingFormation(StartingFormation),
    FormationRoster(Vec<RosterEntry>),
    PassNetwork(PassNetwork),
    CumulativeXg(CumulativeXg),
    Goals(Vec<GoalRow>),
    Defenders(Vec<Defender>),
    DefensiveActions(DefensiveActions),
    ShotAssists(Vec<ShotAssist>),
    PassMatrix(PassMatrix),
    GoalkeeperPasses(GoalkeeperPasses),
    PassMaps(Vec<PlayerPassMap>),
}

impl Report {
    pub fn compute(fixture: &Fixture, dataset: &Dataset) -> Result<Self, AnalysisError> {
        let log = &fixture.log;
        let team = |side: &Side| fixture.info.team(*side).id;

        let report = match dataset {
            Dataset::Fixture => Report::Fixture(FixtureSummary {
                info: fixture.info.clone(),
                scoreline: resolver::scoreline(&fixture.info),
            }),
            Dataset::Formations(side) => Report::Formations(tactics::formations(log, team(side))),
            Dataset::StartingFormation(side) => {
                Report::StartingFormation(lineup::starting_formation(log, team(side))?)
            }
            Dataset::FormationRoster(side, formation) => {
                let recon = Reconstruction::build(log);
                Report::FormationRoster(lineup::formation_roster(
                    log,
                    &recon,
                    team(side),
                    formation,
                )?)
            }
            Dataset::PassNetwork(side, formation) => {
                let recon = Reconstruction::build(log);
                Report::PassNetwork(PassNetwork::build(log, &recon, team(side), formation)?)
            }
            Dataset::CumulativeXg(basis) => {
                Report::CumulativeXg(xg::cumulative_xg(log, &fixture.info, *basis))
            }
            Dataset::Goals => Report::Goals(shots::goals(log)),
            Dataset::Defenders(side) => Report::Defenders(defensive::defenders(log, team(side))),
            Dataset::DefensiveActions(side, player) => Report::DefensiveActions(
                defensive::defensive_actions(log, team(side), *player)?,
            ),
            Dataset::ShotAssists(side) => Report::ShotAssists(shots::shot_assists(log, team(side))),
            Dataset::PassMatrix(side) => Report::PassMatrix(passing::pass_matrix(log, team(side))),
            Dataset::GoalkeeperPasses(side) => {
                Report::GoalkeeperPasses(passing::goalkeeper_passes(log, team(side))?)
            }
            Dataset::PassMaps(side) => Report::PassMaps(passing::pass_maps(log, team(side))?),
        };
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        accessor::MatchLog,
        fixture::{self, AWAY, HOME},
        statsbomb::Slot,
    };

    fn sample() -> Fixture {
        let (home_xi, home_rec) = fixture::starting_xi(1, HOME, "4231", &[(1, 1), (2, 2)]);
        let (away_xi, away_rec) = fixture::starting_xi(2, AWAY, "433", &[(21, 1)]);
        let events = vec![
            home_xi,
            away_xi,
            fixture::pass(3, HOME, 1, Some(2), 5, (10.0, 40.0)),
            fixture::receipt(4, HOME, 2, 5, (30.0, 70.0)),
            fixture::shot(5, HOME, 2, 30, 0.4, Some(shots::GOAL)),
        ];
        let log = MatchLog::new(events, vec![home_rec, away_rec], vec![]).expect("valid log");
        let mut info = fixture::fixture(9, "2016-01-24", "Chelsea", "Arsenal");
        info.home_score = Some(1);
        info.away_score = Some(0);
        Fixture { info, log }
    }

    #[test]
    fn side_selects_the_team() {
        let fixture = sample();
        let home = Report::compute(&fixture, &Dataset::Formations(Side::Home)).expect("formations");
        let away = Report::compute(&fixture, &Dataset::Formations(Side::Away)).expect("formations");
        match (home, away) {
            (Report::Formations(home), Report::Formations(away)) => {
                assert_eq!(home, vec![FormationCode::from("4231")]);
                assert_eq!(away, vec![FormationCode::from("433")]);
            }
            other => panic!("unexpected reports {:?}", other),
        }
    }

    #[test]
    fn network_report_resolves_slots() {
        let fixture = sample();
        let dataset = Dataset::PassNetwork(Side::Home, FormationCode::from("4231"));
        let Report::PassNetwork(network) = Report::compute(&fixture, &dataset).expect("network")
        else {
            panic!("expected a pass network");
        };
        assert_eq!(network.edges.len(), 1);
        assert_eq!((network.edges[0].from, network.edges[0].to), (Slot::Gk, Slot::Rb));
    }

    #[test]
    fn fixture_summary_serializes_flat() {
        let fixture = sample();
        let report = Report::compute(&fixture, &Dataset::Fixture).expect("summary");
        let json = serde_json::to_value(&report).expect("serializable");
        assert_eq!(json["scoreline"], "Chelsea 1:0 Arsenal");
        assert_eq!(json["match_id"], 9);
        assert_eq!(json["home"]["name"], "Chelsea");
    }

    #[test]
    fn analysis_errors_pass_through() {
        let fixture = sample();
        let dataset = Dataset::GoalkeeperPasses(Side::Away);
        assert_eq!(
            Report::compute(&fixture, &dataset).unwrap_err(),
            AnalysisError::NoGoalkeeper(AWAY)
        );
    }
}
