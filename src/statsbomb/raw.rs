// response definitions of the open-data json files
// only the fields we read are declared, everything else is ignored

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Named {
    pub id: u32,
    pub name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Competition {
    pub competition_id: u32,
    pub season_id: u32,
    pub competition_name: String,
    pub season_name: String,
    #[serde(default)]
    pub country_name: String,
    #[serde(default)]
    pub competition_gender: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MatchCompetition {
    pub competition_id: u32,
    #[serde(default)]
    pub competition_name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct MatchSeason {
    pub season_id: u32,
    #[serde(default)]
    pub season_name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct HomeTeam {
    pub home_team_id: u32,
    pub home_team_name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct AwayTeam {
    pub away_team_id: u32,
    pub away_team_name: String,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Match {
    pub match_id: u64,
    pub match_date: String,
    pub competition: MatchCompetition,
    pub season: MatchSeason,
    pub home_team: HomeTeam,
    pub away_team: AwayTeam,
    #[serde(default)]
    pub home_score: Option<u8>,
    #[serde(default)]
    pub away_score: Option<u8>,
    #[serde(default)]
    pub match_week: Option<u16>,
    #[serde(default)]
    pub competition_stage: Option<Named>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct TacticsPlayer {
    pub player: Named,
    pub position: Named,
    pub jersey_number: u32,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Tactics {
    pub formation: u32,
    #[serde(default)]
    pub lineup: Vec<TacticsPlayer>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Pass {
    #[serde(default)]
    pub recipient: Option<Named>,
    #[serde(default)]
    pub height: Option<Named>,
    #[serde(default)]
    pub end_location: Option<Vec<f64>>,
    #[serde(default)]
    pub outcome: Option<Named>,
    #[serde(default, rename = "type")]
    pub kind: Option<Named>,
    #[serde(default)]
    pub technique: Option<Named>,
    #[serde(default)]
    pub assisted_shot_id: Option<String>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Shot {
    #[serde(default)]
    pub statsbomb_xg: Option<f64>,
    #[serde(default)]
    pub end_location: Option<Vec<f64>>,
    #[serde(default)]
    pub outcome: Option<Named>,
    #[serde(default, rename = "type")]
    pub kind: Option<Named>,
    #[serde(default)]
    pub technique: Option<Named>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Substitution {
    #[serde(default)]
    pub outcome: Option<Named>,
    pub replacement: Named,
}

/// Shape shared by the smaller event detail blocks.
#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Detail {
    #[serde(default)]
    pub outcome: Option<Named>,
    #[serde(default, rename = "type")]
    pub kind: Option<Named>,
    #[serde(default)]
    pub technique: Option<Named>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct Event {
    pub id: String,
    pub index: u32,
    pub period: u8,
    pub timestamp: String,
    pub minute: u16,
    pub second: u8,
    #[serde(rename = "type")]
    pub kind: Named,
    pub team: Named,
    #[serde(default)]
    pub possession_team: Option<Named>,
    #[serde(default)]
    pub play_pattern: Option<Named>,
    #[serde(default)]
    pub player: Option<Named>,
    #[serde(default)]
    pub position: Option<Named>,
    #[serde(default)]
    pub location: Option<Vec<f64>>,
    #[serde(default)]
    pub tactics: Option<Tactics>,
    #[serde(default)]
    pub pass: Option<Pass>,
    #[serde(default)]
    pub shot: Option<Shot>,
    #[serde(default)]
    pub substitution: Option<Substitution>,
    #[serde(default)]
    pub ball_receipt: Option<Detail>,
    #[serde(default)]
    pub interception: Option<Detail>,
    #[serde(default)]
    pub duel: Option<Detail>,
    #[serde(default)]
    pub dribble: Option<Detail>,
    #[serde(default)]
    pub goalkeeper: Option<Detail>,
    #[serde(default)]
    pub foul_committed: Option<Detail>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct LineupPlayer {
    pub player_id: u32,
    pub player_name: String,
    #[serde(default)]
    pub player_nickname: Option<String>,
    #[serde(default)]
    pub jersey_number: Option<u32>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
pub struct TeamLineup {
    pub team_id: u32,
    pub team_name: String,
    pub lineup: Vec<LineupPlayer>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_event_sample() {
        let content = include_str!("../../tests/events-sample.json");
        let events = serde_json::from_str::<Vec<Event>>(content).expect("Failed to parse events");
        assert_eq!(events.len(), 6);

        let starting = &events[0];
        assert_eq!(starting.kind.name, "Starting XI");
        let tactics = starting.tactics.as_ref().expect("starting xi carries tactics");
        assert_eq!(tactics.formation, 4231);
        assert_eq!(tactics.lineup.len(), 2);

        let pass = events[2].pass.as_ref().expect("pass detail");
        assert_eq!(pass.recipient.as_ref().map(|r| r.id), Some(3244));
        assert_eq!(pass.end_location.as_deref(), Some(&[60.0, 30.5][..]));
    }

    #[test]
    fn decode_match_sample() {
        let content = r#"[{
            "match_id": 3754058,
            "match_date": "2016-02-13",
            "kick_off": "17:30:00.000",
            "competition": {"competition_id": 2, "country_name": "England", "competition_name": "Premier League"},
            "season": {"season_id": 27, "season_name": "2015/2016"},
            "home_team": {"home_team_id": 33, "home_team_name": "Chelsea", "home_team_gender": "male"},
            "away_team": {"away_team_id": 1, "away_team_name": "Arsenal", "away_team_gender": "male"},
            "home_score": 2,
            "away_score": 0,
            "match_status": "available",
            "match_week": 26,
            "competition_stage": {"id": 1, "name": "Regular Season"}
        }]"#;
        let matches = serde_json::from_str::<Vec<Match>>(content).expect("Failed to parse matches");
        assert_eq!(matches[0].home_team.home_team_name, "Chelsea");
        assert_eq!(matches[0].away_score, Some(0));
    }
}
