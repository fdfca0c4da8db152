// builders shared by the unit tests

use chrono::NaiveDate;

use crate::statsbomb::{
    table::{Point, TacticsEntry, Team},
    CompetitionId, Event, EventId, EventKind, FormationCode, LineupEntry, Match, MatchId,
    PlayerId, SeasonId, Slot, TacticsRecord, TeamId,
};

pub const HOME: TeamId = TeamId(33);
pub const AWAY: TeamId = TeamId(1);

fn team_id(name: &str) -> TeamId {
    match name {
        "Chelsea" => HOME,
        "Arsenal" => AWAY,
        "Manchester United" => TeamId(39),
        _ => TeamId(100),
    }
}

fn team_name(team: TeamId) -> String {
    match team {
        HOME => "Chelsea".to_string(),
        AWAY => "Arsenal".to_string(),
        other => format!("Team {}", other),
    }
}

pub fn fixture(match_id: u64, date: &str, home: &str, away: &str) -> Match {
    Match {
        match_id: MatchId(match_id),
        competition_id: CompetitionId(2),
        season_id: SeasonId(27),
        match_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").expect("valid test date"),
        home: Team {
            id: team_id(home),
            name: home.to_string(),
        },
        away: Team {
            id: team_id(away),
            name: away.to_string(),
        },
        home_score: None,
        away_score: None,
        match_week: None,
        stage: None,
    }
}

pub fn event_id(index: u32) -> EventId {
    EventId(format!("ev-{}", index))
}

pub fn event(index: u32, team: TeamId, kind: EventKind, minute: u16) -> Event {
    Event {
        id: event_id(index),
        index,
        period: if minute < 45 { 1 } else { 2 },
        timestamp: format!("00:{:02}:00.000", minute % 45),
        minute,
        kind,
        team,
        team_name: team_name(team),
        play_pattern: Some(Event::REGULAR_PLAY.to_string()),
        ..Default::default()
    }
}

pub fn with_player(mut event: Event, player: u32) -> Event {
    event.player = Some(PlayerId(player));
    event.player_name = Some(format!("Player {}", player));
    event
}

fn declaration(
    index: u32,
    team: TeamId,
    kind: EventKind,
    minute: u16,
    formation: &str,
    lineup: &[(u32, u8)],
) -> (Event, TacticsRecord) {
    let mut declared = event(index, team, kind, minute);
    declared.formation = Some(FormationCode::from(formation));
    let record = TacticsRecord {
        event_id: declared.id.clone(),
        team,
        formation: FormationCode::from(formation),
        lineup: lineup
            .iter()
            .map(|&(player, position)| TacticsEntry {
                player: PlayerId(player),
                player_name: format!("Player {}", player),
                slot: Slot::from_position_id(position).expect("valid test position"),
                jersey_number: player % 100,
            })
            .collect(),
    };
    (declared, record)
}

pub fn starting_xi(
    index: u32,
    team: TeamId,
    formation: &str,
    lineup: &[(u32, u8)],
) -> (Event, TacticsRecord) {
    declaration(index, team, EventKind::StartingXi, 0, formation, lineup)
}

pub fn tactical_shift(
    index: u32,
    team: TeamId,
    minute: u16,
    formation: &str,
    lineup: &[(u32, u8)],
) -> (Event, TacticsRecord) {
    declaration(index, team, EventKind::TacticalShift, minute, formation, lineup)
}

pub fn pass(
    index: u32,
    team: TeamId,
    player: u32,
    recipient: Option<u32>,
    minute: u16,
    at: (f64, f64),
) -> Event {
    let mut pass = with_player(event(index, team, EventKind::Pass, minute), player);
    pass.location = Some(Point { x: at.0, y: at.1 });
    pass.end_location = Some(Point {
        x: at.0 + 10.0,
        y: at.1,
    });
    pass.pass_recipient = recipient.map(PlayerId);
    if recipient.is_none() {
        pass.outcome = Some("Incomplete".to_string());
    }
    pass
}

pub fn receipt(index: u32, team: TeamId, player: u32, minute: u16, at: (f64, f64)) -> Event {
    let mut receipt = with_player(event(index, team, EventKind::BallReceipt, minute), player);
    receipt.location = Some(Point { x: at.0, y: at.1 });
    receipt
}

pub fn shot(
    index: u32,
    team: TeamId,
    player: u32,
    minute: u16,
    xg: f64,
    outcome: Option<&str>,
) -> Event {
    let mut shot = with_player(event(index, team, EventKind::Shot, minute), player);
    shot.location = Some(Point { x: 105.0, y: 40.0 });
    shot.shot_xg = Some(xg);
    shot.outcome = outcome.map(str::to_string);
    shot.technique = Some("Normal".to_string());
    shot
}

pub fn substitution(index: u32, team: TeamId, off: u32, on: u32, minute: u16) -> Event {
    let mut sub = with_player(event(index, team, EventKind::Substitution, minute), off);
    sub.substitution_replacement = Some(PlayerId(on));
    sub.substitution_replacement_name = Some(format!("Player {}", on));
    sub
}

pub fn lineup_entry(team: TeamId, player: u32) -> LineupEntry {
    LineupEntry {
        team,
        team_name: team_name(team),
        player: PlayerId(player),
        player_name: format!("Player {}", player),
        nickname: None,
        jersey_number: Some(player % 100),
    }
}

/// Serves `app` on an ephemeral local port and returns its `/data` base url.
pub async fn serve_upstream(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("local port");
    let addr = listener.local_addr().expect("bound address");
    tokio::spawn(async move { axum::serve(listener, app).await });
    format!("http://{}/data", addr)
}
