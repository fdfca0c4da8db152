use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    accessor::{AccessError, Fixture},
    analysis::{xg::XgBasis, AnalysisError},
    client::{Client, RequestError},
    provider::{EventSource, SourceError},
    report::{Dataset, Report},
    resolver::{self, FixtureQuery, ResolveError},
    statsbomb::{Competition, CompetitionId, FormationCode, Match, PlayerId, SeasonId, Side},
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("missing query parameter {0}")]
    MissingParameter(&'static str),
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

fn source_status(err: &SourceError) -> StatusCode {
    match err {
        SourceError::Request(RequestError::NotFound(_)) => StatusCode::NOT_FOUND,
        SourceError::Request(_) | SourceError::Shape(_) => StatusCode::BAD_GATEWAY,
    }
}

impl ServiceError {
    fn status(&self) -> StatusCode {
        match self {
            ServiceError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            ServiceError::Access(AccessError::Resolve(ResolveError::NoSuchFixture { .. })) => {
                StatusCode::NOT_FOUND
            }
            ServiceError::Access(AccessError::Resolve(ResolveError::AmbiguousFixture {
                ..
            })) => StatusCode::CONFLICT,
            ServiceError::Access(AccessError::Resolve(ResolveError::Source(err)))
            | ServiceError::Access(AccessError::Source(err))
            | ServiceError::Source(err) => source_status(err),
            ServiceError::Access(AccessError::Shape(_)) => StatusCode::BAD_GATEWAY,
            ServiceError::Analysis(_) => StatusCode::NOT_FOUND,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::warn!("{}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct SeasonParameter {
    pub competition: CompetitionId,
    pub season: SeasonId,
}

#[derive(Deserialize, Clone, Debug)]
pub struct TeamsParameter {
    pub competition: CompetitionId,
    pub season: SeasonId,
    #[serde(default)]
    pub home: Option<String>,
}

/// Fixture selection plus every per-dataset option, flat so it decodes from
/// a query string.
#[derive(Deserialize, Clone, Debug)]
pub struct DatasetParameter {
    pub competition: CompetitionId,
    pub season: SeasonId,
    pub home: String,
    pub away: String,
    #[serde(default)]
    pub leg: Option<NaiveDate>,
    #[serde(default)]
    pub team: Option<Side>,
    #[serde(default)]
    pub formation: Option<String>,
    #[serde(default)]
    pub player: Option<PlayerId>,
    #[serde(default)]
    pub basis: Option<XgBasis>,
}

impl DatasetParameter {
    fn fixture(&self) -> FixtureQuery {
        FixtureQuery {
            competition: self.competition,
            season: self.season,
            home: self.home.clone(),
            away: self.away.clone(),
            leg: self.leg,
        }
    }

    fn team(&self) -> Result<Side, ServiceError> {
        self.team.ok_or(ServiceError::MissingParameter("team"))
    }

    fn formation(&self) -> Result<FormationCode, ServiceError> {
        self.formation
            .as_deref()
            .map(FormationCode::from)
            .ok_or(ServiceError::MissingParameter("formation"))
    }
}

pub struct AppState<S> {
    source: S,
}

impl<S> AppState<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

type Shared<S> = State<Arc<AppState<S>>>;
type Params = Query<DatasetParameter>;

async fn respond<S: EventSource>(
    state: &AppState<S>,
    params: &DatasetParameter,
    dataset: Dataset,
) -> Result<Json<Report>, ServiceError> {
    let fixture = Fixture::open(&state.source, &params.fixture()).await?;
    Ok(Json(Report::compute(&fixture, &dataset)?))
}

pub async fn competitions<S: EventSource>(
    State(state): Shared<S>,
) -> Result<Json<Vec<Competition>>, ServiceError> {
    Ok(Json(state.source.competitions().await?))
}

pub async fn matches<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Query<SeasonParameter>,
) -> Result<Json<Vec<Match>>, ServiceError> {
    Ok(Json(
        state.source.matches(params.competition, params.season).await?,
    ))
}

/// Home teams of the season, or the opponents `home` hosted.
pub async fn teams<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Query<TeamsParameter>,
) -> Result<Json<Vec<String>>, ServiceError> {
    let matches = state.source.matches(params.competition, params.season).await?;
    let teams = match &params.home {
        Some(home) => resolver::away_teams(&matches, home),
        None => resolver::home_teams(&matches),
    };
    Ok(Json(teams.into_iter().map(str::to_string).collect()))
}

pub async fn fixture<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::Fixture).await
}

pub async fn formations<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::Formations(params.team()?)).await
}

pub async fn starting_formation<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::StartingFormation(params.team()?)).await
}

pub async fn formation_roster<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    let dataset = Dataset::FormationRoster(params.team()?, params.formation()?);
    respond(&state, &params, dataset).await
}

pub async fn pass_network<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    let dataset = Dataset::PassNetwork(params.team()?, params.formation()?);
    respond(&state, &params, dataset).await
}

pub async fn cumulative_xg<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    let basis = params.basis.unwrap_or_default();
    respond(&state, &params, Dataset::CumulativeXg(basis)).await
}

pub async fn goals<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::Goals).await
}

/// Every defender of the team, or one player's actions when `player` is set.
pub async fn defensive_actions<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    let team = params.team()?;
    let dataset = match params.player {
        Some(player) => Dataset::DefensiveActions(team, player),
        None => Dataset::Defenders(team),
    };
    respond(&state, &params, dataset).await
}

pub async fn shot_assists<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::ShotAssists(params.team()?)).await
}

pub async fn pass_matrix<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::PassMatrix(params.team()?)).await
}

pub async fn goalkeeper_passes<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::GoalkeeperPasses(params.team()?)).await
}

pub async fn pass_maps<S: EventSource>(
    State(state): Shared<S>,
    Query(params): Params,
) -> Result<Json<Report>, ServiceError> {
    respond(&state, &params, Dataset::PassMaps(params.team()?)).await
}

pub fn router<S: EventSource + Send + 'static>(source: S) -> Router {
    let state = Arc::new(AppState::new(source));
    Router::new()
        .route("/competitions", get(competitions::<S>))
        .route("/matches", get(matches::<S>))
        .route("/teams", get(teams::<S>))
        .route("/fixture", get(fixture::<S>))
        .route("/formations", get(formations::<S>))
        .route("/starting-formation", get(starting_formation::<S>))
        .route("/formation-roster", get(formation_roster::<S>))
        .route("/pass-network", get(pass_network::<S>))
        .route("/cumulative-xg", get(cumulative_xg::<S>))
        .route("/goals", get(goals::<S>))
        .route("/defensive-actions", get(defensive_actions::<S>))
        .route("/shot-assists", get(shot_assists::<S>))
        .route("/pass-matrix", get(pass_matrix::<S>))
        .route("/goalkeeper-passes", get(goalkeeper_passes::<S>))
        .route("/pass-maps", get(pass_maps::<S>))
        .with_state(state)
}

pub async fn serve(client: Client, bind: &str) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    log::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router(client)).await
}
