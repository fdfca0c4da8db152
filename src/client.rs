use std::time::Duration;

use reqwest::{Proxy, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    provider::{EventSource, SourceError},
    statsbomb::{
        raw, table::EventTables, Competition, CompetitionId, LineupEntry, Match, MatchId, SeasonId,
    },
};

// we use separate error types for construction and request

#[derive(Error, Debug)]
pub enum ConstructionError {
    #[error("ProxyError: {0} from scheme: {1}.")]
    ProxyError(reqwest::Error, String),
    #[error("BuildError: {0}.")]
    BuildError(#[from] reqwest::Error),
}

#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Failed to retrieve {1} from open data: {0}")]
    ConnectionError(reqwest::Error, String),
    #[error("Failed to decode {1}: {0}")]
    DecodeError(serde_json::Error, String),
    #[error("Too Many Requests")]
    TooManyRequests,
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Other Response: {0} for {1}")]
    OtherResponse(reqwest::StatusCode, String),
}

pub struct Client {
    client: reqwest::Client,
    base_url: String,
}

impl Client {
    pub const OPEN_DATA_URL: &str =
        "https://raw.githubusercontent.com/statsbomb/open-data/master/data";

    pub fn new(
        base_url: &str,
        proxy: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, ConstructionError> {
        let builder = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout);
        let builder = match proxy {
            Some(proxy) => {
                let proxy = Proxy::all(proxy)
                    .map_err(|err| ConstructionError::ProxyError(err, proxy.to_string()))?;
                builder.proxy(proxy)
            }
            None => builder,
        };
        let client = builder.build()?;
        let base_url = base_url.trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// A client that ignores proxy settings from the environment.
    #[cfg(test)]
    pub fn local(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("client builds");
        Self {
            client,
            base_url: base_url.to_string(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, RequestError> {
        let url = format!("{}/{}", self.base_url, path);
        log::debug!("fetching {}", url);
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|err| RequestError::ConnectionError(err, url.clone()))?;
        match resp.status() {
            StatusCode::OK => {
                let content = resp
                    .text()
                    .await
                    .map_err(|err| RequestError::ConnectionError(err, url.clone()))?;
                // a decode failure here means the feed changed shape
                serde_json::from_str(&content).map_err(|err| RequestError::DecodeError(err, url))
            }
            StatusCode::TOO_MANY_REQUESTS => Err(RequestError::TooManyRequests),
            StatusCode::NOT_FOUND => Err(RequestError::NotFound(url)),
            other => {
                log::warn!("{} answered {}", url, other);
                Err(RequestError::OtherResponse(other, url))
            }
        }
    }

    pub async fn get_competitions(&self) -> Result<Vec<raw::Competition>, RequestError> {
        self.fetch("competitions.json").await
    }

    pub async fn get_matches(
        &self,
        competition: CompetitionId,
        season: SeasonId,
    ) -> Result<Vec<raw::Match>, RequestError> {
        self.fetch(&format!("matches/{}/{}.json", competition, season))
            .await
    }

    pub async fn get_events(&self, match_id: MatchId) -> Result<Vec<raw::Event>, RequestError> {
        self.fetch(&format!("events/{}.json", match_id)).await
    }

    pub async fn get_lineups(
        &self,
        match_id: MatchId,
    ) -> Result<Vec<raw::TeamLineup>, RequestError> {
        self.fetch(&format!("lineups/{}.json", match_id)).await
    }
}

impl EventSource for Client {
    async fn competitions(&self) -> Result<Vec<Competition>, SourceError> {
        let competitions = self.get_competitions().await?;
        Ok(competitions.iter().map(Competition::from).collect())
    }

    async fn matches(
        &self,
        competition: CompetitionId,
        season: SeasonId,
    ) -> Result<Vec<Match>, SourceError> {
        let matches = self.get_matches(competition, season).await?;
        log::debug!(
            "{} matches in competition {} season {}",
            matches.len(),
            competition,
            season
        );
        let matches = matches
            .iter()
            .map(Match::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(matches)
    }

    async fn events(&self, match_id: MatchId) -> Result<EventTables, SourceError> {
        let events = self.get_events(match_id).await?;
        log::debug!("{} events in match {}", events.len(), match_id);
        Ok(EventTables::try_from(events.as_slice())?)
    }

    async fn lineups(&self, match_id: MatchId) -> Result<Vec<LineupEntry>, SourceError> {
        let lineups = self.get_lineups(match_id).await?;
        Ok(LineupEntry::from_teams(&lineups))
    }
}
