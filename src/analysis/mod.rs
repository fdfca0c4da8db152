//! Chart-ready datasets derived from one match log.
//!
//! - `xg` - cumulative expected goals per 15-minute bucket
//! - `shots` - goals table and passes leading to shots
//! - `defensive` - blocks, fouls, clearances and interceptions
//! - `passing` - pass matrix, goalkeeper passes, player pass maps
//! - `lineup` - starting formation and per-formation roster
//! - `network` - slot-to-slot pass network

use thiserror::Error;

use crate::statsbomb::{FormationCode, PlayerId, TeamId};

pub mod defensive;
pub mod lineup;
pub mod network;
pub mod passing;
pub mod shots;
pub mod xg;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("team {team} never lined up in {formation}")]
    FormationNotUsed {
        team: TeamId,
        formation: FormationCode,
    },
    #[error("team {0} has no Starting XI")]
    NoStartingXi(TeamId),
    #[error("team {0} has no goalkeeper passes in regular play")]
    NoGoalkeeper(TeamId),
    #[error("player {player} has no defensive actions for team {team}")]
    UnknownPlayer { team: TeamId, player: PlayerId },
}
