//! Pass network between tactical slots for one formation of a team.
//!
//! Nodes sit at the mean location of the slot's passes and receipts; an edge
//! joins two slots that completed at least one pass to each other, in either
//! direction. Every spell in the formation counts, so a team that leaves a
//! shape and later returns to it gets both spells merged.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{
    accessor::MatchLog,
    statsbomb::{EventKind, FormationCode, Slot, TeamId},
    tactics::{self, Labelled, Reconstruction},
};

use super::AnalysisError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub slot: Slot,
    pub x: f64,
    pub y: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    pub from: Slot,
    pub to: Slot,
    pub pass_count: usize,
    pub x: f64,
    pub y: f64,
    pub x_end: f64,
    pub y_end: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassNetwork {
    pub team: TeamId,
    pub formation: FormationCode,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

#[derive(Default)]
struct Centroid {
    x: f64,
    y: f64,
    count: usize,
}

// unordered pair, smaller label first
fn pair(a: Slot, b: Slot) -> (Slot, Slot) {
    if a.label() <= b.label() {
        (a, b)
    } else {
        (b, a)
    }
}

impl PassNetwork {
    pub fn build(
        log: &MatchLog,
        recon: &Reconstruction,
        team: TeamId,
        formation: &FormationCode,
    ) -> Result<Self, AnalysisError> {
        if !tactics::formations(log, team).contains(formation) {
            return Err(AnalysisError::FormationNotUsed {
                team,
                formation: formation.clone(),
            });
        }

        let mut centroids: BTreeMap<Slot, Centroid> = BTreeMap::new();
        let mut links: BTreeMap<(Slot, Slot), usize> = BTreeMap::new();
        let mut skipped = 0;
        let touches = log
            .events()
            .iter()
            .filter(|event| event.team == team)
            .filter(|event| matches!(event.kind, EventKind::Pass | EventKind::BallReceipt));
        for event in touches {
            let (slot, recipient) = match recon.label(event) {
                Labelled::Resolved {
                    stamp,
                    slot,
                    recipient,
                    ..
                } if stamp.formation == *formation => (slot, recipient),
                Labelled::Resolved { .. } => continue,
                Labelled::Unresolved { event, reason } => {
                    log::trace!("event {} has no slot: {:?}", event.id, reason);
                    skipped += 1;
                    continue;
                }
            };

            if let Some(location) = event.location {
                let centroid = centroids.entry(slot).or_default();
                centroid.x += location.x;
                centroid.y += location.y;
                centroid.count += 1;
            }
            if event.is_completed_pass() {
                if let Some(recipient) = recipient.filter(|recipient| *recipient != slot) {
                    *links.entry(pair(slot, recipient)).or_default() += 1;
                }
            }
        }
        if skipped > 0 {
            log::debug!("{} touches of team {} without a slot", skipped, team);
        }

        let nodes = centroids
            .into_iter()
            .map(|(slot, centroid)| Node {
                slot,
                x: centroid.x / centroid.count as f64,
                y: centroid.y / centroid.count as f64,
                count: centroid.count,
            })
            .collect::<Vec<_>>();

        let node = |slot: Slot| nodes.iter().find(|node| node.slot == slot);
        let mut edges = links
            .into_iter()
            .filter_map(|((from, to), pass_count)| {
                let (start, end) = (node(from)?, node(to)?);
                Some(Edge {
                    from,
                    to,
                    pass_count,
                    x: start.x,
                    y: start.y,
                    x_end: end.x,
                    y_end: end.y,
                })
            })
            .collect::<Vec<_>>();
        edges.sort_by(|a, b| (a.from.label(), a.to.label()).cmp(&(b.from.label(), b.to.label())));

        Ok(Self {
            team,
            formation: formation.clone(),
            nodes,
            edges,
        })
    }
}
