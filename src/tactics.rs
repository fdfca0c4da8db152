//! Tactical slot reconstruction.
//!
//! Every formation-declaring event (Starting XI, Tactical Shift) becomes the
//! team's anchor until the next declaration of that team. The slots declared
//! at each anchor are extended with substitutes, who inherit the slot of the
//! player they replaced under the same anchor.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{
    accessor::MatchLog,
    statsbomb::{Event, EventId, EventKind, FormationCode, PlayerId, Slot, TeamId},
};

/// Anchor and formation active for an event's team.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Stamp {
    pub anchor: EventId,
    pub formation: FormationCode,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SlotKey {
    anchor: EventId,
    team: TeamId,
    player: PlayerId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unresolved {
    /// The event has no player attached.
    NoPlayer,
    /// The team had not declared a formation yet.
    NoAnchor,
    /// The player holds no slot under the active anchor.
    NoSlot(PlayerId),
}

#[derive(Debug, Clone)]
pub enum Labelled<'a> {
    Resolved {
        stamp: &'a Stamp,
        slot: Slot,
        /// Slot of the pass recipient, when there is one and it resolves.
        recipient: Option<Slot>,
    },
    Unresolved {
        event: &'a Event,
        reason: Unresolved,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconstruction {
    stamps: HashMap<EventId, Stamp>,
    slots: BTreeMap<SlotKey, Slot>,
}

impl Reconstruction {
    pub fn build(log: &MatchLog) -> Self {
        // per-team forward fill in index order
        let mut current: HashMap<TeamId, Stamp> = HashMap::new();
        let mut stamps = HashMap::with_capacity(log.events().len());
        for event in log.events() {
            if let Some(formation) = &event.formation {
                let stamp = Stamp {
                    anchor: event.id.clone(),
                    formation: formation.clone(),
                };
                current.insert(event.team, stamp);
            }
            if let Some(stamp) = current.get(&event.team) {
                stamps.insert(event.id.clone(), stamp.clone());
            }
        }

        let mut slots = BTreeMap::new();
        for record in log.tactics() {
            for entry in &record.lineup {
                let key = SlotKey {
                    anchor: record.event_id.clone(),
                    team: record.team,
                    player: entry.player,
                };
                slots.insert(key, entry.slot);
            }
        }

        // substitutions in order, so a substitute replaced later passes the slot on
        let substitutions = log
            .events()
            .iter()
            .filter(|event| event.kind == EventKind::Substitution);
        for sub in substitutions {
            let (Some(off), Some(on)) = (sub.player, sub.substitution_replacement) else {
                log::debug!("substitution {} without both players, skipped", sub.id);
                continue;
            };
            let Some(stamp) = stamps.get(&sub.id) else {
                log::debug!(
                    "substitution {} precedes any formation of team {}, skipped",
                    sub.id,
                    sub.team
                );
                continue;
            };
            let key = SlotKey {
                anchor: stamp.anchor.clone(),
                team: sub.team,
                player: off,
            };
            match slots.get(&key).copied() {
                Some(slot) => {
                    slots.insert(SlotKey { player: on, ..key }, slot);
                }
                None => log::debug!(
                    "player {} left at substitution {} without a slot under {}",
                    off,
                    sub.id,
                    stamp.anchor
                ),
            }
        }

        Self { stamps, slots }
    }

    pub fn stamp(&self, event: &Event) -> Option<&Stamp> {
        self.stamps.get(&event.id)
    }

    pub fn slot(&self, stamp: &Stamp, team: TeamId, player: PlayerId) -> Option<Slot> {
        let key = SlotKey {
            anchor: stamp.anchor.clone(),
            team,
            player,
        };
        self.slots.get(&key).copied()
    }

    pub fn label<'a>(&'a self, event: &'a Event) -> Labelled<'a> {
        let unresolved = |reason| Labelled::Unresolved { event, reason };
        let Some(player) = event.player else {
            return unresolved(Unresolved::NoPlayer);
        };
        let Some(stamp) = self.stamp(event) else {
            return unresolved(Unresolved::NoAnchor);
        };
        let Some(slot) = self.slot(stamp, event.team, player) else {
            return unresolved(Unresolved::NoSlot(player));
        };
        let recipient = event
            .pass_recipient
            .and_then(|recipient| self.slot(stamp, event.team, recipient));
        Labelled::Resolved {
            stamp,
            slot,
            recipient,
        }
    }

    /// Every (anchor, player, slot) assignment of `team`, starters and
    /// substitutes alike.
    pub fn assignments(&self, team: TeamId) -> impl Iterator<Item = (&EventId, PlayerId, Slot)> {
        self.slots
            .iter()
            .filter(move |(key, _)| key.team == team)
            .map(|(key, slot)| (&key.anchor, key.player, *slot))
    }
}

/// Formation codes `team` used, in order of first use.
pub fn formations(log: &MatchLog, team: TeamId) -> Vec<FormationCode> {
    let mut used: Vec<FormationCode> = vec![];
    log.events()
        .iter()
        .filter(|event| event.team == team)
        .filter_map(|event| event.formation.as_ref())
        .for_each(|formation| {
            if !used.contains(formation) {
                used.push(formation.clone());
            }
        });
    used
}

/// Anchors of `team` that declared `formation`; a team reverting to an
/// earlier shape has more than one.
pub fn anchors<'a>(
    log: &'a MatchLog,
    team: TeamId,
    formation: &'a FormationCode,
) -> impl Iterator<Item = &'a EventId> {
    log.events()
        .iter()
        .filter(move |event| event.team == team && event.formation.as_ref() == Some(formation))
        .map(|event| &event.id)
}
