use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod raw;
pub mod table;

pub use table::{Competition, Event, EventKind, LineupEntry, Match, TacticsRecord};

macro_rules! numeric_id {
    ($name:ident, $inner:ty) => {
        #[derive(
            Debug,
            Default,
            Copy,
            Clone,
            Hash,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Serialize,
            Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(CompetitionId, u32);
numeric_id!(SeasonId, u32);
numeric_id!(MatchId, u64);
numeric_id!(TeamId, u32);
numeric_id!(PlayerId, u32);

/// Provider event identifier (a UUID string).
#[derive(Debug, Default, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A tactical shape such as "4231".
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormationCode(pub String);

impl Display for FormationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FormationCode {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// the feed encodes formations as integers, 4231 and so on
impl From<u32> for FormationCode {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Side::Home => "home",
            Side::Away => "away",
        };
        f.write_str(name)
    }
}

/// One of the 25 fixed tactical positions, numbered as the provider numbers
/// `position.id`.
#[derive(Debug, Copy, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub enum Slot {
    Gk = 1,
    Rb,
    Rcb,
    Cb,
    Lcb,
    Lb,
    Rwb,
    Lwb,
    Rdm,
    Cdm,
    Ldm,
    Rm,
    Rcm,
    Cm,
    Lcm,
    Lm,
    Rw,
    Ram,
    Cam,
    Lam,
    Lw,
    Rcf,
    St,
    Lcf,
    Ss,
}

impl Slot {
    const TABLE: [(Slot, &'static str); 25] = [
        (Slot::Gk, "GK"),
        (Slot::Rb, "RB"),
        (Slot::Rcb, "RCB"),
        (Slot::Cb, "CB"),
        (Slot::Lcb, "LCB"),
        (Slot::Lb, "LB"),
        (Slot::Rwb, "RWB"),
        (Slot::Lwb, "LWB"),
        (Slot::Rdm, "RDM"),
        (Slot::Cdm, "CDM"),
        (Slot::Ldm, "LDM"),
        (Slot::Rm, "RM"),
        (Slot::Rcm, "RCM"),
        (Slot::Cm, "CM"),
        (Slot::Lcm, "LCM"),
        (Slot::Lm, "LM"),
        (Slot::Rw, "RW"),
        (Slot::Ram, "RAM"),
        (Slot::Cam, "CAM"),
        (Slot::Lam, "LAM"),
        (Slot::Lw, "LW"),
        (Slot::Rcf, "RCF"),
        (Slot::St, "ST"),
        (Slot::Lcf, "LCF"),
        (Slot::Ss, "SS"),
    ];

    /// Maps a provider position id (1..=25) to its slot.
    pub fn from_position_id(id: u8) -> Option<Self> {
        Self::TABLE
            .iter()
            .find(|(slot, _)| *slot as u8 == id)
            .map(|&(slot, _)| slot)
    }

    pub fn position_id(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        Self::TABLE
            .iter()
            .find(|(slot, _)| *slot == self)
            .map_or("", |&(_, label)| label)
    }
}

impl Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Slot {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_table_covers_every_position_id() {
        for id in 1..=25u8 {
            let slot = Slot::from_position_id(id).expect("position id in table");
            assert_eq!(slot.position_id(), id);
            assert!(!slot.label().is_empty());
        }
        assert_eq!(Slot::from_position_id(0), None);
        assert_eq!(Slot::from_position_id(26), None);
    }

    #[test]
    fn slot_labels_match_provider_abbreviations() {
        assert_eq!(Slot::from_position_id(1).map(Slot::label), Some("GK"));
        assert_eq!(Slot::from_position_id(10).map(Slot::label), Some("CDM"));
        assert_eq!(Slot::from_position_id(23).map(Slot::label), Some("ST"));
        assert_eq!(Slot::from_position_id(25).map(Slot::label), Some("SS"));
    }

    #[test]
    fn formation_from_feed_integer() {
        assert_eq!(FormationCode::from(4231), FormationCode::from("4231"));
    }
}
