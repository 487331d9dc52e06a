//! Selection state and the derived-value pipeline.
//!
//! The five user selections live in one [`SelectionState`] value; every
//! downstream value is recomputed from scratch by [`derive`] on each
//! change. There is no incremental patching, so clearing an upstream
//! selection clears everything computed after it by construction.

use crate::relation::Relation;
use crate::trigram::{Direction, InputError, Trigram};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the building's main door sits. The mode decides which question
/// the base-direction selection answers; the arithmetic downstream is the
/// same either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorPlacement {
    /// 大門置中 - seat the calculation on the building's sitting direction.
    Centered,
    /// 大門不置中 - seat the calculation on the door's own direction.
    NotCentered,
}

impl DoorPlacement {
    pub const ALL: [DoorPlacement; 2] = [DoorPlacement::Centered, DoorPlacement::NotCentered];

    pub fn glyph(self) -> &'static str {
        match self {
            DoorPlacement::Centered => "大門置中",
            DoorPlacement::NotCentered => "大門不置中",
        }
    }

    /// Fixed description shown once a mode is picked.
    pub fn description(self) -> &'static str {
        match self {
            DoorPlacement::Centered => "以坐到向，寄卦編宅",
            DoorPlacement::NotCentered => "以門到向，寄卦編宅",
        }
    }

    /// Label of the base-direction question this mode asks.
    pub fn base_prompt(self) -> &'static str {
        match self {
            DoorPlacement::Centered => "住宅坐方位",
            DoorPlacement::NotCentered => "住宅大門方位",
        }
    }
}

impl fmt::Display for DoorPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for DoorPlacement {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "大門置中" | "大门置中" | "centered" => Ok(DoorPlacement::Centered),
            "大門不置中" | "大门不置中" | "not-centered" | "not_centered" | "notcentered" => {
                Ok(DoorPlacement::NotCentered)
            }
            _ => Err(InputError::UnknownMode(s.trim().to_string())),
        }
    }
}

/// The five user selections. Everything else is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub door_placement: Option<DoorPlacement>,
    pub base_direction: Option<Direction>,
    pub facing_direction: Option<Direction>,
    pub floor: Option<u32>,
    pub unit_direction: Option<Direction>,
}

/// Seed of the floor progression: a real trigram, or the marker used when
/// base and facing collapse onto the same trigram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformSeed {
    Hexagram(Trigram),
    /// 伏 - no real seed exists; the floor progression refuses to run.
    Prostrate,
}

impl TransformSeed {
    pub fn as_trigram(self) -> Option<Trigram> {
        match self {
            TransformSeed::Hexagram(trigram) => Some(trigram),
            TransformSeed::Prostrate => None,
        }
    }

    /// Rendering with element and polarity, like `乾 (金+)`.
    pub fn detail(self) -> String {
        match self {
            TransformSeed::Hexagram(trigram) => format!(
                "{} ({}{})",
                trigram.glyph(),
                trigram.element(),
                trigram.polarity().glyph()
            ),
            TransformSeed::Prostrate => "伏".to_string(),
        }
    }
}

impl fmt::Display for TransformSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransformSeed::Hexagram(trigram) => write!(f, "{trigram}"),
            TransformSeed::Prostrate => f.write_str("伏"),
        }
    }
}

/// Values derived from a [`SelectionState`]. An absent field means the
/// inputs it needs are not all set yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Derived {
    /// Seed from base and facing directions.
    pub transform: Option<TransformSeed>,
    /// Trigram the unit's floor lands on.
    pub floor_hexagram: Option<Trigram>,
    /// Verdict between the floor trigram and the unit door.
    pub relation: Option<Relation>,
}

/// Recompute every derived value from the current selections.
///
/// Stage order matches the selector flow: base + facing give the transform
/// seed, the seed and floor give the floor hexagram, the floor hexagram
/// and unit door give the verdict. A `Prostrate` seed stops the pipeline
/// before the floor stage.
pub fn derive(state: &SelectionState) -> Derived {
    let transform = match (state.base_direction, state.facing_direction) {
        (Some(base), Some(facing)) => {
            let relation = Relation::classify(base.trigram(), facing.trigram());
            Some(match relation.transform_trigram() {
                Some(hexagram) => TransformSeed::Hexagram(hexagram),
                None => TransformSeed::Prostrate,
            })
        }
        _ => None,
    };

    let floor_hexagram = match (transform.and_then(TransformSeed::as_trigram), state.floor) {
        (Some(seed), Some(floor)) => seed.advance(floor).ok(),
        _ => None,
    };

    let relation = match (floor_hexagram, state.unit_direction) {
        (Some(hexagram), Some(unit)) => Some(Relation::classify(hexagram, unit.trigram())),
        _ => None,
    };

    Derived {
        transform,
        floor_hexagram,
        relation,
    }
}
