//! Directions, trigrams, and the five-element floor progression.
//!
//! The eight compass directions map one-to-one onto the eight trigrams of
//! the Ba Gua. Each trigram carries an element and a polarity:
//!
//! ```text
//! 北  坎 水    東北 艮 土+   東  震 木+   東南 巽 木-
//! 南  離 火    西南 坤 土-   西  兌 金-   西北 乾 金+
//! ```
//!
//! Water and Fire each seat a single trigram and never carry polarity;
//! Wood, Earth and Metal split into a plus and a minus trigram. Climbing
//! floors walks the element cycle 水→木→火→土→金→水, which is what
//! [`Trigram::advance`] implements.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest floor the selector offers.
pub const MAX_FLOOR: u32 = 30;

/// Selectable floor numbers, ground floor first.
pub const FLOORS: std::ops::RangeInclusive<u32> = 1..=MAX_FLOOR;

/// Rejected user input. Everything here is recoverable at the text
/// boundary; the typed core never produces these on its own.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("unknown trigram symbol: {0}")]
    UnknownTrigram(String),
    #[error("unknown direction: {0}")]
    UnknownDirection(String),
    #[error("unknown door placement mode: {0}")]
    UnknownMode(String),
    #[error("floor number must be 1 or higher, got {0}")]
    FloorOutOfRange(u32),
}

/// The five elements, ordered by their generative cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Water,
    Wood,
    Fire,
    Earth,
    Metal,
}

impl Element {
    /// Cycle order used by the floor progression.
    pub const CYCLE: [Element; 5] = [
        Element::Water,
        Element::Wood,
        Element::Fire,
        Element::Earth,
        Element::Metal,
    ];

    /// Next element in the circular cycle; Metal wraps back to Water.
    pub fn successor(self) -> Element {
        match self {
            Element::Water => Element::Wood,
            Element::Wood => Element::Fire,
            Element::Fire => Element::Earth,
            Element::Earth => Element::Metal,
            Element::Metal => Element::Water,
        }
    }

    /// Water and Fire seat a single trigram and carry no polarity.
    pub fn is_singleton(self) -> bool {
        matches!(self, Element::Water | Element::Fire)
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Element::Water => "水",
            Element::Wood => "木",
            Element::Fire => "火",
            Element::Earth => "土",
            Element::Metal => "金",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Polarity tag refining an element into its trigram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    None,
    Plus,
    Minus,
}

impl Polarity {
    /// Sign as rendered inline after an element, empty for None.
    pub fn glyph(self) -> &'static str {
        match self {
            Polarity::None => "",
            Polarity::Plus => "+",
            Polarity::Minus => "-",
        }
    }

    /// Standalone rendering; None shows as 無.
    pub fn label(self) -> &'static str {
        match self {
            Polarity::None => "無",
            Polarity::Plus => "+",
            Polarity::Minus => "-",
        }
    }
}

/// One of the eight Ba Gua trigrams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigram {
    /// 坎 - Water
    Kan,
    /// 艮 - Earth, plus
    Gen,
    /// 震 - Wood, plus
    Zhen,
    /// 巽 - Wood, minus
    Xun,
    /// 離 - Fire
    Li,
    /// 坤 - Earth, minus
    Kun,
    /// 兌 - Metal, minus
    Dui,
    /// 乾 - Metal, plus
    Qian,
}

impl Trigram {
    pub const ALL: [Trigram; 8] = [
        Trigram::Kan,
        Trigram::Gen,
        Trigram::Zhen,
        Trigram::Xun,
        Trigram::Li,
        Trigram::Kun,
        Trigram::Dui,
        Trigram::Qian,
    ];

    pub fn element(self) -> Element {
        match self {
            Trigram::Kan => Element::Water,
            Trigram::Gen | Trigram::Kun => Element::Earth,
            Trigram::Zhen | Trigram::Xun => Element::Wood,
            Trigram::Li => Element::Fire,
            Trigram::Dui | Trigram::Qian => Element::Metal,
        }
    }

    pub fn polarity(self) -> Polarity {
        match self {
            Trigram::Kan | Trigram::Li => Polarity::None,
            Trigram::Gen | Trigram::Zhen | Trigram::Qian => Polarity::Plus,
            Trigram::Xun | Trigram::Kun | Trigram::Dui => Polarity::Minus,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Trigram::Kan => "坎",
            Trigram::Gen => "艮",
            Trigram::Zhen => "震",
            Trigram::Xun => "巽",
            Trigram::Li => "離",
            Trigram::Kun => "坤",
            Trigram::Dui => "兌",
            Trigram::Qian => "乾",
        }
    }

    /// Resolve a trigram from its element and polarity, if that
    /// combination exists in the table.
    pub fn from_parts(element: Element, polarity: Polarity) -> Option<Trigram> {
        match (element, polarity) {
            (Element::Water, Polarity::None) => Some(Trigram::Kan),
            (Element::Wood, Polarity::Plus) => Some(Trigram::Zhen),
            (Element::Wood, Polarity::Minus) => Some(Trigram::Xun),
            (Element::Fire, Polarity::None) => Some(Trigram::Li),
            (Element::Earth, Polarity::Plus) => Some(Trigram::Gen),
            (Element::Earth, Polarity::Minus) => Some(Trigram::Kun),
            (Element::Metal, Polarity::Plus) => Some(Trigram::Qian),
            (Element::Metal, Polarity::Minus) => Some(Trigram::Dui),
            _ => None,
        }
    }

    /// One step of the floor progression.
    ///
    /// The element advances along the cycle. A polarity-free trigram
    /// re-enters the polarized elements on the plus side; otherwise the
    /// carried polarity sticks. Water and Fire shed polarity again.
    pub fn step(self) -> Trigram {
        let element = self.element().successor();
        let mut polarity = match self.polarity() {
            Polarity::None => Polarity::Plus,
            carried => carried,
        };
        if element.is_singleton() {
            polarity = Polarity::None;
        }
        match Trigram::from_parts(element, polarity) {
            Some(next) => next,
            // The forcing rules above always land on a real combination.
            None => unreachable!("floor progression left the trigram table"),
        }
    }

    /// Trigram reached on `floor`, counting `self` as floor 1.
    ///
    /// Floor 0 is outside the domain and rejected.
    pub fn advance(self, floor: u32) -> Result<Trigram, InputError> {
        if floor == 0 {
            return Err(InputError::FloorOutOfRange(floor));
        }
        let mut current = self;
        for _ in 1..floor {
            current = current.step();
        }
        Ok(current)
    }

    /// Long rendering like `坎 (類型: 水, 極性: 無)`.
    pub fn detail(self) -> String {
        format!(
            "{} (類型: {}, 極性: {})",
            self.glyph(),
            self.element(),
            self.polarity().label()
        )
    }
}

impl fmt::Display for Trigram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for Trigram {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "坎" | "kan" => Ok(Trigram::Kan),
            "艮" | "gen" => Ok(Trigram::Gen),
            "震" | "zhen" => Ok(Trigram::Zhen),
            "巽" | "xun" => Ok(Trigram::Xun),
            "離" | "离" | "li" => Ok(Trigram::Li),
            "坤" | "kun" => Ok(Trigram::Kun),
            "兌" | "兑" | "dui" => Ok(Trigram::Dui),
            "乾" | "qian" => Ok(Trigram::Qian),
            _ => Err(InputError::UnknownTrigram(s.trim().to_string())),
        }
    }
}

/// The eight compass directions, in selector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    Northeast,
    East,
    Southeast,
    South,
    Southwest,
    West,
    Northwest,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::Northeast,
        Direction::East,
        Direction::Southeast,
        Direction::South,
        Direction::Southwest,
        Direction::West,
        Direction::Northwest,
    ];

    /// The trigram seated in this direction.
    pub fn trigram(self) -> Trigram {
        match self {
            Direction::North => Trigram::Kan,
            Direction::Northeast => Trigram::Gen,
            Direction::East => Trigram::Zhen,
            Direction::Southeast => Trigram::Xun,
            Direction::South => Trigram::Li,
            Direction::Southwest => Trigram::Kun,
            Direction::West => Trigram::Dui,
            Direction::Northwest => Trigram::Qian,
        }
    }

    /// Direction a trigram is seated in; inverse of [`Direction::trigram`].
    pub fn of_trigram(trigram: Trigram) -> Direction {
        match trigram {
            Trigram::Kan => Direction::North,
            Trigram::Gen => Direction::Northeast,
            Trigram::Zhen => Direction::East,
            Trigram::Xun => Direction::Southeast,
            Trigram::Li => Direction::South,
            Trigram::Kun => Direction::Southwest,
            Trigram::Dui => Direction::West,
            Trigram::Qian => Direction::Northwest,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Direction::North => "北",
            Direction::Northeast => "東北",
            Direction::East => "東",
            Direction::Southeast => "東南",
            Direction::South => "南",
            Direction::Southwest => "西南",
            Direction::West => "西",
            Direction::Northwest => "西北",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

impl FromStr for Direction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "北" | "north" | "n" => Ok(Direction::North),
            "東北" | "东北" | "northeast" | "ne" => Ok(Direction::Northeast),
            "東" | "东" | "east" | "e" => Ok(Direction::East),
            "東南" | "东南" | "southeast" | "se" => Ok(Direction::Southeast),
            "南" | "south" | "s" => Ok(Direction::South),
            "西南" | "southwest" | "sw" => Ok(Direction::Southwest),
            "西" | "west" | "w" => Ok(Direction::West),
            "西北" | "northwest" | "nw" => Ok(Direction::Northwest),
            _ => Err(InputError::UnknownDirection(s.trim().to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_trigram_bijection() {
        for direction in Direction::ALL {
            assert_eq!(Direction::of_trigram(direction.trigram()), direction);
        }
        for trigram in Trigram::ALL {
            assert_eq!(Direction::of_trigram(trigram).trigram(), trigram);
        }
    }

    #[test]
    fn test_parts_identify_trigram() {
        for trigram in Trigram::ALL {
            assert_eq!(
                Trigram::from_parts(trigram.element(), trigram.polarity()),
                Some(trigram)
            );
        }
    }

    #[test]
    fn test_singleton_elements_have_no_polarity() {
        for trigram in Trigram::ALL {
            if trigram.element().is_singleton() {
                assert_eq!(trigram.polarity(), Polarity::None);
            } else {
                assert_ne!(trigram.polarity(), Polarity::None);
            }
        }
    }

    #[test]
    fn test_element_cycle_wraps() {
        // successor agrees with the declared cycle order, including the
        // wrap from the last element back to the first.
        for (i, element) in Element::CYCLE.iter().enumerate() {
            let expected = Element::CYCLE[(i + 1) % Element::CYCLE.len()];
            assert_eq!(element.successor(), expected);
        }
    }

    #[test]
    fn test_floor_one_is_identity() {
        for trigram in Trigram::ALL {
            assert_eq!(trigram.advance(1), Ok(trigram));
        }
    }

    #[test]
    fn test_qian_second_floor_is_kan() {
        // 乾 is Metal+; the next element is Water, which forces polarity off.
        assert_eq!(Trigram::Qian.advance(2), Ok(Trigram::Kan));
    }

    #[test]
    fn test_advance_keeps_polarity_constraint() {
        for trigram in Trigram::ALL {
            for floor in FLOORS {
                let result = trigram.advance(floor).unwrap();
                if result.element().is_singleton() {
                    assert_eq!(result.polarity(), Polarity::None);
                } else {
                    assert_ne!(result.polarity(), Polarity::None);
                }
            }
        }
    }

    #[test]
    fn test_orbit_settles_into_five_cycle() {
        // Minus-polarity starts take up to two floors to join the
        // principal cycle 坎 震 離 艮 乾; from floor 3 every orbit
        // repeats with period 5.
        for trigram in Trigram::ALL {
            for floor in 3..=MAX_FLOOR - 5 {
                assert_eq!(
                    trigram.advance(floor).unwrap(),
                    trigram.advance(floor + 5).unwrap(),
                    "orbit of {trigram} diverged at floor {floor}"
                );
            }
        }
    }

    #[test]
    fn test_principal_trigrams_have_period_five_throughout() {
        let principal = [
            Trigram::Kan,
            Trigram::Zhen,
            Trigram::Li,
            Trigram::Gen,
            Trigram::Qian,
        ];
        for trigram in principal {
            for floor in 1..=10 {
                assert_eq!(
                    trigram.advance(floor).unwrap(),
                    trigram.advance(floor + 5).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_floor_zero_rejected() {
        assert_eq!(
            Trigram::Kan.advance(0),
            Err(InputError::FloorOutOfRange(0))
        );
    }

    #[test]
    fn test_parse_trigram_symbols() {
        assert_eq!("坎".parse::<Trigram>(), Ok(Trigram::Kan));
        assert_eq!("qian".parse::<Trigram>(), Ok(Trigram::Qian));
        assert_eq!("Li".parse::<Trigram>(), Ok(Trigram::Li));
        assert_eq!(
            "whatever".parse::<Trigram>(),
            Err(InputError::UnknownTrigram("whatever".to_string()))
        );
    }

    #[test]
    fn test_parse_direction_names() {
        assert_eq!("北".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("southeast".parse::<Direction>(), Ok(Direction::Southeast));
        assert_eq!("NW".parse::<Direction>(), Ok(Direction::Northwest));
        assert_eq!(
            "up".parse::<Direction>(),
            Err(InputError::UnknownDirection("up".to_string()))
        );
    }

    #[test]
    fn test_detail_rendering() {
        assert_eq!(Trigram::Kan.detail(), "坎 (類型: 水, 極性: 無)");
        assert_eq!(Trigram::Gen.detail(), "艮 (類型: 土, 極性: +)");
        assert_eq!(Trigram::Dui.detail(), "兌 (類型: 金, 極性: -)");
    }
}
