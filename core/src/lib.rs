#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Arclune battle engine.
//!
//! This crate defines the value types that connect the zone index, the fury
//! engine, and any adapter driving a battle. Positions on the 7×3 board are
//! expressed as [`CellCoord`] values, side-relative turn positions as
//! [`Slot`] values, and their printable form as [`ZoneCode`]. Tuning lives in
//! the [`config`] module and is always passed explicitly to the systems that
//! read it.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod config;

pub use config::{ArcluneConfig, ConfigError, FuryConfig};

/// Number of rows on the battlefield. Slot arithmetic assumes three rows.
pub const GRID_ROWS: u32 = 3;

/// Highest slot number available to a side with a full three-column zone.
pub const MAX_SLOT: u8 = 9;

/// Bit offset between the side ordinal and the slot in packed zone codes.
const PACKED_SIDE_STRIDE: i32 = 16;

/// Replaces non-finite input with `fallback`.
///
/// Every numeric value that crosses into the battle systems goes through this
/// guard so that a stray `NaN` never reaches fury arithmetic.
#[must_use]
pub fn to_finite_number(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// The two factions competing on the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Units controlled by the player, occupying the left zone.
    Ally,
    /// Opposing units, occupying the right zone.
    Enemy,
}

impl Side {
    /// Both sides in turn-order precedence.
    pub const ALL: [Side; 2] = [Side::Ally, Side::Enemy];

    /// Numeric ordinal used by packed zone codes (ally = 0, enemy = 1).
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        match self {
            Self::Ally => 0,
            Self::Enemy => 1,
        }
    }

    /// Letter prefix used by textual zone codes.
    #[must_use]
    pub const fn prefix(self) -> char {
        match self {
            Self::Ally => 'A',
            Self::Enemy => 'E',
        }
    }

    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Ally => Self::Enemy,
            Self::Enemy => Self::Ally,
        }
    }

    const fn from_ordinal(ordinal: i32) -> Option<Self> {
        match ordinal {
            0 => Some(Self::Ally),
            1 => Some(Self::Enemy),
            _ => None,
        }
    }

    const fn from_prefix(prefix: char) -> Option<Self> {
        match prefix {
            'A' | 'a' => Some(Self::Ally),
            'E' | 'e' => Some(Self::Enemy),
            _ => None,
        }
    }
}

/// Location of a single board cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new board cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Side-relative turn-order position in `1..=9`.
///
/// Slot 1 is always the forward-most cell of a zone, nearest the midline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Slot(u8);

impl Slot {
    /// The forward-most slot.
    pub const FIRST: Slot = Slot(1);

    /// Creates a slot when `value` lies within `1..=9`.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value >= 1 && value <= MAX_SLOT {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Creates a slot by clamping `value` into `1..=9`.
    #[must_use]
    pub fn clamped(value: i32) -> Self {
        let clamped = value.clamp(1, i32::from(MAX_SLOT));
        Self(u8::try_from(clamped).unwrap_or(1))
    }

    /// Retrieves the numeric slot.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Zero-based column offset from the midline (slots 1-3 → 0).
    #[must_use]
    pub const fn column_index(&self) -> u32 {
        (self.0 as u32 - 1) / GRID_ROWS
    }

    /// Zero-based position inside the slot's column block.
    #[must_use]
    pub const fn row_index(&self) -> u32 {
        (self.0 as u32 - 1) % GRID_ROWS
    }

    /// Iterator over every slot in ascending turn order.
    pub fn all() -> impl Iterator<Item = Slot> {
        (1..=MAX_SLOT).map(Slot)
    }
}

impl TryFrom<u8> for Slot {
    type Error = ZoneCodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ZoneCodeError::SlotOutOfRange(i32::from(value)))
    }
}

impl From<Slot> for u8 {
    fn from(slot: Slot) -> Self {
        slot.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Label combining a side and a slot number, for example `A5`.
///
/// Codes produced from cells outside a side's zone carry the raw slot
/// arithmetic result, which may fall outside `1..=9`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ZoneCode {
    side: Side,
    slot: i32,
}

impl ZoneCode {
    /// Creates a zone code from a side and a raw slot number.
    #[must_use]
    pub const fn new(side: Side, slot: i32) -> Self {
        Self { side, slot }
    }

    /// Side encoded in the code.
    #[must_use]
    pub const fn side(&self) -> Side {
        self.side
    }

    /// Raw slot number encoded in the code.
    #[must_use]
    pub const fn slot(&self) -> i32 {
        self.slot
    }

    /// Packed numeric form, `side_ordinal * 16 + slot`, saturating at the
    /// `i32` bounds.
    #[must_use]
    pub const fn packed(&self) -> i32 {
        (self.side.ordinal() as i32 * PACKED_SIDE_STRIDE).saturating_add(self.slot)
    }

    /// Decodes a packed numeric zone code.
    pub fn from_packed(packed: i32) -> Result<Self, ZoneCodeError> {
        let side = Side::from_ordinal(packed.div_euclid(PACKED_SIDE_STRIDE))
            .ok_or(ZoneCodeError::UnknownSide(packed))?;
        let slot = packed.rem_euclid(PACKED_SIDE_STRIDE);
        validate_slot(slot)?;
        Ok(Self { side, slot })
    }
}

impl fmt::Display for ZoneCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.side.prefix(), self.slot)
    }
}

impl FromStr for ZoneCode {
    type Err = ZoneCodeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let mut chars = trimmed.chars();
        let prefix = chars.next().ok_or(ZoneCodeError::Empty)?;
        let side = Side::from_prefix(prefix).ok_or(ZoneCodeError::UnknownPrefix(prefix))?;
        let digits = chars.as_str();
        let slot: i32 = digits
            .parse()
            .map_err(|_| ZoneCodeError::InvalidSlot(digits.to_owned()))?;
        validate_slot(slot)?;
        Ok(Self { side, slot })
    }
}

fn validate_slot(slot: i32) -> Result<(), ZoneCodeError> {
    if (1..=i32::from(MAX_SLOT)).contains(&slot) {
        Ok(())
    } else {
        Err(ZoneCodeError::SlotOutOfRange(slot))
    }
}

/// Reasons a zone code could not be decoded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ZoneCodeError {
    /// The provided text was empty.
    #[error("zone code is empty")]
    Empty,
    /// The side prefix was neither `A` nor `E`.
    #[error("unknown zone prefix '{0}'")]
    UnknownPrefix(char),
    /// The packed value did not encode a known side.
    #[error("packed zone code {0} does not encode a side")]
    UnknownSide(i32),
    /// The slot portion was not a number.
    #[error("could not parse slot '{0}'")]
    InvalidSlot(String),
    /// The slot number lies outside `1..=9`.
    #[error("slot {0} is outside 1..=9")]
    SlotOutOfRange(i32),
}

/// Identifier of a unit archetype, used for per-unit configuration overrides.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    /// Creates a unit identifier.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed textual identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Column split of the board between the two zones and the neutral band.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridLayout {
    /// Columns owned by the ally zone, counted from column zero.
    pub ally_cols: u32,
    /// Columns owned by the enemy zone, counted back from the last column.
    pub enemy_cols: u32,
    /// Total number of board columns.
    pub grid_cols: u32,
}

impl GridLayout {
    /// Default ally zone width.
    pub const DEFAULT_ALLY_COLS: u32 = 3;
    /// Default enemy zone width.
    pub const DEFAULT_ENEMY_COLS: u32 = 3;
    /// Default board width, leaving one neutral column.
    pub const DEFAULT_GRID_COLS: u32 = 7;

    /// Creates a layout without validating it.
    #[must_use]
    pub const fn new(ally_cols: u32, enemy_cols: u32, grid_cols: u32) -> Self {
        Self {
            ally_cols,
            enemy_cols,
            grid_cols,
        }
    }

    /// First column owned by the enemy zone.
    #[must_use]
    pub const fn enemy_start(&self) -> u32 {
        self.grid_cols.saturating_sub(self.enemy_cols)
    }

    /// Number of columns owned by `side`.
    #[must_use]
    pub const fn columns(&self, side: Side) -> u32 {
        match side {
            Side::Ally => self.ally_cols,
            Side::Enemy => self.enemy_cols,
        }
    }

    /// Checks that both zones are between one and three columns wide and fit
    /// on the board without overlapping.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for side in Side::ALL {
            let columns = self.columns(side);
            if columns == 0 || columns > GRID_ROWS {
                return Err(ConfigError::ZoneWidth { side, columns });
            }
        }
        if self.ally_cols + self.enemy_cols > self.grid_cols {
            return Err(ConfigError::ZonesOverlap {
                ally_cols: self.ally_cols,
                enemy_cols: self.enemy_cols,
                grid_cols: self.grid_cols,
            });
        }
        Ok(())
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ALLY_COLS,
            Self::DEFAULT_ENEMY_COLS,
            Self::DEFAULT_GRID_COLS,
        )
    }
}
