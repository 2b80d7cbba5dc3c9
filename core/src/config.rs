//! Typed battle configuration.
//!
//! Every field is optional. Lookups walk a fixed chain of keys and end at a
//! hardcoded default, so a partial or empty file is always usable. Values
//! that are present but not finite are treated as missing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{to_finite_number, GridLayout, Side};

/// Fury ceiling used when neither a unit override nor a global maximum is set.
pub const DEFAULT_FURY_MAX: f64 = 100.0;
/// Per-turn gain cap used when no turn cap key is configured.
pub const DEFAULT_TURN_CAP: f64 = 40.0;
/// Per-skill gain cap used when no skill cap key is configured.
pub const DEFAULT_SKILL_CAP: f64 = 30.0;
/// Per-hit gain cap used when no hit cap key is configured.
pub const DEFAULT_HIT_CAP: f64 = 20.0;
/// Flat drain applied to each target before the percentage component.
pub const DEFAULT_DRAIN_BASE: f64 = 5.0;
/// Share of the target's current fury drained on top of the flat amount.
pub const DEFAULT_DRAIN_PCT: f64 = 0.1;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("could not parse configuration toml: {0}")]
    Toml(#[from] toml::de::Error),
    /// The JSON document could not be parsed.
    #[error("could not parse configuration json: {0}")]
    Json(#[from] serde_json::Error),
    /// A zone is narrower than one column or wider than three.
    #[error("{side:?} zone must span 1..=3 columns, got {columns}")]
    ZoneWidth {
        /// Side whose zone is malformed.
        side: Side,
        /// Configured zone width.
        columns: u32,
    },
    /// The two zones do not fit on the board side by side.
    #[error("ally ({ally_cols}) and enemy ({enemy_cols}) zones exceed {grid_cols} columns")]
    ZonesOverlap {
        /// Configured ally zone width.
        ally_cols: u32,
        /// Configured enemy zone width.
        enemy_cols: u32,
        /// Configured board width.
        grid_cols: u32,
    },
}

/// Top-level configuration document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcluneConfig {
    /// Board column split.
    pub grid: GridLayout,
    /// Fury tuning.
    pub fury: FuryConfig,
}

impl ArcluneConfig {
    /// Parses and validates a TOML configuration document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.grid.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(contents)?;
        config.grid.validate()?;
        Ok(config)
    }
}

/// Fury tuning, mirroring the `fury.*` configuration paths.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FuryConfig {
    /// Global fury ceiling.
    pub max: Option<f64>,
    /// Per-unit fury ceilings keyed by unit id.
    pub special_max: BTreeMap<String, f64>,
    /// Preferred per-turn gain cap key.
    pub turn_cap: Option<f64>,
    /// Preferred per-skill gain cap key.
    pub skill_cap: Option<f64>,
    /// Preferred per-hit gain cap key.
    pub hit_cap: Option<f64>,
    /// Grouped cap table, consulted after the flat keys.
    pub caps: CapTable,
    /// Legacy `fury.turn.cap` location.
    pub turn: ScopeCap,
    /// Legacy `fury.skill.cap` location.
    pub skill: ScopeCap,
    /// Legacy `fury.hit.cap` location.
    pub hit: ScopeCap,
    /// Gain amounts per event type.
    pub gain: GainTable,
    /// Drain tuning.
    pub drain: DrainTable,
    /// Default ultimate cost.
    pub ult_cost: Option<f64>,
    /// Per-unit ultimate costs keyed by unit id.
    pub special_ult_cost: BTreeMap<String, f64>,
}

/// Grouped cap keys under `fury.caps`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CapTable {
    /// Cap on fury gained within one turn.
    pub per_turn: Option<f64>,
    /// Cap on fury gained within one skill cast.
    pub per_skill: Option<f64>,
    /// Cap on fury gained within one hit.
    pub per_hit: Option<f64>,
}

/// Legacy `{ cap = .. }` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeCap {
    /// Cap for the enclosing scope.
    pub cap: Option<f64>,
}

/// Gain amounts keyed by gain type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GainTable {
    /// Flat gain when a unit's turn begins.
    pub turn_start: TurnStartGain,
    /// Gain for dealing damage to a single target.
    pub deal_single: GainRule,
    /// Gain for each target struck by an area attack.
    pub deal_aoe_per_target: GainRule,
    /// Gain for receiving damage.
    pub damage_taken: GainRule,
}

/// `fury.gain.turnStart`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnStartGain {
    /// Flat amount granted.
    pub amount: Option<f64>,
}

/// One row of the gain table. Missing fields take the row's defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GainRule {
    /// Base gain.
    pub base: Option<f64>,
    /// Extra gain on a critical strike.
    pub crit: Option<f64>,
    /// Extra gain on a kill.
    pub kill: Option<f64>,
    /// Multiplier applied to the share of max HP involved.
    pub scale: Option<f64>,
    /// Lower clamp applied before per-call bonuses.
    pub min: Option<f64>,
    /// Upper clamp applied before per-call bonuses.
    pub max: Option<f64>,
}

/// A gain rule with every field resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedGainRule {
    /// Base gain.
    pub base: f64,
    /// Extra gain on a critical strike.
    pub crit: f64,
    /// Extra gain on a kill.
    pub kill: f64,
    /// Multiplier applied to the share of max HP involved.
    pub scale: f64,
    /// Lower clamp.
    pub min: f64,
    /// Upper clamp.
    pub max: f64,
}

impl ResolvedGainRule {
    const DEAL_SINGLE: Self = Self {
        base: 6.0,
        crit: 2.0,
        kill: 4.0,
        scale: 0.0,
        min: 0.0,
        max: 20.0,
    };

    const DEAL_AOE_PER_TARGET: Self = Self {
        base: 2.0,
        crit: 1.0,
        kill: 2.0,
        scale: 0.0,
        min: 0.0,
        max: 12.0,
    };

    const DAMAGE_TAKEN: Self = Self {
        base: 1.0,
        crit: 0.0,
        kill: 0.0,
        scale: 10.0,
        min: 1.0,
        max: 8.0,
    };

    /// Clamps `value` into `[min, max]`, tolerating an inverted range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max.max(self.min))
    }
}

impl GainRule {
    fn resolve(&self, defaults: ResolvedGainRule) -> ResolvedGainRule {
        ResolvedGainRule {
            base: finite_or(self.base, defaults.base),
            crit: finite_or(self.crit, defaults.crit),
            kill: finite_or(self.kill, defaults.kill),
            scale: finite_or(self.scale, defaults.scale),
            min: finite_or(self.min, defaults.min),
            max: finite_or(self.max, defaults.max),
        }
    }
}

/// `fury.drain`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DrainTable {
    /// Flat amount drained from each target.
    pub per_target_base: Option<f64>,
    /// Share of the target's current fury drained.
    pub per_target_pct: Option<f64>,
    /// Cap on fury one source may drain within one skill cast.
    pub skill_total_cap: Option<f64>,
}

impl FuryConfig {
    /// Fury ceiling for `unit_id`: unit override, then global maximum, then
    /// 100. Floored to an integer of at least one.
    #[must_use]
    pub fn resolve_max(&self, unit_id: &str) -> u32 {
        let raw = first_finite([self.special_max.get(unit_id).copied(), self.max])
            .unwrap_or(DEFAULT_FURY_MAX);
        to_count(raw.floor()).max(1)
    }

    /// Per-turn gain cap.
    #[must_use]
    pub fn turn_cap(&self) -> f64 {
        first_finite([self.turn_cap, self.caps.per_turn, self.turn.cap])
            .unwrap_or(DEFAULT_TURN_CAP)
            .max(0.0)
    }

    /// Per-skill gain cap.
    #[must_use]
    pub fn skill_cap(&self) -> f64 {
        first_finite([self.skill_cap, self.caps.per_skill, self.skill.cap])
            .unwrap_or(DEFAULT_SKILL_CAP)
            .max(0.0)
    }

    /// Per-hit gain cap.
    #[must_use]
    pub fn hit_cap(&self) -> f64 {
        first_finite([self.hit_cap, self.caps.per_hit, self.hit.cap])
            .unwrap_or(DEFAULT_HIT_CAP)
            .max(0.0)
    }

    /// Flat turn-start gain.
    #[must_use]
    pub fn turn_start_gain(&self) -> f64 {
        finite_or(self.gain.turn_start.amount, 3.0)
    }

    /// Single-target damage gain row.
    #[must_use]
    pub fn deal_single(&self) -> ResolvedGainRule {
        self.gain.deal_single.resolve(ResolvedGainRule::DEAL_SINGLE)
    }

    /// Area damage per-target gain row.
    #[must_use]
    pub fn deal_aoe_per_target(&self) -> ResolvedGainRule {
        self.gain
            .deal_aoe_per_target
            .resolve(ResolvedGainRule::DEAL_AOE_PER_TARGET)
    }

    /// Damage-taken gain row.
    #[must_use]
    pub fn damage_taken(&self) -> ResolvedGainRule {
        self.gain.damage_taken.resolve(ResolvedGainRule::DAMAGE_TAKEN)
    }

    /// Flat drain per target.
    #[must_use]
    pub fn drain_base(&self) -> f64 {
        finite_or(self.drain.per_target_base, DEFAULT_DRAIN_BASE)
    }

    /// Proportional drain per target.
    #[must_use]
    pub fn drain_pct(&self) -> f64 {
        finite_or(self.drain.per_target_pct, DEFAULT_DRAIN_PCT)
    }

    /// Cap on fury drained by one source within one skill, when configured.
    #[must_use]
    pub fn drain_skill_total_cap(&self) -> Option<f64> {
        first_finite([self.drain.skill_total_cap])
    }

    /// Configured ultimate cost for `unit_id`, if any.
    #[must_use]
    pub fn ult_cost(&self, unit_id: &str) -> Option<f64> {
        first_finite([self.special_ult_cost.get(unit_id).copied(), self.ult_cost])
    }
}

fn first_finite<const N: usize>(candidates: [Option<f64>; N]) -> Option<f64> {
    candidates
        .into_iter()
        .flatten()
        .find(|value| value.is_finite())
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    to_finite_number(value.unwrap_or(fallback), fallback)
}

/// Converts a non-negative float to a counter, saturating at the bounds.
#[must_use]
pub fn to_count(value: f64) -> u32 {
    let value = to_finite_number(value, 0.0);
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        value as u32
    }
}
