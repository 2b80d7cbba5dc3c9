//! Per-unit fury record and its lifecycle markers.

use serde::{Deserialize, Serialize};

/// Identifies one turn. Re-entering a turn with the same stamp keeps its gain
/// counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnStamp(pub u64);

/// Identifies one skill cast. Repeated skill starts with the same tag share a
/// budget.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillTag(String);

impl SkillTag {
    /// Creates a tag from any string-like value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Borrowed tag text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Game-loop timestamp recorded for diagnostics only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Tick(pub u64);

/// Position of a unit in the turn → skill → hit lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FuryPhase {
    /// No turn has started since the unit was created.
    #[default]
    Idle,
    /// The unit's turn is open and no skill is resolving.
    TurnActive,
    /// A skill is resolving; hits may be finished one at a time.
    SkillActive,
}

/// Fury resource and rate-limit counters owned by one unit.
///
/// `fury` always lies within `0..=fury_max`. The legacy `rage` name is
/// accepted when deserializing and exposed through [`FuryState::rage`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuryState {
    #[serde(alias = "rage")]
    pub(crate) fury: u32,
    pub(crate) fury_max: u32,
    pub(crate) turn_gain: u32,
    pub(crate) skill_gain: u32,
    pub(crate) hit_gain: u32,
    pub(crate) skill_per_target_gain: u32,
    pub(crate) skill_drain: u32,
    pub(crate) turn_stamp: Option<TurnStamp>,
    pub(crate) skill_tag: Option<SkillTag>,
    pub(crate) fresh_summon: bool,
    pub(crate) last_start: Option<Tick>,
    #[serde(default)]
    pub(crate) phase: FuryPhase,
}

impl FuryState {
    /// Creates a fresh record with the given ceiling and starting value.
    ///
    /// The ceiling is raised to at least one and the starting value clamped
    /// into range. The record starts idle and marked as a fresh summon.
    #[must_use]
    pub fn new(fury_max: u32, initial: u32) -> Self {
        let fury_max = fury_max.max(1);
        Self {
            fury: initial.min(fury_max),
            fury_max,
            turn_gain: 0,
            skill_gain: 0,
            hit_gain: 0,
            skill_per_target_gain: 0,
            skill_drain: 0,
            turn_stamp: None,
            skill_tag: None,
            fresh_summon: true,
            last_start: None,
            phase: FuryPhase::Idle,
        }
    }

    /// Current fury.
    #[must_use]
    pub const fn fury(&self) -> u32 {
        self.fury
    }

    /// Alias of [`Self::fury`] kept for callers using the older name.
    #[must_use]
    pub const fn rage(&self) -> u32 {
        self.fury
    }

    /// Fury ceiling.
    #[must_use]
    pub const fn fury_max(&self) -> u32 {
        self.fury_max
    }

    /// Headroom below the ceiling.
    #[must_use]
    pub const fn room(&self) -> u32 {
        self.fury_max.saturating_sub(self.fury)
    }

    /// Fury gained since the current turn began.
    #[must_use]
    pub const fn turn_gain(&self) -> u32 {
        self.turn_gain
    }

    /// Fury gained since the current skill began.
    #[must_use]
    pub const fn skill_gain(&self) -> u32 {
        self.skill_gain
    }

    /// Fury gained during the current hit.
    #[must_use]
    pub const fn hit_gain(&self) -> u32 {
        self.hit_gain
    }

    /// Area-attack fury credited during the current skill.
    #[must_use]
    pub const fn skill_per_target_gain(&self) -> u32 {
        self.skill_per_target_gain
    }

    /// Fury this unit has drained from others during the current skill.
    #[must_use]
    pub const fn skill_drain(&self) -> u32 {
        self.skill_drain
    }

    /// Stamp of the turn the counters belong to.
    #[must_use]
    pub const fn turn_stamp(&self) -> Option<TurnStamp> {
        self.turn_stamp
    }

    /// Tag of the skill the counters belong to.
    #[must_use]
    pub fn skill_tag(&self) -> Option<&SkillTag> {
        self.skill_tag.as_ref()
    }

    /// Whether the next drain against this unit will be ignored.
    #[must_use]
    pub const fn is_fresh_summon(&self) -> bool {
        self.fresh_summon
    }

    /// Tick of the last initialization or turn start.
    #[must_use]
    pub const fn last_start(&self) -> Option<Tick> {
        self.last_start
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> FuryPhase {
        self.phase
    }

    pub(crate) fn reset_skill_scope(&mut self) {
        self.skill_gain = 0;
        self.hit_gain = 0;
        self.skill_per_target_gain = 0;
        self.skill_drain = 0;
    }

    pub(crate) fn record_gain(&mut self, amount: u32) {
        self.fury = self.fury.saturating_add(amount).min(self.fury_max);
        self.turn_gain = self.turn_gain.saturating_add(amount);
        self.skill_gain = self.skill_gain.saturating_add(amount);
        self.hit_gain = self.hit_gain.saturating_add(amount);
    }

    pub(crate) fn set_fury(&mut self, value: u32) {
        self.fury = value.min(self.fury_max);
    }
}

impl Default for FuryState {
    fn default() -> Self {
        let mut state = Self::new(100, 0);
        state.fresh_summon = false;
        state
    }
}

/// Unit record that owns a [`FuryState`].
pub trait FuryHolder {
    /// Borrowed fury record.
    fn fury_state(&self) -> &FuryState;

    /// Mutable fury record.
    fn fury_state_mut(&mut self) -> &mut FuryState;

    /// Fractional bonus applied to capped gains, `0.25` meaning +25%.
    fn fury_gain_bonus(&self) -> f64 {
        0.0
    }
}

impl FuryHolder for FuryState {
    fn fury_state(&self) -> &FuryState {
        self
    }

    fn fury_state_mut(&mut self) -> &mut FuryState {
        self
    }
}
