#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fury resource engine for Arclune combatants.
//!
//! Each unit owns a [`FuryState`] that rises when the unit acts or is hit and
//! falls when it casts or is drained. Gains are bounded by three independent
//! budgets: one per turn, one per skill cast and one per hit. The budgets are
//! scoped by the lifecycle hooks the game loop calls in nested order:
//! [`FuryEngine::start_turn`], [`FuryEngine::start_skill`], then
//! [`finish_fury_hit`] after each hit and [`finish_fury_skill`] at the end of
//! the cast.
//!
//! Gameplay entry points never fail. A missing unit is a no-op that returns
//! zero and non-finite numbers are read as zero. Only out-of-order lifecycle
//! calls report a [`LifecycleError`], and they leave the state untouched.

use arclune_core::{config::to_count, to_finite_number, FuryConfig};
use thiserror::Error;
use tracing::{debug, warn};

mod gain;
mod state;

pub use gain::{GainKind, GainSpec};
pub use state::{FuryHolder, FuryPhase, FuryState, SkillTag, Tick, TurnStamp};

use gain::DesiredGain;

/// Most fury a unit may be credited from area attacks within one skill.
pub const AOE_SKILL_CEILING: u32 = 12;

/// Rejected out-of-order lifecycle call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// A hit or skill was finished while no skill was resolving.
    #[error("{operation} requires an active skill, unit is {phase:?}")]
    NoActiveSkill {
        /// Lifecycle call that was rejected.
        operation: &'static str,
        /// Phase the unit was in.
        phase: FuryPhase,
    },
}

/// Parameters for opening a unit's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TurnStart {
    /// Identifies the turn; re-entering with the same stamp keeps the turn
    /// gain counter.
    pub stamp: TurnStamp,
    /// Game-loop time of the turn start.
    pub at: Tick,
    /// Grant the configured turn-start gain.
    pub grant_start: bool,
    /// Clear the fresh-summon drain immunity.
    pub clear_fresh: bool,
}

impl TurnStart {
    /// Opens turn `stamp` with the default options.
    #[must_use]
    pub const fn new(stamp: TurnStamp, at: Tick) -> Self {
        Self {
            stamp,
            at,
            grant_start: true,
            clear_fresh: true,
        }
    }

    /// Skips the turn-start gain.
    #[must_use]
    pub const fn without_start_gain(mut self) -> Self {
        self.grant_start = false;
        self
    }

    /// Keeps the fresh-summon drain immunity.
    #[must_use]
    pub const fn keep_fresh(mut self) -> Self {
        self.clear_fresh = false;
        self
    }
}

/// Parameters for opening a skill cast.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkillStart {
    /// Identifies the cast; repeated starts with the same tag share budgets.
    pub tag: SkillTag,
    /// Reset the skill budgets even when the tag is unchanged.
    pub force_reset: bool,
}

impl SkillStart {
    /// Opens the cast identified by `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: SkillTag::new(tag),
            force_reset: false,
        }
    }

    /// Forces the skill budgets to reset.
    #[must_use]
    pub fn forced(mut self) -> Self {
        self.force_reset = true;
        self
    }
}

/// Per-call drain overrides. Unset fields fall back to configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrainOptions {
    /// Flat amount drained.
    pub base: Option<f64>,
    /// Share of the target's current fury drained.
    pub percent: Option<f64>,
    /// Cap on fury the source may drain within its current skill.
    pub skill_total_cap: Option<f64>,
}

/// Applies fury rules using an explicitly supplied configuration.
#[derive(Clone, Debug, Default)]
pub struct FuryEngine {
    config: FuryConfig,
}

impl FuryEngine {
    /// Creates an engine reading the provided tuning.
    #[must_use]
    pub fn new(config: FuryConfig) -> Self {
        Self { config }
    }

    /// Tuning the engine reads.
    #[must_use]
    pub fn config(&self) -> &FuryConfig {
        &self.config
    }

    /// Fury ceiling for `unit_id`.
    #[must_use]
    pub fn resolve_max_fury(&self, unit_id: &str) -> u32 {
        self.config.resolve_max(unit_id)
    }

    /// Fury needed to cast `unit_id`'s ultimate: unit override, then the
    /// configured default, then the unit's own ceiling.
    #[must_use]
    pub fn resolve_ult_cost<U: FuryHolder>(&self, unit: Option<&U>, unit_id: &str) -> u32 {
        match self.config.ult_cost(unit_id) {
            Some(cost) => to_count(cost.floor()),
            None => unit.map_or_else(
                || self.resolve_max_fury(unit_id),
                |unit| unit.fury_state().fury_max(),
            ),
        }
    }

    /// Whether the unit holds enough fury for its ultimate.
    #[must_use]
    pub fn can_cast_ultimate<U: FuryHolder>(&self, unit: Option<&U>, unit_id: &str) -> bool {
        unit.is_some_and(|holder| {
            holder.fury_state().fury() >= self.resolve_ult_cost(Some(holder), unit_id)
        })
    }

    /// Installs a fresh fury record on a newly spawned unit and returns its
    /// starting fury.
    pub fn initialize<U: FuryHolder>(
        &self,
        unit: Option<&mut U>,
        unit_id: &str,
        initial: f64,
        at: Tick,
    ) -> u32 {
        let Some(unit) = unit else {
            return 0;
        };
        let mut state = FuryState::new(self.resolve_max_fury(unit_id), 0);
        state.set_fury(to_count(to_finite_number(initial, 0.0).floor()));
        state.last_start = Some(at);
        debug!(unit_id, fury = state.fury, fury_max = state.fury_max, "fury initialized");
        let fury = state.fury;
        *unit.fury_state_mut() = state;
        fury
    }

    /// Opens the unit's turn and returns the turn-start gain granted.
    ///
    /// The turn gain counter only resets when `turn.stamp` differs from the
    /// stored stamp. Skill and hit budgets always reset.
    pub fn start_turn<U: FuryHolder>(&self, unit: Option<&mut U>, turn: TurnStart) -> u32 {
        let Some(unit) = unit else {
            return 0;
        };
        {
            let state = unit.fury_state_mut();
            if state.turn_stamp != Some(turn.stamp) {
                state.turn_gain = 0;
                state.turn_stamp = Some(turn.stamp);
            }
            state.reset_skill_scope();
            state.skill_tag = None;
            state.phase = FuryPhase::TurnActive;
            state.last_start = Some(turn.at);
            if turn.clear_fresh {
                state.fresh_summon = false;
            }
            debug!(stamp = turn.stamp.0, turn_gain = state.turn_gain, "fury turn started");
        }
        if turn.grant_start {
            self.gain(Some(unit), &GainSpec::turn_start())
        } else {
            0
        }
    }

    /// Opens a skill cast. Budgets reset only when the tag changes or the
    /// reset is forced, so per-hit calls within one cast share a budget.
    pub fn start_skill<U: FuryHolder>(&self, unit: Option<&mut U>, skill: SkillStart) {
        let Some(unit) = unit else {
            return;
        };
        let state = unit.fury_state_mut();
        if state.phase == FuryPhase::Idle {
            debug!(tag = skill.tag.as_str(), "skill started before the unit's first turn");
        }
        if skill.force_reset || state.skill_tag.as_ref() != Some(&skill.tag) {
            state.reset_skill_scope();
            state.skill_tag = Some(skill.tag);
        }
        state.phase = FuryPhase::SkillActive;
    }

    /// Grants fury and returns the amount actually applied.
    pub fn gain<U: FuryHolder>(&self, unit: Option<&mut U>, spec: &GainSpec) -> u32 {
        let Some(unit) = unit else {
            return 0;
        };
        let bonus = to_finite_number(unit.fury_gain_bonus(), 0.0);
        let desired = gain::resolve(spec, &self.config);
        self.apply_gain(unit.fury_state_mut(), desired, bonus)
    }

    /// Removes fury from `target` on behalf of `source` and returns the
    /// amount drained.
    ///
    /// A fresh summon ignores the first drain aimed at it. The optional skill
    /// cap is tracked on the source, so one caster cannot stack several drains
    /// to empty a target within a single cast.
    pub fn drain<S: FuryHolder, T: FuryHolder>(
        &self,
        source: Option<&mut S>,
        target: Option<&mut T>,
        options: &DrainOptions,
    ) -> u32 {
        let Some(target) = target else {
            return 0;
        };
        let target = target.fury_state_mut();
        if target.fresh_summon {
            target.fresh_summon = false;
            debug!("fresh summon ignored a drain");
            return 0;
        }

        let base = finite_option(options.base, self.config.drain_base()).max(0.0);
        let percent = finite_option(options.percent, self.config.drain_pct()).max(0.0);
        let mut desired = base + (f64::from(target.fury) * percent).round();

        let mut source = source.map(FuryHolder::fury_state_mut);
        let cap = options
            .skill_total_cap
            .filter(|cap| cap.is_finite())
            .or_else(|| self.config.drain_skill_total_cap());
        if let Some(cap) = cap {
            let used = source.as_deref().map_or(0, |state| state.skill_drain);
            desired = desired.min((cap.floor() - f64::from(used)).max(0.0));
        }

        let drained = to_count(desired.round()).min(target.fury);
        target.fury -= drained;
        if let Some(source) = source.as_deref_mut() {
            source.skill_drain = source.skill_drain.saturating_add(drained);
        }
        drained
    }

    fn apply_gain(&self, state: &mut FuryState, desired: DesiredGain, unit_bonus: f64) -> u32 {
        let mut total = desired.total;
        let mut per_target = desired.per_target;
        if per_target > 0.0 {
            let aoe_room =
                f64::from(AOE_SKILL_CEILING.saturating_sub(state.skill_per_target_gain));
            if per_target > aoe_room {
                total -= per_target - aoe_room;
                per_target = aoe_room;
            }
        }
        if total <= 0.0 {
            return 0;
        }

        let room = self.scope_room(state);
        if room <= 0.0 {
            debug!(phase = ?state.phase, "fury gain blocked by exhausted cap");
            return 0;
        }
        let capped = total.min(room);

        let boosted = capped * (1.0 + unit_bonus).max(0.0);
        let applied = to_count(boosted.round()).min(state.room());
        state.record_gain(applied);

        if per_target > 0.0 && applied > 0 {
            let ratio = (f64::from(applied) / total).min(1.0);
            let remaining = AOE_SKILL_CEILING.saturating_sub(state.skill_per_target_gain);
            let credited = to_count((per_target * ratio).round()).min(remaining);
            state.skill_per_target_gain += credited;
        }
        applied
    }

    /// Remaining gain budget: the tightest of the turn, skill and hit caps.
    fn scope_room(&self, state: &FuryState) -> f64 {
        let room = |cap: f64, used: u32| cap.floor() - f64::from(used);
        room(self.config.turn_cap(), state.turn_gain)
            .min(room(self.config.skill_cap(), state.skill_gain))
            .min(room(self.config.hit_cap(), state.hit_gain))
    }
}

/// Closes one hit of a multi-hit skill, opening a fresh per-hit budget.
pub fn finish_fury_hit<U: FuryHolder>(unit: Option<&mut U>) -> Result<(), LifecycleError> {
    let Some(unit) = unit else {
        return Ok(());
    };
    let state = unit.fury_state_mut();
    require_skill(state, "finish_fury_hit")?;
    state.hit_gain = 0;
    Ok(())
}

/// Closes the current skill cast and returns the unit to its open turn.
pub fn finish_fury_skill<U: FuryHolder>(unit: Option<&mut U>) -> Result<(), LifecycleError> {
    let Some(unit) = unit else {
        return Ok(());
    };
    let state = unit.fury_state_mut();
    require_skill(state, "finish_fury_skill")?;
    state.skill_tag = None;
    state.phase = FuryPhase::TurnActive;
    Ok(())
}

fn require_skill(state: &FuryState, operation: &'static str) -> Result<(), LifecycleError> {
    if state.phase == FuryPhase::SkillActive {
        Ok(())
    } else {
        warn!(operation, phase = ?state.phase, "lifecycle call rejected outside a skill");
        Err(LifecycleError::NoActiveSkill {
            operation,
            phase: state.phase,
        })
    }
}

/// Removes up to `amount` fury and returns what was actually removed.
pub fn spend_fury<U: FuryHolder>(unit: Option<&mut U>, amount: f64) -> u32 {
    let Some(unit) = unit else {
        return 0;
    };
    let state = unit.fury_state_mut();
    let spent = to_count(to_finite_number(amount, 0.0).round()).min(state.fury);
    state.fury -= spent;
    spent
}

/// Overwrites the unit's fury, clamped to its ceiling, and returns the
/// stored value.
pub fn set_fury<U: FuryHolder>(unit: Option<&mut U>, value: f64) -> u32 {
    let Some(unit) = unit else {
        return 0;
    };
    let state = unit.fury_state_mut();
    state.set_fury(to_count(to_finite_number(value, 0.0).floor()));
    state.fury
}

/// Current fury, or zero for a missing unit.
#[must_use]
pub fn fury_value<U: FuryHolder>(unit: Option<&U>) -> u32 {
    unit.map_or(0, |unit| unit.fury_state().fury())
}

/// Headroom below the ceiling, or zero for a missing unit.
#[must_use]
pub fn fury_room<U: FuryHolder>(unit: Option<&U>) -> u32 {
    unit.map_or(0, |unit| unit.fury_state().room())
}

/// Read-only fury record.
#[must_use]
pub fn fury_state<U: FuryHolder>(unit: Option<&U>) -> Option<&FuryState> {
    unit.map(FuryHolder::fury_state)
}

fn finite_option(value: Option<f64>, fallback: f64) -> f64 {
    value.map_or(fallback, |value| to_finite_number(value, fallback))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh(engine: &FuryEngine, initial: f64) -> FuryState {
        let mut state = FuryState::default();
        let _ = engine.initialize(Some(&mut state), "unit", initial, Tick(0));
        state
    }

    fn wide_caps() -> FuryConfig {
        FuryConfig {
            turn_cap: Some(150.0),
            skill_cap: Some(150.0),
            hit_cap: Some(150.0),
            ..FuryConfig::default()
        }
    }

    #[test]
    fn gain_beyond_the_ceiling_records_only_the_applied_delta() {
        let engine = FuryEngine::new(wide_caps());
        let mut unit = fresh(&engine, 0.0);

        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::amount(150.0)), 100);
        assert_eq!(unit.fury(), 100);
        assert_eq!(unit.turn_gain(), 100);
    }

    #[test]
    fn hit_cap_binds_before_any_turn_opens() {
        let engine = FuryEngine::default();
        let mut unit = fresh(&engine, 0.0);

        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::amount(50.0)), 20);
        let more: u32 = (0..20)
            .map(|_| engine.gain(Some(&mut unit), &GainSpec::damage_taken(100.0, 100.0)))
            .sum();
        assert_eq!(more, 0);
        assert_eq!(unit.fury(), 20);
    }

    #[test]
    fn hit_cap_binds_right_after_turn_start() {
        let engine = FuryEngine::default();
        let mut unit = fresh(&engine, 0.0);
        let _ = engine.start_turn(
            Some(&mut unit),
            TurnStart::new(TurnStamp(1), Tick(1)).without_start_gain(),
        );

        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::amount(50.0)), 20);
        assert_eq!(unit.hit_gain(), 20);
    }

    #[test]
    fn skill_scope_applies_the_tightest_cap() {
        let engine = FuryEngine::default();
        let mut unit = fresh(&engine, 0.0);
        let _ = engine.start_turn(
            Some(&mut unit),
            TurnStart::new(TurnStamp(1), Tick(1)).without_start_gain(),
        );
        engine.start_skill(Some(&mut unit), SkillStart::new("slash"));

        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::amount(50.0)), 20);
        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::amount(50.0)), 0);
    }

    #[test]
    fn area_credit_stops_at_the_skill_ceiling() {
        let engine = FuryEngine::default();
        let mut unit = fresh(&engine, 0.0);
        let _ = engine.start_turn(
            Some(&mut unit),
            TurnStart::new(TurnStamp(1), Tick(1)).without_start_gain(),
        );
        engine.start_skill(Some(&mut unit), SkillStart::new("quake"));

        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::deal_aoe(4, 0, 0)), 8);
        finish_fury_hit(Some(&mut unit)).expect("skill is active");
        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::deal_aoe(4, 0, 0)), 4);
        assert_eq!(unit.skill_per_target_gain(), AOE_SKILL_CEILING);
        finish_fury_hit(Some(&mut unit)).expect("skill is active");
        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::deal_aoe(4, 0, 0)), 0);
        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::deal_single(false, false)), 6);
    }

    #[test]
    fn unit_bonus_scales_the_capped_amount() {
        struct Berserker {
            fury: FuryState,
        }

        impl FuryHolder for Berserker {
            fn fury_state(&self) -> &FuryState {
                &self.fury
            }

            fn fury_state_mut(&mut self) -> &mut FuryState {
                &mut self.fury
            }

            fn fury_gain_bonus(&self) -> f64 {
                0.5
            }
        }

        let engine = FuryEngine::default();
        let mut unit = Berserker {
            fury: fresh(&engine, 0.0),
        };
        let _ = engine.start_turn(
            Some(&mut unit),
            TurnStart::new(TurnStamp(1), Tick(1)).without_start_gain(),
        );
        engine.start_skill(Some(&mut unit), SkillStart::new("roar"));

        assert_eq!(engine.gain(Some(&mut unit), &GainSpec::amount(50.0)), 30);
        assert_eq!(unit.fury.hit_gain(), 30);
    }

    #[test]
    fn missing_units_are_no_ops() {
        let engine = FuryEngine::default();
        assert_eq!(engine.gain(None::<&mut FuryState>, &GainSpec::amount(5.0)), 0);
        assert_eq!(spend_fury(None::<&mut FuryState>, 5.0), 0);
        assert_eq!(set_fury(None::<&mut FuryState>, 5.0), 0);
        assert_eq!(fury_value(None::<&FuryState>), 0);
        assert!(fury_state(None::<&FuryState>).is_none());
        assert!(finish_fury_hit(None::<&mut FuryState>).is_ok());
        assert_eq!(
            engine.drain(
                None::<&mut FuryState>,
                None::<&mut FuryState>,
                &DrainOptions::default()
            ),
            0
        );
    }
}
