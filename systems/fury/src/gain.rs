//! Translation of gain requests into desired fury amounts.

use arclune_core::{to_finite_number, FuryConfig};

/// Event that earns fury.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GainKind {
    /// The unit's own turn began.
    TurnStart,
    /// The unit dealt damage.
    Deal {
        /// Number of targets struck.
        targets: u32,
        /// Number of strikes that were critical.
        crits: u32,
        /// Number of targets killed.
        kills: u32,
        /// Treat the attack as an area attack even with a single target.
        aoe: bool,
    },
    /// The unit received damage.
    DamageTaken {
        /// Damage received.
        damage: f64,
        /// The unit's maximum HP, used to express damage as a share.
        max_hp: f64,
    },
    /// Untyped gain; yields nothing unless an explicit amount is set.
    Generic,
}

/// A request to grant fury.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GainSpec {
    /// Event that earns the fury.
    pub kind: GainKind,
    /// Explicit amount replacing the table lookup.
    pub amount: Option<f64>,
    /// Flat amount added after the table clamp.
    pub bonus: f64,
    /// Multiplier applied after the bonus.
    pub multiplier: f64,
}

impl GainSpec {
    /// Gain for `kind` using the configured table.
    #[must_use]
    pub const fn of(kind: GainKind) -> Self {
        Self {
            kind,
            amount: None,
            bonus: 0.0,
            multiplier: 1.0,
        }
    }

    /// Explicit gain bypassing the table.
    #[must_use]
    pub const fn amount(amount: f64) -> Self {
        Self {
            kind: GainKind::Generic,
            amount: Some(amount),
            bonus: 0.0,
            multiplier: 1.0,
        }
    }

    /// Gain granted when a turn opens.
    #[must_use]
    pub const fn turn_start() -> Self {
        Self::of(GainKind::TurnStart)
    }

    /// Gain for striking a single target.
    #[must_use]
    pub const fn deal_single(crit: bool, kill: bool) -> Self {
        Self::of(GainKind::Deal {
            targets: 1,
            crits: crit as u32,
            kills: kill as u32,
            aoe: false,
        })
    }

    /// Gain for an area attack.
    #[must_use]
    pub const fn deal_aoe(targets: u32, crits: u32, kills: u32) -> Self {
        Self::of(GainKind::Deal {
            targets,
            crits,
            kills,
            aoe: true,
        })
    }

    /// Gain for receiving `damage` out of `max_hp`.
    #[must_use]
    pub const fn damage_taken(damage: f64, max_hp: f64) -> Self {
        Self::of(GainKind::DamageTaken { damage, max_hp })
    }

    /// Sets the flat bonus.
    #[must_use]
    pub fn with_bonus(mut self, bonus: f64) -> Self {
        self.bonus = bonus;
        self
    }

    /// Sets the multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }
}

/// Desired gain before scope caps, split into the share credited to area
/// attacks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct DesiredGain {
    pub(crate) total: f64,
    pub(crate) per_target: f64,
}

pub(crate) fn resolve(spec: &GainSpec, config: &FuryConfig) -> DesiredGain {
    let (base, aoe) = match spec.amount {
        Some(amount) => (to_finite_number(amount, 0.0), false),
        None => table_amount(spec.kind, config),
    };
    let bonus = to_finite_number(spec.bonus, 0.0);
    let multiplier = to_finite_number(spec.multiplier, 1.0);
    let total = ((base + bonus) * multiplier).max(0.0);
    DesiredGain {
        total,
        per_target: if aoe { total } else { 0.0 },
    }
}

fn table_amount(kind: GainKind, config: &FuryConfig) -> (f64, bool) {
    match kind {
        GainKind::TurnStart => (config.turn_start_gain(), false),
        GainKind::Deal {
            targets,
            crits,
            kills,
            aoe,
        } => {
            if aoe || targets > 1 {
                let rule = config.deal_aoe_per_target();
                let amount = rule.base * f64::from(targets.max(1))
                    + rule.crit * f64::from(crits)
                    + rule.kill * f64::from(kills);
                (rule.clamp(amount), true)
            } else {
                let rule = config.deal_single();
                let mut amount = rule.base;
                if crits > 0 {
                    amount += rule.crit;
                }
                if kills > 0 {
                    amount += rule.kill;
                }
                (rule.clamp(amount), false)
            }
        }
        GainKind::DamageTaken { damage, max_hp } => {
            let rule = config.damage_taken();
            let damage = to_finite_number(damage, 0.0).max(0.0);
            let max_hp = to_finite_number(max_hp, 0.0);
            let share = if max_hp > 0.0 {
                (damage / max_hp).min(1.0)
            } else {
                0.0
            };
            (rule.clamp(rule.base + (share * rule.scale).round()), false)
        }
        GainKind::Generic => (0.0, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_amount_skips_the_table() {
        let desired = resolve(&GainSpec::amount(150.0), &FuryConfig::default());
        assert_eq!(desired.total, 150.0);
        assert_eq!(desired.per_target, 0.0);
    }

    #[test]
    fn single_target_adds_crit_and_kill() {
        let config = FuryConfig::default();
        assert_eq!(resolve(&GainSpec::deal_single(false, false), &config).total, 6.0);
        assert_eq!(resolve(&GainSpec::deal_single(true, true), &config).total, 12.0);
    }

    #[test]
    fn area_gain_counts_per_target_and_clamps() {
        let config = FuryConfig::default();
        let three = resolve(&GainSpec::deal_aoe(3, 1, 0), &config);
        assert_eq!(three.total, 7.0);
        assert_eq!(three.per_target, 7.0);

        let huge = resolve(&GainSpec::deal_aoe(20, 5, 5), &config);
        assert_eq!(huge.total, 12.0);
    }

    #[test]
    fn damage_taken_scales_with_hp_share() {
        let config = FuryConfig::default();
        assert_eq!(resolve(&GainSpec::damage_taken(50.0, 100.0), &config).total, 6.0);
        assert_eq!(resolve(&GainSpec::damage_taken(0.0, 100.0), &config).total, 1.0);
        assert_eq!(resolve(&GainSpec::damage_taken(10.0, 0.0), &config).total, 1.0);
        assert_eq!(resolve(&GainSpec::damage_taken(900.0, 100.0), &config).total, 8.0);
    }

    #[test]
    fn bonus_and_multiplier_apply_after_clamp() {
        let spec = GainSpec::deal_single(false, false)
            .with_bonus(4.0)
            .with_multiplier(2.0);
        assert_eq!(resolve(&spec, &FuryConfig::default()).total, 20.0);
    }

    #[test]
    fn garbage_numbers_collapse_to_zero() {
        let spec = GainSpec::amount(f64::NAN).with_bonus(f64::INFINITY);
        assert_eq!(resolve(&spec, &FuryConfig::default()).total, 0.0);
        assert_eq!(resolve(&GainSpec::of(GainKind::Generic), &FuryConfig::default()).total, 0.0);
    }
}
