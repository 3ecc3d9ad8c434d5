//! Timed power-up effect state.
//!
//! One [`ActiveEffects`] resource per game session tracks which effects are
//! running and for how many more ticks. Re-collecting an active effect
//! extends it additively; the score multiplier also steps up to a capped
//! maximum. Expiry resets the kind-specific magnitude (multiplier back to
//! 1x, bullet tier back to 1).

use bevy::prelude::*;

use super::{
    SimStep,
    powerup::PowerUpKind,
    projectile::{FireControl, MAX_BULLET_TIER},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<ActiveEffects>();
    app.register_type::<ActiveEffects>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_effects);

    app.add_systems(
        FixedUpdate,
        tick_effects
            .in_set(SimStep::Timers)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Ticks added per collection of a timed power-up.
pub const EFFECT_DURATION_TICKS: u32 = 300;

/// Extra ticks granted when a weapon upgrade is collected at the tier cap.
const CAPPED_TIER_BONUS_TICKS: u32 = 150;

/// The score multiplier never exceeds this.
pub const MAX_SCORE_MULTIPLIER: u32 = 3;

/// One timed effect slot: active flag plus remaining duration in ticks.
#[derive(Debug, Default, Clone, Copy, Reflect)]
pub struct EffectTimer {
    pub active: bool,
    pub remaining: u32,
}

impl EffectTimer {
    /// Activate, stacking additively onto any remaining duration.
    fn extend(&mut self, ticks: u32) {
        self.active = true;
        self.remaining += ticks;
    }

    /// Advance one tick. Returns true on the tick the effect expires.
    fn tick(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.active = false;
            return true;
        }
        false
    }

    /// Immediately deactivate, e.g. a shield absorbing a hit.
    pub fn consume(&mut self) {
        self.active = false;
        self.remaining = 0;
    }
}

/// All timed power-up effects for the current session.
///
/// `ExtraLife` is immediate and untimed, so it has no slot here.
#[derive(Resource, Debug, Reflect)]
#[reflect(Resource)]
pub struct ActiveEffects {
    pub speed_boost: EffectTimer,
    pub weapon_upgrade: EffectTimer,
    pub shield: EffectTimer,
    pub score_multiplier: EffectTimer,
    /// Current score multiplier magnitude, always in `1..=MAX_SCORE_MULTIPLIER`.
    pub multiplier: u32,
    pub fire_rate: EffectTimer,
    pub auto_shoot: EffectTimer,
}

impl Default for ActiveEffects {
    fn default() -> Self {
        Self {
            speed_boost: EffectTimer::default(),
            weapon_upgrade: EffectTimer::default(),
            shield: EffectTimer::default(),
            score_multiplier: EffectTimer::default(),
            multiplier: 1,
            fire_rate: EffectTimer::default(),
            auto_shoot: EffectTimer::default(),
        }
    }
}

impl ActiveEffects {
    /// Apply one collected power-up. Kinds without a timed component
    /// (`ExtraLife`) are handled at the pickup site and ignored here.
    pub fn apply(&mut self, kind: PowerUpKind, fire: &mut FireControl) {
        match kind {
            PowerUpKind::ExtraLife => {}
            PowerUpKind::SpeedBoost => self.speed_boost.extend(EFFECT_DURATION_TICKS),
            PowerUpKind::WeaponUpgrade => {
                if fire.tier < MAX_BULLET_TIER {
                    fire.tier += 1;
                    self.weapon_upgrade.extend(EFFECT_DURATION_TICKS);
                } else {
                    // Already at the cap: trade the tier bump for bonus time.
                    self.weapon_upgrade
                        .extend(EFFECT_DURATION_TICKS + CAPPED_TIER_BONUS_TICKS);
                }
            }
            PowerUpKind::Shield => self.shield.extend(EFFECT_DURATION_TICKS),
            PowerUpKind::ScoreMultiplier => {
                self.multiplier = (self.multiplier + 1).min(MAX_SCORE_MULTIPLIER);
                self.score_multiplier.extend(EFFECT_DURATION_TICKS);
            }
            PowerUpKind::FireRateUpgrade => self.fire_rate.extend(EFFECT_DURATION_TICKS),
            PowerUpKind::AutoShoot => self.auto_shoot.extend(EFFECT_DURATION_TICKS),
        }
    }

    /// Advance all timers one tick, resetting magnitudes on expiry.
    pub fn tick(&mut self, fire: &mut FireControl) {
        self.speed_boost.tick();
        if self.weapon_upgrade.tick() {
            fire.tier = 1;
        }
        self.shield.tick();
        if self.score_multiplier.tick() {
            self.multiplier = 1;
        }
        self.fire_rate.tick();
        self.auto_shoot.tick();
    }

    /// The multiplier applied to kill scores right now.
    pub fn score_multiplier_value(&self) -> u32 {
        if self.score_multiplier.active {
            self.multiplier
        } else {
            1
        }
    }

    /// Label and remaining ticks for every active effect, for the HUD.
    pub fn readouts(&self) -> Vec<(&'static str, u32)> {
        [
            ("Speed Boost", &self.speed_boost),
            ("Weapon Upgrade", &self.weapon_upgrade),
            ("Shield", &self.shield),
            ("Score Multiplier", &self.score_multiplier),
            ("Fire Rate", &self.fire_rate),
            ("Auto-Shoot", &self.auto_shoot),
        ]
        .into_iter()
        .filter(|(_, timer)| timer.active)
        .map(|(label, timer)| (label, timer.remaining))
        .collect()
    }
}

/// Reset all effects when (re)starting a game.
fn reset_effects(mut effects: ResMut<ActiveEffects>) {
    *effects = ActiveEffects::default();
}

fn tick_effects(mut effects: ResMut<ActiveEffects>, mut fire: ResMut<FireControl>) {
    effects.tick(&mut fire);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(effects: &mut ActiveEffects, fire: &mut FireControl, ticks: u32) {
        for _ in 0..ticks {
            effects.tick(fire);
        }
    }

    #[test]
    fn timed_effect_expires_after_its_duration() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        effects.apply(PowerUpKind::SpeedBoost, &mut fire);
        assert!(effects.speed_boost.active);

        run_ticks(&mut effects, &mut fire, EFFECT_DURATION_TICKS - 1);
        assert!(effects.speed_boost.active);
        effects.tick(&mut fire);
        assert!(!effects.speed_boost.active);
    }

    #[test]
    fn recollection_stacks_additively() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        effects.apply(PowerUpKind::Shield, &mut fire);
        run_ticks(&mut effects, &mut fire, 100);
        effects.apply(PowerUpKind::Shield, &mut fire);
        assert_eq!(
            effects.shield.remaining,
            2 * EFFECT_DURATION_TICKS - 100,
            "duration should extend, not reset"
        );
    }

    #[test]
    fn score_multiplier_caps_at_three() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        assert_eq!(effects.score_multiplier_value(), 1);

        for _ in 0..10 {
            effects.apply(PowerUpKind::ScoreMultiplier, &mut fire);
            assert!(effects.multiplier <= MAX_SCORE_MULTIPLIER);
        }
        assert_eq!(effects.score_multiplier_value(), 3);
    }

    #[test]
    fn score_multiplier_resets_to_one_on_expiry() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        effects.apply(PowerUpKind::ScoreMultiplier, &mut fire);
        assert_eq!(effects.score_multiplier_value(), 2);

        run_ticks(&mut effects, &mut fire, EFFECT_DURATION_TICKS);
        assert!(!effects.score_multiplier.active);
        assert_eq!(effects.multiplier, 1);
        assert_eq!(effects.score_multiplier_value(), 1);
    }

    #[test]
    fn weapon_upgrade_raises_tier_and_expiry_resets_it() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        effects.apply(PowerUpKind::WeaponUpgrade, &mut fire);
        effects.apply(PowerUpKind::WeaponUpgrade, &mut fire);
        assert_eq!(fire.tier, 3);

        run_ticks(&mut effects, &mut fire, 2 * EFFECT_DURATION_TICKS);
        assert!(!effects.weapon_upgrade.active);
        assert_eq!(fire.tier, 1);
    }

    #[test]
    fn weapon_upgrade_at_cap_grants_bonus_duration() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        fire.tier = MAX_BULLET_TIER;
        effects.apply(PowerUpKind::WeaponUpgrade, &mut fire);
        assert_eq!(fire.tier, MAX_BULLET_TIER);
        assert_eq!(
            effects.weapon_upgrade.remaining,
            EFFECT_DURATION_TICKS + CAPPED_TIER_BONUS_TICKS
        );
    }

    #[test]
    fn consumed_shield_deactivates_regardless_of_remaining_time() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        effects.apply(PowerUpKind::Shield, &mut fire);
        effects.shield.consume();
        assert!(!effects.shield.active);
        assert_eq!(effects.shield.remaining, 0);
    }

    #[test]
    fn extra_life_has_no_timed_slot() {
        let mut effects = ActiveEffects::default();
        let mut fire = FireControl::default();
        effects.apply(PowerUpKind::ExtraLife, &mut fire);
        assert!(effects.readouts().is_empty());
    }
}
