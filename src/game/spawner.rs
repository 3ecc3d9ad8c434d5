//! Enemy wave pacing and power-up drops.
//!
//! A single [`Spawner`] resource drives both. Enemies are refilled up to a cap
//! on a countdown that shortens as the run goes on, and power-ups drop either
//! when the score has climbed far enough since the last drop or on a small
//! per-tick chance.

use bevy::prelude::*;
use rand::Rng;

use super::{
    LEFT_WALL, RIGHT_WALL, SimStep, TOP_WALL,
    assets::GameAssets,
    enemy::{Enemy, ENEMY_SIZE, spawn_enemy},
    powerup::{PowerUpKind, spawn_powerup, POWERUP_SIZE},
    state::GameScore,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.init_resource::<Spawner>();

    app.add_systems(OnEnter(Screen::Gameplay), (reset_spawner, initial_wave).chain());
    app.add_systems(
        FixedUpdate,
        (refill_enemies, drop_powerups)
            .in_set(SimStep::Spawn)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Ticks between refill checks at the start of a run.
const INITIAL_SPAWN_INTERVAL: u32 = 100;
/// The refill interval never shrinks below this.
const MIN_SPAWN_INTERVAL: u32 = 30;
/// Enemies on screen at the start of a run.
const INITIAL_ENEMY_CAP: u32 = 5;
/// Per-tick chance of a surprise power-up drop.
const POWERUP_SPAWN_CHANCE: f64 = 0.005;
/// Score gained since the last drop that guarantees the next one,
/// scaled by the current enemy cap.
const POWERUP_SCORE_FACTOR: u32 = 60;

/// Pacing state for enemy refills and power-up drops.
#[derive(Resource, Debug)]
pub struct Spawner {
    pub interval: u32,
    pub counter: u32,
    pub enemy_cap: u32,
    pub last_powerup_score: u32,
}

impl Default for Spawner {
    fn default() -> Self {
        Self {
            interval: INITIAL_SPAWN_INTERVAL,
            counter: 0,
            enemy_cap: INITIAL_ENEMY_CAP,
            last_powerup_score: 0,
        }
    }
}

impl Spawner {
    /// Grow the enemy cap by one for each score milestone crossed.
    pub fn raise_cap(&mut self, crossings: u32) {
        if crossings > 0 {
            self.enemy_cap += crossings;
            info!("Enemy cap raised to {}", self.enemy_cap);
        }
    }
}

/// Spawn position and fall speed for an enemy or power-up entering from above.
#[derive(Debug, Clone, Copy)]
pub struct FallingSeed {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
}

/// Roll `count` entry points above the visible playfield for a faller of the
/// given square size. The faller's top edge starts 50 to 200 units above the
/// playfield top; speeds are whole units per tick between 2 and 4.
pub fn falling_seeds(rng: &mut impl Rng, count: usize, size: f32) -> Vec<FallingSeed> {
    let half = size / 2.0;
    (0..count)
        .map(|_| FallingSeed {
            x: rng.random_range(LEFT_WALL + half..=RIGHT_WALL - half),
            y: TOP_WALL + rng.random_range(50.0..=200.0) - half,
            speed: rng.random_range(2..=4) as f32,
        })
        .collect()
}

fn reset_spawner(mut spawner: ResMut<Spawner>) {
    *spawner = Spawner::default();
}

fn initial_wave(mut commands: Commands, assets: Res<GameAssets>, spawner: Res<Spawner>) {
    let mut rng = rand::rng();
    for seed in falling_seeds(&mut rng, spawner.enemy_cap as usize, ENEMY_SIZE) {
        spawn_enemy(&mut commands, &assets, &seed);
    }
}

/// Count down the refill interval; when it elapses, top the field back up to
/// the cap and shorten the next interval.
fn refill_enemies(
    mut commands: Commands,
    mut spawner: ResMut<Spawner>,
    assets: Res<GameAssets>,
    enemies: Query<&Enemy>,
) {
    spawner.counter += 1;
    if spawner.counter < spawner.interval {
        return;
    }
    spawner.counter = 0;

    let alive = enemies.iter().count() as u32;
    let deficit = spawner.enemy_cap.saturating_sub(alive);
    if deficit > 0 {
        let mut rng = rand::rng();
        for seed in falling_seeds(&mut rng, deficit as usize, ENEMY_SIZE) {
            spawn_enemy(&mut commands, &assets, &seed);
        }
    }

    spawner.interval = (spawner.interval - 1).max(MIN_SPAWN_INTERVAL);
}

/// Drop a power-up when the score has climbed enough since the last drop, or
/// on a small per-tick roll. Either way the score marker resets, so a lucky
/// roll also pushes back the next guaranteed drop.
fn drop_powerups(
    mut commands: Commands,
    mut spawner: ResMut<Spawner>,
    assets: Res<GameAssets>,
    score: Res<GameScore>,
) {
    let earned = score.score.saturating_sub(spawner.last_powerup_score);
    let threshold = POWERUP_SCORE_FACTOR * spawner.enemy_cap;

    let mut rng = rand::rng();
    if earned < threshold && !rng.random_bool(POWERUP_SPAWN_CHANCE) {
        return;
    }
    spawner.last_powerup_score = score.score;

    let seed = falling_seeds(&mut rng, 1, POWERUP_SIZE)[0];
    let kind = PowerUpKind::random(&mut rng);
    let spin = rng.random_range(-0.05..0.05);
    spawn_powerup(&mut commands, &assets, &seed, kind, spin);
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn seeds_stay_inside_the_walls() {
        for seed in [0, 1, 7, 42, 1234] {
            let mut rng = StdRng::seed_from_u64(seed);
            for falling in falling_seeds(&mut rng, 20, ENEMY_SIZE) {
                let half = ENEMY_SIZE / 2.0;
                assert!(falling.x >= LEFT_WALL + half && falling.x <= RIGHT_WALL - half);
                let top_edge = falling.y + half;
                assert!(
                    (TOP_WALL + 50.0..=TOP_WALL + 200.0).contains(&top_edge),
                    "top edge starts 50 to 200 units above the playfield"
                );
                assert!(falling.y - half >= TOP_WALL, "the whole sprite starts off-screen");
            }
        }
    }

    #[test]
    fn seed_speeds_are_whole_units_between_two_and_four() {
        let mut rng = StdRng::seed_from_u64(99);
        for falling in falling_seeds(&mut rng, 50, ENEMY_SIZE) {
            assert!((2.0..=4.0).contains(&falling.speed));
            assert_eq!(falling.speed.fract(), 0.0);
        }
    }

    #[test]
    fn cap_grows_by_milestone_crossings() {
        let mut spawner = Spawner::default();
        spawner.raise_cap(0);
        assert_eq!(spawner.enemy_cap, INITIAL_ENEMY_CAP);
        spawner.raise_cap(2);
        assert_eq!(spawner.enemy_cap, INITIAL_ENEMY_CAP + 2);
    }

    #[test]
    fn interval_never_drops_below_the_floor() {
        let mut interval = INITIAL_SPAWN_INTERVAL;
        for _ in 0..200 {
            interval = (interval - 1).max(MIN_SPAWN_INTERVAL);
        }
        assert_eq!(interval, MIN_SPAWN_INTERVAL);
    }
}
