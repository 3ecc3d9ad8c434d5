//! The main game module for the space shooter.
//!
//! This module contains all the gameplay logic including:
//! - The player ship, lives and clamped horizontal movement
//! - Projectiles with bullet tiers and fire-control cooldowns
//! - Descending enemies and bottom-edge breaches
//! - Falling power-ups and the timed active-effect state
//! - Wave spawning with escalating difficulty
//! - Particle explosions and the HUD
//!
//! Everything gameplay-visible runs on a 60 Hz fixed timestep; speeds are in
//! playfield units per tick and durations in ticks.

mod assets;
pub mod effects;
mod enemy;
mod explosion;
mod hitbox;
mod hud;
mod player;
mod powerup;
pub mod projectile;
mod spawner;
pub mod state;

use bevy::prelude::*;
use rand::Rng;

use crate::{PausableSystems, screens::Screen};

/// Logical playfield size, fixed at game start.
pub const PLAYFIELD_WIDTH: f32 = 600.0;
pub const PLAYFIELD_HEIGHT: f32 = 800.0;

/// Playfield edges in world coordinates (the camera sits at the origin).
pub const LEFT_WALL: f32 = -PLAYFIELD_WIDTH / 2.0;
pub const RIGHT_WALL: f32 = PLAYFIELD_WIDTH / 2.0;
pub const TOP_WALL: f32 = PLAYFIELD_HEIGHT / 2.0;
pub const BOTTOM_WALL: f32 = -PLAYFIELD_HEIGHT / 2.0;

/// Simulation ticks per second.
pub const TICK_RATE: f64 = 60.0;

/// Number of background stars.
const STAR_COUNT: usize = 100;

pub(super) fn plugin(app: &mut App) {
    // One chained stage per phase of the tick, so a whole simulation step
    // always resolves in the same order: timers, input, firing, motion,
    // breach accounting, the three collision passes, scoring/lives,
    // explosion bursts, spawning, cleanup.
    app.configure_sets(
        FixedUpdate,
        (
            SimStep::Timers,
            SimStep::Input,
            SimStep::Fire,
            SimStep::Move,
            SimStep::Breach,
            SimStep::Strike,
            SimStep::Pickup,
            SimStep::Contact,
            SimStep::Aftermath,
            SimStep::Bursts,
            SimStep::Spawn,
            SimStep::Cleanup,
        )
            .chain()
            .in_set(PausableSystems),
    );

    app.add_plugins((
        assets::plugin,
        effects::plugin,
        enemy::plugin,
        explosion::plugin,
        hitbox::plugin,
        hud::plugin,
        player::plugin,
        powerup::plugin,
        projectile::plugin,
        spawner::plugin,
        state::plugin,
    ));
}

/// Phases of one fixed simulation tick, chained in declaration order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimStep {
    /// Tick down active power-up effect durations.
    Timers,
    /// Apply held-direction player movement.
    Input,
    /// Fire-control cooldown and projectile spawning.
    Fire,
    /// Advance projectiles, enemies and power-ups; retire off-screen entities.
    Move,
    /// Turn bottom-edge breaches into (at most one) life loss.
    Breach,
    /// Projectile x enemy collisions.
    Strike,
    /// Player x power-up collection.
    Pickup,
    /// Player x enemy contact.
    Contact,
    /// Score awards, cap raises, life application, game over.
    Aftermath,
    /// Spawn explosions for everything destroyed this tick.
    Bursts,
    /// Wave cadence and power-up drop triggers.
    Spawn,
    /// Retire expired explosions.
    Cleanup,
}

/// System to spawn the game level when entering gameplay.
/// Called from `screens/gameplay.rs` on `OnEnter(Screen::Gameplay)`.
pub fn spawn_game(mut commands: Commands) {
    commands.spawn((
        Name::new("Game"),
        Transform::default(),
        Visibility::default(),
        DespawnOnExit(Screen::Gameplay),
    ));

    // Static starfield behind everything.
    let mut rng = rand::rng();
    for _ in 0..STAR_COUNT {
        let size = rng.random_range(0.5..2.0);
        commands.spawn((
            Name::new("Star"),
            Sprite::from_color(Color::srgb(0.9, 0.9, 0.9), Vec2::splat(size)),
            Transform::from_xyz(
                rng.random_range(LEFT_WALL..RIGHT_WALL),
                rng.random_range(BOTTOM_WALL..TOP_WALL),
                -1.0,
            ),
            DespawnOnExit(Screen::Gameplay),
        ));
    }

    info!("Game spawned - playfield {}x{}", PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT);
}
