//! Enemies - descending ships the player must intercept.
//!
//! An enemy that crosses the bottom edge of the playfield "breaches" and is
//! retired; any number of breaches in one tick cost the player a single life.

use bevy::prelude::*;

use super::{BOTTOM_WALL, SimStep, assets::GameAssets, hitbox::Hitbox, spawner::FallingSeed};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Enemy>();
    app.add_message::<EnemyBreached>();
    app.add_message::<EnemyDestroyed>();

    app.add_systems(
        FixedUpdate,
        move_enemies
            .in_set(SimStep::Move)
            .run_if(in_state(Screen::Gameplay)),
    );
}

/// Side length of the square enemy sprite/hitbox.
pub const ENEMY_SIZE: f32 = 40.0;

/// Message sent when an enemy leaves the playfield via the bottom edge.
#[derive(Message, Debug, Clone)]
pub struct EnemyBreached;

/// Message sent when an enemy is destroyed by the player or a projectile.
#[derive(Message, Debug, Clone)]
pub struct EnemyDestroyed {
    pub position: Vec2,
    pub size: f32,
    pub cause: DestroyCause,
}

/// How an enemy died. Only shot-down enemies award score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyCause {
    Shot,
    Rammed,
}

/// Component marking an enemy, with its fall speed in units per tick.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Enemy {
    pub speed: f32,
}

/// Spawn one enemy from a randomized [`FallingSeed`].
pub fn spawn_enemy(commands: &mut Commands, assets: &GameAssets, seed: &FallingSeed) {
    commands.spawn((
        Name::new("Enemy"),
        Enemy { speed: seed.speed },
        Hitbox::splat(ENEMY_SIZE),
        Sprite {
            image: assets.enemy.clone(),
            custom_size: Some(Vec2::splat(ENEMY_SIZE)),
            ..default()
        },
        Transform::from_xyz(seed.x, seed.y, 1.0),
        DespawnOnExit(Screen::Gameplay),
    ));
}

/// Advance enemies downward; retire any that fully cross the bottom edge and
/// signal the breach.
fn move_enemies(
    mut commands: Commands,
    mut enemies: Query<(Entity, &mut Transform, &Enemy, &Hitbox)>,
    mut breaches: MessageWriter<EnemyBreached>,
) {
    for (entity, mut transform, enemy, hitbox) in &mut enemies {
        transform.translation.y -= enemy.speed;
        if transform.translation.y + hitbox.0.y / 2.0 < BOTTOM_WALL {
            commands.entity(entity).despawn();
            breaches.write(EnemyBreached);
        }
    }
}
