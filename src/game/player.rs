//! The player ship at the bottom of the playfield.
//!
//! Horizontal movement only, clamped to the playfield, with a speed boost
//! while that effect is active. Contact with an enemy destroys the enemy and
//! costs a life unless a shield absorbs the hit.

use bevy::prelude::*;

use super::{
    LEFT_WALL, RIGHT_WALL, BOTTOM_WALL, SimStep,
    assets::GameAssets,
    effects::ActiveEffects,
    enemy::{DestroyCause, Enemy, EnemyDestroyed},
    hitbox::Hitbox,
    state::LifeLost,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Player>();

    app.add_systems(OnEnter(Screen::Gameplay), spawn_player);

    app.add_systems(
        FixedUpdate,
        (
            move_player
                .in_set(SimStep::Input)
                .run_if(in_state(Screen::Gameplay)),
            enemy_contact
                .in_set(SimStep::Contact)
                .run_if(in_state(Screen::Gameplay)),
        ),
    );
}

/// Side length of the square ship sprite/hitbox.
pub const PLAYER_SIZE: f32 = 50.0;

/// Vertical position of the ship center, just above the bottom edge.
pub const PLAYER_Y: f32 = BOTTOM_WALL + 60.0;

/// Base horizontal speed in units per tick.
const PLAYER_SPEED: f32 = 8.0;

/// Speed multiplier while the speed-boost effect is active.
const SPEED_BOOST_FACTOR: f32 = 1.5;

/// Lives at the start of a game.
pub const STARTING_LIVES: u32 = 3;

/// The player ship.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Player {
    /// Base horizontal speed in units per tick.
    pub speed: f32,
    pub lives: u32,
}

fn spawn_player(mut commands: Commands, assets: Res<GameAssets>) {
    commands.spawn((
        Name::new("Player"),
        Player {
            speed: PLAYER_SPEED,
            lives: STARTING_LIVES,
        },
        Hitbox::splat(PLAYER_SIZE),
        Sprite {
            image: assets.player.clone(),
            custom_size: Some(Vec2::splat(PLAYER_SIZE)),
            ..default()
        },
        Transform::from_xyz(0.0, PLAYER_Y, 1.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Player spawned with {} lives", STARTING_LIVES);
}

/// Apply held-direction movement, clamped to the playfield.
fn move_player(
    input: Res<ButtonInput<KeyCode>>,
    effects: Res<ActiveEffects>,
    mut player: Query<(&mut Transform, &Player)>,
) {
    let Ok((mut transform, player)) = player.single_mut() else {
        return;
    };

    let speed = if effects.speed_boost.active {
        player.speed * SPEED_BOOST_FACTOR
    } else {
        player.speed
    };

    let mut dx = 0.0;
    if input.pressed(KeyCode::ArrowLeft) || input.pressed(KeyCode::KeyA) {
        dx -= speed;
    }
    if input.pressed(KeyCode::ArrowRight) || input.pressed(KeyCode::KeyD) {
        dx += speed;
    }

    let half = PLAYER_SIZE / 2.0;
    transform.translation.x =
        (transform.translation.x + dx).clamp(LEFT_WALL + half, RIGHT_WALL - half);
}

/// Resolve player x enemy contact: the enemy always dies; an active shield
/// absorbs exactly one hit, otherwise a life is lost.
fn enemy_contact(
    mut commands: Commands,
    mut effects: ResMut<ActiveEffects>,
    player: Query<(&Transform, &Hitbox), With<Player>>,
    enemies: Query<(Entity, &Transform, &Hitbox), With<Enemy>>,
    mut destroyed: MessageWriter<EnemyDestroyed>,
    mut losses: MessageWriter<LifeLost>,
) {
    let Ok((player_transform, player_hitbox)) = player.single() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, hitbox) in &enemies {
        let enemy_pos = transform.translation.truncate();
        if !player_hitbox.intersects(player_pos, hitbox, enemy_pos) {
            continue;
        }

        commands.entity(entity).despawn();
        destroyed.write(EnemyDestroyed {
            position: enemy_pos,
            size: hitbox.0.x,
            cause: DestroyCause::Rammed,
        });

        if effects.shield.active {
            effects.shield.consume();
            info!("Shield absorbed an enemy collision");
        } else {
            losses.write(LifeLost);
        }
    }
}
