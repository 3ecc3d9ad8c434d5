//! Projectiles - bullets fired upward from the player ship.
//!
//! Firing is cooldown-gated; the cooldown is halved while the fire-rate
//! upgrade is active, and auto-shoot fires without a held key. Bullets have a
//! tier (1-4) that selects their image and size. While the weapon upgrade is
//! active a bullet that hits an enemy is not destroyed but downgraded one
//! tier, down to a floor of tier 1.

use bevy::{ecs::entity::EntityHashSet, prelude::*};

use super::{
    SimStep, TOP_WALL,
    assets::GameAssets,
    effects::ActiveEffects,
    enemy::{DestroyCause, Enemy, EnemyDestroyed},
    hitbox::Hitbox,
    player::{PLAYER_SIZE, PLAYER_Y, Player},
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>();
    app.register_type::<FireControl>();
    app.init_resource::<FireControl>();
    app.add_message::<FireProjectile>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_fire_control);

    app.add_systems(
        FixedUpdate,
        (
            (fire_control, spawn_projectiles)
                .chain()
                .in_set(SimStep::Fire)
                .run_if(in_state(Screen::Gameplay)),
            move_projectiles
                .in_set(SimStep::Move)
                .run_if(in_state(Screen::Gameplay)),
            strike_enemies
                .in_set(SimStep::Strike)
                .run_if(in_state(Screen::Gameplay)),
        ),
    );
}

/// Highest bullet tier.
pub const MAX_BULLET_TIER: u8 = 4;

/// Upward bullet speed in units per tick.
const BULLET_SPEED: f32 = 10.0;

/// Ticks between shots, halved while the fire-rate upgrade is active.
const FIRE_COOLDOWN_TICKS: u32 = 15;

/// Message to fire one bullet from the given x position.
#[derive(Message, Debug, Clone)]
pub struct FireProjectile {
    pub x: f32,
    pub tier: u8,
}

/// Component marking a live bullet.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    /// Upward speed in units per tick.
    pub speed: f32,
    pub tier: u8,
}

/// Shot cooldown and the current bullet tier.
#[derive(Resource, Debug, Clone, Reflect)]
#[reflect(Resource)]
pub struct FireControl {
    pub cooldown: u32,
    pub tier: u8,
}

impl Default for FireControl {
    fn default() -> Self {
        Self {
            cooldown: 0,
            tier: 1,
        }
    }
}

/// Sprite/hitbox size for a bullet tier.
pub fn bullet_size(tier: u8) -> Vec2 {
    let tier = tier.clamp(1, MAX_BULLET_TIER) as f32;
    Vec2::new(5.0 + 3.0 * tier, 16.0 + 6.0 * tier)
}

fn reset_fire_control(mut fire: ResMut<FireControl>) {
    *fire = FireControl::default();
}

/// Count the cooldown down and request a shot when the trigger is held (or
/// auto-shoot is active) and the cooldown has elapsed.
fn fire_control(
    input: Res<ButtonInput<KeyCode>>,
    effects: Res<ActiveEffects>,
    mut fire: ResMut<FireControl>,
    player: Query<&Transform, With<Player>>,
    mut shots: MessageWriter<FireProjectile>,
) {
    fire.cooldown = fire.cooldown.saturating_sub(1);
    if fire.cooldown > 0 {
        return;
    }

    let trigger_held = input.pressed(KeyCode::Space) || effects.auto_shoot.active;
    if !trigger_held {
        return;
    }
    let Ok(transform) = player.single() else {
        return;
    };

    shots.write(FireProjectile {
        x: transform.translation.x,
        tier: fire.tier,
    });
    fire.cooldown = if effects.fire_rate.active {
        FIRE_COOLDOWN_TICKS / 2
    } else {
        FIRE_COOLDOWN_TICKS
    };
}

/// Spawn a bullet for each fire request, sized and imaged by its tier.
fn spawn_projectiles(
    mut commands: Commands,
    assets: Res<GameAssets>,
    mut shots: MessageReader<FireProjectile>,
) {
    for shot in shots.read() {
        let size = bullet_size(shot.tier);
        commands.spawn((
            Name::new("Projectile"),
            Projectile {
                speed: BULLET_SPEED,
                tier: shot.tier,
            },
            Hitbox(size),
            Sprite {
                image: assets.bullet(shot.tier).clone(),
                custom_size: Some(size),
                ..default()
            },
            Transform::from_xyz(shot.x, PLAYER_Y + PLAYER_SIZE / 2.0 + size.y / 2.0, 2.0),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

/// Advance bullets upward and retire any that fully leave the playfield.
fn move_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Transform, &Projectile, &Hitbox)>,
) {
    for (entity, mut transform, projectile, hitbox) in &mut projectiles {
        transform.translation.y += projectile.speed;
        if transform.translation.y - hitbox.0.y / 2.0 > TOP_WALL {
            commands.entity(entity).despawn();
        }
    }
}

/// Resolve projectile x enemy collisions.
///
/// Each enemy dies to at most one bullet per tick. A bullet normally dies on
/// its first hit; under the weapon upgrade it pierces, losing one tier per
/// enemy destroyed until it reaches tier 1.
fn strike_enemies(
    mut commands: Commands,
    effects: Res<ActiveEffects>,
    assets: Res<GameAssets>,
    mut projectiles: Query<(Entity, &Transform, &mut Projectile, &mut Hitbox, &mut Sprite)>,
    enemies: Query<(Entity, &Transform, &Hitbox), (With<Enemy>, Without<Projectile>)>,
    mut destroyed: MessageWriter<EnemyDestroyed>,
) {
    let mut killed = EntityHashSet::default();

    'bullets: for (entity, transform, mut projectile, mut hitbox, mut sprite) in &mut projectiles {
        let bullet_pos = transform.translation.truncate();

        for (enemy_entity, enemy_transform, enemy_hitbox) in &enemies {
            if killed.contains(&enemy_entity) {
                continue;
            }
            let enemy_pos = enemy_transform.translation.truncate();
            if !hitbox.intersects(bullet_pos, enemy_hitbox, enemy_pos) {
                continue;
            }

            killed.insert(enemy_entity);
            commands.entity(enemy_entity).despawn();
            destroyed.write(EnemyDestroyed {
                position: enemy_pos,
                size: enemy_hitbox.0.x,
                cause: DestroyCause::Shot,
            });

            if effects.weapon_upgrade.active && projectile.tier > 1 {
                // Piercing shot: weaken one tier and keep flying.
                projectile.tier -= 1;
                let size = bullet_size(projectile.tier);
                hitbox.0 = size;
                sprite.image = assets.bullet(projectile.tier).clone();
                sprite.custom_size = Some(size);
            } else {
                commands.entity(entity).despawn();
                continue 'bullets;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::game::enemy::ENEMY_SIZE;
    use crate::game::powerup::PowerUpKind;

    fn strike_world() -> World {
        let mut world = World::new();
        world.init_resource::<ActiveEffects>();
        world.init_resource::<Messages<EnemyDestroyed>>();
        world.insert_resource(GameAssets {
            player: Handle::default(),
            enemy: Handle::default(),
            bullets: vec![Handle::default(); MAX_BULLET_TIER as usize],
            powerup: Handle::default(),
        });
        world
    }

    fn spawn_bullet(world: &mut World, x: f32, y: f32, tier: u8) -> Entity {
        let size = bullet_size(tier);
        world
            .spawn((
                Projectile {
                    speed: BULLET_SPEED,
                    tier,
                },
                Hitbox(size),
                Sprite {
                    custom_size: Some(size),
                    ..Default::default()
                },
                Transform::from_xyz(x, y, 2.0),
            ))
            .id()
    }

    fn spawn_enemy(world: &mut World, x: f32, y: f32) {
        world.spawn((
            Enemy { speed: 3.0 },
            Hitbox::splat(ENEMY_SIZE),
            Transform::from_xyz(x, y, 1.0),
        ));
    }

    fn enemy_count(world: &mut World) -> usize {
        let mut enemies = world.query::<&Enemy>();
        enemies.iter(world).count()
    }

    #[test]
    fn bullet_kills_one_enemy_and_despawns() {
        let mut world = strike_world();
        let bullet = spawn_bullet(&mut world, 0.0, 0.0, 1);
        // Two overlapping enemies; a plain bullet only takes the first.
        spawn_enemy(&mut world, 5.0, 0.0);
        spawn_enemy(&mut world, -5.0, 0.0);

        world.run_system_once(strike_enemies).unwrap();

        assert_eq!(enemy_count(&mut world), 1);
        assert!(world.get_entity(bullet).is_err(), "bullet should despawn");
        assert_eq!(world.resource::<Messages<EnemyDestroyed>>().len(), 1);
    }

    #[test]
    fn upgraded_bullet_pierces_and_downgrades() {
        let mut world = strike_world();
        world
            .resource_mut::<ActiveEffects>()
            .apply(PowerUpKind::WeaponUpgrade, &mut FireControl::default());
        let bullet = spawn_bullet(&mut world, 0.0, 0.0, 3);
        spawn_enemy(&mut world, 5.0, 0.0);

        world.run_system_once(strike_enemies).unwrap();

        assert_eq!(enemy_count(&mut world), 0);
        let projectile = world.get::<Projectile>(bullet).expect("bullet survives");
        assert_eq!(projectile.tier, 2);
    }

    #[test]
    fn tier_one_bullet_despawns_even_when_upgraded() {
        let mut world = strike_world();
        world
            .resource_mut::<ActiveEffects>()
            .apply(PowerUpKind::WeaponUpgrade, &mut FireControl::default());
        let bullet = spawn_bullet(&mut world, 0.0, 0.0, 1);
        spawn_enemy(&mut world, 0.0, 0.0);

        world.run_system_once(strike_enemies).unwrap();

        assert!(world.get_entity(bullet).is_err());
    }

    #[test]
    fn missed_bullet_hits_nothing() {
        let mut world = strike_world();
        spawn_bullet(&mut world, 0.0, 0.0, 1);
        spawn_enemy(&mut world, 200.0, 200.0);

        world.run_system_once(strike_enemies).unwrap();

        assert_eq!(enemy_count(&mut world), 1);
        assert!(world.resource::<Messages<EnemyDestroyed>>().is_empty());
    }
}
