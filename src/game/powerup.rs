//! Falling power-up pickups.
//!
//! A power-up falls like an enemy, slowly spinning (visual only), and either
//! leaves the screen or is collected by the player, which applies its effect
//! via [`ActiveEffects`]. `ExtraLife` is the one untimed kind and is applied
//! directly to the player.

use bevy::prelude::*;
use rand::Rng;

use super::{
    BOTTOM_WALL, SimStep,
    assets::GameAssets,
    effects::ActiveEffects,
    hitbox::Hitbox,
    player::Player,
    projectile::FireControl,
    spawner::FallingSeed,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<PowerUp>();

    app.add_systems(
        FixedUpdate,
        (
            move_powerups
                .in_set(SimStep::Move)
                .run_if(in_state(Screen::Gameplay)),
            collect_powerups
                .in_set(SimStep::Pickup)
                .run_if(in_state(Screen::Gameplay)),
        ),
    );
}

/// Side length of the square power-up sprite/hitbox.
pub const POWERUP_SIZE: f32 = 30.0;

/// The seven power-up kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum PowerUpKind {
    ExtraLife,
    SpeedBoost,
    WeaponUpgrade,
    Shield,
    ScoreMultiplier,
    FireRateUpgrade,
    AutoShoot,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 7] = [
        PowerUpKind::ExtraLife,
        PowerUpKind::SpeedBoost,
        PowerUpKind::WeaponUpgrade,
        PowerUpKind::Shield,
        PowerUpKind::ScoreMultiplier,
        PowerUpKind::FireRateUpgrade,
        PowerUpKind::AutoShoot,
    ];

    /// Pick one of the seven kinds uniformly at random.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Tint used to tell the kinds apart on the shared sprite.
    pub fn color(self) -> Color {
        match self {
            PowerUpKind::ExtraLife => Color::srgb_u8(0xFF, 0x57, 0x33),
            PowerUpKind::SpeedBoost => Color::srgb_u8(0x33, 0xFF, 0x57),
            PowerUpKind::WeaponUpgrade => Color::srgb_u8(0x33, 0x57, 0xFF),
            PowerUpKind::Shield => Color::srgb_u8(0xF0, 0x33, 0xFF),
            PowerUpKind::ScoreMultiplier => Color::srgb_u8(0xFF, 0xFF, 0x33),
            PowerUpKind::FireRateUpgrade => Color::srgb_u8(0xFF, 0x8C, 0x00),
            PowerUpKind::AutoShoot => Color::WHITE,
        }
    }
}

/// Component marking a falling power-up.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct PowerUp {
    pub kind: PowerUpKind,
    /// Fall speed in units per tick.
    pub speed: f32,
    /// Spin in radians per tick, visual only.
    pub spin: f32,
}

/// Spawn one power-up of the given kind from a randomized [`FallingSeed`].
pub fn spawn_powerup(
    commands: &mut Commands,
    assets: &GameAssets,
    seed: &FallingSeed,
    kind: PowerUpKind,
    spin: f32,
) {
    commands.spawn((
        Name::new("PowerUp"),
        PowerUp {
            kind,
            speed: seed.speed,
            spin,
        },
        Hitbox::splat(POWERUP_SIZE),
        Sprite {
            image: assets.powerup.clone(),
            color: kind.color(),
            custom_size: Some(Vec2::splat(POWERUP_SIZE)),
            ..default()
        },
        Transform::from_xyz(seed.x, seed.y, 1.0),
        DespawnOnExit(Screen::Gameplay),
    ));

    info!("Power-up {:?} dropped", kind);
}

/// Advance power-ups downward with their spin; retire any below the bottom edge.
fn move_powerups(
    mut commands: Commands,
    mut powerups: Query<(Entity, &mut Transform, &PowerUp, &Hitbox)>,
) {
    for (entity, mut transform, powerup, hitbox) in &mut powerups {
        transform.translation.y -= powerup.speed;
        transform.rotate_z(powerup.spin);
        if transform.translation.y + hitbox.0.y / 2.0 < BOTTOM_WALL {
            commands.entity(entity).despawn();
        }
    }
}

/// Collect power-ups touching the player and apply their effects.
fn collect_powerups(
    mut commands: Commands,
    mut effects: ResMut<ActiveEffects>,
    mut fire: ResMut<FireControl>,
    mut player: Query<(&Transform, &Hitbox, &mut Player)>,
    powerups: Query<(Entity, &Transform, &Hitbox, &PowerUp)>,
) {
    let Ok((player_transform, player_hitbox, mut player)) = player.single_mut() else {
        return;
    };
    let player_pos = player_transform.translation.truncate();

    for (entity, transform, hitbox, powerup) in &powerups {
        if !player_hitbox.intersects(player_pos, hitbox, transform.translation.truncate()) {
            continue;
        }

        commands.entity(entity).despawn();
        info!("Power-up {:?} collected", powerup.kind);

        match powerup.kind {
            PowerUpKind::ExtraLife => player.lives += 1,
            kind => effects.apply(kind, &mut fire),
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::game::player::{PLAYER_SIZE, PLAYER_Y};

    fn pickup_world() -> World {
        let mut world = World::new();
        world.init_resource::<ActiveEffects>();
        world.init_resource::<FireControl>();
        world.spawn((
            Player {
                speed: 8.0,
                lives: 3,
            },
            Hitbox::splat(PLAYER_SIZE),
            Transform::from_xyz(0.0, PLAYER_Y, 1.0),
        ));
        world
    }

    fn spawn_pickup_at(world: &mut World, kind: PowerUpKind, x: f32, y: f32) {
        world.spawn((
            PowerUp {
                kind,
                speed: 3.0,
                spin: 0.01,
            },
            Hitbox::splat(POWERUP_SIZE),
            Transform::from_xyz(x, y, 1.0),
        ));
    }

    #[test]
    fn touching_powerup_is_collected_and_applied() {
        let mut world = pickup_world();
        spawn_pickup_at(&mut world, PowerUpKind::SpeedBoost, 10.0, PLAYER_Y);

        world.run_system_once(collect_powerups).unwrap();

        let mut powerups = world.query::<&PowerUp>();
        assert_eq!(powerups.iter(&world).count(), 0);
        assert!(world.resource::<ActiveEffects>().speed_boost.active);
    }

    #[test]
    fn extra_life_is_immediate() {
        let mut world = pickup_world();
        spawn_pickup_at(&mut world, PowerUpKind::ExtraLife, 0.0, PLAYER_Y);

        world.run_system_once(collect_powerups).unwrap();

        let mut players = world.query::<&Player>();
        let player = players.single(&world).unwrap();
        assert_eq!(player.lives, 4);
        assert!(
            world.resource::<ActiveEffects>().readouts().is_empty(),
            "extra life has no timed effect"
        );
    }

    #[test]
    fn distant_powerup_is_not_collected() {
        let mut world = pickup_world();
        spawn_pickup_at(&mut world, PowerUpKind::Shield, 0.0, PLAYER_Y + 400.0);

        world.run_system_once(collect_powerups).unwrap();

        let mut powerups = world.query::<&PowerUp>();
        assert_eq!(powerups.iter(&world).count(), 1);
        assert!(!world.resource::<ActiveEffects>().shield.active);
    }
}
