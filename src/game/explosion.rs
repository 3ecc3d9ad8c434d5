//! Particle bursts for destroyed ships.
//!
//! Each burst is one entity owning its particles; particles drift and shrink
//! every tick and the burst despawns when its lifetime runs out. Drawing goes
//! through gizmos in `Update`, so a burst frozen by the pause menu stays
//! visible.

use bevy::prelude::*;
use rand::Rng;

use super::{
    SimStep,
    enemy::EnemyDestroyed,
    player::PLAYER_SIZE,
    state::PlayerDestroyed,
};
use crate::screens::Screen;

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (
            burst_on_destroy
                .in_set(SimStep::Bursts)
                .run_if(in_state(Screen::Gameplay)),
            tick_explosions
                .in_set(SimStep::Cleanup)
                .run_if(in_state(Screen::Gameplay)),
        ),
    );
    app.add_systems(Update, draw_explosions.run_if(in_state(Screen::Gameplay)));
}

/// Burst duration in ticks.
const EXPLOSION_LIFETIME_TICKS: u32 = 30;
/// Particles per burst.
const PARTICLES_PER_BURST: usize = 15;
/// Per-tick radius decay.
const PARTICLE_SHRINK: f32 = 0.95;

#[derive(Debug, Clone)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// A one-shot particle burst at a destruction site.
#[derive(Component, Debug, Clone)]
pub struct Explosion {
    pub lifetime: u32,
    pub particles: Vec<Particle>,
}

impl Explosion {
    /// Scatter particles in warm hues around `position`, sized to the thing
    /// that blew up.
    pub fn burst(rng: &mut impl Rng, position: Vec2, size: f32) -> Self {
        let particles = (0..PARTICLES_PER_BURST)
            .map(|_| Particle {
                position,
                velocity: Vec2::new(rng.random_range(-2.0..2.0), rng.random_range(-2.0..2.0)),
                radius: rng.random_range(0.0..size / 2.0) + 2.0,
                color: Color::hsl(rng.random_range(10.0..70.0), 1.0, 0.5),
            })
            .collect();
        Self {
            lifetime: EXPLOSION_LIFETIME_TICKS,
            particles,
        }
    }

    /// Advance one tick; returns false once the burst is spent.
    pub fn tick(&mut self) -> bool {
        for particle in &mut self.particles {
            particle.position += particle.velocity;
            particle.radius *= PARTICLE_SHRINK;
        }
        self.lifetime = self.lifetime.saturating_sub(1);
        self.lifetime > 0
    }
}

fn burst_on_destroy(
    mut commands: Commands,
    mut enemies: MessageReader<EnemyDestroyed>,
    mut players: MessageReader<PlayerDestroyed>,
) {
    let mut rng = rand::rng();
    for kill in enemies.read() {
        commands.spawn((
            Name::new("Explosion"),
            Explosion::burst(&mut rng, kill.position, kill.size),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
    for wreck in players.read() {
        commands.spawn((
            Name::new("Explosion"),
            Explosion::burst(&mut rng, wreck.position, PLAYER_SIZE * 1.5),
            DespawnOnExit(Screen::Gameplay),
        ));
    }
}

fn tick_explosions(mut commands: Commands, mut explosions: Query<(Entity, &mut Explosion)>) {
    for (entity, mut explosion) in &mut explosions {
        if !explosion.tick() {
            commands.entity(entity).despawn();
        }
    }
}

fn draw_explosions(mut gizmos: Gizmos, explosions: Query<&Explosion>) {
    for explosion in &explosions {
        for particle in &explosion.particles {
            gizmos.circle_2d(particle.position, particle.radius, particle.color);
        }
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn destroyed_ship_spawns_one_burst_at_its_position() {
        let mut world = World::new();
        world.init_resource::<Messages<EnemyDestroyed>>();
        world.init_resource::<Messages<PlayerDestroyed>>();
        let position = Vec2::new(40.0, -300.0);
        world
            .resource_mut::<Messages<PlayerDestroyed>>()
            .write(PlayerDestroyed { position });

        world.run_system_once(burst_on_destroy).unwrap();

        let mut explosions = world.query::<&Explosion>();
        let bursts: Vec<&Explosion> = explosions.iter(&world).collect();
        assert_eq!(bursts.len(), 1);
        assert!(bursts[0].particles.iter().all(|p| p.position == position));
    }

    #[test]
    fn burst_spends_its_full_lifetime() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut explosion = Explosion::burst(&mut rng, Vec2::ZERO, 40.0);
        for _ in 0..EXPLOSION_LIFETIME_TICKS - 1 {
            assert!(explosion.tick());
        }
        assert!(!explosion.tick());
    }

    #[test]
    fn particles_drift_and_shrink() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut explosion = Explosion::burst(&mut rng, Vec2::new(100.0, 50.0), 40.0);
        let before: Vec<f32> = explosion.particles.iter().map(|p| p.radius).collect();

        explosion.tick();

        for (particle, radius) in explosion.particles.iter().zip(before) {
            assert!(particle.radius < radius);
            assert_eq!(
                particle.position,
                Vec2::new(100.0, 50.0) + particle.velocity
            );
        }
    }

    #[test]
    fn every_burst_has_fifteen_particles() {
        let mut rng = StdRng::seed_from_u64(21);
        let explosion = Explosion::burst(&mut rng, Vec2::ZERO, 60.0);
        assert_eq!(explosion.particles.len(), PARTICLES_PER_BURST);
    }
}
