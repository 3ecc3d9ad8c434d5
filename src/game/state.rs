//! Score, lives, and the end of a run.
//!
//! Life losses from breaches and collisions are funneled through the
//! [`LifeLost`] message so a single system owns the counter and the
//! game-over transition.

use bevy::prelude::*;

use super::{
    SimStep,
    effects::ActiveEffects,
    enemy::{DestroyCause, EnemyBreached, EnemyDestroyed},
    player::Player,
    spawner::Spawner,
};
use crate::{menus::Menu, screens::Screen};

pub(super) fn plugin(app: &mut App) {
    app.register_type::<GameScore>();
    app.init_resource::<GameScore>();
    app.add_message::<LifeLost>();
    app.add_message::<PlayerDestroyed>();

    app.add_systems(OnEnter(Screen::Gameplay), reset_score);
    app.add_systems(
        FixedUpdate,
        (
            breach_costs_life
                .in_set(SimStep::Breach)
                .run_if(in_state(Screen::Gameplay)),
            (score_kills, apply_life_losses)
                .chain()
                .in_set(SimStep::Aftermath)
                .run_if(in_state(Screen::Gameplay)),
        ),
    );
}

/// Base score for one destroyed enemy, before multipliers.
pub const POINTS_PER_KILL: u32 = 10;
/// Every this many points, the enemy cap grows by one.
const CAP_STEP: u32 = 1000;

/// Running score and kill count for the current run.
#[derive(Resource, Debug, Default, Clone, Reflect)]
#[reflect(Resource)]
pub struct GameScore {
    pub score: u32,
    pub kills: u32,
}

impl GameScore {
    /// Add points and report how many [`CAP_STEP`] milestones were crossed.
    pub fn award(&mut self, points: u32) -> u32 {
        let before = self.score / CAP_STEP;
        self.score += points;
        self.score / CAP_STEP - before
    }
}

/// The player lost one life this tick.
#[derive(Message, Debug, Clone, Copy)]
pub struct LifeLost;

/// The player's ship was destroyed, ending the run.
#[derive(Message, Debug, Clone, Copy)]
pub struct PlayerDestroyed {
    pub position: Vec2,
}

fn reset_score(mut score: ResMut<GameScore>) {
    *score = GameScore::default();
}

/// Any number of enemies slipping past in one tick costs a single life.
fn breach_costs_life(mut breached: MessageReader<EnemyBreached>, mut losses: MessageWriter<LifeLost>) {
    if breached.read().count() > 0 {
        losses.write(LifeLost);
    }
}

/// Score shot-down enemies and grow the enemy cap at score milestones.
fn score_kills(
    mut destroyed: MessageReader<EnemyDestroyed>,
    mut score: ResMut<GameScore>,
    mut spawner: ResMut<Spawner>,
    effects: Res<ActiveEffects>,
) {
    for kill in destroyed.read() {
        if kill.cause != DestroyCause::Shot {
            continue;
        }
        score.kills += 1;
        let points = POINTS_PER_KILL * effects.score_multiplier_value();
        let crossings = score.award(points);
        spawner.raise_cap(crossings);
    }
}

/// Deduct queued life losses; at zero lives, destroy the ship and open the
/// game-over menu.
fn apply_life_losses(
    mut commands: Commands,
    mut losses: MessageReader<LifeLost>,
    mut destroyed: MessageWriter<PlayerDestroyed>,
    mut next_menu: ResMut<NextState<Menu>>,
    mut player: Query<(Entity, &Transform, &mut Player)>,
    score: Res<GameScore>,
) {
    let lost = losses.read().count() as u32;
    if lost == 0 {
        return;
    }
    let Ok((entity, transform, mut player)) = player.single_mut() else {
        return;
    };
    if player.lives == 0 {
        return;
    }

    player.lives = player.lives.saturating_sub(lost);
    info!("Life lost, {} remaining", player.lives);

    if player.lives == 0 {
        info!("Game over with score {}", score.score);
        destroyed.write(PlayerDestroyed {
            position: transform.translation.truncate(),
        });
        commands.entity(entity).despawn();
        next_menu.set(Menu::GameOver);
    }
}

#[cfg(test)]
mod tests {
    use bevy::ecs::system::RunSystemOnce;

    use super::*;
    use crate::game::player::PLAYER_Y;

    fn lives_world(lives: u32) -> World {
        let mut world = World::new();
        world.init_resource::<GameScore>();
        world.init_resource::<NextState<Menu>>();
        world.init_resource::<Messages<LifeLost>>();
        world.init_resource::<Messages<PlayerDestroyed>>();
        world.spawn((
            Player { speed: 8.0, lives },
            Transform::from_xyz(12.0, PLAYER_Y, 1.0),
        ));
        world
    }

    #[test]
    fn reaching_zero_lives_ends_the_run_exactly_once() {
        let mut world = lives_world(1);
        world.resource_mut::<Messages<LifeLost>>().write(LifeLost);

        world.run_system_once(apply_life_losses).unwrap();

        let mut players = world.query::<&Player>();
        assert_eq!(players.iter(&world).count(), 0, "ship despawns at zero lives");
        assert!(matches!(
            *world.resource::<NextState<Menu>>(),
            NextState::Pending(Menu::GameOver)
        ));
        let wrecks = world.resource::<Messages<PlayerDestroyed>>();
        let mut cursor = wrecks.get_cursor();
        let positions: Vec<Vec2> = cursor.read(wrecks).map(|wreck| wreck.position).collect();
        assert_eq!(positions, vec![Vec2::new(12.0, PLAYER_Y)]);

        // A stray loss after the ship is gone must not end the run again.
        world.resource_mut::<Messages<LifeLost>>().write(LifeLost);
        world.run_system_once(apply_life_losses).unwrap();
        assert_eq!(world.resource::<Messages<PlayerDestroyed>>().len(), 1);
    }

    #[test]
    fn losses_above_zero_only_deduct() {
        let mut world = lives_world(3);
        world.resource_mut::<Messages<LifeLost>>().write(LifeLost);

        world.run_system_once(apply_life_losses).unwrap();

        let mut players = world.query::<&Player>();
        let player = players.single(&world).unwrap();
        assert_eq!(player.lives, 2);
        assert!(world.resource::<Messages<PlayerDestroyed>>().is_empty());
        assert!(matches!(
            *world.resource::<NextState<Menu>>(),
            NextState::Unchanged
        ));
    }

    #[test]
    fn many_breaches_in_one_tick_cost_one_life() {
        let mut world = World::new();
        world.init_resource::<Messages<EnemyBreached>>();
        world.init_resource::<Messages<LifeLost>>();
        for _ in 0..3 {
            world.resource_mut::<Messages<EnemyBreached>>().write(EnemyBreached);
        }

        world.run_system_once(breach_costs_life).unwrap();

        assert_eq!(world.resource::<Messages<LifeLost>>().len(), 1);
    }

    #[test]
    fn award_reports_milestone_crossings() {
        let mut score = GameScore::default();
        score.score = 950;
        assert_eq!(score.award(30), 0);
        assert_eq!(score.score, 980);
        assert_eq!(score.award(30), 1);
        assert_eq!(score.score, 1010);
    }

    #[test]
    fn one_award_can_cross_several_milestones() {
        let mut score = GameScore::default();
        assert_eq!(score.award(2500), 2);
    }

    #[test]
    fn lives_never_underflow() {
        let mut player = Player {
            speed: 8.0,
            lives: 1,
        };
        player.lives = player.lives.saturating_sub(3);
        assert_eq!(player.lives, 0);
    }
}
