//! In-game overlay: score, lives, active effect countdowns, shield ring.

use bevy::prelude::*;

use super::{
    TICK_RATE,
    effects::ActiveEffects,
    player::{PLAYER_SIZE, Player},
    state::GameScore,
};
use crate::{screens::Screen, theme::palette::LABEL_TEXT};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Gameplay), spawn_hud);
    app.add_systems(
        Update,
        (update_score_label, update_lives_label, update_effect_readout, draw_shield_ring)
            .run_if(in_state(Screen::Gameplay)),
    );
}

#[derive(Component)]
struct ScoreLabel;

#[derive(Component)]
struct LivesLabel;

#[derive(Component)]
struct EffectReadout;

fn hud_text(text: impl Into<String>) -> impl Bundle {
    (
        Text(text.into()),
        TextFont::from_font_size(18.0),
        TextColor(LABEL_TEXT),
    )
}

fn spawn_hud(mut commands: Commands) {
    commands.spawn((
        Name::new("Hud"),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        },
        Pickable::IGNORE,
        DespawnOnExit(Screen::Gameplay),
        children![
            (ScoreLabel, hud_text("Score: 0")),
            (LivesLabel, hud_text("Lives: 3")),
            (EffectReadout, hud_text("")),
        ],
    ));
}

fn update_score_label(score: Res<GameScore>, mut label: Query<&mut Text, With<ScoreLabel>>) {
    if !score.is_changed() {
        return;
    }
    for mut text in &mut label {
        text.0 = format!("Score: {}", score.score);
    }
}

fn update_lives_label(
    player: Query<&Player>,
    mut label: Query<&mut Text, With<LivesLabel>>,
) {
    let lives = player.single().map(|player| player.lives).unwrap_or(0);
    for mut text in &mut label {
        text.0 = format!("Lives: {lives}");
    }
}

/// One line per active effect with its remaining time, rounded up to whole
/// seconds.
fn update_effect_readout(
    effects: Res<ActiveEffects>,
    mut label: Query<&mut Text, With<EffectReadout>>,
) {
    let lines: Vec<String> = effects
        .readouts()
        .into_iter()
        .map(|(name, remaining)| format!("{name}: {}s", remaining.div_ceil(TICK_RATE as u32)))
        .collect();
    for mut text in &mut label {
        text.0 = lines.join("\n");
    }
}

fn draw_shield_ring(
    mut gizmos: Gizmos,
    effects: Res<ActiveEffects>,
    player: Query<&Transform, With<Player>>,
) {
    if !effects.shield.active {
        return;
    }
    for transform in &player {
        gizmos.circle_2d(
            transform.translation.truncate(),
            PLAYER_SIZE * 0.8,
            Color::srgb(0.2, 1.0, 1.0),
        );
    }
}
