//! The game over menu.

use bevy::prelude::*;

use crate::{game::state::GameScore, menus::Menu, screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Menu::GameOver), spawn_gameover_menu);
}

fn spawn_gameover_menu(mut commands: Commands, score: Res<GameScore>) {
    commands.spawn((
        widget::ui_root("Game Over Menu"),
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.6)),
        GlobalZIndex(2),
        DespawnOnExit(Menu::GameOver),
        children![
            widget::header("GAME OVER"),
            widget::label(format!("Final Score: {}", score.score)),
            widget::button("Restart Game", restart_game),
            widget::button("Quit to title", quit_to_title),
        ],
    ));
}

/// Bounce through the loading screen so `OnEnter(Screen::Gameplay)`
/// re-initializes every entity and resource. Assets are already loaded, so
/// the bounce is instant.
fn restart_game(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Loading);
}

fn quit_to_title(_: On<Pointer<Click>>, mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Title);
}
