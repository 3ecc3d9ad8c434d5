//! A loading screen during which game assets are loaded.
//! This avoids stuttering and missing sprites, especially on Wasm.

use bevy::prelude::*;

use crate::{asset_tracking::ResourceHandles, screens::Screen, theme::widget};

pub(super) fn plugin(app: &mut App) {
    app.add_systems(OnEnter(Screen::Loading), spawn_loading_screen);

    app.add_systems(
        Update,
        enter_gameplay_screen.run_if(in_state(Screen::Loading).and(all_assets_loaded)),
    );

    // A single failed asset is fatal: show the error and stay on this screen.
    app.add_systems(
        Update,
        show_load_error.run_if(in_state(Screen::Loading).and(any_asset_failed)),
    );
}

fn spawn_loading_screen(mut commands: Commands) {
    commands.spawn((
        widget::ui_root("Loading Screen"),
        DespawnOnExit(Screen::Loading),
        children![widget::label("Loading assets...")],
    ));
}

fn enter_gameplay_screen(mut next_screen: ResMut<NextState<Screen>>) {
    next_screen.set(Screen::Gameplay);
}

fn all_assets_loaded(resource_handles: Res<ResourceHandles>) -> bool {
    resource_handles.is_all_done()
}

fn any_asset_failed(resource_handles: Res<ResourceHandles>) -> bool {
    resource_handles.load_error().is_some()
}

/// Marker for the error overlay so it is only spawned once.
#[derive(Component)]
struct LoadErrorOverlay;

fn show_load_error(
    mut commands: Commands,
    resource_handles: Res<ResourceHandles>,
    existing: Query<(), With<LoadErrorOverlay>>,
) {
    if !existing.is_empty() {
        return;
    }
    let message = resource_handles.load_error().unwrap_or_default().to_string();
    commands.spawn((
        widget::ui_root("Load Error Screen"),
        LoadErrorOverlay,
        GlobalZIndex(3),
        DespawnOnExit(Screen::Loading),
        children![
            widget::header("ERROR LOADING ASSETS"),
            widget::label(message),
        ],
    ));
}
