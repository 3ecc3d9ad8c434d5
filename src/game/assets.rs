//! Image handles for everything the game draws from sprites.
//!
//! Loaded up front through `asset_tracking` so gameplay can only start once
//! every image is ready; a single failed load is fatal and surfaces on the
//! loading screen.

use bevy::prelude::*;

use crate::asset_tracking::LoadResource;

pub(super) fn plugin(app: &mut App) {
    app.load_resource::<GameAssets>();
}

#[derive(Resource, Asset, Clone, Reflect)]
pub struct GameAssets {
    #[dependency]
    pub player: Handle<Image>,
    #[dependency]
    pub enemy: Handle<Image>,
    /// One image per bullet tier, index 0 = tier 1.
    #[dependency]
    pub bullets: Vec<Handle<Image>>,
    #[dependency]
    pub powerup: Handle<Image>,
}

impl FromWorld for GameAssets {
    fn from_world(world: &mut World) -> Self {
        let assets = world.resource::<AssetServer>();
        Self {
            player: assets.load("images/player.png"),
            enemy: assets.load("images/enemy.png"),
            bullets: vec![
                assets.load("images/bullet1.png"),
                assets.load("images/bullet2.png"),
                assets.load("images/bullet3.png"),
                assets.load("images/bullet4.png"),
            ],
            powerup: assets.load("images/powerup.png"),
        }
    }
}

impl GameAssets {
    /// The image for a bullet tier (1-based, clamped to the available tiers).
    pub fn bullet(&self, tier: u8) -> &Handle<Image> {
        let index = (tier.max(1) as usize - 1).min(self.bullets.len() - 1);
        &self.bullets[index]
    }
}
