//! Axis-aligned bounding boxes for collision checks.
//!
//! Every collidable entity carries a [`Hitbox`] next to its `Transform`; the
//! transform's translation is the box center. Entity counts stay in the tens,
//! so collision passes are plain pairwise checks with no broad phase.
//! "Inactive" entities are simply despawned and therefore never matched.

use bevy::prelude::*;

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Hitbox>();
}

/// Collision extents (full width and height) of an entity.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Hitbox(pub Vec2);

impl Hitbox {
    pub fn splat(size: f32) -> Self {
        Self(Vec2::splat(size))
    }

    /// Rectangle overlap test, with touching edges counting as overlap.
    pub fn intersects(&self, pos: Vec2, other: &Hitbox, other_pos: Vec2) -> bool {
        let a_min = pos - self.0 / 2.0;
        let a_max = pos + self.0 / 2.0;
        let b_min = other_pos - other.0 / 2.0;
        let b_max = other_pos + other.0 / 2.0;

        !(a_min.x > b_max.x || a_max.x < b_min.x || a_min.y > b_max.y || a_max.y < b_min.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_boxes_intersect() {
        let a = Hitbox::splat(40.0);
        let b = Hitbox::splat(40.0);
        assert!(a.intersects(Vec2::ZERO, &b, Vec2::new(30.0, 10.0)));
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = Hitbox::splat(40.0);
        let b = Hitbox::splat(40.0);
        assert!(!a.intersects(Vec2::ZERO, &b, Vec2::new(100.0, 0.0)));
        assert!(!a.intersects(Vec2::ZERO, &b, Vec2::new(0.0, -100.0)));
    }

    #[test]
    fn touching_edges_count_as_overlap() {
        let a = Hitbox::splat(40.0);
        let b = Hitbox::splat(40.0);
        // Right edge of `a` exactly meets the left edge of `b`.
        assert!(a.intersects(Vec2::ZERO, &b, Vec2::new(40.0, 0.0)));
    }

    #[test]
    fn intersection_is_symmetric() {
        let a = Hitbox(Vec2::new(50.0, 50.0));
        let b = Hitbox(Vec2::new(10.0, 80.0));
        for (pa, pb) in [
            (Vec2::ZERO, Vec2::new(25.0, 0.0)),
            (Vec2::new(-10.0, 3.0), Vec2::new(200.0, 0.0)),
            (Vec2::new(5.0, 5.0), Vec2::new(5.0, 5.0)),
        ] {
            assert_eq!(
                a.intersects(pa, &b, pb),
                b.intersects(pb, &a, pa),
                "asymmetric result for {pa:?} vs {pb:?}"
            );
        }
    }

    #[test]
    fn contained_box_intersects() {
        let big = Hitbox::splat(100.0);
        let small = Hitbox::splat(10.0);
        assert!(big.intersects(Vec2::ZERO, &small, Vec2::new(5.0, 5.0)));
    }
}
