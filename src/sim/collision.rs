//! Collision detection
//!
//! Every body in the arena is treated as a square of half-extent `size`
//! centred on its position. Touching edges do not count as overlap.

use glam::Vec2;

/// Axis-aligned box overlap between two bodies given as (centre, half-size)
#[inline]
pub fn aabb_overlap(a: Vec2, a_size: f32, b: Vec2, b_size: f32) -> bool {
    let reach = a_size + b_size;
    (a.x - b.x).abs() < reach && (a.y - b.y).abs() < reach
}

/// True when `point` lies strictly inside the blast radius around `center`
#[inline]
pub fn within_radius(center: Vec2, point: Vec2, radius: f32) -> bool {
    center.distance_squared(point) < radius * radius
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlapping_boxes() {
        assert!(aabb_overlap(Vec2::new(10.0, 10.0), 8.0, Vec2::new(15.0, 15.0), 8.0));
        assert!(aabb_overlap(Vec2::splat(50.0), 10.0, Vec2::splat(50.0), 10.0));
    }

    #[test]
    fn test_separated_boxes() {
        assert!(!aabb_overlap(Vec2::ZERO, 5.0, Vec2::new(100.0, 100.0), 5.0));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        assert!(!aabb_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_mixed_sizes() {
        assert!(aabb_overlap(Vec2::ZERO, 5.0, Vec2::new(20.0, 0.0), 16.0));
        assert!(!aabb_overlap(Vec2::ZERO, 5.0, Vec2::new(20.0, 0.0), 14.0));
    }

    #[test]
    fn test_blast_radius() {
        assert!(within_radius(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.1));
        assert!(!within_radius(Vec2::ZERO, Vec2::new(3.0, 4.0), 5.0));
    }

    proptest! {
        #[test]
        fn aabb_is_symmetric(
            ax in -1000.0f32..1000.0, ay in -1000.0f32..1000.0, a_size in 0.0f32..50.0,
            bx in -1000.0f32..1000.0, by in -1000.0f32..1000.0, b_size in 0.0f32..50.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(aabb_overlap(a, a_size, b, b_size), aabb_overlap(b, b_size, a, a_size));
        }

        #[test]
        fn boxes_exactly_touching_never_collide(
            ax in -500i32..500, ay in -500i32..500, a_size in 1i32..40, b_size in 1i32..40, vertical in any::<bool>(),
        ) {
            // Integer-valued inputs keep the sum exact in f32
            let a = Vec2::new(ax as f32, ay as f32);
            let gap = (a_size + b_size) as f32;
            let b = if vertical { a + Vec2::new(0.0, gap) } else { a + Vec2::new(gap, 0.0) };
            prop_assert!(!aabb_overlap(a, a_size as f32, b, b_size as f32));
        }
    }
}
