//! Axis-aligned overlap tests
//!
//! Every dodge variant reduces collision to rectangle intersection between
//! the player's box and each falling obstacle's box.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityId, EntityStore};

/// Axis-aligned rectangle, `pos` is the top-left corner (screen space, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.pos + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict intersection: rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        let a_min = self.min();
        let a_max = self.max();
        let b_min = other.min();
        let b_max = other.max();
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    /// Point containment, inclusive of the top/left edge
    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.pos.x && point.x < max.x && point.y >= self.pos.y && point.y < max.y
    }

    /// True once the rectangle has left `bounds` through the bottom or a side.
    /// Rectangles still above the top edge have not entered yet.
    pub fn has_exited(&self, bounds: &Rect) -> bool {
        let max = self.max();
        let b_max = bounds.max();
        self.pos.y > b_max.y || max.x <= bounds.pos.x || self.pos.x >= b_max.x
    }
}

/// Find every live entity overlapping `player`, in store order.
///
/// Each hit is marked dead so it is removed on the next prune; the caller
/// applies one effect per returned id (hits are not deduplicated).
pub fn collect_overlaps<P>(store: &mut EntityStore<P>, player: &Rect) -> Vec<EntityId> {
    let mut hits = Vec::new();
    for entity in store.iter_mut() {
        if entity.alive && entity.rect.overlaps(player) {
            entity.alive = false;
            hits.push(entity.id);
        }
    }
    hits
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let b = Rect::new(20.0, 20.0, 40.0, 40.0);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(0.0, 0.0, 40.0, 40.0);
        let right = Rect::new(40.0, 0.0, 40.0, 40.0);
        let below = Rect::new(0.0, 40.0, 40.0, 40.0);
        assert!(!a.overlaps(&right));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn test_contains_point() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(Vec2::new(10.0, 10.0)));
        assert!(r.contains(Vec2::new(29.9, 29.9)));
        assert!(!r.contains(Vec2::new(30.0, 15.0)));
        assert!(!r.contains(Vec2::new(5.0, 15.0)));
    }

    #[test]
    fn test_has_exited() {
        let bounds = Rect::new(0.0, 0.0, 360.0, 640.0);
        assert!(!Rect::new(10.0, -40.0, 40.0, 40.0).has_exited(&bounds));
        assert!(!Rect::new(10.0, 600.0, 40.0, 40.0).has_exited(&bounds));
        assert!(Rect::new(10.0, 641.0, 40.0, 40.0).has_exited(&bounds));
        assert!(Rect::new(-50.0, 10.0, 40.0, 40.0).has_exited(&bounds));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(80.0, 100.0), Vec2::new(40.0, 40.0));
        assert_eq!(r.pos, Vec2::new(60.0, 80.0));
        assert_eq!(r.center(), Vec2::new(80.0, 100.0));
    }

    #[test]
    fn test_collect_overlaps_store_order() {
        let mut store: EntityStore<u8> = EntityStore::new();
        let a = store.spawn(Rect::new(0.0, 0.0, 10.0, 10.0), Vec2::ZERO, 1);
        let _miss = store.spawn(Rect::new(100.0, 100.0, 10.0, 10.0), Vec2::ZERO, 2);
        let c = store.spawn(Rect::new(5.0, 5.0, 10.0, 10.0), Vec2::ZERO, 3);

        let player = Rect::new(0.0, 0.0, 12.0, 12.0);
        let hits = collect_overlaps(&mut store, &player);
        assert_eq!(hits, vec![a, c]);
        assert_eq!(store.iter().filter(|e| e.alive).count(), 1);

        // Dead entities are not hit twice
        assert!(collect_overlaps(&mut store, &player).is_empty());
    }
}
