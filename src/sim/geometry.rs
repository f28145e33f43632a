//! Axis-aligned boxes and the solid-surface abstraction
//!
//! World space is y-down: `y` is the top edge and grows toward the ground.

use glam::Vec2;

use super::state::{House, Platform};
use crate::consts::*;

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Rect of the given size at a position
    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Open-interval overlap of the horizontal spans
    #[inline]
    pub fn overlaps_x(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x
    }

    /// Open-interval box overlap
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.overlaps_x(other) && self.y < other.bottom() && self.bottom() > other.y
    }
}

/// Anything with a world-space bounding box
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// A surface the player can stand on, bump into or be pushed out of.
///
/// Platforms and unlit chimney caps share one collision path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Solid {
    Platform(Rect),
    /// Thin cap over a chimney; `house` indexes `World::houses`
    ChimneyCap { house: usize, rect: Rect },
}

impl Solid {
    pub fn platform(platform: &Platform) -> Self {
        Solid::Platform(platform.bounds())
    }

    /// Cap slightly wider than the chimney, sitting on its top edge
    pub fn chimney(house: usize, h: &House) -> Self {
        let chimney = h.chimney_bounds();
        Solid::ChimneyCap {
            house,
            rect: Rect::new(
                chimney.x - CHIMNEY_CAP_OVERHANG,
                chimney.y,
                chimney.w + CHIMNEY_CAP_OVERHANG * 2.0,
                CHIMNEY_CAP_THICKNESS,
            ),
        }
    }
}

impl Bounded for Solid {
    fn bounds(&self) -> Rect {
        match self {
            Solid::Platform(rect) | Solid::ChimneyCap { rect, .. } => *rect,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(!a.overlaps_x(&b));

        let c = Rect::new(9.9, 5.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn test_overlaps_x_ignores_height() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let far_below = Rect::new(5.0, 500.0, 10.0, 10.0);
        assert!(a.overlaps_x(&far_below));
        assert!(!a.intersects(&far_below));
    }

    #[test]
    fn test_chimney_cap_geometry() {
        let house = House::new(1000.0, 500.0);
        let Solid::ChimneyCap { house: idx, rect } = Solid::chimney(3, &house) else {
            panic!("expected a chimney cap");
        };
        assert_eq!(idx, 3);
        // Chimney at (x + 35, y - 35), 10 wide; cap overhangs by 2 each side
        assert_eq!(rect, Rect::new(1033.0, 465.0, 14.0, 3.0));
    }

    #[test]
    fn test_rect_center() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.center(), Vec2::new(25.0, 40.0));
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
    }
}
