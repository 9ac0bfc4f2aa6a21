use serde::{Deserialize, Serialize};

/// A 2D point or velocity in level space.
///
/// Y grows downward, matching canvas conventions: gravity is positive and
/// jump impulses are negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned bounding box, the collision shape for every entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Aabb {
    /// Extents must be positive; a degenerate box is a generator bug.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        debug_assert!(
            width > 0.0 && height > 0.0,
            "degenerate AABB {width}x{height} at ({x}, {y})"
        );
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Overlap test with strict inequalities on all four edges: boxes that
    /// merely touch do not collide. A player standing flush on a platform
    /// does not also count as colliding with it sideways.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}
