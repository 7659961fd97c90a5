//! Integer pixel geometry: Offset, Size, Region, Spacing.
//!
//! Screen coordinates grow right and down. Blocks carry an [`Offset`] that maps
//! their widget rects (block-local) into screen space, popups and panels are
//! positioned in screen space directly.

use std::ops::{Add, Neg, Sub};

// ---------------------------------------------------------------------------
// Offset
// ---------------------------------------------------------------------------

/// A 2D position or displacement in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Offset = Offset { x: 0, y: 0 };

    /// Create a new offset.
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Interpolate from `self` toward `target` by `factor`, rounding to the nearest pixel.
    ///
    /// `factor = 0.0` keeps `self`, `factor = 1.0` lands on `target`.
    #[inline]
    pub fn approach(self, target: Offset, factor: f32) -> Offset {
        let inv = 1.0 - factor;
        Offset {
            x: (target.x as f32 * factor + self.x as f32 * inv).round() as i32,
            y: (target.y as f32 * factor + self.y as f32 * inv).round() as i32,
        }
    }

    /// Round both components to the nearest multiple of `grid`.
    ///
    /// A grid of 0 or 1 returns the offset unchanged.
    #[inline]
    pub fn snap(self, grid: i32) -> Offset {
        if grid <= 1 {
            return self;
        }
        let snap1 = |v: i32| {
            let half = grid / 2;
            if v >= 0 {
                ((v + half) / grid) * grid
            } else {
                -(((-v + half) / grid) * grid)
            }
        };
        Offset { x: snap1(self.x), y: snap1(self.y) }
    }

    /// Z component of the 2D cross product `self x other`.
    #[inline]
    pub const fn cross(self, other: Offset) -> i64 {
        self.x as i64 * other.y as i64 - self.y as i64 * other.x as i64
    }
}

impl Add for Offset {
    type Output = Offset;
    #[inline]
    fn add(self, rhs: Offset) -> Offset {
        Offset { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Offset {
    type Output = Offset;
    #[inline]
    fn sub(self, rhs: Offset) -> Offset {
        Offset { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Offset {
    type Output = Offset;
    #[inline]
    fn neg(self) -> Offset {
        Offset { x: -self.x, y: -self.y }
    }
}

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A width x height extent in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    #[inline]
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Place this size at `origin`.
    #[inline]
    pub const fn at(self, origin: Offset) -> Region {
        Region { x: origin.x, y: origin.y, width: self.width, height: self.height }
    }
}

// ---------------------------------------------------------------------------
// Region
// ---------------------------------------------------------------------------

/// An axis-aligned rectangle: top-left corner plus size.
///
/// Widget rects, block bounds, popup parent rects and panel rects are all
/// regions. `right()` and `bottom()` are exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub const EMPTY: Region = Region { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub const fn right(self) -> i32 {
        self.x + self.width
    }

    #[inline]
    pub const fn bottom(self) -> i32 {
        self.y + self.height
    }

    #[inline]
    pub const fn offset(self) -> Offset {
        Offset { x: self.x, y: self.y }
    }

    #[inline]
    pub const fn size(self) -> Size {
        Size { width: self.width, height: self.height }
    }

    /// Whether the rect has no area.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Integer centre point.
    #[inline]
    pub const fn center(self) -> Offset {
        Offset { x: self.x + self.width / 2, y: self.y + self.height / 2 }
    }

    /// Whether `point` lies inside this rect.
    #[inline]
    pub const fn contains(self, point: Offset) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }

    /// Whether `other` is entirely inside this rect.
    #[inline]
    pub const fn contains_region(self, other: Region) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Smallest rect containing both. An empty side is ignored.
    #[inline]
    pub fn union(self, other: Region) -> Region {
        if self.is_empty() {
            return other;
        }
        if other.is_empty() {
            return self;
        }
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Region { x: x1, y: y1, width: x2 - x1, height: y2 - y1 }
    }

    #[inline]
    pub const fn translate(self, by: Offset) -> Region {
        Region { x: self.x + by.x, y: self.y + by.y, width: self.width, height: self.height }
    }

    /// Expand outward by `spacing`.
    #[inline]
    pub const fn grow(self, spacing: Spacing) -> Region {
        Region {
            x: self.x - spacing.left,
            y: self.y - spacing.top,
            width: self.width + spacing.left + spacing.right,
            height: self.height + spacing.top + spacing.bottom,
        }
    }

    /// Expand outward by a fraction of the rect's own size on each axis.
    ///
    /// Used by panel overlap tests: `fx = 0.2` widens by 20% of the width on both sides.
    #[inline]
    pub fn grow_fraction(self, fx: f32, fy: f32) -> Region {
        let dx = (self.width as f32 * fx) as i32;
        let dy = (self.height as f32 * fy) as i32;
        Region {
            x: self.x - dx,
            y: self.y - dy,
            width: self.width + 2 * dx,
            height: self.height + 2 * dy,
        }
    }

    /// Horizontal position of `x` inside this rect as thirds: -1 left, 0 middle, 1 right.
    #[inline]
    pub const fn third(self, x: i32) -> i32 {
        let w3 = self.width / 3;
        if x < self.x + w3 {
            -1
        } else if x > self.right() - w3 {
            1
        } else {
            0
        }
    }
}

// ---------------------------------------------------------------------------
// Spacing
// ---------------------------------------------------------------------------

/// Per-side spacing, used for safety margins around popups.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Spacing {
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    pub left: i32,
}

impl Spacing {
    #[inline]
    pub const fn all(value: i32) -> Self {
        Self { top: value, right: value, bottom: value, left: value }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
