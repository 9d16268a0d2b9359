//! Integer points, extents and rectangles in pixel space

use std::fmt;
use std::ops::Add;

/// Pixel coordinate, `x` to the right and `y` downwards
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    /// Column
    pub x: u32,
    /// Row
    pub y: u32,
}

impl Point {
    /// The origin
    pub const ZERO: Self = Self { x: 0, y: 0 };

    /// Create a point
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Componentwise scale by a grid cell position, saturating at `u32::MAX`
    pub const fn scaled(step: Extent, column: u32, row: u32) -> Self {
        Self {
            x: step.width.saturating_mul(column),
            y: step.height.saturating_mul(row),
        }
    }
}

/// Componentwise, saturating at `u32::MAX` so lookups past the edge miss
impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Width and height of a pixel region
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Extent {
    /// Horizontal size in pixels
    pub width: u32,
    /// Vertical size in pixels
    pub height: u32,
}

impl Extent {
    /// Largest representable extent
    pub const MAX: Self = Self::square(u32::MAX);

    /// Create an extent
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Extent with the same size on both axes
    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }

    /// Number of pixels covered
    pub const fn area(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// True when either axis is zero
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// True when both axes are strictly smaller than `other`
    pub const fn fits_strictly_within(self, other: Self) -> bool {
        self.width < other.width && self.height < other.height
    }

    /// Componentwise multiplication, `None` on overflow
    pub const fn checked_scale(self, factor: Self) -> Option<Self> {
        match (
            self.width.checked_mul(factor.width),
            self.height.checked_mul(factor.height),
        ) {
            (Some(width), Some(height)) => Some(Self::new(width, height)),
            _ => None,
        }
    }

    /// Componentwise addition, `None` on overflow
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match (
            self.width.checked_add(other.width),
            self.height.checked_add(other.height),
        ) {
            (Some(width), Some(height)) => Some(Self::new(width, height)),
            _ => None,
        }
    }

    /// Componentwise subtraction, saturating at zero
    pub const fn saturating_sub(self, other: Self) -> Self {
        Self::new(
            self.width.saturating_sub(other.width),
            self.height.saturating_sub(other.height),
        )
    }
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Top-left corner
    pub origin: Point,
    /// Size of the rectangle
    pub size: Extent,
}

impl Rect {
    /// Create a rectangle
    pub const fn new(origin: Point, size: Extent) -> Self {
        Self { origin, size }
    }

    /// Rectangle anchored at the origin
    pub const fn at_origin(size: Extent) -> Self {
        Self::new(Point::ZERO, size)
    }

    /// Exclusive right edge
    pub const fn right(&self) -> u32 {
        self.origin.x.saturating_add(self.size.width)
    }

    /// Exclusive bottom edge
    pub const fn bottom(&self) -> u32 {
        self.origin.y.saturating_add(self.size.height)
    }

    /// True when `self` lies entirely within a region of size `bounds`
    pub const fn fits_within(&self, bounds: Extent) -> bool {
        self.right() <= bounds.width && self.bottom() <= bounds.height
    }

    /// Check whether a point lies inside the rectangle
    pub const fn contains(&self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.right()
            && point.y >= self.origin.y
            && point.y < self.bottom()
    }
}
