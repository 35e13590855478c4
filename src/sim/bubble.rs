//! Bubble entity
//!
//! A movable, collidable circle. Bubbles advance by a fixed per-tick delta and
//! answer two geometric queries: point containment (pointer hits) and
//! bounding-box overlap (playfield culling).

use glam::Vec2;

use crate::error::BubbleError;

/// Rotation wraps at this angle (degrees)
pub const MAX_ROTATION: f32 = 360.0;

/// One simulated bubble
#[derive(Debug, Clone, PartialEq)]
pub struct Bubble {
    center: Vec2,
    radius: f32,
    /// Degrees, always in [0, 360)
    rotation: f32,
    center_step: Vec2,
    rotation_step: f32,
    /// Cached radius², kept in sync with `radius`
    squared_radius: f32,
    /// Bumped on every state change so renderers can poll for updates
    revision: u64,
}

impl Bubble {
    /// Create a stationary, unrotated bubble
    pub fn new(x: f32, y: f32, radius: f32) -> Result<Self, BubbleError> {
        check_finite(x, y)?;
        check_radius(radius)?;
        Ok(Self {
            center: Vec2::new(x, y),
            radius,
            rotation: 0.0,
            center_step: Vec2::ZERO,
            rotation_step: 0.0,
            squared_radius: radius * radius,
            revision: 0,
        })
    }

    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn rotation(&self) -> f32 {
        self.rotation
    }

    pub fn center_step(&self) -> Vec2 {
        self.center_step
    }

    pub fn rotation_step(&self) -> f32 {
        self.rotation_step
    }

    pub fn squared_radius(&self) -> f32 {
        self.squared_radius
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_center(&mut self, x: f32, y: f32) -> Result<&mut Self, BubbleError> {
        check_finite(x, y)?;
        self.center = Vec2::new(x, y);
        self.touch();
        Ok(self)
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<&mut Self, BubbleError> {
        check_radius(radius)?;
        self.radius = radius;
        self.squared_radius = radius * radius;
        self.touch();
        Ok(self)
    }

    /// Set the rotation, normalized into [0, 360)
    pub fn set_rotation(&mut self, degrees: f32) -> Result<&mut Self, BubbleError> {
        if !degrees.is_finite() {
            return Err(BubbleError::NonFiniteCoordinate);
        }
        self.rotation = normalize_rotation(degrees);
        self.touch();
        Ok(self)
    }

    /// Per-tick center delta
    pub fn set_center_step(&mut self, dx: f32, dy: f32) -> Result<&mut Self, BubbleError> {
        check_finite(dx, dy)?;
        self.center_step = Vec2::new(dx, dy);
        self.touch();
        Ok(self)
    }

    /// Per-tick rotation delta (degrees)
    pub fn set_rotation_step(&mut self, dr: f32) -> Result<&mut Self, BubbleError> {
        if !dr.is_finite() {
            return Err(BubbleError::NonFiniteCoordinate);
        }
        self.rotation_step = dr;
        self.touch();
        Ok(self)
    }

    /// Advance one tick
    pub fn step(&mut self) {
        self.center += self.center_step;
        self.rotation = normalize_rotation(self.rotation + self.rotation_step);
        self.touch();
    }

    /// Point-in-circle test (boundary counts as inside)
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dist = Vec2::new(x, y) - self.center;
        dist.length_squared() <= self.squared_radius
    }

    /// Does the bubble's circumscribing square overlap the given rectangle?
    #[inline]
    pub fn intersects(&self, left: f32, top: f32, right: f32, bottom: f32) -> bool {
        (self.center.x + self.radius >= left && self.center.x - self.radius <= right)
            && (self.center.y + self.radius >= top && self.center.y - self.radius <= bottom)
    }

    /// Rebuild a bubble from raw parts. The squared radius is the only derived
    /// value and is recomputed here.
    pub(crate) fn from_parts(
        center: Vec2,
        radius: f32,
        rotation: f32,
        center_step: Vec2,
        rotation_step: f32,
    ) -> Result<Self, BubbleError> {
        let mut bubble = Self::new(center.x, center.y, radius)?;
        check_finite(center_step.x, center_step.y)?;
        if !rotation.is_finite() || !rotation_step.is_finite() {
            return Err(BubbleError::NonFiniteCoordinate);
        }
        bubble.rotation = normalize_rotation(rotation);
        bubble.center_step = center_step;
        bubble.rotation_step = rotation_step;
        Ok(bubble)
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }
}

/// Wrap degrees into [0, 360)
#[inline]
pub fn normalize_rotation(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(MAX_ROTATION);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= MAX_ROTATION { 0.0 } else { wrapped }
}

fn check_radius(radius: f32) -> Result<(), BubbleError> {
    if radius.is_finite() && radius > 0.0 {
        Ok(())
    } else {
        Err(BubbleError::InvalidRadius(radius))
    }
}

fn check_finite(x: f32, y: f32) -> Result<(), BubbleError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(BubbleError::NonFiniteCoordinate)
    }
}
