//! World-space vectors and wall facings.
//!
//! Tiles live in a 3-D block world. Every tile hangs on a wall and faces
//! one of the four horizontal directions; the facing fixes the plane of
//! the board but not which in-plane direction is "right" or "down".

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// A 3-D vector / point in world units (one block = 1.0).
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(&self, other: &Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn length_squared(&self) -> f64 {
        self.dot(self)
    }

    #[inline]
    pub fn distance_squared(&self, other: &Vec3) -> f64 {
        (*self - *other).length_squared()
    }

    /// Snap a raw position to the center of the block containing it.
    pub fn snapped_to_block_center(&self) -> Vec3 {
        Vec3 {
            x: self.x.floor() + 0.5,
            y: self.y.floor() + 0.5,
            z: self.z.floor() + 0.5,
        }
    }

    /// Unit length within `eps`.
    pub fn is_unit(&self, eps: f64) -> bool {
        (self.length_squared() - 1.0).abs() <= eps
    }

    /// Exactly one non-zero component (±1 along a world axis).
    pub fn is_axis_aligned(&self) -> bool {
        let nonzero = [self.x, self.y, self.z]
            .iter()
            .filter(|c| c.abs() > f64::EPSILON)
            .count();
        nonzero == 1 && self.is_unit(1e-9)
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Horizontal direction a wall-mounted tile faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    North,
    South,
    East,
    West,
}

impl Facing {
    /// "Right" as seen by someone looking at the tile.
    pub fn right_axis(self) -> Vec3 {
        match self {
            Facing::North => Vec3::new(1.0, 0.0, 0.0),
            Facing::South => Vec3::new(-1.0, 0.0, 0.0),
            Facing::East => Vec3::new(0.0, 0.0, 1.0),
            Facing::West => Vec3::new(0.0, 0.0, -1.0),
        }
    }

    /// "Down" is world-down for every wall facing.
    pub fn down_axis(self) -> Vec3 {
        Vec3::new(0.0, -1.0, 0.0)
    }

    /// Outward normal of the wall.
    pub fn normal(self) -> Vec3 {
        match self {
            Facing::North => Vec3::new(0.0, 0.0, -1.0),
            Facing::South => Vec3::new(0.0, 0.0, 1.0),
            Facing::East => Vec3::new(1.0, 0.0, 0.0),
            Facing::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }
}
