use std::ops::{Add, Mul, Sub};

use serde::Deserialize;

/// A point (or offset) in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(from = "[f32; 2]")]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn dist(self, other: Self) -> f32 {
        (other - self).length()
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Distance from `self` to the closest point on the segment `a..=b`.
    ///
    /// Degenerate segments (`a == b`) measure the distance to `a`.
    pub fn dist_to_segment(self, a: Self, b: Self) -> f32 {
        let ab = b - a;
        let len_sq = ab.dot(ab);
        if len_sq == 0.0 {
            return self.dist(a);
        }
        let t = clamp((self - a).dot(ab) / len_sq, 0.0, 1.0);
        self.dist(lerp(a..=b, t))
    }
}

impl From<[f32; 2]> for Vec2f {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2f {
    type Output = Vec2f;

    fn add(self, rhs: Vec2f) -> Self::Output {
        vec2(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2f {
    type Output = Vec2f;

    fn sub(self, rhs: Vec2f) -> Self::Output {
        vec2(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2f {
    type Output = Vec2f;

    fn mul(self, rhs: f32) -> Self::Output {
        vec2(self.x * rhs, self.y * rhs)
    }
}

pub fn vec2(x: f32, y: f32) -> Vec2f {
    Vec2f { x, y }
}

pub fn lerp(range: std::ops::RangeInclusive<Vec2f>, t: f32) -> Vec2f {
    *range.start() * (1.0 - t) + *range.end() * t
}

/// Clamps `v` into `lo..=hi`. Unlike `f64::clamp` this never panics; NaN maps to `lo`.
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v >= hi {
        hi
    } else if v >= lo {
        v
    } else {
        lo
    }
}
