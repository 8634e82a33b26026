use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::FixedNum;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixedVec2 {
    pub x: FixedNum,
    pub y: FixedNum,
}

impl FixedVec2 {
    pub const ZERO: Self = Self { x: FixedNum::ZERO, y: FixedNum::ZERO };

    pub fn new(x: FixedNum, y: FixedNum) -> Self {
        Self { x, y }
    }

    pub fn from_f32(x: f32, y: f32) -> Self {
        Self {
            x: FixedNum::from_num(x),
            y: FixedNum::from_num(y),
        }
    }

    /// Integer grid offset or coordinate as a vector.
    pub fn from_ivec2(v: IVec2) -> Self {
        Self {
            x: FixedNum::from_num(v.x),
            y: FixedNum::from_num(v.y),
        }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x.to_num(), self.y.to_num())
    }

    pub fn length(self) -> FixedNum {
        let len_sq = self.length_squared();
        if len_sq == FixedNum::ZERO {
            return FixedNum::ZERO;
        }
        len_sq.sqrt()
    }

    pub fn length_squared(self) -> FixedNum {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction, or `ZERO` for a zero-length input.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len == FixedNum::ZERO {
            Self::ZERO
        } else {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        }
    }

    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }

    /// `self * (1 - t) + other * t`. Returns `self` exactly at `t == 0`.
    pub fn lerp(self, other: Self, t: FixedNum) -> Self {
        self * (FixedNum::ONE - t) + other * t
    }

    /// Component-wise floor into integer grid space, saturating at the `i32` range.
    pub fn floor_to_ivec2(self) -> IVec2 {
        IVec2::new(
            self.x.floor().saturating_to_num::<i32>(),
            self.y.floor().saturating_to_num::<i32>(),
        )
    }

    pub fn distance(self, other: Self) -> FixedNum {
        (self - other).length()
    }

    /// Angle of the vector in radians, measured from +x.
    pub fn angle(self) -> f32 {
        let v = self.to_vec2();
        v.y.atan2(v.x)
    }
}

impl std::ops::Add for FixedVec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::AddAssign for FixedVec2 {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::ops::Sub for FixedVec2 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<FixedNum> for FixedVec2 {
    type Output = Self;
    fn mul(self, rhs: FixedNum) -> Self::Output {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Div<FixedNum> for FixedVec2 {
    type Output = Self;
    fn div(self, rhs: FixedNum) -> Self::Output {
        Self { x: self.x / rhs, y: self.y / rhs }
    }
}

impl std::ops::Neg for FixedVec2 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self { x: -self.x, y: -self.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_zero_is_zero() {
        assert_eq!(FixedVec2::ZERO.normalize(), FixedVec2::ZERO);
    }

    #[test]
    fn test_lerp_endpoints_are_exact() {
        let a = FixedVec2::from_f32(0.6, -0.8);
        let b = FixedVec2::from_f32(-1.0, 0.0);
        assert_eq!(a.lerp(b, FixedNum::ZERO), a);
        assert_eq!(a.lerp(b, FixedNum::ONE), b);
    }

    #[test]
    fn test_floor_rounds_toward_negative_infinity() {
        let v = FixedVec2::from_f32(-0.5, 1.75);
        assert_eq!(v.floor_to_ivec2(), IVec2::new(-1, 1));
    }

    #[test]
    fn test_floor_saturates_outside_i32() {
        let v = FixedVec2::new(FixedNum::from_num(1e10), FixedNum::MIN);
        assert_eq!(v.floor_to_ivec2(), IVec2::new(i32::MAX, i32::MIN));
    }

    #[test]
    fn test_diagonal_normalizes_to_unit_length() {
        let d = FixedVec2::from_f32(-1.0, -1.0).normalize();
        let len: f32 = d.length().to_num();
        assert!((len - 1.0).abs() < 1e-3, "length was {}", len);
        assert!(d.x < FixedNum::ZERO && d.y < FixedNum::ZERO);
    }
}
