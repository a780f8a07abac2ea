/// Two-component float vector used for window, pointer and NDC geometry
use std::ops::{Add, Div, Index, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    pub fn floor(self) -> Self {
        Self::new(self.x.floor(), self.y.floor())
    }

    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Apply `f` to each axis in order, x first. The axis index is passed
    /// along so callers can look up per-axis data.
    pub fn map<T>(self, mut f: impl FnMut(usize, f32) -> T) -> [T; 2] {
        let x = f(0, self.x);
        let y = f(1, self.y);
        [x, y]
    }

    pub fn to_array(self) -> [f32; 2] {
        [self.x, self.y]
    }
}

impl From<[f32; 2]> for Vec2f {
    fn from([x, y]: [f32; 2]) -> Self {
        Self::new(x, y)
    }
}

impl Index<usize> for Vec2f {
    type Output = f32;

    fn index(&self, axis: usize) -> &f32 {
        match axis {
            0 => &self.x,
            1 => &self.y,
            _ => panic!("Vec2f axis out of range: {axis}"),
        }
    }
}

impl Neg for Vec2f {
    type Output = Vec2f;

    fn neg(self) -> Vec2f {
        Vec2f::new(-self.x, -self.y)
    }
}

macro_rules! impl_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Vec2f {
            type Output = Vec2f;

            fn $method(self, rhs: Vec2f) -> Vec2f {
                Vec2f::new(self.x $op rhs.x, self.y $op rhs.y)
            }
        }

        impl $trait<f32> for Vec2f {
            type Output = Vec2f;

            fn $method(self, rhs: f32) -> Vec2f {
                Vec2f::new(self.x $op rhs, self.y $op rhs)
            }
        }

        impl $trait<Vec2f> for f32 {
            type Output = Vec2f;

            fn $method(self, rhs: Vec2f) -> Vec2f {
                Vec2f::new(self $op rhs.x, self $op rhs.y)
            }
        }
    };
}

impl_op!(Add, add, +);
impl_op!(Sub, sub, -);
impl_op!(Mul, mul, *);
impl_op!(Div, div, /);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_ops_both_sides() {
        let v = Vec2f::new(2.0, 4.0);
        assert_eq!(2.0 * v, Vec2f::new(4.0, 8.0));
        assert_eq!(v / 2.0, Vec2f::new(1.0, 2.0));
        assert_eq!(1.0 - v, Vec2f::new(-1.0, -3.0));
        assert_eq!(v + 1.0, Vec2f::new(3.0, 5.0));
    }

    #[test]
    fn test_map_passes_axis_in_order() {
        let mut seen = Vec::new();
        let out = Vec2f::new(1.5, -2.5).map(|axis, v| {
            seen.push(axis);
            v.floor() as i32
        });
        assert_eq!(seen, vec![0, 1]);
        assert_eq!(out, [1, -3]);
    }
}
