/// 2D point / displacement in tile units.
///
/// `Copy` value type: every operation returns a new Vector, nothing is
/// mutated in place.

use std::ops::{Add, Mul};

#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Vector { x, y }
    }

    pub fn add(self, other: Vector) -> Vector {
        Vector::new(self.x + other.x, self.y + other.y)
    }

    pub fn scale(self, factor: f64) -> Vector {
        Vector::new(self.x * factor, self.y * factor)
    }
}

impl Add for Vector {
    type Output = Vector;

    fn add(self, other: Vector) -> Vector {
        Vector::add(self, other)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(self, factor: f64) -> Vector {
        self.scale(factor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_is_componentwise() {
        let v = Vector::new(1.5, -2.0).add(Vector::new(0.5, 3.0));
        assert_eq!(v, Vector::new(2.0, 1.0));
    }

    #[test]
    fn scale_by_negative_one_reverses() {
        assert_eq!(Vector::new(2.0, 0.0).scale(-1.0), Vector::new(-2.0, 0.0));
    }

    #[test]
    fn operators_match_methods() {
        let a = Vector::new(3.0, 4.0);
        let b = Vector::new(-1.0, 0.25);
        assert_eq!(a + b, a.add(b));
        assert_eq!(a * 0.5, a.scale(0.5));
    }

    #[test]
    fn operations_leave_operands_untouched() {
        let a = Vector::new(1.0, 1.0);
        let _ = a + a;
        let _ = a * 10.0;
        assert_eq!(a, Vector::new(1.0, 1.0));
    }
}
