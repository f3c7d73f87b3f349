//! Axis

use std::ops::Add;

/// Axis enumeration
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Axis {
    #[default]
    X = 0,
    Y = 1,
    Z = 2,
}

impl From<usize> for Axis {
    fn from(i: usize) -> Self {
        match i {
            0 => Axis::X,
            1 => Axis::Y,
            2 => Axis::Z,
            _ => panic!("invalid axis value"),
        }
    }
}

impl From<Axis> for usize {
    fn from(axis: Axis) -> usize {
        match axis {
            Axis::X => 0_usize,
            Axis::Y => 1_usize,
            Axis::Z => 2_usize,
        }
    }
}

impl Add<usize> for Axis {
    type Output = Axis;

    /// Advance the axis, wrapping x -> y -> z -> x.
    fn add(self, i: usize) -> Self::Output {
        Axis::from((self as usize + i) % 3)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
use proptest::prelude::*;

#[cfg(test)]
pub fn axis_3d_strategy() -> impl Strategy<Value = Axis> {
    prop_oneof![Just(Axis::X), Just(Axis::Y), Just(Axis::Z)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_cycles() {
        assert_eq!(Axis::X + 1, Axis::Y);
        assert_eq!(Axis::Y + 1, Axis::Z);
        assert_eq!(Axis::Z + 1, Axis::X);
    }

    proptest! {
        #[test]
        fn axis_wraps_after_three(axis in axis_3d_strategy()) {
            prop_assert_eq!(axis + 3, axis);
        }
    }
}
