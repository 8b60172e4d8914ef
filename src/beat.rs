use core::fmt;
use core::ops::{Add, AddAssign, Sub, SubAssign};

use num_rational::Ratio;

#[doc = r#"
An exact musical position, measured in beats from the start of the chart.

# Why a rational?

A chart's timing data is keyed by beat positions like `1/3` or `7/24` that
have no exact binary floating-point representation. Accumulating such
positions as `f64` drifts over the length of a long chart; accumulating them
as reduced fractions does not. [`Beat`] is therefore a non-negative
`numerator / denominator` pair, and every comparison is exact integer
arithmetic, never a float compare.

[`Beat`] is the sole time coordinate of the format. Conversion to real time
happens only through a tempo list (see [`RateList`](crate::timing::RateList)).

# Example
```rust
# use cwpix::prelude::*;
let third = Beat::new(1, 3);
let sixth = Beat::new(1, 6);

// 1/3 + 1/6 is exactly 1/2
assert_eq!(third + sixth, Beat::new(1, 2));
assert!(third < Beat::new(2, 3));
```
"#]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Beat(Ratio<u64>);

impl Beat {
    /// The start of the chart.
    pub const ZERO: Self = Self(Ratio::new_raw(0, 1));

    /// Create a beat from a numerator and denominator.
    ///
    /// The fraction is reduced, so `Beat::new(2, 4)` equals `Beat::new(1, 2)`.
    ///
    /// # Panics
    /// if `denominator` is zero. Wire data never produces a zero denominator
    /// here; decoding reports it as a format error first.
    pub fn new(numerator: u64, denominator: u64) -> Self {
        Self(Ratio::new(numerator, denominator))
    }

    /// Create a beat on a whole-beat boundary.
    pub const fn whole(beats: u64) -> Self {
        Self(Ratio::new_raw(beats, 1))
    }

    /// The reduced numerator.
    pub fn numer(&self) -> u64 {
        *self.0.numer()
    }

    /// The reduced denominator. Always nonzero.
    pub fn denom(&self) -> u64 {
        *self.0.denom()
    }

    /// Approximate the beat as a float.
    ///
    /// Only used at the boundary where exact positions meet real-valued
    /// rates; ordering and equality always go through the exact form.
    pub fn as_f64(&self) -> f64 {
        *self.0.numer() as f64 / *self.0.denom() as f64
    }
}

impl Default for Beat {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Beat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.numer(), self.0.denom())
    }
}

impl Add for Beat {
    type Output = Beat;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Beat {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Beat {
    type Output = Beat;
    /// # Panics
    /// if `rhs` is later than `self`; beats are non-negative.
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Beat {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
