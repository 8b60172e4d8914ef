use core::ops::{Add, AddAssign, Sub, SubAssign};

/// Elapsed real time, in seconds.
///
/// Produced by integrating a tempo list (see
/// [`RateList::seconds_at`](crate::timing::RateList::seconds_at)). Beat
/// positions stay exact; seconds are where the format accepts floating
/// point, so this is a plain `f64` wrapper.
#[derive(PartialEq, PartialOrd, Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Seconds(f64);

impl Seconds {
    /// Zero.
    pub const ZERO: Self = Self(0.0);

    /// Creates a new instance of seconds.
    pub const fn new(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Returns the seconds as an f64.
    pub const fn get(&self) -> f64 {
        self.0
    }

    /// ms -> s
    pub const fn from_millis(ms: f64) -> Self {
        Self(ms / 1_000.)
    }

    /// Returns milliseconds
    pub const fn as_millis(&self) -> f64 {
        self.0 * 1_000.
    }
}

impl Add for Seconds {
    type Output = Seconds;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Seconds {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Seconds {
    type Output = Seconds;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Seconds {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}
