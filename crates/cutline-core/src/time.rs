//! Time representation for exact timeline arithmetic
//!
//! Uses rational numbers so that split points and duration sums stay exact.
//! All time values are seconds stored as numerator/denominator pairs.

use num_rational::{Ratio, Rational64};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Neg, Sub};
use std::str::FromStr;

use crate::error::CutlineError;

/// Denominator used when converting float seconds (microsecond precision).
const F64_PRECISION: i64 = 1_000_000;

/// Largest time magnitude a timeline holds, in seconds (about 31 years).
pub const MAX_SECONDS: i64 = 1_000_000_000;

/// Largest denominator accepted when parsing a ratio such as `"25/2"`.
const MAX_PARSED_DENOMINATOR: i64 = 1_000_000;

/// A rational time value representing a point in time or a duration.
///
/// Deserialized values are normalized and must lie within `±MAX_SECONDS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "StoredTime")]
pub struct RationalTime {
    /// Time value as a rational number (seconds)
    value: Rational64,
}

/// On-disk shape of a `RationalTime`, checked on the way in.
#[derive(Deserialize)]
struct StoredTime {
    value: Rational64,
}

impl TryFrom<StoredTime> for RationalTime {
    type Error = CutlineError;

    fn try_from(stored: StoredTime) -> Result<Self, Self::Error> {
        let (numer, denom) = (*stored.value.numer(), *stored.value.denom());
        if denom <= 0 {
            return Err(CutlineError::InvalidParameter(format!(
                "time denominator must be positive, got {denom}"
            )));
        }
        Self::new(numer, denom).checked_in_range()
    }
}

impl RationalTime {
    /// Create a new RationalTime from numerator and denominator.
    /// The time is `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Whole seconds.
    #[inline]
    pub fn from_seconds(seconds: i64) -> Self {
        Self {
            value: Rational64::from_integer(seconds),
        }
    }

    /// Create a RationalTime from seconds as a float.
    ///
    /// Rounds to the nearest microsecond and clamps to `±MAX_SECONDS`;
    /// non-finite input maps to zero. Use [`RationalTime::try_from_seconds_f64`]
    /// for user input that should be rejected instead.
    pub fn from_seconds_f64(seconds: f64) -> Self {
        if !seconds.is_finite() {
            return Self::ZERO;
        }
        let limit = MAX_SECONDS as f64;
        let micros = (seconds.clamp(-limit, limit) * F64_PRECISION as f64).round() as i64;
        Self {
            value: Rational64::new(micros, F64_PRECISION),
        }
    }

    /// Like [`RationalTime::from_seconds_f64`], but non-finite or out-of-range
    /// input is an `InvalidParameter` error.
    pub fn try_from_seconds_f64(seconds: f64) -> Result<Self, CutlineError> {
        if !seconds.is_finite() || seconds.abs() > MAX_SECONDS as f64 {
            return Err(CutlineError::InvalidParameter(format!(
                "time out of range: {seconds}"
            )));
        }
        Ok(Self::from_seconds_f64(seconds))
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };

    /// Latest time a timeline holds.
    pub const MAX: Self = Self {
        value: Rational64::new_raw(MAX_SECONDS, 1),
    };

    /// Check if this time is zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        *self.value.numer() == 0
    }

    /// Check if this time is strictly below zero.
    #[inline]
    pub fn is_negative(self) -> bool {
        *self.value.numer() < 0
    }

    /// Check if this time is strictly above zero.
    #[inline]
    pub fn is_positive(self) -> bool {
        *self.value.numer() > 0
    }

    /// `Ok(self)` when within `±MAX_SECONDS`, otherwise `InvalidParameter`.
    pub fn checked_in_range(self) -> Result<Self, CutlineError> {
        if self <= Self::MAX && self >= Self::from_seconds(-MAX_SECONDS) {
            Ok(self)
        } else {
            Err(CutlineError::InvalidParameter(format!(
                "time out of range: {self}"
            )))
        }
    }

    /// Get the absolute value of this time.
    #[inline]
    pub fn abs(self) -> Self {
        if self.is_negative() {
            -self
        } else {
            self
        }
    }

    /// Exact sum, or `None` when the result does not fit in 64 bits.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.combine(rhs, 1)
    }

    /// Exact difference, or `None` when the result does not fit in 64 bits.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.combine(rhs, -1)
    }

    // a/b ± c/d computed in 128 bits, reduced, then narrowed back.
    fn combine(self, rhs: Self, sign: i128) -> Option<Self> {
        let (a, b) = (i128::from(*self.value.numer()), i128::from(*self.value.denom()));
        let (c, d) = (i128::from(*rhs.value.numer()), i128::from(*rhs.value.denom()));
        let sum = Ratio::new(a * d + sign * c * b, b * d);
        Some(Self {
            value: Rational64::new_raw(
                i64::try_from(*sum.numer()).ok()?,
                i64::try_from(*sum.denom()).ok()?,
            ),
        })
    }

    /// Round up to whole seconds.
    pub fn ceil_seconds(self) -> i64 {
        let (numer, denom) = (*self.value.numer(), *self.value.denom());
        let whole = numer / denom;
        if numer % denom > 0 {
            whole + 1
        } else {
            whole
        }
    }

    /// Round down to whole seconds.
    pub fn floor_seconds(self) -> i64 {
        let (numer, denom) = (*self.value.numer(), *self.value.denom());
        let whole = numer / denom;
        if numer % denom < 0 {
            whole - 1
        } else {
            whole
        }
    }
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

/// Exact when the result fits in 64 bits; otherwise falls back to the
/// microsecond approximation of [`RationalTime::from_seconds_f64`].
impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.checked_add(rhs)
            .unwrap_or_else(|| {
                Self::from_seconds_f64(self.to_seconds_f64() + rhs.to_seconds_f64())
            })
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        self.checked_sub(rhs)
            .unwrap_or_else(|| {
                Self::from_seconds_f64(self.to_seconds_f64() - rhs.to_seconds_f64())
            })
    }
}

impl Neg for RationalTime {
    type Output = Self;
    fn neg(self) -> Self {
        Self::ZERO - self
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

impl FromStr for RationalTime {
    type Err = CutlineError;

    /// Accepts plain seconds (`"12.5"`), a ratio (`"25/2"`) or a clock (`"1:05.5"`).
    /// The result must lie within `±MAX_SECONDS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_end_matches('s');
        let invalid = || CutlineError::InvalidParameter(format!("invalid time: {s:?}"));

        if let Some((minutes, seconds)) = s.split_once(':') {
            let minutes: i64 = minutes.parse().map_err(|_| invalid())?;
            let seconds: f64 = seconds.parse().map_err(|_| invalid())?;
            if !(0..=MAX_SECONDS / 60).contains(&minutes) || !(0.0..60.0).contains(&seconds) {
                return Err(invalid());
            }
            return (Self::from_seconds(minutes * 60) + Self::from_seconds_f64(seconds))
                .checked_in_range();
        }

        if let Some((numer, denom)) = s.split_once('/') {
            let numer: i64 = numer.parse().map_err(|_| invalid())?;
            let denom: i64 = denom.parse().map_err(|_| invalid())?;
            if !(1..=MAX_PARSED_DENOMINATOR).contains(&denom) {
                return Err(invalid());
            }
            return Self::new(numer, denom).checked_in_range();
        }

        let seconds: f64 = s.parse().map_err(|_| invalid())?;
        Self::try_from_seconds_f64(seconds)
    }
}

/// Format a time as `m:ss`, flooring both fields. Negative times print as `0:00`.
pub fn format_clock(time: RationalTime) -> String {
    let total = time.floor_seconds().max(0);
    format!("{}:{:02}", total / 60, total % 60)
}

/// A time range with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: RationalTime,
    /// Duration of the range
    pub duration: RationalTime,
}

impl TimeRange {
    /// Create a new time range from start and duration.
    #[inline]
    pub fn new(start: RationalTime, duration: RationalTime) -> Self {
        Self { start, duration }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }

    /// Check if a time is within this range.
    #[inline]
    pub fn contains(self, time: RationalTime) -> bool {
        time >= self.start && time < self.end()
    }

    /// Check if a time lies strictly between start and end.
    #[inline]
    pub fn contains_strictly(self, time: RationalTime) -> bool {
        time > self.start && time < self.end()
    }

    /// Check if two ranges overlap. Ranges that only touch do not overlap.
    pub fn overlaps(self, other: Self) -> bool {
        self.start < other.end() && other.start < self.end()
    }
}
