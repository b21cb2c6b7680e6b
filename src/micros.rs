/// Unsigned Microseconds
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Clone, Copy, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UMicros(u64);

impl UMicros {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates a new instance of microseconds
    #[inline]
    pub const fn new(microseconds: u64) -> Self {
        Self(microseconds)
    }

    /// Returns the microseconds as a u64
    #[inline]
    pub const fn us(&self) -> u64 {
        self.0
    }

    /// ms -> us
    #[inline]
    pub const fn from_ms(ms: u64) -> Self {
        Self(ms * 1_000)
    }

    /// Rounds a fractional microsecond count to the nearest whole microsecond.
    ///
    /// Negative and NaN inputs clamp to zero.
    pub fn from_f64_micros(us: f64) -> Self {
        if us.is_nan() || us <= 0. {
            return Self::ZERO;
        }
        // `as` saturates for out of range floats
        Self((us + 0.5) as u64)
    }

    /// Truncating conversion to whole milliseconds
    #[inline]
    pub const fn as_millis(&self) -> u64 {
        self.0 / 1_000
    }
}

impl From<UMicros> for core::time::Duration {
    fn from(value: UMicros) -> Self {
        core::time::Duration::from_micros(value.0)
    }
}

#[test]
fn rounds_fractional_micros() {
    use pretty_assertions::assert_eq;
    assert_eq!(UMicros::from_f64_micros(499_999.6), UMicros::new(500_000));
    assert_eq!(UMicros::from_f64_micros(-3.), UMicros::ZERO);
    assert_eq!(UMicros::from_f64_micros(f64::NAN), UMicros::ZERO);
    assert_eq!(UMicros::new(1_250_000).as_millis(), 1_250);
}
