//! Exact conversion from any stored numeric encoding to a requested type.
//!
//! A numeric read accepts every numeric tag (digit, `+`, `-`, `f`, `d`) and
//! converts to the target only if no information is lost. Readers never
//! truncate or round.

/// A number as it appears in the stream, before conversion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawNumber {
    /// Digit tag or `+` varint.
    UInt(u64),
    /// `-` varint; holds the magnitude, so `NegInt(1)` is -1.
    NegInt(u64),
    F32(f32),
    F64(f64),
}

/// Types `get_number` can produce.
pub trait Number: Copy + Sized {
    /// Type name used in `LossyNarrowing` errors.
    const NAME: &'static str;

    /// Converts `raw`, or returns `None` if the value would change.
    fn from_raw(raw: RawNumber) -> Option<Self>;
}

// Integral value of a float, or `None` for fractions, NaN and out-of-range values.
fn integral(value: f64) -> Option<i128> {
    // 2^127; `as` saturates at i128::MAX, which would round back to it.
    const LIMIT: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    let in_range = (-LIMIT..LIMIT).contains(&value);
    (in_range && value.fract() == 0.0).then(|| value as i128)
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {$(
        impl Number for $ty {
            const NAME: &'static str = stringify!($ty);

            fn from_raw(raw: RawNumber) -> Option<Self> {
                match raw {
                    RawNumber::UInt(u) => <$ty>::try_from(u).ok(),
                    RawNumber::NegInt(m) => <$ty>::try_from(-i128::from(m)).ok(),
                    RawNumber::F32(f) => {
                        integral(f64::from(f)).and_then(|i| <$ty>::try_from(i).ok())
                    }
                    RawNumber::F64(d) => integral(d).and_then(|i| <$ty>::try_from(i).ok()),
                }
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128);

impl Number for f32 {
    const NAME: &'static str = "f32";

    fn from_raw(raw: RawNumber) -> Option<Self> {
        match raw {
            RawNumber::UInt(u) => {
                let f = u as f32;
                (f as u128 == u128::from(u)).then_some(f)
            }
            RawNumber::NegInt(m) => {
                let f = m as f32;
                (f as u128 == u128::from(m)).then_some(-f)
            }
            RawNumber::F32(f) => Some(f),
            RawNumber::F64(d) => {
                let f = d as f32;
                (f64::from(f) == d || d.is_nan()).then_some(f)
            }
        }
    }
}

impl Number for f64 {
    const NAME: &'static str = "f64";

    fn from_raw(raw: RawNumber) -> Option<Self> {
        match raw {
            RawNumber::UInt(u) => {
                let f = u as f64;
                (f as u128 == u128::from(u)).then_some(f)
            }
            RawNumber::NegInt(m) => {
                let f = m as f64;
                (f as u128 == u128::from(m)).then_some(-f)
            }
            RawNumber::F32(f) => Some(f64::from(f)),
            RawNumber::F64(d) => Some(d),
        }
    }
}
