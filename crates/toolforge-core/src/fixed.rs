use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Every stat value flowing through the engine is a `Fixed64` so that stat
/// bundles are bit-identical across platforms and runs.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only at content-loading boundaries.
///
/// Saturates instead of panicking when `v` is outside the representable range.
/// NaN maps to zero.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    if v.is_nan() {
        return Fixed64::ZERO;
    }
    Fixed64::saturating_from_num(v)
}

/// Smallest strictly positive Fixed64 value.
#[inline]
pub fn smallest_positive() -> Fixed64 {
    Fixed64::DELTA
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(a + b, Fixed64::from_num(3.5));
        assert_eq!(a * b, Fixed64::from_num(3));
    }

    #[test]
    fn fixed64_saturating_mul_clamps() {
        assert_eq!(Fixed64::MAX.saturating_mul(f64_to_fixed64(2.0)), Fixed64::MAX);
    }

    #[test]
    fn fixed64_conversion_saturates() {
        assert_eq!(f64_to_fixed64(1.0e12), Fixed64::MAX);
        assert_eq!(f64_to_fixed64(-1.0e12), Fixed64::MIN);
        assert_eq!(f64_to_fixed64(f64::NAN), Fixed64::ZERO);
    }

    #[test]
    fn fixed64_multiplication_is_commutative_bitwise() {
        let a = f64_to_fixed64(1.0 / 3.0);
        let b = f64_to_fixed64(2.7);
        assert_eq!(a * b, b * a);
    }

    #[test]
    fn smallest_positive_is_above_zero() {
        assert!(smallest_positive() > Fixed64::ZERO);
    }
}
