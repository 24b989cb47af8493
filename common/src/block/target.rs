//! Conversions between the compact ("bits") target encoding, the full
//! big-integer target, and the human-readable difficulty ratio.
//!
//! The compact encoding packs a 256-bit target into 32 bits: the top
//! byte is a base-256 exponent, bit 23 is a sign bit, and the low 23
//! bits are the mantissa. The encoding is lossy by design; precision is
//! exactly three bytes of mantissa.
//!
//! The integer conversions are consensus-critical. Nodes that disagree
//! on a single bit of a retarget result reject each other's headers, so
//! the truncation and normalization order here must not be "cleaned up".
use thiserror::Error;

use crate::block::{Bits, Target};
use num_bigint::Sign;

/// An error in the difficulty/target conversion.
#[derive(Debug, Error)]
pub enum Error {
    /// The difficulty cannot be represented as a compact target.
    #[error("difficulty {0} is outside the compact encoding range")]
    DifficultyRange(f64),
}

/// Convert a compact target to its full big-integer form.
///
/// The mantissa is shifted left one byte per exponent unit above three,
/// right per unit below. Bit 23 of `bits` negates the result.
pub fn target_from_compact(bits: Bits) -> Target {
    let mantissa = bits & 0x007f_ffff;
    let exponent = bits >> 24;

    let target = if exponent <= 3 {
        Target::from(mantissa >> (8 * (3 - exponent)))
    } else {
        Target::from(mantissa) << (8 * (exponent - 3))
    };

    if bits & 0x0080_0000 != 0 {
        -target
    } else {
        target
    }
}

/// Convert a big-integer target to its compact form.
///
/// The mantissa keeps the three most significant bytes of the magnitude.
/// If its top bit would collide with the sign bit, the mantissa is
/// shifted down a byte and the exponent bumped, so the encoding stays
/// unambiguous. Zero encodes as `0`.
pub fn compact_from_target(target: &Target) -> Bits {
    let (sign, bytes) = target.to_bytes_be();
    if sign == Sign::NoSign {
        return 0;
    }

    let mut exponent = bytes.len() as u32;
    let mut mantissa = match bytes.len() {
        1 => (bytes[0] as u32) << 16,
        2 => (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8,
        _ => (bytes[0] as u32) << 16 | (bytes[1] as u32) << 8 | bytes[2] as u32,
    };

    if mantissa & 0x0080_0000 != 0 {
        mantissa >>= 8;
        exponent += 1;
    }

    let mut compact = exponent << 24 | mantissa;
    if sign == Sign::Minus {
        compact |= 0x0080_0000;
    }
    compact
}

/// Convert a compact target to the difficulty ratio relative to the
/// difficulty-1 target, whose compact encoding carries exponent 29 and
/// mantissa `0xffff`.
///
/// A zero mantissa is not meaningful; IEEE division then yields
/// infinity, which is returned as-is rather than special-cased.
pub fn difficulty(bits: Bits) -> f64 {
    let mut shift = (bits >> 24) & 0xff;
    let mut diff = 0xffff as f64 / (bits & 0x00ff_ffff) as f64;

    while shift < 29 {
        diff *= 256.0;
        shift += 1;
    }
    while shift > 29 {
        diff /= 256.0;
        shift -= 1;
    }
    diff
}

/// Convert a difficulty ratio back to a big-integer target.
///
/// Inverse of [`difficulty`], and lossy the same way the compact
/// encoding is: the floating-point mantissa is truncated to an integer
/// before the final shift, in exactly that order. Difficulties that are
/// not positive finite values, or whose derived exponent falls outside
/// the encodable byte range, are rejected.
pub fn target_from_difficulty(diff: f64) -> Result<Target, Error> {
    if !diff.is_finite() || diff <= 0.0 {
        return Err(Error::DifficultyRange(diff));
    }

    let mut mantissa = 0xffff as f64 / diff;
    let mut exp = 1u32;
    let mut tmp = mantissa;
    while tmp >= 256.0 {
        tmp /= 256.0;
        exp += 1;
    }
    if exp > 26 {
        return Err(Error::DifficultyRange(diff));
    }
    for _ in 0..exp {
        mantissa *= 256.0;
    }

    Ok(Target::from(mantissa as i64) << (8 * (26 - exp)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_known_compact_targets() {
        // Difficulty-1 target: 0xffff * 2^208.
        assert_eq!(
            target_from_compact(0x1d00ffff),
            Target::from(0xffff) << 208
        );
        // The bootstrap target: 0xffff * 2^200.
        assert_eq!(
            target_from_compact(0x1c00ffff),
            Target::from(0xffff) << 200
        );

        assert_eq!(compact_from_target(&(Target::from(0xffff) << 208)), 0x1d00ffff);
        assert_eq!(compact_from_target(&(Target::from(0xffff) << 200)), 0x1c00ffff);
    }

    #[test]
    fn test_zero_target() {
        assert_eq!(compact_from_target(&Target::from(0)), 0);
        assert_eq!(target_from_compact(0), Target::from(0));
    }

    #[test]
    fn test_sign_bit_normalization() {
        // A mantissa with its top bit set must be re-packed one byte up,
        // or it would read back as negative.
        let compact = compact_from_target(&Target::from(0x0080_0000));
        assert_eq!(compact, 0x04008000);
        assert_eq!(target_from_compact(compact), Target::from(0x0080_0000));
    }

    #[test]
    fn test_negative_target() {
        let target = -Target::from(0x1234);
        let compact = compact_from_target(&target);
        assert_ne!(compact & 0x0080_0000, 0);
        assert_eq!(target_from_compact(compact), target);
    }

    #[test]
    fn test_difficulty_of_pow_limit_is_one() {
        assert!((difficulty(0x1d00ffff) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_difficulty_scales_by_exponent() {
        // One exponent unit is a factor of 256 in difficulty.
        assert_eq!(difficulty(0x1c00ffff), 256.0);
        assert_eq!(difficulty(0x1e00ffff), 1.0 / 256.0);
    }

    #[test]
    fn test_difficulty_round_trip_at_exact_points() {
        // These difficulties are exactly representable, so the float
        // path must agree with the integer path to the bit.
        for bits in [0x1d00ffff, 0x1c00ffff] {
            let diff = difficulty(bits);
            assert_eq!(
                target_from_difficulty(diff).unwrap(),
                target_from_compact(bits),
                "difficulty {} (bits {:#x})",
                diff,
                bits
            );
        }
    }

    #[test]
    fn test_difficulty_out_of_range() {
        assert!(target_from_difficulty(0.0).is_err());
        assert!(target_from_difficulty(-1.0).is_err());
        assert!(target_from_difficulty(f64::NAN).is_err());
        assert!(target_from_difficulty(f64::INFINITY).is_err());
    }

    #[quickcheck]
    fn prop_compact_encoding_idempotent(n: u64, shift: u8) -> bool {
        let target = Target::from(n) << (shift as u32 % 160);
        let compact = compact_from_target(&target);

        compact == compact_from_target(&target_from_compact(compact))
    }

    #[quickcheck]
    fn prop_compact_encoding_idempotent_negative(n: u64) -> bool {
        let target = -Target::from(n);
        let compact = compact_from_target(&target);

        compact == compact_from_target(&target_from_compact(compact))
    }
}
