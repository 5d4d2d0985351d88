//! Arbitrary-precision weight arithmetic
//!
//! Branch weights grow combinatorially with the number of quantum moves, so
//! they are kept as [`BigUint`] and only turned into `f64` when a presence is
//! reported.

use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};
use rand::Rng;

/// Greatest common divisor of all weights (zero for an empty input)
pub fn gcd_all<'a>(weights: impl IntoIterator<Item = &'a BigUint>) -> BigUint {
    weights
        .into_iter()
        .fold(BigUint::zero(), |acc, w| acc.gcd(w))
}

/// Divisor that normalizes `weights`
///
/// One when any weight is already one, otherwise the gcd of all weights.
pub fn normalization_divisor(weights: &[&BigUint]) -> BigUint {
    if weights.is_empty() || weights.iter().any(|w| w.is_one()) {
        return BigUint::one();
    }
    let gcd = gcd_all(weights.iter().copied());
    if gcd.is_zero() {
        BigUint::one()
    } else {
        gcd
    }
}

/// `num / den` as a float, safe for operands beyond `f64` range
pub fn ratio(num: &BigUint, den: &BigUint) -> f64 {
    if den.is_zero() {
        return 0.0;
    }
    let shift = den.bits().saturating_sub(64);
    let num = (num >> shift).to_f64().unwrap_or(f64::INFINITY);
    let den = (den >> shift).to_f64().unwrap_or(f64::INFINITY);
    if den == 0.0 {
        return 0.0;
    }
    num / den
}

/// Uniform draw from `[0, bound)`
///
/// Uses the native range sampler when the bound fits a `u64` and rejection
/// sampling over the bit length of `bound` otherwise. `bound` must be
/// non-zero.
pub fn uniform_below<R: Rng>(bound: &BigUint, rng: &mut R) -> BigUint {
    debug_assert!(!bound.is_zero());
    if let Some(small) = bound.to_u64() {
        return BigUint::from(rng.random_range(0..small));
    }

    let bits = bound.bits();
    let len = bits.div_ceil(8) as usize;
    let excess = len as u64 * 8 - bits;
    let mut buf = vec![0u8; len];
    loop {
        rng.fill(buf.as_mut_slice());
        if let Some(top) = buf.last_mut() {
            *top &= 0xff >> excess;
        }
        let candidate = BigUint::from_bytes_le(&buf);
        if &candidate < bound {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn big(n: u64) -> BigUint {
        BigUint::from(n)
    }

    #[test]
    fn test_normalization_divisor() {
        let (a, b, c) = (big(4), big(6), big(10));
        assert_eq!(normalization_divisor(&[&a, &b, &c]), big(2));

        let one = big(1);
        assert_eq!(normalization_divisor(&[&a, &one]), big(1));
        assert_eq!(normalization_divisor(&[]), big(1));
    }

    #[test]
    fn test_ratio_handles_huge_operands() {
        let den = BigUint::one() << 2000u32;
        let num = BigUint::one() << 1999u32;
        assert!((ratio(&num, &den) - 0.5).abs() < 1e-12);
        assert_eq!(ratio(&big(3), &big(3)), 1.0);
        assert_eq!(ratio(&big(3), &BigUint::zero()), 0.0);
    }

    #[test]
    fn test_uniform_below_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let small = big(5);
        let huge = (BigUint::one() << 130u32) + big(3);
        for _ in 0..200 {
            assert!(uniform_below(&small, &mut rng) < small);
            assert!(uniform_below(&huge, &mut rng) < huge);
        }
    }
}
