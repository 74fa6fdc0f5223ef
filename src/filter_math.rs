//! Closed-form sizing for a single fixed filter.
//!
//! These are pure functions of `(err_rate, capacity)` — no I/O, no state —
//! so the addressing scheme can be unit tested independently of the mmap
//! machinery that uses it.

use crate::error::{Error, Result};

/// The minimum capacity accepted by [`new`]. Below this the sizing formulas
/// degenerate (a filter of a handful of bits is not a meaningful Bloom
/// filter).
pub const MIN_CAPACITY: u64 = 10;

/// Sizing parameters derived from `(err_rate, capacity)`, shared by both the
/// standalone [`crate::BloomFilter`] and each generation of a
/// [`crate::ScalableBloomFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sizing {
    /// Number of hash slices.
    pub k: u32,
    /// Total logical bit count, `k * m`.
    pub m_bits: u64,
    /// Bits per slice.
    pub m: u64,
    /// Bytes reserved on disk for this filter (`ceil(m_bits / 8) + 1`).
    pub byte_width: u64,
}

/// Compute `k`, `M_bits`, `m` and `byte_width` for a filter targeting
/// `err_rate` false positives per lookup, sized for `capacity` inserts.
///
/// Mirrors spec §4.2 exactly:
/// - `k = ceil(log2(1/P))`
/// - `M_bits = floor(n * |ln P| / ln(2)^2)`
/// - `m = floor(M_bits / k)`
/// - `byte_width = ceil(M_bits / 8) + 1`
pub fn compute(err_rate: f64, capacity: u64) -> Result<Sizing> {
    if !(err_rate > 0.0 && err_rate < 1.0) {
        return Err(Error::InvalidParameter(format!(
            "err_rate must be in (0, 1), got {err_rate}"
        )));
    }
    if capacity <= MIN_CAPACITY {
        return Err(Error::InvalidParameter(format!(
            "capacity must be greater than {MIN_CAPACITY}, got {capacity}"
        )));
    }

    let ln2_sq = std::f64::consts::LN_2 * std::f64::consts::LN_2;
    let k = (1.0 / err_rate).log2().ceil() as u32;
    let k = k.max(1);

    let m_bits = ((capacity as f64) * err_rate.ln().abs() / ln2_sq).floor() as u64;
    let m = m_bits / (k as u64);
    if m == 0 {
        return Err(Error::InvalidParameter(format!(
            "err_rate {err_rate} and capacity {capacity} produce a zero-width slice"
        )));
    }
    let byte_width = m_bits.div_ceil(8) + 1;

    Ok(Sizing {
        k,
        m_bits,
        m,
        byte_width,
    })
}

/// Deterministic, distinct seeds for `k` hash slices.
///
/// Any scheme producing `k` stable, distinct seeds is acceptable (spec
/// §4.2); this follows the reference implementation's `seeds[i] = 64 << (i
/// + 1)`.
pub fn seeds(k: u32) -> Vec<u64> {
    (0..k).map(|i| 64u64 << (i + 1)).collect()
}

/// The `k` candidate bit positions for `key` within a filter of slice width
/// `m`, given its `seeds`. Each slice `i` owns the disjoint range `[i*m,
/// (i+1)*m)`.
pub fn candidates(key: &[u8], m: u64, seeds: &[u64]) -> Vec<u64> {
    seeds
        .iter()
        .enumerate()
        .map(|(i, &seed)| {
            let h = crate::hash::hash(key, seed);
            (i as u64) * m + (h % m)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_err_rate() {
        assert!(compute(0.0, 1000).is_err());
        assert!(compute(1.0, 1000).is_err());
        assert!(compute(-0.1, 1000).is_err());
    }

    #[test]
    fn rejects_zero_width_slice() {
        // High err_rate with a capacity just above MIN_CAPACITY floors
        // m_bits (and so m) to 0 — must be rejected, not handed to
        // `Filter::new` where it would later divide by zero in `candidates`.
        assert!(matches!(
            compute(0.99, 11),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            compute(0.95, 11),
            Err(Error::InvalidParameter(_))
        ));
    }

    #[test]
    fn rejects_small_capacity() {
        assert!(compute(0.01, MIN_CAPACITY).is_err());
        assert!(compute(0.01, 0).is_err());
    }

    #[test]
    fn known_values_for_1_percent_1000() {
        // k = ceil(log2(100)) = 7
        // M_bits = floor(1000 * ln(100) / ln(2)^2) = floor(1000 * 4.60517 / 0.480453) = 9585
        let s = compute(0.01, 1000).unwrap();
        assert_eq!(s.k, 7);
        assert_eq!(s.m_bits, 9585);
        assert_eq!(s.m, 9585 / 7);
        assert_eq!(s.byte_width, s.m_bits.div_ceil(8) + 1);
    }

    #[test]
    fn seeds_are_distinct() {
        let s = seeds(8);
        let mut sorted = s.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(s.len(), sorted.len());
    }

    #[test]
    fn candidates_stay_within_their_slice() {
        let k = 5;
        let m = 37;
        let sd = seeds(k);
        let idx = candidates(b"some-key", m, &sd);
        for (i, pos) in idx.iter().enumerate() {
            let lo = (i as u64) * m;
            let hi = lo + m;
            assert!(*pos >= lo && *pos < hi);
        }
    }
}
