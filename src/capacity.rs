//! Slot-count planning for the hash table.
//!
//! Tables are sized to primes so that `hash % slots` spreads weak hashes
//! better than a power-of-two mask would. The list roughly doubles at each
//! step past the small primes.

const PRIMES: &[usize] = &[
    2,
    3,
    5,
    7,
    11,
    13,
    17,
    19,
    23,
    29,
    31,
    37,
    41,
    43,
    47,
    53,
    97,
    193,
    389,
    769,
    1543,
    3079,
    6151,
    12289,
    24593,
    49157,
    98317,
    196613,
    393241,
    786433,
    1572869,
    3145739,
    6291469,
    12582917,
    25165843,
    50331653,
    100663319,
    201326611,
    402653189,
    805306457,
    1610612741,
];

/// Returns the smallest planned slot count that is `>= required`.
///
/// Past the end of the prime list the requirement itself is returned, so very
/// large tables may end up with a composite size.
///
/// # Examples
///
/// ```rust
/// use robin_hash::capacity::plan_capacity;
///
/// assert_eq!(plan_capacity(0), 2);
/// assert_eq!(plan_capacity(50), 53);
/// assert_eq!(plan_capacity(53), 53);
/// assert_eq!(plan_capacity(3_000_000_000), 3_000_000_000);
/// ```
pub fn plan_capacity(required: usize) -> usize {
    match PRIMES.binary_search(&required) {
        Ok(i) => PRIMES[i],
        Err(i) => PRIMES.get(i).copied().unwrap_or(required),
    }
}

/// Returns the slot count needed to hold `capacity` distinct values under
/// `load`.
///
/// The division rounds up so the returned size always satisfies
/// `slots * load >= capacity`. `load` must already be validated to lie in
/// `(0, 1)`.
pub(crate) fn slots_for(capacity: usize, load: f64) -> usize {
    plan_capacity((capacity as f64 / load).ceil() as usize)
}

/// Returns `true` when `capacity / load` cannot be represented as a slot
/// count.
pub(crate) fn overflows(capacity: usize, load: f64) -> bool {
    capacity as f64 >= usize::MAX as f64 * load
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_are_sorted_and_prime() {
        assert!(PRIMES.windows(2).all(|w| w[0] < w[1]));
        for &p in PRIMES.iter().take_while(|&&p| p < 100_000) {
            assert!((2..p).take_while(|d| d * d <= p).all(|d| p % d != 0), "{p}");
        }
    }

    #[test]
    fn picks_smallest_prime_at_least_required() {
        assert_eq!(plan_capacity(1), 2);
        assert_eq!(plan_capacity(4), 5);
        assert_eq!(plan_capacity(48), 53);
        assert_eq!(plan_capacity(54), 97);
        assert_eq!(plan_capacity(1610612741), 1610612741);
    }

    #[test]
    fn falls_back_to_requirement_past_the_table() {
        assert_eq!(plan_capacity(1610612742), 1610612742);
    }

    #[test]
    fn slots_for_divides_by_load() {
        // 2 / 0.6 = 3.33, rounded up to 4, planned as 5
        assert_eq!(slots_for(2, 0.6), 5);
        assert_eq!(slots_for(10, 0.5), 23);
        assert_eq!(slots_for(3, 0.6), 5);
        assert!(!overflows(10, 0.5));
        assert!(overflows(usize::MAX, 0.5));
    }
}
