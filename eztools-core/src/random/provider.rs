use rand::RngCore;
use rand::rngs::OsRng;

/// Uniform integer, index and shuffle draws over an entropy source.
///
/// Draws reduce a 64-bit value with `value % range`. When `range` does not
/// divide 2^64 the low residues are very slightly more likely (modulo bias).
///
/// The provider keeps no seed or counter of its own, so with the default
/// [`OsRng`] source every call is independent.
///
/// # Example
///
/// ```
/// use eztools_core::random::RandomProvider;
///
/// let mut provider = RandomProvider::new();
/// let roll = provider.uniform_int(1, 6);
/// assert!((1..=6).contains(&roll));
/// assert_eq!(provider.uniform_index(0), None);
/// ```
#[derive(Debug, Clone)]
pub struct RandomProvider<R = OsRng> {
    source: R,
}

impl RandomProvider<OsRng> {
    pub fn new() -> Self {
        Self { source: OsRng }
    }
}

impl Default for RandomProvider<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> RandomProvider<R> {
    /// Uses `source` in place of the operating system generator.
    pub fn with_source(source: R) -> Self {
        Self { source }
    }

    /// Value uniformly distributed over `[min, max]` inclusive.
    ///
    /// Reversed bounds are swapped rather than rejected.
    pub fn uniform_int(
        &mut self,
        min: i64,
        max: i64,
    ) -> i64 {
        let (low, high) = if min <= max { (min, max) } else { (max, min) };
        // Full i64 span is 2^64, one past u64::MAX.
        let range = (i128::from(high) - i128::from(low) + 1) as u128;
        let offset = u128::from(self.source.next_u64()) % range;
        (i128::from(low) + offset as i128) as i64
    }

    /// Index uniformly distributed over `[0, len)`, or `None` for an empty
    /// collection.
    pub fn uniform_index(
        &mut self,
        len: usize,
    ) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.source.next_u64() % len as u64) as usize)
    }

    /// Fisher-Yates shuffle in place.
    ///
    /// Walks from the last index down to 1, swapping each position `i` with a
    /// uniform index in `[0, i]`. Returns the number of swaps performed, which
    /// is `len - 1` for two or more items and 0 otherwise.
    pub fn shuffle<T>(
        &mut self,
        items: &mut [T],
    ) -> usize {
        let mut swaps = 0;
        for i in (1..items.len()).rev() {
            if let Some(j) = self.uniform_index(i + 1) {
                items.swap(i, j);
                swaps += 1;
            }
        }
        swaps
    }
}
