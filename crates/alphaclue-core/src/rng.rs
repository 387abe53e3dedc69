//! Small seedable PRNG used for shuffling and index draws.

/// PCG-style PRNG, seeded from `getrandom` so it works under WASM too
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleRng {
    /// Create a generator seeded from the platform entropy source
    pub fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    /// Create a generator with a fixed seed for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }

    /// Uniform value in `0..bound`. `bound` must be non-zero and fit in 32 bits.
    ///
    /// Draws above the largest multiple of `bound` are rejected so every
    /// residue is equally likely.
    pub fn next_usize(&mut self, bound: usize) -> usize {
        let bound = (bound as u64).clamp(1, 1 << 32);
        let zone = (1u64 << 32) - (1u64 << 32) % bound;
        loop {
            let value = self.next_u64();
            if value < zone {
                return (value % bound) as usize;
            }
        }
    }

    /// Uniform integer in `min..=max`
    pub fn random_int(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let span = (max - min) as usize + 1;
        min + self.next_usize(span) as u32
    }

    /// Shuffle a slice in place (Fisher-Yates)
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_usize(i + 1);
            slice.swap(i, j);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_int_bounds() {
        let mut rng = SimpleRng::with_seed(7);
        let mut seen_min = false;
        let mut seen_max = false;
        for _ in 0..5000 {
            let v = rng.random_int(1, 100);
            assert!((1..=100).contains(&v));
            seen_min |= v == 1;
            seen_max |= v == 100;
        }
        assert!(seen_min && seen_max);
    }

    #[test]
    fn test_random_int_degenerate_range() {
        let mut rng = SimpleRng::with_seed(3);
        assert_eq!(rng.random_int(5, 5), 5);
        assert_eq!(rng.random_int(9, 2), 9);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SimpleRng::with_seed(42);
        let mut values: Vec<u32> = (0..50).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_seed_reproducible() {
        let mut a = SimpleRng::with_seed(99);
        let mut b = SimpleRng::with_seed(99);
        for _ in 0..20 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn test_next_usize_is_even_across_residues() {
        let mut rng = SimpleRng::with_seed(11);
        let mut counts = [0u32; 3];
        for _ in 0..30_000 {
            counts[rng.next_usize(3)] += 1;
        }
        for count in counts {
            assert!((9_500..=10_500).contains(&count), "counts {:?}", counts);
        }
    }
}
