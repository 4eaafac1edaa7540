//! Seeded pseudo-random source.
//!
//! Every random choice made while generating a run flows through one [`Rng`], so a seed
//! reproduces the same listing byte for byte.

/// Xorshift64 generator.
#[derive(Clone, Debug)]
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Creates a generator from `seed`. A zero seed is remapped, since xorshift never leaves zero.
    pub const fn new(seed: u64) -> Self {
        Self { state: if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed } }
    }

    /// Returns the next 64 random bits.
    pub const fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Returns a random 32-bit word.
    pub const fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    /// Returns a value uniformly drawn from `[0, 2^bits)`, `bits <= 32`.
    pub const fn bits(&mut self, bits: u32) -> u32 {
        if bits == 0 {
            0
        } else {
            ((self.next_u64() >> 32) >> (32 - bits)) as u32
        }
    }

    /// Returns an index in `[0, n)`. `n` must be non-zero.
    pub const fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }

    /// Picks one element of `items`.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            None
        } else {
            items.get(self.below(items.len()))
        }
    }
}
