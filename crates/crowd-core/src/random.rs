//! Per-instance pseudo-random numbers.
//!
//! [`SeatRng`] is a 32-bit xorshift generator small enough to be built on the
//! stack for every instance, every frame. The kernel seeds one from the
//! instance's seed and calls [`SeatRng::discard`] before drawing, so every
//! instance reads the same values in the same order on every frame.

use glam::Vec2;
use rand::{Error, RngCore, SeedableRng};

// xorshift32 gets stuck at zero, so a zero seed is remapped.
const ZERO_SEED_REPLACEMENT: u32 = 0x6C07_8965;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeatRng {
    state: u32,
}

impl SeatRng {
    pub fn new(seed: u32) -> Self {
        let state = if seed == 0 { ZERO_SEED_REPLACEMENT } else { seed };
        Self { state }
    }

    /// Build a generator for `seed` with the decorrelation draw already discarded.
    #[inline]
    pub fn for_instance(seed: u32) -> Self {
        let mut rng = Self::new(seed);
        rng.discard();
        rng
    }

    /// Throw away one four-lane draw. Neighbouring seeds produce similar
    /// first outputs; skipping them decorrelates instances with adjacent indices.
    #[inline]
    pub fn discard(&mut self) {
        for _ in 0..4 {
            self.next_state();
        }
    }

    #[inline]
    fn next_state(&mut self) -> u32 {
        let out = self.state;
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        out
    }

    /// Uniform float in `[0, 1)`.
    #[inline]
    pub fn next_f32(&mut self) -> f32 {
        f32::from_bits(0x3f80_0000 | (self.next_state() >> 9)) - 1.0
    }

    /// Uniform float in `[min, max)`.
    #[inline]
    pub fn next_f32_range(&mut self, min: f32, max: f32) -> f32 {
        self.next_f32() * (max - min) + min
    }

    /// Uniform float in `[range.x, range.y)`.
    #[inline]
    pub fn next_in(&mut self, range: Vec2) -> f32 {
        self.next_f32_range(range.x, range.y)
    }

    /// Two independent draws, each uniform in `[range.x, range.y)`.
    #[inline]
    pub fn next_vec2_in(&mut self, range: Vec2) -> Vec2 {
        let x = self.next_in(range);
        let y = self.next_in(range);
        Vec2::new(x, y)
    }
}

impl RngCore for SeatRng {
    fn next_u32(&mut self) -> u32 {
        self.next_state()
    }

    fn next_u64(&mut self) -> u64 {
        let lo = self.next_state() as u64;
        let hi = self.next_state() as u64;
        (hi << 32) | lo
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let bytes = self.next_state().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl SeedableRng for SeatRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::new(u32::from_le_bytes(seed))
    }
}
