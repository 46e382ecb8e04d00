//! Tiny deterministic noise source for the AGR randomization zone.
//!
//! 32-bit xorshift (shifts 13/17/5). Not cryptographic; the same seed always
//! yields the same sequence, which the randomizer relies on for reproducible
//! renders.

/// Seed used by every filter instance at construction.
pub const DEFAULT_SEED: u32 = 0x1234_5678;

/// Largest positive 31-bit value; the divisor for [`XorShift32::next_unit`].
const UNIT_SCALE: f32 = 0x7FFF_FFFF as f32;

/// 32-bit xorshift generator.
///
/// # Example
///
/// ```rust
/// use tangents_core::XorShift32;
///
/// let mut a = XorShift32::new(42);
/// let mut b = XorShift32::new(42);
/// assert_eq!(a.next_unit(), b.next_unit());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    /// Create a generator. A zero seed would lock the generator at zero, so it
    /// is replaced with [`DEFAULT_SEED`].
    pub const fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Current internal state.
    #[inline]
    pub fn state(&self) -> u32 {
        self.state
    }

    /// Advance and return the raw 32-bit state.
    #[inline]
    pub fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Advance and return a value in \[0, 1\].
    ///
    /// The sign bit is masked off and the result divided by `2³¹ − 1`.
    #[inline]
    pub fn next_unit(&mut self) -> f32 {
        (self.next_u32() & 0x7FFF_FFFF) as f32 / UNIT_SCALE
    }
}

impl Default for XorShift32 {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
