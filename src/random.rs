//! Random sub-pixel jitter for supersampling.
//!
//! Only the render host uses randomness; the terrain and the marcher are fully
//! deterministic.

use glam::Vec2;
use rand::{Rng, SeedableRng, rng};
use rand_chacha::ChaCha20Rng;
use std::cell::RefCell;

thread_local! {
    /// Thread-local ChaCha20 PRNG seeded from the OS generator.
    static RNG: RefCell<ChaCha20Rng> = RefCell::new(ChaCha20Rng::from_rng(&mut rng()));
}

/// Generate a random f32 in [0.0, 1.0)
pub fn random_f32() -> f32 {
    RNG.with(|rng| rng.borrow_mut().random())
}

/// Random offset inside the pixel square, each component in [-0.5, 0.5).
pub fn sample_square() -> Vec2 {
    Vec2::new(random_f32() - 0.5, random_f32() - 0.5)
}
