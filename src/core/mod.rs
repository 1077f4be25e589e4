//! Core primitives.
//!
//! Deterministic randomness for the simulated feed and avatar derivation.

pub mod rng;
pub mod avatar;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource};
pub use avatar::{avatar_for, validate_image_url};
