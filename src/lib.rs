//! Lip-sync pattern generator: phoneme alignment in, animation triggers out.
//!
//! Reads word/phoneme timings produced by a forced aligner, maps each phoneme
//! to a facial morph set, fills long silences with reset-to-idle events, and
//! writes the result into an animation-pattern document.

pub mod core;
pub mod schema;
