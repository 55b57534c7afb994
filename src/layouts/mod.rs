//! Concrete layout variants.
//!
//! Each layout fixes the column shape, the builtin set, the neighbor table
//! and the constraint slots, and implements the shared [`crate::air::Air`]
//! surface. One variant ships today.

pub mod recursive;
