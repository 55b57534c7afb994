#![allow(clippy::too_many_arguments, clippy::needless_range_loop)]
//! cpu-air - algebraic constraint definitions for a Cairo-style CPU STARK.
//!
//! This crate turns an execution trace of the CPU virtual machine into a
//! system of polynomial identities (an AIR): instruction decoding, operand
//! addressing and register transitions, memory and 16-bit range-check
//! permutation arguments, a diluted pool, and the Pedersen, range-check and
//! bitwise builtin co-processors of the `recursive` layout. Field and curve
//! arithmetic, trace generation and the commitment/FRI machinery live in
//! neighboring components; the integration seams are [`composition::TraceOracle`]
//! and the mask/periodic/coefficient vectors of [`air::Air`].

pub mod air;
pub mod composition;
pub mod curve;
pub mod error;
pub mod felt;
pub mod interaction;
pub mod layouts;
pub mod periodic;
pub mod segments;
pub mod trace;

pub use air::{Air, Fraction, InteractionParams, Mask};
pub use composition::{CompositionPolynomial, TraceOracle};
pub use curve::{AffinePoint, PedersenHashContext};
pub use error::{AirError, Result};
pub use felt::Felt;
pub use interaction::{InteractionElements, InteractionState};
pub use layouts::recursive::{Family, RecursiveAir};
pub use periodic::PeriodicColumn;
pub use segments::{MemorySegmentMap, SegmentRange};
pub use trace::{TraceContext, TraceTable, Violation, VirtualCell};
