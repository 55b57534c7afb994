//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::collections::BTreeMap;

use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};
use cpu_air::{Felt, MemorySegmentMap, PedersenHashContext, RecursiveAir, SegmentRange};

pub const PROGRAM_BASE: u64 = 1;
pub const EXECUTION_BASE: u64 = 100;
pub const PEDERSEN_BASE: u64 = 400;
pub const RANGE_CHECK_BASE: u64 = 500;
pub const BITWISE_BASE: u64 = 600;

pub fn segment_map() -> MemorySegmentMap {
    segment_map_with(PROGRAM_BASE, 5, EXECUTION_BASE, 200)
}

pub fn segment_map_with(
    program_begin: u64,
    program_stop: u64,
    execution_begin: u64,
    execution_stop: u64,
) -> MemorySegmentMap {
    let mut map = MemorySegmentMap::new();
    for (name, begin, stop) in [
        ("program", program_begin, program_stop),
        ("execution", execution_begin, execution_stop),
        ("output", 300, 310),
        ("pedersen", PEDERSEN_BASE, 430),
        ("range_check", RANGE_CHECK_BASE, 520),
        ("bitwise", BITWISE_BASE, 650),
    ] {
        map.insert(
            name.to_string(),
            SegmentRange {
                begin_addr: begin,
                stop_ptr: stop,
            },
        );
    }
    map
}

pub fn make_air(n_steps: usize) -> RecursiveAir {
    make_air_with(n_steps, 0, 65535, &segment_map())
}

pub fn make_air_with(
    n_steps: usize,
    rc_min: u64,
    rc_max: u64,
    segments: &MemorySegmentMap,
) -> RecursiveAir {
    RecursiveAir::new(
        n_steps,
        &BTreeMap::new(),
        rc_min,
        rc_max,
        segments,
        &PedersenHashContext::standard(),
    )
    .expect("air construction")
}

/// Canonical generator of the radix-2 trace domain of size `n`.
pub fn trace_generator(n: usize) -> Felt {
    Radix2EvaluationDomain::<Felt>::new(n)
        .expect("domain size")
        .group_gen()
}
