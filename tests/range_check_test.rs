//! Range-check scenarios: the 16-bit permutation argument and the 128-bit
//! builtin recomposition.

mod common;

use ark_ff::Field;
use cpu_air::{Air, Family, Felt, InteractionElements, RecursiveAir, TraceTable};

const Z: u64 = 555444333;
const RC_MIN: u64 = 100;
const NUM_SITES: usize = 512;
const RC_MAX: u64 = RC_MIN + NUM_SITES as u64 - 1;

fn rc_air() -> RecursiveAir {
    let air = common::make_air_with(128, RC_MIN, RC_MAX, &common::segment_map());
    air.set_interaction(
        InteractionElements::from_slice(&[
            Felt::from(41u64),
            Felt::from(42u64),
            Felt::from(Z),
            Felt::from(44u64),
            Felt::from(45u64),
            Felt::from(46u64),
        ]),
        Felt::from(1u64),
    )
    .unwrap();
    air
}

/// Offset pool on rows 4k, sorted values on rows 4k+2, permutation product
/// on rows 4k+1 of the interaction column.
fn build_rc16_trace(rotation: usize) -> TraceTable {
    let n = NUM_SITES * 4;
    let mut trace = TraceTable::new(10, n);
    let sorted: Vec<u64> = (RC_MIN..=RC_MAX).collect();
    let mut pool = sorted.clone();
    let pool_len = pool.len();
    pool.rotate_left(rotation % pool_len);

    let z = Felt::from(Z);
    let mut product = Felt::from(1u64);
    for k in 0..NUM_SITES {
        trace.set(5, 4 * k, Felt::from(pool[k]));
        trace.set(5, 4 * k + 2, Felt::from(sorted[k]));
        product *=
            (z - Felt::from(pool[k])) * (z - Felt::from(sorted[k])).inverse().unwrap();
        trace.set(9, 4 * k + 1, product);
    }
    trace
}

#[test]
fn permuted_pool_satisfies_range_check16() {
    let air = rc_air();
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    for rotation in [0, 57, 300] {
        let trace = build_rc16_trace(rotation);
        let violations = air.check_trace(&trace, &periodic, &[Family::RangeCheck16]);
        assert!(
            violations.is_empty(),
            "rotation {rotation}: unexpected violations: {violations:?}"
        );
    }
}

#[test]
fn out_of_multiset_value_is_caught() {
    let air = rc_air();
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let mut trace = build_rc16_trace(57);
    trace.set(5, 40, Felt::from(RC_MAX + 7));
    let violations = air.check_trace(&trace, &periodic, &[Family::RangeCheck16]);
    assert!(!violations.is_empty());
}

#[test]
fn sorted_jump_larger_than_one_is_caught() {
    let air = rc_air();
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let mut trace = build_rc16_trace(0);
    // open a gap of 2 in the sorted column
    trace.set(5, 4 * 10 + 2, Felt::from(RC_MIN + 12));
    let violations = air.check_trace(&trace, &periodic, &[Family::RangeCheck16]);
    assert!(violations.iter().any(|v| v.slot == 44 || v.slot == 42));
}

/// Builtin: eight 16-bit parts per instance recompose big-endian into the
/// checked value.
fn build_rc_builtin_trace(air: &RecursiveAir) -> TraceTable {
    let n = air.trace_length();
    let instances = n / 128;
    let mut trace = TraceTable::new(10, n);
    for j in 0..instances {
        let base = 128 * j;
        let parts: [u64; 8] = std::array::from_fn(|i| ((j * 31 + i * 7919) % 65536) as u64);
        let mut value = Felt::from(0u64);
        for (i, part) in parts.iter().enumerate() {
            trace.set(5, base + 12 + 16 * i, Felt::from(*part));
            value = value * Felt::from(1u64 << 16) + Felt::from(*part);
        }
        trace.set(3, base + 74, Felt::from(common::RANGE_CHECK_BASE + j as u64));
        trace.set(3, base + 75, value);
    }
    trace
}

#[test]
fn builtin_recomposition_and_addresses() {
    let air = rc_air();
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let trace = build_rc_builtin_trace(&air);
    let violations = air.check_trace(&trace, &periodic, &[Family::RangeCheckBuiltin]);
    assert!(violations.is_empty(), "unexpected violations: {violations:?}");
}

#[test]
fn builtin_wrong_value_is_caught() {
    let air = rc_air();
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let mut trace = build_rc_builtin_trace(&air);
    trace.set(3, 75, trace.get(3, 75) + Felt::from(1u64));
    let violations = air.check_trace(&trace, &periodic, &[Family::RangeCheckBuiltin]);
    assert!(violations.contains(&cpu_air::Violation { slot: 79, row: 0 }));
}
