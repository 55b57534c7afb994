//! Construction-time validation and the interaction phase contract.

mod common;

use std::collections::BTreeMap;

use ark_ff::{One, Zero};
use cpu_air::{
    Air, AirError, Felt, InteractionElements, PedersenHashContext, RecursiveAir,
};

fn new_air(segments: &cpu_air::MemorySegmentMap) -> Result<RecursiveAir, AirError> {
    RecursiveAir::new(
        128,
        &BTreeMap::new(),
        0,
        65535,
        segments,
        &PedersenHashContext::standard(),
    )
}

#[test]
fn missing_builtin_segment_fails() {
    for required in ["program", "execution", "pedersen", "range_check", "bitwise"] {
        let mut segments = common::segment_map();
        segments.remove(required);
        assert!(
            matches!(new_air(&segments), Err(AirError::SegmentNotFound(name)) if name == required),
            "expected missing-segment error for {required}"
        );
    }
}

#[test]
fn output_segment_is_not_required() {
    let mut segments = common::segment_map();
    segments.remove("output");
    assert!(new_air(&segments).is_ok());
}

#[test]
fn exposed_addresses_match_segments() {
    let air = common::make_air(128);
    assert_eq!(air.initial_pc(), Felt::from(common::PROGRAM_BASE));
    assert_eq!(air.initial_ap(), Felt::from(common::EXECUTION_BASE));
    assert_eq!(air.pedersen_begin_addr(), common::PEDERSEN_BASE);
    assert_eq!(air.range_check_begin_addr(), common::RANGE_CHECK_BASE);
    assert_eq!(air.bitwise_begin_addr(), common::BITWISE_BASE);
}

#[test]
fn step_count_validation() {
    let segments = common::segment_map();
    for bad in [0usize, 3, 100, 64] {
        let result = RecursiveAir::new(
            bad,
            &BTreeMap::new(),
            0,
            65535,
            &segments,
            &PedersenHashContext::standard(),
        );
        assert!(matches!(result, Err(AirError::InvalidStepCount(_))), "{bad}");
    }
}

#[test]
fn range_check_bounds_validation() {
    let segments = common::segment_map();
    for (min, max) in [(10u64, 5u64), (0, 65536), (70000, 70001)] {
        let result = RecursiveAir::new(
            128,
            &BTreeMap::new(),
            min,
            max,
            &segments,
            &PedersenHashContext::standard(),
        );
        assert!(matches!(result, Err(AirError::InvalidRangeCheckBounds(_))));
    }
}

#[test]
fn interaction_set_exactly_once() {
    let air = common::make_air(128);
    assert!(!air.is_interaction_set());
    let elements = InteractionElements::from_slice(&[
        Felt::from(11u64),
        Felt::from(12u64),
        Felt::from(13u64),
        Felt::from(14u64),
        Felt::from(15u64),
        Felt::from(16u64),
    ]);
    air.set_interaction(elements, Felt::one()).unwrap();
    assert!(air.is_interaction_set());
    assert!(matches!(
        air.set_interaction(elements, Felt::one()),
        Err(AirError::InteractionAlreadySet)
    ));
}

#[test]
#[should_panic(expected = "neighbor vector length")]
fn wrong_neighbor_count_panics() {
    let air = common::make_air(128);
    let gen = common::trace_generator(air.trace_length());
    let shifts = air.domain_shifts(&gen);
    let point = Felt::from(3u64);
    let domains = air.domain_evals_at_point(&air.point_powers(&point), &shifts);
    let coefficients = vec![Felt::one(); air.num_random_coefficients()];
    let periodic = vec![Felt::zero(); 2];
    let neighbors = vec![Felt::zero(); 7]; // wrong on purpose
    air.constraints_eval(&neighbors, &periodic, &coefficients, &point, &shifts, &domains);
}

#[test]
#[should_panic(expected = "coefficient vector length")]
fn wrong_coefficient_count_panics() {
    let air = common::make_air(128);
    let gen = common::trace_generator(air.trace_length());
    let shifts = air.domain_shifts(&gen);
    let point = Felt::from(3u64);
    let domains = air.domain_evals_at_point(&air.point_powers(&point), &shifts);
    let neighbors = vec![Felt::zero(); air.mask().len()];
    let periodic = vec![Felt::zero(); 2];
    let coefficients = vec![Felt::one(); 5]; // wrong on purpose
    air.constraints_eval(&neighbors, &periodic, &coefficients, &point, &shifts, &domains);
}

#[test]
#[should_panic(expected = "interaction elements must be set")]
fn evaluation_before_interaction_panics() {
    let air = common::make_air(128);
    let gen = common::trace_generator(air.trace_length());
    let shifts = air.domain_shifts(&gen);
    let point = Felt::from(3u64);
    let domains = air.domain_evals_at_point(&air.point_powers(&point), &shifts);
    let neighbors = vec![Felt::zero(); air.mask().len()];
    let periodic = vec![Felt::zero(); 2];
    let coefficients = vec![Felt::one(); air.num_random_coefficients()];
    air.constraints_eval(&neighbors, &periodic, &coefficients, &point, &shifts, &domains);
}
