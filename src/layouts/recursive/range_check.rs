//! Range-check numerators: the 16-bit offset permutation argument and the
//! 128-bit range-check builtin.
//!
//! The offset pool (column 5, rows 4k) is proved a permutation of the sorted
//! values (rows 4k+2) via the running product at rows 4k+1 of column 9; the
//! sorted sequence steps by zero or one and is pinned to the public min/max.
//! The builtin recomposes eight 16-bit parts into one 128-bit value linked
//! into the memory pool.

use ark_ff::One;

use crate::felt::Felt;

use super::air::RecursiveAir;
use super::frame::Frame;
use super::RANGE_CHECK_N_PARTS;

pub(super) fn eval_range_check16(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let z = air.interaction().elements.range_check16_perm_elm;
    let mut i = 0;

    result[i] = (z - f.nbr(5, 2)) * f.nbr(9, 1) + f.nbr(5, 0) - z;
    i += 1;

    result[i] = (z - f.nbr(5, 6)) * f.nbr(9, 5) - (z - f.nbr(5, 4)) * f.nbr(9, 1);
    i += 1;

    // every pool value is consumed exactly once, so the product closes at one
    result[i] = f.nbr(9, 1) - one;
    i += 1;

    let diff = f.nbr(5, 6) - f.nbr(5, 2);
    result[i] = diff * diff - diff;
    i += 1;

    result[i] = f.nbr(5, 2) - air.range_check_min;
    i += 1;
    result[i] = f.nbr(5, 2) - air.range_check_max;
    i += 1;

    debug_assert_eq!(i, result.len(), "range check 16 constraint count mismatch");
}

pub(super) fn eval_builtin(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let mut i = 0;

    // big-endian recomposition of the eight parts at rows 12 + 16k
    let mut value = f.nbr(5, 12);
    for part in 1..RANGE_CHECK_N_PARTS {
        value = value * air.offset_size + f.nbr(5, 12 + 16 * part);
    }
    result[i] = value - f.nbr(3, 75);
    i += 1;

    result[i] = f.nbr(3, 202) - (f.nbr(3, 74) + one);
    i += 1;

    result[i] = f.nbr(3, 74) - air.initial_range_check_addr;
    i += 1;

    debug_assert_eq!(i, result.len(), "range check builtin constraint count mismatch");
}
