//! Pedersen builtin numerators.
//!
//! One hash instance spans 2048 rows, split into two 1024-row halves, one
//! per input. A half walks 252 bits of its input through an elliptic-curve
//! subset sum against the periodic point table, on positions spaced four
//! rows apart. The suffix column (6, rows 4k) right-shifts the input one bit
//! per position; the bit-unpacking helpers make that decomposition unique
//! given the field modulus 2^251 + 17*2^192 + 1 (whose predecessor is
//! exactly bits 251, 196 and 192).

use ark_ff::One;

use crate::felt::{pow2, Felt};

use super::air::RecursiveAir;
use super::frame::Frame;

pub(super) fn eval(result: &mut [Felt], f: &Frame, air: &RecursiveAir, periodic: &[Felt]) {
    let one = Felt::one();
    let point_x = periodic[0];
    let point_y = periodic[1];
    let bit = f.pedersen_bit(0);
    let bit_neg = one - bit;
    let mut i = 0;

    // cell(7) = bit251 * bit196 * bit192 of this half's input; when all are
    // set the input must be exactly p - 1, so every remaining bit is zero.
    let bit192 = f.pedersen_suffix(192) - (f.pedersen_suffix(193) + f.pedersen_suffix(193));
    let bit251 = f.pedersen_suffix(251) - (f.pedersen_suffix(252) + f.pedersen_suffix(252));

    result[i] = f.nbr(6, 7) * bit;
    i += 1;
    result[i] = f.nbr(6, 7) * (f.pedersen_suffix(1) - pow2(191) * f.pedersen_suffix(192));
    i += 1;
    result[i] = f.nbr(6, 7) - f.nbr(6, 1022) * bit192;
    i += 1;
    result[i] = f.nbr(6, 1022) * (f.pedersen_suffix(193) - pow2(3) * f.pedersen_suffix(196));
    i += 1;
    let bit196 = f.pedersen_suffix(196) - (f.pedersen_suffix(197) + f.pedersen_suffix(197));
    result[i] = f.nbr(6, 1022) - bit251 * bit196;
    i += 1;
    result[i] = bit251 * (f.pedersen_suffix(197) - pow2(54) * f.pedersen_suffix(251));
    i += 1;

    // subset-sum walk
    result[i] = bit * (bit - one);
    i += 1;

    // the suffix is exhausted after 252 bits ...
    result[i] = f.pedersen_suffix(0);
    i += 1;
    // ... and stays zero through the tail of the half
    result[i] = f.pedersen_suffix(0);
    i += 1;

    // conditional point addition with the periodic table point
    result[i] = bit * (f.pedersen_partial_y(0) - point_y)
        - f.nbr(6, 2) * (f.pedersen_partial_x(0) - point_x);
    i += 1;
    result[i] = f.nbr(6, 2) * f.nbr(6, 2)
        - bit * (f.pedersen_partial_x(0) + point_x + f.pedersen_partial_x(1));
    i += 1;
    result[i] = bit * (f.pedersen_partial_y(0) + f.pedersen_partial_y(1))
        - f.nbr(6, 2) * (f.pedersen_partial_x(0) - f.pedersen_partial_x(1));
    i += 1;
    result[i] = bit_neg * (f.pedersen_partial_x(1) - f.pedersen_partial_x(0));
    i += 1;
    result[i] = bit_neg * (f.pedersen_partial_y(1) - f.pedersen_partial_y(0));
    i += 1;

    // the second half continues from the first half's final sum
    result[i] = f.nbr(5, 1025) - f.nbr(5, 1021);
    i += 1;
    result[i] = f.nbr(5, 1027) - f.nbr(5, 1023);
    i += 1;

    // each instance restarts the walk at the shift point
    result[i] = f.pedersen_partial_x(0) - air.pedersen_shift_point.x;
    i += 1;
    result[i] = f.pedersen_partial_y(0) - air.pedersen_shift_point.y;
    i += 1;

    // memory linkage: input0, input1 and output live on consecutive
    // addresses of the pedersen segment
    result[i] = f.nbr(3, 11) - f.pedersen_suffix(0);
    i += 1;
    result[i] = f.nbr(3, 2058) - (f.nbr(3, 522) + one);
    i += 1;
    result[i] = f.nbr(3, 10) - air.initial_pedersen_addr;
    i += 1;
    result[i] = f.nbr(3, 1035) - f.nbr(6, 1024);
    i += 1;
    result[i] = f.nbr(3, 1034) - (f.nbr(3, 10) + one);
    i += 1;
    result[i] = f.nbr(3, 523) - f.nbr(5, 2045);
    i += 1;
    result[i] = f.nbr(3, 522) - (f.nbr(3, 1034) + one);
    i += 1;

    debug_assert_eq!(i, result.len(), "pedersen constraint count mismatch");
}
