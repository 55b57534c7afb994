//! Diluted pool numerators.
//!
//! A diluted value spreads 16 bits over spacing-4 positions. Column 1 holds
//! the pool as produced by the bitwise builtin, column 2 its sorted copy,
//! column 8 the permutation product between them and column 7 a cumulative
//! aggregate whose terminal the verifier recomputes from the challenges.

use ark_ff::One;

use crate::felt::Felt;

use super::air::RecursiveAir;
use super::frame::Frame;
use super::{DILUTED_N_BITS, DILUTED_SPACING};

pub(super) fn eval(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let interaction = air.interaction();
    let z_perm = interaction.elements.diluted_perm_elm;
    let z = interaction.elements.diluted_interaction_z;
    let alpha = interaction.elements.diluted_interaction_alpha;
    let mut i = 0;

    result[i] = (z_perm - f.nbr(2, 0)) * f.nbr(8, 0) + f.nbr(1, 0) - z_perm;
    i += 1;

    result[i] = (z_perm - f.nbr(2, 1)) * f.nbr(8, 1) - (z_perm - f.nbr(1, 1)) * f.nbr(8, 0);
    i += 1;

    // the pool is consumed in full, the product closes at one
    result[i] = f.nbr(8, 0) - one;
    i += 1;

    result[i] = f.nbr(7, 0) - one;
    i += 1;

    result[i] = f.nbr(2, 0) - air.diluted_first_elm;
    i += 1;

    // r' = r * (1 + z * u) + alpha * u^2, u the sorted difference
    let diff = f.nbr(2, 1) - f.nbr(2, 0);
    result[i] = f.nbr(7, 1) - (f.nbr(7, 0) * (one + z * diff) + alpha * diff * diff);
    i += 1;

    result[i] = f.nbr(7, 0) - interaction.diluted_final_cum_val;
    i += 1;

    debug_assert_eq!(i, result.len(), "diluted constraint count mismatch");
}

/// Spreads the low `DILUTED_N_BITS` bits of `value` to spacing-4 positions.
pub fn dilute(value: u64) -> u64 {
    let mut out = 0u64;
    for bit in 0..DILUTED_N_BITS {
        out |= ((value >> bit) & 1) << (bit * DILUTED_SPACING);
    }
    out
}

/// Terminal of the cumulative column over the full sorted pool
/// 0, dilute(1), ..., dilute(2^16 - 1):
/// r_1 = 1, r_{j+1} = r_j * (1 + z * u_j) + alpha * u_j^2 with
/// u_j = dilute(j) - dilute(j - 1).
pub fn cumulative_value(z: &Felt, alpha: &Felt) -> Felt {
    let one = Felt::one();
    let mut acc = one;
    let mut prev = 0u64;
    for j in 1..(1u64 << DILUTED_N_BITS) {
        let cur = dilute(j);
        let u = Felt::from(cur - prev);
        acc = acc * (one + *z * u) + *alpha * u * u;
        prev = cur;
    }
    acc
}
