//! Memory argument numerators.
//!
//! The memory pool (column 3, address on even rows, value on odd rows) is
//! proved multiset-equal to the address-sorted pairs of column 4 through the
//! running product of interaction column 9. Sorted addresses are continuous
//! and single-valued; public-memory cells are pinned to (0, 0) so their pool
//! factors reduce to z and the product terminates at the externally supplied
//! public-memory quotient.

use ark_ff::One;

use crate::felt::Felt;

use super::air::RecursiveAir;
use super::frame::Frame;

pub(super) fn eval(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let interaction = air.interaction();
    let z = interaction.elements.memory_perm_elm;
    let alpha = interaction.elements.memory_hash_elm;
    let mut i = 0;

    // product starts from the first pool pair against the first sorted pair
    result[i] = (z - (f.nbr(4, 0) + alpha * f.nbr(4, 1))) * f.nbr(9, 0) + f.nbr(3, 0)
        + alpha * f.nbr(3, 1)
        - z;
    i += 1;

    // one pool pair and one sorted pair folded in per step
    result[i] = (z - (f.nbr(4, 2) + alpha * f.nbr(4, 3))) * f.nbr(9, 2)
        - (z - (f.nbr(3, 2) + alpha * f.nbr(3, 3))) * f.nbr(9, 0);
    i += 1;

    // terminal value verifies the public memory
    result[i] = f.nbr(9, 0) - interaction.public_memory_prod;
    i += 1;

    // sorted addresses advance by zero or one
    let addr_diff = f.nbr(4, 2) - f.nbr(4, 0);
    result[i] = addr_diff * addr_diff - addr_diff;
    i += 1;

    // equal addresses carry equal values (read-only memory)
    result[i] = (addr_diff - one) * (f.nbr(4, 1) - f.nbr(4, 3));
    i += 1;

    // the sorted side starts at address one
    result[i] = f.nbr(4, 0) - one;
    i += 1;

    // public memory placeholder cells
    result[i] = f.nbr(3, 2);
    i += 1;
    result[i] = f.nbr(3, 3);
    i += 1;

    debug_assert_eq!(i, result.len(), "memory constraint count mismatch");
}
