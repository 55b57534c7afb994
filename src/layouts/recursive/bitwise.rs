//! Bitwise builtin numerators.
//!
//! One instance spans 128 rows and four pool values (x, y, x&y, x^y) of 32
//! rows each, plus the derived x|y cell. Every value is stored as sixteen
//! diluted 16-bit chunks on the even rows of column 1; the partition
//! constraint recomposes them, the addition identity ties x, y, x&y, x^y
//! together chunk-wise, and the unique-unpacking constraints pin the top
//! chunks so the 251-bit decomposition is unambiguous in a 252-bit field.

use ark_ff::One;

use crate::felt::{pow2, Felt};

use super::air::RecursiveAir;
use super::frame::Frame;

/// Weight of chunk cell `m` (row 2m): bit position m % 4 within 64-bit
/// quarter m / 4.
fn chunk_weight(m: usize) -> Felt {
    pow2((64 * (m as u32 / 4)) + (m as u32 % 4))
}

pub(super) fn eval(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let mut i = 0;

    result[i] = f.nbr(3, 26) - air.initial_bitwise_addr;
    i += 1;

    // x, y, x&y, x^y occupy consecutive addresses
    result[i] = f.nbr(3, 58) - (f.nbr(3, 26) + one);
    i += 1;

    // x|y directly follows x^y
    result[i] = f.nbr(3, 42) - (f.nbr(3, 122) + one);
    i += 1;

    // the next instance continues after x|y
    result[i] = f.nbr(3, 154) - (f.nbr(3, 42) + one);
    i += 1;

    // recomposition of the sixteen diluted chunks into the pool value
    let mut sum = Felt::from(0u64);
    for m in 0..16 {
        sum += chunk_weight(m) * f.nbr(1, 2 * m);
    }
    result[i] = sum - f.nbr(3, 27);
    i += 1;

    // x | y = (x & y) + (x ^ y)
    result[i] = f.nbr(3, 43) - (f.nbr(3, 91) + f.nbr(3, 123));
    i += 1;

    // x + y = (x ^ y) + 2 * (x & y), per diluted chunk position
    result[i] = f.nbr(1, 0) + f.nbr(1, 32) - (f.nbr(1, 96) + f.nbr(1, 64) + f.nbr(1, 64));
    i += 1;

    // shifted sums of the top four chunk positions of x&y and x^y; their
    // presence in the diluted pool forces a carry-free top chunk
    let sixteen = pow2(4);
    result[i] = (f.nbr(1, 88) + f.nbr(1, 120)) * sixteen - f.nbr(1, 1);
    i += 1;
    result[i] = (f.nbr(1, 90) + f.nbr(1, 122)) * sixteen - f.nbr(1, 65);
    i += 1;
    result[i] = (f.nbr(1, 92) + f.nbr(1, 124)) * sixteen - f.nbr(1, 33);
    i += 1;
    result[i] = (f.nbr(1, 94) + f.nbr(1, 126)) * pow2(8) - f.nbr(1, 97);
    i += 1;

    debug_assert_eq!(i, result.len(), "bitwise constraint count mismatch");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_weights() {
        assert_eq!(chunk_weight(0), Felt::one());
        assert_eq!(chunk_weight(3), Felt::from(8u64));
        assert_eq!(chunk_weight(4), pow2(64));
        assert_eq!(chunk_weight(7), pow2(67));
        assert_eq!(chunk_weight(8), pow2(128));
        assert_eq!(chunk_weight(15), pow2(195));
    }
}
