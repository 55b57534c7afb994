//! The 252-bit STARK prime field used by every column and constraint.
//!
//! p = 2^251 + 17 * 2^192 + 1. Arithmetic comes entirely from `ark-ff`;
//! this module only pins the modulus and a few conversion helpers.

use ark_ff::fields::{Fp256, MontBackend, MontConfig};
use ark_ff::{BigInteger, PrimeField};

#[derive(MontConfig)]
#[modulus = "3618502788666131213697322783095070105623107215331596699973092056135872020481"]
#[generator = "3"]
pub struct FeltConfig;

/// A STARK field element.
pub type Felt = Fp256<MontBackend<FeltConfig, 4>>;

/// Little-endian bits of a field element, 252 entries.
///
/// Used by the Pedersen reference hash to drive the subset-sum walk.
pub fn to_bits_le(value: &Felt) -> Vec<bool> {
    let mut bits = value.into_bigint().to_bits_le();
    bits.truncate(252);
    bits
}

/// 2^exp as a field element. `exp` may exceed 64.
pub fn pow2(exp: u32) -> Felt {
    use ark_ff::Field;
    Felt::from(2u64).pow([exp as u64])
}
