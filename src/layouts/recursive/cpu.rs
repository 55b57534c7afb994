//! CPU constraint numerators: instruction decode, operand addressing,
//! register updates, opcode assertions and register boundary conditions.
//!
//! Each function fills one slot range of the shared numerator buffer; the
//! aggregator applies the matching vanishing-domain denominators. Formulas
//! follow the instruction encoding of the whitepaper: one 63-bit word per
//! cycle holding three biased 16-bit offsets and fifteen flag bits, decoded
//! through the flag-suffix column.

use ark_ff::One;

use crate::felt::Felt;

use super::air::RecursiveAir;
use super::frame::Frame;

/// dst_reg | op0_reg | op1 source | res logic | pc update | ap update |
/// opcode, as bit positions in the decoded flag word.
pub(super) const DST_REG: usize = 0;
pub(super) const OP0_REG: usize = 1;
pub(super) const OP1_IMM: usize = 2;
pub(super) const OP1_FP: usize = 3;
pub(super) const OP1_AP: usize = 4;
pub(super) const RES_ADD: usize = 5;
pub(super) const RES_MUL: usize = 6;
pub(super) const PC_JUMP_ABS: usize = 7;
pub(super) const PC_JUMP_REL: usize = 8;
pub(super) const PC_JNZ: usize = 9;
pub(super) const AP_ADD: usize = 10;
pub(super) const AP_ADD1: usize = 11;
pub(super) const OPCODE_CALL: usize = 12;
pub(super) const OPCODE_RET: usize = 13;
pub(super) const OPCODE_ASSERT_EQ: usize = 14;

/// 1 - (op1_imm + op1_ap + op1_fp): selects op0 as the op1 base address.
fn flag_op1_base_op0(f: &Frame) -> Felt {
    Felt::one() - (f.flag_bit(OP1_IMM) + f.flag_bit(OP1_AP) + f.flag_bit(OP1_FP))
}

/// 1 - (res_add + res_mul + pc_jnz): selects op1 as the result.
fn flag_res_op1(f: &Frame) -> Felt {
    Felt::one() - (f.flag_bit(RES_ADD) + f.flag_bit(RES_MUL) + f.flag_bit(PC_JNZ))
}

/// 1 - (pc_jump_abs + pc_jump_rel + pc_jnz): regular pc advance.
fn flag_pc_update_regular(f: &Frame) -> Felt {
    Felt::one() - (f.flag_bit(PC_JUMP_ABS) + f.flag_bit(PC_JUMP_REL) + f.flag_bit(PC_JNZ))
}

/// 1 - (call + ret): fp copies over.
fn flag_fp_update_regular(f: &Frame) -> Felt {
    Felt::one() - (f.flag_bit(OPCODE_CALL) + f.flag_bit(OPCODE_RET))
}

/// pc + instruction size (2 with an immediate operand, 1 otherwise).
fn next_pc_regular(f: &Frame) -> Felt {
    f.nbr(3, 0) + f.flag_bit(OP1_IMM) + Felt::one()
}

/// Decode constraints: flag booleanity, zero tail, instruction-word
/// recomposition and the three flag-group exclusivity checks.
pub(super) fn eval_decode(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let mut i = 0;

    // Evaluated on every non-tail row, this covers each of the fifteen flag
    // bits in turn through the shifting suffix column.
    let bit = f.flag_bit(DST_REG);
    result[i] = bit * bit - bit;
    i += 1;

    // The suffix must be exhausted after the fifteenth bit.
    result[i] = f.nbr(0, 0);
    i += 1;

    // instruction = ((flags * 2^16 + off_op1) * 2^16 + off_op0) * 2^16 + off_dst
    result[i] = f.nbr(3, 1)
        - (((f.nbr(0, 0) * air.offset_size + f.nbr(5, 4)) * air.offset_size + f.nbr(5, 8))
            * air.offset_size
            + f.nbr(5, 0));
    i += 1;

    for group in [
        flag_op1_base_op0(f),
        flag_res_op1(f),
        flag_pc_update_regular(f),
        flag_fp_update_regular(f),
    ] {
        result[i] = group * group - group;
        i += 1;
    }

    debug_assert_eq!(i, result.len(), "decode constraint count mismatch");
}

/// Operand address derivation, the op0*op1 product cell and result
/// selection.
pub(super) fn eval_operands(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let ap = f.nbr(6, 1);
    let fp = f.nbr(6, 9);
    let mut i = 0;

    // dst address = (dst_reg ? fp : ap) + off_dst
    result[i] = f.nbr(3, 8) + air.half_offset_size
        - (f.flag_bit(DST_REG) * fp + (one - f.flag_bit(DST_REG)) * ap + f.nbr(5, 0));
    i += 1;

    // op0 address = (op0_reg ? fp : ap) + off_op0
    result[i] = f.nbr(3, 4) + air.half_offset_size
        - (f.flag_bit(OP0_REG) * fp + (one - f.flag_bit(OP0_REG)) * ap + f.nbr(5, 8));
    i += 1;

    // op1 address = base + off_op1, base one of pc/ap/fp/op0
    result[i] = f.nbr(3, 12) + air.half_offset_size
        - (f.flag_bit(OP1_IMM) * f.nbr(3, 0)
            + f.flag_bit(OP1_AP) * ap
            + f.flag_bit(OP1_FP) * fp
            + flag_op1_base_op0(f) * f.nbr(3, 5)
            + f.nbr(5, 4));
    i += 1;

    // dedicated product cell
    result[i] = f.nbr(6, 5) - f.nbr(3, 5) * f.nbr(3, 13);
    i += 1;

    // res = op1 / op0+op1 / op0*op1, undefined under jnz
    result[i] = (one - f.flag_bit(PC_JNZ)) * f.nbr(6, 13)
        - (f.flag_bit(RES_ADD) * (f.nbr(3, 5) + f.nbr(3, 13))
            + f.flag_bit(RES_MUL) * f.nbr(6, 5)
            + flag_res_op1(f) * f.nbr(3, 13));
    i += 1;

    debug_assert_eq!(i, result.len(), "operand constraint count mismatch");
}

/// pc/ap/fp transition rules between consecutive cycles.
pub(super) fn eval_update_registers(result: &mut [Felt], f: &Frame, _air: &RecursiveAir) {
    let one = Felt::one();
    let two = Felt::from(2u64);
    let npc_regular = next_pc_regular(f);
    let mut i = 0;

    // t0 = jnz * dst
    result[i] = f.nbr(6, 3) - f.flag_bit(PC_JNZ) * f.nbr(3, 9);
    i += 1;

    // t1 = t0 * v, with v = res repurposed as dst^-1 under jnz
    result[i] = f.nbr(6, 11) - f.nbr(6, 3) * f.nbr(6, 13);
    i += 1;

    // next pc for the regular/jump cases, plus the jnz taken-branch rule
    result[i] = (one - f.flag_bit(PC_JNZ)) * f.nbr(3, 16)
        + f.nbr(6, 3) * (f.nbr(3, 16) - (f.nbr(3, 0) + f.nbr(3, 13)))
        - (flag_pc_update_regular(f) * npc_regular
            + f.flag_bit(PC_JUMP_ABS) * f.nbr(6, 13)
            + f.flag_bit(PC_JUMP_REL) * (f.nbr(3, 0) + f.nbr(6, 13)));
    i += 1;

    // jnz with dst == 0 falls through
    result[i] = (f.nbr(6, 11) - f.flag_bit(PC_JNZ)) * (f.nbr(3, 16) - npc_regular);
    i += 1;

    // ap' = ap + ap_add * res + ap_add1 + 2 * call
    result[i] = f.nbr(6, 17)
        - (f.nbr(6, 1)
            + f.flag_bit(AP_ADD) * f.nbr(6, 13)
            + f.flag_bit(AP_ADD1)
            + f.flag_bit(OPCODE_CALL) * two);
    i += 1;

    // fp' = fp / dst (ret) / ap + 2 (call)
    result[i] = f.nbr(6, 25)
        - (flag_fp_update_regular(f) * f.nbr(6, 9)
            + f.flag_bit(OPCODE_RET) * f.nbr(3, 9)
            + f.flag_bit(OPCODE_CALL) * (f.nbr(6, 1) + two));
    i += 1;

    debug_assert_eq!(i, result.len(), "register update constraint count mismatch");
}

/// call/ret/assert_eq structural assertions.
pub(super) fn eval_opcodes(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let one = Felt::one();
    let two = Felt::from(2u64);
    let four = Felt::from(4u64);
    let call = f.flag_bit(OPCODE_CALL);
    let ret = f.flag_bit(OPCODE_RET);
    let mut i = 0;

    // call pushes fp then the return pc
    result[i] = call * (f.nbr(3, 9) - f.nbr(6, 9));
    i += 1;
    result[i] = call * (f.nbr(3, 5) - (f.nbr(3, 0) + f.flag_bit(OP1_IMM) + one));
    i += 1;

    // call offsets are fixed: off_dst = 0, off_op0 = +1 (biased)
    result[i] = call * (f.nbr(5, 0) - air.half_offset_size);
    i += 1;
    result[i] = call * (f.nbr(5, 8) - (air.half_offset_size + one));
    i += 1;
    result[i] = call * (call + call + one + one - (f.flag_bit(DST_REG) + f.flag_bit(OP0_REG) + four));
    i += 1;

    // ret reads fp from [fp - 2] and the return pc from [fp - 1]
    result[i] = ret * (f.nbr(5, 0) + two - air.half_offset_size);
    i += 1;
    result[i] = ret * (f.nbr(5, 4) + one - air.half_offset_size);
    i += 1;
    result[i] =
        ret * (f.flag_bit(PC_JUMP_ABS) + f.flag_bit(DST_REG) + f.flag_bit(OP1_FP) + flag_res_op1(f) - four);
    i += 1;

    // assert_eq: res = dst
    result[i] = f.flag_bit(OPCODE_ASSERT_EQ) * (f.nbr(3, 9) - f.nbr(6, 13));
    i += 1;

    debug_assert_eq!(i, result.len(), "opcode constraint count mismatch");
}

/// Register values pinned on the first row and the first row of the last
/// cycle. fp starts and ends at the initial ap.
pub(super) fn eval_boundary(result: &mut [Felt], f: &Frame, air: &RecursiveAir) {
    let mut i = 0;
    result[i] = f.nbr(6, 1) - air.initial_ap;
    i += 1;
    result[i] = f.nbr(6, 9) - air.initial_ap;
    i += 1;
    result[i] = f.nbr(3, 0) - air.initial_pc;
    i += 1;
    result[i] = f.nbr(6, 1) - air.final_ap;
    i += 1;
    result[i] = f.nbr(6, 9) - air.initial_ap;
    i += 1;
    result[i] = f.nbr(3, 0) - air.final_pc;
    i += 1;
    debug_assert_eq!(i, result.len(), "boundary constraint count mismatch");
}
