//! CPU family scenarios: a trace of valid relative jumps satisfies every
//! decode/operand/register constraint, and a non-boolean flag breaks it.

mod common;

use cpu_air::{Air, Family, Felt, TraceTable, Violation};

const FLAG_DST_REG: u64 = 1 << 0;
const FLAG_OP0_REG: u64 = 1 << 1;
const FLAG_OP1_IMM: u64 = 1 << 2;
const FLAG_PC_JUMP_REL: u64 = 1 << 8;

const AP: u64 = common::EXECUTION_BASE;
const DST_VAL: u64 = 7;
const IMM: u64 = 2;

/// One `jmp rel 2` per cycle: pc advances by the instruction size, ap and fp
/// stay put. Every cycle is identical up to its pc.
fn build_jmp_rel_trace(n_steps: usize) -> TraceTable {
    let flags = FLAG_DST_REG | FLAG_OP0_REG | FLAG_OP1_IMM | FLAG_PC_JUMP_REL;
    let off_dst = 0x7fffu64; // -1, biased
    let off_op0 = 0x7fffu64; // -1, biased
    let off_op1 = 0x8001u64; // +1, biased
    let instruction = (((flags << 16) | off_op1) << 16 | off_op0) << 16 | off_dst;

    let mut trace = TraceTable::new(10, n_steps * 16);
    for cycle in 0..n_steps {
        let row = cycle * 16;
        let pc = 1 + 2 * cycle as u64;
        for i in 0..16 {
            trace.set(0, row + i, Felt::from(flags >> i));
        }
        trace.set(3, row, Felt::from(pc));
        trace.set(3, row + 1, Felt::from(instruction));
        // rows +2/+3 stay (0, 0): public memory placeholders
        trace.set(3, row + 4, Felt::from(AP - 1)); // op0 address (fp - 1)
        trace.set(3, row + 5, Felt::from(DST_VAL));
        trace.set(3, row + 8, Felt::from(AP - 1)); // dst address (fp - 1)
        trace.set(3, row + 9, Felt::from(DST_VAL));
        trace.set(3, row + 12, Felt::from(pc + 1)); // immediate operand
        trace.set(3, row + 13, Felt::from(IMM));
        trace.set(5, row, Felt::from(off_dst));
        trace.set(5, row + 4, Felt::from(off_op1));
        trace.set(5, row + 8, Felt::from(off_op0));
        trace.set(6, row + 1, Felt::from(AP));
        trace.set(6, row + 5, Felt::from(DST_VAL * IMM)); // op0 * op1
        trace.set(6, row + 9, Felt::from(AP)); // fp
        trace.set(6, row + 13, Felt::from(IMM)); // res = op1
        // tmp0 and tmp1 stay zero: jnz is off
    }
    trace
}

const CPU_FAMILIES: [Family; 4] = [
    Family::CpuDecode,
    Family::CpuOperands,
    Family::CpuUpdateRegisters,
    Family::CpuOpcodes,
];

fn cpu_air_for(n_steps: usize) -> cpu_air::RecursiveAir {
    // final pc after n_steps jumps of +2 from pc = 1
    let final_pc = 1 + 2 * n_steps as u64;
    let segments =
        common::segment_map_with(1, final_pc - 2, common::EXECUTION_BASE, common::EXECUTION_BASE);
    common::make_air_with(n_steps, 0, 65535, &segments)
}

#[test]
fn valid_jumps_satisfy_cpu_families() {
    let n_steps = 128;
    let air = cpu_air_for(n_steps);
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let trace = build_jmp_rel_trace(n_steps);
    let violations = air.check_trace(&trace, &periodic, &CPU_FAMILIES);
    assert!(violations.is_empty(), "unexpected violations: {violations:?}");
}

#[test]
fn valid_jumps_satisfy_register_boundaries() {
    let n_steps = 128;
    let air = cpu_air_for(n_steps);
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let trace = build_jmp_rel_trace(n_steps);
    let violations = air.check_trace(&trace, &periodic, &[Family::Boundary]);
    assert!(violations.is_empty(), "unexpected violations: {violations:?}");
}

#[test]
fn non_boolean_flag_is_caught() {
    let n_steps = 128;
    let air = cpu_air_for(n_steps);
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let mut trace = build_jmp_rel_trace(n_steps);

    // bump the first suffix so the decoded dst_reg flag becomes 2
    let flags = FLAG_DST_REG | FLAG_OP0_REG | FLAG_OP1_IMM | FLAG_PC_JUMP_REL;
    trace.set(0, 0, Felt::from(flags + 1));

    let violations = air.check_trace(&trace, &periodic, &CPU_FAMILIES);
    assert!(
        violations.contains(&Violation { slot: 0, row: 0 }),
        "flag booleanity violation not reported: {violations:?}"
    );
}

#[test]
fn wrong_next_pc_is_caught() {
    let n_steps = 128;
    let air = cpu_air_for(n_steps);
    let gen = common::trace_generator(air.trace_length());
    let periodic = air.build_periodic_columns(&gen).unwrap();
    let mut trace = build_jmp_rel_trace(n_steps);

    // cycle 5 claims the wrong next pc
    trace.set(3, 6 * 16, Felt::from(1000u64));
    let violations = air.check_trace(&trace, &periodic, &[Family::CpuUpdateRegisters]);
    assert!(
        violations.iter().any(|v| v.row == 5 * 16),
        "pc transition violation not reported: {violations:?}"
    );
}
