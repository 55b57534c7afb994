//! The `recursive` layout: 7 first-round + 3 interaction columns, with the
//! output, Pedersen, range-check and bitwise builtins and a diluted pool.
//!
//! All constants here are part of the proof format; prover and verifier must
//! agree on every one of them.

use std::ops::Range;

mod air;
mod bitwise;
mod cpu;
mod diluted;
mod frame;
mod mask;
mod memory;
mod pedersen;
mod periodic;
mod range_check;

pub use air::RecursiveAir;
pub use mask::MASK;

pub const LAYOUT_NAME: &str = "recursive";
/// The layout name packed big-endian into an integer.
pub const LAYOUT_CODE: u128 = 0x726563757273697665;

pub const NUM_COLUMNS_FIRST: usize = 7;
pub const NUM_COLUMNS_SECOND: usize = 3;
pub const NUM_COLUMNS: usize = NUM_COLUMNS_FIRST + NUM_COLUMNS_SECOND;
pub const NUM_PERIODIC_COLUMNS: usize = 2;
pub const NUM_INTERACTION_ELEMENTS: usize = 6;
pub const NUM_NEIGHBORS: usize = 133;
pub const NUM_CONSTRAINTS: usize = 93;
pub const CONSTRAINT_DEGREE: usize = 2;

pub const CPU_COMPONENT_HEIGHT: usize = 16;
pub const CPU_COMPONENT_STEP: usize = 1;
pub const PUBLIC_MEMORY_STEP: usize = 16;
pub const MEMORY_STEP: usize = 2;
pub const RANGE_CHECK_STEP: usize = 4;
pub const OFFSET_BITS: u32 = 16;

pub const HAS_DILUTED_POOL: bool = true;
pub const DILUTED_SPACING: usize = 4;
pub const DILUTED_N_BITS: usize = 16;

pub const PEDERSEN_BUILTIN_RATIO: usize = 128;
pub const PEDERSEN_BUILTIN_ROW_RATIO: usize = 2048;
pub const PEDERSEN_BUILTIN_REPETITIONS: usize = 1;
/// Rows of one 252-bit subset-sum half of a hash instance.
pub const PEDERSEN_HASH_HALF_ROWS: usize = 1024;

pub const RANGE_CHECK_BUILTIN_RATIO: usize = 8;
pub const RANGE_CHECK_BUILTIN_ROW_RATIO: usize = 128;
pub const RANGE_CHECK_N_PARTS: usize = 8;

pub const BITWISE_RATIO: usize = 8;
pub const BITWISE_ROW_RATIO: usize = 128;
pub const BITWISE_TOTAL_N_BITS: usize = 251;
/// Rows spanned by one of the four values of a bitwise instance.
pub const BITWISE_VALUE_ROWS: usize = 32;

pub const HAS_OUTPUT_BUILTIN: bool = true;
pub const HAS_PEDERSEN_BUILTIN: bool = true;
pub const HAS_RANGE_CHECK_BUILTIN: bool = true;
pub const HAS_ECDSA_BUILTIN: bool = false;
pub const HAS_BITWISE_BUILTIN: bool = true;
pub const HAS_EC_OP_BUILTIN: bool = false;
pub const HAS_KECCAK_BUILTIN: bool = false;
pub const HAS_POSEIDON_BUILTIN: bool = false;
pub const HAS_RANGE_CHECK96_BUILTIN: bool = false;
pub const HAS_ADD_MOD_BUILTIN: bool = false;
pub const IS_DYNAMIC_AIR: bool = false;

/// Segment names the layout knows about. `output` carries no constraints and
/// is never resolved; the rest are required at construction.
pub const SEGMENT_NAMES: [&str; 6] = [
    "program",
    "execution",
    "output",
    "pedersen",
    "range_check",
    "bitwise",
];

/// Smallest step count for which every builtin spacing divides the trace.
pub const MIN_N_STEPS: usize = PEDERSEN_BUILTIN_ROW_RATIO / CPU_COMPONENT_HEIGHT;

/// Constraint slot ranges - single source of truth for slot indices.
pub struct ConstraintLayout {
    pub cpu_decode: Range<usize>,
    pub cpu_operands: Range<usize>,
    pub cpu_update_registers: Range<usize>,
    pub cpu_opcodes: Range<usize>,
    pub boundary: Range<usize>,
    pub memory: Range<usize>,
    pub range_check16: Range<usize>,
    pub diluted_check: Range<usize>,
    pub pedersen: Range<usize>,
    pub range_check_builtin: Range<usize>,
    pub bitwise: Range<usize>,
}

pub const CONSTRAINTS: ConstraintLayout = ConstraintLayout {
    cpu_decode: 0..7,
    cpu_operands: 7..12,
    cpu_update_registers: 12..18,
    cpu_opcodes: 18..27,
    boundary: 27..33,
    memory: 33..41,
    range_check16: 41..47,
    diluted_check: 47..54,
    pedersen: 54..79,
    range_check_builtin: 79..82,
    bitwise: 82..93,
};

/// Constraint families, used to scope trace checking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    CpuDecode,
    CpuOperands,
    CpuUpdateRegisters,
    CpuOpcodes,
    Boundary,
    Memory,
    RangeCheck16,
    DilutedCheck,
    Pedersen,
    RangeCheckBuiltin,
    Bitwise,
}

impl Family {
    pub fn slots(&self) -> Range<usize> {
        match self {
            Family::CpuDecode => CONSTRAINTS.cpu_decode,
            Family::CpuOperands => CONSTRAINTS.cpu_operands,
            Family::CpuUpdateRegisters => CONSTRAINTS.cpu_update_registers,
            Family::CpuOpcodes => CONSTRAINTS.cpu_opcodes,
            Family::Boundary => CONSTRAINTS.boundary,
            Family::Memory => CONSTRAINTS.memory,
            Family::RangeCheck16 => CONSTRAINTS.range_check16,
            Family::DilutedCheck => CONSTRAINTS.diluted_check,
            Family::Pedersen => CONSTRAINTS.pedersen,
            Family::RangeCheckBuiltin => CONSTRAINTS.range_check_builtin,
            Family::Bitwise => CONSTRAINTS.bitwise,
        }
    }

    pub const ALL: [Family; 11] = [
        Family::CpuDecode,
        Family::CpuOperands,
        Family::CpuUpdateRegisters,
        Family::CpuOpcodes,
        Family::Boundary,
        Family::Memory,
        Family::RangeCheck16,
        Family::DilutedCheck,
        Family::Pedersen,
        Family::RangeCheckBuiltin,
        Family::Bitwise,
    ];
}
