//! The recursive-layout evaluator.
//!
//! Owns the frozen construction state (segment addresses, range bounds, hash
//! context), the set-once interaction store, and the aggregation of all 93
//! constraint numerators into one fraction. Numerator formulas live in the
//! per-family modules; this file binds them to their vanishing domains.

use std::collections::BTreeMap;

use ark_ff::{One, Zero};
use ark_poly::{EvaluationDomain, Radix2EvaluationDomain};

use crate::air::{Air, DomainDescriptor, Fraction, InteractionParams, Mask};
use crate::curve::{AffinePoint, PedersenHashContext};
use crate::error::{AirError, Result};
use crate::felt::Felt;
use crate::interaction::{InteractionElements, InteractionState, InteractionStore};
use crate::periodic::PeriodicColumn;
use crate::segments::{require_segment, MemorySegmentMap};
use crate::trace::{TraceContext, TraceTable, Violation, VirtualCell};

use super::frame::Frame;
use super::{
    bitwise, cpu, diluted, mask, memory, pedersen, periodic, range_check, ConstraintLayout, Family,
    CONSTRAINTS, CONSTRAINT_DEGREE, CPU_COMPONENT_HEIGHT, CPU_COMPONENT_STEP, LAYOUT_CODE,
    LAYOUT_NAME, MIN_N_STEPS, NUM_COLUMNS, NUM_COLUMNS_FIRST, NUM_COLUMNS_SECOND, NUM_CONSTRAINTS,
    NUM_INTERACTION_ELEMENTS, NUM_NEIGHBORS, NUM_PERIODIC_COLUMNS, OFFSET_BITS,
};

/// Number of coset-type domain predicates.
pub const NUM_DOMAINS: usize = 27;
/// Number of generator-power shifts expected by `constraints_eval`.
pub const NUM_SHIFTS: usize = 25;

/// Coset-type domains, in the order `domain_evals_at_point` returns them.
/// Power indices refer to `point_exponents()`:
/// [n, n/2, n/4, n/16, n/32, n/128, n/1024, n/2048].
const DOMAIN_DESCRIPTORS: [DomainDescriptor; NUM_DOMAINS] = [
    DomainDescriptor::new(0, None),     // every row
    DomainDescriptor::new(1, None),     // memory pairs
    DomainDescriptor::new(2, None),     // offset / subset-sum sites
    DomainDescriptor::new(3, None),     // cycle starts
    DomainDescriptor::new(3, Some(0)),  // cycle tails (row 15 of 16)
    DomainDescriptor::new(4, None),     // bitwise value starts
    DomainDescriptor::new(5, None),     // 128-row instance starts
    DomainDescriptor::new(5, Some(1)),  // fourth bitwise value (row 96 of 128)
    DomainDescriptor::new(5, Some(2)),  // chunk position 1 (row 2 of 128)
    DomainDescriptor::new(5, Some(3)),  // chunk position 2
    DomainDescriptor::new(5, Some(4)),  // chunk position 3
    DomainDescriptor::new(5, Some(5)),  // chunk position 4
    DomainDescriptor::new(5, Some(6)),  // chunk position 5
    DomainDescriptor::new(5, Some(7)),  // chunk position 6
    DomainDescriptor::new(5, Some(8)),  // chunk position 7
    DomainDescriptor::new(5, Some(9)),  // chunk position 8
    DomainDescriptor::new(5, Some(10)), // chunk position 9
    DomainDescriptor::new(5, Some(11)), // chunk position 10
    DomainDescriptor::new(5, Some(12)), // chunk position 11
    DomainDescriptor::new(5, Some(13)), // chunk position 12
    DomainDescriptor::new(5, Some(14)), // chunk position 13
    DomainDescriptor::new(5, Some(15)), // chunk position 14
    DomainDescriptor::new(5, Some(16)), // chunk position 15
    DomainDescriptor::new(6, None),     // hash half starts
    DomainDescriptor::new(6, Some(17)), // last subset position of a half (row 1020)
    DomainDescriptor::new(6, Some(18)), // bit-extraction end (row 1008)
    DomainDescriptor::new(7, None),     // hash instance starts
];

/// Named view over the domain values one evaluation needs.
struct Domains {
    every_row: Felt,
    rows2: Felt,
    rows4: Felt,
    rows16: Felt,
    rows16_tail: Felt,
    rows32: Felt,
    rows128: Felt,
    rows128_fourth_value: Felt,
    rows128_chunks: [Felt; 15],
    rows1024: Felt,
    rows1024_last_pos: Felt,
    rows1024_bit_end: Felt,
    rows2048: Felt,
    first_row: Felt,
    last_row: Felt,
    last_memory_row: Felt,
    last_rc_row: Felt,
    last_cycle_row: Felt,
    last_instance128: Felt,
    last_instance2048: Felt,
}

impl Domains {
    fn assemble(precomputed: &[Felt], point: &Felt, shifts: &[Felt]) -> Self {
        let mut chunks = [Felt::zero(); 15];
        chunks.copy_from_slice(&precomputed[8..23]);
        Self {
            every_row: precomputed[0],
            rows2: precomputed[1],
            rows4: precomputed[2],
            rows16: precomputed[3],
            rows16_tail: precomputed[4],
            rows32: precomputed[5],
            rows128: precomputed[6],
            rows128_fourth_value: precomputed[7],
            rows128_chunks: chunks,
            rows1024: precomputed[23],
            rows1024_last_pos: precomputed[24],
            rows1024_bit_end: precomputed[25],
            rows2048: precomputed[26],
            first_row: *point - Felt::one(),
            last_row: *point - shifts[19],
            last_memory_row: *point - shifts[20],
            last_rc_row: *point - shifts[21],
            last_cycle_row: *point - shifts[22],
            last_instance128: *point - shifts[23],
            last_instance2048: *point - shifts[24],
        }
    }
}

/// Evaluator for the recursive layout. Immutable after construction except
/// for the one-shot interaction assignment; safe to share across threads
/// once that has happened.
pub struct RecursiveAir {
    n_steps: usize,
    trace_length: usize,

    pub(super) offset_size: Felt,
    pub(super) half_offset_size: Felt,
    pub(super) initial_ap: Felt,
    pub(super) final_ap: Felt,
    pub(super) initial_pc: Felt,
    pub(super) final_pc: Felt,

    pedersen_begin_addr: u64,
    range_check_begin_addr: u64,
    bitwise_begin_addr: u64,
    pub(super) initial_pedersen_addr: Felt,
    pub(super) initial_range_check_addr: Felt,
    pub(super) initial_bitwise_addr: Felt,

    pub(super) range_check_min: Felt,
    pub(super) range_check_max: Felt,
    pub(super) pedersen_shift_point: AffinePoint,
    pub(super) diluted_first_elm: Felt,
    hash_context: PedersenHashContext,
    dynamic_params: Vec<u64>,
    interaction: InteractionStore,
}

impl RecursiveAir {
    pub fn new(
        n_steps: usize,
        dynamic_params: &BTreeMap<String, u64>,
        range_check_min: u64,
        range_check_max: u64,
        segments: &MemorySegmentMap,
        hash_context: &PedersenHashContext,
    ) -> Result<Self> {
        if !n_steps.is_power_of_two() || n_steps < MIN_N_STEPS {
            return Err(AirError::InvalidStepCount(format!(
                "n_steps must be a power of two >= {MIN_N_STEPS}, got {n_steps}"
            )));
        }
        if range_check_min > range_check_max || range_check_max >= (1 << OFFSET_BITS) {
            return Err(AirError::InvalidRangeCheckBounds(format!(
                "need min <= max < 2^16, got [{range_check_min}, {range_check_max}]"
            )));
        }
        if !hash_context.shift_point.is_on_curve()
            || hash_context.points.iter().any(|p| !p.is_on_curve())
        {
            return Err(AirError::InvalidConfig(
                "hash context point off curve".to_string(),
            ));
        }

        let parsed = Self::parse_dynamic_params_impl(dynamic_params)?;

        let program = require_segment(segments, "program")?;
        let execution = require_segment(segments, "execution")?;
        let pedersen_segment = require_segment(segments, "pedersen")?;
        let range_check_segment = require_segment(segments, "range_check")?;
        let bitwise_segment = require_segment(segments, "bitwise")?;

        let trace_length = n_steps * CPU_COMPONENT_HEIGHT * CPU_COMPONENT_STEP;
        log::debug!(
            "recursive air: n_steps={n_steps}, trace_length={trace_length}, \
             pedersen@{}, range_check@{}, bitwise@{}",
            pedersen_segment.begin_addr,
            range_check_segment.begin_addr,
            bitwise_segment.begin_addr
        );

        Ok(Self {
            n_steps,
            trace_length,
            offset_size: Felt::from(1u64 << OFFSET_BITS),
            half_offset_size: Felt::from(1u64 << (OFFSET_BITS - 1)),
            initial_ap: Felt::from(execution.begin_addr),
            final_ap: Felt::from(execution.stop_ptr),
            initial_pc: Felt::from(program.begin_addr),
            final_pc: Felt::from(program.stop_ptr),
            pedersen_begin_addr: pedersen_segment.begin_addr,
            range_check_begin_addr: range_check_segment.begin_addr,
            bitwise_begin_addr: bitwise_segment.begin_addr,
            initial_pedersen_addr: Felt::from(pedersen_segment.begin_addr),
            initial_range_check_addr: Felt::from(range_check_segment.begin_addr),
            initial_bitwise_addr: Felt::from(bitwise_segment.begin_addr),
            range_check_min: Felt::from(range_check_min),
            range_check_max: Felt::from(range_check_max),
            pedersen_shift_point: hash_context.shift_point,
            diluted_first_elm: Felt::zero(),
            hash_context: *hash_context,
            dynamic_params: parsed,
            interaction: InteractionStore::new(),
        })
    }

    fn parse_dynamic_params_impl(params: &BTreeMap<String, u64>) -> Result<Vec<u64>> {
        // The layout is fixed: no parameter is recognized.
        if let Some(name) = params.keys().next() {
            return Err(AirError::UnknownDynamicParam(name.clone()));
        }
        Ok(Vec::new())
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    pub fn initial_ap(&self) -> Felt {
        self.initial_ap
    }

    pub fn final_ap(&self) -> Felt {
        self.final_ap
    }

    pub fn initial_pc(&self) -> Felt {
        self.initial_pc
    }

    pub fn final_pc(&self) -> Felt {
        self.final_pc
    }

    pub fn pedersen_begin_addr(&self) -> u64 {
        self.pedersen_begin_addr
    }

    pub fn range_check_begin_addr(&self) -> u64 {
        self.range_check_begin_addr
    }

    pub fn bitwise_begin_addr(&self) -> u64 {
        self.bitwise_begin_addr
    }

    pub fn hash_context(&self) -> &PedersenHashContext {
        &self.hash_context
    }

    pub fn dynamic_params(&self) -> &[u64] {
        &self.dynamic_params
    }

    /// Assigns the interaction challenges. Must happen exactly once, after
    /// the first commitment round and before any evaluation touching
    /// interaction data. The public-memory product depends on public inputs
    /// held by the driver; the diluted terminal is derived here.
    pub fn set_interaction(
        &self,
        elements: InteractionElements,
        public_memory_prod: Felt,
    ) -> Result<()> {
        let diluted_final_cum_val = diluted::cumulative_value(
            &elements.diluted_interaction_z,
            &elements.diluted_interaction_alpha,
        );
        self.interaction.set(InteractionState {
            elements,
            public_memory_prod,
            diluted_final_cum_val,
        })
    }

    pub fn is_interaction_set(&self) -> bool {
        self.interaction.is_set()
    }

    pub(super) fn interaction(&self) -> &InteractionState {
        self.interaction.get()
    }

    /// Named trace-cell aliases consumed by the trace generator.
    pub fn trace_context(&self) -> TraceContext {
        TraceContext::new(vec![
            ("cpu/decode/mem_inst/addr", VirtualCell::new(3, 16, 0)),
            ("cpu/decode/mem_inst/value", VirtualCell::new(3, 16, 1)),
            ("cpu/decode/flag_suffixes", VirtualCell::new(0, 1, 0)),
            ("cpu/decode/off_dst", VirtualCell::new(5, 16, 0)),
            ("cpu/decode/off_op1", VirtualCell::new(5, 16, 4)),
            ("cpu/decode/off_op0", VirtualCell::new(5, 16, 8)),
            ("cpu/operands/mem_op0/addr", VirtualCell::new(3, 16, 4)),
            ("cpu/operands/mem_op0/value", VirtualCell::new(3, 16, 5)),
            ("cpu/operands/mem_dst/addr", VirtualCell::new(3, 16, 8)),
            ("cpu/operands/mem_dst/value", VirtualCell::new(3, 16, 9)),
            ("cpu/operands/mem_op1/addr", VirtualCell::new(3, 16, 12)),
            ("cpu/operands/mem_op1/value", VirtualCell::new(3, 16, 13)),
            ("cpu/registers/ap", VirtualCell::new(6, 16, 1)),
            ("cpu/registers/fp", VirtualCell::new(6, 16, 9)),
            ("cpu/operands/ops_mul", VirtualCell::new(6, 16, 5)),
            ("cpu/operands/res", VirtualCell::new(6, 16, 13)),
            ("cpu/update_registers/update_pc/tmp0", VirtualCell::new(6, 16, 3)),
            ("cpu/update_registers/update_pc/tmp1", VirtualCell::new(6, 16, 11)),
            ("orig/public_memory/addr", VirtualCell::new(3, 16, 2)),
            ("orig/public_memory/value", VirtualCell::new(3, 16, 3)),
            ("memory/sorted/addr", VirtualCell::new(4, 2, 0)),
            ("memory/sorted/value", VirtualCell::new(4, 2, 1)),
            ("memory/multi_column_perm/perm/cum_prod0", VirtualCell::new(9, 2, 0)),
            ("range_check16_pool", VirtualCell::new(5, 4, 0)),
            ("range_check16/sorted", VirtualCell::new(5, 4, 2)),
            ("range_check16/perm/cum_prod0", VirtualCell::new(9, 4, 1)),
            ("diluted_pool", VirtualCell::new(1, 1, 0)),
            ("diluted_check/permuted_values", VirtualCell::new(2, 1, 0)),
            ("diluted_check/cumulative_value", VirtualCell::new(7, 1, 0)),
            ("diluted_check/permutation/cum_prod0", VirtualCell::new(8, 1, 0)),
            ("pedersen/input0/addr", VirtualCell::new(3, 2048, 10)),
            ("pedersen/input0/value", VirtualCell::new(3, 2048, 11)),
            ("pedersen/input1/addr", VirtualCell::new(3, 2048, 1034)),
            ("pedersen/input1/value", VirtualCell::new(3, 2048, 1035)),
            ("pedersen/output/addr", VirtualCell::new(3, 2048, 522)),
            ("pedersen/output/value", VirtualCell::new(3, 2048, 523)),
            ("pedersen/hash0/ec_subset_sum/selector", VirtualCell::new(6, 4, 0)),
            ("pedersen/hash0/ec_subset_sum/slope", VirtualCell::new(6, 4, 2)),
            ("pedersen/hash0/ec_subset_sum/partial_sum/x", VirtualCell::new(5, 4, 1)),
            ("pedersen/hash0/ec_subset_sum/partial_sum/y", VirtualCell::new(5, 4, 3)),
            (
                "pedersen/hash0/ec_subset_sum/bit_unpacking/prod_bits_251_196_192",
                VirtualCell::new(6, 2048, 7),
            ),
            (
                "pedersen/hash0/ec_subset_sum/bit_unpacking/prod_bits_251_196",
                VirtualCell::new(6, 2048, 1022),
            ),
            ("range_check_builtin/mem/addr", VirtualCell::new(3, 128, 74)),
            ("range_check_builtin/mem/value", VirtualCell::new(3, 128, 75)),
            ("range_check_builtin/inner_range_check", VirtualCell::new(5, 16, 12)),
            ("bitwise/var_pool/addr", VirtualCell::new(3, 32, 26)),
            ("bitwise/var_pool/value", VirtualCell::new(3, 32, 27)),
            ("bitwise/x_or_y/addr", VirtualCell::new(3, 128, 42)),
            ("bitwise/x_or_y/value", VirtualCell::new(3, 128, 43)),
        ])
    }

    /// Evaluates the numerators of one family into its slot range of `out`
    /// (a full-width buffer).
    fn eval_family_numerators(
        &self,
        family: Family,
        frame: &Frame,
        periodic: &[Felt],
        out: &mut [Felt],
    ) {
        let ConstraintLayout {
            cpu_decode,
            cpu_operands,
            cpu_update_registers,
            cpu_opcodes,
            boundary,
            memory: memory_slots,
            range_check16,
            diluted_check,
            pedersen: pedersen_slots,
            range_check_builtin,
            bitwise: bitwise_slots,
        } = CONSTRAINTS;
        match family {
            Family::CpuDecode => cpu::eval_decode(&mut out[cpu_decode], frame, self),
            Family::CpuOperands => cpu::eval_operands(&mut out[cpu_operands], frame, self),
            Family::CpuUpdateRegisters => {
                cpu::eval_update_registers(&mut out[cpu_update_registers], frame, self)
            }
            Family::CpuOpcodes => cpu::eval_opcodes(&mut out[cpu_opcodes], frame, self),
            Family::Boundary => cpu::eval_boundary(&mut out[boundary], frame, self),
            Family::Memory => memory::eval(&mut out[memory_slots], frame, self),
            Family::RangeCheck16 => {
                range_check::eval_range_check16(&mut out[range_check16], frame, self)
            }
            Family::DilutedCheck => diluted::eval(&mut out[diluted_check], frame, self),
            Family::Pedersen => pedersen::eval(&mut out[pedersen_slots], frame, self, periodic),
            Family::RangeCheckBuiltin => {
                range_check::eval_builtin(&mut out[range_check_builtin], frame, self)
            }
            Family::Bitwise => bitwise::eval(&mut out[bitwise_slots], frame, self),
        }
    }

    /// Checks whether constraint `slot` constrains trace row `row`.
    pub fn constraint_applies(&self, slot: usize, row: usize) -> bool {
        let n = self.trace_length;
        debug_assert!(slot < NUM_CONSTRAINTS && row < n);
        match slot {
            // decode booleanity walks the suffix column, skipping cycle tails
            0 => row % 16 != 15,
            1 => row % 16 == 15,
            2..=11 | 18..=26 | 39 | 40 => row % 16 == 0,
            12..=17 => row % 16 == 0 && row != n - 16,
            27..=29 | 33 | 38 | 41 | 45 | 47 | 50 | 51 | 74 | 81 | 82 => row == 0,
            30..=32 => row == n - 16,
            34 | 36 | 37 => row % 2 == 0 && row != n - 2,
            35 => row == n - 2,
            42 | 44 => row % 4 == 0 && row != n - 4,
            43 | 46 => row == n - 4,
            48 | 52 => row != n - 1,
            49 | 53 => row == n - 1,
            54..=59 => row % 1024 == 0,
            60 | 63..=67 => row % 4 == 0 && row % 1024 != 1020,
            61 => row % 1024 == 1008,
            62 => row % 1024 == 1020,
            68..=72 | 75..=78 => row % 2048 == 0,
            73 => row % 2048 == 0 && row != n - 2048,
            79 | 84 | 87 | 89..=92 => row % 128 == 0,
            80 | 85 => row % 128 == 0 && row != n - 128,
            83 => row % 32 == 0 && row % 128 != 96,
            86 => row % 32 == 0,
            88 => row % 2 == 0 && row % 128 < 32,
            _ => unreachable!("constraint slot out of range"),
        }
    }

    /// Evaluates the selected constraint families directly on trace rows and
    /// reports every violated (slot, row). A violating trace is data, not an
    /// error: the return value is the verdict.
    pub fn check_trace(
        &self,
        trace: &TraceTable,
        periodic_columns: &[PeriodicColumn],
        families: &[Family],
    ) -> Vec<Violation> {
        let slots: Vec<usize> = families.iter().flat_map(|f| f.slots()).collect();
        self.check_trace_slots(trace, periodic_columns, &slots)
    }

    /// Slot-scoped variant of [`Self::check_trace`]. Neighbors are gathered
    /// cyclically through the mask, matching the evaluation-domain
    /// semantics.
    pub fn check_trace_slots(
        &self,
        trace: &TraceTable,
        periodic_columns: &[PeriodicColumn],
        slots: &[usize],
    ) -> Vec<Violation> {
        let n = trace.length();
        assert_eq!(n, self.trace_length, "trace length mismatch");
        assert_eq!(trace.num_columns(), NUM_COLUMNS, "trace width mismatch");
        assert_eq!(
            periodic_columns.len(),
            NUM_PERIODIC_COLUMNS,
            "periodic column count mismatch"
        );
        assert!(
            slots.iter().all(|&s| s < NUM_CONSTRAINTS),
            "constraint slot out of range"
        );

        let mut violations = Vec::new();
        let mut neighbors = vec![Felt::zero(); NUM_NEIGHBORS];
        let mut numerators = vec![Felt::zero(); NUM_CONSTRAINTS];
        for row in 0..n {
            let live: Vec<usize> = slots
                .iter()
                .copied()
                .filter(|&s| self.constraint_applies(s, row))
                .collect();
            if live.is_empty() {
                continue;
            }
            for (i, m) in mask::MASK.iter().enumerate() {
                neighbors[i] = trace.get(m.column, (row + m.offset) % n);
            }
            let frame = Frame::new(&neighbors);
            let periodic: Vec<Felt> =
                periodic_columns.iter().map(|p| p.at_row(row)).collect();
            for family in Family::ALL {
                if live.iter().any(|s| family.slots().contains(s)) {
                    self.eval_family_numerators(family, &frame, &periodic, &mut numerators);
                }
            }
            for slot in live {
                if !numerators[slot].is_zero() {
                    violations.push(Violation { slot, row });
                }
            }
        }
        violations
    }
}

impl Air for RecursiveAir {
    fn layout_name(&self) -> &'static str {
        LAYOUT_NAME
    }

    fn layout_code(&self) -> u128 {
        LAYOUT_CODE
    }

    fn trace_length(&self) -> usize {
        self.trace_length
    }

    fn num_columns(&self) -> usize {
        NUM_COLUMNS
    }

    fn mask(&self) -> &'static [Mask] {
        &mask::MASK
    }

    fn num_random_coefficients(&self) -> usize {
        NUM_CONSTRAINTS
    }

    fn num_periodic_columns(&self) -> usize {
        NUM_PERIODIC_COLUMNS
    }

    fn constraint_degree(&self) -> usize {
        CONSTRAINT_DEGREE
    }

    fn interaction_params(&self) -> InteractionParams {
        InteractionParams {
            n_columns_first: NUM_COLUMNS_FIRST,
            n_columns_second: NUM_COLUMNS_SECOND,
            n_interaction_elements: NUM_INTERACTION_ELEMENTS,
        }
    }

    fn parse_dynamic_params(&self, params: &BTreeMap<String, u64>) -> Result<Vec<u64>> {
        Self::parse_dynamic_params_impl(params)
    }

    fn build_periodic_columns(&self, trace_generator: &Felt) -> Result<Vec<PeriodicColumn>> {
        let domain = Radix2EvaluationDomain::<Felt>::new(self.trace_length)
            .expect("trace length fits the field's two-adicity");
        if *trace_generator != domain.group_gen() {
            return Err(AirError::GeneratorMismatch(format!(
                "expected the canonical radix-2 generator of a domain of size {}",
                self.trace_length
            )));
        }
        let (xs, ys) = periodic::build_tables(&self.hash_context);
        Ok(vec![
            PeriodicColumn::new(xs, periodic::ROW_PERIOD),
            PeriodicColumn::new(ys, periodic::ROW_PERIOD),
        ])
    }

    fn point_exponents(&self) -> Vec<u64> {
        let n = self.trace_length as u64;
        vec![n, n / 2, n / 4, n / 16, n / 32, n / 128, n / 1024, n / 2048]
    }

    fn domain_shift_exponents(&self) -> Vec<u64> {
        let n = self.trace_length as u64;
        let mut shifts = vec![15 * n / 16, 3 * n / 4];
        shifts.extend((1..16).map(|j| j * n / 64));
        shifts.extend([255 * n / 256, 63 * n / 64]);
        shifts.extend([n - 1, n - 2, n - 4, n - 16, n - 128, n - 2048]);
        debug_assert_eq!(shifts.len(), NUM_SHIFTS);
        shifts
    }

    fn domain_descriptors(&self) -> &'static [DomainDescriptor] {
        &DOMAIN_DESCRIPTORS
    }

    fn constraints_eval(
        &self,
        neighbors: &[Felt],
        periodic: &[Felt],
        coefficients: &[Felt],
        point: &Felt,
        shifts: &[Felt],
        domains: &[Felt],
    ) -> Fraction {
        assert_eq!(neighbors.len(), NUM_NEIGHBORS, "neighbor vector length");
        assert_eq!(periodic.len(), NUM_PERIODIC_COLUMNS, "periodic vector length");
        assert_eq!(coefficients.len(), NUM_CONSTRAINTS, "coefficient vector length");
        assert_eq!(shifts.len(), NUM_SHIFTS, "shift vector length");
        assert_eq!(domains.len(), NUM_DOMAINS, "domain vector length");

        let frame = Frame::new(neighbors);
        let mut num = vec![Felt::zero(); NUM_CONSTRAINTS];
        for family in Family::ALL {
            self.eval_family_numerators(family, &frame, periodic, &mut num);
        }

        let d = Domains::assemble(domains, point, shifts);
        let weighted = |slots: &mut dyn Iterator<Item = usize>| -> Felt {
            slots.map(|s| coefficients[s] * num[s]).sum()
        };

        let mut total = Fraction::zero();
        // decode booleanity: everywhere but the cycle tails
        total.add_quotient(weighted(&mut [0].into_iter()) * d.rows16_tail, d.every_row);
        // decode zero tail
        total.add_quotient(weighted(&mut [1].into_iter()), d.rows16_tail);
        // per-cycle CPU work and public-memory pinning
        total.add_quotient(
            weighted(&mut (2..12).chain(18..27).chain([39, 40])),
            d.rows16,
        );
        // register transitions skip the last cycle
        total.add_quotient(weighted(&mut (12..18)) * d.last_cycle_row, d.rows16);
        // first-row conditions
        total.add_quotient(
            weighted(&mut [27, 28, 29, 33, 38, 41, 45, 47, 50, 51, 74, 81, 82].into_iter()),
            d.first_row,
        );
        // last-cycle register boundary
        total.add_quotient(weighted(&mut (30..33)), d.last_cycle_row);
        // memory pairs, last pair excluded
        total.add_quotient(
            weighted(&mut [34, 36, 37].into_iter()) * d.last_memory_row,
            d.rows2,
        );
        total.add_quotient(weighted(&mut [35].into_iter()), d.last_memory_row);
        // range-check sites, last site excluded
        total.add_quotient(weighted(&mut [42, 44].into_iter()) * d.last_rc_row, d.rows4);
        total.add_quotient(weighted(&mut [43, 46].into_iter()), d.last_rc_row);
        // diluted pool walks every row but the last
        total.add_quotient(weighted(&mut [48, 52].into_iter()) * d.last_row, d.every_row);
        total.add_quotient(weighted(&mut [49, 53].into_iter()), d.last_row);
        // pedersen bit unpacking, once per hash half
        total.add_quotient(weighted(&mut (54..60)), d.rows1024);
        // subset-sum walk, skipping the final position of each half
        total.add_quotient(
            weighted(&mut [60, 63, 64, 65, 66, 67].into_iter()) * d.rows1024_last_pos,
            d.rows4,
        );
        total.add_quotient(weighted(&mut [61].into_iter()), d.rows1024_bit_end);
        total.add_quotient(weighted(&mut [62].into_iter()), d.rows1024_last_pos);
        // per-instance pedersen conditions
        total.add_quotient(
            weighted(&mut [68, 69, 70, 71, 72, 75, 76, 77, 78].into_iter()),
            d.rows2048,
        );
        total.add_quotient(
            weighted(&mut [73].into_iter()) * d.last_instance2048,
            d.rows2048,
        );
        // 128-row builtin instances
        total.add_quotient(
            weighted(&mut [79, 84, 87, 89, 90, 91, 92].into_iter()),
            d.rows128,
        );
        total.add_quotient(
            weighted(&mut [80, 85].into_iter()) * d.last_instance128,
            d.rows128,
        );
        // bitwise value starts, fourth value excluded for the address step
        total.add_quotient(
            weighted(&mut [83].into_iter()) * d.rows128_fourth_value,
            d.rows32,
        );
        total.add_quotient(weighted(&mut [86].into_iter()), d.rows32);
        // chunk-wise addition identity over the sixteen diluted positions
        let chunk_domain = d
            .rows128_chunks
            .iter()
            .fold(d.rows128, |acc, c| acc * c);
        total.add_quotient(weighted(&mut [88].into_iter()), chunk_domain);

        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segments::SegmentRange;

    fn segment_map() -> MemorySegmentMap {
        let mut map = MemorySegmentMap::new();
        for (name, begin, stop) in [
            ("program", 1u64, 5),
            ("execution", 100, 200),
            ("output", 300, 310),
            ("pedersen", 400, 430),
            ("range_check", 500, 520),
            ("bitwise", 600, 650),
        ] {
            map.insert(
                name.to_string(),
                SegmentRange {
                    begin_addr: begin,
                    stop_ptr: stop,
                },
            );
        }
        map
    }

    fn air(n_steps: usize) -> RecursiveAir {
        RecursiveAir::new(
            n_steps,
            &BTreeMap::new(),
            0,
            65535,
            &segment_map(),
            &PedersenHashContext::standard(),
        )
        .unwrap()
    }

    #[test]
    fn test_descriptor_count() {
        assert_eq!(DOMAIN_DESCRIPTORS.len(), NUM_DOMAINS);
    }

    #[test]
    fn test_degree_bound() {
        for n_steps in [128, 256, 1024] {
            let a = air(n_steps);
            assert_eq!(
                a.composition_degree_bound(),
                CONSTRAINT_DEGREE * n_steps * CPU_COMPONENT_HEIGHT
            );
        }
    }

    #[test]
    fn test_every_constraint_applies_somewhere() {
        let a = air(256);
        for slot in 0..NUM_CONSTRAINTS {
            assert!(
                (0..a.trace_length()).any(|row| a.constraint_applies(slot, row)),
                "slot {slot} never applies"
            );
        }
    }

    #[test]
    fn test_shift_count_matches_descriptors() {
        let a = air(128);
        let shifts = a.domain_shift_exponents();
        assert_eq!(shifts.len(), NUM_SHIFTS);
        for d in DOMAIN_DESCRIPTORS {
            if let Some(s) = d.shift {
                assert!(s < shifts.len());
            }
        }
    }

    #[test]
    fn test_trace_context_cells_resolve() {
        let a = air(128);
        let ctx = a.trace_context();
        assert!(ctx.get("cpu/registers/ap").is_some());
        assert!(ctx.get("pedersen/output/value").is_some());
        assert!(ctx.get("no/such/cell").is_none());
    }
}
