//! Layout-generic evaluator surface.
//!
//! Every supported layout implements [`Air`]; the composition machinery and
//! prover/verifier drivers only talk to this trait. Domain predicates are
//! described by data tables (a power of the point minus an optional
//! generator-power shift) so the batched and per-point evaluation paths are
//! written once for all layouts.

use std::collections::BTreeMap;

use ark_ff::{Field, One, Zero};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::felt::Felt;
use crate::periodic::PeriodicColumn;

/// One neighbor: a trace cell the constraints may reference, relative to the
/// evaluation point.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mask {
    pub column: usize,
    pub offset: usize,
}

impl Mask {
    pub const fn new(column: usize, offset: usize) -> Self {
        Self { column, offset }
    }
}

/// Sizing of the interaction commitment round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionParams {
    pub n_columns_first: usize,
    pub n_columns_second: usize,
    pub n_interaction_elements: usize,
}

/// A domain predicate value: `point^exponents[power] - shift`, where the
/// shift is a fixed generator power (or one when absent).
#[derive(Clone, Copy, Debug)]
pub struct DomainDescriptor {
    /// Index into [`Air::point_exponents`].
    pub power: usize,
    /// Index into the shift vector; `None` means the constant one.
    pub shift: Option<usize>,
}

impl DomainDescriptor {
    pub const fn new(power: usize, shift: Option<usize>) -> Self {
        Self { power, shift }
    }
}

/// A deferred-division field value. Constraint aggregation sums quotients
/// with a handful of distinct denominators; keeping the fraction form avoids
/// an inversion per quotient.
#[derive(Clone, Copy, Debug)]
pub struct Fraction {
    numerator: Felt,
    denominator: Felt,
}

impl Fraction {
    pub fn zero() -> Self {
        Self {
            numerator: Felt::zero(),
            denominator: Felt::one(),
        }
    }

    pub fn new(numerator: Felt, denominator: Felt) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Adds `numerator / denominator` to the running sum.
    pub fn add_quotient(&mut self, numerator: Felt, denominator: Felt) {
        self.numerator = self.numerator * denominator + numerator * self.denominator;
        self.denominator *= denominator;
    }

    pub fn numerator(&self) -> Felt {
        self.numerator
    }

    pub fn denominator(&self) -> Felt {
        self.denominator
    }

    /// Collapses the fraction into a field element.
    pub fn into_felt(self) -> Felt {
        self.numerator
            * self
                .denominator
                .inverse()
                .expect("constraint denominator vanished on the evaluation point")
    }
}

/// The constraint system of one concrete layout.
pub trait Air: Send + Sync {
    /// Stable layout name; must match across prover and verifier.
    fn layout_name(&self) -> &'static str;

    /// Packed numeric layout code (the name's bytes); part of proof identity.
    fn layout_code(&self) -> u128;

    fn trace_length(&self) -> usize;

    fn num_columns(&self) -> usize;

    /// The fixed, ordered neighbor table. Evaluators must supply exactly
    /// these values in this order.
    fn mask(&self) -> &'static [Mask];

    /// One random coefficient per constraint slot.
    fn num_random_coefficients(&self) -> usize;

    fn num_periodic_columns(&self) -> usize;

    fn constraint_degree(&self) -> usize;

    /// Static contract with the commitment layer.
    fn composition_degree_bound(&self) -> usize {
        self.constraint_degree() * self.trace_length()
    }

    fn interaction_params(&self) -> InteractionParams;

    /// Resolves the layout's named integer parameters. Fixed layouts return
    /// an empty vector and reject unknown names.
    fn parse_dynamic_params(&self, params: &BTreeMap<String, u64>) -> Result<Vec<u64>>;

    /// Builds the layout's periodic columns from the trace-domain generator.
    fn build_periodic_columns(&self, trace_generator: &Felt) -> Result<Vec<PeriodicColumn>>;

    /// Exponents `k` for which `point^k` feeds a domain predicate.
    fn point_exponents(&self) -> Vec<u64>;

    /// Exponents of the trace generator appearing as domain shifts, in the
    /// order the `shifts` argument of [`Air::constraints_eval`] expects.
    fn domain_shift_exponents(&self) -> Vec<u64>;

    /// The fixed-order table of coset-type domain predicates.
    fn domain_descriptors(&self) -> &'static [DomainDescriptor];

    /// Generator powers for [`Air::constraints_eval`], derived once per
    /// composition instance.
    fn domain_shifts(&self, trace_generator: &Felt) -> Vec<Felt> {
        self.domain_shift_exponents()
            .iter()
            .map(|&e| trace_generator.pow([e]))
            .collect()
    }

    /// `point^k` for every exponent in [`Air::point_exponents`].
    fn point_powers(&self, point: &Felt) -> Vec<Felt> {
        self.point_exponents()
            .iter()
            .map(|&e| point.pow([e]))
            .collect()
    }

    /// Per-point domain predicate values, in descriptor order.
    fn domain_evals_at_point(&self, point_powers: &[Felt], shifts: &[Felt]) -> Vec<Felt> {
        assert_eq!(
            point_powers.len(),
            self.point_exponents().len(),
            "point power count"
        );
        self.domain_descriptors()
            .iter()
            .map(|d| {
                let shift = d.shift.map_or_else(Felt::one, |s| shifts[s]);
                point_powers[d.power] - shift
            })
            .collect()
    }

    /// Domain predicate values over the coset `{offset * gen^i}`, one vector
    /// per descriptor. Each vector holds one full cycle of the values (the
    /// value at coset index `i` is entry `i % len`); `point^k` repeats with
    /// the multiplicative order of `gen^k`, which this exploits.
    fn precompute_domain_evals_on_coset(
        &self,
        coset_offset: &Felt,
        coset_gen: &Felt,
        coset_size: usize,
        shifts: &[Felt],
    ) -> Vec<Vec<Felt>> {
        let exponents = self.point_exponents();
        // Cache per-exponent power cycles; several descriptors share one.
        let mut cycles: BTreeMap<u64, Vec<Felt>> = BTreeMap::new();
        for &k in &exponents {
            cycles.entry(k).or_insert_with(|| {
                let step = coset_gen.pow([k]);
                let mut powers = vec![coset_offset.pow([k])];
                let mut acc = powers[0] * step;
                while powers.len() < coset_size && acc != powers[0] {
                    powers.push(acc);
                    acc *= step;
                }
                powers
            });
        }
        self.domain_descriptors()
            .iter()
            .map(|d| {
                let shift = d.shift.map_or_else(Felt::one, |s| shifts[s]);
                cycles[&exponents[d.power]]
                    .iter()
                    .map(|p| *p - shift)
                    .collect()
            })
            .collect()
    }

    /// Aggregated constraint evaluation at one point.
    ///
    /// `neighbors`, `periodic`, `coefficients`, `shifts` and `domains` must
    /// have exactly the declared lengths; mismatches are caller bugs and
    /// abort.
    fn constraints_eval(
        &self,
        neighbors: &[Felt],
        periodic: &[Felt],
        coefficients: &[Felt],
        point: &Felt,
        shifts: &[Felt],
        domains: &[Felt],
    ) -> Fraction;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_accumulation() {
        // 1/2 + 3/4 = 5/4
        let mut f = Fraction::zero();
        f.add_quotient(Felt::from(1u64), Felt::from(2u64));
        f.add_quotient(Felt::from(3u64), Felt::from(4u64));
        use ark_ff::Field;
        let expected = Felt::from(5u64) * Felt::from(4u64).inverse().unwrap();
        assert_eq!(f.into_felt(), expected);
    }
}
