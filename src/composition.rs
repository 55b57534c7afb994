//! Composition polynomial assembly.
//!
//! Binds an evaluator to the trace generator and the verifier's random
//! coefficients, and evaluates the aggregated constraint quotient at single
//! points or over cosets. Neighbor values come from an oracle owned by the
//! commitment layer (the low-degree extension of the committed trace); this
//! module never touches trace data itself.

use ark_ff::Zero;

use crate::air::Air;
use crate::error::{AirError, Result};
use crate::felt::Felt;
use crate::periodic::PeriodicColumn;

/// Source of neighbor values, implemented by the commitment layer over the
/// trace LDE.
pub trait TraceOracle {
    /// Values of every mask cell at `point`, in mask order: entry i is
    /// column `mask[i].column` of the trace polynomial evaluated at
    /// `point * g^mask[i].offset`.
    fn mask_values(&self, point: &Felt) -> Vec<Felt>;
}

/// The aggregated constraint polynomial of one proof instance.
pub struct CompositionPolynomial<'a, A: Air> {
    air: &'a A,
    coefficients: Vec<Felt>,
    shifts: Vec<Felt>,
    periodic: Vec<PeriodicColumn>,
}

impl<'a, A: Air> CompositionPolynomial<'a, A> {
    pub fn new(air: &'a A, trace_generator: &Felt, coefficients: Vec<Felt>) -> Result<Self> {
        if coefficients.len() != air.num_random_coefficients() {
            return Err(AirError::InvalidConfig(format!(
                "expected {} random coefficients, got {}",
                air.num_random_coefficients(),
                coefficients.len()
            )));
        }
        let periodic = air.build_periodic_columns(trace_generator)?;
        log::debug!(
            "composition polynomial: {} constraints, degree bound {}",
            air.num_random_coefficients(),
            air.composition_degree_bound()
        );
        Ok(Self {
            air,
            coefficients,
            shifts: air.domain_shifts(trace_generator),
            periodic,
        })
    }

    pub fn degree_bound(&self) -> usize {
        self.air.composition_degree_bound()
    }

    fn periodic_values(&self, point: &Felt) -> Vec<Felt> {
        self.periodic
            .iter()
            .map(|p| p.eval_at(point, self.air.trace_length()))
            .collect()
    }

    /// Evaluates the composition at one out-of-domain point.
    pub fn eval_at_point(&self, point: &Felt, oracle: &dyn TraceOracle) -> Felt {
        let neighbors = oracle.mask_values(point);
        let point_powers = self.air.point_powers(point);
        let domains = self.air.domain_evals_at_point(&point_powers, &self.shifts);
        self.air
            .constraints_eval(
                &neighbors,
                &self.periodic_values(point),
                &self.coefficients,
                point,
                &self.shifts,
                &domains,
            )
            .into_felt()
    }

    /// Evaluates the composition on the coset `{offset * gen^i}`, reusing
    /// the cyclic structure of the domain values. Results equal
    /// `eval_at_point` on every coset element.
    pub fn eval_on_coset(
        &self,
        coset_offset: &Felt,
        coset_gen: &Felt,
        coset_size: usize,
        oracle: &dyn TraceOracle,
    ) -> Vec<Felt> {
        let precomputed = self.air.precompute_domain_evals_on_coset(
            coset_offset,
            coset_gen,
            coset_size,
            &self.shifts,
        );
        let mut out = Vec::with_capacity(coset_size);
        let mut point = *coset_offset;
        let mut domains = vec![Felt::zero(); precomputed.len()];
        for i in 0..coset_size {
            for (d, cycle) in domains.iter_mut().zip(&precomputed) {
                *d = cycle[i % cycle.len()];
            }
            let neighbors = oracle.mask_values(&point);
            out.push(
                self.air
                    .constraints_eval(
                        &neighbors,
                        &self.periodic_values(&point),
                        &self.coefficients,
                        &point,
                        &self.shifts,
                        &domains,
                    )
                    .into_felt(),
            );
            point *= coset_gen;
        }
        out
    }
}
