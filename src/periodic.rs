//! Periodic columns: trace-independent columns repeating with a fixed period.
//!
//! A periodic column stores its value table together with the interpolant
//! over the canonical radix-2 domain of the table size. The table spans
//! `row_period` trace rows; when the table is shorter than the period the
//! values sit on evenly strided rows and only those rows are constrained.

use ark_ff::Field;
use ark_poly::polynomial::univariate::DensePolynomial;
use ark_poly::{EvaluationDomain, Evaluations, Polynomial, Radix2EvaluationDomain};

use crate::felt::Felt;

#[derive(Clone, Debug)]
pub struct PeriodicColumn {
    values: Vec<Felt>,
    row_period: usize,
    interpolant: DensePolynomial<Felt>,
}

impl PeriodicColumn {
    /// Builds a column from its value table. `row_period` must be a multiple
    /// of the table length; both must be powers of two.
    pub fn new(values: Vec<Felt>, row_period: usize) -> Self {
        assert!(values.len().is_power_of_two(), "periodic table length");
        assert_eq!(row_period % values.len(), 0, "period not a multiple of table");
        let domain = Radix2EvaluationDomain::<Felt>::new(values.len())
            .expect("field lacks roots of unity for table size");
        let interpolant = Evaluations::from_vec_and_domain(values.clone(), domain).interpolate();
        Self {
            values,
            row_period,
            interpolant,
        }
    }

    pub fn values(&self) -> &[Felt] {
        &self.values
    }

    pub fn row_period(&self) -> usize {
        self.row_period
    }

    /// Row stride between consecutive table entries.
    pub fn stride(&self) -> usize {
        self.row_period / self.values.len()
    }

    /// Value on trace row `row` (don't-care rows between strides repeat the
    /// entry of their stride group).
    pub fn at_row(&self, row: usize) -> Felt {
        self.values[(row % self.row_period) / self.stride()]
    }

    /// Value at an out-of-domain point of a trace of length `trace_len`.
    pub fn eval_at(&self, point: &Felt, trace_len: usize) -> Felt {
        assert_eq!(trace_len % self.row_period, 0, "trace not a period multiple");
        let exp = (trace_len / self.row_period) as u64;
        self.interpolant.evaluate(&point.pow([exp]))
    }

    /// Degree of the interpolant, for composition degree accounting.
    pub fn degree(&self) -> usize {
        self.interpolant.degree()
    }
}
