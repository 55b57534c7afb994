//! Trace-side data types: the column-major value table filled by the
//! external trace generator, constraint-violation reports, and the named
//! cell aliases the generator consumes.

use std::collections::BTreeMap;

use ark_ff::Zero;
use serde::{Deserialize, Serialize};

use crate::felt::Felt;

/// Column-major table of field values. Written once by trace generation,
/// read through mask lookups afterwards.
#[derive(Clone, Debug)]
pub struct TraceTable {
    columns: Vec<Vec<Felt>>,
    length: usize,
}

impl TraceTable {
    /// Zero-initialized table.
    pub fn new(num_columns: usize, length: usize) -> Self {
        assert!(length.is_power_of_two(), "trace length must be a power of two");
        Self {
            columns: vec![vec![Felt::zero(); length]; num_columns],
            length,
        }
    }

    pub fn from_columns(columns: Vec<Vec<Felt>>) -> Self {
        let length = columns.first().map_or(0, Vec::len);
        assert!(length.is_power_of_two(), "trace length must be a power of two");
        assert!(
            columns.iter().all(|c| c.len() == length),
            "ragged trace columns"
        );
        Self { columns, length }
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn length(&self) -> usize {
        self.length
    }

    #[inline]
    pub fn get(&self, column: usize, row: usize) -> Felt {
        self.columns[column][row]
    }

    #[inline]
    pub fn set(&mut self, column: usize, row: usize, value: Felt) {
        self.columns[column][row] = value;
    }

    pub fn column(&self, column: usize) -> &[Felt] {
        &self.columns[column]
    }
}

/// One violated constraint instance found by the trace checker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Violation {
    pub slot: usize,
    pub row: usize,
}

/// A strided set of trace cells: rows `offset + k * step` of one column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VirtualCell {
    pub column: usize,
    pub step: usize,
    pub offset: usize,
}

impl VirtualCell {
    pub const fn new(column: usize, step: usize, offset: usize) -> Self {
        Self {
            column,
            step,
            offset,
        }
    }

    /// Trace row of the k-th instance of this cell.
    pub fn row(&self, k: usize) -> usize {
        self.offset + k * self.step
    }
}

/// Named cell aliases handed to the trace-generation component.
#[derive(Clone, Debug, Default)]
pub struct TraceContext {
    cells: BTreeMap<&'static str, VirtualCell>,
}

impl TraceContext {
    pub fn new(entries: Vec<(&'static str, VirtualCell)>) -> Self {
        let cells: BTreeMap<_, _> = entries.into_iter().collect();
        Self { cells }
    }

    pub fn get(&self, name: &str) -> Option<VirtualCell> {
        self.cells.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
