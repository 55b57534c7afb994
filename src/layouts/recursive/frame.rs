//! Mask-ordered neighbor view.

use crate::felt::Felt;

use super::mask;

/// Neighbor values at one evaluation point, in mask order.
///
/// Constraint code addresses cells by (column, offset); the frame resolves
/// that to the mask position once per access.
#[derive(Clone, Copy)]
pub(crate) struct Frame<'a> {
    values: &'a [Felt],
}

impl<'a> Frame<'a> {
    pub fn new(values: &'a [Felt]) -> Self {
        assert_eq!(
            values.len(),
            super::NUM_NEIGHBORS,
            "neighbor vector length mismatch"
        );
        Self { values }
    }

    #[inline]
    pub fn nbr(&self, column: usize, offset: usize) -> Felt {
        self.values[mask::index_of(column, offset)]
    }

    /// Decoded instruction flag `i` of the cycle starting at the evaluation
    /// point: the difference of adjacent flag-suffix cells.
    #[inline]
    pub fn flag_bit(&self, i: usize) -> Felt {
        debug_assert!(i < 15);
        self.nbr(0, i) - (self.nbr(0, i + 1) + self.nbr(0, i + 1))
    }

    /// Suffix of the Pedersen bit decomposition at subset position `pos`.
    #[inline]
    pub fn pedersen_suffix(&self, pos: usize) -> Felt {
        self.nbr(6, pos * 4)
    }

    /// Bit consumed at subset position `pos`.
    #[inline]
    pub fn pedersen_bit(&self, pos: usize) -> Felt {
        self.pedersen_suffix(pos) - (self.pedersen_suffix(pos + 1) + self.pedersen_suffix(pos + 1))
    }

    /// Pedersen partial-sum coordinates at subset position `pos`.
    #[inline]
    pub fn pedersen_partial_x(&self, pos: usize) -> Felt {
        self.nbr(5, pos * 4 + 1)
    }

    #[inline]
    pub fn pedersen_partial_y(&self, pos: usize) -> Felt {
        self.nbr(5, pos * 4 + 3)
    }
}
