//! Interaction (second round) challenge storage.
//!
//! The verifier samples six field elements after the first trace commitment.
//! They parameterize the permutation and diluted-check constraints and may be
//! assigned exactly once; the store makes the ordering an explicit phase
//! instead of an uninitialized-value convention.

use once_cell::sync::OnceCell;

use crate::error::{AirError, Result};
use crate::felt::Felt;

/// The six verifier challenges, in commitment order.
#[derive(Clone, Copy, Debug)]
pub struct InteractionElements {
    /// z of the memory multi-column permutation.
    pub memory_perm_elm: Felt,
    /// alpha combining (address, value) pairs in the memory permutation.
    pub memory_hash_elm: Felt,
    /// z of the 16-bit range check permutation.
    pub range_check16_perm_elm: Felt,
    /// z of the diluted pool permutation.
    pub diluted_perm_elm: Felt,
    /// z of the diluted cumulative aggregation.
    pub diluted_interaction_z: Felt,
    /// alpha of the diluted cumulative aggregation.
    pub diluted_interaction_alpha: Felt,
}

impl InteractionElements {
    pub const COUNT: usize = 6;

    /// Builds the struct from a commitment-ordered slice.
    pub fn from_slice(elements: &[Felt]) -> Self {
        assert_eq!(elements.len(), Self::COUNT, "interaction element count");
        Self {
            memory_perm_elm: elements[0],
            memory_hash_elm: elements[1],
            range_check16_perm_elm: elements[2],
            diluted_perm_elm: elements[3],
            diluted_interaction_z: elements[4],
            diluted_interaction_alpha: elements[5],
        }
    }
}

/// Challenges plus the terminal values derived from them once they are known.
#[derive(Clone, Copy, Debug)]
pub struct InteractionState {
    pub elements: InteractionElements,
    /// Expected final value of the memory permutation column. Depends on the
    /// public memory, which lives outside this layer, so the driver supplies
    /// it together with the challenges.
    pub public_memory_prod: Felt,
    /// Expected final value of the diluted cumulative column; derived from
    /// the two diluted challenges alone.
    pub diluted_final_cum_val: Felt,
}

/// Set-once container for the interaction state.
#[derive(Debug, Default)]
pub struct InteractionStore {
    state: OnceCell<InteractionState>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, state: InteractionState) -> Result<()> {
        self.state
            .set(state)
            .map_err(|_| AirError::InteractionAlreadySet)
    }

    pub fn is_set(&self) -> bool {
        self.state.get().is_some()
    }

    /// Panics if the first commitment round has not supplied the challenges
    /// yet; evaluating interaction constraints before that is a driver bug.
    pub fn get(&self) -> &InteractionState {
        self.state
            .get()
            .expect("interaction elements must be set before evaluation")
    }
}
