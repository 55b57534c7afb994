//! The neighbor table of the recursive layout.
//!
//! 133 (column, row offset) pairs, grouped by column with increasing offsets.
//! The order is part of the proof format: evaluators receive neighbor values
//! in exactly this order, and the trace committer opens exactly these cells.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::air::Mask;

use super::NUM_NEIGHBORS;

pub const MASK: [Mask; NUM_NEIGHBORS] = [
    // Column 0: instruction flag suffixes, one full cycle.
    Mask::new(0, 0),
    Mask::new(0, 1),
    Mask::new(0, 2),
    Mask::new(0, 3),
    Mask::new(0, 4),
    Mask::new(0, 5),
    Mask::new(0, 6),
    Mask::new(0, 7),
    Mask::new(0, 8),
    Mask::new(0, 9),
    Mask::new(0, 10),
    Mask::new(0, 11),
    Mask::new(0, 12),
    Mask::new(0, 13),
    Mask::new(0, 14),
    Mask::new(0, 15),
    // Column 1: diluted pool; bitwise chunk cells at even offsets, shifted
    // top-chunk results at offsets 1 + 32k.
    Mask::new(1, 0),
    Mask::new(1, 1),
    Mask::new(1, 2),
    Mask::new(1, 4),
    Mask::new(1, 6),
    Mask::new(1, 8),
    Mask::new(1, 10),
    Mask::new(1, 12),
    Mask::new(1, 14),
    Mask::new(1, 16),
    Mask::new(1, 18),
    Mask::new(1, 20),
    Mask::new(1, 22),
    Mask::new(1, 24),
    Mask::new(1, 26),
    Mask::new(1, 28),
    Mask::new(1, 30),
    Mask::new(1, 32),
    Mask::new(1, 33),
    Mask::new(1, 64),
    Mask::new(1, 65),
    Mask::new(1, 88),
    Mask::new(1, 90),
    Mask::new(1, 92),
    Mask::new(1, 94),
    Mask::new(1, 96),
    Mask::new(1, 97),
    Mask::new(1, 120),
    Mask::new(1, 122),
    Mask::new(1, 124),
    Mask::new(1, 126),
    // Column 2: sorted diluted pool.
    Mask::new(2, 0),
    Mask::new(2, 1),
    // Column 3: memory pool (addresses on even offsets, values on odd).
    Mask::new(3, 0),
    Mask::new(3, 1),
    Mask::new(3, 2),
    Mask::new(3, 3),
    Mask::new(3, 4),
    Mask::new(3, 5),
    Mask::new(3, 8),
    Mask::new(3, 9),
    Mask::new(3, 10),
    Mask::new(3, 11),
    Mask::new(3, 12),
    Mask::new(3, 13),
    Mask::new(3, 16),
    Mask::new(3, 26),
    Mask::new(3, 27),
    Mask::new(3, 42),
    Mask::new(3, 43),
    Mask::new(3, 58),
    Mask::new(3, 74),
    Mask::new(3, 75),
    Mask::new(3, 91),
    Mask::new(3, 122),
    Mask::new(3, 123),
    Mask::new(3, 154),
    Mask::new(3, 202),
    Mask::new(3, 522),
    Mask::new(3, 523),
    Mask::new(3, 1034),
    Mask::new(3, 1035),
    Mask::new(3, 2058),
    // Column 4: address-sorted memory pairs.
    Mask::new(4, 0),
    Mask::new(4, 1),
    Mask::new(4, 2),
    Mask::new(4, 3),
    // Column 5: 16-bit offset pool, sorted range-check values, Pedersen
    // partial sums (x at 4k+1, y at 4k+3), range-check builtin parts.
    Mask::new(5, 0),
    Mask::new(5, 1),
    Mask::new(5, 2),
    Mask::new(5, 3),
    Mask::new(5, 4),
    Mask::new(5, 5),
    Mask::new(5, 6),
    Mask::new(5, 7),
    Mask::new(5, 8),
    Mask::new(5, 12),
    Mask::new(5, 28),
    Mask::new(5, 44),
    Mask::new(5, 60),
    Mask::new(5, 76),
    Mask::new(5, 92),
    Mask::new(5, 108),
    Mask::new(5, 124),
    Mask::new(5, 1021),
    Mask::new(5, 1023),
    Mask::new(5, 1025),
    Mask::new(5, 1027),
    Mask::new(5, 2045),
    // Column 6: Pedersen suffixes (4k) and slopes (4k+2), CPU scratch cells
    // on odd offsets, bit-unpacking helper cells at 7 and 1022.
    Mask::new(6, 0),
    Mask::new(6, 1),
    Mask::new(6, 2),
    Mask::new(6, 3),
    Mask::new(6, 4),
    Mask::new(6, 5),
    Mask::new(6, 7),
    Mask::new(6, 9),
    Mask::new(6, 11),
    Mask::new(6, 13),
    Mask::new(6, 17),
    Mask::new(6, 25),
    Mask::new(6, 768),
    Mask::new(6, 772),
    Mask::new(6, 784),
    Mask::new(6, 788),
    Mask::new(6, 1004),
    Mask::new(6, 1008),
    Mask::new(6, 1022),
    Mask::new(6, 1024),
    // Column 7 (interaction): diluted cumulative aggregate.
    Mask::new(7, 0),
    Mask::new(7, 1),
    // Column 8 (interaction): diluted permutation product.
    Mask::new(8, 0),
    Mask::new(8, 1),
    // Column 9 (interaction): memory permutation (2k), range-check
    // permutation (4k+1).
    Mask::new(9, 0),
    Mask::new(9, 1),
    Mask::new(9, 2),
    Mask::new(9, 5),
];

static INDEX: Lazy<HashMap<(usize, usize), usize>> = Lazy::new(|| {
    MASK.iter()
        .enumerate()
        .map(|(i, m)| ((m.column, m.offset), i))
        .collect()
});

/// Position of a neighbor in the mask order. Referencing a cell the mask
/// does not declare is a constraint-authoring bug.
#[inline]
pub fn index_of(column: usize, offset: usize) -> usize {
    *INDEX
        .get(&(column, offset))
        .unwrap_or_else(|| panic!("cell ({column}, {offset}) is not in the mask"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_size() {
        assert_eq!(MASK.len(), NUM_NEIGHBORS);
    }

    #[test]
    fn test_mask_grouped_and_strictly_increasing() {
        for pair in MASK.windows(2) {
            assert!(
                pair[0].column < pair[1].column
                    || (pair[0].column == pair[1].column && pair[0].offset < pair[1].offset),
                "mask order broken at {:?} -> {:?}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_index_roundtrip() {
        for (i, m) in MASK.iter().enumerate() {
            assert_eq!(index_of(m.column, m.offset), i);
        }
    }

    #[test]
    #[should_panic(expected = "not in the mask")]
    fn test_undeclared_cell_panics() {
        index_of(3, 6);
    }
}
