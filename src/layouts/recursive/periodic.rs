//! Periodic point tables for the Pedersen builtin.
//!
//! Entry k of the table is the curve point the subset sum may add at
//! position k of a hash half: doublings of P1 for the first 248 bits of the
//! first input, of P2 for its top four bits, then P3/P4 for the second
//! input. The four tail entries of each half repeat the last point; the
//! walk never adds them since the suffix is already zero there.

use crate::curve::PedersenHashContext;
use crate::felt::Felt;

use super::PEDERSEN_BUILTIN_ROW_RATIO;

/// Table length: one entry per subset position of a full instance.
pub(super) const TABLE_SIZE: usize = 512;

pub(super) fn build_tables(ctx: &PedersenHashContext) -> (Vec<Felt>, Vec<Felt>) {
    let mut xs = Vec::with_capacity(TABLE_SIZE);
    let mut ys = Vec::with_capacity(TABLE_SIZE);
    for half in 0..2 {
        for (count, mut point) in [
            (248, ctx.points[2 * half]),
            (4, ctx.points[2 * half + 1]),
        ] {
            for i in 0..count {
                xs.push(point.x);
                ys.push(point.y);
                if i + 1 < count {
                    point = point.double();
                }
            }
            // pad the half to 256 positions with the final point
            if count == 4 {
                for _ in 0..4 {
                    xs.push(point.x);
                    ys.push(point.y);
                }
            }
        }
    }
    debug_assert_eq!(xs.len(), TABLE_SIZE);
    debug_assert_eq!(ys.len(), TABLE_SIZE);
    (xs, ys)
}

/// Trace rows covered by one table cycle.
pub(super) const ROW_PERIOD: usize = PEDERSEN_BUILTIN_ROW_RATIO;
