//! Memory segment addressing.
//!
//! The runner hands the prover a map from segment name to its address range.
//! Each enabled builtin claims one segment; resolution of a missing segment
//! is a construction-time configuration error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AirError, Result};

/// Address range of one memory segment, as reported by the runner.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentRange {
    pub begin_addr: u64,
    pub stop_ptr: u64,
}

/// Segment name -> address range.
pub type MemorySegmentMap = BTreeMap<String, SegmentRange>;

/// Looks up a segment required by the layout.
pub fn require_segment(map: &MemorySegmentMap, name: &str) -> Result<SegmentRange> {
    map.get(name)
        .copied()
        .ok_or_else(|| AirError::SegmentNotFound(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_segment() {
        let mut map = MemorySegmentMap::new();
        map.insert(
            "program".to_string(),
            SegmentRange {
                begin_addr: 1,
                stop_ptr: 5,
            },
        );
        assert_eq!(require_segment(&map, "program").unwrap().begin_addr, 1);
        assert!(matches!(
            require_segment(&map, "pedersen"),
            Err(AirError::SegmentNotFound(_))
        ));
    }
}
