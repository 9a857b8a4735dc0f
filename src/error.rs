//! Error types for the pass-level entry points.
//!
//! Per-value and per-segment helpers deep inside [`crate::live_intervals`] and
//! [`crate::slot_index`] treat their preconditions as programmer errors and
//! assert instead of returning `Result`. The few genuinely recoverable,
//! data-dependent conditions are surfaced here.
//!
//! This is implemented by hand instead of with `thiserror`, the same
//! trade-off `cranelift_codegen::isa::LookupError` makes, to keep the
//! dependency footprint small for a handful of variants.

use core::fmt;

use crate::entities::InstIndex;

/// Failure of a pass-level entry point.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AllocationError {
    /// An instruction was queried for its [`crate::slot_index::SlotIndex`]
    /// but was never indexed (or was removed from the maps).
    UnindexedInstruction(InstIndex),
}

impl fmt::Display for AllocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocationError::UnindexedInstruction(inst) => {
                write!(f, "instruction {inst} has no slot index")
            }
        }
    }
}

impl std::error::Error for AllocationError {}

/// Convenience alias for pass-level entry points.
pub type Result<T> = core::result::Result<T, AllocationError>;
