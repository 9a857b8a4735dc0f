//! Slot-indexed live-interval analysis and Hopfield-network spill placement.
//!
//! This crate is the liveness layer of a machine-level register allocator:
//! given a client's control-flow graph and instruction operands, it builds a
//! dense, renumberable instruction ordering ([`slot_index`]), computes
//! per-virtual-register and per-register-unit live ranges
//! ([`live_range`], [`live_interval`], [`live_intervals`]), and places
//! spills across pre-computed edge bundles by relaxing a small Hopfield
//! network ([`spill_placement`]). It does not choose a CFG, a target
//! register file, or an edge-bundle partition itself; those are supplied by
//! the host allocator through the collaborator traits in [`cfg`].

pub mod cfg;
pub mod entities;
pub mod error;
pub mod live_interval;
pub mod live_intervals;
pub mod live_range;
pub mod slot_index;
pub mod spill_placement;
pub mod timing;

pub use entities::{Block, Bundle, InstIndex, LaneBitmask, RegUnit, VirtReg};
pub use error::{AllocationError, Result};
