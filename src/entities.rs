//! Dense, type-safe identifiers shared across the analysis stack.
//!
//! These mirror the role `cranelift_entity::entity_impl!`-generated types
//! (`Inst`, `Value`, `Block`) play in a real IR: a newtype over `u32` that
//! can key a `PrimaryMap`/`SecondaryMap` without risking mixing up, say, a
//! block number with a virtual register number.

use cranelift_entity::entity_impl;

/// A basic block number, assigned by the client CFG in layout order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Block(u32);
entity_impl!(Block, "block");

/// A dense per-function instruction number assigned by the client CFG.
///
/// Distinct from [`crate::slot_index::SlotIndex`]: this is the client's own
/// instruction numbering, used only to look instructions up in collaborator
/// traits; `SlotIndex` is the numbering this crate owns and maintains.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct InstIndex(u32);
entity_impl!(InstIndex, "inst");

/// A virtual register number.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct VirtReg(u32);
entity_impl!(VirtReg, "vreg");

/// A physical register-unit number (the atomic aliasing unit of the target's
/// register file).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RegUnit(u32);
entity_impl!(RegUnit, "unit");

/// An edge-bundle identifier, as produced by the client's edge-bundles
/// analysis.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Bundle(u32);
entity_impl!(Bundle, "bundle");

/// A lane sub-register mask: one bit per disjoint lane of a register class.
///
/// Kept as a plain `u64` bitset newtype rather than a generic bitvector,
/// following `cranelift_codegen::isa::registers::RegUnitMask`'s precedent of
/// small fixed-width bitsets for register-adjacent masks.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug, Hash)]
pub struct LaneBitmask(pub u64);

impl LaneBitmask {
    /// The mask covering no lanes.
    pub const NONE: Self = Self(0);
    /// The mask covering every lane (used when a register has no sub-lane
    /// structure, i.e. the main range itself).
    pub const ALL: Self = Self(!0);

    /// Does this mask select any lane at all?
    pub fn any(self) -> bool {
        self.0 != 0
    }

    /// Do `self` and `other` share any lane?
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    /// Is `self` fully contained in `other`?
    pub fn is_subset_of(self, other: Self) -> bool {
        (self.0 & !other.0) == 0
    }
}

impl std::ops::BitOr for LaneBitmask {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitAnd for LaneBitmask {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl std::ops::BitOrAssign for LaneBitmask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}
