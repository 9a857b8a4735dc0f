//! Collaborator interfaces.
//!
//! Everything in this module is a *consumer* trait: the analyses in this
//! crate only ever read through these, never own or construct a CFG, target
//! description, or frequency analysis themselves. A host compiler implements
//! these traits over its own IR; the fixtures in each module's
//! `#[cfg(test)]` block implement them over toy in-memory structures.

use smallvec::SmallVec;

use crate::entities::{Block, InstIndex, LaneBitmask, RegUnit, VirtReg};

/// Either a virtual register or a physical register unit, as named by an
/// instruction operand.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandReg {
    /// A virtual register awaiting allocation.
    Virt(VirtReg),
    /// A physical register, already assigned (e.g. by an ABI constraint or a
    /// prior allocation pass).
    Phys(u32),
}

/// A single operand of a [`CgInstruction`].
///
/// Carries the fields a register allocator's operand model needs:
/// `{reg, isDef, isUse, isEarlyClobber, subregIndex, isRegMask, maskPointer}`.
#[derive(Clone, Debug)]
pub struct Operand {
    /// The register this operand names, or `None` for a pure register-mask
    /// operand.
    pub reg: Option<OperandReg>,
    /// Whether this operand defines `reg`.
    pub is_def: bool,
    /// Whether this operand uses `reg`'s incoming value.
    pub is_use: bool,
    /// Whether this operand is an early-clobber def (interferes with the
    /// instruction's own uses).
    pub is_early_clobber: bool,
    /// Whether this use/def only touches `reg`'s `subreg` lanes.
    pub subreg: LaneBitmask,
    /// A register-mask operand clears every phys-reg bit *not* set in the
    /// mask (typical of calls). `Some` iff this operand is a register mask.
    pub reg_mask: Option<&'static [u32]>,
}

impl Operand {
    /// A plain virtual-register def with no sub-register restriction.
    pub fn def(reg: VirtReg) -> Self {
        Operand {
            reg: Some(OperandReg::Virt(reg)),
            is_def: true,
            is_use: false,
            is_early_clobber: false,
            subreg: LaneBitmask::ALL,
            reg_mask: None,
        }
    }

    /// A plain virtual-register use with no sub-register restriction.
    pub fn use_(reg: VirtReg) -> Self {
        Operand {
            reg: Some(OperandReg::Virt(reg)),
            is_def: false,
            is_use: true,
            is_early_clobber: false,
            subreg: LaneBitmask::ALL,
            reg_mask: None,
        }
    }

    /// A register-mask operand (e.g. the clobber list of a call).
    pub fn reg_mask(mask: &'static [u32]) -> Self {
        Operand {
            reg: None,
            is_def: false,
            is_use: false,
            is_early_clobber: false,
            subreg: LaneBitmask::NONE,
            reg_mask: Some(mask),
        }
    }
}

/// A single machine instruction, as the client represents it.
pub trait CgInstruction {
    /// The operands of this instruction, in the client's own order.
    fn operands(&self) -> &[Operand];
}

/// A basic block, as the client represents it.
pub trait CgBasicBlock {
    /// This block's number.
    fn number(&self) -> Block;
    /// The instructions of this block in layout order.
    fn instructions(&self) -> &[InstIndex];
    /// CFG successors, in the client's own order.
    fn successors(&self) -> &[Block];
    /// CFG predecessors, in the client's own order.
    fn predecessors(&self) -> &[Block];
}

/// A whole function, as the client represents it.
pub trait CgFunction {
    /// Blocks in layout order.
    fn blocks(&self) -> &[Block];
    /// Look up a block's data.
    fn block_data(&self, block: Block) -> &dyn CgBasicBlock;
    /// Look up an instruction's data.
    fn instruction_data(&self, inst: InstIndex) -> &dyn CgInstruction;
    /// Total number of blocks.
    fn num_blocks(&self) -> usize {
        self.blocks().len()
    }
}

/// Target register-file queries.
///
/// Deliberately narrow: register classes, encodings, and instruction info
/// are the host's concern. This crate only needs register-unit aliasing and
/// lane masks.
pub trait TargetRegInfo {
    /// The register units a physical register aliases.
    fn reg_units(&self, phys: u32) -> SmallVec<[RegUnit; 4]>;
    /// The lane mask covered by a register class, used to size subranges.
    fn lane_mask_for_class(&self, reg_class: u32) -> LaneBitmask;
    /// Number of `u32` words in a register-mask operand.
    fn reg_mask_words(&self) -> usize;
}

/// A saturating frequency counter, expressed relative to the function's
/// entry block.
///
/// Represented concretely (rather than as an opaque collaborator-owned type)
/// because the spill-placement formulas do arithmetic on it directly
/// (`biasN = saturated maximum`, `entryFreq >> 13`, and so on).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct BlockFrequency(pub u64);

impl BlockFrequency {
    /// The maximum representable frequency, used for `MustSpill` saturation.
    pub const MAX: Self = Self(u64::MAX);
    /// The zero frequency.
    pub const ZERO: Self = Self(0);

    /// Saturating addition.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating scalar multiplication.
    pub fn saturating_mul(self, scalar: u64) -> Self {
        Self(self.0.saturating_mul(scalar))
    }
}

impl std::ops::Add for BlockFrequency {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.saturating_add(rhs)
    }
}

impl std::ops::AddAssign for BlockFrequency {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::fmt::Display for BlockFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-block execution-frequency oracle; this crate only reads it, never
/// computes it.
pub trait BlockFrequencyInfo {
    /// Estimated execution frequency of `block`.
    fn block_freq(&self, block: Block) -> BlockFrequency;
    /// Estimated execution frequency of the function's entry block.
    fn entry_freq(&self) -> BlockFrequency;
}

/// Edge-bundles oracle; this crate only reads it, never computes it.
pub trait EdgeBundles {
    /// Total number of bundles.
    fn num_bundles(&self) -> u32;
    /// The bundle a block's in-side (`out = false`) or out-side
    /// (`out = true`) belongs to.
    fn bundle(&self, block: Block, out: bool) -> crate::entities::Bundle;
    /// The blocks belonging to a bundle.
    fn blocks(&self, bundle: crate::entities::Bundle) -> &[Block];
}

/// Loop-containment oracle; this crate only reads it, never computes it.
pub trait LoopInfo {
    /// Is `block` inside any loop?
    fn is_in_loop(&self, block: Block) -> bool;
    /// Loop nesting depth of `block` (0 if not in a loop).
    fn loop_depth(&self, block: Block) -> u32;
}

/// Branch-probability oracle. Nothing in this crate's core calls this
/// itself, but it's part of the ambient collaborator surface a host
/// allocator built on top of this crate will want.
pub trait EdgeProbabilityInfo {
    /// Probability of the `from -> to` edge being taken, in `[0.0, 1.0]`.
    fn edge_probability(&self, from: Block, to: Block) -> f32;
    /// Whether the `from -> to` edge is considered "hot".
    fn is_edge_hot(&self, from: Block, to: Block) -> bool;
}
