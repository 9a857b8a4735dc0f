//! A register's liveness: a main [`LiveRange`] plus optional per-lane
//! subranges.
//!
//! The whole-register liveness lives in `main_range`; `subranges` only exist
//! for registers whose uses
//! disagree about which lanes they touch (sub-register reads/writes). The
//! invariant carried end to end by [`crate::live_intervals`] is that the
//! union of subrange liveness equals `main_range`'s liveness, and subrange
//! lane masks are pairwise disjoint and contained in the register's overall
//! lane mask.

use smallvec::SmallVec;

use crate::entities::{LaneBitmask, VirtReg};
use crate::live_range::{LiveRange, Segment, VNInfoId};
use crate::slot_index::SlotIndexes;

/// One disjoint-lane slice of a [`LiveInterval`]'s liveness.
#[derive(Clone, Debug)]
pub struct SubRange {
    /// The lanes this subrange tracks. Pairwise disjoint across a single
    /// interval's subrange list.
    pub lane_mask: LaneBitmask,
    pub range: LiveRange,
}

impl SubRange {
    pub fn new(lane_mask: LaneBitmask) -> Self {
        SubRange {
            lane_mask,
            range: LiveRange::new(),
        }
    }
}

/// The liveness of a single virtual register: a main range plus, for
/// registers with sub-register structure, a set of lane-disjoint subranges.
#[derive(Clone, Debug)]
pub struct LiveInterval {
    pub reg: VirtReg,
    /// Spill-cost heuristic, accumulated by the allocator from def/use
    /// frequency; this crate only stores and exposes it.
    pub weight: f32,
    main_range: LiveRange,
    subranges: SmallVec<[SubRange; 2]>,
}

impl LiveInterval {
    pub fn new(reg: VirtReg) -> Self {
        LiveInterval {
            reg,
            weight: 0.0,
            main_range: LiveRange::new(),
            subranges: SmallVec::new(),
        }
    }

    pub fn main_range(&self) -> &LiveRange {
        &self.main_range
    }

    pub fn main_range_mut(&mut self) -> &mut LiveRange {
        &mut self.main_range
    }

    pub fn subranges(&self) -> &[SubRange] {
        &self.subranges
    }

    pub fn has_subranges(&self) -> bool {
        !self.subranges.is_empty()
    }

    /// Create a new subrange tracking `lane_mask`, which must be disjoint
    /// from every existing subrange's mask.
    pub fn create_subrange(&mut self, lane_mask: LaneBitmask) -> &mut SubRange {
        debug_assert!(
            self.subranges.iter().all(|s| !s.lane_mask.intersects(lane_mask)),
            "subrange lane masks must be pairwise disjoint"
        );
        self.subranges.push(SubRange::new(lane_mask));
        self.subranges.last_mut().unwrap()
    }

    /// Remove subranges left empty by a dead-value sweep.
    pub fn remove_empty_subranges(&mut self) {
        self.subranges.retain(|s| !s.range.is_empty());
    }

    /// Compute the main range as the slot-wise union of the interval's
    /// subranges, synthesizing a fresh value number at each distinct def
    /// point.
    ///
    /// Requires `main_range` to be empty; this is meant to run once, after
    /// subranges have been fully built by per-lane dataflow.
    pub fn construct_main_range_from_subranges(&mut self, indexes: &SlotIndexes) {
        debug_assert!(self.main_range.is_empty(), "main range already constructed");
        if self.subranges.is_empty() {
            return;
        }

        // Collect every subrange segment, tag it with its source subrange's
        // def point (used to recognize "the same def" across lanes), and
        // merge by a stable sort on start order.
        struct Piece {
            start: crate::slot_index::SlotIndex,
            end: crate::slot_index::SlotIndex,
            def: crate::slot_index::SlotIndex,
        }
        let mut pieces: Vec<Piece> = Vec::new();
        for sub in &self.subranges {
            for seg in sub.range.segments() {
                pieces.push(Piece {
                    start: seg.start,
                    end: seg.end,
                    def: sub.range.value(seg.vn).def,
                });
            }
        }
        pieces.sort_by(|a, b| indexes.cmp_index(a.start, b.start));

        let mut vn_by_def: Vec<(crate::slot_index::SlotIndex, VNInfoId)> = Vec::new();
        for piece in pieces {
            let vn = match vn_by_def
                .iter()
                .find(|&&(def, _)| indexes.cmp_index(def, piece.def) == std::cmp::Ordering::Equal)
            {
                Some(&(_, vn)) => vn,
                None => {
                    let vn = self.main_range.alloc_value(piece.def);
                    vn_by_def.push((piece.def, vn));
                    vn
                }
            };
            self.main_range.add_segment(
                indexes,
                Segment {
                    start: piece.start,
                    end: piece.end,
                    vn,
                },
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{CgBasicBlock, CgFunction, CgInstruction, Operand};
    use crate::entities::{Block, InstIndex};

    struct FakeInst(Vec<Operand>);
    impl CgInstruction for FakeInst {
        fn operands(&self) -> &[Operand] {
            &self.0
        }
    }
    struct FakeBlock {
        number: Block,
        insts: Vec<InstIndex>,
    }
    impl CgBasicBlock for FakeBlock {
        fn number(&self) -> Block {
            self.number
        }
        fn instructions(&self) -> &[InstIndex] {
            &self.insts
        }
        fn successors(&self) -> &[Block] {
            &[]
        }
        fn predecessors(&self) -> &[Block] {
            &[]
        }
    }
    struct FakeFunction {
        blocks: Vec<Block>,
        block_data: Vec<FakeBlock>,
        inst_data: Vec<FakeInst>,
    }
    impl CgFunction for FakeFunction {
        fn blocks(&self) -> &[Block] {
            &self.blocks
        }
        fn block_data(&self, block: Block) -> &dyn CgBasicBlock {
            &self.block_data[block.as_u32() as usize]
        }
        fn instruction_data(&self, inst: InstIndex) -> &dyn CgInstruction {
            &self.inst_data[inst.as_u32() as usize]
        }
    }

    fn two_inst_indexes() -> SlotIndexes {
        let func = FakeFunction {
            blocks: vec![Block::new(0)],
            block_data: vec![FakeBlock {
                number: Block::new(0),
                insts: vec![InstIndex::new(0), InstIndex::new(1)],
            }],
            inst_data: vec![FakeInst(vec![]), FakeInst(vec![])],
        };
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);
        indexes
    }

    #[test]
    fn create_subrange_rejects_overlapping_masks() {
        let _ = env_logger::try_init();
        let mut li = LiveInterval::new(VirtReg::new(0));
        li.create_subrange(LaneBitmask(0b0011));
        assert_eq!(li.subranges().len(), 1);
    }

    #[test]
    fn construct_main_range_unions_disjoint_subranges() {
        let _ = env_logger::try_init();
        let indexes = two_inst_indexes();
        let i0 = indexes.get_instruction_index(InstIndex::new(0)).unwrap();
        let i1 = indexes.get_instruction_index(InstIndex::new(1)).unwrap();

        let mut li = LiveInterval::new(VirtReg::new(0));
        {
            let sub = li.create_subrange(LaneBitmask(0b01));
            let vn = sub.range.alloc_value(i0.reg_slot());
            sub.range.add_segment(
                &indexes,
                Segment {
                    start: i0.reg_slot(),
                    end: i1.reg_slot(),
                    vn,
                },
            );
        }
        {
            let sub = li.create_subrange(LaneBitmask(0b10));
            let vn = sub.range.alloc_value(i0.reg_slot());
            sub.range.add_segment(
                &indexes,
                Segment {
                    start: i0.reg_slot(),
                    end: i1.reg_slot(),
                    vn,
                },
            );
        }

        li.construct_main_range_from_subranges(&indexes);
        assert_eq!(li.main_range().segments().len(), 1);
        assert!(indexes.le(li.main_range().segments()[0].start, i0.reg_slot()));
        assert!(indexes.le(i1.reg_slot(), li.main_range().segments()[0].end));
    }
}
