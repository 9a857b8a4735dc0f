//! Segmented live ranges and value numbers.
//!
//! A [`LiveRange`] is the common machinery shared by per-virtual-register and
//! per-register-unit liveness: a sorted, non-overlapping run of half-open
//! [`Segment`]s, each tagged with the [`VNInfo`] of the value it carries.
//! [`crate::live_interval::LiveInterval`] wraps one of these with a register
//! identity, a spill weight, and optional subranges; [`crate::live_intervals`]
//! owns the dataflow that builds and edits them.
//!
//! VNInfos are owned by the range that defines them and referenced from
//! segments by [`VNInfoId`], not by pointer, so moving or splitting a range's
//! segments never has to chase or fix up external references (design note
//! "Self-referential LiveRange/VNInfo").
//!
//! Every method here that orders two `SlotIndex`es takes a `&SlotIndexes`:
//! `SlotIndex` deliberately has no free `Ord` impl (see `slot_index`'s module
//! docs), since an entry's position can be rewritten by renumbering.

use smallvec::SmallVec;

use crate::slot_index::{SlotIndex, SlotIndexes};

/// Index of a [`VNInfo`] within its owning [`LiveRange`]'s value-number
/// table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct VNInfoId(pub u32);

/// The identity of a single definition.
///
/// Every use reached (without crossing another def) by a particular
/// definition shares that definition's `VNInfo`.
#[derive(Clone, Copy, Debug)]
pub struct VNInfo {
    /// The point at which this value is defined. For ordinary defs this is
    /// the defining instruction's register slot; for PHI-defs synthesized at
    /// a control-flow join, it is that block's start (block-boundary) slot.
    pub def: SlotIndex,
    /// Is this value defined by a PHI (a join of multiple incoming values)
    /// rather than by a single instruction?
    pub is_phi_def: bool,
    /// Has this value been proven unused by a dead-value sweep
    /// (`shrink_to_uses`)? Marking rather than removing keeps `VNInfoId`s
    /// stable while a caller iterates.
    pub is_unused: bool,
}

impl VNInfo {
    fn new(def: SlotIndex) -> Self {
        VNInfo {
            def,
            is_phi_def: false,
            is_unused: false,
        }
    }
}

/// A maximal half-open range `[start, end)` over slot indices during which a
/// single value (`vn`) is live.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
    pub start: SlotIndex,
    pub end: SlotIndex,
    pub vn: VNInfoId,
}

impl Segment {
    fn contains(&self, indexes: &SlotIndexes, point: SlotIndex) -> bool {
        indexes.le(self.start, point) && indexes.lt(point, self.end)
    }
}

/// An ordered, non-overlapping sequence of [`Segment`]s plus the
/// [`VNInfo`]s they reference.
///
/// Segments are kept sorted by `start`; adjacent segments sharing a `vn`
/// are coalesced by [`LiveRange::add_segment`].
#[derive(Clone, Debug, Default)]
pub struct LiveRange {
    segments: SmallVec<[Segment; 4]>,
    values: SmallVec<[VNInfo; 4]>,
}

impl LiveRange {
    /// An empty live range with no segments and no values.
    pub fn new() -> Self {
        LiveRange {
            segments: SmallVec::new(),
            values: SmallVec::new(),
        }
    }

    /// Iterate the segments in `start` order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The live range's value-number table.
    pub fn values(&self) -> &[VNInfo] {
        &self.values
    }

    /// Look up a value number by id.
    pub fn value(&self, id: VNInfoId) -> &VNInfo {
        &self.values[id.0 as usize]
    }

    /// Look up a value number by id, mutably.
    pub fn value_mut(&mut self, id: VNInfoId) -> &mut VNInfo {
        &mut self.values[id.0 as usize]
    }

    /// Is this range entirely empty (no segments)?
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Allocate a fresh value number defined at `def`, with no segments yet.
    pub fn alloc_value(&mut self, def: SlotIndex) -> VNInfoId {
        let id = VNInfoId(self.values.len() as u32);
        self.values.push(VNInfo::new(def));
        id
    }

    /// Create a value that is defined and immediately killed at `def`: a
    /// zero-length-use segment `[def, def.dead_slot())`, for a def with no
    /// subsequent uses (a register clobbered and never read).
    pub fn create_dead_def(&mut self, indexes: &SlotIndexes, def: SlotIndex) -> VNInfoId {
        let vn = self.alloc_value(def);
        self.add_segment(
            indexes,
            Segment {
                start: def,
                end: def.dead_slot(),
                vn,
            },
        );
        vn
    }

    /// Extend the range so it covers `[start, end)` with value `vn`, merging
    /// with an adjacent or overlapping same-valued segment where possible.
    /// The common single-block extension step of `LiveIntervalCalc`.
    pub fn extend_in_block(&mut self, indexes: &SlotIndexes, start: SlotIndex, end: SlotIndex, vn: VNInfoId) {
        self.add_segment(indexes, Segment { start, end, vn });
    }

    /// Insert `seg`, coalescing it with neighboring segments of the same
    /// value number that it touches or overlaps.
    pub fn add_segment(&mut self, indexes: &SlotIndexes, seg: Segment) {
        let insert_at = self
            .segments
            .iter()
            .position(|s| indexes.lt(seg.start, s.start))
            .unwrap_or(self.segments.len());
        self.segments.insert(insert_at, seg);
        self.coalesce_around(indexes, insert_at);
    }

    fn coalesce_around(&mut self, indexes: &SlotIndexes, at: usize) {
        // Merge with the following segment first so `at` still indexes the
        // (possibly grown) segment when we look backward next.
        if at + 1 < self.segments.len()
            && self.segments[at].vn.0 == self.segments[at + 1].vn.0
            && indexes.le(self.segments[at + 1].start, self.segments[at].end)
        {
            let next_end = self.segments[at + 1].end;
            self.segments.remove(at + 1);
            if indexes.lt(self.segments[at].end, next_end) {
                self.segments[at].end = next_end;
            }
        }
        if at > 0
            && self.segments[at - 1].vn.0 == self.segments[at].vn.0
            && indexes.le(self.segments[at].start, self.segments[at - 1].end)
        {
            let end = self.segments[at].end;
            self.segments.remove(at);
            if indexes.lt(self.segments[at - 1].end, end) {
                self.segments[at - 1].end = end;
            }
        }
    }

    /// Find the segment containing `point`, if any.
    pub fn query(&self, indexes: &SlotIndexes, point: SlotIndex) -> Option<&Segment> {
        self.segments.iter().find(|s| s.contains(indexes, point))
    }

    /// Drop every segment whose `start` falls in `[window_start,
    /// window_end)`, used by `LiveIntervals::repair_intervals_in_range` to
    /// clear stale segments before re-scanning the repaired window.
    pub fn retain_segments_outside(&mut self, indexes: &SlotIndexes, window_start: SlotIndex, window_end: SlotIndex) {
        self.segments
            .retain(|s| !(indexes.le(window_start, s.start) && indexes.lt(s.start, window_end)));
    }

    /// Remove all liveness reachable from `kill` along dominator-forward
    /// paths, recording the re-entry points a matching `extend_to_indices`
    /// call would need to restore the original liveness into `endpoints`.
    ///
    /// This crate has no dominator tree of its own: "reachable from kill" is
    /// approximated by "every segment of the same value number starting at
    /// or after kill", which is exact within a single basic block and is
    /// the only shape `LiveIntervals` ever builds a call from.
    pub fn prune_value(&mut self, indexes: &SlotIndexes, kill: SlotIndex, endpoints: &mut Vec<SlotIndex>) {
        let seg_idx = match self.segments.iter().position(|s| s.contains(indexes, kill)) {
            Some(i) => i,
            None => return,
        };
        let vn = self.segments[seg_idx].vn;
        if indexes.lt(kill, self.segments[seg_idx].end) {
            endpoints.push(kill);
            self.segments[seg_idx].end = kill;
        }
        let mut i = seg_idx + 1;
        while i < self.segments.len() {
            if self.segments[i].vn.0 == vn.0 {
                endpoints.push(self.segments[i].start);
                self.segments.remove(i);
            } else {
                i += 1;
            }
        }
        if !indexes.lt(self.segments[seg_idx].start, self.segments[seg_idx].end) {
            self.segments.remove(seg_idx);
        }
    }
}

/// Extend `range` so it is live at every point in `indices`, creating
/// PHI-defs at control-flow joins where a point is reachable from more than
/// one existing definition.
///
/// `undefs` lists points that must be treated as *not* dominated by any real
/// definition (e.g. along a path the caller has already decided is dead); a
/// target jointly dominated only by `undefs` is left unextended rather than
/// treated as an error. `dominates(a, b)` answers whether the value defined
/// at `a` reaches `b`; dominator-tree construction is the caller's
/// responsibility, this range type has none of its own.
pub(crate) fn extend_to_indices(
    range: &mut LiveRange,
    indexes: &SlotIndexes,
    indices: &[SlotIndex],
    undefs: &[SlotIndex],
    mut dominates: impl FnMut(SlotIndex, SlotIndex) -> bool,
) {
    for &point in indices {
        if undefs
            .iter()
            .any(|&u| indexes.cmp_index(u, point) == std::cmp::Ordering::Equal)
        {
            continue;
        }
        if range.query(indexes, point).is_some() {
            continue;
        }

        let mut reaching: SmallVec<[VNInfoId; 4]> = SmallVec::new();
        for v in 0..range.values.len() {
            let vn = VNInfoId(v as u32);
            if dominates(range.values[v].def, point) {
                reaching.push(vn);
            }
        }

        match reaching.len() {
            0 => continue,
            1 => {
                let vn = reaching[0];
                let def = range.value(vn).def;
                range.extend_in_block(indexes, def, point, vn);
            }
            _ => {
                let vn = range.alloc_value(point);
                range.value_mut(vn).is_phi_def = true;
                range.add_segment(
                    indexes,
                    Segment {
                        start: point,
                        end: point,
                        vn,
                    },
                );
            }
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

    /// Three instructions in one block, built through the real
    /// `SlotIndexes::build` so every `SlotIndex` used below is a genuine,
    /// orderable handle rather than a hand-fabricated one.
    fn three_inst_indexes() -> SlotIndexes {
        let func = FakeFunction {
            blocks: vec![Block::new(0)],
            block_data: vec![FakeBlock {
                number: Block::new(0),
                insts: vec![InstIndex::new(0), InstIndex::new(1), InstIndex::new(2)],
            }],
            inst_data: (0..3).map(|_| FakeInst(vec![])).collect(),
        };
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);
        indexes
    }

    #[test]
    fn create_dead_def_is_zero_length_and_ordered() {
        let _ = env_logger::try_init();
        let indexes = three_inst_indexes();
        let def = indexes.get_instruction_index(InstIndex::new(0)).unwrap().reg_slot();
        let mut lr = LiveRange::new();
        let vn = lr.create_dead_def(&indexes, def);
        assert_eq!(lr.segments().len(), 1);
        let seg = lr.segments()[0];
        assert_eq!(seg.vn.0, vn.0);
        assert!(indexes.lt(seg.start, seg.end));
        assert!(indexes.le(seg.end, def.dead_slot()));
    }

    #[test]
    fn add_segment_coalesces_adjacent_same_value() {
        let _ = env_logger::try_init();
        let indexes = three_inst_indexes();
        let i0 = indexes.get_instruction_index(InstIndex::new(0)).unwrap();
        let i1 = indexes.get_instruction_index(InstIndex::new(1)).unwrap();
        let i2 = indexes.get_instruction_index(InstIndex::new(2)).unwrap();

        let mut lr = LiveRange::new();
        let vn = lr.alloc_value(i0.reg_slot());
        lr.add_segment(
            &indexes,
            Segment {
                start: i0.reg_slot(),
                end: i1.reg_slot(),
                vn,
            },
        );
        lr.add_segment(
            &indexes,
            Segment {
                start: i1.reg_slot(),
                end: i2.reg_slot(),
                vn,
            },
        );
        assert_eq!(lr.segments().len(), 1);
        assert!(indexes.le(lr.segments()[0].end, i2.reg_slot()));
        assert!(indexes.le(i2.reg_slot(), lr.segments()[0].end));
    }

    #[test]
    fn prune_value_truncates_and_records_endpoint() {
        // A def/use/kill/use/end chain, shifted by one `INSTR_DIST` step
        // because real `SlotIndex`es here are anchored to `build`'s leading
        // block-boundary entry rather than a bare `0`: def at inst0's
        // early-clobber slot, a use at inst0's dead slot, kill at inst1's
        // block slot, a second use at inst1's dead slot, range end at
        // inst2's register slot.
        let _ = env_logger::try_init();
        let indexes = three_inst_indexes();
        let i0 = indexes.get_instruction_index(InstIndex::new(0)).unwrap();
        let i1 = indexes.get_instruction_index(InstIndex::new(1)).unwrap();
        let i2 = indexes.get_instruction_index(InstIndex::new(2)).unwrap();

        let def = i0.early_clobber_slot();
        let use1 = i0.dead_slot();
        let kill = i1.block_slot();
        let use2 = i1.dead_slot();
        let end = i2.reg_slot();

        let mut lr = LiveRange::new();
        let vn = lr.alloc_value(def);
        lr.add_segment(&indexes, Segment { start: def, end, vn });
        assert!(lr.query(&indexes, use1).is_some());
        assert!(lr.query(&indexes, use2).is_some());

        let mut endpoints = Vec::new();
        lr.prune_value(&indexes, kill, &mut endpoints);
        assert_eq!(endpoints.len(), 1);
        assert!(indexes.cmp_index(endpoints[0], kill) == std::cmp::Ordering::Equal);
        assert_eq!(lr.segments().len(), 1);
        assert!(indexes.le(lr.segments()[0].end, kill));
        assert!(indexes.le(kill, lr.segments()[0].end));

        // Round trip: extending back to the original endpoint restores the
        // original liveness.
        extend_to_indices(&mut lr, &indexes, &endpoints, &[], |a, _| {
            indexes.cmp_index(a, def) == std::cmp::Ordering::Equal
        });
        assert!(lr.query(&indexes, use2).is_some());
    }

    #[test]
    fn prune_value_on_unreached_kill_is_a_no_op() {
        let _ = env_logger::try_init();
        let indexes = three_inst_indexes();
        let i0 = indexes.get_instruction_index(InstIndex::new(0)).unwrap();
        let i2 = indexes.get_instruction_index(InstIndex::new(2)).unwrap();

        let mut lr = LiveRange::new();
        let vn = lr.alloc_value(i0.reg_slot());
        lr.add_segment(
            &indexes,
            Segment {
                start: i0.reg_slot(),
                end: i0.dead_slot(),
                vn,
            },
        );
        let mut endpoints = Vec::new();
        lr.prune_value(&indexes, i2.reg_slot(), &mut endpoints);
        assert!(endpoints.is_empty());
        assert_eq!(lr.segments().len(), 1);
    }
}
