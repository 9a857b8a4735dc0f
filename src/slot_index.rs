//! Dense, renumbering-tolerant numbering of every program point.
//!
//! This is the leaf analysis everything else is built on. It represents the
//! cyclic neighbor references an intrusive index list would need as an
//! arena of [`IndexListEntry`] nodes plus a `{entry, slot}` handle
//! ([`SlotIndex`]) instead, sidestepping raw pointers. The arena
//! (`PrimaryMap<EntryRef, _>`) is append-only — entries are never
//! physically removed, only tombstoned (`instr = None`) or renumbered in
//! place — so a `SlotIndex`'s `EntryRef` stays valid for the life of the
//! `SlotIndexes` instance: it is invalidated only by bulk
//! [`SlotIndexes::release_memory`], never by ordinary insertion or removal.
//!
//! Ordering is *not* implemented as a free `Ord` impl on `SlotIndex` alone:
//! an entry's `index` field can be rewritten in place by
//! [`SlotIndexes::renumber_from`], so comparing two slot indices requires a
//! live lookup through the owning `SlotIndexes`. Use
//! [`SlotIndexes::cmp_index`] (or the `lt`/`le`/`gt`/`ge` convenience
//! wrappers) rather than `PartialOrd`.

use std::cmp::Ordering;

use cranelift_entity::{entity_impl, PrimaryMap, SecondaryMap};

use crate::cfg::CgFunction;
use crate::entities::{Block, InstIndex};
use crate::error::{AllocationError, Result};

/// Nominal spacing between consecutive instruction entries, leaving
/// headroom for insertions.
pub const INSTR_DIST: u32 = 4 * NUM_SLOTS as u32;

/// The four sub-instruction program points, in slot order.
pub const NUM_SLOTS: usize = 4;

/// Spacing between the four sub-slots of a single instruction.
const SLOT_STRIDE: u32 = INSTR_DIST / NUM_SLOTS as u32;

/// The four ordered sub-slots of a single instruction's program point.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[repr(u8)]
pub enum Slot {
    /// The block-boundary / "instruction as a whole" point.
    Block = 0,
    /// The point at which early-clobber defs take effect.
    EarlyClobber = 1,
    /// The point at which normal defs/uses take effect.
    Register = 2,
    /// The point at which the instruction's value is dead.
    Dead = 3,
}

impl Slot {
    const ALL: [Slot; NUM_SLOTS] = [Slot::Block, Slot::EarlyClobber, Slot::Register, Slot::Dead];

    fn stride_offset(self) -> u32 {
        self as u32 * SLOT_STRIDE
    }
}

/// An entry in the append-only index list: either a block-boundary sentinel
/// (`instr = None`) or a single instruction, linked to its neighbors.
#[derive(Clone, Debug)]
struct IndexListEntry {
    instr: Option<InstIndex>,
    index: u32,
    prev: Option<EntryRef>,
    next: Option<EntryRef>,
}

/// A reference into the `SlotIndexes` arena. Stable for the lifetime of the
/// owning `SlotIndexes`; never invalidated by renumbering, only by bulk
/// `release_memory`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct EntryRef(u32);
entity_impl!(EntryRef, "slot_entry");

/// An opaque handle to a program point: an entry plus one of its four
/// sub-slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct SlotIndex {
    entry: EntryRef,
    slot: Slot,
}

impl SlotIndex {
    /// Two indices name the same instruction iff they share an entry,
    /// regardless of sub-slot.
    pub fn is_same_instr(self, other: Self) -> bool {
        self.entry == other.entry
    }

    /// The sub-slot of this index.
    pub fn slot(self) -> Slot {
        self.slot
    }

    /// This index's `Slot::Register` sibling — the point at which a normal
    /// def takes effect.
    pub fn reg_slot(self) -> Self {
        Self {
            entry: self.entry,
            slot: Slot::Register,
        }
    }

    /// This index's `Slot::Block` sibling.
    pub fn block_slot(self) -> Self {
        Self {
            entry: self.entry,
            slot: Slot::Block,
        }
    }

    /// This index's `Slot::Dead` sibling.
    pub fn dead_slot(self) -> Self {
        Self {
            entry: self.entry,
            slot: Slot::Dead,
        }
    }

    /// This index's `Slot::EarlyClobber` sibling.
    pub fn early_clobber_slot(self) -> Self {
        Self {
            entry: self.entry,
            slot: Slot::EarlyClobber,
        }
    }
}

impl std::fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}e{:?}", self.entry, self.slot)
    }
}

/// Owns the append-only entry arena and the indexes built over it.
pub struct SlotIndexes {
    entries: PrimaryMap<EntryRef, IndexListEntry>,
    first: Option<EntryRef>,
    last: Option<EntryRef>,
    inst_index: SecondaryMap<InstIndex, Option<SlotIndex>>,
    /// Per-block `(start, end)` ranges, `end` exclusive (the next block's
    /// start boundary, or the tail sentinel for the last block).
    mbb_ranges: SecondaryMap<Block, Option<(SlotIndex, SlotIndex)>>,
    /// Sorted by start index, for `mbb_from_index`'s binary search.
    mbb_starts: Vec<(u32, Block)>,
    /// Total renumbering work performed so far, for amortized-cost
    /// bookkeeping: renumbering only re-spaces a contiguous run until it
    /// finds existing headroom, so this stays bounded across a function's
    /// lifetime rather than growing with every insertion.
    renumber_count: u64,
}

impl Default for SlotIndexes {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotIndexes {
    /// An empty index space, ready for [`SlotIndexes::build`].
    pub fn new() -> Self {
        SlotIndexes {
            entries: PrimaryMap::new(),
            first: None,
            last: None,
            inst_index: SecondaryMap::new(),
            mbb_ranges: SecondaryMap::new(),
            mbb_starts: Vec::new(),
            renumber_count: 0,
        }
    }

    /// Drop all indexes. Invalidates every outstanding `SlotIndex`.
    pub fn release_memory(&mut self) {
        *self = Self::new();
    }

    fn push_entry(&mut self, instr: Option<InstIndex>, index: u32) -> EntryRef {
        let prev = self.last;
        let entry = self.entries.push(IndexListEntry {
            instr,
            index,
            prev,
            next: None,
        });
        if let Some(prev) = prev {
            self.entries[prev].next = Some(entry);
        } else {
            self.first = Some(entry);
        }
        self.last = Some(entry);
        entry
    }

    /// Build the numbering from scratch, in the function's layout order.
    /// A block's end-boundary entry is the very same
    /// entry as the following block's start-boundary entry — they are
    /// never duplicated — except for the last block, whose end is the
    /// list's tail sentinel.
    pub fn build(&mut self, func: &dyn CgFunction) {
        let _tt = crate::timing::slot_indexes();
        *self = Self::new();

        let mut next_index: u32 = 0;
        let mut pending_start: Option<EntryRef> = None;

        for &block in func.blocks() {
            let start_entry = match pending_start.take() {
                Some(entry) => entry,
                None => {
                    let entry = self.push_entry(None, next_index);
                    next_index += INSTR_DIST;
                    entry
                }
            };
            let start = SlotIndex {
                entry: start_entry,
                slot: Slot::Block,
            };
            self.mbb_starts.push((self.entries[start_entry].index, block));

            for &inst in func.block_data(block).instructions() {
                let entry = self.push_entry(Some(inst), next_index);
                next_index += INSTR_DIST;
                self.inst_index[inst] = Some(SlotIndex {
                    entry,
                    slot: Slot::Block,
                });
            }

            let end_entry = self.push_entry(None, next_index);
            next_index += INSTR_DIST;
            let end = SlotIndex {
                entry: end_entry,
                slot: Slot::Block,
            };
            self.mbb_ranges[block] = Some((start, end));
            pending_start = Some(end_entry);
        }
        self.mbb_starts.sort_by_key(|&(k, _)| k);
    }

    /// Instruction's `Slot::Block` index, or `None` if unmapped.
    pub fn get_instruction_index(&self, mi: InstIndex) -> Option<SlotIndex> {
        self.inst_index.get(mi).copied().flatten()
    }

    /// Instruction's `Slot::Block` index, erroring if `mi` was never
    /// indexed or has since been removed.
    pub fn require_instruction_index(&self, mi: InstIndex) -> Result<SlotIndex> {
        self.get_instruction_index(mi)
            .ok_or(AllocationError::UnindexedInstruction(mi))
    }

    /// The block-boundary index at which `block` starts.
    pub fn mbb_start_idx(&self, block: Block) -> SlotIndex {
        self.mbb_ranges[block].expect("block was never indexed").0
    }

    /// The block-boundary index at which `block` ends (the start of the
    /// next block, or the tail sentinel for the last block).
    pub fn mbb_end_idx(&self, block: Block) -> SlotIndex {
        self.mbb_ranges[block].expect("block was never indexed").1
    }

    /// The one-past-the-end tail sentinel index.
    pub fn last_index(&self) -> SlotIndex {
        let entry = self.last.expect("SlotIndexes::build was never called");
        SlotIndex {
            entry,
            slot: Slot::Block,
        }
    }

    /// Find the block whose `[start, end)` range contains `idx`, by binary
    /// search over the sorted `(start, block)` vector.
    pub fn mbb_from_index(&self, idx: SlotIndex) -> Block {
        let key = self.index_value(idx);
        let pos = match self.mbb_starts.binary_search_by_key(&key, |&(k, _)| k) {
            Ok(pos) => pos,
            Err(0) => panic!("SlotIndex precedes the first block"),
            Err(pos) => pos - 1,
        };
        self.mbb_starts[pos].1
    }

    /// Walk `block`'s instruction list backward from `mi`'s position looking
    /// for the first already-indexed neighbor; falls back to the block's
    /// start boundary. Used before `mi` itself has been indexed.
    pub fn index_before_in_block(&self, block: Block, insts: &[InstIndex], mi_pos: usize) -> SlotIndex {
        for &candidate in insts[..mi_pos].iter().rev() {
            if let Some(idx) = self.get_instruction_index(candidate) {
                return idx;
            }
        }
        self.mbb_start_idx(block)
    }

    /// Symmetric to [`Self::index_before_in_block`], walking forward.
    pub fn index_after_in_block(&self, block: Block, insts: &[InstIndex], mi_pos: usize) -> SlotIndex {
        for &candidate in insts[mi_pos + 1..].iter() {
            if let Some(idx) = self.get_instruction_index(candidate) {
                return idx;
            }
        }
        self.mbb_end_idx(block)
    }

    /// Walk forward from `idx`, skipping tombstoned (removed) entries.
    pub fn next_non_null_index(&self, idx: SlotIndex) -> SlotIndex {
        let mut entry = idx.entry;
        loop {
            match self.entries[entry].next {
                Some(next) => {
                    entry = next;
                    if self.entries[entry].instr.is_some() || self.entries[entry].next.is_none() {
                        return SlotIndex {
                            entry,
                            slot: Slot::Block,
                        };
                    }
                }
                None => {
                    return SlotIndex {
                        entry,
                        slot: Slot::Block,
                    }
                }
            }
        }
    }

    /// Insert a freshly-spliced, not-yet-indexed instruction `mi` into the
    /// maps. `insts`/`mi_pos` describe `mi`'s position in the client's own
    /// (already-updated) instruction list for `block`; `late` selects which
    /// neighboring indexed instruction anchors the search (`late`: look
    /// forward first; otherwise: look backward first).
    pub fn insert_instruction_in_maps(
        &mut self,
        block: Block,
        insts: &[InstIndex],
        mi_pos: usize,
        mi: InstIndex,
        late: bool,
    ) -> SlotIndex {
        debug_assert!(
            self.get_instruction_index(mi).is_none(),
            "instruction is already indexed"
        );

        let (prev_entry, next_entry) = if late {
            let next = self.index_after_in_block(block, insts, mi_pos).entry;
            let prev = self.entries[next].prev.expect("next has no predecessor");
            (prev, next)
        } else {
            let prev = self.index_before_in_block(block, insts, mi_pos).entry;
            let next = self.entries[prev].next.expect("prev has no successor");
            (prev, next)
        };

        let prev_index = self.entries[prev_entry].index;
        let next_index = self.entries[next_entry].index;
        let dist = ((next_index - prev_index) / 2) & !(SLOT_STRIDE - 1);

        let new_index = prev_index + dist;
        let new_entry = self.entries.push(IndexListEntry {
            instr: Some(mi),
            index: new_index,
            prev: Some(prev_entry),
            next: Some(next_entry),
        });
        self.entries[prev_entry].next = Some(new_entry);
        self.entries[next_entry].prev = Some(new_entry);

        let slot_index = SlotIndex {
            entry: new_entry,
            slot: Slot::Block,
        };
        self.inst_index[mi] = Some(slot_index);

        if dist == 0 {
            self.renumber_from(new_entry);
        }

        slot_index
    }

    /// Re-space entries starting at `from`, walking forward by `InstrDist`
    /// increments until the existing spacing already provides headroom.
    fn renumber_from(&mut self, from: EntryRef) {
        log::trace!("renumbering slot indexes starting at {from}");
        let mut entry = from;
        let mut index = self.entries[entry].index;
        // Anchor renumbering off the true predecessor's index so spacing
        // stays monotonically consistent with entries we don't touch.
        if let Some(prev) = self.entries[entry].prev {
            index = self.entries[prev].index + INSTR_DIST;
        }
        loop {
            self.entries[entry].index = index;
            self.renumber_count += 1;
            match self.entries[entry].next {
                Some(next) => {
                    let next_index = self.entries[next].index;
                    if next_index > index {
                        // Existing spacing already provides headroom; stop.
                        break;
                    }
                    entry = next;
                    index += INSTR_DIST;
                }
                None => break,
            }
        }
    }

    /// Erase `mi`'s mapping. The entry itself is kept (tombstoned) to
    /// preserve the numbering of surrounding instructions.
    pub fn remove_instruction_from_maps(&mut self, mi: InstIndex) {
        if let Some(idx) = self.get_instruction_index(mi) {
            self.entries[idx.entry].instr = None;
        }
        self.inst_index[mi] = None;
    }

    /// Move the entry's instruction pointer from `old` to `new` and swap
    /// the map keys. Returns `None` if `old` was never indexed.
    pub fn replace_instruction_in_maps(&mut self, old: InstIndex, new: InstIndex) -> Option<SlotIndex> {
        let idx = self.get_instruction_index(old)?;
        self.entries[idx.entry].instr = Some(new);
        self.inst_index[old] = None;
        self.inst_index[new] = Some(idx);
        Some(idx)
    }

    /// Re-scan `block`'s instruction list over `[begin, end)` (positions
    /// into `insts`) and reconcile the mapping with the list's current
    /// state: unmapped instructions in the window get fresh entries
    /// inserted, and previously-mapped instructions no longer present in
    /// the window are tombstoned.
    pub fn repair_indexes_in_range(
        &mut self,
        block: Block,
        insts: &[InstIndex],
        begin: usize,
        end: usize,
        still_present: impl Fn(InstIndex) -> bool,
    ) {
        // Tombstone anything mapped that the client says is gone. We don't
        // have the "previous" window contents here, so the client is
        // expected to report liveness via `still_present`; in the common
        // case (an insert or a delete at the boundary) this is a single
        // instruction.
        for pos in begin..end {
            let mi = insts[pos];
            if !still_present(mi) {
                self.remove_instruction_from_maps(mi);
            }
        }
        for pos in begin..end {
            let mi = insts[pos];
            if still_present(mi) && self.get_instruction_index(mi).is_none() {
                self.insert_instruction_in_maps(block, insts, pos, mi, /* late */ false);
            }
        }
    }

    /// The live, renumbering-aware numeric position of `idx`, for use in
    /// comparisons. Not part of the public ordering API — use
    /// [`Self::cmp_index`].
    fn index_value(&self, idx: SlotIndex) -> u32 {
        self.entries[idx.entry].index + idx.slot.stride_offset()
    }

    /// Total order over slot indices. Always reflects the list's current
    /// state, so it remains correct across renumbering.
    pub fn cmp_index(&self, a: SlotIndex, b: SlotIndex) -> Ordering {
        self.index_value(a).cmp(&self.index_value(b))
    }

    /// `a < b`.
    pub fn lt(&self, a: SlotIndex, b: SlotIndex) -> bool {
        self.cmp_index(a, b) == Ordering::Less
    }

    /// `a <= b`.
    pub fn le(&self, a: SlotIndex, b: SlotIndex) -> bool {
        self.cmp_index(a, b) != Ordering::Greater
    }

    /// Distance in raw index units between two slot indices (useful for
    /// weighting heuristics; always non-negative when `a <= b`).
    pub fn distance(&self, a: SlotIndex, b: SlotIndex) -> i64 {
        i64::from(self.index_value(b)) - i64::from(self.index_value(a))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfg::{CgBasicBlock, CgInstruction, Operand};

    struct FakeInst(Vec<Operand>);
    impl CgInstruction for FakeInst {
        fn operands(&self) -> &[Operand] {
            &self.0
        }
    }

    struct FakeBlock {
        number: Block,
        insts: Vec<InstIndex>,
        succs: Vec<Block>,
        preds: Vec<Block>,
    }
    impl CgBasicBlock for FakeBlock {
        fn number(&self) -> Block {
            self.number
        }
        fn instructions(&self) -> &[InstIndex] {
            &self.insts
        }
        fn successors(&self) -> &[Block] {
            &self.succs
        }
        fn predecessors(&self) -> &[Block] {
            &self.preds
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

    /// Two blocks of two instructions each.
    fn two_by_two() -> FakeFunction {
        FakeFunction {
            blocks: vec![Block::new(0), Block::new(1)],
            block_data: vec![
                FakeBlock {
                    number: Block::new(0),
                    insts: vec![InstIndex::new(0), InstIndex::new(1)],
                    succs: vec![Block::new(1)],
                    preds: vec![],
                },
                FakeBlock {
                    number: Block::new(1),
                    insts: vec![InstIndex::new(2), InstIndex::new(3)],
                    succs: vec![],
                    preds: vec![Block::new(0)],
                },
            ],
            inst_data: vec![
                FakeInst(vec![]),
                FakeInst(vec![]),
                FakeInst(vec![]),
                FakeInst(vec![]),
            ],
        }
    }

    #[test]
    fn index_spacing_matches_scenario_one() {
        let _ = env_logger::try_init();
        let func = two_by_two();
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);

        let i0 = indexes.get_instruction_index(InstIndex::new(0)).unwrap();
        let i1 = indexes.get_instruction_index(InstIndex::new(1)).unwrap();
        let i2 = indexes.get_instruction_index(InstIndex::new(2)).unwrap();
        let i3 = indexes.get_instruction_index(InstIndex::new(3)).unwrap();

        assert_eq!(indexes.index_value(indexes.mbb_start_idx(Block::new(0))), 0);
        assert_eq!(indexes.index_value(i0), 16);
        assert_eq!(indexes.index_value(i1), 32);
        assert_eq!(
            indexes.index_value(indexes.mbb_end_idx(Block::new(0))),
            48
        );
        assert_eq!(indexes.index_value(indexes.mbb_start_idx(Block::new(1))), 48);
        assert_eq!(indexes.index_value(i2), 64);
        assert_eq!(indexes.index_value(i3), 80);

        assert_eq!(indexes.mbb_from_index(i0), Block::new(0));
        assert_eq!(indexes.mbb_from_index(i2), Block::new(1));
    }

    #[test]
    fn insert_between_two_instructions_lands_at_24() {
        let _ = env_logger::try_init();
        let func = two_by_two();
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);

        // Insert a new instruction between inst 0 (idx 16) and inst 1 (idx
        // 32), in block 0's (now 3-long) instruction list at position 1.
        let new_inst = InstIndex::new(100);
        let insts = [InstIndex::new(0), new_inst, InstIndex::new(1)];
        let slot = indexes.insert_instruction_in_maps(Block::new(0), &insts, 1, new_inst, false);
        assert_eq!(indexes.index_value(slot), 24);
    }

    #[test]
    fn repeated_insertion_forces_renumbering() {
        let _ = env_logger::try_init();
        // One block, four instructions: boundary@0, inst0@16, inst1@32,
        // inst2@48, inst3@64, tail@80 (the leading block-boundary entry is
        // the one `build` always emits).
        let func = FakeFunction {
            blocks: vec![Block::new(0)],
            block_data: vec![FakeBlock {
                number: Block::new(0),
                insts: vec![
                    InstIndex::new(0),
                    InstIndex::new(1),
                    InstIndex::new(2),
                    InstIndex::new(3),
                ],
                succs: vec![],
                preds: vec![],
            }],
            inst_data: (0..4).map(|_| FakeInst(vec![])).collect(),
        };
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);

        let mut insts: Vec<InstIndex> = vec![
            InstIndex::new(0),
            InstIndex::new(1),
            InstIndex::new(2),
            InstIndex::new(3),
        ];

        // Insertion 1: between inst0 (16) and inst1 (32) -> dist = 8, lands
        // at 24.
        let new1 = InstIndex::new(201);
        insts.insert(1, new1);
        let s1 = indexes.insert_instruction_in_maps(Block::new(0), &insts, 1, new1, false);
        assert_eq!(indexes.index_value(s1), 24);

        // Insertion 2: between inst0 (16) and new1 (24) -> dist = 4, lands
        // at 20.
        let new2 = InstIndex::new(202);
        insts.insert(1, new2);
        let s2 = indexes.insert_instruction_in_maps(Block::new(0), &insts, 1, new2, false);
        assert_eq!(indexes.index_value(s2), 20);

        // Insertion 3: between inst0 (16) and new2 (20) -> dist = 0, which
        // must trigger a local renumbering that re-spaces every entry from
        // this point on by InstrDist (16) again.
        let new3 = InstIndex::new(203);
        insts.insert(1, new3);
        let s3 = indexes.insert_instruction_in_maps(Block::new(0), &insts, 1, new3, false);
        assert_eq!(indexes.index_value(s3), 32);
        assert_eq!(indexes.index_value(s2), 48);
        assert_eq!(indexes.index_value(s1), 64);
        assert_eq!(
            indexes.index_value(indexes.get_instruction_index(InstIndex::new(1)).unwrap()),
            80
        );
        assert_eq!(
            indexes.index_value(indexes.get_instruction_index(InstIndex::new(2)).unwrap()),
            96
        );
        assert_eq!(
            indexes.index_value(indexes.get_instruction_index(InstIndex::new(3)).unwrap()),
            112
        );
        assert_eq!(indexes.index_value(indexes.last_index()), 128);

        // Order is preserved even though absolute values all shifted.
        assert!(indexes.lt(
            indexes.get_instruction_index(InstIndex::new(0)).unwrap(),
            s3
        ));
        assert!(indexes.lt(s3, s2));
        assert!(indexes.lt(s2, s1));
        assert!(indexes.lt(
            s1,
            indexes.get_instruction_index(InstIndex::new(1)).unwrap()
        ));
    }

    #[test]
    fn total_order_matches_list_order() {
        let _ = env_logger::try_init();
        let func = two_by_two();
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);
        let i0 = indexes.get_instruction_index(InstIndex::new(0)).unwrap();
        let i1 = indexes.get_instruction_index(InstIndex::new(1)).unwrap();
        assert!(indexes.lt(i0, i1));
        assert!(!indexes.lt(i1, i0));
        assert_eq!(indexes.cmp_index(i0, i0), Ordering::Equal);
    }

    #[test]
    fn mbb_from_index_round_trips_parent_block() {
        let _ = env_logger::try_init();
        let func = two_by_two();
        let mut indexes = SlotIndexes::new();
        indexes.build(&func);
        for inst in 0..4u32 {
            let idx = indexes.get_instruction_index(InstIndex::new(inst)).unwrap();
            let block = indexes.mbb_from_index(idx);
            let expected = if inst < 2 { Block::new(0) } else { Block::new(1) };
            assert_eq!(block, expected);
        }
    }
}
