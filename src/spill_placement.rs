//! Hopfield-network relaxation for per-edge-bundle spill placement.
//!
//! The client partitions the CFG into edge bundles and presents, per
//! allocation attempt, a set of blocks with entry/exit constraints plus a
//! set of transparent (live-through, unconstrained) blocks. [`SpillPlacer`]
//! turns that into a weighted graph — one [`Node`] per bundle, edges from
//! transparent blocks — and runs a bounded asynchronous sign relaxation
//! until every bundle settles on "prefer register" (`value = 1`), "prefer
//! spill" (`value = -1`), or stays undecided (`value = 0`, which resolves
//! to spill at `finish`).
//!
//! Nodes live in a flat `Vec<Node>` indexed by bundle id rather than a
//! sparse map, since every bundle gets a node.
//!
//! `prepare`/`finish` own the per-query active-bundle bitset internally
//! (a `Vec<bool>` sized to the bundle count) instead of borrowing the
//! client's bit vector for the query's lifetime, which would otherwise
//! thread a lifetime parameter through every method on this type. `finish`
//! writes the final decision through into the caller-supplied slice: `true`
//! for every active bundle that ended up preferring a register, `false`
//! otherwise — clearing bits for every non-positive node, not just the ones
//! that changed, since the caller also needs to learn which bundles newly
//! prefer a register.

use std::collections::VecDeque;
use std::fmt;

use cranelift_entity::SecondaryMap;
use smallvec::SmallVec;

use crate::cfg::{BlockFrequency, BlockFrequencyInfo, CgFunction, EdgeBundles};
use crate::entities::{Block, Bundle};

/// The entry/exit preference the client attaches to one side of a block.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BorderConstraint {
    DontCare,
    PrefReg,
    PrefSpill,
    PrefBoth,
    MustSpill,
}

impl fmt::Display for BorderConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BorderConstraint::DontCare => "DontCare",
            BorderConstraint::PrefReg => "PrefReg",
            BorderConstraint::PrefSpill => "PrefSpill",
            BorderConstraint::PrefBoth => "PrefBoth",
            BorderConstraint::MustSpill => "MustSpill",
        })
    }
}

/// A block with a register/spill preference at its entry and/or exit.
#[derive(Clone, Copy, Debug)]
pub struct BlockConstraint {
    pub block: Block,
    pub entry: BorderConstraint,
    pub exit: BorderConstraint,
    /// Does the live range change value (get a new VNI) inside this block?
    /// Informational, carried through to `Display` for debugging only.
    pub changes_value: bool,
}

impl fmt::Display for BlockConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {} ({})",
            self.block,
            self.entry,
            self.exit,
            if self.changes_value { "changes" } else { "no change" }
        )
    }
}

/// One edge-bundle node of the relaxation graph.
#[derive(Clone, Debug)]
struct Node {
    bias_p: BlockFrequency,
    bias_n: BlockFrequency,
    /// `-1`: prefers spill, `0`: undecided, `1`: prefers register.
    value: i8,
    links: SmallVec<[(BlockFrequency, Bundle); 4]>,
    sum_link_weights: BlockFrequency,
}

impl Node {
    fn fresh(threshold: BlockFrequency) -> Self {
        Node {
            bias_p: BlockFrequency::ZERO,
            bias_n: BlockFrequency::ZERO,
            value: 0,
            links: SmallVec::new(),
            sum_link_weights: threshold,
        }
    }

    /// `MustSpill` saturates so no subsequent bias can overcome it.
    fn add_bias(&mut self, freq: BlockFrequency, dir: BorderConstraint) {
        match dir {
            BorderConstraint::PrefReg => self.bias_p = self.bias_p.saturating_add(freq),
            BorderConstraint::PrefSpill => self.bias_n = self.bias_n.saturating_add(freq),
            BorderConstraint::PrefBoth => {
                self.bias_p = self.bias_p.saturating_add(freq);
                self.bias_n = self.bias_n.saturating_add(freq);
            }
            BorderConstraint::MustSpill => self.bias_n = BlockFrequency::MAX,
            BorderConstraint::DontCare => {}
        }
    }

    fn must_spill(&self) -> bool {
        self.bias_n >= self.bias_p.saturating_add(self.sum_link_weights)
    }
}

/// Owns the relaxation graph for one function and runs queries against it.
pub struct SpillPlacer {
    nodes: Vec<Node>,
    active: Vec<bool>,
    threshold: BlockFrequency,
    entry_freq: BlockFrequency,
    block_freqs: SecondaryMap<Block, BlockFrequency>,
    todo: VecDeque<Bundle>,
    on_todo: Vec<bool>,
    recent_positive: Vec<Bundle>,
}

impl Default for SpillPlacer {
    fn default() -> Self {
        Self::new()
    }
}

impl SpillPlacer {
    pub fn new() -> Self {
        SpillPlacer {
            nodes: Vec::new(),
            active: Vec::new(),
            threshold: BlockFrequency::ZERO,
            entry_freq: BlockFrequency::ZERO,
            block_freqs: SecondaryMap::new(),
            todo: VecDeque::new(),
            on_todo: Vec::new(),
            recent_positive: Vec::new(),
        }
    }

    /// `threshold = max(1, entryFreq / 2^13 rounded half-up)`: the dead
    /// zone that keeps near-cancelling link sums from oscillating.
    pub fn set_threshold(&mut self, entry_freq: BlockFrequency) {
        self.entry_freq = entry_freq;
        let shifted = entry_freq.0 >> 13;
        let half_up = (entry_freq.0 >> 12) & 1;
        self.threshold = BlockFrequency(std::cmp::max(1, shifted + half_up));
    }

    /// Allocate one node per edge bundle, populate per-block frequencies,
    /// and compute the threshold from the function's entry frequency (spec
    /// §4.3 `runOnCgFunction`). Never mutates the function; always returns
    /// `false`.
    pub fn run_on_function(&mut self, func: &dyn CgFunction, mbfi: &dyn BlockFrequencyInfo, edge_bundles: &dyn EdgeBundles) -> bool {
        let _tt = crate::timing::spill_placement();
        let num_bundles = edge_bundles.num_bundles() as usize;
        self.nodes = (0..num_bundles).map(|_| Node::fresh(BlockFrequency::ZERO)).collect();
        self.active = vec![false; num_bundles];
        self.on_todo = vec![false; num_bundles];
        self.todo.clear();
        self.recent_positive.clear();
        self.block_freqs = SecondaryMap::new();
        for &block in func.blocks() {
            self.block_freqs[block] = mbfi.block_freq(block);
        }
        self.set_threshold(mbfi.entry_freq());
        log::debug!("spill placement: {num_bundles} bundles, threshold {}", self.threshold);
        false
    }

    fn enqueue(&mut self, n: Bundle) {
        let idx = n.as_u32() as usize;
        if !self.on_todo[idx] {
            self.on_todo[idx] = true;
            self.todo.push_back(n);
        }
    }

    fn dequeue(&mut self) -> Option<Bundle> {
        let n = self.todo.pop_front()?;
        self.on_todo[n.as_u32() as usize] = false;
        Some(n)
    }

    /// First time `n` is touched this query: reset its node, applying the
    /// compile-time-limiting negative prior for bundles spanning more than
    /// 100 blocks. Always enqueues `n`.
    fn activate(&mut self, n: Bundle, edge_bundles: &dyn EdgeBundles) {
        let idx = n.as_u32() as usize;
        if !self.active[idx] {
            self.active[idx] = true;
            self.nodes[idx] = Node::fresh(self.threshold);
            if edge_bundles.blocks(n).len() > 100 {
                self.nodes[idx].bias_p = BlockFrequency::ZERO;
                self.nodes[idx].bias_n = BlockFrequency(self.entry_freq.0 / 16);
            }
        }
        self.enqueue(n);
    }

    /// Reset for a new query: clear the todo-list, the recently-positive
    /// list, and every bundle's active flag.
    pub fn prepare(&mut self) {
        self.active.iter_mut().for_each(|a| *a = false);
        self.todo.clear();
        self.on_todo.iter_mut().for_each(|t| *t = false);
        self.recent_positive.clear();
    }

    /// For each block with a non-`DontCare` entry/exit constraint, activate
    /// the corresponding in-/out-bundle and add its bias. Duplicate entries
    /// for the same block accumulate.
    pub fn add_constraints(&mut self, live_blocks: &[BlockConstraint], edge_bundles: &dyn EdgeBundles) {
        for c in live_blocks {
            let freq = self.block_freqs[c.block];
            if c.entry != BorderConstraint::DontCare {
                let ib = edge_bundles.bundle(c.block, false);
                self.activate(ib, edge_bundles);
                self.nodes[ib.as_u32() as usize].add_bias(freq, c.entry);
            }
            if c.exit != BorderConstraint::DontCare {
                let ob = edge_bundles.bundle(c.block, true);
                self.activate(ob, edge_bundles);
                self.nodes[ob.as_u32() as usize].add_bias(freq, c.exit);
            }
        }
    }

    /// Add a `PrefSpill` bias to both sides of every listed block; `strong`
    /// doubles the weight.
    pub fn add_pref_spill(&mut self, blocks: &[Block], strong: bool, edge_bundles: &dyn EdgeBundles) {
        for &block in blocks {
            let freq = self.block_freqs[block];
            let freq = if strong { freq.saturating_mul(2) } else { freq };
            let ib = edge_bundles.bundle(block, false);
            self.activate(ib, edge_bundles);
            self.nodes[ib.as_u32() as usize].add_bias(freq, BorderConstraint::PrefSpill);
            let ob = edge_bundles.bundle(block, true);
            self.activate(ob, edge_bundles);
            self.nodes[ob.as_u32() as usize].add_bias(freq, BorderConstraint::PrefSpill);
        }
    }

    /// For each transparent block whose in-bundle and out-bundle differ,
    /// activate both and add a mutual link weighted by the block's
    /// frequency. Self-loops (`ib == ob`) are ignored.
    pub fn add_links(&mut self, transparent_blocks: &[Block], edge_bundles: &dyn EdgeBundles) {
        for &block in transparent_blocks {
            let ib = edge_bundles.bundle(block, false);
            let ob = edge_bundles.bundle(block, true);
            if ib == ob {
                continue;
            }
            self.activate(ib, edge_bundles);
            self.activate(ob, edge_bundles);
            let freq = self.block_freqs[block];
            let ib_idx = ib.as_u32() as usize;
            let ob_idx = ob.as_u32() as usize;
            self.nodes[ib_idx].links.push((freq, ob));
            self.nodes[ib_idx].sum_link_weights = self.nodes[ib_idx].sum_link_weights.saturating_add(freq);
            self.nodes[ob_idx].links.push((freq, ib));
            self.nodes[ob_idx].sum_link_weights = self.nodes[ob_idx].sum_link_weights.saturating_add(freq);
        }
    }

    /// Recompute `n`'s sign from its neighbors' current values. Returns
    /// whether this flipped `n`'s register preference (crossing into or
    /// out of `value == 1`); only on that flip do neighbors whose value
    /// now disagrees get re-enqueued, since a node's own sum only shifts
    /// when a linked node's preference actually changes.
    fn update(&mut self, n: Bundle) -> bool {
        let idx = n.as_u32() as usize;
        let links = self.nodes[idx].links.clone();
        let mut sum_n = self.nodes[idx].bias_n;
        let mut sum_p = self.nodes[idx].bias_p;
        for &(weight, to) in &links {
            match self.nodes[to.as_u32() as usize].value {
                -1 => sum_n = sum_n.saturating_add(weight),
                1 => sum_p = sum_p.saturating_add(weight),
                _ => {}
            }
        }
        let before = self.nodes[idx].value == 1;
        let new_value = if sum_n >= sum_p.saturating_add(self.threshold) {
            -1
        } else if sum_p >= sum_n.saturating_add(self.threshold) {
            1
        } else {
            0
        };
        self.nodes[idx].value = new_value;
        let changed = before != (new_value == 1);
        if changed {
            for &(_, to) in &links {
                if self.nodes[to.as_u32() as usize].value != new_value {
                    self.enqueue(to);
                }
            }
        }
        changed
    }

    /// Run `update` once on every active bundle. A bundle that must spill,
    /// or has no links, will never change its value again, so it is
    /// excluded from `recent_positive` even if this update flipped it.
    /// Returns whether any bundle is now newly preferring a register.
    pub fn scan_active_bundles(&mut self) -> bool {
        self.recent_positive.clear();
        for i in 0..self.nodes.len() {
            if !self.active[i] {
                continue;
            }
            let bundle = Bundle::new(i as u32);
            self.update(bundle);
            if self.nodes[i].must_spill() {
                continue;
            }
            if self.nodes[i].value == 1 {
                self.recent_positive.push(bundle);
            }
        }
        !self.recent_positive.is_empty()
    }

    /// Drain the todo-list, updating nodes until it empties or the
    /// `10 * |bundles|` iteration budget is exhausted. Discards whatever
    /// `recent_positive` held from a prior `scan_active_bundles`/`iterate`
    /// call: those bundles were already folded into the caller's decision,
    /// only newly-flipped bundles from this pass belong in the result.
    pub fn iterate(&mut self) {
        self.recent_positive.clear();
        let budget = 10 * self.nodes.len().max(1);
        let mut spent = 0usize;
        while spent < budget {
            let n = match self.dequeue() {
                Some(n) => n,
                None => break,
            };
            spent += 1;
            let changed = self.update(n);
            if changed && self.nodes[n.as_u32() as usize].value == 1 {
                self.recent_positive.push(n);
            }
        }
    }

    /// Write the final per-bundle decision through into `reg_bundles`
    /// (sized to the bundle count): `true` for every active bundle that
    /// ended up preferring a register, `false` otherwise. Returns `true`
    /// iff every active bundle ended up positive — a "perfect" placement.
    pub fn finish(&mut self, reg_bundles: &mut [bool]) -> bool {
        let mut perfect = true;
        for i in 0..self.nodes.len() {
            if !self.active[i] {
                continue;
            }
            let positive = self.nodes[i].value == 1;
            reg_bundles[i] = positive;
            perfect &= positive;
        }
        self.active.iter_mut().for_each(|a| *a = false);
        perfect
    }

    /// `biasN >= biasP + sumLinkWeights`: the node cannot be pulled
    /// positive by any combination of its links.
    pub fn must_spill(&self, n: Bundle) -> bool {
        self.nodes[n.as_u32() as usize].must_spill()
    }

    /// Bundles that newly started preferring a register since the last
    /// `prepare` (populated by `scan_active_bundles`/`iterate`).
    pub fn recent_positive(&self) -> &[Bundle] {
        &self.recent_positive
    }
}
