//! Minimal pass-timing instrumentation.
//!
//! Mirrors the `let _tt = timing::regalloc();` idiom used throughout
//! `cranelift_codegen`: acquiring a guard starts a stopwatch for a named
//! pass, and dropping it logs the elapsed wall-clock time at `trace` level.
//! There is no global aggregation here (`cranelift_codegen`'s `timing`
//! module accumulates per-pass totals across a whole compilation for
//! `-Ztime-passes` style reporting); a single function's worth of analysis
//! doesn't warrant that machinery, so we keep just the RAII shape.

use std::time::Instant;

/// An RAII guard that logs how long the enclosing pass took when dropped.
pub struct PassTimer {
    name: &'static str,
    start: Instant,
}

impl Drop for PassTimer {
    fn drop(&mut self) {
        log::trace!("{} took {:?}", self.name, self.start.elapsed());
    }
}

fn start(name: &'static str) -> PassTimer {
    PassTimer {
        name,
        start: Instant::now(),
    }
}

/// Time the slot-index build pass.
pub fn slot_indexes() -> PassTimer {
    start("slot_indexes")
}

/// Time the live-interval analysis pass.
pub fn live_intervals() -> PassTimer {
    start("live_intervals")
}

/// Time a single spill-placement query (`prepare` through `finish`).
pub fn spill_placement() -> PassTimer {
    start("spill_placement")
}
