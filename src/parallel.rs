//! Fan-out helper for embarrassingly parallel per-clause work.
//!
//! Clause evaluation reads shared matrices and writes disjoint output
//! slots, so it parallelizes with a plain fan-out/fan-in and no locking.
//! The trainer never goes through here: its float cache has a single
//! cursor and must be consumed serially.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// # Overview
///
/// Fills each slot with `eval(slot_index)`, in parallel when requested.
///
/// `parallelize` is the caller's `n_jobs > 1` switch. Without the
/// `parallel` feature the switch is ignored and the loop runs serially.
/// Worker scheduling is delegated to rayon's global pool.
pub(crate) fn fan_out<F>(slots: &mut [bool], parallelize: bool, eval: F)
where
    F: Fn(usize) -> bool + Sync
{
    #[cfg(feature = "parallel")]
    if parallelize {
        slots
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| *slot = eval(i));
        return;
    }

    let _ = parallelize;
    for (i, slot) in slots.iter_mut().enumerate() {
        *slot = eval(i);
    }
}
