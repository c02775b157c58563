//! Clause output evaluation over the packed signum cache.
//!
//! A clause fires when every included literal is satisfied by the input.
//! On packed blocks that is one expression per 64 features:
//!
//! ```text
//! eval = (include_pos & !features) | (include_neg & features)
//! ```
//!
//! and the clause output is true iff `eval` is zero across all content
//! blocks. Wide inputs are processed in batches of [`BATCH_SIZE`] blocks
//! with an OR-accumulator, leaving each batch early once any violation bit
//! is seen; a violation can never be undone by later blocks, so the exit is
//! purely an optimization.

use core::ops::Range;

use crate::{bits::BitVector, parallel::fan_out, state::TAStateWithSignum};

/// Feature blocks per early-exit batch. Below this the plain scan wins.
pub const BATCH_SIZE: usize = 8;

#[inline]
fn eval_blocks(pos: &[u64], neg: &[u64], x: &[u64], nblocks: usize) -> bool {
    if nblocks < BATCH_SIZE {
        let mut output = true;
        let mut fidx = 0;
        while fidx < nblocks && output {
            let eval = (pos[fidx] & !x[fidx]) | (neg[fidx] & x[fidx]);
            output = eval == 0;
            fidx += 1;
        }
        return output;
    }

    let mut toggle = 0u64;
    let mut kk = 0;
    while kk + BATCH_SIZE <= nblocks {
        for fidx in kk..kk + BATCH_SIZE {
            let eval = (pos[fidx] & !x[fidx]) | (neg[fidx] & x[fidx]);
            toggle |= eval;
        }
        if toggle != 0 {
            return false;
        }
        kk += BATCH_SIZE;
    }
    for fidx in kk..nblocks {
        let eval = (pos[fidx] & !x[fidx]) | (neg[fidx] & x[fidx]);
        toggle |= eval;
    }
    toggle == 0
}

#[inline]
fn has_inclusions(pos: &[u64], neg: &[u64], nblocks: usize) -> bool {
    for fidx in 0..nblocks {
        if pos[fidx] | neg[fidx] != 0 {
            return true;
        }
    }
    false
}

/// # Overview
///
/// Training-time clause outputs for a half-open clause index range.
///
/// Writes one boolean per clause into `out[oidx]` for `oidx` in
/// `clause_range`. Clauses are mutually independent readers of the signum
/// matrix, so with `n_jobs > 1` (and the `parallel` feature) the range is
/// fanned out across workers.
///
/// # Panics
///
/// Panics when `x` or `out` do not match the state's configured feature
/// and clause counts; a silent mismatch would corrupt downstream feedback.
pub fn evaluate_clause_outputs(
    state: &TAStateWithSignum,
    x: &BitVector,
    clause_range: Range<usize>,
    n_jobs: usize,
    out: &mut [bool]
) {
    assert_eq!(x.len(), state.n_features(), "input length != n_features");
    assert!(clause_range.end <= state.n_clauses());
    assert!(clause_range.end <= out.len());

    let signum = &state.signum;
    let x_blocks = x.blocks();
    let feature_blocks = x.content_blocks();
    let begin = clause_range.start;
    let parallelize = n_jobs > 1 && feature_blocks >= BATCH_SIZE;

    fan_out(&mut out[clause_range], parallelize, |i| {
        let oidx = begin + i;
        eval_blocks(
            signum.row(2 * oidx),
            signum.row(2 * oidx + 1),
            x_blocks,
            feature_blocks
        )
    });
}

/// # Overview
///
/// Inference-time clause outputs over all clauses.
///
/// Identical to [`evaluate_clause_outputs`] except that a clause with zero
/// inclusions — no positive or negative automaton included — outputs false:
/// a clause that votes on nothing is not a valid predictor.
///
/// # Panics
///
/// Panics on shape mismatch, as the training variant does.
pub fn evaluate_clause_outputs_for_predict(
    state: &TAStateWithSignum,
    x: &BitVector,
    n_jobs: usize,
    out: &mut [bool]
) {
    assert_eq!(x.len(), state.n_features(), "input length != n_features");
    assert!(state.n_clauses() <= out.len());

    let n_clauses = state.n_clauses();
    let signum = &state.signum;
    let x_blocks = x.blocks();
    let feature_blocks = x.content_blocks();
    let parallelize = n_jobs > 1 && feature_blocks >= BATCH_SIZE;

    fan_out(&mut out[..n_clauses], parallelize, |oidx| {
        let pos = signum.row(2 * oidx);
        let neg = signum.row(2 * oidx + 1);

        eval_blocks(pos, neg, x_blocks, feature_blocks)
            && has_inclusions(pos, neg, feature_blocks)
    });
}
