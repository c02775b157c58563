//! Feedback kernels: the per-feature state transitions of Type I and
//! Type II feedback.
//!
//! Each kernel walks one clause's row pair (positive automata in row `2k`,
//! negative in row `2k+1`) and mutates counter and signum bit in lockstep.
//! Counters saturate at `[-n_states, n_states - 1]` and never wrap; signum
//! bits flip exactly on zero-boundary crossings (-1 to 0 or 0 to -1).
//!
//! Draw discipline: `block1` consumes two floats per feature, `block2`
//! consumes two floats per feature even when the boost flag makes the first
//! draw's condition unconditional, and `block3` consumes none. The fixed
//! consumption order keeps the cache cursor advancement identical across
//! configurations, which is what makes training replayable.

use crate::{
    bits::{BitRowMut, BitVector},
    rng::FloatCache,
    state::Counter
};

/// # Overview
///
/// Type I feedback, negative component: the clause received reinforcing
/// feedback but did not fire.
///
/// Every automaton of the pair is independently decremented with probability
/// `1/s`, eroding inclusions that kept the clause from firing.
pub(crate) fn block1<T: Counter>(
    n_features: usize,
    n_states: i32,
    s_inv: f32,
    pos_row: &mut [T],
    neg_row: &mut [T],
    mut pos_signum: BitRowMut<'_>,
    mut neg_signum: BitRowMut<'_>,
    fcache: &mut FloatCache
) {
    let lo = T::from_i32(-n_states);

    for fidx in 0..n_features {
        if fcache.next_draw() <= s_inv {
            if pos_row[fidx] == T::ZERO {
                pos_signum.flip(fidx);
            }
            if pos_row[fidx] > lo {
                pos_row[fidx] = pos_row[fidx].dec();
            }
        }

        if fcache.next_draw() <= s_inv {
            if neg_row[fidx] == T::ZERO {
                neg_signum.flip(fidx);
            }
            if neg_row[fidx] > lo {
                neg_row[fidx] = neg_row[fidx].dec();
            }
        }
    }
}

/// # Overview
///
/// Type I feedback, positive component: the clause received reinforcing
/// feedback and fired.
///
/// For a present feature the positive automaton is rewarded with probability
/// `1 - 1/s` (unconditionally under boost) and the negative automaton
/// penalized with probability `1/s`; for an absent feature the roles invert.
/// Both draws are consumed per feature regardless of branch.
#[allow(clippy::too_many_arguments)]
pub(crate) fn block2<T: Counter>(
    n_states: i32,
    s_inv: f32,
    boost: bool,
    pos_row: &mut [T],
    neg_row: &mut [T],
    mut pos_signum: BitRowMut<'_>,
    mut neg_signum: BitRowMut<'_>,
    x: &BitVector,
    fcache: &mut FloatCache
) {
    let lo = T::from_i32(-n_states);
    let hi = T::from_i32(n_states - 1);
    let n_features = x.len();

    for fidx in 0..n_features {
        let draw1 = fcache.next_draw();
        let draw2 = fcache.next_draw();
        let cond1 = boost || draw1 <= 1.0 - s_inv;
        let cond2 = draw2 <= s_inv;

        if x.test(fidx) {
            if cond1 && pos_row[fidx] < hi {
                pos_row[fidx] = pos_row[fidx].inc();
                if pos_row[fidx] == T::ZERO {
                    pos_signum.flip(fidx);
                }
            }
            if cond2 {
                if neg_row[fidx] == T::ZERO {
                    neg_signum.flip(fidx);
                }
                if neg_row[fidx] > lo {
                    neg_row[fidx] = neg_row[fidx].dec();
                }
            }
        } else {
            if cond1 && neg_row[fidx] < hi {
                neg_row[fidx] = neg_row[fidx].inc();
                if neg_row[fidx] == T::ZERO {
                    neg_signum.flip(fidx);
                }
            }
            if cond2 {
                if pos_row[fidx] == T::ZERO {
                    pos_signum.flip(fidx);
                }
                if pos_row[fidx] > lo {
                    pos_row[fidx] = pos_row[fidx].dec();
                }
            }
        }
    }
}

/// # Overview
///
/// Type II feedback: the clause fired when it should not have.
///
/// Deterministically nudges excluded automata whose literal would have
/// blocked the firing toward inclusion: the positive automaton where the
/// feature is absent, the negative automaton where it is present. Counters
/// only ever increase, and only up to 0, so no saturation check is needed.
pub(crate) fn block3<T: Counter>(
    n_features: usize,
    pos_row: &mut [T],
    neg_row: &mut [T],
    mut pos_signum: BitRowMut<'_>,
    mut neg_signum: BitRowMut<'_>,
    x: &BitVector
) {
    for fidx in 0..n_features {
        if !x.test(fidx) {
            if pos_row[fidx] < T::ZERO {
                pos_row[fidx] = pos_row[fidx].inc();
                if pos_row[fidx] == T::ZERO {
                    pos_signum.flip(fidx);
                }
            }
        } else if neg_row[fidx] < T::ZERO {
            neg_row[fidx] = neg_row[fidx].inc();
            if neg_row[fidx] == T::ZERO {
                neg_signum.flip(fidx);
            }
        }
    }
}
