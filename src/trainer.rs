//! Automata training drivers.
//!
//! A driver walks a clause index range and dispatches each clause to one of
//! the three feedback kernels based on the feedback sign and the clause's
//! prior output. The float cache is refilled before every stochastic kernel
//! call and its cursor threads through sequential calls, so draws never
//! repeat or skip; this is why the trainer must not be fanned out across
//! clauses sharing one cache.
//!
//! Counter width is resolved exactly once per call by matching on the
//! [`CounterMatrix`] sum type; the per-feature loops are monomorphic.

use core::ops::Range;

use crate::{
    bits::{BitMatrix, BitVector},
    feedback::{block1, block2, block3},
    matrix::NumericMatrix,
    rng::{FastRng, FloatCache},
    state::{Counter, CounterMatrix, TAStateWithSignum}
};

#[allow(clippy::too_many_arguments)]
fn train_classifier_automata_t<T: Counter>(
    matrix: &mut NumericMatrix<T>,
    signum: &mut BitMatrix,
    clause_range: Range<usize>,
    feedback: &[i32],
    clause_output: &[bool],
    n_states: i32,
    s_inv: f32,
    x: &BitVector,
    boost: bool,
    frng: &mut FastRng,
    fcache: &mut FloatCache
) {
    let n_features = x.len();

    for iidx in clause_range {
        if feedback[iidx] > 0 {
            let (pos_row, neg_row) = matrix.row_pair_mut(iidx);
            let (pos_signum, neg_signum) = signum.row_pair_mut(iidx);

            if !clause_output[iidx] {
                fcache.refill(frng);
                block1(
                    n_features, n_states, s_inv, pos_row, neg_row, pos_signum, neg_signum, fcache
                );
            } else {
                fcache.refill(frng);
                block2(
                    n_states, s_inv, boost, pos_row, neg_row, pos_signum, neg_signum, x, fcache
                );
            }
        } else if feedback[iidx] < 0 && clause_output[iidx] {
            let (pos_row, neg_row) = matrix.row_pair_mut(iidx);
            let (pos_signum, neg_signum) = signum.row_pair_mut(iidx);

            block3(n_features, pos_row, neg_row, pos_signum, neg_signum, x);
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn train_regressor_automata_t<T: Counter>(
    matrix: &mut NumericMatrix<T>,
    signum: &mut BitMatrix,
    clause_range: Range<usize>,
    feedback: &[i32],
    clause_output: &[bool],
    n_states: i32,
    s_inv: f32,
    response_error: i32,
    x: &BitVector,
    boost: bool,
    frng: &mut FastRng,
    fcache: &mut FloatCache
) {
    let n_features = x.len();

    for iidx in clause_range {
        if feedback[iidx] == 0 {
            continue;
        }

        if response_error < 0 {
            let (pos_row, neg_row) = matrix.row_pair_mut(iidx);
            let (pos_signum, neg_signum) = signum.row_pair_mut(iidx);

            if !clause_output[iidx] {
                fcache.refill(frng);
                block1(
                    n_features, n_states, s_inv, pos_row, neg_row, pos_signum, neg_signum, fcache
                );
            } else {
                fcache.refill(frng);
                block2(
                    n_states, s_inv, boost, pos_row, neg_row, pos_signum, neg_signum, x, fcache
                );
            }
        } else if response_error > 0 && clause_output[iidx] {
            let (pos_row, neg_row) = matrix.row_pair_mut(iidx);
            let (pos_signum, neg_signum) = signum.row_pair_mut(iidx);

            block3(n_features, pos_row, neg_row, pos_signum, neg_signum, x);
        }
    }
}

fn check_preconditions(
    state: &TAStateWithSignum,
    clause_range: &Range<usize>,
    feedback: &[i32],
    clause_output: &[bool],
    n_states: i32,
    x: &BitVector,
    fcache: &FloatCache
) {
    assert_eq!(x.len(), state.n_features(), "input length != n_features");
    assert!(clause_range.end <= state.n_clauses());
    assert!(clause_range.end <= feedback.len());
    assert!(clause_range.end <= clause_output.len());
    assert!(fcache.capacity() >= 2 * state.n_features(), "float cache too small");
    // A bound that does not fit the counter width would truncate in the
    // kernels and corrupt the signum cache.
    assert!(
        state.matrix.counting_type().check_states(n_states).is_ok(),
        "n_states incompatible with counter width"
    );
}

/// # Overview
///
/// Classifier training pass over `clause_range`, mutating `state` in place.
///
/// Dispatch per clause: positive feedback selects the Type I kernel matching
/// the clause output (did-not-fire weakens via `block1`, fired reinforces
/// via `block2`); negative feedback on a fired clause applies Type II
/// (`block3`); zero feedback is a no-op.
///
/// # Panics
///
/// Panics when the input, feedback or output buffers do not match the
/// state's configured shape, or when `n_states` does not fit the state's
/// counter width.
#[allow(clippy::too_many_arguments)]
pub fn train_classifier_automata(
    state: &mut TAStateWithSignum,
    clause_range: Range<usize>,
    feedback: &[i32],
    clause_output: &[bool],
    n_states: i32,
    s_inv: f32,
    x: &BitVector,
    boost: bool,
    frng: &mut FastRng,
    fcache: &mut FloatCache
) {
    check_preconditions(state, &clause_range, feedback, clause_output, n_states, x, fcache);

    let signum = &mut state.signum;
    match &mut state.matrix {
        CounterMatrix::I8(m) => train_classifier_automata_t(
            m, signum, clause_range, feedback, clause_output, n_states, s_inv, x, boost, frng,
            fcache
        ),
        CounterMatrix::I16(m) => train_classifier_automata_t(
            m, signum, clause_range, feedback, clause_output, n_states, s_inv, x, boost, frng,
            fcache
        ),
        CounterMatrix::I32(m) => train_classifier_automata_t(
            m, signum, clause_range, feedback, clause_output, n_states, s_inv, x, boost, frng,
            fcache
        )
    }
}

/// # Overview
///
/// Regressor training pass over `clause_range`, mutating `state` in place.
///
/// Structurally the classifier driver with two differences: a per-clause
/// feedback of zero is an explicit skip, and the scalar `response_error`
/// sign replaces the classifier's feedback sign when selecting the kernel
/// (negative error reinforces, positive error penalizes fired clauses).
///
/// # Panics
///
/// Panics when the input, feedback or output buffers do not match the
/// state's configured shape, or when `n_states` does not fit the state's
/// counter width.
#[allow(clippy::too_many_arguments)]
pub fn train_regressor_automata(
    state: &mut TAStateWithSignum,
    clause_range: Range<usize>,
    feedback: &[i32],
    clause_output: &[bool],
    n_states: i32,
    s_inv: f32,
    response_error: i32,
    x: &BitVector,
    boost: bool,
    frng: &mut FastRng,
    fcache: &mut FloatCache
) {
    check_preconditions(state, &clause_range, feedback, clause_output, n_states, x, fcache);

    let signum = &mut state.signum;
    match &mut state.matrix {
        CounterMatrix::I8(m) => train_regressor_automata_t(
            m, signum, clause_range, feedback, clause_output, n_states, s_inv, response_error, x,
            boost, frng, fcache
        ),
        CounterMatrix::I16(m) => train_regressor_automata_t(
            m, signum, clause_range, feedback, clause_output, n_states, s_inv, response_error, x,
            boost, frng, fcache
        ),
        CounterMatrix::I32(m) => train_regressor_automata_t(
            m, signum, clause_range, feedback, clause_output, n_states, s_inv, response_error, x,
            boost, frng, fcache
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::rng_from_seed;

    const N_CLAUSES: usize = 6;
    const N_FEATURES: usize = 5;
    const N_STATES: i32 = 10;

    fn setup(seed: u64) -> (TAStateWithSignum, FastRng, FloatCache) {
        let mut igen = rng_from_seed(seed);
        let state =
            TAStateWithSignum::initialize("int16", N_CLAUSES, N_FEATURES, &mut igen).unwrap();
        let mut frng = rng_from_seed(seed.wrapping_add(1));
        let fcache = FloatCache::new(&mut frng, 2 * N_FEATURES);
        (state, frng, fcache)
    }

    #[test]
    fn zero_feedback_is_a_noop_for_classifier() {
        let (mut state, mut frng, mut fcache) = setup(1);
        let before = state.clone();
        let x = BitVector::from_bits(&[1, 0, 1, 0, 1]);
        let feedback = [0i32; N_CLAUSES];
        let output = [true; N_CLAUSES];

        train_classifier_automata(
            &mut state,
            0..N_CLAUSES,
            &feedback,
            &output,
            N_STATES,
            0.5,
            &x,
            false,
            &mut frng,
            &mut fcache
        );

        assert_eq!(state, before);
        assert_eq!(fcache.position(), 0);
    }

    #[test]
    fn zero_feedback_is_an_explicit_skip_for_regressor() {
        let (mut state, mut frng, mut fcache) = setup(2);
        let before = state.clone();
        let x = BitVector::from_bits(&[0, 1, 0, 1, 0]);
        let feedback = [0i32; N_CLAUSES];
        let output = [true; N_CLAUSES];

        train_regressor_automata(
            &mut state,
            0..N_CLAUSES,
            &feedback,
            &output,
            N_STATES,
            0.5,
            -3,
            &x,
            false,
            &mut frng,
            &mut fcache
        );

        assert_eq!(state, before);
    }

    #[test]
    fn negative_feedback_without_firing_is_a_noop() {
        let (mut state, mut frng, mut fcache) = setup(3);
        let before = state.clone();
        let x = BitVector::from_bits(&[1, 1, 0, 0, 1]);
        let feedback = [-1i32; N_CLAUSES];
        let output = [false; N_CLAUSES];

        train_classifier_automata(
            &mut state,
            0..N_CLAUSES,
            &feedback,
            &output,
            N_STATES,
            0.5,
            &x,
            false,
            &mut frng,
            &mut fcache
        );

        assert_eq!(state, before);
    }

    #[test]
    fn type_ii_dispatch_only_touches_fired_clauses() {
        let (mut state, mut frng, mut fcache) = setup(4);
        // Exclude everything so Type II has room to include.
        for r in 0..2 * N_CLAUSES {
            for c in 0..N_FEATURES {
                state.matrix.set(r, c, -1);
                state.signum.clear(r, c);
            }
        }
        let before = state.clone();
        let x = BitVector::from_bits(&[1, 0, 1, 0, 1]);
        let feedback = [-1i32; N_CLAUSES];
        let mut output = [false; N_CLAUSES];
        output[2] = true;

        train_classifier_automata(
            &mut state,
            0..N_CLAUSES,
            &feedback,
            &output,
            N_STATES,
            0.5,
            &x,
            false,
            &mut frng,
            &mut fcache
        );

        // Clause 2: negative automata at present features, positive at
        // absent ones, all lifted from -1 to 0.
        assert_eq!(state.matrix.get(5, 0), 0);
        assert_eq!(state.matrix.get(5, 2), 0);
        assert_eq!(state.matrix.get(5, 4), 0);
        assert_eq!(state.matrix.get(4, 1), 0);
        assert_eq!(state.matrix.get(4, 3), 0);

        for iidx in (0..N_CLAUSES).filter(|&i| i != 2) {
            for c in 0..N_FEATURES {
                assert_eq!(state.matrix.get(2 * iidx, c), before.matrix.get(2 * iidx, c));
                assert_eq!(
                    state.matrix.get(2 * iidx + 1, c),
                    before.matrix.get(2 * iidx + 1, c)
                );
            }
        }
        assert!(state.signum_is_consistent());
    }

    #[test]
    fn clause_range_limits_mutation() {
        let (mut state, mut frng, mut fcache) = setup(5);
        let before = state.clone();
        let x = BitVector::from_bits(&[1, 0, 0, 1, 1]);
        let feedback = [1i32; N_CLAUSES];
        let output = [true; N_CLAUSES];

        train_classifier_automata(
            &mut state,
            1..3,
            &feedback,
            &output,
            N_STATES,
            0.9,
            &x,
            true,
            &mut frng,
            &mut fcache
        );

        for iidx in [0usize, 3, 4, 5] {
            for c in 0..N_FEATURES {
                assert_eq!(state.matrix.get(2 * iidx, c), before.matrix.get(2 * iidx, c));
                assert_eq!(
                    state.matrix.get(2 * iidx + 1, c),
                    before.matrix.get(2 * iidx + 1, c)
                );
            }
        }
        assert!(state.signum_is_consistent());
    }

    #[test]
    fn signum_stays_consistent_under_mixed_feedback() {
        let (mut state, mut frng, mut fcache) = setup(6);
        let mut rng = rng_from_seed(77);

        for step in 0..200 {
            use rand::Rng;
            let bits: Vec<u8> = (0..N_FEATURES).map(|_| rng.random_range(0..=1)).collect();
            let x = BitVector::from_bits(&bits);
            let feedback: Vec<i32> =
                (0..N_CLAUSES).map(|_| rng.random_range(-1..=1)).collect();
            let output: Vec<bool> = (0..N_CLAUSES).map(|_| rng.random::<bool>()).collect();

            train_classifier_automata(
                &mut state,
                0..N_CLAUSES,
                &feedback,
                &output,
                N_STATES,
                0.25,
                &x,
                step % 2 == 0,
                &mut frng,
                &mut fcache
            );

            assert!(state.signum_is_consistent(), "diverged at step {step}");
        }
    }

    #[test]
    fn classifier_replay_is_bit_identical() {
        let x = BitVector::from_bits(&[1, 1, 0, 1, 0]);
        let feedback = [1, -1, 1, 0, -1, 1];
        let output = [true, true, false, true, false, true];

        let run = || {
            let (mut state, mut frng, mut fcache) = setup(9);
            for _ in 0..50 {
                train_classifier_automata(
                    &mut state,
                    0..N_CLAUSES,
                    &feedback,
                    &output,
                    N_STATES,
                    0.4,
                    &x,
                    false,
                    &mut frng,
                    &mut fcache
                );
            }
            state
        };

        assert_eq!(run(), run());
    }

    #[test]
    #[should_panic(expected = "n_states incompatible with counter width")]
    fn oversized_states_fail_fast_on_narrow_counters() {
        // -200 as i8 wraps to 56; left unchecked, the frozen decrements
        // would desync the signum cache instead of erroring.
        let mut igen = rng_from_seed(11);
        let mut state = TAStateWithSignum::initialize("int8", 2, 4, &mut igen).unwrap();
        let mut frng = rng_from_seed(12);
        let mut fcache = FloatCache::new(&mut frng, 8);
        let x = BitVector::from_bits(&[1, 0, 1, 0]);
        let feedback = [1i32; 2];
        let output = [false; 2];

        train_classifier_automata(
            &mut state,
            0..2,
            &feedback,
            &output,
            200,
            1.0,
            &x,
            false,
            &mut frng,
            &mut fcache
        );
    }

    #[test]
    fn regressor_reinforces_on_negative_error() {
        let (mut state, mut frng, mut fcache) = setup(10);
        let before = state.clone();
        let x = BitVector::from_bits(&[1, 0, 1, 0, 1]);
        let feedback = [1i32; N_CLAUSES];
        let output = [true; N_CLAUSES];

        train_regressor_automata(
            &mut state,
            0..N_CLAUSES,
            &feedback,
            &output,
            N_STATES,
            -1.0,
            -2,
            &x,
            true,
            &mut frng,
            &mut fcache
        );

        // Boost with a negative s_inv makes block2 a pure reward pass: every
        // automaton matching its literal moves up by one.
        for iidx in 0..N_CLAUSES {
            for c in 0..N_FEATURES {
                let expected_pos = if x.test(c) {
                    (before.matrix.get(2 * iidx, c) + 1).min(N_STATES - 1)
                } else {
                    before.matrix.get(2 * iidx, c)
                };
                let expected_neg = if x.test(c) {
                    before.matrix.get(2 * iidx + 1, c)
                } else {
                    (before.matrix.get(2 * iidx + 1, c) + 1).min(N_STATES - 1)
                };
                assert_eq!(state.matrix.get(2 * iidx, c), expected_pos);
                assert_eq!(state.matrix.get(2 * iidx + 1, c), expected_neg);
            }
        }
        assert!(state.signum_is_consistent());
    }
}
