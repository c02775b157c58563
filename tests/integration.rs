//! Integration tests driving the trainer and evaluator together the way an
//! estimator layer would: evaluate clause outputs, derive feedback, train,
//! repeat.

use rand::Rng;
use tsetlin_core::{
    BitVector, Config, EstimatorStateCache, TAStateWithSignum, evaluate_clause_outputs,
    evaluate_clause_outputs_for_predict, rng::rng_from_seed, train_classifier_automata,
    train_regressor_automata
};

fn random_input<R: Rng>(n_features: usize, rng: &mut R) -> BitVector {
    let bits: Vec<u8> = (0..n_features).map(|_| rng.random_range(0..=1)).collect();
    BitVector::from_bits(&bits)
}

/// Simple surrogate for the upstream voting stage: clauses alternate
/// polarity, feedback pushes even clauses toward the label and odd clauses
/// away from it.
fn derive_feedback(label: u8, n_clauses: usize, feedback: &mut [i32]) {
    for (i, slot) in feedback.iter_mut().enumerate().take(n_clauses) {
        let polarity = if i % 2 == 0 { 1 } else { -1 };
        *slot = if label == 1 { polarity } else { -polarity };
    }
}

fn train_epochs(counting_type: &str, seed: u64, epochs: usize) -> TAStateWithSignum {
    let config = Config::builder()
        .clauses(16)
        .features(12)
        .states(20)
        .specificity(3.9)
        .build()
        .unwrap();

    let mut igen = rng_from_seed(seed);
    let mut state = TAStateWithSignum::initialize(
        counting_type,
        config.n_clauses,
        config.n_features,
        &mut igen
    )
    .unwrap();

    let mut frng = rng_from_seed(seed.wrapping_add(1));
    let mut cache = EstimatorStateCache::new(&config, &mut frng);
    let mut data_rng = rng_from_seed(seed.wrapping_add(2));

    for _ in 0..epochs {
        let x = random_input(config.n_features, &mut data_rng);
        let label = data_rng.random_range(0..=1u8);

        evaluate_clause_outputs(
            &state,
            &x,
            0..config.n_clauses,
            config.n_jobs,
            &mut cache.clause_output
        );
        derive_feedback(label, config.n_clauses, &mut cache.feedback_to_clauses);

        train_classifier_automata(
            &mut state,
            0..config.n_clauses,
            &cache.feedback_to_clauses,
            &cache.clause_output,
            config.n_states,
            config.s_inv(),
            &x,
            config.boost_true_positive_feedback,
            &mut frng,
            &mut cache.fcache
        );
    }

    state
}

#[test]
fn signum_invariant_survives_training() {
    let state = train_epochs("int16", 42, 300);
    assert!(state.signum_is_consistent());
}

#[test]
fn counters_stay_in_range() {
    let state = train_epochs("int8", 7, 500);

    let (nrows, ncols) = state.matrix.shape();
    for r in 0..nrows {
        for c in 0..ncols {
            let v = state.matrix.get(r, c);
            assert!((-20..20).contains(&v), "counter ({r},{c}) = {v} out of range");
        }
    }
}

#[test]
fn deterministic_replay_is_bit_identical() {
    let a = train_epochs("int32", 123, 200);
    let b = train_epochs("int32", 123, 200);

    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge() {
    let a = train_epochs("int32", 1, 200);
    let b = train_epochs("int32", 2, 200);

    assert_ne!(a, b);
}

#[test]
fn counter_widths_share_semantics() {
    let narrow = train_epochs("int8", 55, 250);
    let medium = train_epochs("int16", 55, 250);
    let wide = train_epochs("int32", 55, 250);

    let (nrows, ncols) = wide.matrix.shape();
    for r in 0..nrows {
        for c in 0..ncols {
            assert_eq!(narrow.matrix.get(r, c), wide.matrix.get(r, c));
            assert_eq!(medium.matrix.get(r, c), wide.matrix.get(r, c));
        }
    }
    assert_eq!(narrow.signum, wide.signum);
    assert_eq!(medium.signum, wide.signum);
}

#[test]
fn prediction_vetoes_empty_clauses_after_reset() {
    let config = Config::builder().clauses(8).features(10).build().unwrap();
    let mut igen = rng_from_seed(3);
    let mut state =
        TAStateWithSignum::initialize("int16", config.n_clauses, config.n_features, &mut igen)
            .unwrap();

    // Force every automaton out of its clause.
    for r in 0..2 * config.n_clauses {
        for c in 0..config.n_features {
            state.matrix.set(r, c, -1);
            state.signum.clear(r, c);
        }
    }

    let mut data_rng = rng_from_seed(4);
    let x = random_input(config.n_features, &mut data_rng);

    let mut train_out = vec![false; config.n_clauses];
    let mut predict_out = vec![false; config.n_clauses];
    evaluate_clause_outputs(&state, &x, 0..config.n_clauses, 1, &mut train_out);
    evaluate_clause_outputs_for_predict(&state, &x, 1, &mut predict_out);

    assert!(train_out.iter().all(|&o| o), "training rule lets empty clauses fire");
    assert!(predict_out.iter().all(|&o| !o), "prediction rule must veto them");
}

#[test]
fn regressor_driver_replays_deterministically() {
    let run = || {
        let config = Config::builder()
            .clauses(12)
            .features(8)
            .states(15)
            .build()
            .unwrap();
        let mut igen = rng_from_seed(21);
        let mut state = TAStateWithSignum::initialize(
            "int16",
            config.n_clauses,
            config.n_features,
            &mut igen
        )
        .unwrap();
        let mut frng = rng_from_seed(22);
        let mut cache = EstimatorStateCache::new(&config, &mut frng);
        let mut data_rng = rng_from_seed(23);

        for step in 0..150 {
            let x = random_input(config.n_features, &mut data_rng);
            let response_error: i32 = data_rng.random_range(-4..=4);

            evaluate_clause_outputs(
                &state,
                &x,
                0..config.n_clauses,
                1,
                &mut cache.clause_output
            );
            for slot in cache.feedback_to_clauses.iter_mut() {
                *slot = if step % 5 == 0 { 0 } else { 1 };
            }

            train_regressor_automata(
                &mut state,
                0..config.n_clauses,
                &cache.feedback_to_clauses,
                &cache.clause_output,
                config.n_states,
                config.s_inv(),
                response_error,
                &x,
                false,
                &mut frng,
                &mut cache.fcache
            );
            assert!(state.signum_is_consistent());
        }
        state
    };

    assert_eq!(run(), run());
}

#[test]
fn parallel_evaluation_matches_serial() {
    let config = Config::builder()
        .clauses(32)
        .features(64 * 20) // enough blocks to take the batched path
        .build()
        .unwrap();
    let mut igen = rng_from_seed(31);
    let mut state =
        TAStateWithSignum::initialize("int8", config.n_clauses, config.n_features, &mut igen)
            .unwrap();

    // Scatter inclusions so outputs vary.
    let mut scatter = rng_from_seed(32);
    for r in 0..2 * config.n_clauses {
        for c in 0..config.n_features {
            let v = scatter.random_range(-2..=1);
            state.matrix.set(r, c, v);
            if v < 0 {
                state.signum.clear(r, c);
            } else {
                state.signum.set(r, c);
            }
        }
    }

    let mut data_rng = rng_from_seed(33);
    let x = random_input(config.n_features, &mut data_rng);

    let mut serial = vec![false; config.n_clauses];
    let mut parallel = vec![false; config.n_clauses];
    evaluate_clause_outputs(&state, &x, 0..config.n_clauses, 1, &mut serial);
    evaluate_clause_outputs(&state, &x, 0..config.n_clauses, 4, &mut parallel);

    assert_eq!(serial, parallel);
}
