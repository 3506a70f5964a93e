use markov_cohort::parameters::ParameterInputs;
use markov_cohort::simulation::simulate_patient;
use markov_cohort::statistics::{t_confidence_interval, IndependentSamples, SummaryStat};
use markov_cohort::{HealthState, ModelParameters, ParameterSource, ParameterTable, Therapy, TransitionMatrix};
use proptest::prelude::*;

/// Three positive weights normalized into a probability row with an absorbing `Dead` column.
fn row() -> impl Strategy<Value = [f64; 4]> {
    (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.01f64..1.0).prop_map(|(a, b, c, d)| {
        let total = a + b + c + d;
        [a / total, b / total, c / total, d / total]
    })
}

fn matrix() -> impl Strategy<Value = [[f64; 4]; 4]> {
    (row(), row(), row()).prop_map(|(well, stroke, post)| [well, stroke, post, [0.0, 0.0, 0.0, 1.0]])
}

proptest! {
    #[test]
    fn valid_rows_sum_to_one(rows in matrix()) {
        let m = TransitionMatrix::new(rows).unwrap();
        for state in HealthState::ALL {
            prop_assert!((m.row_sum(state) - 1.0).abs() <= 1e-9);
        }
    }

    #[test]
    fn built_in_model_rows_sum_to_one(rr in 0.0f64..1.0) {
        let table = ParameterTable::stroke_model();
        for therapy in Therapy::ALL {
            let params = table.parameters(therapy).unwrap();
            let scaled = params.transitions().with_relative_risk(HealthState::Stroke, rr).unwrap();
            for state in HealthState::ALL {
                prop_assert!((params.transitions().row_sum(state) - 1.0).abs() <= 1e-9);
                prop_assert!((scaled.row_sum(state) - 1.0).abs() <= 1e-9);
            }
        }
    }

    #[test]
    fn survival_never_exceeds_horizon(rows in matrix(), horizon in 1usize..40, seed in any::<u64>()) {
        let params = ModelParameters::new(ParameterInputs {
            therapy: Therapy::None,
            transitions: TransitionMatrix::new(rows).unwrap(),
            state_costs: [0.0, 5_000.0, 200.0, 0.0],
            state_utilities: [1.0, 0.2, 0.75, 0.0],
            discount_rate: 0.03,
            cycle_length: 1.0,
            horizon,
            initial_distribution: [1.0, 0.0, 0.0, 0.0],
        })
        .unwrap();
        let outcome = simulate_patient(&params, seed);
        prop_assert!(outcome.survival_time <= horizon as f64);
        prop_assert!(outcome.survival_time >= 1.0);
        prop_assert!(outcome.stroke_count as usize <= horizon);
        prop_assert_eq!(outcome.developed_stroke, outcome.stroke_count > 0);
    }

    #[test]
    fn constant_data_has_zero_width_interval(c in -1e6f64..1e6, n in 2usize..60) {
        let data = vec![c; n];
        let stat = SummaryStat::compute("constant", &data, 0.05).unwrap();
        prop_assert_eq!(stat.mean, c);
        prop_assert_eq!(stat.confidence_interval.width(), 0.0);
        prop_assert_eq!(t_confidence_interval(&data, 0.05).unwrap().width(), 0.0);
    }

    #[test]
    fn identical_samples_have_no_difference(data in prop::collection::vec(-1e3f64..1e3, 2..50)) {
        let samples = IndependentSamples::new(&data, &data).unwrap();
        prop_assert!(samples.mean_difference().abs() < 1e-9);
        let ci = samples.t_confidence_interval(0.05).unwrap();
        prop_assert!(ci.contains(0.0));
    }
}
