//! Property tests for history bounds and undo/redo.

use calc_core::{BuiltinOperation, Calculator, CalculatorConfig, Operation};
use proptest::prelude::*;

fn token_strategy() -> impl Strategy<Value = BuiltinOperation> {
    proptest::sample::select(BuiltinOperation::ALL.to_vec())
}

proptest! {
    #[test]
    fn test_history_never_exceeds_bound(
        max_size in 1usize..8,
        operands in proptest::collection::vec((-1e6f64..1e6, -1e6f64..1e6), 0..40),
    ) {
        let config = CalculatorConfig::default().with_max_history_size(max_size);
        let mut calc = Calculator::new(config).unwrap();
        for (a, b) in operands {
            calc.compute("add", a, b).unwrap();
            prop_assert!(calc.history().len() <= max_size);
        }
    }

    #[test]
    fn test_compute_matches_operation(op in token_strategy(), a in -1e3f64..1e3, b in -1e3f64..1e3) {
        let config = CalculatorConfig::default().with_precision(6);
        let mut calc = Calculator::new(config).unwrap();
        match (op.execute(a, b), calc.compute(op.token(), a, b)) {
            (Ok(expected), Ok(record)) => {
                prop_assert_eq!(record.result, calc_core::round_to_precision(expected, 6));
                prop_assert_eq!(calc.history().len(), 1);
            }
            (Err(expected), Err(actual)) => {
                prop_assert_eq!(expected.kind(), actual.kind());
                prop_assert!(calc.history().is_empty());
            }
            (expected, actual) => {
                prop_assert!(false, "mismatch: {:?} vs {:?}", expected, actual);
            }
        }
    }

    #[test]
    fn test_undo_redo_is_identity(steps in 1usize..10, undos in 0usize..10) {
        let mut calc = Calculator::new(CalculatorConfig::default()).unwrap();
        for step in 0..steps {
            calc.compute("multiply", step as f64, 2.0).unwrap();
        }
        let mut states = vec![calc.history().records()];
        let mut performed = 0;
        for _ in 0..undos {
            if !calc.undo() {
                break;
            }
            performed += 1;
            states.push(calc.history().records());
        }
        prop_assert_eq!(performed, undos.min(steps));
        states.pop();
        while let Some(expected) = states.pop() {
            prop_assert!(calc.redo());
            prop_assert_eq!(calc.history().records(), expected);
        }
        prop_assert!(!calc.redo());
    }
}
