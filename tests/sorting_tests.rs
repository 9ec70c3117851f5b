use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sortrace::TraceError;
use sortrace::action::{SortAction, SortActionKind};
use sortrace::replay::{ArrayReplay, replay_sort};
use sortrace::sorting::{RANDOM_LENGTH, RANDOM_VALUES, SortAlgorithm, build_actions, parse_values, random_values};

fn pass_indices(actions: &[SortAction]) -> Vec<usize> {
    actions
        .iter()
        .filter(|a| a.kind == SortActionKind::PassComplete)
        .filter_map(|a| a.index_a)
        .collect()
}

fn assert_single_trailing_finished(actions: &[SortAction]) {
    let finished = actions.iter().filter(|a| a.kind == SortActionKind::Finished).count();
    assert_eq!(finished, 1, "expected exactly one Finished");
    assert_eq!(actions.last().map(|a| a.kind), Some(SortActionKind::Finished));
}

#[test]
fn test_bubble_scenario() {
    let input = [5, 3, 8, 1];
    let actions = build_actions(&input, SortAlgorithm::Bubble);

    assert_eq!(replay_sort(&input, &actions), vec![1, 3, 5, 8]);
    // One pass per element, each fixing index n - i - 1.
    assert_eq!(pass_indices(&actions), vec![3, 2, 1, 0]);
    assert_single_trailing_finished(&actions);
}

#[test]
fn test_bubble_pass_numbers() {
    let actions = build_actions(&[2, 1, 3], SortAlgorithm::Bubble);
    let passes: Vec<Option<usize>> = actions
        .iter()
        .filter(|a| a.kind == SortActionKind::PassComplete)
        .map(|a| a.pass_number)
        .collect();
    assert_eq!(passes, vec![Some(1), Some(2), Some(3)]);
}

#[test]
fn test_empty_input() {
    for algorithm in SortAlgorithm::ALL {
        let actions = build_actions(&[], algorithm);
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, SortActionKind::Finished);
        assert!(!actions[0].message.is_empty());
    }
}

#[test]
fn test_single_element() {
    for algorithm in SortAlgorithm::ALL {
        let actions = build_actions(&[42], algorithm);
        assert_single_trailing_finished(&actions);
        assert_eq!(replay_sort(&[42], &actions), vec![42]);
        assert!(actions.iter().all(|a| a.kind != SortActionKind::Swap));
    }
}

#[test]
fn test_input_is_not_mutated() {
    let input = vec![3, 2, 1];
    let copy = input.clone();
    for algorithm in SortAlgorithm::ALL {
        let _ = build_actions(&input, algorithm);
    }
    assert_eq!(input, copy);
}

#[test]
fn test_bubble_swap_sequence() {
    let actions = build_actions(&[2, 1], SortAlgorithm::Bubble);
    let swap = &actions[1];
    assert_eq!(swap.kind, SortActionKind::Swap);
    assert_eq!((swap.index_a, swap.index_b), (Some(0), Some(1)));
    // Values are the pre-swap snapshot.
    assert_eq!((swap.value_a, swap.value_b), (Some(2), Some(1)));
}

#[test]
fn test_insertion_marks_prefix() {
    let actions = build_actions(&[4, 3, 2, 1], SortAlgorithm::Insertion);
    let passes: Vec<(Option<usize>, Option<usize>)> = actions
        .iter()
        .filter(|a| a.kind == SortActionKind::PassComplete)
        .map(|a| (a.index_a, a.index_b))
        .collect();
    assert_eq!(passes, vec![(Some(1), Some(0)), (Some(2), Some(0)), (Some(3), Some(0))]);

    // Reversed input: every comparison is followed by a swap.
    let compares = actions.iter().filter(|a| a.kind == SortActionKind::Compare).count();
    let swaps = actions.iter().filter(|a| a.kind == SortActionKind::Swap).count();
    assert_eq!(compares, 6);
    assert_eq!(swaps, 6);
}

#[test]
fn test_insertion_sorted_input_has_no_swaps() {
    let actions = build_actions(&[1, 2, 3, 4, 5], SortAlgorithm::Insertion);
    assert!(actions.iter().all(|a| a.kind != SortActionKind::Swap));
    assert_eq!(actions.iter().filter(|a| a.kind == SortActionKind::Compare).count(), 4);
}

#[test]
fn test_heap_extraction_order() {
    let input = [4, 10, 3, 5, 1];
    let actions = build_actions(&input, SortAlgorithm::Heap);

    assert_eq!(pass_indices(&actions), vec![4, 3, 2, 1, 0]);
    assert_eq!(replay_sort(&input, &actions), vec![1, 3, 4, 5, 10]);

    // Every extraction swaps the root with the tail slot it then fixes.
    for window in actions.windows(2) {
        if window[1].kind == SortActionKind::PassComplete && window[1].index_a != Some(0) {
            assert_eq!(window[0].kind, SortActionKind::Swap);
            assert_eq!(window[0].index_a, Some(0));
            assert_eq!(window[0].index_b, window[1].index_a);
        }
    }
}

#[test]
fn test_quick_pivot_precedes_partition() {
    let input = [3, 1, 2];
    let actions = build_actions(&input, SortAlgorithm::Quick);

    assert_eq!(actions[0].kind, SortActionKind::PivotSelect);
    assert_eq!(actions[0].index_a, Some(2));
    assert_eq!(actions[0].value_a, Some(2));
    assert_eq!(replay_sort(&input, &actions), vec![1, 2, 3]);
}

#[test]
fn test_quick_fixes_every_index_once() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..50 {
        let len = rng.random_range(1..30);
        let input: Vec<i64> = (0..len).map(|_| rng.random_range(-20..20)).collect();
        let actions = build_actions(&input, SortAlgorithm::Quick);

        let mut fixed = pass_indices(&actions);
        fixed.sort_unstable();
        assert_eq!(fixed, (0..len).collect::<Vec<_>>());
    }
}

#[test]
fn test_snapshots_match_replayed_state() {
    let mut rng = StdRng::seed_from_u64(42);
    for algorithm in SortAlgorithm::ALL {
        for _ in 0..30 {
            let len = rng.random_range(0..25);
            let input: Vec<i64> = (0..len).map(|_| rng.random_range(-100..100)).collect();
            let actions = build_actions(&input, algorithm);

            let mut state = ArrayReplay::new(&input);
            for action in &actions {
                if matches!(action.kind, SortActionKind::Compare | SortActionKind::Swap) {
                    let (a, b) = (action.index_a.unwrap(), action.index_b.unwrap());
                    assert_eq!(action.value_a, Some(state.values()[a]), "{algorithm}: {action:?}");
                    assert_eq!(action.value_b, Some(state.values()[b]), "{algorithm}: {action:?}");
                }
                state.apply(action);
            }
            assert!(state.is_finished());
        }
    }
}

#[test]
fn test_fuzz_replay_matches_std_sort() {
    let mut rng = rand::rng();
    for algorithm in SortAlgorithm::ALL {
        for _ in 0..200 {
            let len = rng.random_range(0..40);
            let input: Vec<i64> = (0..len).map(|_| rng.random_range(-50..50)).collect();

            let actions = build_actions(&input, algorithm);
            assert_single_trailing_finished(&actions);

            let mut expected = input.clone();
            expected.sort();
            assert_eq!(replay_sort(&input, &actions), expected, "{algorithm} on {input:?}");
        }
    }
}

#[test]
fn test_fuzz_edge_cases() {
    let cases: Vec<Vec<i64>> = vec![
        vec![7; 20],
        (0..20).rev().collect(),
        (0..20).collect(),
        vec![i64::MIN, i64::MAX, 0, -1, 1],
    ];

    for algorithm in SortAlgorithm::ALL {
        for input in &cases {
            let actions = build_actions(input, algorithm);
            let mut expected = input.clone();
            expected.sort();
            assert_eq!(replay_sort(input, &actions), expected, "{algorithm} on {input:?}");
        }
    }
}

#[test]
fn test_algorithm_from_str() {
    assert_eq!("Quick".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Quick);
    assert_eq!(" heap ".parse::<SortAlgorithm>().unwrap(), SortAlgorithm::Heap);
    for algorithm in SortAlgorithm::ALL {
        assert_eq!(algorithm.to_string().parse::<SortAlgorithm>().unwrap(), algorithm);
    }

    let err = "shell".parse::<SortAlgorithm>().unwrap_err();
    assert!(matches!(err, TraceError::UnknownAlgorithm { family: "sort", .. }));
}

#[test]
fn test_parse_values() {
    assert_eq!(parse_values("5 3\n8;1,-2").unwrap(), vec![5, 3, 8, 1, -2]);
    assert!(parse_values("").unwrap().is_empty());

    let err = parse_values("1 two 3").unwrap_err();
    assert!(matches!(err, TraceError::InvalidValue { ref token } if token == "two"));
}

#[test]
fn test_random_values_ranges() {
    let mut rng = StdRng::seed_from_u64(136);
    let mut lengths = Vec::new();

    for _ in 0..200 {
        let values = random_values(&mut rng);
        assert!(RANDOM_LENGTH.contains(&values.len()), "length {}", values.len());
        assert!(values.iter().all(|v| RANDOM_VALUES.contains(v)), "values {:?}", values);
        lengths.push(values.len());
    }

    assert_eq!(lengths.iter().min(), Some(&6));
    assert_eq!(lengths.iter().max(), Some(&10));
}

#[test]
fn test_random_values_sort_cleanly() {
    let values = random_values(&mut rand::rng());
    let mut expected = values.clone();
    expected.sort();

    for algorithm in SortAlgorithm::ALL {
        let actions = build_actions(&values, algorithm);
        assert_eq!(replay_sort(&values, &actions), expected);
    }
}
