use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sortrace::TraceError;
use sortrace::action::{ExternalAction, ExternalActionKind};
use sortrace::core::compare_keys;
use sortrace::merge::{MULTIWAY_FAN_IN, MergeAlgorithm, build_actions};
use sortrace::record::Record;
use sortrace::replay::{OrderReplay, replay_merge};
use std::collections::HashSet;

fn keyed(keys: &[&str]) -> Vec<Record> {
    Record::from_rows(keys.iter().map(|k| vec![k.to_string(), format!("payload {k}")]))
}

fn kinds(actions: &[ExternalAction], kind: ExternalActionKind) -> Vec<&ExternalAction> {
    actions.iter().filter(|a| a.kind == kind).collect()
}

/// Ids ordered by a stable sort on the key column.
fn expected_order(records: &[Record], column: usize) -> Vec<usize> {
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| compare_keys(a.cell(column), b.cell(column)));
    sorted.iter().map(|r| r.id()).collect()
}

#[test]
fn test_straight_scenario() {
    let records = keyed(&["b", "a", "c"]);
    let actions = build_actions(&records, MergeAlgorithm::Straight, 0, "key");
    assert_eq!(replay_merge(&records, &actions), vec![1, 0, 2]);
}

#[test]
fn test_first_move_semantics() {
    let records = keyed(&["2", "1"]);
    let actions = build_actions(&records, MergeAlgorithm::Straight, 0, "key");

    let kinds: Vec<_> = actions.iter().map(|a| a.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ExternalActionKind::Compare,
            ExternalActionKind::Move,
            ExternalActionKind::PassComplete,
            ExternalActionKind::Finished,
        ]
    );

    let compare = &actions[0];
    assert_eq!((compare.row_id_a, compare.row_id_b), (Some(0), Some(1)));
    assert_eq!(compare.value_a.as_deref(), Some("2"));
    assert_eq!(compare.value_b.as_deref(), Some("1"));

    let moved = &actions[1];
    assert_eq!(moved.row_id_a, Some(1));
    assert_eq!((moved.source_index, moved.target_index), (Some(1), Some(0)));
    assert_eq!(moved.value_a.as_deref(), Some("1 | payload 1"));

    assert_eq!(actions[2].pass_number, Some(1));
    assert_eq!(actions[2].run_size, Some(1));
}

#[test]
fn test_empty_input() {
    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&[], algorithm, 0, "key");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ExternalActionKind::Finished);
    }
}

#[test]
fn test_single_row() {
    let records = keyed(&["only"]);
    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&records, algorithm, 0, "key");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].kind, ExternalActionKind::Finished);
    }
}

#[test]
fn test_numeric_keys_compare_as_numbers() {
    let records = keyed(&["10", "9", "100", " 9.5 "]);
    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&records, algorithm, 0, "n");
        assert_eq!(replay_merge(&records, &actions), vec![1, 3, 0, 2], "{algorithm}");
    }
}

#[test]
fn test_text_keys_ignore_case() {
    let records = keyed(&["banana", "Apple", "cherry", "apple"]);
    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&records, algorithm, 0, "fruit");
        // Equal keys keep their input order.
        assert_eq!(replay_merge(&records, &actions), vec![1, 3, 0, 2], "{algorithm}");
    }
}

#[test]
fn test_natural_sorted_input_finishes_immediately() {
    let records = keyed(&["1", "2", "2", "3", "10"]);
    let actions = build_actions(&records, MergeAlgorithm::Natural, 0, "n");

    assert_eq!(actions.len(), 1);
    assert_eq!(actions[0].kind, ExternalActionKind::Finished);
}

#[test]
fn test_natural_reports_detected_runs() {
    // Runs: [5] [3 4] [1 2] -> 3 runs, then [3 4 5] [1 2] -> 2 runs.
    let records = keyed(&["5", "3", "4", "1", "2"]);
    let actions = build_actions(&records, MergeAlgorithm::Natural, 0, "n");

    let counts: Vec<_> = kinds(&actions, ExternalActionKind::PassComplete)
        .iter()
        .map(|a| (a.pass_number, a.run_count))
        .collect();
    assert_eq!(counts, vec![(Some(1), Some(3)), (Some(2), Some(2))]);
    assert_eq!(replay_merge(&records, &actions), vec![3, 4, 1, 2, 0]);
}

#[test]
fn test_straight_and_multiway_pass_counts() {
    let keys: Vec<String> = (0..10).rev().map(|i| i.to_string()).collect();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let records = keyed(&refs);

    let straight = build_actions(&records, MergeAlgorithm::Straight, 0, "n");
    let sizes: Vec<_> = kinds(&straight, ExternalActionKind::PassComplete)
        .iter()
        .map(|a| a.run_size)
        .collect();
    assert_eq!(sizes, vec![Some(1), Some(2), Some(4), Some(8)]);

    let multiway = build_actions(&records, MergeAlgorithm::Multiway, 0, "n");
    let sizes: Vec<_> = kinds(&multiway, ExternalActionKind::PassComplete)
        .iter()
        .map(|a| a.run_size)
        .collect();
    assert_eq!(sizes, vec![Some(1), Some(MULTIWAY_FAN_IN), Some(MULTIWAY_FAN_IN * MULTIWAY_FAN_IN)]);

    let expected: Vec<usize> = (0..10).rev().collect();
    assert_eq!(replay_merge(&records, &straight), expected);
    assert_eq!(replay_merge(&records, &multiway), expected);
}

#[test]
fn test_negative_key_column_is_clamped() {
    let records = Record::from_rows(vec![vec!["b", "2"], vec!["a", "1"]]);
    let clamped = build_actions(&records, MergeAlgorithm::Straight, -3, "first");
    let explicit = build_actions(&records, MergeAlgorithm::Straight, 0, "first");
    assert_eq!(clamped, explicit);
}

#[test]
fn test_missing_key_column_keeps_order() {
    let records = keyed(&["c", "b", "a"]);
    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&records, algorithm, 12, "");
        assert!(kinds(&actions, ExternalActionKind::Move).is_empty());
        assert_eq!(replay_merge(&records, &actions), vec![0, 1, 2]);
    }
}

#[test]
fn test_blank_label_names_column() {
    let records = keyed(&["b", "a"]);
    let actions = build_actions(&records, MergeAlgorithm::Straight, 1, "  ");
    assert!(actions[0].message.contains("Column 2"), "{}", actions[0].message);
}

#[test]
fn test_ids_are_stable_and_never_invented() {
    let records = vec![
        Record::new(17, vec!["c".into()]),
        Record::new(4, vec!["a".into()]),
        Record::new(9, vec!["b".into()]),
    ];
    let known: HashSet<usize> = records.iter().map(Record::id).collect();

    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&records, algorithm, 0, "key");
        for action in &actions {
            for id in [action.row_id_a, action.row_id_b].into_iter().flatten() {
                assert!(known.contains(&id), "{algorithm} invented id {id}");
            }
        }
        assert_eq!(replay_merge(&records, &actions), vec![4, 9, 17], "{algorithm}");
    }
}

#[test]
fn test_moves_always_go_left() {
    let mut rng = StdRng::seed_from_u64(11);
    let keys: Vec<String> = (0..60).map(|_| rng.random_range(0..25).to_string()).collect();
    let refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    let records = keyed(&refs);

    for algorithm in MergeAlgorithm::ALL {
        let actions = build_actions(&records, algorithm, 0, "n");
        let mut state = OrderReplay::new(&records);
        for action in &actions {
            if action.kind == ExternalActionKind::Move {
                let (source, target) = (action.source_index.unwrap(), action.target_index.unwrap());
                assert!(target < source);
                assert_eq!(state.order()[source], action.row_id_a.unwrap());
            }
            state.apply(action);
        }
        assert!(state.is_finished());
    }
}

#[test]
fn test_fuzz_matches_stable_sort() {
    let mut rng = rand::rng();
    for algorithm in MergeAlgorithm::ALL {
        for _ in 0..100 {
            let len = rng.random_range(0..50);
            let numeric = rng.random_bool(0.5);
            let rows: Vec<Vec<String>> = (0..len)
                .map(|i| {
                    let key = if numeric {
                        rng.random_range(-30..30).to_string()
                    } else {
                        (0..rng.random_range(1..4))
                            .map(|_| rng.random_range(b'a'..=b'e') as char)
                            .collect()
                    };
                    vec![format!("row{i}"), key]
                })
                .collect();
            let records = Record::from_rows(rows);

            let actions = build_actions(&records, algorithm, 1, "key");
            let finished = kinds(&actions, ExternalActionKind::Finished);
            assert_eq!(finished.len(), 1);
            assert_eq!(actions.last().map(|a| a.kind), Some(ExternalActionKind::Finished));
            assert_eq!(replay_merge(&records, &actions), expected_order(&records, 1), "{algorithm}");
        }
    }
}

#[test]
fn test_inconsistent_keys_terminate() {
    // "9" < "10" numerically, "10" < "1a" and "1a" < "9" as text.
    let records = keyed(&["1a", "10", "9", "1a", "9", "10", "9", "1a"]);
    let actions = build_actions(&records, MergeAlgorithm::Natural, 0, "mixed");
    assert_eq!(actions.last().map(|a| a.kind), Some(ExternalActionKind::Finished));
}

#[test]
fn test_algorithm_from_str() {
    assert_eq!("NATURAL".parse::<MergeAlgorithm>().unwrap(), MergeAlgorithm::Natural);
    for algorithm in MergeAlgorithm::ALL {
        assert_eq!(algorithm.to_string().parse::<MergeAlgorithm>().unwrap(), algorithm);
    }
    let err = "polyphase".parse::<MergeAlgorithm>().unwrap_err();
    assert!(matches!(err, TraceError::UnknownAlgorithm { family: "merge", .. }));
}
