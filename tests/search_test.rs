//! Search strategy tests on toy protocols with known state graphs.

mod common;

use common::{always_valid, dial_at, dial_model, dial_value};
use protocheck::pingpong::{self, Server};
use protocheck::{
    batch_random_walk_find, batch_random_walk_validate, bfs_find, bfs_find_all, find_path,
    format_path, par_bfs_find_all, random_walk_validate, DeterministicRng, EventKind, State,
};
use std::sync::Arc;

// =============================================================================
// Breadth-first search
// =============================================================================

#[test]
fn test_bfs_finds_goal_on_cyclic_graph() {
    let result = bfs_find(dial_model(6), always_valid, dial_at(3), None);

    assert!(result.success);
    assert_eq!(result.targets[0].depth(), 3);
    // Six positions on the ring, each dequeued at most once
    assert!(result.explored <= 6, "explored {}", result.explored);
}

#[test]
fn test_unbounded_bfs_terminates_on_finite_graph() {
    let result = bfs_find(dial_model(6), always_valid, dial_at(42), None);

    assert!(result.is_exhausted());
    assert_eq!(result.explored, 6);
}

#[test]
fn test_bfs_limit_hides_deep_goal() {
    let result = bfs_find(dial_model(6), always_valid, dial_at(3), Some(2));
    assert!(result.is_exhausted());

    let result = bfs_find(dial_model(6), always_valid, dial_at(3), Some(3));
    assert!(result.success);
}

#[test]
fn test_bfs_find_all_detects_violation_at_depth_two() {
    let result = bfs_find_all(dial_model(6), |s: &State| dial_value(s) != 4, dial_at(3), 10);

    assert!(!result.success);
    let invalid = result.invalidate.expect("violation reported");
    assert_eq!(invalid.depth(), 2);
    assert_eq!(dial_value(&invalid), 4);

    let (root, path) = find_path(&invalid);
    assert_eq!(root.depth(), 0);
    assert_eq!(path.len(), 2);
    assert!(Arc::ptr_eq(&path[1].to, &invalid));
    assert!(path.iter().all(|edge| edge.event.kind() == EventKind::Trigger));
    assert_eq!(dial_value(&path[0].to), 5);

    println!("{}", format_path(&path));
}

#[test]
fn test_bfs_find_all_collects_every_goal() {
    // Every position is dequeued once, so the opposite one is collected once
    let result = bfs_find_all(dial_model(4), always_valid, dial_at(2), 12);

    assert!(result.success);
    assert_eq!(result.targets.len(), 1);
    assert_eq!(result.explored, 4);
}

// =============================================================================
// Random walks
// =============================================================================

#[test]
fn test_batch_random_walk_find_over_seeds() {
    let mut passed = 0;
    for seed in 0..20 {
        let mut rng = DeterministicRng::new(seed);
        let result =
            batch_random_walk_find(dial_model(6), always_valid, dial_at(3), 10, 1000, &mut rng);
        println!("Seed {}: {}", seed, result.summary());
        if result.success {
            passed += 1;
            assert!(result.explored >= 1 && result.explored <= 1000);
            assert!(result.targets[0].depth() <= 10);
        }
    }
    assert_eq!(passed, 20, "all seeds should reach the goal");
}

#[test]
fn test_random_walk_validate_runs_to_bound() {
    let mut rng = DeterministicRng::new(99);
    let result = random_walk_validate(dial_model(6), always_valid, dial_at(3), 10, &mut rng);

    assert!(result.success);
    assert_eq!(result.explored, 11);
    assert!(result.targets.iter().all(|s| dial_value(s) == 3));
}

#[test]
fn test_batch_random_walk_validate_fails_fast() {
    let mut rng = DeterministicRng::new(5);
    let result = batch_random_walk_validate(
        dial_model(6),
        |s: &State| dial_value(s) != 4,
        dial_at(3),
        10,
        100,
        &mut rng,
    );

    assert!(!result.success);
    assert_eq!(result.invalidate.map(|s| dial_value(&s)), Some(4));
}

#[test]
fn test_same_seed_same_walks() {
    let run = |seed| {
        let mut rng = DeterministicRng::new(seed);
        batch_random_walk_validate(dial_model(8), always_valid, dial_at(4), 15, 50, &mut rng)
    };
    let (a, b) = (run(3), run(3));

    assert_eq!(a.explored, b.explored);
    assert_eq!(a.targets.len(), b.targets.len());
    for (x, y) in a.targets.iter().zip(&b.targets) {
        assert_eq!(x.depth(), y.depth());
    }
}

// =============================================================================
// Parallel BFS
// =============================================================================

#[test]
fn test_parallel_bfs_matches_sequential_on_dial() {
    let root = Arc::new(dial_model(12));
    let sequential = bfs_find_all(root.clone(), always_valid, dial_at(6), 20);
    let parallel = par_bfs_find_all(root, always_valid, dial_at(6), 20, 4);

    assert!(parallel.success);
    assert_eq!(parallel.explored, sequential.explored);
    assert_eq!(parallel.targets.len(), sequential.targets.len());
}

#[test]
fn test_parallel_bfs_matches_sequential_on_pingpong() {
    let root = Arc::new(pingpong::model(true, true, Server::new(false, false), 2));
    let sequential = bfs_find_all(root.clone(), pingpong::invariant, pingpong::is_final, 6);
    let parallel = par_bfs_find_all(root, pingpong::invariant, pingpong::is_final, 6, 3);

    println!("sequential {} / parallel {}", sequential.summary(), parallel.summary());
    assert_eq!(parallel.success, sequential.success);
    assert_eq!(parallel.explored, sequential.explored);
    assert_eq!(parallel.targets.len(), sequential.targets.len());
    for (a, b) in parallel.targets.iter().zip(&sequential.targets) {
        assert!(a.equals(b));
    }
}
