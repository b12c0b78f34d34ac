use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use taskchain::errors::TaskchainError;
use taskchain::plan::resolve;
use taskchain::registry::TargetRegistry;
use taskchain_test_utils::builders::RegistryBuilder;

// Strategy to generate an acyclic registry.
// Acyclicity is guaranteed by only letting task N depend on tasks 0..N-1.
fn dag_strategy(max_targets: usize) -> impl Strategy<Value = (TargetRegistry, Vec<Vec<usize>>)> {
    (1..=max_targets).prop_flat_map(|num_targets| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_targets,
        );

        deps_strat.prop_map(move |raw_deps| {
            let mut builder = RegistryBuilder::new();
            let mut edges = Vec::with_capacity(num_targets);
            for (i, potential) in raw_deps.into_iter().enumerate() {
                // Only deps < i; duplicates are kept on purpose.
                let deps: Vec<usize> = if i == 0 {
                    Vec::new()
                } else {
                    potential.into_iter().map(|d| d % i).collect()
                };
                let dep_names: Vec<String> = deps.iter().map(|d| format!("t{d}")).collect();
                let dep_refs: Vec<&str> = dep_names.iter().map(String::as_str).collect();
                builder = builder.target(&format!("t{i}"), &dep_refs, &[]);
                edges.push(deps);
            }
            (builder.build(), edges)
        })
    })
}

/// Every target reachable from `root`, root included.
fn reachable(edges: &[Vec<usize>], root: usize) -> HashSet<usize> {
    let mut seen = HashSet::new();
    let mut stack = vec![root];
    while let Some(n) = stack.pop() {
        if seen.insert(n) {
            stack.extend(edges[n].iter().copied());
        }
    }
    seen
}

proptest! {
    #[test]
    fn plan_contains_each_reachable_target_once_after_its_deps(
        (registry, edges) in dag_strategy(24),
        root_pick in any::<usize>(),
    ) {
        let root = root_pick % edges.len();
        let plan = resolve(&registry, &format!("t{root}")).unwrap();

        let positions: HashMap<&str, usize> =
            plan.names().enumerate().map(|(i, n)| (n, i)).collect();
        prop_assert_eq!(positions.len(), plan.len(), "a target appears twice");

        let expected = reachable(&edges, root);
        prop_assert_eq!(plan.len(), expected.len());

        for node in expected {
            let name = format!("t{node}");
            let at = positions[name.as_str()];
            for dep in &edges[node] {
                let dep_name = format!("t{dep}");
                prop_assert!(positions[dep_name.as_str()] < at,
                    "{} planned after its dependent {}", dep_name, name);
            }
        }

        let root_name = format!("t{root}");
        prop_assert_eq!(plan.names().last(), Some(root_name.as_str()));
    }

    #[test]
    fn resolution_is_deterministic(
        (registry, edges) in dag_strategy(16),
        root_pick in any::<usize>(),
    ) {
        let root = format!("t{}", root_pick % edges.len());
        let a = resolve(&registry, &root).unwrap();
        let b = resolve(&registry, &root).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn any_ring_is_reported_as_a_cycle(len in 1usize..64, entry in any::<usize>()) {
        let mut builder = RegistryBuilder::new();
        for i in 0..len {
            let next = format!("r{}", (i + 1) % len);
            builder = builder.target(&format!("r{i}"), &[next.as_str()], &[]);
        }
        let registry = builder.build();

        match resolve(&registry, &format!("r{}", entry % len)) {
            Err(TaskchainError::CyclicDependency { cycle }) => {
                prop_assert_eq!(cycle.len(), len + 1);
                prop_assert_eq!(cycle.first(), cycle.last());
            }
            other => prop_assert!(false, "expected a cycle, got {:?}", other.map(|p| p.len())),
        }
    }
}
