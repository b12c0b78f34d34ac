// src/plan/resolver.rs

//! Depth-first resolution of a root target into a [`Plan`].
//!
//! The traversal is iterative: an explicit stack of frames stands in for
//! recursion, so graph depth is bounded by heap memory rather than the call
//! stack. One marker per [`TargetId`] serves both deduplication (`Done`) and
//! cycle detection (`Visiting`).

use tracing::{debug, trace};

use crate::errors::{Result, TaskchainError};
use crate::plan::Plan;
use crate::registry::{TargetId, TargetRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    /// On the active path; meeting it again closes a cycle.
    Visiting,
    /// Already appended to the plan.
    Done,
}

/// A target on the active path plus the index of the next dependency to
/// visit.
#[derive(Debug, Clone, Copy)]
struct Frame {
    id: TargetId,
    next_dep: usize,
}

/// Resolve `root` into a plan where every target follows all of its
/// transitive dependencies and appears exactly once.
///
/// Dependencies are visited in declared order. Errors abort resolution and
/// discard everything gathered so far.
pub fn resolve<'r>(registry: &'r TargetRegistry, root: &str) -> Result<Plan<'r>> {
    let root_id = registry
        .id_of(root)
        .ok_or_else(|| TaskchainError::UnknownTarget {
            name: root.to_string(),
            required_by: None,
        })?;

    let mut marks = vec![Mark::Unvisited; registry.len()];
    let mut order: Vec<TargetId> = Vec::new();
    let mut stack = vec![Frame {
        id: root_id,
        next_dep: 0,
    }];
    marks[root_id.index()] = Mark::Visiting;

    while let Some(&Frame { id, next_dep }) = stack.last() {
        let target = registry.get(id);

        let Some(dep_name) = target.dependencies.get(next_dep) else {
            // All dependencies resolved: the target itself can go.
            marks[id.index()] = Mark::Done;
            order.push(id);
            stack.pop();
            continue;
        };

        let top = stack.len() - 1;
        stack[top].next_dep += 1;

        let dep_id = registry
            .id_of(dep_name)
            .ok_or_else(|| TaskchainError::UnknownTarget {
                name: dep_name.clone(),
                required_by: Some(target.name.clone()),
            })?;

        match marks[dep_id.index()] {
            Mark::Done => {
                trace!(name = %target.name, dep = %dep_name, "dependency already planned; skipping");
            }
            Mark::Visiting => {
                return Err(cycle_error(registry, &stack, dep_id));
            }
            Mark::Unvisited => {
                marks[dep_id.index()] = Mark::Visiting;
                stack.push(Frame {
                    id: dep_id,
                    next_dep: 0,
                });
            }
        }
    }

    let targets = order.into_iter().map(|id| registry.get(id)).collect();
    let plan = Plan::new(root.to_string(), targets);
    debug!(root = %root, plan = ?plan.names().collect::<Vec<_>>(), "plan resolved");
    Ok(plan)
}

/// Build the cycle report: the active path from the first occurrence of
/// `closing` to the top of the stack, then `closing` again.
fn cycle_error(registry: &TargetRegistry, stack: &[Frame], closing: TargetId) -> TaskchainError {
    let start = stack
        .iter()
        .position(|frame| frame.id == closing)
        .unwrap_or(0);

    let mut cycle: Vec<String> = stack[start..]
        .iter()
        .map(|frame| registry.get(frame.id).name.clone())
        .collect();
    cycle.push(registry.get(closing).name.clone());

    TaskchainError::CyclicDependency { cycle }
}
