//! Dependency graph validation and deterministic execution ordering.
//!
//! Every step list that reaches execution passes through this module: the
//! structural checks reject malformed graphs (duplicate identifiers or
//! orders, unknown or self dependencies) and [`dependency_order`] produces a
//! linear execution order via Kahn's algorithm. Ordering is deterministic:
//! simultaneously-ready steps are tie-broken by ascending step order, then by
//! insertion position. A cyclic graph yields [`GraphError::CycleDetected`]
//! naming a step on the cycle; no partial ordering is ever returned.

use super::{StepId, StepOrder};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use thiserror::Error;

/// View of a step exposed to the graph algorithms.
///
/// Implemented by authoring-level steps and by frozen snapshot steps so both
/// validate and order through the same code path.
pub trait StepNode {
    /// Returns the step identifier.
    fn step_id(&self) -> StepId;

    /// Returns the step's one-based order within its definition.
    fn sequence(&self) -> StepOrder;

    /// Returns the identifiers of the steps this step depends on.
    fn prerequisites(&self) -> &[StepId];
}

/// Errors returned by dependency graph validation and ordering.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// The step list is empty.
    #[error("step list must not be empty")]
    Empty,

    /// Two steps share the same identifier.
    #[error("duplicate step identifier: {0}")]
    DuplicateStepId(StepId),

    /// Two steps share the same order value.
    #[error("duplicate step order {order} shared by steps {first} and {second}")]
    DuplicateOrder {
        /// The order value claimed twice.
        order: StepOrder,
        /// The step that claimed the order first.
        first: StepId,
        /// The step that claimed the order again.
        second: StepId,
    },

    /// A step depends on an identifier outside the definition.
    #[error("step {step_id} depends on unknown step {dependency}")]
    UnknownDependency {
        /// The step declaring the dependency.
        step_id: StepId,
        /// The unresolvable dependency identifier.
        dependency: StepId,
    },

    /// A step depends on itself.
    #[error("step {0} depends on itself")]
    SelfDependency(StepId),

    /// The dependency graph contains a cycle.
    #[error("dependency cycle detected involving step {step_id} ({unresolved} steps unresolved)")]
    CycleDetected {
        /// A step known to sit on the cycle.
        step_id: StepId,
        /// How many steps could not be ordered.
        unresolved: usize,
    },
}

/// Validates the structural invariants of a step list.
///
/// Checks identifier and order uniqueness and dependency resolvability
/// without ordering the graph. Cycles are only detected by
/// [`dependency_order`].
///
/// # Errors
///
/// Returns the first [`GraphError`] encountered in step-list order.
pub fn validate_structure<S: StepNode>(steps: &[S]) -> Result<(), GraphError> {
    if steps.is_empty() {
        return Err(GraphError::Empty);
    }

    let mut ids: HashMap<StepId, usize> = HashMap::with_capacity(steps.len());
    let mut orders: HashMap<StepOrder, StepId> = HashMap::with_capacity(steps.len());
    for (position, step) in steps.iter().enumerate() {
        if ids.insert(step.step_id(), position).is_some() {
            return Err(GraphError::DuplicateStepId(step.step_id()));
        }
        if let Some(first) = orders.insert(step.sequence(), step.step_id()) {
            return Err(GraphError::DuplicateOrder {
                order: step.sequence(),
                first,
                second: step.step_id(),
            });
        }
    }

    for step in steps {
        for dependency in step.prerequisites() {
            if *dependency == step.step_id() {
                return Err(GraphError::SelfDependency(step.step_id()));
            }
            if !ids.contains_key(dependency) {
                return Err(GraphError::UnknownDependency {
                    step_id: step.step_id(),
                    dependency: *dependency,
                });
            }
        }
    }

    Ok(())
}

/// Produces the linear execution order of a step list via Kahn's algorithm.
///
/// Every step appears exactly once in the result, after all of its
/// prerequisites. Simultaneously-ready steps are emitted by ascending step
/// order, then by insertion position, so the result is deterministic.
///
/// # Errors
///
/// Returns a structural [`GraphError`] when [`validate_structure`] rejects
/// the list, or [`GraphError::CycleDetected`] when not every step could be
/// ordered.
pub fn dependency_order<S: StepNode>(steps: &[S]) -> Result<Vec<StepId>, GraphError> {
    validate_structure(steps)?;

    let positions: HashMap<StepId, usize> = steps
        .iter()
        .enumerate()
        .map(|(position, step)| (step.step_id(), position))
        .collect();

    let mut in_degree: Vec<usize> = vec![0; steps.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); steps.len()];
    for (position, step) in steps.iter().enumerate() {
        for dependency in step.prerequisites() {
            // Unknown dependencies were rejected by validate_structure.
            if let Some(&source) = positions.get(dependency) {
                if let Some(list) = dependents.get_mut(source) {
                    list.push(position);
                }
                if let Some(count) = in_degree.get_mut(position) {
                    *count += 1;
                }
            }
        }
    }

    let mut ready: BinaryHeap<Reverse<(StepOrder, usize)>> = steps
        .iter()
        .enumerate()
        .filter(|(position, _)| in_degree.get(*position).copied() == Some(0))
        .map(|(position, step)| Reverse((step.sequence(), position)))
        .collect();

    let mut order: Vec<StepId> = Vec::with_capacity(steps.len());
    while let Some(Reverse((_, position))) = ready.pop() {
        let Some(step) = steps.get(position) else {
            continue;
        };
        order.push(step.step_id());
        let downstream = dependents.get(position).cloned().unwrap_or_default();
        for dependent in downstream {
            if let Some(count) = in_degree.get_mut(dependent) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    if let Some(next) = steps.get(dependent) {
                        ready.push(Reverse((next.sequence(), dependent)));
                    }
                }
            }
        }
    }

    if order.len() < steps.len() {
        let unresolved = steps.len() - order.len();
        let ordered: std::collections::HashSet<StepId> = order.iter().copied().collect();
        let blocked = steps
            .iter()
            .filter(|step| !ordered.contains(&step.step_id()))
            .min_by_key(|step| step.sequence())
            .or_else(|| steps.first())
            .map(StepNode::step_id)
            .ok_or(GraphError::Empty)?;
        return Err(GraphError::CycleDetected {
            step_id: blocked,
            unresolved,
        });
    }

    Ok(order)
}

/// Returns the first step of the execution order.
///
/// This is the step a project's initial task is created for: it has no
/// unmet dependencies and the lowest order among ready steps.
///
/// # Errors
///
/// Propagates any [`GraphError`] from [`dependency_order`].
pub fn execution_head<S: StepNode>(steps: &[S]) -> Result<StepId, GraphError> {
    dependency_order(steps)?
        .into_iter()
        .next()
        .ok_or(GraphError::Empty)
}
