// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Dependency ordering over the foreign-key graph of a sealed dataset.
//!
//! A resource holding a `many-to-one` or `one-to-one` field depends on the
//! field's target: the target must come first in creation order. The order is
//! fully deterministic: roots and edge lists are walked in ascending name
//! order, so equal-rank resources come out alphabetically.

use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use tracing::warn;

use crate::dataset::Dataset;
use crate::resource::Resource;

/// Non-fatal diagnostic: a foreign-key cycle was broken by dropping one edge.
///
/// The dropped edge is the back edge discovered during traversal; for a
/// mutual pair it originates from the lexicographically later resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleDetected {
    /// Resource the dropped edge originates from.
    pub from: String,
    /// Target of the dropped edge.
    pub to: String,
    /// The reference field that formed the edge.
    pub field: String,
}

impl Display for CycleDetected {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "dependency cycle broken: dropped edge {}.{} -> {}",
            self.from, self.field, self.to
        )
    }
}

/// Result of [`dependency_order`]: every resource exactly once, dependencies
/// first, plus one diagnostic per broken cycle edge.
#[derive(Debug)]
pub struct DependencyOrder<'a> {
    pub resources: Vec<&'a Resource>,
    pub cycles: Vec<CycleDetected>,
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    InProgress,
    Done,
}

/// Topological order over the dataset's foreign-key graph.
///
/// Cycles never abort the run: each back edge is dropped with a
/// [`CycleDetected`] diagnostic and traversal continues.
pub fn dependency_order(dataset: &Dataset) -> DependencyOrder<'_> {
    // name -> [(target, field)], edges sorted by target then field
    let mut edges: HashMap<&str, Vec<(&str, &str)>> = HashMap::new();
    for resource in dataset.resources() {
        let mut deps: Vec<(&str, &str)> = resource
            .fields
            .iter()
            .filter(|f| f.holds_foreign_key())
            .filter_map(|f| {
                let target = f.ref_target.as_deref()?;
                dataset.get(target)?;
                Some((target, f.name.as_str()))
            })
            .collect();
        deps.sort_unstable();
        edges.insert(&resource.name, deps);
    }

    let mut roots: Vec<&str> = dataset.resources().map(|r| r.name.as_str()).collect();
    roots.sort_unstable();

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order: Vec<&str> = Vec::with_capacity(dataset.len());
    let mut cycles = vec![];

    for root in roots {
        visit(root, &edges, &mut marks, &mut order, &mut cycles);
    }

    DependencyOrder {
        resources: order
            .into_iter()
            .filter_map(|name| dataset.get(name))
            .collect(),
        cycles,
    }
}

fn visit<'a>(
    name: &'a str,
    edges: &HashMap<&'a str, Vec<(&'a str, &'a str)>>,
    marks: &mut HashMap<&'a str, Mark>,
    order: &mut Vec<&'a str>,
    cycles: &mut Vec<CycleDetected>,
) {
    match marks.get(name) {
        Some(Mark::Done) => return,
        Some(Mark::InProgress) => return,
        None => {}
    }
    marks.insert(name, Mark::InProgress);

    if let Some(deps) = edges.get(name) {
        for (target, field) in deps {
            if marks.get(target) == Some(&Mark::InProgress) {
                let diagnostic = CycleDetected {
                    from: name.to_string(),
                    to: target.to_string(),
                    field: field.to_string(),
                };
                warn!("{diagnostic}");
                cycles.push(diagnostic);
                continue;
            }
            visit(target, edges, marks, order, cycles);
        }
    }

    marks.insert(name, Mark::Done);
    order.push(name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, FieldType};

    fn many_to_one(name: &str, target: &str, nullable: bool) -> Field {
        Field {
            nullable,
            ref_target: Some(target.into()),
            ..Field::scalar(name, FieldType::ManyToOne)
        }
    }

    fn with_fields(name: &str, fields: Vec<Field>) -> Resource {
        Resource {
            fields,
            ..Resource::new(name)
        }
    }

    #[test]
    fn targets_precede_holders() {
        let ds = Dataset::from_resources(
            "t",
            [
                with_fields(
                    "Order",
                    vec![
                        many_to_one("customer", "Customer", false),
                        Field::scalar("total", FieldType::Float),
                    ],
                ),
                with_fields("Customer", vec![Field::scalar("name", FieldType::String)]),
            ],
        );

        let order = dependency_order(&ds);
        assert!(order.cycles.is_empty());
        let names: Vec<_> = order.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Order"]);
    }

    #[test]
    fn independent_resources_come_out_alphabetically() {
        let ds = Dataset::from_resources(
            "t",
            [
                with_fields("Zebra", vec![Field::scalar("n", FieldType::String)]),
                with_fields("Apple", vec![Field::scalar("n", FieldType::String)]),
                with_fields("Mango", vec![Field::scalar("n", FieldType::String)]),
            ],
        );

        let order = dependency_order(&ds);
        let names: Vec<_> = order.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Mango", "Zebra"]);
    }

    #[test_log::test]
    fn mutual_reference_breaks_one_edge_deterministically() {
        let build = || {
            Dataset::from_resources(
                "t",
                [
                    with_fields("Alpha", vec![many_to_one("beta", "Beta", true)]),
                    with_fields("Beta", vec![many_to_one("alpha", "Alpha", true)]),
                ],
            )
        };

        let ds = build();
        let order = dependency_order(&ds);

        assert_eq!(order.cycles.len(), 1);
        // The back edge originates from the lexicographically later resource.
        assert_eq!(
            order.cycles[0],
            CycleDetected {
                from: "Beta".into(),
                to: "Alpha".into(),
                field: "alpha".into(),
            }
        );
        let names: Vec<_> = order.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Beta", "Alpha"]);

        // Stable across runs.
        let ds2 = build();
        let rerun = dependency_order(&ds2);
        let rerun_names: Vec<_> = rerun.resources.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, rerun_names);
    }

    #[test]
    fn self_reference_is_reported_not_fatal() {
        let ds = Dataset::from_resources(
            "t",
            [with_fields(
                "Node",
                vec![many_to_one("parent", "Node", true)],
            )],
        );

        let order = dependency_order(&ds);
        assert_eq!(order.resources.len(), 1);
        assert_eq!(order.cycles.len(), 1);
        assert_eq!(order.cycles[0].from, "Node");
        assert_eq!(order.cycles[0].to, "Node");
    }

    #[test]
    fn three_cycle_terminates_with_full_order() {
        let ds = Dataset::from_resources(
            "t",
            [
                with_fields("A", vec![many_to_one("b", "B", true)]),
                with_fields("B", vec![many_to_one("c", "C", true)]),
                with_fields("C", vec![many_to_one("a", "A", true)]),
            ],
        );

        let order = dependency_order(&ds);
        assert_eq!(order.resources.len(), 3);
        assert_eq!(order.cycles.len(), 1);
        assert_eq!(order.cycles[0].from, "C");
        assert_eq!(order.cycles[0].to, "A");
    }
}
