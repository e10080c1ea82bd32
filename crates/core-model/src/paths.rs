// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Relationship traversal paths, used by hosts to build eager-load options.
//!
//! Paths are discovered breadth-first over reference fields, bounded by a
//! maximum depth and a visited set, so traversal terminates even on cyclic
//! relationship graphs. Each target resource keeps its first (shortest)
//! discovered path.

use std::collections::{HashSet, VecDeque};

use serde::Serialize;

use crate::dataset::Dataset;
use crate::resource::Resource;

/// Default bound on relationship-chain length for eager loading.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// One hop of a relationship chain: `field` on `resource`, leading to the
/// field's target. `is_list` tells the host which loading strategy applies
/// (collection vs. single-record join).
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    pub resource: String,
    pub field: String,
    pub is_list: bool,
}

/// A relationship chain from some root resource down to `target`.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RelationPath {
    pub segments: Vec<PathSegment>,
    pub target: String,
}

impl RelationPath {
    /// The field names along the chain, e.g. `["customer", "address"]`.
    pub fn field_names(&self) -> Vec<&str> {
        self.segments.iter().map(|s| s.field.as_str()).collect()
    }
}

/// Every relationship chain reachable from `resource`, breadth-first, bounded
/// by `max_depth` hops, deduplicated by target resource.
pub fn relation_paths<'a>(
    dataset: &'a Dataset,
    resource: &'a Resource,
    max_depth: usize,
) -> Vec<RelationPath> {
    let mut paths = vec![];
    let mut visited: HashSet<&str> = HashSet::new();
    visited.insert(&resource.name);

    let mut queue: VecDeque<(&Resource, Vec<PathSegment>)> = VecDeque::new();
    queue.push_back((resource, vec![]));

    while let Some((current, prefix)) = queue.pop_front() {
        if prefix.len() >= max_depth {
            continue;
        }
        for field in current.reference_fields() {
            let Some(target) = dataset.target_of(field) else {
                continue;
            };
            if !visited.insert(&target.name) {
                continue;
            }

            let mut segments = prefix.clone();
            segments.push(PathSegment {
                resource: current.name.clone(),
                field: field.name.clone(),
                is_list: field.is_list(),
            });
            paths.push(RelationPath {
                segments: segments.clone(),
                target: target.name.clone(),
            });
            queue.push_back((target, segments));
        }
    }

    paths
}
