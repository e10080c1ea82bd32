// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The owning container for all [`Resource`]s of one generation run.
//!
//! Resources refer to each other only by name and every cross-resource hop
//! goes through [`Dataset::get`]. This keeps the relationship graph fully
//! navigable (cycles included) without any cross-resource pointers.

use indexmap::IndexMap;

use crate::field::Field;
use crate::resource::Resource;

/// A sealed, immutable set of resources, keyed by name in insertion order.
///
/// Built once per generation run by `core-model-builder`'s `seal()` and never
/// mutated afterwards, so it can be shared read-only across per-resource
/// compilation tasks.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    resources: IndexMap<String, Resource>,
}

impl Dataset {
    /// Assemble a dataset from already-validated resources. Normally called
    /// only by the builder crate's `seal()`; the resources are assumed to
    /// satisfy the structural invariants (unique names, resolvable targets).
    pub fn from_resources(
        name: impl Into<String>,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Self {
        Dataset {
            name: name.into(),
            resources: resources.into_iter().map(|r| (r.name.clone(), r)).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn resources(&self) -> impl Iterator<Item = &Resource> {
        self.resources.values()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resolve the resource a reference field points at.
    pub fn target_of(&self, field: &Field) -> Option<&Resource> {
        field.ref_target.as_deref().and_then(|t| self.get(t))
    }

    /// Resources grouped by their top-level category, categories in first-seen
    /// order. Resources without categories land under an empty-string key.
    pub fn resources_by_category(&self) -> Vec<(String, Vec<&Resource>)> {
        let mut groups: IndexMap<String, Vec<&Resource>> = IndexMap::new();
        for resource in self.resources.values() {
            let top = resource.categories.first().cloned().unwrap_or_default();
            groups.entry(top).or_default().push(resource);
        }
        groups.into_iter().collect()
    }
}
