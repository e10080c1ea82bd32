// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The sealed metadata model: [`Field`]s grouped into [`Resource`]s, owned by a
//! [`Dataset`], plus the pure graph queries computed over it (dependency order,
//! minimal identifying keys, relationship traversal paths).
//!
//! Values of these types are produced by the `core-model-builder` crate's
//! `seal()` step and never mutated afterwards, so every query in [`graph`] and
//! [`paths`] is a pure function of the dataset and may be cached or evaluated
//! from multiple threads without synchronization.

pub mod dataset;
pub mod field;
pub mod graph;
pub mod paths;
pub mod resource;

pub use dataset::Dataset;
pub use field::{Field, FieldType};
pub use graph::{CycleDetected, DependencyOrder, dependency_order};
pub use paths::{DEFAULT_MAX_DEPTH, PathSegment, RelationPath, relation_paths};
pub use resource::{KeyProvenance, MinimalKey, Resource};
