// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Compiles per-resource label expressions into display snippets.
//!
//! A label is a small Lisp-like expression attached to a resource, such as
//! `(if name name (concat "ID:" " " id))`. Compilation runs in three pure
//! stages: [`parser`] turns the text into a [`ast::LabelExpr`],
//! [`typechecker::resolve`] binds every dotted field path through the owning
//! [`Dataset`], and an [`emitter`] lowers the bound expression to one source
//! expression per target language. [`eval::evaluate`] interprets the same
//! bound expression over JSON records and defines the semantics the backends
//! must agree on.
//!
//! Label failures are scoped: a bad label yields a [`CompileError`] naming
//! the (resource, label) pair, and every other label compiles normally.

pub mod ast;
pub mod emitter;
pub mod error;
pub mod eval;
pub mod parser;
pub mod typechecker;

use std::collections::HashSet;

use serde::Serialize;

pub use core_model::{
    DEFAULT_MAX_DEPTH, Dataset, DependencyOrder, Field, FieldType, KeyProvenance, MinimalKey,
    PathSegment, RelationPath, Resource, dependency_order, relation_paths,
};

pub use emitter::{LabelEmitter, RECORD_VAR, TargetLanguage, emitter_for};
pub use error::{CompileError, EmitError, LabelError, ResolveError, SyntaxError};
pub use typechecker::ResolvedExpr;

/// Which relationship paths an eager-load plan should include.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathMode {
    /// Every path reachable within the depth bound.
    Full,
    /// Only the paths the resource's label actually traverses. Always a
    /// subset of [`PathMode::Full`]; empty when the resource has no label.
    LabelOnly,
}

/// A label lowered to one target language.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CompiledLabel {
    pub resource: String,
    pub language: TargetLanguage,
    /// A single expression over the free variable [`RECORD_VAR`].
    pub code: String,
}

/// Parse and bind `resource`'s label without emitting any code.
pub fn resolve_label(
    dataset: &Dataset,
    resource: &Resource,
) -> Result<Option<ResolvedExpr>, CompileError> {
    match &resource.label {
        Some(label) => resolve_label_str(dataset, resource, label).map(Some),
        None => Ok(None),
    }
}

fn resolve_label_str(
    dataset: &Dataset,
    resource: &Resource,
    label: &str,
) -> Result<ResolvedExpr, CompileError> {
    let wrap = |err: LabelError| CompileError::new(&resource.name, label, err);
    let expr = parser::parse(label).map_err(|e| wrap(e.into()))?;
    typechecker::resolve(dataset, resource, &expr).map_err(|e| wrap(e.into()))
}

/// Compile one label string against its owning resource for one target.
pub fn compile_label_str(
    dataset: &Dataset,
    resource: &Resource,
    label: &str,
    target: TargetLanguage,
) -> Result<CompiledLabel, CompileError> {
    let resolved = resolve_label_str(dataset, resource, label)?;
    let code = emitter_for(target)
        .emit(&resolved)
        .map_err(|e| CompileError::new(&resource.name, label, LabelError::from(e)))?;

    tracing::debug!(resource = %resource.name, language = %target, "compiled label");
    Ok(CompiledLabel {
        resource: resource.name.clone(),
        language: target,
        code,
    })
}

/// Compile `resource`'s own label for one target language. `Ok(None)` when
/// the resource has no label.
pub fn compile_label(
    dataset: &Dataset,
    resource: &Resource,
    target: TargetLanguage,
) -> Result<Option<CompiledLabel>, CompileError> {
    match &resource.label {
        Some(label) => compile_label_str(dataset, resource, label, target).map(Some),
        None => Ok(None),
    }
}

/// Compile every labeled resource in the dataset for one target. Failures are
/// collected per label; the rest of the dataset still compiles.
pub fn compile_dataset_labels(
    dataset: &Dataset,
    target: TargetLanguage,
) -> (Vec<CompiledLabel>, Vec<CompileError>) {
    let mut compiled = vec![];
    let mut errors = vec![];

    for resource in dataset.resources() {
        match compile_label(dataset, resource, target) {
            Ok(Some(label)) => compiled.push(label),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(resource = %resource.name, error = %err, "label skipped");
                errors.push(err);
            }
        }
    }

    (compiled, errors)
}

/// Relationship paths for eager loading, bounded by [`DEFAULT_MAX_DEPTH`].
///
/// [`PathMode::LabelOnly`] derives paths straight from the resolved label's
/// field chains, so every hop the label traverses is present even when the
/// generic traversal reached that hop's target through some other route.
/// [`PathMode::Full`] covers every reachable target once; its per-target
/// dedup prefers the label-traversed routes, which keeps the label-only set
/// a subset of the full set.
pub fn eager_load_paths(
    dataset: &Dataset,
    resource: &Resource,
    mode: PathMode,
) -> Result<Vec<RelationPath>, CompileError> {
    eager_load_paths_with_depth(dataset, resource, mode, DEFAULT_MAX_DEPTH)
}

pub fn eager_load_paths_with_depth(
    dataset: &Dataset,
    resource: &Resource,
    mode: PathMode,
    max_depth: usize,
) -> Result<Vec<RelationPath>, CompileError> {
    match mode {
        PathMode::LabelOnly => {
            let Some(resolved) = resolve_label(dataset, resource)? else {
                return Ok(vec![]);
            };
            Ok(label_relation_paths(dataset, &resolved, max_depth))
        }
        PathMode::Full => {
            // a broken label must not block generic eager loading
            let label_paths = resolve_label(dataset, resource)
                .ok()
                .flatten()
                .map(|resolved| label_relation_paths(dataset, &resolved, max_depth))
                .unwrap_or_default();

            let mut covered: HashSet<String> =
                label_paths.iter().map(|p| p.target.clone()).collect();
            let mut paths = label_paths;
            for path in relation_paths(dataset, resource, max_depth) {
                if covered.insert(path.target.clone()) {
                    paths.push(path);
                }
            }
            Ok(paths)
        }
    }
}

/// One relationship path per prefix of each field chain the label traverses,
/// deduplicated by target (first traversal wins), bounded by `max_depth`.
fn label_relation_paths(
    dataset: &Dataset,
    resolved: &ResolvedExpr,
    max_depth: usize,
) -> Vec<RelationPath> {
    let mut paths = vec![];
    let mut covered: HashSet<String> = HashSet::new();

    for chain in resolved.field_chains() {
        // all but the final scalar hop
        let hops = &chain.segments[..chain.segments.len().saturating_sub(1)];
        let mut segments = vec![];
        for hop in hops {
            let Some(field) = dataset
                .get(&hop.resource)
                .and_then(|r| r.field(&hop.field))
            else {
                break;
            };
            let Some(target) = field.ref_target.clone() else {
                break;
            };
            segments.push(PathSegment {
                resource: hop.resource.clone(),
                field: hop.field.clone(),
                is_list: field.is_list(),
            });
            if segments.len() > max_depth {
                break;
            }
            if covered.insert(target.clone()) {
                paths.push(RelationPath {
                    segments: segments.clone(),
                    target,
                });
            }
        }
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_model::{Field, FieldType};

    fn dataset() -> Dataset {
        let mut address = Resource::new("Address");
        address.fields = vec![Field::scalar("city", FieldType::String)];

        let mut customer = Resource::new("Customer");
        customer.fields = vec![
            Field::scalar("name", FieldType::String),
            Field {
                nullable: true,
                ref_target: Some("Address".into()),
                ..Field::scalar("address", FieldType::ManyToOne)
            },
        ];

        let mut order = Resource::new("Order");
        order.fields = vec![
            Field::scalar("id", FieldType::Integer),
            Field {
                nullable: false,
                ref_target: Some("Customer".into()),
                ..Field::scalar("customer", FieldType::ManyToOne)
            },
        ];
        order.label = Some("(concat customer.name)".into());

        Dataset::from_resources("shop", [address, customer, order])
    }

    #[test]
    fn compiles_for_both_targets() {
        let ds = dataset();
        let order = ds.get("Order").unwrap();

        for target in TargetLanguage::all() {
            let compiled = compile_label(&ds, order, target).unwrap().unwrap();
            assert_eq!(compiled.resource, "Order");
            assert_eq!(compiled.language, target);
            assert!(compiled.code.contains(RECORD_VAR));
        }
    }

    #[test]
    fn unlabeled_resource_compiles_to_none() {
        let ds = dataset();
        let customer = ds.get("Customer").unwrap();
        assert_eq!(
            compile_label(&ds, customer, TargetLanguage::Python).unwrap(),
            None
        );
    }

    #[test]
    fn label_only_paths_are_a_subset_of_full() {
        let ds = dataset();
        let order = ds.get("Order").unwrap();

        let full = eager_load_paths(&ds, order, PathMode::Full).unwrap();
        let label_only = eager_load_paths(&ds, order, PathMode::LabelOnly).unwrap();

        // full reaches Customer and Address; the label only traverses customer
        assert_eq!(full.len(), 2);
        assert_eq!(label_only.len(), 1);
        assert_eq!(label_only[0].target, "Customer");
        assert!(label_only.iter().all(|p| full.contains(p)));
    }

    #[test]
    fn label_only_keeps_every_hop_the_label_traverses() {
        // Leaf is reachable both directly and through Middle; the label goes
        // through Middle, and that longer route must survive the dedup.
        let mut leaf = Resource::new("Leaf");
        leaf.fields = vec![Field::scalar("value", FieldType::String)];

        let mut middle = Resource::new("Middle");
        middle.fields = vec![Field {
            ref_target: Some("Leaf".into()),
            ..Field::scalar("leaf", FieldType::ManyToOne)
        }];

        let mut root = Resource::new("Root");
        root.fields = vec![
            Field {
                ref_target: Some("Leaf".into()),
                ..Field::scalar("direct", FieldType::ManyToOne)
            },
            Field {
                ref_target: Some("Middle".into()),
                ..Field::scalar("via", FieldType::ManyToOne)
            },
        ];
        root.label = Some("(concat via.leaf.value)".into());

        let ds = Dataset::from_resources("t", [leaf, middle, root]);
        let root = ds.get("Root").unwrap();

        let label_only = eager_load_paths(&ds, root, PathMode::LabelOnly).unwrap();
        let targets: Vec<_> = label_only.iter().map(|p| p.target.as_str()).collect();
        assert_eq!(targets, ["Middle", "Leaf"]);
        assert_eq!(label_only[1].field_names(), ["via", "leaf"]);

        // Full still covers every reachable target once, preferring the
        // label's routes, so the subset property holds.
        let full = eager_load_paths(&ds, root, PathMode::Full).unwrap();
        assert_eq!(full.len(), 2);
        assert!(label_only.iter().all(|p| full.contains(p)));
    }

    #[test]
    fn unlabeled_resource_has_no_label_only_paths() {
        let ds = dataset();
        let customer = ds.get("Customer").unwrap();
        assert!(
            eager_load_paths(&ds, customer, PathMode::LabelOnly)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn compile_errors_carry_the_label_identity() {
        let mut bad = Resource::new("Widget");
        bad.fields = vec![Field::scalar("id", FieldType::Integer)];
        bad.label = Some("(concat missing)".into());
        let ds = Dataset::from_resources("w", [bad]);
        let widget = ds.get("Widget").unwrap();

        let err = compile_label(&ds, widget, TargetLanguage::Python).unwrap_err();
        assert_eq!(err.resource, "Widget");
        assert_eq!(err.label, "(concat missing)");
        assert!(matches!(err.source, LabelError::Resolve(_)));

        // a broken label surfaces in label-only mode but never blocks the
        // generic traversal
        assert!(eager_load_paths(&ds, widget, PathMode::LabelOnly).is_err());
        assert!(eager_load_paths(&ds, widget, PathMode::Full).unwrap().is_empty());
    }
}
