// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Binds a parsed label expression to its owning resource.
//!
//! Every dotted path is walked segment by segment: each prefix segment must be
//! a reference field whose target (looked up through the dataset) becomes the
//! resource for the next segment, and the final segment must be a scalar
//! field. The result annotates each `FieldRef` with the concrete
//! (resource, field) chain it traverses.

use serde::Serialize;

use core_model::{Dataset, Resource};

use crate::ast::{LabelExpr, LiteralKind};
use crate::error::ResolveError;

/// One hop of a resolved field chain.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChainSegment {
    pub resource: String,
    pub field: String,
    /// Whether the field itself is nullable. On intermediate reference
    /// segments this is what forces a guarded rendering.
    pub nullable: bool,
}

/// A fully-bound field reference. `guarded` is set when any intermediate
/// reference field in the chain is nullable: emitters must then render a
/// null-safe access whose value is the target language's null when an
/// intermediate record is absent.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct FieldChain {
    pub segments: Vec<ChainSegment>,
    pub guarded: bool,
}

/// Same shape as [`LabelExpr`], with every field reference bound.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub enum ResolvedExpr {
    Literal { value: String, kind: LiteralKind },
    FieldRef(FieldChain),
    Call { op: String, args: Vec<ResolvedExpr> },
}

impl ResolvedExpr {
    /// Every bound field chain in the expression, in traversal order. Feeds
    /// the label-only eager-load path derivation.
    pub fn field_chains(&self) -> Vec<&FieldChain> {
        let mut chains = vec![];
        self.collect_chains(&mut chains);
        chains
    }

    fn collect_chains<'a>(&'a self, out: &mut Vec<&'a FieldChain>) {
        match self {
            ResolvedExpr::Literal { .. } => {}
            ResolvedExpr::FieldRef(chain) => out.push(chain),
            ResolvedExpr::Call { args, .. } => {
                for arg in args {
                    arg.collect_chains(out);
                }
            }
        }
    }
}

/// Resolve `expr` against `resource`, looking reference targets up in
/// `dataset`.
pub fn resolve(
    dataset: &Dataset,
    resource: &Resource,
    expr: &LabelExpr,
) -> Result<ResolvedExpr, ResolveError> {
    match expr {
        LabelExpr::Literal { value, kind } => Ok(ResolvedExpr::Literal {
            value: value.clone(),
            kind: *kind,
        }),
        LabelExpr::FieldRef { path } => resolve_path(dataset, resource, path).map(ResolvedExpr::FieldRef),
        LabelExpr::Call { op, args } => {
            let args = args
                .iter()
                .map(|arg| resolve(dataset, resource, arg))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ResolvedExpr::Call {
                op: op.clone(),
                args,
            })
        }
    }
}

fn resolve_path(
    dataset: &Dataset,
    root: &Resource,
    path: &[String],
) -> Result<FieldChain, ResolveError> {
    let mut current = root;
    let mut segments = vec![];
    let mut guarded = false;

    for (index, segment) in path.iter().enumerate() {
        let Some(field) = current.field(segment) else {
            return Err(if index == 0 {
                ResolveError::RootNotFound {
                    resource: root.name.clone(),
                    segment: segment.clone(),
                }
            } else {
                ResolveError::UnknownField {
                    resource: current.name.clone(),
                    field: segment.clone(),
                }
            });
        };

        segments.push(ChainSegment {
            resource: current.name.clone(),
            field: field.name.clone(),
            nullable: field.nullable,
        });

        let last = index == path.len() - 1;
        if last {
            if field.is_reference() {
                return Err(ResolveError::NotScalar {
                    resource: current.name.clone(),
                    field: field.name.clone(),
                });
            }
        } else {
            if !field.is_reference() {
                return Err(ResolveError::NotAReference {
                    resource: current.name.clone(),
                    field: field.name.clone(),
                });
            }
            if field.nullable {
                guarded = true;
            }
            current = dataset.target_of(field).ok_or_else(|| {
                ResolveError::DanglingTarget {
                    resource: current.name.clone(),
                    field: field.name.clone(),
                    target: field.ref_target.clone().unwrap_or_default(),
                }
            })?;
        }
    }

    Ok(FieldChain { segments, guarded })
}
