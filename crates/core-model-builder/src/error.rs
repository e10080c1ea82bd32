// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ModelBuildingError {
    /// Seal-time report: every structural problem found in one pass, not just
    /// the first.
    #[error("could not validate the dataset ({} problem(s))", .0.len())]
    Validation(Vec<ValidationError>),

    #[error("{0}")]
    Generic(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("duplicate resource name `{0}`")]
    DuplicateResource(String),

    #[error("duplicate field `{field}` on resource `{resource}`")]
    DuplicateField { resource: String, field: String },

    #[error("resource `{0}` has no fields")]
    EmptyResource(String),

    #[error("unknown resource `{0}`")]
    UnknownResource(String),

    #[error("unknown field `{resource}.{field}`")]
    UnknownField { resource: String, field: String },

    #[error("field `{resource}.{field}` is a reference but names no target resource")]
    MissingReferenceTarget { resource: String, field: String },

    #[error("field `{resource}.{field}` is not reference-typed and cannot be linked")]
    NotAReference { resource: String, field: String },

    #[error("field `{resource}.{field}` references unknown resource `{target}`")]
    UnresolvedReference {
        resource: String,
        field: String,
        target: String,
    },

    #[error("field `{resource}.{field}` has unknown type tag `{tag}`")]
    UnknownTypeTag {
        resource: String,
        field: String,
        tag: String,
    },

    #[error("enum field `{resource}.{field}` declares no values")]
    EmptyEnum { resource: String, field: String },
}
