// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

/// Malformed label text, reported with the byte offset of the offending token.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("syntax error at byte {position}: {message}")]
pub struct SyntaxError {
    pub position: usize,
    pub message: String,
}

impl SyntaxError {
    pub fn new(position: usize, message: impl Into<String>) -> Self {
        SyntaxError {
            position,
            message: message.into(),
        }
    }
}

/// A field path in a label could not be bound against its owning resource.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("resource `{resource}` has no field `{segment}` (label path root)")]
    RootNotFound { resource: String, segment: String },

    #[error("field `{resource}.{field}` is not a reference and cannot be traversed")]
    NotAReference { resource: String, field: String },

    #[error("resource `{resource}` has no field `{field}`")]
    UnknownField { resource: String, field: String },

    #[error("field `{resource}.{field}` is a reference; a label path must end in a scalar")]
    NotScalar { resource: String, field: String },

    #[error("field `{resource}.{field}` references unknown resource `{target}`")]
    DanglingTarget {
        resource: String,
        field: String,
        target: String,
    },
}

/// A resolved label could not be lowered by the selected backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmitError {
    /// The backend has no lowering for this operator. Recoverable and scoped
    /// to one label; other labels and resources compile normally.
    #[error("unsupported operator `{operator}`")]
    UnsupportedOperator { operator: String },

    #[error("operator `{operator}` expects {expected} argument(s), found {found}")]
    Arity {
        operator: String,
        expected: usize,
        found: usize,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Emit(#[from] EmitError),
}

/// A label failure, carrying the (resource, label) identity so hosts can skip
/// just the offending output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("label `{label}` on resource `{resource}`: {source}")]
pub struct CompileError {
    pub resource: String,
    pub label: String,
    #[source]
    pub source: LabelError,
}

impl CompileError {
    pub fn new(resource: &str, label: &str, source: impl Into<LabelError>) -> Self {
        CompileError {
            resource: resource.to_string(),
            label: label.to_string(),
            source: source.into(),
        }
    }
}
