// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Per-language backends that lower a resolved label expression to a source
//! snippet. Each backend emits an expression over a single free variable
//! [`RECORD_VAR`]; the host embeds the snippet wherever a record of the
//! owning resource is in scope.
//!
//! Backends must agree on semantics: for any record, the Python and
//! TypeScript snippets of the same label evaluate to the same display string.
//! Boolean stringification is the one target-native exception: Python's
//! `str` spells `False` where TypeScript's `String` spells `false`, so
//! booleans flowing through `concat`/`upper`/`lower` are outside the parity
//! contract.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::EmitError;
use crate::typechecker::ResolvedExpr;

mod python;
mod typescript;

pub use python::PythonEmitter;
pub use typescript::TypeScriptEmitter;

/// The free variable every emitted snippet closes over.
pub const RECORD_VAR: &str = "record";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetLanguage {
    Python,
    TypeScript,
}

impl TargetLanguage {
    pub fn all() -> [TargetLanguage; 2] {
        [TargetLanguage::Python, TargetLanguage::TypeScript]
    }
}

impl Display for TargetLanguage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetLanguage::Python => f.write_str("python"),
            TargetLanguage::TypeScript => f.write_str("typescript"),
        }
    }
}

pub trait LabelEmitter {
    fn language(&self) -> TargetLanguage;

    /// Lower `expr` to one source expression in the target language.
    fn emit(&self, expr: &ResolvedExpr) -> Result<String, EmitError>;
}

pub fn emitter_for(target: TargetLanguage) -> &'static dyn LabelEmitter {
    match target {
        TargetLanguage::Python => &PythonEmitter,
        TargetLanguage::TypeScript => &TypeScriptEmitter,
    }
}

pub(crate) fn expect_arity(op: &str, args: &[ResolvedExpr], expected: usize) -> Result<(), EmitError> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(EmitError::Arity {
            operator: op.to_string(),
            expected,
            found: args.len(),
        })
    }
}
