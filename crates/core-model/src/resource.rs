// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::fmt::{Display, Formatter};

use heck::{ToLowerCamelCase, ToPascalCase, ToSnakeCase};
use serde::{Deserialize, Serialize};

use crate::field::{Field, plural_snake_case, text_case};

/// One record type described to the generator. Field order is the declaration
/// order from the descriptor and is meaningful for UI layout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Resource {
    pub name: String,
    pub fields: Vec<Field>,
    /// Category path used to group resources in generated navigation trees.
    pub categories: Vec<String>,
    /// Raw label DSL string from the descriptor's `extra_info`, compiled on
    /// demand by the label compiler.
    pub label: Option<String>,
    pub description: String,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        Resource {
            name: name.into(),
            fields: vec![],
            categories: vec![],
            label: None,
            description: String::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Fields that contribute to record identity, in declaration order.
    pub fn primary_fields(&self) -> Vec<&Field> {
        self.fields.iter().filter(|f| f.primary).collect()
    }

    /// Reference-typed fields, in declaration order.
    pub fn reference_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_reference())
    }

    /// The smallest ordered field list that uniquely identifies a record.
    ///
    /// Declared primary-key fields win; a resource without any falls back to
    /// its first unique field, and as a last resort to the full field list.
    /// The provenance marker lets callers warn on the degraded fallback.
    pub fn minimal_key_fields(&self) -> MinimalKey<'_> {
        let primary = self.primary_fields();
        if !primary.is_empty() {
            return MinimalKey {
                fields: primary,
                provenance: KeyProvenance::PrimaryKey,
            };
        }

        if let Some(unique) = self.fields.iter().find(|f| f.unique) {
            return MinimalKey {
                fields: vec![unique],
                provenance: KeyProvenance::Unique,
            };
        }

        MinimalKey {
            fields: self.fields.iter().collect(),
            provenance: KeyProvenance::AllFields,
        }
    }

    pub fn pascal_case_name(&self) -> String {
        self.name.to_pascal_case()
    }

    pub fn camel_case_name(&self) -> String {
        self.name.to_lower_camel_case()
    }

    pub fn snake_case_name(&self) -> String {
        self.name.to_snake_case()
    }

    pub fn text_name(&self) -> String {
        text_case(&self.snake_case_name())
    }

    pub fn plural_name(&self) -> String {
        plural_snake_case(&self.snake_case_name())
    }
}

impl Display for Resource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// How a [`MinimalKey`] was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyProvenance {
    /// Declared primary-key fields, in declaration order.
    PrimaryKey,
    /// No primary key; the first field flagged unique stands in.
    Unique,
    /// Degraded fallback: every field participates. Callers should warn.
    AllFields,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinimalKey<'a> {
    pub fields: Vec<&'a Field>,
    pub provenance: KeyProvenance,
}

impl MinimalKey<'_> {
    pub fn is_degraded(&self) -> bool {
        self.provenance == KeyProvenance::AllFields
    }
}
