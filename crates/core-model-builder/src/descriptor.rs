// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The raw input contract: one descriptor per ORM model, as extracted by the
//! host's introspection layer. How the host obtains these from its schema
//! declarations is out of scope; this shape is the only thing the core needs.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ResourceDescriptor {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub extra_info: ExtraInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_tag: String,
    #[serde(default = "default_true")]
    pub nullable: bool,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub ref_target: Option<String>,
    #[serde(default)]
    pub enum_values: Vec<String>,
}

/// Free-form per-model extras. Only `label` is interpreted by the core; hosts
/// may carry additional keys, which are ignored here.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct ExtraInfo {
    #[serde(default)]
    pub label: Option<String>,
}

fn default_true() -> bool {
    true
}
