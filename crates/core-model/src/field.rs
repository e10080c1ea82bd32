// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use heck::{ToLowerCamelCase, ToPascalCase};
use serde::{Deserialize, Serialize};

/// The closed set of field type tags accepted from descriptors.
///
/// Scalar tags map one-to-one to the host ORM's column types; the four
/// relationship tags describe which side of the relation this field sits on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
    Enum,
    OneToOne,
    OneToMany,
    ManyToOne,
    ManyToMany,
}

impl TryFrom<&str> for FieldType {
    type Error = ();

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "boolean" => Ok(FieldType::Boolean),
            "date" => Ok(FieldType::Date),
            "datetime" => Ok(FieldType::DateTime),
            "time" => Ok(FieldType::Time),
            "enum" => Ok(FieldType::Enum),
            "one-to-one" => Ok(FieldType::OneToOne),
            "one-to-many" => Ok(FieldType::OneToMany),
            "many-to-one" => Ok(FieldType::ManyToOne),
            "many-to-many" => Ok(FieldType::ManyToMany),
            _ => Err(()),
        }
    }
}

impl FieldType {
    pub fn as_tag(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::DateTime => "datetime",
            FieldType::Time => "time",
            FieldType::Enum => "enum",
            FieldType::OneToOne => "one-to-one",
            FieldType::OneToMany => "one-to-many",
            FieldType::ManyToOne => "many-to-one",
            FieldType::ManyToMany => "many-to-many",
        }
    }

    /// Does this field point at (or collect) records of another resource?
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            FieldType::OneToOne
                | FieldType::OneToMany
                | FieldType::ManyToOne
                | FieldType::ManyToMany
        )
    }

    /// Does this field hold multiple related records?
    pub fn is_list(&self) -> bool {
        matches!(self, FieldType::OneToMany | FieldType::ManyToMany)
    }

    /// Does the record carry the foreign key for this relation? If so, the
    /// referenced resource must exist before this one can be created, which is
    /// what drives the dependency order.
    pub fn holds_foreign_key(&self) -> bool {
        matches!(self, FieldType::OneToOne | FieldType::ManyToOne)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// One named attribute of a [`Resource`](crate::Resource).
///
/// Reference-typed fields record the *name* of the target resource; the target
/// itself is looked up through the owning dataset on demand, never held as a
/// pointer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub typ: FieldType,
    pub nullable: bool,
    pub primary: bool,
    pub unique: bool,
    /// UI category label for grouping fields in generated forms.
    pub category: String,
    /// Allowed values, for `Enum` fields.
    pub enum_values: Vec<String>,
    /// Name of the resource this field points at, for reference fields.
    pub ref_target: Option<String>,
}

impl Field {
    /// A scalar field with everything else defaulted. Builder and tests fill
    /// in the rest via struct update syntax.
    pub fn scalar(name: impl Into<String>, typ: FieldType) -> Self {
        Field {
            name: name.into(),
            typ,
            nullable: true,
            primary: false,
            unique: false,
            category: String::new(),
            enum_values: vec![],
            ref_target: None,
        }
    }

    pub fn is_reference(&self) -> bool {
        self.typ.is_reference()
    }

    pub fn is_list(&self) -> bool {
        self.typ.is_list()
    }

    pub fn holds_foreign_key(&self) -> bool {
        self.typ.holds_foreign_key()
    }

    pub fn pascal_case_name(&self) -> String {
        self.name.to_pascal_case()
    }

    pub fn camel_case_name(&self) -> String {
        self.name.to_lower_camel_case()
    }

    /// `Text case` form used for generated form captions: `first_name`
    /// becomes `First name`.
    pub fn text_name(&self) -> String {
        text_case(&self.name)
    }

    /// Snake-case plural: only the last segment is pluralized, so
    /// `child_record` becomes `child_records`.
    pub fn plural_name(&self) -> String {
        plural_snake_case(&self.name)
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

pub(crate) fn text_case(name: &str) -> String {
    let mut out = name.replace('_', " ");
    if let Some(first) = out.get(0..1) {
        let upper = first.to_uppercase();
        out.replace_range(0..1, &upper);
    }
    out
}

pub(crate) fn plural_snake_case(name: &str) -> String {
    let mut parts: Vec<&str> = name.split('_').collect();
    let last = parts.pop().unwrap_or(name);
    let plural = pluralizer::pluralize(last, 2, false);
    parts.push(&plural);
    parts.join("_")
}
