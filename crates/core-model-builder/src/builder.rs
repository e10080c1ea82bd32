// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::convert::TryFrom;

use indexmap::IndexMap;
use tracing::debug;

use core_model::{Dataset, Field, FieldType, Resource};

use crate::descriptor::ResourceDescriptor;
use crate::error::{ModelBuildingError, ValidationError};

/// Accumulates resources and fields, then validates the whole graph at once.
///
/// Nothing is cross-checked while building: `link_reference` may name a
/// resource that is only added later, and duplicate names are merely recorded.
/// [`DatasetBuilder::seal`] settles everything in a single pass and reports
/// every structural error together, so a host can show the user the complete
/// picture instead of one error per run.
pub struct DatasetBuilder {
    name: String,
    resources: IndexMap<String, Resource>,
    pending_links: Vec<(String, String, String)>,
    errors: Vec<ValidationError>,
}

impl DatasetBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        DatasetBuilder {
            name: name.into(),
            resources: IndexMap::new(),
            pending_links: vec![],
            errors: vec![],
        }
    }

    /// Ingest the raw descriptor shape produced by the host's introspection
    /// layer. Unknown type tags are recorded for the seal report; the
    /// offending fields are dropped.
    pub fn from_descriptors(name: impl Into<String>, descriptors: &[ResourceDescriptor]) -> Self {
        let mut builder = DatasetBuilder::new(name);

        for descriptor in descriptors {
            builder.add_resource(&descriptor.name);
            if let Some(resource) = builder.resources.get_mut(&descriptor.name) {
                resource.categories = descriptor.categories.clone();
                resource.description = descriptor.description.clone();
                resource.label = descriptor.extra_info.label.clone();
            }

            for field in &descriptor.fields {
                let typ = match FieldType::try_from(field.type_tag.as_str()) {
                    Ok(typ) => typ,
                    Err(()) => {
                        builder.errors.push(ValidationError::UnknownTypeTag {
                            resource: descriptor.name.clone(),
                            field: field.name.clone(),
                            tag: field.type_tag.clone(),
                        });
                        continue;
                    }
                };
                builder.add_field(
                    &descriptor.name,
                    Field {
                        name: field.name.clone(),
                        typ,
                        nullable: field.nullable,
                        primary: field.primary,
                        unique: field.unique,
                        category: field.category.clone(),
                        enum_values: field.enum_values.clone(),
                        ref_target: field.ref_target.clone(),
                    },
                );
            }
        }

        builder
    }

    /// Add an empty resource. A duplicate name keeps the first resource and
    /// records the error for the seal report.
    pub fn add_resource(&mut self, name: impl Into<String>) {
        let name = name.into();
        if self.resources.contains_key(&name) {
            self.errors.push(ValidationError::DuplicateResource(name));
            return;
        }
        self.resources.insert(name.clone(), Resource::new(name));
    }

    pub fn add_field(&mut self, resource: &str, field: Field) {
        let Some(draft) = self.resources.get_mut(resource) else {
            self.errors
                .push(ValidationError::UnknownResource(resource.to_string()));
            return;
        };
        if draft.field(&field.name).is_some() {
            self.errors.push(ValidationError::DuplicateField {
                resource: resource.to_string(),
                field: field.name,
            });
            return;
        }
        draft.fields.push(field);
    }

    /// Point a reference field at its target resource. Resolved at seal time,
    /// so the target may be added after this call.
    pub fn link_reference(&mut self, resource: &str, field: &str, target: &str) {
        self.pending_links
            .push((resource.to_string(), field.to_string(), target.to_string()));
    }

    pub fn set_label(&mut self, resource: &str, label: impl Into<String>) {
        match self.resources.get_mut(resource) {
            Some(draft) => draft.label = Some(label.into()),
            None => self
                .errors
                .push(ValidationError::UnknownResource(resource.to_string())),
        }
    }

    /// Validate everything in one pass and freeze the dataset.
    pub fn seal(mut self) -> Result<Dataset, ModelBuildingError> {
        let links = std::mem::take(&mut self.pending_links);
        for (resource, field, target) in links {
            self.apply_link(&resource, &field, target);
        }

        for resource in self.resources.values() {
            if resource.fields.is_empty() {
                self.errors
                    .push(ValidationError::EmptyResource(resource.name.clone()));
            }
            for field in &resource.fields {
                if field.is_reference() {
                    match field.ref_target.as_deref() {
                        None => self.errors.push(ValidationError::MissingReferenceTarget {
                            resource: resource.name.clone(),
                            field: field.name.clone(),
                        }),
                        Some(target) if !self.resources.contains_key(target) => {
                            self.errors.push(ValidationError::UnresolvedReference {
                                resource: resource.name.clone(),
                                field: field.name.clone(),
                                target: target.to_string(),
                            })
                        }
                        Some(_) => {}
                    }
                }
                if field.typ == FieldType::Enum && field.enum_values.is_empty() {
                    self.errors.push(ValidationError::EmptyEnum {
                        resource: resource.name.clone(),
                        field: field.name.clone(),
                    });
                }
            }
        }

        if !self.errors.is_empty() {
            return Err(ModelBuildingError::Validation(self.errors));
        }

        debug!(
            dataset = %self.name,
            resources = self.resources.len(),
            "sealed dataset"
        );
        Ok(Dataset::from_resources(
            self.name,
            self.resources.into_values(),
        ))
    }

    fn apply_link(&mut self, resource: &str, field: &str, target: String) {
        let Some(draft) = self.resources.get_mut(resource) else {
            self.errors
                .push(ValidationError::UnknownResource(resource.to_string()));
            return;
        };
        let Some(field) = draft.fields.iter_mut().find(|f| f.name == field) else {
            self.errors.push(ValidationError::UnknownField {
                resource: resource.to_string(),
                field: field.to_string(),
            });
            return;
        };
        if !field.is_reference() {
            self.errors.push(ValidationError::NotAReference {
                resource: resource.to_string(),
                field: field.name.clone(),
            });
            return;
        }
        field.ref_target = Some(target);
    }
}
