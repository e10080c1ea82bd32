// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Builds a sealed [`core_model::Dataset`] from raw resource descriptors.
//!
//! Construction is a two-phase lifecycle: [`DatasetBuilder`] accumulates
//! resources, fields, and reference links without validating anything across
//! resources (forward references are expected), then [`DatasetBuilder::seal`]
//! validates the whole graph in one pass and either returns the immutable
//! dataset or every structural error found.

pub mod builder;
pub mod descriptor;
pub mod error;

pub use builder::DatasetBuilder;
pub use descriptor::{ExtraInfo, FieldDescriptor, ResourceDescriptor};
pub use error::{ModelBuildingError, ValidationError};
