// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite and tabular value writers.
//!
//! A writer is a schema plus extractors: it is built once, shared behind an
//! `Arc`, and turns live domain objects into fresh [`CompositeData`] /
//! [`TabularData`] values on every call.
//!
//! Building a [`CompositeDataWriter`] registers its source class with the
//! mapper, which is what makes the class usable as a member of other
//! writers, as an attribute value, or as a table row.
//!
//! [`CompositeData`]: crate::CompositeData
//! [`TabularData`]: crate::TabularData

mod composite;
mod tabular;

pub use composite::{CompositeDataWriter, CompositeDataWriterBuilder};
pub use tabular::{TabularDataWriter, TabularDataWriterBuilder};
