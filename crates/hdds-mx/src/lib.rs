// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HDDS-MX - Open-type management introspection
//!
//! Exposes in-process objects through a self-describing management surface:
//! tooling enumerates attributes and operations, reads current values and
//! invokes operations without compile-time knowledge of the domain types.
//!
//! ## Quick Start
//!
//! ```rust
//! use hdds_mx::{
//!     CompositeDataWriter, DynamicInterface, ManagedInterface, OpenTypeMapper, Result,
//!     TabularDataWriter, TypeClass,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Clone)]
//! struct Address {
//!     street1: String,
//!     city: String,
//! }
//! impl TypeClass for Address {}
//!
//! fn main() -> Result<()> {
//!     let mapper = Arc::new(OpenTypeMapper::new());
//!
//!     let address = CompositeDataWriter::<Address>::builder()
//!         .with_type_name("address")
//!         .with_type_description("Address")
//!         .with_simple_attribute("street1", |a: &Address| a.street1.clone())
//!         .with_simple_attribute("city", |a: &Address| a.city.clone())
//!         .with_mapper(Arc::clone(&mapper))
//!         .build()?;
//!
//!     let addresses = TabularDataWriter::<Address>::builder()
//!         .with_type_name("addresses")
//!         .with_type_description("Addresses")
//!         .with_index_name("street1")
//!         .with_composite_data_writer(address)
//!         .with_mapper(Arc::clone(&mapper))
//!         .build()?;
//!
//!     let known = vec![Address { street1: "s1".into(), city: "c".into() }];
//!     let interface = DynamicInterface::builder()
//!         .with_class_name("AddressBook")
//!         .with_simple_attribute("count", "Known addresses", || 1u32)
//!         .with_tabular_attribute("addresses", move || known.clone(), addresses)
//!         .with_mapper(mapper)
//!         .build()?;
//!
//!     let table = interface.attribute("addresses")?;
//!     assert_eq!(table.as_tabular().map(|t| t.len()), Some(1));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  ManagedInterface (metadata / attribute / invoke)             |
//! |    DynamicInterface <- AttributeInfo, OperationInfo           |
//! +---------------------------------------------------------------+
//! |  Writers: CompositeDataWriter<T>, TabularDataWriter<T>        |
//! +---------------------------------------------------------------+
//! |  OpenTypeMapper: Class -> OpenType + converter (memoized)     |
//! +---------------------------------------------------------------+
//! |  Types: OpenType, OpenValue, CompositeData, TabularData       |
//! |  Descriptor: mergeable metadata bag                           |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`OpenTypeMapper`] | Resolves runtime classes to open types |
//! | [`CompositeDataWriter`] | Declares a composite type and extracts values |
//! | [`TabularDataWriter`] | Indexed table of composite rows |
//! | [`AttributeInfo`] | Named, typed, lazily read attribute |
//! | [`DynamicInterface`] | Assembled management interface |
//!
//! ## Features
//!
//! - `serde`: derive `Serialize` for types, values, descriptors and metadata
//!
//! Classes are opt-in: a domain type becomes mappable only when a composite
//! writer for it is registered with the mapper. Nothing is inferred from a
//! type's fields.

/// Descriptor field names, settings and runtime configuration.
pub mod config;
/// Mergeable metadata bags.
pub mod descriptor;
/// Error type.
pub mod error;
/// Attribute, parameter and operation infos.
pub mod info;
/// Management interface contract and dynamic assembler.
pub mod interface;
/// Class to open type mapping.
pub mod mapper;
/// Open types and open values.
pub mod types;
/// Composite and tabular writers.
pub mod writer;

pub use config::{RuntimeConfig, Settings};
pub use descriptor::{Descriptor, DescriptorBuilder, FieldValue};
pub use error::{BoxError, Error, Result};
pub use info::{
    AttributeInfo, AttributeInfoBuilder, AttributeMetadata, Impact, InterfaceMetadata,
    OperationInfo, OperationInfoBuilder, OperationMetadata, ParameterInfo, ParameterInfoBuilder,
    ParameterMetadata,
};
pub use interface::{DynamicInterface, DynamicInterfaceBuilder, ManagedInterface};
pub use mapper::OpenTypeMapper;
pub use types::{
    Class, CompositeData, CompositeItem, CompositeType, OpenType, OpenValue, SimpleKind,
    TabularData, TabularType, TypeClass,
};
pub use writer::{
    CompositeDataWriter, CompositeDataWriterBuilder, TabularDataWriter, TabularDataWriterBuilder,
};

/// HDDS-MX version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests;
