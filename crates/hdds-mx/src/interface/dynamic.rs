// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic interface assembled from attribute and operation infos.

use super::ManagedInterface;
use crate::config::DEFAULT_INTERFACE_CLASS;
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{Error, Result};
use crate::info::{AttributeInfo, InterfaceMetadata, OperationInfo};
use crate::mapper::OpenTypeMapper;
use crate::types::{OpenValue, TypeClass};
use crate::writer::{CompositeDataWriter, TabularDataWriter};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Attribute resolved against the builder's final mapper.
type PendingAttribute = Box<dyn FnOnce(&Arc<OpenTypeMapper>) -> Result<AttributeInfo>>;

/// Immutable management interface.
///
/// Built once, then read and invoked concurrently; no call mutates it.
pub struct DynamicInterface {
    attributes: Vec<AttributeInfo>,
    attribute_index: HashMap<String, usize>,
    operations: Vec<OperationInfo>,
    operation_index: HashMap<String, usize>,
    metadata: InterfaceMetadata,
}

impl DynamicInterface {
    /// Start an empty interface builder.
    pub fn builder() -> DynamicInterfaceBuilder {
        DynamicInterfaceBuilder::default()
    }

    /// Class name reported in the metadata.
    pub fn class_name(&self) -> &str {
        &self.metadata.class_name
    }

    pub fn description(&self) -> Option<&str> {
        self.metadata.description.as_deref()
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.metadata.descriptor
    }

    /// Attribute record for `name`.
    pub fn attribute_info(&self, name: &str) -> Option<&AttributeInfo> {
        self.attribute_index
            .get(name)
            .map(|&index| &self.attributes[index])
    }

    /// Operation record for `name`.
    pub fn operation_info(&self, name: &str) -> Option<&OperationInfo> {
        self.operation_index
            .get(name)
            .map(|&index| &self.operations[index])
    }

    /// Attribute names in declaration order.
    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|info| info.name())
    }

    /// Operation names in declaration order.
    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(|info| info.name())
    }
}

impl ManagedInterface for DynamicInterface {
    fn metadata(&self) -> &InterfaceMetadata {
        &self.metadata
    }

    fn attribute(&self, name: &str) -> Result<OpenValue> {
        let info = self
            .attribute_info(name)
            .ok_or_else(|| Error::AttributeNotFound(name.to_string()))?;
        info.value().map_err(|err| {
            log::warn!(
                "[DynamicInterface] {}: read of '{}' failed: {}",
                self.class_name(),
                name,
                err
            );
            err
        })
    }

    fn invoke(&self, operation: &str, args: &[OpenValue]) -> Result<OpenValue> {
        let info = self
            .operation_info(operation)
            .ok_or_else(|| Error::OperationNotFound(operation.to_string()))?;
        info.invoke(args).map_err(|err| {
            log::warn!(
                "[DynamicInterface] {}: invoke of '{}' failed: {}",
                self.class_name(),
                operation,
                err
            );
            err
        })
    }
}

impl fmt::Debug for DynamicInterface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicInterface")
            .field("class_name", &self.metadata.class_name)
            .field("attributes", &self.attributes)
            .field("operations", &self.operations)
            .finish()
    }
}

/// Builder for [`DynamicInterface`].
///
/// Convenience attribute methods are resolved in `build()`, against the
/// mapper set by [`with_mapper`](Self::with_mapper) (or the global one); the
/// first failure is returned from `build()`.
#[derive(Default)]
pub struct DynamicInterfaceBuilder {
    class_name: Option<String>,
    description: Option<String>,
    descriptor: DescriptorBuilder,
    attributes: Vec<PendingAttribute>,
    operations: Vec<OperationInfo>,
    mapper: Option<Arc<OpenTypeMapper>>,
}

impl DynamicInterfaceBuilder {
    /// Name reported in the metadata. Defaults to `DynamicInterface`.
    #[must_use]
    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_descriptor(mut self, descriptor: &Descriptor) -> Self {
        self.descriptor = self.descriptor.with_descriptor(descriptor);
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, info: AttributeInfo) -> Self {
        self.attributes.push(Box::new(move |_: &Arc<OpenTypeMapper>| Ok(info)));
        self
    }

    /// Plain attribute read through `supplier`.
    #[must_use]
    pub fn with_simple_attribute<V, F>(
        mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        supplier: F,
    ) -> Self
    where
        V: TypeClass,
        F: Fn() -> V + Send + Sync + 'static,
    {
        let name = name.into();
        let description = description.into();
        self.attributes
            .push(Box::new(move |mapper: &Arc<OpenTypeMapper>| {
                AttributeInfo::builder()
                    .with_name(name)
                    .with_description(description)
                    .with_supplier(supplier)
                    .with_mapper(Arc::clone(mapper))
                    .build()
            }));
        self
    }

    /// Composite attribute; the description is the writer's type description.
    #[must_use]
    pub fn with_composite_attribute<T, F>(
        mut self,
        name: impl Into<String>,
        supplier: F,
        writer: Arc<CompositeDataWriter<T>>,
    ) -> Self
    where
        T: TypeClass,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let name = name.into();
        self.attributes
            .push(Box::new(move |mapper: &Arc<OpenTypeMapper>| {
                AttributeInfo::builder()
                    .with_name(name)
                    .with_description(writer.description())
                    .with_composite_supplier(writer, supplier)
                    .with_mapper(Arc::clone(mapper))
                    .build()
            }));
        self
    }

    /// Tabular attribute; the description is the writer's type description.
    #[must_use]
    pub fn with_tabular_attribute<T, F>(
        mut self,
        name: impl Into<String>,
        supplier: F,
        writer: Arc<TabularDataWriter<T>>,
    ) -> Self
    where
        T: TypeClass,
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        let name = name.into();
        self.attributes
            .push(Box::new(move |mapper: &Arc<OpenTypeMapper>| {
                AttributeInfo::builder()
                    .with_name(name)
                    .with_description(writer.description())
                    .with_tabular_supplier(writer, supplier)
                    .with_mapper(Arc::clone(mapper))
                    .build()
            }));
        self
    }

    #[must_use]
    pub fn with_operation(mut self, info: OperationInfo) -> Self {
        self.operations.push(info);
        self
    }

    #[must_use]
    pub fn with_mapper(mut self, mapper: Arc<OpenTypeMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Resolve every attribute and check that attribute names and operation
    /// names are each unique.
    pub fn build(self) -> Result<DynamicInterface> {
        let class_name = self
            .class_name
            .unwrap_or_else(|| DEFAULT_INTERFACE_CLASS.to_string());
        let mapper = self.mapper.unwrap_or_else(OpenTypeMapper::global);
        let owner = || format!("interface '{}'", class_name);

        let mut attributes = Vec::with_capacity(self.attributes.len());
        let mut attribute_index = HashMap::with_capacity(self.attributes.len());
        for pending in self.attributes {
            let info = pending(&mapper)?;
            if attribute_index.contains_key(info.name()) {
                return Err(Error::DuplicateMember {
                    owner: owner(),
                    name: info.name().to_string(),
                });
            }
            attribute_index.insert(info.name().to_string(), attributes.len());
            attributes.push(info);
        }

        let mut operation_index = HashMap::with_capacity(self.operations.len());
        for (index, info) in self.operations.iter().enumerate() {
            if operation_index.insert(info.name().to_string(), index).is_some() {
                return Err(Error::DuplicateMember {
                    owner: owner(),
                    name: info.name().to_string(),
                });
            }
        }

        let metadata = InterfaceMetadata {
            class_name: class_name.clone(),
            description: self.description,
            attributes: attributes.iter().map(|info| info.metadata().clone()).collect(),
            operations: self
                .operations
                .iter()
                .map(|info| info.metadata().clone())
                .collect(),
            descriptor: self.descriptor.build(),
        };

        log::debug!(
            "[DynamicInterface] built '{}' ({} attributes, {} operations)",
            class_name,
            attributes.len(),
            self.operations.len()
        );
        Ok(DynamicInterface {
            attributes,
            attribute_index,
            operations: self.operations,
            operation_index,
            metadata,
        })
    }
}
