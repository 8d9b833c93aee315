// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Operation parameter info.

use super::{derived_descriptor, ParameterMetadata};
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{Error, Result};
use crate::mapper::OpenTypeMapper;
use crate::types::{Class, OpenType, TypeClass};
use std::sync::Arc;

const BUILDER: &str = "ParameterInfo";

/// Named, typed operation argument. Carries no value.
#[derive(Debug, Clone)]
pub struct ParameterInfo {
    name: String,
    class: Class,
    open_type: OpenType,
    description: Option<String>,
    descriptor: Descriptor,
    metadata: ParameterMetadata,
}

impl ParameterInfo {
    /// Start a builder; a class and a name are required.
    pub fn builder() -> ParameterInfoBuilder {
        ParameterInfoBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of the argument values.
    pub fn class(&self) -> &Class {
        &self.class
    }

    pub fn open_type(&self) -> &OpenType {
        &self.open_type
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    /// Metadata view, computed at build.
    pub fn metadata(&self) -> &ParameterMetadata {
        &self.metadata
    }
}

/// Builder for [`ParameterInfo`]. Class and name are required.
#[derive(Default)]
pub struct ParameterInfoBuilder {
    class: Option<Class>,
    name: Option<String>,
    description: Option<String>,
    descriptor: DescriptorBuilder,
    mapper: Option<Arc<OpenTypeMapper>>,
}

impl ParameterInfoBuilder {
    #[must_use]
    pub fn with_class<T: TypeClass>(self) -> Self {
        self.with_class_of(T::class())
    }

    #[must_use]
    pub fn with_class_of(mut self, class: Class) -> Self {
        self.class = Some(class);
        self
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
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
    pub fn with_mapper(mut self, mapper: Arc<OpenTypeMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Resolve the parameter class and derive the descriptor.
    pub fn build(self) -> Result<ParameterInfo> {
        let class = self.class.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "class",
        })?;
        let name = self.name.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "name",
        })?;
        if name.is_empty() {
            return Err(Error::InvalidConfig("parameter name must not be empty".into()));
        }

        let mapper = self.mapper.unwrap_or_else(OpenTypeMapper::global);
        let qualified = mapper.settings().qualified_type_names;
        let open_type = mapper.map(&class)?;
        let descriptor = derived_descriptor(&open_type, Some(&class), qualified, &self.descriptor);

        let metadata = ParameterMetadata {
            name: name.clone(),
            type_name: class.display_name(qualified),
            description: self.description.clone(),
            descriptor: descriptor.clone(),
        };
        Ok(ParameterInfo {
            name,
            class,
            open_type,
            description: self.description,
            descriptor,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FIELD_OPEN_TYPE, FIELD_ORIGINAL_TYPE};
    use crate::types::SimpleKind;

    struct Unmapped;
    impl TypeClass for Unmapped {}

    #[test]
    fn test_parameter_descriptor() {
        let info = ParameterInfo::builder()
            .with_class::<Vec<String>>()
            .with_name("hosts")
            .with_description("Hosts to probe")
            .with_descriptor(&Descriptor::builder().with_since("2.1").build())
            .with_mapper(Arc::new(OpenTypeMapper::new()))
            .build()
            .expect("parameter");

        assert_eq!(
            info.open_type(),
            &OpenType::array(OpenType::Simple(SimpleKind::String))
        );
        let descriptor = info.descriptor();
        assert_eq!(
            descriptor.get(FIELD_ORIGINAL_TYPE).and_then(|v| v.as_text()),
            Some("Vec<String>")
        );
        assert!(descriptor.contains(FIELD_OPEN_TYPE));
        assert_eq!(descriptor.get("since").and_then(|v| v.as_text()), Some("2.1"));

        let meta = info.metadata();
        assert_eq!(meta.type_name, "Vec<String>");
        assert_eq!(meta.description.as_deref(), Some("Hosts to probe"));
    }

    #[test]
    fn test_required_fields() {
        let err = ParameterInfo::builder().with_name("x").build().unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "class", .. }));

        let err = ParameterInfo::builder()
            .with_class::<i32>()
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "name", .. }));
    }

    #[test]
    fn test_unmapped_class() {
        let err = ParameterInfo::builder()
            .with_class::<Unmapped>()
            .with_name("x")
            .with_mapper(Arc::new(OpenTypeMapper::new()))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
    }
}
