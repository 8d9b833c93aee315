// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Composite value writer.
//!
//! ```rust
//! use hdds_mx::{CompositeDataWriter, OpenTypeMapper, TypeClass};
//! use std::sync::Arc;
//!
//! struct Address {
//!     street: String,
//!     number: i32,
//! }
//! impl TypeClass for Address {}
//!
//! let writer = CompositeDataWriter::<Address>::builder()
//!     .with_type_name("address")
//!     .with_type_description("Postal address")
//!     .with_simple_attribute("street", |a: &Address| a.street.clone())
//!     .with_simple_attribute("number", |a: &Address| a.number)
//!     .with_mapper(Arc::new(OpenTypeMapper::new()))
//!     .build()
//!     .expect("valid writer");
//!
//! let data = writer
//!     .apply(&Address { street: "Main".into(), number: 5 })
//!     .expect("apply");
//! assert_eq!(data.get("number").and_then(|v| v.as_i32()), Some(5));
//! ```

use crate::error::{BoxError, Error, Result};
use crate::mapper::{Converter, OpenTypeMapper};
use crate::types::{
    Class, CompositeData, CompositeItem, CompositeType, OpenType, OpenValue, TypeClass,
};
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

const BUILDER: &str = "CompositeDataWriter";

type Extractor<T> = Box<dyn Fn(&T) -> std::result::Result<OpenValue, BoxError> + Send + Sync>;

/// Binds a member extractor to the converter resolved for its class.
type Bind<T> = Box<dyn FnOnce(Converter) -> Extractor<T>>;

struct PendingMember<T> {
    name: String,
    description: Option<String>,
    class: Class,
    bind: Bind<T>,
}

struct Member<T> {
    name: String,
    extract: Extractor<T>,
}

/// Builds [`CompositeData`] values from `T` instances.
pub struct CompositeDataWriter<T> {
    composite_type: Arc<CompositeType>,
    open_type: OpenType,
    source_class: Class,
    members: Vec<Member<T>>,
    validate_values: bool,
}

impl<T: TypeClass> CompositeDataWriter<T> {
    /// Start a builder for writers over `T`.
    pub fn builder() -> CompositeDataWriterBuilder<T> {
        CompositeDataWriterBuilder::new()
    }

    /// Extract every member from `source`, in registration order.
    ///
    /// A failing extractor yields [`Error::Extraction`] naming the member.
    pub fn apply(&self, source: &T) -> Result<CompositeData> {
        let mut values = Vec::with_capacity(self.members.len());
        for member in &self.members {
            let value = (member.extract)(source).map_err(|source| Error::Extraction {
                member: member.name.clone(),
                source,
            })?;
            values.push(value);
        }

        if self.validate_values {
            CompositeData::new(Arc::clone(&self.composite_type), values)
        } else {
            Ok(CompositeData::new_unchecked(
                Arc::clone(&self.composite_type),
                values,
            ))
        }
    }

    pub fn composite_type(&self) -> &Arc<CompositeType> {
        &self.composite_type
    }

    /// The composite type wrapped as an [`OpenType`].
    pub fn open_type(&self) -> &OpenType {
        &self.open_type
    }

    /// Name of the composite type.
    pub fn type_name(&self) -> &str {
        self.composite_type.type_name()
    }

    pub fn description(&self) -> &str {
        self.composite_type.description()
    }

    /// Member names in registration order.
    pub fn member_names(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|member| member.name.as_str())
    }

    /// Class of the objects this writer reads.
    pub fn source_class(&self) -> &Class {
        &self.source_class
    }
}

impl<T> fmt::Debug for CompositeDataWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeDataWriter")
            .field("type_name", &self.composite_type.type_name())
            .field("source_class", &self.source_class)
            .field(
                "members",
                &self.members.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

/// Builder for [`CompositeDataWriter`].
pub struct CompositeDataWriterBuilder<T> {
    type_name: Option<String>,
    type_description: Option<String>,
    members: Vec<PendingMember<T>>,
    mapper: Option<Arc<OpenTypeMapper>>,
}

impl<T: TypeClass> Default for CompositeDataWriterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TypeClass> CompositeDataWriterBuilder<T> {
    /// Empty builder; prefer [`CompositeDataWriter::builder`].
    pub fn new() -> Self {
        Self {
            type_name: None,
            type_description: None,
            members: Vec::new(),
            mapper: None,
        }
    }

    /// Name of the composite type; unique per mapper unless the shape matches.
    #[must_use]
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    /// Human-readable description of the composite type.
    #[must_use]
    pub fn with_type_description(mut self, description: impl Into<String>) -> Self {
        self.type_description = Some(description.into());
        self
    }

    /// Add a member read by `extract`. Its open type is the mapping of `M`.
    #[must_use]
    pub fn with_simple_attribute<M, F>(self, name: impl Into<String>, extract: F) -> Self
    where
        M: TypeClass,
        F: Fn(&T) -> M + Send + Sync + 'static,
    {
        self.push_member(name.into(), None, M::class(), move |source: &T| {
            Ok::<M, BoxError>(extract(source))
        })
    }

    /// Like [`with_simple_attribute`](Self::with_simple_attribute), with an
    /// item description (defaults to the member name otherwise).
    #[must_use]
    pub fn with_described_attribute<M, F>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
        extract: F,
    ) -> Self
    where
        M: TypeClass,
        F: Fn(&T) -> M + Send + Sync + 'static,
    {
        self.push_member(
            name.into(),
            Some(description.into()),
            M::class(),
            move |source: &T| Ok::<M, BoxError>(extract(source)),
        )
    }

    /// Add a member whose extractor can fail.
    #[must_use]
    pub fn with_fallible_attribute<M, E, F>(self, name: impl Into<String>, extract: F) -> Self
    where
        M: TypeClass,
        E: Into<BoxError>,
        F: Fn(&T) -> std::result::Result<M, E> + Send + Sync + 'static,
    {
        self.push_member(name.into(), None, M::class(), move |source: &T| {
            extract(source).map_err(Into::<BoxError>::into)
        })
    }

    /// Resolve member classes with `mapper` instead of the global one.
    #[must_use]
    pub fn with_mapper(mut self, mapper: Arc<OpenTypeMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    fn push_member<M, F>(
        mut self,
        name: String,
        description: Option<String>,
        class: Class,
        extract: F,
    ) -> Self
    where
        M: 'static,
        F: Fn(&T) -> std::result::Result<M, BoxError> + Send + Sync + 'static,
    {
        let bind: Bind<T> = Box::new(move |convert: Converter| -> Extractor<T> {
            Box::new(move |source: &T| -> std::result::Result<OpenValue, BoxError> {
                let value = extract(source)?;
                convert(&value).map_err(BoxError::from)
            })
        });
        self.members.push(PendingMember {
            name,
            description,
            class,
            bind,
        });
        self
    }

    /// Validate, resolve member types and register the writer's class.
    pub fn build(self) -> Result<Arc<CompositeDataWriter<T>>> {
        let source_class = T::class();
        self.try_build(source_class.clone()).map_err(|err| {
            log::warn!(
                "[CompositeDataWriter] build for {} rejected: {}",
                source_class,
                err
            );
            err
        })
    }

    fn try_build(self, source_class: Class) -> Result<Arc<CompositeDataWriter<T>>> {
        let type_name = self.type_name.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "type_name",
        })?;
        let type_description = self.type_description.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "type_description",
        })?;
        if type_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "composite type name must not be empty".into(),
            ));
        }
        if self.members.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "composite type '{}' has no members",
                type_name
            )));
        }

        let mapper = self.mapper.unwrap_or_else(OpenTypeMapper::global);
        let validate_values = mapper.settings().validate_values;

        let mut seen = HashSet::with_capacity(self.members.len());
        let mut items = Vec::with_capacity(self.members.len());
        let mut members = Vec::with_capacity(self.members.len());
        for pending in self.members {
            if !seen.insert(pending.name.clone()) {
                return Err(Error::DuplicateMember {
                    owner: format!("composite type '{}'", type_name),
                    name: pending.name,
                });
            }
            let mapping = mapper.resolve(&pending.class)?;
            let description = pending
                .description
                .unwrap_or_else(|| pending.name.clone());
            items.push(CompositeItem::new(
                pending.name.clone(),
                description,
                mapping.open_type,
            ));
            members.push(Member {
                name: pending.name,
                extract: (pending.bind)(mapping.convert),
            });
        }

        let composite_type = Arc::new(CompositeType::new(type_name, type_description, items)?);
        let writer = Arc::new(CompositeDataWriter {
            open_type: OpenType::Composite(Arc::clone(&composite_type)),
            composite_type,
            source_class,
            members,
            validate_values,
        });

        let target = Arc::clone(&writer);
        let convert: Converter = Arc::new(move |value: &dyn Any| -> Result<OpenValue> {
            let source = value.downcast_ref::<T>().ok_or_else(|| {
                Error::InvalidValue(format!(
                    "value is not a {}",
                    target.source_class.qualified_name()
                ))
            })?;
            target.apply(source).map(OpenValue::Composite)
        });
        mapper.register_composite(
            &writer.source_class,
            Arc::clone(&writer.composite_type),
            convert,
        )?;

        log::debug!(
            "[CompositeDataWriter] built '{}' for {} ({} members)",
            writer.type_name(),
            writer.source_class,
            writer.members.len()
        );
        Ok(writer)
    }
}
