// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read-only attribute info.

use super::{derived_descriptor, AttributeMetadata};
use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::error::{BoxError, Error, Result};
use crate::mapper::OpenTypeMapper;
use crate::types::{Class, OpenType, OpenValue, TypeClass};
use crate::writer::{CompositeDataWriter, TabularDataWriter};
use std::fmt;
use std::sync::Arc;

const BUILDER: &str = "AttributeInfo";

type Supplier = Box<dyn Fn() -> std::result::Result<OpenValue, BoxError> + Send + Sync>;

/// Value source waiting for the mapper; yields the open type and the supplier.
type Resolve = Box<dyn FnOnce(&OpenTypeMapper) -> Result<(OpenType, Supplier)>>;

struct PendingSource {
    class: Class,
    resolve: Resolve,
}

/// Named, typed, lazily read attribute.
///
/// The supplier runs on every [`value`](Self::value) call; nothing is cached.
pub struct AttributeInfo {
    name: String,
    class: Class,
    open_type: OpenType,
    description: Option<String>,
    descriptor: Descriptor,
    supplier: Supplier,
    metadata: AttributeMetadata,
}

impl AttributeInfo {
    /// Start a builder; a name and exactly one value source are required.
    pub fn builder() -> AttributeInfoBuilder {
        AttributeInfoBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class of the values the supplier produces.
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

    /// Read the current value.
    pub fn value(&self) -> Result<OpenValue> {
        (self.supplier)().map_err(|source| Error::AttributeRead {
            attribute: self.name.clone(),
            source,
        })
    }

    /// Metadata view, computed at build.
    pub fn metadata(&self) -> &AttributeMetadata {
        &self.metadata
    }
}

impl fmt::Debug for AttributeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttributeInfo")
            .field("name", &self.name)
            .field("class", &self.class)
            .field("open_type", &self.open_type)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Builder for [`AttributeInfo`].
#[derive(Default)]
pub struct AttributeInfoBuilder {
    name: Option<String>,
    description: Option<String>,
    descriptor: DescriptorBuilder,
    sources: Vec<PendingSource>,
    mapper: Option<Arc<OpenTypeMapper>>,
}

impl AttributeInfoBuilder {
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

    /// Merge caller fields; they win over the derived ones.
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

    /// Plain value supplier. `V` must be a mapped class.
    #[must_use]
    pub fn with_supplier<V, F>(self, supplier: F) -> Self
    where
        V: TypeClass,
        F: Fn() -> V + Send + Sync + 'static,
    {
        self.with_fallible_supplier(move || Ok::<V, BoxError>(supplier()))
    }

    /// Supplier that can fail; failures surface as [`Error::AttributeRead`].
    #[must_use]
    pub fn with_fallible_supplier<V, E, F>(mut self, supplier: F) -> Self
    where
        V: TypeClass,
        E: Into<BoxError>,
        F: Fn() -> std::result::Result<V, E> + Send + Sync + 'static,
    {
        let class = V::class();
        let lookup = class.clone();
        let resolve: Resolve = Box::new(move |mapper: &OpenTypeMapper| -> Result<(OpenType, Supplier)> {
            let mapping = mapper.resolve(&lookup)?;
            let convert = mapping.convert;
            let supplier: Supplier = Box::new(move || -> std::result::Result<OpenValue, BoxError> {
                let value = supplier().map_err(Into::<BoxError>::into)?;
                convert(&value).map_err(BoxError::from)
            });
            Ok((mapping.open_type, supplier))
        });
        self.sources.push(PendingSource { class, resolve });
        self
    }

    /// Composite attribute: `supplier` yields the source instance, `writer`
    /// turns it into a composite value on each read.
    #[must_use]
    pub fn with_composite_supplier<T, F>(
        mut self,
        writer: Arc<CompositeDataWriter<T>>,
        supplier: F,
    ) -> Self
    where
        T: TypeClass,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let resolve: Resolve = Box::new(move |_: &OpenTypeMapper| -> Result<(OpenType, Supplier)> {
            let open_type = writer.open_type().clone();
            let supplier: Supplier = Box::new(move || {
                writer
                    .apply(&supplier())
                    .map(OpenValue::Composite)
                    .map_err(BoxError::from)
            });
            Ok((open_type, supplier))
        });
        self.sources.push(PendingSource {
            class: T::class(),
            resolve,
        });
        self
    }

    /// Tabular attribute: `supplier` yields the rows, `writer` builds the
    /// table on each read.
    #[must_use]
    pub fn with_tabular_supplier<T, F>(
        mut self,
        writer: Arc<TabularDataWriter<T>>,
        supplier: F,
    ) -> Self
    where
        T: TypeClass,
        F: Fn() -> Vec<T> + Send + Sync + 'static,
    {
        let resolve: Resolve = Box::new(move |_: &OpenTypeMapper| -> Result<(OpenType, Supplier)> {
            let open_type = writer.open_type().clone();
            let supplier: Supplier = Box::new(move || {
                writer
                    .apply(&supplier())
                    .map(OpenValue::Tabular)
                    .map_err(BoxError::from)
            });
            Ok((open_type, supplier))
        });
        self.sources.push(PendingSource {
            class: <Vec<T>>::class(),
            resolve,
        });
        self
    }

    /// Resolve the value source and derive the descriptor.
    pub fn build(mut self) -> Result<AttributeInfo> {
        let name = self.name.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "name",
        })?;
        if name.is_empty() {
            return Err(Error::InvalidConfig("attribute name must not be empty".into()));
        }
        if self.sources.len() > 1 {
            return Err(Error::InvalidConfig(format!(
                "attribute '{}' has {} value sources, expected one",
                name,
                self.sources.len()
            )));
        }
        let source = self.sources.pop().ok_or(Error::MissingField {
            builder: BUILDER,
            field: "supplier",
        })?;

        let mapper = self.mapper.unwrap_or_else(OpenTypeMapper::global);
        let settings = mapper.settings();
        let (open_type, supplier) = (source.resolve)(&mapper).map_err(|err| {
            log::warn!("[AttributeInfo] '{}' rejected: {}", name, err);
            err
        })?;

        let descriptor = derived_descriptor(
            &open_type,
            Some(&source.class),
            settings.qualified_type_names,
            &self.descriptor,
        );
        let metadata = AttributeMetadata {
            name: name.clone(),
            type_name: open_type.class_name(),
            description: self.description.clone(),
            readable: true,
            writable: false,
            is_getter: false,
            descriptor: descriptor.clone(),
        };

        Ok(AttributeInfo {
            name,
            class: source.class,
            open_type,
            description: self.description,
            descriptor,
            supplier,
            metadata,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FIELD_OPEN_TYPE, FIELD_ORIGINAL_TYPE};
    use crate::types::SimpleKind;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Gauge {
        level: f64,
    }
    impl TypeClass for Gauge {}

    struct Unmapped;
    impl TypeClass for Unmapped {}

    fn mapper() -> Arc<OpenTypeMapper> {
        Arc::new(OpenTypeMapper::new())
    }

    #[test]
    fn test_simple_attribute() {
        let info = AttributeInfo::builder()
            .with_name("uptime")
            .with_description("Seconds since start")
            .with_supplier(|| 42u64)
            .with_mapper(mapper())
            .build()
            .expect("info");

        assert_eq!(info.open_type(), &OpenType::Simple(SimpleKind::U64));
        assert_eq!(info.value().expect("value"), OpenValue::U64(42));

        let meta = info.metadata();
        assert_eq!(meta.name, "uptime");
        assert_eq!(meta.type_name, "u64");
        assert_eq!(meta.description.as_deref(), Some("Seconds since start"));
        assert!(meta.readable);
        assert!(!meta.writable);
        assert!(!meta.is_getter);
        assert_eq!(
            meta.descriptor.get(FIELD_ORIGINAL_TYPE).and_then(|v| v.as_text()),
            Some("u64")
        );
    }

    #[test]
    fn test_supplier_runs_per_read() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let info = AttributeInfo::builder()
            .with_name("reads")
            .with_supplier(move || counter.fetch_add(1, Ordering::SeqCst) as u64)
            .with_mapper(mapper())
            .build()
            .expect("info");

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(info.value().expect("first"), OpenValue::U64(0));
        assert_eq!(info.value().expect("second"), OpenValue::U64(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_caller_descriptor_wins() {
        let caller = Descriptor::builder()
            .with_original_type("custom")
            .with_units("seconds")
            .build();
        let info = AttributeInfo::builder()
            .with_name("uptime")
            .with_supplier(|| 1i64)
            .with_descriptor(&caller)
            .with_mapper(mapper())
            .build()
            .expect("info");

        let descriptor = info.descriptor();
        assert_eq!(descriptor.get(FIELD_ORIGINAL_TYPE).and_then(|v| v.as_text()), Some("custom"));
        assert_eq!(descriptor.get("units").and_then(|v| v.as_text()), Some("seconds"));
        assert_eq!(
            descriptor.get(FIELD_OPEN_TYPE).and_then(|v| v.as_open_type()),
            Some(&OpenType::Simple(SimpleKind::I64))
        );
    }

    #[test]
    fn test_composite_attribute() {
        let mapper = mapper();
        let writer = CompositeDataWriter::<Gauge>::builder()
            .with_type_name("gauge")
            .with_type_description("Gauge")
            .with_simple_attribute("level", |g: &Gauge| g.level)
            .with_mapper(Arc::clone(&mapper))
            .build()
            .expect("writer");

        let info = AttributeInfo::builder()
            .with_name("gauge")
            .with_composite_supplier(writer, || Gauge { level: 0.5 })
            .with_mapper(mapper)
            .build()
            .expect("info");

        assert_eq!(info.metadata().type_name, "CompositeData");
        assert_eq!(
            info.descriptor().get(FIELD_ORIGINAL_TYPE).and_then(|v| v.as_text()),
            Some("Gauge")
        );
        let value = info.value().expect("value");
        let data = value.as_composite().expect("composite");
        assert_eq!(data.get("level").and_then(|v| v.as_f64()), Some(0.5));
    }

    #[test]
    fn test_qualified_original_type() {
        let mapper = Arc::new(OpenTypeMapper::with_settings(
            crate::config::Settings::default().with_qualified_type_names(true),
        ));
        let info = AttributeInfo::builder()
            .with_name("label")
            .with_supplier(String::new)
            .with_mapper(mapper)
            .build()
            .expect("info");
        assert_eq!(
            info.descriptor().get(FIELD_ORIGINAL_TYPE).and_then(|v| v.as_text()),
            Some(std::any::type_name::<String>())
        );
    }

    #[test]
    fn test_build_errors() {
        let err = AttributeInfo::builder()
            .with_supplier(|| 1i32)
            .with_mapper(mapper())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "name", .. }));

        let err = AttributeInfo::builder()
            .with_name("x")
            .with_mapper(mapper())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "supplier", .. }));

        let err = AttributeInfo::builder()
            .with_name("x")
            .with_supplier(|| Unmapped)
            .with_mapper(mapper())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { .. }));
    }

    #[test]
    fn test_second_value_source_rejected() {
        let err = AttributeInfo::builder()
            .with_name("level")
            .with_supplier(|| 1i32)
            .with_fallible_supplier(|| Ok::<i32, BoxError>(2))
            .with_mapper(mapper())
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("level")));
    }

    #[test]
    fn test_supplier_failure_is_read_error() {
        let info = AttributeInfo::builder()
            .with_name("temperature")
            .with_fallible_supplier(|| Err::<f64, _>("sensor offline"))
            .with_mapper(mapper())
            .build()
            .expect("info");

        match info.value().unwrap_err() {
            Error::AttributeRead { attribute, source } => {
                assert_eq!(attribute, "temperature");
                assert_eq!(source.to_string(), "sensor offline");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
