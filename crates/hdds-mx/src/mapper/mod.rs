// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open-Type Mapper.
//!
//! Resolves a runtime [`Class`] to its [`OpenType`] and to a converter that
//! turns a type-erased value of that class into an [`OpenValue`].
//!
//! # Rules (in priority order)
//!
//! 1. Scalars (`bool`, integers, floats, `char`, strings, `SystemTime`, `()`)
//!    map through a fixed 1:1 table.
//! 2. Sequences (`Vec<T>`, `Box<[T]>`, `[T; N]`) map to `Array(map(T))`.
//! 3. Any other class maps to a composite type only if a
//!    `CompositeDataWriter` for it was registered with this mapper.
//! 4. Everything else is [`Error::UnsupportedType`].
//!
//! Results are memoized per `TypeId` in a concurrent map (insert-once,
//! read-mostly). Failures are not cached, so registering a writer later makes
//! the class resolvable.
//!
//! # Thread Safety
//!
//! - `cache`, `composites`, `type_names`: `DashMap` (sharded, no global lock)
//! - `config`: `ArcSwap` (lock-free loads)

mod simple;

use crate::config::{RuntimeConfig, Settings};
use crate::error::{Error, Result};
use crate::types::{Class, CompositeType, OpenType, OpenValue, SimpleKind, TypeClass};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Converts a type-erased value of a known class into an open value.
pub(crate) type Converter = Arc<dyn Fn(&dyn Any) -> Result<OpenValue> + Send + Sync>;

/// Resolved open type plus converter for one class.
#[derive(Clone)]
pub(crate) struct Mapping {
    pub(crate) open_type: OpenType,
    pub(crate) convert: Converter,
}

/// Class -> open type resolver with a per-class memo.
pub struct OpenTypeMapper {
    config: RuntimeConfig,
    simple: HashMap<TypeId, (SimpleKind, Converter)>,
    cache: DashMap<TypeId, Mapping>,
    composites: DashMap<TypeId, Mapping>,
    type_names: DashMap<String, OpenType>,
}

impl Default for OpenTypeMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OpenTypeMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenTypeMapper")
            .field("settings", &self.settings())
            .field("cached", &self.cache.len())
            .field("composites", &self.composites.len())
            .field("type_names", &self.type_names.len())
            .finish()
    }
}

impl OpenTypeMapper {
    /// Isolated mapper with environment-derived settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::new())
    }

    /// Isolated mapper with explicit settings.
    #[must_use]
    pub fn with_settings(settings: Settings) -> Self {
        Self::with_config(RuntimeConfig::with_settings(settings))
    }

    fn with_config(config: RuntimeConfig) -> Self {
        Self {
            config,
            simple: simple::simple_table(),
            cache: DashMap::new(),
            composites: DashMap::new(),
            type_names: DashMap::new(),
        }
    }

    /// Process-wide mapper used by builders that were not given one.
    pub fn global() -> Arc<OpenTypeMapper> {
        static GLOBAL: OnceLock<Arc<OpenTypeMapper>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(OpenTypeMapper::new()))
            .clone()
    }

    /// Hot-swappable settings of this mapper.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Snapshot of the current settings.
    pub fn settings(&self) -> Settings {
        self.config.settings()
    }

    /// Open type of `class`.
    pub fn map(&self, class: &Class) -> Result<OpenType> {
        self.resolve(class).map(|mapping| mapping.open_type)
    }

    /// Open type of `T`.
    pub fn map_type<T: TypeClass>(&self) -> Result<OpenType> {
        self.map(&T::class())
    }

    /// Whether `class` currently resolves.
    pub fn is_mapped(&self, class: &Class) -> bool {
        self.resolve(class).is_ok()
    }

    /// Whether a composite writer is registered for `class`.
    pub fn is_registered(&self, class: &Class) -> bool {
        self.composites.contains_key(&class.id())
    }

    /// Composite or tabular type registered under `name`.
    pub fn registered_type(&self, name: &str) -> Option<OpenType> {
        self.type_names.get(name).map(|entry| entry.value().clone())
    }

    /// Number of memoized class mappings.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }

    /// Drop memoized mappings. Registrations are kept.
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Claim the type name of a composite or tabular type.
    ///
    /// Re-registering an equal type is a no-op; a different shape under a taken
    /// name is [`Error::TypeNameConflict`]. Simple and array types have no
    /// registered name and always succeed.
    pub fn register_type_name(&self, open_type: &OpenType) -> Result<()> {
        let name = match open_type {
            OpenType::Composite(t) => t.type_name(),
            OpenType::Tabular(t) => t.type_name(),
            OpenType::Simple(_) | OpenType::Array(_) => return Ok(()),
        };
        match self.type_names.entry(name.to_string()) {
            Entry::Occupied(existing) => {
                if existing.get() == open_type {
                    Ok(())
                } else {
                    log::warn!(
                        "[OpenTypeMapper] type name '{}' already registered with a different shape",
                        name
                    );
                    Err(Error::TypeNameConflict {
                        name: name.to_string(),
                    })
                }
            }
            Entry::Vacant(slot) => {
                log::debug!("[OpenTypeMapper] registered type name '{}'", name);
                slot.insert(open_type.clone());
                Ok(())
            }
        }
    }

    /// Make `class` resolvable as `composite_type`, converting through `convert`.
    ///
    /// The first writer registered for a class defines its mapping; later
    /// writers for the same class still claim their own type names.
    pub(crate) fn register_composite(
        &self,
        class: &Class,
        composite_type: Arc<CompositeType>,
        convert: Converter,
    ) -> Result<()> {
        let open_type = OpenType::Composite(composite_type);
        self.register_type_name(&open_type)?;

        if self.simple.contains_key(&class.id()) {
            log::debug!(
                "[OpenTypeMapper] {} is a simple class, writer '{}' is not used for mapping",
                class,
                open_type.type_name()
            );
            return Ok(());
        }

        match self.composites.entry(class.id()) {
            Entry::Occupied(existing) => {
                if existing.get().open_type != open_type {
                    log::debug!(
                        "[OpenTypeMapper] {} stays mapped to '{}', ignoring '{}'",
                        class,
                        existing.get().open_type.type_name(),
                        open_type.type_name()
                    );
                }
            }
            Entry::Vacant(slot) => {
                log::debug!(
                    "[OpenTypeMapper] {} -> composite '{}'",
                    class,
                    open_type.type_name()
                );
                slot.insert(Mapping { open_type, convert });
            }
        }
        Ok(())
    }

    /// Memoized resolution of `class`.
    pub(crate) fn resolve(&self, class: &Class) -> Result<Mapping> {
        if let Some(hit) = self.cache.get(&class.id()) {
            // A sequence always maps to an array and a plain class never does
            if hit.open_type.is_array() == class.element().is_some() {
                return Ok(hit.value().clone());
            }
            drop(hit);
            return self.resolve_uncached(class);
        }

        let mapping = self.resolve_uncached(class)?;
        let entry = self.cache.entry(class.id()).or_insert_with(|| {
            log::debug!(
                "[OpenTypeMapper] cached {} -> {}",
                class,
                mapping.open_type
            );
            mapping.clone()
        });
        Ok(entry.value().clone())
    }

    fn resolve_uncached(&self, class: &Class) -> Result<Mapping> {
        if let Some((kind, convert)) = self.simple.get(&class.id()) {
            return Ok(Mapping {
                open_type: OpenType::Simple(*kind),
                convert: Arc::clone(convert),
            });
        }

        if let (Some(element), Some(elements)) = (class.element(), class.elements_fn()) {
            let inner = self.resolve(element)?;
            let element_convert = inner.convert;
            let convert: Converter = Arc::new(move |value: &dyn Any| -> Result<OpenValue> {
                let items = elements(value).ok_or_else(|| {
                    Error::InvalidValue("value is not of the mapped sequence class".into())
                })?;
                items
                    .into_iter()
                    .map(|item| element_convert(item))
                    .collect::<Result<Vec<_>>>()
                    .map(OpenValue::Array)
            });
            return Ok(Mapping {
                open_type: OpenType::array(inner.open_type),
                convert,
            });
        }

        if let Some(registered) = self.composites.get(&class.id()) {
            return Ok(registered.value().clone());
        }

        Err(Error::UnsupportedType {
            class: class.qualified_name().to_string(),
        })
    }
}
