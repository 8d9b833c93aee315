// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tabular value writer.
//!
//! Rows come from a [`CompositeDataWriter`] for the same element type; the
//! table is keyed by the named index members. Index members must be
//! simple-typed. Two rows with equal keys fail the whole `apply` with
//! [`Error::DuplicateKey`].

use super::CompositeDataWriter;
use crate::error::{Error, Result};
use crate::mapper::OpenTypeMapper;
use crate::types::{OpenType, TabularData, TabularType, TypeClass};
use std::fmt;
use std::sync::Arc;

const BUILDER: &str = "TabularDataWriter";

/// Builds [`TabularData`] values from collections of `T`.
pub struct TabularDataWriter<T> {
    tabular_type: Arc<TabularType>,
    open_type: OpenType,
    row_writer: Arc<CompositeDataWriter<T>>,
}

impl<T: TypeClass> TabularDataWriter<T> {
    /// Start a builder for tables of `T` rows.
    pub fn builder() -> TabularDataWriterBuilder<T> {
        TabularDataWriterBuilder::new()
    }

    /// Map every row, in input order.
    pub fn apply<'a, I>(&self, rows: I) -> Result<TabularData>
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        let rows = rows.into_iter();
        let mut table =
            TabularData::with_capacity(Arc::clone(&self.tabular_type), rows.size_hint().0);
        for row in rows {
            table.put(self.row_writer.apply(row)?)?;
        }
        Ok(table)
    }

    /// Same as [`apply`](Self::apply) for owned rows.
    pub fn apply_owned<I>(&self, rows: I) -> Result<TabularData>
    where
        I: IntoIterator<Item = T>,
    {
        let rows = rows.into_iter();
        let mut table =
            TabularData::with_capacity(Arc::clone(&self.tabular_type), rows.size_hint().0);
        for row in rows {
            table.put(self.row_writer.apply(&row)?)?;
        }
        Ok(table)
    }

    /// Declared tabular type.
    pub fn tabular_type(&self) -> &Arc<TabularType> {
        &self.tabular_type
    }

    pub fn open_type(&self) -> &OpenType {
        &self.open_type
    }

    pub fn type_name(&self) -> &str {
        self.tabular_type.type_name()
    }

    pub fn description(&self) -> &str {
        self.tabular_type.description()
    }

    /// Index item names, in key order.
    pub fn index_names(&self) -> &[String] {
        self.tabular_type.index_names()
    }

    /// Writer that builds each row.
    pub fn row_writer(&self) -> &Arc<CompositeDataWriter<T>> {
        &self.row_writer
    }
}

impl<T> fmt::Debug for TabularDataWriter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TabularDataWriter")
            .field("type_name", &self.tabular_type.type_name())
            .field("index_names", &self.tabular_type.index_names())
            .field("row_writer", &self.row_writer)
            .finish()
    }
}

/// Builder for [`TabularDataWriter`].
pub struct TabularDataWriterBuilder<T> {
    type_name: Option<String>,
    type_description: Option<String>,
    index_names: Vec<String>,
    row_writer: Option<Arc<CompositeDataWriter<T>>>,
    mapper: Option<Arc<OpenTypeMapper>>,
}

impl<T: TypeClass> Default for TabularDataWriterBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TypeClass> TabularDataWriterBuilder<T> {
    /// Empty builder; prefer [`TabularDataWriter::builder`].
    pub fn new() -> Self {
        Self {
            type_name: None,
            type_description: None,
            index_names: Vec::new(),
            row_writer: None,
            mapper: None,
        }
    }

    #[must_use]
    pub fn with_type_name(mut self, name: impl Into<String>) -> Self {
        self.type_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_type_description(mut self, description: impl Into<String>) -> Self {
        self.type_description = Some(description.into());
        self
    }

    /// Append an index member. Order is significant.
    #[must_use]
    pub fn with_index_name(mut self, name: impl Into<String>) -> Self {
        self.index_names.push(name.into());
        self
    }

    #[must_use]
    pub fn with_index_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.index_names.extend(names.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn with_composite_data_writer(mut self, writer: Arc<CompositeDataWriter<T>>) -> Self {
        self.row_writer = Some(writer);
        self
    }

    /// Register the table type name with `mapper` instead of the global one.
    #[must_use]
    pub fn with_mapper(mut self, mapper: Arc<OpenTypeMapper>) -> Self {
        self.mapper = Some(mapper);
        self
    }

    /// Validate the index against the row type and claim the type name.
    pub fn build(self) -> Result<Arc<TabularDataWriter<T>>> {
        let type_name = self.type_name.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "type_name",
        })?;
        let type_description = self.type_description.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "type_description",
        })?;
        let row_writer = self.row_writer.ok_or(Error::MissingField {
            builder: BUILDER,
            field: "composite_data_writer",
        })?;

        let tabular_type = Arc::new(
            TabularType::new(
                type_name,
                type_description,
                Arc::clone(row_writer.composite_type()),
                self.index_names,
            )
            .map_err(|err| {
                log::warn!("[TabularDataWriter] build rejected: {}", err);
                err
            })?,
        );
        let open_type = OpenType::Tabular(Arc::clone(&tabular_type));

        let mapper = self.mapper.unwrap_or_else(OpenTypeMapper::global);
        mapper.register_type_name(&open_type)?;

        log::debug!(
            "[TabularDataWriter] built '{}' over '{}' indexed by {:?}",
            tabular_type.type_name(),
            row_writer.type_name(),
            tabular_type.index_names()
        );
        Ok(Arc::new(TabularDataWriter {
            tabular_type,
            open_type,
            row_writer,
        }))
    }
}
