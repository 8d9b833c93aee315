// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open type descriptors.

use crate::config::{CLASS_COMPOSITE_DATA, CLASS_TABULAR_DATA};
use crate::error::{Error, Result};
use crate::types::OpenValue;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Simple (scalar) kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SimpleKind {
    Void,
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    /// Wall-clock instant (`SystemTime`).
    Date,
}

impl SimpleKind {
    /// Protocol name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Void => "void",
            Self::Bool => "bool",
            Self::Char => "char",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::String => "string",
            Self::Date => "date",
        }
    }

    /// Value class reported in metadata.
    pub fn class_name(&self) -> &'static str {
        match self {
            Self::Void => "()",
            Self::String => "String",
            Self::Date => "SystemTime",
            other => other.name(),
        }
    }
}

impl fmt::Display for SimpleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the closed set of protocol value types.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OpenType {
    Simple(SimpleKind),
    Array(Box<OpenType>),
    Composite(Arc<CompositeType>),
    Tabular(Arc<TabularType>),
}

impl OpenType {
    pub const fn simple(kind: SimpleKind) -> Self {
        Self::Simple(kind)
    }

    /// Array of `element`.
    pub fn array(element: OpenType) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn is_simple(&self) -> bool {
        matches!(self, Self::Simple(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Composite type, if this is one.
    pub fn as_composite(&self) -> Option<&Arc<CompositeType>> {
        match self {
            Self::Composite(t) => Some(t),
            _ => None,
        }
    }

    /// Tabular type, if this is one.
    pub fn as_tabular(&self) -> Option<&Arc<TabularType>> {
        match self {
            Self::Tabular(t) => Some(t),
            _ => None,
        }
    }

    /// Registered type name for composite/tabular types, protocol name otherwise.
    pub fn type_name(&self) -> String {
        match self {
            Self::Simple(kind) => kind.name().to_string(),
            Self::Array(element) => format!("[{}]", element.type_name()),
            Self::Composite(t) => t.type_name().to_string(),
            Self::Tabular(t) => t.type_name().to_string(),
        }
    }

    /// Value class reported in attribute, parameter and operation metadata.
    pub fn class_name(&self) -> String {
        match self {
            Self::Simple(kind) => kind.class_name().to_string(),
            Self::Array(element) => format!("[{}]", element.class_name()),
            Self::Composite(_) => CLASS_COMPOSITE_DATA.to_string(),
            Self::Tabular(_) => CLASS_TABULAR_DATA.to_string(),
        }
    }

    /// Check whether `value` is a value of this type.
    pub fn is_value(&self, value: &OpenValue) -> bool {
        match (self, value) {
            (Self::Simple(kind), v) => v.simple_kind() == Some(*kind),
            (Self::Array(element), OpenValue::Array(items)) => {
                items.iter().all(|item| element.is_value(item))
            }
            (Self::Composite(t), OpenValue::Composite(data)) => **t == **data.composite_type(),
            (Self::Tabular(t), OpenValue::Tabular(data)) => **t == **data.tabular_type(),
            _ => false,
        }
    }
}

impl fmt::Display for OpenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(kind) => write!(f, "{}", kind),
            Self::Array(element) => write!(f, "array<{}>", element),
            Self::Composite(t) => write!(f, "composite<{}>", t.type_name()),
            Self::Tabular(t) => write!(f, "tabular<{}>", t.type_name()),
        }
    }
}

/// Composite type member.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeItem {
    pub name: String,
    pub description: String,
    pub open_type: OpenType,
}

impl CompositeItem {
    /// Item named `name` of type `open_type`.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        open_type: OpenType,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            open_type,
        }
    }
}

/// Struct-like type: named, ordered, typed items.
///
/// Equality compares the type name and the item set (name + type). Item order
/// and descriptions are display concerns and do not take part.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeType {
    type_name: String,
    description: String,
    items: Vec<CompositeItem>,
}

impl CompositeType {
    /// Create a composite type, validating names.
    pub fn new(
        type_name: impl Into<String>,
        description: impl Into<String>,
        items: Vec<CompositeItem>,
    ) -> Result<Self> {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "composite type name must not be empty".into(),
            ));
        }
        if items.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "composite type '{}' has no items",
                type_name
            )));
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if item.name.is_empty() {
                return Err(Error::InvalidConfig(format!(
                    "composite type '{}' has an unnamed item",
                    type_name
                )));
            }
            if !seen.insert(item.name.as_str()) {
                return Err(Error::DuplicateMember {
                    owner: format!("composite type '{}'", type_name),
                    name: item.name.clone(),
                });
            }
        }
        Ok(Self {
            type_name,
            description: description.into(),
            items,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Items in declaration order.
    pub fn items(&self) -> &[CompositeItem] {
        &self.items
    }

    /// Item named `name`.
    pub fn item(&self, name: &str) -> Option<&CompositeItem> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Declaration position of item `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.items.iter().position(|item| item.name == name)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.index_of(name).is_some()
    }

    /// Item names in declaration order.
    pub fn key_set(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PartialEq for CompositeType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.items.len() == other.items.len()
            && self.items.iter().all(|item| {
                other
                    .item(&item.name)
                    .is_some_and(|theirs| theirs.open_type == item.open_type)
            })
    }
}

/// Indexed collection type: rows of one composite type keyed by index items.
///
/// Equality compares the type name, the row type and the index names; the
/// description does not take part.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TabularType {
    type_name: String,
    description: String,
    row_type: Arc<CompositeType>,
    index_names: Vec<String>,
}

impl TabularType {
    /// Create a tabular type. Index names must be distinct simple-typed row items.
    pub fn new(
        type_name: impl Into<String>,
        description: impl Into<String>,
        row_type: Arc<CompositeType>,
        index_names: Vec<String>,
    ) -> Result<Self> {
        let type_name = type_name.into();
        if type_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "tabular type name must not be empty".into(),
            ));
        }
        if index_names.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "tabular type '{}' has no index names",
                type_name
            )));
        }
        let mut seen = HashSet::with_capacity(index_names.len());
        for name in &index_names {
            let valid = row_type
                .item(name)
                .is_some_and(|item| item.open_type.is_simple());
            if !valid || !seen.insert(name.as_str()) {
                return Err(Error::InvalidIndex {
                    table: type_name,
                    name: name.clone(),
                });
            }
        }
        Ok(Self {
            type_name,
            description: description.into(),
            row_type,
            index_names,
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Composite type shared by every row.
    pub fn row_type(&self) -> &Arc<CompositeType> {
        &self.row_type
    }

    /// Items whose values key a row, in key order.
    pub fn index_names(&self) -> &[String] {
        &self.index_names
    }
}

impl PartialEq for TabularType {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name
            && self.row_type == other.row_type
            && self.index_names == other.index_names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_type() -> CompositeType {
        CompositeType::new(
            "address",
            "Address",
            vec![
                CompositeItem::new("street1", "Street 1", OpenType::Simple(SimpleKind::String)),
                CompositeItem::new("city", "City", OpenType::Simple(SimpleKind::String)),
                CompositeItem::new("zip", "Zip", OpenType::Simple(SimpleKind::U32)),
            ],
        )
        .expect("address type")
    }

    #[test]
    fn test_composite_equality_ignores_order_and_descriptions() {
        let reordered = CompositeType::new(
            "address",
            "Postal address",
            vec![
                CompositeItem::new("zip", "", OpenType::Simple(SimpleKind::U32)),
                CompositeItem::new("city", "", OpenType::Simple(SimpleKind::String)),
                CompositeItem::new("street1", "", OpenType::Simple(SimpleKind::String)),
            ],
        )
        .expect("reordered");
        assert_eq!(address_type(), reordered);

        let retyped = CompositeType::new(
            "address",
            "Address",
            vec![
                CompositeItem::new("street1", "", OpenType::Simple(SimpleKind::String)),
                CompositeItem::new("city", "", OpenType::Simple(SimpleKind::String)),
                CompositeItem::new("zip", "", OpenType::Simple(SimpleKind::String)),
            ],
        )
        .expect("retyped");
        assert_ne!(address_type(), retyped);
    }

    #[test]
    fn test_composite_rejects_duplicates() {
        let result = CompositeType::new(
            "pair",
            "Pair",
            vec![
                CompositeItem::new("a", "", OpenType::Simple(SimpleKind::I32)),
                CompositeItem::new("a", "", OpenType::Simple(SimpleKind::I64)),
            ],
        );
        assert!(matches!(result, Err(Error::DuplicateMember { .. })));
    }

    #[test]
    fn test_tabular_index_validation() {
        let row = Arc::new(address_type());
        assert!(TabularType::new("addresses", "Addresses", row.clone(), vec!["street1".into()]).is_ok());

        let missing = TabularType::new("addresses", "Addresses", row.clone(), vec!["country".into()]);
        assert!(matches!(missing, Err(Error::InvalidIndex { .. })));

        let none = TabularType::new("addresses", "Addresses", row, vec![]);
        assert!(matches!(none, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_class_names() {
        assert_eq!(OpenType::Simple(SimpleKind::String).class_name(), "String");
        assert_eq!(
            OpenType::array(OpenType::Simple(SimpleKind::I32)).class_name(),
            "[i32]"
        );
        let composite = OpenType::Composite(Arc::new(address_type()));
        assert_eq!(composite.class_name(), "CompositeData");
        assert_eq!(composite.type_name(), "address");
    }
}
