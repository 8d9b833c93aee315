// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open values: simple scalars, arrays, composite and tabular data.

use crate::error::{Error, Result};
use crate::types::{CompositeType, SimpleKind, TabularType};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// A value of one of the open types.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum OpenValue {
    Void,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Date(SystemTime),
    Array(Vec<OpenValue>),
    Composite(CompositeData),
    Tabular(TabularData),
}

impl OpenValue {
    /// Simple kind of this value, `None` for arrays, composites and tables.
    pub fn simple_kind(&self) -> Option<SimpleKind> {
        Some(match self {
            Self::Void => SimpleKind::Void,
            Self::Bool(_) => SimpleKind::Bool,
            Self::Char(_) => SimpleKind::Char,
            Self::I8(_) => SimpleKind::I8,
            Self::I16(_) => SimpleKind::I16,
            Self::I32(_) => SimpleKind::I32,
            Self::I64(_) => SimpleKind::I64,
            Self::U8(_) => SimpleKind::U8,
            Self::U16(_) => SimpleKind::U16,
            Self::U32(_) => SimpleKind::U32,
            Self::U64(_) => SimpleKind::U64,
            Self::F32(_) => SimpleKind::F32,
            Self::F64(_) => SimpleKind::F64,
            Self::String(_) => SimpleKind::String,
            Self::Date(_) => SimpleKind::Date,
            Self::Array(_) | Self::Composite(_) | Self::Tabular(_) => return None,
        })
    }

    /// Whether this is the unit value.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Self::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Self::U32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<SystemTime> {
        match self {
            Self::Date(v) => Some(*v),
            _ => None,
        }
    }

    /// Elements of an array value.
    pub fn as_array(&self) -> Option<&[OpenValue]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    /// Composite payload, if this is a composite value.
    pub fn as_composite(&self) -> Option<&CompositeData> {
        match self {
            Self::Composite(v) => Some(v),
            _ => None,
        }
    }

    /// Table payload, if this is a tabular value.
    pub fn as_tabular(&self) -> Option<&TabularData> {
        match self {
            Self::Tabular(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for OpenValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => f.write_str("()"),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{:?}", v),
            Self::I8(v) => write!(f, "{}", v),
            Self::I16(v) => write!(f, "{}", v),
            Self::I32(v) => write!(f, "{}", v),
            Self::I64(v) => write!(f, "{}", v),
            Self::U8(v) => write!(f, "{}", v),
            Self::U16(v) => write!(f, "{}", v),
            Self::U32(v) => write!(f, "{}", v),
            Self::U64(v) => write!(f, "{}", v),
            Self::F32(v) => write!(f, "{}", v),
            Self::F64(v) => write!(f, "{}", v),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Date(v) => match v.duration_since(SystemTime::UNIX_EPOCH) {
                Ok(since) => write!(f, "date({}ms)", since.as_millis()),
                Err(_) => write!(f, "date({:?})", v),
            },
            Self::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            Self::Composite(data) => write!(f, "{}", data),
            Self::Tabular(data) => write!(
                f,
                "{}[{} rows]",
                data.tabular_type().type_name(),
                data.len()
            ),
        }
    }
}

macro_rules! impl_from_scalar {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for OpenValue {
            fn from(v: $ty) -> Self {
                Self::$variant(v)
            }
        }
    };
}

impl_from_scalar!(bool, Bool);
impl_from_scalar!(char, Char);
impl_from_scalar!(i8, I8);
impl_from_scalar!(i16, I16);
impl_from_scalar!(i32, I32);
impl_from_scalar!(i64, I64);
impl_from_scalar!(u8, U8);
impl_from_scalar!(u16, U16);
impl_from_scalar!(u32, U32);
impl_from_scalar!(u64, U64);
impl_from_scalar!(f32, F32);
impl_from_scalar!(f64, F64);
impl_from_scalar!(String, String);
impl_from_scalar!(SystemTime, Date);
impl_from_scalar!(CompositeData, Composite);
impl_from_scalar!(TabularData, Tabular);

impl From<()> for OpenValue {
    fn from(_: ()) -> Self {
        Self::Void
    }
}

impl From<&str> for OpenValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl<T: Into<OpenValue>> From<Vec<T>> for OpenValue {
    fn from(v: Vec<T>) -> Self {
        Self::Array(v.into_iter().map(Into::into).collect())
    }
}

// ---------------------------------------------------------------------------
// CompositeData
// ---------------------------------------------------------------------------

/// Instance of a composite type. Values are stored in item order.
///
/// Equality matches values by item name, like [`CompositeType`] equality.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompositeData {
    composite_type: Arc<CompositeType>,
    values: Vec<OpenValue>,
}

impl CompositeData {
    /// Create from values listed in item order, type-checking each one.
    pub fn new(composite_type: Arc<CompositeType>, values: Vec<OpenValue>) -> Result<Self> {
        if values.len() != composite_type.len() {
            return Err(Error::InvalidValue(format!(
                "composite '{}' expects {} values, got {}",
                composite_type.type_name(),
                composite_type.len(),
                values.len()
            )));
        }
        for (item, value) in composite_type.items().iter().zip(&values) {
            if !item.open_type.is_value(value) {
                return Err(Error::InvalidValue(format!(
                    "item '{}' of '{}' expects {}, got {}",
                    item.name,
                    composite_type.type_name(),
                    item.open_type,
                    value
                )));
            }
        }
        Ok(Self {
            composite_type,
            values,
        })
    }

    /// Create from `(name, value)` pairs in any order.
    pub fn from_pairs<I, K>(composite_type: Arc<CompositeType>, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, OpenValue)>,
        K: AsRef<str>,
    {
        let mut slots: Vec<Option<OpenValue>> = vec![None; composite_type.len()];
        for (name, value) in pairs {
            let name = name.as_ref();
            let index = composite_type.index_of(name).ok_or_else(|| {
                Error::InvalidValue(format!(
                    "'{}' is not an item of '{}'",
                    name,
                    composite_type.type_name()
                ))
            })?;
            slots[index] = Some(value);
        }
        let mut values = Vec::with_capacity(slots.len());
        for (item, slot) in composite_type.items().iter().zip(slots) {
            values.push(slot.ok_or_else(|| {
                Error::InvalidValue(format!(
                    "missing item '{}' of '{}'",
                    item.name,
                    composite_type.type_name()
                ))
            })?);
        }
        Self::new(composite_type, values)
    }

    /// Skip type checks; the caller guarantees arity and types.
    pub(crate) fn new_unchecked(composite_type: Arc<CompositeType>, values: Vec<OpenValue>) -> Self {
        debug_assert_eq!(values.len(), composite_type.len());
        Self {
            composite_type,
            values,
        }
    }

    /// Type this value was built against.
    pub fn composite_type(&self) -> &Arc<CompositeType> {
        &self.composite_type
    }

    /// Value of item `name`.
    pub fn get(&self, name: &str) -> Option<&OpenValue> {
        self.composite_type
            .index_of(name)
            .and_then(|index| self.values.get(index))
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.composite_type.contains_key(name)
    }

    /// Item names in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.composite_type.key_set()
    }

    /// Values in declaration order.
    pub fn values(&self) -> &[OpenValue] {
        &self.values
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &OpenValue)> {
        self.keys().zip(self.values.iter())
    }
}

impl PartialEq for CompositeData {
    fn eq(&self, other: &Self) -> bool {
        self.composite_type == other.composite_type
            && self
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

impl fmt::Display for CompositeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{{", self.composite_type.type_name())?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

// ---------------------------------------------------------------------------
// TabularData
// ---------------------------------------------------------------------------

/// Hashable form of a simple index value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Void,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(u32),
    F64(u64),
    String(String),
    Date(SystemTime),
}

impl KeyPart {
    fn from_value(value: &OpenValue) -> Option<Self> {
        Some(match value {
            OpenValue::Void => Self::Void,
            OpenValue::Bool(v) => Self::Bool(*v),
            OpenValue::Char(v) => Self::Char(*v),
            OpenValue::I8(v) => Self::I8(*v),
            OpenValue::I16(v) => Self::I16(*v),
            OpenValue::I32(v) => Self::I32(*v),
            OpenValue::I64(v) => Self::I64(*v),
            OpenValue::U8(v) => Self::U8(*v),
            OpenValue::U16(v) => Self::U16(*v),
            OpenValue::U32(v) => Self::U32(*v),
            OpenValue::U64(v) => Self::U64(*v),
            OpenValue::F32(v) => Self::F32(v.to_bits()),
            OpenValue::F64(v) => Self::F64(v.to_bits()),
            OpenValue::String(v) => Self::String(v.clone()),
            OpenValue::Date(v) => Self::Date(*v),
            OpenValue::Array(_) | OpenValue::Composite(_) | OpenValue::Tabular(_) => return None,
        })
    }
}

type IndexKey = Vec<KeyPart>;

/// Indexed collection of composite rows sharing one row type.
///
/// Rows keep insertion order; lookups go through a hash index built from the
/// tabular type's index items.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TabularData {
    tabular_type: Arc<TabularType>,
    rows: Vec<CompositeData>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<IndexKey, usize>,
}

impl TabularData {
    /// Empty table of the given type.
    pub fn new(tabular_type: Arc<TabularType>) -> Self {
        Self {
            tabular_type,
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Empty table with room for `capacity` rows.
    pub fn with_capacity(tabular_type: Arc<TabularType>, capacity: usize) -> Self {
        Self {
            tabular_type,
            rows: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Type this table was built against.
    pub fn tabular_type(&self) -> &Arc<TabularType> {
        &self.tabular_type
    }

    /// Index values of `row`, in index-name order.
    pub fn calculate_index(&self, row: &CompositeData) -> Result<Vec<OpenValue>> {
        if **row.composite_type() != **self.tabular_type.row_type() {
            return Err(Error::InvalidValue(format!(
                "row of type '{}' does not belong in table '{}'",
                row.composite_type().type_name(),
                self.tabular_type.type_name()
            )));
        }
        self.tabular_type
            .index_names()
            .iter()
            .map(|name| {
                row.get(name).cloned().ok_or_else(|| {
                    Error::InvalidValue(format!("row is missing index item '{}'", name))
                })
            })
            .collect()
    }

    /// Insert a row. A row whose index values equal an existing row's fails
    /// with `DuplicateKey` and leaves the table unchanged.
    pub fn put(&mut self, row: CompositeData) -> Result<()> {
        let key_values = self.calculate_index(&row)?;
        let key = Self::hash_key(&key_values)?;
        if self.index.contains_key(&key) {
            return Err(Error::DuplicateKey {
                table: self.tabular_type.type_name().to_string(),
                key: format_key(&key_values),
            });
        }
        self.index.insert(key, self.rows.len());
        self.rows.push(row);
        Ok(())
    }

    /// Insert every row, stopping at the first failure.
    pub fn put_all(&mut self, rows: impl IntoIterator<Item = CompositeData>) -> Result<()> {
        for row in rows {
            self.put(row)?;
        }
        Ok(())
    }

    /// Row whose index values equal `key`, in index-name order.
    pub fn get(&self, key: &[OpenValue]) -> Option<&CompositeData> {
        let key = Self::hash_key(key).ok()?;
        self.index.get(&key).map(|&i| &self.rows[i])
    }

    pub fn contains_key(&self, key: &[OpenValue]) -> bool {
        self.get(key).is_some()
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[CompositeData] {
        &self.rows
    }

    /// Index keys in insertion order.
    pub fn keys(&self) -> Vec<Vec<OpenValue>> {
        self.rows
            .iter()
            .filter_map(|row| self.calculate_index(row).ok())
            .collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn hash_key(values: &[OpenValue]) -> Result<IndexKey> {
        values
            .iter()
            .map(|value| {
                KeyPart::from_value(value).ok_or_else(|| {
                    Error::InvalidValue(format!("{} cannot be used as an index value", value))
                })
            })
            .collect()
    }
}

impl PartialEq for TabularData {
    fn eq(&self, other: &Self) -> bool {
        self.tabular_type == other.tabular_type
            && self.rows.len() == other.rows.len()
            && self.index.iter().all(|(key, &i)| {
                other
                    .index
                    .get(key)
                    .is_some_and(|&j| self.rows[i] == other.rows[j])
            })
    }
}

fn format_key(values: &[OpenValue]) -> String {
    let parts: Vec<String> = values.iter().map(ToString::to_string).collect();
    format!("({})", parts.join(", "))
}
