// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Descriptor metadata bags.
//!
//! A [`Descriptor`] is an immutable field-name -> value mapping attached to
//! types, attributes, parameters, operations and interfaces. Field names
//! compare case-insensitively; merging is a plain ordered merge where the
//! later write wins.
//!
//! ```rust
//! use hdds_mx::Descriptor;
//!
//! let base = Descriptor::builder().with_field("a", 1i64).with_field("b", 2i64).build();
//! let merged = Descriptor::builder()
//!     .with_descriptor(&base)
//!     .with_field("A", 3i64)
//!     .build();
//!
//! assert_eq!(merged.get("a").and_then(|v| v.as_int()), Some(3));
//! assert_eq!(merged.len(), 2);
//! ```

use crate::config::{
    FIELD_DEFAULT_VALUE, FIELD_DEPRECATION, FIELD_DESCRIPTION_RESOURCE_KEY, FIELD_ENABLED,
    FIELD_IMMUTABLE_INFO, FIELD_INFO_TIMEOUT, FIELD_LEGAL_VALUES, FIELD_LOCALE, FIELD_MAX_VALUE,
    FIELD_METRIC_TYPE, FIELD_MIN_VALUE, FIELD_OPEN_TYPE, FIELD_ORIGINAL_TYPE, FIELD_SEVERITY,
    FIELD_SINCE, FIELD_UNITS,
};
use crate::types::{OpenType, OpenValue};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// Value stored in a descriptor field.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Texts(Vec<String>),
    Type(OpenType),
    Value(OpenValue),
}

impl FieldValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }

    /// Open type stored in the field (`openType`).
    pub fn as_open_type(&self) -> Option<&OpenType> {
        match self {
            Self::Type(v) => Some(v),
            _ => None,
        }
    }

    /// Open value stored in the field (`minValue`, `defaultValue`, ...).
    pub fn as_value(&self) -> Option<&OpenValue> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
            Self::Text(v) => f.write_str(v),
            Self::Texts(v) => write!(f, "[{}]", v.join(", ")),
            Self::Type(v) => write!(f, "{}", v),
            Self::Value(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        Self::Texts(v)
    }
}

impl From<OpenType> for FieldValue {
    fn from(v: OpenType) -> Self {
        Self::Type(v)
    }
}

impl From<OpenValue> for FieldValue {
    fn from(v: OpenValue) -> Self {
        Self::Value(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
struct Field {
    name: String,
    value: FieldValue,
}

/// Immutable metadata bag.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Descriptor {
    /// Keyed by lower-cased field name.
    fields: BTreeMap<String, Field>,
}

impl Descriptor {
    /// Start an empty descriptor builder.
    pub fn builder() -> DescriptorBuilder {
        DescriptorBuilder::default()
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Field `name`, matched case-insensitively.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .get(&name.to_ascii_lowercase())
            .map(|field| &field.value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names as last written.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.values().map(|field| field.name.as_str())
    }

    /// Fields as `(name, value)`, ordered by lowercased name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields
            .values()
            .map(|field| (field.name.as_str(), &field.value))
    }

    /// `self` overlaid with `other`; `other` wins on conflicts.
    #[must_use]
    pub fn merged_with(&self, other: &Descriptor) -> Descriptor {
        Descriptor::builder()
            .with_descriptor(self)
            .with_descriptor(other)
            .build()
    }
}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
        }
        f.write_str("}")
    }
}

/// Builder merging descriptor sources in call order.
#[derive(Debug, Clone, Default)]
pub struct DescriptorBuilder {
    fields: BTreeMap<String, Field>,
}

impl DescriptorBuilder {
    /// Set one field, replacing any earlier value for the same name.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.put(name.into(), value.into());
        self
    }

    /// Merge every field of `other`.
    #[must_use]
    pub fn with_descriptor(mut self, other: &Descriptor) -> Self {
        for field in other.fields.values() {
            self.put(field.name.clone(), field.value.clone());
        }
        self
    }

    #[must_use]
    pub fn with_since(self, version: impl Into<String>) -> Self {
        self.with_field(FIELD_SINCE, version.into())
    }

    #[must_use]
    pub fn with_locale(self, locale: impl Into<String>) -> Self {
        self.with_field(FIELD_LOCALE, locale.into())
    }

    #[must_use]
    pub fn with_units(self, units: impl Into<String>) -> Self {
        self.with_field(FIELD_UNITS, units.into())
    }

    #[must_use]
    pub fn with_enabled(self, enabled: bool) -> Self {
        self.with_field(FIELD_ENABLED, enabled)
    }

    #[must_use]
    pub fn with_deprecation(self, note: impl Into<String>) -> Self {
        self.with_field(FIELD_DEPRECATION, note.into())
    }

    /// `"counter"` or `"gauge"` by convention; not validated.
    #[must_use]
    pub fn with_metric_type(self, metric_type: impl Into<String>) -> Self {
        self.with_field(FIELD_METRIC_TYPE, metric_type.into())
    }

    /// 0 (non-recoverable) to 6 (debug) by convention.
    #[must_use]
    pub fn with_severity(self, severity: i64) -> Self {
        self.with_field(FIELD_SEVERITY, severity)
    }

    #[must_use]
    pub fn with_min_value(self, value: impl Into<OpenValue>) -> Self {
        self.with_field(FIELD_MIN_VALUE, value.into())
    }

    #[must_use]
    pub fn with_max_value(self, value: impl Into<OpenValue>) -> Self {
        self.with_field(FIELD_MAX_VALUE, value.into())
    }

    #[must_use]
    pub fn with_default_value(self, value: impl Into<OpenValue>) -> Self {
        self.with_field(FIELD_DEFAULT_VALUE, value.into())
    }

    #[must_use]
    pub fn with_legal_values<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.with_field(FIELD_LEGAL_VALUES, values)
    }

    #[must_use]
    pub fn with_immutable_info(self, immutable: bool) -> Self {
        self.with_field(FIELD_IMMUTABLE_INFO, immutable)
    }

    /// Stored in whole milliseconds.
    #[must_use]
    pub fn with_info_timeout(self, timeout: Duration) -> Self {
        let millis = i64::try_from(timeout.as_millis()).unwrap_or(i64::MAX);
        self.with_field(FIELD_INFO_TIMEOUT, millis)
    }

    #[must_use]
    pub fn with_description_resource_key(self, key: impl Into<String>) -> Self {
        self.with_field(FIELD_DESCRIPTION_RESOURCE_KEY, key.into())
    }

    #[must_use]
    pub fn with_open_type(self, open_type: OpenType) -> Self {
        self.with_field(FIELD_OPEN_TYPE, open_type)
    }

    #[must_use]
    pub fn with_original_type(self, type_name: impl Into<String>) -> Self {
        self.with_field(FIELD_ORIGINAL_TYPE, type_name.into())
    }

    /// Immutable snapshot of the fields merged so far.
    pub fn build(&self) -> Descriptor {
        Descriptor {
            fields: self.fields.clone(),
        }
    }

    fn put(&mut self, name: String, value: FieldValue) {
        self.fields
            .insert(name.to_ascii_lowercase(), Field { name, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimpleKind;

    #[test]
    fn test_last_writer_wins() {
        let first = Descriptor::builder().with_field("a", 1i64).build();
        let second = Descriptor::builder().with_field("a", 2i64).build();

        let merged = Descriptor::builder()
            .with_descriptor(&first)
            .with_descriptor(&second)
            .build();
        assert_eq!(merged.get("a"), Some(&FieldValue::Int(2)));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_disjoint_merge_keeps_all_fields() {
        let ab = Descriptor::builder()
            .with_field("a", 1i64)
            .with_field("b", 2i64)
            .build();
        let c = Descriptor::builder().with_field("c", 3i64).build();

        let merged = ab.merged_with(&c);
        assert_eq!(merged.len(), 3);
        assert_eq!(merged.get("a").and_then(|v| v.as_int()), Some(1));
        assert_eq!(merged.get("b").and_then(|v| v.as_int()), Some(2));
        assert_eq!(merged.get("c").and_then(|v| v.as_int()), Some(3));

        // Associative in effect for non-conflicting fields
        assert_eq!(merged, c.merged_with(&ab));
    }

    #[test]
    fn test_case_insensitive_names() {
        let d = Descriptor::builder()
            .with_field("Units", "ms")
            .with_field("units", "us")
            .build();
        assert_eq!(d.len(), 1);
        assert_eq!(d.get("UNITS").and_then(|v| v.as_text()), Some("us"));
        assert_eq!(d.field_names().collect::<Vec<_>>(), vec!["units"]);
    }

    #[test]
    fn test_sugar_setters() {
        let d = Descriptor::builder()
            .with_since("1.0")
            .with_locale("en-US")
            .with_enabled(true)
            .with_legal_values(["on", "off"])
            .with_info_timeout(Duration::from_secs(2))
            .with_open_type(OpenType::Simple(SimpleKind::I32))
            .build();

        assert_eq!(d.get(FIELD_SINCE).and_then(|v| v.as_text()), Some("1.0"));
        assert_eq!(d.get(FIELD_LOCALE).and_then(|v| v.as_text()), Some("en-US"));
        assert_eq!(d.get(FIELD_ENABLED).and_then(|v| v.as_bool()), Some(true));
        assert_eq!(d.get(FIELD_INFO_TIMEOUT).and_then(|v| v.as_int()), Some(2000));
        assert_eq!(
            d.get(FIELD_OPEN_TYPE).and_then(|v| v.as_open_type()),
            Some(&OpenType::Simple(SimpleKind::I32))
        );
        assert_eq!(
            d.get(FIELD_LEGAL_VALUES),
            Some(&FieldValue::Texts(vec!["on".into(), "off".into()]))
        );
    }

    #[test]
    fn test_build_is_snapshot() {
        let builder = Descriptor::builder().with_field("a", true);
        let before = builder.build();
        let after = builder.with_field("b", false).build();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 2);
    }
}
