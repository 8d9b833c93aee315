// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol-level metadata views.
//!
//! Plain immutable records handed to the transport layer. They carry names,
//! value class names and descriptors, never suppliers or invokers.

use super::Impact;
use crate::descriptor::Descriptor;

/// Metadata of one readable attribute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AttributeMetadata {
    pub name: String,
    /// Value class (`String`, `CompositeData`, `TabularData`, `[i32]`, ...).
    pub type_name: String,
    pub description: Option<String>,
    /// Always `true`.
    pub readable: bool,
    /// Always `false`; attributes are read-only.
    pub writable: bool,
    /// Always `false`.
    pub is_getter: bool,
    pub descriptor: Descriptor,
}

/// Metadata of one operation parameter.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterMetadata {
    pub name: String,
    /// Name of the declared parameter class.
    pub type_name: String,
    pub description: Option<String>,
    pub descriptor: Descriptor,
}

/// Metadata of one invokable operation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct OperationMetadata {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Vec<ParameterMetadata>,
    /// Value class of the return type.
    pub return_type: String,
    pub impact: Impact,
    pub descriptor: Descriptor,
}

/// Combined metadata of a management interface.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct InterfaceMetadata {
    pub class_name: String,
    pub description: Option<String>,
    pub attributes: Vec<AttributeMetadata>,
    pub operations: Vec<OperationMetadata>,
    pub descriptor: Descriptor,
}

impl InterfaceMetadata {
    /// Metadata of attribute `name`.
    pub fn attribute(&self, name: &str) -> Option<&AttributeMetadata> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    /// Metadata of operation `name`.
    pub fn operation(&self, name: &str) -> Option<&OperationMetadata> {
        self.operations.iter().find(|operation| operation.name == name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|attribute| attribute.name.as_str())
    }

    pub fn operation_names(&self) -> impl Iterator<Item = &str> {
        self.operations.iter().map(|operation| operation.name.as_str())
    }
}
