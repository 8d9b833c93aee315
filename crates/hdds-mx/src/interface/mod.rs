// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Management interfaces.
//!
//! [`ManagedInterface`] is the contract the transport layer consumes: one
//! metadata record, attribute reads by name and operation calls by name.
//! [`DynamicInterface`] implements it from declared attribute and operation
//! infos.

mod dynamic;

pub use dynamic::{DynamicInterface, DynamicInterfaceBuilder};

use crate::error::Result;
use crate::info::InterfaceMetadata;
use crate::types::OpenValue;

/// Read/invoke surface of one managed object.
pub trait ManagedInterface: Send + Sync {
    /// Everything a client can read or invoke.
    fn metadata(&self) -> &InterfaceMetadata;

    /// Current value of the named attribute.
    ///
    /// Unknown names fail with `AttributeNotFound`; supplier failures with
    /// `AttributeRead`.
    fn attribute(&self, name: &str) -> Result<OpenValue>;

    /// Run the named operation.
    ///
    /// Unknown names fail with `OperationNotFound`; wrong arity or argument
    /// types with `InvalidOperationArguments`, before anything runs.
    fn invoke(&self, operation: &str, args: &[OpenValue]) -> Result<OpenValue>;

    /// Bulk read. Unknown or failing attributes are left out; the rest keep
    /// request order.
    fn attributes(&self, names: &[&str]) -> Vec<(String, OpenValue)> {
        names
            .iter()
            .filter_map(|name| {
                self.attribute(name)
                    .ok()
                    .map(|value| ((*name).to_string(), value))
            })
            .collect()
    }
}
