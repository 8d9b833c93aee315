// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Attribute, parameter and operation info records.
//!
//! Each record resolves its open type when built and derives the
//! `openType` / `originalType` descriptor fields; caller descriptors are
//! merged afterwards so callers can override the derived ones.

mod attribute;
mod metadata;
mod operation;
mod parameter;

pub use attribute::{AttributeInfo, AttributeInfoBuilder};
pub use metadata::{AttributeMetadata, InterfaceMetadata, OperationMetadata, ParameterMetadata};
pub use operation::{Impact, OperationInfo, OperationInfoBuilder};
pub use parameter::{ParameterInfo, ParameterInfoBuilder};

use crate::descriptor::{Descriptor, DescriptorBuilder};
use crate::types::{Class, OpenType};

/// Derived fields first, caller fields second.
fn derived_descriptor(
    open_type: &OpenType,
    class: Option<&Class>,
    qualified: bool,
    caller: &DescriptorBuilder,
) -> Descriptor {
    let mut builder = Descriptor::builder().with_open_type(open_type.clone());
    if let Some(class) = class {
        builder = builder.with_original_type(class.display_name(qualified));
    }
    builder.with_descriptor(&caller.build()).build()
}
