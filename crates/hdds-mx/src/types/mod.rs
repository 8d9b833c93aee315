// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Open type model.
//!
//! The closed set of protocol value types (simple, array, composite,
//! tabular), their values, and the runtime [`Class`] handle the mapper
//! resolves them from.

mod class;
mod open_type;
mod value;

pub use class::{short_type_name, Class, ElementsFn, TypeClass};
pub use open_type::{CompositeItem, CompositeType, OpenType, SimpleKind, TabularType};
pub use value::{CompositeData, OpenValue, TabularData};
